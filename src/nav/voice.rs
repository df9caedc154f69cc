use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::info;

use crate::audio::{AudioFocus, AudioItem};
use crate::nav::generator::InstructionGenerator;
use crate::nav::render;
use crate::nav::types::{NavigationInstruction, Route, Telemetry};

/// Per-session loop from telemetry to spoken guidance: each sample runs
/// through the generator and every resulting instruction is rendered and
/// submitted to the audio focus as a navigation item.
pub struct NavigationVoice {
    focus: Arc<AudioFocus>,
    channel: String,
    generator: Mutex<InstructionGenerator>,
}

impl NavigationVoice {
    pub fn new(focus: Arc<AudioFocus>, channel: impl Into<String>, route: Route) -> Self {
        Self {
            focus,
            channel: channel.into(),
            generator: Mutex::new(InstructionGenerator::new(route)),
        }
    }

    /// Replace the active route, resetting maneuver progress.
    pub async fn set_route(&self, route: Route) {
        let mut generator = self.generator.lock().await;
        *generator = InstructionGenerator::new(route);
    }

    pub async fn submit_telemetry(&self, sample: Telemetry) -> Vec<NavigationInstruction> {
        let instructions = {
            let mut generator = self.generator.lock().await;
            generator.on_telemetry(&sample)
        };
        for instruction in &instructions {
            let text = render::render(instruction);
            info!(maneuver = instruction.maneuver_id, class = ?instruction.class, "guidance emitted");
            let item = AudioItem::navigation(text, instruction.class.urgency());
            self.focus.submit(&self.channel, item).await;
        }
        instructions
    }
}
