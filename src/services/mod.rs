pub mod directions;
pub mod speech;

use async_trait::async_trait;

use crate::nav::{GeoPoint, Route};

/// Voice selection for the TTS collaborator.
#[derive(Debug, Clone)]
pub struct VoiceParams {
    pub voice: String,
    pub rate: f32,
}

impl Default for VoiceParams {
    fn default() -> Self {
        Self { voice: "narrator".to_string(), rate: 1.0 }
    }
}

/// External TTS boundary: text in, opaque audio handle out. Must support
/// cancellation (drop the future) and is never retried here.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, text: &str, params: &VoiceParams) -> anyhow::Result<String>;
}

/// External directions boundary. Route computation itself is out of scope;
/// this core only consumes the result.
#[async_trait]
pub trait DirectionsProvider: Send + Sync {
    async fn route(
        &self,
        origin: GeoPoint,
        destination: GeoPoint,
        waypoints: &[GeoPoint],
    ) -> anyhow::Result<Route>;
}

pub use directions::HttpDirectionsService;
pub use speech::HttpSpeechService;
