use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use wayfarer::audio::{AudioFocus, AudioItem, DirectiveAction, Urgency};
use wayfarer::dispatch::{DispatchConfig, Handler, HandlerDispatcher, HandlerTask};
use wayfarer::intent::{HandlerName, KeywordClassifier};
use wayfarer::nav::{GeoPoint, Maneuver, ManeuverKind, NavigationVoice, RoadClass, Route, Telemetry};
use wayfarer::orchestrator::MasterOrchestrator;
use wayfarer::services::{SpeechSynthesizer, VoiceParams};

const CHANNEL: &str = "cabin";

/// Offline TTS stand-in: hands back a synthetic handle immediately.
struct LocalSpeech;

#[async_trait]
impl SpeechSynthesizer for LocalSpeech {
    async fn synthesize(&self, _text: &str, _params: &VoiceParams) -> Result<String> {
        Ok(format!("tts://local/{}", Uuid::new_v4()))
    }
}

struct StoryHandler;

#[async_trait]
impl Handler for StoryHandler {
    fn name(&self) -> HandlerName {
        HandlerName::Story
    }

    async fn call(&self, _task: HandlerTask, _cancel: CancellationToken) -> Result<String> {
        tokio::time::sleep(Duration::from_millis(120)).await;
        Ok("The old castle on your left guarded this valley for six centuries.".to_string())
    }
}

struct LocalExpertHandler;

#[async_trait]
impl Handler for LocalExpertHandler {
    fn name(&self) -> HandlerName {
        HandlerName::LocalExpert
    }

    async fn call(&self, _task: HandlerTask, _cancel: CancellationToken) -> Result<String> {
        tokio::time::sleep(Duration::from_millis(80)).await;
        Ok("There's a well-reviewed trattoria two minutes off the route.".to_string())
    }
}

/// Deliberately slower than the per-handler budget, to show the fallback.
struct SlowBookingHandler;

#[async_trait]
impl Handler for SlowBookingHandler {
    fn name(&self) -> HandlerName {
        HandlerName::Booking
    }

    async fn call(&self, _task: HandlerTask, cancel: CancellationToken) -> Result<String> {
        tokio::select! {
            _ = tokio::time::sleep(Duration::from_secs(30)) => Ok("booked".to_string()),
            _ = cancel.cancelled() => Err(anyhow::anyhow!("cancelled")),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    tracing::info!("wayfarer demo starting");

    let focus = Arc::new(AudioFocus::new());

    // Console sink: prints every directive and reports completion back
    // after a short simulated playback.
    let mut events = focus.subscribe();
    let sink_focus = Arc::clone(&focus);
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            println!(
                "[SINK-{}] {:?} -> {} (fade {}ms)",
                event.channel, event.directive.action, event.directive.target, event.directive.fade_ms
            );
            if matches!(event.directive.action, DirectiveAction::Start | DirectiveAction::Resume) {
                let focus = Arc::clone(&sink_focus);
                let channel = event.channel.clone();
                let id = event.directive.target;
                tokio::spawn(async move {
                    tokio::time::sleep(Duration::from_millis(400)).await;
                    focus.complete(&channel, id).await;
                });
            }
        }
    });

    // A short city route with two maneuvers.
    let route = Route {
        maneuvers: vec![
            Maneuver {
                id: 1,
                kind: ManeuverKind::TurnLeft,
                at: GeoPoint::new(48.137, 11.575),
                road: RoadClass::City,
                street: Some("Ludwigstrasse".to_string()),
            },
            Maneuver {
                id: 2,
                kind: ManeuverKind::Arrive,
                at: GeoPoint::new(48.139, 11.580),
                road: RoadClass::City,
                street: None,
            },
        ],
    };
    let navigation = NavigationVoice::new(Arc::clone(&focus), CHANNEL, route);

    let mut dispatcher = HandlerDispatcher::new(DispatchConfig {
        per_handler: Duration::from_millis(500),
        ceiling: Duration::from_secs(2),
    });
    dispatcher.register(Arc::new(StoryHandler));
    dispatcher.register(Arc::new(LocalExpertHandler));
    dispatcher.register(Arc::new(SlowBookingHandler));

    let orchestrator = MasterOrchestrator::new(
        Arc::new(KeywordClassifier::new()),
        dispatcher,
        Arc::new(LocalSpeech),
        Arc::clone(&focus),
        CHANNEL,
    );

    // Background narration begins the drive.
    let narration = AudioItem::narration(
        "As we follow the river north, the city opens up ahead of us.",
        Urgency::Medium,
    );
    focus.submit(CHANNEL, narration).await;

    let session = Uuid::new_v4();
    for utterance in [
        "tell me about the history of this valley",
        "book a table for four tonight",
    ] {
        println!("\n[USER] {utterance}");
        let reply = orchestrator.handle_utterance(session, utterance).await?;
        println!("[AGENT] {}", reply.text);
    }

    // Drive toward the first maneuver; guidance preempts narration as the
    // distance closes.
    let samples = [
        (48.1300, 11.575, 0u64),
        (48.1335, 11.575, 8_000),
        (48.1358, 11.575, 16_000),
        (48.1366, 11.575, 24_000),
        (48.13695, 11.575, 32_000),
    ];
    for (lat, lon, ts) in samples {
        let emitted = navigation
            .submit_telemetry(Telemetry {
                position: GeoPoint::new(lat, lon),
                speed_mps: 14.0,
                heading_deg: 0.0,
                timestamp_ms: ts,
            })
            .await;
        for instruction in emitted {
            println!("[NAV] {:?} maneuver {}", instruction.class, instruction.maneuver_id);
        }
        tokio::time::sleep(Duration::from_millis(150)).await;
    }

    tokio::time::sleep(Duration::from_millis(800)).await;
    tracing::info!("wayfarer demo done");
    Ok(())
}
