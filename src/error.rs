use thiserror::Error;

use crate::audio::DirectiveAction;

/// Error taxonomy for the orchestration core. Handler failures are expected
/// and recovered by fallback; only sink failures and repeated classification
/// uncertainty surface as operational warnings.
#[derive(Error, Debug)]
pub enum WayfarerError {
    #[error("audio sink failed to execute {action:?} on channel {channel}")]
    AudioSink { channel: String, action: DirectiveAction },

    #[error("handler {handler} returned {status}")]
    Handler { handler: &'static str, status: &'static str },

    #[error("telemetry anomaly: {0}")]
    Telemetry(&'static str),

    #[error("intent confidence {confidence:.2} below threshold")]
    Classification { confidence: f32 },

    #[error("intent kind {kind} cannot route to handler {handler}")]
    InvalidRouting { kind: String, handler: &'static str },

    #[error("collaborator service error: {0}")]
    Service(String),
}
