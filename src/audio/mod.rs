pub mod focus;
pub mod item;
pub mod registry;

pub use focus::{AudioFocus, ChannelMachine, DirectiveEvent};
pub use item::{
    AudioItem, AudioKind, AudioPayload, DirectiveAction, OrchestrationDirective, PlaybackState,
    Urgency,
};
pub use registry::{SourceRegistry, SuspendMode, Suspended};
