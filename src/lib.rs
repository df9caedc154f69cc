pub mod audio;
pub mod conversation;
pub mod dispatch;
pub mod error;
pub mod intent;
pub mod nav;
pub mod orchestrator;
pub mod services;
pub mod synthesis;

pub use audio::{AudioFocus, AudioItem, OrchestrationDirective};
pub use error::WayfarerError;
pub use nav::NavigationVoice;
pub use orchestrator::MasterOrchestrator;
pub use synthesis::Reply;
