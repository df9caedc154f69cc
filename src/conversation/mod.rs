pub mod state;
pub mod topic;

pub use state::{ConversationState, FollowUpAction, Speaker, TurnMessage, HISTORY_WINDOW};
pub use topic::{assess, TopicDecision};
