pub mod classifier;
pub mod types;

pub use classifier::{IntentClassifier, KeywordClassifier};
pub use types::{ClassifiedIntent, HandlerName, Intent, IntentKind};
