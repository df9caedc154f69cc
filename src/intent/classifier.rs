use async_trait::async_trait;

use crate::conversation::ConversationState;
use crate::error::WayfarerError;

use super::types::{ClassifiedIntent, Intent, IntentKind};

/// Collaborator boundary: real deployments plug an NLU service in here.
#[async_trait]
pub trait IntentClassifier: Send + Sync {
    async fn classify(
        &self,
        text: &str,
        context: &ConversationState,
    ) -> Result<ClassifiedIntent, WayfarerError>;
}

/// Keyword classifier used when no external NLU is wired up. Heuristics:
/// safety words outrank everything, then booking, navigation, trip
/// planning, stories, local info; anything else is low-confidence chat.
pub struct KeywordClassifier;

impl KeywordClassifier {
    pub fn new() -> Self {
        Self
    }

    fn matches(text: &str, needles: &[&str]) -> bool {
        needles.iter().any(|n| text.contains(n))
    }
}

impl Default for KeywordClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IntentClassifier for KeywordClassifier {
    async fn classify(
        &self,
        text: &str,
        _context: &ConversationState,
    ) -> Result<ClassifiedIntent, WayfarerError> {
        let t = text.to_lowercase();

        let (kind, confidence) = if Self::matches(&t, &["emergency", "accident", "hospital", "pull over"]) {
            (IntentKind::Safety, 0.95)
        } else if Self::matches(&t, &["book", "reserve", "reservation", "table for", "room for"]) {
            (IntentKind::Booking, 0.85)
        } else if Self::matches(&t, &["how far", "next turn", "exit", "eta", "arrive", "which lane"]) {
            (IntentKind::NavigationQuery, 0.8)
        } else if Self::matches(&t, &["plan", "trip", "detour", "stop by", "on the way"]) {
            (IntentKind::TripPlanning, 0.75)
        } else if Self::matches(&t, &["story", "tell me about", "history", "legend", "what happened here"]) {
            (IntentKind::Story, 0.8)
        } else if Self::matches(&t, &["restaurant", "food", "coffee", "nearby", "recommend", "around here"]) {
            (IntentKind::LocalInfo, 0.7)
        } else if t.split_whitespace().count() < 3 {
            (IntentKind::SmallTalk, 0.3)
        } else {
            (IntentKind::SmallTalk, 0.4)
        };

        Ok(ClassifiedIntent { intent: Intent::of(kind), confidence })
    }
}
