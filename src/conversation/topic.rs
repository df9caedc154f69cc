use std::collections::HashSet;

use super::state::ConversationState;

/// Outcome of the continuity check that runs before synthesis. Ambiguity
/// means the synthesizer asks one clarifying question instead of guessing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopicDecision {
    Continues,
    NewTopic,
    Ambiguous,
}

const STOPWORDS: &[&str] = &[
    "a", "an", "and", "are", "be", "can", "could", "do", "for", "get", "how", "i", "in", "is",
    "it", "me", "my", "of", "on", "or", "please", "so", "that", "the", "there", "this", "to",
    "us", "was", "we", "what", "where", "will", "would", "you",
];

fn keywords(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.len() > 2 && !STOPWORDS.contains(w))
        .map(|w| w.to_string())
        .collect()
}

/// Keyword/entity overlap with the last couple of turns. Strong overlap
/// continues the active topic, zero overlap starts a new one, and a weak
/// single-word echo is ambiguous.
pub fn assess(text: &str, state: &ConversationState) -> TopicDecision {
    let current = keywords(text);
    if current.is_empty() {
        return TopicDecision::Ambiguous;
    }

    let mut recent = HashSet::new();
    for message in state.recent(4) {
        recent.extend(keywords(&message.text));
    }
    if recent.is_empty() {
        return TopicDecision::NewTopic;
    }

    let overlap = current.intersection(&recent).count();
    let ratio = overlap as f32 / current.len() as f32;
    if overlap >= 2 || ratio >= 0.4 {
        TopicDecision::Continues
    } else if overlap == 0 {
        TopicDecision::NewTopic
    } else {
        TopicDecision::Ambiguous
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn state_with(history: &[&str]) -> ConversationState {
        let mut s = ConversationState::new(Uuid::new_v4());
        for h in history {
            s.push_user(*h);
        }
        s
    }

    #[test]
    fn empty_history_is_new_topic() {
        let s = state_with(&[]);
        assert_eq!(assess("find me a restaurant", &s), TopicDecision::NewTopic);
    }

    #[test]
    fn strong_overlap_continues() {
        let s = state_with(&["any good restaurant nearby", "italian restaurant sounds good"]);
        assert_eq!(
            assess("book the italian restaurant", &s),
            TopicDecision::Continues
        );
    }

    #[test]
    fn disjoint_utterance_is_new_topic() {
        let s = state_with(&["tell me the castle story"]);
        assert_eq!(assess("find parking downtown", &s), TopicDecision::NewTopic);
    }
}
