use crate::audio::{AudioKind, Urgency};
use crate::conversation::{ConversationState, FollowUpAction, TopicDecision};
use crate::dispatch::HandlerResult;
use crate::intent::{HandlerName, Intent};

/// What the master orchestrator submits to the audio focus for this reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioItemRequest {
    pub kind: AudioKind,
    pub urgency: Urgency,
}

/// Exactly one reply per turn, whatever the handlers did.
#[derive(Debug, Clone)]
pub struct Reply {
    pub text: String,
    pub audio: AudioItemRequest,
    pub follow_up: Vec<FollowUpAction>,
}

/// Merges handler results and conversation state into one spoken reply.
/// Failed handlers get a deterministic, handler-keyed fallback line; the
/// user never hears which internal component was involved.
pub struct ResponseSynthesizer;

impl ResponseSynthesizer {
    pub fn new() -> Self {
        Self
    }

    pub fn synthesize(
        &self,
        intent: &Intent,
        topic: TopicDecision,
        results: &[HandlerResult],
        state: &ConversationState,
    ) -> Reply {
        let audio = AudioItemRequest { kind: AudioKind::Narration, urgency: intent.urgency };

        if topic == TopicDecision::Ambiguous {
            return Reply {
                text: self.clarifying_question(state),
                audio: AudioItemRequest { kind: AudioKind::Narration, urgency: Urgency::Medium },
                follow_up: vec![FollowUpAction::AwaitClarification],
            };
        }

        if !results.is_empty() && results.iter().all(|r| !r.succeeded()) {
            return Reply {
                text: "Hmm, that didn't come together the way I wanted. Let's try that \
                       differently. Could you tell me once more what you'd like?"
                    .to_string(),
                audio,
                follow_up: vec![FollowUpAction::RetryLater { what: intent.primary.topic().to_string() }],
            };
        }

        let mut parts = Vec::new();
        let mut follow_up = Vec::new();
        for result in results {
            if result.succeeded() {
                if let Some(payload) = &result.payload {
                    parts.push(payload.clone());
                }
            } else {
                parts.push(self.fallback_line(result.handler).to_string());
                if let Some(action) = self.fallback_action(result.handler) {
                    follow_up.push(action);
                }
            }
        }

        if parts.is_empty() {
            parts.push("I'm listening. The road's all ours.".to_string());
        }

        Reply { text: parts.join(" "), audio, follow_up }
    }

    /// One non-leading question; never a guess.
    fn clarifying_question(&self, state: &ConversationState) -> String {
        match &state.active_topic {
            Some(topic) => format!(
                "Just so I follow: are we still on {topic}, or is this something new?"
            ),
            None => "I want to get this right. What would you like me to do?".to_string(),
        }
    }

    fn fallback_line(&self, handler: HandlerName) -> &'static str {
        match handler {
            HandlerName::Booking => {
                "I couldn't lock that reservation in just now. I can read out the venue's \
                 phone number so you can call ahead."
            }
            HandlerName::Story => {
                "Here's one thing about this area: this stretch of road has carried \
                 travelers and traders for hundreds of years."
            }
            HandlerName::NavigationInfo => {
                "I'll keep the turn-by-turn directions coming as we go."
            }
            HandlerName::LocalExpert => {
                "I can pull up local suggestions again in a moment."
            }
        }
    }

    fn fallback_action(&self, handler: HandlerName) -> Option<FollowUpAction> {
        match handler {
            HandlerName::Booking => {
                Some(FollowUpAction::OfferPhoneNumber { venue: "the venue".to_string() })
            }
            HandlerName::LocalExpert => {
                Some(FollowUpAction::RetryLater { what: "local suggestions".to_string() })
            }
            _ => None,
        }
    }
}

impl Default for ResponseSynthesizer {
    fn default() -> Self {
        Self::new()
    }
}
