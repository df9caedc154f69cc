use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::audio::{AudioFocus, AudioItem, AudioPayload};
use crate::conversation::{self, ConversationState, FollowUpAction, TopicDecision};
use crate::dispatch::HandlerDispatcher;
use crate::error::WayfarerError;
use crate::intent::IntentClassifier;
use crate::synthesis::{AudioItemRequest, Reply, ResponseSynthesizer};
use crate::services::{SpeechSynthesizer, VoiceParams};

const MIN_CONFIDENCE: f32 = 0.5;
/// Consecutive low-confidence turns before we flag it operationally.
const UNCERTAIN_WARN_STREAK: u32 = 2;

/// Turn controller. One `handle_utterance` call takes an utterance through
/// classification, fan-out, synthesis, state update, and audio submission;
/// the caller gets exactly one reply and the user never sees the seams.
pub struct MasterOrchestrator {
    classifier: Arc<dyn IntentClassifier>,
    dispatcher: HandlerDispatcher,
    synthesizer: ResponseSynthesizer,
    speech: Arc<dyn SpeechSynthesizer>,
    voice: VoiceParams,
    focus: Arc<AudioFocus>,
    channel: String,
    sessions: Mutex<HashMap<Uuid, Arc<Mutex<ConversationState>>>>,
}

impl MasterOrchestrator {
    pub fn new(
        classifier: Arc<dyn IntentClassifier>,
        dispatcher: HandlerDispatcher,
        speech: Arc<dyn SpeechSynthesizer>,
        focus: Arc<AudioFocus>,
        channel: impl Into<String>,
    ) -> Self {
        Self {
            classifier,
            dispatcher,
            synthesizer: ResponseSynthesizer::new(),
            speech,
            voice: VoiceParams::default(),
            focus,
            channel: channel.into(),
            sessions: Mutex::new(HashMap::new()),
        }
    }

    async fn session(&self, session_id: Uuid) -> Arc<Mutex<ConversationState>> {
        let mut sessions = self.sessions.lock().await;
        sessions
            .entry(session_id)
            .or_insert_with(|| Arc::new(Mutex::new(ConversationState::new(session_id))))
            .clone()
    }

    /// Overlapping calls for one session serialize here, so turns append to
    /// the history strictly in completion order.
    pub async fn handle_utterance(
        &self,
        session_id: Uuid,
        text: &str,
    ) -> Result<Reply, WayfarerError> {
        let session = self.session(session_id).await;
        let mut state = session.lock().await;
        state.prune();

        let classified = self.classifier.classify(text, &state).await?;
        if classified.confidence < MIN_CONFIDENCE {
            return Ok(self.clarify_uncertain(&mut state, text, classified.confidence).await);
        }
        state.uncertain_streak = 0;
        let intent = classified.intent;

        // Continuity check runs against the history *before* this utterance
        // is appended, then the user turn lands.
        let topic = conversation::assess(text, &state);
        state.push_user(text);
        if topic == TopicDecision::NewTopic {
            state.active_topic = Some(intent.primary.topic().to_string());
        }

        let results = self.dispatcher.dispatch(&intent, text).await;
        let reply = self.synthesizer.synthesize(&intent, topic, &results, &state);

        state.push_agent(&reply.text, reply.follow_up.clone());
        self.speak(&reply).await;
        Ok(reply)
    }

    /// Low-confidence path: no dispatch, one clarifying question.
    async fn clarify_uncertain(
        &self,
        state: &mut ConversationState,
        text: &str,
        confidence: f32,
    ) -> Reply {
        state.uncertain_streak += 1;
        if state.uncertain_streak >= UNCERTAIN_WARN_STREAK {
            warn!(
                session = %state.session_id,
                streak = state.uncertain_streak,
                "repeated low-confidence classification"
            );
        } else {
            let err = WayfarerError::Classification { confidence };
            debug!(session = %state.session_id, "{err}");
        }

        let reply = Reply {
            text: "I didn't quite catch what you'd like me to do. Could you say it \
                   another way?"
                .to_string(),
            audio: AudioItemRequest {
                kind: crate::audio::AudioKind::Narration,
                urgency: crate::audio::Urgency::Medium,
            },
            follow_up: vec![FollowUpAction::AwaitClarification],
        };
        state.push_user(text);
        state.push_agent(&reply.text, reply.follow_up.clone());
        self.speak(&reply).await;
        reply
    }

    /// TTS then audio submission. A TTS hiccup downgrades to a pending-text
    /// payload so the sink can synthesize on its side of the boundary.
    async fn speak(&self, reply: &Reply) {
        let payload = match self.speech.synthesize(&reply.text, &self.voice).await {
            Ok(handle) => AudioPayload::Handle(handle),
            Err(err) => {
                debug!(error = %err, "speech synthesis unavailable, submitting pending text");
                AudioPayload::PendingText(reply.text.clone())
            }
        };
        let item = AudioItem::new(reply.audio.kind, reply.audio.urgency, payload);
        self.focus.submit(&self.channel, item).await;
    }
}
