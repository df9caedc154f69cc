use serde::{Deserialize, Serialize};

use crate::audio::Urgency;
use crate::error::WayfarerError;

/// Closed set of domain handlers this core can dispatch to. Routing is
/// validated against this set at intent construction, never resolved by
/// name lookup at dispatch time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandlerName {
    Story,
    Booking,
    NavigationInfo,
    LocalExpert,
}

impl HandlerName {
    pub const ALL: [HandlerName; 4] = [
        HandlerName::Story,
        HandlerName::Booking,
        HandlerName::NavigationInfo,
        HandlerName::LocalExpert,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HandlerName::Story => "story",
            HandlerName::Booking => "booking",
            HandlerName::NavigationInfo => "navigation-info",
            HandlerName::LocalExpert => "local-expert",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IntentKind {
    TripPlanning,
    Booking,
    NavigationQuery,
    LocalInfo,
    Story,
    Safety,
    SmallTalk,
}

impl IntentKind {
    /// Which handlers an intent of this kind may route to.
    pub fn capabilities(&self) -> &'static [HandlerName] {
        match self {
            IntentKind::TripPlanning => &[HandlerName::NavigationInfo, HandlerName::LocalExpert],
            IntentKind::Booking => &[HandlerName::Booking, HandlerName::LocalExpert],
            IntentKind::NavigationQuery => &[HandlerName::NavigationInfo],
            IntentKind::LocalInfo => &[HandlerName::LocalExpert],
            IntentKind::Story => &[HandlerName::Story],
            IntentKind::Safety => &[HandlerName::NavigationInfo],
            IntentKind::SmallTalk => &[],
        }
    }

    /// Topic label recorded in conversation state.
    pub fn topic(&self) -> &'static str {
        match self {
            IntentKind::TripPlanning => "trip planning",
            IntentKind::Booking => "booking",
            IntentKind::NavigationQuery => "navigation",
            IntentKind::LocalInfo => "local info",
            IntentKind::Story => "stories",
            IntentKind::Safety => "safety",
            IntentKind::SmallTalk => "chat",
        }
    }
}

/// One turn's routing decision. Lives for exactly one turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Intent {
    pub primary: IntentKind,
    pub required: Vec<HandlerName>,
    pub urgency: Urgency,
}

impl Intent {
    /// Canonical intent for a kind: full capability set, default urgency.
    /// Safety is the one kind that speaks at CRITICAL.
    pub fn of(kind: IntentKind) -> Self {
        let urgency = match kind {
            IntentKind::Safety => Urgency::Critical,
            _ => Urgency::Medium,
        };
        Self { primary: kind, required: kind.capabilities().to_vec(), urgency }
    }

    /// Narrowed handler set, rejected when a handler falls outside the
    /// kind's capability set.
    pub fn with_handlers(
        kind: IntentKind,
        required: Vec<HandlerName>,
        urgency: Urgency,
    ) -> Result<Self, WayfarerError> {
        for h in &required {
            if !kind.capabilities().contains(h) {
                return Err(WayfarerError::InvalidRouting {
                    kind: format!("{kind:?}"),
                    handler: h.as_str(),
                });
            }
        }
        Ok(Self { primary: kind, required, urgency })
    }
}

/// Classifier output: the intent plus how sure the classifier is. Low
/// confidence routes to clarification, not to dispatch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedIntent {
    pub intent: Intent,
    pub confidence: f32,
}
