use std::time::Duration;

use uuid::Uuid;

use wayfarer::conversation::{ConversationState, FollowUpAction, Speaker};

#[test]
fn turns_append_in_order() {
    let mut state = ConversationState::new(Uuid::new_v4());
    state.push_user("how far to the exit");
    state.push_agent("About two kilometers.", Vec::new());
    state.push_user("and after that?");

    let speakers: Vec<Speaker> = state.messages().map(|m| m.speaker).collect();
    assert_eq!(speakers, vec![Speaker::User, Speaker::Agent, Speaker::User]);

    let recent = state.recent(2);
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[1].text, "and after that?", "recent() keeps newest last");
}

#[test]
fn sliding_window_prunes_old_turns() {
    let mut state = ConversationState::with_window(Uuid::new_v4(), Duration::from_millis(30));
    state.push_user("first thing");
    std::thread::sleep(Duration::from_millis(50));
    state.push_user("second thing");

    state.prune();

    assert_eq!(state.len(), 1, "messages older than the window are dropped");
    assert_eq!(state.recent(1)[0].text, "second thing");
}

#[test]
fn agent_actions_accumulate_as_pending() {
    let mut state = ConversationState::new(Uuid::new_v4());
    state.push_agent(
        "I can read out the number.",
        vec![FollowUpAction::OfferPhoneNumber { venue: "the venue".to_string() }],
    );
    state.push_agent(
        "I'll try again shortly.",
        vec![FollowUpAction::RetryLater { what: "local suggestions".to_string() }],
    );

    let pending = state.take_pending();
    assert_eq!(pending.len(), 2);
    assert!(state.take_pending().is_empty(), "take_pending drains the backlog");
}
