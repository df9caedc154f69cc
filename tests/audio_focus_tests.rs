use wayfarer::audio::{
    AudioFocus, AudioItem, AudioKind, AudioPayload, ChannelMachine, DirectiveAction,
    PlaybackState, Urgency,
};

fn narration(urgency: Urgency) -> AudioItem {
    AudioItem::narration("story segment", urgency)
}

fn guidance(urgency: Urgency) -> AudioItem {
    AudioItem::navigation("turn left", urgency)
}

fn ambient(urgency: Urgency) -> AudioItem {
    AudioItem::new(AudioKind::Ambient, urgency, AudioPayload::Handle("amb".to_string()))
}

fn assert_single_playing(machine: &ChannelMachine) {
    assert!(
        machine.registry().playing_count() <= 1,
        "at most one item may be PLAYING per channel"
    );
    if machine.registry().ducked_count() > 0 {
        assert_eq!(
            machine.registry().playing_count(),
            1,
            "a DUCKED item requires exactly one PLAYING item"
        );
        assert_eq!(machine.registry().ducked_count(), 1, "at most one active ducker");
    }
}

#[test]
fn idle_submission_starts_playback() {
    let mut machine = ChannelMachine::new();
    let item = narration(Urgency::Medium);
    let id = item.id;

    let directives = machine.submit(item);

    assert_eq!(directives.len(), 1);
    assert_eq!(directives[0].action, DirectiveAction::Start);
    assert_eq!(directives[0].target, id);
    assert_eq!(machine.registry().state_of(id), Some(PlaybackState::Playing));
}

#[test]
fn critical_interrupts_narration_then_resumes_it() {
    let mut machine = ChannelMachine::new();
    let n1 = narration(Urgency::Medium);
    let n1_id = n1.id;
    machine.submit(n1);
    machine.record_position(n1_id, 4_200);

    let g1 = guidance(Urgency::Critical);
    let g1_id = g1.id;
    let directives = machine.submit(g1);

    assert_eq!(directives[0].action, DirectiveAction::InterruptAll);
    assert_eq!(directives[0].target, n1_id);
    assert_eq!(directives[1].action, DirectiveAction::Start);
    assert_eq!(directives[1].target, g1_id);
    assert_eq!(
        machine.registry().state_of(n1_id),
        Some(PlaybackState::Paused),
        "preempted narration must be bookmarked, not ducked or dropped"
    );
    assert_eq!(machine.registry().state_of(g1_id), Some(PlaybackState::Playing));
    assert_single_playing(&machine);

    let directives = machine.complete(g1_id);
    assert_eq!(directives.len(), 1);
    assert_eq!(directives[0].action, DirectiveAction::Resume);
    assert_eq!(directives[0].target, n1_id, "resume must restore the same item id");
    assert!(directives[0].fade_ms > 0, "resume comes back with a fade-in");
    assert_eq!(machine.registry().state_of(n1_id), Some(PlaybackState::Playing));
    assert_eq!(
        machine.registry().position(n1_id),
        4_200,
        "playback position must survive the interruption"
    );
}

#[test]
fn critical_cancels_stale_guidance_outright() {
    let mut machine = ChannelMachine::new();
    let old = guidance(Urgency::Medium);
    let old_id = old.id;
    machine.submit(old);

    let fresh = guidance(Urgency::Critical);
    machine.submit(fresh);

    assert_eq!(
        machine.registry().state_of(old_id),
        Some(PlaybackState::Cancelled),
        "superseded guidance is dropped, not parked for resume"
    );
}

#[test]
fn high_pauses_and_medium_ducks() {
    let mut machine = ChannelMachine::new();
    let n1 = narration(Urgency::Medium);
    let n1_id = n1.id;
    machine.submit(n1);

    let mid = guidance(Urgency::Medium);
    let directives = machine.submit(mid);
    assert_eq!(directives[0].action, DirectiveAction::DuckCurrent);
    assert_eq!(directives[0].fade_ms, 250);
    assert_eq!(machine.registry().state_of(n1_id), Some(PlaybackState::Ducked));
    assert_single_playing(&machine);

    let high = guidance(Urgency::High);
    let directives = machine.submit(high);
    assert_eq!(directives[0].action, DirectiveAction::PauseCurrent);
    assert_eq!(
        machine.registry().state_of(n1_id),
        Some(PlaybackState::Paused),
        "losing its ducker demotes a ducked item to paused"
    );
    assert_single_playing(&machine);
}

#[test]
fn low_waits_for_gap_and_promotes_on_idle() {
    let mut machine = ChannelMachine::new();
    let n1 = narration(Urgency::Medium);
    let n1_id = n1.id;
    machine.submit(n1);

    let low = ambient(Urgency::Low);
    let low_id = low.id;
    let directives = machine.submit(low);
    assert_eq!(directives.len(), 1);
    assert_eq!(directives[0].action, DirectiveAction::WaitForGap);
    assert_eq!(machine.registry().state_of(low_id), Some(PlaybackState::Queued));

    let directives = machine.complete(n1_id);
    assert_eq!(directives[0].action, DirectiveAction::Start);
    assert_eq!(directives[0].target, low_id);
    assert_eq!(machine.registry().state_of(low_id), Some(PlaybackState::Playing));
}

#[test]
fn gap_signal_slots_queued_item_into_the_story() {
    let mut machine = ChannelMachine::new();
    let n1 = narration(Urgency::Medium);
    let n1_id = n1.id;
    machine.submit(n1);
    let low = ambient(Urgency::Low);
    let low_id = low.id;
    machine.submit(low);

    let directives = machine.signal_gap();
    assert_eq!(directives[0].action, DirectiveAction::PauseCurrent);
    assert_eq!(directives[0].target, n1_id);
    assert_eq!(directives[1].action, DirectiveAction::Start);
    assert_eq!(directives[1].target, low_id);

    let directives = machine.complete(low_id);
    assert_eq!(directives[0].action, DirectiveAction::Resume);
    assert_eq!(directives[0].target, n1_id, "story resumes after the gap filler");
}

#[test]
fn gap_signal_without_queue_is_a_no_op() {
    let mut machine = ChannelMachine::new();
    let n1 = narration(Urgency::Medium);
    machine.submit(n1);
    assert!(machine.signal_gap().is_empty());
}

#[test]
fn suspension_stack_resumes_most_recent_first() {
    let mut machine = ChannelMachine::new();
    let a = narration(Urgency::Medium);
    let a_id = a.id;
    machine.submit(a);
    let b = narration(Urgency::Medium);
    let b_id = b.id;
    machine.submit(b);
    let c = guidance(Urgency::Medium);
    let c_id = c.id;
    machine.submit(c);

    assert_eq!(machine.registry().state_of(a_id), Some(PlaybackState::Paused));
    assert_eq!(machine.registry().state_of(b_id), Some(PlaybackState::Ducked));
    assert_eq!(machine.registry().state_of(c_id), Some(PlaybackState::Playing));
    assert_single_playing(&machine);

    let directives = machine.complete(c_id);
    assert_eq!(directives[0].action, DirectiveAction::Resume);
    assert_eq!(directives[0].target, b_id, "most recently suspended resumes first");

    let directives = machine.complete(b_id);
    assert_eq!(directives[0].target, a_id);
    assert_eq!(machine.registry().state_of(a_id), Some(PlaybackState::Playing));
}

#[test]
fn cancel_queued_item_is_silent() {
    let mut machine = ChannelMachine::new();
    machine.submit(narration(Urgency::Medium));
    let low = ambient(Urgency::Low);
    let low_id = low.id;
    machine.submit(low);

    let directives = machine.cancel(low_id);
    assert!(directives.is_empty(), "cancelling a queued item needs no sink action");
    assert_eq!(machine.registry().state_of(low_id), Some(PlaybackState::Cancelled));
}

#[test]
fn cancel_playing_item_resolves_to_suspended() {
    let mut machine = ChannelMachine::new();
    let n1 = narration(Urgency::Medium);
    let n1_id = n1.id;
    machine.submit(n1);
    let g1 = guidance(Urgency::High);
    let g1_id = g1.id;
    machine.submit(g1);

    let directives = machine.cancel(g1_id);
    assert_eq!(directives[0].action, DirectiveAction::InterruptAll);
    assert_eq!(directives[0].target, g1_id);
    assert_eq!(directives[1].action, DirectiveAction::Resume);
    assert_eq!(directives[1].target, n1_id);
    assert_eq!(machine.registry().state_of(g1_id), Some(PlaybackState::Cancelled));
}

#[test]
fn equal_urgency_batch_leaves_navigation_audible() {
    let mut machine = ChannelMachine::new();
    let story = narration(Urgency::Medium);
    let story_id = story.id;
    let turn = guidance(Urgency::Medium);
    let turn_id = turn.id;

    machine.submit_batch(vec![turn, story]);

    assert_eq!(
        machine.registry().state_of(turn_id),
        Some(PlaybackState::Playing),
        "navigation wins equal-urgency ties"
    );
    assert_eq!(machine.registry().state_of(story_id), Some(PlaybackState::Ducked));
    assert_single_playing(&machine);
}

#[test]
fn mixed_urgency_batch_leaves_critical_on_top() {
    let mut machine = ChannelMachine::new();
    let story = narration(Urgency::Medium);
    let story_id = story.id;
    let turn = guidance(Urgency::Critical);
    let turn_id = turn.id;

    machine.submit_batch(vec![story, turn]);

    assert_eq!(machine.registry().state_of(turn_id), Some(PlaybackState::Playing));
    assert_eq!(
        machine.registry().state_of(story_id),
        Some(PlaybackState::Paused),
        "critical submission must never leave the other item at full volume or ducked"
    );
    assert_single_playing(&machine);
}

#[test]
fn single_playing_invariant_holds_across_a_busy_session() {
    let mut machine = ChannelMachine::new();
    let mut live = Vec::new();

    let script: Vec<AudioItem> = vec![
        narration(Urgency::Medium),
        ambient(Urgency::Low),
        guidance(Urgency::Medium),
        guidance(Urgency::Critical),
        narration(Urgency::Low),
        guidance(Urgency::High),
    ];
    for item in script {
        live.push(item.id);
        machine.submit(item);
        assert_single_playing(&machine);
    }
    for id in live {
        machine.complete(id);
        assert_single_playing(&machine);
    }
}

#[tokio::test]
async fn focus_publishes_directives_to_subscribers() {
    let focus = AudioFocus::new();
    let mut events = focus.subscribe();

    let item = narration(Urgency::Medium);
    let id = item.id;
    focus.submit("cabin", item).await;

    let event = events.recv().await.expect("directive event");
    assert_eq!(event.channel, "cabin");
    assert_eq!(event.directive.action, DirectiveAction::Start);
    assert_eq!(event.directive.target, id);
    assert!(event.payload.is_some(), "sink needs the payload to start playback");
}

#[tokio::test]
async fn sink_failure_resets_channel_and_promotes_queue() {
    let focus = AudioFocus::new();
    let n1 = narration(Urgency::Medium);
    let n1_id = n1.id;
    let directives = focus.submit("cabin", n1).await;
    let low = ambient(Urgency::Low);
    let low_id = low.id;
    focus.submit("cabin", low).await;

    let resolved = focus.directive_failed("cabin", directives[0]).await;

    assert_eq!(
        focus.state_of("cabin", n1_id).await,
        Some(PlaybackState::Cancelled),
        "failed playback is dropped, never retried"
    );
    assert_eq!(resolved[0].action, DirectiveAction::Start);
    assert_eq!(resolved[0].target, low_id);
}

#[tokio::test]
async fn channels_are_independent() {
    let focus = AudioFocus::new();
    let driver = narration(Urgency::Medium);
    let driver_id = driver.id;
    let rear = narration(Urgency::Medium);
    let rear_id = rear.id;

    focus.submit("front", driver).await;
    focus.submit("rear", rear).await;

    assert_eq!(focus.state_of("front", driver_id).await, Some(PlaybackState::Playing));
    assert_eq!(focus.state_of("rear", rear_id).await, Some(PlaybackState::Playing));
}
