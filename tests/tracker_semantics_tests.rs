//! Aggregation engine semantics
//!
//! Drives the tracker's transitions directly, without timers, and checks
//! the tick-fold contract: one poll interval per name with at least one
//! accepted sample, buffer dropped every tick, table entries never
//! removed, reset clears the tally but not the joined flag.

use charla::tracker::TalkTimeTracker;

fn joined_tracker() -> TalkTimeTracker {
    let mut tracker = TalkTimeTracker::new(500, None);
    tracker.join_meeting();
    tracker
}

#[test]
fn test_multiple_samples_gain_a_single_interval() {
    let mut tracker = joined_tracker();
    tracker.handle_volume("Alice", 5.0);
    tracker.handle_volume("Alice", 40.0);
    tracker.handle_volume("Alice", 2.0);
    let snapshot = tracker.poll_tick();
    assert_eq!(snapshot.get("Alice"), Some(&500));

    // one sample in the next interval gains exactly the same amount
    let mut tracker = joined_tracker();
    tracker.handle_volume("Alice", 1.0);
    assert_eq!(tracker.poll_tick().get("Alice"), Some(&500));
}

#[test]
fn test_reset_then_tick_yields_empty_table() {
    let mut tracker = joined_tracker();
    tracker.participants_updated(&["Alice".to_string(), "Bob".to_string()]);
    tracker.handle_volume("Alice", 10.0);
    tracker.poll_tick();
    tracker.reset();
    assert!(tracker.poll_tick().is_empty());
}

#[test]
fn test_participants_are_never_removed() {
    let mut tracker = joined_tracker();
    tracker.participants_updated(&["Alice".to_string(), "Bob".to_string()]);
    tracker.handle_volume("Bob", 3.0);
    tracker.poll_tick();
    tracker.participants_updated(&["Alice".to_string()]);
    assert_eq!(tracker.talk_times().get("Bob"), Some(&500));
    assert_eq!(tracker.talk_times().get("Alice"), Some(&0));
}

#[test]
fn test_volume_before_join_leaves_no_state() {
    let mut tracker = TalkTimeTracker::new(500, None);
    tracker.handle_volume("Alice", 10.0);
    assert!(tracker.talk_times().is_empty());
    assert!(tracker.poll_tick().is_empty());

    // joining later does not resurrect pre-join samples
    tracker.join_meeting();
    assert!(tracker.poll_tick().is_empty());
}

#[test]
fn test_end_to_end_scenario_mixed_volumes() {
    let mut tracker = joined_tracker();
    tracker.participants_updated(&["Alice".to_string(), "Bob".to_string()]);
    tracker.handle_volume("Alice", 10.0);
    tracker.handle_volume("Alice", 10.0);
    tracker.handle_volume("Bob", 0.0);
    let snapshot = tracker.poll_tick();
    assert_eq!(snapshot.get("Alice"), Some(&500));
    assert_eq!(snapshot.get("Bob"), Some(&0));
}

#[test]
fn test_second_tick_without_events_is_a_no_op() {
    let mut tracker = joined_tracker();
    tracker.handle_volume("Carol", 7.0);
    assert_eq!(tracker.poll_tick().get("Carol"), Some(&500));
    assert_eq!(tracker.poll_tick().get("Carol"), Some(&500));
}

#[test]
fn test_sample_after_tick_counts_toward_next_interval() {
    let mut tracker = joined_tracker();
    tracker.handle_volume("Alice", 4.0);
    tracker.poll_tick();
    // arrives after the buffer clear, lands in the next interval
    tracker.handle_volume("Alice", 4.0);
    assert_eq!(tracker.poll_tick().get("Alice"), Some(&1000));
}

#[test]
fn test_interval_length_follows_configuration() {
    let mut tracker = TalkTimeTracker::new(1000, None);
    tracker.join_meeting();
    tracker.handle_volume("Alice", 1.0);
    assert_eq!(tracker.poll_tick().get("Alice"), Some(&1000));
}
