use crate::playout::config::PlayoutThresholds;
use crate::playout::scheduler::*;

fn scheduler() -> DropScheduler {
    DropScheduler::new(PlayoutThresholds::default())
}

#[test]
fn test_steady_state_never_drops() {
    let mut s = scheduler();
    for _ in 0..100 {
        assert_eq!(s.decide(3), PlayoutDecision::Enqueue);
    }
    let state = s.state();
    assert_eq!(state.pending_drops, 0);
    assert_eq!(state.pending_hard_drops, 0);
    assert_eq!(state.sample_index, 100);
}

#[test]
fn test_hard_burst_scheduled_above_limit() {
    let mut s = scheduler();

    assert_eq!(s.decide(25), PlayoutDecision::HardDrop);
    // 25 - 2 scheduled, one consumed by this frame
    assert_eq!(s.state().pending_hard_drops, 22);
    assert_eq!(s.hard_bursts(), 1);
}

#[test]
fn test_exactly_at_limit_is_graceful() {
    let mut s = scheduler();

    // 20 is not above the stop-the-world limit
    assert_eq!(s.decide(20), PlayoutDecision::Enqueue);
    assert_eq!(s.state().pending_hard_drops, 0);
    assert_eq!(s.state().pending_drops, 18);
}

#[test]
fn test_hard_drops_take_priority() {
    let mut s = scheduler();

    // Build up a soft budget and advance to just before a soft-drop slot
    for _ in 0..31 {
        s.decide(6);
    }
    assert_eq!(s.state().pending_drops, 4);

    // Index 32 would be a soft drop, but the burst wins
    assert_eq!(s.decide(30), PlayoutDecision::HardDrop);
    assert_eq!(s.state().pending_drops, 4);
    assert_eq!(s.state().pending_hard_drops, 27);
}

#[test]
fn test_burst_runs_back_to_back() {
    let mut s = scheduler();

    let mut backlog = 25;
    let mut dropped = 0;
    while s.decide(backlog) == PlayoutDecision::HardDrop {
        dropped += 1;
        backlog -= 1;
    }
    assert_eq!(dropped, 23);
    assert_eq!(backlog, 2);
}

#[test]
fn test_recovery_clears_both_counters() {
    let mut s = scheduler();
    s.decide(40);
    for _ in 0..5 {
        s.decide(12);
    }
    assert!(s.state().pending_hard_drops > 0);

    assert_eq!(s.decide(2), PlayoutDecision::Enqueue);
    assert_eq!(s.state().pending_hard_drops, 0);
    assert_eq!(s.state().pending_drops, 0);
}

#[test]
fn test_backlog_below_pending_hard_drops_does_not_underflow() {
    let mut s = scheduler();
    s.decide(50); // 48 scheduled, 47 left

    // Backlog estimate collapses faster than the burst
    assert_eq!(s.decide(10), PlayoutDecision::HardDrop);
    assert_eq!(s.state().pending_hard_drops, 46);
}

#[test]
fn test_soft_drops_only_on_ratio_boundary() {
    let mut s = scheduler();

    for i in 1..=128u64 {
        let decision = s.decide(6);
        if decision == PlayoutDecision::SoftDrop {
            assert_eq!(i % 32, 0, "soft drop at index {i}");
        } else {
            assert_eq!(decision, PlayoutDecision::Enqueue);
        }
    }
}

#[test]
fn test_existing_soft_budget_not_superseded() {
    let mut s = scheduler();
    s.decide(9); // budget 7
    assert_eq!(s.state().pending_drops, 7);

    // Smaller backlog whose excess over the budget is within MAX
    s.decide(8);
    assert_eq!(s.state().pending_drops, 7);

    // Backlog grows past budget + MAX: budget is replaced
    s.decide(12);
    assert_eq!(s.state().pending_drops, 10);
}

#[test]
fn test_zero_denominator_never_soft_drops() {
    let mut s = DropScheduler::new(PlayoutThresholds::default().drop_ratio_denom(0));
    for _ in 0..64 {
        assert_eq!(s.decide(6), PlayoutDecision::Enqueue);
    }
}

#[test]
fn test_reset() {
    let mut s = scheduler();
    s.decide(30);
    s.reset();
    assert_eq!(s.state(), DropState::default());
    assert_eq!(s.hard_bursts(), 0);
}

#[test]
fn test_decision_is_drop() {
    assert!(PlayoutDecision::HardDrop.is_drop());
    assert!(PlayoutDecision::SoftDrop.is_drop());
    assert!(!PlayoutDecision::Enqueue.is_drop());
}
