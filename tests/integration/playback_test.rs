//! End-to-end playback behavior of `StoryViewer` driven by a manual clock

use super::helpers::{run_clock, story_set, subject, viewer, viewer_with_sink, Painted};
use storyplay::player::{
    AdvanceOutcome, Clock, CloseReason, Direction, ReactionReceipt, SessionId, SessionStatus,
    TickResult,
};
use storyplay::provider::MemoryProvider;
use storyplay::reaction::{ReactionError, ReactionKind, ReactionSink};
use storyplay::story::{ItemId, StorySet};
use storyplay::OpenError;

fn provider(sets: Vec<StorySet>) -> MemoryProvider {
    sets.into_iter()
        .fold(MemoryProvider::new(), |provider, set| provider.with_set(set))
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn auto_advance_shows_each_item_then_closes() {
    let (mut viewer, clock) = viewer(provider(vec![story_set(
        "alice",
        &[("A", 500), ("B", 300)],
    )]));

    viewer.open(&subject("alice")).unwrap();
    run_clock(&mut viewer, &clock, 2_000, 50);

    let renderer = viewer.renderer();
    assert_eq!(
        renderer.item_starts(),
        vec![(0, "A".to_string()), (500, "B".to_string())]
    );
    let closes: Vec<_> = renderer
        .painted
        .iter()
        .filter_map(|p| match p {
            Painted::Closed { at, summary } => Some((*at, summary.reason)),
            _ => None,
        })
        .collect();
    assert_eq!(closes, vec![(800, CloseReason::Exhausted)]);
    assert_eq!(viewer.status(), Some(SessionStatus::Closed));
    assert_eq!(viewer.live_timers(), 0);
}

#[test]
fn manual_next_past_the_end_closes_without_waiting() {
    let (mut viewer, clock) = viewer(provider(vec![story_set(
        "alice",
        &[("A", 500), ("B", 300)],
    )]));

    viewer.open(&subject("alice")).unwrap();
    assert_eq!(
        viewer.advance(Direction::Next),
        AdvanceOutcome::Moved { cursor: 1 }
    );
    assert_eq!(viewer.advance(Direction::Next), AdvanceOutcome::Closed);
    assert_eq!(clock.now_ms(), 0);

    let painted_at_close = viewer.renderer().painted.len();
    run_clock(&mut viewer, &clock, 3_000, 100);

    // A, B, close and nothing afterwards
    assert_eq!(painted_at_close, 3);
    assert_eq!(viewer.renderer().painted.len(), 3);
    assert_eq!(viewer.renderer().closes().len(), 1);
}

#[test]
fn fetch_failure_opens_nothing() {
    let mut sets = provider(vec![]);
    sets.fail_subject(subject("alice"), "backend down");
    let (mut viewer, clock) = viewer(sets);

    let err = viewer.open(&subject("alice")).unwrap_err();
    assert!(matches!(err, OpenError::FetchFailed { .. }));
    assert!(err.to_string().contains("backend down"));

    run_clock(&mut viewer, &clock, 1_000, 100);
    assert!(viewer.renderer().painted.is_empty());
    assert!(viewer.session().is_none());
    assert_eq!(viewer.scheduler_stats().armed, 0);
}

#[test]
fn empty_set_opens_nothing() {
    let (mut viewer, _clock) = viewer(provider(vec![story_set("alice", &[])]));

    let err = viewer.open(&subject("alice")).unwrap_err();
    assert!(matches!(err, OpenError::EmptySet { .. }));
    assert_eq!(err.subject(), &subject("alice"));
    assert!(viewer.session().is_none());
    assert_eq!(viewer.live_timers(), 0);
    assert!(viewer.next_wakeup().is_none());
}

#[test]
fn unknown_subject_is_a_fetch_failure() {
    let (mut viewer, _clock) = viewer(provider(vec![]));
    assert!(matches!(
        viewer.open(&subject("ghost")),
        Err(OpenError::FetchFailed { .. })
    ));
}

// ============================================================================
// Navigation
// ============================================================================

#[test]
fn previous_on_first_item_keeps_the_running_timer() {
    let (mut viewer, clock) = viewer(provider(vec![story_set(
        "alice",
        &[("A", 500), ("B", 300)],
    )]));
    viewer.open(&subject("alice")).unwrap();
    clock.set(200);

    let timer = viewer.session().unwrap().timer();
    let armed = viewer.scheduler_stats().armed;

    assert_eq!(viewer.advance(Direction::Previous), AdvanceOutcome::Unchanged);
    assert_eq!(viewer.session().unwrap().timer(), timer);
    assert_eq!(viewer.scheduler_stats().armed, armed);

    // Still advances at A's original deadline
    run_clock(&mut viewer, &clock, 500, 100);
    assert_eq!(viewer.session().unwrap().cursor(), 1);
}

#[test]
fn previous_restarts_the_earlier_item() {
    let (mut viewer, clock) = viewer(provider(vec![story_set(
        "alice",
        &[("A", 500), ("B", 300)],
    )]));
    viewer.open(&subject("alice")).unwrap();

    clock.set(100);
    viewer.advance(Direction::Next);
    clock.set(250);
    assert_eq!(
        viewer.advance(Direction::Previous),
        AdvanceOutcome::Moved { cursor: 0 }
    );

    // A gets its full 500ms again from 250
    run_clock(&mut viewer, &clock, 749, 1);
    assert_eq!(viewer.session().unwrap().cursor(), 0);
    run_clock(&mut viewer, &clock, 750, 1);
    assert_eq!(viewer.session().unwrap().cursor(), 1);
}

#[test]
fn manual_advance_at_the_deadline_does_not_double_advance() {
    let (mut viewer, clock) = viewer(provider(vec![story_set(
        "alice",
        &[("A", 500), ("B", 300), ("C", 300)],
    )]));
    viewer.open(&subject("alice")).unwrap();

    // A's timer is due but not yet polled when the viewer taps Next
    clock.set(500);
    assert_eq!(
        viewer.advance(Direction::Next),
        AdvanceOutcome::Moved { cursor: 1 }
    );
    assert_ne!(viewer.tick(), TickResult::Advanced(AdvanceOutcome::Moved { cursor: 2 }));
    assert_eq!(viewer.session().unwrap().cursor(), 1);

    // B runs its full duration from the manual advance
    run_clock(&mut viewer, &clock, 799, 1);
    assert_eq!(viewer.session().unwrap().cursor(), 1);
    run_clock(&mut viewer, &clock, 800, 1);
    assert_eq!(viewer.session().unwrap().cursor(), 2);
}

#[test]
fn stepping_through_every_item_closes_exactly_once() {
    let items = [("1", 100), ("2", 100), ("3", 100), ("4", 100)];
    let (mut viewer, _clock) = viewer(provider(vec![story_set("alice", &items)]));
    viewer.open(&subject("alice")).unwrap();

    for _ in 0..items.len() {
        viewer.advance(Direction::Next);
    }

    assert_eq!(viewer.status(), Some(SessionStatus::Closed));
    let closes = viewer.renderer().closes();
    assert_eq!(closes.len(), 1);
    assert_eq!(closes[0].items_viewed, 4);
    assert_eq!(closes[0].total_items, 4);
}

#[test]
fn summary_counts_distinct_items_seen() {
    let (mut viewer, _clock) = viewer(provider(vec![story_set(
        "alice",
        &[("A", 100), ("B", 100), ("C", 100), ("D", 100)],
    )]));
    viewer.open(&subject("alice")).unwrap();

    viewer.advance(Direction::Next);
    viewer.advance(Direction::Next);
    viewer.advance(Direction::Previous);
    viewer.advance(Direction::Previous);
    assert!(viewer.close());

    let summary = viewer.last_summary().unwrap();
    assert_eq!(summary.reason, CloseReason::Dismissed);
    assert_eq!(summary.items_viewed, 3);
    assert_eq!(summary.total_items, 4);
}

// ============================================================================
// Closed sessions
// ============================================================================

#[test]
fn closed_session_ignores_everything() {
    let (mut viewer, clock) = viewer(provider(vec![story_set(
        "alice",
        &[("A", 500), ("B", 300)],
    )]));
    viewer.open(&subject("alice")).unwrap();
    assert!(viewer.close());

    assert!(!viewer.close());
    assert!(!viewer.interrupt());
    assert_eq!(viewer.advance(Direction::Next), AdvanceOutcome::Inactive);
    assert_eq!(viewer.advance(Direction::Previous), AdvanceOutcome::Inactive);
    assert!(matches!(
        viewer.react_to(ReactionKind::Heart),
        ReactionReceipt::Ignored
    ));
    assert!(!viewer.pause());
    assert!(!viewer.resume());

    run_clock(&mut viewer, &clock, 2_000, 100);
    assert_eq!(viewer.renderer().closes().len(), 1);
    assert_eq!(viewer.renderer().painted.len(), 2);
    assert_eq!(viewer.live_timers(), 0);
}

#[test]
fn opening_again_replaces_the_playing_session() {
    let (mut viewer, clock) = viewer(provider(vec![
        story_set("alice", &[("A", 500)]),
        story_set("bob", &[("B1", 300), ("B2", 300)]),
    ]));
    let first = viewer.open(&subject("alice")).unwrap();
    clock.set(100);
    let second = viewer.open(&subject("bob")).unwrap();

    assert_ne!(first.id, second.id);
    assert_eq!(second.item_count, 2);

    let closes = viewer.renderer().closes();
    assert_eq!(closes.len(), 1);
    assert_eq!(closes[0].session, first.id);
    assert_eq!(closes[0].reason, CloseReason::Replaced);
    assert_eq!(viewer.live_timers(), 1);

    // Alice's deadline passes without touching bob's session
    run_clock(&mut viewer, &clock, 500, 50);
    assert_eq!(viewer.session().unwrap().id(), second.id);
    assert_eq!(viewer.session().unwrap().cursor(), 1);
}

#[test]
fn failed_open_leaves_the_current_session_playing() {
    let (mut viewer, clock) = viewer(provider(vec![
        story_set("alice", &[("A", 500), ("B", 500)]),
        story_set("empty", &[]),
    ]));
    let handle = viewer.open(&subject("alice")).unwrap();
    let timer = viewer.session().unwrap().timer();

    assert!(viewer.open(&subject("empty")).is_err());
    assert!(viewer.open(&subject("ghost")).is_err());

    assert!(viewer.is_playing());
    assert_eq!(viewer.session().unwrap().id(), handle.id);
    assert_eq!(viewer.session().unwrap().timer(), timer);
    assert!(viewer.renderer().closes().is_empty());

    run_clock(&mut viewer, &clock, 500, 100);
    assert_eq!(viewer.session().unwrap().cursor(), 1);
}

#[test]
fn session_ids_increase_per_open() {
    let (mut viewer, _clock) = viewer(provider(vec![story_set("alice", &[("A", 100)])]));
    let a = viewer.open(&subject("alice")).unwrap();
    let b = viewer.open(&subject("alice")).unwrap();
    assert_eq!(a.id, SessionId::new(1));
    assert_eq!(b.id, SessionId::new(2));
}

// ============================================================================
// Timer invariant
// ============================================================================

/// Small deterministic generator so the sequence is reproducible.
struct Lcg(u64);

impl Lcg {
    fn next(&mut self, bound: u64) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        (self.0 >> 33) % bound
    }
}

#[test]
fn at_most_one_timer_is_outstanding_under_any_interleaving() {
    for seed in 0..20 {
        let (mut viewer, clock) = viewer(provider(vec![
            story_set("alice", &[("A", 300), ("B", 200), ("C", 400)]),
            story_set("bob", &[("X", 250)]),
        ]));
        let mut rng = Lcg(seed);

        for _ in 0..300 {
            match rng.next(9) {
                0 => {
                    let _ = viewer.open(&subject(if rng.next(2) == 0 { "alice" } else { "bob" }));
                }
                1 => {
                    viewer.advance(Direction::Next);
                }
                2 => {
                    viewer.advance(Direction::Previous);
                }
                3 => {
                    viewer.close();
                }
                4 => {
                    viewer.toggle_pause();
                }
                5 => {
                    viewer.react_to(ReactionKind::Fire);
                }
                _ => {
                    clock.advance(rng.next(200));
                    viewer.tick();
                }
            }

            let stats = viewer.scheduler_stats();
            assert!(stats.outstanding() <= 1, "seed {}: {:?}", seed, stats);
            assert_eq!(stats.outstanding() as usize, viewer.live_timers());

            let should_have_timer = viewer.is_playing() && !viewer.is_paused();
            assert_eq!(
                viewer.live_timers() == 1,
                should_have_timer,
                "seed {}: playing={} paused={}",
                seed,
                viewer.is_playing(),
                viewer.is_paused()
            );
        }

        // Each session closes at most once
        let mut closed: Vec<SessionId> = viewer
            .renderer()
            .closes()
            .iter()
            .map(|s| s.session)
            .collect();
        let total = closed.len();
        closed.dedup();
        assert_eq!(closed.len(), total, "seed {}", seed);
    }
}

// ============================================================================
// Pause and reactions
// ============================================================================

#[test]
fn pause_holds_the_item_and_resume_keeps_remaining_time() {
    let (mut viewer, clock) = viewer(provider(vec![story_set(
        "alice",
        &[("A", 1_000), ("B", 1_000)],
    )]));
    viewer.open(&subject("alice")).unwrap();

    run_clock(&mut viewer, &clock, 400, 100);
    assert!(viewer.pause());
    assert_eq!(viewer.live_timers(), 0);
    assert!(viewer.next_wakeup().is_none());

    run_clock(&mut viewer, &clock, 5_000, 250);
    assert_eq!(viewer.session().unwrap().cursor(), 0);

    assert!(viewer.resume());
    run_clock(&mut viewer, &clock, 5_599, 1);
    assert_eq!(viewer.session().unwrap().cursor(), 0);
    run_clock(&mut viewer, &clock, 5_600, 1);
    assert_eq!(viewer.session().unwrap().cursor(), 1);

    let paused_frames = viewer
        .renderer()
        .painted
        .iter()
        .filter(|p| matches!(p, Painted::Frame { paused: true, .. }))
        .count();
    assert_eq!(paused_frames, 1);
}

#[test]
fn progress_fraction_never_decreases_within_an_item() {
    let (mut viewer, clock) = viewer(provider(vec![story_set("alice", &[("A", 1_000)])]));
    viewer.open(&subject("alice")).unwrap();

    run_clock(&mut viewer, &clock, 300, 100);
    viewer.pause();
    run_clock(&mut viewer, &clock, 900, 100);
    viewer.resume();
    run_clock(&mut viewer, &clock, 1_500, 100);

    let fractions: Vec<f64> = viewer
        .renderer()
        .painted
        .iter()
        .filter_map(|p| match p {
            Painted::Frame { fraction, .. } => Some(*fraction),
            _ => None,
        })
        .collect();
    assert!(fractions.len() > 3);
    assert!(fractions.windows(2).all(|w| w[0] <= w[1]), "{:?}", fractions);
    assert!(fractions.iter().all(|f| (0.0..=1.0).contains(f)));
}

struct RejectingSink;

impl ReactionSink for RejectingSink {
    fn record_reaction(
        &self,
        _session: SessionId,
        _item: &ItemId,
        _kind: ReactionKind,
    ) -> Result<(), ReactionError> {
        Err(ReactionError::Rejected("rate limited".to_string()))
    }
}

#[test]
fn reaction_failure_does_not_disturb_playback() {
    let (mut viewer, clock) = viewer_with_sink(
        provider(vec![story_set("alice", &[("A", 500), ("B", 500)])]),
        RejectingSink,
    );
    viewer.open(&subject("alice")).unwrap();
    clock.set(200);
    let timer = viewer.session().unwrap().timer();

    match viewer.react_to(ReactionKind::Heart) {
        ReactionReceipt::Failed(e) => assert!(e.to_string().contains("rate limited")),
        other => panic!("expected failure, got {:?}", other),
    }

    assert!(viewer.is_playing());
    assert_eq!(viewer.session().unwrap().cursor(), 0);
    assert_eq!(viewer.session().unwrap().timer(), timer);

    run_clock(&mut viewer, &clock, 500, 100);
    assert_eq!(viewer.session().unwrap().cursor(), 1);
}
