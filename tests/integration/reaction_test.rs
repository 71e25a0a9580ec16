//! Reactions recorded through a viewer into a JSONL log

use std::fs;

use tempfile::TempDir;

use storyplay::player::{Direction, ReactionReceipt};
use storyplay::provider::MemoryProvider;
use storyplay::reaction::{JsonlReactionSink, ReactionKind};

use super::helpers::{story_set, subject, viewer_with_sink};

#[test]
fn reactions_are_appended_for_the_item_on_screen() {
    let dir = TempDir::new().unwrap();
    let log = dir.path().join("logs").join("reactions.jsonl");
    let (mut viewer, _clock) = viewer_with_sink(
        MemoryProvider::new().with_set(story_set("alice", &[("A", 500), ("B", 500)])),
        JsonlReactionSink::new(&log),
    );

    let handle = viewer.open(&subject("alice")).unwrap();
    assert!(matches!(
        viewer.react_to(ReactionKind::Heart),
        ReactionReceipt::Recorded
    ));
    viewer.advance(Direction::Next);
    assert!(matches!(
        viewer.react_to(ReactionKind::Clap),
        ReactionReceipt::Recorded
    ));

    let records = viewer.sink().read_records().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].item.as_str(), "A");
    assert_eq!(records[0].reaction, ReactionKind::Heart);
    assert_eq!(records[1].item.as_str(), "B");
    assert_eq!(records[1].reaction, ReactionKind::Clap);
    assert!(records.iter().all(|r| r.session == handle.id));

    let raw = fs::read_to_string(&log).unwrap();
    assert_eq!(raw.lines().count(), 2);
    assert!(raw.contains(r#""reaction":"heart""#));
}

#[test]
fn unwritable_log_fails_without_stopping_playback() {
    let dir = TempDir::new().unwrap();
    // A directory where the log file should be
    let log = dir.path().join("taken");
    fs::create_dir(&log).unwrap();

    let (mut viewer, _clock) = viewer_with_sink(
        MemoryProvider::new().with_set(story_set("alice", &[("A", 500), ("B", 500)])),
        JsonlReactionSink::new(&log),
    );
    viewer.open(&subject("alice")).unwrap();

    assert!(matches!(
        viewer.react_to(ReactionKind::Wow),
        ReactionReceipt::Failed(_)
    ));
    assert!(viewer.is_playing());
    assert_eq!(viewer.live_timers(), 1);
}
