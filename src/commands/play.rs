//! Play command: open a subject's stories in the terminal.

use std::io;
use std::path::{Path, PathBuf};

use anyhow::Result;
use crossterm::terminal;

use storyplay::player::{
    play_interactive, play_plain, CloseReason, PlainRenderer, SessionSummary, StoryViewer,
    SystemClock, TerminalRenderer,
};
use storyplay::reaction::{JsonlReactionSink, NullReactionSink, ReactionSink};
use storyplay::Config;

use super::{directory_provider, parse_subject};

/// Arguments of `storyplay play`.
#[derive(Debug)]
pub struct PlayArgs {
    pub subject: String,
    pub dir: Option<PathBuf>,
    pub plain: bool,
    pub reactions: Option<PathBuf>,
}

#[cfg(not(tarpaulin_include))]
pub fn handle(args: PlayArgs) -> Result<()> {
    let config = Config::load()?;
    let provider = directory_provider(&config, args.dir)?;
    let subject = parse_subject(args.subject)?;
    let sink = reaction_sink(args.reactions.as_deref().or(config.reactions_log()));
    let interval = config.playback.progress_interval_ms;

    let interactive = !args.plain && atty::is(atty::Stream::Stdout);
    tracing::debug!(%subject, interactive, "starting playback");

    let summary = if interactive {
        let (cols, rows) = terminal::size().unwrap_or((80, 24));
        let renderer = TerminalRenderer::new(io::stdout(), cols, rows);
        let mut viewer = StoryViewer::new(provider, sink, renderer, SystemClock::new())
            .with_progress_interval(interval);
        let summary = play_interactive(&mut viewer, &subject)?;
        println!("{}", summary_line(&summary));
        summary
    } else {
        let renderer = PlainRenderer::new(io::stdout());
        let mut viewer = StoryViewer::new(provider, sink, renderer, SystemClock::new())
            .with_progress_interval(interval);
        play_plain(&mut viewer, &subject)?
    };

    tracing::debug!(session = %summary.session, reason = ?summary.reason, "playback finished");
    Ok(())
}

fn reaction_sink(path: Option<&Path>) -> Box<dyn ReactionSink> {
    match path {
        Some(path) => Box::new(JsonlReactionSink::new(path)),
        None => Box::new(NullReactionSink),
    }
}

/// Line printed after leaving the full-screen player.
pub fn summary_line(summary: &SessionSummary) -> String {
    let how = match summary.reason {
        CloseReason::Exhausted => "watched all stories",
        CloseReason::Dismissed => "closed",
        CloseReason::Replaced => "replaced",
        CloseReason::Interrupted => "interrupted",
    };
    format!(
        "{}: {} (viewed {} of {})",
        summary.subject, how, summary.items_viewed, summary.total_items
    )
}
