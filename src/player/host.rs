//! Event loops that drive a `StoryViewer` from a terminal.
//!
//! The engine is single-threaded and never sleeps on its own. A host waits
//! until `next_wakeup`, or until input arrives, then calls `tick`.

use std::io::{self, Stdout, Write};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    cursor, event,
    event::Event,
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};

use super::clock::{Clock, Millis};
use super::controller::StoryViewer;
use super::input::{handle_event, InputResult};
use super::render::{FrameRenderer, TerminalRenderer};
use super::state::SessionSummary;
use crate::provider::ContentProvider;
use crate::reaction::ReactionSink;
use crate::story::SubjectId;

/// Poll interval while nothing is scheduled (paused item).
const IDLE_POLL_MS: Millis = 250;

/// Raw mode and alternate screen for the lifetime of the guard.
struct TerminalGuard {
    stdout: Stdout,
}

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen, cursor::Hide) {
            let _ = terminal::disable_raw_mode();
            return Err(e);
        }
        Ok(Self { stdout })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(self.stdout, cursor::Show, LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
        let _ = self.stdout.flush();
    }
}

/// Play `subject` full-screen until the viewer closes it or it runs out.
#[cfg(not(tarpaulin_include))]
pub fn play_interactive<P, S, C>(
    viewer: &mut StoryViewer<P, S, TerminalRenderer<Stdout>, C>,
    subject: &SubjectId,
) -> Result<SessionSummary>
where
    P: ContentProvider,
    S: ReactionSink,
    C: Clock,
{
    let _guard = TerminalGuard::enter().context("Failed to set up terminal")?;
    let (cols, rows) = terminal::size().unwrap_or((80, 24));
    viewer.renderer_mut().resize(cols, rows);

    viewer.open(subject)?;

    let result = run_interactive_loop(viewer);
    if viewer.is_playing() {
        viewer.interrupt();
    }
    result?;

    finished_summary(viewer)
}

#[cfg(not(tarpaulin_include))]
fn run_interactive_loop<P, S, C>(
    viewer: &mut StoryViewer<P, S, TerminalRenderer<Stdout>, C>,
) -> Result<()>
where
    P: ContentProvider,
    S: ReactionSink,
    C: Clock,
{
    while viewer.is_playing() {
        let now = viewer.clock().now_ms();
        let timeout = viewer
            .next_wakeup()
            .map_or(IDLE_POLL_MS, |at| at.saturating_sub(now));

        if event::poll(Duration::from_millis(timeout))? {
            let ev = event::read()?;
            if let Event::Resize(cols, rows) = ev {
                viewer.renderer_mut().resize(cols, rows);
                continue;
            }
            match handle_event(&ev, viewer) {
                InputResult::Quit => break,
                InputResult::Notice(notice) => viewer.renderer_mut().set_notice(notice),
                InputResult::Continue => {}
            }
        }

        viewer.tick();
    }
    Ok(())
}

/// Play `subject` without a terminal, sleeping between wakeups.
pub fn play_plain<P, S, R, C>(
    viewer: &mut StoryViewer<P, S, R, C>,
    subject: &SubjectId,
) -> Result<SessionSummary>
where
    P: ContentProvider,
    S: ReactionSink,
    R: FrameRenderer,
    C: Clock,
{
    run_until_closed(viewer, subject, |delay| {
        thread::sleep(Duration::from_millis(delay))
    })
}

/// Open `subject` and tick until the session closes.
///
/// `wait` is called with the delay in milliseconds until the next wakeup.
/// It must let the viewer's clock move forward by that much.
pub fn run_until_closed<P, S, R, C, F>(
    viewer: &mut StoryViewer<P, S, R, C>,
    subject: &SubjectId,
    mut wait: F,
) -> Result<SessionSummary>
where
    P: ContentProvider,
    S: ReactionSink,
    R: FrameRenderer,
    C: Clock,
    F: FnMut(Millis),
{
    viewer.open(subject)?;

    while let Some(at) = viewer.next_wakeup() {
        let now = viewer.clock().now_ms();
        if at > now {
            wait(at - now);
        }
        viewer.tick();
    }

    finished_summary(viewer)
}

fn finished_summary<P, S, R, C>(viewer: &StoryViewer<P, S, R, C>) -> Result<SessionSummary>
where
    P: ContentProvider,
    S: ReactionSink,
    R: FrameRenderer,
    C: Clock,
{
    viewer
        .last_summary()
        .context("Playback stopped with the session still open")
}
