//! Full-screen ANSI renderer.
//!
//! Layout (top to bottom): segmented progress bar, header with subject,
//! position and age, the item content, and a key hint footer on the last
//! row. Every frame repaints the whole screen in a single write.

use std::io::Write;

use chrono::Utc;
use unicode_width::UnicodeWidthChar;

use super::progress::{build_segment_bar, format_age, render_segment_bar};
use super::{Frame, FrameRenderer};
use crate::player::state::SessionSummary;
use crate::story::StoryContent;

const BOLD: &str = "\x1b[1m";
const GREY: &str = "\x1b[37m";
const DARK_GREY: &str = "\x1b[90m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";
const RESET: &str = "\x1b[0m";

const FOOTER: &str = "←/→ navigate · space pause · 1-6 react · q close";

/// Truncate `text` to at most `max_width` display columns, adding `…` when
/// something was cut.
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    let total: usize = text.chars().map(|c| c.width().unwrap_or(0)).sum();
    if total <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > max_width - 1 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

/// Renders frames as a full-screen ANSI view.
#[derive(Debug)]
pub struct TerminalRenderer<W: Write> {
    out: W,
    cols: u16,
    rows: u16,
    notice: Option<String>,
    closed: Option<SessionSummary>,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W, cols: u16, rows: u16) -> Self {
        Self {
            out,
            cols,
            rows,
            notice: None,
            closed: None,
        }
    }

    /// Handle terminal resize; takes effect on the next frame.
    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.cols = cols;
        self.rows = rows;
    }

    /// Show a one-line notice under the header until cleared.
    pub fn set_notice(&mut self, notice: impl Into<String>) {
        self.notice = Some(notice.into());
    }

    pub fn clear_notice(&mut self) {
        self.notice = None;
    }

    /// Summary of the last closed session, if any.
    pub fn closed(&self) -> Option<&SessionSummary> {
        self.closed.as_ref()
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn compose(&self, frame: &Frame<'_>) -> String {
        let width = self.cols as usize;
        let inner = width.saturating_sub(2);
        let mut output = String::with_capacity(width * 8);

        // Clear and home
        output.push_str("\x1b[2J\x1b[H");

        let cells = build_segment_bar(inner, frame.position, frame.total, frame.elapsed_fraction);
        output.push(' ');
        output.push_str(&render_segment_bar(&cells));
        output.push_str("\r\n");

        let age = format_age(frame.item.created_at, Utc::now());
        let header = format!(
            "{} · {}/{} · {}",
            frame.subject,
            frame.position + 1,
            frame.total,
            age
        );
        output.push_str(&format!(" {}{}{}", BOLD, truncate_to_width(&header, inner), RESET));
        if frame.paused {
            output.push_str(&format!(" {}[paused]{}", YELLOW, RESET));
        }
        output.push_str("\r\n");

        if let Some(notice) = &self.notice {
            output.push_str(&format!(" {}{}{}", CYAN, truncate_to_width(notice, inner), RESET));
        }
        output.push_str("\r\n\r\n");

        let (label, body) = match &frame.item.content {
            StoryContent::Image { url } => ("[image]", url.as_str()),
            StoryContent::Text { body } => ("", body.as_str()),
            StoryContent::Video { stream } => ("[video]", stream.as_str()),
        };
        if !label.is_empty() {
            output.push_str(&format!(" {}{}{} ", DARK_GREY, label, RESET));
        } else {
            output.push(' ');
        }
        let body_width = inner.saturating_sub(label.len() + 1);
        for (i, line) in body.lines().take(self.body_rows()).enumerate() {
            if i > 0 {
                output.push_str("\r\n ");
            }
            output.push_str(&format!("{}{}{}", GREY, truncate_to_width(line, body_width), RESET));
        }

        // Footer on the last row
        output.push_str(&format!(
            "\x1b[{};1H {}{}{}",
            self.rows.max(1),
            DARK_GREY,
            truncate_to_width(FOOTER, inner),
            RESET
        ));
        output
    }

    /// Rows left for content after header, notice and footer.
    fn body_rows(&self) -> usize {
        (self.rows as usize).saturating_sub(6).max(1)
    }

    fn write_all(&mut self, text: &str) {
        if let Err(e) = self
            .out
            .write_all(text.as_bytes())
            .and_then(|_| self.out.flush())
        {
            tracing::warn!(error = %e, "failed to write frame");
        }
    }
}

impl<W: Write> FrameRenderer for TerminalRenderer<W> {
    fn on_frame(&mut self, frame: &Frame<'_>) {
        if frame.is_item_start() {
            self.notice = None;
        }
        let text = self.compose(frame);
        self.write_all(&text);
    }

    fn on_session_closed(&mut self, summary: &SessionSummary) {
        self.closed = Some(summary.clone());
        self.write_all("\x1b[2J\x1b[H");
    }
}
