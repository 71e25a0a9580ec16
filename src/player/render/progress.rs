//! Progress bar for the story player.
//!
//! Stories show one segment per item: segments before the cursor are full,
//! the current one fills with elapsed time and later ones are empty.

use chrono::{DateTime, Utc};

/// One cell of the progress bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarCell {
    Filled,
    Empty,
    Gap,
}

/// Format a duration in milliseconds to MM:SS format.
///
/// # Arguments
/// * `ms` - Duration in milliseconds
///
/// # Returns
/// A string in MM:SS format
pub fn format_duration(ms: u64) -> String {
    let total_secs = ms / 1000;
    let mins = total_secs / 60;
    let secs = total_secs % 60;
    format!("{:02}:{:02}", mins, secs)
}

/// Short "how long ago" label for an item's creation time.
pub fn format_age(created_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - created_at).num_seconds().max(0);
    match secs {
        0..=59 => "just now".to_string(),
        60..=3_599 => format!("{}m ago", secs / 60),
        3_600..=86_399 => format!("{}h ago", secs / 3_600),
        _ => format!("{}d ago", secs / 86_400),
    }
}

/// Build the segmented progress bar cells.
///
/// # Arguments
/// * `width` - Width of the bar in cells
/// * `position` - Index of the current item
/// * `total` - Number of items
/// * `fraction` - Elapsed fraction of the current item (0.0..=1.0)
///
/// When the bar is too narrow for one cell per segment plus gaps, a single
/// continuous bar showing overall progress is drawn instead.
pub fn build_segment_bar(width: usize, position: usize, total: usize, fraction: f64) -> Vec<BarCell> {
    if width == 0 || total == 0 {
        return Vec::new();
    }
    let fraction = fraction.clamp(0.0, 1.0);
    let gaps = total - 1;

    if width < total + gaps {
        let overall = (position as f64 + fraction) / total as f64;
        let filled = ((width as f64 * overall) as usize).min(width);
        let mut bar = vec![BarCell::Empty; width];
        bar[..filled].fill(BarCell::Filled);
        return bar;
    }

    let available = width - gaps;
    let base = available / total;
    let extra = available % total;

    let mut bar = Vec::with_capacity(width);
    for segment in 0..total {
        if segment > 0 {
            bar.push(BarCell::Gap);
        }
        let seg_width = base + usize::from(segment < extra);
        let filled = if segment < position {
            seg_width
        } else if segment == position {
            ((seg_width as f64 * fraction) as usize).min(seg_width)
        } else {
            0
        };
        bar.extend(std::iter::repeat(BarCell::Filled).take(filled));
        bar.extend(std::iter::repeat(BarCell::Empty).take(seg_width - filled));
    }
    bar
}

/// Render bar cells as ANSI-colored text.
pub fn render_segment_bar(cells: &[BarCell]) -> String {
    const WHITE: &str = "\x1b[97m";
    const DARK_GREY: &str = "\x1b[90m";
    const RESET: &str = "\x1b[0m";

    let mut output = String::with_capacity(cells.len() * 4);
    let mut current: Option<BarCell> = None;
    for &cell in cells {
        if current != Some(cell) {
            match cell {
                BarCell::Filled => output.push_str(WHITE),
                BarCell::Empty => output.push_str(DARK_GREY),
                BarCell::Gap => {}
            }
            current = Some(cell);
        }
        output.push(match cell {
            BarCell::Filled => '━',
            BarCell::Empty => '─',
            BarCell::Gap => ' ',
        });
    }
    output.push_str(RESET);
    output
}
