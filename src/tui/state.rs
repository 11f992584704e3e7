use crate::config::ColorConfig;
use ratatui::style::{Color, Modifier, Style};
use std::ops::Range;
use std::str::FromStr;
use unicode_width::UnicodeWidthChar;

pub const PLACEHOLDER: &str = "Input any command.";
pub const FOCUSED_PROMPT: &str = "> ";
pub const BLURRED_PROMPT: &str = "  ";

/// Resolved colors for rows and chrome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub focused: Color,
    pub unfocused: Color,
}

impl Palette {
    /// Accepts anything ratatui parses: names (`magenta`), `#rrggbb`, or a
    /// 256-color index (`205`). Unparsable values fall back with a warning.
    pub fn from_config(colors: &ColorConfig) -> Self {
        Self {
            focused: parse_color(&colors.focused_text, Color::Magenta),
            unfocused: parse_color(&colors.unfocused_text, Color::DarkGray),
        }
    }

    pub fn focused_style(&self) -> Style {
        Style::default().fg(self.focused)
    }

    pub fn unfocused_style(&self) -> Style {
        Style::default().fg(self.unfocused)
    }

    pub fn placeholder_style(&self) -> Style {
        Style::default()
            .fg(self.unfocused)
            .add_modifier(Modifier::ITALIC)
    }
}

fn parse_color(raw: &str, fallback: Color) -> Color {
    match Color::from_str(raw.trim()) {
        Ok(c) => c,
        Err(_) => {
            tracing::warn!(color = raw, "unrecognized color; using default");
            fallback
        }
    }
}

/// Rows to draw so the focused entry stays visible in `height` lines. The
/// window starts at the top and only scrolls once the focus passes its end.
pub fn visible_range(focus: Option<usize>, len: usize, height: usize) -> Range<usize> {
    let height = height.max(1);
    let start = match focus {
        Some(i) if i >= height => i + 1 - height,
        _ => 0,
    };
    let start = start.min(len);
    start..(start + height).min(len)
}

/// Slice of `text` shown in `width` columns so the cursor (a char index) stays
/// visible, plus the cursor's column inside that slice. Scrolls only once the
/// cursor would fall past the right edge.
pub fn scroll_to_cursor(text: &str, cursor: usize, width: usize) -> (String, usize) {
    let width = width.max(1);
    let cols: Vec<(char, usize)> = text
        .chars()
        .map(|c| (c, c.width().unwrap_or(0)))
        .collect();
    let cursor_col: usize = cols.iter().take(cursor).map(|(_, w)| w).sum();

    let mut skip = 0;
    let mut skipped = 0;
    while cursor_col - skipped >= width && skip < cols.len() {
        skipped += cols[skip].1;
        skip += 1;
    }

    let mut used = 0;
    let visible = cols[skip..]
        .iter()
        .take_while(|(_, w)| {
            used += w;
            used <= width
        })
        .map(|(c, _)| *c)
        .collect();
    (visible, cursor_col - skipped)
}

/// Width of the right-aligned row number column.
pub fn id_width(len: usize) -> usize {
    len.saturating_sub(1).to_string().len().max(2)
}
