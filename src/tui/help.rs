use super::state::Palette;
use crate::config::KeyBindings;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Number of rows `draw_help` needs, borders included.
pub const HELP_HEIGHT: u16 = 8;

pub fn help_lines(keys: &KeyBindings, palette: &Palette) -> Vec<Line<'static>> {
    let rows = [
        (keys.exec.to_string(), "Execute selected line."),
        (keys.save.to_string(), "Save all lines."),
        (keys.delete.to_string(), "Remove current line."),
        (keys.add.to_string(), "Add a line at end."),
        (keys.quit.to_string(), "Exit."),
        ("tab/↓ shift+tab/↑".to_string(), "Move between lines."),
    ];
    rows.into_iter()
        .map(|(key, what)| {
            Line::from(vec![
                Span::raw(" "),
                Span::styled(format!("{key:<17}"), palette.focused_style()),
                Span::styled(format!(" {what}"), palette.unfocused_style()),
            ])
        })
        .collect()
}

pub fn draw_help(area: Rect, f: &mut Frame, keys: &KeyBindings, palette: &Palette) {
    let p = Paragraph::new(help_lines(keys, palette)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(palette.unfocused_style())
            .title("Keys"),
    );
    f.render_widget(p, area);
}
