mod help;
mod state;

use crate::config::{Config, KeyBindings};
use crate::keys::{KeyChord, KeyName, INTERRUPT};
use crate::session::{EditAction, Session, SessionEvent, SessionOutcome};
use crate::storage::Store;
use anyhow::{Context, Result};
use crossterm::{
    event::{
        self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyCode, KeyEvent,
        KeyEventKind, KeyModifiers,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Terminal,
};
use state::{
    id_width, scroll_to_cursor, visible_range, Palette, BLURRED_PROMPT, FOCUSED_PROMPT,
    PLACEHOLDER,
};
use std::io;

/// Run an interactive session until the user quits or picks a command.
///
/// Storage is loaded before the terminal switches to raw mode so that a broken
/// data file is reported on a normal screen.
pub fn run<S: Store>(config: &Config, store: S) -> Result<SessionOutcome> {
    let mut session = Session::open(store, config.limit_line)
        .with_context(|| format!("load {}", config.data_path.display()))?;
    let palette = Palette::from_config(&config.colors);

    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste).ok();

    let res = event_loop(&mut session, config, &palette);

    disable_raw_mode().ok();
    let mut stdout = io::stdout();
    execute!(stdout, DisableBracketedPaste, LeaveAlternateScreen).ok();
    res
}

fn event_loop<S: Store>(
    session: &mut Session<S>,
    config: &Config,
    palette: &Palette,
) -> Result<SessionOutcome> {
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend).context("create terminal")?;
    terminal.clear().ok();

    loop {
        terminal
            .draw(|f| draw(f.area(), f, session, config, palette))
            .context("draw")?;

        let ev = event::read().context("read terminal event")?;
        let Some(session_event) = translate_event(&config.keys, ev) else {
            continue;
        };
        let outcome = session
            .handle(session_event)
            .with_context(|| format!("update {}", config.data_path.display()))?;
        if let Some(outcome) = outcome {
            return Ok(outcome);
        }
    }
}

fn translate_event(keys: &KeyBindings, ev: Event) -> Option<SessionEvent> {
    match ev {
        Event::Key(k) if k.kind != KeyEventKind::Release => map_key(keys, &k),
        Event::Paste(text) => Some(SessionEvent::Edit(EditAction::Paste(text))),
        _ => None,
    }
}

fn chord_from_key(k: &KeyEvent) -> Option<KeyChord> {
    let key = match k.code {
        KeyCode::Char(c) => KeyName::Char(c),
        KeyCode::Enter => KeyName::Enter,
        KeyCode::Esc => KeyName::Esc,
        KeyCode::Tab => KeyName::Tab,
        KeyCode::BackTab => KeyName::BackTab,
        KeyCode::Backspace => KeyName::Backspace,
        KeyCode::Delete => KeyName::Delete,
        KeyCode::Insert => KeyName::Insert,
        KeyCode::Up => KeyName::Up,
        KeyCode::Down => KeyName::Down,
        KeyCode::Left => KeyName::Left,
        KeyCode::Right => KeyName::Right,
        KeyCode::Home => KeyName::Home,
        KeyCode::End => KeyName::End,
        KeyCode::PageUp => KeyName::PageUp,
        KeyCode::PageDown => KeyName::PageDown,
        KeyCode::F(n) => KeyName::F(n),
        _ => return None,
    };
    Some(KeyChord::normalized(
        key,
        k.modifiers.contains(KeyModifiers::CONTROL),
        k.modifiers.contains(KeyModifiers::ALT),
        k.modifiers.contains(KeyModifiers::SHIFT),
    ))
}

/// Configured bindings win over navigation, navigation over text editing.
fn map_key(keys: &KeyBindings, k: &KeyEvent) -> Option<SessionEvent> {
    let chord = chord_from_key(k)?;

    if chord == INTERRUPT || chord == keys.quit {
        return Some(SessionEvent::Quit);
    }
    if chord == keys.add {
        return Some(SessionEvent::Add);
    }
    if chord == keys.save {
        return Some(SessionEvent::Save);
    }
    if chord == keys.delete {
        return Some(SessionEvent::Delete);
    }
    if chord == keys.exec {
        return Some(SessionEvent::Execute);
    }

    let edit = match (chord.key, chord.ctrl, chord.alt) {
        (KeyName::Tab | KeyName::Down, false, false) => return Some(SessionEvent::FocusNext),
        (KeyName::BackTab | KeyName::Up, false, false) => return Some(SessionEvent::FocusPrev),
        (KeyName::Char(c), false, false) => EditAction::Insert(c),
        (KeyName::Backspace, _, false) | (KeyName::Char('h'), true, false) => {
            EditAction::Backspace
        }
        (KeyName::Delete, false, false) => EditAction::DeleteForward,
        (KeyName::Left, false, false) | (KeyName::Char('b'), true, false) => {
            EditAction::CursorLeft
        }
        (KeyName::Right, false, false) | (KeyName::Char('f'), true, false) => {
            EditAction::CursorRight
        }
        (KeyName::Home, false, false) | (KeyName::Char('a'), true, false) => {
            EditAction::CursorHome
        }
        (KeyName::End, false, false) | (KeyName::Char('e'), true, false) => EditAction::CursorEnd,
        (KeyName::Char('u'), true, false) => EditAction::KillToStart,
        (KeyName::Char('k'), true, false) => EditAction::KillToEnd,
        _ => return None,
    };
    Some(SessionEvent::Edit(edit))
}

fn draw<S: Store>(
    area: Rect,
    f: &mut ratatui::Frame,
    session: &Session<S>,
    config: &Config,
    palette: &Palette,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(help::HELP_HEIGHT)].as_ref())
        .split(area);

    draw_entries(chunks[0], f, session, palette);
    help::draw_help(chunks[1], f, &config.keys, palette);
}

fn draw_entries<S: Store>(
    area: Rect,
    f: &mut ratatui::Frame,
    session: &Session<S>,
    palette: &Palette,
) {
    let entries = session.entries();
    let focus = session.focus();
    let title = format!(" cla {}/{} ", entries.len(), session.limit());
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(palette.unfocused_style())
        .title(title);
    let inner = block.inner(area);

    let width = id_width(entries.len());
    let prefix = width + 2 + FOCUSED_PROMPT.len();
    let text_width = (inner.width as usize).saturating_sub(prefix);
    let range = visible_range(focus.index(), entries.len(), inner.height as usize);
    let start = range.start;
    // Focused row text scrolled to the cursor, and the cursor's column in it.
    let scrolled = session
        .editor()
        .map(|editor| scroll_to_cursor(editor.value(), editor.cursor(), text_width));

    let mut lines: Vec<Line<'static>> = Vec::with_capacity(range.len());
    for entry in &entries[range] {
        let (prompt, text_style) = if focus.is_focused(entry.position) {
            (FOCUSED_PROMPT, palette.focused_style())
        } else {
            (BLURRED_PROMPT, Style::default())
        };
        let text = match &scrolled {
            _ if entry.command.is_empty() => Span::styled(PLACEHOLDER, palette.placeholder_style()),
            Some((visible, _)) if focus.is_focused(entry.position) => {
                Span::styled(visible.clone(), text_style)
            }
            _ => Span::styled(entry.command.clone(), text_style),
        };
        lines.push(Line::from(vec![
            Span::styled(
                format!("{:>width$}: ", entry.position),
                palette.unfocused_style(),
            ),
            Span::styled(prompt, palette.focused_style()),
            text,
        ]));
    }
    if entries.is_empty() {
        lines.push(Line::from(Span::styled(
            "No commands. Press the add key to create one.",
            palette.placeholder_style(),
        )));
    }

    f.render_widget(Paragraph::new(lines).block(block), area);

    if let (Some(i), Some((_, cursor_col))) = (focus.index(), scrolled) {
        let row = inner.y + (i - start) as u16;
        let col = inner.x + (prefix + cursor_col) as u16;
        if row < inner.y + inner.height && col < inner.x + inner.width {
            f.set_cursor_position((col, row));
        }
    }
}
