//! Textual key bindings.
//!
//! Bindings are written the way they are shown to the user: modifiers joined
//! with `+` in front of a key name, e.g. `ctrl+s`, `alt+enter`, `esc`, `f5`.

use anyhow::{bail, Result};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyName {
    Char(char),
    Enter,
    Esc,
    Tab,
    BackTab,
    Backspace,
    Delete,
    Insert,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    F(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyChord {
    pub key: KeyName,
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
}

impl KeyChord {
    pub const fn plain(key: KeyName) -> Self {
        Self {
            key,
            ctrl: false,
            alt: false,
            shift: false,
        }
    }

    pub const fn ctrl(c: char) -> Self {
        Self {
            key: KeyName::Char(c),
            ctrl: true,
            alt: false,
            shift: false,
        }
    }

    /// Build a chord from raw terminal input, folding shift into the key where
    /// the terminal already did (`shift+a` arrives as `A`, `shift+tab` as
    /// back-tab).
    pub fn normalized(key: KeyName, ctrl: bool, alt: bool, shift: bool) -> Self {
        let (key, shift) = match key {
            KeyName::Tab if shift => (KeyName::BackTab, false),
            KeyName::BackTab => (KeyName::BackTab, false),
            KeyName::Char(c) if ctrl || alt => (KeyName::Char(c.to_ascii_lowercase()), false),
            KeyName::Char(c) if shift => (KeyName::Char(c.to_ascii_uppercase()), false),
            KeyName::Char(c) => (KeyName::Char(c), false),
            other => (other, shift),
        };
        Self {
            key,
            ctrl,
            alt,
            shift,
        }
    }

    /// True for chords that would otherwise type a character into an entry.
    pub fn is_text_input(&self) -> bool {
        matches!(self.key, KeyName::Char(_)) && !self.ctrl && !self.alt
    }
}

/// Keys that move the focus; bindings may not reuse them.
pub const NAVIGATION_KEYS: [KeyChord; 4] = [
    KeyChord::plain(KeyName::Tab),
    KeyChord::plain(KeyName::BackTab),
    KeyChord::plain(KeyName::Up),
    KeyChord::plain(KeyName::Down),
];

/// Always quits, whatever the configured quit key is.
pub const INTERRUPT: KeyChord = KeyChord::ctrl('c');

impl FromStr for KeyChord {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let raw = s.trim();
        if raw.is_empty() {
            bail!("empty key binding");
        }
        // A bare "+" is the plus key, and "ctrl++" is ctrl with plus.
        let (mods, key) = match raw.strip_suffix("++") {
            Some(prefix) => (prefix, "+"),
            None if raw == "+" => ("", "+"),
            None => match raw.rsplit_once('+') {
                Some((mods, key)) => (mods, key),
                None => ("", raw),
            },
        };

        let (mut ctrl, mut alt, mut shift) = (false, false, false);
        for m in mods.split('+').filter(|m| !m.is_empty()) {
            match m.to_ascii_lowercase().as_str() {
                "ctrl" | "control" => ctrl = true,
                "alt" | "meta" => alt = true,
                "shift" => shift = true,
                other => bail!("unknown modifier {other:?} in key binding {raw:?}"),
            }
        }

        let key = parse_key_name(key)
            .ok_or_else(|| anyhow::anyhow!("unknown key {key:?} in key binding {raw:?}"))?;
        Ok(KeyChord::normalized(key, ctrl, alt, shift))
    }
}

fn parse_key_name(name: &str) -> Option<KeyName> {
    let mut chars = name.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Some(KeyName::Char(c));
    }
    let lower = name.to_ascii_lowercase();
    let key = match lower.as_str() {
        "enter" | "return" | "ret" => KeyName::Enter,
        "esc" | "escape" => KeyName::Esc,
        "tab" => KeyName::Tab,
        "backtab" => KeyName::BackTab,
        "backspace" | "bs" => KeyName::Backspace,
        "delete" | "del" => KeyName::Delete,
        "insert" | "ins" => KeyName::Insert,
        "up" => KeyName::Up,
        "down" => KeyName::Down,
        "left" => KeyName::Left,
        "right" => KeyName::Right,
        "home" => KeyName::Home,
        "end" => KeyName::End,
        "pageup" | "pgup" => KeyName::PageUp,
        "pagedown" | "pgdown" => KeyName::PageDown,
        "space" => KeyName::Char(' '),
        f if f.starts_with('f') => {
            let n: u8 = f[1..].parse().ok()?;
            if !(1..=24).contains(&n) {
                return None;
            }
            KeyName::F(n)
        }
        _ => return None,
    };
    Some(key)
}

impl fmt::Display for KeyChord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ctrl {
            f.write_str("ctrl+")?;
        }
        if self.alt {
            f.write_str("alt+")?;
        }
        if self.shift {
            f.write_str("shift+")?;
        }
        match self.key {
            KeyName::Char(' ') => f.write_str("space"),
            KeyName::Char(c) => write!(f, "{c}"),
            KeyName::Enter => f.write_str("enter"),
            KeyName::Esc => f.write_str("esc"),
            KeyName::Tab => f.write_str("tab"),
            KeyName::BackTab => f.write_str("shift+tab"),
            KeyName::Backspace => f.write_str("backspace"),
            KeyName::Delete => f.write_str("delete"),
            KeyName::Insert => f.write_str("insert"),
            KeyName::Up => f.write_str("up"),
            KeyName::Down => f.write_str("down"),
            KeyName::Left => f.write_str("left"),
            KeyName::Right => f.write_str("right"),
            KeyName::Home => f.write_str("home"),
            KeyName::End => f.write_str("end"),
            KeyName::PageUp => f.write_str("pageup"),
            KeyName::PageDown => f.write_str("pagedown"),
            KeyName::F(n) => write!(f, "f{n}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("ctrl+s", KeyChord::ctrl('s'))]
    #[case("Ctrl+S", KeyChord::ctrl('s'))]
    #[case("enter", KeyChord::plain(KeyName::Enter))]
    #[case("esc", KeyChord::plain(KeyName::Esc))]
    #[case("shift+tab", KeyChord::plain(KeyName::BackTab))]
    #[case("f5", KeyChord::plain(KeyName::F(5)))]
    #[case("+", KeyChord::plain(KeyName::Char('+')))]
    #[case("ctrl++", KeyChord::ctrl('+'))]
    #[case("Q", KeyChord::plain(KeyName::Char('Q')))]
    #[case("shift+a", KeyChord::plain(KeyName::Char('A')))]
    #[case("ctrl+shift+a", KeyChord::ctrl('a'))]
    fn parses_bindings(#[case] raw: &str, #[case] expected: KeyChord) {
        assert_eq!(raw.parse::<KeyChord>().unwrap(), expected);
    }

    #[test]
    fn alt_and_shift_modifiers() {
        let chord: KeyChord = "alt+shift+up".parse().unwrap();
        assert!(chord.alt && chord.shift && !chord.ctrl);
        assert_eq!(chord.key, KeyName::Up);
    }

    #[rstest]
    #[case("")]
    #[case("hyper+x")]
    #[case("ctrl+nope")]
    #[case("f99")]
    fn rejects_bad_bindings(#[case] raw: &str) {
        assert!(raw.parse::<KeyChord>().is_err());
    }

    #[rstest]
    #[case("ctrl+s")]
    #[case("enter")]
    #[case("shift+tab")]
    #[case("alt+f2")]
    #[case("space")]
    fn display_parses_back(#[case] raw: &str) {
        let chord: KeyChord = raw.parse().unwrap();
        assert_eq!(chord.to_string(), raw);
    }

    #[rstest]
    #[case(KeyName::Char('A'), true)]
    #[case(KeyName::Char('a'), true)]
    #[case(KeyName::Char('A'), false)]
    fn shifted_letters_match_their_binding(#[case] key: KeyName, #[case] shift: bool) {
        let binding: KeyChord = "shift+a".parse().unwrap();
        let pressed = KeyChord::normalized(key, false, false, shift);
        assert_eq!(pressed, binding);
        assert_ne!(pressed, KeyChord::plain(KeyName::Char('a')));
    }

    #[test]
    fn text_input_detection() {
        assert!("a".parse::<KeyChord>().unwrap().is_text_input());
        assert!(!"ctrl+a".parse::<KeyChord>().unwrap().is_text_input());
        assert!(!"enter".parse::<KeyChord>().unwrap().is_text_input());
    }
}
