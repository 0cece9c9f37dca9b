#![forbid(unsafe_code)]

//! Key symbols, modifier bitset, and the key event record.
//!
//! A key event carries an optional named symbol, an optional character, a
//! modifier bitset, and a repeat flag. Some keys legitimately carry both a
//! symbol and a character (Space is the canonical example); a key event with
//! neither is the "no event" value and is never emitted by the decoder.

use std::fmt;

use bitflags::bitflags;

bitflags! {
    /// Modifier keys held during a key or mouse event.
    ///
    /// The bit layout matches the XTerm wire convention, where sequences
    /// carry `bits + 1` as a decimal parameter.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// Shift key.
        const SHIFT = 0b0001;
        /// Alt/Option key.
        const ALT   = 0b0010;
        /// Control key.
        const CTRL  = 0b0100;
        /// Meta key.
        const META  = 0b1000;
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::empty()
    }
}

impl Modifiers {
    /// Decode the XTerm modifier parameter (`bits + 1`).
    ///
    /// A parameter of 0 or 1 means no modifiers; bits beyond the four known
    /// modifiers are discarded.
    #[must_use]
    pub fn from_wire(param: u16) -> Self {
        Self::from_bits_truncate(param.saturating_sub(1) as u8)
    }

    /// Encode as the XTerm modifier parameter (`bits + 1`).
    #[must_use]
    pub fn wire(self) -> u16 {
        u16::from(self.bits()) + 1
    }
}

impl fmt::Display for Modifiers {
    /// Writes the `ctrl+alt+shift+meta` prefix used by event display forms.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.contains(Self::CTRL) {
            f.write_str("ctrl+")?;
        }
        if self.contains(Self::ALT) {
            f.write_str("alt+")?;
        }
        if self.contains(Self::SHIFT) {
            f.write_str("shift+")?;
        }
        if self.contains(Self::META) {
            f.write_str("meta+")?;
        }
        Ok(())
    }
}

/// Named keys the decoder can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeySym {
    /// Enter/Return key.
    Enter,
    /// Tab key.
    Tab,
    /// Backspace key.
    Backspace,
    /// Delete key.
    Delete,
    /// Escape key.
    Escape,
    /// Space key (also carries the `' '` character).
    Space,

    /// Up arrow key.
    Up,
    /// Down arrow key.
    Down,
    /// Left arrow key.
    Left,
    /// Right arrow key.
    Right,
    /// Begin key (keypad center, VT `E`).
    Begin,

    /// Home key.
    Home,
    /// End key.
    End,
    /// Page Up key.
    PgUp,
    /// Page Down key.
    PgDown,
    /// Insert key.
    Insert,
    /// Find key (DEC, shares a sequence with Home).
    Find,
    /// Select key (DEC, shares a sequence with End).
    Select,

    /// Function key F1..F24.
    F(u8),

    /// Keypad digits 0..9.
    Kp0,
    Kp1,
    Kp2,
    Kp3,
    Kp4,
    Kp5,
    Kp6,
    Kp7,
    Kp8,
    Kp9,
    /// Keypad Enter.
    KpEnter,
    /// Keypad equals.
    KpEqual,
    /// Keypad multiply.
    KpMul,
    /// Keypad plus.
    KpPlus,
    /// Keypad comma/separator.
    KpComma,
    /// Keypad minus.
    KpMinus,
    /// Keypad period/decimal.
    KpPeriod,
    /// Keypad divide.
    KpDiv,

    /// Num Lock key.
    NumLock,
    /// Scroll Lock key.
    ScrollLock,
    /// Print Screen key.
    PrintScreen,

    /// Left/right modifier keys as reported by console records.
    LeftShift,
    RightShift,
    LeftCtrl,
    RightCtrl,
    LeftAlt,
    RightAlt,
    LeftSuper,
    RightSuper,
    /// Menu/Application key.
    Menu,
}

impl fmt::Display for KeySym {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Enter => "enter",
            Self::Tab => "tab",
            Self::Backspace => "backspace",
            Self::Delete => "delete",
            Self::Escape => "escape",
            Self::Space => "space",
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
            Self::Begin => "begin",
            Self::Home => "home",
            Self::End => "end",
            Self::PgUp => "pgup",
            Self::PgDown => "pgdown",
            Self::Insert => "insert",
            Self::Find => "find",
            Self::Select => "select",
            Self::F(n) => return write!(f, "f{n}"),
            Self::Kp0 => "kp0",
            Self::Kp1 => "kp1",
            Self::Kp2 => "kp2",
            Self::Kp3 => "kp3",
            Self::Kp4 => "kp4",
            Self::Kp5 => "kp5",
            Self::Kp6 => "kp6",
            Self::Kp7 => "kp7",
            Self::Kp8 => "kp8",
            Self::Kp9 => "kp9",
            Self::KpEnter => "kpenter",
            Self::KpEqual => "kpequal",
            Self::KpMul => "kpmul",
            Self::KpPlus => "kpplus",
            Self::KpComma => "kpcomma",
            Self::KpMinus => "kpminus",
            Self::KpPeriod => "kpperiod",
            Self::KpDiv => "kpdiv",
            Self::NumLock => "numlock",
            Self::ScrollLock => "scrolllock",
            Self::PrintScreen => "printscreen",
            Self::LeftShift => "leftshift",
            Self::RightShift => "rightshift",
            Self::LeftCtrl => "leftctrl",
            Self::RightCtrl => "rightctrl",
            Self::LeftAlt => "leftalt",
            Self::RightAlt => "rightalt",
            Self::LeftSuper => "leftsuper",
            Self::RightSuper => "rightsuper",
            Self::Menu => "menu",
        };
        f.write_str(name)
    }
}

/// A decoded key press or release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct KeyEvent {
    /// Named symbol, if the key has one.
    pub sym: Option<KeySym>,
    /// Character produced by the key, if any.
    pub ch: Option<char>,
    /// Modifiers held during the event.
    pub mods: Modifiers,
    /// True when the key is auto-repeating (console records only).
    pub is_repeat: bool,
}

impl KeyEvent {
    /// Create a key event from a named symbol.
    #[must_use]
    pub const fn sym(sym: KeySym) -> Self {
        Self {
            sym: Some(sym),
            ch: None,
            mods: Modifiers::empty(),
            is_repeat: false,
        }
    }

    /// Create a key event from a character.
    #[must_use]
    pub const fn ch(ch: char) -> Self {
        Self {
            sym: None,
            ch: Some(ch),
            mods: Modifiers::empty(),
            is_repeat: false,
        }
    }

    /// Create a key event carrying both a symbol and a character (Space).
    #[must_use]
    pub const fn sym_char(sym: KeySym, ch: char) -> Self {
        Self {
            sym: Some(sym),
            ch: Some(ch),
            mods: Modifiers::empty(),
            is_repeat: false,
        }
    }

    /// The "no event" value: neither symbol nor character.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            sym: None,
            ch: None,
            mods: Modifiers::empty(),
            is_repeat: false,
        }
    }

    /// Attach modifiers.
    #[must_use]
    pub const fn with_mods(mut self, mods: Modifiers) -> Self {
        self.mods = mods;
        self
    }

    /// True when the event carries neither symbol nor character.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.sym.is_none() && self.ch.is_none()
    }
}

impl fmt::Display for KeyEvent {
    /// Writes `ctrl+alt+shift+meta` prefixes followed by the symbol name or
    /// the character.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.mods)?;
        match (self.sym, self.ch) {
            (Some(sym), _) => write!(f, "{sym}"),
            (None, Some(ch)) => write!(f, "{ch}"),
            (None, None) => Ok(()),
        }
    }
}
