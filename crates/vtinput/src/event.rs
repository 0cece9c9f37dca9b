#![forbid(unsafe_code)]

//! Canonical input event types.
//!
//! Every decoded input is one variant of [`Event`]. Consumers pattern-match;
//! new input kinds are added as variants, not as new types behind a trait.
//!
//! # Design Notes
//!
//! - Mouse coordinates are 0-indexed; the wire forms are 1-indexed and are
//!   normalized during decoding.
//! - Key releases exist only on the console-record path; pty byte streams do
//!   not report them.
//! - Unrecognized but well-formed escape sequences are carried verbatim in
//!   the `Unknown*` variants so callers can log or forward them. They are
//!   never silently dropped.

use std::fmt;

use crate::color::Rgba;
use crate::key::{KeyEvent, Modifiers};

/// A decoded input event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A key was pressed.
    KeyDown(KeyEvent),

    /// A key was released (console records only).
    KeyUp(KeyEvent),

    /// A mouse button was pressed.
    MouseDown(MouseEvent),

    /// A mouse button was released. Wheel buttons never produce this.
    MouseUp(MouseEvent),

    /// The mouse moved, with or without a held button.
    MouseMove(MouseEvent),

    /// The terminal gained focus.
    FocusIn,

    /// The terminal lost focus.
    FocusOut,

    /// Bracketed paste content, decoded lossily as UTF-8.
    Paste(String),

    /// Reply to an OSC 10 foreground color query.
    ForegroundColor(Rgba),

    /// Reply to an OSC 11 background color query.
    BackgroundColor(Rgba),

    /// Reply to an OSC 12 cursor color query.
    CursorColor(Rgba),

    /// Reported XTerm modifyOtherKeys mode (0 = off, 1 or 2 = enabled).
    ModifyOtherKeysMode(u8),

    /// A well-formed CSI sequence with no matching rule; raw bytes included.
    UnknownCsi(Vec<u8>),

    /// A well-formed SS3 sequence with no matching rule; raw bytes included.
    UnknownSs3(Vec<u8>),

    /// A well-formed OSC sequence with no matching rule; raw bytes included.
    UnknownOsc(Vec<u8>),

    /// A DCS sequence; raw bytes included.
    UnknownDcs(Vec<u8>),

    /// Several events produced by a single input (console key repeat).
    Multi(Vec<Event>),
}

/// Mouse buttons, numbered as X11 does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Motion without a held button, or an X10 release.
    None,
    /// Left button.
    Left,
    /// Middle button (wheel press).
    Middle,
    /// Right button.
    Right,
    /// Wheel turned up.
    WheelUp,
    /// Wheel turned down.
    WheelDown,
    /// Wheel pushed left.
    WheelLeft,
    /// Wheel pushed right.
    WheelRight,
    /// Browser-backward button.
    Backward,
    /// Browser-forward button.
    Forward,
    /// Additional button 10.
    Button10,
    /// Additional button 11.
    Button11,
}

impl MouseButton {
    /// True for the four wheel buttons. Wheels report no release events.
    #[must_use]
    pub const fn is_wheel(self) -> bool {
        matches!(
            self,
            Self::WheelUp | Self::WheelDown | Self::WheelLeft | Self::WheelRight
        )
    }

    /// Display name; `None` is the empty string (motion has no button).
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::None => "",
            Self::Left => "left",
            Self::Middle => "middle",
            Self::Right => "right",
            Self::WheelUp => "wheel up",
            Self::WheelDown => "wheel down",
            Self::WheelLeft => "wheel left",
            Self::WheelRight => "wheel right",
            Self::Backward => "backward",
            Self::Forward => "forward",
            Self::Button10 => "button 10",
            Self::Button11 => "button 11",
        }
    }
}

/// A decoded mouse event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MouseEvent {
    /// Column, 0-indexed.
    pub x: u16,
    /// Row, 0-indexed.
    pub y: u16,
    /// Button involved, `MouseButton::None` for bare motion.
    pub button: MouseButton,
    /// Modifiers held during the event.
    pub mods: Modifiers,
}

impl MouseEvent {
    /// Create a mouse event with no modifiers.
    #[must_use]
    pub const fn new(x: u16, y: u16, button: MouseButton) -> Self {
        Self {
            x,
            y,
            button,
            mods: Modifiers::empty(),
        }
    }

    /// Attach modifiers.
    #[must_use]
    pub const fn with_mods(mut self, mods: Modifiers) -> Self {
        self.mods = mods;
        self
    }

    /// True if the event involves a wheel button.
    #[must_use]
    pub const fn is_wheel(&self) -> bool {
        self.button.is_wheel()
    }
}

impl fmt::Display for MouseEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.mods, self.button.name())
    }
}
