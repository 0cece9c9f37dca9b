#![forbid(unsafe_code)]

//! Windows console key-record translation.
//!
//! Console hosts deliver typed key records instead of escape bytes. The
//! translator maps them into the same event algebra as the pty decoder. It
//! is a pure function over the record; binding to the console input API is
//! the caller's job, so this module compiles and tests on every platform.

use crate::event::Event;
use crate::key::{KeyEvent, KeySym, Modifiers};

use bitflags::bitflags;

bitflags! {
    /// Control-key state bits of a console key record.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ControlKeyState: u32 {
        /// Right Alt held.
        const RIGHT_ALT_PRESSED = 0x0001;
        /// Left Alt held.
        const LEFT_ALT_PRESSED = 0x0002;
        /// Right Ctrl held.
        const RIGHT_CTRL_PRESSED = 0x0004;
        /// Left Ctrl held.
        const LEFT_CTRL_PRESSED = 0x0008;
        /// Shift held.
        const SHIFT_PRESSED = 0x0010;
        /// Num Lock is on (a state, not a press).
        const NUMLOCK_ON = 0x0020;
        /// Scroll Lock is on (a state, not a press).
        const SCROLLLOCK_ON = 0x0040;
        /// Caps Lock is on (a state, not a press).
        const CAPSLOCK_ON = 0x0080;
        /// The key is an enhanced key.
        const ENHANCED_KEY = 0x0100;
    }
}

impl ControlKeyState {
    const ANY_CTRL: Self = Self::LEFT_CTRL_PRESSED.union(Self::RIGHT_CTRL_PRESSED);
    const ANY_ALT: Self = Self::LEFT_ALT_PRESSED.union(Self::RIGHT_ALT_PRESSED);
    const ANY_LOCK: Self = Self::NUMLOCK_ON
        .union(Self::CAPSLOCK_ON)
        .union(Self::SCROLLLOCK_ON);
}

/// A Windows virtual-key code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VirtualKey(pub u16);

impl VirtualKey {
    pub const BACK: Self = Self(0x08);
    pub const TAB: Self = Self(0x09);
    pub const RETURN: Self = Self(0x0d);
    pub const ESCAPE: Self = Self(0x1b);
    pub const SPACE: Self = Self(0x20);
    pub const PRIOR: Self = Self(0x21);
    pub const NEXT: Self = Self(0x22);
    pub const END: Self = Self(0x23);
    pub const HOME: Self = Self(0x24);
    pub const LEFT: Self = Self(0x25);
    pub const UP: Self = Self(0x26);
    pub const RIGHT: Self = Self(0x27);
    pub const DOWN: Self = Self(0x28);
    pub const SELECT: Self = Self(0x29);
    pub const SNAPSHOT: Self = Self(0x2c);
    pub const INSERT: Self = Self(0x2d);
    pub const DELETE: Self = Self(0x2e);
    pub const LWIN: Self = Self(0x5b);
    pub const RWIN: Self = Self(0x5c);
    pub const APPS: Self = Self(0x5d);
    pub const NUMPAD0: Self = Self(0x60);
    pub const MULTIPLY: Self = Self(0x6a);
    pub const ADD: Self = Self(0x6b);
    pub const SEPARATOR: Self = Self(0x6c);
    pub const SUBTRACT: Self = Self(0x6d);
    pub const DECIMAL: Self = Self(0x6e);
    pub const DIVIDE: Self = Self(0x6f);
    pub const F1: Self = Self(0x70);
    pub const NUMLOCK: Self = Self(0x90);
    pub const SCROLL: Self = Self(0x91);
    pub const LSHIFT: Self = Self(0xa0);
    pub const RSHIFT: Self = Self(0xa1);
    pub const LCONTROL: Self = Self(0xa2);
    pub const RCONTROL: Self = Self(0xa3);
    pub const LMENU: Self = Self(0xa4);
    pub const RMENU: Self = Self(0xa5);
    pub const OEM_4: Self = Self(0xdb);
}

/// A console key event record, as read from the console input API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyRecord {
    /// Virtual-key code.
    pub virtual_key: VirtualKey,
    /// Hardware scan code. Unused by the translator, kept for record
    /// fidelity.
    pub scan_code: u16,
    /// Translated character, if the keystroke produces one.
    pub ch: Option<char>,
    /// True for key-down records, false for key-up.
    pub key_down: bool,
    /// Modifier and lock state.
    pub control_keys: ControlKeyState,
    /// Repeat count; values above 1 expand into a multi-event.
    pub repeat_count: u16,
}

/// Translate one console key record into an event.
///
/// Returns `None` for records that only report lock state (NumLock, Caps
/// Lock, Scroll Lock bits set with no symbol and no character).
#[must_use]
pub fn translate_key_record(rec: &KeyRecord) -> Option<Event> {
    let is_ctrl = rec.control_keys.intersects(ControlKeyState::ANY_CTRL);

    let mut key = match vk_key(rec.virtual_key) {
        Some(key) => key,
        None if is_ctrl => ctrl_char_key(rec.ch, rec.virtual_key),
        None => match rec.ch {
            Some(ch) => KeyEvent::ch(ch),
            None => KeyEvent::empty(),
        },
    };

    if is_ctrl {
        key.mods |= Modifiers::CTRL;
    }
    if rec.control_keys.intersects(ControlKeyState::ANY_ALT) {
        key.mods |= Modifiers::ALT;
    }
    if rec.control_keys.intersects(ControlKeyState::SHIFT_PRESSED) {
        key.mods |= Modifiers::SHIFT;
    }

    // Lock bits mean the lock is ON, not that anything was pressed. A record
    // that carries nothing else is a state notification, not input.
    if rec.control_keys.intersects(ControlKeyState::ANY_LOCK) && key.is_empty() {
        return None;
    }

    key.is_repeat = rec.repeat_count > 1;
    let event = if rec.key_down {
        Event::KeyDown(key)
    } else {
        Event::KeyUp(key)
    };

    if rec.repeat_count <= 1 {
        return Some(event);
    }
    Some(Event::Multi(vec![event; usize::from(rec.repeat_count)]))
}

/// Fixed virtual-key table.
fn vk_key(vk: VirtualKey) -> Option<KeyEvent> {
    let sym = match vk {
        VirtualKey::RETURN => KeySym::Enter,
        VirtualKey::BACK => KeySym::Backspace,
        VirtualKey::TAB => KeySym::Tab,
        VirtualKey::ESCAPE => KeySym::Escape,
        VirtualKey::SPACE => return Some(KeyEvent::sym_char(KeySym::Space, ' ')),
        VirtualKey::UP => KeySym::Up,
        VirtualKey::DOWN => KeySym::Down,
        VirtualKey::RIGHT => KeySym::Right,
        VirtualKey::LEFT => KeySym::Left,
        VirtualKey::HOME => KeySym::Home,
        VirtualKey::END => KeySym::End,
        VirtualKey::PRIOR => KeySym::PgUp,
        VirtualKey::NEXT => KeySym::PgDown,
        VirtualKey::DELETE => KeySym::Delete,
        VirtualKey::SELECT => KeySym::Select,
        VirtualKey::SNAPSHOT => KeySym::PrintScreen,
        VirtualKey::INSERT => KeySym::Insert,
        VirtualKey::LWIN => KeySym::LeftSuper,
        VirtualKey::RWIN => KeySym::RightSuper,
        VirtualKey::APPS => KeySym::Menu,
        VirtualKey::MULTIPLY => KeySym::KpMul,
        VirtualKey::ADD => KeySym::KpPlus,
        VirtualKey::SEPARATOR => KeySym::KpComma,
        VirtualKey::SUBTRACT => KeySym::KpMinus,
        VirtualKey::DECIMAL => KeySym::KpPeriod,
        VirtualKey::DIVIDE => KeySym::KpDiv,
        VirtualKey::NUMLOCK => KeySym::NumLock,
        VirtualKey::SCROLL => KeySym::ScrollLock,
        VirtualKey::LSHIFT => KeySym::LeftShift,
        VirtualKey::RSHIFT => KeySym::RightShift,
        VirtualKey::LCONTROL => KeySym::LeftCtrl,
        VirtualKey::RCONTROL => KeySym::RightCtrl,
        VirtualKey::LMENU => KeySym::LeftAlt,
        VirtualKey::RMENU => KeySym::RightAlt,
        VirtualKey::OEM_4 => return Some(KeyEvent::ch('[')),
        VirtualKey(code @ 0x60..=0x69) => keypad_digit(code),
        VirtualKey(code @ 0x70..=0x87) => KeySym::F((code - 0x70 + 1) as u8),
        _ => return None,
    };
    Some(KeyEvent::sym(sym))
}

fn keypad_digit(code: u16) -> KeySym {
    match code - 0x60 {
        0 => KeySym::Kp0,
        1 => KeySym::Kp1,
        2 => KeySym::Kp2,
        3 => KeySym::Kp3,
        4 => KeySym::Kp4,
        5 => KeySym::Kp5,
        6 => KeySym::Kp6,
        7 => KeySym::Kp7,
        8 => KeySym::Kp8,
        _ => KeySym::Kp9,
    }
}

/// Character key for a Ctrl keystroke with no virtual-key table entry.
///
/// The console reports the C0 byte the keystroke would produce; this maps
/// it back to the printable key.
fn ctrl_char_key(ch: Option<char>, vk: VirtualKey) -> KeyEvent {
    let mut key = match ch {
        Some('@') => KeyEvent::ch('@'),
        Some(c @ '\x01'..='\x1a') => KeyEvent::ch((b'a' + c as u8 - 1) as char),
        Some('\x1b') => KeyEvent::ch(']'),
        Some('\x1c') => KeyEvent::ch('\\'),
        Some('\x1f') => KeyEvent::ch('_'),
        _ => KeyEvent::empty(),
    };
    if vk == VirtualKey::OEM_4 {
        key = KeyEvent::ch('[');
    }
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(virtual_key: VirtualKey) -> KeyRecord {
        KeyRecord {
            virtual_key,
            scan_code: 0,
            ch: None,
            key_down: true,
            control_keys: ControlKeyState::empty(),
            repeat_count: 1,
        }
    }

    #[test]
    fn named_keys_translate() {
        assert_eq!(
            translate_key_record(&record(VirtualKey::RETURN)),
            Some(Event::KeyDown(KeyEvent::sym(KeySym::Enter)))
        );
        assert_eq!(
            translate_key_record(&record(VirtualKey::F1)),
            Some(Event::KeyDown(KeyEvent::sym(KeySym::F(1))))
        );
        assert_eq!(
            translate_key_record(&record(VirtualKey(0x87))),
            Some(Event::KeyDown(KeyEvent::sym(KeySym::F(24))))
        );
        assert_eq!(
            translate_key_record(&record(VirtualKey(0x63))),
            Some(Event::KeyDown(KeyEvent::sym(KeySym::Kp3)))
        );
        assert_eq!(
            translate_key_record(&record(VirtualKey::SPACE)),
            Some(Event::KeyDown(KeyEvent::sym_char(KeySym::Space, ' ')))
        );
    }

    #[test]
    fn plain_character_record() {
        let rec = KeyRecord {
            ch: Some('q'),
            ..record(VirtualKey(0x51))
        };
        assert_eq!(
            translate_key_record(&rec),
            Some(Event::KeyDown(KeyEvent::ch('q')))
        );
    }

    #[test]
    fn modifiers_layer_from_control_state() {
        let rec = KeyRecord {
            control_keys: ControlKeyState::LEFT_CTRL_PRESSED | ControlKeyState::SHIFT_PRESSED,
            ..record(VirtualKey::UP)
        };
        assert_eq!(
            translate_key_record(&rec),
            Some(Event::KeyDown(
                KeyEvent::sym(KeySym::Up).with_mods(Modifiers::CTRL | Modifiers::SHIFT)
            ))
        );
    }

    #[test]
    fn ctrl_character_maps_back_to_letter() {
        // Ctrl+C arrives as the ETX byte with a letter-key virtual code.
        let rec = KeyRecord {
            ch: Some('\x03'),
            control_keys: ControlKeyState::RIGHT_CTRL_PRESSED,
            ..record(VirtualKey(0x43))
        };
        assert_eq!(
            translate_key_record(&rec),
            Some(Event::KeyDown(
                KeyEvent::ch('c').with_mods(Modifiers::CTRL)
            ))
        );
    }

    #[test]
    fn oem_4_is_left_bracket_with_and_without_ctrl() {
        let plain = record(VirtualKey::OEM_4);
        assert_eq!(
            translate_key_record(&plain),
            Some(Event::KeyDown(KeyEvent::ch('[')))
        );

        let ctrl = KeyRecord {
            ch: Some('\x1b'),
            control_keys: ControlKeyState::LEFT_CTRL_PRESSED,
            ..record(VirtualKey::OEM_4)
        };
        assert_eq!(
            translate_key_record(&ctrl),
            Some(Event::KeyDown(
                KeyEvent::ch('[').with_mods(Modifiers::CTRL)
            ))
        );
    }

    #[test]
    fn lock_state_only_records_are_dropped() {
        let rec = KeyRecord {
            control_keys: ControlKeyState::NUMLOCK_ON,
            ..record(VirtualKey(0x00))
        };
        assert_eq!(translate_key_record(&rec), None);

        // A real key with a lock bit on still translates.
        let rec = KeyRecord {
            control_keys: ControlKeyState::CAPSLOCK_ON,
            ..record(VirtualKey::RETURN)
        };
        assert_eq!(
            translate_key_record(&rec),
            Some(Event::KeyDown(KeyEvent::sym(KeySym::Enter)))
        );
    }

    #[test]
    fn key_up_records_release() {
        let rec = KeyRecord {
            key_down: false,
            ..record(VirtualKey::ESCAPE)
        };
        assert_eq!(
            translate_key_record(&rec),
            Some(Event::KeyUp(KeyEvent::sym(KeySym::Escape)))
        );
    }

    #[test]
    fn repeat_count_expands_to_multi() {
        let rec = KeyRecord {
            control_keys: ControlKeyState::LEFT_CTRL_PRESSED,
            repeat_count: 3,
            ..record(VirtualKey::RETURN)
        };
        let expected = KeyEvent {
            sym: Some(KeySym::Enter),
            ch: None,
            mods: Modifiers::CTRL,
            is_repeat: true,
        };
        match translate_key_record(&rec) {
            Some(Event::Multi(events)) => {
                assert_eq!(events.len(), 3);
                for ev in events {
                    assert_eq!(ev, Event::KeyDown(expected));
                }
            }
            other => panic!("expected Multi, got {other:?}"),
        }
    }

    #[test]
    fn repeat_flag_set_only_above_one() {
        let rec = record(VirtualKey::TAB);
        match translate_key_record(&rec) {
            Some(Event::KeyDown(key)) => assert!(!key.is_repeat),
            other => panic!("expected KeyDown, got {other:?}"),
        }
    }
}
