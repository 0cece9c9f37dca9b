#![forbid(unsafe_code)]

//! Mouse sequence decoding.
//!
//! Two encodings are supported: SGR (`CSI < b ; x ; y M|m`, decimal
//! parameters, press/release distinguished by the final byte) and legacy X10
//! (`CSI M` followed by three bytes offset by 32). Both share one button-bit
//! layout, decomposed by [`decode_button`].

use crate::event::{Event, MouseButton, MouseEvent};
use crate::key::Modifiers;

/// Shift modifier bit.
const BIT_SHIFT: u16 = 0b0000_0100;
/// Alt modifier bit.
const BIT_ALT: u16 = 0b0000_1000;
/// Ctrl modifier bit.
const BIT_CTRL: u16 = 0b0001_0000;
/// Motion flag; not reported for wheel events.
const BIT_MOTION: u16 = 0b0010_0000;
/// Wheel button region selector.
const BIT_WHEEL: u16 = 0b0100_0000;
/// Additional button region selector (buttons 8-11).
const BIT_ADD: u16 = 0b1000_0000;
/// Low two bits select the button within a region.
const BITS_MASK: u16 = 0b0000_0011;

/// Everything encoded in a mouse button byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonParts {
    /// Modifiers held during the event.
    pub mods: Modifiers,
    /// Selected button; `None` for the X10 release encoding.
    pub button: MouseButton,
    /// True for the X10 release encoding (low bits `0b11`).
    pub is_release: bool,
    /// True when the motion flag is set for a non-wheel button.
    pub is_motion: bool,
}

/// Decompose a mouse button code (offset already removed).
#[must_use]
pub fn decode_button(b: u16) -> ButtonParts {
    let mut mods = Modifiers::empty();
    if b & BIT_SHIFT != 0 {
        mods |= Modifiers::SHIFT;
    }
    if b & BIT_ALT != 0 {
        mods |= Modifiers::ALT;
    }
    if b & BIT_CTRL != 0 {
        mods |= Modifiers::CTRL;
    }

    let low = b & BITS_MASK;
    let mut is_release = false;
    let button = if b & BIT_ADD != 0 {
        match low {
            0 => MouseButton::Backward,
            1 => MouseButton::Forward,
            2 => MouseButton::Button10,
            _ => MouseButton::Button11,
        }
    } else if b & BIT_WHEEL != 0 {
        match low {
            0 => MouseButton::WheelUp,
            1 => MouseButton::WheelDown,
            2 => MouseButton::WheelLeft,
            _ => MouseButton::WheelRight,
        }
    } else {
        match low {
            0 => MouseButton::Left,
            1 => MouseButton::Middle,
            2 => MouseButton::Right,
            _ => {
                // X10 reports a plain release as low bits 0b11.
                is_release = true;
                MouseButton::None
            }
        }
    };

    let is_motion = b & BIT_MOTION != 0 && !button.is_wheel();

    ButtonParts {
        mods,
        button,
        is_release,
        is_motion,
    }
}

/// Build the event for an SGR-encoded mouse report.
///
/// `x` and `y` are the raw 1-indexed wire coordinates; `release` is true
/// when the sequence ended in `m`. Wheel buttons never release, and some
/// terminals report motion with the release terminator, so motion wins over
/// release.
#[must_use]
pub fn parse_sgr(b: u16, x: u16, y: u16, release: bool) -> Event {
    let parts = decode_button(b);
    let ev = MouseEvent::new(x.saturating_sub(1), y.saturating_sub(1), parts.button)
        .with_mods(parts.mods);

    if parts.is_motion {
        Event::MouseMove(ev)
    } else if release && !parts.button.is_wheel() {
        Event::MouseUp(ev)
    } else {
        Event::MouseDown(ev)
    }
}

/// Build the event for an X10-encoded mouse report.
///
/// `payload` holds the three bytes after `CSI M`, each carrying an additive
/// offset of 32. Coordinates are additionally 1-indexed on the wire.
#[must_use]
pub fn parse_x10(payload: [u8; 3]) -> Event {
    let b = u16::from(payload[0]).saturating_sub(32);
    let parts = decode_button(b);

    let x = u16::from(payload[1]).saturating_sub(32).saturating_sub(1);
    let y = u16::from(payload[2]).saturating_sub(32).saturating_sub(1);
    let ev = MouseEvent::new(x, y, parts.button).with_mods(parts.mods);

    if parts.is_motion {
        Event::MouseMove(ev)
    } else if parts.is_release {
        Event::MouseUp(ev)
    } else {
        Event::MouseDown(ev)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sgr_left_click_normalizes_coordinates() {
        let ev = parse_sgr(0, 1, 1, false);
        assert_eq!(
            ev,
            Event::MouseDown(MouseEvent::new(0, 0, MouseButton::Left))
        );
    }

    #[test]
    fn sgr_release_terminator() {
        let ev = parse_sgr(2, 10, 5, true);
        assert_eq!(
            ev,
            Event::MouseUp(MouseEvent::new(9, 4, MouseButton::Right))
        );
    }

    #[test]
    fn sgr_wheel_ignores_release_terminator() {
        for b in [64, 65, 66, 67] {
            let ev = parse_sgr(b, 3, 3, true);
            assert!(
                matches!(ev, Event::MouseDown(m) if m.is_wheel()),
                "wheel code {b} must not release"
            );
        }
    }

    #[test]
    fn sgr_motion_with_button_is_move() {
        let ev = parse_sgr(32, 4, 4, false);
        assert_eq!(
            ev,
            Event::MouseMove(MouseEvent::new(3, 3, MouseButton::Left))
        );
    }

    #[test]
    fn sgr_motion_without_button() {
        let ev = parse_sgr(35, 4, 4, false);
        assert_eq!(
            ev,
            Event::MouseMove(MouseEvent::new(3, 3, MouseButton::None))
        );
    }

    #[test]
    fn sgr_modifier_bits() {
        let ev = parse_sgr(4 | 8 | 16, 2, 2, false);
        match ev {
            Event::MouseDown(m) => {
                assert_eq!(
                    m.mods,
                    Modifiers::SHIFT | Modifiers::ALT | Modifiers::CTRL
                );
            }
            other => panic!("expected MouseDown, got {other:?}"),
        }
    }

    #[test]
    fn x10_left_click_at_origin() {
        let ev = parse_x10([32, 33, 33]);
        assert_eq!(
            ev,
            Event::MouseDown(MouseEvent::new(0, 0, MouseButton::Left))
        );
    }

    #[test]
    fn x10_release_has_no_button() {
        let ev = parse_x10([32 + 3, 40, 40]);
        assert_eq!(
            ev,
            Event::MouseUp(MouseEvent::new(7, 7, MouseButton::None))
        );
    }

    #[test]
    fn x10_motion_wins_over_release_bits() {
        // Motion flag with the release low bits is bare motion, not a release.
        let ev = parse_x10([32 + 32 + 3, 33, 33]);
        assert_eq!(
            ev,
            Event::MouseMove(MouseEvent::new(0, 0, MouseButton::None))
        );
    }

    #[test]
    fn additional_button_region() {
        assert_eq!(decode_button(0x80).button, MouseButton::Backward);
        assert_eq!(decode_button(0x81).button, MouseButton::Forward);
        assert_eq!(decode_button(0x82).button, MouseButton::Button10);
        assert_eq!(decode_button(0x83).button, MouseButton::Button11);
    }

    #[test]
    fn wheel_region_never_flags_motion() {
        let parts = decode_button(BIT_WHEEL | BIT_MOTION);
        assert_eq!(parts.button, MouseButton::WheelUp);
        assert!(!parts.is_motion);
    }
}
