//! Property-based invariant tests for the input decoder.
//!
//! These verify laws that must hold for any valid inputs:
//!
//! 1. The XTerm modifier wire encoding round-trips for all bitsets.
//! 2. `CSI 1 ; m F` decodes to the function key with exactly the modifiers
//!    whose wire encoding is `m`, for every modifier combination.
//! 3. Function-key encode/decode round-trips across the CSI and tilde forms.
//! 4. The Alt-duplication law: prefixing ESC adds exactly Alt.
//! 5. SGR mouse coordinates always decode as `wire - 1`.
//! 6. Wheel events never decode as a release, whatever the terminator.
//! 7. Mouse button-bit decomposition is invertible.
//! 8. Color replies round-trip through the `#rrggbb` display form.
//! 9. Decoding arbitrary bytes never panics, never over-consumes, and only
//!    stalls at a (possibly open) sequence boundary.

use proptest::prelude::*;
use vtinput::{
    mouse, Driver, Event, Flags, KeyEvent, KeySym, Modifiers, MouseButton, MouseEvent,
};

// ── Helpers ─────────────────────────────────────────────────────────────

fn modifier_strategy() -> impl Strategy<Value = Modifiers> {
    (0u8..16).prop_map(Modifiers::from_bits_truncate)
}

/// Wire form of a function key press, as XTerm emits it.
fn encode_fkey(n: u8, mods: Modifiers) -> Vec<u8> {
    assert!((1..=20).contains(&n));
    if n <= 4 {
        let fin = [b'P', b'Q', b'R', b'S'][usize::from(n - 1)];
        let mut seq = if mods.is_empty() {
            vec![0x1b, b'O']
        } else {
            format!("\x1b[1;{}", mods.wire()).into_bytes()
        };
        seq.push(fin);
        return seq;
    }
    let code = match n {
        5 => 15,
        6..=10 => u16::from(n) + 11,
        11..=14 => u16::from(n) + 12,
        15 | 16 => u16::from(n) + 13,
        _ => u16::from(n) + 14,
    };
    if mods.is_empty() {
        format!("\x1b[{code}~").into_bytes()
    } else {
        format!("\x1b[{code};{}~", mods.wire()).into_bytes()
    }
}

/// Rebuild a button byte from its decomposed parts.
fn encode_button(parts: &mouse::ButtonParts) -> u16 {
    let mut b = 0u16;
    if parts.mods.contains(Modifiers::SHIFT) {
        b |= 0x04;
    }
    if parts.mods.contains(Modifiers::ALT) {
        b |= 0x08;
    }
    if parts.mods.contains(Modifiers::CTRL) {
        b |= 0x10;
    }
    if parts.is_motion {
        b |= 0x20;
    }
    b |= match parts.button {
        MouseButton::Left => 0,
        MouseButton::Middle => 1,
        MouseButton::Right => 2,
        MouseButton::None => 3,
        MouseButton::WheelUp => 0x40,
        MouseButton::WheelDown => 0x41,
        MouseButton::WheelLeft => 0x42,
        MouseButton::WheelRight => 0x43,
        MouseButton::Backward => 0x80,
        MouseButton::Forward => 0x81,
        MouseButton::Button10 => 0x82,
        MouseButton::Button11 => 0x83,
    };
    b
}

// ═════════════════════════════════════════════════════════════════════════
// 1. + 2. Modifier wire encoding
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn modifier_wire_round_trips_exhaustively() {
    for bits in 0u8..16 {
        let mods = Modifiers::from_bits_truncate(bits);
        assert_eq!(Modifiers::from_wire(mods.wire()), mods);
    }
}

#[test]
fn every_modifier_combination_decodes_on_up_arrow() {
    let d = Driver::new(Flags::empty());
    for bits in 1u8..16 {
        let mods = Modifiers::from_bits_truncate(bits);
        let seq = format!("\x1b[1;{}A", mods.wire()).into_bytes();
        assert_eq!(
            d.decode(&seq),
            (
                Some(Event::KeyDown(KeyEvent::sym(KeySym::Up).with_mods(mods))),
                seq.len()
            ),
            "wire {}",
            mods.wire()
        );
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Function-key round-trip
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn fkey_encode_decode_round_trips(n in 1u8..=20, mods in modifier_strategy()) {
        let d = Driver::new(Flags::empty());
        let seq = encode_fkey(n, mods);
        let (event, consumed) = d.decode(&seq);
        prop_assert_eq!(consumed, seq.len());
        prop_assert_eq!(
            event,
            Some(Event::KeyDown(KeyEvent::sym(KeySym::F(n)).with_mods(mods)))
        );
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Alt-duplication law
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn esc_prefix_adds_exactly_alt(n in 1u8..=20, mods in modifier_strategy()) {
        let d = Driver::new(Flags::empty());
        let seq = encode_fkey(n, mods);
        let mut alt_seq = vec![0x1b];
        alt_seq.extend_from_slice(&seq);

        let (event, consumed) = d.decode(&alt_seq);
        prop_assert_eq!(consumed, alt_seq.len());
        prop_assert_eq!(
            event,
            Some(Event::KeyDown(
                KeyEvent::sym(KeySym::F(n)).with_mods(mods | Modifiers::ALT)
            ))
        );
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. SGR coordinate normalization
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn sgr_coordinates_are_wire_minus_one(x in 1u16..=5000, y in 1u16..=5000) {
        let d = Driver::new(Flags::empty());
        let seq = format!("\x1b[<0;{x};{y}M").into_bytes();
        let (event, consumed) = d.decode(&seq);
        prop_assert_eq!(consumed, seq.len());
        prop_assert_eq!(
            event,
            Some(Event::MouseDown(MouseEvent::new(x - 1, y - 1, MouseButton::Left)))
        );
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Wheels never release
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn wheel_never_releases(bits in 0u16..64, release in any::<bool>()) {
        // Any button byte in the wheel region (bit 6 set, bit 7 clear).
        let b = (bits & 0b0011_1111) | 0x40;
        let event = mouse::parse_sgr(b, 5, 5, release);
        prop_assert!(
            matches!(event, Event::MouseDown(m) if m.is_wheel()),
            "wheel byte {b:#x} produced {event:?}"
        );
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 7. Button decomposition is invertible
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn button_decomposition_round_trips(b in 0u16..256) {
        let parts = mouse::decode_button(b);
        let rebuilt = encode_button(&parts);
        prop_assert_eq!(
            mouse::decode_button(rebuilt),
            parts,
            "byte {:#x} rebuilt as {:#x}",
            b,
            rebuilt
        );
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 8. Color display round-trip
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn color_reply_round_trips_through_hex(r in any::<u8>(), g in any::<u8>(), b in any::<u8>()) {
        let d = Driver::new(Flags::empty());
        let seq = format!(
            "\x1b]11;rgb:{r:02x}{r:02x}/{g:02x}{g:02x}/{b:02x}{b:02x}\x07"
        )
        .into_bytes();
        match d.decode(&seq) {
            (Some(Event::BackgroundColor(color)), _) => {
                prop_assert_eq!(color.to_string(), format!("#{r:02x}{g:02x}{b:02x}"));
            }
            other => prop_assert!(false, "expected BackgroundColor, got {:?}", other),
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 9. No panics, no over-consumption, no mid-buffer stalls
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn decode_is_total_over_arbitrary_bytes(bytes in proptest::collection::vec(any::<u8>(), 0..256)) {
        let d = Driver::new(Flags::empty());
        let mut offset = 0;
        while offset < bytes.len() {
            let rest = &bytes[offset..];
            let (event, consumed) = d.decode(rest);
            prop_assert!(consumed <= rest.len(), "over-consumed at {offset}");
            if consumed == 0 {
                // Only an open escape sequence or a split UTF-8 character at
                // the end of the buffer may ask for more input.
                prop_assert!(event.is_none());
                prop_assert!(
                    rest[0] == 0x1b || rest[0] >= 0xc0,
                    "stall on byte {:#x}",
                    rest[0]
                );
                break;
            }
            offset += consumed;
        }
    }
}
