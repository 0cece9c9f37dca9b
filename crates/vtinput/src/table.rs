#![forbid(unsafe_code)]

//! The sequence-to-key prefix table.
//!
//! Built once per [`Driver`](crate::driver::Driver) and immutable afterwards.
//! Construction is deterministic and proceeds in phases, later phases
//! overwriting earlier entries where they collide:
//!
//! 1. C0 control bytes, SP, and DEL (five bytes are flag-dependent).
//! 2. VT100/VT220 fixed sequences: cursor keys in both normal and
//!    application mode, the keypad application set, and the `CSI n ~`
//!    editing/function families.
//! 3. XTerm PC-style modifier expansion over all 15 modifier combinations,
//!    including the `CSI 27 ; m ; code ~` modifyOtherKeys forms.
//! 4. URxvt aliases: shift/ctrl arrows and the `$`/`^`/`@` tilde suffixes.
//! 5. Alt duplication: every entry gains an ESC-prefixed variant with Alt
//!    layered on. Runs last so it covers all previous phases; the terminfo
//!    overlay (applied by the driver afterwards) deliberately does not get
//!    Alt variants.
//!
//! Lookup is longest-prefix match, bounded by the longest stored sequence.
//! Invariant: no stored key is empty, and every key begins with ESC, a C0
//! byte, SP, or DEL.

use std::collections::HashMap;

use bitflags::bitflags;

use crate::key::{KeyEvent, KeySym, Modifiers};

bitflags! {
    /// Table construction policy, supplied once at driver construction.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Flags: u16 {
        /// Report NUL as `ctrl+@` instead of `ctrl+space`.
        const CTRL_AT = 1 << 0;
        /// Report NUL and SP with a plain `' '` character.
        const SPACE = 1 << 1;
        /// Report HT as `ctrl+i` instead of the Tab symbol.
        const CTRL_I = 1 << 2;
        /// Report CR as `ctrl+m` instead of the Enter symbol.
        const CTRL_M = 1 << 3;
        /// Report ESC as `ctrl+[` instead of the Escape symbol.
        const CTRL_OPEN_BRACKET = 1 << 4;
        /// Report DEL as Delete instead of Backspace.
        const BACKSPACE = 1 << 5;
        /// Report `CSI 1 ~` as Find instead of Home.
        const FIND = 1 << 6;
        /// Report `CSI 4 ~` as Select instead of End.
        const SELECT = 1 << 7;
        /// Skip the XTerm modifier expansion phase.
        const NO_XTERM = 1 << 8;
        /// Skip the terminfo overlay even when an accessor is supplied.
        const NO_TERMINFO = 1 << 9;
    }
}

/// CSI/SS3 function finals shared by the fixed tables, the XTerm modifier
/// expansion, and the dynamic parser.
pub(crate) const CSI_FUNC_KEYS: [(u8, KeySym); 11] = [
    (b'A', KeySym::Up),
    (b'B', KeySym::Down),
    (b'C', KeySym::Right),
    (b'D', KeySym::Left),
    (b'E', KeySym::Begin),
    (b'F', KeySym::End),
    (b'H', KeySym::Home),
    (b'P', KeySym::F(1)),
    (b'Q', KeySym::F(2)),
    (b'R', KeySym::F(3)),
    (b'S', KeySym::F(4)),
];

/// SS3 keypad application finals.
pub(crate) const SS3_KEYPAD_KEYS: [(u8, KeySym); 18] = [
    (b'M', KeySym::KpEnter),
    (b'X', KeySym::KpEqual),
    (b'j', KeySym::KpMul),
    (b'k', KeySym::KpPlus),
    (b'l', KeySym::KpComma),
    (b'm', KeySym::KpMinus),
    (b'n', KeySym::KpPeriod),
    (b'o', KeySym::KpDiv),
    (b'p', KeySym::Kp0),
    (b'q', KeySym::Kp1),
    (b'r', KeySym::Kp2),
    (b's', KeySym::Kp3),
    (b't', KeySym::Kp4),
    (b'u', KeySym::Kp5),
    (b'v', KeySym::Kp6),
    (b'w', KeySym::Kp7),
    (b'x', KeySym::Kp8),
    (b'y', KeySym::Kp9),
];

/// First parameters of the `CSI n ~` family. 9, 10, 16, 22, 27, 30 are not
/// assigned.
pub(crate) const TILDE_CODES: [u16; 28] = [
    1, 2, 3, 4, 5, 6, 7, 8, 11, 12, 13, 14, 15, 17, 18, 19, 20, 21, 23, 24, 25, 26, 28, 29, 31,
    32, 33, 34,
];

/// `CSI 27 ; m ; code ~` control codes with fixed key meanings.
pub(crate) const MODIFY_OTHER_KEYS: [(u16, KeySym); 5] = [
    (8, KeySym::Backspace),
    (9, KeySym::Tab),
    (13, KeySym::Enter),
    (27, KeySym::Escape),
    (127, KeySym::Backspace),
];

/// Key event for a `CSI n ~` first parameter, honoring the Find/Select flags.
pub(crate) fn tilde_key(code: u16, flags: Flags) -> Option<KeyEvent> {
    let sym = match code {
        1 if flags.contains(Flags::FIND) => KeySym::Find,
        1 | 7 => KeySym::Home,
        2 => KeySym::Insert,
        3 => KeySym::Delete,
        4 if flags.contains(Flags::SELECT) => KeySym::Select,
        4 | 8 => KeySym::End,
        5 => KeySym::PgUp,
        6 => KeySym::PgDown,
        11..=15 => KeySym::F((code - 10) as u8),
        17..=21 => KeySym::F((code - 11) as u8),
        23..=26 => KeySym::F((code - 12) as u8),
        28 | 29 => KeySym::F((code - 13) as u8),
        31..=34 => KeySym::F((code - 14) as u8),
        _ => return None,
    };
    Some(KeyEvent::sym(sym))
}

/// Symbol for a CSI function final byte (`A`..`H`, `P`..`S`).
pub(crate) fn csi_func_sym(fin: u8) -> Option<KeySym> {
    CSI_FUNC_KEYS
        .iter()
        .find(|(b, _)| *b == fin)
        .map(|(_, sym)| *sym)
}

/// Symbol for an SS3 final byte: function finals plus the keypad set.
pub(crate) fn ss3_sym(fin: u8) -> Option<KeySym> {
    csi_func_sym(fin).or_else(|| {
        SS3_KEYPAD_KEYS
            .iter()
            .find(|(b, _)| *b == fin)
            .map(|(_, sym)| *sym)
    })
}

/// Fixed symbol for a modifyOtherKeys control code.
pub(crate) fn modify_other_key(code: u16) -> Option<KeySym> {
    MODIFY_OTHER_KEYS
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, sym)| *sym)
}

/// Prefix map from byte sequences to key events.
#[derive(Debug, Clone)]
pub(crate) struct SeqTable {
    map: HashMap<Vec<u8>, KeyEvent>,
    max_len: usize,
}

impl SeqTable {
    /// Build the table for the given capability flags (phases 1-5).
    pub(crate) fn new(flags: Flags) -> Self {
        let mut table = Self {
            map: HashMap::with_capacity(2048),
            max_len: 0,
        };
        table.register_controls(flags);
        table.register_vt_keys(flags);
        if !flags.contains(Flags::NO_XTERM) {
            table.register_xterm_modifiers(flags);
        }
        table.register_urxvt_keys(flags);
        table.register_alt_variants();
        table
    }

    /// Insert or overwrite one sequence.
    pub(crate) fn insert(&mut self, seq: impl Into<Vec<u8>>, key: KeyEvent) {
        let seq = seq.into();
        debug_assert!(!seq.is_empty(), "table keys must be non-empty");
        debug_assert!(
            matches!(seq[0], 0x00..=0x20 | 0x7f),
            "table keys must start with ESC, a C0 byte, SP, or DEL"
        );
        self.max_len = self.max_len.max(seq.len());
        self.map.insert(seq, key);
    }

    /// Longest stored prefix of `buf`, with its length in bytes.
    pub(crate) fn lookup_longest(&self, buf: &[u8]) -> Option<(KeyEvent, usize)> {
        let mut n = buf.len().min(self.max_len);
        while n > 0 {
            if let Some(key) = self.map.get(&buf[..n]) {
                return Some((*key, n));
            }
            n -= 1;
        }
        None
    }

    /// Number of stored sequences.
    pub(crate) fn len(&self) -> usize {
        self.map.len()
    }

    /// All stored sequences.
    #[cfg(test)]
    pub(crate) fn iter(&self) -> impl Iterator<Item = (&[u8], &KeyEvent)> {
        self.map.iter().map(|(seq, key)| (seq.as_slice(), key))
    }

    /// Phase 1: C0 controls, SP, DEL.
    fn register_controls(&mut self, flags: Flags) {
        let mut nul = KeyEvent::sym(KeySym::Space).with_mods(Modifiers::CTRL);
        if flags.contains(Flags::SPACE) {
            nul = KeyEvent::ch(' ').with_mods(Modifiers::CTRL);
        }
        if flags.contains(Flags::CTRL_AT) {
            nul = KeyEvent::ch('@').with_mods(Modifiers::CTRL);
        }
        let tab = if flags.contains(Flags::CTRL_I) {
            KeyEvent::ch('i').with_mods(Modifiers::CTRL)
        } else {
            KeyEvent::sym(KeySym::Tab)
        };
        let enter = if flags.contains(Flags::CTRL_M) {
            KeyEvent::ch('m').with_mods(Modifiers::CTRL)
        } else {
            KeyEvent::sym(KeySym::Enter)
        };
        let esc = if flags.contains(Flags::CTRL_OPEN_BRACKET) {
            KeyEvent::ch('[').with_mods(Modifiers::CTRL)
        } else {
            KeyEvent::sym(KeySym::Escape)
        };
        let sp = if flags.contains(Flags::SPACE) {
            KeyEvent::ch(' ')
        } else {
            KeyEvent::sym_char(KeySym::Space, ' ')
        };
        let del = if flags.contains(Flags::BACKSPACE) {
            KeyEvent::sym(KeySym::Delete)
        } else {
            KeyEvent::sym(KeySym::Backspace)
        };

        // SOH..SUB as ctrl+a..ctrl+z; HT, CR, and later ESC get overridden.
        for b in 0x01..=0x1a_u8 {
            let c = (b'a' + b - 1) as char;
            self.insert([b], KeyEvent::ch(c).with_mods(Modifiers::CTRL));
        }
        self.insert([0x1c], KeyEvent::ch('\\').with_mods(Modifiers::CTRL));
        self.insert([0x1d], KeyEvent::ch(']').with_mods(Modifiers::CTRL));
        self.insert([0x1e], KeyEvent::ch('^').with_mods(Modifiers::CTRL));
        self.insert([0x1f], KeyEvent::ch('_').with_mods(Modifiers::CTRL));

        self.insert([0x00], nul);
        self.insert([0x09], tab);
        self.insert([0x0d], enter);
        self.insert([0x1b], esc);
        self.insert([0x20], sp);
        self.insert([0x7f], del);
    }

    /// Phase 2: VT100/VT220 fixed sequences.
    fn register_vt_keys(&mut self, flags: Flags) {
        self.insert(b"\x1b[Z", KeyEvent::sym(KeySym::Tab).with_mods(Modifiers::SHIFT));

        for code in TILDE_CODES {
            if let Some(key) = tilde_key(code, flags) {
                self.insert(format!("\x1b[{code}~").into_bytes(), key);
            }
        }

        // Cursor keys and PF1-PF4 in normal (CSI) and application (SS3) mode.
        for (fin, sym) in CSI_FUNC_KEYS {
            self.insert(vec![0x1b, b'[', fin], KeyEvent::sym(sym));
            self.insert(vec![0x1b, b'O', fin], KeyEvent::sym(sym));
        }

        // Keypad application mode (DECKPAM).
        for (fin, sym) in SS3_KEYPAD_KEYS {
            self.insert(vec![0x1b, b'O', fin], KeyEvent::sym(sym));
        }
    }

    /// Phase 3: XTerm PC-style modifier expansion.
    fn register_xterm_modifiers(&mut self, flags: Flags) {
        for bits in 1..=15u8 {
            let mods = Modifiers::from_bits_truncate(bits);
            let wire = mods.wire();

            for (fin, sym) in CSI_FUNC_KEYS {
                let mut seq = format!("\x1b[1;{wire}").into_bytes();
                seq.push(fin);
                self.insert(seq, KeyEvent::sym(sym).with_mods(mods));
            }
            for (fin, sym) in SS3_KEYPAD_KEYS {
                let mut seq = format!("\x1bO{wire}").into_bytes();
                seq.push(fin);
                self.insert(seq, KeyEvent::sym(sym).with_mods(mods));
            }
            for code in TILDE_CODES {
                if let Some(key) = tilde_key(code, flags) {
                    self.insert(
                        format!("\x1b[{code};{wire}~").into_bytes(),
                        key.with_mods(mods),
                    );
                }
            }
            for (code, sym) in MODIFY_OTHER_KEYS {
                self.insert(
                    format!("\x1b[27;{wire};{code}~").into_bytes(),
                    KeyEvent::sym(sym).with_mods(mods),
                );
            }
        }
    }

    /// Phase 4: URxvt aliases.
    ///
    /// The `$`/`^`/`@` expansion over the tilde family also yields the URxvt
    /// function-key rows (shift F11-F20 via `23$`..`34$`, ctrl F1-F20 via
    /// `11^`..`34^`, shift+ctrl via `@`), including the documented overlap
    /// where shift F1/F2 land on F11/F12.
    fn register_urxvt_keys(&mut self, flags: Flags) {
        self.insert(b"\x1b[a", KeyEvent::sym(KeySym::Up).with_mods(Modifiers::SHIFT));
        self.insert(b"\x1b[b", KeyEvent::sym(KeySym::Down).with_mods(Modifiers::SHIFT));
        self.insert(b"\x1b[c", KeyEvent::sym(KeySym::Right).with_mods(Modifiers::SHIFT));
        self.insert(b"\x1b[d", KeyEvent::sym(KeySym::Left).with_mods(Modifiers::SHIFT));
        self.insert(b"\x1bOa", KeyEvent::sym(KeySym::Up).with_mods(Modifiers::CTRL));
        self.insert(b"\x1bOb", KeyEvent::sym(KeySym::Down).with_mods(Modifiers::CTRL));
        self.insert(b"\x1bOc", KeyEvent::sym(KeySym::Right).with_mods(Modifiers::CTRL));
        self.insert(b"\x1bOd", KeyEvent::sym(KeySym::Left).with_mods(Modifiers::CTRL));

        for code in TILDE_CODES {
            let Some(key) = tilde_key(code, flags) else {
                continue;
            };
            self.insert(
                format!("\x1b[{code}$").into_bytes(),
                key.with_mods(Modifiers::SHIFT),
            );
            self.insert(
                format!("\x1b[{code}^").into_bytes(),
                key.with_mods(Modifiers::CTRL),
            );
            self.insert(
                format!("\x1b[{code}@").into_bytes(),
                key.with_mods(Modifiers::SHIFT.union(Modifiers::CTRL)),
            );
        }
    }

    /// Phase 5: ESC-prefix-as-Alt duplication of every entry so far.
    fn register_alt_variants(&mut self) {
        let entries: Vec<(Vec<u8>, KeyEvent)> = self
            .map
            .iter()
            .map(|(seq, key)| (seq.clone(), *key))
            .collect();
        for (seq, mut key) in entries {
            key.mods |= Modifiers::ALT;
            let mut alt_seq = Vec::with_capacity(seq.len() + 1);
            alt_seq.push(0x1b);
            alt_seq.extend_from_slice(&seq);
            self.insert(alt_seq, key);
        }
    }
}
