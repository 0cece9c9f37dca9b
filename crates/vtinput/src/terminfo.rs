#![forbid(unsafe_code)]

//! Terminfo overlay.
//!
//! The decoder never reads the terminfo database itself; the caller hands it
//! a read-only accessor, queried once during driver construction. Returned
//! sequences overwrite earlier table entries. The overlay runs after Alt
//! duplication, so terminfo-derived sequences do not get automatic Alt
//! variants.

use crate::key::{KeyEvent, KeySym, Modifiers};
use crate::table::SeqTable;

/// Read-only access to terminfo string capabilities.
///
/// Implementations typically wrap a terminfo database crate or a parsed
/// capability dump. `lookup` is only ever called during driver construction.
pub trait TerminfoSource {
    /// The escape sequence for a capability name (`kcuu1`, `kf5`, ...), if
    /// the terminal defines it.
    fn lookup(&self, cap: &str) -> Option<Vec<u8>>;
}

/// Capability names with fixed key meanings.
const CAP_KEYS: [(&str, KeyEvent); 20] = [
    ("kbs", KeyEvent::sym(KeySym::Backspace)),
    ("kbeg", KeyEvent::sym(KeySym::Begin)),
    ("kcub1", KeyEvent::sym(KeySym::Left)),
    ("kcud1", KeyEvent::sym(KeySym::Down)),
    ("kcuf1", KeyEvent::sym(KeySym::Right)),
    ("kcuu1", KeyEvent::sym(KeySym::Up)),
    ("kdch1", KeyEvent::sym(KeySym::Delete)),
    ("kend", KeyEvent::sym(KeySym::End)),
    ("kent", KeyEvent::sym(KeySym::KpEnter)),
    ("kfnd", KeyEvent::sym(KeySym::Find)),
    ("khome", KeyEvent::sym(KeySym::Home)),
    ("kich1", KeyEvent::sym(KeySym::Insert)),
    ("knp", KeyEvent::sym(KeySym::PgDown)),
    ("kpp", KeyEvent::sym(KeySym::PgUp)),
    ("kslt", KeyEvent::sym(KeySym::Select)),
    ("kcbt", KeyEvent::sym(KeySym::Tab).with_mods(Modifiers::SHIFT)),
    ("kLFT", KeyEvent::sym(KeySym::Left).with_mods(Modifiers::SHIFT)),
    ("kRIT", KeyEvent::sym(KeySym::Right).with_mods(Modifiers::SHIFT)),
    ("kri", KeyEvent::sym(KeySym::Up).with_mods(Modifiers::SHIFT)),
    ("kind", KeyEvent::sym(KeySym::Down).with_mods(Modifiers::SHIFT)),
];

/// Overlay terminfo-derived sequences onto the table.
pub(crate) fn overlay_keys(table: &mut SeqTable, source: &dyn TerminfoSource) {
    let mut applied = 0usize;
    for (cap, key) in CAP_KEYS {
        applied += overlay_one(table, source, cap, key);
    }
    for n in 1..=24u8 {
        let cap = format!("kf{n}");
        applied += overlay_one(table, source, &cap, KeyEvent::sym(KeySym::F(n)));
    }
    let _ = applied;
    #[cfg(feature = "tracing")]
    tracing::debug!(applied, "terminfo overlay applied");
}

fn overlay_one(
    table: &mut SeqTable,
    source: &dyn TerminfoSource,
    cap: &str,
    key: KeyEvent,
) -> usize {
    let Some(seq) = source.lookup(cap) else {
        return 0;
    };
    // Reject sequences that would break the table invariant.
    if seq.is_empty() || !matches!(seq[0], 0x00..=0x20 | 0x7f) {
        #[cfg(feature = "tracing")]
        tracing::debug!(cap, "skipping unusable terminfo capability");
        return 0;
    }
    table.insert(seq, key);
    1
}
