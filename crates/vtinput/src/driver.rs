#![forbid(unsafe_code)]

//! The decoder facade.
//!
//! A [`Driver`] owns the prefix table and the capability flags. The caller
//! owns the input buffer and the read loop: it hands the driver a byte
//! slice, receives `(event, consumed)` back, compacts the buffer, and
//! decides when to block for more bytes.
//!
//! Decode order per call:
//!
//! 1. Longest table prefix match (complete sequences known up front).
//! 2. For ESC-led buffers that open a CSI/SS3/OSC/DCS sequence, the dynamic
//!    parser, which may answer "need more input" as `(None, 0)`.
//! 3. Otherwise one literal UTF-8 character, with Alt layered on when a lone
//!    ESC precedes it.
//!
//! After construction the driver is read-only; sharing it across threads and
//! decoding concurrently is safe as long as callers do not share a buffer.

use crate::console::{self, KeyRecord};
use crate::event::Event;
use crate::key::{KeyEvent, Modifiers};
use crate::sequence::{self, Scan};
use crate::table::{Flags, SeqTable};
use crate::terminfo::{self, TerminfoSource};

/// Escape-sequence decoder for one terminal session.
#[derive(Debug, Clone)]
pub struct Driver {
    table: SeqTable,
    flags: Flags,
}

impl Driver {
    /// Build a driver from capability flags alone.
    #[must_use]
    pub fn new(flags: Flags) -> Self {
        let table = SeqTable::new(flags);
        #[cfg(feature = "tracing")]
        tracing::debug!(sequences = table.len(), ?flags, "input table built");
        Self { table, flags }
    }

    /// Build a driver and overlay terminfo-derived sequences.
    ///
    /// The accessor is only queried here; it is not retained. The overlay
    /// runs after Alt duplication, so terminfo sequences get no automatic
    /// Alt variants. `Flags::NO_TERMINFO` skips the overlay entirely.
    #[must_use]
    pub fn with_terminfo(flags: Flags, source: &dyn TerminfoSource) -> Self {
        let mut driver = Self::new(flags);
        if !flags.contains(Flags::NO_TERMINFO) {
            terminfo::overlay_keys(&mut driver.table, source);
        }
        driver
    }

    /// The capability flags supplied at construction.
    #[must_use]
    pub const fn flags(&self) -> Flags {
        self.flags
    }

    /// Number of sequences in the key table.
    #[must_use]
    pub fn sequence_count(&self) -> usize {
        self.table.len()
    }

    /// Decode one event from the front of `buf`.
    ///
    /// Returns the event and how many bytes it consumed. `(None, 0)` means
    /// the buffer ends inside a sequence: read more bytes and call again
    /// with the extended buffer. An empty buffer also returns `(None, 0)`.
    pub fn decode(&self, buf: &[u8]) -> (Option<Event>, usize) {
        if buf.is_empty() {
            return (None, 0);
        }

        if buf[0] == 0x1b && buf.len() >= 2 {
            // Multi-byte table entries first; the bare ESC entry must not
            // shadow a sequence in progress.
            if let Some((key, n)) = self.table.lookup_longest(buf) {
                if n >= 2 {
                    return (Some(Event::KeyDown(key)), n);
                }
            }
            if sequence::is_introducer(buf[1]) {
                return match sequence::parse(buf, self.flags) {
                    Scan::Event(event, n) => {
                        #[cfg(feature = "tracing")]
                        if let Event::UnknownCsi(bytes)
                        | Event::UnknownSs3(bytes)
                        | Event::UnknownOsc(bytes)
                        | Event::UnknownDcs(bytes) = &event
                        {
                            tracing::trace!(?bytes, "unrecognized sequence");
                        }
                        (Some(event), n)
                    }
                    Scan::More => (None, 0),
                };
            }
            // Lone ESC before a literal reads as Alt+character.
            return match first_char(&buf[1..]) {
                CharScan::Char(ch, len) => (
                    Some(Event::KeyDown(
                        KeyEvent::ch(ch).with_mods(Modifiers::ALT),
                    )),
                    1 + len,
                ),
                CharScan::More => (None, 0),
                CharScan::Invalid => (
                    Some(Event::KeyDown(
                        KeyEvent::ch(char::REPLACEMENT_CHARACTER).with_mods(Modifiers::ALT),
                    )),
                    2,
                ),
            };
        }

        // Single C0 bytes, DEL, SP, and a lone trailing ESC land here.
        if let Some((key, n)) = self.table.lookup_longest(buf) {
            return (Some(Event::KeyDown(key)), n);
        }

        match first_char(buf) {
            CharScan::Char(ch, len) => (Some(Event::KeyDown(KeyEvent::ch(ch))), len),
            CharScan::More => (None, 0),
            CharScan::Invalid => (
                Some(Event::KeyDown(KeyEvent::ch(char::REPLACEMENT_CHARACTER))),
                1,
            ),
        }
    }

    /// Translate a console key record (Windows path).
    ///
    /// Records reach the driver already typed; no escape bytes cross this
    /// boundary. Returns `None` for lock-state-only records.
    #[must_use]
    pub fn decode_key_record(&self, record: &KeyRecord) -> Option<Event> {
        console::translate_key_record(record)
    }
}

/// One UTF-8 character at the front of a buffer.
enum CharScan {
    /// A complete character and its encoded length.
    Char(char, usize),
    /// The buffer ends inside the character.
    More,
    /// The bytes are not valid UTF-8.
    Invalid,
}

fn first_char(buf: &[u8]) -> CharScan {
    let Some(&lead) = buf.first() else {
        return CharScan::More;
    };
    let len = match lead {
        0x00..=0x7f => 1,
        0xc0..=0xdf => 2,
        0xe0..=0xef => 3,
        0xf0..=0xf7 => 4,
        _ => return CharScan::Invalid,
    };
    if buf.len() < len {
        return CharScan::More;
    }
    match std::str::from_utf8(&buf[..len]) {
        Ok(s) => match s.chars().next() {
            Some(ch) => CharScan::Char(ch, len),
            None => CharScan::Invalid,
        },
        Err(_) => CharScan::Invalid,
    }
}
