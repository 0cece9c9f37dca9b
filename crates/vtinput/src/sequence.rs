#![forbid(unsafe_code)]

//! Dynamic escape-sequence parsing.
//!
//! The prefix table covers sequences that can be enumerated up front; this
//! module handles the rest: CSI/SS3 forms with arbitrary parameters, both
//! mouse encodings, focus reports, bracketed paste, OSC color replies, and
//! DCS strings. Well-formed sequences with no matching rule come back as
//! `Unknown*` events carrying their raw bytes; a sequence whose terminator
//! has not arrived yet is reported as [`Scan::More`].

use crate::color;
use crate::event::Event;
use crate::key::{KeyEvent, Modifiers};
use crate::mouse;
use crate::table::{self, Flags};

/// End marker of a bracketed paste.
const PASTE_END: &[u8] = b"\x1b[201~";

/// Outcome of a dynamic parse attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Scan {
    /// A complete sequence: the event and the bytes it consumed.
    Event(Event, usize),
    /// The buffer ends mid-sequence; the caller must read more bytes.
    More,
}

/// True for the byte after ESC that starts a dynamic sequence.
pub(crate) const fn is_introducer(b: u8) -> bool {
    matches!(b, b'[' | b'O' | b']' | b'P')
}

/// Parse one sequence from the start of `buf`.
///
/// `buf[0]` must be ESC and `buf[1]` an introducer byte.
pub(crate) fn parse(buf: &[u8], flags: Flags) -> Scan {
    debug_assert!(buf.len() >= 2 && buf[0] == 0x1b && is_introducer(buf[1]));
    match buf.get(1) {
        Some(b'[') => parse_csi(buf, flags),
        Some(b'O') => parse_ss3(buf),
        Some(b']') => parse_osc(buf),
        Some(b'P') => parse_dcs(buf),
        _ => Scan::More,
    }
}

/// CSI: `ESC [ <params> <intermediates> <final>`, plus the mouse and paste
/// special cases.
fn parse_csi(buf: &[u8], flags: Flags) -> Scan {
    // X10 mouse: the final byte arrives immediately, then three raw payload
    // bytes that are not part of the normal CSI grammar.
    if buf.get(2) == Some(&b'M') {
        return match buf.get(3..6) {
            Some(payload) => {
                Scan::Event(mouse::parse_x10([payload[0], payload[1], payload[2]]), 6)
            }
            None => Scan::More,
        };
    }

    let mut i = 2;
    while i < buf.len() && matches!(buf[i], 0x30..=0x3f) {
        i += 1;
    }
    while i < buf.len() && matches!(buf[i], 0x20..=0x2f) {
        i += 1;
    }
    let Some(&fin) = buf.get(i) else {
        return Scan::More;
    };
    if !matches!(fin, 0x40..=0x7e) {
        // Garbage inside the sequence. Emit what was scanned and resume at
        // the offending byte.
        return Scan::Event(Event::UnknownCsi(buf[..i].to_vec()), i);
    }
    let params = &buf[2..i];
    let consumed = i + 1;
    let unknown = || Scan::Event(Event::UnknownCsi(buf[..consumed].to_vec()), consumed);

    // SGR mouse: CSI < b ; x ; y M|m.
    if let Some(rest) = params.strip_prefix(b"<") {
        if fin == b'M' || fin == b'm' {
            return match params_ints(rest).as_deref() {
                Some([b, x, y]) => {
                    Scan::Event(mouse::parse_sgr(*b, *x, *y, fin == b'm'), consumed)
                }
                _ => unknown(),
            };
        }
        return unknown();
    }

    // modifyOtherKeys mode report: CSI > 4 ; mode m.
    if let Some(rest) = params.strip_prefix(b">") {
        if fin == b'm' {
            if let Some([4, mode @ 0..=2]) = params_ints(rest).as_deref() {
                return Scan::Event(Event::ModifyOtherKeysMode(*mode as u8), consumed);
            }
        }
        return unknown();
    }

    match fin {
        b'I' if params.is_empty() => Scan::Event(Event::FocusIn, consumed),
        b'O' if params.is_empty() => Scan::Event(Event::FocusOut, consumed),
        b'~' => parse_csi_tilde(buf, params, consumed, flags),
        _ => match table::csi_func_sym(fin) {
            Some(sym) => match params_ints(params).as_deref() {
                Some([]) => Scan::Event(Event::KeyDown(KeyEvent::sym(sym)), consumed),
                Some([1, m]) => Scan::Event(
                    Event::KeyDown(KeyEvent::sym(sym).with_mods(Modifiers::from_wire(*m))),
                    consumed,
                ),
                _ => unknown(),
            },
            None => unknown(),
        },
    }
}

/// The `CSI n ~` families: editing/function keys, modifyOtherKeys, and
/// bracketed paste.
fn parse_csi_tilde(buf: &[u8], params: &[u8], consumed: usize, flags: Flags) -> Scan {
    let unknown = || Scan::Event(Event::UnknownCsi(buf[..consumed].to_vec()), consumed);
    let Some(ints) = params_ints(params) else {
        return unknown();
    };

    match ints.as_slice() {
        // Paste start: everything up to the end marker is literal content.
        [200] => match find_subslice(&buf[consumed..], PASTE_END) {
            Some(pos) => {
                let content = &buf[consumed..consumed + pos];
                Scan::Event(
                    Event::Paste(String::from_utf8_lossy(content).into_owned()),
                    consumed + pos + PASTE_END.len(),
                )
            }
            None => Scan::More,
        },

        // modifyOtherKeys: CSI 27 ; mod ; code ~. Codes outside the fixed
        // table fall back to a plain character key.
        [27, m, code, ..] => {
            let mods = Modifiers::from_wire(*m);
            match table::modify_other_key(*code) {
                Some(sym) => Scan::Event(
                    Event::KeyDown(KeyEvent::sym(sym).with_mods(mods)),
                    consumed,
                ),
                None => match char::from_u32(u32::from(*code)) {
                    Some(ch) => Scan::Event(
                        Event::KeyDown(KeyEvent::ch(ch).with_mods(mods)),
                        consumed,
                    ),
                    None => unknown(),
                },
            }
        }

        [code, rest @ ..] => match table::tilde_key(*code, flags) {
            Some(key) => {
                let mods = rest
                    .first()
                    .map(|m| Modifiers::from_wire(*m))
                    .unwrap_or_default();
                Scan::Event(Event::KeyDown(key.with_mods(mods)), consumed)
            }
            None => unknown(),
        },

        [] => unknown(),
    }
}

/// SS3: `ESC O <modifier?> <final>`.
fn parse_ss3(buf: &[u8]) -> Scan {
    let mut i = 2;
    while i < buf.len() && buf[i].is_ascii_digit() {
        i += 1;
    }
    let Some(&fin) = buf.get(i) else {
        return Scan::More;
    };
    let consumed = i + 1;
    let digits = &buf[2..i];

    let Some(sym) = table::ss3_sym(fin) else {
        return Scan::Event(Event::UnknownSs3(buf[..consumed].to_vec()), consumed);
    };
    let mods = if digits.is_empty() {
        Modifiers::empty()
    } else {
        match ascii_u16(digits) {
            Some(v) => Modifiers::from_wire(v),
            None => return Scan::Event(Event::UnknownSs3(buf[..consumed].to_vec()), consumed),
        }
    };
    Scan::Event(Event::KeyDown(KeyEvent::sym(sym).with_mods(mods)), consumed)
}

/// OSC: `ESC ] <n> ; <payload> (BEL | ESC \)`. Numbers 10/11/12 are color
/// replies; everything else is carried as unknown.
fn parse_osc(buf: &[u8]) -> Scan {
    let mut i = 2;
    let (end, term_len) = loop {
        match buf.get(i) {
            None => return Scan::More,
            Some(0x07) => break (i, 1),
            Some(0x1b) => match buf.get(i + 1) {
                None => return Scan::More,
                Some(b'\\') => break (i, 2),
                // A lone ESC aborts the string; resume at it.
                Some(_) => return Scan::Event(Event::UnknownOsc(buf[..i].to_vec()), i),
            },
            Some(_) => i += 1,
        }
    };
    let consumed = end + term_len;
    let content = &buf[2..end];
    let unknown = || Scan::Event(Event::UnknownOsc(buf[..consumed].to_vec()), consumed);

    let Some(semi) = content.iter().position(|&b| b == b';') else {
        return unknown();
    };
    let payload = &content[semi + 1..];
    let (Some(num), Ok(payload)) = (ascii_u16(&content[..semi]), std::str::from_utf8(payload))
    else {
        return unknown();
    };

    let color = color::parse_x_color(payload);
    let event = match num {
        10 => Event::ForegroundColor(color),
        11 => Event::BackgroundColor(color),
        12 => Event::CursorColor(color),
        _ => return unknown(),
    };
    Scan::Event(event, consumed)
}

/// DCS: `ESC P ... ST`. Nothing in the decoder interprets these; they are
/// carried verbatim for a higher layer.
fn parse_dcs(buf: &[u8]) -> Scan {
    let mut i = 2;
    loop {
        match buf.get(i) {
            None => return Scan::More,
            Some(0x07) => return Scan::Event(Event::UnknownDcs(buf[..=i].to_vec()), i + 1),
            Some(0x1b) => match buf.get(i + 1) {
                None => return Scan::More,
                Some(b'\\') => {
                    return Scan::Event(Event::UnknownDcs(buf[..i + 2].to_vec()), i + 2)
                }
                Some(_) => return Scan::Event(Event::UnknownDcs(buf[..i].to_vec()), i),
            },
            Some(_) => i += 1,
        }
    }
}

/// Parse a `;`-separated parameter region; each parameter keeps only its
/// first `:`-separated sub-parameter. Empty parameters read as 0.
fn params_ints(params: &[u8]) -> Option<Vec<u16>> {
    if params.is_empty() {
        return Some(Vec::new());
    }
    let s = std::str::from_utf8(params).ok()?;
    s.split(';')
        .map(|seg| {
            let head = seg.split(':').next().unwrap_or("");
            if head.is_empty() {
                Some(0)
            } else {
                head.parse::<u16>().ok()
            }
        })
        .collect()
}

fn ascii_u16(digits: &[u8]) -> Option<u16> {
    std::str::from_utf8(digits).ok()?.parse().ok()
}

fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}
