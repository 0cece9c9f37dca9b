#![forbid(unsafe_code)]

//! Terminal input decoding: escape sequences and console key records in,
//! typed events out.
//!
//! The decoder consumes the raw byte stream a pseudo-terminal produces and
//! emits key presses, mouse activity, focus changes, bracketed paste, and
//! in-band color replies as one [`Event`] type. On platforms with a console
//! input API, typed key records translate into the same event algebra.
//!
//! Reading bytes, loading terminfo, and binding the console API are the
//! caller's job; the decoder only ever sees a byte slice (or a typed
//! record) and answers with an event and a consumed-byte count.
//!
//! ```
//! use vtinput::{Driver, Event, Flags, KeyEvent, KeySym};
//!
//! let driver = Driver::new(Flags::empty());
//! let (event, consumed) = driver.decode(b"\x1b[A");
//! assert_eq!(event, Some(Event::KeyDown(KeyEvent::sym(KeySym::Up))));
//! assert_eq!(consumed, 3);
//!
//! // An unterminated sequence asks for more bytes.
//! assert_eq!(driver.decode(b"\x1b["), (None, 0));
//! ```

pub mod color;
pub mod console;
pub mod driver;
pub mod event;
pub mod key;
pub mod mouse;
mod sequence;
mod table;
pub mod terminfo;

pub use color::Rgba;
pub use console::{ControlKeyState, KeyRecord, VirtualKey};
pub use driver::Driver;
pub use event::{Event, MouseButton, MouseEvent};
pub use key::{KeyEvent, KeySym, Modifiers};
pub use table::Flags;
pub use terminfo::TerminfoSource;
