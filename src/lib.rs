//! Demorse: bounds-checked Morse code decoding in Rust.
//!
//! The crate provides:
//! - The Morse symbol table and typed path codes (`table`)
//! - An in-place buffer decoder and its state machine (`decoder`)
//! - A streaming decoder over `Read`/`Write` (`stream`)
//! - An optional CLI (`cli` feature)
//!
//! Dots and dashes walk a binary tree of Morse prefixes; any other byte is a
//! separator that emits the letter reached so far. A run of symbols that
//! walks off the 64-entry table is reported as
//! [`DecodeError::InvalidSequence`] instead of being looked up.
//!
//! # Quick Start
//!
//! ```
//! use demorse::decoder;
//!
//! let mut buf = *b"-.-. --- -.. .";
//! let len = decoder::decode_in_place(&mut buf).unwrap();
//! assert_eq!(&buf[..len], b"CODE");
//!
//! assert!(decoder::decode(b".......").is_err());
//! ```

pub mod decoder;
pub mod stream;
pub mod table;

#[cfg(feature = "cli")]
pub mod cli;

pub use decoder::{DecodeError, DecodeOptions, Decoder, OverlongRun, TrailingRun};
pub use stream::MorseDecoder;
