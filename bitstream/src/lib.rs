//! Byte-level read/write primitives for the ocgbridge codecs.
//!
//! This crate provides [`ByteCursor`] and [`ByteWriter`] for little-endian and
//! varint encoding and decoding.
//!
//! # Design Principles
//!
//! - **No unsafe code** - Safety is paramount.
//! - **Bounded operations** - All reads are bounds-checked.
//! - **No domain knowledge** - This crate knows nothing about duels or messages.
//! - **Selectable underflow policy** - A short read either zero-fills or errors,
//!   chosen once per cursor through [`ReadMode`].
//!
//! # Example
//!
//! ```
//! use bitstream::{ByteCursor, ByteWriter};
//!
//! let mut writer = ByteWriter::new();
//! writer.write_u8(1);
//! writer.write_u32(4031);
//!
//! let bytes = writer.finish();
//!
//! let mut cursor = ByteCursor::strict(&bytes);
//! assert_eq!(cursor.read_u8().unwrap(), 1);
//! assert_eq!(cursor.read_u32().unwrap(), 4031);
//! ```

mod error;
mod reader;
mod writer;

pub use error::{CursorError, CursorResult};
pub use reader::{ByteCursor, ReadMode};
pub use writer::{varu64_len, ByteWriter};
