//! Shared plumbing for the binary wire formats. All integers are big-endian.

mod cursor;
mod error;

pub use cursor::ByteReader;
pub(crate) use cursor::write_len;
pub use error::{SerError, SerKind, SerResult};
