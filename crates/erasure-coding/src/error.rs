use crate::fft::FftError;
use crate::ser::SerError;
use thiserror::Error;

/// Errors surfaced by encoding, decoding and the wire formats.
#[derive(Debug, Error)]
pub enum Error {
    /// Chunk count or chunk length is not a power of two, or the domain is too large.
    #[error("invalid encoding params: {0}")]
    InvalidParams(String),
    /// The input does not fit in the evaluation domain of the params.
    #[error("input of {len} field elements exceeds the {max} evaluations of the encoding")]
    InputTooLarge { len: usize, max: u64 },
    /// Fewer distinct chunks than the systematic threshold were supplied.
    ///
    /// The message is matched on by callers and must not change.
    #[error("number of frame must be sufficient")]
    InsufficientFrames { available: usize, required: u64 },
    /// A frame does not have the shape the params require.
    #[error("malformed frame: {0}")]
    MalformedFrame(String),
    #[error("chunk index {index} out of range for {num_chunks} chunks")]
    InvalidChunkIndex { index: u64, num_chunks: u64 },
    #[error(transparent)]
    Serialization(#[from] SerError),
    #[error(transparent)]
    Fft(#[from] FftError),
    /// Opaque failure forwarded from a [`crate::backend::ComputeBackend`].
    #[error("compute backend failed: {0:#}")]
    Backend(eyre::Report),
}

pub type Result<T, E = Error> = core::result::Result<T, E>;
