use core::fmt;
use thiserror::Error;

/// Structure being decoded when a serialization failure is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SerKind {
    /// A single length-prefixed vector of coefficients.
    FrameCoeffs,
    /// A count-prefixed run of [`SerKind::FrameCoeffs`].
    FrameCoeffsSlice,
    /// A single compressed proof point.
    Proof,
    /// Concatenated proof points.
    ProofSlice,
    /// Proof bytes followed by coefficient bytes for one chunk.
    Bundle,
    /// Count-prefixed, length-prefixed bundles.
    BundleContainer,
    /// Header-framed payload inside a blob.
    Payload,
}

impl fmt::Display for SerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SerKind::FrameCoeffs => "frame coeffs",
            SerKind::FrameCoeffsSlice => "frame coeffs slice",
            SerKind::Proof => "proof",
            SerKind::ProofSlice => "proof slice",
            SerKind::Bundle => "bundle",
            SerKind::BundleContainer => "bundle container",
            SerKind::Payload => "payload",
        };
        write!(f, "{s}")
    }
}

/// Failure while encoding or decoding one of the wire formats.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SerError {
    /// Input ended before the expected number of bytes were read.
    #[error("{kind}: unexpected end of input while reading {field}")]
    UnexpectedEnd { kind: SerKind, field: &'static str },
    /// A length or count did not fit the buffer or the format.
    #[error("{kind}: invalid length for {field}")]
    InvalidLength { kind: SerKind, field: &'static str },
    /// A decoded value is not a valid encoding.
    #[error("{kind}: invalid value for {field}")]
    InvalidValue { kind: SerKind, field: &'static str },
    /// Bytes remained after the structure was fully read.
    #[error("{kind}: {remaining} trailing bytes after {consumed} consumed")]
    TrailingBytes {
        kind: SerKind,
        consumed: usize,
        remaining: usize,
    },
}

impl SerError {
    pub fn unexpected_end(kind: SerKind, field: &'static str) -> Self {
        SerError::UnexpectedEnd { kind, field }
    }

    pub fn invalid_length(kind: SerKind, field: &'static str) -> Self {
        SerError::InvalidLength { kind, field }
    }

    pub fn invalid_value(kind: SerKind, field: &'static str) -> Self {
        SerError::InvalidValue { kind, field }
    }

    pub fn trailing_bytes(kind: SerKind, consumed: usize, remaining: usize) -> Self {
        SerError::TrailingBytes {
            kind,
            consumed,
            remaining,
        }
    }

    /// The structure that failed to decode.
    pub fn kind(&self) -> SerKind {
        match *self {
            SerError::UnexpectedEnd { kind, .. }
            | SerError::InvalidLength { kind, .. }
            | SerError::InvalidValue { kind, .. }
            | SerError::TrailingBytes { kind, .. } => kind,
        }
    }
}

pub type SerResult<T> = core::result::Result<T, SerError>;
