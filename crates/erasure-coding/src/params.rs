use crate::codec::BYTES_PER_SYMBOL;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest evaluation domain the BN254 scalar field supports (its two-adicity).
pub const MAX_NUM_EVALUATIONS: u64 = 1 << 28;

/// Shape of an encoding: how many chunks, and how many symbols per chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EncodingParams {
    pub num_chunks: u64,
    pub chunk_length: u64,
}

impl EncodingParams {
    /// Builds params without validating them, see [`EncodingParams::validate`].
    pub const fn new(num_chunks: u64, chunk_length: u64) -> Self {
        Self {
            num_chunks,
            chunk_length,
        }
    }

    /// Params with both dimensions rounded up to the next power of two.
    pub fn from_minimums(num_chunks: u64, chunk_length: u64) -> Result<Self> {
        let round = |value: u64, name: &str| {
            value.checked_next_power_of_two().ok_or_else(|| {
                Error::InvalidParams(format!("{name} {value} has no power of two above it"))
            })
        };
        let params = Self::new(
            round(num_chunks, "chunk count")?,
            round(chunk_length, "chunk length")?,
        );
        params.validate()?;
        Ok(params)
    }

    /// Params for `num_sys` systematic and `num_par` parity chunks carrying
    /// `data_size` bytes of symbols.
    pub fn from_systematic_parity(num_sys: u64, num_par: u64, data_size: u64) -> Result<Self> {
        if num_sys == 0 {
            return Err(Error::InvalidParams(
                "at least one systematic chunk is required".into(),
            ));
        }
        let num_chunks = num_sys
            .checked_add(num_par)
            .ok_or_else(|| Error::InvalidParams("chunk count overflows".into()))?;
        let data_len = data_size.div_ceil(BYTES_PER_SYMBOL as u64);
        let chunk_length = data_len.div_ceil(num_sys);
        log::debug!(
            "data({}), symbols({}), systematic({}), parity({}), min chunk length({})",
            data_size,
            data_len,
            num_sys,
            num_par,
            chunk_length
        );
        Self::from_minimums(num_chunks, chunk_length)
    }

    /// Both dimensions must be powers of two and the domain must fit the field.
    pub fn validate(&self) -> Result<()> {
        if !self.num_chunks.is_power_of_two() {
            return Err(Error::InvalidParams(format!(
                "number of chunks must be a power of 2, got {}",
                self.num_chunks
            )));
        }
        if !self.chunk_length.is_power_of_two() {
            return Err(Error::InvalidParams(format!(
                "chunk length must be a power of 2, got {}",
                self.chunk_length
            )));
        }
        match self.num_chunks.checked_mul(self.chunk_length) {
            Some(n) if n <= MAX_NUM_EVALUATIONS => Ok(()),
            _ => Err(Error::InvalidParams(format!(
                "{self} exceeds the maximum of {MAX_NUM_EVALUATIONS} evaluations"
            ))),
        }
    }

    pub fn num_evaluations(&self) -> u64 {
        self.num_chunks.saturating_mul(self.chunk_length)
    }

    pub fn chunk_degree(&self) -> u64 {
        self.chunk_length.saturating_sub(1)
    }
}

impl fmt::Display for EncodingParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "NumChunks: {}, ChunkLength: {}",
            self.num_chunks, self.chunk_length
        )
    }
}

/// Minimum number of distinct chunks needed to reconstruct `data_size` bytes
/// of symbols split into chunks of `chunk_length`.
///
/// Both divisions round up: `ceil(ceil(data_size / 32) / chunk_length)`, so a
/// partial last chunk counts as a whole one.
pub fn num_systematic_chunks(data_size: u64, chunk_length: u64) -> u64 {
    if chunk_length == 0 {
        return 0;
    }
    data_size
        .div_ceil(BYTES_PER_SYMBOL as u64)
        .div_ceil(chunk_length)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_powers_of_two() {
        assert!(EncodingParams::new(8, 4).validate().is_ok());
        assert!(EncodingParams::new(1, 1).validate().is_ok());
        assert!(EncodingParams::new(6, 4).validate().is_err());
        assert!(EncodingParams::new(8, 3).validate().is_err());
        assert!(EncodingParams::new(0, 4).validate().is_err());
        assert!(EncodingParams::new(8, 0).validate().is_err());
        let err = EncodingParams::new(6, 4).validate().unwrap_err();
        assert!(matches!(err, Error::InvalidParams(_)));
        assert_eq!(
            err.to_string(),
            "invalid encoding params: number of chunks must be a power of 2, got 6"
        );
    }

    #[test]
    fn test_validate_domain_bound() {
        assert!(EncodingParams::new(1 << 14, 1 << 14).validate().is_ok());
        assert!(EncodingParams::new(1 << 14, 1 << 15).validate().is_err());
        assert!(EncodingParams::new(1 << 40, 1 << 40).validate().is_err());
    }

    #[test]
    fn test_from_minimums() {
        let params = EncodingParams::from_minimums(3, 5).unwrap();
        assert_eq!(params, EncodingParams::new(4, 8));
        assert_eq!(params.num_evaluations(), 32);
        assert_eq!(params.chunk_degree(), 7);
        assert_eq!(
            EncodingParams::from_minimums(8, 16).unwrap(),
            EncodingParams::new(8, 16)
        );
        assert!(EncodingParams::from_minimums(u64::MAX, 1).is_err());
    }

    #[test]
    fn test_from_systematic_parity() {
        // 1536 bytes = 48 symbols over 3 systematic chunks: 16 symbols each
        let params = EncodingParams::from_systematic_parity(3, 1, 1536).unwrap();
        assert_eq!(params, EncodingParams::new(4, 16));

        let params = EncodingParams::from_systematic_parity(3, 2, 1000).unwrap();
        assert_eq!(params, EncodingParams::new(8, 16));

        assert!(EncodingParams::from_systematic_parity(0, 4, 1000).is_err());
    }

    #[test]
    fn test_num_systematic_chunks() {
        assert_eq!(num_systematic_chunks(1536, 16), 3);
        assert_eq!(num_systematic_chunks(1535, 16), 3);
        assert_eq!(num_systematic_chunks(32 * 16, 16), 1);
        assert_eq!(num_systematic_chunks(32 * 16 + 1, 16), 2);
        assert_eq!(num_systematic_chunks(0, 16), 0);
    }

    #[test]
    fn test_params_serde() {
        let params = EncodingParams::new(4, 16);
        let json = serde_json::to_string(&params).unwrap();
        assert_eq!(json, r#"{"num_chunks":4,"chunk_length":16}"#);
        let parsed: EncodingParams = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, params);
        assert!(serde_json::from_str::<EncodingParams>(r#"{"num_chunks":4}"#).is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            EncodingParams::new(4, 16).to_string(),
            "NumChunks: 4, ChunkLength: 16"
        );
    }
}
