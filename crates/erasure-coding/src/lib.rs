//! Reed-Solomon erasure coding over the BN254 scalar field.
//!
//! A payload is packed into field elements, extended to `num_chunks *
//! chunk_length` evaluations, and cut into frames: the coefficients of the
//! polynomial interpolating each chunk on its root-of-unity coset. Any
//! `num_systematic_chunks` distinct frames reconstruct the payload.

pub use ark_bn254::{Fr, G1Affine};

pub mod backend;
pub mod bundle;
pub mod codec;
pub mod config;
mod decoder;
pub mod encoder;
pub mod error;
pub mod fft;
pub mod frame;
pub mod interpolation;
pub mod params;
pub mod proof;
pub mod ser;

#[cfg(test)]
mod test_utils;

pub use backend::{BackendKind, ComputeBackend, CpuBackend};
pub use config::EncoderConfig;
pub use encoder::{Encoder, ParametrizedEncoder};
pub use error::{Error, Result};
pub use frame::{Frame, FrameCoeffs};
pub use interpolation::leading_coset_index;
pub use params::{num_systematic_chunks, EncodingParams};
