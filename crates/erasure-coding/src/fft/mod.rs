//! Radix-2 transforms over the BN254 scalar field.
//!
//! [`FftSettings`] fixes a maximal domain of width `2^max_scale`; transforms of
//! any smaller power-of-two length run over the subgroup generated by the
//! matching power of the maximal root of unity, so the roots used here line up
//! with [`FftSettings::expanded_roots_of_unity`].

use ark_bn254::Fr;
use ark_ff::{FftField, One};
use ark_poly::{EvaluationDomain, Radix2EvaluationDomain};
use thiserror::Error;

mod recovery;

pub use recovery::eval_poly_at;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FftError {
    #[error("length {0} is not a power of two")]
    LengthNotPowerOfTwo(usize),
    #[error("domain of width {max_width} is too small for length {len}")]
    DomainTooSmall { len: usize, max_width: u64 },
    #[error("scale {0} exceeds the two-adicity of the field")]
    ScaleTooLarge(u8),
    #[error("index {0} is outside the domain")]
    IndexOutOfDomain(usize),
    #[error("zero polynomial of degree {degree} does not fit in length {length}")]
    ZeroPolyTooLarge { degree: usize, length: usize },
    #[error("no samples available to recover from")]
    NoSamples,
    #[error("zero polynomial evaluation disagrees with sample presence at index {0}")]
    BadZeroEval(usize),
    #[error("division by zero at index {0} of the shifted zero polynomial")]
    ZeroDivision(usize),
    #[error("failed to reconstruct data correctly, changed value at index {0}")]
    Reconstruction(usize),
}

#[derive(Debug, Clone)]
pub struct FftSettings {
    max_width: u64,
    /// `ω^0, ω^1, .., ω^max_width` for the primitive `max_width`-th root `ω`.
    expanded_roots_of_unity: Vec<Fr>,
    reverse_roots_of_unity: Vec<Fr>,
}

impl FftSettings {
    pub fn new(max_scale: u8) -> Result<Self, FftError> {
        if u32::from(max_scale) > Fr::TWO_ADICITY {
            return Err(FftError::ScaleTooLarge(max_scale));
        }
        let max_width = 1u64 << max_scale;
        let domain = Radix2EvaluationDomain::<Fr>::new(max_width as usize)
            .ok_or(FftError::ScaleTooLarge(max_scale))?;
        let root_of_unity = domain.element(1);

        let mut expanded_roots_of_unity = Vec::with_capacity(max_width as usize + 1);
        let mut current = Fr::one();
        for _ in 0..=max_width {
            expanded_roots_of_unity.push(current);
            current *= root_of_unity;
        }
        debug_assert_eq!(expanded_roots_of_unity.last(), Some(&Fr::one()));

        let mut reverse_roots_of_unity = expanded_roots_of_unity.clone();
        reverse_roots_of_unity.reverse();

        Ok(Self {
            max_width,
            expanded_roots_of_unity,
            reverse_roots_of_unity,
        })
    }

    /// Settings whose maximal width is exactly `width`.
    pub fn with_width(width: u64) -> Result<Self, FftError> {
        if !width.is_power_of_two() {
            return Err(FftError::LengthNotPowerOfTwo(width as usize));
        }
        let scale = u8::try_from(width.trailing_zeros()).map_err(|_| {
            FftError::DomainTooSmall {
                len: width as usize,
                max_width: 1 << Fr::TWO_ADICITY,
            }
        })?;
        Self::new(scale)
    }

    pub fn max_width(&self) -> u64 {
        self.max_width
    }

    pub fn expanded_roots_of_unity(&self) -> &[Fr] {
        &self.expanded_roots_of_unity
    }

    pub fn reverse_roots_of_unity(&self) -> &[Fr] {
        &self.reverse_roots_of_unity
    }

    /// Forward (evaluation) or inverse (interpolation) transform of `values`.
    pub fn fft(&self, values: &[Fr], inverse: bool) -> Result<Vec<Fr>, FftError> {
        let domain = self.domain(values.len())?;
        if inverse {
            Ok(domain.ifft(values))
        } else {
            Ok(domain.fft(values))
        }
    }

    fn domain(&self, len: usize) -> Result<Radix2EvaluationDomain<Fr>, FftError> {
        if !len.is_power_of_two() {
            return Err(FftError::LengthNotPowerOfTwo(len));
        }
        let too_small = FftError::DomainTooSmall {
            len,
            max_width: self.max_width,
        };
        if len as u64 > self.max_width {
            return Err(too_small);
        }
        Radix2EvaluationDomain::new(len).ok_or(too_small)
    }
}

/// Reverses the low `log2(length)` bits of `value`. `length` is a power of two.
pub fn reverse_bits_limited(length: u32, value: u32) -> u32 {
    if length <= 1 {
        return 0;
    }
    let unused_bits = length.leading_zeros() + 1;
    value.reverse_bits() >> unused_bits
}

/// In-place bit-reversal permutation.
pub fn reverse_bit_order<T>(values: &mut [T]) -> Result<(), FftError> {
    let len = values.len();
    if !len.is_power_of_two() {
        return Err(FftError::LengthNotPowerOfTwo(len));
    }
    let length = u32::try_from(len).map_err(|_| FftError::DomainTooSmall {
        len,
        max_width: u32::MAX as u64,
    })?;
    for i in 0..length {
        let j = reverse_bits_limited(length, i);
        if i < j {
            values.swap(i as usize, j as usize);
        }
    }
    Ok(())
}
