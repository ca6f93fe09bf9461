//! Erasure recovery from a partial set of evaluations.
//!
//! With `E` the known evaluations (zero where missing) and `Z` the polynomial
//! vanishing exactly on the missing roots, `E·Z` equals `D·Z` on the whole
//! domain, where `D` is the polynomial being recovered. Dividing `D·Z` by `Z`
//! on a coset of the domain, where `Z` has no roots, yields `D`.

use super::{FftError, FftSettings};
use ark_bn254::Fr;
use ark_ff::{FftField, Field, One, Zero};
use ark_poly::{EvaluationDomain, Radix2EvaluationDomain};

/// Coset shift applied while dividing by the zero polynomial.
const SHIFT_FACTOR: u64 = 5;

/// Missing indices multiplied directly before switching to FFT products.
const PER_LEAF: usize = 63;

impl FftSettings {
    /// Returns `(evaluations, coefficients)` of the polynomial vanishing on the
    /// roots of unity at `missing` within a domain of `length`. Both vectors
    /// have `length` entries.
    pub fn zero_poly_via_multiplication(
        &self,
        missing: &[usize],
        length: usize,
    ) -> Result<(Vec<Fr>, Vec<Fr>), FftError> {
        if missing.is_empty() {
            return Ok((vec![Fr::zero(); length], vec![Fr::zero(); length]));
        }
        // validates `length` against this domain
        self.domain(length)?;
        if missing.len() >= length {
            return Err(FftError::ZeroPolyTooLarge {
                degree: missing.len(),
                length,
            });
        }
        let stride = (self.max_width / length as u64) as usize;

        let leaves = missing
            .chunks(PER_LEAF)
            .map(|indices| self.zero_poly_leaf(indices, stride))
            .collect::<Result<Vec<_>, _>>()?;
        let mut zero_poly = reduce_leaves(leaves)?;
        debug_assert_eq!(zero_poly.len(), missing.len() + 1);

        zero_poly.resize(length, Fr::zero());
        let zero_eval = self.fft(&zero_poly, false)?;
        Ok((zero_eval, zero_poly))
    }

    /// Expands `∏ (x - ω^(i·stride))` term by term.
    fn zero_poly_leaf(&self, indices: &[usize], stride: usize) -> Result<Vec<Fr>, FftError> {
        let mut poly = Vec::with_capacity(indices.len() + 1);
        poly.push(Fr::one());
        for &index in indices {
            let root = index
                .checked_mul(stride)
                .and_then(|i| self.expanded_roots_of_unity.get(i))
                .ok_or(FftError::IndexOutOfDomain(index))?;
            poly.push(Fr::zero());
            for k in (1..poly.len()).rev() {
                poly[k] = poly[k - 1] - *root * poly[k];
            }
            poly[0] *= -*root;
        }
        Ok(poly)
    }

    /// Recovers the full evaluation vector from `samples`, where `None` marks
    /// an erased position. The number of known samples must exceed the degree
    /// of the underlying polynomial.
    pub fn recover_poly_from_samples(&self, samples: &[Option<Fr>]) -> Result<Vec<Fr>, FftError> {
        let length = samples.len();
        let missing: Vec<usize> = samples
            .iter()
            .enumerate()
            .filter_map(|(i, sample)| sample.is_none().then_some(i))
            .collect();
        if missing.len() == length {
            return Err(FftError::NoSamples);
        }
        if missing.is_empty() {
            return Ok(samples.iter().flatten().copied().collect());
        }
        log::trace!("recovering {} of {} samples", missing.len(), length);

        let (zero_eval, zero_poly) = self.zero_poly_via_multiplication(&missing, length)?;

        let poly_evaluations_with_zero = samples
            .iter()
            .zip(&zero_eval)
            .enumerate()
            .map(|(i, (sample, z))| match sample {
                None if z.is_zero() => Ok(Fr::zero()),
                Some(s) if !z.is_zero() => Ok(*s * z),
                _ => Err(FftError::BadZeroEval(i)),
            })
            .collect::<Result<Vec<_>, _>>()?;

        let shift = Fr::from(SHIFT_FACTOR);
        let shift_inv = shift.inverse().ok_or(FftError::ZeroDivision(0))?;

        let mut shifted_poly_with_zero = self.fft(&poly_evaluations_with_zero, true)?;
        shift_poly(&mut shifted_poly_with_zero, shift);
        let mut shifted_zero_poly = zero_poly;
        shift_poly(&mut shifted_zero_poly, shift);

        let eval_shifted_poly_with_zero = self.fft(&shifted_poly_with_zero, false)?;
        let eval_shifted_zero_poly = self.fft(&shifted_zero_poly, false)?;

        let eval_shifted_reconstructed = eval_shifted_poly_with_zero
            .iter()
            .zip(&eval_shifted_zero_poly)
            .enumerate()
            .map(|(i, (p, z))| {
                z.inverse()
                    .map(|z_inv| *p * z_inv)
                    .ok_or(FftError::ZeroDivision(i))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut reconstructed_poly = self.fft(&eval_shifted_reconstructed, true)?;
        shift_poly(&mut reconstructed_poly, shift_inv);
        let reconstructed = self.fft(&reconstructed_poly, false)?;
        check_agrees_with_samples(samples, &reconstructed)?;
        Ok(reconstructed)
    }
}

/// Every known sample must survive reconstruction unchanged.
fn check_agrees_with_samples(samples: &[Option<Fr>], reconstructed: &[Fr]) -> Result<(), FftError> {
    match samples
        .iter()
        .zip(reconstructed)
        .position(|(sample, value)| matches!(sample, Some(s) if s != value))
    {
        Some(i) => Err(FftError::Reconstruction(i)),
        None => Ok(()),
    }
}

/// Multiplies the leaves together pairwise until a single polynomial remains.
fn reduce_leaves(mut leaves: Vec<Vec<Fr>>) -> Result<Vec<Fr>, FftError> {
    while leaves.len() > 1 {
        let mut reduced = Vec::with_capacity(leaves.len().div_ceil(2));
        let mut iter = leaves.into_iter();
        while let Some(a) = iter.next() {
            match iter.next() {
                Some(b) => reduced.push(mul_polys(&a, &b)?),
                None => reduced.push(a),
            }
        }
        leaves = reduced;
    }
    Ok(leaves.pop().unwrap_or_else(|| vec![Fr::one()]))
}

fn mul_polys(a: &[Fr], b: &[Fr]) -> Result<Vec<Fr>, FftError> {
    let out_len = a.len() + b.len() - 1;
    let domain =
        Radix2EvaluationDomain::<Fr>::new(out_len).ok_or(FftError::DomainTooSmall {
            len: out_len,
            max_width: 1 << Fr::TWO_ADICITY,
        })?;
    let a_eval = domain.fft(a);
    let b_eval = domain.fft(b);
    let product: Vec<Fr> = a_eval.iter().zip(&b_eval).map(|(x, y)| *x * y).collect();
    let mut out = domain.ifft(&product);
    out.truncate(out_len);
    Ok(out)
}

fn shift_poly(poly: &mut [Fr], factor: Fr) {
    let mut power = Fr::one();
    for coeff in poly.iter_mut() {
        *coeff *= power;
        power *= factor;
    }
}

/// Horner evaluation of `coeffs` (lowest degree first) at `x`.
pub fn eval_poly_at(coeffs: &[Fr], x: &Fr) -> Fr {
    coeffs
        .iter()
        .rev()
        .fold(Fr::zero(), |acc, coeff| acc * x + coeff)
}
