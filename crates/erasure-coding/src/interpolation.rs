//! Frame assignment.
//!
//! The extended evaluations are bit-reversed as a whole and cut into
//! `num_chunks` slices of `chunk_length`. Slice `i`, bit-reversed locally,
//! holds the evaluations at `w·ν^s` where `w = ω^j` is the root at the leading
//! coset index `j = rev(i)` and `ν` generates the subgroup of size
//! `chunk_length`. Each frame is the polynomial interpolating its slice.

use crate::encoder::ParametrizedEncoder;
use crate::error::{Error, Result};
use crate::fft::{reverse_bit_order, reverse_bits_limited, FftError, FftSettings};
use crate::frame::FrameCoeffs;
use ark_bn254::Fr;
use ark_ff::One;
use crossbeam_channel::bounded;
use std::thread;

/// Bit-reversal of `chunk_index` within a domain of `num_chunks`.
pub fn leading_coset_index(chunk_index: u64, num_chunks: u64) -> Result<u32> {
    let invalid = || Error::InvalidChunkIndex {
        index: chunk_index,
        num_chunks,
    };
    if chunk_index >= num_chunks {
        return Err(invalid());
    }
    let length = u32::try_from(num_chunks).map_err(|_| invalid())?;
    // fits since it is below num_chunks
    Ok(reverse_bits_limited(length, chunk_index as u32))
}

/// Coefficients of the polynomial `p` with `p(w·ν^s) = chunk[s]`, where `w` is
/// the root of unity at `coset`.
pub fn interpolation_poly_coeffs(fs: &FftSettings, chunk: &[Fr], coset: u32) -> Result<Vec<Fr>> {
    // ω^-j
    let w_inv = fs
        .reverse_roots_of_unity()
        .get(coset as usize)
        .ok_or(FftError::IndexOutOfDomain(coset as usize))?;
    let mut coeffs = fs.fft(chunk, true)?;
    let mut power = Fr::one();
    for coeff in coeffs.iter_mut() {
        *coeff *= power;
        power *= w_inv;
    }
    Ok(coeffs)
}

/// Inverse of [`interpolation_poly_coeffs`]: evaluates `coeffs` over the coset.
pub fn interpolation_poly_evals(fs: &FftSettings, coeffs: &[Fr], coset: u32) -> Result<Vec<Fr>> {
    let w = fs
        .expanded_roots_of_unity()
        .get(coset as usize)
        .ok_or(FftError::IndexOutOfDomain(coset as usize))?;
    let mut shifted = Vec::with_capacity(coeffs.len());
    let mut power = Fr::one();
    for coeff in coeffs {
        shifted.push(*coeff * power);
        power *= w;
    }
    Ok(fs.fft(&shifted, false)?)
}

impl ParametrizedEncoder {
    /// Splits `evaluations` into one frame per chunk, interpolating the chunks
    /// on a pool of worker threads. Returns the frames in chunk order along
    /// with their leading coset indices.
    pub(crate) fn make_frames(
        &self,
        mut evaluations: Vec<Fr>,
    ) -> Result<(Vec<FrameCoeffs>, Vec<u32>)> {
        let num_chunks = self.params.num_chunks;
        reverse_bit_order(&mut evaluations)?;

        let indices = (0..num_chunks)
            .map(|i| leading_coset_index(i, num_chunks))
            .collect::<Result<Vec<_>>>()?;
        let mut frames = vec![FrameCoeffs::default(); indices.len()];

        let num_workers = self.num_workers.clamp(1, indices.len().max(1));
        log::debug!(
            "interpolating {} chunks of {} on {} workers",
            num_chunks,
            self.params.chunk_length,
            num_workers
        );

        let evaluations = &evaluations;
        let indices_ref = &indices;
        let failure = thread::scope(|scope| {
            let (job_tx, job_rx) = bounded::<(usize, &mut FrameCoeffs)>(num_workers);
            let (done_tx, done_rx) = bounded::<Option<Error>>(num_workers);

            for _ in 0..num_workers {
                let job_rx = job_rx.clone();
                let done_tx = done_tx.clone();
                scope.spawn(move || {
                    let mut failure = None;
                    // keep draining after a failure so the sender never blocks
                    for (i, slot) in job_rx.iter() {
                        match self.interpolate_chunk(evaluations, i, indices_ref[i]) {
                            Ok(coeffs) => *slot = coeffs,
                            Err(err) => {
                                log::trace!("chunk {} failed: {}", i, err);
                                failure.get_or_insert(err);
                            }
                        }
                    }
                    let _ = done_tx.send(failure);
                });
            }
            drop(job_rx);
            drop(done_tx);

            for job in frames.iter_mut().enumerate() {
                if job_tx.send(job).is_err() {
                    break;
                }
            }
            drop(job_tx);

            done_rx
                .iter()
                .take(num_workers)
                .fold(None, |first: Option<Error>, next| first.or(next))
        });

        match failure {
            Some(err) => Err(err),
            None => Ok((frames, indices)),
        }
    }

    fn interpolate_chunk(&self, evaluations: &[Fr], i: usize, coset: u32) -> Result<FrameCoeffs> {
        let chunk_length = self.params.chunk_length as usize;
        let start = i * chunk_length;
        let mut ys = evaluations
            .get(start..start + chunk_length)
            .ok_or_else(|| {
                Error::MalformedFrame(format!(
                    "evaluations of length {} have no chunk {}",
                    evaluations.len(),
                    i
                ))
            })?
            .to_vec();
        reverse_bit_order(&mut ys)?;
        interpolation_poly_coeffs(&self.fs, &ys, coset).map(FrameCoeffs::from)
    }
}
