//! Reconstruction from a subset of frames.

use crate::codec::{field_elements_to_bytes, BYTES_PER_COEFFICIENT, BYTES_PER_SYMBOL};
use crate::encoder::ParametrizedEncoder;
use crate::error::{Error, Result};
use crate::frame::FrameCoeffs;
use crate::interpolation::{interpolation_poly_evals, leading_coset_index};
use crate::params::num_systematic_chunks;
use ark_bn254::Fr;
use std::time::Instant;

impl ParametrizedEncoder {
    /// Decodes `max_output_size` bytes from `frames`, where `frames[k]` holds
    /// the coefficients of chunk `indices[k]`.
    ///
    /// Only the first frame seen for an index is used; later duplicates are
    /// skipped without being compared.
    pub fn decode(
        &self,
        frames: &[FrameCoeffs],
        indices: &[u64],
        max_output_size: u64,
    ) -> Result<Vec<u8>> {
        let start = Instant::now();
        if frames.len() != indices.len() {
            return Err(Error::MalformedFrame(format!(
                "got {} frames for {} indices",
                frames.len(),
                indices.len()
            )));
        }

        let num_chunks = self.params.num_chunks;
        let chunk_length = self.params.chunk_length as usize;
        let mut seen = vec![false; num_chunks as usize];
        let mut available = 0usize;
        for (frame, &index) in frames.iter().zip(indices) {
            if index >= num_chunks {
                return Err(Error::InvalidChunkIndex { index, num_chunks });
            }
            if frame.len() != chunk_length {
                return Err(Error::MalformedFrame(format!(
                    "frame for chunk {} has {} coefficients, expected {}",
                    index,
                    frame.len(),
                    chunk_length
                )));
            }
            if !seen[index as usize] {
                seen[index as usize] = true;
                available += 1;
            }
        }

        let padded = max_output_size
            .div_ceil(BYTES_PER_COEFFICIENT as u64)
            .saturating_mul(BYTES_PER_SYMBOL as u64);
        let required = num_systematic_chunks(padded, self.params.chunk_length);
        if (available as u64) < required {
            log::debug!(
                "{} distinct frames of {} required for {} bytes",
                available,
                required,
                max_output_size
            );
            return Err(Error::InsufficientFrames {
                available,
                required,
            });
        }
        if max_output_size == 0 {
            return Ok(Vec::new());
        }

        let mut samples: Vec<Option<Fr>> = vec![None; self.params.num_evaluations() as usize];
        seen.fill(false);
        for (frame, &index) in frames.iter().zip(indices) {
            if std::mem::replace(&mut seen[index as usize], true) {
                log::trace!("skipping duplicate frame for chunk {}", index);
                continue;
            }
            let coset = leading_coset_index(index, num_chunks)?;
            let evals = interpolation_poly_evals(&self.fs, frame, coset)?;
            for (s, eval) in evals.into_iter().enumerate() {
                samples[s * num_chunks as usize + coset as usize] = Some(eval);
            }
        }

        let evaluations = match samples.iter().copied().collect::<Option<Vec<Fr>>>() {
            Some(evaluations) => evaluations,
            None => self.fs.recover_poly_from_samples(&samples)?,
        };
        let coeffs = self.fs.fft(&evaluations, true)?;
        let max_output_size = usize::try_from(max_output_size).unwrap_or(usize::MAX);
        let data = field_elements_to_bytes(&coeffs, max_output_size);

        if self.verbose {
            log::info!(
                "decoded {} bytes from {} distinct frames of {} in {:?}",
                data.len(),
                available,
                self.params,
                start.elapsed()
            );
        }
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::CpuBackend;
    use crate::codec::bytes_to_field_elements;
    use crate::params::EncodingParams;
    use crate::test_utils::test_data;

    fn encode(data: &[u8], params: EncodingParams) -> (ParametrizedEncoder, Vec<FrameCoeffs>) {
        let encoder = ParametrizedEncoder::new(params, 2, true).unwrap();
        let (frames, _) = encoder
            .encode(&CpuBackend, &bytes_to_field_elements(data))
            .unwrap();
        (encoder, frames)
    }

    #[test]
    fn test_decode_all_frames() {
        let _ = pretty_env_logger::try_init();
        let data = test_data(1, 500);
        let (encoder, frames) = encode(&data, EncodingParams::new(4, 8));
        let decoded = encoder
            .decode(&frames, &[0, 1, 2, 3], data.len() as u64)
            .unwrap();
        assert_eq!(decoded, data);
    }

    #[test]
    fn test_decode_with_erasures() {
        let _ = pretty_env_logger::try_init();
        // 300 bytes -> 10 elements -> 2 chunks of 8 needed out of 8
        let data = test_data(2, 300);
        let (encoder, frames) = encode(&data, EncodingParams::new(8, 8));
        for picked in [[0u64, 1], [6, 7], [2, 5], [7, 0]] {
            let subset: Vec<_> = picked.iter().map(|&i| frames[i as usize].clone()).collect();
            let decoded = encoder.decode(&subset, &picked, data.len() as u64).unwrap();
            assert_eq!(decoded, data, "chunks {:?}", picked);
        }
    }

    #[test]
    fn test_duplicates_do_not_count() {
        let data = test_data(3, 300);
        let (encoder, frames) = encode(&data, EncodingParams::new(8, 8));
        let subset = vec![frames[3].clone(), frames[3].clone()];
        let err = encoder.decode(&subset, &[3, 3], data.len() as u64).unwrap_err();
        assert!(matches!(
            err,
            Error::InsufficientFrames {
                available: 1,
                required: 2
            }
        ));
        assert_eq!(err.to_string(), "number of frame must be sufficient");

        // later duplicates are ignored even when they disagree
        let subset = vec![frames[3].clone(), frames[5].clone(), frames[0].clone()];
        let decoded = encoder.decode(&subset, &[3, 5, 3], data.len() as u64).unwrap();
        assert_eq!(decoded, data);
    }

    #[test]
    fn test_decode_rejects_malformed_input() {
        let data = test_data(4, 100);
        let (encoder, frames) = encode(&data, EncodingParams::new(4, 4));
        let size = data.len() as u64;

        assert!(matches!(
            encoder.decode(&frames, &[0, 1, 2], size),
            Err(Error::MalformedFrame(_))
        ));
        assert!(matches!(
            encoder.decode(&frames, &[0, 1, 2, 4], size),
            Err(Error::InvalidChunkIndex {
                index: 4,
                num_chunks: 4
            })
        ));

        let mut short = frames.clone();
        short[1] = FrameCoeffs::from(short[1][..3].to_vec());
        assert!(matches!(
            encoder.decode(&short, &[0, 1, 2, 3], size),
            Err(Error::MalformedFrame(_))
        ));
    }

    #[test]
    fn test_decode_empty_output() {
        let data = test_data(5, 100);
        let (encoder, _) = encode(&data, EncodingParams::new(4, 4));
        assert!(encoder.decode(&[], &[], 0).unwrap().is_empty());
        assert!(matches!(
            encoder.decode(&[], &[], 1),
            Err(Error::InsufficientFrames {
                available: 0,
                required: 1
            })
        ));
    }

    #[test]
    fn test_truncated_output() {
        let data = test_data(6, 120);
        let (encoder, frames) = encode(&data, EncodingParams::new(4, 4));
        let decoded = encoder.decode(&frames, &[0, 1, 2, 3], 50).unwrap();
        assert_eq!(decoded, data[..50]);
    }
}
