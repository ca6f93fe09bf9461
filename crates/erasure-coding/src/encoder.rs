use crate::backend::ComputeBackend;
use crate::codec::bytes_to_field_elements;
use crate::config::EncoderConfig;
use crate::error::{Error, Result};
use crate::fft::FftSettings;
use crate::frame::FrameCoeffs;
use crate::params::EncodingParams;
use ark_bn254::Fr;
use ark_ff::Zero;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

/// Distinct params kept in an [`Encoder`]'s cache before it is emptied.
pub const MAX_CACHED_ENCODERS: usize = 16;

/// Reed-Solomon encoder and decoder over the BN254 scalar field.
///
/// One [`ParametrizedEncoder`] is built lazily per distinct [`EncodingParams`]
/// and reused by later calls with the same params. At most
/// [`MAX_CACHED_ENCODERS`] are kept; the cache is emptied when it is full.
pub struct Encoder {
    config: EncoderConfig,
    backend: Arc<dyn ComputeBackend>,
    encoders: Mutex<HashMap<EncodingParams, Arc<ParametrizedEncoder>>>,
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new(EncoderConfig::default())
    }
}

impl Encoder {
    pub fn new(config: EncoderConfig) -> Self {
        let backend = config.backend.build();
        Self::with_backend(config, backend)
    }

    pub fn with_backend(config: EncoderConfig, backend: Arc<dyn ComputeBackend>) -> Self {
        Self {
            config,
            backend,
            encoders: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    /// Extends `input` to `params.num_evaluations()` evaluations and splits
    /// them into `params.num_chunks` frames. Returns the frames in chunk order
    /// together with the leading coset index of each.
    pub fn encode(
        &self,
        input: &[Fr],
        params: EncodingParams,
    ) -> Result<(Vec<FrameCoeffs>, Vec<u32>)> {
        self.parametrized(params)?.encode(self.backend.as_ref(), input)
    }

    /// Pads `data` into field elements and encodes them.
    pub fn encode_bytes(
        &self,
        data: &[u8],
        params: EncodingParams,
    ) -> Result<(Vec<FrameCoeffs>, Vec<u32>)> {
        self.encode(&bytes_to_field_elements(data), params)
    }

    /// Reconstructs the first `max_output_size` bytes of the payload from the
    /// frames at chunk `indices`. `frames[k]` belongs to chunk `indices[k]`.
    pub fn decode(
        &self,
        frames: &[FrameCoeffs],
        indices: &[u64],
        max_output_size: u64,
        params: EncodingParams,
    ) -> Result<Vec<u8>> {
        self.parametrized(params)?
            .decode(frames, indices, max_output_size)
    }

    /// Drops every cached [`ParametrizedEncoder`] and its roots of unity.
    pub fn clear_cache(&self) {
        self.encoders
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn parametrized(&self, params: EncodingParams) -> Result<Arc<ParametrizedEncoder>> {
        let mut encoders = self.encoders.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(encoder) = encoders.get(&params) {
            return Ok(encoder.clone());
        }
        let encoder = Arc::new(ParametrizedEncoder::new(
            params,
            self.config.num_workers,
            self.config.verbose,
        )?);
        log::debug!("created encoder for {}", params);
        if encoders.len() >= MAX_CACHED_ENCODERS {
            log::debug!("encoder cache full, dropping {} entries", encoders.len());
            encoders.clear();
        }
        encoders.insert(params, encoder.clone());
        Ok(encoder)
    }
}

/// Encoder state for one set of params.
#[derive(Debug)]
pub struct ParametrizedEncoder {
    pub(crate) params: EncodingParams,
    pub(crate) fs: FftSettings,
    pub(crate) num_workers: usize,
    pub(crate) verbose: bool,
}

impl ParametrizedEncoder {
    pub fn new(params: EncodingParams, num_workers: usize, verbose: bool) -> Result<Self> {
        params.validate()?;
        let fs = FftSettings::with_width(params.num_evaluations())?;
        Ok(Self {
            params,
            fs,
            num_workers: num_workers.max(1),
            verbose,
        })
    }

    pub fn params(&self) -> EncodingParams {
        self.params
    }

    pub fn encode(
        &self,
        backend: &dyn ComputeBackend,
        input: &[Fr],
    ) -> Result<(Vec<FrameCoeffs>, Vec<u32>)> {
        let num_evaluations = self.params.num_evaluations();
        if input.len() as u64 > num_evaluations {
            return Err(Error::InputTooLarge {
                len: input.len(),
                max: num_evaluations,
            });
        }
        let start = Instant::now();

        let mut coeffs = Vec::with_capacity(num_evaluations as usize);
        coeffs.extend_from_slice(input);
        coeffs.resize(num_evaluations as usize, Fr::zero());
        log::trace!(
            "padded {} elements to {} for {}",
            input.len(),
            coeffs.len(),
            self.params
        );

        let evaluations = backend.extend_poly_eval(&coeffs).map_err(Error::Backend)?;
        if evaluations.len() != coeffs.len() {
            return Err(Error::Backend(eyre::eyre!(
                "backend returned {} evaluations for {} coefficients",
                evaluations.len(),
                coeffs.len()
            )));
        }
        let extended = start.elapsed();

        let (frames, indices) = self.make_frames(evaluations)?;
        if self.verbose {
            log::info!(
                "encoded {} ({} elements): extension took {:?}, frames took {:?}",
                self.params,
                input.len(),
                extended,
                start.elapsed() - extended
            );
        }
        Ok((frames, indices))
    }
}
