//! Pluggable Reed-Solomon extension step.

use ark_bn254::Fr;
use ark_poly::{EvaluationDomain, Radix2EvaluationDomain};
use eyre::{ensure, eyre, Result};
use serde::{Deserialize, Deserializer};
use std::{fmt::Display, sync::Arc};

/// Computes the evaluations of a coefficient vector over the power-of-two
/// domain of the same size.
///
/// Implementations may hold shared device state behind their own locks; the
/// encoder calls them from a single thread per encode and expects no reentrancy.
pub trait ComputeBackend: Send + Sync {
    fn extend_poly_eval(&self, coeffs: &[Fr]) -> Result<Vec<Fr>>;
}

/// Radix-2 FFT on the calling thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct CpuBackend;

impl ComputeBackend for CpuBackend {
    fn extend_poly_eval(&self, coeffs: &[Fr]) -> Result<Vec<Fr>> {
        ensure!(
            coeffs.len().is_power_of_two(),
            "coefficient count {} is not a power of two",
            coeffs.len()
        );
        let domain = Radix2EvaluationDomain::<Fr>::new(coeffs.len())
            .ok_or_else(|| eyre!("no evaluation domain of size {}", coeffs.len()))?;
        Ok(domain.fft(coeffs))
    }
}

/// Backend selected by configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BackendKind {
    #[default]
    Cpu,
}

impl BackendKind {
    pub fn build(&self) -> Arc<dyn ComputeBackend> {
        match self {
            Self::Cpu => Arc::new(CpuBackend),
        }
    }
}

impl<'de> Deserialize<'de> for BackendKind {
    fn deserialize<D>(deserializer: D) -> Result<BackendKind, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s: String = Deserialize::deserialize(deserializer)?;
        BackendKind::try_from(s.as_str()).map_err(serde::de::Error::custom)
    }
}

impl TryFrom<&str> for BackendKind {
    type Error = String;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "cpu" => Ok(Self::Cpu),
            other => Err(format!("unknown compute backend: {other}")),
        }
    }
}

impl Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Cpu => "cpu",
        };
        write!(f, "{}", s)
    }
}
