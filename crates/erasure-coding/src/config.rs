use crate::backend::BackendKind;
use serde::Deserialize;

/// Tuning for an [`crate::Encoder`]. Missing fields take their defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EncoderConfig {
    /// Upper bound on interpolation threads per encode; 0 is treated as 1.
    pub num_workers: usize,
    pub backend: BackendKind,
    /// Log timings of each encode and decode stage at info level.
    pub verbose: bool,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            num_workers: std::thread::available_parallelism()
                .map(usize::from)
                .unwrap_or(1),
            backend: BackendKind::default(),
            verbose: false,
        }
    }
}

impl EncoderConfig {
    pub fn with_workers(num_workers: usize) -> Self {
        Self {
            num_workers,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_json() {
        let config: EncoderConfig =
            serde_json::from_str(r#"{ "num_workers": 3, "backend": "CPU", "verbose": true }"#)
                .unwrap();
        assert_eq!(config.num_workers, 3);
        assert_eq!(config.backend, BackendKind::Cpu);
        assert!(config.verbose);
    }

    #[test]
    fn test_config_defaults() {
        let config: EncoderConfig = serde_json::from_str("{}").unwrap();
        assert!(config.num_workers >= 1);
        assert_eq!(config.backend, BackendKind::Cpu);
        assert!(!config.verbose);
    }

    #[test]
    fn test_unknown_backend_is_rejected() {
        let err = serde_json::from_str::<EncoderConfig>(r#"{ "backend": "gpu" }"#).unwrap_err();
        assert!(err.to_string().contains("unknown compute backend: gpu"));
    }
}
