//! # Configuration
//!
//! YAML configuration for fractal noise generation.
//!
//! ## Search Path
//!
//! [`FractalNoiseConfig::load`] reads the first file found:
//! 1. Path in the `FRACTAL_NOISE_CONFIG` environment variable
//! 2. `./fractal-noise.yaml`
//! 3. `<user config dir>/fractal-noise/config.yaml`
//! 4. `/etc/fractal-noise/config.yaml`
//!
//! and falls back to defaults when none exists.
//!
//! ## Example
//!
//! ```yaml
//! seed: 42
//! params:
//!   samples: 2048
//!   alpha: 0.5
//!   beta: 0.3
//!   gamma: 0.1
//!   fractalDim: 1.5
//!   noiseType: brown
//! integrator:
//!   initial_value: 0.05
//!   clamp: 10.0
//! logging:
//!   level: debug
//!   format: json
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::fft::SharedPlans;
use crate::generator::{FractalNoiseGenerator, NoiseParams};
use crate::mfsu::MfsuIntegrator;
use crate::noise::NoiseSynthesizer;
use crate::observe::LogConfig;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "FRACTAL_NOISE_CONFIG";

/// Error type for configuration operations.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Configuration file not found
    NotFound(String),
    /// Failed to read or write a configuration file
    ReadError(String),
    /// Failed to parse or serialize configuration
    ParseError(String),
    /// Invalid configuration value
    ValidationError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::NotFound(msg) => write!(f, "config not found: {}", msg),
            ConfigError::ReadError(msg) => write!(f, "failed to read config: {}", msg),
            ConfigError::ParseError(msg) => write!(f, "failed to parse config: {}", msg),
            ConfigError::ValidationError(msg) => write!(f, "invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// MFSU integration settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegratorConfig {
    /// Initial state `ψ(0)`
    pub initial_value: f64,
    /// Symmetric bound on the state
    pub clamp: f64,
}

impl Default for IntegratorConfig {
    fn default() -> Self {
        Self {
            initial_value: MfsuIntegrator::DEFAULT_INITIAL_VALUE,
            clamp: MfsuIntegrator::DEFAULT_CLAMP,
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FractalNoiseConfig {
    /// Configuration format version
    pub version: String,
    /// RNG seed; `None` seeds from the OS
    pub seed: Option<u64>,
    /// Generation parameters
    pub params: NoiseParams,
    pub integrator: IntegratorConfig,
    pub logging: LogConfig,
}

impl Default for FractalNoiseConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            seed: None,
            params: NoiseParams::default(),
            integrator: IntegratorConfig::default(),
            logging: LogConfig::default(),
        }
    }
}

impl FractalNoiseConfig {
    /// Load configuration from the default search path.
    ///
    /// Returns the default config if no file is found. A path named by
    /// `FRACTAL_NOISE_CONFIG` that does not exist is an error.
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            let path = PathBuf::from(path);
            if !path.exists() {
                return Err(ConfigError::NotFound(format!(
                    "{}={}",
                    CONFIG_ENV_VAR,
                    path.display()
                )));
            }
            return Self::load_from(&path);
        }

        for path in Self::config_search_paths() {
            if path.exists() {
                return Self::load_from(&path);
            }
        }

        tracing::debug!("no config file found, using defaults");
        Ok(Self::default())
    }

    /// Load configuration from a specific file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        tracing::debug!(path = %path.display(), "loading config");
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(format!("{}: {}", path.display(), e)))?;

        Self::parse(&content)
    }

    /// Parse and validate configuration from a YAML string.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_yaml::from_str(yaml).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content =
            serde_yaml::to_string(self).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        std::fs::write(path, content)
            .map_err(|e| ConfigError::ReadError(format!("{}: {}", path.display(), e)))
    }

    /// Candidate files, in search order, after the environment variable.
    pub fn config_search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("./fractal-noise.yaml")];

        if let Some(dirs) = directories::ProjectDirs::from("", "", "fractal-noise") {
            paths.push(dirs.config_dir().join("config.yaml"));
        }

        paths.push(PathBuf::from("/etc/fractal-noise/config.yaml"));
        paths
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.params
            .validate()
            .map_err(|e| ConfigError::ValidationError(format!("params: {}", e)))?;

        if !self.integrator.initial_value.is_finite() {
            return Err(ConfigError::ValidationError(
                "integrator.initial_value must be finite".to_string(),
            ));
        }
        if !(self.integrator.clamp.is_finite() && self.integrator.clamp > 0.0) {
            return Err(ConfigError::ValidationError(
                "integrator.clamp must be finite and positive".to_string(),
            ));
        }

        Ok(())
    }

    /// Synthesizer seeded from `seed`, or from the OS when unset.
    pub fn synthesizer(&self) -> NoiseSynthesizer<SharedPlans> {
        match self.seed {
            Some(seed) => NoiseSynthesizer::with_seed(seed),
            None => NoiseSynthesizer::from_entropy(),
        }
    }

    /// Generator set up with this configuration's seed and integrator.
    pub fn generator(&self) -> FractalNoiseGenerator<SharedPlans> {
        FractalNoiseGenerator::new(self.synthesizer())
            .with_initial_value(self.integrator.initial_value)
            .with_clamp(self.integrator.clamp)
    }

    /// Generate example configuration YAML.
    pub fn example_yaml() -> String {
        let config = Self {
            seed: Some(42),
            ..Default::default()
        };
        serde_yaml::to_string(&config).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise::NoiseColor;
    use crate::observe::LogLevel;

    #[test]
    fn test_default_config() {
        let config = FractalNoiseConfig::default();
        assert_eq!(config.version, "1.0");
        assert_eq!(config.seed, None);
        assert_eq!(config.params.samples, 1024);
        assert_eq!(config.params.noise_type, NoiseColor::Pink);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
seed: 7
params:
  samples: 2048
  beta: 0.6
  fractalDim: 1.8
  noiseType: brown
integrator:
  clamp: 4.0
logging:
  level: debug
"#;

        let config = FractalNoiseConfig::parse(yaml).unwrap();
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.params.samples, 2048);
        assert_eq!(config.params.beta, 0.6);
        assert_eq!(config.params.fractal_dim, 1.8);
        assert_eq!(config.params.noise_type, NoiseColor::Brown);
        assert_eq!(config.integrator.clamp, 4.0);
        assert_eq!(config.logging.level, LogLevel::Debug);
        // Defaults fill the rest
        assert_eq!(config.params.alpha, 0.5);
        assert_eq!(config.integrator.initial_value, 0.05);
    }

    #[test]
    fn test_parse_snake_case_params() {
        let yaml = "params:\n  fractal_dim: 1.2\n  noise_type: white\n";
        let config = FractalNoiseConfig::parse(yaml).unwrap();
        assert_eq!(config.params.fractal_dim, 1.2);
        assert_eq!(config.params.noise_type, NoiseColor::White);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            FractalNoiseConfig::parse("params: [1, 2"),
            Err(ConfigError::ParseError(_))
        ));
        assert!(matches!(
            FractalNoiseConfig::parse("params:\n  noiseType: purple\n"),
            Err(ConfigError::ParseError(_))
        ));
        assert!(matches!(
            FractalNoiseConfig::parse("params:\n  samples: 1000\n"),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_validation() {
        let mut config = FractalNoiseConfig::default();
        config.integrator.clamp = 0.0;
        assert!(config.validate().is_err());

        config.integrator.clamp = 10.0;
        config.integrator.initial_value = f64::NAN;
        assert!(config.validate().is_err());

        config.integrator.initial_value = 0.05;
        config.params.samples = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().starts_with("invalid config: params:"));
    }

    #[test]
    fn test_example_yaml() {
        let yaml = FractalNoiseConfig::example_yaml();
        assert!(yaml.contains("params:"));
        assert!(yaml.contains("noiseType: pink"));
        let parsed = FractalNoiseConfig::parse(&yaml).unwrap();
        assert_eq!(parsed.seed, Some(42));
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!(
            "fractal-noise-config-{}.yaml",
            std::process::id()
        ));
        let config = FractalNoiseConfig {
            seed: Some(99),
            params: NoiseParams {
                samples: 256,
                noise_type: NoiseColor::Blue,
                ..Default::default()
            },
            ..Default::default()
        };

        config.save(&path).unwrap();
        let loaded = FractalNoiseConfig::load_from(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file() {
        let result = FractalNoiseConfig::load_from(Path::new("/nonexistent/fractal-noise.yaml"));
        assert!(matches!(result, Err(ConfigError::ReadError(_))));
    }

    #[test]
    fn test_config_search_paths() {
        let paths = FractalNoiseConfig::config_search_paths();
        assert!(paths.len() >= 2);
        assert!(paths[0].ends_with("fractal-noise.yaml"));
        assert_eq!(
            paths.last().map(PathBuf::as_path),
            Some(Path::new("/etc/fractal-noise/config.yaml"))
        );
    }

    #[test]
    fn test_seeded_generator_is_reproducible() {
        let config = FractalNoiseConfig {
            seed: Some(5),
            params: NoiseParams {
                samples: 128,
                ..Default::default()
            },
            ..Default::default()
        };
        let a = config.generator().generate(&config.params).unwrap();
        let b = config.generator().generate(&config.params).unwrap();
        assert_eq!(a.signal, b.signal);
    }
}
