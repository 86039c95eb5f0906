//! # Fractal Noise Generator
//!
//! End-to-end pipeline:
//!
//! ```text
//! NoiseParams ──► colored noise ξ ──► MFSU integration ψ ──► |Ψ[k]|
//!                  (noise.rs)           (mfsu.rs)            (spectrum.rs)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use fractal_noise_core::generator::{FractalNoiseGenerator, NoiseParams};
//! use fractal_noise_core::noise::NoiseColor;
//!
//! let mut generator = FractalNoiseGenerator::with_seed(7);
//! let params = NoiseParams {
//!     samples: 512,
//!     noise_type: NoiseColor::Brown,
//!     ..Default::default()
//! };
//! let data = generator.generate(&params).unwrap();
//! assert_eq!(data.signal.len(), 512);
//! assert_eq!(data.spectrum.len(), 256);
//! ```

use serde::{Deserialize, Serialize};

use crate::fft::{PlanSource, SharedPlans};
use crate::mfsu::{MfsuIntegrator, MfsuParams};
use crate::noise::{NoiseColor, NoiseSynthesizer};
use crate::stats::SignalStats;
use crate::types::{NoiseError, NoiseResult, RealSignal};

/// User-facing parameter set of one generation run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NoiseParams {
    /// Signal length (power of two)
    pub samples: usize,
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
    #[serde(alias = "fractal_dim")]
    pub fractal_dim: f64,
    #[serde(alias = "noise_type")]
    pub noise_type: NoiseColor,
}

impl Default for NoiseParams {
    fn default() -> Self {
        let mfsu = MfsuParams::default();
        Self {
            samples: 1024,
            alpha: mfsu.alpha,
            beta: mfsu.beta,
            gamma: mfsu.gamma,
            fractal_dim: mfsu.fractal_dim,
            noise_type: NoiseColor::Pink,
        }
    }
}

impl NoiseParams {
    /// The MFSU coefficients of this parameter set.
    pub fn mfsu(&self) -> MfsuParams {
        MfsuParams {
            alpha: self.alpha,
            beta: self.beta,
            gamma: self.gamma,
            fractal_dim: self.fractal_dim,
        }
    }

    pub fn validate(&self) -> NoiseResult<()> {
        if !self.samples.is_power_of_two() {
            return Err(NoiseError::InvalidSize { size: self.samples });
        }
        self.mfsu().validate()
    }

    /// Encode as a URL query, e.g.
    /// `samples=1024&alpha=0.5&beta=0.3&gamma=0.1&fractalDim=1.5&noiseType=pink`.
    pub fn to_query_string(&self) -> String {
        serde_urlencoded::to_string(self).unwrap_or_default()
    }

    /// Shareable link: `base` followed by the encoded parameters.
    pub fn share_url(&self, base: &str) -> String {
        format!("{}?{}", base.trim_end_matches('?'), self.to_query_string())
    }

    /// Parse parameters from a query string or a full URL.
    ///
    /// Missing keys and keys with an empty value keep their defaults; unknown
    /// keys are ignored. The result is not validated.
    pub fn from_query(query: &str) -> NoiseResult<Self> {
        let query = query.split_once('#').map_or(query, |(before, _)| before);
        let query = query.split_once('?').map_or(query, |(_, after)| after);
        let filled = query
            .split('&')
            .filter(|pair| pair.split_once('=').map_or(false, |(_, value)| !value.is_empty()))
            .collect::<Vec<_>>()
            .join("&");

        serde_urlencoded::from_str(&filled)
            .map_err(|e| NoiseError::Domain(format!("invalid parameter query: {}", e)))
    }
}

/// Output of one generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FractalNoiseData {
    /// MFSU state ψ
    pub signal: RealSignal,
    /// Driving noise ξ
    pub noise: RealSignal,
    /// Sample times in `[0, 1)`
    pub time: RealSignal,
    /// Magnitude spectrum of `signal`, bins `0..samples/2`
    pub spectrum: RealSignal,
}

impl FractalNoiseData {
    pub fn stats(&self) -> SignalStats {
        SignalStats::compute(&self.signal)
    }
}

/// Runs the noise → MFSU → spectrum pipeline.
#[derive(Debug, Clone)]
pub struct FractalNoiseGenerator<P = SharedPlans> {
    synth: NoiseSynthesizer<P>,
    initial_value: f64,
    clamp: f64,
}

impl FractalNoiseGenerator<SharedPlans> {
    pub fn with_seed(seed: u64) -> Self {
        Self::new(NoiseSynthesizer::with_seed(seed))
    }
}

impl<P: PlanSource> FractalNoiseGenerator<P> {
    pub fn new(synth: NoiseSynthesizer<P>) -> Self {
        Self {
            synth,
            initial_value: MfsuIntegrator::DEFAULT_INITIAL_VALUE,
            clamp: MfsuIntegrator::DEFAULT_CLAMP,
        }
    }

    /// Set the initial MFSU state used by every run.
    pub fn with_initial_value(mut self, initial_value: f64) -> Self {
        self.initial_value = initial_value;
        self
    }

    /// Set the MFSU state bound used by every run.
    pub fn with_clamp(mut self, clamp: f64) -> Self {
        self.clamp = clamp;
        self
    }

    pub fn synthesizer(&mut self) -> &mut NoiseSynthesizer<P> {
        &mut self.synth
    }

    pub fn generate(&mut self, params: &NoiseParams) -> NoiseResult<FractalNoiseData> {
        params.validate()?;
        let n = params.samples;

        let noise = self.synth.noise(n, params.noise_type)?;
        let signal = MfsuIntegrator::new(params.mfsu())
            .with_initial_value(self.initial_value)
            .with_clamp(self.clamp)
            .integrate(&noise)?;
        let spectrum = self.synth.power_spectrum(&signal)?;
        let time = (0..n).map(|i| i as f64 / n as f64).collect();

        tracing::debug!(
            samples = n,
            color = %params.noise_type,
            alpha = params.alpha,
            beta = params.beta,
            gamma = params.gamma,
            fractal_dim = params.fractal_dim,
            "generated fractal noise"
        );

        Ok(FractalNoiseData {
            signal,
            noise,
            time,
            spectrum,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fft::PlanCache;
    use approx::assert_relative_eq;

    fn generator(seed: u64) -> FractalNoiseGenerator<PlanCache> {
        FractalNoiseGenerator::new(NoiseSynthesizer::new(PlanCache::new(), seed))
    }

    #[test]
    fn test_generate_shapes() {
        let params = NoiseParams {
            samples: 256,
            ..Default::default()
        };
        let data = generator(1).generate(&params).unwrap();
        assert_eq!(data.signal.len(), 256);
        assert_eq!(data.noise.len(), 256);
        assert_eq!(data.time.len(), 256);
        assert_eq!(data.spectrum.len(), 128);
        assert_eq!(data.time[0], 0.0);
        assert_relative_eq!(data.time[128], 0.5);
        assert_eq!(data.signal[0], MfsuIntegrator::DEFAULT_INITIAL_VALUE);
        assert!(data.signal.iter().all(|s| s.abs() <= 10.0));
    }

    #[test]
    fn test_generate_all_colors() {
        let mut generator = generator(2);
        for color in NoiseColor::ALL {
            let params = NoiseParams {
                samples: 128,
                noise_type: color,
                ..Default::default()
            };
            let data = generator.generate(&params).unwrap();
            assert!(data.signal.iter().all(|s| s.is_finite()));
            assert!(data.spectrum.iter().all(|s| s.is_finite()));
        }
    }

    #[test]
    fn test_same_seed_same_output() {
        let params = NoiseParams::default();
        let a = generator(3).generate(&params).unwrap();
        let b = generator(3).generate(&params).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_custom_initial_value() {
        let params = NoiseParams {
            samples: 64,
            ..Default::default()
        };
        let data = generator(4)
            .with_initial_value(0.08)
            .generate(&params)
            .unwrap();
        assert_eq!(data.signal[0], 0.08);
    }

    #[test]
    fn test_invalid_params() {
        let mut generator = generator(5);
        let params = NoiseParams {
            samples: 1000,
            ..Default::default()
        };
        assert_eq!(
            generator.generate(&params).unwrap_err(),
            NoiseError::InvalidSize { size: 1000 }
        );

        let params = NoiseParams {
            gamma: f64::NAN,
            ..Default::default()
        };
        assert!(matches!(
            generator.generate(&params),
            Err(NoiseError::Domain(_))
        ));
    }

    #[test]
    fn test_params_serde_names() {
        let json = serde_json::to_value(NoiseParams::default()).unwrap();
        assert_eq!(json["samples"], 1024);
        assert_eq!(json["fractalDim"], 1.5);
        assert_eq!(json["noiseType"], "pink");

        let parsed: NoiseParams =
            serde_json::from_str(r#"{"samples": 256, "noiseType": "blue"}"#).unwrap();
        assert_eq!(parsed.samples, 256);
        assert_eq!(parsed.noise_type, NoiseColor::Blue);
        assert_eq!(parsed.alpha, NoiseParams::default().alpha);
    }

    #[test]
    fn test_query_string_round_trip() {
        let params = NoiseParams {
            samples: 2048,
            alpha: 0.75,
            beta: 0.2,
            gamma: 0.05,
            fractal_dim: 1.8,
            noise_type: NoiseColor::Brown,
        };
        let query = params.to_query_string();
        assert_eq!(
            query,
            "samples=2048&alpha=0.75&beta=0.2&gamma=0.05&fractalDim=1.8&noiseType=brown"
        );
        assert_eq!(NoiseParams::from_query(&query).unwrap(), params);

        let url = params.share_url("https://noise.example/mfsu/");
        assert!(url.starts_with("https://noise.example/mfsu/?samples=2048&"));
        assert_eq!(NoiseParams::from_query(&url).unwrap(), params);
    }

    #[test]
    fn test_partial_query_keeps_defaults() {
        let params = NoiseParams::from_query("?beta=0.7&noiseType=blue").unwrap();
        assert_eq!(params.beta, 0.7);
        assert_eq!(params.noise_type, NoiseColor::Blue);
        assert_eq!(params.samples, 1024);
        assert_eq!(params.alpha, 0.5);
        assert_eq!(params.fractal_dim, 1.5);

        let params = NoiseParams::from_query("alpha=&samples=256&utm_source=feed#plot").unwrap();
        assert_eq!(params.samples, 256);
        assert_eq!(params.alpha, 0.5);

        assert_eq!(NoiseParams::from_query("").unwrap(), NoiseParams::default());
    }

    #[test]
    fn test_bad_query_values() {
        assert!(matches!(
            NoiseParams::from_query("samples=lots"),
            Err(NoiseError::Domain(_))
        ));
        assert!(matches!(
            NoiseParams::from_query("noiseType=violet"),
            Err(NoiseError::Domain(_))
        ));
    }

    #[test]
    fn test_stats_of_output() {
        let data = generator(6).generate(&NoiseParams::default()).unwrap();
        let stats = data.stats();
        assert_eq!(stats.num_samples, 1024);
        assert!(stats.entropy > 0.0);
    }
}
