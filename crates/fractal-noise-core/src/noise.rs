//! Spectral Noise Synthesizer
//!
//! Generates colored noise by shaping the spectrum of white noise with the
//! radix-2 transform engine.
//!
//! ## Noise Colors
//!
//! | Color  | PSD     | Exponent | Slope      |
//! |--------|---------|----------|------------|
//! | White  | Flat    | 0        | 0 dB/oct   |
//! | Pink   | 1/f     | -1       | -3 dB/oct  |
//! | Brown  | 1/f²    | -2       | -6 dB/oct  |
//! | Blue   | f       | +1       | +3 dB/oct  |
//!
//! ## Shaping
//!
//! ```text
//! white ──► FFT ──► × (k/N)^(e/2) ──► mirror conj ──► zero DC/Nyquist ──► IFFT ──► Re
//! ```
//!
//! Bin `k` in `1..N/2` is scaled and copied as its conjugate into bin `N-k`,
//! so the inverse transform is real up to rounding.
//!
//! ## Example
//!
//! ```rust
//! use fractal_noise_core::fft::PlanCache;
//! use fractal_noise_core::noise::{NoiseColor, NoiseSynthesizer};
//!
//! let mut synth = NoiseSynthesizer::new(PlanCache::new(), 42);
//! let pink = synth.noise(1024, NoiseColor::Pink).unwrap();
//! assert_eq!(pink.len(), 1024);
//! ```

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal, Uniform};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::fft::{complex_to_real, real_to_complex, PlanSource, SharedPlans};
use crate::spectrum::magnitude_spectrum;
use crate::types::{NoiseError, NoiseResult, RealSignal};

/// Noise color / spectral shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoiseColor {
    /// Flat spectrum.
    White,
    /// 1/f spectrum. Also called flicker noise.
    #[default]
    Pink,
    /// 1/f² spectrum. Also called red or Brownian noise.
    Brown,
    /// f spectrum.
    Blue,
}

impl NoiseColor {
    pub const ALL: [NoiseColor; 4] = [
        NoiseColor::White,
        NoiseColor::Pink,
        NoiseColor::Brown,
        NoiseColor::Blue,
    ];

    /// Power-law exponent of the power spectrum.
    pub fn exponent(&self) -> f64 {
        match self {
            NoiseColor::White => 0.0,
            NoiseColor::Pink => -1.0,
            NoiseColor::Brown => -2.0,
            NoiseColor::Blue => 1.0,
        }
    }

    /// Spectral slope in dB/octave.
    pub fn slope_db_per_octave(&self) -> f64 {
        3.0 * self.exponent()
    }

    pub fn name(&self) -> &'static str {
        match self {
            NoiseColor::White => "white",
            NoiseColor::Pink => "pink",
            NoiseColor::Brown => "brown",
            NoiseColor::Blue => "blue",
        }
    }
}

impl fmt::Display for NoiseColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for NoiseColor {
    type Err = NoiseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "white" => Ok(NoiseColor::White),
            "pink" => Ok(NoiseColor::Pink),
            "brown" | "red" => Ok(NoiseColor::Brown),
            "blue" => Ok(NoiseColor::Blue),
            other => Err(NoiseError::Domain(format!("unknown noise color '{}'", other))),
        }
    }
}

/// Scale an interleaved spectrum to a `|f|^exponent` power law.
///
/// Bins `1..N/2` are multiplied by `(k/N)^(exponent/2)` and mirrored as
/// conjugates into `N-k`; DC and Nyquist are zeroed. Every scale factor is
/// computed before the buffer is written, so a [`NoiseError::Domain`] leaves
/// `buffer` unchanged.
pub fn shape_spectrum(buffer: &mut [f64], exponent: f64) -> NoiseResult<()> {
    if buffer.len() % 2 != 0 {
        return Err(NoiseError::SizeMismatch {
            expected: buffer.len() - 1,
            actual: buffer.len(),
        });
    }
    if !exponent.is_finite() {
        return Err(NoiseError::Domain(format!(
            "spectral exponent must be finite, got {}",
            exponent
        )));
    }

    let n = buffer.len() / 2;
    if n < 2 {
        return Ok(());
    }

    let half_exponent = exponent / 2.0;
    let scales = (1..n / 2)
        .map(|k| {
            let scale = (k as f64 / n as f64).powf(half_exponent);
            if scale.is_finite() {
                Ok(scale)
            } else {
                Err(NoiseError::Domain(format!(
                    "exponent {} gives a non-finite scale at bin {}",
                    exponent, k
                )))
            }
        })
        .collect::<NoiseResult<Vec<f64>>>()?;

    for (k, scale) in (1..n / 2).zip(scales) {
        let re = buffer[2 * k] * scale;
        let im = buffer[2 * k + 1] * scale;
        buffer[2 * k] = re;
        buffer[2 * k + 1] = im;

        let mirror = n - k;
        buffer[2 * mirror] = re;
        buffer[2 * mirror + 1] = -im;
    }

    buffer[0] = 0.0;
    buffer[1] = 0.0;
    if n % 2 == 0 {
        buffer[n] = 0.0;
        buffer[n + 1] = 0.0;
    }
    Ok(())
}

/// White and colored noise generator.
///
/// Owns a seeded RNG and the [`PlanSource`] used for every transform.
#[derive(Debug, Clone)]
pub struct NoiseSynthesizer<P = SharedPlans> {
    plans: P,
    rng: StdRng,
}

impl NoiseSynthesizer<SharedPlans> {
    /// Synthesizer backed by the process-wide plan cache.
    pub fn with_seed(seed: u64) -> Self {
        Self::new(SharedPlans, seed)
    }

    /// Synthesizer backed by the process-wide plan cache, seeded from the OS.
    pub fn from_entropy() -> Self {
        Self {
            plans: SharedPlans,
            rng: StdRng::from_entropy(),
        }
    }
}

impl<P: PlanSource> NoiseSynthesizer<P> {
    pub fn new(plans: P, seed: u64) -> Self {
        Self {
            plans,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn plans(&self) -> &P {
        &self.plans
    }

    /// Restart the random sequence.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    /// `n` independent uniform samples in `[-1, 1)`.
    pub fn white_noise(&mut self, n: usize) -> RealSignal {
        let uniform = Uniform::new(-1.0, 1.0);
        uniform.sample_iter(&mut self.rng).take(n).collect()
    }

    /// `n` zero-mean normal samples.
    pub fn gaussian_noise(&mut self, n: usize, std_dev: f64) -> NoiseResult<RealSignal> {
        if !(std_dev.is_finite() && std_dev >= 0.0) {
            return Err(NoiseError::Domain(format!(
                "standard deviation must be finite and non-negative, got {}",
                std_dev
            )));
        }
        let normal = Normal::new(0.0, std_dev).map_err(|e| NoiseError::Domain(e.to_string()))?;
        Ok(normal.sample_iter(&mut self.rng).take(n).collect())
    }

    /// Noise whose power spectrum follows `|f|^exponent`.
    ///
    /// Lengths below two have no frequency bins to shape and come back as
    /// plain white noise. Otherwise `n` must be a power of two.
    pub fn colored_noise(&mut self, n: usize, exponent: f64) -> NoiseResult<RealSignal> {
        if n < 2 {
            return Ok(self.white_noise(n));
        }
        if !n.is_power_of_two() {
            return Err(NoiseError::InvalidSize { size: n });
        }
        let white = self.white_noise(n);
        self.shape(&white, exponent)
    }

    /// Noise of a named color. White noise is returned unshaped.
    pub fn noise(&mut self, n: usize, color: NoiseColor) -> NoiseResult<RealSignal> {
        match color {
            NoiseColor::White => Ok(self.white_noise(n)),
            other => self.colored_noise(n, other.exponent()),
        }
    }

    /// Shape an existing white-noise vector. Deterministic in its inputs.
    pub fn shape(&self, white: &[f64], exponent: f64) -> NoiseResult<RealSignal> {
        if white.len() < 2 {
            return Ok(white.to_vec());
        }
        let mut buffer = self.shaped_spectrum(white, exponent)?;
        let plan = self.plans.plan(white.len())?;
        plan.inverse(&mut buffer)?;
        Ok(complex_to_real(&buffer))
    }

    /// The interleaved spectrum of `white` after shaping, before the inverse
    /// transform.
    pub fn shaped_spectrum(&self, white: &[f64], exponent: f64) -> NoiseResult<Vec<f64>> {
        let plan = self.plans.plan(white.len())?;
        let mut buffer = real_to_complex(white);
        plan.forward(&mut buffer)?;
        shape_spectrum(&mut buffer, exponent)?;
        Ok(buffer)
    }

    /// Magnitudes `|X[k]|` for bins `0..n/2` of a real signal.
    pub fn power_spectrum(&self, signal: &[f64]) -> NoiseResult<RealSignal> {
        magnitude_spectrum(&self.plans, signal)
    }
}
