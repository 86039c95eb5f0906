//! # Fractal Noise Core
//!
//! Spectral noise synthesis on top of a radix-2 FFT.
//!
//! ## Overview
//!
//! - **Transform Engine**: Precomputed power-of-two plans with forward and
//!   inverse transforms over interleaved complex buffers
//! - **Noise Synthesis**: White noise, and colored noise with power spectrum
//!   `1/f^β` obtained by shaping white noise in the frequency domain
//! - **Analysis**: Magnitude/phase spectra, windowed PSD and power-law fits
//! - **MFSU Generator**: Colored noise driving a nonlinear fractal equation,
//!   with summary statistics and JSON export
//!
//! ## Signal Flow
//!
//! ```text
//! white ──► FFT ──► × (k/N)^(β/2), mirror ──► IFFT ──► colored
//! colored ──► MFSU integration ──► ψ ──► FFT ──► |Ψ[k]|
//! ```
//!
//! ## Example
//!
//! ```rust
//! use fractal_noise_core::{NoiseColor, NoiseSynthesizer};
//!
//! let mut synth = NoiseSynthesizer::with_seed(1);
//! let pink = synth.noise(4096, NoiseColor::Pink).unwrap();
//! let spectrum = synth.power_spectrum(&pink).unwrap();
//! assert_eq!(spectrum.len(), 2048);
//! ```

pub mod config;
pub mod export;
pub mod fft;
pub mod generator;
pub mod mfsu;
pub mod noise;
pub mod observe;
pub mod spectrum;
pub mod stats;
pub mod types;
pub mod window;

// Re-export main types
pub use config::{ConfigError, FractalNoiseConfig};
pub use export::NoiseExport;
pub use fft::{PlanCache, PlanSource, SharedPlans, TransformPlan};
pub use generator::{FractalNoiseData, FractalNoiseGenerator, NoiseParams};
pub use mfsu::{MfsuIntegrator, MfsuParams};
pub use noise::{shape_spectrum, NoiseColor, NoiseSynthesizer};
pub use spectrum::{Psd, PowerLawFit};
pub use stats::SignalStats;
pub use types::{NoiseError, NoiseResult, RealSignal, Sample};
pub use window::WindowFunction;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fft::{PlanCache, PlanSource, SharedPlans, TransformPlan};
    pub use crate::generator::{FractalNoiseGenerator, NoiseParams};
    pub use crate::noise::{NoiseColor, NoiseSynthesizer};
    pub use crate::types::{NoiseError, NoiseResult};
}
