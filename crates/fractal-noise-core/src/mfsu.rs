//! # MFSU Integrator
//!
//! Euler integration of the noise-driven fractal difference equation
//!
//! ```text
//! dψ/dt = α·|ψ|^(D-1)·ψ + β·ξ(t)·ψ − γ·ψ³
//! ```
//!
//! where `ξ` is a (usually colored) noise sequence and `D` the fractal
//! dimension. The time step is `1/len(ξ)` and the state is clamped to
//! `[-clamp, clamp]` after every step.

use serde::{Deserialize, Serialize};

use crate::types::{NoiseError, NoiseResult, RealSignal};

/// Coefficients of the MFSU equation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MfsuParams {
    /// Fractal diffusion coefficient
    pub alpha: f64,
    /// Multiplicative noise coupling
    pub beta: f64,
    /// Cubic damping
    pub gamma: f64,
    /// Fractal dimension `D`
    pub fractal_dim: f64,
}

impl Default for MfsuParams {
    fn default() -> Self {
        Self {
            alpha: 0.5,
            beta: 0.3,
            gamma: 0.1,
            fractal_dim: 1.5,
        }
    }
}

impl MfsuParams {
    pub fn validate(&self) -> NoiseResult<()> {
        let fields = [
            ("alpha", self.alpha),
            ("beta", self.beta),
            ("gamma", self.gamma),
            ("fractal_dim", self.fractal_dim),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(NoiseError::Domain(format!(
                    "{} must be finite, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

/// Integrates the MFSU equation over a noise sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct MfsuIntegrator {
    params: MfsuParams,
    initial_value: f64,
    clamp: f64,
}

impl MfsuIntegrator {
    pub const DEFAULT_INITIAL_VALUE: f64 = 0.05;
    pub const DEFAULT_CLAMP: f64 = 10.0;

    pub fn new(params: MfsuParams) -> Self {
        Self {
            params,
            initial_value: Self::DEFAULT_INITIAL_VALUE,
            clamp: Self::DEFAULT_CLAMP,
        }
    }

    /// Set `ψ(0)`.
    pub fn with_initial_value(mut self, initial_value: f64) -> Self {
        self.initial_value = initial_value;
        self
    }

    /// Set the symmetric bound applied after each step.
    pub fn with_clamp(mut self, clamp: f64) -> Self {
        self.clamp = clamp;
        self
    }

    pub fn params(&self) -> &MfsuParams {
        &self.params
    }

    pub fn initial_value(&self) -> f64 {
        self.initial_value
    }

    pub fn clamp(&self) -> f64 {
        self.clamp
    }

    /// Right-hand side of the equation for state `psi` and noise `xi`.
    pub fn derivative(&self, psi: f64, xi: f64) -> f64 {
        let MfsuParams {
            alpha,
            beta,
            gamma,
            fractal_dim,
        } = self.params;

        // |0|^(D-1) diverges for D < 1; the product with ψ is still zero
        let diffusion = if psi == 0.0 {
            0.0
        } else {
            alpha * psi.abs().powf(fractal_dim - 1.0) * psi
        };
        diffusion + beta * xi * psi - gamma * psi * psi * psi
    }

    /// Integrate over `noise`, returning one state per noise sample.
    ///
    /// `signal[0]` is the initial value; `signal[i]` is computed from
    /// `signal[i-1]` and `noise[i-1]`.
    pub fn integrate(&self, noise: &[f64]) -> NoiseResult<RealSignal> {
        self.params.validate()?;
        if !self.initial_value.is_finite() {
            return Err(NoiseError::Domain(format!(
                "initial value must be finite, got {}",
                self.initial_value
            )));
        }
        if !(self.clamp.is_finite() && self.clamp > 0.0) {
            return Err(NoiseError::Domain(format!(
                "clamp must be finite and positive, got {}",
                self.clamp
            )));
        }
        if noise.is_empty() {
            return Ok(Vec::new());
        }

        let dt = 1.0 / noise.len() as f64;
        let mut signal = Vec::with_capacity(noise.len());
        let mut psi = self.initial_value.clamp(-self.clamp, self.clamp);
        signal.push(psi);

        for &xi in &noise[..noise.len() - 1] {
            psi = (psi + self.derivative(psi, xi) * dt).clamp(-self.clamp, self.clamp);
            signal.push(psi);
        }
        Ok(signal)
    }
}

impl Default for MfsuIntegrator {
    fn default() -> Self {
        Self::new(MfsuParams::default())
    }
}
