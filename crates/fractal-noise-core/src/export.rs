//! JSON export of a generation run
//!
//! A snapshot holds the parameters, the MFSU signal, its spectrum and an
//! RFC 3339 creation time:
//!
//! ```json
//! {
//!   "parameters": { "samples": 1024, "alpha": 0.5, ... },
//!   "signal": [0.05, ...],
//!   "spectrum": [12.3, ...],
//!   "timestamp": "2024-01-01T00:00:00+00:00"
//! }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::generator::{FractalNoiseData, NoiseParams};
use crate::stats::SignalStats;
use crate::types::RealSignal;

/// Serializable snapshot of one generation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoiseExport {
    pub parameters: NoiseParams,
    pub signal: RealSignal,
    pub spectrum: RealSignal,
    pub timestamp: String,
}

impl NoiseExport {
    /// Snapshot stamped with the current time
    pub fn new(parameters: NoiseParams, data: &FractalNoiseData) -> Self {
        Self::at(parameters, data, Utc::now())
    }

    /// Snapshot stamped with a given time
    pub fn at(parameters: NoiseParams, data: &FractalNoiseData, time: DateTime<Utc>) -> Self {
        Self {
            parameters,
            signal: data.signal.clone(),
            spectrum: data.spectrum.clone(),
            timestamp: time.to_rfc3339(),
        }
    }

    /// Output as JSON
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }

    /// Output as compact JSON (one line)
    pub fn to_json_compact(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Suggested download name, `fractal-noise-<unix millis>.json`.
    ///
    /// An unparseable timestamp falls back to `0`.
    pub fn file_name(&self) -> String {
        let millis = DateTime::parse_from_rfc3339(&self.timestamp)
            .map(|t| t.timestamp_millis())
            .unwrap_or(0);
        format!("fractal-noise-{}.json", millis)
    }

    pub fn stats(&self) -> SignalStats {
        SignalStats::compute(&self.signal)
    }

    /// Human-readable summary
    pub fn to_text(&self) -> String {
        let stats = self.stats();
        let p = &self.parameters;
        let mut s = String::new();

        s.push_str("Fractal Noise Export\n");
        s.push_str("====================\n\n");
        s.push_str(&format!("Timestamp:     {}\n", self.timestamp));
        s.push_str(&format!("Samples:       {}\n", p.samples));
        s.push_str(&format!("Noise:         {}\n", p.noise_type));
        s.push_str(&format!(
            "MFSU:          alpha={} beta={} gamma={} D={}\n\n",
            p.alpha, p.beta, p.gamma, p.fractal_dim
        ));
        s.push_str(&format!("  Mean:        {:>12.6}\n", stats.mean));
        s.push_str(&format!("  Std dev:     {:>12.6}\n", stats.std_dev));
        s.push_str(&format!("  Entropy:     {:>12.4} bits\n", stats.entropy));

        s
    }
}
