//! Core types for the transform engine and noise synthesis
//!
//! Real signals are plain `Vec<f64>`. Complex data crosses the engine as a
//! flat interleaved buffer `[re0, im0, re1, im1, ...]` of length `2N`, which
//! is what the butterfly network operates on in place.

/// A real-valued sample
pub type Sample = f64;

/// An ordered sequence of real samples
pub type RealSignal = Vec<Sample>;

/// Result type for transform and synthesis operations
pub type NoiseResult<T> = Result<T, NoiseError>;

/// Errors raised by the transform engine and the noise synthesizer
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NoiseError {
    #[error("Invalid transform size: {size}. Must be a positive power of two")]
    InvalidSize { size: usize },

    #[error("Buffer size mismatch: expected {expected}, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("Domain error: {0}")]
    Domain(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = NoiseError::InvalidSize { size: 6 };
        assert_eq!(
            err.to_string(),
            "Invalid transform size: 6. Must be a positive power of two"
        );

        let err = NoiseError::SizeMismatch {
            expected: 8,
            actual: 10,
        };
        assert_eq!(err.to_string(), "Buffer size mismatch: expected 8, got 10");
    }
}
