//! Radix-2 Transform Engine
//!
//! An iterative, in-place Cooley-Tukey FFT over interleaved complex buffers.
//! Everything that depends only on the transform size lives in a
//! [`TransformPlan`]: twiddle factors and the bit-reversal permutation. Plans
//! are immutable once built and are shared through a [`PlanSource`].
//!
//! ## Buffer Layout
//!
//! ```text
//! index:   0    1    2    3    4    5   ...  2N-2   2N-1
//!        [re0, im0, re1, im1, re2, im2, ..., reN-1, imN-1]
//! ```
//!
//! ## Transform Structure
//!
//! The input is first reordered by bit-reversed index, then combined in
//! `log2(N)` butterfly stages. Stage `s` merges pairs of `2^s`-point
//! transforms:
//!
//! ```text
//!   top ──────┬──── (+) ──── top + w·bottom
//!             ╲    ╱
//!              ╲  ╱
//!               ╳
//!              ╱  ╲
//!             ╱    ╲
//!   bottom ─(w)──── (−) ──── top − w·bottom
//! ```
//!
//! The forward transform uses `w = e^{-2πik/N}`. The inverse runs the same
//! network with conjugated twiddles and scales by `1/N`, so
//! `inverse(forward(x)) == x` up to rounding.

use std::collections::HashMap;
use std::f64::consts::PI;
use std::fmt;
use std::sync::{Arc, Mutex, OnceLock};

use num_complex::Complex64;

use crate::types::{NoiseError, NoiseResult, RealSignal};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Forward,
    Inverse,
}

/// Precomputed tables for a fixed power-of-two transform size
#[derive(Clone, PartialEq)]
pub struct TransformPlan {
    size: usize,
    log2_size: u32,
    /// `cos(-2πi/N)`
    cos_table: Vec<f64>,
    /// `sin(-2πi/N)`
    sin_table: Vec<f64>,
    bit_reverse_table: Vec<usize>,
}

impl fmt::Debug for TransformPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformPlan")
            .field("size", &self.size)
            .field("log2_size", &self.log2_size)
            .finish()
    }
}

impl TransformPlan {
    /// Build the tables for an `size`-point transform.
    ///
    /// Fails with [`NoiseError::InvalidSize`] unless `size` is a positive
    /// power of two.
    pub fn new(size: usize) -> NoiseResult<Self> {
        if !size.is_power_of_two() {
            return Err(NoiseError::InvalidSize { size });
        }

        let (cos_table, sin_table): (Vec<f64>, Vec<f64>) = (0..size)
            .map(|i| {
                let angle = -2.0 * PI * i as f64 / size as f64;
                (angle.cos(), angle.sin())
            })
            .unzip();

        let plan = Self {
            size,
            log2_size: size.trailing_zeros(),
            cos_table,
            sin_table,
            bit_reverse_table: bit_reverse_table(size),
        };
        tracing::debug!(size, stages = plan.log2_size, "built transform plan");
        Ok(plan)
    }

    /// Number of complex points.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of butterfly stages, `log2(N)`.
    pub fn stages(&self) -> u32 {
        self.log2_size
    }

    /// Required length of an interleaved buffer, `2N`.
    pub fn buffer_len(&self) -> usize {
        2 * self.size
    }

    pub fn cos_table(&self) -> &[f64] {
        &self.cos_table
    }

    pub fn sin_table(&self) -> &[f64] {
        &self.sin_table
    }

    pub fn bit_reverse_table(&self) -> &[usize] {
        &self.bit_reverse_table
    }

    /// A zeroed interleaved buffer of the right length.
    pub fn complex_buffer(&self) -> Vec<f64> {
        vec![0.0; self.buffer_len()]
    }

    /// Forward transform, in place.
    ///
    /// The length of `buffer` is checked before it is touched; on error the
    /// buffer is left exactly as it was.
    pub fn forward(&self, buffer: &mut [f64]) -> NoiseResult<()> {
        self.check_len(buffer.len())?;
        self.transform(buffer, Direction::Forward);
        Ok(())
    }

    /// Inverse transform, in place, including the `1/N` scaling of both the
    /// real and imaginary channels.
    pub fn inverse(&self, buffer: &mut [f64]) -> NoiseResult<()> {
        self.check_len(buffer.len())?;
        self.transform(buffer, Direction::Inverse);

        let scale = 1.0 / self.size as f64;
        for value in buffer.iter_mut() {
            *value *= scale;
        }
        Ok(())
    }

    /// Forward transform of `input` written to `output`; `input` is not
    /// modified.
    pub fn forward_into(&self, input: &[f64], output: &mut [f64]) -> NoiseResult<()> {
        self.copy_checked(input, output)?;
        self.transform(output, Direction::Forward);
        Ok(())
    }

    /// Inverse transform of `input` written to `output`.
    pub fn inverse_into(&self, input: &[f64], output: &mut [f64]) -> NoiseResult<()> {
        self.copy_checked(input, output)?;
        self.inverse(output)
    }

    /// Forward transform of a real signal of length `N`, returning the
    /// interleaved spectrum.
    pub fn real_forward(&self, signal: &[f64]) -> NoiseResult<Vec<f64>> {
        if signal.len() != self.size {
            return Err(NoiseError::SizeMismatch {
                expected: self.size,
                actual: signal.len(),
            });
        }
        let mut buffer = real_to_complex(signal);
        self.transform(&mut buffer, Direction::Forward);
        Ok(buffer)
    }

    fn check_len(&self, actual: usize) -> NoiseResult<()> {
        let expected = self.buffer_len();
        if actual != expected {
            return Err(NoiseError::SizeMismatch { expected, actual });
        }
        Ok(())
    }

    fn copy_checked(&self, input: &[f64], output: &mut [f64]) -> NoiseResult<()> {
        self.check_len(input.len())?;
        self.check_len(output.len())?;
        output.copy_from_slice(input);
        Ok(())
    }

    fn permute(&self, buffer: &mut [f64]) {
        for (i, &j) in self.bit_reverse_table.iter().enumerate() {
            if i < j {
                buffer.swap(2 * i, 2 * j);
                buffer.swap(2 * i + 1, 2 * j + 1);
            }
        }
    }

    fn transform(&self, buffer: &mut [f64], direction: Direction) {
        self.permute(buffer);

        let sign = match direction {
            Direction::Forward => 1.0,
            Direction::Inverse => -1.0,
        };
        let half = self.size / 2;

        let mut limit = 1;
        while limit < self.size {
            let stride = half / limit;
            for block in (0..self.size).step_by(2 * limit) {
                for j in 0..limit {
                    let k = j * stride;
                    let cos = self.cos_table[k];
                    let sin = sign * self.sin_table[k];

                    let top = 2 * (block + j);
                    let bottom = top + 2 * limit;

                    let bre = buffer[bottom];
                    let bim = buffer[bottom + 1];
                    let tre = cos * bre - sin * bim;
                    let tim = sin * bre + cos * bim;

                    let are = buffer[top];
                    let aim = buffer[top + 1];
                    buffer[top] = are + tre;
                    buffer[top + 1] = aim + tim;
                    buffer[bottom] = are - tre;
                    buffer[bottom + 1] = aim - tim;
                }
            }
            limit <<= 1;
        }
    }
}

/// Bit-reversal permutation for a power-of-two `size`, built by doubling.
///
/// The first `limit` entries are already known; the next `limit` entries are
/// the same values with the next-lower bit set.
fn bit_reverse_table(size: usize) -> Vec<usize> {
    let mut table = vec![0usize; size];
    let mut limit = 1;
    let mut bit = size >> 1;
    while limit < size {
        for i in 0..limit {
            table[i + limit] = table[i] + bit;
        }
        limit <<= 1;
        bit >>= 1;
    }
    table
}

/// Interleave a real signal with zero imaginary parts.
pub fn real_to_complex(signal: &[f64]) -> Vec<f64> {
    signal.iter().flat_map(|&re| [re, 0.0]).collect()
}

/// Extract the real parts of an interleaved buffer. Imaginary parts are
/// dropped; the caller is responsible for them being negligible.
pub fn complex_to_real(buffer: &[f64]) -> RealSignal {
    buffer.iter().step_by(2).copied().collect()
}

fn bin_iter(buffer: &[f64]) -> impl Iterator<Item = Complex64> + '_ {
    buffer
        .chunks_exact(2)
        .map(|pair| Complex64::new(pair[0], pair[1]))
}

/// View an interleaved buffer as `Complex64` bins.
pub fn bins(buffer: &[f64]) -> Vec<Complex64> {
    bin_iter(buffer).collect()
}

/// Flatten `Complex64` bins into an interleaved buffer.
pub fn from_bins(bins: &[Complex64]) -> Vec<f64> {
    bins.iter().flat_map(|c| [c.re, c.im]).collect()
}

/// `|X[k]|` for every bin of an interleaved buffer.
pub fn magnitudes(buffer: &[f64]) -> Vec<f64> {
    bin_iter(buffer).map(|c| c.norm()).collect()
}

/// `arg(X[k])` for every bin of an interleaved buffer.
pub fn phases(buffer: &[f64]) -> Vec<f64> {
    bin_iter(buffer).map(|c| c.arg()).collect()
}

// ============================================================================
// Plan sources
// ============================================================================

/// Supplies transform plans by size.
///
/// Consumers such as the noise synthesizer take a `PlanSource` instead of
/// reaching for a global, so tests can hand them an isolated cache.
pub trait PlanSource {
    fn plan(&self, size: usize) -> NoiseResult<Arc<TransformPlan>>;
}

impl<T: PlanSource + ?Sized> PlanSource for &T {
    fn plan(&self, size: usize) -> NoiseResult<Arc<TransformPlan>> {
        (**self).plan(size)
    }
}

impl<T: PlanSource + ?Sized> PlanSource for Arc<T> {
    fn plan(&self, size: usize) -> NoiseResult<Arc<TransformPlan>> {
        (**self).plan(size)
    }
}

/// Memoizes plans by size.
#[derive(Debug, Default)]
pub struct PlanCache {
    plans: Mutex<HashMap<usize, Arc<TransformPlan>>>,
}

impl PlanCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached plans.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, size: usize) -> bool {
        self.lock().contains_key(&size)
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    // Entries are immutable, so a poisoned map is still consistent.
    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<usize, Arc<TransformPlan>>> {
        self.plans
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl PlanSource for PlanCache {
    fn plan(&self, size: usize) -> NoiseResult<Arc<TransformPlan>> {
        let mut plans = self.lock();
        if let Some(plan) = plans.get(&size) {
            tracing::trace!(size, "transform plan cache hit");
            return Ok(Arc::clone(plan));
        }
        let plan = Arc::new(TransformPlan::new(size)?);
        plans.insert(size, Arc::clone(&plan));
        Ok(plan)
    }
}

static SHARED_PLAN_CACHE: OnceLock<PlanCache> = OnceLock::new();

/// The process-wide plan cache.
pub fn shared_plan_cache() -> &'static PlanCache {
    SHARED_PLAN_CACHE.get_or_init(PlanCache::new)
}

/// Fetch (or build and cache) a plan from the process-wide cache.
pub fn shared_plan(size: usize) -> NoiseResult<Arc<TransformPlan>> {
    shared_plan_cache().plan(size)
}

/// [`PlanSource`] backed by the process-wide cache.
#[derive(Debug, Clone, Copy, Default)]
pub struct SharedPlans;

impl PlanSource for SharedPlans {
    fn plan(&self, size: usize) -> NoiseResult<Arc<TransformPlan>> {
        shared_plan(size)
    }
}
