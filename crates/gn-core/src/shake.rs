//! Shake detection: debounces raw accelerometer samples into shake deltas.

use crate::constants::{SHAKE_DELTA_SCALE, SHAKE_THRESHOLD, UPDATE_FREQUENCY_MS};
use crate::sample::Sample;

#[derive(Clone, Copy, Debug)]
struct Baseline {
    t_ms: u64,
    axis_sum: f64,
}

/// Turns a stream of samples into at most one shake delta per
/// `update_frequency_ms` window.
#[derive(Clone, Debug)]
pub struct ShakeDetector {
    shake_threshold: f64,
    update_frequency_ms: u64,
    last: Option<Baseline>,
}

impl Default for ShakeDetector {
    fn default() -> Self {
        Self::new(SHAKE_THRESHOLD, UPDATE_FREQUENCY_MS)
    }
}

impl ShakeDetector {
    pub fn new(shake_threshold: f64, update_frequency_ms: u64) -> Self {
        Self {
            shake_threshold,
            update_frequency_ms,
            last: None,
        }
    }

    /// Feed one sample. Returns the shake delta when the sample is outside the
    /// debounce window and its delta exceeds the shake threshold.
    ///
    /// delta = |sum(axes) - sum(previous axes)| / elapsed_ms * 10000
    pub fn on_sample(&mut self, sample: &Sample) -> Option<f64> {
        let Some(last) = self.last else {
            self.last = Some(Baseline {
                t_ms: sample.t_ms,
                axis_sum: sample.axis_sum(),
            });
            return None;
        };

        let elapsed = sample.t_ms.saturating_sub(last.t_ms);
        if elapsed <= self.update_frequency_ms {
            return None;
        }

        let axis_sum = sample.axis_sum();
        let delta = (axis_sum - last.axis_sum).abs() / elapsed as f64 * SHAKE_DELTA_SCALE;
        self.last = Some(Baseline {
            t_ms: sample.t_ms,
            axis_sum,
        });

        if delta > self.shake_threshold {
            tracing::trace!(delta, elapsed, "shake detected");
            Some(delta)
        } else {
            None
        }
    }

    /// Forget the baseline; the next sample only primes the detector again.
    pub fn reset(&mut self) {
        self.last = None;
    }
}
