//! Decay scheduler: a single decaying intensity with event-driven restart.
//!
//! The scheduler never sleeps and owns no timer. Whoever drives it keeps at
//! most one pending tick and obeys the returned [`NextAction`] /
//! [`TickOutcome`]:
//!
//! ```text
//! Idle --shake--> Running --tick (intensity > stop)--> Running
//!                 Running --tick (intensity <= stop)--> Idle
//!                 Running --pause--> Idle
//! ```

use std::time::Duration;

use serde::Serialize;

use crate::constants::{DECAY_FACTOR, DELAY_NUMERATOR_MS, MAX_TICK_DELAY_MS, STOP_THRESHOLD};
use crate::direction::{
    ChoiceCount, angle_from_direction, direction_index_from_intensity, name_direction_with,
};
use crate::error::{GravError, Result};
use crate::phrase::{English, PhraseTemplates};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Running,
}

/// Numeric knobs of the decay curve.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SchedulerTuning {
    pub stop_threshold: f64,
    pub decay_factor: f64,
    pub delay_numerator_ms: f64,
}

impl Default for SchedulerTuning {
    fn default() -> Self {
        Self {
            stop_threshold: STOP_THRESHOLD,
            decay_factor: DECAY_FACTOR,
            delay_numerator_ms: DELAY_NUMERATOR_MS,
        }
    }
}

/// What the driver should do with its pending tick after a shake.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NextAction {
    /// Leave the pending tick alone; intensity was only accumulated.
    Keep,
    /// Cancel any pending tick and schedule a new one after this delay.
    Reschedule(Duration),
}

/// One rendered step of the animation.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Frame {
    pub intensity: f64,
    pub direction: u32,
    pub angle_degrees: f64,
    pub text: String,
}

#[derive(Clone, Debug, PartialEq)]
pub enum TickOutcome {
    /// Intensity decayed; render `frame` and tick again after `next`.
    Frame { frame: Frame, next: Duration },
    /// Intensity fell to the stop threshold; the scheduler is now idle.
    Stopped,
}

pub struct DecayScheduler<P = English> {
    choices: ChoiceCount,
    tuning: SchedulerTuning,
    phrases: P,
    intensity: f64,
    state: SchedulerState,
}

impl DecayScheduler<English> {
    pub fn new(choices: ChoiceCount) -> Self {
        Self::with_phrases(choices, SchedulerTuning::default(), English)
    }
}

impl<P: PhraseTemplates> DecayScheduler<P> {
    pub fn with_phrases(choices: ChoiceCount, tuning: SchedulerTuning, phrases: P) -> Self {
        Self {
            choices,
            tuning,
            phrases,
            intensity: 0.0,
            state: SchedulerState::Idle,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn intensity(&self) -> f64 {
        self.intensity
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == SchedulerState::Running
    }

    pub fn choices(&self) -> ChoiceCount {
        self.choices
    }

    pub fn tuning(&self) -> SchedulerTuning {
        self.tuning
    }

    // ── Transitions ──────────────────────────────────────────────────

    /// Feed a debounced shake. While running above the stop threshold the
    /// delta is accumulated; otherwise the animation restarts from `delta`.
    pub fn on_shake_detected(&mut self, delta: f64) -> Result<NextAction> {
        if !delta.is_finite() || delta <= 0.0 {
            return Err(GravError::InvalidArgument(format!(
                "shake delta must be positive and finite, got {delta}"
            )));
        }

        if self.is_running() && self.intensity > self.tuning.stop_threshold {
            self.intensity += delta;
            tracing::trace!(intensity = self.intensity, delta, "shake accumulated");
            return Ok(NextAction::Keep);
        }

        self.intensity = delta;
        self.state = SchedulerState::Running;
        let delay = self.next_delay()?;
        tracing::debug!(intensity = self.intensity, ?delay, "scheduler started");
        Ok(NextAction::Reschedule(delay))
    }

    /// Advance one step. Only valid while running.
    pub fn tick(&mut self) -> Result<TickOutcome> {
        if !self.is_running() {
            return Err(GravError::InvalidState("tick while idle".into()));
        }

        if self.intensity <= self.tuning.stop_threshold {
            self.state = SchedulerState::Idle;
            tracing::debug!(intensity = self.intensity, "scheduler stopped");
            return Ok(TickOutcome::Stopped);
        }

        self.intensity *= self.tuning.decay_factor;
        let frame = self.frame()?;
        let next = self.next_delay()?;
        tracing::trace!(
            intensity = frame.intensity,
            direction = frame.direction,
            ?next,
            "tick"
        );
        Ok(TickOutcome::Frame { frame, next })
    }

    /// Stop without waiting for the decay. The driver drops its pending tick;
    /// nothing restarts until the next shake.
    pub fn pause(&mut self) {
        if self.is_running() {
            tracing::debug!(intensity = self.intensity, "scheduler paused");
        }
        self.state = SchedulerState::Idle;
    }

    /// Delay until the next tick: round(delay_numerator_ms / intensity).
    pub fn next_delay(&self) -> Result<Duration> {
        delay_for_intensity(self.intensity, self.tuning.delay_numerator_ms)
    }

    /// Snapshot of what the current intensity would render as.
    pub fn frame(&self) -> Result<Frame> {
        let direction = direction_index_from_intensity(self.intensity, self.choices);
        Ok(Frame {
            intensity: self.intensity,
            direction,
            angle_degrees: angle_from_direction(direction, self.choices),
            text: name_direction_with(&self.phrases, direction, self.choices.get())?,
        })
    }
}

/// `round(numerator_ms / intensity)` as a duration, clamped to
/// [`MAX_TICK_DELAY_MS`]. Intensity must be strictly positive and finite.
pub fn delay_for_intensity(intensity: f64, numerator_ms: f64) -> Result<Duration> {
    if !intensity.is_finite() || intensity <= 0.0 {
        return Err(GravError::DegenerateState(format!(
            "cannot compute tick delay for intensity {intensity}"
        )));
    }
    let ms = (numerator_ms / intensity).round().min(MAX_TICK_DELAY_MS as f64);
    Ok(Duration::from_millis(ms as u64))
}
