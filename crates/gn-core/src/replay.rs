//! Deterministic driver on a virtual clock.
//!
//! Samples and ticks share one timeline. Before a sample at time `t` is
//! handled, every tick due at or before `t` fires. At most one tick is ever
//! pending; a restart from the scheduler replaces it.

use std::time::Duration;

use crate::error::{GravError, Result};
use crate::phrase::PhraseTemplates;
use crate::sample::Sample;
use crate::scheduler::{DecayScheduler, Frame, NextAction, TickOutcome};
use crate::shake::ShakeDetector;

/// Receives every rendered frame along with its virtual time.
pub trait RenderSink {
    fn render(&mut self, at_ms: u64, frame: &Frame);
}

impl<F: FnMut(u64, &Frame)> RenderSink for F {
    fn render(&mut self, at_ms: u64, frame: &Frame) {
        self(at_ms, frame)
    }
}

/// Sink that keeps everything it is given.
#[derive(Debug, Default)]
pub struct FrameLog {
    pub frames: Vec<(u64, Frame)>,
}

impl RenderSink for FrameLog {
    fn render(&mut self, at_ms: u64, frame: &Frame) {
        self.frames.push((at_ms, frame.clone()));
    }
}

pub struct Replay<P> {
    detector: ShakeDetector,
    scheduler: DecayScheduler<P>,
    clock_ms: u64,
    pending_tick_ms: Option<u64>,
    shakes: usize,
}

impl<P: PhraseTemplates> Replay<P> {
    pub fn new(detector: ShakeDetector, scheduler: DecayScheduler<P>) -> Self {
        Self {
            detector,
            scheduler,
            clock_ms: 0,
            pending_tick_ms: None,
            shakes: 0,
        }
    }

    pub fn clock_ms(&self) -> u64 {
        self.clock_ms
    }

    pub fn pending_tick_ms(&self) -> Option<u64> {
        self.pending_tick_ms
    }

    pub fn scheduler(&self) -> &DecayScheduler<P> {
        &self.scheduler
    }

    /// Number of samples that were forwarded as shakes.
    pub fn shakes(&self) -> usize {
        self.shakes
    }

    /// Handle one sample. Samples must arrive in non-decreasing time order.
    pub fn feed<S>(&mut self, sample: &Sample, sink: &mut S) -> Result<()>
    where
        S: RenderSink + ?Sized,
    {
        if sample.t_ms < self.clock_ms {
            return Err(GravError::InvalidArgument(format!(
                "sample at {}ms is earlier than clock {}ms",
                sample.t_ms, self.clock_ms
            )));
        }
        self.run_until(sample.t_ms, sink)?;
        self.clock_ms = sample.t_ms;

        if let Some(delta) = self.detector.on_sample(sample) {
            self.shake(delta)?;
        }
        Ok(())
    }

    /// Inject a shake delta directly at the current clock, bypassing the detector.
    pub fn shake(&mut self, delta: f64) -> Result<()> {
        self.shakes += 1;
        match self.scheduler.on_shake_detected(delta)? {
            NextAction::Keep => {}
            NextAction::Reschedule(delay) => {
                self.pending_tick_ms = Some(self.deadline(delay)?);
            }
        }
        Ok(())
    }

    /// Fire every tick due at or before `until_ms`, advancing the clock.
    pub fn run_until<S>(&mut self, until_ms: u64, sink: &mut S) -> Result<()>
    where
        S: RenderSink + ?Sized,
    {
        while let Some(due) = self.pending_tick_ms.filter(|&due| due <= until_ms) {
            self.clock_ms = due;
            self.fire(sink)?;
        }
        self.clock_ms = self.clock_ms.max(until_ms);
        Ok(())
    }

    /// Run pending ticks until the scheduler stops. Returns the final clock.
    pub fn finish<S: RenderSink + ?Sized>(&mut self, sink: &mut S) -> Result<u64> {
        while let Some(due) = self.pending_tick_ms {
            self.clock_ms = due;
            self.fire(sink)?;
        }
        Ok(self.clock_ms)
    }

    /// Fire ticks due at or before `at_ms`, then cancel the pending tick and
    /// go idle, as when the owning screen goes away. The detector is
    /// re-primed on the next sample.
    pub fn pause<S>(&mut self, at_ms: u64, sink: &mut S) -> Result<()>
    where
        S: RenderSink + ?Sized,
    {
        self.run_until(at_ms, sink)?;
        self.pending_tick_ms = None;
        self.scheduler.pause();
        self.detector.reset();
        Ok(())
    }

    fn deadline(&self, delay: Duration) -> Result<u64> {
        u64::try_from(delay.as_millis())
            .ok()
            .and_then(|ms| self.clock_ms.checked_add(ms))
            .ok_or_else(|| {
                GravError::InvalidState(format!(
                    "tick after {delay:?} overflows the clock at {}ms",
                    self.clock_ms
                ))
            })
    }

    fn fire<S: RenderSink + ?Sized>(&mut self, sink: &mut S) -> Result<()> {
        self.pending_tick_ms = None;
        match self.scheduler.tick()? {
            TickOutcome::Frame { frame, next } => {
                sink.render(self.clock_ms, &frame);
                self.pending_tick_ms = Some(self.deadline(next)?);
            }
            TickOutcome::Stopped => {}
        }
        Ok(())
    }
}
