//! Real-time driver: samples from an async line reader, ticks on tokio timers.
//!
//! Each sample's `t_ms` is an offset from the moment the loop starts; a
//! sample is held until its time comes, so a recorded file replays at its
//! original pace. One task owns the detector and the scheduler, and at most
//! one tick deadline is pending at a time.

use anyhow::{Context, Result};
use gn_core::{
    DecayScheduler, NextAction, PhraseTemplates, RenderSink, Sample, ShakeDetector, TickOutcome,
};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::time::{Duration, Instant, sleep_until};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LiveSummary {
    pub samples: usize,
    pub shakes: usize,
    pub frames: usize,
    pub interrupted: bool,
}

pub async fn run_live<R, P, S>(
    reader: R,
    mut detector: ShakeDetector,
    mut scheduler: DecayScheduler<P>,
    sink: &mut S,
) -> Result<LiveSummary>
where
    R: AsyncBufRead + Unpin,
    P: PhraseTemplates,
    S: RenderSink + ?Sized,
{
    let start = Instant::now();
    let elapsed_ms = || start.elapsed().as_millis() as u64;

    let mut lines = reader.lines();
    let mut line_no = 0usize;
    let mut input_open = true;
    let mut held: Option<(Sample, Instant)> = None;
    let mut pending_tick: Option<Instant> = None;
    let mut summary = LiveSummary::default();

    tracing::info!("live loop started");

    loop {
        if !input_open && held.is_none() && pending_tick.is_none() {
            break;
        }

        let sample_due = held.map(|(_, due)| due);

        tokio::select! {
            line = lines.next_line(), if input_open && held.is_none() => {
                match line.context("failed to read samples")? {
                    Some(line) => {
                        line_no += 1;
                        let sample = Sample::parse_line(&line, line_no)
                            .with_context(|| format!("bad sample input on line {line_no}"))?;
                        held = match sample {
                            Some(s) => Some((s, deadline(start, s.t_ms)?)),
                            None => None,
                        };
                    }
                    None => {
                        tracing::debug!("sample input closed");
                        input_open = false;
                    }
                }
            }

            _ = sleep_until(sample_due.unwrap_or(start)), if sample_due.is_some() => {
                let Some((sample, _)) = held.take() else { continue };
                summary.samples += 1;
                if let Some(delta) = detector.on_sample(&sample) {
                    summary.shakes += 1;
                    match scheduler.on_shake_detected(delta)? {
                        NextAction::Keep => {}
                        NextAction::Reschedule(delay) => {
                            pending_tick = Some(tick_deadline(delay)?);
                        }
                    }
                }
            }

            _ = sleep_until(pending_tick.unwrap_or(start)), if pending_tick.is_some() => {
                pending_tick = None;
                match scheduler.tick()? {
                    TickOutcome::Frame { frame, next } => {
                        summary.frames += 1;
                        sink.render(elapsed_ms(), &frame);
                        pending_tick = Some(tick_deadline(next)?);
                    }
                    TickOutcome::Stopped => {
                        tracing::debug!(frames = summary.frames, "animation settled");
                    }
                }
            }

            _ = tokio::signal::ctrl_c() => {
                tracing::info!("interrupted, cancelling pending tick");
                scheduler.pause();
                summary.interrupted = true;
                break;
            }
        }
    }

    tracing::info!(
        samples = summary.samples,
        shakes = summary.shakes,
        frames = summary.frames,
        "live loop finished"
    );
    Ok(summary)
}

fn deadline(start: Instant, t_ms: u64) -> Result<Instant> {
    start
        .checked_add(Duration::from_millis(t_ms))
        .with_context(|| format!("sample time {t_ms}ms is too far in the future"))
}

fn tick_deadline(delay: Duration) -> Result<Instant> {
    Instant::now()
        .checked_add(delay)
        .with_context(|| format!("tick delay {delay:?} is out of range"))
}
