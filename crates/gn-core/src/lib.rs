//! GravNav shake-to-decide engine.
//!
//! Shakes feed a decaying intensity; each tick maps the intensity onto one of
//! N choices and names it ("go 2nd to your left"). The scheduler is a plain
//! state machine: it never sleeps and owns no timer, so any event loop (the
//! virtual clock in [`replay`], or a real one) can drive it.
//!
//! Zero I/O. Sensors, timers and drawing belong to the caller.

pub mod config;
pub mod constants;
pub mod direction;
pub mod error;
pub mod phrase;
pub mod replay;
pub mod sample;
pub mod scheduler;
pub mod shake;

pub use config::GravConfig;
pub use constants::{
    DECAY_FACTOR, DEFAULT_NUM_CHOICES, MAX_TICK_DELAY_MS, SHAKE_THRESHOLD, STOP_THRESHOLD,
    UPDATE_FREQUENCY_MS,
};
pub use direction::{
    ChoiceCount, Direction, Side, angle_from_direction, direction_index_from_intensity,
    name_direction, name_direction_with, ordinal_suffix, resolve_direction,
};
pub use error::{GravError, Result};
pub use phrase::{English, MessageId, PhraseTemplates, Phrasebook};
pub use replay::{FrameLog, RenderSink, Replay};
pub use sample::{Sample, parse_samples};
pub use scheduler::{
    DecayScheduler, Frame, NextAction, SchedulerState, SchedulerTuning, TickOutcome,
    delay_for_intensity,
};
pub use shake::ShakeDetector;
