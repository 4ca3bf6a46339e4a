/// Shake delta above which a debounced sample counts as a shake.
pub const SHAKE_THRESHOLD: f64 = 800.0;

/// Intensity at or below which the scheduler goes idle.
pub const STOP_THRESHOLD: f64 = 50.0;

/// Multiplier applied to intensity on every tick (lose 10%).
pub const DECAY_FACTOR: f64 = 0.9;

/// Minimum spacing between accepted accelerometer samples, in ms.
pub const UPDATE_FREQUENCY_MS: u64 = 100;

/// Numerator of the tick delay: delay_ms = round(DELAY_NUMERATOR_MS / intensity).
pub const DELAY_NUMERATOR_MS: f64 = 60_000.0;

/// Longest delay between two ticks, in ms. Longer computed delays are clamped.
pub const MAX_TICK_DELAY_MS: u64 = 60_000;

/// Scale applied to the per-millisecond axis-sum change when computing a shake delta.
pub const SHAKE_DELTA_SCALE: f64 = 10_000.0;

/// Number of choices when nothing else is configured.
pub const DEFAULT_NUM_CHOICES: u32 = 3;

/// Smallest meaningful choice count.
pub const MIN_NUM_CHOICES: u32 = 2;
