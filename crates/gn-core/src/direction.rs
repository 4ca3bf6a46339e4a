//! Direction naming: turning a 1-based choice index into an instruction.
//!
//! Choices are laid out left to right. Two and three choices get plain words
//! ("left", "straight", "right"); larger counts are split around a center and
//! counted from the outer edge of each side ("go 2nd to your right").

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_NUM_CHOICES, MIN_NUM_CHOICES};
use crate::error::{GravError, Result};
use crate::phrase::{English, MessageId, PhraseTemplates};

/// Number of discrete directions to choose among. Always at least 2.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct ChoiceCount(u32);

impl ChoiceCount {
    pub fn new(n: u32) -> Result<Self> {
        if n < MIN_NUM_CHOICES {
            return Err(GravError::InvalidArgument(format!(
                "number of choices must be at least {MIN_NUM_CHOICES}, got {n}"
            )));
        }
        Ok(Self(n))
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// Middle index: floor(n / 2) + 1. Exact only for odd counts.
    pub fn center(self) -> u32 {
        self.0 / 2 + 1
    }

    pub fn is_odd(self) -> bool {
        self.0 % 2 == 1
    }

    /// Check that `dir` lies in [1, n].
    pub fn check_index(self, dir: u32) -> Result<u32> {
        if dir == 0 || dir > self.0 {
            return Err(GravError::InvalidArgument(format!(
                "direction {dir} out of range 1..={}",
                self.0
            )));
        }
        Ok(dir)
    }

    /// All valid direction indices, left to right.
    pub fn indices(self) -> impl Iterator<Item = u32> {
        1..=self.0
    }
}

impl Default for ChoiceCount {
    fn default() -> Self {
        Self(DEFAULT_NUM_CHOICES)
    }
}

impl TryFrom<u32> for ChoiceCount {
    type Error = GravError;

    fn try_from(n: u32) -> Result<Self> {
        Self::new(n)
    }
}

impl From<ChoiceCount> for u32 {
    fn from(c: ChoiceCount) -> u32 {
        c.0
    }
}

impl fmt::Display for ChoiceCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    fn message(self) -> MessageId {
        match self {
            Side::Left => MessageId::Left,
            Side::Right => MessageId::Right,
        }
    }
}

/// A resolved direction, before it is rendered to text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Straight,
    /// The `ordinal`-th option counted from the outer edge of `side`.
    Ordinal { ordinal: u32, side: Side },
}

impl Direction {
    pub fn side(self) -> Option<Side> {
        match self {
            Direction::Left => Some(Side::Left),
            Direction::Right => Some(Side::Right),
            Direction::Straight => None,
            Direction::Ordinal { side, .. } => Some(side),
        }
    }

    /// Render with the given phrase templates, "go" prefix included.
    pub fn render<T: PhraseTemplates + ?Sized>(self, templates: &T) -> String {
        let go = templates.phrase(MessageId::Go);
        let body = match self {
            Direction::Left => templates.phrase(MessageId::Left).to_string(),
            Direction::Right => templates.phrase(MessageId::Right).to_string(),
            Direction::Straight => templates.phrase(MessageId::Straight).to_string(),
            Direction::Ordinal { ordinal, side } => format!(
                "{ordinal}{} {} {}",
                templates.phrase(suffix_message(ordinal)),
                templates.phrase(MessageId::ToYour),
                templates.phrase(side.message()),
            ),
        };
        format!("{go} {body}")
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(&English))
    }
}

/// Resolve `dir` (1-based) among `num_choices` options.
pub fn resolve_direction(dir: u32, num_choices: u32) -> Result<Direction> {
    let choices = ChoiceCount::new(num_choices)?;
    let dir = choices.check_index(dir)?;

    match choices.get() {
        2 => Ok(if dir == 1 {
            Direction::Left
        } else {
            Direction::Right
        }),
        3 => Ok(match dir {
            1 => Direction::Left,
            2 => Direction::Straight,
            _ => Direction::Right,
        }),
        n => {
            let center = choices.center();
            if choices.is_odd() && dir == center {
                return Ok(Direction::Straight);
            }
            let side = if center > dir { Side::Left } else { Side::Right };
            // On even counts the center is the innermost right-hand option.
            let ordinal = if dir >= center { n + 1 - dir } else { dir };
            Ok(Direction::Ordinal { ordinal, side })
        }
    }
}

/// Name `dir` among `num_choices` options in English, e.g. "go 2nd to your left".
pub fn name_direction(dir: u32, num_choices: u32) -> Result<String> {
    name_direction_with(&English, dir, num_choices)
}

/// Name `dir` among `num_choices` options using the given phrase templates.
pub fn name_direction_with<T: PhraseTemplates + ?Sized>(
    templates: &T,
    dir: u32,
    num_choices: u32,
) -> Result<String> {
    Ok(resolve_direction(dir, num_choices)?.render(templates))
}

/// English ordinal suffix. Only 1, 2 and 3 are special; everything else,
/// 11 and 21 included, takes "th".
pub fn ordinal_suffix(n: u32) -> &'static str {
    English::text(suffix_message(n))
}

fn suffix_message(n: u32) -> MessageId {
    match n {
        1 => MessageId::FirstShort,
        2 => MessageId::SecondShort,
        3 => MessageId::ThirdShort,
        _ => MessageId::NthShort,
    }
}

/// Direction index for the current intensity: round(intensity) mod n, with 0
/// mapped to n so the result is always in [1, n].
pub fn direction_index_from_intensity(intensity: f64, choices: ChoiceCount) -> u32 {
    let n = u64::from(choices.get());
    let rounded = intensity.max(0.0).round() as u64;
    match rounded % n {
        0 => choices.get(),
        r => r as u32,
    }
}

/// Arrow angle in degrees for a direction index. The step is an integer
/// division of 360 by n + 1, so 3 choices step by 90 and 4 choices by 72.
pub fn angle_from_direction(dir: u32, choices: ChoiceCount) -> f64 {
    let step = 360 / (choices.get() + 1);
    f64::from(step) * f64::from(dir) + 180.0
}
