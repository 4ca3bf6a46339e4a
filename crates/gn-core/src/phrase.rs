//! Phrase templates used to render directions as text.
//!
//! Every word the namer emits is looked up by [`MessageId`], so a language is
//! just a table. [`English`] is built in; [`Phrasebook`] is the same table
//! loaded from configuration.

use serde::{Deserialize, Serialize};

use crate::error::{GravError, Result};

/// Symbolic key for one piece of phrase text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MessageId {
    Go,
    Left,
    Right,
    Straight,
    ToYour,
    FirstShort,
    SecondShort,
    ThirdShort,
    NthShort,
}

impl MessageId {
    pub const ALL: [MessageId; 9] = [
        MessageId::Go,
        MessageId::Left,
        MessageId::Right,
        MessageId::Straight,
        MessageId::ToYour,
        MessageId::FirstShort,
        MessageId::SecondShort,
        MessageId::ThirdShort,
        MessageId::NthShort,
    ];

    /// Key used for this message in a phrasebook table.
    pub fn key(self) -> &'static str {
        match self {
            MessageId::Go => "go",
            MessageId::Left => "left",
            MessageId::Right => "right",
            MessageId::Straight => "straight",
            MessageId::ToYour => "to_your",
            MessageId::FirstShort => "first_short",
            MessageId::SecondShort => "second_short",
            MessageId::ThirdShort => "third_short",
            MessageId::NthShort => "nth_short",
        }
    }
}

/// Source of phrase text, keyed by message ID.
pub trait PhraseTemplates {
    fn phrase(&self, id: MessageId) -> &str;
}

/// Built-in English phrases.
#[derive(Clone, Copy, Debug, Default)]
pub struct English;

impl English {
    pub fn text(id: MessageId) -> &'static str {
        match id {
            MessageId::Go => "go",
            MessageId::Left => "left",
            MessageId::Right => "right",
            MessageId::Straight => "straight",
            MessageId::ToYour => "to your",
            MessageId::FirstShort => "st",
            MessageId::SecondShort => "nd",
            MessageId::ThirdShort => "rd",
            MessageId::NthShort => "th",
        }
    }
}

impl PhraseTemplates for English {
    fn phrase(&self, id: MessageId) -> &str {
        Self::text(id)
    }
}

/// A full phrase table, typically deserialized from the `[phrases]` section
/// of a config file. Every key is required.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phrasebook {
    pub go: String,
    pub left: String,
    pub right: String,
    pub straight: String,
    pub to_your: String,
    pub first_short: String,
    pub second_short: String,
    pub third_short: String,
    pub nth_short: String,
}

impl Phrasebook {
    /// Copy any provider into an owned table.
    pub fn from_templates<T: PhraseTemplates + ?Sized>(templates: &T) -> Self {
        let get = |id| templates.phrase(id).to_string();
        Self {
            go: get(MessageId::Go),
            left: get(MessageId::Left),
            right: get(MessageId::Right),
            straight: get(MessageId::Straight),
            to_your: get(MessageId::ToYour),
            first_short: get(MessageId::FirstShort),
            second_short: get(MessageId::SecondShort),
            third_short: get(MessageId::ThirdShort),
            nth_short: get(MessageId::NthShort),
        }
    }

    /// The direction words and the "go" prefix must be non-empty, or the
    /// rendered phrase would lose its meaning. Ordinal suffixes may be empty
    /// for languages that don't use them.
    pub fn validate(&self) -> Result<()> {
        for id in [
            MessageId::Go,
            MessageId::Left,
            MessageId::Right,
            MessageId::Straight,
        ] {
            if self.phrase(id).trim().is_empty() {
                return Err(GravError::Config(format!(
                    "phrase '{}' must not be empty",
                    id.key()
                )));
            }
        }
        Ok(())
    }
}

impl Default for Phrasebook {
    fn default() -> Self {
        Self::from_templates(&English)
    }
}

impl PhraseTemplates for Phrasebook {
    fn phrase(&self, id: MessageId) -> &str {
        match id {
            MessageId::Go => &self.go,
            MessageId::Left => &self.left,
            MessageId::Right => &self.right,
            MessageId::Straight => &self.straight,
            MessageId::ToYour => &self.to_your,
            MessageId::FirstShort => &self.first_short,
            MessageId::SecondShort => &self.second_short,
            MessageId::ThirdShort => &self.third_short,
            MessageId::NthShort => &self.nth_short,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_phrasebook_matches_english() {
        let book = Phrasebook::default();
        for id in MessageId::ALL {
            assert_eq!(book.phrase(id), English.phrase(id), "mismatch for {id:?}");
        }
    }

    #[test]
    fn test_keys_are_unique() {
        let mut keys: Vec<&str> = MessageId::ALL.iter().map(|id| id.key()).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), MessageId::ALL.len());
    }

    #[test]
    fn test_validate_rejects_blank_direction_word() {
        let book = Phrasebook {
            straight: "  ".into(),
            ..Phrasebook::default()
        };
        let err = book.validate().unwrap_err();
        assert!(err.to_string().contains("straight"), "got: {err}");
    }

    #[test]
    fn test_validate_allows_empty_suffixes() {
        let book = Phrasebook {
            first_short: String::new(),
            nth_short: String::new(),
            ..Phrasebook::default()
        };
        assert!(book.validate().is_ok());
    }
}
