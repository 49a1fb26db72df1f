//! Per-request filter criteria: one [Choice] per filterable attribute, the time slot and
//! the caller's spin count.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};
use thiserror::Error;

/// The "no constraint" sentinel. Option lists carry it verbatim; it is mapped to
/// [Choice::Any] here and never reaches the condition parser.
pub const UNSPECIFIED: &str = "不問";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Choice {
    #[default]
    Any,
    Is(String),
}
impl Choice {
    /// Maps a raw option string, treating the sentinel as unconstrained.
    pub fn from_option(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() || value == UNSPECIFIED {
            Choice::Any
        } else {
            Choice::Is(value.to_string())
        }
    }
}

/// The filterable attributes, addressable uniformly across option lists, locks and
/// selections.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Attr {
    Through,
    AtGap,
    PrevGame,
    PrevCoin,
    PrevDiff,
    PrevRenchan,
    PrevType,
    Custom,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TimeSlot {
    /// The session begins on the day's first spin.
    Morning,
    #[default]
    Later,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid spin count \"{0}\"")]
pub struct InvalidSpins(pub String);

/// Boundary validation of the raw spin-count field. A non-integer rejects the single
/// request; it must never surface as a crash.
pub fn parse_spins(raw: &str) -> Result<u32, InvalidSpins> {
    raw.trim()
        .parse()
        .map_err(|_| InvalidSpins(raw.to_string()))
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Criteria {
    pub spins: u32,
    pub slot: TimeSlot,
    pub through: Choice,
    pub at_gap: Choice,
    pub prev_game: Choice,
    pub prev_coin: Choice,
    pub prev_diff: Choice,
    pub prev_renchan: Choice,
    pub prev_type: Choice,
    pub custom: Choice,
}
impl Criteria {
    pub fn with_spins(spins: u32) -> Self {
        Self {
            spins,
            ..Self::default()
        }
    }

    pub fn choice(&self, attr: Attr) -> &Choice {
        match attr {
            Attr::Through => &self.through,
            Attr::AtGap => &self.at_gap,
            Attr::PrevGame => &self.prev_game,
            Attr::PrevCoin => &self.prev_coin,
            Attr::PrevDiff => &self.prev_diff,
            Attr::PrevRenchan => &self.prev_renchan,
            Attr::PrevType => &self.prev_type,
            Attr::Custom => &self.custom,
        }
    }

    pub fn set_choice(&mut self, attr: Attr, choice: Choice) {
        let slot = match attr {
            Attr::Through => &mut self.through,
            Attr::AtGap => &mut self.at_gap,
            Attr::PrevGame => &mut self.prev_game,
            Attr::PrevCoin => &mut self.prev_coin,
            Attr::PrevDiff => &mut self.prev_diff,
            Attr::PrevRenchan => &mut self.prev_renchan,
            Attr::PrevType => &mut self.prev_type,
            Attr::Custom => &mut self.custom,
        };
        *slot = choice;
    }
}
