//! AI strength tiers.

use serde::{Deserialize, Serialize};

/// How much the computer looks ahead before falling back to chance.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Difficulty {
    /// Any empty cell.
    Easy,
    /// Takes an immediate win when one exists.
    Harder,
    /// Takes an immediate win, else blocks the opponent's.
    #[default]
    Expert,
}

impl Difficulty {
    /// Label for menus.
    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Harder => "Harder",
            Difficulty::Expert => "Expert",
        }
    }
}
