//! Core types for decks, cards, scheduling state, and statistics.

mod card;
mod sm2;
mod stats;

pub use card::{Card, CefrLevel, Deck};
pub use sm2::{
    CardStatus, Quality, Sm2State, DEFAULT_EASE_FACTOR, MASTERY_THRESHOLD_DAYS, MIN_EASE_FACTOR,
};
pub use stats::{DeckStats, StreakSummary, StudyDay};
