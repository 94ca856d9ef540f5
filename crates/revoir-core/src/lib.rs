//! revoir-core - Core library for revoir.
//!
//! This crate provides the SM-2 spaced-repetition scheduler, due-card
//! selection, review statistics, and the SQLite-backed card store
//! behind the revoir flashcard service.
//!
//! # Example
//!
//! ```ignore
//! use revoir_core::{Card, CardStore, Deck, Quality};
//! use chrono::Utc;
//!
//! let store = CardStore::in_memory()?;
//!
//! let deck = Deck::new("Vocabulaire de bureau");
//! store.create_deck(&deck)?;
//! let card = Card::new(deck.id, "échéance", "deadline");
//! store.create_card(&card)?;
//!
//! // Rate the card "good"; it comes back tomorrow.
//! let outcome = store.review_card(card.id, Quality::Good, Utc::now())?;
//! assert_eq!(outcome.interval_days, 1);
//! ```

pub mod config;
pub mod error;
pub mod srs;
pub mod types;

// Re-export commonly used types
pub use config::{SchedulerConfig, SrsConfig};
pub use error::{ErrorCode, RevoirError, RevoirResult};
pub use srs::{due_cards, CardStore, ReviewOutcome, Sm2Scheduler};
pub use types::{
    Card, CardStatus, CefrLevel, Deck, DeckStats, Quality, Sm2State, StreakSummary, StudyDay,
};
