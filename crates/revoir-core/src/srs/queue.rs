//! Due-card selection.
//!
//! Builds the review queue from a card collection: every card whose
//! `due_at` has passed, oldest-due first, with ties broken by card id so
//! repeated calls over the same data produce the same sequence and an
//! interrupted session resumes where it left off.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::types::Card;

/// Select the cards due at `now`, optionally scoped to one deck.
///
/// Returns references in review order: ascending `due_at`, then
/// ascending id. Cards with `due_at > now` are never included; an empty
/// result is normal, not an error.
pub fn due_cards(cards: &[Card], now: DateTime<Utc>, deck_id: Option<Uuid>) -> Vec<&Card> {
    let mut due: Vec<&Card> = cards
        .iter()
        .filter(|card| card.state.is_due(now))
        .filter(|card| deck_id.map_or(true, |deck_id| card.deck_id == deck_id))
        .collect();

    due.sort_by(|a, b| {
        a.state
            .due_at
            .cmp(&b.state.due_at)
            .then_with(|| a.id.cmp(&b.id))
    });

    due
}
