//! Route definitions for the REST API.

mod cards;
mod decks;
mod health;
mod reviews;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::state::AppState;

/// Create the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Decks
        .route("/decks", post(decks::create_deck))
        .route("/decks", get(decks::list_decks))
        .route("/decks/:id", get(decks::get_deck))
        .route("/decks/:id", put(decks::update_deck))
        .route("/decks/:id", delete(decks::delete_deck))
        .route("/decks/:id/cards", get(cards::list_cards))
        // Cards
        .route("/cards", post(cards::create_card))
        .route("/cards/:id", get(cards::get_card))
        .route("/cards/:id", put(cards::update_card))
        .route("/cards/:id", delete(cards::delete_card))
        // Review flow
        .route("/cards/:id/review", post(reviews::review_card))
        .route("/reviews/due", get(reviews::get_due_cards))
        // Statistics
        .route("/stats", get(reviews::get_stats))
        .route("/streak", get(reviews::get_streak))
        .route("/sessions", post(reviews::record_session))
        // Attach state
        .with_state(state)
}

pub use cards::*;
pub use decks::*;
pub use health::*;
pub use reviews::*;
