//! Card CRUD endpoints.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::routes::decks::DeletedResponse;
use crate::state::AppState;
use revoir_core::Card;

/// Request body for creating a card.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCardRequest {
    pub deck_id: Uuid,
    pub front: String,
    pub back: String,
    pub hint: Option<String>,
    pub audio_url: Option<String>,
    pub image_url: Option<String>,
}

/// Request body for editing a card's content. Absent fields are left
/// unchanged; scheduling state is never editable here.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCardRequest {
    pub front: Option<String>,
    pub back: Option<String>,
    pub hint: Option<String>,
    pub audio_url: Option<String>,
    pub image_url: Option<String>,
}

/// Create a card in a deck.
/// POST /cards
pub async fn create_card(
    State(state): State<AppState>,
    Json(request): Json<CreateCardRequest>,
) -> ApiResult<Json<Card>> {
    if request.front.trim().is_empty() {
        return Err(ApiError::validation("Card front must not be empty"));
    }
    if request.back.trim().is_empty() {
        return Err(ApiError::validation("Card back must not be empty"));
    }

    state
        .store
        .get_deck(request.deck_id)
        .map_err(ApiError::from)?
        .ok_or_else(|| ApiError::not_found(format!("Deck '{}' not found", request.deck_id)))?;

    let mut card = Card::new(request.deck_id, request.front, request.back);
    card.hint = request.hint;
    card.audio_url = request.audio_url;
    card.image_url = request.image_url;

    state.store.create_card(&card).map_err(ApiError::from)?;

    Ok(Json(card))
}

/// List the cards of a deck, newest first.
/// GET /decks/:id/cards
pub async fn list_cards(
    State(state): State<AppState>,
    Path(deck_id): Path<Uuid>,
) -> ApiResult<Json<Vec<Card>>> {
    state
        .store
        .get_deck(deck_id)
        .map_err(ApiError::from)?
        .ok_or_else(|| ApiError::not_found(format!("Deck '{}' not found", deck_id)))?;

    let cards = state.store.list_cards(deck_id).map_err(ApiError::from)?;
    Ok(Json(cards))
}

/// Get a single card, including its scheduling state.
/// GET /cards/:id
pub async fn get_card(
    State(state): State<AppState>,
    Path(card_id): Path<Uuid>,
) -> ApiResult<Json<Card>> {
    let card = state
        .store
        .get_card(card_id)
        .map_err(ApiError::from)?
        .ok_or_else(|| ApiError::not_found(format!("Card '{}' not found", card_id)))?;

    Ok(Json(card))
}

/// Edit a card's content.
/// PUT /cards/:id
pub async fn update_card(
    State(state): State<AppState>,
    Path(card_id): Path<Uuid>,
    Json(request): Json<UpdateCardRequest>,
) -> ApiResult<Json<Card>> {
    let mut card = state
        .store
        .get_card(card_id)
        .map_err(ApiError::from)?
        .ok_or_else(|| ApiError::not_found(format!("Card '{}' not found", card_id)))?;

    if let Some(front) = request.front {
        if front.trim().is_empty() {
            return Err(ApiError::validation("Card front must not be empty"));
        }
        card.front = front;
    }
    if let Some(back) = request.back {
        if back.trim().is_empty() {
            return Err(ApiError::validation("Card back must not be empty"));
        }
        card.back = back;
    }
    if let Some(hint) = request.hint {
        card.hint = Some(hint);
    }
    if let Some(audio_url) = request.audio_url {
        card.audio_url = Some(audio_url);
    }
    if let Some(image_url) = request.image_url {
        card.image_url = Some(image_url);
    }

    state.store.update_card(&card).map_err(ApiError::from)?;

    Ok(Json(card))
}

/// Delete a card.
/// DELETE /cards/:id
pub async fn delete_card(
    State(state): State<AppState>,
    Path(card_id): Path<Uuid>,
) -> ApiResult<Json<DeletedResponse>> {
    let deleted = state.store.delete_card(card_id).map_err(ApiError::from)?;
    if !deleted {
        return Err(ApiError::not_found(format!("Card '{}' not found", card_id)));
    }

    Ok(Json(DeletedResponse { deleted: true }))
}
