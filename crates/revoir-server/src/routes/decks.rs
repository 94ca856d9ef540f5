//! Deck CRUD endpoints.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use revoir_core::{CefrLevel, Deck};

/// Request body for creating a deck.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDeckRequest {
    pub name: String,
    pub name_fr: Option<String>,
    pub description: Option<String>,
    pub description_fr: Option<String>,
    pub cefr_level: Option<CefrLevel>,
    pub category: Option<String>,
    pub color: Option<String>,
}

/// Request body for updating a deck. Absent fields are left unchanged.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDeckRequest {
    pub name: Option<String>,
    pub name_fr: Option<String>,
    pub description: Option<String>,
    pub description_fr: Option<String>,
    pub cefr_level: Option<CefrLevel>,
    pub category: Option<String>,
    pub color: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub deleted: bool,
}

/// Create a deck.
/// POST /decks
pub async fn create_deck(
    State(state): State<AppState>,
    Json(request): Json<CreateDeckRequest>,
) -> ApiResult<Json<Deck>> {
    if request.name.trim().is_empty() {
        return Err(ApiError::validation("Deck name must not be empty"));
    }

    let mut deck = Deck::new(request.name.trim());
    deck.name_fr = request.name_fr;
    deck.description = request.description;
    deck.description_fr = request.description_fr;
    if let Some(level) = request.cefr_level {
        deck.cefr_level = level;
    }
    if let Some(category) = request.category {
        deck.category = category;
    }
    deck.color = request.color;

    state.store.create_deck(&deck).map_err(ApiError::from)?;

    Ok(Json(deck))
}

/// List all decks, most recently updated first.
/// GET /decks
pub async fn list_decks(State(state): State<AppState>) -> ApiResult<Json<Vec<Deck>>> {
    let decks = state.store.list_decks().map_err(ApiError::from)?;
    Ok(Json(decks))
}

/// Get a single deck.
/// GET /decks/:id
pub async fn get_deck(
    State(state): State<AppState>,
    Path(deck_id): Path<Uuid>,
) -> ApiResult<Json<Deck>> {
    let deck = state
        .store
        .get_deck(deck_id)
        .map_err(ApiError::from)?
        .ok_or_else(|| ApiError::not_found(format!("Deck '{}' not found", deck_id)))?;

    Ok(Json(deck))
}

/// Update a deck's descriptive fields.
/// PUT /decks/:id
pub async fn update_deck(
    State(state): State<AppState>,
    Path(deck_id): Path<Uuid>,
    Json(request): Json<UpdateDeckRequest>,
) -> ApiResult<Json<Deck>> {
    let mut deck = state
        .store
        .get_deck(deck_id)
        .map_err(ApiError::from)?
        .ok_or_else(|| ApiError::not_found(format!("Deck '{}' not found", deck_id)))?;

    if let Some(name) = request.name {
        if name.trim().is_empty() {
            return Err(ApiError::validation("Deck name must not be empty"));
        }
        deck.name = name.trim().to_string();
    }
    if let Some(name_fr) = request.name_fr {
        deck.name_fr = Some(name_fr);
    }
    if let Some(description) = request.description {
        deck.description = Some(description);
    }
    if let Some(description_fr) = request.description_fr {
        deck.description_fr = Some(description_fr);
    }
    if let Some(level) = request.cefr_level {
        deck.cefr_level = level;
    }
    if let Some(category) = request.category {
        deck.category = category;
    }
    if let Some(color) = request.color {
        deck.color = Some(color);
    }

    state.store.update_deck(&deck).map_err(ApiError::from)?;

    // Re-read so the response carries the store-side updated_at.
    let deck = state
        .store
        .get_deck(deck_id)
        .map_err(ApiError::from)?
        .ok_or_else(|| ApiError::not_found(format!("Deck '{}' not found", deck_id)))?;

    Ok(Json(deck))
}

/// Delete a deck and all of its cards.
/// DELETE /decks/:id
pub async fn delete_deck(
    State(state): State<AppState>,
    Path(deck_id): Path<Uuid>,
) -> ApiResult<Json<DeletedResponse>> {
    let deleted = state.store.delete_deck(deck_id).map_err(ApiError::from)?;
    if !deleted {
        return Err(ApiError::not_found(format!("Deck '{}' not found", deck_id)));
    }

    Ok(Json(DeletedResponse { deleted: true }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> AppState {
        AppState::in_memory().unwrap()
    }

    #[tokio::test]
    async fn test_create_and_get_deck() {
        let state = state();

        let Json(deck) = create_deck(
            State(state.clone()),
            Json(CreateDeckRequest {
                name: "Anglais des réunions".to_string(),
                name_fr: None,
                description: Some("Meeting vocabulary".to_string()),
                description_fr: None,
                cefr_level: Some(CefrLevel::B1),
                category: None,
                color: Some("#aa3355".to_string()),
            }),
        )
        .await
        .unwrap();

        let Json(loaded) = get_deck(State(state), Path(deck.id)).await.unwrap();
        assert_eq!(loaded.name, "Anglais des réunions");
        assert_eq!(loaded.cefr_level, CefrLevel::B1);
        assert_eq!(loaded.category, "general");
    }

    #[tokio::test]
    async fn test_create_deck_rejects_blank_name() {
        let err = create_deck(
            State(state()),
            Json(CreateDeckRequest {
                name: "   ".to_string(),
                name_fr: None,
                description: None,
                description_fr: None,
                cefr_level: None,
                category: None,
                color: None,
            }),
        )
        .await
        .unwrap_err();

        assert_eq!(err.code, "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_get_missing_deck_is_404() {
        let err = get_deck(State(state()), Path(Uuid::new_v4()))
            .await
            .unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_update_deck_partial() {
        let state = state();
        let Json(deck) = create_deck(
            State(state.clone()),
            Json(CreateDeckRequest {
                name: "Original".to_string(),
                name_fr: None,
                description: None,
                description_fr: None,
                cefr_level: None,
                category: None,
                color: None,
            }),
        )
        .await
        .unwrap();

        let Json(updated) = update_deck(
            State(state),
            Path(deck.id),
            Json(UpdateDeckRequest {
                name: None,
                name_fr: Some("Originale".to_string()),
                description: None,
                description_fr: None,
                cefr_level: Some(CefrLevel::C1),
                category: None,
                color: None,
            }),
        )
        .await
        .unwrap();

        assert_eq!(updated.name, "Original");
        assert_eq!(updated.name_fr.as_deref(), Some("Originale"));
        assert_eq!(updated.cefr_level, CefrLevel::C1);
    }

    #[tokio::test]
    async fn test_delete_deck() {
        let state = state();
        let Json(deck) = create_deck(
            State(state.clone()),
            Json(CreateDeckRequest {
                name: "To remove".to_string(),
                name_fr: None,
                description: None,
                description_fr: None,
                cefr_level: None,
                category: None,
                color: None,
            }),
        )
        .await
        .unwrap();

        let Json(result) = delete_deck(State(state.clone()), Path(deck.id))
            .await
            .unwrap();
        assert!(result.deleted);

        let err = delete_deck(State(state), Path(deck.id)).await.unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::NOT_FOUND);
    }
}
