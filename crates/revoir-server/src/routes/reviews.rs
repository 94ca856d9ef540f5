//! Review queue, review submission, and statistics endpoints.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use revoir_core::{Card, DeckStats, Quality, ReviewOutcome, RevoirError, StreakSummary};

/// Hard cap on the review queue size, whatever the caller asks for.
const MAX_DUE_LIMIT: usize = 50;

/// Query parameters for the review queue.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DueQuery {
    pub deck_id: Option<Uuid>,
    pub limit: Option<usize>,
}

/// A due card as shown to the learner. Scheduling fields stay
/// server-internal.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DueCardResponse {
    pub id: Uuid,
    pub deck_id: Uuid,
    pub front: String,
    pub back: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl From<Card> for DueCardResponse {
    fn from(card: Card) -> Self {
        Self {
            id: card.id,
            deck_id: card.deck_id,
            front: card.front,
            back: card.back,
            hint: card.hint,
        }
    }
}

/// Get the cards currently due for review, oldest-due first.
/// GET /reviews/due
pub async fn get_due_cards(
    State(state): State<AppState>,
    Query(query): Query<DueQuery>,
) -> ApiResult<Json<Vec<DueCardResponse>>> {
    let limit = query
        .limit
        .unwrap_or(state.due_limit)
        .clamp(1, MAX_DUE_LIMIT);

    let cards = state
        .store
        .due_cards(query.deck_id, Utc::now(), limit)
        .map_err(ApiError::from)?;

    Ok(Json(cards.into_iter().map(Into::into).collect()))
}

/// Request body for submitting a review.
#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    /// Recall quality on the 1-5 scale.
    pub quality: u8,
}

/// Apply a review to a card.
/// POST /cards/:id/review
pub async fn review_card(
    State(state): State<AppState>,
    Path(card_id): Path<Uuid>,
    Json(request): Json<ReviewRequest>,
) -> ApiResult<Json<ReviewOutcome>> {
    let quality = Quality::from_rating(request.quality)
        .ok_or_else(|| ApiError::from(RevoirError::invalid_quality(request.quality)))?;

    let outcome = state
        .store
        .review_card(card_id, quality, Utc::now())
        .map_err(ApiError::from)?;

    Ok(Json(outcome))
}

/// Query parameters for statistics.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsQuery {
    pub deck_id: Option<Uuid>,
}

/// Get learner-facing counts, optionally scoped to one deck.
/// GET /stats
pub async fn get_stats(
    State(state): State<AppState>,
    Query(query): Query<StatsQuery>,
) -> ApiResult<Json<DeckStats>> {
    let stats = state
        .store
        .stats(query.deck_id, Utc::now())
        .map_err(ApiError::from)?;

    Ok(Json(stats))
}

/// Get the study streak summary.
/// GET /streak
pub async fn get_streak(State(state): State<AppState>) -> ApiResult<Json<StreakSummary>> {
    let summary = state
        .store
        .streak(Utc::now().date_naive())
        .map_err(ApiError::from)?;

    Ok(Json(summary))
}

/// Request body for recording a study session.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRequest {
    pub cards_reviewed: u32,
    pub correct_count: u32,
    pub duration_secs: u32,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub recorded: bool,
}

/// Record a finished study session against today's counters.
/// POST /sessions
pub async fn record_session(
    State(state): State<AppState>,
    Json(request): Json<SessionRequest>,
) -> ApiResult<Json<SessionResponse>> {
    state
        .store
        .record_session(
            Utc::now().date_naive(),
            request.cards_reviewed,
            request.correct_count,
            request.duration_secs,
        )
        .map_err(ApiError::from)?;

    Ok(Json(SessionResponse { recorded: true }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use revoir_core::{CardStatus, Deck};

    fn state_with_cards(count: usize) -> (AppState, Deck, Vec<Card>) {
        let state = AppState::in_memory().unwrap();
        let deck = Deck::new("reviews");
        state.store.create_deck(&deck).unwrap();

        let cards: Vec<Card> = (0..count)
            .map(|i| {
                let card = Card::new(deck.id, format!("front {}", i), format!("back {}", i));
                state.store.create_card(&card).unwrap();
                card
            })
            .collect();

        (state, deck, cards)
    }

    #[tokio::test]
    async fn test_due_queue_hides_scheduling_fields() {
        let (state, deck, _) = state_with_cards(2);

        let Json(due) = get_due_cards(
            State(state),
            Query(DueQuery {
                deck_id: Some(deck.id),
                limit: None,
            }),
        )
        .await
        .unwrap();

        assert_eq!(due.len(), 2);
        let body = serde_json::to_value(&due[0]).unwrap();
        assert!(body.get("front").is_some());
        assert!(body.get("easeFactor").is_none());
        assert!(body.get("dueAt").is_none());
    }

    #[tokio::test]
    async fn test_due_queue_respects_limit_cap() {
        let (state, _, _) = state_with_cards(5);

        let Json(due) = get_due_cards(
            State(state.clone()),
            Query(DueQuery {
                deck_id: None,
                limit: Some(3),
            }),
        )
        .await
        .unwrap();
        assert_eq!(due.len(), 3);

        // An oversized limit is clamped, not rejected.
        let Json(due) = get_due_cards(
            State(state),
            Query(DueQuery {
                deck_id: None,
                limit: Some(10_000),
            }),
        )
        .await
        .unwrap();
        assert_eq!(due.len(), 5);
    }

    #[tokio::test]
    async fn test_review_good_card() {
        let (state, _, cards) = state_with_cards(1);

        let Json(outcome) = review_card(
            State(state.clone()),
            Path(cards[0].id),
            Json(ReviewRequest { quality: 4 }),
        )
        .await
        .unwrap();

        assert_eq!(outcome.interval_days, 1);
        assert_eq!(outcome.status, CardStatus::Learning);

        // The card left the due queue.
        let Json(due) = get_due_cards(
            State(state),
            Query(DueQuery {
                deck_id: None,
                limit: None,
            }),
        )
        .await
        .unwrap();
        assert!(due.is_empty());
    }

    #[tokio::test]
    async fn test_review_rejects_out_of_range_quality() {
        let (state, _, cards) = state_with_cards(1);

        for quality in [0u8, 6, 42] {
            let err = review_card(
                State(state.clone()),
                Path(cards[0].id),
                Json(ReviewRequest { quality }),
            )
            .await
            .unwrap_err();
            assert_eq!(err.status, axum::http::StatusCode::UNPROCESSABLE_ENTITY);
        }
    }

    #[tokio::test]
    async fn test_review_unknown_card_is_404() {
        let state = AppState::in_memory().unwrap();

        let err = review_card(
            State(state),
            Path(Uuid::new_v4()),
            Json(ReviewRequest { quality: 4 }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_stats_and_session_flow() {
        let (state, deck, cards) = state_with_cards(2);

        review_card(
            State(state.clone()),
            Path(cards[0].id),
            Json(ReviewRequest { quality: 4 }),
        )
        .await
        .unwrap();

        let Json(stats) = get_stats(
            State(state.clone()),
            Query(StatsQuery {
                deck_id: Some(deck.id),
            }),
        )
        .await
        .unwrap();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.new, 1);
        assert_eq!(stats.learning, 1);

        record_session(
            State(state.clone()),
            Json(SessionRequest {
                cards_reviewed: 1,
                correct_count: 1,
                duration_secs: 30,
            }),
        )
        .await
        .unwrap();

        let Json(summary) = get_streak(State(state)).await.unwrap();
        assert_eq!(summary.current_streak, 1);
        assert_eq!(summary.total_cards, 1);
    }
}
