//! Deck and card types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::sm2::Sm2State;

/// CEFR proficiency level a deck targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum CefrLevel {
    #[default]
    A1,
    A2,
    B1,
    B2,
    C1,
    C2,
}

impl CefrLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            CefrLevel::A1 => "A1",
            CefrLevel::A2 => "A2",
            CefrLevel::B1 => "B1",
            CefrLevel::B2 => "B2",
            CefrLevel::C1 => "C1",
            CefrLevel::C2 => "C2",
        }
    }

    /// Parse from the stored text form. Unknown values fall back to A1.
    pub fn from_str_or_default(value: &str) -> Self {
        match value {
            "A1" => CefrLevel::A1,
            "A2" => CefrLevel::A2,
            "B1" => CefrLevel::B1,
            "B2" => CefrLevel::B2,
            "C1" => CefrLevel::C1,
            "C2" => CefrLevel::C2,
            _ => CefrLevel::A1,
        }
    }
}

/// A named collection of cards owned by a single learner.
///
/// Name and description carry both official languages; the French
/// variants are optional so unilingual decks stay lightweight.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deck {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_fr: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description_fr: Option<String>,
    #[serde(default)]
    pub cefr_level: CefrLevel,
    #[serde(default = "default_category")]
    pub category: String,
    /// Presentation tag only; not meaningful to the scheduler.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default)]
    pub card_count: usize,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_category() -> String {
    "general".to_string()
}

impl Deck {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            name_fr: None,
            description: None,
            description_fr: None,
            cefr_level: CefrLevel::default(),
            category: default_category(),
            color: None,
            card_count: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A unit of recallable knowledge: front/back text plus its scheduling
/// state.
///
/// Reviews only ever rewrite the embedded [`Sm2State`] (and bump
/// `version`); content edits never touch the scheduling fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: Uuid,
    pub deck_id: Uuid,
    pub front: String,
    pub back: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(flatten)]
    pub state: Sm2State,
    /// Optimistic-concurrency token, incremented on every review write.
    #[serde(default)]
    pub version: u64,
    pub created_at: DateTime<Utc>,
}

impl Card {
    pub fn new(deck_id: Uuid, front: impl Into<String>, back: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            deck_id,
            front: front.into(),
            back: back.into(),
            hint: None,
            audio_url: None,
            image_url: None,
            state: Sm2State::new(now),
            version: 0,
            created_at: now,
        }
    }
}
