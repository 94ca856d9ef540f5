//! Card and deck persistence.
//!
//! SQLite-backed store for decks, cards, and the study-day log. The
//! review path is a version-checked read-modify-write: scheduling is
//! computed by the pure [`Sm2Scheduler`] and written back conditionally
//! on the card's version being unchanged, so a double-submitted rating
//! or a second device can never silently overwrite a concurrent review.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use crate::config::SrsConfig;
use crate::error::{RevoirError, RevoirResult};
use crate::srs::scheduler::Sm2Scheduler;
use crate::types::{
    Card, CardStatus, CefrLevel, Deck, DeckStats, Quality, Sm2State, StreakSummary, StudyDay,
};

/// How many times a review write is retried after losing its version
/// check before the conflict is surfaced to the caller.
const MAX_REVIEW_ATTEMPTS: u32 = 3;

/// SQLite-backed store for decks, cards, and study history.
pub struct CardStore {
    conn: Arc<Mutex<Connection>>,
    scheduler: Sm2Scheduler,
}

/// What a single review produced, for UI feedback.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewOutcome {
    pub card_id: Uuid,
    pub status: CardStatus,
    pub interval_days: u32,
    pub ease_factor: f32,
    pub due_at: DateTime<Utc>,
}

impl CardStore {
    /// Open (or create) a store at the given database path, with the
    /// standard scheduler parameters.
    pub fn new<P: AsRef<Path>>(path: P) -> RevoirResult<Self> {
        Self::with_scheduler(path, Sm2Scheduler::new())
    }

    /// Open a store at the given path with a custom scheduler.
    pub fn with_scheduler<P: AsRef<Path>>(path: P, scheduler: Sm2Scheduler) -> RevoirResult<Self> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
            scheduler,
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Open a store from configuration, creating the parent directory
    /// of the database file if needed.
    pub fn open(config: &SrsConfig) -> RevoirResult<Self> {
        if let Some(parent) = config.db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Self::with_scheduler(&config.db_path, Sm2Scheduler::from(&config.scheduler))
    }

    /// Create an in-memory store (useful for testing).
    pub fn in_memory() -> RevoirResult<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
            scheduler: Sm2Scheduler::new(),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn lock(&self) -> RevoirResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RevoirError::database(e.to_string()))
    }

    /// Initialize the database schema.
    fn init_schema(&self) -> RevoirResult<()> {
        let conn = self.lock()?;

        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS decks (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                name_fr TEXT,
                description TEXT,
                description_fr TEXT,
                cefr_level TEXT NOT NULL DEFAULT 'A1',
                category TEXT NOT NULL DEFAULT 'general',
                color TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS cards (
                id TEXT PRIMARY KEY,
                deck_id TEXT NOT NULL,
                front TEXT NOT NULL,
                back TEXT NOT NULL,
                hint TEXT,
                audio_url TEXT,
                image_url TEXT,
                ease_factor REAL NOT NULL DEFAULT 2.5,
                interval_days INTEGER NOT NULL DEFAULT 0,
                repetitions INTEGER NOT NULL DEFAULT 0,
                due_at TEXT NOT NULL,
                last_reviewed_at TEXT,
                version INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_cards_deck ON cards(deck_id);
            CREATE INDEX IF NOT EXISTS idx_cards_due ON cards(due_at);

            CREATE TABLE IF NOT EXISTS study_days (
                day TEXT PRIMARY KEY,
                cards_reviewed INTEGER NOT NULL DEFAULT 0,
                correct_count INTEGER NOT NULL DEFAULT 0,
                duration_secs INTEGER NOT NULL DEFAULT 0
            );
            ",
        )?;

        Ok(())
    }

    // =========================================================================
    // Decks
    // =========================================================================

    /// Insert a new deck.
    pub fn create_deck(&self, deck: &Deck) -> RevoirResult<()> {
        let conn = self.lock()?;

        conn.execute(
            "INSERT INTO decks
             (id, name, name_fr, description, description_fr, cefr_level, category, color, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                deck.id.to_string(),
                deck.name,
                deck.name_fr,
                deck.description,
                deck.description_fr,
                deck.cefr_level.as_str(),
                deck.category,
                deck.color,
                deck.created_at.to_rfc3339(),
                deck.updated_at.to_rfc3339(),
            ],
        )?;

        Ok(())
    }

    /// Get a deck by id, with its current card count.
    ///
    /// Returns None if the deck doesn't exist.
    pub fn get_deck(&self, deck_id: Uuid) -> RevoirResult<Option<Deck>> {
        let conn = self.lock()?;

        let deck = conn
            .query_row(
                "SELECT d.id, d.name, d.name_fr, d.description, d.description_fr,
                        d.cefr_level, d.category, d.color, d.created_at, d.updated_at,
                        (SELECT COUNT(*) FROM cards c WHERE c.deck_id = d.id)
                 FROM decks d WHERE d.id = ?1",
                params![deck_id.to_string()],
                deck_from_row,
            )
            .optional()?;

        Ok(deck)
    }

    /// List all decks, most recently updated first.
    pub fn list_decks(&self) -> RevoirResult<Vec<Deck>> {
        let conn = self.lock()?;

        let mut stmt = conn.prepare(
            "SELECT d.id, d.name, d.name_fr, d.description, d.description_fr,
                    d.cefr_level, d.category, d.color, d.created_at, d.updated_at,
                    (SELECT COUNT(*) FROM cards c WHERE c.deck_id = d.id)
             FROM decks d ORDER BY d.updated_at DESC",
        )?;

        let decks = stmt
            .query_map([], deck_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(decks)
    }

    /// Update a deck's descriptive fields.
    ///
    /// Returns false if the deck doesn't exist.
    pub fn update_deck(&self, deck: &Deck) -> RevoirResult<bool> {
        let conn = self.lock()?;

        let updated = conn.execute(
            "UPDATE decks SET name = ?1, name_fr = ?2, description = ?3, description_fr = ?4,
                              cefr_level = ?5, category = ?6, color = ?7, updated_at = ?8
             WHERE id = ?9",
            params![
                deck.name,
                deck.name_fr,
                deck.description,
                deck.description_fr,
                deck.cefr_level.as_str(),
                deck.category,
                deck.color,
                Utc::now().to_rfc3339(),
                deck.id.to_string(),
            ],
        )?;

        Ok(updated > 0)
    }

    /// Delete a deck and all of its cards.
    ///
    /// Returns false if the deck doesn't exist; the cascade still runs
    /// inside a single transaction either way.
    pub fn delete_deck(&self, deck_id: Uuid) -> RevoirResult<bool> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        tx.execute(
            "DELETE FROM cards WHERE deck_id = ?1",
            params![deck_id.to_string()],
        )?;
        let deleted = tx.execute(
            "DELETE FROM decks WHERE id = ?1",
            params![deck_id.to_string()],
        )?;

        tx.commit()?;
        Ok(deleted > 0)
    }

    // =========================================================================
    // Cards
    // =========================================================================

    /// Insert a new card.
    pub fn create_card(&self, card: &Card) -> RevoirResult<()> {
        let conn = self.lock()?;

        conn.execute(
            "INSERT INTO cards
             (id, deck_id, front, back, hint, audio_url, image_url,
              ease_factor, interval_days, repetitions, due_at, last_reviewed_at, version, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
            params![
                card.id.to_string(),
                card.deck_id.to_string(),
                card.front,
                card.back,
                card.hint,
                card.audio_url,
                card.image_url,
                card.state.ease_factor,
                card.state.interval_days,
                card.state.repetitions,
                card.state.due_at.to_rfc3339(),
                card.state.last_reviewed_at.map(|dt| dt.to_rfc3339()),
                card.version,
                card.created_at.to_rfc3339(),
            ],
        )?;

        Ok(())
    }

    /// Get a card by id.
    ///
    /// Returns None if the card doesn't exist.
    pub fn get_card(&self, card_id: Uuid) -> RevoirResult<Option<Card>> {
        let conn = self.lock()?;

        let card = conn
            .query_row(
                &format!("SELECT {CARD_COLUMNS} FROM cards WHERE id = ?1"),
                params![card_id.to_string()],
                card_from_row,
            )
            .optional()?;

        Ok(card)
    }

    /// List the cards of a deck, newest first.
    pub fn list_cards(&self, deck_id: Uuid) -> RevoirResult<Vec<Card>> {
        let conn = self.lock()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {CARD_COLUMNS} FROM cards WHERE deck_id = ?1 ORDER BY created_at DESC"
        ))?;

        let cards = stmt
            .query_map(params![deck_id.to_string()], card_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(cards)
    }

    /// Update a card's content fields.
    ///
    /// Scheduling state and version are deliberately untouched; only
    /// reviews rewrite those. Returns false if the card doesn't exist.
    pub fn update_card(&self, card: &Card) -> RevoirResult<bool> {
        let conn = self.lock()?;

        let updated = conn.execute(
            "UPDATE cards SET front = ?1, back = ?2, hint = ?3, audio_url = ?4, image_url = ?5
             WHERE id = ?6",
            params![
                card.front,
                card.back,
                card.hint,
                card.audio_url,
                card.image_url,
                card.id.to_string(),
            ],
        )?;

        Ok(updated > 0)
    }

    /// Delete a card. Returns false if it doesn't exist.
    pub fn delete_card(&self, card_id: Uuid) -> RevoirResult<bool> {
        let conn = self.lock()?;

        let deleted = conn.execute(
            "DELETE FROM cards WHERE id = ?1",
            params![card_id.to_string()],
        )?;

        Ok(deleted > 0)
    }

    /// Total number of stored cards.
    pub fn count_cards(&self) -> RevoirResult<usize> {
        let conn = self.lock()?;

        let count: i64 = conn.query_row("SELECT COUNT(*) FROM cards", [], |row| row.get(0))?;

        Ok(count as usize)
    }

    // =========================================================================
    // Review flow
    // =========================================================================

    /// Cards due at `now`, oldest-due first with ties broken by id,
    /// optionally scoped to one deck.
    pub fn due_cards(
        &self,
        deck_id: Option<Uuid>,
        now: DateTime<Utc>,
        limit: usize,
    ) -> RevoirResult<Vec<Card>> {
        let conn = self.lock()?;

        let cards = match deck_id {
            Some(deck_id) => {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {CARD_COLUMNS} FROM cards
                     WHERE deck_id = ?1 AND due_at <= ?2
                     ORDER BY due_at ASC, id ASC LIMIT ?3"
                ))?;
                let rows = stmt
                    .query_map(
                        params![deck_id.to_string(), now.to_rfc3339(), limit as i64],
                        card_from_row,
                    )?
                    .collect::<Result<Vec<_>, _>>()?;
                rows
            }
            None => {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {CARD_COLUMNS} FROM cards
                     WHERE due_at <= ?1
                     ORDER BY due_at ASC, id ASC LIMIT ?2"
                ))?;
                let rows = stmt
                    .query_map(params![now.to_rfc3339(), limit as i64], card_from_row)?
                    .collect::<Result<Vec<_>, _>>()?;
                rows
            }
        };

        Ok(cards)
    }

    /// Apply one review to a card and persist the new scheduling state.
    ///
    /// The write is conditional on the card's version being the one that
    /// was read; if a concurrent review got there first, the card is
    /// re-read and rescheduled from fresh state. After
    /// [`MAX_REVIEW_ATTEMPTS`] lost races the conflict is returned to
    /// the caller, who should retry the whole operation.
    pub fn review_card(
        &self,
        card_id: Uuid,
        quality: Quality,
        now: DateTime<Utc>,
    ) -> RevoirResult<ReviewOutcome> {
        for attempt in 0..MAX_REVIEW_ATTEMPTS {
            let card = self
                .get_card(card_id)?
                .ok_or_else(|| RevoirError::card_not_found(card_id.to_string()))?;

            let next = self.scheduler.schedule(&card.state, quality, now);

            let updated = {
                let conn = self.lock()?;
                conn.execute(
                    "UPDATE cards
                     SET ease_factor = ?1, interval_days = ?2, repetitions = ?3,
                         due_at = ?4, last_reviewed_at = ?5, version = version + 1
                     WHERE id = ?6 AND version = ?7",
                    params![
                        next.ease_factor,
                        next.interval_days,
                        next.repetitions,
                        next.due_at.to_rfc3339(),
                        next.last_reviewed_at.map(|dt| dt.to_rfc3339()),
                        card_id.to_string(),
                        card.version,
                    ],
                )?
            };

            if updated == 1 {
                let status = next.status();
                debug!(
                    card_id = %card_id,
                    quality = quality.to_rating(),
                    interval_days = next.interval_days,
                    status = status.as_str(),
                    "card reviewed"
                );
                return Ok(ReviewOutcome {
                    card_id,
                    status,
                    interval_days: next.interval_days,
                    ease_factor: next.ease_factor,
                    due_at: next.due_at,
                });
            }

            debug!(card_id = %card_id, attempt, "review lost version check, retrying");
        }

        Err(RevoirError::review_conflict(card_id.to_string()))
    }

    // =========================================================================
    // Statistics
    // =========================================================================

    /// Learner-facing counts, optionally scoped to one deck.
    ///
    /// Status is re-derived from scheduling state at read time.
    pub fn stats(&self, deck_id: Option<Uuid>, now: DateTime<Utc>) -> RevoirResult<DeckStats> {
        let cards = {
            let conn = self.lock()?;
            match deck_id {
                Some(deck_id) => {
                    let mut stmt = conn.prepare(&format!(
                        "SELECT {CARD_COLUMNS} FROM cards WHERE deck_id = ?1"
                    ))?;
                    let rows = stmt
                        .query_map(params![deck_id.to_string()], card_from_row)?
                        .collect::<Result<Vec<_>, _>>()?;
                    rows
                }
                None => {
                    let mut stmt =
                        conn.prepare(&format!("SELECT {CARD_COLUMNS} FROM cards"))?;
                    let rows = stmt
                        .query_map([], card_from_row)?
                        .collect::<Result<Vec<_>, _>>()?;
                    rows
                }
            }
        };

        Ok(DeckStats::aggregate(&cards, now, None))
    }

    /// Add a study session's counters to its calendar day.
    pub fn record_session(
        &self,
        day: NaiveDate,
        cards_reviewed: u32,
        correct_count: u32,
        duration_secs: u32,
    ) -> RevoirResult<()> {
        let conn = self.lock()?;

        conn.execute(
            "INSERT INTO study_days (day, cards_reviewed, correct_count, duration_secs)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(day) DO UPDATE SET
                 cards_reviewed = cards_reviewed + excluded.cards_reviewed,
                 correct_count = correct_count + excluded.correct_count,
                 duration_secs = duration_secs + excluded.duration_secs",
            params![day.to_string(), cards_reviewed, correct_count, duration_secs],
        )?;

        Ok(())
    }

    /// Streak summary over the last 90 recorded study days.
    pub fn streak(&self, today: NaiveDate) -> RevoirResult<StreakSummary> {
        let days = {
            let conn = self.lock()?;
            let mut stmt = conn.prepare(
                "SELECT day, cards_reviewed, correct_count, duration_secs
                 FROM study_days ORDER BY day DESC LIMIT 90",
            )?;
            let rows = stmt
                .query_map([], |row| {
                    let day: String = row.get(0)?;
                    Ok(StudyDay {
                        date: parse_date(day, 0)?,
                        cards_reviewed: row.get(1)?,
                        correct_count: row.get(2)?,
                        duration_secs: row.get(3)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
            rows
        };

        Ok(StreakSummary::from_days(&days, today))
    }
}

const CARD_COLUMNS: &str = "id, deck_id, front, back, hint, audio_url, image_url, \
     ease_factor, interval_days, repetitions, due_at, last_reviewed_at, version, created_at";

fn deck_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Deck> {
    let id: String = row.get(0)?;
    let cefr_level: String = row.get(5)?;
    let created_at: String = row.get(8)?;
    let updated_at: String = row.get(9)?;
    let card_count: i64 = row.get(10)?;

    Ok(Deck {
        id: parse_uuid(id, 0)?,
        name: row.get(1)?,
        name_fr: row.get(2)?,
        description: row.get(3)?,
        description_fr: row.get(4)?,
        cefr_level: CefrLevel::from_str_or_default(&cefr_level),
        category: row.get(6)?,
        color: row.get(7)?,
        card_count: card_count as usize,
        created_at: parse_timestamp(created_at, 8)?,
        updated_at: parse_timestamp(updated_at, 9)?,
    })
}

fn card_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Card> {
    let id: String = row.get(0)?;
    let deck_id: String = row.get(1)?;
    let due_at: String = row.get(10)?;
    let last_reviewed_at: Option<String> = row.get(11)?;
    let created_at: String = row.get(13)?;

    let state = Sm2State {
        ease_factor: row.get(7)?,
        interval_days: row.get(8)?,
        repetitions: row.get(9)?,
        due_at: parse_timestamp(due_at, 10)?,
        last_reviewed_at: last_reviewed_at
            .map(|ts| parse_timestamp(ts, 11))
            .transpose()?,
    };

    Ok(Card {
        id: parse_uuid(id, 0)?,
        deck_id: parse_uuid(deck_id, 1)?,
        front: row.get(2)?,
        back: row.get(3)?,
        hint: row.get(4)?,
        audio_url: row.get(5)?,
        image_url: row.get(6)?,
        state,
        version: row.get(12)?,
        created_at: parse_timestamp(created_at, 13)?,
    })
}

fn parse_uuid(value: String, idx: usize) -> rusqlite::Result<Uuid> {
    Uuid::parse_str(&value).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn parse_timestamp(value: String, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(&value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
}

fn parse_date(value: String, idx: usize) -> rusqlite::Result<NaiveDate> {
    value.parse::<NaiveDate>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}
