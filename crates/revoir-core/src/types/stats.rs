//! Learner-facing statistics derived from the card population and the
//! study-day log.
//!
//! All aggregation here is pure: counts are recomputed from scheduling
//! state on every call, never read from a stored status column.

use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::card::Card;
use super::sm2::CardStatus;

/// Counts for a deck (or the whole collection) at a point in time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckStats {
    pub total: usize,
    pub new: usize,
    pub learning: usize,
    pub review: usize,
    pub mastered: usize,
    /// Cards due before the next UTC midnight.
    pub due_today: usize,
}

impl DeckStats {
    /// Aggregate over a card collection, optionally scoped to one deck.
    ///
    /// Status is derived per card from its scheduling state so the
    /// counts cannot drift from a stale denormalized column.
    pub fn aggregate(cards: &[Card], now: DateTime<Utc>, deck_id: Option<Uuid>) -> Self {
        let end_of_day = next_utc_midnight(now);
        let mut stats = Self::default();

        for card in cards {
            if let Some(deck_id) = deck_id {
                if card.deck_id != deck_id {
                    continue;
                }
            }
            stats.total += 1;
            match card.state.status() {
                CardStatus::New => stats.new += 1,
                CardStatus::Learning => stats.learning += 1,
                CardStatus::Review => stats.review += 1,
                CardStatus::Mastered => stats.mastered += 1,
            }
            if card.state.due_at < end_of_day {
                stats.due_today += 1;
            }
        }

        stats
    }
}

/// The first instant of the UTC day after `now`.
fn next_utc_midnight(now: DateTime<Utc>) -> DateTime<Utc> {
    let tomorrow = now.date_naive() + Days::new(1);
    tomorrow.and_time(NaiveTime::MIN).and_utc()
}

/// Per-day study counters, upserted additively as sessions are recorded.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyDay {
    pub date: NaiveDate,
    pub cards_reviewed: u32,
    pub correct_count: u32,
    pub duration_secs: u32,
}

/// Streak and volume summary over the recorded study days.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakSummary {
    pub current_streak: u32,
    pub longest_streak: u32,
    pub total_cards: u32,
    pub total_correct: u32,
    pub total_duration_secs: u32,
    /// Percentage of correct answers across all recorded days.
    pub accuracy: u32,
    pub recent_days: Vec<StudyDay>,
}

impl StreakSummary {
    /// Compute streaks from study days sorted most-recent-first.
    ///
    /// The current streak counts back from `today`; a day without any
    /// recorded study breaks it, so a learner who skipped today starts
    /// at zero.
    pub fn from_days(days: &[StudyDay], today: NaiveDate) -> Self {
        if days.is_empty() {
            return Self::default();
        }

        let mut current_streak = 0u32;
        for (i, day) in days.iter().enumerate() {
            let expected = today - Days::new(i as u64);
            if day.date == expected {
                current_streak += 1;
            } else {
                break;
            }
        }

        let mut longest_streak = 0u32;
        let mut run = 1u32;
        for pair in days.windows(2) {
            let gap = pair[0].date.num_days_from_ce() - pair[1].date.num_days_from_ce();
            if gap == 1 {
                run += 1;
            } else {
                longest_streak = longest_streak.max(run);
                run = 1;
            }
        }
        longest_streak = longest_streak.max(run).max(current_streak);

        let total_cards: u32 = days.iter().map(|d| d.cards_reviewed).sum();
        let total_correct: u32 = days.iter().map(|d| d.correct_count).sum();
        let total_duration_secs: u32 = days.iter().map(|d| d.duration_secs).sum();
        let accuracy = if total_cards > 0 {
            ((total_correct as f64 / total_cards as f64) * 100.0).round() as u32
        } else {
            0
        };

        Self {
            current_streak,
            longest_streak,
            total_cards,
            total_correct,
            total_duration_secs,
            accuracy,
            recent_days: days.iter().take(30).cloned().collect(),
        }
    }
}
