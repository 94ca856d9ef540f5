//! SM-2 scheduling state types.
//!
//! The scheduling state of a card is separate from its content: the
//! scheduler reads and rewrites `Sm2State`, never the front/back text.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Interval length, in days, at which a card counts as mastered.
///
/// Three weeks of retention signals the card has left the active
/// learning rotation.
pub const MASTERY_THRESHOLD_DAYS: u32 = 21;

/// Default ease factor assigned to a freshly created card.
pub const DEFAULT_EASE_FACTOR: f32 = 2.5;

/// Lowest ease factor a card can reach, however badly it is rated.
pub const MIN_EASE_FACTOR: f32 = 1.3;

/// Self-assessed recall quality for a single review (1-5 scale).
///
/// The review UI exposes four buttons (again/hard/good/easy); rating 2
/// is still accepted from API callers and handled as a failed recall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum Quality {
    /// No recall; the card must be relearned.
    Again = 1,
    /// Incorrect, but the answer felt familiar.
    Partial = 2,
    /// Correct with serious difficulty.
    Hard = 3,
    /// Correct after some hesitation.
    Good = 4,
    /// Effortless recall.
    Easy = 5,
}

impl Quality {
    /// Convert to the raw 1-5 rating value.
    pub fn to_rating(self) -> u8 {
        self as u8
    }

    /// Create from a raw rating value.
    ///
    /// Returns None for anything outside 1-5; out-of-range ratings are
    /// a caller bug and must surface as a validation error rather than
    /// being clamped.
    pub fn from_rating(rating: u8) -> Option<Self> {
        match rating {
            1 => Some(Quality::Again),
            2 => Some(Quality::Partial),
            3 => Some(Quality::Hard),
            4 => Some(Quality::Good),
            5 => Some(Quality::Easy),
            _ => None,
        }
    }

    /// Whether this rating counts as a lapse (failed recall).
    pub fn is_lapse(self) -> bool {
        (self as u8) < 3
    }
}

impl From<Quality> for u8 {
    fn from(quality: Quality) -> Self {
        quality.to_rating()
    }
}

impl TryFrom<u8> for Quality {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Quality::from_rating(value).ok_or(())
    }
}

/// Classification of a card within the learning lifecycle.
///
/// Always derived from the scheduling state; a persisted copy is a
/// denormalized cache and must never be trusted over [`Sm2State::status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum CardStatus {
    /// Never reviewed.
    #[default]
    New,
    /// In the initial learning phase, or relearning after a lapse.
    Learning,
    /// In regular spaced review.
    Review,
    /// Interval has reached the mastery threshold.
    Mastered,
}

impl CardStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CardStatus::New => "new",
            CardStatus::Learning => "learning",
            CardStatus::Review => "review",
            CardStatus::Mastered => "mastered",
        }
    }
}

/// SM-2 scheduling state for a single card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sm2State {
    /// Multiplier controlling interval growth; never below 1.3.
    pub ease_factor: f32,
    /// Days until the next scheduled review; 0 for a brand-new card.
    pub interval_days: u32,
    /// Consecutive successful reviews since the last lapse.
    pub repetitions: u32,
    /// When the card is next due; a card is due when `due_at <= now`.
    pub due_at: DateTime<Utc>,
    /// Most recent review, or None if never reviewed.
    pub last_reviewed_at: Option<DateTime<Utc>>,
}

impl Sm2State {
    /// Create the state for a freshly added card: immediately due,
    /// default ease, no history.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            ease_factor: DEFAULT_EASE_FACTOR,
            interval_days: 0,
            repetitions: 0,
            due_at: now,
            last_reviewed_at: None,
        }
    }

    /// Derive the lifecycle status from the scheduling state.
    ///
    /// A card that has never been reviewed is `new` regardless of its
    /// other fields, so a fresh card can never classify as mastered.
    /// After a review: `mastered` once the interval reaches the
    /// three-week threshold, `learning` through the first two successes
    /// (and after any lapse), `review` otherwise.
    pub fn status(&self) -> CardStatus {
        if self.last_reviewed_at.is_none() {
            CardStatus::New
        } else if self.interval_days >= MASTERY_THRESHOLD_DAYS {
            CardStatus::Mastered
        } else if self.repetitions <= 2 {
            CardStatus::Learning
        } else {
            CardStatus::Review
        }
    }

    /// Whether the card is due for review at `now`.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.due_at <= now
    }
}
