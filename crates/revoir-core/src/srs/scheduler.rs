//! SM-2 scheduler for review intervals.
//!
//! Computes the next scheduling state for a card from a recall quality
//! rating, following the SuperMemo 2 interval/ease rules.

use chrono::{DateTime, Duration, Utc};

use crate::types::{Quality, Sm2State, MIN_EASE_FACTOR};

/// SM-2 scheduler.
///
/// Pure and stateless: `schedule` is deterministic given
/// `(state, quality, now)`, so the full scheduling history of a card can
/// be re-derived from its review log.
#[derive(Debug, Clone)]
pub struct Sm2Scheduler {
    /// Floor applied to every ease update.
    min_ease_factor: f32,
    /// Flat ease deduction applied on a lapse.
    lapse_penalty: f32,
    /// Interval after the first successful review.
    first_interval_days: u32,
    /// Interval after the second consecutive successful review.
    second_interval_days: u32,
}

impl Sm2Scheduler {
    /// Create a scheduler with the standard SM-2 parameters.
    pub fn new() -> Self {
        Self {
            min_ease_factor: MIN_EASE_FACTOR,
            lapse_penalty: 0.20,
            first_interval_days: 1,
            second_interval_days: 6,
        }
    }

    /// Create a scheduler with custom parameters.
    pub fn with_params(
        min_ease_factor: f32,
        lapse_penalty: f32,
        first_interval_days: u32,
        second_interval_days: u32,
    ) -> Self {
        Self {
            min_ease_factor,
            lapse_penalty,
            first_interval_days,
            second_interval_days,
        }
    }

    /// Compute the scheduling state after one review.
    ///
    /// A lapse (quality below 3) resets the repetition streak, schedules
    /// the card for tomorrow, and deducts a flat ease penalty. A success
    /// grows the interval: 1 day, then 6 days, then the previous
    /// interval multiplied by the updated ease factor.
    ///
    /// The returned state always has `interval_days >= 1`,
    /// `ease_factor >= 1.3`, and `due_at >= now`.
    pub fn schedule(&self, state: &Sm2State, quality: Quality, now: DateTime<Utc>) -> Sm2State {
        let mut ease_factor = state.ease_factor;
        let interval_days;
        let repetitions;

        if quality.is_lapse() {
            repetitions = 0;
            interval_days = 1;
            ease_factor = (ease_factor - self.lapse_penalty).max(self.min_ease_factor);
        } else {
            repetitions = state.repetitions + 1;

            // EF' = EF + (0.1 - (5-q) * (0.08 + (5-q) * 0.02))
            let q = quality.to_rating() as f32;
            ease_factor += 0.1 - (5.0 - q) * (0.08 + (5.0 - q) * 0.02);
            ease_factor = ease_factor.max(self.min_ease_factor);

            interval_days = match repetitions {
                1 => self.first_interval_days,
                2 => self.second_interval_days,
                _ => ((state.interval_days as f32 * ease_factor).round()).max(1.0) as u32,
            };
        }

        Sm2State {
            ease_factor,
            interval_days,
            repetitions,
            due_at: now + Duration::days(interval_days as i64),
            last_reviewed_at: Some(now),
        }
    }

    /// Interval each rating would produce, for showing on the review
    /// buttons: again, hard, good, easy.
    pub fn preview_intervals(&self, state: &Sm2State, now: DateTime<Utc>) -> [u32; 4] {
        [
            self.schedule(state, Quality::Again, now).interval_days,
            self.schedule(state, Quality::Hard, now).interval_days,
            self.schedule(state, Quality::Good, now).interval_days,
            self.schedule(state, Quality::Easy, now).interval_days,
        ]
    }
}

impl Default for Sm2Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CardStatus;

    fn new_state(now: DateTime<Utc>) -> Sm2State {
        Sm2State::new(now)
    }

    #[test]
    fn test_first_review_good() {
        let scheduler = Sm2Scheduler::new();
        let now = Utc::now();

        let next = scheduler.schedule(&new_state(now), Quality::Good, now);

        assert_eq!(next.repetitions, 1);
        assert_eq!(next.interval_days, 1);
        assert_eq!(next.status(), CardStatus::Learning);
        assert_eq!(next.due_at, now + Duration::days(1));
        assert_eq!(next.last_reviewed_at, Some(now));
        // Quality 4 leaves the ease factor unchanged.
        assert!((next.ease_factor - 2.5).abs() < 1e-5);
    }

    #[test]
    fn test_second_review_good() {
        let scheduler = Sm2Scheduler::new();
        let now = Utc::now();

        let mut state = new_state(now);
        state.repetitions = 1;
        state.interval_days = 1;
        state.last_reviewed_at = Some(now - Duration::days(1));

        let next = scheduler.schedule(&state, Quality::Good, now);

        assert_eq!(next.repetitions, 2);
        assert_eq!(next.interval_days, 6);
        assert_eq!(next.status(), CardStatus::Learning);
    }

    #[test]
    fn test_third_review_easy_multiplies_interval() {
        let scheduler = Sm2Scheduler::new();
        let now = Utc::now();

        let mut state = new_state(now);
        state.repetitions = 2;
        state.interval_days = 6;
        state.ease_factor = 2.5;
        state.last_reviewed_at = Some(now - Duration::days(6));

        let next = scheduler.schedule(&state, Quality::Easy, now);

        // Quality 5 raises the ease to 2.6; 6 * 2.6 rounds to 16.
        assert!((next.ease_factor - 2.6).abs() < 1e-5);
        assert_eq!(next.interval_days, 16);
        assert_eq!(next.repetitions, 3);
        assert_eq!(next.status(), CardStatus::Review);
    }

    #[test]
    fn test_long_interval_reaches_mastered() {
        let scheduler = Sm2Scheduler::new();
        let now = Utc::now();

        let mut state = new_state(now);
        state.repetitions = 3;
        state.interval_days = 16;
        state.ease_factor = 2.6;
        state.last_reviewed_at = Some(now - Duration::days(16));

        let next = scheduler.schedule(&state, Quality::Good, now);

        // 16 * 2.6 = 41.6 -> 42 days, past the three-week threshold.
        assert!(next.interval_days >= 21);
        assert_eq!(next.status(), CardStatus::Mastered);
    }

    #[test]
    fn test_lapse_resets_streak_and_interval() {
        let scheduler = Sm2Scheduler::new();
        let now = Utc::now();

        let mut state = new_state(now);
        state.repetitions = 5;
        state.interval_days = 30;
        state.ease_factor = 2.5;
        state.last_reviewed_at = Some(now - Duration::days(30));

        let next = scheduler.schedule(&state, Quality::Again, now);

        assert_eq!(next.repetitions, 0);
        assert_eq!(next.interval_days, 1);
        assert!((next.ease_factor - 2.3).abs() < 1e-5);
        assert_eq!(next.status(), CardStatus::Learning);
    }

    #[test]
    fn test_quality_two_counts_as_lapse() {
        let scheduler = Sm2Scheduler::new();
        let now = Utc::now();

        let mut state = new_state(now);
        state.repetitions = 3;
        state.interval_days = 16;

        let next = scheduler.schedule(&state, Quality::Partial, now);

        assert_eq!(next.repetitions, 0);
        assert_eq!(next.interval_days, 1);
    }

    #[test]
    fn test_hard_reviews_shrink_ease() {
        let scheduler = Sm2Scheduler::new();
        let now = Utc::now();

        let state = new_state(now);
        let next = scheduler.schedule(&state, Quality::Hard, now);

        // Quality 3: EF drops by 0.14.
        assert!((next.ease_factor - 2.36).abs() < 1e-5);
        assert_eq!(next.repetitions, 1);
    }

    #[test]
    fn test_ease_floor_holds_under_any_sequence() {
        let scheduler = Sm2Scheduler::new();
        let now = Utc::now();
        let mut state = new_state(now);

        // Alternate failures and hard passes for a while; the floor
        // must hold throughout.
        for i in 0..50 {
            let quality = if i % 2 == 0 { Quality::Again } else { Quality::Hard };
            state = scheduler.schedule(&state, quality, now);
            assert!(state.ease_factor >= MIN_EASE_FACTOR - f32::EPSILON);
        }
    }

    #[test]
    fn test_interval_always_positive() {
        let scheduler = Sm2Scheduler::new();
        let now = Utc::now();
        let mut state = new_state(now);

        for quality in [
            Quality::Again,
            Quality::Partial,
            Quality::Hard,
            Quality::Good,
            Quality::Easy,
            Quality::Again,
            Quality::Easy,
        ] {
            state = scheduler.schedule(&state, quality, now);
            assert!(state.interval_days >= 1);
        }
    }

    #[test]
    fn test_due_date_never_in_the_past() {
        let scheduler = Sm2Scheduler::new();
        let now = Utc::now();
        let mut state = new_state(now);

        for quality in [Quality::Good, Quality::Again, Quality::Easy, Quality::Hard] {
            state = scheduler.schedule(&state, quality, now);
            assert!(state.due_at >= now);
        }
    }

    #[test]
    fn test_schedule_is_deterministic() {
        let scheduler = Sm2Scheduler::new();
        let now = Utc::now();

        let mut state = new_state(now);
        state.repetitions = 2;
        state.interval_days = 6;

        let a = scheduler.schedule(&state, Quality::Good, now);
        let b = scheduler.schedule(&state, Quality::Good, now);
        assert_eq!(a, b);
    }

    #[test]
    fn test_same_day_reviews_recompute_forward() {
        let scheduler = Sm2Scheduler::new();
        let now = Utc::now();

        let first = scheduler.schedule(&new_state(now), Quality::Good, now);
        let later = now + Duration::hours(2);
        let second = scheduler.schedule(&first, Quality::Good, later);

        // Each review reschedules from its own `now`.
        assert_eq!(second.due_at, later + Duration::days(6));
        assert_eq!(second.repetitions, 2);
    }

    #[test]
    fn test_preview_intervals_for_mature_card() {
        let scheduler = Sm2Scheduler::new();
        let now = Utc::now();

        let mut state = new_state(now);
        state.repetitions = 4;
        state.interval_days = 10;
        state.ease_factor = 2.5;

        let [again, hard, good, easy] = scheduler.preview_intervals(&state, now);
        assert_eq!(again, 1);
        assert_eq!(hard, 24); // 10 * 2.36
        assert_eq!(good, 25); // 10 * 2.5
        assert_eq!(easy, 26); // 10 * 2.6
    }
}
