use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::error::{Error, Result};

/// Largest absolute value accepted for either score bound.
pub const SCORE_BOUND_LIMIT: i32 = 1000;
/// Widest accepted `max - min`; also caps the histogram size.
pub const MAX_SCORE_SPAN: i32 = 100;

/// Number of submissions whose average rounds to `score`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreBucket {
    pub score: i32,
    pub count: i64,
}

/// Likert scoring arithmetic shared by submission and statistics.
pub struct ScoringService;

impl ScoringService {
    /// Flips a raw answer within `[min, max]`: `max - raw + min`.
    pub fn reverse_score(raw: i32, min: i32, max: i32) -> i32 {
        let flipped = i64::from(max) - i64::from(raw) + i64::from(min);
        flipped.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
    }

    /// Checks that `min..=max` is a usable Likert range.
    pub fn validate_bounds(min: i32, max: i32) -> std::result::Result<(), &'static str> {
        let allowed = -SCORE_BOUND_LIMIT..=SCORE_BOUND_LIMIT;
        if !allowed.contains(&min) || !allowed.contains(&max) {
            return Err("Score bounds must lie between -1000 and 1000");
        }
        if min >= max {
            return Err("Min score must be less than max score");
        }
        if max - min > MAX_SCORE_SPAN {
            return Err("Score range cannot span more than 100 points");
        }
        Ok(())
    }

    /// The value persisted for one answer.
    pub fn stored_score(raw: i32, reversed: bool, min: i32, max: i32) -> i32 {
        if reversed {
            Self::reverse_score(raw, min, max)
        } else {
            raw
        }
    }

    pub fn validate_raw_score(question_id: i64, raw: i32, min: i32, max: i32) -> Result<()> {
        if raw < min || raw > max {
            return Err(Error::Unprocessable(format!(
                "Score {} for question {} is outside {}..={}",
                raw, question_id, min, max
            )));
        }
        Ok(())
    }

    /// Mean of the stored scores rounded to two decimals, zero when empty.
    pub fn average(scores: &[i32]) -> Decimal {
        if scores.is_empty() {
            return Decimal::ZERO;
        }
        let total: i64 = scores.iter().map(|s| i64::from(*s)).sum();
        (Decimal::from(total) / Decimal::from(scores.len() as i64))
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }

    /// Attempt number for the next submission given the highest existing one.
    pub fn next_attempt_count(current_max: Option<i32>) -> i32 {
        current_max.unwrap_or(0) + 1
    }

    /// Histogram of submission averages over the integer scores `min..=max`.
    /// Each average is rounded half up; values outside the range are dropped.
    /// Ranges that are not valid bounds yield no buckets.
    pub fn score_distribution(averages: &[Decimal], min: i32, max: i32) -> Vec<ScoreBucket> {
        if Self::validate_bounds(min, max).is_err() {
            return Vec::new();
        }
        let mut buckets: Vec<ScoreBucket> = (min..=max)
            .map(|score| ScoreBucket { score, count: 0 })
            .collect();

        for avg in averages {
            let rounded = avg.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
            let Some(score) = rounded.to_i32() else {
                continue;
            };
            if score < min || score > max {
                continue;
            }
            if let Some(bucket) = buckets.get_mut((score - min) as usize) {
                bucket.count += 1;
            }
        }
        buckets
    }

    /// Mean of submission averages, rounded like a single submission.
    pub fn overall_average(averages: &[Decimal]) -> Decimal {
        if averages.is_empty() {
            return Decimal::ZERO;
        }
        let total: Decimal = averages.iter().copied().sum();
        (total / Decimal::from(averages.len() as i64))
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn reversed_question_flips_within_bounds() {
        assert_eq!(ScoringService::stored_score(2, true, 1, 5), 4);
        assert_eq!(ScoringService::stored_score(1, true, 1, 5), 5);
        assert_eq!(ScoringService::stored_score(5, true, 1, 5), 1);
        assert_eq!(ScoringService::stored_score(3, true, 1, 5), 3);
        assert_eq!(ScoringService::stored_score(2, false, 1, 5), 2);
    }

    #[test]
    fn reversing_twice_is_identity() {
        for (min, max) in [(1, 5), (0, 7), (-3, 3), (1, 4)] {
            for s in min..=max {
                let once = ScoringService::reverse_score(s, min, max);
                assert!(once >= min && once <= max);
                assert_eq!(ScoringService::reverse_score(once, min, max), s);
            }
        }
    }

    #[test]
    fn extreme_bounds_do_not_overflow() {
        assert_eq!(
            ScoringService::stored_score(-2_000_000_000, true, -2_000_000_000, 2_000_000_000),
            2_000_000_000
        );
        assert_eq!(ScoringService::reverse_score(i32::MIN, i32::MIN, i32::MAX), i32::MAX);
    }

    #[test]
    fn bounds_must_form_a_small_range() {
        assert!(ScoringService::validate_bounds(1, 5).is_ok());
        assert!(ScoringService::validate_bounds(0, 100).is_ok());
        assert!(ScoringService::validate_bounds(-1000, -900).is_ok());
        assert!(ScoringService::validate_bounds(5, 5).is_err());
        assert!(ScoringService::validate_bounds(0, 101).is_err());
        assert!(ScoringService::validate_bounds(-1001, -990).is_err());
        assert!(ScoringService::validate_bounds(i32::MIN, i32::MAX).is_err());
    }

    #[test]
    fn wide_ranges_get_no_histogram() {
        let averages = [dec("3")];
        assert!(ScoringService::score_distribution(&averages, i32::MIN, i32::MAX).is_empty());
        assert!(ScoringService::score_distribution(&averages, 0, 1000).is_empty());
        assert_eq!(ScoringService::score_distribution(&averages, 0, 100).len(), 101);
    }

    #[test]
    fn raw_scores_must_lie_in_range() {
        assert!(ScoringService::validate_raw_score(1, 1, 1, 5).is_ok());
        assert!(ScoringService::validate_raw_score(1, 5, 1, 5).is_ok());
        assert!(matches!(
            ScoringService::validate_raw_score(1, 0, 1, 5),
            Err(Error::Unprocessable(_))
        ));
        assert!(ScoringService::validate_raw_score(1, 6, 1, 5).is_err());
    }

    #[test]
    fn empty_average_is_zero() {
        assert_eq!(ScoringService::average(&[]), Decimal::ZERO);
    }

    #[test]
    fn average_rounds_to_two_decimals() {
        assert_eq!(ScoringService::average(&[4, 5, 3, 1, 4, 5]), dec("3.67"));
        assert_eq!(ScoringService::average(&[1, 2]), dec("1.5"));
        assert_eq!(ScoringService::average(&[1, 1, 2]), dec("1.33"));
        // 2/3 = 0.666.. rounds up, 1/8 = 0.125 rounds half away from zero
        assert_eq!(ScoringService::average(&[0, 0, 2]), dec("0.67"));
        assert_eq!(ScoringService::average(&[1, 0, 0, 0, 0, 0, 0, 0]), dec("0.13"));
    }

    #[test]
    fn attempt_counts_form_a_gapless_sequence() {
        let mut current = None;
        let mut seen = Vec::new();
        for _ in 0..5 {
            let next = ScoringService::next_attempt_count(current);
            seen.push(next);
            current = Some(next);
        }
        assert_eq!(seen, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn distribution_buckets_rounded_averages() {
        let averages = [dec("1.2"), dec("2.5"), dec("2.49"), dec("4.99"), dec("0.4"), dec("5.6")];
        let buckets = ScoringService::score_distribution(&averages, 1, 5);
        let counts: Vec<i64> = buckets.iter().map(|b| b.count).collect();
        assert_eq!(buckets.first().map(|b| b.score), Some(1));
        assert_eq!(buckets.last().map(|b| b.score), Some(5));
        assert_eq!(counts, vec![1, 1, 1, 0, 1]);
    }

    #[test]
    fn overall_average_of_submissions() {
        assert_eq!(ScoringService::overall_average(&[]), Decimal::ZERO);
        assert_eq!(
            ScoringService::overall_average(&[dec("3.67"), dec("3.5")]),
            dec("3.59")
        );
    }
}
