use tracing::debug;

use crate::error::AppResult;
use crate::models::period::Period;
use crate::models::submission::SubmissionRecord;
use crate::models::suggestion::SuggestedScore;
use crate::services::productivity_scorer::ProductivityScorer;
use crate::utils::stats::median;

/// Returned when there is no median to compare against.
pub const NEUTRAL_SCORE: u8 = 3;

/// Upper ratio bound (inclusive) for scores 1 through 4; anything above the
/// last bound suggests 5.
const RATIO_BUCKETS: [(f64, u8); 4] = [(0.6, 1), (0.8, 2), (1.0, 3), (1.2, 4)];

/// Maps the participant/median output ratio onto the 1..=5 scale.
pub fn suggest(participant_weighted_count: f64, period_median_weighted_count: f64) -> u8 {
    match ratio(participant_weighted_count, period_median_weighted_count) {
        Some(ratio) => bucket_for_ratio(ratio),
        None => NEUTRAL_SCORE,
    }
}

fn ratio(count: f64, median: f64) -> Option<f64> {
    if median == 0.0 || !median.is_finite() || !count.is_finite() {
        None
    } else {
        Some(count / median)
    }
}

fn bucket_for_ratio(ratio: f64) -> u8 {
    RATIO_BUCKETS
        .iter()
        .find(|(bound, _)| ratio <= *bound)
        .map(|(_, score)| *score)
        .unwrap_or(5)
}

/// Advisory values for a review queue. Suggestions are computed next to the
/// human rating and never written into it.
pub struct SuggestedScoreService {
    scorer: ProductivityScorer,
}

impl SuggestedScoreService {
    pub fn new(scorer: ProductivityScorer) -> Self {
        Self { scorer }
    }

    /// Median weighted count over every submission dated inside `period`.
    /// `0.0` when the period holds no submissions.
    pub fn period_median(
        &self,
        period: &Period,
        submissions: &[SubmissionRecord],
    ) -> AppResult<f64> {
        period.ensure_valid()?;
        let counts: Vec<f64> = submissions
            .iter()
            .filter(|submission| period.contains(submission.date))
            .map(|submission| self.scorer.weighted_count_for_submission(submission))
            .collect();
        Ok(median(&counts).unwrap_or(0.0))
    }

    pub fn suggest_for_submission(
        &self,
        submission: &SubmissionRecord,
        period_median: f64,
    ) -> SuggestedScore {
        let weighted_count = self.scorer.weighted_count_for_submission(submission);
        let ratio = ratio(weighted_count, period_median);
        let suggested = ratio.map(bucket_for_ratio).unwrap_or(NEUTRAL_SCORE);

        SuggestedScore {
            participant_id: submission.participant_id.clone(),
            date: submission.date,
            weighted_count,
            period_median,
            ratio,
            suggested,
            existing_rating: submission.rating,
        }
    }

    /// One suggestion per submission in `period`, all measured against the
    /// same period median.
    pub fn suggest_for_period(
        &self,
        period: &Period,
        submissions: &[SubmissionRecord],
    ) -> AppResult<Vec<SuggestedScore>> {
        let period_median = self.period_median(period, submissions)?;
        let suggestions: Vec<SuggestedScore> = submissions
            .iter()
            .filter(|submission| period.contains(submission.date))
            .map(|submission| self.suggest_for_submission(submission, period_median))
            .collect();

        debug!(
            target: "app::advisor",
            start = %period.start,
            end = %period.end,
            median = period_median,
            count = suggestions.len(),
            "computed suggested scores"
        );

        Ok(suggestions)
    }
}
