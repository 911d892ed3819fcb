use chrono::{DateTime, Utc};

use crate::models::leaderboard::LeaderboardQueryParams;
use crate::models::submission::SubmissionRecord;
use crate::models::suggestion::SuggestedScore;

use super::{AppState, CommandResult};

/// Advisory score for one submission under review, measured against the
/// median of the requested window.
pub fn review_suggest_score(
    state: &AppState,
    submission: &SubmissionRecord,
    params: Option<LeaderboardQueryParams>,
    now: DateTime<Utc>,
    submissions: &[SubmissionRecord],
) -> CommandResult<SuggestedScore> {
    let params = params.unwrap_or_default();
    let engine = state.engine()?;
    let today = engine.today(now);

    let period = engine
        .leaderboard
        .calendar()
        .resolve_window(params.range, today, params.week_offset)?;
    let median = engine.advisor.period_median(&period, submissions)?;
    Ok(engine.advisor.suggest_for_submission(submission, median))
}

pub fn review_suggestions_fetch(
    state: &AppState,
    params: Option<LeaderboardQueryParams>,
    now: DateTime<Utc>,
    submissions: &[SubmissionRecord],
) -> CommandResult<Vec<SuggestedScore>> {
    let params = params.unwrap_or_default();
    let engine = state.engine()?;
    let today = engine.today(now);

    let period = engine
        .leaderboard
        .calendar()
        .resolve_window(params.range, today, params.week_offset)?;
    Ok(engine.advisor.suggest_for_period(&period, submissions)?)
}
