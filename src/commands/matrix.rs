use chrono::{DateTime, Utc};

use crate::models::leaderboard::LeaderboardQueryParams;
use crate::models::matrix::MatrixLayoutResponse;
use crate::models::submission::SubmissionRecord;

use super::{AppState, CommandResult};

/// Ranks the requested window and lays the ranked participants out on the
/// productivity/quality chart.
pub fn matrix_layout_fetch(
    state: &AppState,
    params: Option<LeaderboardQueryParams>,
    now: DateTime<Utc>,
    submissions: &[SubmissionRecord],
) -> CommandResult<MatrixLayoutResponse> {
    let params = params.unwrap_or_default();
    let engine = state.engine()?;
    let today = engine.today(now);

    let standings = engine.leaderboard.build_response(
        params.range,
        today,
        params.week_offset,
        submissions,
        now,
    )?;
    Ok(engine.matrix.layout_response(&standings.entries)?)
}
