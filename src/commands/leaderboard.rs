use chrono::{DateTime, Utc};

use crate::models::leaderboard::{
    LeaderboardQueryParams, LeaderboardResponse, ReportExportResult, ReportFormat,
};
use crate::models::submission::SubmissionRecord;

use super::{AppState, CommandResult};

pub fn leaderboard_fetch(
    state: &AppState,
    params: Option<LeaderboardQueryParams>,
    now: DateTime<Utc>,
    submissions: &[SubmissionRecord],
) -> CommandResult<LeaderboardResponse> {
    let params = params.unwrap_or_default();
    let engine = state.engine()?;
    let today = engine.today(now);

    let response = engine.leaderboard.build_response(
        params.range,
        today,
        params.week_offset,
        submissions,
        now,
    )?;
    Ok(response)
}

pub fn leaderboard_report_export(
    state: &AppState,
    params: Option<LeaderboardQueryParams>,
    format: Option<ReportFormat>,
    now: DateTime<Utc>,
    submissions: &[SubmissionRecord],
) -> CommandResult<ReportExportResult> {
    let params = params.unwrap_or_default();
    let engine = state.engine()?;
    let today = engine.today(now);

    let response = engine.leaderboard.build_response(
        params.range,
        today,
        params.week_offset,
        submissions,
        now,
    )?;
    let result = engine.leaderboard.export_report(
        &response,
        format.unwrap_or_default(),
        state.reports_dir(),
        now,
    )?;
    Ok(result)
}
