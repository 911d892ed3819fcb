use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::period::{Period, RangeKey};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Same,
}

impl Trend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Up => "up",
            Trend::Down => "down",
            Trend::Same => "same",
        }
    }
}

impl Default for Trend {
    fn default() -> Self {
        Trend::Same
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub participant_id: String,
    pub rank: u32,
    pub avg_productivity: f64,
    pub avg_quality: f64,
    pub avg_total: f64,
    pub submission_count: u32,
    pub rated_count: u32,
    pub weighted_count: f64,
    #[serde(default)]
    pub trend: Trend,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank_change: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cumulative_total: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_period_added: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardQueryParams {
    #[serde(default)]
    pub range: RangeKey,
    #[serde(default)]
    pub week_offset: i32,
}

impl Default for LeaderboardQueryParams {
    fn default() -> Self {
        Self {
            range: RangeKey::Weekly,
            week_offset: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardSummary {
    pub participant_count: usize,
    pub submission_count: usize,
    pub rated_submission_count: usize,
    pub median_weighted_count: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ZeroStateMeta {
    pub is_empty: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl ZeroStateMeta {
    pub fn populated() -> Self {
        Self {
            is_empty: false,
            reason: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardMeta {
    pub reference_date: NaiveDate,
    pub generated_at: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyCycleInfo {
    pub cycle_start: NaiveDate,
    pub cycle_end: NaiveDate,
    pub cycle_end_clamped: NaiveDate,
    pub day_index: u8,
    pub week_offset: i32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardResponse {
    pub range: RangeKey,
    pub period: Period,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_period: Option<Period>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weekly: Option<WeeklyCycleInfo>,
    #[serde(default)]
    pub entries: Vec<LeaderboardEntry>,
    pub summary: LeaderboardSummary,
    pub zero_state: ZeroStateMeta,
    pub meta: LeaderboardMeta,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Markdown,
    Json,
}

impl ReportFormat {
    pub fn file_extension(&self) -> &'static str {
        match self {
            ReportFormat::Markdown => "md",
            ReportFormat::Json => "json",
        }
    }
}

impl Default for ReportFormat {
    fn default() -> Self {
        ReportFormat::Markdown
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportExportResult {
    pub file_path: String,
    pub format: ReportFormat,
    pub generated_at: String,
}
