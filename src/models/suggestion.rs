use chrono::NaiveDate;
use serde::Serialize;

use crate::models::submission::RatingRecord;

/// Advisory score for one submission. The reviewer's own rating, when there
/// is one, travels alongside and is never replaced.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SuggestedScore {
    pub participant_id: String,
    pub date: NaiveDate,
    pub weighted_count: f64,
    pub period_median: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ratio: Option<f64>,
    pub suggested: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub existing_rating: Option<RatingRecord>,
}
