use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A video asset. `duration` is in seconds and expected for every video; a
/// missing value is weighted as the shortest bucket.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct VideoAsset {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
}

impl VideoAsset {
    pub fn new(duration_seconds: f64) -> Self {
        Self {
            duration: Some(duration_seconds),
        }
    }
}

/// A single produced asset attached to a daily submission.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum AssetRecord {
    Static,
    Video(VideoAsset),
}

impl AssetRecord {
    pub fn video(duration_seconds: f64) -> Self {
        AssetRecord::Video(VideoAsset::new(duration_seconds))
    }
}

/// Reviewer rating on the 1..=5 integer scale.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RatingRecord {
    pub productivity: u8,
    pub quality: u8,
}

impl RatingRecord {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(productivity: u8, quality: u8) -> Self {
        Self {
            productivity,
            quality,
        }
    }

    pub fn total(&self) -> f64 {
        f64::from(self.productivity) + f64::from(self.quality)
    }

    pub fn is_in_scale(&self) -> bool {
        (Self::MIN..=Self::MAX).contains(&self.productivity)
            && (Self::MIN..=Self::MAX).contains(&self.quality)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRecord {
    pub participant_id: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub assets: Vec<AssetRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<RatingRecord>,
}

impl SubmissionRecord {
    pub fn new(participant_id: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            participant_id: participant_id.into(),
            date,
            assets: Vec::new(),
            rating: None,
        }
    }

    pub fn with_assets(mut self, assets: Vec<AssetRecord>) -> Self {
        self.assets = assets;
        self
    }

    pub fn with_rating(mut self, productivity: u8, quality: u8) -> Self {
        self.rating = Some(RatingRecord::new(productivity, quality));
        self
    }
}
