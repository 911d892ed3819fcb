use tracing::warn;

use crate::error::{AppError, AppResult};
use crate::models::settings::WeightingPolicy;
use crate::models::submission::{AssetRecord, SubmissionRecord, VideoAsset};

/// Turns a day's statics and videos into one weighted productivity number.
/// The policy is validated on construction, so scoring itself cannot fail.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductivityScorer {
    policy: WeightingPolicy,
}

impl Default for ProductivityScorer {
    fn default() -> Self {
        Self {
            policy: WeightingPolicy::default(),
        }
    }
}

impl ProductivityScorer {
    pub fn new(policy: WeightingPolicy) -> AppResult<Self> {
        validate_policy(&policy)?;
        Ok(Self { policy })
    }

    pub fn policy(&self) -> &WeightingPolicy {
        &self.policy
    }

    /// Weight of a single video. Missing or negative durations fall into the
    /// shortest bucket.
    pub fn video_weight(&self, video: &VideoAsset) -> f64 {
        let seconds = match video.duration {
            Some(value) if value > 0.0 => value,
            Some(_) => 0.0,
            None => {
                warn!(target: "app::scoring", "video asset without duration, using shortest bucket");
                0.0
            }
        };

        self.policy
            .video_buckets
            .iter()
            .find(|bucket| bucket.max_seconds.map_or(true, |max| seconds <= max))
            .or_else(|| self.policy.video_buckets.last())
            .map(|bucket| bucket.weight)
            .unwrap_or(self.policy.static_weight)
    }

    pub fn weighted_count(&self, statics: u32, videos: &[VideoAsset]) -> f64 {
        let static_part = f64::from(statics) * self.policy.static_weight;
        let video_part: f64 = videos.iter().map(|video| self.video_weight(video)).sum();
        static_part + video_part
    }

    pub fn weighted_count_for_assets(&self, assets: &[AssetRecord]) -> f64 {
        let mut statics = 0u32;
        let mut videos = Vec::new();
        for asset in assets {
            match asset {
                AssetRecord::Static => statics += 1,
                AssetRecord::Video(video) => videos.push(*video),
            }
        }
        self.weighted_count(statics, &videos)
    }

    pub fn weighted_count_for_submission(&self, submission: &SubmissionRecord) -> f64 {
        self.weighted_count_for_assets(&submission.assets)
    }
}

/// Checks the shape every weighting table must have: buckets strictly
/// ascending by bound and ending in an open bucket, weights at least 1.0 and
/// non-decreasing, and every bucket outweighing a static asset.
pub fn validate_policy(policy: &WeightingPolicy) -> AppResult<()> {
    if !policy.static_weight.is_finite() || policy.static_weight <= 0.0 {
        return Err(AppError::invalid_weight_policy(
            "static weight must be a positive number",
        ));
    }

    let buckets = &policy.video_buckets;
    let last = buckets
        .last()
        .ok_or_else(|| AppError::invalid_weight_policy("at least one video bucket is required"))?;

    if last.max_seconds.is_some() {
        return Err(AppError::invalid_weight_policy(
            "the last video bucket must be open-ended",
        ));
    }

    for (index, bucket) in buckets.iter().enumerate() {
        if !bucket.weight.is_finite() || bucket.weight < 1.0 {
            return Err(AppError::invalid_weight_policy(format!(
                "bucket {index} has weight {} below 1.0",
                bucket.weight
            )));
        }

        if index + 1 < buckets.len() {
            match bucket.max_seconds {
                Some(max) if max.is_finite() && max >= 0.0 => {}
                _ => {
                    return Err(AppError::invalid_weight_policy(format!(
                        "bucket {index} needs a finite upper bound"
                    )))
                }
            }
        }

        if index > 0 {
            let previous = &buckets[index - 1];
            if let (Some(prev_max), Some(max)) = (previous.max_seconds, bucket.max_seconds) {
                if max <= prev_max {
                    return Err(AppError::invalid_weight_policy(format!(
                        "bucket bounds must be strictly ascending ({prev_max} then {max})"
                    )));
                }
            }
            if bucket.weight < previous.weight {
                return Err(AppError::invalid_weight_policy(format!(
                    "bucket weights must not decrease ({} then {})",
                    previous.weight, bucket.weight
                )));
            }
        }
    }

    // Weights never decrease, so the first bucket is the lightest video.
    if buckets[0].weight <= policy.static_weight {
        return Err(AppError::invalid_weight_policy(format!(
            "every video bucket must outweigh a static asset ({} <= {})",
            buckets[0].weight, policy.static_weight
        )));
    }

    Ok(())
}
