use serde::{Deserialize, Serialize};

pub const DEFAULT_TIMEZONE: &str = "UTC";
pub const DEFAULT_ROLLING_WEEK_DAYS: u32 = 7;
pub const DEFAULT_ROLLING_MONTH_DAYS: u32 = 30;

/// One duration bucket of the video weighting table. `max_seconds = None`
/// marks the open-ended last bucket.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DurationBucket {
    #[serde(default)]
    pub max_seconds: Option<f64>,
    pub weight: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WeightingPolicy {
    #[serde(default = "default_static_weight")]
    pub static_weight: f64,
    pub video_buckets: Vec<DurationBucket>,
}

fn default_static_weight() -> f64 {
    1.0
}

impl Default for WeightingPolicy {
    /// Videos up to 15s weigh 1.5, up to 60s weigh 2.5, longer ones 4.0.
    fn default() -> Self {
        Self {
            static_weight: 1.0,
            video_buckets: vec![
                DurationBucket {
                    max_seconds: Some(15.0),
                    weight: 1.5,
                },
                DurationBucket {
                    max_seconds: Some(60.0),
                    weight: 2.5,
                },
                DurationBucket {
                    max_seconds: None,
                    weight: 4.0,
                },
            ],
        }
    }
}

/// Spread radius used for groups of at most `max_members` nodes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SpreadTier {
    pub max_members: usize,
    pub radius: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MatrixLayoutConfig {
    pub size: f64,
    pub padding: f64,
    pub node_radius: f64,
    pub spread: Vec<SpreadTier>,
    /// Radius for groups larger than every tier.
    pub spread_radius_max: f64,
}

impl Default for MatrixLayoutConfig {
    fn default() -> Self {
        Self {
            size: 700.0,
            padding: 50.0,
            node_radius: 14.0,
            spread: vec![
                SpreadTier {
                    max_members: 3,
                    radius: 28.0,
                },
                SpreadTier {
                    max_members: 6,
                    radius: 36.0,
                },
            ],
            spread_radius_max: 44.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EngineSettings {
    #[serde(default)]
    pub weighting_policy: WeightingPolicy,
    #[serde(default)]
    pub matrix_layout: MatrixLayoutConfig,
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default = "default_rolling_week_days")]
    pub rolling_week_days: u32,
    #[serde(default = "default_rolling_month_days")]
    pub rolling_month_days: u32,
}

fn default_timezone() -> String {
    DEFAULT_TIMEZONE.to_string()
}

fn default_rolling_week_days() -> u32 {
    DEFAULT_ROLLING_WEEK_DAYS
}

fn default_rolling_month_days() -> u32 {
    DEFAULT_ROLLING_MONTH_DAYS
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            weighting_policy: WeightingPolicy::default(),
            matrix_layout: MatrixLayoutConfig::default(),
            timezone: default_timezone(),
            rolling_week_days: DEFAULT_ROLLING_WEEK_DAYS,
            rolling_month_days: DEFAULT_ROLLING_MONTH_DAYS,
        }
    }
}

/// Partial update; `None` leaves the current value untouched.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineSettingsUpdate {
    #[serde(default)]
    pub weighting_policy: Option<WeightingPolicy>,
    #[serde(default)]
    pub matrix_layout: Option<MatrixLayoutConfig>,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub rolling_week_days: Option<u32>,
    #[serde(default)]
    pub rolling_month_days: Option<u32>,
}
