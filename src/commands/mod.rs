pub mod leaderboard;
pub mod matrix;
pub mod review;
pub mod settings;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use serde_json::Value as JsonValue;
use tracing::{error, warn};

use crate::error::{AppError, AppResult};
use crate::models::settings::EngineSettings;
use crate::services::business_calendar::{parse_timezone, reference_date, BusinessCalendar};
use crate::services::leaderboard_service::LeaderboardService;
use crate::services::matrix_layout_service::MatrixLayoutService;
use crate::services::productivity_scorer::ProductivityScorer;
use crate::services::settings_service::SettingsService;
use crate::services::suggested_score_service::SuggestedScoreService;

#[derive(Clone)]
pub struct AppState {
    settings_service: Arc<SettingsService>,
    reports_dir: PathBuf,
}

impl AppState {
    pub fn new(settings_service: SettingsService, reports_dir: impl Into<PathBuf>) -> Self {
        Self {
            settings_service: Arc::new(settings_service),
            reports_dir: reports_dir.into(),
        }
    }

    pub fn settings(&self) -> Arc<SettingsService> {
        Arc::clone(&self.settings_service)
    }

    pub fn reports_dir(&self) -> &Path {
        &self.reports_dir
    }

    /// Builds the services for one request from a settings snapshot.
    pub fn engine(&self) -> AppResult<EngineContext> {
        EngineContext::from_settings(self.settings_service.get()?)
    }
}

/// Everything a single request computes with, frozen at request start.
pub struct EngineContext {
    pub settings: EngineSettings,
    pub timezone: Tz,
    pub leaderboard: LeaderboardService,
    pub advisor: SuggestedScoreService,
    pub matrix: MatrixLayoutService,
}

impl EngineContext {
    pub fn from_settings(settings: EngineSettings) -> AppResult<Self> {
        let timezone = parse_timezone(&settings.timezone)?;
        let calendar =
            BusinessCalendar::new(settings.rolling_week_days, settings.rolling_month_days)?;
        let scorer = ProductivityScorer::new(settings.weighting_policy.clone())?;
        let matrix = MatrixLayoutService::new(settings.matrix_layout.clone())?;

        Ok(Self {
            leaderboard: LeaderboardService::new(calendar, scorer.clone()),
            advisor: SuggestedScoreService::new(scorer),
            matrix,
            timezone,
            settings,
        })
    }

    pub fn today(&self, now: DateTime<Utc>) -> NaiveDate {
        reference_date(now, self.timezone)
    }
}

pub type CommandResult<T> = Result<T, CommandError>;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandError {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<JsonValue>,
}

impl CommandError {
    pub fn new(
        code: impl Into<String>,
        message: impl Into<String>,
        details: Option<JsonValue>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details,
        }
    }
}

impl From<AppError> for CommandError {
    fn from(error: AppError) -> Self {
        let code = error.code();
        match error {
            AppError::InvalidPeriod { message } => CommandError::new(code, message, None),
            AppError::InvalidWeightPolicy { message } => {
                warn!(target: "app::command", %message, "weighting policy rejected in command");
                CommandError::new(code, message, None)
            }
            AppError::Validation {
                message, details, ..
            } => CommandError::new(code, message, details),
            AppError::Serialization(error) => {
                error!(target: "app::command", error = %error, "serialization error in command");
                CommandError::new(code, "serialization failed", None)
            }
            AppError::Yaml(error) => {
                error!(target: "app::command", error = %error, "yaml error in command");
                CommandError::new(code, "settings file could not be parsed", None)
            }
            AppError::Io(error) => {
                error!(target: "app::command", error = %error, "io error in command");
                CommandError::new(code, "file system access failed", None)
            }
            AppError::Other(message) => {
                error!(target: "app::command", %message, "unexpected error in command");
                CommandError::new(code, message, None)
            }
        }
    }
}
