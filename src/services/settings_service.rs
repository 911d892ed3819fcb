use std::path::{Path, PathBuf};
use std::sync::RwLock;

use tracing::{info, warn};

use crate::error::{AppError, AppResult};
use crate::models::settings::{EngineSettings, EngineSettingsUpdate};
use crate::services::business_calendar::{parse_timezone, BusinessCalendar};
use crate::services::matrix_layout_service::validate_layout_config;
use crate::services::productivity_scorer::validate_policy;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SettingsFormat {
    Yaml,
    Json,
}

impl SettingsFormat {
    fn from_path(path: &Path) -> AppResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => Ok(SettingsFormat::Yaml),
            Some("json") => Ok(SettingsFormat::Json),
            other => Err(AppError::validation(format!(
                "unsupported settings file extension: {}",
                other.unwrap_or("<none>")
            ))),
        }
    }
}

/// Holds the engine configuration. Every request takes an owned snapshot
/// through [`SettingsService::get`], so a concurrent update never changes the
/// parameters of a computation already in flight.
pub struct SettingsService {
    path: Option<PathBuf>,
    current: RwLock<EngineSettings>,
}

impl Default for SettingsService {
    fn default() -> Self {
        Self {
            path: None,
            current: RwLock::new(EngineSettings::default()),
        }
    }
}

impl SettingsService {
    pub fn new(settings: EngineSettings) -> AppResult<Self> {
        validate_settings(&settings)?;
        Ok(Self {
            path: None,
            current: RwLock::new(settings),
        })
    }

    /// Loads settings from a `.yaml`/`.yml`/`.json` file. A missing file
    /// yields defaults; they are written out on the first [`save`].
    ///
    /// [`save`]: SettingsService::save
    pub fn load(path: impl Into<PathBuf>) -> AppResult<Self> {
        let path = path.into();
        let format = SettingsFormat::from_path(&path)?;

        let settings = if path.exists() {
            let raw = std::fs::read_to_string(&path)?;
            let parsed: EngineSettings = match format {
                SettingsFormat::Yaml => serde_yaml::from_str(&raw)?,
                SettingsFormat::Json => serde_json::from_str(&raw)?,
            };
            info!(target: "app::settings", path = %path.display(), "engine settings loaded");
            parsed
        } else {
            warn!(target: "app::settings", path = %path.display(), "settings file not found, using defaults");
            EngineSettings::default()
        };

        validate_settings(&settings)?;

        Ok(Self {
            path: Some(path),
            current: RwLock::new(settings),
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn get(&self) -> AppResult<EngineSettings> {
        self.current
            .read()
            .map(|guard| guard.clone())
            .map_err(|_| AppError::other("settings lock poisoned"))
    }

    /// Applies a partial update. The merged settings are validated as a whole
    /// before anything is stored; the write lock is held for the whole merge.
    pub fn update(&self, input: EngineSettingsUpdate) -> AppResult<EngineSettings> {
        let mut guard = self
            .current
            .write()
            .map_err(|_| AppError::other("settings lock poisoned"))?;
        let merged = merge_update(&guard, input)?;
        validate_settings(&merged)?;
        *guard = merged.clone();
        drop(guard);

        info!(target: "app::settings", timezone = %merged.timezone, "engine settings updated");
        Ok(merged)
    }

    /// Writes the current settings back to the file they were loaded from.
    pub fn save(&self) -> AppResult<()> {
        let path = self
            .path
            .as_ref()
            .ok_or_else(|| AppError::validation("settings were not loaded from a file"))?;
        let settings = self.get()?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let serialized = match SettingsFormat::from_path(path)? {
            SettingsFormat::Yaml => serde_yaml::to_string(&settings)?,
            SettingsFormat::Json => serde_json::to_string_pretty(&settings)?,
        };
        std::fs::write(path, serialized)?;

        info!(target: "app::settings", path = %path.display(), "engine settings saved");
        Ok(())
    }
}

fn merge_update(
    current: &EngineSettings,
    input: EngineSettingsUpdate,
) -> AppResult<EngineSettings> {
    let mut merged = current.clone();

    if let Some(policy) = input.weighting_policy {
        merged.weighting_policy = policy;
    }
    if let Some(layout) = input.matrix_layout {
        merged.matrix_layout = layout;
    }
    if let Some(timezone) = input.timezone {
        let trimmed = timezone.trim();
        if trimmed.is_empty() {
            return Err(AppError::validation("timezone must not be empty"));
        }
        merged.timezone = trimmed.to_string();
    }
    if let Some(days) = input.rolling_week_days {
        merged.rolling_week_days = days;
    }
    if let Some(days) = input.rolling_month_days {
        merged.rolling_month_days = days;
    }

    Ok(merged)
}

pub fn validate_settings(settings: &EngineSettings) -> AppResult<()> {
    validate_policy(&settings.weighting_policy)?;
    validate_layout_config(&settings.matrix_layout)?;
    parse_timezone(&settings.timezone)?;
    BusinessCalendar::new(settings.rolling_week_days, settings.rolling_month_days)?;
    Ok(())
}
