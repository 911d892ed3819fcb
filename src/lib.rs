pub mod commands;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

use std::path::Path;

use tracing::info;

use crate::commands::AppState;
use crate::error::AppResult;
use crate::services::settings_service::SettingsService;

/// Wires logging, configuration and the report directory into an
/// [`AppState`] ready to serve commands.
pub fn init(data_dir: &Path, settings_file: &Path) -> AppResult<AppState> {
    crate::utils::logger::init_logging(&data_dir.join("logs"))?;

    let settings = SettingsService::load(settings_file)?;
    let reports_dir = data_dir.join("reports");
    std::fs::create_dir_all(&reports_dir)?;

    info!(
        target: "app::settings",
        data_dir = %data_dir.display(),
        settings_file = %settings_file.display(),
        "leaderboard engine initialised"
    );

    Ok(AppState::new(settings, reports_dir))
}
