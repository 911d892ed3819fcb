use crate::models::settings::{EngineSettings, EngineSettingsUpdate};

use super::{AppState, CommandResult};

pub fn settings_get(state: &AppState) -> CommandResult<EngineSettings> {
    Ok(state.settings().get()?)
}

pub fn settings_update(
    state: &AppState,
    input: EngineSettingsUpdate,
) -> CommandResult<EngineSettings> {
    let settings = state.settings();
    let updated = settings.update(input)?;
    if settings.path().is_some() {
        settings.save()?;
    }
    Ok(updated)
}
