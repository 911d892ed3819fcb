//! Settings files: loading YAML/JSON, persisting updates, and the effect of a
//! custom weighting policy on scoring.

use chrono::NaiveDate;
use creative_leaderboard_lib::commands::settings::{settings_get, settings_update};
use creative_leaderboard_lib::commands::AppState;
use creative_leaderboard_lib::models::settings::{
    EngineSettings, EngineSettingsUpdate, MatrixLayoutConfig,
};
use creative_leaderboard_lib::models::submission::{AssetRecord, SubmissionRecord};
use creative_leaderboard_lib::services::settings_service::SettingsService;
use tempfile::tempdir;

const CUSTOM_POLICY_YAML: &str = r#"
weightingPolicy:
  staticWeight: 1.0
  videoBuckets:
    - maxSeconds: 30
      weight: 2.0
    - weight: 5.0
timezone: Europe/Berlin
"#;

#[test]
fn yaml_file_overrides_only_the_fields_it_names() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("engine.yaml");
    std::fs::write(&path, CUSTOM_POLICY_YAML).expect("write settings");

    let service = SettingsService::load(&path).expect("load settings");
    let settings = service.get().expect("settings");

    assert_eq!(settings.timezone, "Europe/Berlin");
    assert_eq!(settings.weighting_policy.video_buckets.len(), 2);
    assert_eq!(settings.weighting_policy.video_buckets[1].max_seconds, None);
    assert_eq!(settings.matrix_layout, MatrixLayoutConfig::default());
    assert_eq!(settings.rolling_week_days, 7);
}

#[test]
fn custom_policy_drives_weighted_counts() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("engine.yaml");
    std::fs::write(&path, CUSTOM_POLICY_YAML).expect("write settings");

    let state = AppState::new(
        SettingsService::load(&path).expect("load settings"),
        dir.path().join("reports"),
    );
    let engine = state.engine().expect("engine");
    let submission = SubmissionRecord::new(
        "ana",
        NaiveDate::from_ymd_opt(2025, 3, 10).expect("valid date"),
    )
    .with_assets(vec![
        AssetRecord::Static,
        AssetRecord::video(20.0),
        AssetRecord::video(45.0),
    ]);

    let weighted = engine
        .leaderboard
        .scorer()
        .weighted_count_for_submission(&submission);
    assert_eq!(weighted, 8.0);
}

#[test]
fn json_settings_are_accepted() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("engine.json");
    std::fs::write(
        &path,
        r#"{ "rollingWeekDays": 5, "rollingMonthDays": 20, "timezone": "America/New_York" }"#,
    )
    .expect("write settings");

    let settings = SettingsService::load(&path)
        .expect("load settings")
        .get()
        .expect("settings");
    assert_eq!(settings.rolling_week_days, 5);
    assert_eq!(settings.rolling_month_days, 20);
    assert_eq!(settings.timezone, "America/New_York");
}

#[test]
fn malformed_file_is_rejected() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("engine.json");
    std::fs::write(&path, "{ not json").expect("write settings");

    assert!(SettingsService::load(&path).is_err());
}

#[test]
fn settings_update_persists_to_the_loaded_file() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("config").join("engine.yaml");
    let state = AppState::new(
        SettingsService::load(&path).expect("load defaults"),
        dir.path().join("reports"),
    );

    let updated = settings_update(
        &state,
        EngineSettingsUpdate {
            timezone: Some("Asia/Tokyo".to_string()),
            rolling_month_days: Some(28),
            ..Default::default()
        },
    )
    .expect("update settings");
    assert_eq!(updated.timezone, "Asia/Tokyo");
    assert_eq!(settings_get(&state).expect("settings"), updated);

    let reloaded = SettingsService::load(&path)
        .expect("reload settings")
        .get()
        .expect("settings");
    assert_eq!(reloaded, updated);
    assert_eq!(reloaded.rolling_month_days, 28);
}

#[test]
fn unknown_timezone_in_file_fails_to_load() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("engine.yaml");
    std::fs::write(&path, "timezone: Mars/Olympus\n").expect("write settings");

    assert!(SettingsService::load(&path).is_err());
}

#[test]
fn init_prepares_logs_reports_and_settings() {
    let dir = tempdir().expect("temp dir");
    let settings_file = dir.path().join("engine.yaml");

    let state = creative_leaderboard_lib::init(dir.path(), &settings_file).expect("init");

    assert!(dir.path().join("logs").is_dir());
    assert!(state.reports_dir().is_dir());
    assert_eq!(
        state.settings().get().expect("settings"),
        EngineSettings::default()
    );
}
