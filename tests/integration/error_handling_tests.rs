// Error taxonomy and "no data" outcomes at the command boundary

use chrono::{DateTime, NaiveDate, Utc};
use creative_leaderboard_lib::commands::leaderboard::leaderboard_fetch;
use creative_leaderboard_lib::commands::matrix::matrix_layout_fetch;
use creative_leaderboard_lib::commands::review::review_suggest_score;
use creative_leaderboard_lib::commands::settings::{settings_get, settings_update};
use creative_leaderboard_lib::commands::{AppState, CommandError};
use creative_leaderboard_lib::error::AppError;
use creative_leaderboard_lib::models::leaderboard::{LeaderboardQueryParams, Trend};
use creative_leaderboard_lib::models::period::{Period, RangeKey};
use creative_leaderboard_lib::models::settings::{
    DurationBucket, EngineSettingsUpdate, MatrixLayoutConfig, WeightingPolicy,
};
use creative_leaderboard_lib::models::submission::{AssetRecord, SubmissionRecord};
use creative_leaderboard_lib::services::business_calendar::BusinessCalendar;
use creative_leaderboard_lib::services::leaderboard_service::LeaderboardService;
use creative_leaderboard_lib::services::productivity_scorer::ProductivityScorer;
use creative_leaderboard_lib::services::settings_service::SettingsService;
use tempfile::{tempdir, TempDir};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn now() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2025-03-10T12:00:00Z")
        .expect("timestamp")
        .with_timezone(&Utc)
}

fn setup_state() -> (AppState, TempDir) {
    let dir = tempdir().expect("temp dir");
    let state = AppState::new(SettingsService::default(), dir.path().join("reports"));
    (state, dir)
}

#[test]
fn test_inverted_period_is_an_error() {
    let service = LeaderboardService::new(BusinessCalendar::default(), ProductivityScorer::default());
    let inverted = Period {
        start: date(2025, 3, 10),
        end: date(2025, 3, 3),
    };
    let submissions = vec![SubmissionRecord::new("ana", date(2025, 3, 5)).with_rating(3, 3)];

    let err = service.rank(&inverted, &submissions).unwrap_err();
    assert!(matches!(err, AppError::InvalidPeriod { .. }));

    let command_error = CommandError::from(err);
    assert_eq!(command_error.code, "INVALID_PERIOD");
}

#[test]
fn test_empty_snapshot_is_a_zero_state_not_an_error() {
    let (state, _dir) = setup_state();

    for range in [
        RangeKey::Today,
        RangeKey::Yesterday,
        RangeKey::LastBusinessDay,
        RangeKey::Week,
        RangeKey::Month,
        RangeKey::Weekly,
        RangeKey::All,
    ] {
        let response = leaderboard_fetch(
            &state,
            Some(LeaderboardQueryParams {
                range,
                week_offset: 0,
            }),
            now(),
            &[],
        )
        .expect("empty snapshot");
        assert!(response.entries.is_empty(), "{range:?}");
        assert!(response.zero_state.is_empty);
        assert_eq!(response.summary.median_weighted_count, 0.0);
    }

    let layout = matrix_layout_fetch(&state, None, now(), &[]).expect("empty layout");
    assert!(layout.nodes.is_empty());
}

#[test]
fn test_unrated_only_participants_are_silently_excluded() {
    let (state, _dir) = setup_state();
    let submissions = vec![
        SubmissionRecord::new("ana", date(2025, 3, 10)).with_assets(vec![AssetRecord::Static]),
        SubmissionRecord::new("ben", date(2025, 3, 10)),
    ];

    let response = leaderboard_fetch(
        &state,
        Some(LeaderboardQueryParams {
            range: RangeKey::Today,
            week_offset: 0,
        }),
        now(),
        &submissions,
    )
    .expect("leaderboard");

    assert!(response.entries.is_empty());
    assert_eq!(
        response.zero_state.reason.as_deref(),
        Some("no rated submissions in this period")
    );
}

#[test]
fn test_out_of_scale_ratings_are_ignored() {
    let service = LeaderboardService::new(BusinessCalendar::default(), ProductivityScorer::default());
    let day = date(2025, 3, 10);
    let submissions = vec![
        SubmissionRecord::new("ana", day).with_rating(9, 0),
        SubmissionRecord::new("ben", day).with_rating(2, 2),
    ];

    let entries = service
        .rank(&Period::single_day(day), &submissions)
        .expect("rank");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].participant_id, "ben");
    assert_eq!(entries[0].trend, Trend::Same);
}

#[test]
fn test_zero_median_suggests_neutral_score() {
    let (state, _dir) = setup_state();
    let submission = SubmissionRecord::new("ana", date(2025, 3, 10)).with_rating(4, 4);

    let suggestion = review_suggest_score(
        &state,
        &submission,
        Some(LeaderboardQueryParams {
            range: RangeKey::Today,
            week_offset: 0,
        }),
        now(),
        &[submission.clone()],
    )
    .expect("suggestion");

    assert_eq!(suggestion.period_median, 0.0);
    assert_eq!(suggestion.ratio, None);
    assert_eq!(suggestion.suggested, 3);
}

#[test]
fn test_non_monotonic_policy_is_rejected_by_settings_update() {
    let (state, _dir) = setup_state();
    let err = settings_update(
        &state,
        EngineSettingsUpdate {
            weighting_policy: Some(WeightingPolicy {
                static_weight: 1.0,
                video_buckets: vec![
                    DurationBucket {
                        max_seconds: Some(15.0),
                        weight: 3.0,
                    },
                    DurationBucket {
                        max_seconds: None,
                        weight: 1.5,
                    },
                ],
            }),
            ..Default::default()
        },
    )
    .expect_err("policy rejected");
    assert_eq!(err.code, "INVALID_WEIGHT_POLICY");

    let current = settings_get(&state).expect("settings");
    assert_eq!(current.weighting_policy, WeightingPolicy::default());
}

#[test]
fn test_crowded_matrix_geometry_is_a_validation_error() {
    let (state, _dir) = setup_state();
    let err = settings_update(
        &state,
        EngineSettingsUpdate {
            matrix_layout: Some(MatrixLayoutConfig {
                size: 200.0,
                ..MatrixLayoutConfig::default()
            }),
            ..Default::default()
        },
    )
    .expect_err("layout rejected");
    assert_eq!(err.code, "VALIDATION_ERROR");
    assert!(err.details.is_some());
}

#[test]
fn test_oversized_rolling_month_is_rejected_before_any_fetch() {
    let (state, _dir) = setup_state();
    let err = settings_update(
        &state,
        EngineSettingsUpdate {
            rolling_month_days: Some(60_000_000),
            ..Default::default()
        },
    )
    .expect_err("rolling month rejected");
    assert_eq!(err.code, "VALIDATION_ERROR");

    let response = leaderboard_fetch(
        &state,
        Some(LeaderboardQueryParams {
            range: RangeKey::Month,
            week_offset: 0,
        }),
        now(),
        &[SubmissionRecord::new("ana", date(2025, 3, 10)).with_rating(4, 4)],
    )
    .expect("month leaderboard");
    assert_eq!(response.period.num_days(), 30);
}

#[test]
fn test_heavy_static_weight_is_rejected() {
    let (state, _dir) = setup_state();
    let err = settings_update(
        &state,
        EngineSettingsUpdate {
            weighting_policy: Some(WeightingPolicy {
                static_weight: 3.0,
                ..WeightingPolicy::default()
            }),
            ..Default::default()
        },
    )
    .expect_err("policy rejected");
    assert_eq!(err.code, "INVALID_WEIGHT_POLICY");
}
