//! Matrix layout properties: collision avoidance inside a grid cell,
//! separation between cells, determinism, and custom geometry.

use chrono::NaiveDate;
use creative_leaderboard_lib::models::leaderboard::LeaderboardEntry;
use creative_leaderboard_lib::models::matrix::PlacedNode;
use creative_leaderboard_lib::models::period::Period;
use creative_leaderboard_lib::models::settings::{MatrixLayoutConfig, SpreadTier};
use creative_leaderboard_lib::models::submission::SubmissionRecord;
use creative_leaderboard_lib::services::business_calendar::BusinessCalendar;
use creative_leaderboard_lib::services::leaderboard_service::LeaderboardService;
use creative_leaderboard_lib::services::matrix_layout_service::MatrixLayoutService;
use creative_leaderboard_lib::services::productivity_scorer::ProductivityScorer;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn ranked(submissions: &[SubmissionRecord]) -> Vec<LeaderboardEntry> {
    let service = LeaderboardService::new(BusinessCalendar::default(), ProductivityScorer::default());
    let period = Period::new(date(2025, 3, 3), date(2025, 3, 9)).expect("period");
    service.rank(&period, submissions).expect("rank")
}

fn distance(a: &PlacedNode, b: &PlacedNode) -> f64 {
    ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
}

#[test]
fn same_cell_different_scores_get_distinct_points() {
    // ana averages (4, 4) and ben (4, 3.5); both round into cell (4, 4).
    let entries = ranked(&[
        SubmissionRecord::new("ana", date(2025, 3, 3)).with_rating(4, 4),
        SubmissionRecord::new("ben", date(2025, 3, 3)).with_rating(4, 4),
        SubmissionRecord::new("ben", date(2025, 3, 4)).with_rating(4, 3),
    ]);
    assert_eq!(entries.len(), 2);

    let nodes = MatrixLayoutService::default().layout(&entries).expect("layout");
    assert_eq!(nodes[0].cell, nodes[1].cell);
    assert!(distance(&nodes[0], &nodes[1]) > 1.0);
}

#[test]
fn different_cells_are_further_apart_than_max_spread() {
    let entries = ranked(&[
        SubmissionRecord::new("ana", date(2025, 3, 3)).with_rating(3, 3),
        SubmissionRecord::new("ben", date(2025, 3, 3)).with_rating(4, 3),
    ]);
    let service = MatrixLayoutService::default();
    let nodes = service.layout(&entries).expect("layout");
    assert_ne!(nodes[0].cell, nodes[1].cell);
    assert!(distance(&nodes[0], &nodes[1]) > service.config().spread_radius_max);
}

#[test]
fn every_member_of_a_crowded_cell_is_unique() {
    let submissions: Vec<SubmissionRecord> = (0..9)
        .map(|i| SubmissionRecord::new(format!("p{i}"), date(2025, 3, 5)).with_rating(2, 4))
        .collect();
    let entries = ranked(&submissions);
    let service = MatrixLayoutService::default();
    let nodes = service.layout(&entries).expect("layout");
    let (cx, cy) = service.cell_center(nodes[0].cell);

    for (i, a) in nodes.iter().enumerate() {
        let radius = ((a.x - cx).powi(2) + (a.y - cy).powi(2)).sqrt();
        assert!((radius - 44.0).abs() < 1e-9);
        for b in nodes.iter().skip(i + 1) {
            assert!(distance(a, b) > 1.0, "{} and {} overlap", a.participant_id, b.participant_id);
        }
    }
}

#[test]
fn custom_geometry_scales_cell_centers() {
    let config = MatrixLayoutConfig {
        size: 1000.0,
        padding: 100.0,
        node_radius: 10.0,
        spread: vec![SpreadTier {
            max_members: 4,
            radius: 30.0,
        }],
        spread_radius_max: 40.0,
    };
    let service = MatrixLayoutService::new(config).expect("layout config");
    let entries = ranked(&[SubmissionRecord::new("ana", date(2025, 3, 3)).with_rating(3, 5)]);

    let response = service.layout_response(&entries).expect("layout response");
    assert_eq!(response.size, 1000.0);
    assert_eq!(response.plot_area.left, 100.0);
    assert_eq!(response.nodes[0].x, 500.0);
    assert_eq!(response.nodes[0].y, 100.0);
}

#[test]
fn empty_ranking_yields_empty_layout() {
    let nodes = MatrixLayoutService::default().layout(&[]).expect("layout");
    assert!(nodes.is_empty());
}
