use std::collections::{BTreeMap, HashMap};
use std::f64::consts::PI;

use serde_json::json;
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::models::leaderboard::LeaderboardEntry;
use crate::models::matrix::{GridCell, MatrixLayoutResponse, PlacedNode, PlotArea};
use crate::models::settings::MatrixLayoutConfig;

const SCALE_MIN: f64 = 1.0;
const SCALE_MAX: f64 = 5.0;
const GRID_STEPS: f64 = SCALE_MAX - SCALE_MIN;

/// Places leaderboard entries on the productivity/quality chart. Entries that
/// round to the same grid cell are fanned out on a circle around the cell
/// center, clockwise from straight up, ordered by participant id.
pub struct MatrixLayoutService {
    config: MatrixLayoutConfig,
}

impl Default for MatrixLayoutService {
    fn default() -> Self {
        Self {
            config: MatrixLayoutConfig::default(),
        }
    }
}

impl MatrixLayoutService {
    pub fn new(config: MatrixLayoutConfig) -> AppResult<Self> {
        validate_layout_config(&config)?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &MatrixLayoutConfig {
        &self.config
    }

    pub fn plot_area(&self) -> PlotArea {
        plot_area(&self.config)
    }

    pub fn cell_center(&self, cell: GridCell) -> (f64, f64) {
        let area = self.plot_area();
        let x = area.left + (f64::from(cell.productivity) - SCALE_MIN) / GRID_STEPS * area.width();
        let y = area.bottom - (f64::from(cell.quality) - SCALE_MIN) / GRID_STEPS * area.height();
        (x, y)
    }

    pub fn spread_radius(&self, group_size: usize) -> f64 {
        spread_radius(&self.config, group_size)
    }

    pub fn layout(&self, entries: &[LeaderboardEntry]) -> AppResult<Vec<PlacedNode>> {
        let mut groups: BTreeMap<GridCell, Vec<&str>> = BTreeMap::new();
        let mut cells: Vec<GridCell> = Vec::with_capacity(entries.len());

        for entry in entries {
            let cell = grid_cell(entry.avg_productivity, entry.avg_quality).map_err(|_| {
                AppError::validation_with_details(
                    "matrix scores must be finite",
                    json!({
                        "participantId": entry.participant_id,
                        "avgProductivity": entry.avg_productivity,
                        "avgQuality": entry.avg_quality,
                    }),
                )
            })?;
            groups.entry(cell).or_default().push(entry.participant_id.as_str());
            cells.push(cell);
        }

        let mut positions: HashMap<&str, (f64, f64)> = HashMap::with_capacity(entries.len());
        for (cell, members) in groups.iter_mut() {
            members.sort_unstable();
            let (cx, cy) = self.cell_center(*cell);

            if members.len() == 1 {
                positions.insert(members[0], (cx, cy));
                continue;
            }

            let radius = self.spread_radius(members.len());
            let step = 2.0 * PI / members.len() as f64;
            for (index, participant) in members.iter().copied().enumerate() {
                let angle = step * index as f64;
                let position = (cx + radius * angle.sin(), cy - radius * angle.cos());
                if positions.insert(participant, position).is_some() {
                    return Err(AppError::validation_with_details(
                        "participant appears more than once in the matrix input",
                        json!({ "participantId": participant }),
                    ));
                }
            }
        }

        if positions.len() != entries.len() {
            return Err(AppError::validation(
                "participant appears more than once in the matrix input",
            ));
        }

        let nodes = entries
            .iter()
            .zip(cells)
            .filter_map(|(entry, cell)| {
                positions
                    .get(entry.participant_id.as_str())
                    .map(|(x, y)| PlacedNode {
                        participant_id: entry.participant_id.clone(),
                        x: *x,
                        y: *y,
                        cell,
                    })
            })
            .collect::<Vec<_>>();

        debug!(
            target: "app::matrix",
            nodes = nodes.len(),
            cells = groups.len(),
            "matrix layout computed"
        );

        Ok(nodes)
    }

    pub fn layout_response(&self, entries: &[LeaderboardEntry]) -> AppResult<MatrixLayoutResponse> {
        Ok(MatrixLayoutResponse {
            size: self.config.size,
            plot_area: self.plot_area(),
            node_radius: self.config.node_radius,
            nodes: self.layout(entries)?,
        })
    }
}

/// Rounds to the nearest whole score and clamps each axis to `1..=5`.
pub fn grid_cell(productivity: f64, quality: f64) -> AppResult<GridCell> {
    Ok(GridCell {
        productivity: snap_axis(productivity)?,
        quality: snap_axis(quality)?,
    })
}

fn snap_axis(value: f64) -> AppResult<u8> {
    if !value.is_finite() {
        return Err(AppError::validation("matrix scores must be finite"));
    }
    Ok(value.round().clamp(SCALE_MIN, SCALE_MAX) as u8)
}

fn plot_area(config: &MatrixLayoutConfig) -> PlotArea {
    PlotArea {
        left: config.padding,
        top: config.padding,
        right: config.size - config.padding,
        bottom: config.size - config.padding,
    }
}

fn spread_radius(config: &MatrixLayoutConfig, group_size: usize) -> f64 {
    config
        .spread
        .iter()
        .find(|tier| group_size <= tier.max_members)
        .map(|tier| tier.radius)
        .unwrap_or(config.spread_radius_max)
}

/// Geometry must keep neighbouring cells apart: two nodes fanned out from
/// adjacent cell centers still end up further apart than the largest spread
/// radius and do not touch.
pub fn validate_layout_config(config: &MatrixLayoutConfig) -> AppResult<()> {
    let finite = [config.size, config.padding, config.node_radius, config.spread_radius_max]
        .iter()
        .all(|value| value.is_finite());
    if !finite || config.size <= 0.0 || config.padding < 0.0 || config.node_radius < 0.0 {
        return Err(AppError::validation(
            "matrix size, padding and node radius must be non-negative numbers",
        ));
    }

    let area = plot_area(config);
    if area.width() <= 0.0 {
        return Err(AppError::validation_with_details(
            "matrix padding leaves no plot area",
            json!({"size": config.size, "padding": config.padding}),
        ));
    }

    let mut previous: Option<(usize, f64)> = None;
    for tier in &config.spread {
        if !tier.radius.is_finite() || tier.radius <= 0.0 || tier.max_members < 2 {
            return Err(AppError::validation(
                "spread tiers need a positive radius and at least two members",
            ));
        }
        if let Some((members, radius)) = previous {
            if tier.max_members <= members || tier.radius < radius {
                return Err(AppError::validation(
                    "spread tiers must grow in members and never shrink in radius",
                ));
            }
        }
        previous = Some((tier.max_members, tier.radius));
    }

    let largest = config
        .spread
        .iter()
        .map(|tier| tier.radius)
        .fold(config.spread_radius_max, f64::max);
    if config.spread_radius_max <= 0.0 || largest > config.spread_radius_max {
        return Err(AppError::validation(
            "spreadRadiusMax must be positive and cover every tier",
        ));
    }

    let spacing = area.width() / GRID_STEPS;
    let gap = spacing - 2.0 * config.spread_radius_max;
    if gap <= config.spread_radius_max || gap <= 2.0 * config.node_radius {
        return Err(AppError::validation_with_details(
            "grid spacing too small for the configured spread radius",
            json!({"spacing": spacing, "spreadRadiusMax": config.spread_radius_max}),
        ));
    }

    Ok(())
}
