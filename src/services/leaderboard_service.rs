use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use tracing::{debug, info, warn};

use crate::error::AppResult;
use crate::models::leaderboard::{
    LeaderboardEntry, LeaderboardMeta, LeaderboardResponse, LeaderboardSummary, ReportExportResult,
    ReportFormat, Trend, WeeklyCycleInfo, ZeroStateMeta,
};
use crate::models::period::{Period, RangeKey};
use crate::models::submission::SubmissionRecord;
use crate::services::business_calendar::{
    clamp, last_business_day, weekday_index_in_cycle, weekly_cycle_end, weekly_cycle_start,
    BusinessCalendar,
};
use crate::services::productivity_scorer::ProductivityScorer;
use crate::utils::stats::{median, round_to};

const REPORT_PREFIX: &str = "leaderboard-report";
const LAST_CYCLE_DAY_INDEX: u8 = 5;

#[derive(Default)]
struct ParticipantTally {
    submissions: u32,
    rated: u32,
    productivity_sum: f64,
    quality_sum: f64,
    weighted_count: f64,
}

/// Ranked standings for one Friday..Thursday cycle.
#[derive(Debug, Clone)]
pub struct WeeklyStandings {
    pub info: WeeklyCycleInfo,
    pub period: Period,
    pub previous_period: Period,
    pub entries: Vec<LeaderboardEntry>,
}

pub struct LeaderboardService {
    calendar: BusinessCalendar,
    scorer: ProductivityScorer,
}

impl LeaderboardService {
    pub fn new(calendar: BusinessCalendar, scorer: ProductivityScorer) -> Self {
        Self { calendar, scorer }
    }

    pub fn calendar(&self) -> &BusinessCalendar {
        &self.calendar
    }

    pub fn scorer(&self) -> &ProductivityScorer {
        &self.scorer
    }

    /// Ranks every participant with at least one rated submission inside
    /// `period`. Order is `avg_total` desc, then `submission_count` desc,
    /// then `participant_id` asc; ranks are 1..=N without gaps.
    pub fn rank(
        &self,
        period: &Period,
        submissions: &[SubmissionRecord],
    ) -> AppResult<Vec<LeaderboardEntry>> {
        period.ensure_valid()?;
        if submissions.is_empty() {
            return Ok(Vec::new());
        }

        let mut tallies: BTreeMap<&str, ParticipantTally> = BTreeMap::new();
        let mut seen_days: HashSet<(&str, NaiveDate)> = HashSet::new();

        for submission in submissions.iter().filter(|s| period.contains(s.date)) {
            let participant = submission.participant_id.as_str();
            if !seen_days.insert((participant, submission.date)) {
                warn!(
                    target: "app::leaderboard",
                    participant_id = participant,
                    date = %submission.date,
                    "more than one submission for the same day"
                );
            }

            let tally = tallies.entry(participant).or_default();
            tally.submissions += 1;
            tally.weighted_count += self.scorer.weighted_count_for_submission(submission);

            match submission.rating {
                Some(rating) if rating.is_in_scale() => {
                    tally.rated += 1;
                    tally.productivity_sum += f64::from(rating.productivity);
                    tally.quality_sum += f64::from(rating.quality);
                }
                Some(rating) => {
                    warn!(
                        target: "app::leaderboard",
                        participant_id = participant,
                        date = %submission.date,
                        productivity = rating.productivity,
                        quality = rating.quality,
                        "rating outside the 1..=5 scale ignored"
                    );
                }
                None => {}
            }
        }

        let mut entries: Vec<LeaderboardEntry> = tallies
            .into_iter()
            .filter(|(_, tally)| tally.rated > 0)
            .map(|(participant, tally)| {
                let rated = f64::from(tally.rated);
                LeaderboardEntry {
                    participant_id: participant.to_string(),
                    rank: 0,
                    avg_productivity: tally.productivity_sum / rated,
                    avg_quality: tally.quality_sum / rated,
                    // Same value as avg_productivity + avg_quality, but a
                    // single division keeps equal totals bit-identical.
                    avg_total: (tally.productivity_sum + tally.quality_sum) / rated,
                    submission_count: tally.submissions,
                    rated_count: tally.rated,
                    weighted_count: tally.weighted_count,
                    trend: Trend::Same,
                    rank_change: None,
                    cumulative_total: None,
                    last_period_added: None,
                }
            })
            .collect();

        sort_entries(&mut entries);
        for (index, entry) in entries.iter_mut().enumerate() {
            entry.rank = index as u32 + 1;
        }

        debug!(
            target: "app::leaderboard",
            start = %period.start,
            end = %period.end,
            ranked = entries.len(),
            "ranked period"
        );

        Ok(entries)
    }

    /// Ranks `current` and fills `trend` from the standings of `previous`.
    pub fn rank_with_previous(
        &self,
        current: &Period,
        previous: Option<&Period>,
        submissions: &[SubmissionRecord],
    ) -> AppResult<Vec<LeaderboardEntry>> {
        let mut entries = self.rank(current, submissions)?;
        if let Some(previous) = previous {
            let previous_entries = self.rank(previous, submissions)?;
            apply_trends(&mut entries, &previous_entries);
        }
        Ok(entries)
    }

    /// Weekly view: cycle-to-date ranking with trend and rank change against
    /// the preceding cycle, the running sum of daily totals, and the total
    /// added on the most recent business day.
    pub fn weekly(
        &self,
        today: NaiveDate,
        week_offset: i32,
        submissions: &[SubmissionRecord],
    ) -> AppResult<WeeklyStandings> {
        let start = weekly_cycle_start(today, week_offset)?;
        let cycle = Period::new(start, weekly_cycle_end(start))?;
        let to_date = cycle.clamped_to(today);

        let previous_start = weekly_cycle_start(today, week_offset.saturating_sub(1))?;
        let previous_period = Period::new(previous_start, weekly_cycle_end(previous_start))?;

        let mut entries = self.rank(&to_date, submissions)?;
        let previous_entries = self.rank(&previous_period, submissions)?;
        let previous_ranks: HashMap<&str, u32> = previous_entries
            .iter()
            .map(|entry| (entry.participant_id.as_str(), entry.rank))
            .collect();

        let latest_day = if week_offset == 0 {
            last_business_day(today)
        } else {
            cycle.end
        };
        let added_today: HashMap<String, f64> = if to_date.contains(latest_day) {
            self.rank(&Period::single_day(latest_day), submissions)?
                .into_iter()
                .map(|entry| (entry.participant_id, entry.avg_total))
                .collect()
        } else {
            HashMap::new()
        };

        let cumulative = cumulative_totals(&to_date, submissions);

        for entry in entries.iter_mut() {
            let previous_rank = previous_ranks.get(entry.participant_id.as_str()).copied();
            entry.trend = trend_from_ranks(entry.rank, previous_rank);
            entry.rank_change = previous_rank.map(|rank| i64::from(rank) - i64::from(entry.rank));
            entry.cumulative_total = cumulative.get(entry.participant_id.as_str()).copied();
            entry.last_period_added = added_today.get(&entry.participant_id).copied();
        }

        let day_index = if week_offset == 0 {
            weekday_index_in_cycle(today)
        } else {
            LAST_CYCLE_DAY_INDEX
        };

        Ok(WeeklyStandings {
            info: WeeklyCycleInfo {
                cycle_start: cycle.start,
                cycle_end: cycle.end,
                cycle_end_clamped: clamp(cycle.end, today),
                day_index,
                week_offset,
            },
            period: to_date,
            previous_period,
            entries,
        })
    }

    /// Full response for one symbolic range, including the comparison window,
    /// summary counts and the zero-state block.
    pub fn build_response(
        &self,
        range: RangeKey,
        today: NaiveDate,
        week_offset: i32,
        submissions: &[SubmissionRecord],
        generated_at: DateTime<Utc>,
    ) -> AppResult<LeaderboardResponse> {
        let (period, previous_period, weekly, entries) = match range {
            RangeKey::Weekly => {
                let standings = self.weekly(today, week_offset, submissions)?;
                (
                    standings.period,
                    Some(standings.previous_period),
                    Some(standings.info),
                    standings.entries,
                )
            }
            RangeKey::All => {
                let earliest = submissions
                    .iter()
                    .map(|submission| submission.date)
                    .filter(|date| *date <= today)
                    .min()
                    .unwrap_or(today);
                let period = Period::new(earliest, today)?;
                let entries = self.rank(&period, submissions)?;
                (period, None, None, entries)
            }
            _ => {
                let period = self.calendar.resolve_window(range, today, week_offset)?;
                let previous = self.calendar.previous_window(range, today, week_offset)?;
                let entries = self.rank_with_previous(&period, previous.as_ref(), submissions)?;
                (period, previous, None, entries)
            }
        };

        let in_period: Vec<&SubmissionRecord> = submissions
            .iter()
            .filter(|submission| period.contains(submission.date))
            .collect();
        let weighted: Vec<f64> = in_period
            .iter()
            .map(|submission| self.scorer.weighted_count_for_submission(submission))
            .collect();
        let rated_submission_count = in_period
            .iter()
            .filter(|submission| submission.rating.map_or(false, |r| r.is_in_scale()))
            .count();

        let zero_state = if entries.is_empty() {
            let reason = if in_period.is_empty() {
                "no submissions in this period"
            } else {
                "no rated submissions in this period"
            };
            ZeroStateMeta {
                is_empty: true,
                reason: Some(reason.to_string()),
            }
        } else {
            ZeroStateMeta::populated()
        };

        Ok(LeaderboardResponse {
            range,
            period,
            previous_period,
            weekly,
            summary: LeaderboardSummary {
                participant_count: entries.len(),
                submission_count: in_period.len(),
                rated_submission_count,
                median_weighted_count: median(&weighted).unwrap_or(0.0),
            },
            entries,
            zero_state,
            meta: LeaderboardMeta {
                reference_date: today,
                generated_at: generated_at.to_rfc3339(),
            },
        })
    }

    pub fn export_report(
        &self,
        response: &LeaderboardResponse,
        format: ReportFormat,
        reports_dir: &Path,
        generated_at: DateTime<Utc>,
    ) -> AppResult<ReportExportResult> {
        std::fs::create_dir_all(reports_dir)?;

        let timestamp = generated_at.format("%Y%m%dT%H%M%SZ");
        let filename = format!("{REPORT_PREFIX}-{}.{}", timestamp, format.file_extension());
        let path = reports_dir.join(filename);

        match format {
            ReportFormat::Markdown => {
                std::fs::write(&path, render_markdown_report(response))?;
            }
            ReportFormat::Json => {
                std::fs::write(&path, serde_json::to_string_pretty(response)?)?;
            }
        }

        info!(target: "app::leaderboard", path = %path.display(), "leaderboard report exported");

        Ok(ReportExportResult {
            file_path: path.to_string_lossy().to_string(),
            format,
            generated_at: generated_at.to_rfc3339(),
        })
    }
}

fn sort_entries(entries: &mut [LeaderboardEntry]) {
    entries.sort_by(|a, b| {
        b.avg_total
            .total_cmp(&a.avg_total)
            .then_with(|| b.submission_count.cmp(&a.submission_count))
            .then_with(|| a.participant_id.cmp(&b.participant_id))
    });
}

fn trend_from_ranks(current: u32, previous: Option<u32>) -> Trend {
    match previous {
        Some(previous) if current < previous => Trend::Up,
        Some(previous) if current > previous => Trend::Down,
        _ => Trend::Same,
    }
}

/// `Up` when the rank number got smaller, `Down` when it grew, `Same`
/// otherwise or when there is nothing to compare against.
pub fn trend(current: &LeaderboardEntry, previous: Option<&LeaderboardEntry>) -> Trend {
    trend_from_ranks(current.rank, previous.map(|entry| entry.rank))
}

pub fn apply_trends(current: &mut [LeaderboardEntry], previous: &[LeaderboardEntry]) {
    let by_participant: HashMap<&str, &LeaderboardEntry> = previous
        .iter()
        .map(|entry| (entry.participant_id.as_str(), entry))
        .collect();

    for entry in current.iter_mut() {
        let prior = by_participant.get(entry.participant_id.as_str()).copied();
        entry.trend = trend(entry, prior);
    }
}

fn cumulative_totals<'a>(
    period: &Period,
    submissions: &'a [SubmissionRecord],
) -> HashMap<&'a str, f64> {
    let mut totals: HashMap<&str, f64> = HashMap::new();
    for submission in submissions.iter().filter(|s| period.contains(s.date)) {
        if let Some(rating) = submission.rating.filter(|r| r.is_in_scale()) {
            *totals.entry(submission.participant_id.as_str()).or_insert(0.0) += rating.total();
        }
    }
    totals
}

pub fn render_markdown_report(response: &LeaderboardResponse) -> String {
    let mut content = String::new();
    content.push_str("# Leaderboard Report\n\n");
    content.push_str(&format!("Generated at: {}\n\n", response.meta.generated_at));
    content.push_str(&format!(
        "Range: {} ({} ~ {})\n\n",
        response.range.as_str(),
        response.period.start,
        response.period.end
    ));

    if let Some(weekly) = &response.weekly {
        content.push_str(&format!(
            "Cycle: {} ~ {} (business day {} of 5)\n\n",
            weekly.cycle_start, weekly.cycle_end, weekly.day_index
        ));
    }

    content.push_str("## Summary\n");
    content.push_str(&format!(
        "- Ranked participants: {}\n- Submissions: {}\n- Rated submissions: {}\n- Median weighted output: {:.2}\n\n",
        response.summary.participant_count,
        response.summary.submission_count,
        response.summary.rated_submission_count,
        response.summary.median_weighted_count
    ));

    content.push_str("## Standings\n");
    if response.entries.is_empty() {
        let reason = response
            .zero_state
            .reason
            .as_deref()
            .unwrap_or("not enough data");
        content.push_str(&format!("Not enough data: {reason}.\n"));
        return content;
    }

    content.push_str("| Rank | Participant | Productivity | Quality | Total | Submissions | Trend | Change |\n");
    content.push_str("|---|---|---|---|---|---|---|---|\n");
    for entry in &response.entries {
        let change = match entry.rank_change {
            Some(delta) if delta > 0 => format!("+{delta}"),
            Some(delta) => delta.to_string(),
            None => "-".to_string(),
        };
        content.push_str(&format!(
            "| {} | {} | {:.2} | {:.2} | {:.2} | {} | {} | {} |\n",
            entry.rank,
            entry.participant_id,
            round_to(entry.avg_productivity, 2),
            round_to(entry.avg_quality, 2),
            round_to(entry.avg_total, 2),
            entry.submission_count,
            entry.trend.as_str(),
            change
        ));
    }

    content
}
