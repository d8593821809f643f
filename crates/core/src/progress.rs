//! Planned-vs-actual progress and delay-risk estimation.
//!
//! For every project with at least one demand, compares the fraction of the
//! planned time window elapsed ("should be done by now") against the
//! self-reported completion percentage, projects a finish date from the
//! observed velocity, and classifies the delay risk. Pure functions over
//! the loaded collections and a reference date; no I/O, no clock access.

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::dates::parse_date;
use crate::model::{Demand, Project, Status};

// ---------------------------------------------------------------------------
// Heuristic constants
// ---------------------------------------------------------------------------
// Empirically tuned; kept as named constants so the bands can be adjusted
// without touching the scoring logic.

/// Score at or above which a project classifies as high risk.
pub const HIGH_RISK_SCORE: f64 = 0.35;
/// Score at or above which a project classifies as medium risk.
pub const MEDIUM_RISK_SCORE: f64 = 0.18;

/// Weight of the planned-vs-actual slip in the risk score.
pub const SLIP_WEIGHT: f64 = 0.7;
/// Weight of the overdue-open-demand ratio in the risk score.
pub const OVERDUE_WEIGHT: f64 = 0.3;

/// Pressure added when the project due date is at most [`NEAR_DUE_DAYS`] away.
pub const NEAR_DUE_PRESSURE: f64 = 0.15;
/// Pressure added when the due date is at most [`MID_DUE_DAYS`] away.
pub const MID_DUE_PRESSURE: f64 = 0.08;
/// Days-to-due threshold for [`NEAR_DUE_PRESSURE`].
pub const NEAR_DUE_DAYS: i64 = 7;
/// Days-to-due threshold for [`MID_DUE_PRESSURE`].
pub const MID_DUE_DAYS: i64 = 14;

// ---------------------------------------------------------------------------
// Classification enums
// ---------------------------------------------------------------------------

/// Delay-risk band, serialized with the Portuguese display labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RiskLevel {
    #[serde(rename = "Baixo")]
    Low,
    #[serde(rename = "Médio")]
    Medium,
    #[serde(rename = "Alto")]
    High,
}

impl RiskLevel {
    pub fn label(self) -> &'static str {
        match self {
            RiskLevel::Low => "Baixo",
            RiskLevel::Medium => "Médio",
            RiskLevel::High => "Alto",
        }
    }
}

/// Trend label attached to each risk row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Trend {
    #[serde(rename = "Atraso provável")]
    LikelyDelay,
    #[serde(rename = "No prazo")]
    OnSchedule,
}

impl Trend {
    pub fn label(self) -> &'static str {
        match self {
            Trend::LikelyDelay => "Atraso provável",
            Trend::OnSchedule => "No prazo",
        }
    }
}

// ---------------------------------------------------------------------------
// Risk row
// ---------------------------------------------------------------------------

/// One row of the per-project delay-risk table.
///
/// Percentage cells are pre-formatted (`"NN%"` or empty when no signal
/// exists); dates are ISO `YYYY-MM-DD` or empty.
#[derive(Debug, Clone, Serialize)]
pub struct RiskRow {
    pub project_name: String,
    pub project_due_date: String,
    pub planned_pct_today: String,
    pub actual_pct_today: String,
    pub gap_planned_vs_actual: String,
    pub open_demands: usize,
    pub overdue_demands: usize,
    pub projected_finish_date: String,
    pub projected_delay_days: Option<i64>,
    pub risk: RiskLevel,
    pub trend: Trend,
    /// Internal sort key; dropped from the emitted table.
    #[serde(skip)]
    pub(crate) score: f64,
}

// ---------------------------------------------------------------------------
// Per-demand progress
// ---------------------------------------------------------------------------

/// Fraction of a demand's planned time window elapsed as of `today`.
///
/// Returns `None` when the demand carries no planned-progress signal at all
/// (neither a planned start nor any due date). With only a due date the
/// demand is treated as an instantaneous milestone; with only a start date
/// it counts as done once `today` has passed it. A degenerate window
/// (`end <= start`) reads as fully elapsed.
pub fn planned_progress(demand: &Demand, today: NaiveDate) -> Option<f64> {
    let start = parse_date(demand.planned_start.as_deref());
    let end = parse_date(demand.planned_due.as_deref())
        .or_else(|| parse_date(demand.due_date.as_deref()));

    match (start, end) {
        (None, None) => None,
        (None, Some(end)) => Some(if today >= end { 1.0 } else { 0.0 }),
        (Some(start), None) => Some(if today > start { 1.0 } else { 0.0 }),
        (Some(start), Some(end)) => {
            if today <= start {
                return Some(0.0);
            }
            if today >= end {
                return Some(1.0);
            }
            let total = (end - start).num_days();
            if total <= 0 {
                return Some(1.0);
            }
            let elapsed = (today - start).num_days() as f64;
            Some((elapsed / total as f64).clamp(0.0, 1.0))
        }
    }
}

/// Self-reported completion fraction, always in `[0, 1]`.
pub fn actual_progress(demand: &Demand) -> f64 {
    (demand.percent_complete as f64 / 100.0).clamp(0.0, 1.0)
}

// ---------------------------------------------------------------------------
// Per-project aggregation
// ---------------------------------------------------------------------------

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

fn pct_cell(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{}%", (v * 100.0).round() as i64),
        None => String::new(),
    }
}

fn date_cell(value: Option<NaiveDate>) -> String {
    match value {
        Some(d) => d.format("%Y-%m-%d").to_string(),
        None => String::new(),
    }
}

/// A demand is open while it is not Done and reports less than 100%.
fn is_open(demand: &Demand) -> bool {
    demand.status != Status::Done && actual_progress(demand) < 1.0
}

/// Aggregate one project's demands into a risk row.
///
/// Projects with no associated demands produce no row.
pub fn project_risk(project: &Project, demands: &[Demand], today: NaiveDate) -> Option<RiskRow> {
    let ds: Vec<&Demand> = demands
        .iter()
        .filter(|d| d.project_id == project.id)
        .collect();
    if ds.is_empty() {
        return None;
    }

    // Project due date: explicit deadline, else the latest planned due
    // among the demands.
    let p_due = parse_date(project.due_date.as_deref()).or_else(|| {
        ds.iter()
            .filter_map(|d| parse_date(d.planned_due.as_deref()))
            .max()
    });

    let mut planned_list = Vec::new();
    let mut actual_list = Vec::with_capacity(ds.len());
    let mut open_demands = 0usize;
    let mut overdue_demands = 0usize;

    for demand in &ds {
        if let Some(planned) = planned_progress(demand, today) {
            planned_list.push(planned);
        }
        actual_list.push(actual_progress(demand));

        if is_open(demand) {
            open_demands += 1;
            let due = parse_date(demand.planned_due.as_deref())
                .or_else(|| parse_date(demand.due_date.as_deref()));
            if matches!(due, Some(due) if due < today) {
                overdue_demands += 1;
            }
        }
    }

    let planned_pct = mean(&planned_list);
    // `ds` is non-empty, so the mean over all demands always exists.
    let actual_pct = mean(&actual_list).unwrap_or(0.0);

    let slip = planned_pct.map_or(0.0, |p| (p - actual_pct).max(0.0));

    // Velocity-based projection from the earliest planned start.
    let p_start = ds
        .iter()
        .filter_map(|d| parse_date(d.planned_start.as_deref()))
        .min();

    let (projected_finish, projected_delay_days) = match p_start {
        Some(start) => {
            let elapsed_days = (today - start).num_days().max(1);
            let velocity = actual_pct / elapsed_days as f64;
            let remaining = (1.0 - actual_pct).max(0.0);
            if velocity > 0.0 {
                if remaining == 0.0 {
                    // All work is done; there is nothing left to project, so a
                    // past due date must not read as a pending delay.
                    (Some(today), p_due.map(|_| 0))
                } else {
                    let days = (remaining / velocity).round() as i64;
                    match today.checked_add_signed(Duration::days(days)) {
                        Some(finish) => {
                            let delay = p_due.map(|due| (finish - due).num_days().max(0));
                            (Some(finish), delay)
                        }
                        None => (None, None),
                    }
                }
            } else {
                (None, None)
            }
        }
        None => (None, None),
    };

    let overdue_ratio = overdue_demands as f64 / ds.len() as f64;

    let deadline_pressure = match p_due {
        Some(due) => {
            let days_to_due = (due - today).num_days();
            if days_to_due <= NEAR_DUE_DAYS {
                NEAR_DUE_PRESSURE
            } else if days_to_due <= MID_DUE_DAYS {
                MID_DUE_PRESSURE
            } else {
                0.0
            }
        }
        None => 0.0,
    };

    let score = slip * SLIP_WEIGHT + overdue_ratio * OVERDUE_WEIGHT + deadline_pressure;

    let projected_late = matches!(projected_delay_days, Some(d) if d >= 1);
    let risk = if score >= HIGH_RISK_SCORE || projected_late {
        RiskLevel::High
    } else if score >= MEDIUM_RISK_SCORE {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    };
    let trend = if projected_late || risk == RiskLevel::High {
        Trend::LikelyDelay
    } else {
        Trend::OnSchedule
    };

    Some(RiskRow {
        project_name: project.name.clone(),
        project_due_date: date_cell(p_due),
        planned_pct_today: pct_cell(planned_pct),
        actual_pct_today: pct_cell(Some(actual_pct)),
        gap_planned_vs_actual: pct_cell(planned_pct.map(|_| slip)),
        open_demands,
        overdue_demands,
        projected_finish_date: date_cell(projected_finish),
        projected_delay_days,
        risk,
        trend,
        score,
    })
}

// ---------------------------------------------------------------------------
// Risk table
// ---------------------------------------------------------------------------

/// Compute the delay-risk table for all projects, sorted with likely-delay
/// rows first, then by score, projected delay, and overdue count, all
/// descending. Rows without a projection sort after a zero-day projection
/// within the same band; the sort is stable.
pub fn compute_project_delay_risk(
    projects: &[Project],
    demands: &[Demand],
    today: NaiveDate,
) -> Vec<RiskRow> {
    let mut rows: Vec<RiskRow> = projects
        .iter()
        .filter_map(|p| project_risk(p, demands, today))
        .collect();

    rows.sort_by(|a, b| {
        a.trend
            .label()
            .cmp(b.trend.label())
            .then_with(|| b.score.total_cmp(&a.score))
            .then_with(|| {
                b.projected_delay_days
                    .unwrap_or(-1)
                    .cmp(&a.projected_delay_days.unwrap_or(-1))
            })
            .then_with(|| b.overdue_demands.cmp(&a.overdue_demands))
    });
    rows
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
