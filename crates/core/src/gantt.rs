//! Gantt task preparation.
//!
//! Produces flat task-bar records at demand or project granularity with
//! resolved display labels. Chart drawing is the consumer's concern.

use chrono::NaiveDate;
use serde::Serialize;

use crate::dates::parse_date;
use crate::model::{Demand, Project, Stage};
use crate::progress::actual_progress;

/// Fallback label for dangling project/stage references.
pub const UNKNOWN_LABEL: &str = "Desconhecido";
/// Label for demands without a responsible party.
pub const UNASSIGNED_LABEL: &str = "Não atribuído";

/// One bar of the Gantt chart.
#[derive(Debug, Clone, Serialize)]
pub struct GanttTask {
    pub name: String,
    pub project: String,
    pub stage: String,
    pub responsible: String,
    pub status: &'static str,
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Fraction complete in `[0, 1]`.
    pub progress: f64,
}

fn project_name<'a>(projects: &'a [Project], id: &str) -> &'a str {
    projects
        .iter()
        .find(|p| p.id == id)
        .map_or(UNKNOWN_LABEL, |p| p.name.as_str())
}

fn stage_name<'a>(stages: &'a [Stage], id: Option<&str>) -> &'a str {
    id.and_then(|id| stages.iter().find(|s| s.id == id))
        .map_or(UNKNOWN_LABEL, |s| s.name.as_str())
}

/// Plottable window of a demand, or `None` when there is nothing to draw.
///
/// Start falls back from the planned start to the creation date; end falls
/// back from the planned due to the legacy due date.
fn demand_window(demand: &Demand) -> Option<(NaiveDate, NaiveDate)> {
    let end = parse_date(demand.planned_due.as_deref())
        .or_else(|| parse_date(demand.due_date.as_deref()))?;
    let start = parse_date(demand.planned_start.as_deref())
        .or_else(|| parse_date(Some(&demand.created_at)))
        .unwrap_or(end);
    Some((start.min(end), end))
}

/// One bar per demand that has a plottable window.
pub fn demand_tasks(
    demands: &[Demand],
    projects: &[Project],
    stages: &[Stage],
) -> Vec<GanttTask> {
    demands
        .iter()
        .filter_map(|d| {
            let (start, end) = demand_window(d)?;
            Some(GanttTask {
                name: d.title.clone(),
                project: project_name(projects, &d.project_id).to_string(),
                stage: stage_name(stages, d.stage_id.as_deref()).to_string(),
                responsible: d
                    .responsible
                    .clone()
                    .unwrap_or_else(|| UNASSIGNED_LABEL.to_string()),
                status: d.status.label(),
                start,
                end,
                progress: actual_progress(d),
            })
        })
        .collect()
}

/// One rollup bar per project: earliest start, latest end, mean progress
/// over the project's plottable demands. Demands are matched by
/// `project_id`; the project name is display-only, so projects sharing a
/// name keep separate bars.
pub fn project_tasks(demands: &[Demand], projects: &[Project]) -> Vec<GanttTask> {
    projects
        .iter()
        .filter_map(|project| {
            let own: Vec<(&Demand, (NaiveDate, NaiveDate))> = demands
                .iter()
                .filter(|d| d.project_id == project.id)
                .filter_map(|d| demand_window(d).map(|window| (d, window)))
                .collect();
            let start = own.iter().map(|(_, (start, _))| *start).min()?;
            let end = own.iter().map(|(_, (_, end))| *end).max()?;
            let progress =
                own.iter().map(|(d, _)| actual_progress(d)).sum::<f64>() / own.len() as f64;
            Some(GanttTask {
                name: project.name.clone(),
                project: project.name.clone(),
                stage: String::new(),
                responsible: project
                    .responsible
                    .clone()
                    .unwrap_or_else(|| UNASSIGNED_LABEL.to_string()),
                status: project.status.label(),
                start,
                end,
                progress,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Priority, Status};

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn project(id: &str, name: &str) -> Project {
        Project {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            status: Status::ToDo,
            responsible: None,
            created_at: "2024-01-01".into(),
            due_date: None,
        }
    }

    fn demand(project_id: &str, start: &str, due: &str) -> Demand {
        Demand {
            id: "dem_1".into(),
            title: "task".into(),
            description: String::new(),
            project_id: project_id.into(),
            stage_id: None,
            status: Status::InProgress,
            priority: Priority::Medium,
            responsible: None,
            planned_start: Some(start.into()),
            actual_start: None,
            planned_due: Some(due.into()),
            actual_due: None,
            due_date: Some(due.into()),
            created_at: "2024-01-01".into(),
            completed_at: None,
            percent_complete: 40,
            tags: vec![],
            comments: vec![],
        }
    }

    #[test]
    fn demand_bar_resolves_labels_and_window() {
        let projects = vec![project("p1", "Alpha")];
        let demands = vec![demand("p1", "2024-01-02", "2024-01-10")];

        let tasks = demand_tasks(&demands, &projects, &[]);
        assert_eq!(tasks.len(), 1);
        let task = &tasks[0];
        assert_eq!(task.project, "Alpha");
        assert_eq!(task.stage, UNKNOWN_LABEL);
        assert_eq!(task.responsible, UNASSIGNED_LABEL);
        assert_eq!(task.start, day(2024, 1, 2));
        assert_eq!(task.end, day(2024, 1, 10));
        assert_eq!(task.progress, 0.4);
    }

    #[test]
    fn dangling_project_reference_gets_fallback_label() {
        let tasks = demand_tasks(&[demand("ghost", "2024-01-02", "2024-01-10")], &[], &[]);
        assert_eq!(tasks[0].project, UNKNOWN_LABEL);
    }

    #[test]
    fn demand_without_due_date_is_skipped() {
        let mut d = demand("p1", "2024-01-02", "2024-01-10");
        d.planned_due = None;
        d.due_date = None;
        assert!(demand_tasks(&[d], &[project("p1", "Alpha")], &[]).is_empty());
    }

    #[test]
    fn start_falls_back_to_creation_date() {
        let mut d = demand("p1", "x", "2024-01-10");
        d.planned_start = Some("garbage".into());
        let tasks = demand_tasks(&[d], &[project("p1", "Alpha")], &[]);
        assert_eq!(tasks[0].start, day(2024, 1, 1));
    }

    #[test]
    fn project_rollup_spans_demands_and_averages_progress() {
        let projects = vec![project("p1", "Alpha"), project("p2", "Beta")];
        let mut a = demand("p1", "2024-01-02", "2024-01-10");
        a.percent_complete = 20;
        let mut b = demand("p1", "2024-01-05", "2024-02-01");
        b.percent_complete = 60;

        let tasks = project_tasks(&[a, b], &projects);
        // Beta has no demands: no bar.
        assert_eq!(tasks.len(), 1);
        let task = &tasks[0];
        assert_eq!(task.name, "Alpha");
        assert_eq!(task.start, day(2024, 1, 2));
        assert_eq!(task.end, day(2024, 2, 1));
        assert!((task.progress - 0.4).abs() < 1e-9);
    }

    #[test]
    fn projects_sharing_a_name_keep_separate_rollups() {
        let projects = vec![project("p1", "Migração"), project("p2", "Migração")];
        let mut a = demand("p1", "2024-01-02", "2024-01-10");
        a.percent_complete = 100;
        let mut b = demand("p2", "2024-03-01", "2024-03-20");
        b.percent_complete = 0;

        let tasks = project_tasks(&[a, b], &projects);
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].end, day(2024, 1, 10));
        assert_eq!(tasks[0].progress, 1.0);
        assert_eq!(tasks[1].start, day(2024, 3, 1));
        assert_eq!(tasks[1].end, day(2024, 3, 20));
        assert_eq!(tasks[1].progress, 0.0);
    }
}
