//! Kanban board grouping and dashboard metrics.
//!
//! Data preparation only: the board is one column per status in workflow
//! order, after applying the optional project/stage/responsible filters.
//! Rendering is the consumer's concern.

use serde::{Deserialize, Serialize};

use crate::model::{Demand, Priority, Project, Status};

// ---------------------------------------------------------------------------
// Board
// ---------------------------------------------------------------------------

/// Optional filters applied before grouping demands into columns.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BoardFilter {
    pub project_id: Option<String>,
    pub stage_id: Option<String>,
    pub responsible: Option<String>,
}

impl BoardFilter {
    /// Whether a demand passes every filter that is set.
    pub fn matches(&self, demand: &Demand) -> bool {
        if let Some(project_id) = &self.project_id {
            if demand.project_id != *project_id {
                return false;
            }
        }
        if let Some(stage_id) = &self.stage_id {
            if demand.stage_id.as_deref() != Some(stage_id.as_str()) {
                return false;
            }
        }
        if let Some(responsible) = &self.responsible {
            if demand.responsible.as_deref() != Some(responsible.as_str()) {
                return false;
            }
        }
        true
    }
}

/// One kanban column: a status and the demands currently in it.
#[derive(Debug, Clone, Serialize)]
pub struct BoardColumn {
    pub status: Status,
    pub total: usize,
    pub demands: Vec<Demand>,
}

/// Group demands into one column per status, in workflow order.
///
/// Every status gets a column even when empty, so consumers render a
/// stable board layout.
pub fn board_columns(demands: &[Demand], filter: &BoardFilter) -> Vec<BoardColumn> {
    Status::ALL
        .into_iter()
        .map(|status| {
            let demands: Vec<Demand> = demands
                .iter()
                .filter(|d| d.status == status && filter.matches(d))
                .cloned()
                .collect();
            BoardColumn {
                status,
                total: demands.len(),
                demands,
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Dashboard metrics
// ---------------------------------------------------------------------------

/// A labelled count for the status/priority breakdown charts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelCount {
    pub label: &'static str,
    pub count: usize,
}

/// Summary metrics for the dashboard header cards and breakdown charts.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardMetrics {
    pub total_projects: usize,
    pub total_demands: usize,
    pub done_demands: usize,
    pub in_progress_demands: usize,
    pub urgent_demands: usize,
    /// Done demands as a percentage of all demands (0 when there are none).
    pub completion_rate: f64,
    pub by_status: Vec<LabelCount>,
    pub by_priority: Vec<LabelCount>,
}

/// Compute dashboard metrics over the loaded collections.
pub fn dashboard_metrics(projects: &[Project], demands: &[Demand]) -> DashboardMetrics {
    let total_demands = demands.len();
    let done_demands = demands.iter().filter(|d| d.status == Status::Done).count();
    let completion_rate = if total_demands > 0 {
        done_demands as f64 / total_demands as f64 * 100.0
    } else {
        0.0
    };

    let by_status = Status::ALL
        .into_iter()
        .map(|status| LabelCount {
            label: status.label(),
            count: demands.iter().filter(|d| d.status == status).count(),
        })
        .collect();
    let by_priority = Priority::ALL
        .into_iter()
        .map(|priority| LabelCount {
            label: priority.label(),
            count: demands.iter().filter(|d| d.priority == priority).count(),
        })
        .collect();

    DashboardMetrics {
        total_projects: projects.len(),
        total_demands,
        done_demands,
        in_progress_demands: demands
            .iter()
            .filter(|d| d.status == Status::InProgress)
            .count(),
        urgent_demands: demands
            .iter()
            .filter(|d| d.priority == Priority::Urgent)
            .count(),
        completion_rate,
        by_status,
        by_priority,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CreateDemand, CreateProject};

    fn demand(project_id: &str, status: Status, priority: Priority) -> Demand {
        let mut d = Demand::new(CreateDemand {
            title: "t".into(),
            description: None,
            project_id: project_id.into(),
            stage_id: None,
            status: None,
            priority: Some(priority),
            responsible: None,
            planned_start: None,
            actual_start: None,
            planned_due: None,
            actual_due: None,
            percent_complete: None,
            tags: None,
            comments: None,
        })
        .unwrap();
        d.set_status(status);
        d
    }

    #[test]
    fn board_has_one_column_per_status_in_order() {
        let demands = vec![
            demand("p1", Status::Done, Priority::Low),
            demand("p1", Status::ToDo, Priority::Low),
            demand("p1", Status::ToDo, Priority::High),
        ];
        let columns = board_columns(&demands, &BoardFilter::default());

        let statuses: Vec<Status> = columns.iter().map(|c| c.status).collect();
        assert_eq!(statuses, Status::ALL.to_vec());
        assert_eq!(columns[0].total, 2); // To Do
        assert_eq!(columns[1].total, 0); // In Progress
        assert_eq!(columns[3].total, 1); // Done
    }

    #[test]
    fn board_filters_by_project_stage_and_responsible() {
        let mut a = demand("p1", Status::ToDo, Priority::Low);
        a.stage_id = Some("eta_1".into());
        a.responsible = Some("Ana".into());
        let b = demand("p2", Status::ToDo, Priority::Low);

        let demands = vec![a, b];
        let filter = BoardFilter {
            project_id: Some("p1".into()),
            stage_id: Some("eta_1".into()),
            responsible: Some("Ana".into()),
        };
        let columns = board_columns(&demands, &filter);
        assert_eq!(columns[0].total, 1);

        let other_stage = BoardFilter {
            stage_id: Some("eta_2".into()),
            ..Default::default()
        };
        let columns = board_columns(&demands, &other_stage);
        assert!(columns.iter().all(|c| c.total == 0));
    }

    #[test]
    fn metrics_count_and_rate() {
        let projects = vec![Project::new(CreateProject {
            name: "P".into(),
            description: None,
            status: None,
            responsible: None,
            due_date: None,
        })
        .unwrap()];
        let demands = vec![
            demand("p1", Status::Done, Priority::Urgent),
            demand("p1", Status::InProgress, Priority::Medium),
            demand("p1", Status::ToDo, Priority::Urgent),
            demand("p1", Status::Done, Priority::Low),
        ];

        let metrics = dashboard_metrics(&projects, &demands);
        assert_eq!(metrics.total_projects, 1);
        assert_eq!(metrics.total_demands, 4);
        assert_eq!(metrics.done_demands, 2);
        assert_eq!(metrics.in_progress_demands, 1);
        assert_eq!(metrics.urgent_demands, 2);
        assert_eq!(metrics.completion_rate, 50.0);
        assert_eq!(
            metrics.by_status[3],
            LabelCount { label: "Concluído", count: 2 }
        );
    }

    #[test]
    fn metrics_over_empty_collections_are_zero() {
        let metrics = dashboard_metrics(&[], &[]);
        assert_eq!(metrics.total_demands, 0);
        assert_eq!(metrics.completion_rate, 0.0);
    }
}
