//! Entity model: Project, Demand, Stage.
//!
//! Plain records with string ids and string-typed dates (the legacy data
//! set stores dates as ISO strings; see [`crate::dates`]). Relationships
//! are by-id references resolved by linear scan; collections are small and
//! no indexing is required. Dangling references are tolerated by consumers
//! via fallback labels, never rejected here.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Enumerations
// ---------------------------------------------------------------------------

/// Demand (and project) workflow status.
///
/// Serialized with the Portuguese display labels used by the stored data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    #[default]
    #[serde(rename = "A Fazer")]
    ToDo,
    #[serde(rename = "Em Progresso")]
    InProgress,
    #[serde(rename = "Em Revisão")]
    Review,
    #[serde(rename = "Concluído")]
    Done,
}

impl Status {
    /// All statuses in kanban column order.
    pub const ALL: [Status; 4] = [
        Status::ToDo,
        Status::InProgress,
        Status::Review,
        Status::Done,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Status::ToDo => "A Fazer",
            Status::InProgress => "Em Progresso",
            Status::Review => "Em Revisão",
            Status::Done => "Concluído",
        }
    }

    /// Resolve a stored label back to a status. Unknown labels are `None`.
    pub fn from_label(label: &str) -> Option<Status> {
        Status::ALL.into_iter().find(|s| s.label() == label)
    }
}

/// Demand priority, serialized with Portuguese display labels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    #[serde(rename = "Baixa")]
    Low,
    #[default]
    #[serde(rename = "Média")]
    Medium,
    #[serde(rename = "Alta")]
    High,
    #[serde(rename = "Urgente")]
    Urgent,
}

impl Priority {
    pub const ALL: [Priority; 4] = [
        Priority::Low,
        Priority::Medium,
        Priority::High,
        Priority::Urgent,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Priority::Low => "Baixa",
            Priority::Medium => "Média",
            Priority::High => "Alta",
            Priority::Urgent => "Urgente",
        }
    }

    pub fn from_label(label: &str) -> Option<Priority> {
        Priority::ALL.into_iter().find(|p| p.label() == label)
    }
}

// ---------------------------------------------------------------------------
// Id and timestamp helpers
// ---------------------------------------------------------------------------

/// Generate a prefixed entity id (`proj_…`, `dem_…`, `eta_…`).
pub fn new_id(prefix: &str) -> String {
    format!("{prefix}_{}", Uuid::new_v4().simple())
}

/// Current UTC instant as a stored timestamp string.
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339()
}

/// Clamp a completion percentage into the valid `[0, 100]` range.
pub fn clamp_percent(value: i32) -> i32 {
    value.clamp(0, 100)
}

// ---------------------------------------------------------------------------
// Project
// ---------------------------------------------------------------------------

/// A project owning zero or more demands by `project_id` reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub responsible: Option<String>,
    pub created_at: String,
    /// Optional completion/due date (deadline).
    #[serde(default)]
    pub due_date: Option<String>,
}

/// DTO for creating a project.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProject {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<Status>,
    #[serde(default)]
    pub responsible: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
}

/// DTO for updating a project. All fields optional; absent fields keep
/// their current value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProject {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<Status>,
    pub responsible: Option<String>,
    pub due_date: Option<String>,
}

impl Project {
    pub fn new(input: CreateProject) -> Result<Project, CoreError> {
        if input.name.trim().is_empty() {
            return Err(CoreError::Validation("project name must not be empty".into()));
        }
        Ok(Project {
            id: new_id("proj"),
            name: input.name,
            description: input.description.unwrap_or_default(),
            status: input.status.unwrap_or_default(),
            responsible: input.responsible,
            created_at: now_timestamp(),
            due_date: input.due_date,
        })
    }

    pub fn apply(&mut self, input: UpdateProject) {
        if let Some(name) = input.name {
            self.name = name;
        }
        if let Some(description) = input.description {
            self.description = description;
        }
        if let Some(status) = input.status {
            self.status = status;
        }
        if let Some(responsible) = input.responsible {
            self.responsible = Some(responsible);
        }
        if let Some(due_date) = input.due_date {
            self.due_date = Some(due_date);
        }
    }
}

// ---------------------------------------------------------------------------
// Demand
// ---------------------------------------------------------------------------

/// A task belonging to a project, optionally tagged with a stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Demand {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub project_id: String,
    #[serde(default)]
    pub stage_id: Option<String>,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub responsible: Option<String>,
    #[serde(default)]
    pub planned_start: Option<String>,
    #[serde(default)]
    pub actual_start: Option<String>,
    #[serde(default)]
    pub planned_due: Option<String>,
    #[serde(default)]
    pub actual_due: Option<String>,
    /// Legacy unified due date, kept for backward compatibility: mirrors
    /// `actual_due` if present, else `planned_due`.
    #[serde(default)]
    pub due_date: Option<String>,
    pub created_at: String,
    #[serde(default)]
    pub completed_at: Option<String>,
    /// Completion percentage, always clamped to `[0, 100]`.
    #[serde(default)]
    pub percent_complete: i32,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub comments: Vec<String>,
}

/// DTO for creating a demand.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDemand {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub project_id: String,
    #[serde(default)]
    pub stage_id: Option<String>,
    #[serde(default)]
    pub status: Option<Status>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub responsible: Option<String>,
    #[serde(default)]
    pub planned_start: Option<String>,
    #[serde(default)]
    pub actual_start: Option<String>,
    #[serde(default)]
    pub planned_due: Option<String>,
    #[serde(default)]
    pub actual_due: Option<String>,
    #[serde(default)]
    pub percent_complete: Option<i32>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub comments: Option<Vec<String>>,
}

/// DTO for updating a demand. All fields optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateDemand {
    pub title: Option<String>,
    pub description: Option<String>,
    pub stage_id: Option<String>,
    pub status: Option<Status>,
    pub priority: Option<Priority>,
    pub responsible: Option<String>,
    pub planned_start: Option<String>,
    pub actual_start: Option<String>,
    pub planned_due: Option<String>,
    pub actual_due: Option<String>,
    pub percent_complete: Option<i32>,
    pub tags: Option<Vec<String>>,
    pub comments: Option<Vec<String>>,
}

impl Demand {
    pub fn new(input: CreateDemand) -> Result<Demand, CoreError> {
        if input.title.trim().is_empty() {
            return Err(CoreError::Validation("demand title must not be empty".into()));
        }
        if input.project_id.trim().is_empty() {
            return Err(CoreError::Validation(
                "demand must reference a project".into(),
            ));
        }
        let mut demand = Demand {
            id: new_id("dem"),
            title: input.title,
            description: input.description.unwrap_or_default(),
            project_id: input.project_id,
            stage_id: input.stage_id,
            status: input.status.unwrap_or_default(),
            priority: input.priority.unwrap_or_default(),
            responsible: input.responsible,
            planned_start: input.planned_start,
            actual_start: input.actual_start,
            planned_due: input.planned_due,
            actual_due: input.actual_due,
            due_date: None,
            created_at: now_timestamp(),
            completed_at: None,
            percent_complete: clamp_percent(input.percent_complete.unwrap_or(0)),
            tags: input.tags.unwrap_or_default(),
            comments: input.comments.unwrap_or_default(),
        };
        demand.refresh_legacy_due();
        if demand.status == Status::Done {
            demand.mark_done();
        }
        Ok(demand)
    }

    pub fn apply(&mut self, input: UpdateDemand) {
        if let Some(title) = input.title {
            self.title = title;
        }
        if let Some(description) = input.description {
            self.description = description;
        }
        if let Some(stage_id) = input.stage_id {
            self.stage_id = Some(stage_id);
        }
        if let Some(priority) = input.priority {
            self.priority = priority;
        }
        if let Some(responsible) = input.responsible {
            self.responsible = Some(responsible);
        }
        if let Some(planned_start) = input.planned_start {
            self.planned_start = Some(planned_start);
        }
        if let Some(actual_start) = input.actual_start {
            self.actual_start = Some(actual_start);
        }
        if let Some(planned_due) = input.planned_due {
            self.planned_due = Some(planned_due);
        }
        if let Some(actual_due) = input.actual_due {
            self.actual_due = Some(actual_due);
        }
        if let Some(percent) = input.percent_complete {
            self.percent_complete = clamp_percent(percent);
        }
        if let Some(tags) = input.tags {
            self.tags = tags;
        }
        if let Some(comments) = input.comments {
            self.comments = comments;
        }
        self.refresh_legacy_due();
        if let Some(status) = input.status {
            self.set_status(status);
        }
    }

    /// Change status, maintaining the completion invariant: when a demand
    /// becomes Done, its percentage reads 100 and its completion date is set.
    pub fn set_status(&mut self, status: Status) {
        self.status = status;
        if status == Status::Done {
            self.mark_done();
        }
    }

    fn mark_done(&mut self) {
        self.percent_complete = 100;
        if self.completed_at.is_none() {
            self.completed_at = Some(now_timestamp());
        }
    }

    /// Recompute the legacy unified due date.
    pub fn refresh_legacy_due(&mut self) {
        self.due_date = self.actual_due.clone().or_else(|| self.planned_due.clone());
    }
}

// ---------------------------------------------------------------------------
// Stage
// ---------------------------------------------------------------------------

/// A named phase demands can be tagged with (Design, Development, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Ordering key for board/chart display.
    #[serde(default)]
    pub order: i32,
    pub created_at: String,
}

/// DTO for creating a stage.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateStage {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub order: Option<i32>,
}

/// DTO for updating a stage. All fields optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateStage {
    pub name: Option<String>,
    pub description: Option<String>,
    pub order: Option<i32>,
}

impl Stage {
    pub fn new(input: CreateStage) -> Result<Stage, CoreError> {
        if input.name.trim().is_empty() {
            return Err(CoreError::Validation("stage name must not be empty".into()));
        }
        Ok(Stage {
            id: new_id("eta"),
            name: input.name,
            description: input.description.unwrap_or_default(),
            order: input.order.unwrap_or(0),
            created_at: now_timestamp(),
        })
    }

    pub fn apply(&mut self, input: UpdateStage) {
        if let Some(name) = input.name {
            self.name = name;
        }
        if let Some(description) = input.description {
            self.description = description;
        }
        if let Some(order) = input.order {
            self.order = order;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
