//! Domain models for the production-planner backend.
//!
//! Field names follow the backend's snake_case JSON. Dates are plain
//! calendar dates (NaiveDate). Tasks carry denormalized display fields
//! (phase name, owner name, avatar color) that the store refreshes from
//! the reference tables on every local write.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Task workflow status, in board-column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Status {
    #[default]
    Open,
    #[serde(rename = "In Progress")]
    InProgress,
    Testing,
    Done,
}

impl Status {
    /// All statuses, in the order the board shows its columns.
    pub const ALL: [Status; 4] = [
        Status::Open,
        Status::InProgress,
        Status::Testing,
        Status::Done,
    ];

    /// Cycle to the next status (wraps around).
    pub fn next(&self) -> Self {
        match self {
            Status::Open => Status::InProgress,
            Status::InProgress => Status::Testing,
            Status::Testing => Status::Done,
            Status::Done => Status::Open,
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Open => write!(f, "Open"),
            Status::InProgress => write!(f, "In Progress"),
            Status::Testing => write!(f, "Testing"),
            Status::Done => write!(f, "Done"),
        }
    }
}

// ============================================
// Reference entities
// ============================================

/// Root grouping entity. Created externally, never mutated here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub name: String,
}

/// An ordered project stage (e.g. pre-production). Static within a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phase {
    pub id: i64,
    pub name: String,
    pub order: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMember {
    pub id: i64,
    pub name: String,
    pub avatar_color: String,
}

// ============================================
// Tasks
// ============================================

/// A scheduled unit of work, owned by exactly one project and one phase.
///
/// `phase_name`, `owner_name` and `avatar_color` are caches of the
/// referenced Phase/TeamMember rows, stored for render convenience and
/// re-derived on every local write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub task_code: String,
    pub name: String,
    pub phase_id: i64,
    pub status: Status,
    pub owner_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub duration: i64,
    pub project_id: i64,
    #[serde(default)]
    pub phase_name: String,
    #[serde(default)]
    pub owner_name: String,
    #[serde(default)]
    pub avatar_color: String,
}

impl Task {
    /// First letter of the owner's name, for the board-view avatar.
    pub fn avatar_initial(&self) -> char {
        self.owner_name.chars().next().unwrap_or('?')
    }

    /// Re-derive the cached display fields from the reference tables.
    /// Unknown ids clear the cache rather than leave stale values behind.
    pub fn refresh_denormalized(&mut self, phases: &[Phase], members: &[TeamMember]) {
        self.phase_name = phases
            .iter()
            .find(|p| p.id == self.phase_id)
            .map(|p| p.name.clone())
            .unwrap_or_default();

        match members.iter().find(|m| m.id == self.owner_id) {
            Some(member) => {
                self.owner_name = member.name.clone();
                self.avatar_color = member.avatar_color.clone();
            }
            None => {
                self.owner_name = String::new();
                self.avatar_color = String::new();
            }
        }
    }
}

/// Task write DTO: everything the user edits, minus the id and the
/// denormalized caches. Sent as the body of POST and PUT requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskDraft {
    pub task_code: String,
    pub name: String,
    pub phase_id: i64,
    pub status: Status,
    pub owner_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub duration: i64,
    pub project_id: i64,
}

impl TaskDraft {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.task_code.trim().is_empty() {
            return Err("Task ID is required");
        }
        if self.name.trim().is_empty() {
            return Err("Task name is required");
        }
        if self.end_date < self.start_date {
            return Err("End date must be after start date");
        }
        Ok(())
    }

    /// Materialize a full task record under the given id. The display
    /// caches start empty; the store fills them before the task lands.
    pub fn into_task(self, id: i64) -> Task {
        Task {
            id,
            task_code: self.task_code,
            name: self.name,
            phase_id: self.phase_id,
            status: self.status,
            owner_id: self.owner_id,
            start_date: self.start_date,
            end_date: self.end_date,
            duration: self.duration,
            project_id: self.project_id,
            phase_name: String::new(),
            owner_name: String::new(),
            avatar_color: String::new(),
        }
    }
}

// ============================================
// Dataset bundle
// ============================================

/// The four collections the backend serves, fetched together at load time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub projects: Vec<Project>,
    pub tasks: Vec<Task>,
    pub phases: Vec<Phase>,
    pub team_members: Vec<TeamMember>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn draft() -> TaskDraft {
        TaskDraft {
            task_code: "VID-001".to_string(),
            name: "Script".to_string(),
            phase_id: 1,
            status: Status::Open,
            owner_id: 1,
            start_date: date(2026, 1, 8),
            end_date: date(2026, 1, 12),
            duration: 5,
            project_id: 1,
        }
    }

    #[test]
    fn status_uses_wire_strings() {
        assert_eq!(
            serde_json::to_string(&Status::InProgress).unwrap(),
            "\"In Progress\""
        );
        assert_eq!(
            serde_json::from_str::<Status>("\"In Progress\"").unwrap(),
            Status::InProgress
        );
        assert_eq!(serde_json::to_string(&Status::Open).unwrap(), "\"Open\"");
    }

    #[test]
    fn draft_validation_requires_code_and_name() {
        let mut d = draft();
        assert!(d.validate().is_ok());

        d.task_code = "  ".to_string();
        assert!(d.validate().is_err());

        d.task_code = "VID-001".to_string();
        d.name = String::new();
        assert!(d.validate().is_err());
    }

    #[test]
    fn draft_validation_rejects_inverted_date_range() {
        let mut d = draft();
        d.end_date = date(2026, 1, 7);
        assert!(d.validate().is_err());

        // Single-day tasks are allowed.
        d.end_date = d.start_date;
        assert!(d.validate().is_ok());
    }

    #[test]
    fn task_json_uses_snake_case_fields() {
        let task = draft().into_task(42);
        let json = serde_json::to_string(&task).unwrap();
        assert!(json.contains("\"task_code\""));
        assert!(json.contains("\"start_date\":\"2026-01-08\""));
        assert!(json.contains("\"avatar_color\""));

        let back: Task = serde_json::from_str(&json).unwrap();
        assert_eq!(back, task);
    }

    #[test]
    fn refresh_denormalized_tracks_reference_tables() {
        let phases = vec![Phase {
            id: 7,
            name: "Production".to_string(),
            order: 2,
        }];
        let members = vec![TeamMember {
            id: 3,
            name: "Sasha".to_string(),
            avatar_color: "#4285f4".to_string(),
        }];

        let mut task = draft().into_task(1);
        task.phase_id = 7;
        task.owner_id = 3;
        task.refresh_denormalized(&phases, &members);
        assert_eq!(task.phase_name, "Production");
        assert_eq!(task.owner_name, "Sasha");
        assert_eq!(task.avatar_color, "#4285f4");
        assert_eq!(task.avatar_initial(), 'S');

        // Unknown owner clears the cache instead of leaving stale values.
        task.owner_id = 99;
        task.refresh_denormalized(&phases, &members);
        assert_eq!(task.owner_name, "");
        assert_eq!(task.avatar_color, "");
    }
}
