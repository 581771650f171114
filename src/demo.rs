//! Built-in demo dataset, the last fallback tier when neither a local
//! snapshot nor the remote API is available.

use chrono::NaiveDate;

use crate::models::{Dataset, Phase, Project, Status, Task, TeamMember};
use crate::store::Snapshot;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid demo date")
}

fn task(
    id: i64,
    code: &str,
    name: &str,
    phase_id: i64,
    status: Status,
    owner_id: i64,
    start: NaiveDate,
    end: NaiveDate,
) -> Task {
    Task {
        id,
        task_code: code.to_string(),
        name: name.to_string(),
        phase_id,
        status,
        owner_id,
        start_date: start,
        end_date: end,
        duration: (end - start).num_days() + 1,
        project_id: 1,
        phase_name: String::new(),
        owner_name: String::new(),
        avatar_color: String::new(),
    }
}

/// A small video-production plan spanning the visible timeline window.
pub fn snapshot() -> Snapshot {
    let projects = vec![Project {
        id: 1,
        name: "Aurora Launch Film".to_string(),
    }];

    let phases = vec![
        Phase {
            id: 1,
            name: "Pre-Production".to_string(),
            order: 1,
        },
        Phase {
            id: 2,
            name: "Production".to_string(),
            order: 2,
        },
        Phase {
            id: 3,
            name: "Post-Production".to_string(),
            order: 3,
        },
    ];

    let team_members = vec![
        TeamMember {
            id: 1,
            name: "Maya Chen".to_string(),
            avatar_color: "#4285f4".to_string(),
        },
        TeamMember {
            id: 2,
            name: "Arjun Patel".to_string(),
            avatar_color: "#34a853".to_string(),
        },
        TeamMember {
            id: 3,
            name: "Lena Fischer".to_string(),
            avatar_color: "#fbbc04".to_string(),
        },
        TeamMember {
            id: 4,
            name: "Tomas Silva".to_string(),
            avatar_color: "#ea4335".to_string(),
        },
    ];

    let mut tasks = vec![
        task(
            1,
            "VID-001",
            "Script and storyboard",
            1,
            Status::Done,
            1,
            date(2026, 1, 8),
            date(2026, 1, 14),
        ),
        task(
            2,
            "VID-002",
            "Casting",
            1,
            Status::Done,
            3,
            date(2026, 1, 12),
            date(2026, 1, 16),
        ),
        task(
            3,
            "VID-003",
            "Location scout",
            1,
            Status::InProgress,
            2,
            date(2026, 1, 15),
            date(2026, 1, 21),
        ),
        task(
            4,
            "VID-004",
            "Principal photography",
            2,
            Status::InProgress,
            2,
            date(2026, 1, 22),
            date(2026, 2, 4),
        ),
        task(
            5,
            "VID-005",
            "B-roll and pickups",
            2,
            Status::Open,
            4,
            date(2026, 2, 2),
            date(2026, 2, 6),
        ),
        task(
            6,
            "VID-006",
            "Rough cut",
            3,
            Status::Open,
            1,
            date(2026, 2, 9),
            date(2026, 2, 13),
        ),
        task(
            7,
            "VID-007",
            "Color grade and mix",
            3,
            Status::Testing,
            3,
            date(2026, 2, 16),
            date(2026, 2, 20),
        ),
        task(
            8,
            "VID-008",
            "Final delivery",
            3,
            Status::Open,
            1,
            date(2026, 2, 23),
            date(2026, 2, 25),
        ),
    ];

    for t in &mut tasks {
        t.refresh_denormalized(&phases, &team_members);
    }

    Snapshot {
        data: Dataset {
            projects,
            tasks,
            phases,
            team_members,
        },
        selected_project: Some(1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_data_is_internally_consistent() {
        let snap = snapshot();
        let data = &snap.data;
        assert!(!data.tasks.is_empty());

        for t in &data.tasks {
            assert!(data.phases.iter().any(|p| p.id == t.phase_id));
            assert!(data.team_members.iter().any(|m| m.id == t.owner_id));
            assert!(t.start_date <= t.end_date);
            // Denormalized caches are pre-filled and match the tables.
            let phase = data.phases.iter().find(|p| p.id == t.phase_id).unwrap();
            assert_eq!(t.phase_name, phase.name);
            let owner = data.team_members.iter().find(|m| m.id == t.owner_id).unwrap();
            assert_eq!(t.owner_name, owner.name);
            assert_eq!(t.avatar_color, owner.avatar_color);
        }

        // Task codes are unique within the project.
        let mut codes: Vec<&str> = data.tasks.iter().map(|t| t.task_code.as_str()).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), data.tasks.len());
    }
}
