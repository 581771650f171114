//! Pure grouping projections over the flat task list.
//!
//! These are recomputed on every render; the data volumes (tens of tasks)
//! make caching pointless. Inputs are never mutated. Callers pass the
//! project-filtered task slice.

use crate::models::{Phase, Status, Task};

/// Tasks bucketed under each phase, in phase-list order. Bucket-internal
/// order matches the input order.
pub fn by_phase<'a>(phases: &'a [Phase], tasks: &[&'a Task]) -> Vec<(&'a Phase, Vec<&'a Task>)> {
    phases
        .iter()
        .map(|phase| {
            let bucket: Vec<&Task> = tasks
                .iter()
                .filter(|t| t.phase_id == phase.id)
                .copied()
                .collect();
            (phase, bucket)
        })
        .collect()
}

/// Tasks bucketed under each status, in board-column order.
pub fn by_status<'a>(tasks: &[&'a Task]) -> Vec<(Status, Vec<&'a Task>)> {
    Status::ALL
        .iter()
        .map(|&status| {
            let bucket: Vec<&Task> = tasks
                .iter()
                .filter(|t| t.status == status)
                .copied()
                .collect();
            (status, bucket)
        })
        .collect()
}

/// Flatten a phase grouping into the order the cursor walks it.
pub fn phase_order<'a>(phases: &'a [Phase], tasks: &[&'a Task]) -> Vec<&'a Task> {
    by_phase(phases, tasks)
        .into_iter()
        .flat_map(|(_, bucket)| bucket)
        .collect()
}

/// Flatten a status grouping into the order the cursor walks it.
pub fn status_order<'a>(tasks: &[&'a Task]) -> Vec<&'a Task> {
    by_status(tasks)
        .into_iter()
        .flat_map(|(_, bucket)| bucket)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn phase(id: i64, name: &str, order: i64) -> Phase {
        Phase {
            id,
            name: name.to_string(),
            order,
        }
    }

    fn task(id: i64, phase_id: i64, status: Status) -> Task {
        let day = NaiveDate::from_ymd_opt(2026, 1, 8).unwrap();
        Task {
            id,
            task_code: format!("VID-{id:03}"),
            name: format!("Task {id}"),
            phase_id,
            status,
            owner_id: 1,
            start_date: day,
            end_date: day,
            duration: 1,
            project_id: 1,
            phase_name: String::new(),
            owner_name: String::new(),
            avatar_color: String::new(),
        }
    }

    fn fixture() -> (Vec<Phase>, Vec<Task>) {
        let phases = vec![phase(1, "Pre-Production", 1), phase(2, "Production", 2)];
        let tasks = vec![
            task(10, 2, Status::Open),
            task(11, 1, Status::Done),
            task(12, 1, Status::Open),
            task(13, 2, Status::InProgress),
        ];
        (phases, tasks)
    }

    fn refs(tasks: &[Task]) -> Vec<&Task> {
        tasks.iter().collect()
    }

    #[test]
    fn phase_grouping_is_a_partition() {
        let (phases, tasks) = fixture();
        let groups = by_phase(&phases, &refs(&tasks));

        assert_eq!(groups.len(), 2);
        let total: usize = groups.iter().map(|(_, b)| b.len()).sum();
        assert_eq!(total, tasks.len());

        // Every task sits in the bucket of its own phase, exactly once.
        for (phase, bucket) in &groups {
            for t in bucket {
                assert_eq!(t.phase_id, phase.id);
            }
        }
    }

    #[test]
    fn buckets_preserve_input_order() {
        let (phases, tasks) = fixture();
        let groups = by_phase(&phases, &refs(&tasks));
        let pre: Vec<i64> = groups[0].1.iter().map(|t| t.id).collect();
        assert_eq!(pre, vec![11, 12]);

        let by_st = by_status(&refs(&tasks));
        let open: Vec<i64> = by_st[0].1.iter().map(|t| t.id).collect();
        assert_eq!(open, vec![10, 12]);
    }

    #[test]
    fn status_grouping_is_a_partition() {
        let (_, tasks) = fixture();
        let groups = by_status(&refs(&tasks));
        assert_eq!(groups.len(), Status::ALL.len());
        let total: usize = groups.iter().map(|(_, b)| b.len()).sum();
        assert_eq!(total, tasks.len());
        for (status, bucket) in &groups {
            for t in bucket {
                assert_eq!(t.status, *status);
            }
        }
    }

    #[test]
    fn grouping_is_idempotent_and_leaves_input_alone() {
        let (phases, tasks) = fixture();
        let before = tasks.clone();

        let first: Vec<Vec<i64>> = by_phase(&phases, &refs(&tasks))
            .iter()
            .map(|(_, b)| b.iter().map(|t| t.id).collect())
            .collect();
        let second: Vec<Vec<i64>> = by_phase(&phases, &refs(&tasks))
            .iter()
            .map(|(_, b)| b.iter().map(|t| t.id).collect())
            .collect();

        assert_eq!(first, second);
        assert_eq!(tasks, before);
    }

    #[test]
    fn flattened_orders_walk_group_by_group() {
        let (phases, tasks) = fixture();
        let walk: Vec<i64> = phase_order(&phases, &refs(&tasks))
            .iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(walk, vec![11, 12, 10, 13]);

        let walk: Vec<i64> = status_order(&refs(&tasks)).iter().map(|t| t.id).collect();
        assert_eq!(walk, vec![10, 12, 13, 11]);
    }
}
