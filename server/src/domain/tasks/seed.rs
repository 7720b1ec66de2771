//! Random task generation for the `seed` action

use rand::Rng;
use rand::seq::SliceRandom;

use crate::data::types::{TaskLabel, TaskPriority, TaskRow, TaskStatus};
use crate::utils::time::DAY_MS;

/// How far back generated `created_at` values reach
const SEED_HISTORY_DAYS: i64 = 180;

const VERBS: &[&str] = &[
    "Refactor", "Fix", "Implement", "Document", "Optimize", "Test", "Review", "Migrate",
    "Remove", "Audit",
];

const SUBJECTS: &[&str] = &[
    "login flow", "billing page", "search index", "email templates", "session store",
    "export job", "settings panel", "API pagination", "upload handler", "audit log",
    "dashboard charts", "onboarding wizard",
];

const QUALIFIERS: &[&str] = &[
    "for mobile", "before release", "in staging", "for large accounts", "behind a flag", "",
];

fn title<R: Rng + ?Sized>(rng: &mut R) -> String {
    let verb = VERBS.choose(rng).copied().unwrap_or("Review");
    let subject = SUBJECTS.choose(rng).copied().unwrap_or("backlog");
    match QUALIFIERS.choose(rng).copied() {
        Some(q) if !q.is_empty() => format!("{verb} {subject} {q}"),
        _ => format!("{verb} {subject}"),
    }
}

fn pick<R: Rng + ?Sized, T: Copy>(rng: &mut R, values: &[T], fallback: T) -> T {
    values.choose(rng).copied().unwrap_or(fallback)
}

/// Generate `count` tasks with codes `TASK-1..=count`
///
/// Timestamps fall within the last 180 days before `now`; `updated_at` is never
/// before `created_at`. Roughly one in ten tasks is archived and one in twenty
/// has no title.
pub fn generate_tasks<R: Rng + ?Sized>(rng: &mut R, count: u32, now: i64) -> Vec<TaskRow> {
    let history = SEED_HISTORY_DAYS * DAY_MS;
    (1..=count)
        .map(|n| {
            let created_at = now - rng.gen_range(0..history);
            let updated_at = rng.gen_range(created_at..=now);
            // Quarter-hour granularity
            let estimated_hours = f64::from(rng.gen_range(1..=96u32)) / 4.0;
            TaskRow {
                id: cuid2::create_id(),
                code: format!("TASK-{n}"),
                title: if rng.gen_bool(0.05) { None } else { Some(title(rng)) },
                status: pick(rng, &TaskStatus::ALL, TaskStatus::Todo),
                label: pick(rng, &TaskLabel::ALL, TaskLabel::Feature),
                priority: pick(rng, &TaskPriority::ALL, TaskPriority::Medium),
                estimated_hours,
                archived: rng.gen_bool(0.1),
                created_at,
                updated_at,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    const NOW: i64 = 1_760_000_000_000;

    #[test]
    fn test_generate_count_and_codes() {
        let mut rng = StdRng::seed_from_u64(7);
        let tasks = generate_tasks(&mut rng, 25, NOW);

        assert_eq!(tasks.len(), 25);
        assert_eq!(tasks[0].code, "TASK-1");
        assert_eq!(tasks[24].code, "TASK-25");

        let ids: HashSet<_> = tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids.len(), 25);
    }

    #[test]
    fn test_generated_values_respect_constraints() {
        let mut rng = StdRng::seed_from_u64(42);
        for task in generate_tasks(&mut rng, 200, NOW) {
            assert!(task.created_at <= task.updated_at);
            assert!(task.updated_at <= NOW);
            assert!(task.created_at > NOW - SEED_HISTORY_DAYS * DAY_MS);
            assert!((0.25..=24.0).contains(&task.estimated_hours));
            if let Some(title) = &task.title {
                assert!(!title.is_empty() && title.len() <= 200);
            }
        }
    }

    #[test]
    fn test_generate_zero() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(generate_tasks(&mut rng, 0, NOW).is_empty());
    }
}
