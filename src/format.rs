//! User-facing rendering of tasks and dispatch outcomes.

use crate::router::Dispatch;
use crate::types::{Task, TaskFilter};

/// Titles longer than this are shortened with an ellipsis in list lines.
const DISPLAY_TITLE_MAX: usize = 50;

/// One display line per task: completion glyph, `[id]`, title, optional due
/// date, optional space-joined tags.
pub fn format_task_line(task: &Task) -> String {
    let glyph = if task.completed { "✓" } else { "○" };

    let mut title = task.title.clone();
    if title.chars().count() > DISPLAY_TITLE_MAX {
        title = title.chars().take(DISPLAY_TITLE_MAX).collect();
        title.push_str("...");
    }

    let mut line = format!("{glyph} [{}] {title}", task.id);
    if let Some(due) = task.due_date {
        line.push_str(&format!(" (due: {due})"));
    }
    if !task.tags.is_empty() {
        let tags: Vec<String> = task.tags.iter().map(|t| format!("#{t}")).collect();
        line.push(' ');
        line.push_str(&tags.join(" "));
    }
    line
}

/// One-line result message for an outcome; also the audit-trail entry.
pub fn outcome_message(outcome: &Dispatch) -> String {
    match outcome {
        Dispatch::Created(task) => format!("Created task: '{}'", task.title),
        Dispatch::Updated(task) => format!("Updated task: '{}'", task.title),
        Dispatch::Toggled(task) => {
            let status = if task.completed { "completed" } else { "pending" };
            format!("Marked '{}' as {status}", task.title)
        }
        Dispatch::Deleted(task) => format!("Deleted task {}", task.id),
        Dispatch::Listed { tasks, .. } => format!("Found {} task(s)", tasks.len()),
    }
}

/// Full reply body: the result message, plus display lines where the
/// outcome carries tasks.
pub fn render(outcome: &Dispatch) -> String {
    match outcome {
        Dispatch::Listed { filter, tasks } => {
            if tasks.is_empty() {
                return match filter {
                    TaskFilter::All => "No tasks yet".to_string(),
                    other => format!("No {} tasks found", other.as_str()),
                };
            }
            let mut body = outcome_message(outcome);
            for task in tasks {
                body.push('\n');
                body.push_str(&format_task_line(task));
            }
            body
        }
        Dispatch::Created(task) | Dispatch::Updated(task) | Dispatch::Toggled(task) => {
            format!("{}\n{}", outcome_message(outcome), format_task_line(task))
        }
        Dispatch::Deleted(_) => outcome_message(outcome),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn task() -> Task {
        Task {
            id: 1,
            title: "buy milk".to_string(),
            description: String::new(),
            completed: false,
            due_date: NaiveDate::from_ymd_opt(2025, 12, 20),
            tags: vec!["shopping".to_string()],
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn line_has_glyph_id_title_due_tags() {
        assert_eq!(
            format_task_line(&task()),
            "○ [1] buy milk (due: 2025-12-20) #shopping"
        );
    }

    #[test]
    fn completed_glyph() {
        let mut t = task();
        t.completed = true;
        t.due_date = None;
        t.tags.clear();
        assert_eq!(format_task_line(&t), "✓ [1] buy milk");
    }

    #[test]
    fn long_title_shortened() {
        let mut t = task();
        t.title = "x".repeat(60);
        assert!(format_task_line(&t).contains(&format!("{}...", "x".repeat(50))));
    }

    #[test]
    fn deleted_message_uses_id() {
        let outcome = Dispatch::Deleted(task());
        assert_eq!(outcome_message(&outcome), "Deleted task 1");
    }

    #[test]
    fn empty_list_message() {
        let outcome = Dispatch::Listed {
            filter: TaskFilter::Completed,
            tasks: vec![],
        };
        assert_eq!(render(&outcome), "No completed tasks found");
    }
}
