//! Integration tests for the task store.
//!
//! These verify the id allocation, field, and ordering guarantees against a
//! fresh in-memory store per test.

use chrono::NaiveDate;
use task_chat::store::TaskStore;
use task_chat::types::{TaskFilter, TaskUpdates};

fn setup_store() -> TaskStore {
    TaskStore::new()
}

mod id_allocation {
    use super::*;

    #[test]
    fn ids_start_at_one_and_increase() {
        let store = setup_store();
        let a = store.create("first", "", None, vec![]).unwrap();
        let b = store.create("second", "", None, vec![]).unwrap();
        let c = store.create("third", "", None, vec![]).unwrap();
        assert_eq!((a.id, b.id, c.id), (1, 2, 3));
    }

    #[test]
    fn deleted_ids_are_never_reused() {
        let store = setup_store();
        for i in 0..5 {
            store.create(&format!("task {i}"), "", None, vec![]).unwrap();
        }
        store.delete(3).unwrap();
        store.delete(5).unwrap();

        let next = store.create("after deletions", "", None, vec![]).unwrap();
        assert_eq!(next.id, 6);
    }

    #[test]
    fn ids_strictly_increase_across_create_delete_cycles() {
        let store = setup_store();
        let mut issued = Vec::new();
        for i in 0..10 {
            let task = store.create(&format!("cycle {i}"), "", None, vec![]).unwrap();
            issued.push(task.id);
            store.delete(task.id).unwrap();
        }
        for pair in issued.windows(2) {
            assert!(pair[1] > pair[0]);
        }
    }
}

mod crud {
    use super::*;

    #[test]
    fn create_then_get_returns_identical_fields() {
        let store = setup_store();
        let due = NaiveDate::from_ymd_opt(2025, 12, 20);
        let created = store
            .create("buy milk", "from the corner shop", due, vec!["shopping".to_string()])
            .unwrap();

        let fetched = store.get(created.id).unwrap();
        assert_eq!(fetched.title, "buy milk");
        assert_eq!(fetched.description, "from the corner shop");
        assert_eq!(fetched.due_date, due);
        assert_eq!(fetched.tags, vec!["shopping"]);
        assert!(!fetched.completed);
        assert_eq!(fetched.created_at, fetched.updated_at);
    }

    #[test]
    fn get_missing_returns_none() {
        let store = setup_store();
        assert!(store.get(42).is_none());
    }

    #[test]
    fn create_rejects_invalid_title() {
        let store = setup_store();
        assert!(store.create("", "", None, vec![]).is_err());
        assert!(store.create("   ", "", None, vec![]).is_err());
        assert!(store.create(&"a".repeat(201), "", None, vec![]).is_err());
        assert!(store.is_empty());
    }

    #[test]
    fn description_truncated_to_exactly_1000_chars() {
        let store = setup_store();
        let long = "d".repeat(1500);
        let task = store.create("truncate me", &long, None, vec![]).unwrap();
        assert_eq!(task.description, "d".repeat(1000));
        assert_eq!(store.get(task.id).unwrap().description.len(), 1000);
    }

    #[test]
    fn update_applies_only_present_fields() {
        let store = setup_store();
        let task = store
            .create("original", "keep this", None, vec!["old".to_string()])
            .unwrap();

        let updated = store
            .update(
                task.id,
                &TaskUpdates {
                    title: Some("renamed".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.title, "renamed");
        assert_eq!(updated.description, "keep this");
        assert_eq!(updated.tags, vec!["old"]);
        assert!(updated.updated_at > updated.created_at);
    }

    #[test]
    fn update_revalidates_title() {
        let store = setup_store();
        let task = store.create("fine", "", None, vec![]).unwrap();
        let result = store.update(
            task.id,
            &TaskUpdates {
                title: Some("  ".to_string()),
                ..Default::default()
            },
        );
        assert!(result.is_err());
        assert_eq!(store.get(task.id).unwrap().title, "fine");
    }

    #[test]
    fn update_truncates_description() {
        let store = setup_store();
        let task = store.create("task", "", None, vec![]).unwrap();
        let updated = store
            .update(
                task.id,
                &TaskUpdates {
                    description: Some("x".repeat(1200)),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.description.len(), 1000);
    }

    #[test]
    fn update_missing_task_is_not_found() {
        let store = setup_store();
        let result = store.update(
            9,
            &TaskUpdates {
                title: Some("ghost".to_string()),
                ..Default::default()
            },
        );
        assert!(result.is_err());
    }

    #[test]
    fn delete_then_get_is_none() {
        let store = setup_store();
        let task = store.create("ephemeral", "", None, vec![]).unwrap();
        let deleted = store.delete(task.id).unwrap();
        assert_eq!(deleted.title, "ephemeral");
        assert!(store.get(task.id).is_none());
        assert!(store.delete(task.id).is_err());
    }
}

mod toggling {
    use super::*;

    #[test]
    fn toggle_twice_restores_original_state() {
        let store = setup_store();
        let task = store.create("flip me", "", None, vec![]).unwrap();

        let once = store.toggle(task.id).unwrap();
        assert!(once.completed);
        let twice = store.toggle(task.id).unwrap();
        assert!(!twice.completed);
    }

    #[test]
    fn updated_at_strictly_increases_on_each_toggle() {
        let store = setup_store();
        let task = store.create("stamp me", "", None, vec![]).unwrap();

        let first = store.toggle(task.id).unwrap();
        let second = store.toggle(task.id).unwrap();
        assert!(first.updated_at > task.updated_at);
        assert!(second.updated_at > first.updated_at);
    }

    #[test]
    fn toggle_missing_task_is_not_found() {
        let store = setup_store();
        assert!(store.toggle(7).is_err());
    }
}

mod listing {
    use super::*;

    #[test]
    fn list_orders_ascending_by_id() {
        let store = setup_store();
        for title in ["a", "b", "c"] {
            store.create(title, "", None, vec![]).unwrap();
        }
        store.delete(2).unwrap();
        store.create("d", "", None, vec![]).unwrap();

        let ids: Vec<u64> = store.list(TaskFilter::All).iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 3, 4]);
    }

    #[test]
    fn filters_split_by_completion() {
        let store = setup_store();
        store.create("open", "", None, vec![]).unwrap();
        let done = store.create("done", "", None, vec![]).unwrap();
        store.toggle(done.id).unwrap();

        let completed = store.list(TaskFilter::Completed);
        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].title, "done");

        let incomplete = store.list(TaskFilter::Incomplete);
        assert_eq!(incomplete.len(), 1);
        assert_eq!(incomplete[0].title, "open");

        assert_eq!(store.list(TaskFilter::All).len(), 2);
    }

    #[test]
    fn counts_track_completion() {
        let store = setup_store();
        assert!(store.is_empty());

        store.create("one", "", None, vec![]).unwrap();
        let two = store.create("two", "", None, vec![]).unwrap();
        store.toggle(two.id).unwrap();

        let counts = store.counts();
        assert_eq!(counts.total, 2);
        assert_eq!(counts.completed, 1);
        assert_eq!(counts.pending, 1);
    }
}
