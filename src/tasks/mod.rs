//! Task list operations.
//!
//! [`TaskList`] is the persisted value: it serializes as a plain JSON array so
//! the stored `tasks` entry stays a list of tasks. Selection and the active
//! filter are view state and live in [`TaskView`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Task, TaskFilter};
use crate::storage::Merge;

/// Ordered list of tasks, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskList {
    tasks: Vec<Task>,
}

impl TaskList {
    #[must_use]
    pub const fn new(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Appends a task with `text` unless it is blank after trimming.
    ///
    /// The stored text is `text` as given. The id is `now` in Unix
    /// milliseconds, bumped until it is unique. Returns the new id.
    pub fn add(&mut self, text: &str, now: DateTime<Utc>) -> Option<i64> {
        if text.trim().is_empty() {
            tracing::debug!("Rejecting blank task");
            return None;
        }

        let mut id = now.timestamp_millis();
        while self.tasks.iter().any(|task| task.id == id) {
            id += 1;
        }

        self.tasks.push(Task::new(id, text.to_string(), now));
        tracing::debug!(task_id = id, "Task added");
        Some(id)
    }

    /// Flips `completed` of the task with `id`. Returns whether it existed.
    pub fn toggle(&mut self, id: i64) -> bool {
        match self.tasks.iter_mut().find(|task| task.id == id) {
            Some(task) => {
                task.completed = !task.completed;
                true
            }
            None => false,
        }
    }

    /// Removes the task with `id`. Returns whether it existed.
    pub fn delete(&mut self, id: i64) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.id != id);
        before != self.tasks.len()
    }

    /// Number of incomplete tasks across the whole list.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.tasks.iter().filter(|task| !task.completed).count()
    }

    #[must_use]
    pub fn filtered(&self, filter: TaskFilter) -> Vec<&Task> {
        self.tasks.iter().filter(|task| filter.accepts(task)).collect()
    }
}

impl Merge for TaskList {
    /// Stored tasks first, then local tasks the store did not know about.
    fn merge(loaded: Self, local: Self) -> Self {
        let mut tasks = loaded.tasks;
        for task in local.tasks {
            if !tasks.iter().any(|existing| existing.id == task.id) {
                tasks.push(task);
            }
        }
        Self { tasks }
    }
}

/// Filter and cursor of the task view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskView {
    pub filter: TaskFilter,
    /// Index into the filtered list.
    pub selected: usize,
}

impl TaskView {
    /// Id of the selected task within the filtered list.
    #[must_use]
    pub fn selected_id(&self, list: &TaskList) -> Option<i64> {
        list.filtered(self.filter).get(self.selected).map(|task| task.id)
    }

    pub fn move_down(&mut self, list: &TaskList) {
        let len = list.filtered(self.filter).len();
        if self.selected + 1 < len {
            self.selected += 1;
        }
    }

    pub fn move_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn set_filter(&mut self, filter: TaskFilter, list: &TaskList) {
        self.filter = filter;
        self.clamp(list);
    }

    /// Keeps the cursor inside the filtered list after it changed.
    pub fn clamp(&mut self, list: &TaskList) {
        let len = list.filtered(self.filter).len();
        self.selected = self.selected.min(len.saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.timestamp_millis_opt(1_700_000_000_000).single().unwrap()
    }

    #[test]
    fn add_rejects_blank_and_keeps_untrimmed_text() {
        let mut list = TaskList::default();
        assert_eq!(list.add("   ", now()), None);
        let id = list.add("  buy milk ", now()).unwrap();
        assert_eq!(id, 1_700_000_000_000);
        assert_eq!(list.tasks()[0].text, "  buy milk ");
        assert!(!list.tasks()[0].completed);
    }

    #[test]
    fn ids_stay_unique_within_one_millisecond() {
        let mut list = TaskList::default();
        let a = list.add("a", now()).unwrap();
        let b = list.add("b", now()).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn toggle_delete_and_remaining() {
        let mut list = TaskList::default();
        let a = list.add("a", now()).unwrap();
        let b = list.add("b", now()).unwrap();
        assert_eq!(list.remaining(), 2);

        assert!(list.toggle(a));
        assert_eq!(list.remaining(), 1);
        assert_eq!(list.filtered(TaskFilter::Completed).len(), 1);
        assert_eq!(list.filtered(TaskFilter::Active)[0].id, b);

        assert!(list.delete(a));
        assert!(!list.delete(a));
        assert!(!list.toggle(a));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn serializes_as_plain_array() {
        let mut list = TaskList::default();
        list.add("a", now());
        let json = serde_json::to_value(&list).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["text"], "a");
    }

    #[test]
    fn merge_puts_loaded_tasks_first() {
        let mut loaded = TaskList::default();
        let stored = loaded.add("stored", now()).unwrap();
        let mut local = TaskList::default();
        local.add("local", now() + chrono::Duration::seconds(1));

        let merged = TaskList::merge(loaded, local);
        let texts: Vec<&str> = merged.tasks().iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["stored", "local"]);
        assert_eq!(merged.tasks()[0].id, stored);
    }

    #[test]
    fn cursor_is_clamped_to_filtered_list() {
        let mut list = TaskList::default();
        let a = list.add("a", now()).unwrap();
        list.add("b", now());
        let mut view = TaskView::default();
        view.move_down(&list);
        view.move_down(&list);
        assert_eq!(view.selected, 1);

        list.toggle(a);
        view.set_filter(TaskFilter::Completed, &list);
        assert_eq!(view.selected, 0);
        assert_eq!(view.selected_id(&list), Some(a));
    }
}
