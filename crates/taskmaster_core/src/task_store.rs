//! In-memory task collection plus the transient UI state that travels with it.
//!
//! Every operation is total: an id that is not in the collection is a silent
//! no-op, never an error. Blank text on add or edit is discarded the same way.

use crate::error::AppError;
use crate::model::{Filter, Task, TaskStats};
use std::collections::HashSet;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

/// Issues task ids derived from the millisecond clock, bumped past the last
/// issued id so two adds inside the same tick never collide. Once the id space
/// above the highest id is exhausted, the lowest unused id is handed out.
#[derive(Debug, Default, Clone)]
struct IdGenerator {
    last: u64,
}

impl IdGenerator {
    fn seeded(tasks: &[Task]) -> Self {
        Self {
            last: tasks.iter().map(|task| task.id).max().unwrap_or(0),
        }
    }

    fn next(&mut self, now: OffsetDateTime, taken: &[Task]) -> u64 {
        let millis = u64::try_from(now.unix_timestamp_nanos() / 1_000_000).unwrap_or(0);
        match self.last.checked_add(1) {
            Some(floor) => {
                self.last = millis.max(floor);
                self.last
            }
            None => lowest_unused_id(taken),
        }
    }
}

fn lowest_unused_id(taken: &[Task]) -> u64 {
    let used: HashSet<u64> = taken.iter().map(|task| task.id).collect();
    (1..=u64::MAX).find(|id| !used.contains(id)).unwrap_or(0)
}

#[derive(Debug, Default, Clone)]
pub struct TaskStore {
    tasks: Vec<Task>,
    filter: Filter,
    editing: Option<u64>,
    ids: IdGenerator,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rehydrates a store from a loaded collection. Filter and editing state
    /// always start from their defaults.
    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        let ids = IdGenerator::seeded(&tasks);
        Self {
            tasks,
            filter: Filter::All,
            editing: None,
            ids,
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: u64) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    pub fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
    }

    pub fn editing(&self) -> Option<u64> {
        self.editing
    }

    /// Marks `id` as being edited. Returns `false` and leaves the editing state
    /// alone when no such task exists.
    pub fn start_edit(&mut self, id: u64) -> bool {
        if self.get(id).is_none() {
            return false;
        }
        self.editing = Some(id);
        true
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    pub fn add(&mut self, text: &str) -> Result<Option<Task>, AppError> {
        self.add_at(text, OffsetDateTime::now_utc())
    }

    pub fn add_at(&mut self, text: &str, now: OffsetDateTime) -> Result<Option<Task>, AppError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }

        let created_at = now
            .format(&Rfc3339)
            .map_err(|err| AppError::invalid_data(err.to_string()))?;
        let task = Task {
            id: self.ids.next(now, &self.tasks),
            text: trimmed.to_string(),
            completed: false,
            created_at,
        };

        self.tasks.insert(0, task.clone());
        Ok(Some(task))
    }

    pub fn toggle(&mut self, id: u64) -> Option<&Task> {
        let task = self.tasks.iter_mut().find(|task| task.id == id)?;
        task.completed = !task.completed;
        Some(task)
    }

    pub fn delete(&mut self, id: u64) -> Option<Task> {
        if self.editing == Some(id) {
            self.editing = None;
        }
        let index = self.tasks.iter().position(|task| task.id == id)?;
        Some(self.tasks.remove(index))
    }

    /// Replaces the text of `id` with the trimmed `new_text`. Returns the task
    /// only when its text was actually replaced. Editing state is cleared
    /// whether or not the edit applied.
    pub fn edit(&mut self, id: u64, new_text: &str) -> Option<&Task> {
        self.editing = None;

        let trimmed = new_text.trim();
        if trimmed.is_empty() {
            return None;
        }

        let task = self.tasks.iter_mut().find(|task| task.id == id)?;
        task.text = trimmed.to_string();
        Some(task)
    }

    pub fn clear_completed(&mut self) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|task| !task.completed);

        if let Some(id) = self.editing
            && !self.tasks.iter().any(|task| task.id == id)
        {
            self.editing = None;
        }

        before - self.tasks.len()
    }

    pub fn filtered_view(&self, filter: Filter) -> Vec<&Task> {
        self.tasks.iter().filter(|task| filter.matches(task)).collect()
    }

    pub fn stats(&self) -> TaskStats {
        TaskStats::from_tasks(&self.tasks)
    }
}

#[cfg(test)]
mod tests {
    use super::TaskStore;
    use crate::model::{Filter, Task};
    use time::macros::datetime;

    fn task(id: u64, text: &str, completed: bool) -> Task {
        Task {
            id,
            text: text.to_string(),
            completed,
            created_at: "2025-12-20T00:00:00Z".to_string(),
        }
    }

    fn texts(tasks: &[&Task]) -> Vec<String> {
        tasks.iter().map(|task| task.text.clone()).collect()
    }

    #[test]
    fn add_prepends_trimmed_pending_task() {
        let mut store = TaskStore::from_tasks(vec![task(1, "older", true)]);

        let added = store.add("  Buy milk  ").unwrap().expect("task added");

        assert_eq!(added.text, "Buy milk");
        assert!(!added.completed);
        assert_eq!(store.stats().total, 2);
        assert_eq!(store.tasks()[0], added);
    }

    #[test]
    fn add_after_highest_possible_id_reuses_a_free_id() {
        let mut store =
            TaskStore::from_tasks(vec![task(u64::MAX, "last", false), task(1, "one", false)]);
        let now = datetime!(2025-12-20 08:30 UTC);

        let first = store.add_at("a", now).unwrap().expect("task added");
        let second = store.add_at("b", now).unwrap().expect("task added");

        assert_eq!(first.id, 2);
        assert_eq!(second.id, 3);
        let mut ids: Vec<u64> = store.tasks().iter().map(|task| task.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 4);
    }

    #[test]
    fn add_ignores_blank_text() {
        let mut store = TaskStore::from_tasks(vec![task(1, "keep", false)]);

        assert!(store.add("").unwrap().is_none());
        assert!(store.add(" \t\n ").unwrap().is_none());
        assert_eq!(store.tasks(), &[task(1, "keep", false)]);
    }

    #[test]
    fn add_records_creation_time() {
        let mut store = TaskStore::new();
        let added = store
            .add_at("demo", datetime!(2025-12-20 08:30:00 UTC))
            .unwrap()
            .unwrap();

        assert_eq!(added.created_at, "2025-12-20T08:30:00Z");
        assert_eq!(added.id, 1_766_219_400_000);
    }

    #[test]
    fn ids_stay_unique_within_one_clock_tick() {
        let mut store = TaskStore::new();
        let now = datetime!(2025-12-20 08:30:00 UTC);

        let first = store.add_at("one", now).unwrap().unwrap();
        let second = store.add_at("two", now).unwrap().unwrap();
        let third = store.add_at("three", now).unwrap().unwrap();

        assert_ne!(first.id, second.id);
        assert_ne!(second.id, third.id);
        assert!(third.id > second.id && second.id > first.id);
    }

    #[test]
    fn ids_never_reuse_loaded_ids_when_clock_is_behind() {
        let mut store = TaskStore::from_tasks(vec![task(u64::MAX / 2, "future", false)]);
        let added = store
            .add_at("now", datetime!(2025-12-20 08:30:00 UTC))
            .unwrap()
            .unwrap();

        assert_eq!(added.id, u64::MAX / 2 + 1);
    }

    #[test]
    fn toggle_twice_restores_state() {
        let mut store = TaskStore::from_tasks(vec![task(1, "demo", false)]);

        assert!(store.toggle(1).unwrap().completed);
        assert!(!store.toggle(1).unwrap().completed);
    }

    #[test]
    fn toggle_missing_id_is_noop() {
        let mut store = TaskStore::from_tasks(vec![task(1, "demo", false)]);

        assert!(store.toggle(2).is_none());
        assert!(!store.tasks()[0].completed);
    }

    #[test]
    fn delete_is_idempotent() {
        let mut store = TaskStore::from_tasks(vec![task(2, "b", false), task(1, "a", false)]);

        assert_eq!(store.delete(1).map(|task| task.id), Some(1));
        assert!(store.delete(1).is_none());
        assert_eq!(store.tasks(), &[task(2, "b", false)]);
    }

    #[test]
    fn delete_clears_editing_state_for_that_task() {
        let mut store = TaskStore::from_tasks(vec![task(2, "b", false), task(1, "a", false)]);

        assert!(store.start_edit(1));
        store.delete(2);
        assert_eq!(store.editing(), Some(1));

        store.delete(1);
        assert_eq!(store.editing(), None);
    }

    #[test]
    fn start_edit_ignores_unknown_id() {
        let mut store = TaskStore::from_tasks(vec![task(1, "a", false)]);

        assert!(!store.start_edit(9));
        assert_eq!(store.editing(), None);
    }

    #[test]
    fn edit_with_blank_text_keeps_text_and_clears_editing() {
        let mut store = TaskStore::from_tasks(vec![task(1, "original", false)]);
        store.start_edit(1);

        assert!(store.edit(1, "   ").is_none());
        assert_eq!(store.tasks()[0].text, "original");
        assert_eq!(store.editing(), None);
    }

    #[test]
    fn edit_stores_trimmed_text() {
        let mut store = TaskStore::from_tasks(vec![task(1, "original", false)]);
        store.start_edit(1);

        let edited = store.edit(1, " New text ").expect("edited");

        assert_eq!(edited.text, "New text");
        assert_eq!(store.editing(), None);
    }

    #[test]
    fn edit_does_not_touch_completion() {
        let mut store = TaskStore::from_tasks(vec![task(1, "original", true)]);

        store.edit(1, "renamed");

        assert!(store.tasks()[0].completed);
    }

    #[test]
    fn clear_completed_removes_only_completed_tasks() {
        let mut store = TaskStore::from_tasks(vec![
            task(3, "c", true),
            task(2, "b", false),
            task(1, "a", true),
        ]);

        assert_eq!(store.clear_completed(), 2);
        assert_eq!(store.tasks(), &[task(2, "b", false)]);
        assert_eq!(store.clear_completed(), 0);
        assert_eq!(store.tasks(), &[task(2, "b", false)]);
    }

    #[test]
    fn clear_completed_clears_editing_of_removed_task() {
        let mut store = TaskStore::from_tasks(vec![task(2, "b", false), task(1, "a", true)]);
        store.start_edit(1);

        store.clear_completed();

        assert_eq!(store.editing(), None);
    }

    #[test]
    fn filtered_views_partition_the_collection() {
        let store = TaskStore::from_tasks(vec![
            task(4, "d", false),
            task(3, "c", true),
            task(2, "b", false),
            task(1, "a", true),
        ]);

        let active = store.filtered_view(Filter::Active);
        let completed = store.filtered_view(Filter::Completed);

        assert_eq!(texts(&active), ["d", "b"]);
        assert_eq!(texts(&completed), ["c", "a"]);
        assert_eq!(texts(&store.filtered_view(Filter::All)), ["d", "c", "b", "a"]);
        assert_eq!(active.len() + completed.len(), store.stats().total);
    }

    #[test]
    fn stats_ignore_current_filter() {
        let mut store = TaskStore::from_tasks(vec![task(2, "b", true), task(1, "a", false)]);
        store.set_filter(Filter::Completed);

        let stats = store.stats();

        assert_eq!((stats.total, stats.active, stats.completed), (2, 1, 1));
    }

    #[test]
    fn walkthrough_from_empty_store() {
        let mut store = TaskStore::new();
        let now = datetime!(2025-12-20 08:30:00 UTC);

        let milk = store.add_at("Buy milk", now).unwrap().unwrap();
        let stats = store.stats();
        assert_eq!((stats.total, stats.active, stats.completed), (1, 1, 0));

        store.toggle(milk.id);
        let stats = store.stats();
        assert_eq!((stats.active, stats.completed), (0, 1));

        store.add_at("Walk dog", now).unwrap();
        assert_eq!(
            texts(&store.filtered_view(Filter::All)),
            ["Walk dog", "Buy milk"]
        );
        assert_eq!(texts(&store.filtered_view(Filter::Active)), ["Walk dog"]);

        assert_eq!(store.clear_completed(), 1);
        assert_eq!(store.stats().total, 1);
        assert_eq!(store.clear_completed(), 0);
        assert_eq!(store.stats().total, 1);
    }
}
