//! Command handlers: one per user intent, each running
//! validate -> mutate -> persist -> render -> notify to completion before the
//! next intent is accepted.

use crate::error::AppError;
use crate::export;
use crate::model::{Filter, Task};
use crate::notify::{NoopNotifier, Notifier};
use crate::storage::{BlobStore, persistence};
use crate::task_store::TaskStore;
use crate::view::{self, InputState, ViewModel};
use std::path::PathBuf;
use tracing::{debug, warn};

pub const ADDED_NOTICE: &str = "Task added successfully!";
pub const DELETED_NOTICE: &str = "Task deleted!";

pub fn cleared_notice(count: usize) -> String {
    format!("{count} completed task(s) cleared!")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    SetInput(String),
    /// Add a task from the pending input text.
    Submit,
    Toggle(u64),
    Delete(u64),
    StartEdit(u64),
    CommitEdit { id: u64, text: String },
    CancelEdit,
    ClearCompleted,
    SetFilter(Filter),
    FocusInput,
    Export { dir: PathBuf },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    InputChanged,
    Added(Task),
    Toggled(Task),
    Deleted(Task),
    EditStarted(u64),
    Edited(Task),
    EditDiscarded,
    EditCancelled,
    Cleared(usize),
    FilterChanged(Filter),
    InputFocused,
    Exported { path: PathBuf, count: usize },
    /// Blank input or an id that is not in the collection.
    Ignored,
}

/// Result of one handler cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cycle {
    pub outcome: Outcome,
    pub view: ViewModel,
    pub notice: Option<String>,
}

pub struct TaskController<B: BlobStore> {
    store: TaskStore,
    backend: B,
    notifier: Box<dyn Notifier>,
    input: InputState,
}

impl<B: BlobStore> TaskController<B> {
    /// Rehydrates the collection from `backend`. Unreadable data starts an
    /// empty list rather than failing.
    pub fn load(backend: B, notifier: Box<dyn Notifier>) -> Self {
        let tasks = persistence::load(&backend);
        debug!(count = tasks.len(), "loaded tasks");
        Self {
            store: TaskStore::from_tasks(tasks),
            backend,
            notifier,
            input: InputState::default(),
        }
    }

    pub fn quiet(backend: B) -> Self {
        Self::load(backend, Box::new(NoopNotifier))
    }

    pub fn tasks(&self) -> &[Task] {
        self.store.tasks()
    }

    pub fn editing(&self) -> Option<u64> {
        self.store.editing()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn render(&self) -> ViewModel {
        view::render(&self.store, &self.input)
    }

    pub fn dispatch(&mut self, intent: Intent) -> Result<Cycle, AppError> {
        debug!(?intent, "dispatching intent");
        match intent {
            Intent::SetInput(text) => Ok(self.set_input(text)),
            Intent::Submit => self.submit(),
            Intent::Toggle(id) => self.toggle(id),
            Intent::Delete(id) => self.delete(id),
            Intent::StartEdit(id) => Ok(self.start_edit(id)),
            Intent::CommitEdit { id, text } => self.commit_edit(id, &text),
            Intent::CancelEdit => Ok(self.cancel_edit()),
            Intent::ClearCompleted => self.clear_completed(),
            Intent::SetFilter(filter) => Ok(self.set_filter(filter)),
            Intent::FocusInput => Ok(self.focus_input()),
            Intent::Export { dir } => self.export(dir),
        }
    }

    pub fn set_input(&mut self, text: String) -> Cycle {
        self.input.text = text;
        self.finish(Outcome::InputChanged, None)
    }

    pub fn submit(&mut self) -> Result<Cycle, AppError> {
        let before = self.store.clone();
        let Some(task) = self.store.add(&self.input.text)? else {
            return Ok(self.finish(Outcome::Ignored, None));
        };

        self.persist_or_restore(before)?;
        self.input.text.clear();
        self.input.focused = true;
        Ok(self.finish(Outcome::Added(task), Some(ADDED_NOTICE.to_string())))
    }

    pub fn toggle(&mut self, id: u64) -> Result<Cycle, AppError> {
        let before = self.store.clone();
        let Some(task) = self.store.toggle(id).cloned() else {
            return Ok(self.finish(Outcome::Ignored, None));
        };

        self.persist_or_restore(before)?;
        Ok(self.finish(Outcome::Toggled(task), None))
    }

    pub fn delete(&mut self, id: u64) -> Result<Cycle, AppError> {
        let before = self.store.clone();
        let Some(task) = self.store.delete(id) else {
            return Ok(self.finish(Outcome::Ignored, None));
        };

        self.persist_or_restore(before)?;
        Ok(self.finish(Outcome::Deleted(task), Some(DELETED_NOTICE.to_string())))
    }

    pub fn start_edit(&mut self, id: u64) -> Cycle {
        let outcome = if self.store.start_edit(id) {
            Outcome::EditStarted(id)
        } else {
            Outcome::Ignored
        };
        self.finish(outcome, None)
    }

    /// Applies the edit and saves only when the stored text actually changed.
    pub fn commit_edit(&mut self, id: u64, text: &str) -> Result<Cycle, AppError> {
        let before = self.store.clone();
        let previous = self.store.get(id).map(|task| task.text.clone());
        let Some(task) = self.store.edit(id, text).cloned() else {
            return Ok(self.finish(Outcome::EditDiscarded, None));
        };

        if previous.as_deref() != Some(task.text.as_str()) {
            self.persist_or_restore(before)?;
        }
        Ok(self.finish(Outcome::Edited(task), None))
    }

    pub fn cancel_edit(&mut self) -> Cycle {
        self.store.cancel_edit();
        self.finish(Outcome::EditCancelled, None)
    }

    pub fn clear_completed(&mut self) -> Result<Cycle, AppError> {
        let before = self.store.clone();
        let count = self.store.clear_completed();
        if count == 0 {
            return Ok(self.finish(Outcome::Cleared(0), None));
        }

        self.persist_or_restore(before)?;
        Ok(self.finish(Outcome::Cleared(count), Some(cleared_notice(count))))
    }

    pub fn set_filter(&mut self, filter: Filter) -> Cycle {
        self.store.set_filter(filter);
        self.finish(Outcome::FilterChanged(filter), None)
    }

    pub fn focus_input(&mut self) -> Cycle {
        self.input.focused = true;
        self.finish(Outcome::InputFocused, None)
    }

    pub fn export(&mut self, dir: PathBuf) -> Result<Cycle, AppError> {
        let count = self.store.tasks().len();
        let path = export::export_tasks(self.store.tasks(), &dir)?;
        let notice = format!("Exported {count} task(s) to {}", path.display());
        Ok(self.finish(Outcome::Exported { path, count }, Some(notice)))
    }

    /// Saves the collection. On failure the in-memory state is rolled back to
    /// `before` so memory never runs ahead of what was persisted.
    fn persist_or_restore(&mut self, before: TaskStore) -> Result<(), AppError> {
        if let Err(err) = persistence::save(&mut self.backend, self.store.tasks()) {
            warn!(error = %err, "save failed, reverting change");
            self.store = before;
            return Err(err);
        }
        Ok(())
    }

    fn finish(&self, outcome: Outcome, notice: Option<String>) -> Cycle {
        if let Some(message) = notice.as_deref()
            && let Err(err) = self.notifier.notify(message)
        {
            warn!(error = %err, "failed to show notification");
        }

        Cycle {
            outcome,
            view: self.render(),
            notice,
        }
    }
}
