//! Maps the task collection onto a single blob under [`TASKS_KEY`].

use crate::error::AppError;
use crate::model::Task;
use crate::storage::BlobStore;
use std::collections::HashSet;
use tracing::{debug, warn};

pub const TASKS_KEY: &str = "taskmaster-tasks";

pub fn save(backend: &mut dyn BlobStore, tasks: &[Task]) -> Result<(), AppError> {
    let content = serde_json::to_string(tasks)?;
    backend.set(TASKS_KEY, &content)?;
    debug!(count = tasks.len(), "saved tasks");
    Ok(())
}

/// Never fails: an absent, blank, unreadable or malformed blob yields an empty
/// collection and a diagnostic.
pub fn load(backend: &dyn BlobStore) -> Vec<Task> {
    let content = match backend.get(TASKS_KEY) {
        Ok(Some(content)) => content,
        Ok(None) => return Vec::new(),
        Err(err) => {
            warn!(error = %err, "failed to read stored tasks, starting empty");
            return Vec::new();
        }
    };

    if content.trim().is_empty() {
        return Vec::new();
    }

    match serde_json::from_str::<Vec<Task>>(&content) {
        Ok(tasks) => dedupe_ids(tasks),
        Err(err) => {
            warn!(error = %err, "error loading tasks, starting empty");
            Vec::new()
        }
    }
}

fn dedupe_ids(tasks: Vec<Task>) -> Vec<Task> {
    let mut seen = HashSet::with_capacity(tasks.len());
    let total = tasks.len();
    let unique: Vec<Task> = tasks
        .into_iter()
        .filter(|task| seen.insert(task.id))
        .collect();

    if unique.len() != total {
        warn!(
            dropped = total - unique.len(),
            "stored tasks contained duplicate ids"
        );
    }
    unique
}
