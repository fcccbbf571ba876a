//! On-demand dump of the whole collection to a dated, human-readable file.

use crate::error::AppError;
use crate::model::Task;
use std::path::{Path, PathBuf};
use time::macros::format_description;
use time::{Date, OffsetDateTime};

pub fn export_file_name(date: Date) -> Result<String, AppError> {
    let stamp = date
        .format(format_description!("[year]-[month]-[day]"))
        .map_err(|err| AppError::invalid_data(err.to_string()))?;
    Ok(format!("tasks-{stamp}.json"))
}

pub fn export_tasks(tasks: &[Task], dir: &Path) -> Result<PathBuf, AppError> {
    export_tasks_on(tasks, dir, OffsetDateTime::now_utc().date())
}

pub fn export_tasks_on(tasks: &[Task], dir: &Path, date: Date) -> Result<PathBuf, AppError> {
    let path = dir.join(export_file_name(date)?);
    let content = serde_json::to_string_pretty(tasks)?;

    std::fs::create_dir_all(dir)
        .map_err(|err| AppError::io(format!("{}: {}", dir.display(), err)))?;
    std::fs::write(&path, content)
        .map_err(|err| AppError::io(format!("{}: {}", path.display(), err)))?;

    tracing::info!(path = %path.display(), count = tasks.len(), "exported tasks");
    Ok(path)
}
