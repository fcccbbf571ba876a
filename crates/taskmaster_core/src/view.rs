//! Pure mapping from the current state to something a surface can draw.

use crate::model::{Filter, Task, TaskStats};
use crate::task_store::TaskStore;
use serde::Serialize;

pub const EMPTY_STATE_MESSAGE: &str = "No tasks here yet.";

/// The add control: pending text and whether it holds keyboard focus.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct InputState {
    pub text: String,
    pub focused: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowAction {
    Edit,
    Delete,
    Save,
    Cancel,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum RowMode {
    Display { actions: [RowAction; 2] },
    Editing { draft: String, actions: [RowAction; 2] },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskRow {
    pub id: u64,
    pub text: String,
    pub completed: bool,
    pub indicator: &'static str,
    #[serde(flatten)]
    pub mode: RowMode,
}

impl TaskRow {
    pub fn is_editing(&self) -> bool {
        matches!(self.mode, RowMode::Editing { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "rows", rename_all = "snake_case")]
pub enum ListView {
    Empty,
    Items(Vec<TaskRow>),
}

impl ListView {
    pub fn rows(&self) -> &[TaskRow] {
        match self {
            Self::Empty => &[],
            Self::Items(rows) => rows,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewModel {
    pub filter: Filter,
    pub list: ListView,
    pub stats: TaskStats,
    pub can_clear_completed: bool,
    pub input: InputState,
}

fn completion_indicator(completed: bool) -> &'static str {
    if completed { "[x]" } else { "[ ]" }
}

fn task_row(task: &Task, editing: Option<u64>) -> TaskRow {
    let mode = if editing == Some(task.id) {
        RowMode::Editing {
            draft: task.text.clone(),
            actions: [RowAction::Save, RowAction::Cancel],
        }
    } else {
        RowMode::Display {
            actions: [RowAction::Edit, RowAction::Delete],
        }
    };

    TaskRow {
        id: task.id,
        text: task.text.clone(),
        completed: task.completed,
        indicator: completion_indicator(task.completed),
        mode,
    }
}

pub fn render(store: &TaskStore, input: &InputState) -> ViewModel {
    let filter = store.filter();
    let visible = store.filtered_view(filter);
    let list = if visible.is_empty() {
        ListView::Empty
    } else {
        ListView::Items(
            visible
                .into_iter()
                .map(|task| task_row(task, store.editing()))
                .collect(),
        )
    };
    let stats = store.stats();

    ViewModel {
        filter,
        list,
        stats,
        can_clear_completed: stats.completed > 0,
        input: input.clone(),
    }
}
