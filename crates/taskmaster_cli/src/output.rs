use tabled::{Table, Tabled};
use taskmaster_core::config::Palette;
use taskmaster_core::error::AppError;
use taskmaster_core::model::{Task, TaskStats};
use taskmaster_core::view::{EMPTY_STATE_MESSAGE, ListView, RowAction, RowMode, TaskRow, ViewModel};

#[derive(Tabled)]
struct StatsRow {
    #[tabled(rename = "Total")]
    total: usize,
    #[tabled(rename = "Active")]
    active: usize,
    #[tabled(rename = "Completed")]
    completed: usize,
}

fn action_label(action: RowAction) -> &'static str {
    match action {
        RowAction::Edit => "edit",
        RowAction::Delete => "delete",
        RowAction::Save => "save",
        RowAction::Cancel => "cancel",
    }
}

fn format_row(row: &TaskRow, palette: &Palette) -> String {
    let indicator = palette.accentize(row.indicator);
    match &row.mode {
        RowMode::Display { actions } => {
            let text = if row.completed {
                palette.mutedize(&row.text)
            } else {
                row.text.clone()
            };
            let actions: Vec<&str> = actions.iter().map(|action| action_label(*action)).collect();
            format!("{indicator} {text} ({}) [{}]", row.id, actions.join(" | "))
        }
        RowMode::Editing { draft, actions } => {
            let actions: Vec<&str> = actions.iter().map(|action| action_label(*action)).collect();
            format!(
                "{indicator} > {draft} ({}) editing [{}]",
                row.id,
                actions.join(" | ")
            )
        }
    }
}

pub fn format_summary(stats: &TaskStats, can_clear_completed: bool) -> String {
    let mut summary = format!(
        "{} total, {} active, {} completed",
        stats.total, stats.active, stats.completed
    );
    if can_clear_completed {
        summary.push_str(" (clear-completed available)");
    }
    summary
}

pub fn format_view(view: &ViewModel, palette: &Palette) -> String {
    let mut lines = vec![format!("Filter: {}", view.filter)];
    match &view.list {
        ListView::Empty => lines.push(palette.mutedize(EMPTY_STATE_MESSAGE)),
        ListView::Items(rows) => lines.extend(rows.iter().map(|row| format_row(row, palette))),
    }
    lines.push(format_summary(&view.stats, view.can_clear_completed));
    lines.join("\n")
}

pub fn format_stats_table(stats: &TaskStats) -> String {
    Table::new([StatsRow {
        total: stats.total,
        active: stats.active,
        completed: stats.completed,
    }])
    .to_string()
}

pub fn task_json(task: &Task) -> serde_json::Value {
    serde_json::json!({
        "id": task.id,
        "text": task.text,
        "completed": task.completed,
        "createdAt": task.created_at,
    })
}

pub fn view_json(view: &ViewModel) -> Result<String, AppError> {
    Ok(serde_json::to_string(view)?)
}
