use clap::{Parser, Subcommand};
use std::path::PathBuf;
use taskmaster_core::config::{ConfigOverrides, NotificationMode, slugify};
use taskmaster_core::model::Filter;

#[derive(Parser, Debug)]
#[command(name = "taskmaster", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Override configuration values (format KEY=VALUE)
    #[arg(long = "config-override", value_name = "KEY=VALUE", global = true)]
    pub config_override: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add a new task
    ///
    /// Example: taskmaster add "Buy milk"
    Add { text: Option<String> },
    /// Flip a task between active and completed
    ///
    /// Example: taskmaster toggle 1766219400000
    Toggle { id: u64 },
    /// Delete a task
    ///
    /// Example: taskmaster delete 1766219400000
    Delete { id: u64 },
    /// Start editing a task, or replace its text right away
    ///
    /// Example: taskmaster edit 1766219400000
    /// Example: taskmaster edit 1766219400000 "Buy oat milk"
    Edit { id: u64, text: Option<String> },
    /// Save new text for the task being edited (interactive session only)
    ///
    /// Example: save "Buy oat milk"
    Save { text: String },
    /// Stop editing without changing anything (interactive session only)
    Cancel,
    /// Choose which tasks are shown
    ///
    /// Example: filter active
    Filter {
        #[arg(value_parser = parse_filter)]
        filter: Filter,
    },
    /// List tasks
    ///
    /// Example: taskmaster list
    /// Example: taskmaster list --filter completed
    List {
        #[arg(long, value_parser = parse_filter)]
        filter: Option<Filter>,
    },
    /// Show task counts
    Stats,
    /// Remove every completed task
    ClearCompleted,
    /// Write all tasks to tasks-YYYY-MM-DD.json
    ///
    /// Example: taskmaster export --dir ~/backups
    Export {
        #[arg(long)]
        dir: Option<PathBuf>,
    },
    /// Focus the task input
    Focus,
}

fn parse_filter(raw: &str) -> Result<Filter, String> {
    raw.parse::<Filter>().map_err(|err| err.message().to_string())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOverrideTarget {
    Theme,
    Notifications,
    LogLevel,
    StoreDir,
    Alias(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedConfigOverride {
    pub target: ConfigOverrideTarget,
    pub value: String,
}

/// Parse a raw `KEY=VALUE` override string into a structured target.
pub fn parse_config_override(raw: &str) -> Result<ParsedConfigOverride, String> {
    let (key_raw, value_raw) = raw
        .trim()
        .split_once('=')
        .ok_or_else(|| "override must be in KEY=VALUE format".to_string())?;

    let value = value_raw.trim().to_string();
    let (field, remainder) = key_raw
        .split_once('.')
        .map(|(field, rest)| (field, Some(rest.trim())))
        .unwrap_or((key_raw, None));

    let canonical_field = slugify(field);
    if canonical_field.is_empty() {
        return Err("override key cannot be empty".to_string());
    }

    let scalar = |target: ConfigOverrideTarget| match remainder {
        Some(_) => Err(format!("{canonical_field} override cannot have subfields")),
        None => Ok(ParsedConfigOverride {
            target,
            value: value.clone(),
        }),
    };

    match canonical_field.as_str() {
        "theme" => scalar(ConfigOverrideTarget::Theme),
        "notifications" | "notify" => scalar(ConfigOverrideTarget::Notifications),
        "log_level" | "log" => scalar(ConfigOverrideTarget::LogLevel),
        "store_dir" | "store" => scalar(ConfigOverrideTarget::StoreDir),
        "aliases" | "alias" => {
            let alias_name = remainder
                .filter(|segment| !segment.is_empty())
                .ok_or_else(|| "aliases override requires an alias name".to_string())?;
            Ok(ParsedConfigOverride {
                target: ConfigOverrideTarget::Alias(alias_name.to_string()),
                value: value.clone(),
            })
        }
        other => Err(format!("unknown config field '{other}'")),
    }
}

pub fn collect_config_overrides(raw: &[String]) -> Result<ConfigOverrides, String> {
    let mut overrides = ConfigOverrides::default();

    for entry in raw {
        let parsed = parse_config_override(entry)?;
        match parsed.target {
            ConfigOverrideTarget::Theme => overrides.theme = Some(parsed.value),
            ConfigOverrideTarget::Notifications => {
                let mode = parsed
                    .value
                    .parse::<NotificationMode>()
                    .map_err(|err| err.message().to_string())?;
                overrides.notifications = Some(mode);
            }
            ConfigOverrideTarget::LogLevel => overrides.log_level = Some(parsed.value),
            ConfigOverrideTarget::StoreDir => {
                overrides.store_dir = Some(PathBuf::from(parsed.value))
            }
            ConfigOverrideTarget::Alias(name) => {
                overrides.aliases.insert(name, parsed.value);
            }
        }
    }

    Ok(overrides)
}
