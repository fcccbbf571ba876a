use clap::{CommandFactory, Parser};
use std::collections::HashMap;
use std::io::{self, BufRead};
use taskmaster_cli::cli::{Cli, Command, collect_config_overrides};
use taskmaster_cli::output;
use taskmaster_core::config::{self, Config, Palette};
use taskmaster_core::controller::{Cycle, Intent, Outcome, TaskController};
use taskmaster_core::error::AppError;
use taskmaster_core::logging;
use taskmaster_core::notify::notifier_for;
use taskmaster_core::storage::{FileBlobStore, store_dir};

struct Session {
    controller: TaskController<FileBlobStore>,
    palette: Palette,
    aliases: HashMap<String, String>,
}

impl Session {
    fn open(config: &Config) -> Result<Self, AppError> {
        let dir = store_dir(config.store_dir.as_deref())?;
        let controller =
            TaskController::load(FileBlobStore::new(dir), notifier_for(config.notifications));
        Ok(Self {
            controller,
            palette: config::palette_for_theme(config.theme.as_deref()),
            aliases: config.aliases.clone(),
        })
    }
}

fn load_config(raw_overrides: &[String]) -> Result<Config, AppError> {
    let loaded = config::load_config_with_fallback();
    if let Some(err) = loaded.error {
        eprintln!("WARNING: config ignored: {err}");
    }

    let overrides = collect_config_overrides(raw_overrides).map_err(AppError::invalid_input)?;
    let config = config::merge_overrides(&loaded.config, &overrides);

    if let Err(err) = logging::init_logging(config.log_level()) {
        eprintln!("WARNING: {err}");
    }
    Ok(config)
}

fn print_task(json: bool, verb: &str, cycle: &Cycle) {
    let task = match &cycle.outcome {
        Outcome::Added(task)
        | Outcome::Toggled(task)
        | Outcome::Deleted(task)
        | Outcome::Edited(task) => task,
        _ => return,
    };

    if json {
        println!("{}", output::task_json(task));
    } else {
        println!("{verb} task: {} ({})", task.text, task.id);
    }
}

fn print_view(session: &Session, json: bool, cycle: &Cycle) -> Result<(), AppError> {
    if json {
        println!("{}", output::view_json(&cycle.view)?);
    } else {
        println!("{}", output::format_view(&cycle.view, &session.palette));
    }
    Ok(())
}

fn run_command(session: &mut Session, cli: Cli) -> Result<(), AppError> {
    let json = cli.json;
    tracing::debug!(command = ?cli.command, json, "running command");
    let controller = &mut session.controller;

    match cli.command {
        Command::Add { text } => {
            controller.dispatch(Intent::SetInput(text.unwrap_or_default()))?;
            let cycle = controller.dispatch(Intent::Submit)?;
            print_task(json, "Added", &cycle);
        }
        Command::Toggle { id } => {
            let cycle = controller.dispatch(Intent::Toggle(id))?;
            let verb = match &cycle.outcome {
                Outcome::Toggled(task) if task.completed => "Completed",
                _ => "Reopened",
            };
            print_task(json, verb, &cycle);
        }
        Command::Delete { id } => {
            let cycle = controller.dispatch(Intent::Delete(id))?;
            print_task(json, "Deleted", &cycle);
        }
        Command::Edit { id, text } => {
            let cycle = controller.dispatch(Intent::StartEdit(id))?;
            match text {
                Some(text) if cycle.outcome == Outcome::EditStarted(id) => {
                    let cycle = controller.dispatch(Intent::CommitEdit { id, text })?;
                    print_task(json, "Updated", &cycle);
                }
                Some(_) => {}
                None => print_view(session, json, &cycle)?,
            }
        }
        Command::Save { text } => {
            match controller.editing() {
                Some(id) => {
                    let cycle = controller.dispatch(Intent::CommitEdit { id, text })?;
                    print_task(json, "Updated", &cycle);
                }
                None => {
                    eprintln!("No task is being edited; run `edit <id>` first in a session")
                }
            }
        }
        Command::Cancel => {
            let cycle = controller.dispatch(Intent::CancelEdit)?;
            print_view(session, json, &cycle)?;
        }
        Command::Filter { filter } => {
            let cycle = controller.dispatch(Intent::SetFilter(filter))?;
            print_view(session, json, &cycle)?;
        }
        Command::List { filter } => {
            let cycle = match filter {
                Some(filter) => controller.dispatch(Intent::SetFilter(filter))?,
                None => Cycle {
                    outcome: Outcome::Ignored,
                    view: controller.render(),
                    notice: None,
                },
            };
            print_view(session, json, &cycle)?;
        }
        Command::Stats => {
            let stats = controller.render().stats;
            if json {
                println!("{}", serde_json::to_string(&stats)?);
            } else {
                println!("{}", output::format_stats_table(&stats));
            }
        }
        Command::ClearCompleted => {
            let cycle = controller.dispatch(Intent::ClearCompleted)?;
            if let Outcome::Cleared(count) = cycle.outcome {
                if json {
                    println!("{}", serde_json::json!({ "cleared": count }));
                } else if count > 0 {
                    println!("Cleared {count} completed task(s)");
                }
            }
        }
        Command::Export { dir } => {
            let dir = match dir {
                Some(dir) => dir,
                None => std::env::current_dir()?,
            };
            let cycle = controller.dispatch(Intent::Export { dir })?;
            if let Outcome::Exported { path, count } = &cycle.outcome {
                if json {
                    println!(
                        "{}",
                        serde_json::json!({ "path": path.display().to_string(), "count": count })
                    );
                } else {
                    println!("Exported {count} task(s) to {}", path.display());
                }
            }
        }
        Command::Focus => {
            let cycle = controller.dispatch(Intent::FocusInput)?;
            if cycle.view.input.focused && !json {
                println!("Input focused");
            }
        }
    }

    Ok(())
}

fn normalize_parse_error(err: clap::Error) -> AppError {
    let rendered = err.to_string();
    let first_line = rendered.lines().next().unwrap_or("invalid command").trim();
    let message = first_line
        .strip_prefix("error: ")
        .unwrap_or(first_line)
        .to_string();
    AppError::invalid_input(message)
}

/// Splits an interactive line into arguments, honouring double quotes and
/// backslash escapes inside them.
fn split_command_line(line: &str) -> Result<Vec<String>, AppError> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut quoted = false;
    let mut escape = false;

    for ch in line.chars() {
        if escape {
            if ch != '"' && ch != '\\' {
                current.push('\\');
            }
            current.push(ch);
            escape = false;
            continue;
        }

        match ch {
            '\\' if in_quotes => escape = true,
            '"' => {
                in_quotes = !in_quotes;
                quoted = true;
            }
            ch if ch.is_whitespace() && !in_quotes => {
                if !current.is_empty() || quoted {
                    args.push(std::mem::take(&mut current));
                }
                quoted = false;
            }
            ch => current.push(ch),
        }
    }

    if in_quotes {
        return Err(AppError::invalid_input("unterminated quote in command"));
    }

    if !current.is_empty() || quoted {
        args.push(current);
    }

    Ok(args)
}

fn expand_alias(
    aliases: &HashMap<String, String>,
    args: Vec<String>,
) -> Result<Vec<String>, AppError> {
    let Some(expansion) = args.first().and_then(|first| aliases.get(first)) else {
        return Ok(args);
    };

    let mut expanded = split_command_line(expansion)?;
    expanded.extend(args.into_iter().skip(1));
    Ok(expanded)
}

fn print_help() {
    let mut cmd = Cli::command();
    let help = cmd.render_help();
    println!("{help}");
}

fn run_interactive(session: &mut Session) -> Result<(), AppError> {
    let mut input = String::new();
    let stdin = io::stdin();
    let mut stdin_lock = stdin.lock();

    loop {
        input.clear();
        let bytes = stdin_lock.read_line(&mut input)?;

        if bytes == 0 {
            break;
        }

        let line = input.trim();
        if line.is_empty() {
            continue;
        }

        if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
            break;
        }

        if line == "help" || line == "?" {
            print_help();
            continue;
        }

        let args = match split_command_line(line)
            .and_then(|args| expand_alias(&session.aliases, args))
        {
            Ok(args) if !args.is_empty() => args,
            Ok(_) => continue,
            Err(err) => {
                eprintln!("ERROR: {}", err);
                continue;
            }
        };

        let mut argv = Vec::with_capacity(args.len() + 1);
        argv.push("taskmaster".to_string());
        argv.extend(args);

        let cli = match Cli::try_parse_from(argv) {
            Ok(cli) => cli,
            Err(err) => {
                eprintln!("ERROR: {}", normalize_parse_error(err));
                continue;
            }
        };

        if !cli.config_override.is_empty() {
            eprintln!(
                "ERROR: {}",
                AppError::invalid_input("--config-override is only accepted at startup")
            );
            continue;
        }

        if let Err(err) = run_command(session, cli) {
            eprintln!("ERROR: {}", err);
        }
    }

    Ok(())
}

fn run_one_shot(cli: Cli) -> Result<(), AppError> {
    let config = load_config(&cli.config_override)?;
    let mut session = Session::open(&config)?;
    run_command(&mut session, cli)
}

fn start_interactive() -> Result<(), AppError> {
    let config = load_config(&[])?;
    let mut session = Session::open(&config)?;
    run_interactive(&mut session)
}

fn main() {
    let mut args = std::env::args_os();
    args.next();
    if args.next().is_none() {
        if let Err(err) = start_interactive() {
            eprintln!("ERROR: {}", err);
            std::process::exit(1);
        }
        return;
    }

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if !err.use_stderr() => {
            let _ = err.print();
            return;
        }
        Err(err) => {
            eprintln!("ERROR: {}", normalize_parse_error(err));
            std::process::exit(1);
        }
    };

    if let Err(err) = run_one_shot(cli) {
        eprintln!("ERROR: {}", err);
        std::process::exit(1);
    }
}
