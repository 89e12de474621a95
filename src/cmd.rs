//! Command implementations for the CLI interface.
//!
//! Each subcommand maps onto one command handler in [`crate::commands`]; this
//! module only resolves positions, picks a prompter, and prints the result.

use clap::{CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use crate::cli::Cli;
use crate::commands::{self, Context, Outcome};
use crate::error::{Error, Result};
use crate::fields::SortOrder;
use crate::prompt::{stdin_prompter, Scripted};
use crate::store::KeyValueStore;
use crate::task::{TaskId, TaskView};
use crate::tui::run::run_tui;

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the interactive UI interface.
    Ui,

    /// Add a new task at the top of the list.
    Add {
        /// Task text. Blank text is ignored.
        text: String,
    },

    /// List tasks in stored order.
    List,

    /// Toggle a task between open and completed.
    Toggle {
        /// 1-based position in the list.
        position: usize,
    },

    /// Replace the text of a task.
    Edit {
        /// 1-based position in the list.
        position: usize,
        /// New text. Prompts on stdin when omitted.
        #[arg(long)]
        text: Option<String>,
    },

    /// Remove a single task.
    Remove {
        /// 1-based position in the list.
        position: usize,
    },

    /// Remove every completed task.
    RemoveCompleted,

    /// Remove every task, asking first if any is still open.
    RemoveAll {
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },

    /// Print the list sorted by creation time.
    Sort {
        #[arg(value_enum, default_value_t = SortOrder::Asc)]
        order: SortOrder,
    },

    /// Pick a random task.
    Pick,

    /// Delete the stored list without touching anything else in the store.
    ClearStorage,

    /// Generate shell completion scripts.
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Launch the terminal user interface.
pub fn cmd_ui<S: KeyValueStore>(ctx: Context<S>) {
    if let Err(e) = run_tui(ctx) {
        eprintln!("UI error: {e}");
        std::process::exit(1);
    }
}

/// Map a 1-based position onto a task id.
pub fn resolve_position<S: KeyValueStore>(ctx: &Context<S>, position: usize) -> Result<TaskId> {
    position
        .checked_sub(1)
        .and_then(|index| ctx.list.id_at(index))
        .ok_or(Error::InvalidPosition(position))
}

fn exit_on_error<T>(result: Result<T>) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}

fn report(outcome: Outcome, changed: &str) {
    match outcome {
        Outcome::Changed => println!("{changed}"),
        Outcome::Unchanged => println!("Nothing to do"),
    }
}

pub fn cmd_add<S: KeyValueStore>(ctx: &mut Context<S>, text: String) {
    let outcome = exit_on_error(commands::add(ctx, &text));
    report(outcome, "Added task 1");
}

pub fn cmd_list<S: KeyValueStore>(ctx: &Context<S>) {
    let views = ctx.list.render();
    if views.is_empty() {
        println!("No tasks");
        return;
    }
    print_table(&views);
}

pub fn cmd_toggle<S: KeyValueStore>(ctx: &mut Context<S>, position: usize) {
    let id = exit_on_error(resolve_position(ctx, position));
    exit_on_error(commands::toggle(ctx, id));
    let done = ctx.list.get(id).is_some_and(|e| e.task.completed);
    println!(
        "Task {} marked {}",
        position,
        if done { "completed" } else { "open" }
    );
}

pub fn cmd_edit<S: KeyValueStore>(ctx: &mut Context<S>, position: usize, text: Option<String>) {
    let id = exit_on_error(resolve_position(ctx, position));
    let outcome = match text {
        Some(text) => commands::edit(ctx, id, &mut Scripted::text(Some(&text))),
        None => commands::edit(ctx, id, &mut stdin_prompter()),
    };
    report(exit_on_error(outcome), &format!("Updated task {position}"));
}

pub fn cmd_remove<S: KeyValueStore>(ctx: &mut Context<S>, position: usize) {
    let id = exit_on_error(resolve_position(ctx, position));
    let outcome = exit_on_error(commands::remove(ctx, id));
    report(outcome, &format!("Removed task {position}"));
}

pub fn cmd_remove_completed<S: KeyValueStore>(ctx: &mut Context<S>) {
    let before = ctx.list.len();
    let outcome = exit_on_error(commands::remove_completed(ctx));
    report(
        outcome,
        &format!("Removed {} completed task(s)", before - ctx.list.len()),
    );
}

pub fn cmd_remove_all<S: KeyValueStore>(ctx: &mut Context<S>, yes: bool) {
    let outcome = if yes {
        commands::remove_all(ctx, &mut Scripted::confirm(true))
    } else {
        commands::remove_all(ctx, &mut stdin_prompter())
    };
    report(exit_on_error(outcome), "Removed all tasks");
}

pub fn cmd_sort<S: KeyValueStore>(ctx: &mut Context<S>, order: SortOrder) {
    commands::sort(ctx, order);
    cmd_list(ctx);
}

pub fn cmd_pick<S: KeyValueStore>(ctx: &mut Context<S>) {
    match commands::pick_random(ctx) {
        Some(id) => {
            let position = ctx.list.position(id).map_or(0, |i| i + 1);
            if let Some(entry) = ctx.list.get(id) {
                println!("Picked task {}: {}", position, entry.task.text);
            }
        }
        None => println!("No tasks"),
    }
}

pub fn cmd_clear_storage<S: KeyValueStore>(ctx: &mut Context<S>) {
    exit_on_error(commands::clear_storage(ctx));
    println!("Cleared stored tasks");
}

/// Generate shell completion scripts.
pub fn cmd_completions(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "tl", &mut std::io::stdout());
}

/// Print tasks as a table, one row per view node.
pub fn print_table(views: &[TaskView]) {
    println!("{:<4} {:<4} {:<28} {}", "#", "Done", "Date", "Task");
    for (i, view) in views.iter().enumerate() {
        let icon = view
            .icon
            .as_deref()
            .map(|icon| format!(" [{}]", icon))
            .unwrap_or_default();
        let marker = if view.highlighted { "*" } else { "" };
        println!(
            "{:<4} {:<4} {:<28} {}{}{}",
            format!("{}{}", i + 1, marker),
            if view.checked { "[x]" } else { "[ ]" },
            view.date_label,
            truncate(&view.text, 60),
            icon,
            if view.struck { " (done)" } else { "" },
        );
    }
}

/// Truncate a string to a maximum width, adding ellipsis if needed.
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(width.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::store::MemoryStore;

    #[test]
    fn test_resolve_position_bounds() {
        let mut ctx = Context::open(MemoryStore::new(), &Config::default());
        commands::add(&mut ctx, "a").unwrap();
        commands::add(&mut ctx, "b").unwrap();
        assert_eq!(resolve_position(&ctx, 1).unwrap(), ctx.list.id_at(0).unwrap());
        assert!(matches!(resolve_position(&ctx, 0), Err(Error::InvalidPosition(0))));
        assert!(matches!(resolve_position(&ctx, 3), Err(Error::InvalidPosition(3))));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 5), "abcd…");
        assert_eq!(truncate("abcde", 5), "abcde");
    }
}
