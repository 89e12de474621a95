//! # tl - terminal task list
//!
//! A small task list with an interactive terminal UI and a scriptable CLI.
//!
//! ## Key Features
//!
//! - **Two task variants**: plain tasks, and premium tasks decorated with an icon
//! - **Completion toggling** with strikethrough rendering
//! - **Bulk removal**: remove completed tasks, or everything (with confirmation
//!   while anything is still open)
//! - **Sorting** by creation time and **random picks**
//! - **Local storage**: one JSON key-value file, the list living under the `tasks` key
//!
//! ## Quick Start
//!
//! ```bash
//! # Launch the TUI
//! tl ui
//!
//! # Add a task via CLI
//! tl add "Water the plants"
//!
//! # List, toggle and pick
//! tl list
//! tl toggle 1
//! tl pick
//! ```
//!
//! Data is stored in `~/.tasklist/store.json` unless `--store` says otherwise.
//! Logs go to `tasklist.log` next to the store; set `RUST_LOG` for more detail.

use clap::Parser;

pub mod cli;
pub mod cmd;
pub mod commands;
pub mod config;
pub mod error;
pub mod fields;
pub mod list;
pub mod logging;
pub mod prompt;
pub mod store;
pub mod task;
pub mod tui {
    pub mod app;
    pub mod colors;
    pub mod enums;
    pub mod input;
    pub mod run;
    pub mod utils;
}

use cli::Cli;
use cmd::*;
use commands::Context;
use config::Config;
use store::FileStore;

fn main() {
    let cli = Cli::parse();
    let config = Config::from_cli(&cli);

    if let Commands::Completions { shell } = cli.command {
        cmd_completions(shell);
        return;
    }

    if let Err(e) = std::fs::create_dir_all(config.data_dir()) {
        eprintln!(
            "Failed to create data directory {}: {}",
            config.data_dir().display(),
            e
        );
        std::process::exit(1);
    }
    if let Err(e) = logging::init(&config.log_path) {
        eprintln!("Logging disabled, cannot open {}: {}", config.log_path.display(), e);
    }

    let mut ctx = Context::open(FileStore::new(&config.store_path), &config);

    match cli.command {
        Commands::Completions { .. } => unreachable!("completions handled above"),
        Commands::Ui => cmd_ui(ctx),
        Commands::Add { text } => cmd_add(&mut ctx, text),
        Commands::List => cmd_list(&ctx),
        Commands::Toggle { position } => cmd_toggle(&mut ctx, position),
        Commands::Edit { position, text } => cmd_edit(&mut ctx, position, text),
        Commands::Remove { position } => cmd_remove(&mut ctx, position),
        Commands::RemoveCompleted => cmd_remove_completed(&mut ctx),
        Commands::RemoveAll { yes } => cmd_remove_all(&mut ctx, yes),
        Commands::Sort { order } => cmd_sort(&mut ctx, order),
        Commands::Pick => cmd_pick(&mut ctx),
        Commands::ClearStorage => cmd_clear_storage(&mut ctx),
    }
}
