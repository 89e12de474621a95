use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;
use crate::config::DEFAULT_ICON;
use crate::fields::VariantPolicy;

/// Task list with completion toggling, random picks and a file-backed store.
/// Storage defaults to ~/.tasklist/store.json or a path passed via --store.
#[derive(Parser)]
#[command(name = "tl", version, about = "Terminal task list")]
pub struct Cli {
    /// Path to the JSON key-value store file.
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    /// How new tasks pick their variant: random | base | premium.
    #[arg(long, global = true, value_enum, default_value_t = VariantPolicy::Random)]
    pub variant: VariantPolicy,

    /// Icon reference attached to premium tasks.
    #[arg(long, global = true, default_value = DEFAULT_ICON)]
    pub icon: String,

    #[command(subcommand)]
    pub command: Commands,
}
