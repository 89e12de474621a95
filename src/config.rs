//! Runtime configuration assembled from the command line.

use std::path::{Path, PathBuf};

use crate::cli::Cli;
use crate::fields::VariantPolicy;

pub const DEFAULT_ICON: &str = "icons/premium.png";
pub const STORE_FILE: &str = "store.json";
pub const LOG_FILE: &str = "tasklist.log";

#[derive(Debug, Clone)]
pub struct Config {
    pub store_path: PathBuf,
    pub log_path: PathBuf,
    pub variant: VariantPolicy,
    pub icon_ref: String,
}

impl Config {
    /// Resolve paths against `~/.tasklist` unless `--store` points elsewhere.
    pub fn from_cli(cli: &Cli) -> Self {
        let data_dir = match cli.store.as_ref() {
            Some(path) => path.parent().unwrap_or_else(|| Path::new(".")).to_path_buf(),
            None => default_data_dir(),
        };
        Config {
            store_path: cli.store.clone().unwrap_or_else(|| data_dir.join(STORE_FILE)),
            log_path: data_dir.join(LOG_FILE),
            variant: cli.variant,
            icon_ref: cli.icon.clone(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        self.store_path.parent().unwrap_or_else(|| Path::new("."))
    }
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = default_data_dir();
        Config {
            store_path: data_dir.join(STORE_FILE),
            log_path: data_dir.join(LOG_FILE),
            variant: VariantPolicy::default(),
            icon_ref: DEFAULT_ICON.to_string(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".tasklist")
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_explicit_store_places_log_beside_it() {
        let cli = Cli::parse_from(["tl", "--store", "/tmp/work/tasks.json", "list"]);
        let config = Config::from_cli(&cli);
        assert_eq!(config.store_path, PathBuf::from("/tmp/work/tasks.json"));
        assert_eq!(config.log_path, PathBuf::from("/tmp/work/tasklist.log"));
        assert_eq!(config.data_dir(), Path::new("/tmp/work"));
    }

    #[test]
    fn test_variant_and_icon_flags() {
        let cli = Cli::parse_from(["tl", "--variant", "premium", "--icon", "star.png", "list"]);
        let config = Config::from_cli(&cli);
        assert_eq!(config.variant, VariantPolicy::Premium);
        assert_eq!(config.icon_ref, "star.png");
        assert!(config.store_path.ends_with(".tasklist/store.json"));
    }
}
