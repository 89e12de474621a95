//! Enumerations shared by the CLI, the configuration and the command handlers.

use clap::ValueEnum;

/// How Add chooses between the base and the premium task variant.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
pub enum VariantPolicy {
    /// Coin flip on every add.
    #[default]
    Random,
    Base,
    Premium,
}

/// Direction for sorting by creation time.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Per-node interaction state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NodeState {
    #[default]
    Normal,
    Editing,
}
