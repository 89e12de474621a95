//! Color constants for the terminal user interface.

use ratatui::style::Color;

/// Background of the randomly picked task.
pub const PICK_RED: Color = Color::Rgb(224, 110, 110);
/// Title bar and status bar.
pub const SLATE: Color = Color::Rgb(40, 60, 90);
/// Confirmation dialog.
pub const DARK_RED: Color = Color::Rgb(114, 0, 0);
/// Premium task icon marker.
pub const GOLD: Color = Color::Rgb(255, 215, 0);
