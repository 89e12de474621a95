//! Enumerations for TUI state management.

use crate::task::TaskId;

/// Which screen or modal currently receives key input.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum AppState {
    TaskList,
    AddTask,
    /// Edit prompt open for a task that is in edit mode.
    EditTask(TaskId),
    Help,
    /// Remove-all confirmation.
    Confirm,
}
