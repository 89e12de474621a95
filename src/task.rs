//! Task entity model.
//!
//! A `Task` is either a plain item or a premium item decorated with an icon.
//! The variant is a tag on the task rather than a separate type, so rendering
//! and persistence are each written once and branch on `TaskKind`.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::fields::NodeState;

/// Display format for creation and edit timestamps.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Session-scoped identity of a task in the list.
pub type TaskId = u64;

/// The two task variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskKind {
    Base,
    Premium { icon_ref: String },
}

/// A single task.
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub text: String,
    pub completed: bool,
    pub kind: TaskKind,
    created_at: DateTime<Local>,
    pub edited_at: Option<DateTime<Local>>,
}

/// Plain-data form of a task as written to the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub text: String,
    pub completed: bool,
    pub created: DateTime<Local>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// Projection of one task into the view.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskView {
    pub id: TaskId,
    pub checked: bool,
    pub text: String,
    pub date_label: String,
    pub struck: bool,
    pub icon: Option<String>,
    pub highlighted: bool,
    pub editing: bool,
}

impl Task {
    /// Create a base task. Returns `None` when the trimmed text is empty.
    pub fn new(text: &str) -> Option<Self> {
        Self::with_kind(text, TaskKind::Base)
    }

    /// Create a premium task decorated with `icon_ref`.
    pub fn premium(text: &str, icon_ref: &str) -> Option<Self> {
        Self::with_kind(
            text,
            TaskKind::Premium {
                icon_ref: icon_ref.to_string(),
            },
        )
    }

    fn with_kind(text: &str, kind: TaskKind) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        Some(Self::with_created(text, kind, Local::now()))
    }

    /// Build a task with a known creation time, without validating the text.
    pub fn with_created(text: &str, kind: TaskKind, created_at: DateTime<Local>) -> Self {
        Task {
            text: text.to_string(),
            completed: false,
            kind,
            created_at,
            edited_at: None,
        }
    }

    /// Rebuild a task from its stored record.
    pub fn from_record(record: TaskRecord) -> Self {
        let kind = match record.icon {
            Some(icon_ref) => TaskKind::Premium { icon_ref },
            None => TaskKind::Base,
        };
        let mut task = Self::with_created(&record.text, kind, record.created);
        task.completed = record.completed;
        task
    }

    pub fn created_at(&self) -> DateTime<Local> {
        self.created_at
    }

    pub fn icon_ref(&self) -> Option<&str> {
        match &self.kind {
            TaskKind::Base => None,
            TaskKind::Premium { icon_ref } => Some(icon_ref),
        }
    }

    /// The date label shown next to the text.
    pub fn date_label(&self) -> String {
        match self.edited_at {
            Some(at) => format!("Edited: {}", at.format(TIMESTAMP_FORMAT)),
            None => format!("Created: {}", self.created_at.format(TIMESTAMP_FORMAT)),
        }
    }

    /// The record persisted for this task. Edit time is display-only.
    pub fn to_record(&self) -> TaskRecord {
        TaskRecord {
            text: self.text.clone(),
            completed: self.completed,
            created: self.created_at,
            icon: self.icon_ref().map(str::to_string),
        }
    }

    /// Project the task into a view node.
    pub fn render(&self, id: TaskId, state: NodeState, highlighted: bool) -> TaskView {
        TaskView {
            id,
            checked: self.completed,
            text: self.text.clone(),
            date_label: self.date_label(),
            struck: self.completed,
            icon: self.icon_ref().map(str::to_string),
            highlighted,
            editing: state == NodeState::Editing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_new_rejects_blank_text() {
        assert!(Task::new("").is_none());
        assert!(Task::new("   \t ").is_none());
        assert!(Task::premium("  ", "icon.png").is_none());
    }

    #[test]
    fn test_new_trims_and_defaults() {
        let task = Task::new("  buy milk ").unwrap();
        assert_eq!(task.text, "buy milk");
        assert!(!task.completed);
        assert_eq!(task.kind, TaskKind::Base);
        assert!(task.edited_at.is_none());
        assert!(task.date_label().starts_with("Created: "));
    }

    #[test]
    fn test_premium_renders_icon() {
        let task = Task::premium("water plants", "icons/leaf.png").unwrap();
        let view = task.render(7, NodeState::Normal, false);
        assert_eq!(view.icon.as_deref(), Some("icons/leaf.png"));
        assert_eq!(view.id, 7);

        let base = Task::new("water plants").unwrap().render(8, NodeState::Editing, true);
        assert!(base.icon.is_none());
        assert!(base.editing);
        assert!(base.highlighted);
    }

    #[test]
    fn test_record_keeps_variant_and_creation_time() {
        let at = Local.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
        let mut task = Task::with_created(
            "file taxes",
            TaskKind::Premium { icon_ref: "tax.png".into() },
            at,
        );
        task.completed = true;
        task.edited_at = Some(Local.with_ymd_and_hms(2024, 3, 2, 9, 30, 0).unwrap());

        let record = task.to_record();
        assert_eq!(record.created, at);
        assert_eq!(record.icon.as_deref(), Some("tax.png"));

        let back = Task::from_record(record);
        assert_eq!(back.text, "file taxes");
        assert!(back.completed);
        assert_eq!(back.created_at(), at);
        assert!(back.edited_at.is_none());
    }

    #[test]
    fn test_base_record_omits_icon_field() {
        let task = Task::new("read").unwrap();
        let json = serde_json::to_string(&task.to_record()).unwrap();
        assert!(!json.contains("icon"));
        assert!(json.contains("\"completed\":false"));
    }

    #[test]
    fn test_date_label_switches_after_edit() {
        let at = Local.with_ymd_and_hms(2024, 1, 5, 8, 0, 0).unwrap();
        let mut task = Task::with_created("call bob", TaskKind::Base, at);
        assert_eq!(task.date_label(), "Created: 2024-01-05 08:00:00");
        task.edited_at = Some(Local.with_ymd_and_hms(2024, 1, 6, 10, 15, 0).unwrap());
        assert_eq!(task.date_label(), "Edited: 2024-01-06 10:15:00");
    }
}
