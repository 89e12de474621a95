//! The ordered in-memory task list and its projection into view nodes.
//!
//! `TaskList` is the single source of truth for the session. Views are
//! rebuilt from it on every render, and storage is written from it directly,
//! so nothing is ever read back out of a rendered label.

use std::cmp::Ordering;

use chrono::Local;

use crate::fields::{NodeState, SortOrder};
use crate::task::{Task, TaskId, TaskRecord, TaskView};

/// One task plus its session identity and interaction state.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskEntry {
    pub id: TaskId,
    pub task: Task,
    pub state: NodeState,
}

impl TaskEntry {
    fn new(id: TaskId, task: Task) -> Self {
        TaskEntry {
            id,
            task,
            state: NodeState::Normal,
        }
    }
}

#[derive(Debug, Default)]
pub struct TaskList {
    entries: Vec<TaskEntry>,
    next_id: TaskId,
    highlighted: Option<TaskId>,
}

impl TaskList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the list from stored records, keeping their order.
    pub fn from_records(records: Vec<TaskRecord>) -> Self {
        let mut list = TaskList::new();
        for record in records {
            list.push_back(Task::from_record(record));
        }
        list
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[TaskEntry] {
        &self.entries
    }

    pub fn get(&self, id: TaskId) -> Option<&TaskEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    fn get_mut(&mut self, id: TaskId) -> Option<&mut TaskEntry> {
        self.entries.iter_mut().find(|e| e.id == id)
    }

    /// Id of the task shown at a zero-based position.
    pub fn id_at(&self, index: usize) -> Option<TaskId> {
        self.entries.get(index).map(|e| e.id)
    }

    pub fn position(&self, id: TaskId) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id)
    }

    fn allocate_id(&mut self) -> TaskId {
        self.next_id += 1;
        self.next_id
    }

    /// Insert at the top of the list.
    pub fn push_front(&mut self, task: Task) -> TaskId {
        let id = self.allocate_id();
        self.entries.insert(0, TaskEntry::new(id, task));
        id
    }

    /// Append at the bottom of the list.
    pub fn push_back(&mut self, task: Task) -> TaskId {
        let id = self.allocate_id();
        self.entries.push(TaskEntry::new(id, task));
        id
    }

    /// Flip completion. Returns false when the task is missing or being edited.
    pub fn toggle(&mut self, id: TaskId) -> bool {
        match self.get_mut(id) {
            Some(entry) if entry.state == NodeState::Normal => {
                entry.task.completed = !entry.task.completed;
                true
            }
            _ => false,
        }
    }

    /// Move a task into edit mode. Returns false if it is missing or already editing.
    pub fn begin_edit(&mut self, id: TaskId) -> bool {
        match self.get_mut(id) {
            Some(entry) if entry.state == NodeState::Normal => {
                entry.state = NodeState::Editing;
                true
            }
            _ => false,
        }
    }

    /// Leave edit mode, applying `new_text` if one was given.
    ///
    /// A cancelled or blank answer leaves text and date untouched. Returns
    /// true only when the text was replaced.
    pub fn finish_edit(&mut self, id: TaskId, new_text: Option<&str>) -> bool {
        let Some(entry) = self.get_mut(id) else {
            return false;
        };
        if entry.state != NodeState::Editing {
            return false;
        }
        entry.state = NodeState::Normal;

        match new_text.map(str::trim) {
            Some(text) if !text.is_empty() => {
                entry.task.text = text.to_string();
                entry.task.edited_at = Some(Local::now());
                true
            }
            _ => false,
        }
    }

    pub fn remove(&mut self, id: TaskId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        if self.highlighted == Some(id) {
            self.highlighted = None;
        }
        self.entries.len() != before
    }

    /// Drop every completed task, returning how many went.
    pub fn remove_completed(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| !e.task.completed);
        if let Some(id) = self.highlighted {
            if self.get(id).is_none() {
                self.highlighted = None;
            }
        }
        before - self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.highlighted = None;
    }

    pub fn has_uncompleted(&self) -> bool {
        self.entries.iter().any(|e| !e.task.completed)
    }

    /// Stable sort by creation time.
    pub fn sort(&mut self, order: SortOrder) {
        self.entries.sort_by(|a, b| {
            let ord: Ordering = a.task.created_at().cmp(&b.task.created_at());
            match order {
                SortOrder::Asc => ord,
                SortOrder::Desc => ord.reverse(),
            }
        });
    }

    pub fn highlighted(&self) -> Option<TaskId> {
        self.highlighted
    }

    pub fn set_highlight(&mut self, id: Option<TaskId>) {
        self.highlighted = id.filter(|id| self.get(*id).is_some());
    }

    /// Project every task into a view node, top to bottom.
    pub fn render(&self) -> Vec<TaskView> {
        self.entries
            .iter()
            .map(|e| e.task.render(e.id, e.state, self.highlighted == Some(e.id)))
            .collect()
    }

    /// Plain records for persistence, top to bottom.
    pub fn records(&self) -> Vec<TaskRecord> {
        self.entries.iter().map(|e| e.task.to_record()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::TaskKind;
    use chrono::{Duration, TimeZone};

    fn dated(text: &str, minutes: i64) -> Task {
        let base = Local.with_ymd_and_hms(2024, 2, 1, 9, 0, 0).unwrap();
        Task::with_created(text, TaskKind::Base, base + Duration::minutes(minutes))
    }

    fn texts(list: &TaskList) -> Vec<String> {
        list.render().into_iter().map(|v| v.text).collect()
    }

    #[test]
    fn test_push_front_and_unique_ids() {
        let mut list = TaskList::new();
        let a = list.push_front(dated("a", 0));
        let b = list.push_front(dated("b", 1));
        assert_ne!(a, b);
        assert_eq!(texts(&list), vec!["b", "a"]);
        list.remove(b);
        let c = list.push_back(dated("c", 2));
        assert_ne!(c, b);
    }

    #[test]
    fn test_toggle_twice_restores_view() {
        let mut list = TaskList::new();
        let id = list.push_front(dated("a", 0));
        let before = list.render();
        assert!(list.toggle(id));
        let toggled = &list.render()[0];
        assert!(toggled.checked && toggled.struck);
        assert!(list.toggle(id));
        assert_eq!(list.render(), before);
    }

    #[test]
    fn test_toggle_suppressed_while_editing() {
        let mut list = TaskList::new();
        let id = list.push_front(dated("a", 0));
        assert!(list.begin_edit(id));
        assert!(!list.begin_edit(id));
        assert!(!list.toggle(id));
        assert!(!list.entries()[0].task.completed);
        list.finish_edit(id, None);
        assert!(list.toggle(id));
    }

    #[test]
    fn test_finish_edit_applies_or_cancels() {
        let mut list = TaskList::new();
        let id = list.push_front(dated("draft", 0));

        list.begin_edit(id);
        assert!(!list.finish_edit(id, None));
        assert_eq!(list.entries()[0].task.text, "draft");
        assert!(list.entries()[0].task.edited_at.is_none());
        assert_eq!(list.entries()[0].state, NodeState::Normal);

        list.begin_edit(id);
        assert!(!list.finish_edit(id, Some("   ")));
        assert_eq!(list.entries()[0].task.text, "draft");

        list.begin_edit(id);
        assert!(list.finish_edit(id, Some(" final ")));
        let view = &list.render()[0];
        assert_eq!(view.text, "final");
        assert!(view.date_label.starts_with("Edited: "));
        assert!(!view.editing);
    }

    #[test]
    fn test_finish_edit_requires_edit_mode() {
        let mut list = TaskList::new();
        let id = list.push_front(dated("draft", 0));
        assert!(!list.finish_edit(id, Some("other")));
        assert_eq!(list.entries()[0].task.text, "draft");
    }

    #[test]
    fn test_remove_completed_keeps_unchecked() {
        let mut list = TaskList::new();
        let a = list.push_back(dated("a", 0));
        list.push_back(dated("b", 1));
        let c = list.push_back(dated("c", 2));
        list.toggle(a);
        list.toggle(c);
        assert_eq!(list.remove_completed(), 2);
        assert_eq!(texts(&list), vec!["b"]);
        assert_eq!(list.remove_completed(), 0);
    }

    #[test]
    fn test_sort_is_stable_in_both_directions() {
        let mut list = TaskList::new();
        list.push_back(dated("late", 10));
        list.push_back(dated("tie-1", 5));
        list.push_back(dated("early", 0));
        list.push_back(dated("tie-2", 5));

        list.sort(SortOrder::Asc);
        assert_eq!(texts(&list), vec!["early", "tie-1", "tie-2", "late"]);
        list.sort(SortOrder::Desc);
        assert_eq!(texts(&list), vec!["late", "tie-1", "tie-2", "early"]);
    }

    #[test]
    fn test_sort_desc_reverses_asc_without_ties() {
        let mut list = TaskList::new();
        for (i, t) in ["c", "a", "d", "b"].iter().enumerate() {
            list.push_back(dated(t, [2, 0, 3, 1][i]));
        }
        list.sort(SortOrder::Asc);
        let mut asc = texts(&list);
        list.sort(SortOrder::Desc);
        asc.reverse();
        assert_eq!(texts(&list), asc);
    }

    #[test]
    fn test_highlight_follows_removal() {
        let mut list = TaskList::new();
        let a = list.push_back(dated("a", 0));
        list.set_highlight(Some(a));
        assert!(list.render()[0].highlighted);
        list.remove(a);
        assert_eq!(list.highlighted(), None);
        list.set_highlight(Some(a));
        assert_eq!(list.highlighted(), None);
    }

    #[test]
    fn test_records_round_trip_through_from_records() {
        let mut list = TaskList::new();
        let a = list.push_back(dated("a", 0));
        list.push_back(Task::premium("b", "b.png").unwrap());
        list.toggle(a);

        let rebuilt = TaskList::from_records(list.records());
        assert_eq!(rebuilt.len(), 2);
        let views = rebuilt.render();
        assert_eq!(views[0].text, "a");
        assert!(views[0].checked);
        assert_eq!(views[1].icon.as_deref(), Some("b.png"));
        assert!(!views[1].checked);
    }
}
