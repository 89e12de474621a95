//! Command handlers.
//!
//! Each handler runs against an explicit [`Context`], mutates the task list,
//! and writes the full list back to storage when anything changed. Invalid
//! input, empty targets and declined prompts are silent no-ops reported as
//! [`Outcome::Unchanged`]; only storage writes can fail.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::config::Config;
use crate::error::Result;
use crate::fields::{SortOrder, VariantPolicy};
use crate::list::TaskList;
use crate::prompt::Prompter;
use crate::store::{KeyValueStore, TaskStorage};
use crate::task::{Task, TaskId};

pub const REMOVE_ALL_PROMPT: &str = "Remove all tasks including uncompleted ones?";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Changed,
    Unchanged,
}

/// Everything a command handler touches.
pub struct Context<S> {
    pub list: TaskList,
    pub storage: TaskStorage<S>,
    pub variant: VariantPolicy,
    pub icon_ref: String,
    rng: StdRng,
}

impl<S: KeyValueStore> Context<S> {
    /// Load the stored list and build the session context.
    pub fn open(store: S, config: &Config) -> Self {
        let storage = TaskStorage::new(store);
        let list = TaskList::from_records(storage.load());
        debug!(count = list.len(), "loaded tasks");
        Context {
            list,
            storage,
            variant: config.variant,
            icon_ref: config.icon_ref.clone(),
            rng: StdRng::from_entropy(),
        }
    }

    /// Replace the random source, e.g. with a seeded one.
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    fn persist(&mut self) -> Result<Outcome> {
        let records = self.list.records();
        self.storage.save(&records)?;
        Ok(Outcome::Changed)
    }

    fn build_task(&mut self, text: &str) -> Option<Task> {
        let premium = match self.variant {
            VariantPolicy::Random => self.rng.gen_bool(0.5),
            VariantPolicy::Base => false,
            VariantPolicy::Premium => true,
        };
        if premium {
            Task::premium(text, &self.icon_ref)
        } else {
            Task::new(text)
        }
    }
}

/// Add a task at the top of the list.
pub fn add<S: KeyValueStore>(ctx: &mut Context<S>, input: &str) -> Result<Outcome> {
    let Some(task) = ctx.build_task(input) else {
        return Ok(Outcome::Unchanged);
    };
    let id = ctx.list.push_front(task);
    debug!(id, "added task");
    ctx.persist()
}

/// Flip a task's completion state.
pub fn toggle<S: KeyValueStore>(ctx: &mut Context<S>, id: TaskId) -> Result<Outcome> {
    if !ctx.list.toggle(id) {
        return Ok(Outcome::Unchanged);
    }
    debug!(id, "toggled task");
    ctx.persist()
}

/// Put a task into edit mode. False when it is missing or already editing.
pub fn begin_edit<S: KeyValueStore>(ctx: &mut Context<S>, id: TaskId) -> bool {
    ctx.list.begin_edit(id)
}

/// Resolve a pending edit with the user's answer.
pub fn finish_edit<S: KeyValueStore>(
    ctx: &mut Context<S>,
    id: TaskId,
    answer: Option<&str>,
) -> Result<Outcome> {
    if !ctx.list.finish_edit(id, answer) {
        return Ok(Outcome::Unchanged);
    }
    debug!(id, "edited task");
    ctx.persist()
}

/// Edit a task's text through the prompter.
pub fn edit<S: KeyValueStore>(
    ctx: &mut Context<S>,
    id: TaskId,
    prompter: &mut dyn Prompter,
) -> Result<Outcome> {
    if !begin_edit(ctx, id) {
        return Ok(Outcome::Unchanged);
    }
    let current = ctx
        .list
        .get(id)
        .map(|e| e.task.text.clone())
        .unwrap_or_default();
    let answer = prompter.ask_text(&current);
    finish_edit(ctx, id, answer.as_deref())
}

pub fn remove<S: KeyValueStore>(ctx: &mut Context<S>, id: TaskId) -> Result<Outcome> {
    if !ctx.list.remove(id) {
        return Ok(Outcome::Unchanged);
    }
    debug!(id, "removed task");
    ctx.persist()
}

pub fn remove_completed<S: KeyValueStore>(ctx: &mut Context<S>) -> Result<Outcome> {
    let removed = ctx.list.remove_completed();
    if removed == 0 {
        return Ok(Outcome::Unchanged);
    }
    debug!(removed, "removed completed tasks");
    ctx.persist()
}

/// Clear the list, asking first when any task is still open.
pub fn remove_all<S: KeyValueStore>(
    ctx: &mut Context<S>,
    prompter: &mut dyn Prompter,
) -> Result<Outcome> {
    if ctx.list.is_empty() {
        return Ok(Outcome::Unchanged);
    }
    if ctx.list.has_uncompleted() && !prompter.ask_confirm(REMOVE_ALL_PROMPT) {
        debug!("remove all declined");
        return Ok(Outcome::Unchanged);
    }
    ctx.list.clear();
    debug!("removed all tasks");
    ctx.persist()
}

/// Reorder by creation time. The new order is not written on its own.
pub fn sort<S: KeyValueStore>(ctx: &mut Context<S>, order: SortOrder) -> Outcome {
    ctx.list.sort(order);
    Outcome::Changed
}

/// Highlight one task chosen uniformly at random.
pub fn pick_random<S: KeyValueStore>(ctx: &mut Context<S>) -> Option<TaskId> {
    if ctx.list.is_empty() {
        return None;
    }
    ctx.list.set_highlight(None);
    let index = ctx.rng.gen_range(0..ctx.list.len());
    let id = ctx.list.id_at(index);
    ctx.list.set_highlight(id);
    id
}

/// Drop the persisted list. The in-memory list is left alone.
pub fn clear_storage<S: KeyValueStore>(ctx: &mut Context<S>) -> Result<Outcome> {
    ctx.storage.clear()?;
    Ok(Outcome::Changed)
}
