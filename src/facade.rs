use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::error::{LifeQuestError, Result};
use crate::model::{Goal, Profile, RepeatMask, Scope, Task};
use crate::store::db::{GoalPatch, Store, TaskPatch};
use crate::store::workspace::Workspace;

/// XP granted for completing a task, removed again when it is un-completed.
const XP_PER_TASK: i64 = 10;

#[derive(Debug, Default, Clone)]
pub struct AddTaskOpts {
    pub note: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub repeat_mask: Option<RepeatMask>,
    pub goal_id: Option<Uuid>,
}

#[derive(Debug, Default, Clone)]
pub struct AddGoalOpts {
    pub target_count: u32,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// The only write path. Every operation runs under the workspace's owner
/// context and fails fast before the store call on bad preconditions, so a
/// failure never leaves a partial write behind.
pub struct Planner {
    store: Store,
    owner: Uuid,
}

impl Planner {
    pub fn new(store: Store, owner: Uuid) -> Self {
        Self { store, owner }
    }

    pub fn from_workspace(ws: &Workspace) -> Result<Self> {
        Ok(Self::new(ws.store()?, ws.owner_id()))
    }

    pub fn owner(&self) -> Uuid {
        self.owner
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    pub fn list_tasks(&self) -> Result<Vec<Task>> {
        self.store.list_tasks(self.owner)
    }

    pub fn get_task(&self, id: Uuid) -> Result<Task> {
        self.store.get_task(self.owner, id)
    }

    pub fn list_goals(&self) -> Result<Vec<Goal>> {
        self.store.list_goals(self.owner)
    }

    pub fn get_goal(&self, id: Uuid) -> Result<Goal> {
        self.store.get_goal(self.owner, id)
    }

    pub fn profile(&self) -> Result<Profile> {
        self.store.fetch_profile(self.owner)
    }

    /// Resolve a full UUID or a unique hex prefix against the owner's tasks.
    pub fn resolve_task_id(&self, input: &str) -> Result<Uuid> {
        if let Ok(id) = Uuid::parse_str(input) {
            return Ok(id);
        }
        let ids = self.list_tasks()?.into_iter().map(|t| t.id);
        resolve_prefix(input, ids)
    }

    pub fn resolve_goal_id(&self, input: &str) -> Result<Uuid> {
        if let Ok(id) = Uuid::parse_str(input) {
            return Ok(id);
        }
        let ids = self.list_goals()?.into_iter().map(|g| g.id);
        resolve_prefix(input, ids)
    }

    // ------------------------------------------------------------------
    // Task mutations
    // ------------------------------------------------------------------

    pub fn add_task(&self, title: &str, opts: AddTaskOpts) -> Result<Task> {
        let title = title.trim();
        if title.is_empty() {
            return Err(LifeQuestError::EmptyTitle);
        }
        if let Some(goal_id) = opts.goal_id {
            self.get_goal(goal_id)?;
        }
        let now = Utc::now();
        self.store.insert_task(Task {
            id: Uuid::new_v4(),
            owner_id: self.owner,
            title: title.to_string(),
            note: opts.note,
            due_date: opts.due_date,
            repeat_mask: opts.repeat_mask,
            done: false,
            goal_id: opts.goal_id,
            created_at: now,
            updated_at: now,
        })
    }

    /// Flip completion. Patches only `done`; due date and repeat mask stay
    /// untouched. Completing grants XP and bumps the linked goal's achieved
    /// count; un-completing reverses both. A no-op flip awards nothing.
    pub fn toggle_task(&self, id: Uuid, done: bool) -> Result<Task> {
        let current = self.get_task(id)?;
        if current.done == done {
            return Ok(current);
        }
        let updated = self.store.update_task(self.owner, id, &TaskPatch::done(done))?;
        let delta = if done { 1 } else { -1 };
        self.store.add_xp(self.owner, delta * XP_PER_TASK)?;
        if let Some(goal_id) = updated.goal_id {
            self.store.adjust_goal_achieved(self.owner, goal_id, delta)?;
        }
        Ok(updated)
    }

    pub fn update_task(&self, id: Uuid, mut patch: TaskPatch) -> Result<Task> {
        if let Some(ref mut title) = patch.title {
            let trimmed = title.trim();
            if trimmed.is_empty() {
                return Err(LifeQuestError::EmptyTitle);
            }
            *title = trimmed.to_string();
        }
        if let Some(Some(goal_id)) = patch.goal_id {
            self.get_goal(goal_id)?;
        }
        self.store.update_task(self.owner, id, &patch)
    }

    pub fn remove_task(&self, id: Uuid) -> Result<()> {
        self.store.delete_task(self.owner, id)
    }

    pub fn assign_task_to_goal(&self, task_id: Uuid, goal_id: Option<Uuid>) -> Result<Task> {
        if let Some(goal_id) = goal_id {
            self.get_goal(goal_id)?;
        }
        self.store.update_task(
            self.owner,
            task_id,
            &TaskPatch {
                goal_id: Some(goal_id),
                ..TaskPatch::default()
            },
        )
    }

    // ------------------------------------------------------------------
    // Goal mutations
    // ------------------------------------------------------------------

    pub fn add_goal(&self, title: &str, scope: Scope, opts: AddGoalOpts) -> Result<Goal> {
        let title = title.trim();
        if title.is_empty() {
            return Err(LifeQuestError::EmptyTitle);
        }
        let now = Utc::now();
        self.store.insert_goal(Goal {
            id: Uuid::new_v4(),
            owner_id: self.owner,
            title: title.to_string(),
            scope,
            target_count: opts.target_count,
            achieved_count: 0,
            start_date: opts.start_date,
            end_date: opts.end_date,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn update_goal(&self, id: Uuid, mut patch: GoalPatch) -> Result<Goal> {
        if let Some(ref mut title) = patch.title {
            let trimmed = title.trim();
            if trimmed.is_empty() {
                return Err(LifeQuestError::EmptyTitle);
            }
            *title = trimmed.to_string();
        }
        self.store.update_goal(self.owner, id, &patch)
    }

    /// Deleting a goal detaches referencing tasks (their `goal_id` is nulled
    /// in the same transaction) and never cascades into task deletion.
    pub fn remove_goal(&self, id: Uuid) -> Result<()> {
        self.store.delete_goal(self.owner, id)
    }
}

fn resolve_prefix(input: &str, ids: impl Iterator<Item = Uuid>) -> Result<Uuid> {
    let needle = input.to_ascii_lowercase();
    let matches: Vec<Uuid> = ids
        .filter(|id| id.to_string().starts_with(&needle))
        .collect();
    match matches.as_slice() {
        [] => Err(LifeQuestError::UnknownId(input.to_string())),
        [id] => Ok(*id),
        _ => Err(LifeQuestError::AmbiguousId(input.to_string())),
    }
}
