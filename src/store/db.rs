use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::types::Type;
use rusqlite::{Connection, Row, params};
use uuid::Uuid;

use crate::error::{LifeQuestError, Result};
use crate::model::{Goal, Profile, RepeatMask, Scope, Task};

/// Partial update for a task. Outer `Option` = whether to touch the field;
/// inner `Option` = the new value, with `None` clearing the column.
#[derive(Debug, Default, Clone)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub note: Option<Option<String>>,
    pub due_date: Option<Option<NaiveDate>>,
    pub repeat_mask: Option<Option<RepeatMask>>,
    pub goal_id: Option<Option<Uuid>>,
    pub done: Option<bool>,
}

impl TaskPatch {
    pub fn done(done: bool) -> Self {
        Self {
            done: Some(done),
            ..Self::default()
        }
    }

    fn apply(&self, task: &mut Task) {
        if let Some(ref title) = self.title {
            task.title = title.clone();
        }
        if let Some(ref note) = self.note {
            task.note = note.clone();
        }
        if let Some(due) = self.due_date {
            task.due_date = due;
        }
        if let Some(mask) = self.repeat_mask {
            task.repeat_mask = mask;
        }
        if let Some(goal) = self.goal_id {
            task.goal_id = goal;
        }
        if let Some(done) = self.done {
            task.done = done;
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct GoalPatch {
    pub title: Option<String>,
    pub scope: Option<Scope>,
    pub target_count: Option<u32>,
    pub start_date: Option<Option<NaiveDate>>,
    pub end_date: Option<Option<NaiveDate>>,
}

impl GoalPatch {
    fn apply(&self, goal: &mut Goal) {
        if let Some(ref title) = self.title {
            goal.title = title.clone();
        }
        if let Some(scope) = self.scope {
            goal.scope = scope;
        }
        if let Some(target) = self.target_count {
            goal.target_count = target;
        }
        if let Some(start) = self.start_date {
            goal.start_date = start;
        }
        if let Some(end) = self.end_date {
            goal.end_date = end;
        }
    }
}

/// Owner-scoped record store over SQLite. The row-level isolation the
/// original delegated to the backend's access policy is enforced here by
/// every query carrying an `owner_id` predicate.
pub struct Store {
    conn: Connection,
}

impl Store {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
        let store = Self { conn };
        store.create_tables()?;
        Ok(store)
    }

    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        let store = Self { conn };
        store.create_tables()?;
        Ok(store)
    }

    fn create_tables(&self) -> Result<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS tasks (
                id TEXT PRIMARY KEY,
                owner_id TEXT NOT NULL,
                title TEXT NOT NULL,
                note TEXT,
                due_date TEXT,
                repeat_mask INTEGER,
                done INTEGER NOT NULL DEFAULT 0,
                goal_id TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS goals (
                id TEXT PRIMARY KEY,
                owner_id TEXT NOT NULL,
                title TEXT NOT NULL,
                scope TEXT NOT NULL DEFAULT 'short',
                target_count INTEGER NOT NULL DEFAULT 0,
                achieved_count INTEGER NOT NULL DEFAULT 0,
                start_date TEXT,
                end_date TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS profiles (
                owner_id TEXT PRIMARY KEY,
                xp INTEGER NOT NULL DEFAULT 0,
                updated_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_tasks_owner ON tasks(owner_id);
            CREATE INDEX IF NOT EXISTS idx_tasks_goal ON tasks(goal_id);
            CREATE INDEX IF NOT EXISTS idx_goals_owner ON goals(owner_id);
            CREATE TABLE IF NOT EXISTS metadata (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            INSERT OR IGNORE INTO metadata (key, value) VALUES ('schema_version', '1');",
        )?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Tasks
    // ------------------------------------------------------------------

    /// All tasks for an owner, newest first (ISO-8601 text sorts
    /// chronologically).
    pub fn list_tasks(&self, owner: Uuid) -> Result<Vec<Task>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, owner_id, title, note, due_date, repeat_mask, done, goal_id,
                    created_at, updated_at
             FROM tasks WHERE owner_id = ?1 ORDER BY created_at DESC",
        )?;
        let rows = stmt.query_map(params![owner.to_string()], task_from_row)?;
        let mut tasks = Vec::new();
        for row in rows {
            tasks.push(row?);
        }
        Ok(tasks)
    }

    pub fn get_task(&self, owner: Uuid, id: Uuid) -> Result<Task> {
        let mut stmt = self.conn.prepare(
            "SELECT id, owner_id, title, note, due_date, repeat_mask, done, goal_id,
                    created_at, updated_at
             FROM tasks WHERE id = ?1 AND owner_id = ?2",
        )?;
        stmt.query_row(params![id.to_string(), owner.to_string()], task_from_row)
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => LifeQuestError::TaskNotFound(id),
                other => other.into(),
            })
    }

    /// Persist a fully-built task row and hand it back for replace-by-id
    /// reconciliation.
    pub fn insert_task(&self, task: Task) -> Result<Task> {
        self.conn.execute(
            "INSERT INTO tasks (id, owner_id, title, note, due_date, repeat_mask, done,
                                goal_id, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                task.id.to_string(),
                task.owner_id.to_string(),
                task.title,
                task.note,
                task.due_date.map(|d| d.to_string()),
                task.repeat_mask.map(|m| m.bits() as i64),
                task.done,
                task.goal_id.map(|g| g.to_string()),
                task.created_at.to_rfc3339(),
                task.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(task)
    }

    /// Apply a partial update and return the full post-write row,
    /// `updated_at` refreshed.
    pub fn update_task(&self, owner: Uuid, id: Uuid, patch: &TaskPatch) -> Result<Task> {
        let mut task = self.get_task(owner, id)?;
        patch.apply(&mut task);
        task.updated_at = Utc::now();
        self.conn.execute(
            "UPDATE tasks SET title = ?1, note = ?2, due_date = ?3, repeat_mask = ?4,
                              done = ?5, goal_id = ?6, updated_at = ?7
             WHERE id = ?8 AND owner_id = ?9",
            params![
                task.title,
                task.note,
                task.due_date.map(|d| d.to_string()),
                task.repeat_mask.map(|m| m.bits() as i64),
                task.done,
                task.goal_id.map(|g| g.to_string()),
                task.updated_at.to_rfc3339(),
                id.to_string(),
                owner.to_string(),
            ],
        )?;
        Ok(task)
    }

    pub fn delete_task(&self, owner: Uuid, id: Uuid) -> Result<()> {
        let affected = self.conn.execute(
            "DELETE FROM tasks WHERE id = ?1 AND owner_id = ?2",
            params![id.to_string(), owner.to_string()],
        )?;
        if affected == 0 {
            return Err(LifeQuestError::TaskNotFound(id));
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Goals
    // ------------------------------------------------------------------

    pub fn list_goals(&self, owner: Uuid) -> Result<Vec<Goal>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, owner_id, title, scope, target_count, achieved_count,
                    start_date, end_date, created_at, updated_at
             FROM goals WHERE owner_id = ?1 ORDER BY created_at DESC",
        )?;
        let rows = stmt.query_map(params![owner.to_string()], goal_from_row)?;
        let mut goals = Vec::new();
        for row in rows {
            goals.push(row?);
        }
        Ok(goals)
    }

    pub fn get_goal(&self, owner: Uuid, id: Uuid) -> Result<Goal> {
        let mut stmt = self.conn.prepare(
            "SELECT id, owner_id, title, scope, target_count, achieved_count,
                    start_date, end_date, created_at, updated_at
             FROM goals WHERE id = ?1 AND owner_id = ?2",
        )?;
        stmt.query_row(params![id.to_string(), owner.to_string()], goal_from_row)
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => LifeQuestError::GoalNotFound(id),
                other => other.into(),
            })
    }

    pub fn insert_goal(&self, goal: Goal) -> Result<Goal> {
        self.conn.execute(
            "INSERT INTO goals (id, owner_id, title, scope, target_count, achieved_count,
                                start_date, end_date, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                goal.id.to_string(),
                goal.owner_id.to_string(),
                goal.title,
                goal.scope.to_string(),
                goal.target_count,
                goal.achieved_count,
                goal.start_date.map(|d| d.to_string()),
                goal.end_date.map(|d| d.to_string()),
                goal.created_at.to_rfc3339(),
                goal.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(goal)
    }

    pub fn update_goal(&self, owner: Uuid, id: Uuid, patch: &GoalPatch) -> Result<Goal> {
        let mut goal = self.get_goal(owner, id)?;
        patch.apply(&mut goal);
        goal.updated_at = Utc::now();
        self.conn.execute(
            "UPDATE goals SET title = ?1, scope = ?2, target_count = ?3,
                              start_date = ?4, end_date = ?5, updated_at = ?6
             WHERE id = ?7 AND owner_id = ?8",
            params![
                goal.title,
                goal.scope.to_string(),
                goal.target_count,
                goal.start_date.map(|d| d.to_string()),
                goal.end_date.map(|d| d.to_string()),
                goal.updated_at.to_rfc3339(),
                id.to_string(),
                owner.to_string(),
            ],
        )?;
        Ok(goal)
    }

    /// Delete a goal and null out `goal_id` on every task that referenced it,
    /// in one transaction, so no dangling references survive.
    pub fn delete_goal(&self, owner: Uuid, id: Uuid) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "UPDATE tasks SET goal_id = NULL, updated_at = ?1
             WHERE goal_id = ?2 AND owner_id = ?3",
            params![Utc::now().to_rfc3339(), id.to_string(), owner.to_string()],
        )?;
        let affected = tx.execute(
            "DELETE FROM goals WHERE id = ?1 AND owner_id = ?2",
            params![id.to_string(), owner.to_string()],
        )?;
        if affected == 0 {
            return Err(LifeQuestError::GoalNotFound(id));
        }
        tx.commit()?;
        Ok(())
    }

    /// Shift `achieved_count`, saturating at zero.
    pub fn adjust_goal_achieved(&self, owner: Uuid, id: Uuid, delta: i64) -> Result<Goal> {
        let affected = self.conn.execute(
            "UPDATE goals SET achieved_count = MAX(0, achieved_count + ?1), updated_at = ?2
             WHERE id = ?3 AND owner_id = ?4",
            params![
                delta,
                Utc::now().to_rfc3339(),
                id.to_string(),
                owner.to_string()
            ],
        )?;
        if affected == 0 {
            return Err(LifeQuestError::GoalNotFound(id));
        }
        self.get_goal(owner, id)
    }

    // ------------------------------------------------------------------
    // Profiles
    // ------------------------------------------------------------------

    /// Fetch the owner's profile, creating a zero-XP row on first access.
    pub fn fetch_profile(&self, owner: Uuid) -> Result<Profile> {
        self.conn.execute(
            "INSERT OR IGNORE INTO profiles (owner_id, xp, updated_at) VALUES (?1, 0, ?2)",
            params![owner.to_string(), Utc::now().to_rfc3339()],
        )?;
        let mut stmt = self
            .conn
            .prepare("SELECT owner_id, xp, updated_at FROM profiles WHERE owner_id = ?1")?;
        let profile = stmt.query_row(params![owner.to_string()], profile_from_row)?;
        Ok(profile)
    }

    /// Shift XP, saturating at zero, and return the updated profile.
    pub fn add_xp(&self, owner: Uuid, delta: i64) -> Result<Profile> {
        self.fetch_profile(owner)?;
        self.conn.execute(
            "UPDATE profiles SET xp = MAX(0, xp + ?1), updated_at = ?2 WHERE owner_id = ?3",
            params![delta, Utc::now().to_rfc3339(), owner.to_string()],
        )?;
        self.fetch_profile(owner)
    }
}

fn column_uuid(row: &Row<'_>, idx: usize) -> rusqlite::Result<Uuid> {
    let text: String = row.get(idx)?;
    Uuid::parse_str(&text)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn column_uuid_opt(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<Uuid>> {
    let text: Option<String> = row.get(idx)?;
    text.map(|t| {
        Uuid::parse_str(&t)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
    })
    .transpose()
}

fn column_date_opt(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<NaiveDate>> {
    let text: Option<String> = row.get(idx)?;
    text.map(|t| {
        NaiveDate::parse_from_str(&t, "%Y-%m-%d")
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
    })
    .transpose()
}

fn column_timestamp(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let text: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&text)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn task_from_row(row: &Row<'_>) -> rusqlite::Result<Task> {
    let mask: Option<u8> = row.get(5)?;
    let repeat_mask = mask
        .map(|bits| {
            RepeatMask::new(bits).ok_or_else(|| {
                rusqlite::Error::FromSqlConversionFailure(
                    5,
                    Type::Integer,
                    Box::new(LifeQuestError::InvalidRepeatMask(bits as u32)),
                )
            })
        })
        .transpose()?;
    Ok(Task {
        id: column_uuid(row, 0)?,
        owner_id: column_uuid(row, 1)?,
        title: row.get(2)?,
        note: row.get(3)?,
        due_date: column_date_opt(row, 4)?,
        repeat_mask,
        done: row.get(6)?,
        goal_id: column_uuid_opt(row, 7)?,
        created_at: column_timestamp(row, 8)?,
        updated_at: column_timestamp(row, 9)?,
    })
}

fn goal_from_row(row: &Row<'_>) -> rusqlite::Result<Goal> {
    let scope_text: String = row.get(3)?;
    let scope = match scope_text.as_str() {
        "short" => Scope::Short,
        "long" => Scope::Long,
        other => {
            return Err(rusqlite::Error::FromSqlConversionFailure(
                3,
                Type::Text,
                Box::new(LifeQuestError::CorruptRow(format!(
                    "unknown goal scope '{other}'"
                ))),
            ));
        }
    };
    Ok(Goal {
        id: column_uuid(row, 0)?,
        owner_id: column_uuid(row, 1)?,
        title: row.get(2)?,
        scope,
        target_count: row.get(4)?,
        achieved_count: row.get(5)?,
        start_date: column_date_opt(row, 6)?,
        end_date: column_date_opt(row, 7)?,
        created_at: column_timestamp(row, 8)?,
        updated_at: column_timestamp(row, 9)?,
    })
}

fn profile_from_row(row: &Row<'_>) -> rusqlite::Result<Profile> {
    Ok(Profile {
        owner_id: column_uuid(row, 0)?,
        xp: row.get(1)?,
        updated_at: column_timestamp(row, 2)?,
    })
}
