use chrono::Local;

use crate::engine::clock;
use crate::error::Result;
use crate::facade::Planner;
use crate::output::{self, Format};
use crate::store::workspace::Workspace;

pub fn run(
    done: bool,
    pending: bool,
    failed: bool,
    goal: Option<String>,
    due: Option<String>,
    format: Format,
) -> Result<()> {
    let ws = Workspace::discover()?;
    let planner = Planner::from_workspace(&ws)?;
    let mut tasks = planner.list_tasks()?;

    if done {
        tasks.retain(|t| t.done);
    }
    if pending {
        tasks.retain(|t| !t.done);
    }
    if failed {
        // Failure is view-computed from the due date and the clock, never a
        // stored flag.
        let now = Local::now().naive_local();
        tasks.retain(|t| clock::is_failed(t, now));
    }
    if let Some(ref g) = goal {
        let goal_id = planner.resolve_goal_id(g)?;
        tasks.retain(|t| t.goal_id == Some(goal_id));
    }
    if let Some(ref d) = due {
        let due_date = crate::commands::parse_date(d)?;
        tasks.retain(|t| t.due_date == Some(due_date));
    }

    output::print_tasks(&tasks, format)
}
