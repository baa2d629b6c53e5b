use crate::commands::parse_date;
use crate::error::Result;
use crate::facade::{AddTaskOpts, Planner};
use crate::model::RepeatMask;
use crate::output::{self, Format};
use crate::store::workspace::Workspace;

pub fn run(
    title: String,
    note: Option<String>,
    due: Option<String>,
    repeat: Option<String>,
    goal: Option<String>,
    format: Format,
) -> Result<()> {
    let ws = Workspace::discover()?;
    let planner = Planner::from_workspace(&ws)?;

    let due_date = due.map(|d| parse_date(&d)).transpose()?;
    let repeat_mask = repeat.map(|r| r.parse::<RepeatMask>()).transpose()?;
    let goal_id = goal.map(|g| planner.resolve_goal_id(&g)).transpose()?;

    let task = planner.add_task(
        &title,
        AddTaskOpts {
            note,
            due_date,
            repeat_mask,
            goal_id,
        },
    )?;
    output::print_task(&task, format)
}
