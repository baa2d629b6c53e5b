use crate::commands::parse_date;
use crate::error::Result;
use crate::facade::{AddGoalOpts, Planner};
use crate::model::Scope;
use crate::output::{self, Format};
use crate::store::db::GoalPatch;
use crate::store::workspace::Workspace;

fn open_planner() -> Result<Planner> {
    let ws = Workspace::discover()?;
    Planner::from_workspace(&ws)
}

pub fn add(
    title: String,
    scope: Scope,
    target: u32,
    start: Option<String>,
    end: Option<String>,
    format: Format,
) -> Result<()> {
    let planner = open_planner()?;
    let goal = planner.add_goal(
        &title,
        scope,
        AddGoalOpts {
            target_count: target,
            start_date: start.map(|d| parse_date(&d)).transpose()?,
            end_date: end.map(|d| parse_date(&d)).transpose()?,
        },
    )?;
    output::print_goal(&goal, format)
}

pub fn list(format: Format) -> Result<()> {
    let planner = open_planner()?;
    let goals = planner.list_goals()?;
    output::print_goals(&goals, format)
}

pub fn show(id: String, format: Format) -> Result<()> {
    let planner = open_planner()?;
    let goal_id = planner.resolve_goal_id(&id)?;
    let goal = planner.get_goal(goal_id)?;
    output::print_goal(&goal, format)?;
    // Linked tasks are a live query; the goal row itself never tracks them.
    let linked: Vec<_> = planner
        .list_tasks()?
        .into_iter()
        .filter(|t| t.goal_id == Some(goal_id))
        .collect();
    if !linked.is_empty() {
        match format {
            Format::Json => println!("{}", serde_json::to_string(&linked)?),
            _ => {
                println!();
                output::print_tasks(&linked, Format::Minimal)?;
            }
        }
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub fn edit(
    id: String,
    title: Option<String>,
    scope: Option<Scope>,
    target: Option<u32>,
    start: Option<String>,
    clear_start: bool,
    end: Option<String>,
    clear_end: bool,
    format: Format,
) -> Result<()> {
    let planner = open_planner()?;
    let goal_id = planner.resolve_goal_id(&id)?;

    let mut patch = GoalPatch {
        title,
        scope,
        target_count: target,
        ..GoalPatch::default()
    };
    if clear_start {
        patch.start_date = Some(None);
    } else if let Some(d) = start {
        patch.start_date = Some(Some(parse_date(&d)?));
    }
    if clear_end {
        patch.end_date = Some(None);
    } else if let Some(d) = end {
        patch.end_date = Some(Some(parse_date(&d)?));
    }

    let goal = planner.update_goal(goal_id, patch)?;
    output::print_goal(&goal, format)
}

pub fn delete(id: String, format: Format) -> Result<()> {
    let planner = open_planner()?;
    let goal_id = planner.resolve_goal_id(&id)?;
    planner.remove_goal(goal_id)?;
    match format {
        Format::Json => println!("{}", serde_json::json!({ "deleted": goal_id })),
        _ => println!("deleted goal {goal_id} (linked tasks kept, links cleared)"),
    }
    Ok(())
}

pub fn assign(task: String, goal: Option<String>, format: Format) -> Result<()> {
    let planner = open_planner()?;
    let task_id = planner.resolve_task_id(&task)?;
    let goal_id = goal.map(|g| planner.resolve_goal_id(&g)).transpose()?;
    let task = planner.assign_task_to_goal(task_id, goal_id)?;
    output::print_task(&task, format)
}
