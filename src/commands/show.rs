use crate::error::Result;
use crate::facade::Planner;
use crate::output::{self, Format};
use crate::store::workspace::Workspace;

pub fn run(id: String, format: Format) -> Result<()> {
    let ws = Workspace::discover()?;
    let planner = Planner::from_workspace(&ws)?;
    let task_id = planner.resolve_task_id(&id)?;
    let task = planner.get_task(task_id)?;
    output::print_task(&task, format)
}
