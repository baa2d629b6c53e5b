use crate::error::Result;
use crate::facade::Planner;
use crate::output::Format;
use crate::store::workspace::Workspace;

pub fn run(id: String, format: Format) -> Result<()> {
    let ws = Workspace::discover()?;
    let planner = Planner::from_workspace(&ws)?;
    let task_id = planner.resolve_task_id(&id)?;
    planner.remove_task(task_id)?;
    match format {
        Format::Json => println!("{}", serde_json::json!({ "deleted": task_id })),
        _ => println!("deleted task {task_id}"),
    }
    Ok(())
}
