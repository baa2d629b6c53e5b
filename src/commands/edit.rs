use crate::commands::parse_date;
use crate::error::Result;
use crate::facade::Planner;
use crate::model::RepeatMask;
use crate::output::{self, Format};
use crate::store::db::TaskPatch;
use crate::store::workspace::Workspace;

#[allow(clippy::too_many_arguments)]
pub fn run(
    id: String,
    title: Option<String>,
    note: Option<String>,
    clear_note: bool,
    due: Option<String>,
    clear_due: bool,
    repeat: Option<String>,
    clear_repeat: bool,
    format: Format,
) -> Result<()> {
    let ws = Workspace::discover()?;
    let planner = Planner::from_workspace(&ws)?;
    let task_id = planner.resolve_task_id(&id)?;

    let mut patch = TaskPatch {
        title,
        ..TaskPatch::default()
    };
    if clear_note {
        patch.note = Some(None);
    } else if note.is_some() {
        patch.note = Some(note);
    }
    if clear_due {
        patch.due_date = Some(None);
    } else if let Some(d) = due {
        patch.due_date = Some(Some(parse_date(&d)?));
    }
    if clear_repeat {
        patch.repeat_mask = Some(None);
    } else if let Some(r) = repeat {
        patch.repeat_mask = Some(Some(r.parse::<RepeatMask>()?));
    }

    let task = planner.update_task(task_id, patch)?;
    output::print_task(&task, format)
}
