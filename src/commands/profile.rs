use crate::error::Result;
use crate::facade::Planner;
use crate::output::{self, Format};
use crate::store::workspace::Workspace;

pub fn run(format: Format) -> Result<()> {
    let ws = Workspace::discover()?;
    let planner = Planner::from_workspace(&ws)?;
    let profile = planner.profile()?;
    output::print_profile(&profile, format)
}
