use std::path::Path;

use crate::error::Result;
use crate::output::Format;
use crate::store::workspace::Workspace;

pub fn run(dir: &Path, format: Format) -> Result<()> {
    let ws = Workspace::init(dir)?;
    match format {
        Format::Json => println!(
            "{}",
            serde_json::json!({ "initialized": ws.root(), "owner_id": ws.owner_id() })
        ),
        _ => println!(
            "initialized lifequest workspace at {} (owner {})",
            ws.root().display(),
            ws.owner_id()
        ),
    }
    Ok(())
}
