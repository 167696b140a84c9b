use std::path::Path;

use serde::Serialize;
use tracing::debug;

/// Serializes a value as pretty JSON and writes it to `path`, creating parent
/// directories as needed.
pub fn write_json(path: &Path, value: &impl Serialize) -> anyhow::Result<()> {
    let body = serde_json::to_vec_pretty(value)?;

    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }
    std::fs::write(path, &body)?;

    debug!(path = %path.display(), bytes = body.len(), "JSON written");
    Ok(())
}
