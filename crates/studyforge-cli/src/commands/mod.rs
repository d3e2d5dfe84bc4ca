pub mod analyze;
pub mod compare;
pub mod init;
pub mod plan;
pub mod report;
pub mod track;

use std::path::Path;

use anyhow::{Context, Result};

/// Read a notes file into memory.
pub(crate) fn read_notes(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("failed to read notes file: {}", path.display()))
}
