use std::{fs, path::Path};

use anyhow::{Context, Result};

pub fn read_to_string(path: &str) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read prompt file {}", path))
}

/// Writes `content`, creating missing parent directories.
pub fn write_string(path: &str, content: &str) -> Result<()> {
    if let Some(dir) = Path::new(path).parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    }
    fs::write(path, content).with_context(|| format!("Failed to write reply to {}", path))
}
