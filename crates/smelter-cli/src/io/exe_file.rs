// crates/smelter-cli/src/io/exe_file.rs

use anyhow::{Context, Result};

/// Read a target binary whole; the resource walkers borrow from it.
pub fn load(path: &str) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("read binary {path}"))
}

/// Write an exported icon container. Overwrites silently, like the original
/// extractor.
pub fn write(path: &str, bytes: &[u8]) -> Result<()> {
    std::fs::write(path, bytes).with_context(|| format!("write icon {path}"))?;
    Ok(())
}
