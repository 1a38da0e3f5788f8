// crates/smelter-cli/src/io/recipe_dir.rs

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::Value;

/// Directory the batch tools default to.
pub const DEFAULT_DIR: &str = "data/Satisfactory/recipes";

/// Every directory entry, ascending filename order. No extension filtering:
/// every entry is handed to the JSON parser and a non-recipe file fails the
/// batch there.
pub fn list_files(dir: &str) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("read recipe dir {dir}"))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<_>>()
        .with_context(|| format!("scan recipe dir {dir}"))?;
    files.sort();
    Ok(files)
}

/// Load one recipe document.
pub fn load_doc(path: &Path) -> Result<Value> {
    let bytes = fs::read(path).with_context(|| format!("read recipe {}", path.display()))?;
    let doc =
        serde_json::from_slice(&bytes).with_context(|| format!("parse recipe {}", path.display()))?;
    Ok(doc)
}

/// Rewrite a recipe document in place, compact single-line JSON. The bytes
/// land in a sibling temp file first and are persisted over the original, so
/// an interrupted run cannot leave a half-written document behind. The
/// original's permissions carry over; a file that does not exist yet keeps
/// the temp file's mode.
pub fn save_doc(path: &Path, doc: &Value) -> Result<()> {
    let text = serde_json::to_string(doc)
        .with_context(|| format!("serialize recipe {}", path.display()))?;

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("create temp file in {}", dir.display()))?;
    tmp.write_all(text.as_bytes())
        .with_context(|| format!("write recipe {}", path.display()))?;
    if let Ok(meta) = fs::metadata(path) {
        tmp.as_file()
            .set_permissions(meta.permissions())
            .with_context(|| format!("carry permissions of {}", path.display()))?;
    }
    tmp.persist(path)
        .with_context(|| format!("replace recipe {}", path.display()))?;
    Ok(())
}
