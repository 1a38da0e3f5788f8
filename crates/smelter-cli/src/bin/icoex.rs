use anyhow::{Context, Result};
use clap::Parser;

use smelter_cli::{io::exe_file, logging};
use smelter_core::IconExtractor;

/// List the icon groups of a PE binary, then export the first group next to
/// it. One-shot equivalent of `smelter-cli icons list` + `icons export`.
#[derive(Parser, Debug)]
#[command(name = "icoex")]
struct Args {
    /// Path to the PE binary (.exe / .dll)
    path: String,

    /// Base path for the export; `.png` is appended. Defaults to PATH.
    out_base: Option<String>,
}

fn main() -> Result<()> {
    logging::init();
    let a = Args::parse();

    let bytes = exe_file::load(&a.path)?;
    let extractor = IconExtractor::new(&bytes).with_context(|| format!("parse {}", a.path))?;

    for (idx, entry) in extractor.group_icons().iter().enumerate() {
        println!(
            "Index: {}    ID: {}({:#x})    Offset: {:#x}",
            idx, entry.name, entry.name, entry.offset
        );
    }

    let ico = extractor.get_icon(0)?;
    let out_path = format!("{}.png", a.out_base.unwrap_or_else(|| a.path.clone()));
    exe_file::write(&out_path, &ico)?;

    eprintln!("GROUPS={}", extractor.group_count());
    eprintln!("OUT_BYTES={}", ico.len());
    eprintln!("OUT_PATH={}", out_path);

    Ok(())
}
