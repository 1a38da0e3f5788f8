use anyhow::{Context, Result};
use clap::Parser;

use smelter_cli::{io::recipe_dir, logging};
use smelter_core::recipe::patch;

/// Stamp `byproduct: false` onto every ingredient entry of every recipe file
/// in DIR, rewriting the files in place. One-shot equivalent of
/// `smelter-cli recipes patch`.
#[derive(Parser, Debug)]
#[command(name = "byprod")]
struct Args {
    /// Recipe directory
    #[arg(default_value = recipe_dir::DEFAULT_DIR)]
    dir: String,
}

fn main() -> Result<()> {
    logging::init();
    let a = Args::parse();

    let files = recipe_dir::list_files(&a.dir)?;

    let mut flagged = 0usize;
    for path in &files {
        let mut doc = recipe_dir::load_doc(path)?;
        let stats = patch::flag_byproducts(&mut doc)
            .with_context(|| format!("patch {}", path.display()))?;
        recipe_dir::save_doc(path, &doc)?;
        flagged += stats.flagged;
    }

    eprintln!("FILES={}", files.len());
    eprintln!("FLAGGED={}", flagged);

    Ok(())
}
