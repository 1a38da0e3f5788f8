// crates/smelter-cli/src/cmd/recipes.rs

use anyhow::Context;
use clap::{Args, Subcommand};
use smelter_core::recipe::patch;

use smelter_cli::io::recipe_dir;

#[derive(Args)]
pub struct RecipesArgs {
    #[command(subcommand)]
    pub cmd: RecipesCmd,
}

#[derive(Subcommand)]
pub enum RecipesCmd {
    /// Stamp `byproduct: false` onto every ingredient entry, rewriting in place
    Patch(PatchArgs),

    /// Verify every ingredient entry carries a boolean `byproduct`
    Check(CheckArgs),
}

#[derive(Args)]
pub struct PatchArgs {
    /// Recipe directory (every entry is treated as a JSON document)
    #[arg(long, default_value = recipe_dir::DEFAULT_DIR)]
    pub dir: String,

    /// Parse and patch in memory, report, write nothing back
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}

#[derive(Args)]
pub struct CheckArgs {
    /// Recipe directory
    #[arg(long, default_value = recipe_dir::DEFAULT_DIR)]
    pub dir: String,
}

pub fn run(args: RecipesArgs) -> anyhow::Result<()> {
    match args.cmd {
        RecipesCmd::Patch(a) => cmd_patch(a),
        RecipesCmd::Check(a) => cmd_check(a),
    }
}

fn cmd_patch(a: PatchArgs) -> anyhow::Result<()> {
    let files = recipe_dir::list_files(&a.dir)?;

    let mut patched = 0usize;
    let mut flagged = 0usize;
    let mut overwritten = 0usize;

    // First failure aborts the batch; files already rewritten stay rewritten,
    // files after the bad one stay untouched.
    for path in &files {
        let mut doc = recipe_dir::load_doc(path)?;
        let stats = patch::flag_byproducts(&mut doc)
            .with_context(|| format!("patch {}", path.display()))?;
        if !a.dry_run {
            recipe_dir::save_doc(path, &doc)?;
        }
        log::debug!("patched {}: {} entries", path.display(), stats.flagged);
        patched += 1;
        flagged += stats.flagged;
        overwritten += stats.overwritten;
    }

    eprintln!("--- recipes patch ---");
    eprintln!("dir          = {}", a.dir);
    eprintln!("files        = {}", patched);
    eprintln!("flagged      = {}", flagged);
    eprintln!("overwritten  = {}", overwritten);
    if a.dry_run {
        eprintln!("dry_run      = true (nothing written)");
    }

    Ok(())
}

fn cmd_check(a: CheckArgs) -> anyhow::Result<()> {
    let files = recipe_dir::list_files(&a.dir)?;

    let mut entries = 0usize;
    let mut missing = 0usize;
    let mut non_bool = 0usize;
    let mut dirty_files = 0usize;

    for path in &files {
        let doc = recipe_dir::load_doc(path)?;
        let stats = patch::verify_byproducts(&doc)
            .with_context(|| format!("check {}", path.display()))?;
        if !stats.is_clean() {
            log::warn!(
                "{}: {} entries missing byproduct, {} non-boolean",
                path.display(),
                stats.missing,
                stats.non_bool
            );
            dirty_files += 1;
        }
        entries += stats.entries;
        missing += stats.missing;
        non_bool += stats.non_bool;
    }

    eprintln!("--- recipes check ---");
    eprintln!("dir          = {}", a.dir);
    eprintln!("files        = {}", files.len());
    eprintln!("entries      = {}", entries);
    eprintln!("missing      = {}", missing);
    eprintln!("non_bool     = {}", non_bool);

    if missing > 0 || non_bool > 0 {
        anyhow::bail!("{dirty_files} file(s) carry unflagged ingredient entries");
    }
    Ok(())
}
