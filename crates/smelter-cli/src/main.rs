// crates/smelter-cli/src/main.rs

use clap::{Parser, Subcommand};

mod cmd;

#[derive(Parser)]
#[command(name = "smelter-cli")]
#[command(about = "Smelter game-data toolkit CLI", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Recipe document tools (byproduct flagging)
    Recipes(cmd::recipes::RecipesArgs),

    /// Icon resource tools for PE binaries (list/export/inspect)
    Icons(cmd::icons::IconsArgs),
}

fn main() -> anyhow::Result<()> {
    smelter_cli::logging::init();
    let cli = Cli::parse();

    match cli.cmd {
        Commands::Recipes(args) => cmd::recipes::run(args),
        Commands::Icons(args) => cmd::icons::run(args),
    }
}
