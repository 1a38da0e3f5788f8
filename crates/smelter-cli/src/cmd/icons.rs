// crates/smelter-cli/src/cmd/icons.rs

use anyhow::Context;
use clap::{Args, Subcommand};
use smelter_core::icon::container;
use smelter_core::icon::group::GroupIconEntry;
use smelter_core::icon::info::{self, ImageInfo};
use smelter_core::IconExtractor;

use smelter_cli::io::exe_file;

#[derive(Args)]
pub struct IconsArgs {
    #[command(subcommand)]
    pub cmd: IconsCmd,
}

#[derive(Subcommand)]
pub enum IconsCmd {
    /// Print one line per icon group in the binary's resource section
    List(ListArgs),

    /// Rebuild one icon group as a standalone .ico container and write it out
    Export(ExportArgs),

    /// Per-image breakdown of one icon group (kind, geometry, content id)
    Inspect(InspectArgs),
}

#[derive(Args)]
pub struct ListArgs {
    /// Path to the PE binary (.exe / .dll)
    pub exe: String,

    /// Emit one JSON object per line instead of the text listing
    #[arg(long, default_value_t = false)]
    pub jsonl: bool,
}

#[derive(Args)]
pub struct ExportArgs {
    /// Path to the PE binary (.exe / .dll)
    pub exe: String,

    /// Output path. Default: the input path with `.png` appended.
    #[arg(long)]
    pub out: Option<String>,

    /// Which group to export, by list index
    #[arg(long, default_value_t = 0)]
    pub index: usize,
}

#[derive(Args)]
pub struct InspectArgs {
    /// Path to the PE binary (.exe / .dll)
    pub exe: String,

    /// Which group to inspect, by list index
    #[arg(long, default_value_t = 0)]
    pub index: usize,
}

pub fn run(args: IconsArgs) -> anyhow::Result<()> {
    match args.cmd {
        IconsCmd::List(a) => cmd_list(a),
        IconsCmd::Export(a) => cmd_export(a),
        IconsCmd::Inspect(a) => cmd_inspect(a),
    }
}

fn cmd_list(a: ListArgs) -> anyhow::Result<()> {
    let bytes = exe_file::load(&a.exe)?;
    log::debug!("{}: {} bytes", a.exe, bytes.len());
    let extractor = IconExtractor::new(&bytes).with_context(|| format!("parse {}", a.exe))?;

    for (idx, entry) in extractor.group_icons().iter().enumerate() {
        if a.jsonl {
            println!(
                "{{\"index\":{},\"id\":{},\"offset\":{}}}",
                idx, entry.name, entry.offset
            );
        } else {
            println!(
                "Index: {}    ID: {}({:#x})    Offset: {:#x}",
                idx, entry.name, entry.name, entry.offset
            );
        }
    }
    Ok(())
}

fn cmd_export(a: ExportArgs) -> anyhow::Result<()> {
    let bytes = exe_file::load(&a.exe)?;
    let extractor = IconExtractor::new(&bytes).with_context(|| format!("parse {}", a.exe))?;

    let images = extractor.image_entries(a.index)?;
    let ico = container::build(&images);

    let out_path = a.out.unwrap_or_else(|| format!("{}.png", a.exe));
    exe_file::write(&out_path, &ico)?;

    eprintln!("--- icons export ---");
    eprintln!("group        = {}", a.index);
    eprintln!("images       = {}", images.len());
    eprintln!("out          = {}", out_path);
    eprintln!("bytes        = {}", ico.len());

    Ok(())
}

fn cmd_inspect(a: InspectArgs) -> anyhow::Result<()> {
    let bytes = exe_file::load(&a.exe)?;
    let extractor = IconExtractor::new(&bytes).with_context(|| format!("parse {}", a.exe))?;
    let images = extractor.image_entries(a.index)?;

    println!("exe          = {}", a.exe);
    println!("machine      = {:#06x}", extractor.machine());
    println!("group_index  = {}", a.index);
    println!("group_count  = {}", extractor.group_count());
    println!("images       = {}", images.len());

    for (i, (entry, data)) in images.iter().enumerate() {
        let probe = info::probe(data).with_context(|| format!("probe image {i}"))?;
        println!(
            "image[{}] id={} kind={} size={}x{} depth={} bytes={} content_id={}",
            i,
            entry.id,
            probe.kind.label(),
            probe.width,
            probe.height,
            probe.bit_depth,
            probe.bytes,
            probe.content_id
        );
        diagnostics(i, entry, &probe);
    }

    Ok(())
}

fn diagnostics(i: usize, entry: &GroupIconEntry, probe: &ImageInfo) {
    if !probe.checksum_ok {
        println!("WARN: image[{i}] png IHDR checksum mismatch");
    }
    if probe.width != entry.pixel_width() || probe.height != entry.pixel_height() {
        println!(
            "WARN: image[{}] directory says {}x{} but the blob reports {}x{}",
            i,
            entry.pixel_width(),
            entry.pixel_height(),
            probe.width,
            probe.height
        );
    }
    if entry.bytes_in_res as usize != probe.bytes {
        println!(
            "WARN: image[{}] bytes_in_res={} differs from the stored blob ({} bytes)",
            i, entry.bytes_in_res, probe.bytes
        );
    }
}
