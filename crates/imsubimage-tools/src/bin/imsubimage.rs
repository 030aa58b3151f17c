use std::path::PathBuf;
use std::process;

use anyhow::Context;
use clap::Parser;
use imsubimage_fits::{run_task, FitsFileSink, FitsFileSource, TaskConfig};

/// Create a (sub)image from a region of a FITS image.
#[derive(Parser, Debug)]
#[command(name = "imsubimage", version)]
struct Cli {
    /// Input image name.
    imagename: PathBuf,
    /// Output image name. Nothing is written when omitted.
    #[arg(short, long)]
    outfile: Option<PathBuf>,
    /// Rectangle on the first two axes: blcx,blcy,trcx,trcy (inclusive).
    #[arg(long = "box", value_name = "BLCX,BLCY,TRCX,TRCY")]
    bbox: Option<String>,
    /// Per-axis half-open pixel ranges, e.g. "10:20,,0:1".
    #[arg(short, long)]
    region: Option<String>,
    /// Mask expression: an image name, optionally compared to a number.
    #[arg(short, long)]
    mask: Option<String>,
    /// Stretch degenerate mask axes over the image.
    #[arg(long)]
    stretch: bool,
    /// Drop degenerate axes.
    #[arg(long)]
    dropdeg: bool,
    /// Degenerate axes to keep when dropping, zero-based.
    #[arg(long, value_delimiter = ',')]
    keepaxes: Vec<usize>,
    /// Replace an existing output file.
    #[arg(long)]
    overwrite: bool,
    /// Log each stage.
    #[arg(short, long)]
    verbose: bool,
}

fn history(cli: &Cli) -> Vec<String> {
    let mut lines = vec![format!("imsubimage {}", cli.imagename.display())];
    if let Some(region) = &cli.region {
        lines.push(format!("  region={region}"));
    }
    if let Some(bbox) = &cli.bbox {
        lines.push(format!("  box={bbox}"));
    }
    if let Some(mask) = &cli.mask {
        lines.push(format!("  mask={mask}"));
    }
    if cli.dropdeg {
        lines.push(format!("  dropdeg keepaxes={:?}", cli.keepaxes));
    }
    lines
}

fn run(cli: &Cli) -> anyhow::Result<String> {
    let mut builder = TaskConfig::builder(&cli.imagename)
        .stretch(cli.stretch)
        .dropdeg(cli.dropdeg)
        .keepaxes(cli.keepaxes.iter().copied())
        .overwrite(cli.overwrite)
        .verbose(cli.verbose);
    if let Some(outfile) = &cli.outfile {
        builder = builder.outfile(outfile);
    }
    if let Some(region) = &cli.region {
        builder = builder.region(region.as_str());
    }
    if let Some(bbox) = &cli.bbox {
        builder = builder.bbox(bbox.as_str());
    }
    if let Some(mask) = &cli.mask {
        builder = builder.mask(mask.as_str());
    }
    let config = builder.build().context("invalid parameters")?;

    let sink = FitsFileSink::new().with_history(history(cli));
    let report = run_task(&config, &FitsFileSource, &sink)
        .with_context(|| format!("imsubimage failed on {}", cli.imagename.display()))?;
    Ok(format!("{report}\n"))
}

fn main() {
    let cli = Cli::parse();
    let level = if cli.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
    log::debug!("{cli:?}");

    match run(&cli) {
        Ok(output) => print!("{output}"),
        Err(err) => {
            eprintln!("Error: {err:#}");
            process::exit(1);
        }
    }
}
