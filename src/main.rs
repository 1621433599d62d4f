use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use coilgen::{generate, InductorJob, InductorKind, JobFile, OutputWriter};
use tracing_subscriber::EnvFilter;

/// Generate a square on-chip inductor as a GDSII mask and a FastHenry netlist.
#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Winding topology: spiral, symmetric, hexagon or octagon
    #[arg(long)]
    kind: Option<InductorKind>,

    /// Inner radius in micrometers
    #[arg(long, value_name = "UM")]
    inner_radius: Option<f64>,

    /// Wire spacing in micrometers
    #[arg(long, value_name = "UM")]
    spacing: Option<f64>,

    /// Wire width in micrometers
    #[arg(long, value_name = "UM")]
    width: Option<f64>,

    /// Number of turns
    #[arg(long)]
    turns: Option<u32>,

    /// Conductor thickness in micrometers
    #[arg(long, value_name = "UM")]
    thickness: Option<f64>,

    /// Spacing between the winding and the guard ring in micrometers
    #[arg(long, value_name = "UM")]
    guard_spacing: Option<f64>,

    /// Guard ring width in micrometers
    #[arg(long, value_name = "UM")]
    guard_width: Option<f64>,

    /// Tap length in micrometers (0 selects the guard spacing)
    #[arg(long, value_name = "UM")]
    tap_length: Option<f64>,

    /// Job file with optional [process] and [inductor] tables
    #[arg(short, long, value_name = "TOML")]
    config: Option<PathBuf>,

    /// Output directory
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    out_dir: PathBuf,

    /// Output file stem (default: inductor_<timestamp>)
    #[arg(long)]
    stem: Option<String>,

    /// Skip the GDSII output
    #[arg(long)]
    no_gds: bool,

    /// Skip the FastHenry output
    #[arg(long)]
    no_netlist: bool,

    /// Generate and summarize without writing files
    #[arg(long)]
    dry_run: bool,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn overrides(&self) -> InductorJob {
        InductorJob {
            kind: self.kind,
            inner_radius: self.inner_radius,
            spacing: self.spacing,
            width: self.width,
            turns: self.turns,
            thickness: self.thickness,
            guard_spacing: self.guard_spacing,
            guard_width: self.guard_width,
            tap_length: self.tap_length,
        }
    }
}

fn init_tracing(verbose: bool) {
    // Default: WARN for everything, INFO for coilgen. RUST_LOG overrides
    // unless --verbose is given.
    let env_filter = if verbose {
        EnvFilter::new("warn,coilgen=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn,coilgen=info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let job = match &cli.config {
        Some(path) => JobFile::load(path)
            .with_context(|| format!("failed to load job file {}", path.display()))?,
        None => JobFile::default(),
    };
    let (kind, spec) = InductorJob::demo()
        .merge(job.inductor)
        .merge(cli.overrides())
        .resolve()
        .context("incomplete inductor parameters")?;

    let generated = generate(kind, spec, &job.process)
        .with_context(|| format!("failed to generate {kind} inductor"))?;
    let derived = generated.layout.derived();
    println!(
        "{kind} inductor: {} turns, area {:.3} um, guard ring {:.3} um, {} mask shapes, {} segments",
        spec.turns,
        derived.area_length,
        derived.guard_ring_length,
        generated.mask.primitives.len(),
        generated.netlist.segments,
    );
    if cli.dry_run {
        return Ok(());
    }

    let writer = OutputWriter::new(&cli.out_dir, cli.stem.clone());
    let gds = if cli.no_gds {
        None
    } else {
        Some(generated.mask.to_gds_library(writer.stem())?)
    };
    let netlist = (!cli.no_netlist).then_some(&generated.netlist);
    let written = writer
        .write(gds, netlist)
        .with_context(|| format!("failed to write outputs to {}", cli.out_dir.display()))?;
    for path in written {
        println!("wrote {}", path.display());
    }
    Ok(())
}
