use std::io::{self, BufRead, Write};
use std::path::Path;

use anyhow::Context;
use block_atlas_core::{AtlasConfig, BlockAtlasError, BuildMode, output_paths, resolve_source_dir};
use clap::{ArgAction, Parser};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "block-atlas",
    about = "Pack ./block textures into a grid atlas with emissive, gloss and leaves maps",
    version,
    author
)]
struct Cli {
    /// 1 = build complete atlas from scratch, 2 = build atlas that matches order.json (prompted when omitted)
    option: Option<String>,
    /// Show a progress bar (disable with --progress false or --quiet)
    #[arg(long, default_value_t = true, action=ArgAction::Set, help_heading = "Logging/UX")]
    progress: bool,
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action=ArgAction::Count, help_heading = "Logging/UX")]
    verbose: u8,
    /// Quiet mode (overrides verbose)
    #[arg(short, long, default_value_t = false, help_heading = "Logging/UX")]
    quiet: bool,
    /// Dry run: compute the atlas and maps but do not write files
    #[arg(long, default_value_t = false)]
    dry_run: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing_with_level(cli.quiet, cli.verbose);

    let root = Path::new(".");
    let cfg = AtlasConfig::default();
    resolve_source_dir(root, &cfg.source_dirs)?;

    let option = match &cli.option {
        Some(o) => o.clone(),
        None => prompt_option()?,
    };
    let mode = match option.parse::<BuildMode>() {
        Ok(mode) => mode,
        Err(BlockAtlasError::InvalidOption(_)) => {
            println!("No valid option selected. Exiting.");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    run_build(root, &cfg, mode, cli.progress && !cli.quiet, cli.dry_run)
}

fn run_build(
    root: &Path,
    cfg: &AtlasConfig,
    mode: BuildMode,
    show_progress: bool,
    dry_run: bool,
) -> anyhow::Result<()> {
    let bar = if show_progress {
        let b = ProgressBar::no_length();
        b.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} packing {pos} [{elapsed_precise}] {wide_msg}",
            )
            .context("progress template")?,
        );
        Some(b)
    } else {
        None
    };

    let built = block_atlas_core::run(root, mode, cfg, dry_run, |_, key| {
        if let Some(b) = &bar {
            b.set_message(key.to_string());
            b.inc(1);
        }
    });
    if let Some(b) = &bar {
        b.finish_and_clear();
    }
    let report = match built {
        Ok(report) => report,
        Err(BlockAtlasError::MissingOrderFile(path)) => {
            anyhow::bail!(
                "Can't match order because {} not found. Exiting.",
                path.display()
            )
        }
        Err(BlockAtlasError::NoSuitableFiles) => {
            println!("No suitable block files found.");
            return Ok(());
        }
        Err(e @ (BlockAtlasError::Io(_) | BlockAtlasError::Image(_))) => {
            let paths: Vec<String> = output_paths(root, cfg, mode)
                .iter()
                .map(|p| p.display().to_string())
                .collect();
            return Err(e).with_context(|| format!("build or write {}", paths.join(", ")));
        }
        Err(e) => return Err(e.into()),
    };

    if dry_run {
        for path in output_paths(root, cfg, mode) {
            info!(path = %path.display(), "dry run, not written");
        }
    }
    info!(
        grid_size = report.grid_size,
        placed = report.placed,
        skipped = report.skipped.len(),
        occupancy = format!("{:.2}%", report.occupancy() * 100.0),
        "stats"
    );
    if !report.skipped.is_empty() {
        info!(skipped = ?report.skipped, "tiles listed in the order file but missing on disk");
    }
    println!("{}", report.summary());
    Ok(())
}

fn prompt_option() -> anyhow::Result<String> {
    let mut stdout = io::stdout();
    writeln!(stdout, "What do you want to do?")?;
    writeln!(stdout, "1) Build complete atlas from scratch")?;
    writeln!(stdout, "2) Build atlas that matches order.json")?;
    stdout.flush()?;
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("read option from stdin")?;
    Ok(line.trim().to_string())
}

fn init_tracing_with_level(quiet: bool, verbose: u8) {
    let level = if quiet {
        "error".to_string()
    } else {
        match verbose {
            0 => "info".into(),
            1 => "debug".into(),
            _ => "trace".into(),
        }
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(level)
        .with_target(false)
        .try_init();
}
