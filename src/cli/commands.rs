//! Command runners for the re1-processor binary
//!
//! Each subcommand is a thin layer over the library: it wires CLI options
//! into configuration, calls the library, and prints a coloured summary.

use crate::analysis::{curve_for, peak_amplitude, smooth_columns, tidy_dataframe};
use crate::cli::args::{Args, Commands, ExportArgs, InspectArgs, LoadArgs, PeaksArgs, TidyArgs};
use crate::config::{ExportConfig, LoaderConfig, PhaseZeroingConfig, TidyOptions};
use crate::constants::{HEADING_TOLERANCE_DEG, columns};
use crate::export::{export_re1_to_xlsx, write_table};
use crate::parser::parse_re1_file;
use crate::processor::StudyLoader;
use crate::study::Study;

use anyhow::{Context, Result};
use colored::*;
use polars::prelude::*;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};

/// Run the selected subcommand
pub async fn run(args: Args) -> Result<()> {
    setup_logging(&args)?;
    debug!("Command line arguments: {:?}", args);

    match args.command {
        Commands::Inspect(inspect) => run_inspect(&inspect),
        Commands::Tidy(tidy) => run_tidy(&tidy),
        Commands::Export(export) => run_export(&export),
        Commands::Peaks(peaks) => run_peaks(&peaks).await,
        Commands::Load(load) => run_load(&load).await,
    }
}

/// Set up structured logging based on CLI arguments
fn setup_logging(args: &Args) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("re1_processor={}", log_level)));

    let result = if args.quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };
    result.context("Failed to initialise logging")?;

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

fn run_inspect(args: &InspectArgs) -> Result<()> {
    let data = parse_re1_file(&args.file)
        .with_context(|| format!("Failed to parse {}", args.file.display()))?;
    let header = &data.header;

    println!("{}", "VERES transfer functions".bright_green().bold());
    println!("  {} {}", "File:".bright_cyan(), args.file.display());
    println!("  {} {}", "Run name:".bright_cyan(), header.run_name());
    println!(
        "  {} LPP {:.3} m, B {:.3} m, T {:.3} m",
        "Vessel:".bright_cyan(),
        header.lpp,
        header.breadth,
        header.draught
    );
    println!(
        "  {} LCG {:.3} m, VCG {:.3} m",
        "COG:".bright_cyan(),
        header.lcg,
        header.vcg
    );
    println!(
        "  {} {} speeds, {} headings, {} frequencies, {} DOF",
        "Size:".bright_cyan(),
        header.novel.to_string().bright_white().bold(),
        header.nohead,
        header.nofreq,
        header.ndof
    );

    for (i, speed) in data.speeds.iter().enumerate() {
        let mtn = match speed.motion_reference {
            Some(m) => format!("MTN x {:.3} z {:.3}", m.xmtn, m.zmtn),
            None => "no MTN".to_string(),
        };
        println!(
            "  {} {}: {:.2} kn, {} layout, {}",
            "Speed".bright_yellow(),
            i,
            speed.speed_knots(),
            speed.layout,
            mtn
        );
        println!("    headings {:?}", speed.heads);
    }
    Ok(())
}

fn run_tidy(args: &TidyArgs) -> Result<()> {
    let data = parse_re1_file(&args.file)
        .with_context(|| format!("Failed to parse {}", args.file.display()))?;

    let mut options = TidyOptions::default();
    if args.rad_per_m {
        options = options.in_rad_per_m();
    }
    if args.zero_phases {
        options = options.with_phase_zeroing(PhaseZeroingConfig::default());
    }

    let mut df = tidy_dataframe(&data, args.speed, &options)?;
    match &args.output {
        Some(path) => {
            write_table(&mut df, path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!(
                "  {} {} rows to {}",
                "Wrote".bright_green(),
                df.height().to_string().bright_white().bold(),
                path.display()
            );
        }
        None => println!("{}", df),
    }
    Ok(())
}

fn run_export(args: &ExportArgs) -> Result<()> {
    let mut config = ExportConfig::default();
    if args.no_phase_zeroing {
        config = config.without_phase_zeroing();
    } else if args.force_surge_zero {
        config = config.with_phase_zeroing(PhaseZeroingConfig::default().with_force_surge_zero());
    }
    if let Some(prefix) = &args.prefix {
        config = config.with_sheet_name_prefix(prefix.clone());
    }
    if let Some(stem) = args.file.file_stem() {
        config = config.with_fallback_run_name(stem.to_string_lossy().to_string());
    }

    let output = export_re1_to_xlsx(
        &args.file,
        args.output.as_deref(),
        args.speed,
        args.headings.as_deref(),
        config,
    )
    .with_context(|| format!("Failed to export {}", args.file.display()))?;

    println!("  {} {}", "Workbook:".bright_green(), output.display());
    Ok(())
}

/// A single file becomes one study; a folder goes through the batch loader
async fn load_studies(path: &Path, workers: Option<usize>) -> Result<BTreeMap<String, Study>> {
    if path.is_file() {
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "study".to_string());
        let study = Study::load(name.clone(), path, 0, &TidyOptions::default())
            .with_context(|| format!("Failed to load {}", path.display()))?;
        return Ok(BTreeMap::from([(name, study)]));
    }

    let mut config = LoaderConfig::default();
    if let Some(workers) = workers {
        config = config.with_workers(workers);
    }
    let (studies, warnings) = StudyLoader::new(config)
        .load_folder(path)
        .await
        .with_context(|| format!("Failed to load studies from {}", path.display()))?;
    for warning in &warnings {
        println!("  {} {}", "Warning:".bright_red(), warning);
    }
    Ok(studies)
}

async fn run_peaks(args: &PeaksArgs) -> Result<()> {
    let studies = load_studies(&args.path, args.workers).await?;
    let window = args.window();

    println!(
        "{} {} {}",
        "Peak".bright_green().bold(),
        args.dof.bright_white().bold(),
        match window {
            Some((lo, hi)) => format!("response in [{}, {}] s", lo, hi),
            None => "response".to_string(),
        }
    );

    for (name, study) in &studies {
        let headings = match args.heading {
            Some(h) => vec![h],
            None => study.headings.clone(),
        };
        for heading in headings {
            let mut curve = curve_for(study, &args.dof, heading, HEADING_TOLERANCE_DEG)?;
            if args.smooth {
                curve = smooth_columns(&curve, &[columns::AMPLITUDE])?;
            }
            match peak_amplitude(&curve, window) {
                (Some(amplitude), Some(period)) => println!(
                    "  {} H{:<6} {} at {:.2} s",
                    name.bright_cyan(),
                    heading,
                    format!("{:.4}", amplitude).bright_white(),
                    period
                ),
                _ => println!("  {} H{:<6} {}", name.bright_cyan(), heading, "no data".bright_black()),
            }
        }
    }
    Ok(())
}

async fn run_load(args: &LoadArgs) -> Result<()> {
    let mut config = LoaderConfig::default().with_speed_index(args.speed);
    if let Some(workers) = args.workers {
        config = config.with_workers(workers);
    }
    if !args.no_progress {
        config = config.with_progress();
    }

    let (studies, warnings, stats) = StudyLoader::new(config)
        .load_folder_with_stats(&args.folder)
        .await
        .with_context(|| format!("Failed to load studies from {}", args.folder.display()))?;

    println!("\n{}", "Load Summary".bright_green().bold());
    println!(
        "  {} {}",
        "Studies:".bright_cyan(),
        studies.len().to_string().bright_white().bold()
    );
    if stats.files_substituted > 0 {
        println!(
            "  {} {}",
            "Substituted:".bright_red(),
            stats.files_substituted.to_string().bright_red().bold()
        );
    }
    println!("  {} {}ms", "Time elapsed:".bright_cyan(), stats.elapsed_ms);
    for (name, study) in &studies {
        println!(
            "  {} {} rows, headings {:?}",
            name.bright_cyan(),
            study.table.height(),
            study.headings
        );
    }
    for warning in &warnings {
        println!("  {} {}", "Warning:".bright_red(), warning);
    }

    if let Some(path) = &args.output {
        let frames: Vec<LazyFrame> = studies.values().map(|s| s.table.clone().lazy()).collect();
        if frames.is_empty() {
            info!("No studies loaded, skipping {}", path.display());
            return Ok(());
        }
        let mut combined = concat(frames, UnionArgs::default())?.collect()?;
        write_table(&mut combined, path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!(
            "  {} {} rows to {}",
            "Wrote".bright_green(),
            combined.height().to_string().bright_white().bold(),
            path.display()
        );
    }
    Ok(())
}
