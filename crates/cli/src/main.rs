use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

use device::AdbDriver;
use engine::{Engine, EngineConfig};
use operations::{load_plan, EffectCatalog, Orchestrator, TransitionCatalog};
use timeline::TimelineStore;

#[derive(Parser)]
#[command(name = "inshot-cli")]
#[command(about = "InShot timeline automation over adb")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, global = true)]
    verbose: bool,

    /// Device serial, when more than one device is attached
    #[arg(short, long, global = true)]
    serial: Option<String>,

    /// Engine config JSON (ids, labels, policies); defaults match InShot
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Effect catalog JSON: {"Effects": {"Name": "Category"}}
    #[arg(long, global = true)]
    effects: Option<PathBuf>,

    /// Transition catalog JSON: {"name": ordinal}
    #[arg(long, global = true)]
    transitions: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Dump the current UI snapshot as JSON
    Snapshot {
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Measure the timeline and print the calibration constants
    Calibrate {
        /// Number of clips on the timeline
        #[arg(short = 'n', long)]
        clips: usize,
    },

    /// Calibrate, then move the play position to a time
    Seek {
        #[arg(short = 'n', long)]
        clips: usize,

        /// Target time in seconds
        #[arg(short, long)]
        time: f64,

        /// Acceptable distance from the target, in seconds
        #[arg(long)]
        tolerance: Option<f64>,
    },

    /// Calibrate, then execute an edit plan
    Run {
        #[arg(short = 'n', long)]
        clips: usize,

        /// Plan JSON (full object or bare command array)
        #[arg(short, long)]
        plan: PathBuf,

        /// Where to write the run report
        #[arg(short, long)]
        report: Option<PathBuf>,
    },

    /// Select every image in the media picker and confirm
    SelectMedia,

    /// Print the effective engine config
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt().with_max_level(level).init();

    let config = match &cli.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };

    if let Commands::Config = cli.command {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    let orchestrator = connect(&cli, config)?;

    match cli.command {
        Commands::Snapshot { output } => snapshot_command(&orchestrator, output).await,
        Commands::Calibrate { clips } => calibrate_command(&orchestrator, clips).await,
        Commands::Seek {
            clips,
            time,
            tolerance,
        } => seek_command(&orchestrator, clips, time, tolerance).await,
        Commands::Run {
            clips,
            plan,
            report,
        } => run_command(&orchestrator, clips, &plan, report).await,
        Commands::SelectMedia => {
            let count = orchestrator.select_media().await?;
            info!("Selected {} media items", count);
            Ok(())
        }
        Commands::Config => Ok(()),
    }
}

fn connect(cli: &Cli, config: EngineConfig) -> Result<Orchestrator> {
    let effects = match &cli.effects {
        Some(path) => EffectCatalog::load(path)?,
        None => EffectCatalog::default(),
    };
    let transitions = match &cli.transitions {
        Some(path) => TransitionCatalog::load(path)?,
        None => TransitionCatalog::default(),
    };
    info!(
        "Catalogs: {} effects, {} transitions",
        effects.len(),
        transitions.names().count()
    );

    let driver = AdbDriver::new(cli.serial.clone())?;
    let engine = Engine::new(Arc::new(driver), config);
    Ok(Orchestrator::new(engine, effects, transitions))
}

async fn snapshot_command(orchestrator: &Orchestrator, output: Option<PathBuf>) -> Result<()> {
    let snapshot = orchestrator.engine().snapshot().await?;
    let json = serde_json::to_string_pretty(&snapshot)?;
    match output {
        Some(path) => {
            std::fs::write(&path, json).with_context(|| format!("writing {:?}", path))?;
            info!("Wrote {} elements to {:?}", snapshot.len(), path);
        }
        None => println!("{}", json),
    }
    Ok(())
}

async fn calibrate(orchestrator: &Orchestrator, clips: usize) -> Result<TimelineStore> {
    let mut store = TimelineStore::new();
    orchestrator.engine().calibrate(&mut store, clips).await?;
    Ok(store)
}

async fn calibrate_command(orchestrator: &Orchestrator, clips: usize) -> Result<()> {
    let store = calibrate(orchestrator, clips).await?;
    println!("{}", serde_json::to_string_pretty(store.session()?)?);
    Ok(())
}

async fn seek_command(
    orchestrator: &Orchestrator,
    clips: usize,
    target: f64,
    tolerance: Option<f64>,
) -> Result<()> {
    let store = calibrate(orchestrator, clips).await?;
    let engine = orchestrator.engine();
    let tolerance = tolerance.unwrap_or(engine.config().seek.fine_tolerance_secs);

    let outcome = engine.seek(&store, target, tolerance).await?;
    if !outcome.converged() {
        warn!(
            "Gave up {:.2}s away from {:.2}s",
            (outcome.achieved() - target).abs(),
            target
        );
    }
    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}

async fn run_command(
    orchestrator: &Orchestrator,
    clips: usize,
    plan_path: &Path,
    report_path: Option<PathBuf>,
) -> Result<()> {
    let plan = load_plan(plan_path)?;
    if let Some(thought) = &plan.thought_process {
        info!("Plan: {}", thought);
    }
    info!("Loaded {} commands from {:?}", plan.len(), plan_path);

    let mut store = calibrate(orchestrator, clips).await?;
    let report = orchestrator.run_plan(&mut store, &plan).await;

    info!(
        "Run finished: {} done, {} failed, {} skipped; durations {:?}",
        report.succeeded(),
        report.failed(),
        report.skipped(),
        report.durations
    );

    let report_path = report_path.unwrap_or_else(|| {
        PathBuf::from(format!("run-{}.json", Utc::now().format("%Y%m%dT%H%M%S")))
    });
    std::fs::write(&report_path, report.to_json()?)
        .with_context(|| format!("writing {:?}", report_path))?;
    info!("Report written to {:?}", report_path);

    if report.failed() > 0 {
        anyhow::bail!("{} of {} commands failed", report.failed(), plan.len());
    }
    Ok(())
}
