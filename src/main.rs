use clap::{Parser, Subcommand};
use photo_relay::classify::classify_metrics;
use photo_relay::config::{self, WorkerConfig};
use photo_relay::event::{self, TriggerEvent};
use photo_relay::imaging::{ImageBackend, RustBackend};
use photo_relay::output;
use photo_relay::pipeline::Worker;
use photo_relay::plan::plan;
use photo_relay::store::{FsObjectStore, JsonRecordStore};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

type LocalWorker = Worker<RustBackend, FsObjectStore, FsObjectStore, JsonRecordStore>;

#[derive(Parser)]
#[command(name = "photo-relay")]
#[command(about = "Normalize uploaded photos and publish them for serving")]
#[command(long_about = "\
Normalize uploaded photos and publish them for serving

Each upload lands in the staging store under collection/group/item.ext.
A run fetches it, corrects its orientation, resizes it by aspect category,
re-encodes it as a quality-60 sRGB JPEG, publishes it to the serving store
under the same key, then deletes the original and appends a photo record.

Resize policy (by corrected dimensions):
  Panorama   (w > 2h)   width 2500
  Landscape  (w > h)    width min(w, 1500)
  Portrait   (w < h)    width w
  Square     (w = h)    900x900, center crop

stdout carries one JSON response per successful run. Logs go to stderr.

Run 'photo-relay gen-config' to generate a documented photo-relay.toml.")]
#[command(version)]
struct Cli {
    /// Config file (default: photo-relay.toml in the working directory, if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log filter, e.g. "debug" or "photo_relay=trace" (default: RUST_LOG, then "info")
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Process every record of a trigger event (file path, or - for stdin)
    Handle {
        #[arg(value_name = "EVENT_FILE")]
        event_file: String,
    },
    /// Process a single staged object key
    Process { key: String },
    /// Show how a local image would be classified and resized
    Classify { image: PathBuf },
    /// Print a stock photo-relay.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref());

    match cli.command {
        Command::Handle { event_file } => {
            let worker_config = load_config(cli.config.as_deref())?;
            let payload = read_event(&event_file)?;
            let trigger = event::parse_event(&payload)?;
            run_event(&worker_config, &trigger)?;
        }
        Command::Process { key } => {
            let worker_config = load_config(cli.config.as_deref())?;
            run_event(&worker_config, &TriggerEvent::for_key(key))?;
        }
        Command::Classify { image } => {
            let bytes = std::fs::read(&image)?;
            let metrics = RustBackend::new().identify(&bytes)?;
            let (dimensions, category) = classify_metrics(&metrics)?;
            let resize = plan(category, dimensions.width, dimensions.height);
            let name = image
                .file_name()
                .map(|f| f.to_string_lossy().into_owned())
                .unwrap_or_else(|| image.display().to_string());
            output::print_classification(&name, &metrics, &dimensions, category, &resize);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Install the stderr subscriber. An explicit `--log-level` wins over
/// `RUST_LOG`; an unparsable filter falls back to `info`.
fn init_logging(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::try_new(level).ok(),
        None => EnvFilter::try_from_default_env().ok(),
    }
    .unwrap_or_else(|| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn load_config(path: Option<&Path>) -> Result<WorkerConfig, config::ConfigError> {
    let worker_config = config::load_config(path, |var| std::env::var(var).ok())?;
    info!(
        staging = %worker_config.stores.staging.display(),
        serving = %worker_config.stores.serving.display(),
        records = %worker_config.stores.records.display(),
        "configuration loaded"
    );
    Ok(worker_config)
}

fn read_event(source: &str) -> std::io::Result<String> {
    if source == "-" {
        let mut payload = String::new();
        std::io::stdin().read_to_string(&mut payload)?;
        Ok(payload)
    } else {
        std::fs::read_to_string(source)
    }
}

fn build_worker(worker_config: &WorkerConfig) -> LocalWorker {
    let stores = &worker_config.stores;
    Worker::new(
        RustBackend::new(),
        FsObjectStore::new(&stores.staging),
        FsObjectStore::new(&stores.serving),
        JsonRecordStore::new(&stores.records),
    )
}

/// Run all records, print one JSON response per success, and fail if any
/// run failed.
fn run_event(
    worker_config: &WorkerConfig,
    trigger: &TriggerEvent,
) -> Result<(), Box<dyn std::error::Error>> {
    init_thread_pool(&worker_config.processing);
    let worker = build_worker(worker_config);

    let results = worker.handle_event(trigger);
    let total = results.len();
    let mut failed = 0;
    for (key, result) in &results {
        match result {
            Ok(report) => {
                output::print_run_report(report);
                println!("{}", serde_json::to_string(&report.response())?);
            }
            Err(e) => {
                failed += 1;
                error!(key = %key, error = %e, "run failed");
                output::print_failure(key, e);
            }
        }
    }

    if failed > 0 {
        return Err(format!("{failed} of {total} runs failed").into());
    }
    Ok(())
}

fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
