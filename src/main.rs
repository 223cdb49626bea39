// Copyright (c) 2026 riverguard
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/riverguard/riverguard-rs

//! RiverGuard Core - headless demo driver
//!
//! Wires the simulated detection pipeline together: event bus, live feed,
//! analytics and incident-log subscribers, clean shutdown on Ctrl+C.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use parking_lot::Mutex;
use tokio::sync::broadcast;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use riverguard::{
    Config, DetectionSimulator, EventBus, FrameDetector, Incident, IncidentStats, LiveFeed,
    VERSION,
};

/// RiverGuard Core - simulated river-monitoring detection pipeline
#[derive(Parser, Debug)]
#[command(name = "riverguard")]
#[command(author = "RiverGuard Project")]
#[command(version = VERSION)]
#[command(about = "Simulated detection and live-feed event pipeline")]
struct Args {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Enable trace-level logging
    #[arg(long)]
    trace: bool,

    /// Fixed random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Camera index to watch
    #[arg(long, default_value = "0")]
    camera: usize,

    /// Webcam device to activate; switches to frame-based detection at
    /// the active cadence
    #[arg(long)]
    webcam: Option<String>,

    /// Run for this many seconds, then shut down (default: until Ctrl+C)
    #[arg(long)]
    duration: Option<u64>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.trace {
        Level::TRACE
    } else if args.debug {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_ansi(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("RiverGuard Core v{VERSION} - simulated detection pipeline");

    // Load or create configuration
    let config_path = args.config.clone().unwrap_or_else(Config::default_path);
    let config = Config::load_or_create(&config_path)?;
    info!("Configuration loaded from {:?}", config_path);

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(run(config, args))
}

async fn run(config: Config, args: Args) -> Result<()> {
    let bus = Arc::new(EventBus::new());

    // Surface user-facing notifications in the log
    let _alert_sub = bus.subscribe_alerts(|alert| {
        info!("[{}] {}", alert.level, alert.message);
    });

    // Independent consumers, each with its own derived state
    let mut stats = IncidentStats::new();
    stats.attach(&bus);

    let incident_log = Arc::new(Mutex::new(Vec::<Incident>::new()));
    let incident_log_sub = Arc::clone(&incident_log);
    let _incident_sub = bus.subscribe_incidents(move |incident| {
        incident_log_sub.lock().push(incident.clone());
    });

    let simulator = match args.seed {
        Some(seed) => {
            info!("Using fixed seed {seed}");
            DetectionSimulator::with_seed(&config.simulator, config.locations.clone(), seed)
        }
        None => DetectionSimulator::new(&config.simulator, config.locations.clone()),
    };

    let mut feed = LiveFeed::new(&config.feed, simulator, Arc::clone(&bus));
    feed.switch_camera(args.camera);

    // Failed activation is surfaced as an alert and the feed falls back
    // to the gated periodic ticks
    if let Some(device) = &args.webcam {
        feed.attach_frame_detector(FrameDetector::new(&config.simulator));
        feed.activate_webcam(device);
    }

    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
    let feed_task = tokio::spawn(async move {
        feed.run(shutdown_rx).await?;
        Ok::<LiveFeed, anyhow::Error>(feed)
    });

    info!("Live feed running on camera {}", args.camera);
    match args.duration {
        Some(secs) => {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => info!("Shutdown signal received"),
                _ = tokio::time::sleep(Duration::from_secs(secs)) => {
                    info!("Run duration elapsed");
                }
            }
        }
        None => {
            info!("Press Ctrl+C to shut down");
            tokio::signal::ctrl_c().await?;
            info!("Shutdown signal received");
        }
    }

    let _ = shutdown_tx.send(());
    let mut feed = feed_task.await??;

    // Promote observed threats so the incident consumers see them
    while feed.promote_first_threat().is_some() {}

    let state = feed.stats();
    info!(
        "Feed summary: {} detections, {} threats, {} incidents",
        state.total_detections, state.total_threats, state.total_incidents
    );

    let totals = stats.snapshot();
    info!(
        "Incident totals: {} total ({} critical, {} warning, {} info)",
        totals.total, totals.critical, totals.warning, totals.info
    );
    info!("Incident log holds {} entries", incident_log.lock().len());

    Ok(())
}
