// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/bedwatch-rs

//! BedWatch - Bed-Exit Monitoring Engine
//!
//! Reads intensity frames from a proximity sensor (or the built-in
//! simulator), classifies the occupant's state, and streams telemetry and
//! state-change events to WebSocket observers.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use bedwatch::{
    Config, DiscoveryResponder, EventBus, FrameSource, Pipeline, SensorSimulator,
    WebSocketServer, VERSION,
};

/// BedWatch - Bed-Exit Monitoring Engine
#[derive(Parser, Debug)]
#[command(name = "bedwatch")]
#[command(author = "BedWatch Project")]
#[command(version = VERSION)]
#[command(about = "Single-sensor occupancy monitoring and bed-exit alerting")]
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

    /// Demo mode with the simulated sensor
    #[arg(long)]
    demo: bool,

    /// Serial port of the hardware sensor
    #[arg(long)]
    serial_port: Option<String>,

    /// WebSocket server port
    #[arg(long, default_value = "8765")]
    ws_port: u16,
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
        .with_thread_ids(true)
        .with_file(args.debug)
        .with_line_number(args.debug)
        .with_ansi(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("BedWatch v{} - Bed-Exit Monitoring Engine", VERSION);

    // Load or create configuration
    let config_path = args.config.unwrap_or_else(Config::default_path);
    let mut config = Config::load_or_create(&config_path)?;

    // Override with command line args
    if args.demo {
        config.demo_mode = true;
    }
    if let Some(port) = args.serial_port {
        config.sensor.serial_port = Some(port);
        config.demo_mode = false;
    }
    config.streaming.websocket_port = args.ws_port;

    info!("Configuration loaded from {:?}", config_path);
    info!("Demo mode: {}", config.demo_mode);

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(run(config))
}

async fn run(config: Config) -> Result<()> {
    let (shutdown_tx, _) = tokio::sync::broadcast::channel::<()>(1);

    let bus = Arc::new(EventBus::new(1024));
    let pipeline = Arc::new(Pipeline::new(config.engine, bus.clone()));

    // Observer fan-out
    if config.streaming.websocket_enabled {
        let server = WebSocketServer::new(
            config.streaming.websocket_port,
            config.streaming.websocket_max_clients,
            bus.clone(),
            pipeline.clone(),
        );
        server.start(shutdown_tx.subscribe()).await?;
    }

    // Producer discovery
    if config.streaming.discovery_enabled {
        let responder = DiscoveryResponder::new(
            config.streaming.discovery_port,
            &config.streaming.discovery_probe,
        );
        let shutdown_rx = shutdown_tx.subscribe();
        tokio::spawn(async move {
            if let Err(e) = responder.run(shutdown_rx).await {
                warn!("Discovery responder failed: {}", e);
            }
        });
    }

    // Single producer thread: one sensor, one engine, fan-out to observers.
    let source = open_frame_source(&config)?;
    spawn_producer(source, pipeline.clone());

    info!("BedWatch running - press Ctrl+C to shut down");
    info!("Send `update_background` over WebSocket to capture the baseline");

    tokio::signal::ctrl_c().await?;

    info!("Shutdown signal received");
    let _ = shutdown_tx.send(());

    let stats = pipeline.stats();
    info!(
        "Processed {} frames, {} captures, {} dropped",
        stats.processed, stats.captures, stats.dropped
    );

    Ok(())
}

fn open_frame_source(config: &Config) -> Result<Box<dyn FrameSource>> {
    if !config.demo_mode {
        #[cfg(feature = "serial")]
        {
            if let Some(path) = &config.sensor.serial_port {
                let source = bedwatch::sensors::SerialFrameSource::open(
                    path,
                    config.sensor.baud_rate,
                    config.sensor.frame_len,
                )?;
                return Ok(Box::new(source));
            }
        }

        #[cfg(not(feature = "serial"))]
        {
            if config.sensor.serial_port.is_some() {
                warn!("Serial support not compiled in (enable the `serial` feature); falling back to the simulator");
            }
        }
    }

    Ok(Box::new(SensorSimulator::new(
        config.sensor.frame_len,
        config.sensor.frame_interval_ms,
    )))
}

fn spawn_producer(mut source: Box<dyn FrameSource>, pipeline: Arc<Pipeline>) {
    std::thread::spawn(move || {
        info!("Frame producer started on source `{}`", source.name());
        loop {
            match source.next_frame() {
                Ok(frame) => {
                    // Overlapping frames are dropped inside, not queued.
                    let _ = pipeline.submit(&frame);
                }
                Err(e) => {
                    warn!("Frame acquisition failed: {}", e);
                    std::thread::sleep(std::time::Duration::from_millis(500));
                }
            }
        }
    });
}
