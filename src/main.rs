//! DishaIO - Acquisition daemon and UDP relay for Xsens MTi-G telemetry
//!
//! Two run modes:
//!
//! - **acquire** (default): open the IMU serial port, decode frames, archive
//!   to disk and relay each sample over UDP (fire-and-forget)
//! - **monitor** (`--monitor`): bind the receive port and periodically log
//!   the freshest sample from the mailbox

use disha_io::acquisition::{AcquisitionLoop, SampleSink};
use disha_io::archive::TextArchive;
use disha_io::config::AppConfig;
use disha_io::error::{Error, Result};
use disha_io::streaming::{UdpPublisher, UdpSubscriber};
use disha_io::transport::SerialTransport;
use std::env;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Run mode selected on the command line
enum Mode {
    Acquire,
    Monitor,
}

/// Parse config path and mode from command line arguments.
///
/// Supports:
/// - `disha-io <path>` (positional)
/// - `disha-io --config <path>` (flag-based)
/// - `disha-io -c <path>` (short flag)
/// - `disha-io --monitor` (receive side instead of acquisition)
///
/// Defaults to `/etc/dishaio.toml` if not specified.
fn parse_args() -> (String, Mode) {
    let args: Vec<String> = env::args().collect();
    let mut config_path: Option<String> = None;
    let mut mode = Mode::Acquire;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" if i + 1 < args.len() => {
                config_path = Some(args[i + 1].clone());
                i += 1;
            }
            "--monitor" | "-m" => mode = Mode::Monitor,
            arg if !arg.starts_with('-') && config_path.is_none() => {
                config_path = Some(arg.to_string());
            }
            arg => log::warn!("Ignoring unknown argument: {}", arg),
        }
        i += 1;
    }

    (
        config_path.unwrap_or_else(|| "/etc/dishaio.toml".to_string()),
        mode,
    )
}

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("DishaIO v0.1.0 starting...");

    let (config_path, mode) = parse_args();

    // Load configuration, falling back to MTi-G defaults when no file exists
    let config = match AppConfig::from_file(&config_path) {
        Ok(config) => {
            log::info!("Using config: {}", config_path);
            config
        }
        Err(e) => {
            log::warn!("Config {} unavailable ({}), using defaults", config_path, e);
            AppConfig::mti_defaults()
        }
    };

    // Set up shutdown signal handler
    let shutdown = Arc::new(AtomicBool::new(false));
    let r = Arc::clone(&shutdown);
    ctrlc::set_handler(move || {
        log::info!("Received shutdown signal");
        r.store(true, Ordering::Relaxed);
    })
    .map_err(|e| Error::Other(format!("Error setting Ctrl-C handler: {e}")))?;

    match mode {
        Mode::Acquire => run_acquisition(&config, shutdown),
        Mode::Monitor => run_monitor(&config, shutdown),
    }
}

/// Acquisition side: serial IMU → archive + UDP relay
fn run_acquisition(config: &AppConfig, shutdown: Arc<AtomicBool>) -> Result<()> {
    let transport = SerialTransport::open(&config.serial.port, config.serial.baud_rate)?;

    let publisher = UdpPublisher::new(config.network.publish_address.as_str())?;
    log::info!("Relaying samples to {}", publisher.target());

    let sink: Option<Box<dyn SampleSink>> = match &config.archive.path {
        Some(path) => Some(Box::new(TextArchive::create(path)?)),
        None => {
            log::info!("Archival disabled");
            None
        }
    };

    let mut acquisition = AcquisitionLoop::new(
        transport,
        Some(publisher),
        sink,
        shutdown,
        Duration::from_millis(config.serial.frame_timeout_ms),
    );

    let result = acquisition.run();
    if let Err(ref e) = result {
        log::error!("Session ended: {}", e);
    }
    log::info!("DishaIO stopped");
    result
}

/// Receive side: UDP subscriber, log the freshest sample twice a second
fn run_monitor(config: &AppConfig, shutdown: Arc<AtomicBool>) -> Result<()> {
    let bind_addr = format!("0.0.0.0:{}", config.network.receive_port);
    let mut handle = UdpSubscriber::start(bind_addr.as_str())?;

    log::info!("Monitoring telemetry on {}", bind_addr);

    while !shutdown.load(Ordering::Relaxed) {
        match handle.latest() {
            Some(sample) => log::info!(
                "roll {:.2} pitch {:.2} yaw {:.2} | lat {:.6} lon {:.6} alt {:.2}",
                sample.roll,
                sample.pitch,
                sample.yaw,
                sample.lat,
                sample.lon,
                sample.alt
            ),
            None => log::info!("Waiting for first sample..."),
        }
        std::thread::sleep(Duration::from_millis(500));
    }

    handle.stop();
    log::info!("DishaIO stopped");
    Ok(())
}
