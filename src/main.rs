//! Application entry point — robot kiosk.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] from disk (returns default on first run).
//! 3. Connect the robot session — failure here is fatal and aborts startup.
//! 4. Build the inference gateway, capture source and sinks.
//! 5. Construct the page scheduler over the static page set.
//! 6. Read page-selection commands from stdin until `quit`.
//!
//! # Commands
//!
//! ```text
//! monitor | detector | speller | vqa   activate a page
//! stop                                 deactivate the current page
//! quit                                 shut down
//! ```

use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};

use robot_kiosk::{
    capture::RobotCaptureSource,
    config::AppConfig,
    gateway::ApiGateway,
    pages::all_pages,
    render::{CanvasSink, LogAudioSink},
    robot::RobotSession,
    scheduler::{PageContext, PageId, PageScheduler},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("robot kiosk starting up");

    // 2. Configuration
    let config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        AppConfig::default()
    });

    // 3. Robot session — connection failure is terminal, no retry.
    let session = match RobotSession::connect(&config.robot).await {
        Ok(session) => Arc::new(session),
        Err(e) => {
            log::error!("could not connect to robot at {}: {e}", config.robot.host);
            return Err(e).context("robot connection failed");
        }
    };
    log::info!("connected!");

    // 4. Collaborators
    let gateway = Arc::new(ApiGateway::from_config(&config.gateway));
    let capture = Arc::new(RobotCaptureSource::new(Arc::clone(&session)));
    let sink = Arc::new(CanvasSink::new());
    let audio = Arc::new(LogAudioSink);

    let ctx = PageContext {
        capture,
        gateway,
        telemetry: session,
        sink,
        audio,
        config: config.clone(),
    };

    // 5. Scheduler over the static page set
    let mut scheduler = PageScheduler::new(all_pages(), ctx);

    // 6. Command loop
    println!("commands: monitor | detector | speller | vqa | stop | quit");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let command = line.trim();
        match command {
            "" => {}
            "quit" | "exit" => break,
            "stop" => {
                scheduler.deactivate().await;
                println!("stopped");
            }
            name => match PageId::parse(name) {
                Some(id) => {
                    scheduler.activate(id).await?;
                    println!("active: {}", id.label());
                }
                None => {
                    println!("unknown command: {command}");
                }
            },
        }
    }

    scheduler.deactivate().await;
    log::info!("robot kiosk shut down");
    Ok(())
}
