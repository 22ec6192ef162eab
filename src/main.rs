use std::path::PathBuf;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{Instant, MissedTickBehavior};
use tracing_subscriber::EnvFilter;

use mixing_valve_controller::config::DEFAULT_CONFIG_PATH;
use mixing_valve_controller::{log_error, log_info, log_warn};
use mixing_valve_controller::{AppConfig, DeviceLink, TemperatureRegulator};

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config_path = std::env::var("MIXER_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));
    let config = AppConfig::load(&config_path)?;

    let link = connect_with_retry(&config).await?;
    let mut regulator = TemperatureRegulator::new(link, config.regulator.clone());

    if config.autostart {
        regulator.start().await?;
    }

    let result = run(&config, &mut regulator).await;
    regulator.shutdown().await;
    result
}

/// Open the link, backing off between attempts while no device is present.
async fn connect_with_retry(config: &AppConfig) -> color_eyre::Result<DeviceLink> {
    let mut backoff = config.startup_backoff();
    let mut attempt = 0;

    loop {
        attempt += 1;
        match DeviceLink::connect(&config.link).await {
            Ok(link) => return Ok(link),
            Err(e) if e.is_fatal() && attempt <= config.startup_retries => {
                log_error!("Connect attempt {} failed: {}; retrying in {:?}", attempt, e, backoff);
                tokio::time::sleep(backoff).await;
                backoff *= 2;
            }
            Err(e) => return Err(e.into()),
        }
    }
}

async fn run(config: &AppConfig, regulator: &mut TemperatureRegulator) -> color_eyre::Result<()> {
    let mut ticker = tokio::time::interval(config.tick_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut commands = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    let mut last_status = Instant::now();

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                log_info!("Interrupted, shutting down");
                return Ok(());
            }
            _ = ticker.tick() => {
                regulator.handle_tick().await?;

                if last_status.elapsed() >= config.regulator.update_delay() {
                    last_status = Instant::now();
                    log_status(regulator);
                }
            }
            line = commands.next_line(), if stdin_open => {
                match line {
                    Ok(Some(line)) => {
                        if !handle_command(regulator, line.trim()).await? {
                            return Ok(());
                        }
                    }
                    Ok(None) => stdin_open = false,
                    Err(e) => {
                        log_warn!("Stdin unavailable: {}", e);
                        stdin_open = false;
                    }
                }
            }
        }
    }
}

/// Operator commands; returns false when asked to quit.
async fn handle_command(
    regulator: &mut TemperatureRegulator,
    command: &str,
) -> color_eyre::Result<bool> {
    match command {
        "start" => regulator.start().await?,
        "stop" => {
            let report = regulator.stop().await?;
            log_info!("Stopped, unwind complete: {}", report.is_complete());
        }
        "up" => regulator.raise_target(),
        "down" => regulator.lower_target(),
        "status" => log_status(regulator),
        "quit" | "exit" => return Ok(false),
        "" => {}
        other => log_warn!("Unknown command '{}' (start, stop, up, down, status, quit)", other),
    }
    Ok(true)
}

fn log_status(regulator: &TemperatureRegulator) {
    match serde_json::to_string(&regulator.status()) {
        Ok(json) => log_info!("status {}", json),
        Err(e) => log_warn!("Could not serialise status: {}", e),
    }
}
