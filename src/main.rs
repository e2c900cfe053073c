//! Flood Risk Monitor - Console Driver
//!
//! Runs one scripted household session against the simulated river gauge:
//! 1. Shows the dashboard for the configured seed level
//! 2. Refreshes the reading and reports any threshold crossing
//! 3. Closes the floodgate through the confirm-then-actuate cycle
//! 4. Prints the alert feed
//!
//! Usage:
//!   cargo run                      # scripted session, clock-seeded
//!   cargo run -- --seed 42         # reproducible session
//!   cargo run -- --json            # print dashboard snapshots as JSON
//!   cargo run -- --fast            # advance the clock without sleeping
//!
//! Environment:
//!   AWFMS_CONFIG - path to the configuration file (default: monitor.toml)
//!   AWFMS_LOG    - log file to append to (optional)

use awfms_core::config::{self, MonitorConfig};
use awfms_core::logging::{self, Component, LogLevel};
use awfms_core::model::MonitorError;
use awfms_core::session::{Session, SessionEvent};
use chrono::Utc;
use std::env;
use std::error::Error;
use std::thread;
use std::time::Duration;

/// Clock resolution of the driver loop.
const TICK: Duration = Duration::from_millis(100);

struct Options {
    json: bool,
    fast: bool,
    verbose: bool,
    seed: Option<u64>,
}

fn parse_args() -> Options {
    let args: Vec<String> = env::args().collect();
    let mut options = Options {
        json: false,
        fast: false,
        verbose: false,
        seed: None,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--json" => {
                options.json = true;
                i += 1;
            }
            "--fast" => {
                options.fast = true;
                i += 1;
            }
            "--verbose" => {
                options.verbose = true;
                i += 1;
            }
            "--seed" => {
                match args.get(i + 1).and_then(|s| s.parse().ok()) {
                    Some(seed) => options.seed = Some(seed),
                    None => {
                        eprintln!("Error: --seed requires an unsigned integer");
                        std::process::exit(1);
                    }
                }
                i += 2;
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                eprintln!("Usage: {} [--seed N] [--json] [--fast] [--verbose]", args[0]);
                std::process::exit(1);
            }
        }
    }
    options
}

fn load_configuration() -> Result<MonitorConfig, MonitorError> {
    match env::var("AWFMS_CONFIG") {
        Ok(path) => config::load_config_from(path),
        Err(_) => match config::load_config() {
            Err(MonitorError::ConfigRead(reason)) => {
                println!("   No {} ({}), using defaults", config::CONFIG_PATH, reason);
                Ok(MonitorConfig::default())
            }
            other => other,
        },
    }
}

/// Advances the session clock by `total`, sleeping between ticks unless
/// running fast, and prints what happened.
fn advance(session: &mut Session, total: Duration, options: &Options) {
    let mut remaining = total;
    while !remaining.is_zero() {
        let step = remaining.min(TICK);
        if !options.fast {
            thread::sleep(step);
        }
        remaining -= step;

        for event in session.tick(step) {
            report_event(session, &event);
        }
    }
}

fn report_event(session: &Session, event: &SessionEvent) {
    match event {
        SessionEvent::Refreshed(outcome) => {
            println!(
                "   ✓ Reading updated: {:.1}m → {:.1}m ({:+.1}m)",
                outcome.previous_level,
                outcome.new_level,
                outcome.delta()
            );
            if outcome.previous_risk != outcome.new_risk {
                println!(
                    "   ⚠️  Risk changed: {} → {}",
                    outcome.previous_risk.label(),
                    outcome.new_risk.label()
                );
            }
        }
        SessionEvent::AlertRaised(id) => {
            if let Some(alert) = session.alerts().get(*id) {
                println!("   🔔 [{}] {}", alert.kind, alert.title);
            }
        }
        SessionEvent::Floodgate(event) => {
            println!("   🚪 Floodgate: {:?}", event);
        }
        SessionEvent::GestureSettled => {}
    }
}

fn print_dashboard(session: &Session, options: &Options) -> Result<(), Box<dyn Error>> {
    let snapshot = session.snapshot(Utc::now());
    if options.json {
        println!("{}", snapshot.to_json()?);
        return Ok(());
    }

    println!("   Station:   {}", snapshot.station_name);
    println!(
        "   Level:     {} ({}, band {})",
        snapshot.level.display,
        snapshot.level.updated,
        snapshot.level.band.label()
    );
    println!("   Risk:      {}", snapshot.level.risk_label);
    println!("              {}", snapshot.level.advisory);
    println!("   Gauge:     {:.0}%", snapshot.gauge.percent);
    println!("   Floodgate: {}", snapshot.floodgate.description);
    println!("   Alerts:    {} unread", snapshot.unread_alerts);
    println!("   Sensor:    {:?}", snapshot.sensor_health);
    if let Some(summary) = snapshot.trend.summary {
        println!(
            "   24h trend: {:.1}m - {:.1}m, {:+.2}m/hour (alarm line {:.1}m)",
            summary.min, summary.max, summary.rise_per_hour, snapshot.trend.reference_line
        );
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    dotenv::dotenv().ok();
    let options = parse_args();

    let log_file = env::var("AWFMS_LOG").ok();
    let level = if options.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Warning
    };
    logging::init_logger(level, log_file.as_deref(), false);

    println!("🌊 Flood Risk Monitor");
    println!("=====================\n");

    println!("📊 Loading configuration...");
    let config = match load_configuration() {
        Ok(config) => config,
        Err(e) => {
            logging::error(Component::Config, &format!("startup aborted: {}", e));
            eprintln!("\n❌ Configuration failed: {}\n", e);
            std::process::exit(1);
        }
    };
    let mut session = match options.seed.or(config.simulator.seed) {
        Some(seed) => {
            println!("   Seed: {}", seed);
            Session::from_config_seeded(&config, seed)?
        }
        None => Session::from_config(&config)?,
    };
    println!("✓ Session ready\n");

    println!("📋 Dashboard");
    print_dashboard(&session, &options)?;

    println!("\n🔄 Refreshing water level...");
    session.request_refresh()?;
    if let Err(e) = session.request_refresh() {
        println!("   Second refresh ignored: {}", e);
    }
    advance(&mut session, config.timing.refresh_latency(), &options);
    advance(&mut session, config.timing.refresh_settle(), &options);

    println!("\n🚪 Toggling floodgate...");
    session.toggle_floodgate()?;
    if let Some(prompt) = session.floodgate().prompt() {
        println!("   {}", prompt.title);
        println!("   {}", prompt.message);
        println!("   → {}", prompt.action);
    }
    session.confirm_floodgate()?;
    if let Some(progress) = session.floodgate().progress_message() {
        println!("   {}", progress);
    }
    if let Err(e) = session.toggle_floodgate() {
        println!("   Toggle during actuation rejected: {}", e);
    }
    advance(&mut session, config.timing.actuation_delay(), &options);

    println!("\n📋 Dashboard");
    print_dashboard(&session, &options)?;

    println!("\n🔔 Alerts");
    let now = Utc::now();
    for alert in session.alerts().alerts() {
        println!(
            "   [{}] {} - {} ({})",
            alert.kind,
            alert.title,
            alert.location,
            alert.age_label(now)
        );
    }
    session.mark_all_alerts_read();

    println!("\n✓ Session complete");
    Ok(())
}
