use std::fs;
use std::io::{self, Read};

use clap::{Args, Parser, Subcommand};
use monitor_layout::bridge::{self, BridgeError, DetectedMonitor, MonitorConfig};
use monitor_layout::engine::{Action, LayoutEngine};
use monitor_layout::geometry::Point;
use monitor_layout::settings::{LayoutSettings, SettingsError};

#[cfg(test)]
#[path = "main_test.rs"]
mod main_test;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("failed to read {path}: {source}")]
    Read { path: String, source: io::Error },
    #[error(transparent)]
    Bridge(#[from] BridgeError),
    #[error("invalid layout settings: {0}")]
    Settings(#[from] SettingsError),
    #[error("no monitors detected; is the compositor running?")]
    NoMonitors,
    #[error("failed to encode output: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "layout-cli", about = "Monitor layout engine CLI")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print one `monitor = ...` line per monitor.
    Lines(Inputs),
    /// Print the saved-config JSON the host would persist.
    Export(Inputs),
    /// Drag a monitor across canvas points and print the resulting config JSON.
    Drag(DragArgs),
    /// Print the fallback mode list.
    Modes,
}

#[derive(Args, Debug)]
struct Inputs {
    #[arg(long, env = "LAYOUT_MONITORS", default_value = "-", help = "Detected monitors JSON path, or - for stdin")]
    monitors: String,

    #[arg(long, env = "LAYOUT_SAVED", help = "Previously saved monitor configs JSON path")]
    saved: Option<String>,
}

#[derive(Args, Debug)]
struct DragArgs {
    #[command(flatten)]
    inputs: Inputs,

    #[arg(long)]
    name: String,

    #[arg(long, value_parser = parse_point, allow_hyphen_values = true, help = "Canvas point where the pointer goes down, as X,Y")]
    from: Point,

    #[arg(long, value_parser = parse_point, num_args = 1.., required = true, allow_hyphen_values = true, help = "Canvas points the pointer moves through")]
    to: Vec<Point>,
}

fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt().with_writer(io::stderr).init();

    let cli = Cli::parse();
    let settings = LayoutSettings::from_env()?;

    match cli.command {
        Command::Lines(inputs) => {
            let engine = load_engine(settings, &inputs)?;
            for line in engine.config_lines() {
                println!("{line}");
            }
            Ok(())
        }
        Command::Export(inputs) => {
            let engine = load_engine(settings, &inputs)?;
            print_json(&engine.export_configs())
        }
        Command::Drag(args) => run_drag(settings, &args),
        Command::Modes => {
            for mode in bridge::fallback_resolutions() {
                println!("{mode}");
            }
            Ok(())
        }
    }
}

fn run_drag(settings: LayoutSettings, args: &DragArgs) -> Result<(), CliError> {
    let mut engine = load_engine(settings, &args.inputs)?;

    if engine.begin_drag(&args.name, args.from).is_none() {
        tracing::warn!(monitor = %args.name, "no such monitor; nothing dragged");
    } else {
        for pointer in &args.to {
            match engine.update_drag(*pointer) {
                Action::PlacementMoved { position, .. } => {
                    tracing::info!(x = pointer.x, y = pointer.y, device_x = position.x, device_y = position.y, "moved");
                }
                Action::None => tracing::info!(x = pointer.x, y = pointer.y, "move rejected"),
                Action::PlacementUpdated { .. } => {}
            }
        }
        engine.end_drag();
    }

    print_json(&engine.export_configs())
}

fn load_engine(settings: LayoutSettings, inputs: &Inputs) -> Result<LayoutEngine, CliError> {
    let detected: Vec<DetectedMonitor> = bridge::parse_detected(&read_input(&inputs.monitors)?)?;
    if detected.is_empty() {
        return Err(CliError::NoMonitors);
    }

    let saved = match &inputs.saved {
        Some(path) => load_saved(path),
        None => Vec::new(),
    };

    let mut engine = LayoutEngine::new(settings);
    engine.load(&detected, &saved);
    Ok(engine)
}

/// A missing or unreadable saved config is not fatal; the detected layout is used.
fn load_saved(path: &str) -> Vec<MonitorConfig> {
    let parsed = read_input(path).and_then(|raw| Ok(bridge::parse_saved(&raw)?));
    match parsed {
        Ok(configs) => configs,
        Err(e) => {
            tracing::warn!(path, error = %e, "no usable saved config; using detected values");
            Vec::new()
        }
    }
}

fn read_input(path: &str) -> Result<String, CliError> {
    let read = if path == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf).map(|_| buf)
    } else {
        fs::read_to_string(path)
    };
    read.map_err(|source| CliError::Read { path: path.to_owned(), source })
}

fn parse_point(raw: &str) -> Result<Point, String> {
    let (x, y) = raw
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y, got `{raw}`"))?;
    let x = x.trim().parse::<f64>().map_err(|e| format!("bad x in `{raw}`: {e}"))?;
    let y = y.trim().parse::<f64>().map_err(|e| format!("bad y in `{raw}`: {e}"))?;
    Ok(Point::new(x, y))
}

fn print_json(configs: &[MonitorConfig]) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(configs)?);
    Ok(())
}
