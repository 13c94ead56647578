//! Application entry point for the point-field viewer.
//!
//! This binary parses the command line, sets up logging, and then either
//! opens the interactive eframe window (the default) or prints a vertex
//! cloud as JSON.

mod viewer;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use field_core::{
    cloud::VertexCloud,
    config::{Setting, Settings},
};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;
use viewer::Viewer;

/// Interactive pulsing point field
#[derive(Parser, Debug)]
#[command(name = "point-field")]
#[command(version, about = "Interactive pulsing point field", long_about = None)]
struct Cli {
    /// Logging verbosity level
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// JSON settings file; missing fields keep their defaults
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Override a single setting, e.g. `--set fluid_range=150`
    #[arg(long = "set", value_name = "NAME=VALUE")]
    overrides: Vec<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Open the interactive window (default if no subcommand)
    View {
        /// Window width
        #[arg(long, default_value = "1280")]
        width: f32,

        /// Window height
        #[arg(long, default_value = "800")]
        height: f32,

        /// Seed for the initial population
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Print a sine-wave vertex cloud as JSON
    Cloud {
        /// Randomise size, amplitude and frequency
        #[arg(long)]
        shuffle: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let settings = load_settings(cli.settings.as_ref(), &cli.overrides)?;

    match cli.command {
        None => run_viewer(settings, 1280.0, 800.0, None),
        Some(Commands::View {
            width,
            height,
            seed,
        }) => run_viewer(settings, width, height, seed),
        Some(Commands::Cloud { shuffle }) => print_cloud(shuffle),
    }
}

/// Builds the start-up settings from an optional file plus `name=value` overrides.
fn load_settings(path: Option<&PathBuf>, overrides: &[String]) -> Result<Settings> {
    let mut settings = match path {
        Some(path) => Settings::load(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => Settings::default(),
    };

    for pair in overrides {
        let setting = Setting::parse_assignment(pair)
            .with_context(|| format!("invalid --set `{pair}`"))?;
        let stored = settings.apply(setting)?;
        info!(setting = ?stored, "override applied");
    }

    Ok(settings)
}

/// Starts the native eframe application.
///
/// ### Returns
/// - `Ok(())` if the window closes normally.
/// - `Err` if eframe fails to create the native window or event loop.
fn run_viewer(settings: Settings, width: f32, height: f32, seed: Option<u64>) -> Result<()> {
    info!("point-field v{}", env!("CARGO_PKG_VERSION"));

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([width, height]),
        ..Default::default()
    };

    eframe::run_native(
        "Point Field",
        options,
        Box::new(move |_cc| Ok(Box::new(Viewer::new(settings, seed)))),
    )
    .map_err(|e| anyhow::anyhow!("viewer failed: {e}"))
}

fn print_cloud(shuffle: bool) -> Result<()> {
    let cloud = if shuffle {
        VertexCloud::shuffled(&mut rand::rng())
    } else {
        VertexCloud::default()
    };
    info!(size = cloud.size, vertices = cloud.vertices.len() / 3, "generated cloud");

    println!("{}", serde_json::to_string(&cloud)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_apply_in_order() {
        let overrides = vec![
            "fluid_range=150".to_owned(),
            "point_color=#ff0000".to_owned(),
            "fluid_range=90".to_owned(),
        ];

        let settings = load_settings(None, &overrides).unwrap();

        assert_eq!(settings.fluid_range, 90.0);
        assert_eq!(settings.point_color.0, [0xff, 0, 0]);
    }

    #[test]
    fn bad_override_is_an_error() {
        assert!(load_settings(None, &["nope=1".to_owned()]).is_err());
        assert!(load_settings(None, &["drag_force=inf".to_owned()]).is_err());
    }

    #[test]
    fn cli_parses_cloud_subcommand() {
        let cli = Cli::parse_from(["point-field", "--set", "num_points=10", "cloud", "--shuffle"]);

        assert_eq!(cli.overrides, vec!["num_points=10".to_owned()]);
        assert!(matches!(cli.command, Some(Commands::Cloud { shuffle: true })));
    }
}
