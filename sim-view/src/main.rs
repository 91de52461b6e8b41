//! Application entry point for the 3D cluster viewer.
//!
//! This binary sets up logging and eframe/egui and delegates all
//! interactive logic and rendering to [`Viewer`] from the `viewer` module.
//!
//! Usage: `cluster_3d_sim [config.json] [category...]`. Each category name
//! (`teapot`, `cube`, `sphere`, `troll` or `a`-`d`) spawns one extra entity
//! at startup.

mod viewer;

use sim_core::{Category, command::Command, config::Config, error::SimError};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use viewer::Viewer;

/// What the command line asked for.
#[derive(Debug, Default)]
struct LaunchOptions {
    cfg: Config,
    spawn: Vec<Category>,
}

impl LaunchOptions {
    /// Parses the arguments after the program name.
    ///
    /// The first argument is a config path when it ends in `.json`; every
    /// other argument must name a category.
    ///
    /// ### Returns
    /// A [`SimError`] if the config cannot be loaded or a name is unknown.
    fn from_args(args: impl IntoIterator<Item = String>) -> Result<Self, SimError> {
        let mut args = args.into_iter().peekable();
        let mut opts = LaunchOptions::default();

        if let Some(path) = args.next_if(|a| a.ends_with(".json")) {
            opts.cfg = Config::from_json_file(&path)?;
            info!(%path, "loaded config");
        }
        for name in args {
            opts.spawn.push(name.parse::<Category>()?);
        }
        Ok(opts)
    }
}

/// Starts the native eframe application.
///
/// ### Returns
/// - `Ok(())` if the application runs to completion without errors.
/// - `Err` if eframe fails to create the native window or event loop.
fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let opts = LaunchOptions::from_args(std::env::args().skip(1)).unwrap_or_else(|e| {
        error!(error = %e, "bad arguments, using defaults");
        LaunchOptions::default()
    });

    let mut viewer = Viewer::new(opts.cfg).map_err(|e| eframe::Error::AppCreation(Box::new(e)))?;
    for category in opts.spawn {
        viewer.queue(Command::AddEntity(category));
    }

    let options = eframe::NativeOptions::default();

    eframe::run_native(
        "3D Cluster Sim",
        options,
        Box::new(move |_cc| Ok(Box::new(viewer))),
    )
}
