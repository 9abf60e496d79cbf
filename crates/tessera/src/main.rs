#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::must_use_candidate
)]
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod options;
pub use options::*;

mod persistence;
pub use persistence::*;

mod ui;
pub use ui::*;

use std::path::PathBuf;

use clap::Parser;
use directories::ProjectDirs;
use flexi_logger::{Cleanup, Criterion, Duplicate, FileSpec, Logger, Naming};
use semver::Version;

lazy_static::lazy_static! {
    static ref VERSION: Version = Version::parse(env!("CARGO_PKG_VERSION")).unwrap();
    static ref DEFAULT_TITLE: String = format!("Tessera {}", *VERSION);
}

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Render only every Nth frame
    #[arg(long, value_name = "N")]
    pub frame_rate_reduction: Option<u64>,

    /// Tile definition (.json) to start from, shown with its variations
    pub path: Option<PathBuf>,
}

fn get_log_dir() -> anyhow::Result<PathBuf> {
    if let Some(proj_dirs) = ProjectDirs::from("com", "GitHub", "tessera") {
        return Ok(proj_dirs.data_dir().to_path_buf());
    }
    Err(anyhow::anyhow!("Error getting log directory"))
}

fn main() {
    let args = Args::parse();

    // keep the handle alive for the whole session, dropping it would
    // flush and stop logging
    let _logger = match get_log_dir() {
        Ok(log_dir) => {
            // delete log file when it is too big
            let log_file = log_dir.join("tessera.log");
            if let Ok(data) = log_file.metadata() {
                if data.len() > 1024 * 256 {
                    let _ = std::fs::remove_file(&log_file);
                }
            }

            match Logger::try_with_env_or_str("info") {
                Ok(logger) => logger
                    .log_to_file(
                        FileSpec::default()
                            .directory(&log_dir)
                            .basename("tessera")
                            .suffix("log")
                            .suppress_timestamp(),
                    )
                    .rotate(
                        Criterion::Size(64 * 1024),
                        Naming::Numbers,
                        Cleanup::KeepLogFiles(3),
                    )
                    .duplicate_to_stderr(Duplicate::Warn)
                    .start()
                    .map_err(|err| eprintln!("Failed to start logging: {err}"))
                    .ok(),
                Err(err) => {
                    eprintln!("Failed to configure logging: {err}");
                    None
                }
            }
        }
        Err(err) => {
            eprintln!("Failed to get log directory: {err}");
            None
        }
    };

    log::info!("Starting tessera {}", *VERSION);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([800., 840.]),
        multisampling: 0,
        renderer: eframe::Renderer::Glow,
        ..Default::default()
    };

    if let Err(err) = eframe::run_native(
        &DEFAULT_TITLE,
        options,
        Box::new(move |cc| Box::new(MainWindow::new(cc, &args))),
    ) {
        log::error!("Error returned by run_native: {err}");
    }
    log::info!("shutting down.");
}
