use std::fs;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tessera_engine::Operation;

/// Persisted user settings, stored as `settings.toml` in the platform
/// config directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Options {
    #[serde(default = "default_frame_rate_reduction")]
    pub frame_rate_reduction: u64,

    #[serde(default)]
    pub continuous: bool,

    #[serde(default)]
    pub operation: Operation,
}

fn default_frame_rate_reduction() -> u64 {
    1
}

impl Default for Options {
    fn default() -> Self {
        Self {
            frame_rate_reduction: default_frame_rate_reduction(),
            continuous: false,
            operation: Operation::default(),
        }
    }
}

impl Options {
    pub fn load_options() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("com", "GitHub", "tessera") {
            let options_file = proj_dirs.config_dir().join("settings.toml");
            if options_file.exists() {
                match fs::read_to_string(&options_file) {
                    Ok(txt) => match toml::from_str(&txt) {
                        Ok(options) => return options,
                        Err(err) => log::error!("Error parsing {options_file:?}: {err}"),
                    },
                    Err(err) => log::error!("Error reading {options_file:?}: {err}"),
                }
            }
        }
        Options::default()
    }

    pub fn store_options(&self) {
        if let Some(proj_dirs) = ProjectDirs::from("com", "GitHub", "tessera") {
            if let Err(err) = fs::create_dir_all(proj_dirs.config_dir()) {
                log::error!(
                    "Error creating config directory {:?}: {err}",
                    proj_dirs.config_dir()
                );
                return;
            }
            let options_file = proj_dirs.config_dir().join("settings.toml");
            match toml::to_string(self) {
                Ok(text) => {
                    if let Err(err) = fs::write(&options_file, text) {
                        log::error!("Error writing {options_file:?}: {err}");
                    }
                }
                Err(err) => log::error!("Error serializing options: {err}"),
            }
        }
    }
}
