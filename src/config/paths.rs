//! Where the reader keeps `settings.toml`.
//!
//! The file lives in a `gas-meter-reader` folder under the platform config
//! directory reported by `dirs` (`~/.config` on Linux, `%APPDATA%` on
//! Windows). Gateway credentials, prompts and sampling all come from it.

use std::path::PathBuf;

/// Location of the reader's settings.
#[derive(Debug, Clone)]
pub struct AppPaths {
    pub settings_file: PathBuf,
}

impl AppPaths {
    const APP_NAME: &'static str = "gas-meter-reader";

    /// Headless hosts without a config dir keep settings next to the
    /// working directory.
    pub fn new() -> Self {
        let settings_file = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(Self::APP_NAME)
            .join("settings.toml");

        Self { settings_file }
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}
