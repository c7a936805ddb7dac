//! Cross-platform application paths using the `dirs` crate.
//!
//! Layout:
//!
//! Config dir (settings):
//!   Windows: %APPDATA%\robot-kiosk\
//!   macOS:   ~/Library/Application Support/robot-kiosk/
//!   Linux:   ~/.config/robot-kiosk/
//!
//! Data dir (canvas snapshots):
//!   Windows: %LOCALAPPDATA%\robot-kiosk\
//!   macOS:   ~/Library/Application Support/robot-kiosk/
//!   Linux:   ~/.local/share/robot-kiosk/

use std::path::PathBuf;

/// Holds all resolved application directory/file paths.
#[derive(Debug, Clone)]
pub struct AppPaths {
    /// Directory for `settings.toml`.
    pub config_dir: PathBuf,
    /// Full path to `settings.toml`.
    pub settings_file: PathBuf,
    /// Directory where canvas snapshots are written on request.
    pub snapshots_dir: PathBuf,
}

impl AppPaths {
    const APP_NAME: &'static str = "robot-kiosk";

    /// Resolves all paths using the `dirs` crate.
    ///
    /// Falls back to the current directory if the platform cannot provide a
    /// standard path (should be extremely rare in practice).
    pub fn new() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(Self::APP_NAME);

        let data_dir = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(Self::APP_NAME);

        let settings_file = config_dir.join("settings.toml");
        let snapshots_dir = data_dir.join("snapshots");

        Self {
            config_dir,
            settings_file,
            snapshots_dir,
        }
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}
