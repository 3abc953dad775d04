use log::info;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::error::{ChatError, Result};
use crate::models::Profile;
use crate::notifications::{DEFAULT_TIMEOUT_SECS, MAX_TIMEOUT_SECS};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    pub profile: Profile,
    pub notification_timeout_secs: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            profile: Profile::default(),
            notification_timeout_secs: DEFAULT_TIMEOUT_SECS,
            download_dir: None,
        }
    }
}

impl Settings {
    /// Where downloaded attachments go: configured directory, then the
    /// platform download directory, then the working directory.
    pub fn resolved_download_dir(&self) -> PathBuf {
        self.download_dir
            .clone()
            .or_else(dirs::download_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

static SETTINGS_PATH_OVERRIDE: OnceCell<PathBuf> = OnceCell::new();

/// Use `path` instead of the per-user settings file. Only the first call wins.
pub fn set_settings_path_override(path: PathBuf) {
    let _ = SETTINGS_PATH_OVERRIDE.set(path);
}

pub fn get_config_dir() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| ChatError::Settings("Could not determine config directory".to_string()))?
        .join("cyberchat");

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)?;
    }

    Ok(config_dir)
}

fn get_settings_path() -> Result<PathBuf> {
    if let Some(path) = SETTINGS_PATH_OVERRIDE.get() {
        return Ok(path.clone());
    }
    Ok(get_config_dir()?.join("settings.json"))
}

/// Loads the per-user settings, writing the defaults there on first run so
/// they can be edited.
pub fn load_settings() -> Result<Settings> {
    let path = get_settings_path()?;
    if !path.exists() {
        let settings = Settings::default();
        save_settings_to(&settings, &path)?;
        return Ok(settings);
    }
    load_settings_from(&path)
}

/// A missing file yields defaults; a malformed one is an error.
pub fn load_settings_from(path: &Path) -> Result<Settings> {
    if !path.exists() {
        info!("No settings file at {}, using defaults", path.display());
        return Ok(Settings::default());
    }

    let mut file = File::open(path)?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;

    let settings: Settings = serde_json::from_str(&contents)?;
    if !(1..=MAX_TIMEOUT_SECS).contains(&settings.notification_timeout_secs) {
        return Err(ChatError::Settings(format!(
            "notification_timeout_secs must be between 1 and {}, got {}",
            MAX_TIMEOUT_SECS, settings.notification_timeout_secs
        )));
    }

    info!("Loaded settings for {} from {}", settings.profile.username, path.display());
    Ok(settings)
}

pub fn save_settings_to(settings: &Settings, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, settings)?;
    info!("Settings saved to {}", path.display());
    Ok(())
}
