/*
 * User-facing settings and their persistence passthrough. The data lives in
 * an observable cell like everything else in this layer; persistence goes
 * through the `SettingsManagerOperations` trait so tests (and alternative
 * storage backends) can swap the file-backed implementation out. Loading
 * merges the stored record over the defaults: fields absent from an older
 * settings file keep their default values.
 */
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::PathBuf;

use super::observable::{Observable, SubscriptionId};
use super::path_utils;

const SETTINGS_FILENAME: &str = "settings.json";

/* Resampling method used for backend thumbnail generation. */
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ResampleMethod {
    #[default]
    NearestNeighbor,
    #[serde(rename = "ApproxBiLinear")]
    ApproxBilinear,
    CatmullRom,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub thumbnail_width: u32,
    pub thumbnail_height: u32,
    pub thumbnail_method: ResampleMethod,
    pub autoplay_audio: bool,
    pub autoplay_video: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            thumbnail_width: 200,
            thumbnail_height: 200,
            thumbnail_method: ResampleMethod::NearestNeighbor,
            autoplay_audio: true,
            autoplay_video: false,
        }
    }
}

#[derive(Debug)]
pub enum SettingsError {
    Io(io::Error),
    NoConfigDirectory,
    Serde(serde_json::Error),
}

impl From<io::Error> for SettingsError {
    fn from(err: io::Error) -> Self {
        SettingsError::Io(err)
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(err: serde_json::Error) -> Self {
        SettingsError::Serde(err)
    }
}

impl std::fmt::Display for SettingsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SettingsError::Io(e) => write!(f, "Settings I/O error: {e}"),
            SettingsError::NoConfigDirectory => {
                write!(f, "Could not determine config directory for settings")
            }
            SettingsError::Serde(e) => write!(f, "Settings serialization error: {e}"),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SettingsError::Io(e) => Some(e),
            SettingsError::Serde(e) => Some(e),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, SettingsError>;

pub trait SettingsManagerOperations: Send + Sync {
    /* `Ok(None)` means no settings have been saved yet; not an error. */
    fn load_settings(&self, app_name: &str) -> Result<Option<Settings>>;
    fn save_settings(&self, app_name: &str, settings: &Settings) -> Result<()>;
}

pub struct CoreSettingsManager {}

impl CoreSettingsManager {
    pub fn new() -> Self {
        CoreSettingsManager {}
    }

    fn settings_path(&self, app_name: &str) -> Result<PathBuf> {
        path_utils::get_base_app_config_local_dir(app_name)
            .map(|dir| dir.join(SETTINGS_FILENAME))
            .ok_or(SettingsError::NoConfigDirectory)
    }
}

impl Default for CoreSettingsManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsManagerOperations for CoreSettingsManager {
    fn load_settings(&self, app_name: &str) -> Result<Option<Settings>> {
        let path = self.settings_path(app_name)?;
        if !path.exists() {
            log::debug!("CoreSettingsManager: no settings file at {path:?}");
            return Ok(None);
        }
        let contents = fs::read_to_string(&path)?;
        let settings = serde_json::from_str(&contents)?;
        log::debug!("CoreSettingsManager: loaded settings from {path:?}");
        Ok(Some(settings))
    }

    fn save_settings(&self, app_name: &str, settings: &Settings) -> Result<()> {
        let path = self.settings_path(app_name)?;
        let contents = serde_json::to_string_pretty(settings)?;
        fs::write(&path, contents)?;
        log::debug!("CoreSettingsManager: saved settings to {path:?}");
        Ok(())
    }
}

/* Observable settings cell, initialized to defaults. */
#[derive(Debug, Clone)]
pub struct SettingsCell {
    cell: Observable<Settings>,
}

impl SettingsCell {
    pub fn new() -> Self {
        SettingsCell {
            cell: Observable::new(Settings::default()),
        }
    }

    pub fn snapshot(&self) -> Settings {
        self.cell.snapshot()
    }

    pub fn subscribe(&self, listener: Box<dyn FnMut(&Settings)>) -> SubscriptionId {
        self.cell.subscribe(listener)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.cell.unsubscribe(id)
    }

    pub fn set(&self, settings: Settings) {
        self.cell.set(settings);
    }

    pub fn reset(&self) {
        self.cell.set(Settings::default());
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.snapshot())?)
    }

    /*
     * Loads stored settings through the manager. A missing record leaves
     * the current value untouched; a present one replaces it wholesale
     * (field-level defaults were already applied during deserialization).
     */
    pub fn load_from(&self, manager: &dyn SettingsManagerOperations, app_name: &str) -> Result<()> {
        if let Some(settings) = manager.load_settings(app_name)? {
            self.cell.set(settings);
        }
        Ok(())
    }

    pub fn save_to(&self, manager: &dyn SettingsManagerOperations, app_name: &str) -> Result<()> {
        manager.save_settings(app_name, &self.snapshot())
    }
}

impl Default for SettingsCell {
    fn default() -> Self {
        Self::new()
    }
}
