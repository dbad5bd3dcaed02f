use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{LazyLock, RwLock};
use std::time::Duration;

use crate::catalog::CatalogEntry;
use crate::pdf::DEFAULT_PAGE_CACHE_SIZE;
use crate::thumbnail::DEFAULT_THUMBNAIL_WORKERS;
use crate::viewer::ViewerConfig;

pub const CURRENT_VERSION: u32 = 1;
const SETTINGS_FILENAME: &str = "config.yaml";
const APP_NAME: &str = "folio";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_version")]
    pub version: u32,

    /// Multiplier applied to page renders; clamped to 1..=3
    #[serde(default = "default_device_pixel_ratio")]
    pub device_pixel_ratio: f32,

    #[serde(default = "default_transition_ms")]
    pub transition_ms: u64,

    #[serde(default = "default_resize_debounce_ms")]
    pub resize_debounce_ms: u64,

    #[serde(default = "default_thumbnail_workers")]
    pub thumbnail_workers: usize,

    #[serde(default = "default_page_cache_size")]
    pub page_cache_size: usize,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub catalog: Vec<CatalogEntry>,
}

fn default_version() -> u32 {
    CURRENT_VERSION
}

fn default_device_pixel_ratio() -> f32 {
    2.0
}

fn default_transition_ms() -> u64 {
    430
}

fn default_resize_debounce_ms() -> u64 {
    120
}

fn default_thumbnail_workers() -> usize {
    DEFAULT_THUMBNAIL_WORKERS
}

fn default_page_cache_size() -> usize {
    DEFAULT_PAGE_CACHE_SIZE
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: CURRENT_VERSION,
            device_pixel_ratio: default_device_pixel_ratio(),
            transition_ms: default_transition_ms(),
            resize_debounce_ms: default_resize_debounce_ms(),
            thumbnail_workers: default_thumbnail_workers(),
            page_cache_size: default_page_cache_size(),
            catalog: Vec::new(),
        }
    }
}

impl Settings {
    pub fn viewer_config(&self) -> ViewerConfig {
        ViewerConfig {
            device_pixel_ratio: self.device_pixel_ratio,
            transition: Duration::from_millis(self.transition_ms),
            resize_debounce: Duration::from_millis(self.resize_debounce_ms),
            page_cache_size: self.page_cache_size,
        }
    }
}

static SETTINGS: LazyLock<RwLock<Settings>> = LazyLock::new(|| RwLock::new(Settings::default()));

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|config| config.join(APP_NAME).join(SETTINGS_FILENAME))
}

/// Load settings from the default location, creating the file if missing
pub fn load_settings() {
    match default_config_path() {
        Some(path) => load_settings_from(&path),
        None => warn!("Could not determine config directory, using default settings"),
    }
}

/// Load settings from `path`, creating it with defaults if it does not exist
pub fn load_settings_from(path: &Path) {
    if !path.exists() {
        info!("Settings file not found, creating with defaults at {path:?}");
        if let Ok(settings) = SETTINGS.read() {
            save_settings_to_file(&settings, path);
        }
        return;
    }

    match fs::read_to_string(path) {
        Ok(content) => match parse_settings(&content) {
            Ok(mut settings) => {
                debug!("Loaded settings from {path:?}");

                if settings.version < CURRENT_VERSION {
                    migrate_settings(&mut settings);
                    save_settings_to_file(&settings, path);
                }

                if let Ok(mut global) = SETTINGS.write() {
                    *global = settings;
                }
            }
            Err(e) => {
                error!("Failed to parse settings file {path:?}: {e}");
            }
        },
        Err(e) => {
            error!("Failed to read settings file {path:?}: {e}");
        }
    }
}

pub fn parse_settings(content: &str) -> Result<Settings, serde_yaml::Error> {
    serde_yaml::from_str(content)
}

fn migrate_settings(settings: &mut Settings) {
    info!(
        "Migrating settings from v{} to v{}",
        settings.version, CURRENT_VERSION
    );
    settings.version = CURRENT_VERSION;
}

fn save_settings_to_file(settings: &Settings, path: &Path) {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            if let Err(e) = fs::create_dir_all(parent) {
                error!("Failed to create config directory {parent:?}: {e}");
                return;
            }
        }
    }

    let content = generate_settings_yaml(settings);

    match fs::write(path, content) {
        Ok(()) => debug!("Saved settings to {path:?}"),
        Err(e) => error!("Failed to save settings to {path:?}: {e}"),
    }
}

fn generate_settings_yaml(settings: &Settings) -> String {
    let mut content = String::new();

    content.push_str(&format!("version: {}\n", settings.version));
    content.push_str(&format!(
        "device_pixel_ratio: {}\n",
        settings.device_pixel_ratio
    ));
    content.push_str(&format!("transition_ms: {}\n", settings.transition_ms));
    content.push_str(&format!(
        "resize_debounce_ms: {}\n",
        settings.resize_debounce_ms
    ));
    content.push_str(&format!(
        "thumbnail_workers: {}\n",
        settings.thumbnail_workers
    ));
    content.push_str(&format!("page_cache_size: {}\n", settings.page_cache_size));
    content.push('\n');

    content.push_str(CATALOG_TEMPLATE);

    if settings.catalog.is_empty() {
        content.push_str("catalog: []\n");
    } else {
        match serde_yaml::to_string(&settings.catalog) {
            Ok(entries) => {
                content.push_str("catalog:\n");
                for line in entries.lines() {
                    content.push_str("  ");
                    content.push_str(line);
                    content.push('\n');
                }
            }
            Err(e) => {
                error!("Failed to serialize catalog: {e}");
                content.push_str("catalog: []\n");
            }
        }
    }

    content
}

const CATALOG_TEMPLATE: &str = r#"# ============================================================================
# Catalog
# ============================================================================
# Documents listed on startup when no files are given on the command line.
# Relative URLs resolve against the working directory.
#
# Example:
#   - title: "ISO 9001 Certificate"
#     url: "certificates/iso9001.pdf"

"#;

// Public API for accessing settings

pub fn current() -> Settings {
    SETTINGS.read().map(|s| s.clone()).unwrap_or_default()
}

pub fn get_viewer_config() -> ViewerConfig {
    current().viewer_config()
}

pub fn get_catalog() -> Vec<CatalogEntry> {
    SETTINGS
        .read()
        .map(|s| s.catalog.clone())
        .unwrap_or_default()
}

pub fn get_thumbnail_workers() -> usize {
    SETTINGS
        .read()
        .map(|s| s.thumbnail_workers)
        .unwrap_or_else(|_| default_thumbnail_workers())
}

pub fn set_device_pixel_ratio(ratio: f32) {
    if let Ok(mut settings) = SETTINGS.write() {
        settings.device_pixel_ratio = ratio;
    }
}
