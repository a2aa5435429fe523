use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use mandelview_core::history::DEFAULT_HISTORY_CAPACITY;
use mandelview_core::{IterationLimit, PrecisionMode, View};
use mandelview_render::{ColorScheme, SessionSettings};

const CONFIG_FILE: &str = "config.json";

pub const MIN_WINDOW_WIDTH: f32 = 500.0;
pub const MIN_WINDOW_HEIGHT: f32 = 400.0;

// ---------------------------------------------------------------------------
// Explorer configuration
// ---------------------------------------------------------------------------

/// Startup settings read from `config.json`. Never written back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplorerConfig {
    #[serde(default = "default_window_width")]
    pub window_width: f32,
    #[serde(default = "default_window_height")]
    pub window_height: f32,
    #[serde(default = "default_zoom")]
    pub zoom: f64,
    #[serde(default = "default_offset_x")]
    pub offset_x: f64,
    #[serde(default)]
    pub offset_y: f64,
    #[serde(default = "default_max_iteration")]
    pub max_iteration: u32,
    #[serde(default = "default_true")]
    pub antialiasing: bool,
    #[serde(default)]
    pub auto_refresh: bool,
    /// Start in arbitrary-precision mode.
    #[serde(default)]
    pub arbitrary_precision: bool,
    #[serde(default)]
    pub color_scheme: ColorScheme,
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,
}

fn default_window_width() -> f32 {
    1200.0
}
fn default_window_height() -> f32 {
    800.0
}
fn default_zoom() -> f64 {
    View::DEFAULT_ZOOM
}
fn default_offset_x() -> f64 {
    View::DEFAULT_OFFSET_X
}
fn default_max_iteration() -> u32 {
    IterationLimit::DEFAULT
}
fn default_true() -> bool {
    true
}
fn default_history_capacity() -> usize {
    DEFAULT_HISTORY_CAPACITY
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            window_width: default_window_width(),
            window_height: default_window_height(),
            zoom: default_zoom(),
            offset_x: default_offset_x(),
            offset_y: 0.0,
            max_iteration: default_max_iteration(),
            antialiasing: true,
            auto_refresh: false,
            arbitrary_precision: false,
            color_scheme: ColorScheme::default(),
            history_capacity: default_history_capacity(),
        }
    }
}

impl ExplorerConfig {
    /// Load from the platform config directory, then from next to the
    /// executable, falling back to defaults.
    pub fn load() -> Self {
        for path in candidate_paths() {
            if let Some(config) = Self::load_from(&path) {
                return config;
            }
        }
        debug!("No config file found, using defaults");
        Self::default()
    }

    /// Read and validate one file. `None` when it is missing or unreadable.
    pub fn load_from(path: &Path) -> Option<Self> {
        if !path.exists() {
            debug!("No config file at {}", path.display());
            return None;
        }
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) => {
                error!("Failed to read config file {}: {e}", path.display());
                return None;
            }
        };
        match Self::from_json(&json) {
            Ok(config) => {
                info!("Loaded config from {}", path.display());
                Some(config)
            }
            Err(e) => {
                error!("Failed to parse config {}: {e}", path.display());
                None
            }
        }
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str::<ExplorerConfig>(json).map(Self::sanitized)
    }

    /// Replace out-of-range values with their defaults.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if !(self.window_width.is_finite() && self.window_width >= MIN_WINDOW_WIDTH) {
            warn!(value = self.window_width, "Invalid window_width in config");
            self.window_width = defaults.window_width;
        }
        if !(self.window_height.is_finite() && self.window_height >= MIN_WINDOW_HEIGHT) {
            warn!(value = self.window_height, "Invalid window_height in config");
            self.window_height = defaults.window_height;
        }
        if View::new(self.zoom, self.offset_x, self.offset_y).is_err() {
            warn!(
                zoom = self.zoom,
                offset_x = self.offset_x,
                offset_y = self.offset_y,
                "Invalid initial view in config"
            );
            self.zoom = defaults.zoom;
            self.offset_x = defaults.offset_x;
            self.offset_y = defaults.offset_y;
        }
        if IterationLimit::new(self.max_iteration).is_err() {
            warn!(value = self.max_iteration, "Invalid max_iteration in config");
            self.max_iteration = defaults.max_iteration;
        }
        if self.history_capacity == 0 {
            warn!("history_capacity must be at least 1");
            self.history_capacity = defaults.history_capacity;
        }
        self
    }

    pub fn initial_view(&self) -> View {
        View::new(self.zoom, self.offset_x, self.offset_y).unwrap_or_default()
    }

    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            view: self.initial_view(),
            max_iteration: self.max_iteration,
            antialiasing: self.antialiasing,
            auto_refresh: self.auto_refresh,
            precision: if self.arbitrary_precision {
                PrecisionMode::Arbitrary
            } else {
                PrecisionMode::Standard
            },
            color_scheme: self.color_scheme,
            history_capacity: self.history_capacity,
        }
    }
}

fn candidate_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(dirs) = directories::ProjectDirs::from("", "", "Mandelview") {
        paths.push(dirs.config_dir().join(CONFIG_FILE));
    }
    paths.push(exe_directory().join(CONFIG_FILE));
    paths
}

/// Directory containing the running executable. Falls back to current directory if unavailable.
fn exe_directory() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(PathBuf::from))
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}
