//! Configuration persistence for geofence editor settings

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::domain::{BaseLayer, GeoPoint, GestureKind};
use crate::overlays::RoleStyles;

/// Tile URL templates for each base layer (`{z}`, `{x}`, `{y}` placeholders)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TileSources {
    pub standard: String,
    pub satellite: String,
    pub hybrid: String,
}

impl TileSources {
    pub fn url_for(&self, layer: BaseLayer) -> &str {
        match layer {
            BaseLayer::Standard => &self.standard,
            BaseLayer::Satellite => &self.satellite,
            BaseLayer::Hybrid => &self.hybrid,
        }
    }
}

impl Default for TileSources {
    fn default() -> Self {
        Self {
            standard: "https://tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            satellite: "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{z}/{y}/{x}".to_string(),
            hybrid: "https://mt1.google.com/vt/lyrs=y&x={x}&y={y}&z={z}".to_string(),
        }
    }
}

/// Free-text location search settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeocoderConfig {
    /// Nominatim-compatible search endpoint
    pub endpoint: String,
    /// Sent with every request; public Nominatim refuses anonymous clients
    pub user_agent: String,
    pub timeout_secs: u64,
    /// Results requested per query (only the first is used)
    pub result_limit: u32,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://nominatim.openstreetmap.org/search".to_string(),
            user_agent: concat!("geofence-editor/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_secs: 10,
            result_limit: 1,
        }
    }
}

/// Initial map view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub center_longitude: f64,
    pub center_latitude: f64,
    pub zoom: u8,
    /// Zoom applied when a search re-centers the view
    pub search_zoom: u8,
}

impl ViewConfig {
    /// Configured center, or the default one if the file holds nonsense
    pub fn center(&self) -> GeoPoint {
        match GeoPoint::new(self.center_longitude, self.center_latitude) {
            Ok(point) => point,
            Err(err) => {
                log::warn!("Invalid view center in config, using default: {err}");
                let fallback = ViewConfig::default();
                GeoPoint::new_unchecked(fallback.center_longitude, fallback.center_latitude)
            }
        }
    }
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            center_longitude: 76.9366,
            center_latitude: 8.5241,
            zoom: 12,
            search_zoom: 15,
        }
    }
}

/// Editor configuration persisted between sessions
///
/// One editor core serves every geofence and waypoint screen; screens differ
/// only in these settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Gesture used when drawing starts
    pub gesture: GestureKind,
    /// Whether saved records other than the active one are shown
    pub show_others: bool,
    /// Base layer selected on mount
    pub base_layer: BaseLayer,
    pub tiles: TileSources,
    pub styles: RoleStyles,
    pub geocoder: GeocoderConfig,
    pub view: ViewConfig,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            gesture: GestureKind::Box,
            show_others: true,
            base_layer: BaseLayer::Standard,
            tiles: TileSources::default(),
            styles: RoleStyles::default(),
            geocoder: GeocoderConfig::default(),
            view: ViewConfig::default(),
        }
    }
}

impl EditorConfig {
    /// Directory name under the user's config dir
    pub const ID: &'static str = "geofence-editor";

    /// Settings for a waypoint (bus stop) screen
    pub fn waypoint() -> Self {
        Self {
            gesture: GestureKind::Point,
            ..Self::default()
        }
    }

    pub fn with_gesture(mut self, gesture: GestureKind) -> Self {
        self.gesture = gesture;
        self
    }

    pub fn with_show_others(mut self, show_others: bool) -> Self {
        self.show_others = show_others;
        self
    }

    /// Default location of the config file
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(Self::ID).join("config.json"))
    }

    /// Load configuration from disk, or return defaults if unavailable
    pub fn load() -> Self {
        let Some(path) = Self::path() else {
            log::warn!("No config directory available, using defaults");
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("Error loading config, using defaults: {err:?}");
                Self::default()
            }
        }
    }

    /// Save configuration to disk
    pub fn save(&self) {
        match Self::path() {
            Some(path) => {
                if let Err(err) = self.save_to(&path) {
                    log::error!("Failed to save config: {err:?}");
                }
            }
            None => log::error!("No config directory available for saving"),
        }
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let text = serde_json::to_string_pretty(self)?;
        fs::write(path, text).with_context(|| format!("writing {}", path.display()))
    }
}
