//! Static configuration for the globe.
//!
//! Loaded from `globe.json` in the working directory (or the path in
//! `TUI_GLOBE_CONFIG`). Every field has a default, so a missing file or a
//! partial file is fine.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Environment variable overriding the config file location
pub const CONFIG_ENV_VAR: &str = "TUI_GLOBE_CONFIG";

/// Default config file name, relative to the working directory
pub const DEFAULT_CONFIG_FILE: &str = "globe.json";

/// Administrative boundary granularity
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Country,
    Province,
    City,
    County,
}

impl Tier {
    pub fn name(&self) -> &'static str {
        match self {
            Tier::Country => "country",
            Tier::Province => "province",
            Tier::City => "city",
            Tier::County => "county",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 24-bit line colour, written as `[r, g, b]` in the config file
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(255, 255, 255);
    pub const ORANGE: Rgb = Rgb(255, 165, 0);
    pub const RED: Rgb = Rgb(255, 0, 0);

    /// Multiply each channel by `factor` (0..=1)
    pub fn shade(self, factor: f64) -> Rgb {
        let f = factor.clamp(0.0, 1.0);
        Rgb(
            (self.0 as f64 * f).round() as u8,
            (self.1 as f64 * f).round() as u8,
            (self.2 as f64 * f).round() as u8,
        )
    }
}

/// One row of the LOD table
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TierConfig {
    pub tier: Tier,
    pub color: Rgb,
    /// GeoJSON feature collection for this tier
    pub path: PathBuf,
    /// Visible from this scale (inclusive)
    pub min_scale: f64,
    /// Hidden from this scale (exclusive); `None` = no upper bound
    #[serde(default)]
    pub max_scale: Option<f64>,
    /// Disabled tiers are neither loaded nor shown
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EarthConfig {
    /// Base sphere radius in scene units
    pub radius: f64,
    /// Lift of boundary lines above the surface
    pub surface_offset: f64,
    /// Equirectangular base-colour texture
    pub texture_path: PathBuf,
    /// Flat colour used when the texture is missing
    pub ocean_color: Rgb,
}

impl Default for EarthConfig {
    fn default() -> Self {
        Self {
            radius: 1.0,
            surface_offset: 0.001,
            texture_path: PathBuf::from("assets/earth_25M_black.jpg"),
            ocean_color: Rgb(12, 28, 56),
        }
    }
}

impl EarthConfig {
    /// Radius at which boundary vertices are projected
    pub fn boundary_radius(&self) -> f64 {
        self.radius + self.surface_offset
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomConfig {
    /// Un-zoomed scale; the globe never shrinks below its base size, so >= 1
    pub min_scale: f64,
    pub max_scale: f64,
    /// Target change per wheel notch
    pub wheel_step: f64,
    /// Fraction of the remaining distance covered each frame
    pub smoothing: f64,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            min_scale: 1.0,
            max_scale: 20.0,
            wheel_step: 0.1,
            smoothing: 0.3,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees
    pub fov_y_deg: f64,
    pub near: f64,
    pub far: f64,
    pub initial_distance: f64,
    /// min distance = radius * scale * this
    pub min_distance_factor: f64,
    /// max distance = radius * scale * this
    pub max_distance_factor: f64,
    /// Per-frame decay of drag velocity
    pub damping: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_y_deg: 75.0,
            near: 0.1,
            far: 1000.0,
            initial_distance: 3.0,
            min_distance_factor: 1.01,
            max_distance_factor: 20.0,
            damping: 0.05,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightingConfig {
    /// Light position; treated as a direction from the origin
    pub position: [f64; 3],
    pub ambient: f64,
    pub diffuse: f64,
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            position: [5.0, 5.0, 5.0],
            ambient: 0.35,
            diffuse: 0.9,
        }
    }
}

/// Complete globe configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobeConfig {
    pub earth: EarthConfig,
    pub zoom: ZoomConfig,
    pub camera: CameraConfig,
    pub lighting: LightingConfig,
    /// Ordered LOD table, coarsest first. Also the draw order.
    pub tiers: Vec<TierConfig>,
}

impl Default for GlobeConfig {
    fn default() -> Self {
        Self {
            earth: EarthConfig::default(),
            zoom: ZoomConfig::default(),
            camera: CameraConfig::default(),
            lighting: LightingConfig::default(),
            tiers: default_tiers(),
        }
    }
}

/// Country below scale 4, province from 4 on. City and county have data
/// paths but are not part of the visibility partition until enabled.
pub fn default_tiers() -> Vec<TierConfig> {
    vec![
        TierConfig {
            tier: Tier::Country,
            color: Rgb::WHITE,
            path: PathBuf::from("geojson/countries.geojson"),
            min_scale: 1.0,
            max_scale: Some(4.0),
            enabled: true,
        },
        TierConfig {
            tier: Tier::Province,
            color: Rgb::ORANGE,
            path: PathBuf::from("geojson/provinces.geojson"),
            min_scale: 4.0,
            max_scale: None,
            enabled: true,
        },
        TierConfig {
            tier: Tier::City,
            color: Rgb::RED,
            path: PathBuf::from("geojson/cities.geojson"),
            min_scale: 8.0,
            max_scale: Some(14.0),
            enabled: false,
        },
        TierConfig {
            tier: Tier::County,
            color: Rgb::WHITE,
            path: PathBuf::from("geojson/counties.geojson"),
            min_scale: 14.0,
            max_scale: None,
            enabled: false,
        },
    ]
}

impl GlobeConfig {
    /// Load from `$TUI_GLOBE_CONFIG` or `./globe.json`.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var_os(CONFIG_ENV_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        Self::load_from(&path)
    }

    /// Load from a specific path.
    ///
    /// If the file doesn't exist, returns validated defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!(path = %path.display(), "No config file, using defaults");
            let config = Self::default();
            config.validate()?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        tracing::info!(path = %path.display(), tiers = config.tiers.len(), "Loaded config");
        Ok(config)
    }

    /// Check scalar ranges and that enabled tiers partition the scale axis
    /// without overlapping.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.earth.radius <= 0.0 {
            return Err(ConfigError::InvalidValue {
                key: "earth.radius",
                value: self.earth.radius,
                reason: "must be positive",
            });
        }
        if self.earth.surface_offset < 0.0 {
            return Err(ConfigError::InvalidValue {
                key: "earth.surface_offset",
                value: self.earth.surface_offset,
                reason: "must not be negative",
            });
        }
        if !(self.zoom.min_scale >= 1.0) {
            return Err(ConfigError::InvalidValue {
                key: "zoom.min_scale",
                value: self.zoom.min_scale,
                reason: "must be at least 1",
            });
        }
        if self.zoom.max_scale < self.zoom.min_scale {
            return Err(ConfigError::InvalidValue {
                key: "zoom.max_scale",
                value: self.zoom.max_scale,
                reason: "must not be below zoom.min_scale",
            });
        }
        if !(self.zoom.smoothing > 0.0 && self.zoom.smoothing <= 1.0) {
            return Err(ConfigError::InvalidValue {
                key: "zoom.smoothing",
                value: self.zoom.smoothing,
                reason: "must be in (0, 1]",
            });
        }
        if self.zoom.wheel_step <= 0.0 {
            return Err(ConfigError::InvalidValue {
                key: "zoom.wheel_step",
                value: self.zoom.wheel_step,
                reason: "must be positive",
            });
        }
        if self.camera.min_distance_factor > self.camera.max_distance_factor {
            return Err(ConfigError::InvalidValue {
                key: "camera.min_distance_factor",
                value: self.camera.min_distance_factor,
                reason: "must not exceed camera.max_distance_factor",
            });
        }

        for (i, entry) in self.tiers.iter().enumerate() {
            if self.tiers[..i].iter().any(|other| other.tier == entry.tier) {
                return Err(ConfigError::InvalidTier {
                    tier: entry.tier.to_string(),
                    reason: "listed more than once".to_string(),
                });
            }
            if let Some(max) = entry.max_scale {
                if max <= entry.min_scale {
                    return Err(ConfigError::InvalidTier {
                        tier: entry.tier.to_string(),
                        reason: format!("max_scale {max} must be above min_scale {}", entry.min_scale),
                    });
                }
            }
        }

        let mut enabled: Vec<&TierConfig> = self.tiers.iter().filter(|t| t.enabled).collect();
        enabled.sort_by(|a, b| a.min_scale.total_cmp(&b.min_scale));
        for pair in enabled.windows(2) {
            let (lower, upper) = (pair[0], pair[1]);
            let lower_end = lower.max_scale.unwrap_or(f64::INFINITY);
            if lower_end > upper.min_scale {
                return Err(ConfigError::InvalidTier {
                    tier: upper.tier.to_string(),
                    reason: format!(
                        "scale range starting at {} overlaps {} (ends at {lower_end})",
                        upper.min_scale, lower.tier
                    ),
                });
            }
        }

        Ok(())
    }

    /// Table entry for a tier, if configured
    pub fn tier(&self, tier: Tier) -> Option<&TierConfig> {
        self.tiers.iter().find(|t| t.tier == tier)
    }
}
