//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Deepest quadtree the loader accepts. Depth 10 is already ~1.4M nodes.
pub const MAX_SUPPORTED_DEPTH: u8 = 10;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Terrain footprint and LOD settings.
    pub terrain: TerrainConfig,
    /// Initial camera placement and projection.
    pub camera: CameraConfig,
    /// Headless fly-through settings.
    pub flythrough: FlythroughConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Terrain quadtree configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TerrainConfig {
    /// Side length of the square terrain in world units.
    pub size: f32,
    /// Subdivision depth of the quadtree leaves.
    pub max_depth: u8,
    /// Ascending camera distances at which the LOD level steps up.
    pub lod_distances: Vec<f32>,
    /// Maximum terrain height; every node's bounds span `[0, height_ceiling]`.
    pub height_ceiling: f32,
    /// Cull nodes outside the view frustum.
    pub frustum_culling: bool,
}

/// Camera configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    /// Starting position in world space.
    pub position: [f32; 3],
    /// Heading in degrees; 0 looks along +Z.
    pub yaw_deg: f32,
    /// Pitch in degrees; negative looks down.
    pub pitch_deg: f32,
    /// Vertical field of view in degrees.
    pub fov_y_deg: f32,
    /// Width / height.
    pub aspect_ratio: f32,
    /// Near clip distance.
    pub near: f32,
    /// Far clip distance.
    pub far: f32,
}

/// Fly-through configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FlythroughConfig {
    /// Number of frames to simulate.
    pub frames: u32,
    /// Forward speed in world units per second.
    pub speed: f32,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
    /// Log a render-list summary every this many frames (0 = never).
    pub report_interval: u32,
    /// Write the last frame's render list as JSON to this path.
    pub dump_path: Option<PathBuf>,
}

// --- Default implementations ---

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            size: 2048.0,
            max_depth: 4,
            lod_distances: vec![250.0, 500.0, 1000.0, 2000.0],
            height_ceiling: 500.0,
            frustum_culling: true,
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [1024.0, 300.0, 200.0],
            yaw_deg: 0.0,
            pitch_deg: -20.0,
            fov_y_deg: 45.0,
            aspect_ratio: 16.0 / 9.0,
            near: 1.0,
            far: 10000.0,
        }
    }
}

impl Default for FlythroughConfig {
    fn default() -> Self {
        Self {
            frames: 600,
            speed: 120.0,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            report_interval: 60,
            dump_path: None,
        }
    }
}

/// Per-user config directory, `<config dir>/terra`.
pub fn default_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("terra"))
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join("config.ron");

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join("config.ron");
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Reject settings the quadtree and camera cannot sensibly use.
    ///
    /// Every float must be finite; NaN and infinities are rejected alongside
    /// out-of-range values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let terrain = &self.terrain;
        if !terrain.size.is_finite() || terrain.size <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "terrain.size must be positive, got {}",
                terrain.size
            )));
        }
        if terrain.max_depth > MAX_SUPPORTED_DEPTH {
            return Err(ConfigError::Invalid(format!(
                "terrain.max_depth {} exceeds the supported maximum {MAX_SUPPORTED_DEPTH}",
                terrain.max_depth
            )));
        }
        if terrain.lod_distances.iter().any(|d| !d.is_finite() || *d < 0.0) {
            return Err(ConfigError::Invalid(format!(
                "terrain.lod_distances must be finite and non-negative, got {:?}",
                terrain.lod_distances
            )));
        }
        if terrain.lod_distances.windows(2).any(|w| w[0] > w[1]) {
            return Err(ConfigError::Invalid(format!(
                "terrain.lod_distances must be ascending, got {:?}",
                terrain.lod_distances
            )));
        }
        if terrain.lod_distances.len() > usize::from(terrain.max_depth) {
            log::warn!(
                "{} LOD distances configured for depth {}; the coarsest levels will never split",
                terrain.lod_distances.len(),
                terrain.max_depth
            );
        }
        if !terrain.height_ceiling.is_finite() || terrain.height_ceiling < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "terrain.height_ceiling must be non-negative, got {}",
                terrain.height_ceiling
            )));
        }

        let camera = &self.camera;
        if !camera.near.is_finite()
            || !camera.far.is_finite()
            || camera.near <= 0.0
            || camera.far <= camera.near
        {
            return Err(ConfigError::Invalid(format!(
                "camera clip range must satisfy 0 < near < far, got near={} far={}",
                camera.near, camera.far
            )));
        }
        if !camera.fov_y_deg.is_finite() || camera.fov_y_deg <= 0.0 || camera.fov_y_deg >= 180.0 {
            return Err(ConfigError::Invalid(format!(
                "camera.fov_y_deg must be in (0, 180), got {}",
                camera.fov_y_deg
            )));
        }
        if !camera.aspect_ratio.is_finite() || camera.aspect_ratio <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "camera.aspect_ratio must be positive, got {}",
                camera.aspect_ratio
            )));
        }
        Ok(())
    }
}
