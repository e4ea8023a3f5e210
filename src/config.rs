//! Application configuration
//!
//! Configuration is loaded from multiple sources with the following priority (lowest to highest):
//! 1. `config/default.toml` (version controlled)
//! 2. `config/user.toml` (gitignored, user overrides)
//! 3. Environment variables (`HULL_SECTION__KEY`)

use figment::{Figment, providers::{Format, Toml, Env}};
use nalgebra::{point, vector};
use serde::{Serialize, Deserialize};
use std::path::Path;

use crate::camera::Camera;
use crate::picture::Rgb;
use crate::polytope::Tolerances;
use crate::shade::{Lighting, BACKGROUND_COLOR};
use crate::solid::Solid;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub scene: SceneConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub lighting: LightingConfig,
    #[serde(default)]
    pub animation: AnimationConfig,
    #[serde(default)]
    pub tolerances: Tolerances,
    #[serde(default)]
    pub debug: DebugConfig,
}

impl AppConfig {
    /// Load configuration from default locations
    ///
    /// Priority (lowest to highest):
    /// 1. `config/default.toml`
    /// 2. `config/user.toml`
    /// 3. Environment variables (`HULL_*`)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific config directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();
        let default_path = config_dir.join("default.toml");
        let user_path = config_dir.join("user.toml");

        let mut figment = Figment::new();

        if default_path.exists() {
            figment = figment.merge(Toml::file(&default_path));
        }

        if user_path.exists() {
            figment = figment.merge(Toml::file(&user_path));
        }

        // HULL_SCENE__SOLID=cube -> scene.solid = "cube"
        figment = figment.merge(Env::prefixed("HULL_").split("__"));

        figment.extract().map_err(ConfigError::from)
    }
}

/// Window configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    pub title: String,
    /// Width in pixels, also the width of the rendered picture
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Dodecahedron".to_string(),
            width: 800,
            height: 600,
        }
    }
}

/// What gets rendered
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneConfig {
    pub solid: Solid,
    /// Uniform scale applied to the solid's canonical vertices
    pub model_scale: f64,
    /// Upper bound on extracted face planes
    pub max_faces: usize,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            solid: Solid::Dodecahedron,
            model_scale: 0.5,
            max_faces: 30,
        }
    }
}

/// Camera configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Eye position [x, y, z]
    pub position: [f64; 3],
    /// Pixels per world unit on the image plane
    pub screen_scale: f64,
    /// Eye to image plane distance
    pub focal_depth: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, -5.0],
            screen_scale: 300.0,
            focal_depth: 5.0,
        }
    }
}

impl CameraConfig {
    pub fn camera(&self) -> Camera {
        let [x, y, z] = self.position;
        Camera {
            position: point![x, y, z],
            screen_scale: self.screen_scale,
            focal_depth: self.focal_depth,
        }
    }
}

/// Lighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LightingConfig {
    /// Direction towards the light [x, y, z], normalized on use
    pub direction: [f64; 3],
    /// Color of pixels that miss the solid, as 0xRRGGBB
    pub background: Rgb,
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            direction: [1.0, 1.0, -1.0],
            background: BACKGROUND_COLOR,
        }
    }
}

impl LightingConfig {
    pub fn lighting(&self) -> Lighting {
        let [x, y, z] = self.direction;
        Lighting::new(vector![x, y, z], self.background)
    }
}

/// Animation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimationConfig {
    /// Rotation speed in radians per second
    pub angular_speed: f64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            angular_speed: 1.0,
        }
    }
}

/// Debug configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebugConfig {
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
    /// Milliseconds between FPS reports
    pub fps_interval_ms: u64,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            fps_interval_ms: 1000,
        }
    }
}

/// Configuration error
#[derive(Debug)]
pub struct ConfigError {
    message: String,
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError {
            message: e.to_string(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Configuration error: {}", self.message)
    }
}

impl std::error::Error for ConfigError {}
