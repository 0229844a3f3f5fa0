//! Configuration file handling for orrery.
//!
//! The configuration lives in `config.toml` under the platform config
//! directory. A missing file yields the defaults; a malformed one is an error.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use orrery_core::{AnimationSpeed, Rgb, SceneKey, ScenePreset, SceneRegistry};
use serde::{Deserialize, Serialize};

/// Lowest accepted frame rate.
pub const MIN_FPS: u32 = 1;
/// Highest accepted frame rate.
pub const MAX_FPS: u32 = 240;

/// Errors raised while reading or writing the configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Top-level application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Section whose scene the background starts in.
    pub initial_scene: SceneKey,
    /// Log filter used when `RUST_LOG` is unset.
    pub log_level: String,
    /// Optional TOML file replacing the built-in page content.
    pub content: Option<PathBuf>,
    /// Background animation settings.
    pub animation: AnimationConfig,
    /// Per-section tweaks to the built-in scene presets.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub scenes: Vec<SceneOverride>,
}

/// Replaces parts of one section's preset. Unset fields keep the built-in value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneOverride {
    pub key: SceneKey,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub planet_radius: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orbit_radius: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub angular_speed: Option<f32>,
    /// Hex color such as `"#A31F34"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_color: Option<Rgb>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ring_color: Option<Rgb>,
}

impl SceneOverride {
    fn apply(&self, base: &ScenePreset) -> ScenePreset {
        ScenePreset::new(
            self.key.as_str(),
            self.planet_radius.unwrap_or(base.planet_radius),
            self.orbit_radius.unwrap_or(base.orbit_radius),
            self.angular_speed.unwrap_or(base.angular_speed),
            self.body_color.unwrap_or(base.body_color),
            self.ring_color.unwrap_or(base.ring_color),
        )
    }
}

/// Settings for the animated layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    pub speed: AnimationSpeed,
    /// Target frames per second.
    pub fps: u32,
    /// Number of stars seeded into the backdrop.
    pub star_count: usize,
    /// Draw the cursor-following glow.
    pub halo: bool,
    /// Draw the falling characters behind the navigation bar.
    pub rain: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            initial_scene: SceneKey::Hero,
            log_level: "warn".to_string(),
            content: None,
            animation: AnimationConfig::default(),
            scenes: Vec::new(),
        }
    }
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            speed: AnimationSpeed::Medium,
            fps: 60,
            star_count: 140,
            halo: true,
            rain: true,
        }
    }
}

impl AnimationConfig {
    /// Frame rate clamped to the supported range.
    pub fn effective_fps(&self) -> u32 {
        self.fps.clamp(MIN_FPS, MAX_FPS)
    }
}

impl Config {
    /// Platform directories for the application, if a home directory exists.
    pub fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("", "", "orrery")
    }

    /// Default location of `config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Load from the default location, falling back to defaults.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) => Self::load_from(&path),
            None => {
                log::warn!("no home directory found, using default configuration");
                Ok(Self::default())
            }
        }
    }

    /// Load from `path`. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::info!("no config at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        let config = Self::from_toml(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("loaded config from {}", path.display());
        Ok(config)
    }

    /// The built-in presets with this file's overrides applied.
    pub fn registry(&self) -> SceneRegistry {
        let mut registry = SceneRegistry::builtin();
        for scene in &self.scenes {
            let preset = scene.apply(registry.resolve(scene.key.as_str()));
            registry.insert(preset);
        }
        registry
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Write the configuration to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let text = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(path, text).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.initial_scene, SceneKey::Hero);
        assert_eq!(config.animation.fps, 60);
        assert_eq!(config.animation.star_count, 140);
        assert!(config.animation.halo);
        assert!(config.animation.rain);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = Config::from_toml(
            r#"
            initial_scene = "contact"

            [animation]
            speed = "fast"
            rain = false
            "#,
        )
        .unwrap();
        assert_eq!(config.initial_scene, SceneKey::Contact);
        assert_eq!(config.animation.speed, AnimationSpeed::Fast);
        assert!(!config.animation.rain);
        assert!(config.animation.halo);
        assert_eq!(config.animation.fps, 60);
    }

    #[test]
    fn test_unknown_scene_is_rejected() {
        assert!(Config::from_toml(r#"initial_scene = "nowhere""#).is_err());
    }

    #[test]
    fn test_fps_is_clamped() {
        let mut animation = AnimationConfig::default();
        animation.fps = 0;
        assert_eq!(animation.effective_fps(), MIN_FPS);
        animation.fps = 1000;
        assert_eq!(animation.effective_fps(), MAX_FPS);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = Config::default();
        config.initial_scene = SceneKey::Grants;
        config.animation.star_count = 32;
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_scene_overrides_patch_registry() {
        let config = Config::from_toml(
            r##"
            [[scenes]]
            key = "about"
            planet_radius = 90.0
            body_color = "#00ff80"
            "##,
        )
        .unwrap();
        let registry = config.registry();
        let about = registry.resolve("about");
        assert_eq!(about.planet_radius, 90.0);
        assert_eq!(about.body_color, Rgb::new(0x00, 0xFF, 0x80));
        // Untouched fields and scenes keep the built-in values.
        let builtin = SceneRegistry::builtin();
        assert_eq!(about.orbit_radius, builtin.resolve("about").orbit_radius);
        assert_eq!(registry.resolve("grants"), builtin.resolve("grants"));
        assert_eq!(registry.len(), builtin.len());
    }

    #[test]
    fn test_bad_scene_color_is_rejected() {
        let bad = r##"
            [[scenes]]
            key = "hero"
            ring_color = "#+12345"
            "##;
        assert!(Config::from_toml(bad).is_err());
    }

    #[test]
    fn test_scene_overrides_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut config = Config::default();
        config.scenes.push(SceneOverride {
            key: SceneKey::Contact,
            planet_radius: None,
            orbit_radius: Some(150.0),
            angular_speed: None,
            body_color: Some(Rgb::new(1, 2, 3)),
            ring_color: None,
        });
        config.save_to(&path).unwrap();
        assert!(fs::read_to_string(&path).unwrap().contains("#010203"));
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "animation = 3").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::Parse { .. })
        ));
    }
}
