//! Command line options. Every flag overrides the matching config value.

use std::path::PathBuf;

use clap::Parser;
use orrery_config::Config;
use orrery_core::{AnimationSpeed, SceneKey};

#[derive(Debug, Parser)]
#[command(version, about = "An animated portfolio for the terminal")]
pub struct Cli {
    /// Read configuration from this file instead of the default location.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Page content as TOML.
    #[arg(long, value_name = "PATH")]
    pub content: Option<PathBuf>,

    /// Target frames per second.
    #[arg(long)]
    pub fps: Option<u32>,

    /// Animation speed: slow, medium or fast.
    #[arg(long)]
    pub speed: Option<AnimationSpeed>,

    /// Section to open on.
    #[arg(long)]
    pub scene: Option<SceneKey>,

    /// Disable the cursor halo.
    #[arg(long)]
    pub no_halo: bool,

    /// Disable the navigation rain.
    #[arg(long)]
    pub no_rain: bool,

    /// Seed for stars and rain.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Log filter, e.g. `debug` or `orrery_background=trace`.
    #[arg(long, value_name = "FILTER")]
    pub log_level: Option<String>,

    /// Write the effective configuration to the config path and exit.
    #[arg(long)]
    pub write_config: bool,
}

impl Cli {
    /// Fold the command line overrides into `config`.
    pub fn apply(&self, config: &mut Config) {
        if let Some(content) = &self.content {
            config.content = Some(content.clone());
        }
        if let Some(fps) = self.fps {
            config.animation.fps = fps;
        }
        if let Some(speed) = self.speed {
            config.animation.speed = speed;
        }
        if let Some(scene) = self.scene {
            config.initial_scene = scene;
        }
        if self.no_halo {
            config.animation.halo = false;
        }
        if self.no_rain {
            config.animation.rain = false;
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_flags_keeps_config() {
        let cli = Cli::try_parse_from(["orrery"]).unwrap();
        let mut config = Config::default();
        cli.apply(&mut config);
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_flags_override() {
        let cli = Cli::try_parse_from([
            "orrery",
            "--fps",
            "30",
            "--speed",
            "fast",
            "--scene",
            "skills",
            "--no-rain",
            "--log-level",
            "debug",
            "--seed",
            "7",
        ])
        .unwrap();
        let mut config = Config::default();
        cli.apply(&mut config);
        assert_eq!(config.animation.fps, 30);
        assert_eq!(config.animation.speed, AnimationSpeed::Fast);
        assert_eq!(config.initial_scene, SceneKey::Skills);
        assert!(!config.animation.rain);
        assert!(config.animation.halo);
        assert_eq!(config.log_level, "debug");
        assert_eq!(cli.seed, Some(7));
    }

    #[test]
    fn test_unknown_scene_rejected() {
        assert!(Cli::try_parse_from(["orrery", "--scene", "nowhere"]).is_err());
    }
}
