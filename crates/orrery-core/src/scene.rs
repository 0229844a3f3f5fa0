//! Scene presets and the registry that maps section keys onto them.

use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::color::{Rgb, palette};

/// Identifier of a content section, which doubles as a scene key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SceneKey {
    #[default]
    Hero,
    About,
    Interests,
    Featured,
    Skills,
    Experience,
    Publications,
    Grants,
    Teaching,
    Awards,
    Contact,
}

/// Error returned when parsing a string that names no section.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown section {0:?}")]
pub struct UnknownSceneKey(pub String);

impl SceneKey {
    /// Every section in page order.
    pub const ALL: [SceneKey; 11] = [
        SceneKey::Hero,
        SceneKey::About,
        SceneKey::Interests,
        SceneKey::Featured,
        SceneKey::Skills,
        SceneKey::Experience,
        SceneKey::Publications,
        SceneKey::Grants,
        SceneKey::Teaching,
        SceneKey::Awards,
        SceneKey::Contact,
    ];

    /// Sections listed in the navigation bar (everything but the hero).
    pub const NAV: [SceneKey; 10] = [
        SceneKey::About,
        SceneKey::Interests,
        SceneKey::Featured,
        SceneKey::Skills,
        SceneKey::Experience,
        SceneKey::Publications,
        SceneKey::Grants,
        SceneKey::Teaching,
        SceneKey::Awards,
        SceneKey::Contact,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SceneKey::Hero => "hero",
            SceneKey::About => "about",
            SceneKey::Interests => "interests",
            SceneKey::Featured => "featured",
            SceneKey::Skills => "skills",
            SceneKey::Experience => "experience",
            SceneKey::Publications => "publications",
            SceneKey::Grants => "grants",
            SceneKey::Teaching => "teaching",
            SceneKey::Awards => "awards",
            SceneKey::Contact => "contact",
        }
    }

    /// Label shown in the navigation bar.
    pub fn label(self) -> &'static str {
        match self {
            SceneKey::Hero => "Home",
            SceneKey::About => "About",
            SceneKey::Interests => "Research",
            SceneKey::Featured => "Featured",
            SceneKey::Skills => "Skills",
            SceneKey::Experience => "Experience",
            SceneKey::Publications => "Publications",
            SceneKey::Grants => "Grants",
            SceneKey::Teaching => "Teaching",
            SceneKey::Awards => "Awards",
            SceneKey::Contact => "Contact",
        }
    }
}

impl fmt::Display for SceneKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SceneKey {
    type Err = UnknownSceneKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SceneKey::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| UnknownSceneKey(s.to_string()))
    }
}

/// Immutable bundle of parameters the background drifts toward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScenePreset {
    pub key: &'static str,
    /// Radius of the planet disc.
    pub planet_radius: f32,
    /// Horizontal radius of the orbit ellipse.
    pub orbit_radius: f32,
    /// Multiplier on the per-frame orbit phase increment.
    pub angular_speed: f32,
    pub body_color: Rgb,
    pub ring_color: Rgb,
}

impl ScenePreset {
    pub const fn new(
        key: &'static str,
        planet_radius: f32,
        orbit_radius: f32,
        angular_speed: f32,
        body_color: Rgb,
        ring_color: Rgb,
    ) -> Self {
        Self {
            key,
            planet_radius,
            orbit_radius,
            angular_speed,
            body_color,
            ring_color,
        }
    }
}

const BUILTIN_PRESETS: [ScenePreset; 11] = {
    use palette::{GRAY, RED, SILVER, WHITE};
    [
        ScenePreset::new("hero", 70.0, 160.0, 0.12, RED, SILVER),
        ScenePreset::new("about", 60.0, 180.0, 0.1, GRAY, WHITE),
        ScenePreset::new("interests", 80.0, 200.0, 0.08, SILVER, GRAY),
        ScenePreset::new("featured", 72.0, 220.0, 0.09, WHITE, RED),
        ScenePreset::new("skills", 64.0, 190.0, 0.11, GRAY, SILVER),
        ScenePreset::new("experience", 76.0, 210.0, 0.07, RED, WHITE),
        ScenePreset::new("publications", 68.0, 230.0, 0.085, SILVER, GRAY),
        ScenePreset::new("grants", 62.0, 185.0, 0.105, WHITE, RED),
        ScenePreset::new("teaching", 74.0, 205.0, 0.095, GRAY, SILVER),
        ScenePreset::new("awards", 66.0, 175.0, 0.115, WHITE, GRAY),
        ScenePreset::new("contact", 70.0, 200.0, 0.09, RED, SILVER),
    ]
};

/// Maps scene keys to presets, with a designated fallback.
#[derive(Debug, Clone)]
pub struct SceneRegistry {
    presets: BTreeMap<&'static str, ScenePreset>,
    default_key: &'static str,
}

impl Default for SceneRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl SceneRegistry {
    /// A registry holding only `default`, which is also the fallback.
    pub fn new(default: ScenePreset) -> Self {
        let mut presets = BTreeMap::new();
        presets.insert(default.key, default);
        Self {
            presets,
            default_key: default.key,
        }
    }

    /// The registry covering every page section, falling back to `hero`.
    pub fn builtin() -> Self {
        let mut registry = Self::new(BUILTIN_PRESETS[0]);
        for preset in BUILTIN_PRESETS {
            registry.insert(preset);
        }
        registry
    }

    /// Add or replace a preset. Replacing the default keeps it the default.
    pub fn insert(&mut self, preset: ScenePreset) -> &mut Self {
        self.presets.insert(preset.key, preset);
        self
    }

    /// The fallback preset.
    pub fn default_preset(&self) -> &ScenePreset {
        // The default key is inserted on construction and never removed.
        &self.presets[self.default_key]
    }

    /// The preset registered for `key`, or the default for anything else.
    pub fn resolve(&self, key: &str) -> &ScenePreset {
        self.presets
            .get(key)
            .unwrap_or_else(|| self.default_preset())
    }

    pub fn get(&self, key: &str) -> Option<&ScenePreset> {
        self.presets.get(key)
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScenePreset> {
        self.presets.values()
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn test_builtin_covers_every_section() {
        let registry = SceneRegistry::builtin();
        assert_eq!(registry.len(), SceneKey::ALL.len());
        for key in SceneKey::ALL {
            assert_eq!(registry.get(key.as_str()).map(|p| p.key), Some(key.as_str()));
        }
    }

    #[test]
    fn test_unknown_key_falls_back_to_default() {
        let registry = SceneRegistry::builtin();
        assert_eq!(registry.resolve("does-not-exist"), registry.default_preset());
        assert_eq!(registry.default_preset().key, "hero");
    }

    #[test]
    fn test_custom_registry() {
        let hero = ScenePreset::new("hero", 70.0, 160.0, 0.12, palette::RED, palette::SILVER);
        let about = ScenePreset::new("about", 60.0, 180.0, 0.1, palette::GRAY, palette::WHITE);
        let mut registry = SceneRegistry::new(hero);
        registry.insert(about);
        assert_eq!(registry.resolve("about").planet_radius, 60.0);
        assert_eq!(registry.resolve("contact").key, "hero");
    }

    #[rstest]
    #[case("hero", SceneKey::Hero)]
    #[case("interests", SceneKey::Interests)]
    #[case("publications", SceneKey::Publications)]
    #[case("contact", SceneKey::Contact)]
    fn test_scene_key_round_trip(#[case] text: &str, #[case] key: SceneKey) {
        assert_eq!(text.parse::<SceneKey>(), Ok(key));
        assert_eq!(key.to_string(), text);
    }

    #[test]
    fn test_scene_key_parse_error() {
        assert_eq!(
            "Hero".parse::<SceneKey>(),
            Err(UnknownSceneKey("Hero".to_string()))
        );
    }

    #[test]
    fn test_nav_excludes_hero() {
        assert!(!SceneKey::NAV.contains(&SceneKey::Hero));
        assert_eq!(SceneKey::Interests.label(), "Research");
    }
}
