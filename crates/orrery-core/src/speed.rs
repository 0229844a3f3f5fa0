//! Global animation speed setting.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Multiplier applied to every per-frame phase increment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationSpeed {
    Slow,
    #[default]
    Medium,
    Fast,
}

impl AnimationSpeed {
    /// Factor applied to phase advances. `Medium` leaves them untouched.
    pub fn multiplier(self) -> f32 {
        match self {
            AnimationSpeed::Slow => 0.5,
            AnimationSpeed::Medium => 1.0,
            AnimationSpeed::Fast => 2.0,
        }
    }

    /// Cycle to the next speed.
    pub fn next(self) -> Self {
        match self {
            AnimationSpeed::Slow => AnimationSpeed::Medium,
            AnimationSpeed::Medium => AnimationSpeed::Fast,
            AnimationSpeed::Fast => AnimationSpeed::Slow,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            AnimationSpeed::Slow => "slow",
            AnimationSpeed::Medium => "medium",
            AnimationSpeed::Fast => "fast",
        }
    }
}

/// Error returned when parsing an unknown speed name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown animation speed {0:?}: expected slow, medium or fast")]
pub struct UnknownSpeed(pub String);

impl FromStr for AnimationSpeed {
    type Err = UnknownSpeed;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "slow" => Ok(AnimationSpeed::Slow),
            "medium" => Ok(AnimationSpeed::Medium),
            "fast" => Ok(AnimationSpeed::Fast),
            _ => Err(UnknownSpeed(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_identity() {
        assert_eq!(AnimationSpeed::default().multiplier(), 1.0);
    }

    #[test]
    fn test_parse() {
        assert_eq!("Fast".parse::<AnimationSpeed>(), Ok(AnimationSpeed::Fast));
        assert_eq!(AnimationSpeed::Slow.name().parse::<AnimationSpeed>(), Ok(AnimationSpeed::Slow));
        assert!("warp".parse::<AnimationSpeed>().is_err());
    }

    #[test]
    fn test_next_cycles() {
        let s = AnimationSpeed::Slow;
        assert_eq!(s.next().next().next(), s);
    }
}
