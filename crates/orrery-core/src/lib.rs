//! Core types shared across the orrery crates.
//!
//! Colors are plain numeric triples, scene presets are compile-time
//! constants, and the [`SceneRegistry`] resolves section identifiers to the
//! preset the background should drift toward.

mod color;
mod scene;
mod speed;

pub use color::{ParseColorError, Rgb, palette};
pub use scene::{SceneKey, ScenePreset, SceneRegistry, UnknownSceneKey};
pub use speed::{AnimationSpeed, UnknownSpeed};
