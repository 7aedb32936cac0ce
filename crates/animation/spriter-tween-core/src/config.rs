//! Serializable configuration for players and tweeners.

use serde::{Deserialize, Serialize};

/// Initial settings for a [`Player`](crate::Player).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Playback speed multiplier applied to every `update` delta.
    pub speed: f32,
    /// Animation to start on. `None` keeps the entity's first animation.
    pub animation: Option<String>,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            speed: 1.0,
            animation: None,
        }
    }
}

/// Initial settings for a [`PlayerTweener`](crate::PlayerTweener).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TweenerConfig {
    /// Blend weight between the first (0.0) and second (1.0) player.
    pub weight: f32,
    /// Weights below this threshold make the first player primary.
    pub sprite_threshold: f32,
    /// Whether `advance` also updates both players.
    pub update_players: bool,
    /// Root of the blended sub-hierarchy; `None` blends every bone.
    pub base_bone_name: Option<String>,
    /// Animation posing the bones outside the blended sub-hierarchy.
    pub base_animation: Option<String>,
}

impl Default for TweenerConfig {
    fn default() -> Self {
        Self {
            weight: 0.5,
            sprite_threshold: 0.5,
            update_players: true,
            base_bone_name: None,
            base_animation: None,
        }
    }
}
