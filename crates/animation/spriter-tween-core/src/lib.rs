//! Spriter Tween Core (engine-agnostic)
//!
//! Skeletal pose blending for Spriter-style 2D bone rigs. An [`Entity`] holds
//! the bone hierarchy and its animations, a [`Player`] advances one animation
//! over time, and a [`PlayerTweener`] blends two players of the same entity,
//! optionally only below a chosen base bone. Both players and tweeners
//! implement [`PoseSource`], so consumers can take either.

pub mod config;
pub mod data;
pub mod error;
pub mod interp;
pub mod player;
pub mod pose;
pub mod sampling;
pub mod source;
pub mod tweener;

// Re-exports for consumers (adapters)
pub use config::{PlayerConfig, TweenerConfig};
pub use data::{
    Animation, Bone, BoneData, BoneTimeline, BoneTransform, Entity, EntityData, TimelineKey,
};
pub use error::{Result, SpriterError};
pub use interp::Curve;
pub use player::{Player, SharedPlayer};
pub use pose::Pose;
pub use sampling::{sample_animation, sample_timeline};
pub use source::PoseSource;
pub use tweener::PlayerTweener;
