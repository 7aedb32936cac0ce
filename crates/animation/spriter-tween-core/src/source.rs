//! Capability shared by everything that produces a pose each tick.

use std::sync::Arc;

use crate::data::{BoneTransform, Entity};
use crate::error::Result;
use crate::pose::Pose;

/// A tick-driven pose producer.
///
/// Implemented by [`Player`](crate::Player) and
/// [`PlayerTweener`](crate::PlayerTweener), so downstream stages can consume
/// either one, or a `dyn PoseSource`, without caring which.
pub trait PoseSource {
    /// Step forward by `dt` seconds and recompute the pose.
    fn advance(&mut self, dt: f32) -> Result<()>;

    /// Pose computed by the latest `advance`.
    fn pose(&self) -> &Pose;

    /// Entity whose bones the pose is indexed by.
    fn entity(&self) -> &Arc<Entity>;

    fn bone_index(&self, name: &str) -> Option<usize> {
        self.entity().bone_index(name)
    }

    /// Local transform of the named bone in the current pose.
    fn bone(&self, name: &str) -> Option<&BoneTransform> {
        self.bone_index(name).and_then(|idx| self.pose().bone(idx))
    }

    /// Current pose mapped into world space through `root`.
    fn world_pose(&self, root: &BoneTransform) -> Vec<BoneTransform> {
        self.pose().to_world(self.entity(), root)
    }
}
