//! Playback cursor over one animation of an entity.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use crate::config::PlayerConfig;
use crate::data::{Animation, BoneTransform, Entity};
use crate::error::{Result, SpriterError};
use crate::pose::Pose;
use crate::sampling::sample_animation;
use crate::source::PoseSource;

/// Player handle shared between its owner and any tweener blending it.
pub type SharedPlayer = Rc<RefCell<Player>>;

/// Advances one animation of an entity over time and keeps the sampled pose.
#[derive(Debug, Clone)]
pub struct Player {
    entity: Arc<Entity>,
    animation: usize,
    /// Playback position in seconds.
    time: f32,
    speed: f32,
    pose: Pose,
}

impl Player {
    /// Create a player on the entity's first animation at time 0.
    pub fn new(entity: Arc<Entity>) -> Self {
        let mut player = Self {
            pose: Pose::rest(&entity),
            entity,
            animation: 0,
            time: 0.0,
            speed: 1.0,
        };
        player.resample();
        player
    }

    pub fn with_config(entity: Arc<Entity>, cfg: &PlayerConfig) -> Result<Self> {
        let mut player = Self::new(entity);
        player.speed = cfg.speed;
        if let Some(name) = &cfg.animation {
            player.set_animation_by_name(name)?;
        }
        Ok(player)
    }

    /// Wrap into a [`SharedPlayer`] handle.
    pub fn shared(self) -> SharedPlayer {
        Rc::new(RefCell::new(self))
    }

    /// Advance by `dt * speed` seconds and resample the pose.
    pub fn update(&mut self, dt: f32) {
        self.time += dt * self.speed;
        self.wrap_time();
        self.resample();
    }

    pub fn entity(&self) -> &Arc<Entity> {
        &self.entity
    }

    pub fn animation(&self) -> &Animation {
        // index is validated by every setter
        &self.entity.animations()[self.animation]
    }

    pub fn animation_index(&self) -> usize {
        self.animation
    }

    /// Switch animation, keeping the current time (wrapped or clamped to the
    /// new animation's length).
    pub fn set_animation(&mut self, index: usize) -> Result<()> {
        if self.entity.animation(index).is_none() {
            return Err(SpriterError::AnimationNotFound {
                key: index.to_string(),
            });
        }
        if index != self.animation {
            log::debug!(
                "player on '{}': animation '{}' -> '{}'",
                self.entity.name(),
                self.animation().name,
                self.entity.animations()[index].name
            );
        }
        self.animation = index;
        self.wrap_time();
        self.resample();
        Ok(())
    }

    pub fn set_animation_by_name(&mut self, name: &str) -> Result<()> {
        let index = self
            .entity
            .animation_index(name)
            .ok_or_else(|| SpriterError::AnimationNotFound {
                key: name.to_string(),
            })?;
        self.set_animation(index)
    }

    /// Playback position in seconds.
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Seek to `time` seconds and resample the pose.
    pub fn set_time(&mut self, time: f32) {
        self.time = time;
        self.wrap_time();
        self.resample();
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }

    /// Index of the named bone, `None` if the entity has no such bone.
    pub fn bone_index(&self, name: &str) -> Option<usize> {
        self.entity.bone_index(name)
    }

    pub fn bone(&self, name: &str) -> Option<&BoneTransform> {
        self.bone_index(name).and_then(|idx| self.pose.bone(idx))
    }

    pub fn pose(&self) -> &Pose {
        &self.pose
    }

    fn wrap_time(&mut self) {
        self.time = self.animation().local_time(self.time);
    }

    fn resample(&mut self) {
        let anim = &self.entity.animations()[self.animation];
        sample_animation(&self.entity, anim, self.time * 1000.0, &mut self.pose);
    }
}

impl PoseSource for Player {
    fn advance(&mut self, dt: f32) -> Result<()> {
        self.update(dt);
        Ok(())
    }

    fn pose(&self) -> &Pose {
        &self.pose
    }

    fn entity(&self) -> &Arc<Entity> {
        &self.entity
    }
}
