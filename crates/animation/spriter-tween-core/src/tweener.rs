//! Player tweener: blends the poses of two players of the same entity.
//!
//! Per tick (`update`):
//! 1. optionally update both players by `dt`
//! 2. blend every bone of the first and second player's pose by `weight`
//! 3. with a base bone set, resolve it on the primary player and replace
//!    every bone outside its sub-hierarchy with the base animation sampled at
//!    the primary player's time
//!
//! The tweener shares its players through [`SharedPlayer`] handles, so callers
//! can keep driving them directly (see [`PlayerTweener::set_update_players`]).

use std::rc::Rc;
use std::sync::Arc;

use crate::config::TweenerConfig;
use crate::data::{Animation, Entity};
use crate::error::{Result, SpriterError};
use crate::player::{Player, SharedPlayer};
use crate::pose::Pose;
use crate::sampling::sample_animation;
use crate::source::PoseSource;

#[derive(Debug)]
pub struct PlayerTweener {
    entity: Arc<Entity>,
    first: SharedPlayer,
    second: SharedPlayer,
    weight: f32,
    sprite_threshold: f32,
    update_players: bool,
    base_bone_name: Option<String>,
    base_animation: Option<usize>,
    pose: Pose,
    base_pose: Pose,
}

/// Entity both players animate, or `MismatchedSkeleton` if they differ.
fn paired_entity(first: &SharedPlayer, second: &SharedPlayer) -> Result<Arc<Entity>> {
    let a = first.borrow();
    let b = second.borrow();
    if !Arc::ptr_eq(a.entity(), b.entity()) {
        return Err(SpriterError::MismatchedSkeleton {
            first: a.entity().name().to_string(),
            second: b.entity().name().to_string(),
        });
    }
    Ok(Arc::clone(a.entity()))
}

impl PlayerTweener {
    /// Tween two existing players. Both have to hold the same entity instance.
    pub fn new(first: SharedPlayer, second: SharedPlayer) -> Result<Self> {
        let entity = paired_entity(&first, &second)?;
        Ok(Self::bind(entity, first, second))
    }

    /// Tween two fresh players created for `entity`.
    pub fn from_entity(entity: Arc<Entity>) -> Self {
        let first = Player::new(Arc::clone(&entity)).shared();
        let second = Player::new(Arc::clone(&entity)).shared();
        Self::bind(entity, first, second)
    }

    fn bind(entity: Arc<Entity>, first: SharedPlayer, second: SharedPlayer) -> Self {
        let defaults = TweenerConfig::default();
        let mut tweener = Self {
            pose: Pose::rest(&entity),
            base_pose: Pose::rest(&entity),
            entity,
            first,
            second,
            weight: defaults.weight,
            sprite_threshold: defaults.sprite_threshold,
            update_players: defaults.update_players,
            base_bone_name: None,
            base_animation: None,
        };
        tweener.blend_players();
        tweener
    }

    /// Apply every setting of `cfg`. Fails if the base animation is unknown.
    pub fn with_config(mut self, cfg: &TweenerConfig) -> Result<Self> {
        self.weight = cfg.weight;
        self.sprite_threshold = cfg.sprite_threshold;
        self.update_players = cfg.update_players;
        self.base_bone_name = cfg.base_bone_name.clone();
        match &cfg.base_animation {
            Some(name) => self.set_base_animation_by_name(name)?,
            None => self.base_animation = None,
        }
        Ok(self)
    }

    /// Rebind to a new pair of players.
    ///
    /// Both players have to hold the same entity instance. If it is the entity
    /// already bound, blend buffers and the base animation are kept. Otherwise
    /// the buffers are rebuilt for the new entity and the base animation is
    /// cleared. The new pair is reflected from the next `update`.
    pub fn set_players(&mut self, first: SharedPlayer, second: SharedPlayer) -> Result<()> {
        let entity = paired_entity(&first, &second)?;
        self.first = first;
        self.second = second;
        if Arc::ptr_eq(&entity, &self.entity) {
            return Ok(());
        }
        log::debug!(
            "tweener rebound from entity '{}' to '{}'",
            self.entity.name(),
            entity.name()
        );
        self.pose = Pose::rest(&entity);
        self.base_pose = Pose::rest(&entity);
        self.base_animation = None;
        self.entity = entity;
        Ok(())
    }

    pub fn first_player(&self) -> &SharedPlayer {
        &self.first
    }

    pub fn second_player(&self) -> &SharedPlayer {
        &self.second
    }

    /// Blend weight: 0.0 is fully the first player, 1.0 fully the second.
    pub fn weight(&self) -> f32 {
        self.weight
    }

    /// Values outside `[0, 1]` are kept as is and extrapolate.
    pub fn set_weight(&mut self, weight: f32) {
        self.weight = weight;
    }

    pub fn sprite_threshold(&self) -> f32 {
        self.sprite_threshold
    }

    pub fn set_sprite_threshold(&mut self, threshold: f32) {
        self.sprite_threshold = threshold;
    }

    /// Whether `update` also updates both players.
    pub fn update_players(&self) -> bool {
        self.update_players
    }

    /// Turn off to drive the players yourself; `update` then only blends.
    pub fn set_update_players(&mut self, update_players: bool) {
        self.update_players = update_players;
    }

    pub fn base_bone_name(&self) -> Option<&str> {
        self.base_bone_name.as_deref()
    }

    /// Restrict blending to the named bone and its descendants. The name is
    /// resolved on the next `update`.
    pub fn set_base_bone_name(&mut self, name: Option<String>) {
        self.base_bone_name = name;
    }

    /// Animation posing the bones outside the blended sub-hierarchy. Only has
    /// an effect while a base bone name is set.
    pub fn base_animation(&self) -> Option<&Animation> {
        self.base_animation
            .and_then(|idx| self.entity.animation(idx))
    }

    pub fn set_base_animation(&mut self, index: usize) -> Result<()> {
        if self.entity.animation(index).is_none() {
            return Err(SpriterError::AnimationNotFound {
                key: index.to_string(),
            });
        }
        self.base_animation = Some(index);
        Ok(())
    }

    pub fn set_base_animation_by_name(&mut self, name: &str) -> Result<()> {
        let index = self
            .entity
            .animation_index(name)
            .ok_or_else(|| SpriterError::AnimationNotFound {
                key: name.to_string(),
            })?;
        self.base_animation = Some(index);
        Ok(())
    }

    /// Fall back to the primary player's own animation.
    pub fn clear_base_animation(&mut self) {
        self.base_animation = None;
    }

    /// Whether the first player is the primary one, i.e. the weight is still
    /// below the sprite threshold.
    pub fn on_first_main_line(&self) -> bool {
        self.weight < self.sprite_threshold
    }

    pub fn entity(&self) -> &Arc<Entity> {
        &self.entity
    }

    pub fn pose(&self) -> &Pose {
        &self.pose
    }

    /// Not supported: a tweener always animates its players' entity. Use
    /// [`set_players`](Self::set_players) instead.
    pub fn set_entity(&mut self, _entity: Arc<Entity>) -> Result<()> {
        Err(SpriterError::Unsupported {
            operation: "set_entity",
        })
    }

    /// Not supported: the animations come from the two players. Change them on
    /// the players, or rebind with [`set_players`](Self::set_players).
    pub fn set_animation(&mut self, _index: usize) -> Result<()> {
        Err(SpriterError::Unsupported {
            operation: "set_animation",
        })
    }

    /// Advance one tick of `dt` seconds and recompute the blended pose.
    ///
    /// Fails with `BoneNotFound` when a base bone name is set that the
    /// primary player's entity does not have. The players have still been
    /// advanced then, but [`pose`](Self::pose) keeps the previous tick.
    ///
    /// # Panics
    ///
    /// Panics if the caller holds a borrow of either player across the call.
    pub fn update(&mut self, dt: f32) -> Result<()> {
        if self.update_players {
            self.first.borrow_mut().update(dt);
            // the same handle may be passed twice; advance it once
            if !Rc::ptr_eq(&self.first, &self.second) {
                self.second.borrow_mut().update(dt);
            }
        }
        log::trace!(
            "tweening '{}' at weight {} (base bone {:?})",
            self.entity.name(),
            self.weight,
            self.base_bone_name
        );
        let base_root = self.resolve_base_bone()?;
        self.blend_players();
        if let Some(root) = base_root {
            self.apply_base_pose(root);
        }
        Ok(())
    }

    fn primary(&self) -> &SharedPlayer {
        if self.on_first_main_line() {
            &self.first
        } else {
            &self.second
        }
    }

    /// Index of the base bone on the primary player, `None` without one.
    fn resolve_base_bone(&self) -> Result<Option<usize>> {
        let Some(name) = self.base_bone_name.as_deref() else {
            return Ok(None);
        };
        self.primary()
            .borrow()
            .bone_index(name)
            .map(Some)
            .ok_or_else(|| SpriterError::BoneNotFound {
                name: name.to_string(),
            })
    }

    fn blend_players(&mut self) {
        let first = self.first.borrow();
        let second = self.second.borrow();
        let weight = self.weight;
        for ((out, a), b) in self
            .pose
            .as_mut_slice()
            .iter_mut()
            .zip(first.pose().iter())
            .zip(second.pose().iter())
        {
            *out = a.blend(b, weight);
        }
    }

    /// Overwrite every bone outside `root`'s sub-hierarchy with the base
    /// animation sampled at the primary player's time.
    fn apply_base_pose(&mut self, root: usize) {
        let handle = Rc::clone(self.primary());
        let primary = handle.borrow();
        let anim_index = self
            .base_animation
            .unwrap_or_else(|| primary.animation_index());
        let anim = &self.entity.animations()[anim_index];
        let time = anim.local_time(primary.time());
        sample_animation(&self.entity, anim, time * 1000.0, &mut self.base_pose);

        for (idx, (out, base)) in self
            .pose
            .as_mut_slice()
            .iter_mut()
            .zip(self.base_pose.iter())
            .enumerate()
        {
            if !self.entity.is_in_subtree(idx, root) {
                *out = *base;
            }
        }
    }
}

impl PoseSource for PlayerTweener {
    fn advance(&mut self, dt: f32) -> Result<()> {
        self.update(dt)
    }

    fn pose(&self) -> &Pose {
        &self.pose
    }

    fn entity(&self) -> &Arc<Entity> {
        &self.entity
    }
}
