//! Per-bone transform sets produced by players and tweeners.

use serde::{Deserialize, Serialize};

use crate::data::{BoneTransform, Entity};

/// Local transform of every bone of an entity at one instant, indexed like
/// [`Entity::bones`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    bones: Vec<BoneTransform>,
}

impl Pose {
    /// Rest pose of the entity.
    pub fn rest(entity: &Entity) -> Self {
        Self {
            bones: entity.bones().iter().map(|b| b.rest).collect(),
        }
    }

    /// Transform of the bone at `index`.
    #[inline]
    pub fn bone(&self, index: usize) -> Option<&BoneTransform> {
        self.bones.get(index)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bones.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BoneTransform> {
        self.bones.iter()
    }

    pub fn as_slice(&self) -> &[BoneTransform] {
        &self.bones
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [BoneTransform] {
        &mut self.bones
    }

    /// Resize to `len` bones, filling new slots with identity.
    pub(crate) fn reset(&mut self, len: usize) {
        self.bones.clear();
        self.bones.resize(len, BoneTransform::IDENTITY);
    }

    /// Map every local transform into world space. Root bones are mapped
    /// through `root`.
    pub fn to_world(&self, entity: &Entity, root: &BoneTransform) -> Vec<BoneTransform> {
        let mut world: Vec<BoneTransform> = Vec::with_capacity(self.bones.len());
        for (idx, local) in self.bones.iter().enumerate() {
            let parent = entity
                .bone(idx)
                .and_then(|b| b.parent)
                .and_then(|p| world.get(p))
                .unwrap_or(root);
            let mapped = parent.unmap(local);
            world.push(mapped);
        }
        world
    }
}
