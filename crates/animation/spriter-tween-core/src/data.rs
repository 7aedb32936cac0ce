//! Skeleton data model: bones, timelines, animations and the entity that
//! groups them.
//!
//! An [`Entity`] is immutable once built and meant to be shared through
//! `Arc`. Players and tweeners compare entities by pointer identity, never by
//! value.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SpriterError};
use crate::interp::functions::{lerp_angle_shortest, lerp_angle_spin, lerp_f32, lerp_vec2};
use crate::interp::Curve;

/// Local 2D transform of one bone.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoneTransform {
    pub position: [f32; 2],
    /// Rotation in degrees, counter clockwise.
    pub angle: f32,
    pub scale: [f32; 2],
    pub alpha: f32,
}

impl Default for BoneTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl BoneTransform {
    pub const IDENTITY: BoneTransform = BoneTransform {
        position: [0.0, 0.0],
        angle: 0.0,
        scale: [1.0, 1.0],
        alpha: 1.0,
    };

    /// Transform at the given position with identity rotation and scale.
    pub fn at(x: f32, y: f32) -> Self {
        Self {
            position: [x, y],
            ..Self::IDENTITY
        }
    }

    pub fn with_angle(mut self, angle: f32) -> Self {
        self.angle = angle;
        self
    }

    pub fn with_scale(mut self, sx: f32, sy: f32) -> Self {
        self.scale = [sx, sy];
        self
    }

    /// Keyframe interpolation: the angle follows `spin`.
    pub fn tween(&self, to: &BoneTransform, spin: i8, t: f32) -> BoneTransform {
        BoneTransform {
            position: lerp_vec2(self.position, to.position, t),
            angle: lerp_angle_spin(self.angle, to.angle, spin, t),
            scale: lerp_vec2(self.scale, to.scale, t),
            alpha: lerp_f32(self.alpha, to.alpha, t),
        }
    }

    /// Pose blending: the angle takes the shortest arc.
    pub fn blend(&self, to: &BoneTransform, weight: f32) -> BoneTransform {
        BoneTransform {
            position: lerp_vec2(self.position, to.position, weight),
            angle: lerp_angle_shortest(self.angle, to.angle, weight),
            scale: lerp_vec2(self.scale, to.scale, weight),
            alpha: lerp_f32(self.alpha, to.alpha, weight),
        }
    }

    /// Map a child transform expressed in this transform's space into the
    /// parent space of this transform.
    pub fn unmap(&self, child: &BoneTransform) -> BoneTransform {
        let flipped = self.scale[0] * self.scale[1] < 0.0;
        let angle = if flipped {
            self.angle - child.angle
        } else {
            self.angle + child.angle
        };
        let px = child.position[0] * self.scale[0];
        let py = child.position[1] * self.scale[1];
        let (sin, cos) = self.angle.to_radians().sin_cos();
        BoneTransform {
            position: [
                self.position[0] + px * cos - py * sin,
                self.position[1] + px * sin + py * cos,
            ],
            angle,
            scale: [
                self.scale[0] * child.scale[0],
                self.scale[1] * child.scale[1],
            ],
            alpha: self.alpha * child.alpha,
        }
    }
}

/// Bone description as authored.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoneData {
    pub name: String,
    #[serde(default)]
    pub parent: Option<String>,
    /// Setup pose used when an animation has no timeline for this bone.
    #[serde(default)]
    pub rest: BoneTransform,
}

/// Resolved bone inside an [`Entity`].
#[derive(Clone, Debug, PartialEq)]
pub struct Bone {
    pub name: String,
    pub parent: Option<usize>,
    pub rest: BoneTransform,
}

/// A single key on a bone timeline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimelineKey {
    /// Key time in milliseconds from the start of the animation.
    #[serde(rename = "time")]
    pub time_ms: u32,
    #[serde(default)]
    pub transform: BoneTransform,
    #[serde(default = "default_spin")]
    pub spin: i8,
    #[serde(default)]
    pub curve: Curve,
}

fn default_spin() -> i8 {
    1
}

impl TimelineKey {
    pub fn new(time_ms: u32, transform: BoneTransform) -> Self {
        Self {
            time_ms,
            transform,
            spin: 1,
            curve: Curve::Linear,
        }
    }

    pub fn with_spin(mut self, spin: i8) -> Self {
        self.spin = spin;
        self
    }

    pub fn with_curve(mut self, curve: Curve) -> Self {
        self.curve = curve;
        self
    }
}

/// Keys animating one bone.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoneTimeline {
    pub bone: String,
    pub keys: Vec<TimelineKey>,
}

/// A named animation of an entity.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Animation {
    pub name: String,
    /// Length in milliseconds.
    #[serde(rename = "length")]
    pub length_ms: u32,
    #[serde(default = "default_looping")]
    pub looping: bool,
    #[serde(default)]
    pub timelines: Vec<BoneTimeline>,
    /// Timeline index per entity bone, filled in when the entity is built.
    #[serde(skip)]
    bone_timelines: Vec<Option<usize>>,
}

fn default_looping() -> bool {
    true
}

impl Animation {
    pub fn new(name: &str, length_ms: u32) -> Self {
        Self {
            name: name.to_string(),
            length_ms,
            looping: true,
            timelines: Vec::new(),
            bone_timelines: Vec::new(),
        }
    }

    pub fn looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    pub fn with_timeline(mut self, bone: &str, keys: Vec<TimelineKey>) -> Self {
        self.timelines.push(BoneTimeline {
            bone: bone.to_string(),
            keys,
        });
        self
    }

    /// Length in seconds.
    #[inline]
    pub fn length(&self) -> f32 {
        self.length_ms as f32 / 1000.0
    }

    /// Map a playback time in seconds into this animation's range: wrapped
    /// for looping animations, clamped otherwise.
    pub fn local_time(&self, time: f32) -> f32 {
        let length = self.length();
        if self.looping {
            time.rem_euclid(length)
        } else {
            time.clamp(0.0, length)
        }
    }

    /// Timeline animating the bone at `bone_index`, if any.
    pub fn timeline_for_bone(&self, bone_index: usize) -> Option<&BoneTimeline> {
        self.bone_timelines
            .get(bone_index)
            .copied()
            .flatten()
            .and_then(|idx| self.timelines.get(idx))
    }

    fn resolve(&mut self, entity: &str, bone_lookup: &HashMap<String, usize>) -> Result<()> {
        if self.length_ms == 0 {
            return Err(SpriterError::invalid_entity(
                entity,
                format!("animation '{}' must have a length > 0 ms", self.name),
            ));
        }
        let mut mapping = vec![None; bone_lookup.len()];
        for (idx, timeline) in self.timelines.iter().enumerate() {
            let bone = *bone_lookup.get(&timeline.bone).ok_or_else(|| {
                SpriterError::invalid_entity(
                    entity,
                    format!(
                        "animation '{}' animates unknown bone '{}'",
                        self.name, timeline.bone
                    ),
                )
            })?;
            if mapping[bone].is_some() {
                return Err(SpriterError::invalid_entity(
                    entity,
                    format!(
                        "animation '{}' has more than one timeline for bone '{}'",
                        self.name, timeline.bone
                    ),
                ));
            }
            let mut last = 0u32;
            for key in &timeline.keys {
                if key.time_ms < last || key.time_ms > self.length_ms {
                    return Err(SpriterError::invalid_entity(
                        entity,
                        format!(
                            "key times for bone '{}' in animation '{}' must be non-decreasing and within [0, {}]",
                            timeline.bone, self.name, self.length_ms
                        ),
                    ));
                }
                last = key.time_ms;
            }
            mapping[bone] = Some(idx);
        }
        self.bone_timelines = mapping;
        Ok(())
    }
}

/// Serializable entity description. Build an [`Entity`] from it with
/// [`Entity::new`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EntityData {
    pub name: String,
    pub bones: Vec<BoneData>,
    pub animations: Vec<Animation>,
}

/// Validated skeleton plus its animation library.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "EntityData", into = "EntityData")]
pub struct Entity {
    name: String,
    bones: Vec<Bone>,
    animations: Vec<Animation>,
    bone_lookup: HashMap<String, usize>,
    animation_lookup: HashMap<String, usize>,
}

impl Entity {
    /// Validate the description and resolve names into indices.
    pub fn new(data: EntityData) -> Result<Self> {
        let EntityData {
            name,
            bones: bone_data,
            mut animations,
        } = data;
        if bone_data.is_empty() {
            return Err(SpriterError::invalid_entity(&name, "at least one bone is required"));
        }
        if animations.is_empty() {
            return Err(SpriterError::invalid_entity(
                &name,
                "at least one animation is required",
            ));
        }

        let mut bone_lookup = HashMap::with_capacity(bone_data.len());
        let mut bones = Vec::with_capacity(bone_data.len());
        for (idx, bone) in bone_data.into_iter().enumerate() {
            // Parents must already be registered, which keeps the list topologically ordered.
            let parent = match &bone.parent {
                Some(parent) => Some(*bone_lookup.get(parent).ok_or_else(|| {
                    SpriterError::invalid_entity(
                        &name,
                        format!(
                            "parent '{}' of bone '{}' must be declared before it",
                            parent, bone.name
                        ),
                    )
                })?),
                None => None,
            };
            if bone_lookup.insert(bone.name.clone(), idx).is_some() {
                return Err(SpriterError::invalid_entity(
                    &name,
                    format!("duplicate bone name '{}'", bone.name),
                ));
            }
            bones.push(Bone {
                name: bone.name,
                parent,
                rest: bone.rest,
            });
        }

        let mut animation_lookup = HashMap::with_capacity(animations.len());
        for (idx, anim) in animations.iter_mut().enumerate() {
            anim.resolve(&name, &bone_lookup)?;
            if animation_lookup.insert(anim.name.clone(), idx).is_some() {
                return Err(SpriterError::invalid_entity(
                    &name,
                    format!("duplicate animation name '{}'", anim.name),
                ));
            }
        }

        Ok(Self {
            name,
            bones,
            animations,
            bone_lookup,
            animation_lookup,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Bones in hierarchy order: every parent precedes its children.
    pub fn bones(&self) -> &[Bone] {
        &self.bones
    }

    pub fn bone(&self, index: usize) -> Option<&Bone> {
        self.bones.get(index)
    }

    pub fn bone_count(&self) -> usize {
        self.bones.len()
    }

    pub fn bone_index(&self, name: &str) -> Option<usize> {
        self.bone_lookup.get(name).copied()
    }

    pub fn animations(&self) -> &[Animation] {
        &self.animations
    }

    pub fn animation(&self, index: usize) -> Option<&Animation> {
        self.animations.get(index)
    }

    pub fn animation_index(&self, name: &str) -> Option<usize> {
        self.animation_lookup.get(name).copied()
    }

    pub fn animation_by_name(&self, name: &str) -> Option<&Animation> {
        self.animation_index(name).and_then(|idx| self.animations.get(idx))
    }

    /// Whether `bone` is `root` or one of its descendants.
    pub fn is_in_subtree(&self, bone: usize, root: usize) -> bool {
        let mut current = Some(bone);
        while let Some(idx) = current {
            if idx == root {
                return true;
            }
            // parents always have a lower index, so anything below root is outside
            if idx < root {
                return false;
            }
            current = self.bones.get(idx).and_then(|b| b.parent);
        }
        false
    }
}

impl TryFrom<EntityData> for Entity {
    type Error = SpriterError;

    fn try_from(data: EntityData) -> Result<Self> {
        Entity::new(data)
    }
}

impl From<Entity> for EntityData {
    fn from(entity: Entity) -> Self {
        let Entity {
            name,
            bones,
            animations,
            ..
        } = entity;
        let names: Vec<String> = bones.iter().map(|b| b.name.clone()).collect();
        EntityData {
            name,
            bones: bones
                .into_iter()
                .map(|b| BoneData {
                    parent: b.parent.map(|p| names[p].clone()),
                    name: b.name,
                    rest: b.rest,
                })
                .collect(),
            animations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bone(name: &str, parent: Option<&str>) -> BoneData {
        BoneData {
            name: name.into(),
            parent: parent.map(Into::into),
            rest: BoneTransform::IDENTITY,
        }
    }

    fn rig(bones: Vec<BoneData>, animations: Vec<Animation>) -> Result<Entity> {
        Entity::new(EntityData {
            name: "rig".into(),
            bones,
            animations,
        })
    }

    #[test]
    fn resolves_hierarchy_and_lookups() {
        let entity = rig(
            vec![
                bone("root", None),
                bone("arm", Some("root")),
                bone("hand", Some("arm")),
                bone("leg", Some("root")),
            ],
            vec![Animation::new("Idle", 1000)
                .with_timeline("arm", vec![TimelineKey::new(0, BoneTransform::IDENTITY)])],
        )
        .unwrap();

        assert_eq!(entity.bone_index("hand"), Some(2));
        assert_eq!(entity.bone(2).unwrap().parent, Some(1));
        assert_eq!(entity.animation_index("Idle"), Some(0));
        assert!(entity.animation_by_name("Run").is_none());

        let idle = entity.animation(0).unwrap();
        assert!(idle.timeline_for_bone(1).is_some());
        assert!(idle.timeline_for_bone(0).is_none());

        assert!(entity.is_in_subtree(2, 1));
        assert!(entity.is_in_subtree(1, 1));
        assert!(!entity.is_in_subtree(3, 1));
        assert!(!entity.is_in_subtree(0, 1));
        assert!(entity.is_in_subtree(3, 0));
    }

    #[test]
    fn rejects_forward_parent_reference() {
        let err = rig(
            vec![bone("hand", Some("arm")), bone("arm", None)],
            vec![Animation::new("Idle", 1000)],
        )
        .unwrap_err();
        assert!(matches!(err, SpriterError::InvalidEntity { .. }));
    }

    #[test]
    fn rejects_duplicate_names() {
        let err = rig(
            vec![bone("root", None), bone("root", None)],
            vec![Animation::new("Idle", 1000)],
        )
        .unwrap_err();
        assert!(err.to_string().contains("duplicate bone name"));

        let err = rig(
            vec![bone("root", None)],
            vec![Animation::new("Idle", 1000), Animation::new("Idle", 500)],
        )
        .unwrap_err();
        assert!(err.to_string().contains("duplicate animation name"));
    }

    #[test]
    fn rejects_bad_timelines() {
        let unknown = rig(
            vec![bone("root", None)],
            vec![Animation::new("Idle", 1000)
                .with_timeline("tail", vec![TimelineKey::new(0, BoneTransform::IDENTITY)])],
        );
        assert!(unknown.is_err());

        let out_of_range = rig(
            vec![bone("root", None)],
            vec![Animation::new("Idle", 1000)
                .with_timeline("root", vec![TimelineKey::new(1500, BoneTransform::IDENTITY)])],
        );
        assert!(out_of_range.is_err());

        let unordered = rig(
            vec![bone("root", None)],
            vec![Animation::new("Idle", 1000).with_timeline(
                "root",
                vec![
                    TimelineKey::new(500, BoneTransform::IDENTITY),
                    TimelineKey::new(100, BoneTransform::IDENTITY),
                ],
            )],
        );
        assert!(unordered.is_err());

        let empty = rig(vec![bone("root", None)], vec![Animation::new("Idle", 0)]);
        assert!(empty.is_err());
    }

    #[test]
    fn unmap_applies_parent_transform() {
        let parent = BoneTransform::at(10.0, 0.0).with_angle(90.0).with_scale(2.0, 2.0);
        let world = parent.unmap(&BoneTransform::at(1.0, 0.0).with_angle(10.0));
        assert!((world.position[0] - 10.0).abs() < 1e-4);
        assert!((world.position[1] - 2.0).abs() < 1e-4);
        assert!((world.angle - 100.0).abs() < 1e-4);
        assert_eq!(world.scale, [2.0, 2.0]);
    }

    #[test]
    fn unmap_mirrors_angle_under_flip() {
        let parent = BoneTransform::IDENTITY.with_scale(-1.0, 1.0);
        let world = parent.unmap(&BoneTransform::IDENTITY.with_angle(30.0));
        assert_eq!(world.angle, -30.0);
    }

    #[test]
    fn serde_round_trip_keeps_names() {
        let entity = rig(
            vec![bone("root", None), bone("arm", Some("root"))],
            vec![Animation::new("Idle", 1000)],
        )
        .unwrap();
        let json = serde_json::to_string(&entity).unwrap();
        let back: Entity = serde_json::from_str(&json).unwrap();
        assert_eq!(back.bone(1).unwrap().parent, Some(0));
        assert_eq!(back.animation_index("Idle"), Some(0));
    }
}
