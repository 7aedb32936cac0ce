//! Animation sampling.
//!
//! Model:
//! - Each bone timeline holds keys ordered by time in milliseconds.
//! - Between key i and key i+1 the progress is remapped by key i's curve, the
//!   angle follows key i's spin, everything else is lerped.
//! - Looping animations tween the last key towards the first key at `length`.
//!   Non-looping animations hold the last key.
//! - Bones without a timeline keep their rest transform.

use crate::data::{Animation, BoneTimeline, BoneTransform, Entity};
use crate::pose::Pose;

/// Sample one timeline at `time_ms`.
pub fn sample_timeline(
    timeline: &BoneTimeline,
    length_ms: u32,
    looping: bool,
    time_ms: f32,
) -> Option<BoneTransform> {
    let keys = &timeline.keys;
    let first = keys.first()?;
    if keys.len() == 1 {
        return Some(first.transform);
    }

    let last = &keys[keys.len() - 1];
    let length = length_ms as f32;

    // Segment [key, next] containing time_ms, with its start/end times.
    let (key, start, next, end) = match keys.iter().rposition(|k| k.time_ms as f32 <= time_ms) {
        Some(idx) if idx + 1 < keys.len() => {
            let (key, next) = (&keys[idx], &keys[idx + 1]);
            (key, key.time_ms as f32, next, next.time_ms as f32)
        }
        Some(_) if looping => (last, last.time_ms as f32, first, length + first.time_ms as f32),
        Some(_) => return Some(last.transform),
        // Before the first key a looping clip is still coming from the last key.
        None if looping => (last, last.time_ms as f32 - length, first, first.time_ms as f32),
        None => return Some(first.transform),
    };

    let span = end - start;
    let progress = if span > 0.0 {
        (time_ms - start) / span
    } else {
        0.0
    };
    let eased = key.curve.apply(progress.clamp(0.0, 1.0));
    Some(key.transform.tween(&next.transform, key.spin, eased))
}

/// Sample every bone of `animation` at `time_ms` into `out`.
pub fn sample_animation(entity: &Entity, animation: &Animation, time_ms: f32, out: &mut Pose) {
    if out.len() != entity.bone_count() {
        out.reset(entity.bone_count());
    }
    for (idx, (slot, bone)) in out
        .as_mut_slice()
        .iter_mut()
        .zip(entity.bones())
        .enumerate()
    {
        *slot = animation
            .timeline_for_bone(idx)
            .and_then(|tl| sample_timeline(tl, animation.length_ms, animation.looping, time_ms))
            .unwrap_or(bone.rest);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{BoneData, EntityData, TimelineKey};
    use crate::interp::Curve;

    fn timeline(keys: Vec<TimelineKey>) -> BoneTimeline {
        BoneTimeline {
            bone: "arm".into(),
            keys,
        }
    }

    #[test]
    fn interpolates_between_keys() {
        let tl = timeline(vec![
            TimelineKey::new(0, BoneTransform::at(0.0, 0.0)),
            TimelineKey::new(1000, BoneTransform::at(10.0, 20.0)),
        ]);
        let t = sample_timeline(&tl, 2000, false, 500.0).unwrap();
        assert_eq!(t.position, [5.0, 10.0]);
        // past the last key a non-looping clip holds it
        let t = sample_timeline(&tl, 2000, false, 1500.0).unwrap();
        assert_eq!(t.position, [10.0, 20.0]);
    }

    #[test]
    fn looping_wraps_to_first_key() {
        let tl = timeline(vec![
            TimelineKey::new(0, BoneTransform::at(0.0, 0.0)),
            TimelineKey::new(500, BoneTransform::at(10.0, 0.0)),
        ]);
        // 500..1000 tweens back towards the first key
        let t = sample_timeline(&tl, 1000, true, 750.0).unwrap();
        assert!((t.position[0] - 5.0).abs() < 1e-5);
    }

    #[test]
    fn looping_before_first_key_comes_from_last_key() {
        let tl = timeline(vec![
            TimelineKey::new(200, BoneTransform::at(0.0, 0.0)),
            TimelineKey::new(600, BoneTransform::at(10.0, 0.0)),
        ]);
        // segment 600 -> 1200 (first key of next lap), 100 ms is 500 ms into it
        let t = sample_timeline(&tl, 1000, true, 100.0).unwrap();
        let expected = 10.0 * (1.0 - 500.0 / 600.0);
        assert!((t.position[0] - expected).abs() < 1e-4, "got {}", t.position[0]);

        // non-looping holds the first key
        let t = sample_timeline(&tl, 1000, false, 100.0).unwrap();
        assert_eq!(t.position, [0.0, 0.0]);
    }

    #[test]
    fn curve_and_spin_are_taken_from_left_key() {
        let tl = timeline(vec![
            TimelineKey::new(0, BoneTransform::IDENTITY.with_angle(350.0))
                .with_curve(Curve::Instant),
            TimelineKey::new(1000, BoneTransform::IDENTITY.with_angle(10.0)),
        ]);
        let t = sample_timeline(&tl, 1000, false, 900.0).unwrap();
        assert_eq!(t.angle, 350.0);

        let tl = timeline(vec![
            TimelineKey::new(0, BoneTransform::IDENTITY.with_angle(350.0)),
            TimelineKey::new(1000, BoneTransform::IDENTITY.with_angle(10.0)),
        ]);
        let t = sample_timeline(&tl, 1000, false, 500.0).unwrap();
        assert!((t.angle - 360.0).abs() < 1e-4);

        let tl = timeline(vec![
            TimelineKey::new(0, BoneTransform::IDENTITY.with_angle(350.0)).with_spin(-1),
            TimelineKey::new(1000, BoneTransform::IDENTITY.with_angle(10.0)),
        ]);
        let t = sample_timeline(&tl, 1000, false, 500.0).unwrap();
        assert!((t.angle - 180.0).abs() < 1e-4);
    }

    #[test]
    fn unanimated_bones_keep_rest_pose() {
        let entity = Entity::new(EntityData {
            name: "rig".into(),
            bones: vec![
                BoneData {
                    name: "root".into(),
                    parent: None,
                    rest: BoneTransform::at(1.0, 2.0),
                },
                BoneData {
                    name: "arm".into(),
                    parent: Some("root".into()),
                    rest: BoneTransform::IDENTITY,
                },
            ],
            animations: vec![Animation::new("Wave", 1000).with_timeline(
                "arm",
                vec![TimelineKey::new(0, BoneTransform::at(7.0, 0.0))],
            )],
        })
        .unwrap();
        let mut pose = Pose::default();
        sample_animation(&entity, &entity.animations()[0], 250.0, &mut pose);
        assert_eq!(pose.bone(0).unwrap().position, [1.0, 2.0]);
        assert_eq!(pose.bone(1).unwrap().position, [7.0, 0.0]);
    }
}
