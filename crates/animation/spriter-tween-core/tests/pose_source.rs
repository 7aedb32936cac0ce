use std::sync::Arc;

use spriter_tween_core::{
    BoneTransform, Entity, Player, PlayerTweener, PoseSource, SpriterError, TweenerConfig,
};

fn load(name: &str) -> Arc<Entity> {
    let entity: Entity = spriter_test_fixtures::entities::load(name).expect("entity fixture");
    Arc::new(entity)
}

/// Stand-in for a skeleton-application stage: reads world positions only.
fn hand_world_x<S: PoseSource + ?Sized>(source: &S) -> f32 {
    let idx = source.bone_index("hand").expect("hand bone");
    source.world_pose(&BoneTransform::IDENTITY)[idx].position[0]
}

#[test]
fn player_and_tweener_are_interchangeable() {
    let entity = load("arm_rig");
    let mut sources: Vec<Box<dyn PoseSource>> = vec![
        Box::new(Player::new(Arc::clone(&entity))),
        Box::new(PlayerTweener::from_entity(Arc::clone(&entity))),
    ];
    for source in sources.iter_mut() {
        source.advance(0.1).unwrap();
        assert_eq!(source.pose().len(), entity.bone_count());
        assert!(source.bone("arm").is_some());
        assert!(source.bone("tail").is_none());
    }
    // both players of the tweener run Idle, so every blend equals the plain player
    assert_eq!(sources[0].pose(), sources[1].pose());
    assert_eq!(hand_world_x(sources[0].as_ref()), hand_world_x(sources[1].as_ref()));
}

#[test]
fn tweener_errors_surface_through_the_trait() {
    let entity = load("arm_rig");
    let mut tweener = PlayerTweener::from_entity(entity);
    tweener.set_base_bone_name(Some("wing".into()));
    let source: &mut dyn PoseSource = &mut tweener;
    assert_eq!(
        source.advance(0.1),
        Err(SpriterError::BoneNotFound { name: "wing".into() })
    );
}

#[test]
fn rigs_from_different_fixtures_never_pair() {
    let arm = load("arm_rig");
    let twin = load("twin_rig");
    let err = PlayerTweener::new(
        Player::new(Arc::clone(&arm)).shared(),
        Player::new(Arc::clone(&twin)).shared(),
    )
    .unwrap_err();
    assert_eq!(
        err.to_string(),
        "players have to hold the same entity (got 'arm_rig' and 'twin_rig')"
    );
}

#[test]
fn tweener_config_fixture_applies() {
    let entity = load("arm_rig");
    let cfg: TweenerConfig =
        spriter_test_fixtures::tweeners::load("wave_upper_body").expect("tweener fixture");
    let mut tweener = PlayerTweener::from_entity(Arc::clone(&entity))
        .with_config(&cfg)
        .unwrap();
    tweener
        .second_player()
        .borrow_mut()
        .set_animation_by_name("Wave")
        .unwrap();

    assert_eq!(tweener.weight(), 0.75);
    assert_eq!(tweener.base_bone_name(), Some("arm"));
    assert_eq!(tweener.base_animation().unwrap().name, "Walk");

    tweener.update(0.4).unwrap();
    // root follows Walk at the primary (second) player's time: 16 units over 800 ms
    let root = tweener.bone("root").unwrap();
    assert!((root.position[0] - 8.0).abs() < 1e-4, "got {}", root.position[0]);
}
