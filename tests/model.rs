use sb2_rs_core::model::{Arg, Block, Project};

#[test]
fn sprite_indices_follow_creation_order() {
    let mut project = Project::new();
    for i in 0..5 {
        let name = format!("Sprite{}", i + 1);
        let sprite = project.create_sprite(name.clone());
        assert_eq!(sprite.index, i);
        assert_eq!(sprite.name, name);
    }
    assert_eq!(project.sprites.len(), 5);
    for (i, sprite) in project.sprites.iter().enumerate() {
        assert_eq!(sprite.index, i);
    }
}

#[test]
fn sprite_defaults_carry_the_scriptable_layer() {
    let mut project = Project::new();
    let sprite = project.create_sprite("Cat");
    assert_eq!(sprite.x, 0.0);
    assert_eq!(sprite.y, 0.0);
    assert_eq!(sprite.scale, 100.0);
    assert_eq!(sprite.direction, 90.0);
    assert!(sprite.visible);
    assert!(sprite.scriptable.variables.is_empty());
    assert!(sprite.scriptable.lists.is_empty());
    assert!(sprite.scriptable.costumes.is_empty());
    assert!(sprite.scriptable.sounds.is_empty());
    assert!(sprite.scriptable.scripts.is_empty());
    assert!(sprite.scriptable.comments.is_empty());
    assert_eq!(sprite.scriptable.current_costume, 0);
}

#[test]
fn stage_defaults() {
    let mut project = Project::new();
    let stage = project.create_stage();
    assert_eq!(stage.tempo, 60.0);
    assert_eq!(stage.video_transparency, 0.0);
    assert_eq!(stage.pen_layer_id, 0);
    assert!(stage.pen_layer_md5.is_empty());
    assert!(stage.scriptable.scripts.is_empty());
}

#[test]
fn second_stage_silently_replaces_the_first() {
    let mut project = Project::new();
    {
        let stage = project.create_stage();
        stage.tempo = 90.0;
        stage.scriptable.define_variable("lives", 3);
    }
    assert!(project.stage.is_some());

    project.create_stage();
    let stage = project.stage.as_ref().expect("stage should be set");
    assert_eq!(stage.tempo, 60.0);
    assert!(stage.scriptable.variables.is_empty());
}

#[test]
fn variables_append_in_order_without_uniqueness_check() {
    let mut project = Project::new();
    let stage = project.create_stage();
    stage.scriptable.define_variable("score", 0);
    stage.scriptable.define_variable("lives", 3);
    stage.scriptable.define_variable("score", 99);
    let names = stage
        .scriptable
        .variables
        .iter()
        .map(|v| v.name.as_str())
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["score", "lives", "score"]);
}

#[test]
fn lists_append_in_order() {
    let mut project = Project::new();
    let sprite = project.create_sprite("Cat");
    sprite.scriptable.define_list("inventory").contents.push("sword".into());
    sprite.scriptable.define_list("scores");
    assert_eq!(sprite.scriptable.lists.len(), 2);
    assert_eq!(sprite.scriptable.lists[0].name, "inventory");
    assert_eq!(sprite.scriptable.lists[0].contents.len(), 1);
}

#[test]
fn block_construction_rejects_unknown_specs() {
    let err = Block::new("this is not real", Vec::new()).unwrap_err();
    assert_eq!(err.spec, "this is not real");
    assert_eq!(err.to_string(), "Unknown block spec 'this is not real'.");
}

#[test]
fn block_spec_matching_is_literal_not_templated() {
    // A label with the placeholder filled in is not a spec.
    assert!(Block::new("move 10 steps", Vec::new()).is_err());
    assert!(Block::new("move %n steps", vec![Arg::from(10)]).is_ok());
    assert!(Block::nullary("when @greenFlag clicked").is_ok());
}
