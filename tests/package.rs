use sb2_rs_core::model::{Arg, Block, Comment, Costume, Project, Script, Sound};
use sb2_rs_core::package::{build_sb2_bytes, write_sb2};
use serde_json::{json, Value};
use std::fs;
use std::io::{Cursor, Read};
use std::path::Path;
use zip::ZipArchive;

fn unpack(bytes: &[u8]) -> (Value, Vec<String>) {
    let mut zip = ZipArchive::new(Cursor::new(bytes.to_vec())).expect("output should be a zip");
    let names = zip.file_names().map(String::from).collect::<Vec<_>>();
    let mut raw = String::new();
    zip.by_name("project.json")
        .expect("project.json should be present")
        .read_to_string(&mut raw)
        .expect("project.json should be utf-8");
    (serde_json::from_str(&raw).expect("project.json should parse"), names)
}

fn asset_bytes(bytes: &[u8], name: &str) -> Vec<u8> {
    let mut zip = ZipArchive::new(Cursor::new(bytes.to_vec())).expect("output should be a zip");
    let mut entry = zip.by_name(name).expect("asset should be present");
    let mut out = Vec::new();
    entry.read_to_end(&mut out).expect("asset should read");
    out
}

#[test]
fn packages_stage_sprites_and_info() {
    let mut project = Project::new();
    {
        let stage = project.create_stage();
        stage.scriptable.define_variable("score", 0);
        stage.scriptable.define_list("inventory");
        stage
            .scriptable
            .add_comment(Comment::new(10.0, 20.0, 100.0, 50.0, "hello"));
    }
    {
        let sprite = project.create_sprite("Cat");
        sprite.scriptable.add_script(Script::new(
            30.0,
            40.0,
            vec![Block::new("move %n steps", vec![Arg::from(10)]).unwrap()],
        ));
    }

    let bytes = build_sb2_bytes(&project, Path::new(".")).expect("packaging should succeed");
    let (root, names) = unpack(&bytes);

    assert_eq!(root["objName"], "Stage");
    assert_eq!(root["tempoBPM"], json!(60));
    assert_eq!(root["videoAlpha"], json!(1));
    assert_eq!(root["penLayerID"], json!(0));
    assert_eq!(root["variables"][0], json!({"name": "score", "value": 0, "isPersistent": false}));
    assert_eq!(root["lists"][0]["listName"], "inventory");
    assert_eq!(root["scriptComments"][0], json!([10, 20, 100, 50, true, -1, "hello"]));

    let children = root["children"].as_array().expect("children array");
    assert_eq!(children.len(), 1);
    assert_eq!(children[0]["objName"], "Cat");
    assert_eq!(children[0]["scripts"][0], json!([30, 40, [["forward:", 10]]]));
    assert_eq!(children[0]["indexInLibrary"], json!(1));
    assert_eq!(children[0]["scale"], json!(1));
    assert_eq!(children[0]["direction"], json!(90));
    assert_eq!(children[0]["visible"], json!(true));

    assert_eq!(root["info"]["spriteCount"], json!(1));
    assert_eq!(root["info"]["scriptCount"], json!(1));

    // Costume-less scriptables get the default backdrop, with sequential
    // image ids across the whole project.
    assert_eq!(root["costumes"][0]["costumeName"], "backdrop1");
    assert_eq!(root["costumes"][0]["baseLayerID"], json!(0));
    assert_eq!(children[0]["costumes"][0]["costumeName"], "costume1");
    assert_eq!(children[0]["costumes"][0]["baseLayerID"], json!(1));
    assert!(names.contains(&"0.svg".to_string()));
    assert!(names.contains(&"1.svg".to_string()));
}

#[test]
fn costume_assets_are_embedded_with_md5_hashes() {
    let dir = tempfile::tempdir().expect("temp dir");
    let svg = br##"<svg xmlns="http://www.w3.org/2000/svg" width="2" height="2"></svg>"##;
    fs::write(dir.path().join("cat.svg"), svg).expect("write costume");

    let mut project = Project::new();
    let sprite = project.create_sprite("Cat");
    sprite.scriptable.add_costume(Costume::new("cat", "cat.svg"));

    let bytes = build_sb2_bytes(&project, dir.path()).expect("packaging should succeed");
    let (root, names) = unpack(&bytes);

    let costume = &root["children"][0]["costumes"][0];
    assert_eq!(costume["costumeName"], "cat");
    let digest = format!("{:x}", md5::compute(svg));
    assert_eq!(costume["baseLayerMD5"], format!("{}.svg", digest));
    // Stage got the default backdrop at id 0; the sprite costume follows.
    assert_eq!(costume["baseLayerID"], json!(1));
    assert!(names.contains(&"1.svg".to_string()));
    assert_eq!(asset_bytes(&bytes, "1.svg"), svg.to_vec());
}

#[test]
fn sound_assets_are_embedded_with_ids_and_hashes() {
    let dir = tempfile::tempdir().expect("temp dir");
    let wav = b"RIFF0000WAVEfmt ";
    fs::write(dir.path().join("meow.wav"), wav).expect("write sound");

    let mut project = Project::new();
    let sprite = project.create_sprite("Cat");
    sprite.scriptable.add_sound(Sound::new("meow", "meow.wav"));

    let bytes = build_sb2_bytes(&project, dir.path()).expect("packaging should succeed");
    let (root, names) = unpack(&bytes);

    let sound = &root["children"][0]["sounds"][0];
    assert_eq!(sound["soundName"], "meow");
    assert_eq!(sound["soundID"], json!(0));
    let digest = format!("{:x}", md5::compute(wav));
    assert_eq!(sound["md5"], format!("{}.wav", digest));
    assert!(names.contains(&"0.wav".to_string()));
}

#[test]
fn missing_costume_file_is_an_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let mut project = Project::new();
    let sprite = project.create_sprite("Ghost");
    sprite.scriptable.add_costume(Costume::new("ghost", "missing.png"));

    let err = build_sb2_bytes(&project, dir.path()).unwrap_err();
    assert!(err.to_string().contains("missing.png"), "got: {}", err);
}

#[test]
fn unsupported_costume_format_is_an_error() {
    let mut project = Project::new();
    let sprite = project.create_sprite("Doc");
    sprite.scriptable.add_costume(Costume::new("doc", "notes.txt"));

    let err = build_sb2_bytes(&project, Path::new(".")).unwrap_err();
    assert!(
        err.to_string().contains("Unsupported costume format"),
        "got: {}",
        err
    );
}

#[test]
fn stageless_project_gets_a_synthesized_stage() {
    let mut project = Project::new();
    project.create_sprite("Lonely");

    let bytes = build_sb2_bytes(&project, Path::new(".")).expect("packaging should succeed");
    let (root, _) = unpack(&bytes);
    assert_eq!(root["objName"], "Stage");
    assert_eq!(root["tempoBPM"], json!(60));
    assert_eq!(root["children"][0]["objName"], "Lonely");
}

#[test]
fn write_sb2_creates_the_output_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let out = dir.path().join("out").join("demo.sb2");

    write_sb2(&Project::new(), dir.path(), &out).expect("write should succeed");
    let bytes = fs::read(&out).expect("output file should exist");
    ZipArchive::new(Cursor::new(bytes)).expect("output should be a zip");
}
