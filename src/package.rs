use crate::model::{Project, Scriptable, Sprite, Stage};
use crate::serialize::{number_value, serialize_comment, serialize_script};
use anyhow::{bail, Context, Result};
use serde_json::{json, Value};
use std::fs;
use std::io::{Cursor, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use zip::write::SimpleFileOptions;

const DEFAULT_BACKDROP_SVG: &str =
    r##"<svg xmlns="http://www.w3.org/2000/svg" width="480" height="360" viewBox="0 0 480 360"></svg>"##;

/// Build the `.sb2` archive and write it to `output_path`. The write goes
/// through a temp file in the destination directory so a failed build never
/// leaves a truncated archive behind.
pub fn write_sb2(project: &Project, source_dir: &Path, output_path: &Path) -> Result<()> {
    let bytes = build_sb2_bytes(project, source_dir)?;
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let dir = match output_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(&bytes)?;
    tmp.persist(output_path).map_err(|e| e.error)?;
    Ok(())
}

/// Build the `.sb2` container in memory: project.json plus the costume and
/// sound assets referenced by the project, read from `source_dir`.
pub fn build_sb2_bytes(project: &Project, source_dir: &Path) -> Result<Vec<u8>> {
    let mut packager = ProjectPackager::new(project, source_dir);
    let project_json = packager.build_project_json()?;

    let mut buffer = Cursor::new(Vec::<u8>::new());
    let mut zip = zip::ZipWriter::new(&mut buffer);
    let opts = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
    zip.start_file("project.json", opts)?;
    zip.write_all(&serde_json::to_vec_pretty(&project_json)?)?;
    for (name, bytes) in packager.assets {
        zip.start_file(name, opts)?;
        zip.write_all(&bytes)?;
    }
    zip.finish()?;
    Ok(buffer.into_inner())
}

struct ProjectPackager<'a> {
    project: &'a Project,
    source_dir: &'a Path,
    assets: Vec<(String, Vec<u8>)>,
    image_counter: i64,
    sound_counter: i64,
}

impl<'a> ProjectPackager<'a> {
    fn new(project: &'a Project, source_dir: &'a Path) -> Self {
        Self {
            project,
            source_dir,
            assets: Vec::new(),
            image_counter: 0,
            sound_counter: 0,
        }
    }

    fn build_project_json(&mut self) -> Result<Value> {
        let project = self.project;
        // The root object of project.json IS the stage; a project built
        // without one gets the default backdrop-only stage.
        let synthesized;
        let stage = match &project.stage {
            Some(stage) => stage,
            None => {
                synthesized = Stage::default();
                &synthesized
            }
        };

        let mut stage_json = self.build_scriptable_json(&stage.scriptable, true)?;
        let mut children = Vec::with_capacity(project.sprites.len());
        for sprite in &project.sprites {
            children.push(self.build_sprite_json(sprite)?);
        }
        let script_count = stage.scriptable.scripts.len()
            + project
                .sprites
                .iter()
                .map(|s| s.scriptable.scripts.len())
                .sum::<usize>();

        merge_fields(
            &mut stage_json,
            json!({
                "objName": "Stage",
                "penLayerID": stage.pen_layer_id,
                "penLayerMD5": stage.pen_layer_md5,
                "tempoBPM": number_value(stage.tempo),
                "videoAlpha": number_value((100.0 - stage.video_transparency) / 100.0),
                "children": children,
                "info": {
                    "spriteCount": project.sprites.len(),
                    "scriptCount": script_count,
                    "videoOn": false,
                    "hasCloudData": false,
                    "userAgent": concat!("sb2-rs ", env!("CARGO_PKG_VERSION"))
                }
            }),
        )?;
        Ok(stage_json)
    }

    fn build_sprite_json(&mut self, sprite: &Sprite) -> Result<Value> {
        let mut sprite_json = self.build_scriptable_json(&sprite.scriptable, false)?;
        merge_fields(
            &mut sprite_json,
            json!({
                "objName": sprite.name,
                "scratchX": number_value(sprite.x),
                "scratchY": number_value(sprite.y),
                "scale": number_value(sprite.scale / 100.0),
                "direction": number_value(sprite.direction),
                "rotationStyle": "normal",
                "isDraggable": false,
                "indexInLibrary": sprite.index + 1,
                "visible": sprite.visible,
                "spriteInfo": {}
            }),
        )?;
        Ok(sprite_json)
    }

    fn build_scriptable_json(&mut self, scriptable: &Scriptable, is_stage: bool) -> Result<Value> {
        let variables = scriptable
            .variables
            .iter()
            .map(|v| json!({"name": v.name, "value": v.value, "isPersistent": false}))
            .collect::<Vec<_>>();
        let lists = scriptable
            .lists
            .iter()
            .map(|l| {
                json!({
                    "listName": l.name,
                    "contents": l.contents,
                    "isPersistent": false,
                    "x": 0,
                    "y": 0,
                    "width": 0,
                    "height": 0,
                    "visible": false
                })
            })
            .collect::<Vec<_>>();
        let mut scripts = Vec::with_capacity(scriptable.scripts.len());
        for script in &scriptable.scripts {
            scripts.push(serialize_script(script)?);
        }
        let comments = scriptable
            .comments
            .iter()
            .map(serialize_comment)
            .collect::<Vec<_>>();
        let costumes = self.build_costumes(scriptable, is_stage)?;
        let sounds = self.build_sounds(scriptable)?;

        Ok(json!({
            "variables": variables,
            "lists": lists,
            "scripts": scripts,
            "scriptComments": comments,
            "sounds": sounds,
            "costumes": costumes,
            "currentCostumeIndex": scriptable.current_costume
        }))
    }

    fn build_costumes(&mut self, scriptable: &Scriptable, is_stage: bool) -> Result<Vec<Value>> {
        let mut out = Vec::new();
        for costume in &scriptable.costumes {
            let file_path = self.source_dir.join(&costume.file);
            let ext = file_extension(&costume.file);
            if ext != "svg" && ext != "png" {
                bail!(
                    "Unsupported costume format '.{}' for '{}'. Only .svg and .png are supported.",
                    ext,
                    costume.file
                );
            }
            let data = fs::read(&file_path)
                .with_context(|| format!("Failed to read costume file '{}'.", file_path.display()))?;
            out.push(self.register_costume(&costume.name, data, &ext));
        }
        if out.is_empty() {
            let name = if is_stage { "backdrop1" } else { "costume1" };
            out.push(self.register_costume(name, DEFAULT_BACKDROP_SVG.as_bytes().to_vec(), "svg"));
        }
        Ok(out)
    }

    fn register_costume(&mut self, name: &str, data: Vec<u8>, ext: &str) -> Value {
        let digest = format!("{:x}", md5::compute(&data));
        let id = self.image_counter;
        self.image_counter += 1;
        self.assets.push((format!("{}.{}", id, ext), data));
        json!({
            "costumeName": name,
            "baseLayerID": id,
            "baseLayerMD5": format!("{}.{}", digest, ext),
            "bitmapResolution": 1,
            "rotationCenterX": 0,
            "rotationCenterY": 0
        })
    }

    fn build_sounds(&mut self, scriptable: &Scriptable) -> Result<Vec<Value>> {
        let mut out = Vec::new();
        for sound in &scriptable.sounds {
            let file_path = self.source_dir.join(&sound.file);
            let ext = file_extension(&sound.file);
            if ext != "wav" && ext != "mp3" {
                bail!(
                    "Unsupported sound format '.{}' for '{}'. Only .wav and .mp3 are supported.",
                    ext,
                    sound.file
                );
            }
            let data = fs::read(&file_path)
                .with_context(|| format!("Failed to read sound file '{}'.", file_path.display()))?;
            let digest = format!("{:x}", md5::compute(&data));
            let id = self.sound_counter;
            self.sound_counter += 1;
            self.assets.push((format!("{}.{}", id, ext), data));
            out.push(json!({
                "soundName": sound.name,
                "soundID": id,
                "md5": format!("{}.{}", digest, ext),
                "sampleCount": 0,
                "rate": 0,
                "format": ""
            }));
        }
        Ok(out)
    }
}

fn file_extension(file: &str) -> String {
    Path::new(file)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

fn merge_fields(target: &mut Value, extra: Value) -> Result<()> {
    let (Some(target_map), Value::Object(extra_map)) = (target.as_object_mut(), extra) else {
        bail!("Internal error: expected JSON objects while merging target fields.");
    };
    for (key, value) in extra_map {
        target_map.insert(key, value);
    }
    Ok(())
}
