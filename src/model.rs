use crate::specs::{self, UnknownSpecError};
use serde_json::Value;

/// Root aggregate: one optional stage plus an ordered sprite sequence.
#[derive(Debug, Clone, Default)]
pub struct Project {
    pub stage: Option<Stage>,
    pub sprites: Vec<Sprite>,
}

impl Project {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a fresh stage on this project and return it. Last write wins:
    /// a second call silently replaces the first stage.
    pub fn create_stage(&mut self) -> &mut Stage {
        self.stage.insert(Stage::default())
    }

    /// Append a sprite. Its `index` is the sprite count at creation time and
    /// is never reassigned afterwards.
    pub fn create_sprite(&mut self, name: impl Into<String>) -> &mut Sprite {
        let index = self.sprites.len();
        self.sprites.push(Sprite {
            scriptable: Scriptable::default(),
            name: name.into(),
            x: 0.0,
            y: 0.0,
            scale: 100.0,
            direction: 90.0,
            visible: true,
            index,
        });
        &mut self.sprites[index]
    }
}

/// The shared scriptable layer: everything a stage or sprite owns. Stage and
/// Sprite embed one of these instead of inheriting from an abstract base, so
/// the layer cannot be constructed free-standing with a bogus parent.
#[derive(Debug, Clone, Default)]
pub struct Scriptable {
    pub variables: Vec<Variable>,
    pub lists: Vec<List>,
    pub costumes: Vec<Costume>,
    pub sounds: Vec<Sound>,
    pub scripts: Vec<Script>,
    pub comments: Vec<Comment>,
    pub current_costume: usize,
}

impl Scriptable {
    /// Append a variable in declaration order. Names are not checked for
    /// uniqueness at this layer.
    pub fn define_variable(&mut self, name: impl Into<String>, value: impl Into<Value>) -> &mut Variable {
        let index = self.variables.len();
        self.variables.push(Variable {
            name: name.into(),
            value: value.into(),
        });
        &mut self.variables[index]
    }

    pub fn define_list(&mut self, name: impl Into<String>) -> &mut List {
        let index = self.lists.len();
        self.lists.push(List {
            name: name.into(),
            contents: Vec::new(),
        });
        &mut self.lists[index]
    }

    pub fn add_costume(&mut self, costume: Costume) {
        self.costumes.push(costume);
    }

    pub fn add_sound(&mut self, sound: Sound) {
        self.sounds.push(sound);
    }

    pub fn add_script(&mut self, script: Script) {
        self.scripts.push(script);
    }

    pub fn add_comment(&mut self, comment: Comment) {
        self.comments.push(comment);
    }
}

#[derive(Debug, Clone)]
pub struct Stage {
    pub scriptable: Scriptable,
    /// Beats per minute for the sound blocks.
    pub tempo: f64,
    /// Video transparency percentage (0 = opaque video feed).
    pub video_transparency: f64,
    /// Pen-layer placeholders; the packager fills real values when it embeds
    /// a pen layer, which this core never does itself.
    pub pen_layer_id: i64,
    pub pen_layer_md5: String,
}

impl Default for Stage {
    fn default() -> Self {
        Self {
            scriptable: Scriptable::default(),
            tempo: 60.0,
            video_transparency: 0.0,
            pen_layer_id: 0,
            pen_layer_md5: String::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Sprite {
    pub scriptable: Scriptable,
    pub name: String,
    pub x: f64,
    pub y: f64,
    /// Percent of natural size, 100 = unscaled.
    pub scale: f64,
    pub direction: f64,
    pub visible: bool,
    /// Position in the owning project's sprite sequence at creation time.
    pub index: usize,
}

#[derive(Debug, Clone)]
pub struct Costume {
    pub name: String,
    /// Source file path, resolved against the packager's source directory.
    pub file: String,
}

impl Costume {
    pub fn new(name: impl Into<String>, file: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            file: file.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Sound {
    pub name: String,
    pub file: String,
}

impl Sound {
    pub fn new(name: impl Into<String>, file: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            file: file.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Variable {
    pub name: String,
    pub value: Value,
}

#[derive(Debug, Clone)]
pub struct List {
    pub name: String,
    pub contents: Vec<Value>,
}

/// One instruction. `spec` is the display template and must match a catalog
/// entry exactly; `args` line up positionally with the template's
/// placeholders (argument count is not validated here, see the serializer's
/// strict mode).
#[derive(Debug, Clone)]
pub struct Block {
    pub spec: String,
    pub args: Vec<Arg>,
}

impl Block {
    pub fn new(spec: impl Into<String>, args: Vec<Arg>) -> Result<Self, UnknownSpecError> {
        let spec = spec.into();
        if specs::lookup(&spec).is_none() {
            return Err(UnknownSpecError { spec });
        }
        Ok(Self { spec, args })
    }

    /// Shorthand for blocks that take no arguments.
    pub fn nullary(spec: impl Into<String>) -> Result<Self, UnknownSpecError> {
        Self::new(spec, Vec::new())
    }
}

/// An argument slot value: a literal, a nested reporter/boolean block, or a
/// substack of blocks for the c-shaped specs.
#[derive(Debug, Clone)]
pub enum Arg {
    Number(f64),
    String(String),
    Boolean(bool),
    Block(Block),
    Script(Script),
}

impl From<f64> for Arg {
    fn from(v: f64) -> Self {
        Arg::Number(v)
    }
}

impl From<i64> for Arg {
    fn from(v: i64) -> Self {
        Arg::Number(v as f64)
    }
}

impl From<i32> for Arg {
    fn from(v: i32) -> Self {
        Arg::Number(v as f64)
    }
}

impl From<&str> for Arg {
    fn from(v: &str) -> Self {
        Arg::String(v.to_string())
    }
}

impl From<String> for Arg {
    fn from(v: String) -> Self {
        Arg::String(v)
    }
}

impl From<bool> for Arg {
    fn from(v: bool) -> Self {
        Arg::Boolean(v)
    }
}

impl From<Block> for Arg {
    fn from(v: Block) -> Self {
        Arg::Block(v)
    }
}

impl From<Script> for Arg {
    fn from(v: Script) -> Self {
        Arg::Script(v)
    }
}

/// An ordered stack of blocks at a canvas position. The first block does not
/// have to be a hat.
#[derive(Debug, Clone)]
pub struct Script {
    pub x: f64,
    pub y: f64,
    pub blocks: Vec<Block>,
}

impl Script {
    pub fn new(x: f64, y: f64, blocks: Vec<Block>) -> Self {
        Self { x, y, blocks }
    }
}

/// A free-floating workspace comment. Always serialized expanded and
/// unattached; this core never ties comments to blocks.
#[derive(Debug, Clone)]
pub struct Comment {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub text: String,
}

impl Comment {
    pub fn new(x: f64, y: f64, width: f64, height: f64, text: impl Into<String>) -> Self {
        Self {
            x,
            y,
            width,
            height,
            text: text.into(),
        }
    }
}
