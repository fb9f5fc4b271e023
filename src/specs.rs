use std::error::Error;
use std::fmt::{Display, Formatter};

/// Shape category of a block, carried as metadata alongside each spec.
/// The single-character codes are the ones the Scratch 2.0 palette uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockShape {
    Command,
    Reporter,
    Boolean,
    Hat,
    Cap,
    CBlock,
    LoopCBlock,
    IfElse,
}

impl BlockShape {
    pub fn code(self) -> &'static str {
        match self {
            BlockShape::Command => " ",
            BlockShape::Reporter => "r",
            BlockShape::Boolean => "b",
            BlockShape::Hat => "h",
            BlockShape::Cap => "f",
            BlockShape::CBlock => "c",
            BlockShape::LoopCBlock => "cf",
            BlockShape::IfElse => "e",
        }
    }

    /// Substack slots a block of this shape carries beyond its template
    /// placeholders (the bodies of c-shaped and if/else blocks).
    pub fn substack_slots(self) -> usize {
        match self {
            BlockShape::CBlock | BlockShape::LoopCBlock => 1,
            BlockShape::IfElse => 2,
            _ => 0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct BlockSpec {
    pub template: &'static str,
    pub shape: BlockShape,
    pub selector: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownSpecError {
    pub spec: String,
}

impl Display for UnknownSpecError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Unknown block spec '{}'.", self.spec)
    }
}

impl Error for UnknownSpecError {}

const fn spec(template: &'static str, shape: BlockShape, selector: &'static str) -> BlockSpec {
    BlockSpec {
        template,
        shape,
        selector,
    }
}

use BlockShape::{Boolean, CBlock, Cap, Command, Hat, IfElse, LoopCBlock, Reporter};

/// The Scratch 2.0 block palette. Templates and selectors are wire format and
/// must match the runtime's tables byte-for-byte. The table may contain
/// duplicate templates ("if %b then" exists as both doIf and doIfElse);
/// lookup is first-match.
pub static BLOCK_SPECS: &[BlockSpec] = &[
    // motion
    spec("move %n steps", Command, "forward:"),
    spec("turn @turnRight %n degrees", Command, "turnRight:"),
    spec("turn @turnLeft %n degrees", Command, "turnLeft:"),
    spec("point in direction %d.direction", Command, "heading:"),
    spec("point towards %m.spriteOrMouse", Command, "pointTowards:"),
    spec("go to x:%n y:%n", Command, "gotoX:y:"),
    spec("go to %m.location", Command, "gotoSpriteOrMouse:"),
    spec(
        "glide %n secs to x:%n y:%n",
        Command,
        "glideSecs:toX:y:elapsed:from:",
    ),
    spec("change x by %n", Command, "changeXposBy:"),
    spec("set x to %n", Command, "xpos:"),
    spec("change y by %n", Command, "changeYposBy:"),
    spec("set y to %n", Command, "ypos:"),
    spec("if on edge, bounce", Command, "bounceOffEdge"),
    spec("set rotation style %m.rotationStyle", Command, "setRotationStyle"),
    spec("x position", Reporter, "xpos"),
    spec("y position", Reporter, "ypos"),
    spec("direction", Reporter, "heading"),
    // looks
    spec("say %s for %n secs", Command, "say:duration:elapsed:from:"),
    spec("say %s", Command, "say:"),
    spec("think %s for %n secs", Command, "think:duration:elapsed:from:"),
    spec("think %s", Command, "think:"),
    spec("show", Command, "show"),
    spec("hide", Command, "hide"),
    spec("switch costume to %m.costume", Command, "lookLike:"),
    spec("next costume", Command, "nextCostume"),
    spec("switch backdrop to %m.backdrop", Command, "startScene"),
    spec(
        "switch backdrop to %m.backdrop and wait",
        Command,
        "startSceneAndWait",
    ),
    spec("next backdrop", Command, "nextScene"),
    spec("change %m.effect effect by %n", Command, "changeGraphicEffect:by:"),
    spec("set %m.effect effect to %n", Command, "setGraphicEffect:to:"),
    spec("clear graphic effects", Command, "filterReset"),
    spec("change size by %n", Command, "changeSizeBy:"),
    spec("set size to %n%", Command, "setSizeTo:"),
    spec("go to front", Command, "comeToFront"),
    spec("go back %n layers", Command, "goBackByLayers:"),
    spec("costume #", Reporter, "costumeIndex"),
    spec("backdrop name", Reporter, "sceneName"),
    spec("backdrop #", Reporter, "backgroundIndex"),
    spec("size", Reporter, "scale"),
    // sound
    spec("play sound %m.sound", Command, "playSound:"),
    spec("play sound %m.sound until done", Command, "doPlaySoundAndWait"),
    spec("stop all sounds", Command, "stopAllSounds"),
    spec("play drum %d.drum for %n beats", Command, "playDrum"),
    spec("rest for %n beats", Command, "rest:elapsed:from:"),
    spec(
        "play note %d.note for %n beats",
        Command,
        "noteOn:duration:elapsed:from:",
    ),
    spec("set instrument to %d.instrument", Command, "instrument:"),
    spec("change volume by %n", Command, "changeVolumeBy:"),
    spec("set volume to %n%", Command, "setVolumeTo:"),
    spec("volume", Reporter, "volume"),
    spec("change tempo by %n", Command, "changeTempoBy:"),
    spec("set tempo to %n bpm", Command, "setTempoTo:"),
    spec("tempo", Reporter, "tempo"),
    // pen
    spec("clear", Command, "clearPenTrails"),
    spec("stamp", Command, "stampCostume"),
    spec("pen down", Command, "putPenDown"),
    spec("pen up", Command, "putPenUp"),
    spec("set pen color to %c", Command, "penColor:"),
    spec("change pen color by %n", Command, "changePenHueBy:"),
    spec("set pen color to %n", Command, "setPenHueTo:"),
    spec("change pen shade by %n", Command, "changePenShadeBy:"),
    spec("set pen shade to %n", Command, "setPenShadeTo:"),
    spec("change pen size by %n", Command, "changePenSizeBy:"),
    spec("set pen size to %n", Command, "penSize:"),
    // data
    spec("%m.var", Reporter, "readVariable"),
    spec("set %m.var to %s", Command, "setVar:to:"),
    spec("change %m.var by %n", Command, "changeVar:by:"),
    spec("show variable %m.var", Command, "showVariable:"),
    spec("hide variable %m.var", Command, "hideVariable:"),
    spec("%m.list", Reporter, "contentsOfList:"),
    spec("add %s to %m.list", Command, "append:toList:"),
    spec("delete %d.listDeleteItem of %m.list", Command, "deleteLine:ofList:"),
    spec(
        "insert %s at %d.listItem of %m.list",
        Command,
        "insert:at:ofList:",
    ),
    spec(
        "replace item %d.listItem of %m.list with %s",
        Command,
        "setLine:ofList:to:",
    ),
    spec("item %d.listItem of %m.list", Reporter, "getLine:ofList:"),
    spec("length of %m.list", Reporter, "lineCountOfList:"),
    spec("%m.list contains %s?", Boolean, "list:contains:"),
    spec("show list %m.list", Command, "showList:"),
    spec("hide list %m.list", Command, "hideList:"),
    // events
    spec("when @greenFlag clicked", Hat, "whenGreenFlag"),
    spec("when %m.key key pressed", Hat, "whenKeyPressed"),
    spec("when this sprite clicked", Hat, "whenClicked"),
    spec("when Stage clicked", Hat, "whenClicked"),
    spec("when backdrop switches to %m.backdrop", Hat, "whenSceneStarts"),
    spec("when %m.triggerSensor > %n", Hat, "whenSensorGreaterThan"),
    spec("when I receive %m.broadcast", Hat, "whenIReceive"),
    spec("broadcast %m.broadcast", Command, "broadcast:"),
    spec("broadcast %m.broadcast and wait", Command, "doBroadcastAndWait"),
    // control
    spec("wait %n secs", Command, "wait:elapsed:from:"),
    spec("repeat %n", CBlock, "doRepeat"),
    spec("forever", LoopCBlock, "doForever"),
    spec("if %b then", CBlock, "doIf"),
    spec("if %b then", IfElse, "doIfElse"),
    spec("wait until %b", Command, "doWaitUntil"),
    spec("repeat until %b", CBlock, "doUntil"),
    spec("stop %m.stop", Cap, "stopScripts"),
    spec("when I start as a clone", Hat, "whenCloned"),
    spec("create clone of %m.clone", Command, "createCloneOf"),
    spec("delete this clone", Cap, "deleteClone"),
    // sensing
    spec("touching %m.touching?", Boolean, "touching:"),
    spec("touching color %c?", Boolean, "touchingColor:"),
    spec("color %c is touching %c?", Boolean, "color:sees:"),
    spec("distance to %m.spriteOrMouse", Reporter, "distanceTo:"),
    spec("ask %s and wait", Command, "doAsk"),
    spec("answer", Reporter, "answer"),
    spec("key %m.key pressed?", Boolean, "keyPressed:"),
    spec("mouse down?", Boolean, "mousePressed"),
    spec("mouse x", Reporter, "mouseX"),
    spec("mouse y", Reporter, "mouseY"),
    spec("loudness", Reporter, "soundLevel"),
    spec(
        "video %m.videoMotionType on %m.stageOrThis",
        Reporter,
        "senseVideoMotion",
    ),
    spec("turn video %m.videoState", Command, "setVideoState"),
    spec("set video transparency to %n%", Command, "setVideoTransparency"),
    spec("timer", Reporter, "timer"),
    spec("reset timer", Command, "timerReset"),
    spec("%m.attribute of %m.spriteOrStage", Reporter, "getAttribute:of:"),
    spec("current %m.timeAndDate", Reporter, "timeAndDate"),
    spec("days since 2000", Reporter, "timestamp"),
    spec("username", Reporter, "getUserName"),
    // operators
    spec("%n + %n", Reporter, "+"),
    spec("%n - %n", Reporter, "-"),
    spec("%n * %n", Reporter, "*"),
    spec("%n / %n", Reporter, "/"),
    spec("pick random %n to %n", Reporter, "randomFrom:to:"),
    spec("%s < %s", Boolean, "<"),
    spec("%s = %s", Boolean, "="),
    spec("%s > %s", Boolean, ">"),
    spec("%b and %b", Boolean, "&"),
    spec("%b or %b", Boolean, "|"),
    spec("not %b", Boolean, "not"),
    spec("join %s %s", Reporter, "concatenate:with:"),
    spec("letter %n of %s", Reporter, "letter:of:"),
    spec("length of %s", Reporter, "stringLength:"),
    spec("%n mod %n", Reporter, "%"),
    spec("round %n", Reporter, "rounded"),
    spec("%m.mathOp of %n", Reporter, "computeFunction:of:"),
];

/// Look up a block spec by its display template. Matching is exact string
/// equality including placeholder tokens; the first matching entry wins.
pub fn lookup(template: &str) -> Option<&'static BlockSpec> {
    BLOCK_SPECS.iter().find(|s| s.template == template)
}

/// Templates that appear more than once in the catalog, in first-occurrence
/// order, each reported once. Consumed by the CLI lint and the unit tests.
pub fn duplicate_templates() -> Vec<&'static str> {
    let mut dupes = Vec::new();
    for (i, entry) in BLOCK_SPECS.iter().enumerate() {
        let first = BLOCK_SPECS
            .iter()
            .position(|s| s.template == entry.template);
        if first == Some(i) {
            continue;
        }
        if !dupes.contains(&entry.template) {
            dupes.push(entry.template);
        }
    }
    dupes
}

/// Count the argument placeholders in a template: %n, %s, %b, %c, and the
/// menu forms %d.<menu> / %m.<menu>. Icon tokens such as @greenFlag are not
/// placeholders. A trailing bare '%' (as in "set size to %n%") counts for
/// nothing.
pub fn placeholder_count(template: &str) -> usize {
    let bytes = template.as_bytes();
    let mut count = 0;
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'%' {
            i += 1;
            continue;
        }
        match bytes.get(i + 1) {
            Some(b'n') | Some(b's') | Some(b'b') | Some(b'c') => {
                count += 1;
                i += 2;
            }
            Some(b'd') | Some(b'm') if bytes.get(i + 2) == Some(&b'.') => {
                count += 1;
                i += 3;
                while i < bytes.len() && bytes[i].is_ascii_alphanumeric() {
                    i += 1;
                }
            }
            _ => i += 1,
        }
    }
    count
}
