use crate::model::{Arg, Block, Comment, Script};
use crate::specs::{self, UnknownSpecError};
use serde_json::{Number, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, Default)]
pub struct SerializeOptions {
    /// When set, a block whose argument count differs from its template's
    /// placeholder count (plus substack slots for c-shaped blocks) is
    /// rejected. Off by default: the classic encoder never validated arity.
    pub strict_arity: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SerializeError {
    UnknownSpec(UnknownSpecError),
    ArityMismatch {
        spec: String,
        expected: usize,
        arguments: usize,
    },
}

impl Display for SerializeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SerializeError::UnknownSpec(err) => write!(f, "{}", err),
            SerializeError::ArityMismatch {
                spec,
                expected,
                arguments,
            } => write!(
                f,
                "Block spec '{}' takes {} argument(s) but {} were given.",
                spec, expected, arguments
            ),
        }
    }
}

impl Error for SerializeError {}

impl From<UnknownSpecError> for SerializeError {
    fn from(err: UnknownSpecError) -> Self {
        SerializeError::UnknownSpec(err)
    }
}

/// Serialize one block to its wire form: `[selector, arg1, arg2, ...]`.
/// The spec is re-validated against the registry here; blocks are plain data
/// and may have been edited since construction.
pub fn serialize_block(block: &Block) -> Result<Value, SerializeError> {
    serialize_block_with_options(block, SerializeOptions::default())
}

pub fn serialize_block_with_options(
    block: &Block,
    options: SerializeOptions,
) -> Result<Value, SerializeError> {
    let entry = specs::lookup(&block.spec).ok_or_else(|| UnknownSpecError {
        spec: block.spec.clone(),
    })?;
    if options.strict_arity {
        let expected = specs::placeholder_count(entry.template) + entry.shape.substack_slots();
        if expected != block.args.len() {
            return Err(SerializeError::ArityMismatch {
                spec: block.spec.clone(),
                expected,
                arguments: block.args.len(),
            });
        }
    }
    let mut out = Vec::with_capacity(1 + block.args.len());
    out.push(Value::String(entry.selector.to_string()));
    for arg in &block.args {
        out.push(serialize_arg(arg, options)?);
    }
    Ok(Value::Array(out))
}

fn serialize_arg(arg: &Arg, options: SerializeOptions) -> Result<Value, SerializeError> {
    match arg {
        Arg::Number(v) => Ok(number_value(*v)),
        Arg::String(s) => Ok(Value::String(s.clone())),
        Arg::Boolean(b) => Ok(Value::Bool(*b)),
        Arg::Block(block) => serialize_block_with_options(block, options),
        // A script in argument position is a substack: the runtime expects a
        // bare block list there, without the top-level x/y pair.
        Arg::Script(script) => serialize_stack(&script.blocks, options),
    }
}

fn serialize_stack(blocks: &[Block], options: SerializeOptions) -> Result<Value, SerializeError> {
    let mut out = Vec::with_capacity(blocks.len());
    for block in blocks {
        out.push(serialize_block_with_options(block, options)?);
    }
    Ok(Value::Array(out))
}

/// Serialize a top-level script: `[x, y, [block, ...]]`.
pub fn serialize_script(script: &Script) -> Result<Value, SerializeError> {
    serialize_script_with_options(script, SerializeOptions::default())
}

pub fn serialize_script_with_options(
    script: &Script,
    options: SerializeOptions,
) -> Result<Value, SerializeError> {
    Ok(Value::Array(vec![
        number_value(script.x),
        number_value(script.y),
        serialize_stack(&script.blocks, options)?,
    ]))
}

/// Serialize a workspace comment: `[x, y, width, height, true, -1, text]`.
/// The fifth element is the constant expanded/visible flag; the sixth is the
/// not-attached-to-a-block sentinel.
pub fn serialize_comment(comment: &Comment) -> Value {
    Value::Array(vec![
        number_value(comment.x),
        number_value(comment.y),
        number_value(comment.width),
        number_value(comment.height),
        Value::Bool(true),
        Value::from(-1),
        Value::String(comment.text.clone()),
    ])
}

/// Integral values render as JSON integers ("10", not "10.0"), matching the
/// classic encoder's output.
pub(crate) fn number_value(v: f64) -> Value {
    if v.is_finite() && v.fract() == 0.0 && v >= i64::MIN as f64 && v <= i64::MAX as f64 {
        return Value::Number(Number::from(v as i64));
    }
    Number::from_f64(v).map(Value::Number).unwrap_or(Value::Null)
}
