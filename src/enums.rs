//! Closed enumerations used throughout the engine.
//!
//! All of them deserialize from snake_case names so rule documents can spell
//! them directly (`logic: any`, `missing: fail`, `kind: sequence`).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Traversal mode of an evaluation tree node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Plain,
    All,
    Any,
}

/// How per-path outcomes combine across a whole rule set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Logic {
    /// Every entry must pass (strict mode).
    #[default]
    All,
    /// At least one entry must pass.
    Any,
}

/// How a branch truncated by an unresolvable segment is judged.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingPolicy {
    /// The rule is applied to the last value that was reached.
    #[default]
    Truncate,
    /// The truncated branch fails.
    Fail,
    /// The truncated branch raises a `missing_path` rule error.
    Error,
}

/// Per-path outcome reported by [`RuleSet::check`](crate::validate::RuleSet::check).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathResult {
    Passed,
    Failed,
    Error,
}

/// Runtime shape of a [`Value`](crate::value::Value).
///
/// Signed and unsigned integers share the `Integer` kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Null,
    Bool,
    Integer,
    Float,
    String,
    Duration,
    Sequence,
    Map,
    Record,
    Boxed,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Null => "null",
            ValueKind::Bool => "bool",
            ValueKind::Integer => "integer",
            ValueKind::Float => "float",
            ValueKind::String => "string",
            ValueKind::Duration => "duration",
            ValueKind::Sequence => "sequence",
            ValueKind::Map => "map",
            ValueKind::Record => "record",
            ValueKind::Boxed => "boxed",
        };
        f.write_str(name)
    }
}
