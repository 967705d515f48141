//! Evaluation trees for quantified key paths.
//!
//! [`build_tree`] walks a segmented path against a value and records every
//! point where the path fans out over a sequence. [`evaluate_tree`] then
//! applies a rule at the leaves and folds the results back up: AND under
//! `all`, OR under `any`, identity through plain segments.
//!
//! ```text
//! path "any.a.all" over [{a: [0, 1]}, {a: [1, 2]}]
//!
//! Any ─┬─ Plain ── All ─┬─ 0
//!      │                └─ 1
//!      └─ Plain ── All ─┬─ 1
//!                       └─ 2
//! ```

use crate::enums::{MissingPolicy, Mode};
use crate::error::{RuleError, RuleErrorKind};
use crate::path::{quantifier, resolve_segment, split_path};
use crate::rules::Rule;
use crate::value::Value;
use tracing::trace;

/// One point in the traversal of a path.
///
/// Nodes borrow the value they reached, so a tree never outlives its input.
#[derive(Clone, Debug, PartialEq)]
pub struct Node<'v> {
    /// The value reached at this node. Only leaves hand it to a rule.
    pub value: &'v Value,
    pub mode: Mode,
    /// One child per element under `All`/`Any`, at most one under `Plain`.
    pub children: Vec<Node<'v>>,
    /// The segment that failed to resolve, when the branch was cut short here.
    pub missing: Option<String>,
}

impl<'v> Node<'v> {
    pub fn leaf(value: &'v Value) -> Self {
        Node {
            value,
            mode: Mode::Plain,
            children: Vec::new(),
            missing: None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.mode == Mode::Plain && self.children.is_empty()
    }

    /// Number of levels below this node along its deepest branch.
    pub fn depth(&self) -> usize {
        self.children
            .iter()
            .map(|child| child.depth() + 1)
            .max()
            .unwrap_or(0)
    }
}

// ─── Building ───────────────────────────────────────────────────────────────

/// Builds the evaluation tree for `segments` starting at `value`.
///
/// Consumes one segment per level. A segment that does not resolve ends the
/// branch: the node stays a leaf holding the value reached so far and records
/// the segment in [`Node::missing`]. A quantifier turns the node into an
/// `All`/`Any` node with one independently built subtree per element, so the
/// rest of the path is evaluated inside each element.
pub fn build_tree<'v>(segments: &[&str], value: &'v Value) -> Node<'v> {
    let Some((segment, rest)) = segments.split_first() else {
        return Node::leaf(value);
    };

    let Some(resolved) = resolve_segment(segment, value) else {
        trace!(segment = %segment, kind = %value.kind(), "segment did not resolve");
        return Node {
            missing: Some(segment.to_string()),
            ..Node::leaf(value)
        };
    };

    match quantifier(segment) {
        Some(mode) => {
            let items = resolved.as_sequence().unwrap_or_default();
            Node {
                value,
                mode,
                children: items.iter().map(|item| build_tree(rest, item)).collect(),
                missing: None,
            }
        }
        None => Node {
            value,
            mode: Mode::Plain,
            children: vec![build_tree(rest, resolved)],
            missing: None,
        },
    }
}

// ─── Evaluation ─────────────────────────────────────────────────────────────

/// Evaluates `rule` over a tree, bottom-up.
///
/// - `All`: children in order, stopping at the first failure or error.
///   No children passes.
/// - `Any`: every child is evaluated and the results are OR-ed; child errors
///   are ignored. No children fails.
/// - `Plain` with a child: the child's result.
/// - `Plain` leaf: the rule's result, or the missing-path policy's verdict if
///   the branch was truncated.
pub fn evaluate_tree(
    node: &Node<'_>,
    rule: &dyn Rule,
    missing: MissingPolicy,
) -> Result<bool, RuleError> {
    match node.mode {
        Mode::All => {
            for child in &node.children {
                if !evaluate_tree(child, rule, missing)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        Mode::Any => {
            let mut passed = false;
            for child in &node.children {
                match evaluate_tree(child, rule, missing) {
                    Ok(result) => passed |= result,
                    Err(e) => trace!(error = %e, "ignoring rule error inside any"),
                }
            }
            Ok(passed)
        }
        Mode::Plain => match node.children.first() {
            Some(child) => evaluate_tree(child, rule, missing),
            None => evaluate_leaf(node, rule, missing),
        },
    }
}

fn evaluate_leaf(
    node: &Node<'_>,
    rule: &dyn Rule,
    missing: MissingPolicy,
) -> Result<bool, RuleError> {
    match (&node.missing, missing) {
        (Some(_), MissingPolicy::Fail) => Ok(false),
        (Some(segment), MissingPolicy::Error) => Err(RuleError::new(
            RuleErrorKind::MissingPath,
            format!(
                "segment '{}' does not resolve against a {} value",
                segment,
                node.value.kind()
            ),
        )),
        _ => rule.evaluate(node.value),
    }
}

/// Segments `path`, builds its tree over `value` and evaluates `rule` on it.
pub fn evaluate_path(
    path: &str,
    value: &Value,
    rule: &dyn Rule,
    missing: MissingPolicy,
) -> Result<bool, RuleError> {
    let segments = split_path(path);
    let tree = build_tree(&segments, value);
    evaluate_tree(&tree, rule, missing)
}
