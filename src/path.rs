//! Dotted key paths: segmentation and single-segment resolution.
//!
//! A path such as `users.any.emails.first` is split on `.` into segments.
//! Four segment names are reserved: `all` and `any` (quantifiers, which fan
//! out over a sequence), `first` and `last` (sequence ends). A segment made of
//! ASCII digits indexes into a sequence. Anything else is a map key or record
//! field name.

use crate::enums::Mode;
use crate::value::Value;

pub const KEY_ALL: &str = "all";
pub const KEY_ANY: &str = "any";
pub const KEY_FIRST: &str = "first";
pub const KEY_LAST: &str = "last";

// ─── Segmentation ───────────────────────────────────────────────────────────

/// Splits a dotted path into its non-empty segments.
///
/// Empty segments produced by leading, trailing or consecutive dots are
/// dropped. An empty result addresses the root value itself.
pub fn split_path(path: &str) -> Vec<&str> {
    path.split('.').filter(|s| !s.is_empty()).collect()
}

/// The fan-out mode of a quantifier segment, or `None` for any other segment.
pub fn quantifier(segment: &str) -> Option<Mode> {
    match segment {
        KEY_ALL => Some(Mode::All),
        KEY_ANY => Some(Mode::Any),
        _ => None,
    }
}

fn parse_index(segment: &str) -> Option<usize> {
    if segment.bytes().all(|b| b.is_ascii_digit()) {
        segment.parse().ok()
    } else {
        None
    }
}

// ─── Resolution ─────────────────────────────────────────────────────────────

/// Resolves one segment against a value.
///
/// Boxes are unwrapped first. Quantifier segments return the sequence itself
/// (the caller performs the fan-out) and miss on every other shape, maps
/// included. Returns `None` whenever the segment does not apply: wrong shape,
/// index out of range, unknown key or field, scalar or null input.
pub fn resolve_segment<'v>(segment: &str, value: &'v Value) -> Option<&'v Value> {
    let value = value.unboxed();

    if quantifier(segment).is_some() {
        return match value {
            Value::Sequence(_) => Some(value),
            _ => None,
        };
    }

    match value {
        Value::Sequence(items) => match segment {
            KEY_FIRST => items.first(),
            KEY_LAST => items.last(),
            _ => parse_index(segment).and_then(|i| items.get(i)),
        },
        Value::Map(_) => value.get_key(segment),
        Value::Record(record) => record.get(segment),
        _ => None,
    }
}

/// Resolves a path made only of plain segments to the single value it
/// addresses.
///
/// Returns `None` if any segment misses or if the path contains a quantifier,
/// since a quantified path addresses many values. An empty path returns the
/// root.
pub fn resolve_path<'v>(path: &str, value: &'v Value) -> Option<&'v Value> {
    let mut current = value;
    for segment in split_path(path) {
        if quantifier(segment).is_some() {
            return None;
        }
        current = resolve_segment(segment, current)?;
    }
    Some(current)
}
