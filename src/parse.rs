use crate::error::{ParseError, ParseErrorKind};
use crate::types::{RawDocument, RuleDocument, RuleEntry, RuleSpec};

/// Parse a YAML (or JSON) rule document.
///
/// Performs deserialization and type mapping only. Patterns and expressions
/// are compiled later, by [`RuleDocument::build`].
pub fn parse(input: &str) -> Result<RuleDocument, ParseError> {
    if input.trim().is_empty() {
        return Err(ParseError {
            kind: ParseErrorKind::Syntax,
            message: "empty input".to_string(),
            path: None,
        });
    }

    // YAML → serde_json::Value first, so entry order survives and each entry
    // can be typed on its own with a precise error path.
    let value: serde_json::Value = serde_saphyr::from_str(input).map_err(|e| {
        let msg = e.to_string();
        ParseError {
            kind: classify_saphyr_error(&msg),
            message: msg,
            path: None,
        }
    })?;

    if !value.is_object() {
        return Err(ParseError {
            kind: ParseErrorKind::TypeMismatch,
            message: "rule document root must be a mapping".to_string(),
            path: None,
        });
    }

    let raw: RawDocument = serde_json::from_value(value).map_err(|e| {
        let msg = e.to_string();
        ParseError {
            kind: classify_json_error(&msg),
            message: msg,
            path: None,
        }
    })?;

    let mut rules = Vec::with_capacity(raw.rules.len());
    for (path, spec) in raw.rules {
        let rule: RuleSpec = serde_json::from_value(spec).map_err(|e| {
            let msg = e.to_string();
            ParseError {
                kind: classify_json_error(&msg),
                message: msg,
                path: Some(format!("rules.{}", path)),
            }
        })?;
        rules.push(RuleEntry { path, rule });
    }

    Ok(RuleDocument {
        logic: raw.logic,
        missing: raw.missing,
        rules,
    })
}

fn classify_saphyr_error(msg: &str) -> ParseErrorKind {
    let lower = msg.to_lowercase();
    if lower.contains("unknown") || lower.contains("variant") {
        ParseErrorKind::UnknownVariant
    } else if lower.contains("type") || lower.contains("invalid") || lower.contains("expected") {
        ParseErrorKind::TypeMismatch
    } else {
        ParseErrorKind::Syntax
    }
}

fn classify_json_error(msg: &str) -> ParseErrorKind {
    let lower = msg.to_lowercase();
    if lower.contains("unknown variant") || lower.contains("unknown field") {
        ParseErrorKind::UnknownVariant
    } else if lower.contains("missing field")
        || lower.contains("invalid type")
        || lower.contains("invalid length")
    {
        ParseErrorKind::TypeMismatch
    } else {
        ParseErrorKind::Syntax
    }
}
