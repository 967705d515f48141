use serde::{Deserialize, Serialize};
use serde_json::Value as Json;
use std::sync::Arc;

use crate::enums::*;
use crate::error::{ParseError, ParseErrorKind};
use crate::rules::{self, Between, Length, Max, Min, OfKind, OneOf, Pattern, Rule};
use crate::validate::{RuleSet, Validator};
use crate::value::Value;

// ─── Rule documents ─────────────────────────────────────────────────────────

/// A parsed rule document: combination logic, missing-path policy and the
/// rule entries in document order.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RuleDocument {
    pub logic: Logic,
    pub missing: MissingPolicy,
    pub rules: Vec<RuleEntry>,
}

/// One `path: rule` line of a rule document.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RuleEntry {
    pub path: String,
    pub rule: RuleSpec,
}

/// Wire form of a rule document, before the entries are typed.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RawDocument {
    #[serde(default)]
    pub logic: Logic,
    #[serde(default)]
    pub missing: MissingPolicy,
    #[serde(default)]
    pub rules: serde_json::Map<String, Json>,
}

// ─── Rule specs ─────────────────────────────────────────────────────────────

/// Declarative form of a built-in rule.
///
/// Rules without parameters are written as a bare name (`email`), the others
/// as a single-key mapping (`{ between: [1, 10] }`, `{ pattern: "^a" }`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleSpec {
    Accepted,
    Alpha,
    AlphaDash,
    AlphaNumeric,
    AlphaUnderscore,
    Base64,
    Email,
    Integer,
    Ipv4,
    Ipv6,
    Luhn,
    Natural,
    NaturalNonZero,
    NotEmpty,
    Required,
    Url,
    Uuid,
    Pattern(String),
    Between(f64, f64),
    Min(f64),
    Max(f64),
    MinLength(usize),
    MaxLength(usize),
    ExactLength(usize),
    Kind(ValueKind),
    Equals(Json),
    OneOf(Vec<Json>),
    /// CEL expression over `value`. Requires the `cel-eval` feature.
    Expression(String),
}

impl RuleSpec {
    /// Builds the rule, compiling patterns and expressions.
    pub fn build(&self) -> Result<Arc<dyn Rule>, String> {
        let rule: Arc<dyn Rule> = match self {
            RuleSpec::Accepted => Arc::new(rules::accepted()),
            RuleSpec::Alpha => Arc::new(rules::alpha()),
            RuleSpec::AlphaDash => Arc::new(rules::alpha_dash()),
            RuleSpec::AlphaNumeric => Arc::new(rules::alpha_numeric()),
            RuleSpec::AlphaUnderscore => Arc::new(rules::alpha_underscore()),
            RuleSpec::Base64 => Arc::new(rules::base64()),
            RuleSpec::Email => Arc::new(rules::email()),
            RuleSpec::Integer => Arc::new(rules::integer()),
            RuleSpec::Ipv4 => Arc::new(rules::ipv4()),
            RuleSpec::Ipv6 => Arc::new(rules::ipv6()),
            RuleSpec::Luhn => Arc::new(rules::luhn()),
            RuleSpec::Natural => Arc::new(rules::natural()),
            RuleSpec::NaturalNonZero => Arc::new(rules::natural_non_zero()),
            RuleSpec::NotEmpty => Arc::new(Length::not_empty()),
            RuleSpec::Required => Arc::new(rules::required()),
            RuleSpec::Url => Arc::new(rules::url()),
            RuleSpec::Uuid => Arc::new(rules::uuid()),
            RuleSpec::Pattern(pattern) => {
                Arc::new(Pattern::new(pattern).map_err(|e| format!("invalid pattern: {}", e))?)
            }
            RuleSpec::Between(min, max) => {
                if min > max {
                    return Err(format!("between bounds are reversed: {} > {}", min, max));
                }
                Arc::new(Between::new(*min, *max))
            }
            RuleSpec::Min(min) => Arc::new(Min::new(*min)),
            RuleSpec::Max(max) => Arc::new(Max::new(*max)),
            RuleSpec::MinLength(len) => Arc::new(Length::min(*len)),
            RuleSpec::MaxLength(len) => Arc::new(Length::max(*len)),
            RuleSpec::ExactLength(len) => Arc::new(Length::exact(*len)),
            RuleSpec::Kind(kind) => Arc::new(OfKind::new(*kind)),
            RuleSpec::Equals(expected) => Arc::new(OneOf::equals(Value::from(expected))),
            RuleSpec::OneOf(expected) => {
                Arc::new(OneOf::new(expected.iter().map(Value::from).collect()))
            }
            RuleSpec::Expression(source) => build_expression(source)?,
        };
        Ok(rule)
    }
}

#[cfg(feature = "cel-eval")]
fn build_expression(source: &str) -> Result<Arc<dyn Rule>, String> {
    let expression = rules::Expression::new(source).map_err(|e| e.message)?;
    Ok(Arc::new(expression))
}

#[cfg(not(feature = "cel-eval"))]
fn build_expression(_source: &str) -> Result<Arc<dyn Rule>, String> {
    Err("expression rules require the `cel-eval` feature".to_string())
}

impl RuleDocument {
    /// Builds a [`Validator`] from the document.
    ///
    /// # Errors
    ///
    /// Returns an `invalid_rule` [`ParseError`] naming the first entry whose
    /// rule cannot be built (bad regex, bad CEL, reversed bounds).
    pub fn build(&self) -> Result<Validator, ParseError> {
        let mut set = RuleSet::new().missing(self.missing);
        for entry in &self.rules {
            let rule = entry.rule.build().map_err(|message| ParseError {
                kind: ParseErrorKind::InvalidRule,
                message,
                path: Some(format!("rules.{}", entry.path)),
            })?;
            set.insert_shared(entry.path.clone(), rule);
        }
        Ok(Validator::new(self.logic, set))
    }
}
