//! The [`Rule`] interface and the built-in rule catalogue.
//!
//! A rule is a single-value predicate: it receives whatever value a key path
//! reached and answers pass (`Ok(true)`), fail (`Ok(false)`) or cannot
//! evaluate (`Err`). Rules never mutate the value and must be reentrant, since
//! one rule set may be shared by concurrent validations.
//!
//! Format rules fail on non-string input. Numeric and length rules instead
//! return a `type_mismatch` error when the value has the wrong shape, so that
//! a misapplied rule aborts strict validation rather than silently failing.

use crate::enums::ValueKind;
use crate::error::RuleError;
use crate::value::{Key, Value};
use regex::Regex;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::sync::LazyLock;

/// A single-value predicate.
pub trait Rule: Send + Sync {
    fn evaluate(&self, value: &Value) -> Result<bool, RuleError>;

    /// Human-readable reason reported when [`evaluate`](Rule::evaluate)
    /// returns `Ok(false)`.
    fn failure_reason(&self) -> Option<&str> {
        None
    }
}

impl<F> Rule for F
where
    F: Fn(&Value) -> Result<bool, RuleError> + Send + Sync,
{
    fn evaluate(&self, value: &Value) -> Result<bool, RuleError> {
        self(value)
    }
}

// ─── Reasons ────────────────────────────────────────────────────────────────

/// A rule with a replaced failure reason. See [`with_reason`].
pub struct WithReason<R> {
    rule: R,
    reason: String,
}

/// Attaches `reason` to `rule`, replacing any reason it already reports.
pub fn with_reason<R: Rule>(rule: R, reason: impl Into<String>) -> WithReason<R> {
    WithReason {
        rule,
        reason: reason.into(),
    }
}

impl<R: Rule> Rule for WithReason<R> {
    fn evaluate(&self, value: &Value) -> Result<bool, RuleError> {
        self.rule.evaluate(value)
    }

    fn failure_reason(&self) -> Option<&str> {
        Some(&self.reason)
    }
}

// ─── Cached regexes ─────────────────────────────────────────────────────────

static ALPHA_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-zA-Z]+$").unwrap());

static ALPHA_DASH_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-z0-9_\-]+$").unwrap());

static ALPHA_NUMERIC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9]+$").unwrap());

static ALPHA_UNDERSCORE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_]+$").unwrap());

static BASE64_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[A-Za-z0-9+/]{4})*(?:[A-Za-z0-9+/]{2}==|[A-Za-z0-9+/]{3}=)?$").unwrap()
});

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(.+)@(.+)\.(.+)$").unwrap());

static INTEGER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^-?[0-9]+$").unwrap());

static NATURAL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]+$").unwrap());

static NATURAL_NON_ZERO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[1-9][0-9]*$").unwrap());

static URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://([^\s/:?#@]+@)?[^\s/:?#@]+(:[0-9]{1,5})?([/?#]\S*)?$").unwrap()
});

static UUID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9a-f]{8}-[0-9a-f]{4}-[1-5][0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}$")
        .unwrap()
});

// ─── Fixed checks ───────────────────────────────────────────────────────────

/// A built-in rule backed by a plain function. Never errors.
#[derive(Clone, Copy)]
pub struct Check {
    name: &'static str,
    reason: &'static str,
    check: fn(&Value) -> bool,
}

impl Check {
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl Rule for Check {
    fn evaluate(&self, value: &Value) -> Result<bool, RuleError> {
        Ok((self.check)(value))
    }

    fn failure_reason(&self) -> Option<&str> {
        Some(self.reason)
    }
}

impl std::fmt::Debug for Check {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Check").field("name", &self.name).finish()
    }
}

fn matches_str(value: &Value, re: &Regex) -> bool {
    value.as_str().is_some_and(|s| re.is_match(s))
}

/// `"yes"`, `"on"`, `"1"`, `true` or the integer 1. For terms-of-service style
/// acceptance fields.
pub fn accepted() -> Check {
    Check {
        name: "accepted",
        reason: "value must be yes, on, 1 or true",
        check: |v| match v.unboxed() {
            Value::String(s) => matches!(s.as_str(), "yes" | "on" | "1"),
            Value::Bool(b) => *b,
            Value::Int(n) => *n == 1,
            Value::UInt(n) => *n == 1,
            _ => false,
        },
    }
}

pub fn alpha() -> Check {
    Check {
        name: "alpha",
        reason: "value must contain only alphabetic characters",
        check: |v| matches_str(v, &ALPHA_RE),
    }
}

pub fn alpha_dash() -> Check {
    Check {
        name: "alpha_dash",
        reason: "value must contain only lower-case letters, digits, dashes and underscores",
        check: |v| matches_str(v, &ALPHA_DASH_RE),
    }
}

pub fn alpha_numeric() -> Check {
    Check {
        name: "alpha_numeric",
        reason: "value must contain only alpha-numeric characters",
        check: |v| matches_str(v, &ALPHA_NUMERIC_RE),
    }
}

pub fn alpha_underscore() -> Check {
    Check {
        name: "alpha_underscore",
        reason: "value must contain only alpha-numeric characters and underscores",
        check: |v| matches_str(v, &ALPHA_UNDERSCORE_RE),
    }
}

pub fn base64() -> Check {
    Check {
        name: "base64",
        reason: "value must be base64 encoded",
        check: |v| matches_str(v, &BASE64_RE),
    }
}

pub fn email() -> Check {
    Check {
        name: "email",
        reason: "value must be a valid e-mail address",
        check: |v| matches_str(v, &EMAIL_RE),
    }
}

/// Any integer value, or a string holding a decimal integer.
pub fn integer() -> Check {
    Check {
        name: "integer",
        reason: "value must be an integer",
        check: |v| match v.unboxed() {
            Value::Int(_) | Value::UInt(_) => true,
            Value::String(s) => INTEGER_RE.is_match(s),
            _ => false,
        },
    }
}

pub fn ipv4() -> Check {
    Check {
        name: "ipv4",
        reason: "value must be an IPv4 address",
        check: |v| v.as_str().is_some_and(|s| s.parse::<Ipv4Addr>().is_ok()),
    }
}

pub fn ipv6() -> Check {
    Check {
        name: "ipv6",
        reason: "value must be an IPv6 address",
        check: |v| v.as_str().is_some_and(|s| s.parse::<Ipv6Addr>().is_ok()),
    }
}

/// Card-number style digit string (12 to 19 digits) with a valid Luhn checksum.
pub fn luhn() -> Check {
    Check {
        name: "luhn",
        reason: "value must pass a Luhn checksum",
        check: |v| v.as_str().is_some_and(luhn_valid),
    }
}

fn luhn_valid(s: &str) -> bool {
    if !(12..=19).contains(&s.len()) || !s.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    let sum: u32 = s
        .bytes()
        .rev()
        .enumerate()
        .map(|(i, b)| {
            let d = u32::from(b - b'0');
            if i % 2 == 1 {
                let doubled = d * 2;
                if doubled > 9 { doubled - 9 } else { doubled }
            } else {
                d
            }
        })
        .sum();
    sum % 10 == 0
}

/// Integers `>= 0`, or strings of decimal digits.
pub fn natural() -> Check {
    Check {
        name: "natural",
        reason: "value must be a natural number (0 or greater)",
        check: |v| match v.unboxed() {
            Value::Int(n) => *n >= 0,
            Value::UInt(_) => true,
            Value::String(s) => NATURAL_RE.is_match(s),
            _ => false,
        },
    }
}

/// Integers `>= 1`, or strings of decimal digits without a leading zero.
pub fn natural_non_zero() -> Check {
    Check {
        name: "natural_non_zero",
        reason: "value must be a natural number of 1 or greater",
        check: |v| match v.unboxed() {
            Value::Int(n) => *n > 0,
            Value::UInt(n) => *n > 0,
            Value::String(s) => NATURAL_NON_ZERO_RE.is_match(s),
            _ => false,
        },
    }
}

pub fn url() -> Check {
    Check {
        name: "url",
        reason: "value must be an http or https URL",
        check: |v| matches_str(v, &URL_RE),
    }
}

pub fn uuid() -> Check {
    Check {
        name: "uuid",
        reason: "value must be a UUID",
        check: |v| matches_str(v, &UUID_RE),
    }
}

/// Anything but `Null` or an empty box.
pub fn required() -> Check {
    Check {
        name: "required",
        reason: "value is required",
        check: |v| !v.is_null(),
    }
}

/// Looks up a built-in [`Check`] by its snake_case name.
pub fn check_by_name(name: &str) -> Option<Check> {
    let check = match name {
        "accepted" => accepted(),
        "alpha" => alpha(),
        "alpha_dash" => alpha_dash(),
        "alpha_numeric" => alpha_numeric(),
        "alpha_underscore" => alpha_underscore(),
        "base64" => base64(),
        "email" => email(),
        "integer" => integer(),
        "ipv4" => ipv4(),
        "ipv6" => ipv6(),
        "luhn" => luhn(),
        "natural" => natural(),
        "natural_non_zero" => natural_non_zero(),
        "required" => required(),
        "url" => url(),
        "uuid" => uuid(),
        _ => return None,
    };
    Some(check)
}

// ─── Pattern ────────────────────────────────────────────────────────────────

/// String values matching a caller-supplied regular expression.
///
/// The expression is compiled once, when the rule is built.
#[derive(Clone, Debug)]
pub struct Pattern {
    regex: Regex,
    reason: String,
}

impl Pattern {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        let regex = Regex::new(pattern)?;
        Ok(Pattern {
            reason: format!("value must match /{}/", regex.as_str()),
            regex,
        })
    }
}

impl Rule for Pattern {
    fn evaluate(&self, value: &Value) -> Result<bool, RuleError> {
        Ok(matches_str(value, &self.regex))
    }

    fn failure_reason(&self) -> Option<&str> {
        Some(&self.reason)
    }
}

// ─── Numeric ────────────────────────────────────────────────────────────────

fn number(value: &Value) -> Result<f64, RuleError> {
    value.as_f64().ok_or_else(|| {
        RuleError::type_mismatch(format!(
            "expected a number, found {}",
            value.unboxed().kind()
        ))
    })
}

/// Numbers within `min..=max`.
#[derive(Clone, Debug)]
pub struct Between {
    min: f64,
    max: f64,
    reason: String,
}

impl Between {
    pub fn new(min: f64, max: f64) -> Self {
        Between {
            min,
            max,
            reason: format!("value must be between {} and {}", min, max),
        }
    }
}

impl Rule for Between {
    fn evaluate(&self, value: &Value) -> Result<bool, RuleError> {
        let n = number(value)?;
        Ok(n >= self.min && n <= self.max)
    }

    fn failure_reason(&self) -> Option<&str> {
        Some(&self.reason)
    }
}

/// Numbers `>= min`.
#[derive(Clone, Debug)]
pub struct Min {
    min: f64,
    reason: String,
}

impl Min {
    pub fn new(min: f64) -> Self {
        Min {
            min,
            reason: format!("value must be at least {}", min),
        }
    }
}

impl Rule for Min {
    fn evaluate(&self, value: &Value) -> Result<bool, RuleError> {
        Ok(number(value)? >= self.min)
    }

    fn failure_reason(&self) -> Option<&str> {
        Some(&self.reason)
    }
}

/// Numbers `<= max`.
#[derive(Clone, Debug)]
pub struct Max {
    max: f64,
    reason: String,
}

impl Max {
    pub fn new(max: f64) -> Self {
        Max {
            max,
            reason: format!("value must be at most {}", max),
        }
    }
}

impl Rule for Max {
    fn evaluate(&self, value: &Value) -> Result<bool, RuleError> {
        Ok(number(value)? <= self.max)
    }

    fn failure_reason(&self) -> Option<&str> {
        Some(&self.reason)
    }
}

// ─── Length ─────────────────────────────────────────────────────────────────

fn length(value: &Value) -> Result<usize, RuleError> {
    value.len().ok_or_else(|| {
        RuleError::type_mismatch(format!(
            "length is undefined for {} values",
            value.unboxed().kind()
        ))
    })
}

/// Bounds on the length of a string (in chars) or container.
#[derive(Clone, Debug)]
pub struct Length {
    min: Option<usize>,
    max: Option<usize>,
    reason: String,
}

impl Length {
    pub fn min(min: usize) -> Self {
        Length {
            min: Some(min),
            max: None,
            reason: format!("length must be at least {}", min),
        }
    }

    pub fn max(max: usize) -> Self {
        Length {
            min: None,
            max: Some(max),
            reason: format!("length must be at most {}", max),
        }
    }

    pub fn exact(len: usize) -> Self {
        Length {
            min: Some(len),
            max: Some(len),
            reason: format!("length must be exactly {}", len),
        }
    }

    pub fn not_empty() -> Self {
        Length {
            min: Some(1),
            max: None,
            reason: "value must not be empty".to_string(),
        }
    }
}

impl Rule for Length {
    fn evaluate(&self, value: &Value) -> Result<bool, RuleError> {
        let len = length(value)?;
        Ok(self.min.is_none_or(|min| len >= min) && self.max.is_none_or(|max| len <= max))
    }

    fn failure_reason(&self) -> Option<&str> {
        Some(&self.reason)
    }
}

// ─── Kind and equality ──────────────────────────────────────────────────────

/// Values of the given runtime kind. Boxes match both `Boxed` and the kind
/// of their content.
#[derive(Clone, Debug)]
pub struct OfKind {
    kind: ValueKind,
    reason: String,
}

impl OfKind {
    pub fn new(kind: ValueKind) -> Self {
        OfKind {
            kind,
            reason: format!("value must be a {}", kind),
        }
    }
}

impl Rule for OfKind {
    fn evaluate(&self, value: &Value) -> Result<bool, RuleError> {
        Ok(value.kind() == self.kind || value.unboxed().kind() == self.kind)
    }

    fn failure_reason(&self) -> Option<&str> {
        Some(&self.reason)
    }
}

/// Values deeply equal to any of the expected values.
///
/// Integers and floats compare numerically (`42 == 42.0`), map entry order is
/// irrelevant, sequences compare element-wise.
#[derive(Clone, Debug)]
pub struct OneOf {
    expected: Vec<Value>,
    reason: String,
}

impl OneOf {
    pub fn new(expected: Vec<Value>) -> Self {
        let reason = if expected.len() == 1 {
            "value does not equal the expected value".to_string()
        } else {
            format!("value must be one of {} allowed values", expected.len())
        };
        OneOf { expected, reason }
    }

    pub fn equals(expected: impl Into<Value>) -> Self {
        OneOf::new(vec![expected.into()])
    }
}

impl Rule for OneOf {
    fn evaluate(&self, value: &Value) -> Result<bool, RuleError> {
        Ok(self.expected.iter().any(|e| values_deep_equal(value, e)))
    }

    fn failure_reason(&self) -> Option<&str> {
        Some(&self.reason)
    }
}

/// Deep equality with numeric cross-type comparison and box transparency.
pub fn values_deep_equal(a: &Value, b: &Value) -> bool {
    let (a, b) = (a.unboxed(), b.unboxed());
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::String(a), Value::String(b)) => a == b,
        (Value::Duration(a), Value::Duration(b)) => a == b,
        (Value::Int(_) | Value::UInt(_), Value::Int(_) | Value::UInt(_)) => {
            a.as_i64() == b.as_i64() && a.as_u64() == b.as_u64()
        }
        (
            Value::Int(_) | Value::UInt(_) | Value::Float(_),
            Value::Int(_) | Value::UInt(_) | Value::Float(_),
        ) => a.as_f64() == b.as_f64(),
        (Value::Sequence(a), Value::Sequence(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| values_deep_equal(x, y))
        }
        (Value::Map(a), Value::Map(b)) => {
            a.len() == b.len()
                && a.iter().all(|(key, x)| {
                    find_entry(b, key).is_some_and(|y| values_deep_equal(x, y))
                })
        }
        (Value::Record(a), Value::Record(b)) => {
            a.fields.len() == b.fields.len()
                && a.fields
                    .iter()
                    .all(|(name, x)| b.get(name).is_some_and(|y| values_deep_equal(x, y)))
        }
        _ => false,
    }
}

fn find_entry<'a>(entries: &'a [(Key, Value)], key: &Key) -> Option<&'a Value> {
    entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
}

// ─── Expression (CEL) ───────────────────────────────────────────────────────

/// A CEL expression evaluated with the checked value bound as `value`.
///
/// The expression is compiled once, when the rule is built. It must return a
/// boolean; any other result is a `type_mismatch` error. References to
/// missing map keys or fields evaluate to a failure, not an error.
///
/// Durations are exposed to CEL as float seconds and map keys as strings.
#[cfg(feature = "cel-eval")]
pub struct Expression {
    program: cel::Program,
    reason: String,
}

#[cfg(feature = "cel-eval")]
impl Expression {
    pub fn new(source: &str) -> Result<Self, RuleError> {
        let program = cel::Program::compile(source).map_err(|e| {
            RuleError::new(
                crate::error::RuleErrorKind::CelError,
                format!("CEL compile error: {}", e),
            )
        })?;
        Ok(Expression {
            program,
            reason: format!("value must satisfy `{}`", source),
        })
    }
}

#[cfg(feature = "cel-eval")]
impl Rule for Expression {
    fn evaluate(&self, value: &Value) -> Result<bool, RuleError> {
        let mut ctx = cel::Context::default();
        ctx.add_variable_from_value("value", value_to_cel(value));

        match self.program.execute(&ctx) {
            Ok(cel::Value::Bool(b)) => Ok(b),
            Ok(other) => Err(RuleError::type_mismatch(format!(
                "CEL expression returned non-boolean result: {:?}",
                other
            ))),
            Err(cel::ExecutionError::NoSuchKey(_)) => Ok(false),
            Err(cel::ExecutionError::UndeclaredReference(_)) => Ok(false),
            Err(e) => Err(RuleError::new(
                crate::error::RuleErrorKind::CelError,
                format!("CEL execution error: {}", e),
            )),
        }
    }

    fn failure_reason(&self) -> Option<&str> {
        Some(&self.reason)
    }
}

#[cfg(feature = "cel-eval")]
fn value_to_cel(value: &Value) -> cel::Value {
    use std::collections::HashMap;
    use std::sync::Arc;

    match value.unboxed() {
        Value::Null | Value::Boxed(_) => cel::Value::Null,
        Value::Bool(b) => cel::Value::Bool(*b),
        Value::Int(n) => cel::Value::Int(*n),
        Value::UInt(n) => cel::Value::UInt(*n),
        Value::Float(n) => cel::Value::Float(*n),
        Value::String(s) => cel::Value::String(Arc::new(s.clone())),
        Value::Duration(d) => cel::Value::Float(d.as_secs_f64()),
        Value::Sequence(items) => {
            cel::Value::List(Arc::new(items.iter().map(value_to_cel).collect()))
        }
        Value::Map(entries) => {
            let map: HashMap<String, cel::Value> = entries
                .iter()
                .map(|(k, v)| (k.to_string(), value_to_cel(v)))
                .collect();
            map.into()
        }
        Value::Record(record) => {
            let map: HashMap<String, cel::Value> = record
                .fields
                .iter()
                .map(|(k, v)| (k.clone(), value_to_cel(v)))
                .collect();
            map.into()
        }
    }
}
