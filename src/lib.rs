//! Key-path validation of dynamic, nested values.
//!
//! Rules are attached to dotted paths. A path walks records, maps and
//! sequences, and may fan out over sequences with the `all` and `any`
//! quantifiers, nested as deeply as the data is:
//!
//! ```text
//! split_path(path) → build_tree(segments, value) → evaluate_tree(tree, rule)
//!        └─ per entry of a RuleSet, combined with AND (validate_all)
//!                                          or OR  (validate_any)
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use checkit::rules::{self, Between};
//! use checkit::{RuleSet, Value, validate_all};
//! use serde_json::json;
//!
//! let order: Value = json!({
//!     "customer": { "email": "ada@example.com" },
//!     "lines": [
//!         { "sku": "A-1", "qty": 2 },
//!         { "sku": "B-7", "qty": 1 }
//!     ]
//! })
//! .into();
//!
//! let rules = RuleSet::new()
//!     .rule("customer.email", rules::email())
//!     .rule("lines.all.qty", Between::new(1.0, 99.0))
//!     .rule("lines.any.sku", rules::Pattern::new("^B-").unwrap());
//!
//! assert_eq!(validate_all(&order, &rules), Ok(true));
//! ```
//!
//! # Path segments
//!
//! | Segment      | Meaning |
//! |--------------|---------|
//! | `all`        | every element of a sequence must pass the rest of the path |
//! | `any`        | at least one element must pass the rest of the path |
//! | `first`      | element 0 of a sequence |
//! | `last`       | last element of a sequence |
//! | `0`, `1`, …  | sequence index, or integer map key |
//! | anything else| map key or record field |
//!
//! A segment that does not apply to the value it meets ends the path early.
//! What happens then is set by [`MissingPolicy`]: by default the rule sees the
//! last value that was reached.
//!
//! # Feature Flags
//!
//! | Feature    | Default | Description |
//! |------------|---------|-------------|
//! | `cel-eval` | yes     | CEL expression rules via the [`cel`] crate. Enables [`rules::Expression`]. |

pub mod convert;
pub mod enums;
pub mod error;
pub mod parse;
pub mod path;
pub mod rules;
pub mod tree;
pub mod types;
pub mod validate;
pub mod value;

pub use enums::*;
pub use error::*;
pub use types::*;

// Re-export entry points and core types at the crate root for convenience.
pub use convert::to_value;
pub use parse::parse;
pub use rules::Rule;
pub use validate::{RuleSet, Validator, validate_all, validate_any};
pub use value::{Key, Record, Value};

/// Convenience entry point composing parse → build.
///
/// # Errors
///
/// Returns the first [`ParseError`] from parsing the document or from
/// building one of its rules.
///
/// # Example
///
/// ```rust
/// let yaml = r#"
/// logic: all
/// missing: fail
/// rules:
///   name: { max_length: 8 }
///   tags.all: alpha
///   scores.any: { min: 90 }
/// "#;
///
/// let validator = checkit::load(yaml).expect("valid rule document");
/// let input: checkit::Value = serde_json::json!({
///     "name": "ada",
///     "tags": ["math", "engines"],
///     "scores": [71, 95]
/// })
/// .into();
///
/// assert_eq!(validator.validate(&input), Ok(true));
/// ```
pub fn load(input: &str) -> Result<Validator, ParseError> {
    parse::parse(input)?.build()
}
