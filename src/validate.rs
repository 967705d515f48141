//! Rule sets and the two ways of combining their outcomes.
//!
//! A [`RuleSet`] maps path expressions to rules. Each entry is evaluated by
//! segmenting its path, building the evaluation tree over the input and
//! applying the rule through it. Entries combine with AND in
//! [`validate_all`] and with OR in [`validate_any`].

use crate::enums::{Logic, MissingPolicy, PathResult};
use crate::error::{RuleError, ValidationError};
use crate::rules::Rule;
use crate::tree::evaluate_path;
use crate::value::Value;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

// ─── RuleSet ────────────────────────────────────────────────────────────────

/// An insertion-ordered mapping from path expression to rule.
///
/// Inserting an existing path replaces its rule in place. Iteration, and
/// therefore evaluation, follows insertion order. A rule set is immutable
/// while it validates and can be shared across threads.
#[derive(Clone, Default)]
pub struct RuleSet {
    entries: Vec<(String, Arc<dyn Rule>)>,
    missing: MissingPolicy,
}

impl RuleSet {
    pub fn new() -> Self {
        RuleSet::default()
    }

    /// Builder form of [`insert`](RuleSet::insert).
    pub fn rule(mut self, path: impl Into<String>, rule: impl Rule + 'static) -> Self {
        self.insert(path, rule);
        self
    }

    /// Builder form of [`set_missing_policy`](RuleSet::set_missing_policy).
    pub fn missing(mut self, policy: MissingPolicy) -> Self {
        self.missing = policy;
        self
    }

    pub fn insert(&mut self, path: impl Into<String>, rule: impl Rule + 'static) {
        self.insert_shared(path, Arc::new(rule));
    }

    /// Inserts a rule that may also be used by other rule sets.
    pub fn insert_shared(&mut self, path: impl Into<String>, rule: Arc<dyn Rule>) {
        let path = path.into();
        match self.entries.iter_mut().find(|(p, _)| *p == path) {
            Some(entry) => entry.1 = rule,
            None => self.entries.push((path, rule)),
        }
    }

    pub fn set_missing_policy(&mut self, policy: MissingPolicy) {
        self.missing = policy;
    }

    pub fn missing_policy(&self) -> MissingPolicy {
        self.missing
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, path: &str) -> Option<&dyn Rule> {
        self.entries
            .iter()
            .find(|(p, _)| p == path)
            .map(|(_, rule)| rule.as_ref())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &dyn Rule)> {
        self.entries
            .iter()
            .map(|(path, rule)| (path.as_str(), rule.as_ref()))
    }

    fn evaluate_entry(
        &self,
        path: &str,
        rule: &dyn Rule,
        value: &Value,
    ) -> Result<bool, RuleError> {
        evaluate_path(path, value, rule, self.missing)
    }

    /// Every entry must pass.
    ///
    /// Stops at the first entry that fails (`Ok(false)`) or errors (`Err`,
    /// carrying the entry's path). An empty rule set passes.
    pub fn validate_all(&self, value: &Value) -> Result<bool, ValidationError> {
        debug!(entries = self.entries.len(), "validating all");
        for (path, rule) in &self.entries {
            match self.evaluate_entry(path, rule.as_ref(), value) {
                Ok(true) => {}
                Ok(false) => {
                    debug!(path = %path, "entry failed");
                    return Ok(false);
                }
                Err(e) => {
                    debug!(path = %path, error = %e, "entry could not be evaluated");
                    return Err(ValidationError::at(path, e));
                }
            }
        }
        Ok(true)
    }

    /// At least one entry must pass.
    ///
    /// Every entry is evaluated; entries that error count as not passing. An
    /// empty rule set fails. Never errors.
    pub fn validate_any(&self, value: &Value) -> bool {
        debug!(entries = self.entries.len(), "validating any");
        let mut passed = false;
        for (path, rule) in &self.entries {
            match self.evaluate_entry(path, rule.as_ref(), value) {
                Ok(result) => passed |= result,
                Err(e) => debug!(path = %path, error = %e, "ignoring entry error"),
            }
        }
        passed
    }

    /// Evaluates every entry without short-circuiting and reports each
    /// outcome with its failure reason or error message.
    pub fn check(&self, value: &Value) -> Report {
        let mut summary = Summary::default();
        let outcomes = self
            .entries
            .iter()
            .map(|(path, rule)| {
                let (result, message) = match self.evaluate_entry(path, rule.as_ref(), value) {
                    Ok(true) => {
                        summary.passed += 1;
                        (PathResult::Passed, None)
                    }
                    Ok(false) => {
                        summary.failed += 1;
                        (PathResult::Failed, rule.failure_reason().map(str::to_string))
                    }
                    Err(e) => {
                        summary.error += 1;
                        (PathResult::Error, Some(e.message))
                    }
                };
                PathOutcome {
                    path: path.clone(),
                    result,
                    message,
                }
            })
            .collect();

        Report { outcomes, summary }
    }
}

impl fmt::Debug for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleSet")
            .field("paths", &self.entries.iter().map(|(p, _)| p).collect::<Vec<_>>())
            .field("missing", &self.missing)
            .finish()
    }
}

/// Validates `value` against every entry of `rules` with AND semantics.
/// See [`RuleSet::validate_all`].
pub fn validate_all(value: &Value, rules: &RuleSet) -> Result<bool, ValidationError> {
    rules.validate_all(value)
}

/// Validates `value` against `rules` with OR semantics.
/// See [`RuleSet::validate_any`].
pub fn validate_any(value: &Value, rules: &RuleSet) -> bool {
    rules.validate_any(value)
}

// ─── Report ─────────────────────────────────────────────────────────────────

/// Outcome of one rule set entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PathOutcome {
    pub path: String,
    pub result: PathResult,
    /// Failure reason for `Failed`, error message for `Error`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub passed: usize,
    pub failed: usize,
    pub error: usize,
}

/// Per-entry outcomes of [`RuleSet::check`], in rule set order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Report {
    pub outcomes: Vec<PathOutcome>,
    pub summary: Summary,
}

impl Report {
    /// The verdict the report implies under `logic`.
    ///
    /// Matches [`validate_all`] / [`validate_any`], except that an error under
    /// `All` is a plain `false` here.
    pub fn passed(&self, logic: Logic) -> bool {
        match logic {
            Logic::All => self.summary.failed == 0 && self.summary.error == 0,
            Logic::Any => self.summary.passed > 0,
        }
    }

    /// Outcomes that did not pass.
    pub fn problems(&self) -> impl Iterator<Item = &PathOutcome> {
        self.outcomes
            .iter()
            .filter(|o| o.result != PathResult::Passed)
    }
}

// ─── Validator ──────────────────────────────────────────────────────────────

/// A rule set bundled with the logic that combines its entries.
#[derive(Clone, Debug, Default)]
pub struct Validator {
    pub logic: Logic,
    pub rules: RuleSet,
}

impl Validator {
    pub fn new(logic: Logic, rules: RuleSet) -> Self {
        Validator { logic, rules }
    }

    pub fn validate(&self, value: &Value) -> Result<bool, ValidationError> {
        match self.logic {
            Logic::All => self.rules.validate_all(value),
            Logic::Any => Ok(self.rules.validate_any(value)),
        }
    }

    pub fn check(&self, value: &Value) -> Report {
        self.rules.check(value)
    }
}
