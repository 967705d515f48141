use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::path::PathBuf;

pub fn fixtures_dir() -> PathBuf {
    std::env::var("CHECKIT_FIXTURES_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures"))
}

/// Load a fixture file as a list of cases.
pub fn load_cases<T: DeserializeOwned>(file: &str) -> Vec<T> {
    let path = fixtures_dir().join(file);
    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("cannot read {:?}: {}", path, e));
    serde_saphyr::from_str(&content).unwrap_or_else(|e| panic!("cannot parse {:?}: {}", path, e))
}

/// Expected outcome of an evaluation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expected {
    Pass,
    Fail,
    Error,
}

impl Expected {
    pub fn of<E>(result: &Result<bool, E>) -> Self {
        match result {
            Ok(true) => Expected::Pass,
            Ok(false) => Expected::Fail,
            Err(_) => Expected::Error,
        }
    }
}

/// Print the failures of a suite and panic if there were any.
pub fn report(suite: &str, passed: usize, failures: &[String]) {
    eprintln!("{}: {} passed, {} failed", suite, passed, failures.len());
    for failure in failures {
        eprintln!("  FAIL {}", failure);
    }
    assert!(failures.is_empty(), "{} had {} failures", suite, failures.len());
}
