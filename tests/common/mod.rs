//! Shared helpers for the integration tests.

use typed_record::Input;

/// Keyword-argument list from `(&str, Input)` pairs.
pub fn kw(pairs: Vec<(&str, Input)>) -> Vec<(String, Input)> {
    pairs
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect()
}

/// No keyword arguments.
pub fn no_kw() -> Vec<(String, Input)> {
    Vec::new()
}
