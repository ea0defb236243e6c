//! Extraction outcome that remembers whether a value was read or assumed

use serde::{Deserialize, Serialize};

/// A value read from a spec field, or a documented fallback used because the
/// field was missing or unparseable.
///
/// Callers decide what a fallback means: "assume compatible" or "flag for
/// review". The marker keeps that decision visible instead of folding it into
/// the number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", content = "value", rename_all = "lowercase")]
pub enum Extracted<T> {
    Parsed(T),
    Defaulted(T),
}

impl<T: Copy> Extracted<T> {
    pub fn value(&self) -> T {
        match self {
            Extracted::Parsed(v) | Extracted::Defaulted(v) => *v,
        }
    }

    pub fn is_defaulted(&self) -> bool {
        matches!(self, Extracted::Defaulted(_))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Extracted<U> {
        match self {
            Extracted::Parsed(v) => Extracted::Parsed(f(v)),
            Extracted::Defaulted(v) => Extracted::Defaulted(f(v)),
        }
    }
}
