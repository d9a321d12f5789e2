//! Name-based intent classification.
//!
//! Mutation and subscription names follow verb-first conventions
//! (`createPost`, `deleteComment`, `onUpdateUser`). The classifier maps a
//! name to an [`Intent`] with a plain prefix test against the configured
//! lists.
//!
//! Categories are tested in a fixed order: ADD, then REMOVE, then UPDATE.
//! The first category with a matching prefix wins. A category matches when
//! the lower-cased name starts with one of its prefixes, or with `"on"`
//! followed by one (subscription names).
//!
//! The test is on the raw string with no word boundary, so with the default
//! lists `addressChanged` classifies as ADD. Callers relying on the
//! defaults should name operations accordingly or pass an explicit intent.

use crate::config::PatchConfig;
use crate::types::Intent;

const SUBSCRIPTION_PREFIX: &str = "on";

/// Category order; the first match wins.
const PRECEDENCE: [Intent; 3] = [Intent::Add, Intent::Remove, Intent::Update];

/// Classify `operation_name` against `config`'s prefix lists.
///
/// Returns [`Intent::Auto`] when no prefix matches.
pub fn classify(operation_name: &str, config: &PatchConfig) -> Intent {
    let name = operation_name.to_lowercase();
    PRECEDENCE
        .into_iter()
        .find(|intent| matches_any(&name, config.prefixes(*intent)))
        .unwrap_or(Intent::Auto)
}

fn matches_any(name: &str, prefixes: &[String]) -> bool {
    let subscription = name.strip_prefix(SUBSCRIPTION_PREFIX);
    prefixes.iter().any(|prefix| {
        name.starts_with(prefix.as_str())
            || subscription.is_some_and(|rest| rest.starts_with(prefix.as_str()))
    })
}
