//! Update strategies.
//!
//! An [`UpdateStrategy`] is a pure function from the current cached value
//! and the item returned by an operation to the patched value. The current
//! value is classified once into a [`Shape`] and each intent handles each
//! shape explicitly:
//!
//! | intent | collection | single item | scalar / null |
//! |---|---|---|---|
//! | ADD | drop same identity, append | replace | replace |
//! | UPDATE | replace same identity wholesale | merge known fields | unchanged |
//! | REMOVE | drop same identity | `None` (null) | unchanged |
//! | AUTO | unchanged | unchanged | unchanged |
//!
//! Identity values compare with strict JSON equality (`1` never equals
//! `"1"`). An element without the identity field never matches, and neither
//! does anything when the new item lacks it.

use serde_json::{Map, Value};

use crate::config::TYPENAME_FIELD;
use crate::types::Intent;

/// The current value at the patch location, classified once.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape<'a> {
    Collection(&'a [Value]),
    SingleItem(&'a Map<String, Value>),
    Scalar(&'a Value),
}

impl<'a> Shape<'a> {
    pub fn of(value: &'a Value) -> Self {
        match value {
            Value::Array(items) => Self::Collection(items),
            Value::Object(fields) => Self::SingleItem(fields),
            other => Self::Scalar(other),
        }
    }

    /// Owned copy of the classified value.
    pub fn to_value(self) -> Value {
        match self {
            Self::Collection(items) => Value::Array(items.to_vec()),
            Self::SingleItem(fields) => Value::Object(fields.clone()),
            Self::Scalar(value) => value.clone(),
        }
    }
}

/// A resolved intent bound to an identity field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateStrategy {
    intent: Intent,
    identity_field: String,
}

impl UpdateStrategy {
    pub fn resolve(intent: Intent, identity_field: impl Into<String>) -> Self {
        Self {
            intent,
            identity_field: identity_field.into(),
        }
    }

    pub fn intent(&self) -> Intent {
        self.intent
    }

    pub fn identity_field(&self) -> &str {
        &self.identity_field
    }

    /// Compute the patched value.
    ///
    /// A `None` or `null` new item counts as absent: collections come back
    /// unchanged and single items are left as they are (except REMOVE,
    /// which clears a single item regardless). `None` in the return value
    /// means the location becomes `null`.
    pub fn apply(&self, current: Shape<'_>, new_item: Option<&Value>) -> Option<Value> {
        let new_item = new_item.filter(|item| !item.is_null());

        let patched = match (self.intent, current) {
            (Intent::Auto, current) => current.to_value(),

            (Intent::Add, Shape::Collection(items)) => match new_item {
                Some(item) => {
                    let mut next = self.without_identity_of(items, item);
                    next.push(item.clone());
                    Value::Array(next)
                }
                None => Value::Array(items.to_vec()),
            },
            (Intent::Add, current) => new_item.cloned().unwrap_or_else(|| current.to_value()),

            (Intent::Update, Shape::Collection(items)) => match new_item {
                Some(item) => Value::Array(
                    items
                        .iter()
                        .map(|element| {
                            if self.same_identity(element, item) {
                                item.clone()
                            } else {
                                element.clone()
                            }
                        })
                        .collect(),
                ),
                None => Value::Array(items.to_vec()),
            },
            (Intent::Update, Shape::SingleItem(fields)) => match new_item {
                Some(Value::Object(patch)) => Value::Object(merge_known_fields(fields, patch)),
                _ => Value::Object(fields.clone()),
            },
            (Intent::Update, Shape::Scalar(value)) => value.clone(),

            (Intent::Remove, Shape::Collection(items)) => match new_item {
                Some(item) => Value::Array(self.without_identity_of(items, item)),
                None => Value::Array(items.to_vec()),
            },
            (Intent::Remove, Shape::SingleItem(_)) => return None,
            (Intent::Remove, Shape::Scalar(value)) => value.clone(),
        };

        Some(patched)
    }

    fn identity<'v>(&self, item: &'v Value) -> Option<&'v Value> {
        item.get(&self.identity_field)
    }

    fn same_identity(&self, element: &Value, item: &Value) -> bool {
        match (self.identity(element), self.identity(item)) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    fn without_identity_of(&self, items: &[Value], item: &Value) -> Vec<Value> {
        items
            .iter()
            .filter(|element| !self.same_identity(element, item))
            .cloned()
            .collect()
    }
}

/// Overwrite each of `current`'s fields (bar the type discriminator) with
/// `patch`'s value when `patch` has that key. Keys only in `patch` are
/// dropped.
fn merge_known_fields(current: &Map<String, Value>, patch: &Map<String, Value>) -> Map<String, Value> {
    current
        .iter()
        .map(|(key, value)| {
            let merged = match patch.get(key) {
                Some(new_value) if key != TYPENAME_FIELD => new_value.clone(),
                _ => value.clone(),
            };
            (key.clone(), merged)
        })
        .collect()
}
