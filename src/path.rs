//! Path utilities for cached query results.
//!
//! Cached results have no fixed shape: the collection a mutation affects may
//! be the queried field itself (`{ posts: [...] }`) or sit anywhere below it
//! (`{ posts: { featured: [...], total: 10 } }`). [`find_array_path`] locates
//! it; [`get_value_by_path`] and [`set_value_by_path`] read and write there.

use serde_json::{Map, Value};

use crate::types::{ArrayLocation, PathSegment, ValuePath};
use crate::{GqlPatchError, Result};

/// Locate the first array inside `root`.
///
/// Depth-first, pre-order over object keys in enumeration order: the first
/// key holding an array wins, and a key holding an object is searched before
/// its next sibling. Arrays are never descended into.
pub fn find_array_path(root: &Value) -> ArrayLocation {
    match root {
        Value::Array(_) => ArrayLocation::Root,
        Value::Object(map) => {
            let mut path = ValuePath::new();
            if search_object(map, &mut path) {
                ArrayLocation::Nested(path)
            } else {
                ArrayLocation::NotFound
            }
        }
        _ => ArrayLocation::NotFound,
    }
}

fn search_object(map: &Map<String, Value>, path: &mut ValuePath) -> bool {
    for (key, value) in map {
        match value {
            Value::Array(_) => {
                path.push(key.as_str());
                return true;
            }
            Value::Object(nested) => {
                path.push(key.as_str());
                if search_object(nested, path) {
                    return true;
                }
                path.pop();
            }
            _ => {}
        }
    }
    false
}

/// Read the value at `path`. An empty path yields `value` itself.
pub fn get_value_by_path<'a>(value: &'a Value, path: &ValuePath) -> Option<&'a Value> {
    path.segments()
        .iter()
        .try_fold(value, |current, segment| step(current, segment))
}

fn step<'a>(value: &'a Value, segment: &PathSegment) -> Option<&'a Value> {
    match (value, segment) {
        (Value::Object(map), PathSegment::Key(key)) => map.get(key),
        (Value::Array(items), PathSegment::Index(index)) => items.get(*index),
        _ => None,
    }
}

fn step_mut<'a>(value: &'a mut Value, segment: &PathSegment) -> Option<&'a mut Value> {
    match (value, segment) {
        (Value::Object(map), PathSegment::Key(key)) => map.get_mut(key),
        (Value::Array(items), PathSegment::Index(index)) => items.get_mut(*index),
        _ => None,
    }
}

/// Write `new_value` at `path` inside `target`, mutating `target` in place.
///
/// Only ever called on a draft copy. An empty path replaces `target`
/// wholesale. Every container along the path must already exist; the last
/// segment may name a new object key.
pub fn set_value_by_path(target: &mut Value, path: &ValuePath, new_value: Value) -> Result<()> {
    let Some((last, parents)) = path.split_last() else {
        *target = new_value;
        return Ok(());
    };

    let mut container = target;
    for segment in parents {
        container = step_mut(container, segment)
            .ok_or_else(|| GqlPatchError::InvalidPath(format!("'{path}' has no '{segment}'")))?;
    }

    match (container, last) {
        (Value::Object(map), PathSegment::Key(key)) => {
            map.insert(key.clone(), new_value);
            Ok(())
        }
        (Value::Array(items), PathSegment::Index(index)) if *index < items.len() => {
            items[*index] = new_value;
            Ok(())
        }
        _ => Err(GqlPatchError::InvalidPath(format!(
            "cannot write '{last}' at '{path}'"
        ))),
    }
}

/// Project an object onto `keys`, skipping keys it does not have.
///
/// Non-object input yields `null`.
pub fn pick(value: &Value, keys: &[&str]) -> Value {
    let Value::Object(map) = value else {
        return Value::Null;
    };
    let picked: Map<String, Value> = keys
        .iter()
        .filter_map(|key| map.get(*key).map(|v| ((*key).to_string(), v.clone())))
        .collect();
    Value::Object(picked)
}
