//! Operation intent.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::GqlPatchError;

/// What a mutation or subscription did to the entity it returns.
///
/// `Auto` means "infer from the operation name". When classification finds
/// no matching prefix the intent stays `Auto` and the patch is a passthrough.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Intent {
    #[default]
    Auto,
    Add,
    Remove,
    Update,
}

impl Intent {
    /// Canonical upper-case name, also used as the `intent` metric label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "AUTO",
            Self::Add => "ADD",
            Self::Remove => "REMOVE",
            Self::Update => "UPDATE",
        }
    }

    /// Whether this intent still needs name-based classification.
    pub fn is_auto(&self) -> bool {
        matches!(self, Self::Auto)
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Intent {
    type Err = GqlPatchError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "AUTO" => Ok(Self::Auto),
            "ADD" => Ok(Self::Add),
            "REMOVE" => Ok(Self::Remove),
            "UPDATE" => Ok(Self::Update),
            _ => Err(GqlPatchError::Configuration(format!(
                "unknown intent '{s}' (expected AUTO, ADD, REMOVE or UPDATE)"
            ))),
        }
    }
}

impl Serialize for Intent {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Intent {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("add".parse::<Intent>().unwrap(), Intent::Add);
        assert_eq!("Remove".parse::<Intent>().unwrap(), Intent::Remove);
        assert_eq!("UPDATE".parse::<Intent>().unwrap(), Intent::Update);
        assert_eq!("auto".parse::<Intent>().unwrap(), Intent::Auto);
    }

    #[test]
    fn parse_rejects_unknown() {
        let err = "upsert".parse::<Intent>().unwrap_err();
        assert!(err.to_string().contains("upsert"));
    }

    #[test]
    fn serde_uses_upper_case_names() {
        let json = serde_json::to_string(&Intent::Remove).unwrap();
        assert_eq!(json, "\"REMOVE\"");
        let back: Intent = serde_json::from_str("\"update\"").unwrap();
        assert_eq!(back, Intent::Update);
    }
}
