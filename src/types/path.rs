//! Locations inside a cached query result.

use std::fmt;

/// One step into a JSON value: an object key or an array index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        Self::Key(key.to_string())
    }
}

impl From<String> for PathSegment {
    fn from(key: String) -> Self {
        Self::Key(key)
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => f.write_str(key),
            Self::Index(index) => write!(f, "[{index}]"),
        }
    }
}

/// An ordered sequence of segments from a root value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ValuePath(Vec<PathSegment>);

impl ValuePath {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a segment, returning the extended path.
    pub fn join(mut self, segment: impl Into<PathSegment>) -> Self {
        self.0.push(segment.into());
        self
    }

    pub fn push(&mut self, segment: impl Into<PathSegment>) {
        self.0.push(segment.into());
    }

    pub fn pop(&mut self) -> Option<PathSegment> {
        self.0.pop()
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Split into all-but-last and last segment.
    pub fn split_last(&self) -> Option<(&PathSegment, &[PathSegment])> {
        self.0.split_last()
    }
}

impl<S: Into<PathSegment>> FromIterator<S> for ValuePath {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for ValuePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for segment in &self.0 {
            match segment {
                PathSegment::Key(key) if first => f.write_str(key)?,
                PathSegment::Key(key) => write!(f, ".{key}")?,
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
            first = false;
        }
        Ok(())
    }
}

/// Result of searching a value for its first array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArrayLocation {
    /// The searched value is itself the array.
    Root,
    /// The first array lives at this path below the searched value.
    Nested(ValuePath),
    /// No array anywhere: the value is a single item (or a scalar).
    NotFound,
}

impl ArrayLocation {
    /// The nested path, if any.
    pub fn path(&self) -> Option<&ValuePath> {
        match self {
            Self::Nested(path) => Some(path),
            Self::Root | Self::NotFound => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_mixes_keys_and_indices() {
        let path: ValuePath = ValuePath::new().join("feed").join(2usize).join("comments");
        assert_eq!(path.to_string(), "feed[2].comments");
    }

    #[test]
    fn collect_from_keys() {
        let path: ValuePath = ["posts", "featured"].into_iter().collect();
        assert_eq!(path.len(), 2);
        assert_eq!(path.segments()[1], PathSegment::Key("featured".into()));
    }
}
