//! Query documents and cache targets.
//!
//! The patcher never interprets a GraphQL document beyond one fact: the name
//! of the first field selected by its first definition. That name is the key
//! under which the cached result exposes the data being patched (e.g. `posts`
//! for `query { posts { id title } }`).

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::{GqlPatchError, Result};

/// Variable bag sent alongside a query.
pub type Variables = serde_json::Map<String, Value>;

/// An opaque query document plus its root field name.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct QueryDocument {
    source: Arc<str>,
    root_field: String,
}

impl QueryDocument {
    /// Scan `source` for the first selection of its first definition.
    ///
    /// Aliased selections (`latest: posts`) resolve to the field name.
    /// Returns [`GqlPatchError::InvalidDocument`] when no field selection
    /// can be found.
    pub fn parse(source: impl Into<Arc<str>>) -> Result<Self> {
        let source = source.into();
        let root_field = root_field_name(&source)?;
        Ok(Self { source, root_field })
    }

    /// Build a document whose root field is already known.
    pub fn with_root_field(source: impl Into<Arc<str>>, root_field: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            root_field: root_field.into(),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn root_field(&self) -> &str {
        &self.root_field
    }
}

impl fmt::Debug for QueryDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryDocument")
            .field("root_field", &self.root_field)
            .finish_non_exhaustive()
    }
}

/// A query document together with the variables it was read with.
///
/// The cache keys entries on both, so the same document with different
/// variables is a different target.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryTarget {
    pub document: QueryDocument,
    pub variables: Variables,
}

impl QueryTarget {
    /// Target `document` with an empty variable bag.
    pub fn new(document: QueryDocument) -> Self {
        Self {
            document,
            variables: Variables::new(),
        }
    }

    /// Replace the whole variable bag.
    pub fn variables(mut self, variables: Variables) -> Self {
        self.variables = variables;
        self
    }

    /// Set a single variable.
    pub fn variable(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.variables.insert(name.into(), value.into());
        self
    }

    pub fn root_field(&self) -> &str {
        self.document.root_field()
    }
}

impl From<QueryDocument> for QueryTarget {
    fn from(document: QueryDocument) -> Self {
        Self::new(document)
    }
}

/// Find the first field selected by the first definition in `source`.
fn root_field_name(source: &str) -> Result<String> {
    let mut scanner = Scanner::new(source);

    // Skip the operation header (`query Name($v: T = {..}) @dir`) up to the
    // opening brace of the selection set. Braces inside parentheses belong
    // to object literals, not selection sets.
    let mut paren_depth = 0usize;
    loop {
        match scanner.next_significant() {
            Some('(') => paren_depth += 1,
            Some(')') => paren_depth = paren_depth.saturating_sub(1),
            Some('{') if paren_depth == 0 => break,
            Some(_) => {}
            None => {
                return Err(GqlPatchError::InvalidDocument(
                    "no selection set found".to_string(),
                ));
            }
        }
    }

    let first = scanner.name().ok_or_else(|| {
        GqlPatchError::InvalidDocument("first selection is not a field".to_string())
    })?;

    if scanner.peek_significant() == Some(':') {
        scanner.next_significant();
        return scanner.name().ok_or_else(|| {
            GqlPatchError::InvalidDocument(format!("alias '{first}' is not followed by a field"))
        });
    }

    Ok(first)
}

/// Character scanner that skips GraphQL ignored tokens and string literals.
struct Scanner<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
}

impl<'a> Scanner<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            chars: source.chars().peekable(),
        }
    }

    fn skip_ignored(&mut self) {
        while let Some(&c) = self.chars.peek() {
            match c {
                c if c.is_whitespace() || c == ',' || c == '\u{feff}' => {
                    self.chars.next();
                }
                '#' => {
                    for c in self.chars.by_ref() {
                        if c == '\n' || c == '\r' {
                            break;
                        }
                    }
                }
                _ => break,
            }
        }
    }

    fn peek_significant(&mut self) -> Option<char> {
        self.skip_ignored();
        self.chars.peek().copied()
    }

    /// Next significant character; string literals are consumed whole and
    /// reported as a single `"`.
    fn next_significant(&mut self) -> Option<char> {
        self.skip_ignored();
        let c = self.chars.next()?;
        if c == '"' {
            self.skip_string();
        }
        Some(c)
    }

    fn skip_string(&mut self) {
        // Block string: """ ... """
        let mut lookahead = self.chars.clone();
        if lookahead.next() == Some('"') && lookahead.next() == Some('"') {
            self.chars.next();
            self.chars.next();
            let mut quotes = 0;
            while let Some(c) = self.chars.next() {
                match c {
                    '\\' if quotes == 0 => {
                        self.chars.next();
                    }
                    '"' => {
                        quotes += 1;
                        if quotes == 3 {
                            return;
                        }
                    }
                    _ => quotes = 0,
                }
            }
            return;
        }

        while let Some(c) = self.chars.next() {
            match c {
                '\\' => {
                    self.chars.next();
                }
                '"' | '\n' => return,
                _ => {}
            }
        }
    }

    fn name(&mut self) -> Option<String> {
        self.skip_ignored();
        let first = *self.chars.peek()?;
        if !(first == '_' || first.is_ascii_alphabetic()) {
            return None;
        }
        let mut name = String::new();
        while let Some(&c) = self.chars.peek() {
            if c == '_' || c.is_ascii_alphanumeric() {
                name.push(c);
                self.chars.next();
            } else {
                break;
            }
        }
        Some(name)
    }
}
