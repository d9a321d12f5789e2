//! Update recipes: which cached query to patch, and how.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use super::document::{QueryDocument, QueryTarget};
use super::intent::Intent;

/// Maps an operation result payload to the item that gets applied.
///
/// Receives the whole payload (`{ "createPost": {...} }`), not just the
/// field value, so it can reach into nested response shapes.
pub type ItemMapper = Arc<dyn Fn(&Value) -> Value + Send + Sync>;

/// Everything the patcher needs to know besides the payload itself.
#[derive(Clone)]
pub struct UpdateRecipe {
    /// Cached query (and variables) to patch.
    pub target: QueryTarget,
    /// Explicit intent; `None` or [`Intent::Auto`] classify the operation name.
    pub intent: Option<Intent>,
    /// Identity field override for this recipe.
    pub identity_field: Option<String>,
    /// Payload-to-item mapping; defaults to the operation field's value.
    pub map_result: Option<ItemMapper>,
}

impl UpdateRecipe {
    pub fn new(target: impl Into<QueryTarget>) -> Self {
        Self {
            target: target.into(),
            intent: None,
            identity_field: None,
            map_result: None,
        }
    }

    pub fn intent(mut self, intent: Intent) -> Self {
        self.intent = Some(intent);
        self
    }

    pub fn identity_field(mut self, field: impl Into<String>) -> Self {
        self.identity_field = Some(field.into());
        self
    }

    pub fn map_result<F>(mut self, mapper: F) -> Self
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        self.map_result = Some(Arc::new(mapper));
        self
    }
}

impl From<QueryDocument> for UpdateRecipe {
    fn from(document: QueryDocument) -> Self {
        Self::new(document)
    }
}

impl From<QueryTarget> for UpdateRecipe {
    fn from(target: QueryTarget) -> Self {
        Self::new(target)
    }
}

impl fmt::Debug for UpdateRecipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpdateRecipe")
            .field("target", &self.target)
            .field("intent", &self.intent)
            .field("identity_field", &self.identity_field)
            .field("map_result", &self.map_result.as_ref().map(|_| "<fn>"))
            .finish()
    }
}
