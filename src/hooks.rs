//! Completion-callback injection for mutation/subscription hooks.
//!
//! UI bindings run a completion callback with the cache and the operation
//! result once a mutation or subscription delivers data. [`with_cache_update`]
//! fills that slot with a call to [`apply_patch`] built from the options'
//! recipe. A callback the caller already supplied is kept as is; the
//! injected one is never layered on top of it.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::Result;
use crate::cache::QueryCache;
use crate::patch::apply_patch;
use crate::types::UpdateRecipe;

/// Runs when an operation completes: `(cache, operation result payload)`.
pub type CompletionCallback = Arc<dyn Fn(&dyn QueryCache, &Value) -> Result<()> + Send + Sync>;

/// Hook options carrying the update recipe.
#[derive(Clone, Default)]
pub struct HookOptions {
    /// What to patch when the operation completes.
    pub recipe: Option<UpdateRecipe>,
    /// Completion callback, caller-supplied or injected.
    pub on_completed: Option<CompletionCallback>,
}

impl HookOptions {
    pub fn new(recipe: UpdateRecipe) -> Self {
        Self {
            recipe: Some(recipe),
            on_completed: None,
        }
    }

    pub fn on_completed<F>(mut self, callback: F) -> Self
    where
        F: Fn(&dyn QueryCache, &Value) -> Result<()> + Send + Sync + 'static,
    {
        self.on_completed = Some(Arc::new(callback));
        self
    }

    /// Invoke the completion callback, if any.
    pub fn complete(&self, cache: &dyn QueryCache, payload: &Value) -> Result<()> {
        match &self.on_completed {
            Some(callback) => callback(cache, payload),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for HookOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookOptions")
            .field("recipe", &self.recipe)
            .field("on_completed", &self.on_completed.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

/// Inject a cache-patching completion callback into `options`.
///
/// Returns `options` unchanged when it already has a callback or carries no
/// recipe.
pub fn with_cache_update(mut options: HookOptions) -> HookOptions {
    if options.on_completed.is_some() {
        return options;
    }
    let Some(recipe) = options.recipe.clone() else {
        return options;
    };

    options.on_completed = Some(Arc::new(move |cache: &dyn QueryCache, payload: &Value| {
        apply_patch(cache, payload, &recipe).map(|_| ())
    }));
    options
}
