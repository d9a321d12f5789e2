//! Cache patch orchestration.
//!
//! One call runs one read-patch-write cycle:
//!
//! 1. take the operation field (`createPost`) and its value from the payload
//! 2. resolve the intent (explicit, or classified from the field name)
//! 3. map the payload to the item to apply
//! 4. read the target query from the cache
//! 5. find the collection under the query's own root field (`posts`)
//! 6. apply the [`UpdateStrategy`] and write a patched copy back
//!
//! Every stage before the write can end the cycle early with a
//! [`SkipReason`]. Skips are normal outcomes, not errors; in particular a
//! cache miss on read is absorbed. The only error a cycle returns is one
//! raised by the cache's `write_query`, passed through unchanged.
//!
//! The cached value is never modified in place: the patched result is
//! written into a clone of what was read.

use serde_json::Value;
use tracing::{debug, instrument, trace};

use crate::cache::{AsyncQueryCache, QueryCache};
use crate::classify::classify;
use crate::config::{PatchConfig, current_config};
use crate::path::{find_array_path, get_value_by_path, set_value_by_path};
use crate::strategy::{Shape, UpdateStrategy};
use crate::telemetry;
use crate::types::{ArrayLocation, Intent, UpdateRecipe, ValuePath};
use crate::Result;

/// Why a patch cycle stopped before writing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Payload was null, not an object, or an empty object.
    EmptyPayload,
    /// The operation field's value was falsy (null, false, 0, "").
    EmptyResult,
    /// The target query was never cached, or the cache failed to read it.
    CacheMiss,
    /// The cached result was null or an empty object.
    EmptyCacheEntry,
    /// The cached result has no value under the query's root field.
    FieldNotCached,
}

impl SkipReason {
    /// Label used in logs and the `reason` metric label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EmptyPayload => "empty_payload",
            Self::EmptyResult => "empty_result",
            Self::CacheMiss => "cache_miss",
            Self::EmptyCacheEntry => "empty_cache_entry",
            Self::FieldNotCached => "field_not_cached",
        }
    }
}

/// What a patch cycle did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchOutcome {
    /// A patched result was written back.
    Applied {
        /// Intent the strategy ran with.
        intent: Intent,
        /// Operation field name taken from the payload.
        field: String,
    },
    /// Nothing was written.
    Skipped(SkipReason),
}

impl PatchOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }
}

/// Runs patch cycles against a fixed [`PatchConfig`].
#[derive(Debug, Clone, Default)]
pub struct CachePatcher {
    config: PatchConfig,
}

/// Payload facts gathered before touching the cache.
struct Prepared {
    field: String,
    intent: Intent,
    item: Value,
}

impl CachePatcher {
    pub fn new(config: PatchConfig) -> Self {
        Self { config }
    }

    /// Patcher using a snapshot of the process-wide configuration.
    pub fn from_global() -> Self {
        Self::new(current_config())
    }

    pub fn config(&self) -> &PatchConfig {
        &self.config
    }

    /// Run one read-patch-write cycle against a synchronous cache.
    #[instrument(skip_all, fields(query = %recipe.target.root_field()))]
    pub fn apply<C>(&self, cache: &C, payload: &Value, recipe: &UpdateRecipe) -> Result<PatchOutcome>
    where
        C: QueryCache + ?Sized,
    {
        let prepared = match self.prepare(payload, recipe) {
            Ok(prepared) => prepared,
            Err(reason) => return Ok(skipped(reason)),
        };

        let cached = match QueryCache::read_query(cache, &recipe.target) {
            Ok(cached) => cached,
            Err(e) => {
                debug!(error = %e, "cached query unavailable");
                return Ok(skipped(SkipReason::CacheMiss));
            }
        };

        let draft = match self.patch_cached(&prepared, recipe, &cached)? {
            Ok(draft) => draft,
            Err(reason) => return Ok(skipped(reason)),
        };

        QueryCache::write_query(cache, &recipe.target, draft)?;
        Ok(applied(prepared))
    }

    /// Run one read-patch-write cycle against an asynchronous cache.
    ///
    /// Completes the whole cycle before returning; concurrent calls for the
    /// same query are not coordinated (last write wins).
    #[instrument(skip_all, fields(query = %recipe.target.root_field()))]
    pub async fn apply_async<C>(
        &self,
        cache: &C,
        payload: &Value,
        recipe: &UpdateRecipe,
    ) -> Result<PatchOutcome>
    where
        C: AsyncQueryCache + ?Sized,
    {
        let prepared = match self.prepare(payload, recipe) {
            Ok(prepared) => prepared,
            Err(reason) => return Ok(skipped(reason)),
        };

        let cached = match AsyncQueryCache::read_query(cache, &recipe.target).await {
            Ok(cached) => cached,
            Err(e) => {
                debug!(error = %e, "cached query unavailable");
                return Ok(skipped(SkipReason::CacheMiss));
            }
        };

        let draft = match self.patch_cached(&prepared, recipe, &cached)? {
            Ok(draft) => draft,
            Err(reason) => return Ok(skipped(reason)),
        };

        AsyncQueryCache::write_query(cache, &recipe.target, draft).await?;
        Ok(applied(prepared))
    }

    /// Pull the operation field, intent and item out of the payload.
    fn prepare(
        &self,
        payload: &Value,
        recipe: &UpdateRecipe,
    ) -> std::result::Result<Prepared, SkipReason> {
        let (field, value) = payload
            .as_object()
            .and_then(|fields| fields.iter().next())
            .ok_or(SkipReason::EmptyPayload)?;

        if is_falsy(value) {
            return Err(SkipReason::EmptyResult);
        }

        let intent = match recipe.intent {
            Some(intent) if !intent.is_auto() => intent,
            _ => classify(field, &self.config),
        };

        let item = match &recipe.map_result {
            Some(map) => map(payload),
            None => value.clone(),
        };

        Ok(Prepared {
            field: field.clone(),
            intent,
            item,
        })
    }

    /// Build the patched draft of `cached`.
    ///
    /// The outer `Result` carries path errors; the inner one a skip.
    fn patch_cached(
        &self,
        prepared: &Prepared,
        recipe: &UpdateRecipe,
        cached: &Value,
    ) -> Result<std::result::Result<Value, SkipReason>> {
        if is_empty_entry(cached) {
            return Ok(Err(SkipReason::EmptyCacheEntry));
        }

        let identity_field = recipe
            .identity_field
            .clone()
            .unwrap_or_else(|| self.config.identity_field_for(&prepared.item));

        let root_field = recipe.target.root_field();
        let Some(result) = cached.get(root_field) else {
            return Ok(Err(SkipReason::FieldNotCached));
        };

        let location = find_array_path(result);
        trace!(?location, "located patch target");

        let current = match &location {
            ArrayLocation::Nested(path) => get_value_by_path(result, path).unwrap_or(result),
            ArrayLocation::Root | ArrayLocation::NotFound => result,
        };

        let strategy = UpdateStrategy::resolve(prepared.intent, identity_field);
        let patched = strategy
            .apply(Shape::of(current), Some(&prepared.item))
            .unwrap_or(Value::Null);

        let mut target_path = ValuePath::new().join(root_field);
        if let Some(nested) = location.path() {
            for segment in nested.segments() {
                target_path.push(segment.clone());
            }
        }

        let mut draft = cached.clone();
        set_value_by_path(&mut draft, &target_path, patched)?;

        debug!(
            intent = %prepared.intent,
            field = %prepared.field,
            identity_field = strategy.identity_field(),
            path = %target_path,
            "patched cached query"
        );
        Ok(Ok(draft))
    }
}

/// Run one cycle with the process-wide configuration.
pub fn apply_patch<C>(cache: &C, payload: &Value, recipe: &UpdateRecipe) -> Result<PatchOutcome>
where
    C: QueryCache + ?Sized,
{
    CachePatcher::from_global().apply(cache, payload, recipe)
}

/// Async form of [`apply_patch`].
pub async fn apply_patch_async<C>(
    cache: &C,
    payload: &Value,
    recipe: &UpdateRecipe,
) -> Result<PatchOutcome>
where
    C: AsyncQueryCache + ?Sized,
{
    CachePatcher::from_global()
        .apply_async(cache, payload, recipe)
        .await
}

fn skipped(reason: SkipReason) -> PatchOutcome {
    debug!(reason = reason.as_str(), "patch skipped");
    metrics::counter!(telemetry::PATCHES_SKIPPED_TOTAL, "reason" => reason.as_str()).increment(1);
    PatchOutcome::Skipped(reason)
}

fn applied(prepared: Prepared) -> PatchOutcome {
    metrics::counter!(telemetry::PATCHES_TOTAL, "intent" => prepared.intent.as_str()).increment(1);
    PatchOutcome::Applied {
        intent: prepared.intent,
        field: prepared.field,
    }
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

fn is_empty_entry(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(fields) => fields.is_empty(),
        _ => false,
    }
}
