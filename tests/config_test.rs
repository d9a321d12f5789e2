//! Tests for the process-wide configuration store.
//!
//! The store is global, so everything touching it lives in one test to keep
//! ordering deterministic.

use gqlpatch::{
    ConfigOverrides, InMemoryCache, Intent, PatchOutcome, QueryCache, QueryDocument,
    UpdateRecipe, apply_patch, classify, configure, current_config,
};
use serde_json::json;

#[test]
fn global_configuration_applies_to_later_calls() {
    let defaults = current_config();
    assert_eq!(defaults.identity_field, "id");
    assert_eq!(classify("archivePost", &defaults), Intent::Auto);

    configure(ConfigOverrides::new().remove_prefixes(["Archive", "delete"]));

    let config = current_config();
    assert_eq!(config.remove_prefixes, vec!["archive", "delete"]);
    // Untouched keys keep their defaults.
    assert_eq!(config.add_prefixes, defaults.add_prefixes);
    assert_eq!(classify("archivePost", &config), Intent::Remove);
    assert_eq!(classify("removePost", &config), Intent::Auto);

    configure(ConfigOverrides::new().identity_field("uuid"));
    let config = current_config();
    assert_eq!(config.identity_field, "uuid");
    assert_eq!(config.remove_prefixes, vec!["archive", "delete"]);

    // apply_patch picks up the global state.
    let recipe = UpdateRecipe::new(QueryDocument::parse("{ posts { uuid } }").unwrap());
    let cache = InMemoryCache::new();
    cache
        .write_query(&recipe.target, json!({"posts": [{"uuid": "a"}, {"uuid": "b"}]}))
        .unwrap();

    let outcome = apply_patch(&cache, &json!({"archivePost": {"uuid": "a"}}), &recipe).unwrap();

    assert_eq!(
        outcome,
        PatchOutcome::Applied {
            intent: Intent::Remove,
            field: "archivePost".into()
        }
    );
    assert_eq!(
        cache.read_query(&recipe.target).unwrap(),
        json!({"posts": [{"uuid": "b"}]})
    );
}
