//! Tests for [`InMemoryCache`], the reference query result cache.

use std::time::Duration;

use gqlpatch::cache::{CacheConfig, InMemoryCache};
use gqlpatch::{QueryCache, QueryDocument, QueryTarget};
use serde_json::json;

fn posts_target() -> QueryTarget {
    QueryTarget::new(QueryDocument::with_root_field(
        "query Posts($first: Int) { posts(first: $first) { id } }",
        "posts",
    ))
}

#[test]
fn cache_config_defaults() {
    let config = CacheConfig::default();
    assert_eq!(config.max_entries, 10_000);
    assert_eq!(config.ttl, None);
}

#[test]
fn cache_config_builder() {
    let config = CacheConfig::new()
        .max_entries(50)
        .ttl(Duration::from_secs(30));
    assert_eq!(config.max_entries, 50);
    assert_eq!(config.ttl, Some(Duration::from_secs(30)));
}

#[test]
fn write_then_read_round_trip() {
    let cache = InMemoryCache::new();
    let data = json!({"posts": [{"id": 1, "title": "first"}], "meta": {"count": 1}});

    cache.write_query(&posts_target(), data.clone()).unwrap();
    assert_eq!(cache.read_query(&posts_target()).unwrap(), data);
}

#[test]
fn unprimed_query_is_a_miss() {
    let cache = InMemoryCache::new();
    let err = cache.read_query(&posts_target()).unwrap_err();
    assert!(err.is_cache_miss());
}

#[test]
fn variables_address_separate_entries() {
    let cache = InMemoryCache::new();
    let first_ten = posts_target().variable("first", 10);
    let first_five = posts_target().variable("first", 5);

    cache.write_query(&first_ten, json!({"posts": [1]})).unwrap();

    assert!(cache.contains(&first_ten));
    assert!(!cache.contains(&first_five));
    assert!(cache.read_query(&first_five).unwrap_err().is_cache_miss());
}

#[test]
fn overwrite_replaces_entry() {
    let cache = InMemoryCache::new();
    cache.write_query(&posts_target(), json!({"posts": [1]})).unwrap();
    cache.write_query(&posts_target(), json!({"posts": [1, 2]})).unwrap();
    assert_eq!(cache.read_query(&posts_target()).unwrap(), json!({"posts": [1, 2]}));
}

#[test]
fn invalidate_and_clear() {
    let cache = InMemoryCache::new();
    let other = posts_target().variable("first", 1);
    cache.write_query(&posts_target(), json!({"posts": []})).unwrap();
    cache.write_query(&other, json!({"posts": []})).unwrap();

    cache.invalidate(&posts_target());
    assert!(!cache.contains(&posts_target()));
    assert!(cache.contains(&other));

    cache.clear();
    assert!(cache.read_query(&other).unwrap_err().is_cache_miss());
}

#[test]
fn ttl_expiry() {
    let cache = InMemoryCache::with_config(&CacheConfig::new().ttl(Duration::from_millis(1)));
    cache.write_query(&posts_target(), json!({"posts": []})).unwrap();

    std::thread::sleep(Duration::from_millis(50));

    assert!(cache.read_query(&posts_target()).unwrap_err().is_cache_miss());
}

#[test]
fn thread_safety() {
    use std::sync::Arc;
    use std::thread;

    let cache = Arc::new(InMemoryCache::new());
    let mut handles = Vec::new();

    for i in 0..10 {
        let cache = Arc::clone(&cache);
        handles.push(thread::spawn(move || {
            let target = posts_target().variable("first", i);
            cache.write_query(&target, json!({"posts": [i]})).unwrap();
        }));
    }

    for h in handles {
        h.join().expect("thread panicked");
    }

    for i in 0..10 {
        let target = posts_target().variable("first", i);
        assert_eq!(cache.read_query(&target).unwrap(), json!({"posts": [i]}));
    }
}
