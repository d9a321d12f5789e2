//! Tests for array discovery and path reads/writes.

use gqlpatch::path::{find_array_path, get_value_by_path, pick, set_value_by_path};
use gqlpatch::{ArrayLocation, ValuePath};
use serde_json::json;

fn path(keys: &[&str]) -> ValuePath {
    keys.iter().copied().collect()
}

#[test]
fn finds_featured_not_total() {
    let result = json!({"featured": [{"id": 1}], "total": 10});
    assert_eq!(
        find_array_path(&result),
        ArrayLocation::Nested(path(&["featured"]))
    );

    let result = json!({"total": 10, "featured": [{"id": 1}]});
    assert_eq!(
        find_array_path(&result),
        ArrayLocation::Nested(path(&["featured"]))
    );
}

#[test]
fn single_item_query_is_not_found() {
    let result = json!({"id": 1, "title": "hello", "tags": null});
    assert_eq!(find_array_path(&result), ArrayLocation::NotFound);
}

#[test]
fn collection_itself_is_root() {
    assert_eq!(find_array_path(&json!([])), ArrayLocation::Root);
}

#[test]
fn first_key_in_response_order_wins() {
    let result = json!({
        "pinned": [{"id": 9}],
        "all": [{"id": 1}, {"id": 2}]
    });
    assert_eq!(
        find_array_path(&result),
        ArrayLocation::Nested(path(&["pinned"]))
    );
}

#[test]
fn connection_shape() {
    let result = json!({
        "pageInfo": {"hasNextPage": false, "endCursor": "abc"},
        "totalCount": 2,
        "edges": [{"node": {"id": 1}}, {"node": {"id": 2}}]
    });
    let location = find_array_path(&result);
    assert_eq!(location, ArrayLocation::Nested(path(&["edges"])));

    let edges = get_value_by_path(&result, location.path().unwrap()).unwrap();
    assert_eq!(edges.as_array().unwrap().len(), 2);
}

#[test]
fn read_then_write_at_discovered_path() {
    let original = json!({"page": {"items": [1, 2], "count": 2}});
    let location = find_array_path(&original);
    let found = location.path().unwrap().clone();

    let mut draft = original.clone();
    set_value_by_path(&mut draft, &found, json!([1, 2, 3])).unwrap();

    assert_eq!(draft, json!({"page": {"items": [1, 2, 3], "count": 2}}));
    assert_eq!(original, json!({"page": {"items": [1, 2], "count": 2}}));
}

#[test]
fn pick_subset() {
    let post = json!({"__typename": "Post", "id": 1, "title": "t"});
    assert_eq!(pick(&post, &["__typename", "id"]), json!({"__typename": "Post", "id": 1}));
}
