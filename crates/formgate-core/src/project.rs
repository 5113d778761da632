//! Validated-data projection.
//!
//! After a validator confirms which rule paths matched the payload, the
//! projection extracts exactly the branches those paths cover, preserving
//! nested and sequence structure while stripping non-addressed siblings.
//!
//! Projection never fails: paths that do not resolve against the payload
//! contribute nothing. The functions here are pure, which is what makes it
//! safe for the request lifecycle to compute a projection once and hand out
//! copies afterwards.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::path::{RulePathSet, Segment};
use crate::payload::Payload;

/// Sparse projection tree.
///
/// Sequences are keyed by their original index so that overlapping wildcard
/// rules merge element-wise before unmatched elements are dropped.
enum Node {
    Leaf(Value),
    Map(BTreeMap<String, Node>),
    Seq(BTreeMap<usize, Node>),
}

/// Computes the subset of `payload` covered by the matched rule paths.
///
/// Wildcard segments fan out over every element of the sequence or mapping
/// at their position; sequence elements keep their original order, mappings
/// stay mappings. Overlapping paths union-merge; at an identical leaf path,
/// or when two rules disagree about the container kind at a position, the
/// later rule wins. An empty or entirely unresolvable matched set yields an
/// empty payload.
pub fn project(payload: &Payload, matched: &RulePathSet) -> Payload {
    let mut root: BTreeMap<String, Node> = BTreeMap::new();

    for path in matched {
        let Some((first, rest)) = path.segments().split_first() else {
            continue;
        };
        match first {
            Segment::Key(key) => {
                if let Some(child) = payload.as_map().get(key)
                    && let Some(node) = project_path(child, rest)
                {
                    merge_entry(&mut root, key.clone(), node);
                }
            }
            // The payload root is a mapping, so a leading wildcard fans out
            // over every top-level field.
            Segment::Wildcard => {
                for (key, child) in payload.as_map() {
                    if let Some(node) = project_path(child, rest) {
                        merge_entry(&mut root, key.clone(), node);
                    }
                }
            }
        }
    }

    let map: Map<String, Value> = root
        .into_iter()
        .map(|(key, node)| (key, finalize(node)))
        .collect();
    Payload::from(map)
}

/// Keeps only the listed dotted paths of `payload`.
///
/// Keys are literal: no wildcard expansion, `*` is an ordinary mapping key,
/// and traversal descends through mappings only. Keys that do not resolve
/// are silently omitted; malformed keys (empty segments) address nothing.
pub fn only<I, S>(payload: &Payload, keys: I) -> Payload
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = Map::new();

    for key in keys {
        let Some(segments) = literal_segments(key.as_ref()) else {
            continue;
        };
        if let Some(value) = get_path(payload.as_map(), &segments) {
            set_path(&mut out, &segments, value.clone());
        }
    }

    Payload::from(out)
}

/// Keeps everything in `payload` except the listed dotted paths.
///
/// Same key semantics as [`only`]; keys that do not resolve are no-ops.
pub fn except<I, S>(payload: &Payload, keys: I) -> Payload
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = payload.as_map().clone();

    for key in keys {
        if let Some(segments) = literal_segments(key.as_ref()) {
            forget_path(&mut out, &segments);
        }
    }

    Payload::from(out)
}

/// Projects a single path against a payload subtree, returning the covered
/// branch or `None` when the path does not resolve.
fn project_path(src: &Value, segments: &[Segment]) -> Option<Node> {
    let Some((first, rest)) = segments.split_first() else {
        return Some(Node::Leaf(src.clone()));
    };

    match first {
        Segment::Key(key) => {
            let child = src.as_object()?.get(key)?;
            let node = project_path(child, rest)?;
            let mut map = BTreeMap::new();
            map.insert(key.clone(), node);
            Some(Node::Map(map))
        }
        Segment::Wildcard => match src {
            Value::Array(items) => {
                let mut seq = BTreeMap::new();
                for (index, item) in items.iter().enumerate() {
                    if let Some(node) = project_path(item, rest) {
                        seq.insert(index, node);
                    }
                }
                (!seq.is_empty()).then_some(Node::Seq(seq))
            }
            Value::Object(entries) => {
                let mut map = BTreeMap::new();
                for (key, item) in entries {
                    if let Some(node) = project_path(item, rest) {
                        map.insert(key.clone(), node);
                    }
                }
                (!map.is_empty()).then_some(Node::Map(map))
            }
            _ => None,
        },
    }
}

fn merge_entry(into: &mut BTreeMap<String, Node>, key: String, node: Node) {
    match into.get_mut(&key) {
        Some(slot) => merge(slot, node),
        None => {
            into.insert(key, node);
        }
    }
}

/// Union-merges a projected branch into the accumulator. Mismatched node
/// kinds are resolved in favor of the incoming branch: the last applied rule
/// wins.
fn merge(into: &mut Node, from: Node) {
    match (into, from) {
        (Node::Map(existing), Node::Map(incoming)) => {
            for (key, node) in incoming {
                merge_entry(existing, key, node);
            }
        }
        (Node::Seq(existing), Node::Seq(incoming)) => {
            for (index, node) in incoming {
                match existing.get_mut(&index) {
                    Some(slot) => merge(slot, node),
                    None => {
                        existing.insert(index, node);
                    }
                }
            }
        }
        (slot, incoming) => *slot = incoming,
    }
}

/// Collapses the sparse tree into a JSON value. Sequence entries come out in
/// original index order; entirely unmatched elements are gone by now.
fn finalize(node: Node) -> Value {
    match node {
        Node::Leaf(value) => value,
        Node::Map(map) => Value::Object(
            map.into_iter()
                .map(|(key, node)| (key, finalize(node)))
                .collect(),
        ),
        Node::Seq(seq) => Value::Array(seq.into_values().map(finalize).collect()),
    }
}

/// Splits a literal include/exclude key, rejecting empty segments.
fn literal_segments(key: &str) -> Option<Vec<&str>> {
    if key.is_empty() {
        return None;
    }
    let segments: Vec<&str> = key.split('.').collect();
    if segments.iter().any(|segment| segment.is_empty()) {
        return None;
    }
    Some(segments)
}

fn get_path<'a>(map: &'a Map<String, Value>, segments: &[&str]) -> Option<&'a Value> {
    let (first, rest) = segments.split_first()?;
    let mut current = map.get(*first)?;
    for segment in rest {
        current = current.as_object()?.get(*segment)?;
    }
    Some(current)
}

fn set_path(out: &mut Map<String, Value>, segments: &[&str], value: Value) {
    match segments {
        [] => {}
        [last] => {
            out.insert((*last).to_string(), value);
        }
        [first, rest @ ..] => {
            let slot = out
                .entry((*first).to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !slot.is_object() {
                *slot = Value::Object(Map::new());
            }
            if let Value::Object(child) = slot {
                set_path(child, rest, value);
            }
        }
    }
}

fn forget_path(map: &mut Map<String, Value>, segments: &[&str]) {
    match segments {
        [] => {}
        [last] => {
            map.remove(*last);
        }
        [first, rest @ ..] => {
            if let Some(Value::Object(child)) = map.get_mut(*first) {
                forget_path(child, rest);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: Value) -> Payload {
        Payload::from_value(value)
    }

    fn matched(paths: &[&str]) -> RulePathSet {
        RulePathSet::parse(paths)
    }

    #[test]
    fn test_project_keeps_only_matched_top_level_keys() {
        let data = payload(json!({"name": "specified", "with": "extras"}));
        let out = project(&data, &matched(&["name"]));
        assert_eq!(out.into_value(), json!({"name": "specified"}));
    }

    #[test]
    fn test_project_nested_child_strips_siblings() {
        let data = payload(json!({"nested": {"foo": "bar", "with": "extras"}}));
        let out = project(&data, &matched(&["nested.foo"]));
        assert_eq!(out.into_value(), json!({"nested": {"foo": "bar"}}));
    }

    #[test]
    fn test_project_sequence_wildcard_preserves_order() {
        let data = payload(json!({"array": [1, 2]}));
        let out = project(&data, &matched(&["array.*"]));
        assert_eq!(out.into_value(), json!({"array": [1, 2]}));
    }

    #[test]
    fn test_project_wildcard_over_sequence_of_mappings() {
        let data = payload(json!({
            "nested": [
                {"bar": "baz", "with": "extras"},
                {"bar": "baz2", "with": "extras"},
            ],
        }));
        let out = project(&data, &matched(&["nested.*.bar"]));
        assert_eq!(
            out.into_value(),
            json!({"nested": [{"bar": "baz"}, {"bar": "baz2"}]})
        );
    }

    #[test]
    fn test_project_wildcard_over_mapping_keeps_mapping() {
        let data = payload(json!({
            "scores": {"alice": {"value": 1, "raw": "x"}, "bob": {"value": 2, "raw": "y"}},
        }));
        let out = project(&data, &matched(&["scores.*.value"]));
        assert_eq!(
            out.into_value(),
            json!({"scores": {"alice": {"value": 1}, "bob": {"value": 2}}})
        );
    }

    #[test]
    fn test_project_overlapping_paths_union_merge() {
        let data = payload(json!({
            "nested": {"foo": "bar", "baz": "qux", "with": "extras"},
        }));
        let out = project(&data, &matched(&["nested.foo", "nested.baz"]));
        assert_eq!(
            out.into_value(),
            json!({"nested": {"foo": "bar", "baz": "qux"}})
        );
    }

    #[test]
    fn test_project_overlapping_wildcards_merge_at_original_indices() {
        // The second element has no `bar`, so `items.*.bar` skips it; the
        // `qux` rule still lands on the same element rather than shifting.
        let data = payload(json!({
            "items": [
                {"bar": 1, "qux": "a", "with": "extras"},
                {"qux": "b", "with": "extras"},
            ],
        }));
        let out = project(&data, &matched(&["items.*.bar", "items.*.qux"]));
        assert_eq!(
            out.into_value(),
            json!({"items": [{"bar": 1, "qux": "a"}, {"qux": "b"}]})
        );
    }

    #[test]
    fn test_project_missing_paths_skip_silently() {
        let data = payload(json!({"nested": {"foo": "bar"}}));
        let out = project(
            &data,
            &matched(&["absent", "nested.missing", "nested.foo.deeper"]),
        );
        assert!(out.is_empty());
    }

    #[test]
    fn test_project_missing_leaf_leaves_no_empty_intermediates() {
        let data = payload(json!({"a": {"b": {}}}));
        let out = project(&data, &matched(&["a.b.c"]));
        assert!(out.is_empty());
    }

    #[test]
    fn test_project_empty_matched_set_gives_empty_payload() {
        let data = payload(json!({"name": "specified"}));
        let out = project(&data, &RulePathSet::new());
        assert!(out.is_empty());
    }

    #[test]
    fn test_project_wildcard_on_empty_sequence_omits_key() {
        let data = payload(json!({"array": []}));
        let out = project(&data, &matched(&["array.*"]));
        assert!(out.is_empty());
    }

    #[test]
    fn test_project_wildcard_on_scalar_resolves_nothing() {
        let data = payload(json!({"name": "scalar"}));
        let out = project(&data, &matched(&["name.*"]));
        assert!(out.is_empty());
    }

    #[test]
    fn test_project_partial_wildcard_match_drops_unmatched_elements() {
        let data = payload(json!({
            "items": [{"bar": 1}, {"other": 2}, {"bar": 3}],
        }));
        let out = project(&data, &matched(&["items.*.bar"]));
        assert_eq!(out.into_value(), json!({"items": [{"bar": 1}, {"bar": 3}]}));
    }

    #[test]
    fn test_project_leading_wildcard_fans_out_over_root() {
        let data = payload(json!({
            "a": {"id": 1, "with": "extras"},
            "b": {"id": 2},
            "c": "scalar",
        }));
        let out = project(&data, &matched(&["*.id"]));
        assert_eq!(out.into_value(), json!({"a": {"id": 1}, "b": {"id": 2}}));
    }

    #[test]
    fn test_project_kind_conflict_last_rule_wins() {
        // `nested` addresses the whole subtree as a leaf, `nested.foo` a
        // projected mapping. Whichever rule applies last determines the
        // shape at the shared prefix.
        let data = payload(json!({"nested": {"foo": "bar", "with": "extras"}}));

        let narrowed = project(&data, &matched(&["nested", "nested.foo"]));
        assert_eq!(narrowed.into_value(), json!({"nested": {"foo": "bar"}}));

        let widened = project(&data, &matched(&["nested.foo", "nested"]));
        assert_eq!(
            widened.into_value(),
            json!({"nested": {"foo": "bar", "with": "extras"}})
        );
    }

    #[test]
    fn test_only_keeps_listed_keys() {
        let data = payload(json!({"name": "a", "with": "extras", "nested": {"foo": 1, "bar": 2}}));
        let out = only(&data, ["name", "nested.foo"]);
        assert_eq!(
            out.into_value(),
            json!({"name": "a", "nested": {"foo": 1}})
        );
    }

    #[test]
    fn test_only_silently_omits_missing_and_malformed_keys() {
        let data = payload(json!({"name": "a"}));
        let out = only(&data, ["name", "absent", "a..b", ""]);
        assert_eq!(out.into_value(), json!({"name": "a"}));
    }

    #[test]
    fn test_only_treats_star_as_literal_key() {
        let data = payload(json!({"*": "literal", "array": [1, 2]}));
        let out = only(&data, ["*", "array.*"]);
        assert_eq!(out.into_value(), json!({"*": "literal"}));
    }

    #[test]
    fn test_except_removes_listed_keys() {
        let data = payload(json!({"name": "a", "secret": "s", "nested": {"foo": 1, "bar": 2}}));
        let out = except(&data, ["secret", "nested.bar"]);
        assert_eq!(
            out.into_value(),
            json!({"name": "a", "nested": {"foo": 1}})
        );
    }

    #[test]
    fn test_except_ignores_missing_keys() {
        let data = payload(json!({"name": "a"}));
        let out = except(&data, ["absent", "nested.deep"]);
        assert_eq!(out.into_value(), json!({"name": "a"}));
    }

    #[test]
    fn test_project_is_referentially_transparent() {
        let data = payload(json!({"nested": {"foo": "bar"}, "array": [1, 2]}));
        let rules = matched(&["nested.foo", "array.*"]);
        assert_eq!(project(&data, &rules), project(&data, &rules));
    }
}
