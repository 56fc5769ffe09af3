//! Map primitives used for dependency diffing
//!
//! All functions borrow their inputs and return freshly owned maps, so
//! callers never share backing storage with a result.

use indexmap::IndexMap;
use std::cmp::Ordering;
use std::hash::Hash;

/// Returns the entries of `to` whose value differs from `from`
///
/// A key missing from `from` counts as different. Keys only present in
/// `from` never appear in the result.
pub fn diff_map<K, V>(from: &IndexMap<K, V>, to: &IndexMap<K, V>) -> IndexMap<K, V>
where
    K: Hash + Eq + Clone,
    V: PartialEq + Clone,
{
    to.iter()
        .filter(|(key, value)| from.get(*key) != Some(*value))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// Merges maps in order; for a shared key the last map defining it wins
pub fn merge_maps<'a, K, V, I>(maps: I) -> IndexMap<K, V>
where
    K: Hash + Eq + Clone + 'a,
    V: Clone + 'a,
    I: IntoIterator<Item = &'a IndexMap<K, V>>,
{
    let mut merged = IndexMap::new();
    for map in maps {
        for (key, value) in map {
            merged.insert(key.clone(), value.clone());
        }
    }
    merged
}

/// Returns a copy of `map` iterating in ascending locale order of keys
pub fn sort_by_key<V: Clone>(map: &IndexMap<String, V>) -> IndexMap<String, V> {
    let mut sorted = map.clone();
    sorted.sort_by(|a, _, b, _| locale_cmp(a, b));
    sorted
}

/// ASCII punctuation and symbols in root collation order
const PUNCTUATION_ORDER: &str = "_-,;:!?.'\"()[]{}@*/\\&#%`^+<=>|~$";

/// Primary collation weight of a character: whitespace first, then
/// punctuation in root order, then digits, then case-folded letters
fn primary_weight(c: char) -> (u8, u32) {
    if c.is_whitespace() {
        (0, c as u32)
    } else if c.is_alphabetic() {
        (4, c.to_lowercase().next().unwrap_or(c) as u32)
    } else if c.is_numeric() {
        (3, c as u32)
    } else if let Some(rank) = PUNCTUATION_ORDER.find(c) {
        (1, rank as u32)
    } else {
        (2, c as u32)
    }
}

/// Compares two strings the way a root-locale collator would
///
/// Primary pass compares character weights. Ties are broken with
/// lowercase before uppercase, then code points.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    let primary = a
        .chars()
        .map(primary_weight)
        .cmp(b.chars().map(primary_weight));

    primary
        .then_with(|| {
            a.chars()
                .map(|c| c.is_uppercase())
                .cmp(b.chars().map(|c| c.is_uppercase()))
        })
        .then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(entries: &[(&str, &str)]) -> IndexMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_diff_map_changed_and_added() {
        let from = map(&[("a", "^1.0.0"), ("c", "^3.0.0")]);
        let to = map(&[("a", "^1.1.0"), ("b", "^2.0.0"), ("c", "^3.0.0")]);

        let diff = diff_map(&from, &to);
        assert_eq!(diff, map(&[("a", "^1.1.0"), ("b", "^2.0.0")]));
    }

    #[test]
    fn test_diff_map_ignores_removed_keys() {
        let from = map(&[("gone", "1.0.0")]);
        let to = IndexMap::new();
        assert!(diff_map(&from, &to).is_empty());
    }

    #[test]
    fn test_diff_map_identical_is_empty() {
        let m = map(&[("a", "1"), ("b", "2")]);
        assert!(diff_map(&m, &m).is_empty());
    }

    #[test]
    fn test_diff_map_exact_string_equality() {
        let from = map(&[("a", "1.0.0")]);
        let to = map(&[("a", "^1.0.0")]);
        assert_eq!(diff_map(&from, &to), to);
    }

    #[test]
    fn test_diff_map_does_not_mutate_inputs() {
        let from = map(&[("a", "1")]);
        let to = map(&[("a", "2")]);
        let _ = diff_map(&from, &to);
        assert_eq!(from, map(&[("a", "1")]));
        assert_eq!(to, map(&[("a", "2")]));
    }

    #[test]
    fn test_merge_maps_empty() {
        let merged: IndexMap<String, String> = merge_maps(std::iter::empty());
        assert!(merged.is_empty());
    }

    #[test]
    fn test_merge_maps_single() {
        let a = map(&[("x", "1"), ("y", "2")]);
        assert_eq!(merge_maps([&a]), a);
    }

    #[test]
    fn test_merge_maps_later_wins() {
        let a = map(&[("x", "1"), ("y", "2")]);
        let b = map(&[("y", "3"), ("z", "4")]);

        let merged = merge_maps([&a, &b]);
        assert_eq!(merged.get("x").map(String::as_str), Some("1"));
        assert_eq!(merged.get("y").map(String::as_str), Some("3"));
        assert_eq!(merged.get("z").map(String::as_str), Some("4"));

        let reversed = merge_maps([&b, &a]);
        assert_eq!(reversed.get("y").map(String::as_str), Some("2"));
    }

    #[test]
    fn test_sort_by_key_orders_keys() {
        let m = map(&[("react", "18"), ("@types/node", "20"), ("axios", "1"), ("Zod", "3")]);
        let sorted = sort_by_key(&m);
        let keys: Vec<_> = sorted.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["@types/node", "axios", "react", "Zod"]);
    }

    #[test]
    fn test_sort_by_key_is_permutation_and_idempotent() {
        let m = map(&[("b", "2"), ("a", "1"), ("c", "3")]);
        let once = sort_by_key(&m);
        let twice = sort_by_key(&once);

        assert_eq!(once.len(), m.len());
        for (k, v) in &m {
            assert_eq!(once.get(k), Some(v));
        }
        assert_eq!(
            once.keys().collect::<Vec<_>>(),
            twice.keys().collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_locale_cmp_classes() {
        assert_eq!(locale_cmp("@scope/a", "1pkg"), Ordering::Less);
        assert_eq!(locale_cmp("1pkg", "abc"), Ordering::Less);
        assert_eq!(locale_cmp("a-b", "ab"), Ordering::Less);
    }

    #[test]
    fn test_locale_cmp_case() {
        assert_eq!(locale_cmp("apple", "Banana"), Ordering::Less);
        assert_eq!(locale_cmp("a", "A"), Ordering::Less);
        assert_eq!(locale_cmp("same", "same"), Ordering::Equal);
    }

    #[test]
    fn test_locale_cmp_punctuation_rank() {
        assert_eq!(locale_cmp("a_b", "a-b"), Ordering::Less);
        assert_eq!(locale_cmp("a-b", "a.b"), Ordering::Less);
        assert_eq!(locale_cmp("@x", "/x"), Ordering::Less);
        assert_eq!(locale_cmp("~x", "$x"), Ordering::Less);
    }

    #[test]
    fn test_sort_by_key_punctuation_order() {
        let m = map(&[("a.b", "1"), ("/x", "1"), ("a-b", "1"), ("@x", "1"), ("a_b", "1")]);
        let sorted = sort_by_key(&m);
        let keys: Vec<_> = sorted.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["@x", "/x", "a_b", "a-b", "a.b"]);
    }
}
