//! Duplicate and not-found bookkeeping for multi-term queries

use serde_json::Value;
use std::collections::HashMap;

/// Outcome of tallying the hits of one query-many call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tally {
    /// Terms matched more than once, with their hit count, in first-seen order
    pub dup: Vec<(String, usize)>,
    /// Terms the service reported as not found, in hit order
    pub missing: Vec<String>,
}

impl Tally {
    pub fn is_clean(&self) -> bool {
        self.dup.is_empty() && self.missing.is_empty()
    }
}

/// Render the `query` field of a hit as a term
pub fn query_term(hit: &Value) -> Option<String> {
    match hit.get("query")? {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

fn is_notfound(hit: &Value) -> bool {
    hit.get("notfound").and_then(Value::as_bool).unwrap_or(false)
}

/// Tally hits by their `query` term
pub fn tally_hits(hits: &[Value]) -> Tally {
    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut missing = Vec::new();

    for hit in hits {
        let Some(term) = query_term(hit) else {
            continue;
        };
        if is_notfound(hit) {
            missing.push(term);
            continue;
        }
        let count = counts.entry(term.clone()).or_insert(0);
        if *count == 0 {
            order.push(term);
        }
        *count += 1;
    }

    let dup = order
        .into_iter()
        .filter_map(|term| {
            let count = counts.get(&term).copied().unwrap_or(0);
            (count > 1).then_some((term, count))
        })
        .collect();

    Tally { dup, missing }
}

/// Short preview of a list for log lines
pub fn preview<T: std::fmt::Debug>(items: &[T]) -> String {
    const MAX: usize = 100;
    let rendered = format!("{:?}", items);
    if rendered.chars().count() > MAX {
        let cut: String = rendered.chars().take(MAX).collect();
        format!("{}...", cut)
    } else {
        rendered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_clean_tally() {
        let hits = vec![
            json!({"query": "1017", "_id": "1017"}),
            json!({"query": "1018", "_id": "1018"}),
        ];
        let tally = tally_hits(&hits);
        assert!(tally.is_clean());
    }

    #[test]
    fn test_dup_and_missing() {
        let hits = vec![
            json!({"query": "A", "_id": "1"}),
            json!({"query": "B", "notfound": true}),
            json!({"query": "A", "_id": "1"}),
        ];
        let tally = tally_hits(&hits);
        assert_eq!(tally.dup, vec![("A".to_string(), 2)]);
        assert_eq!(tally.missing, vec!["B".to_string()]);
    }

    #[test]
    fn test_first_seen_order() {
        let hits = vec![
            json!({"query": "z", "_id": "1"}),
            json!({"query": "a", "_id": "2"}),
            json!({"query": "a", "_id": "3"}),
            json!({"query": "z", "_id": "4"}),
            json!({"query": "z", "_id": "5"}),
        ];
        let tally = tally_hits(&hits);
        assert_eq!(
            tally.dup,
            vec![("z".to_string(), 3), ("a".to_string(), 2)]
        );
    }

    #[test]
    fn test_numeric_query_and_missing_key() {
        let hits = vec![json!({"query": 1017, "_id": "1017"}), json!({"_id": "x"})];
        let tally = tally_hits(&hits);
        assert!(tally.is_clean());
        assert_eq!(query_term(&hits[0]).as_deref(), Some("1017"));
    }

    #[test]
    fn test_preview_truncates() {
        let items: Vec<String> = (0..100).map(|i| format!("term{}", i)).collect();
        let p = preview(&items);
        assert!(p.ends_with("..."));
        assert_eq!(p.chars().count(), 103);
        assert_eq!(preview(&["A"]), "[\"A\"]");
    }

    proptest! {
        #[test]
        fn prop_single_term_repeated(k in 1usize..20) {
            let hits: Vec<Value> = (0..k).map(|i| json!({"query": "T", "_id": i})).collect();
            let tally = tally_hits(&hits);
            prop_assert!(tally.missing.is_empty());
            if k > 1 {
                prop_assert_eq!(tally.dup, vec![("T".to_string(), k)]);
            } else {
                prop_assert!(tally.dup.is_empty());
            }
        }

        #[test]
        fn prop_distinct_terms_are_clean(terms in proptest::collection::hash_set("[a-z]{1,8}", 0..50)) {
            let hits: Vec<Value> = terms.iter().map(|t| json!({"query": t})).collect();
            prop_assert!(tally_hits(&hits).is_clean());
        }
    }
}
