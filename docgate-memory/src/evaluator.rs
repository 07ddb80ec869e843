//! Filter evaluation for in-memory document matching.
//!
//! Filter operands arrive as raw strings from the query layer while stored
//! fields are typed JSON, so every comparison here is loose: a numeric field
//! matches a string operand when both parse to the same number, and an array
//! field matches when any element does. Negated operators (`ne`, `nin`)
//! match documents where the field is absent.

use std::cmp::Ordering;

use regex::Regex;
use serde_json::Value;

use docgate_core::conform::{Filter, FilterValue, Operand, Operator};

/// Whether a document satisfies every condition in the filter.
///
/// Conditions on distinct fields are conjunctive; so are chained operators
/// within one condition.
pub fn matches_filter(document: &Value, filter: &Filter) -> bool {
    filter
        .iter()
        .all(|(path, condition)| matches_condition(document, path, condition))
}

fn matches_condition(document: &Value, path: &str, condition: &FilterValue) -> bool {
    let field = lookup(document, path);
    match condition {
        FilterValue::Literal(operand) => {
            matches_operator(field, Operator::Eq, &Operand::Value(operand.clone()))
        }
        FilterValue::Ops(ops) => ops
            .iter()
            .all(|(op, operand)| matches_operator(field, *op, operand)),
    }
}

/// Resolves a dotted field path against a document.
pub(crate) fn lookup<'a>(document: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(document, |value, segment| value.get(segment))
}

fn matches_operator(field: Option<&Value>, op: Operator, operand: &Operand) -> bool {
    match (op, operand) {
        (Operator::Eq, Operand::Value(operand)) => {
            field.is_some_and(|value| loose_eq(value, operand))
        }
        (Operator::Ne, Operand::Value(operand)) => {
            !field.is_some_and(|value| loose_eq(value, operand))
        }
        (Operator::Gt | Operator::Gte | Operator::Lt | Operator::Lte, Operand::Value(operand)) => {
            field.is_some_and(|value| {
                any_scalar(value, |scalar| {
                    loose_cmp(scalar, operand).is_some_and(|ordering| match op {
                        Operator::Gt => ordering == Ordering::Greater,
                        Operator::Gte => ordering != Ordering::Less,
                        Operator::Lt => ordering == Ordering::Less,
                        Operator::Lte => ordering != Ordering::Greater,
                        _ => false,
                    })
                })
            })
        }
        (Operator::Regex, Operand::Value(operand)) => match Regex::new(operand) {
            Ok(pattern) => field.is_some_and(|value| {
                any_scalar(value, |scalar| {
                    scalar.as_str().is_some_and(|text| pattern.is_match(text))
                })
            }),
            Err(_) => false,
        },
        (Operator::In, Operand::List(operands)) => field.is_some_and(|value| {
            operands.iter().any(|operand| loose_eq(value, operand))
        }),
        (Operator::Nin, Operand::List(operands)) => !field.is_some_and(|value| {
            operands.iter().any(|operand| loose_eq(value, operand))
        }),
        // Operand shapes are fixed by the decoder; a mismatch never matches.
        _ => false,
    }
}

/// Array fields match when any element does; scalars match directly.
fn any_scalar(value: &Value, predicate: impl Fn(&Value) -> bool) -> bool {
    match value {
        Value::Array(items) => items.iter().any(predicate),
        _ => predicate(value),
    }
}

fn loose_eq(value: &Value, operand: &str) -> bool {
    any_scalar(value, |scalar| match scalar {
        Value::String(text) => text == operand,
        Value::Number(number) => operand
            .parse::<f64>()
            .ok()
            .zip(number.as_f64())
            .is_some_and(|(right, left)| left == right),
        Value::Bool(flag) => operand.parse::<bool>().is_ok_and(|right| *flag == right),
        Value::Null => operand == "null",
        _ => false,
    })
}

/// Orders a field value against a string operand: numerically when both
/// sides parse as numbers, lexicographically for strings otherwise.
fn loose_cmp(value: &Value, operand: &str) -> Option<Ordering> {
    match value {
        Value::Number(number) => {
            let left = number.as_f64()?;
            let right = operand.parse::<f64>().ok()?;
            left.partial_cmp(&right)
        }
        Value::String(text) => match (text.parse::<f64>(), operand.parse::<f64>()) {
            (Ok(left), Ok(right)) => left.partial_cmp(&right),
            _ => Some(text.as_str().cmp(operand)),
        },
        _ => None,
    }
}

/// Total order over JSON values for sorting, ranked by type: null, bool,
/// number, string, everything else. Values of the same type compare
/// naturally; composite values tie.
pub fn compare_values(left: &Value, right: &Value) -> Ordering {
    fn rank(value: &Value) -> u8 {
        match value {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Number(_) => 2,
            Value::String(_) => 3,
            _ => 4,
        }
    }

    match (left, right) {
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        (Value::Number(a), Value::Number(b)) => a
            .as_f64()
            .partial_cmp(&b.as_f64())
            .unwrap_or(Ordering::Equal),
        (Value::String(a), Value::String(b)) => a.cmp(b),
        _ => rank(left).cmp(&rank(right)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docgate_core::conform::conform;
    use serde_json::json;

    fn filter_of(pairs: &[(&str, &str)]) -> Filter {
        conform(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<Vec<_>>(),
        )
        .filter
    }

    #[test]
    fn literal_matches_numbers_loosely() {
        let document = json!({ "title": "rust", "level": 4 });
        assert!(matches_filter(&document, &filter_of(&[("level", "4")])));
        assert!(matches_filter(&document, &filter_of(&[("title", "rust")])));
        assert!(!matches_filter(&document, &filter_of(&[("level", "5")])));
    }

    #[test]
    fn range_operators_compare_numerically() {
        let document = json!({ "level": 4 });
        assert!(matches_filter(&document, &filter_of(&[("level", "gte:4")])));
        assert!(matches_filter(
            &document,
            &filter_of(&[("level", "gt:3:lt:5")])
        ));
        assert!(!matches_filter(&document, &filter_of(&[("level", "gt:4")])));
    }

    #[test]
    fn ne_and_nin_match_absent_fields() {
        let document = json!({ "title": "rust" });
        assert!(matches_filter(&document, &filter_of(&[("level", "ne:4")])));
        assert!(matches_filter(
            &document,
            &filter_of(&[("level", "nin:1,2")])
        ));
        assert!(!matches_filter(&document, &filter_of(&[("level", "4")])));
    }

    #[test]
    fn in_matches_any_listed_operand() {
        let document = json!({ "title": "rust" });
        assert!(matches_filter(
            &document,
            &filter_of(&[("title", "in:go,rust,zig")])
        ));
        assert!(!matches_filter(
            &document,
            &filter_of(&[("title", "in:go,zig")])
        ));
    }

    #[test]
    fn array_fields_match_on_any_element() {
        let document = json!({ "tags": ["web", "api"] });
        assert!(matches_filter(&document, &filter_of(&[("tags", "api")])));
        assert!(!matches_filter(&document, &filter_of(&[("tags", "cli")])));
    }

    #[test]
    fn regex_matches_string_fields() {
        let document = json!({ "title": "portfolio gateway" });
        assert!(matches_filter(
            &document,
            &filter_of(&[("title", "regex:^portfolio")])
        ));
        assert!(!matches_filter(
            &document,
            &filter_of(&[("title", "regex:^gateway")])
        ));
    }

    #[test]
    fn invalid_regex_matches_nothing() {
        let document = json!({ "title": "anything" });
        assert!(!matches_filter(
            &document,
            &filter_of(&[("title", "regex:(")])
        ));
    }

    #[test]
    fn dotted_paths_descend_into_objects() {
        let document = json!({ "period": { "start": "2020" } });
        assert!(matches_filter(
            &document,
            &filter_of(&[("period.start", "2020")])
        ));
        assert!(!matches_filter(
            &document,
            &filter_of(&[("period.end", "2020")])
        ));
    }

    #[test]
    fn compare_values_ranks_types_and_orders_within() {
        assert_eq!(
            compare_values(&json!(1), &json!(2)),
            std::cmp::Ordering::Less
        );
        assert_eq!(
            compare_values(&json!("a"), &json!("b")),
            std::cmp::Ordering::Less
        );
        assert_eq!(
            compare_values(&Value::Null, &json!(0)),
            std::cmp::Ordering::Less
        );
        assert_eq!(
            compare_values(&json!(9), &json!("1")),
            std::cmp::Ordering::Less
        );
    }
}
