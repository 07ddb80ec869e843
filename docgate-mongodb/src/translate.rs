//! Translation of conformed queries into MongoDB query syntax.
//!
//! Filter conditions, sort specs, and projections arrive as the structured
//! output of the query layer and are rendered here into the BSON documents
//! the driver executes. Operands are strings on the wire; each one is cast
//! to the most specific BSON type it parses as (integer, float, boolean,
//! RFC 3339 datetime, then string) so comparisons run typed inside MongoDB.

use bson::{Bson, DateTime, Document};
use chrono::{DateTime as ChronoDateTime, FixedOffset};

use docgate_core::conform::{Filter, FilterValue, Operand, Operator};

/// Renders a conformed filter as a MongoDB filter document.
pub(crate) fn filter_to_document(filter: &Filter) -> Document {
    filter
        .iter()
        .map(|(field, condition)| {
            (
                field.clone(),
                match condition {
                    FilterValue::Literal(operand) => cast_operand(operand),
                    FilterValue::Ops(ops) => Bson::Document(
                        ops.iter()
                            .map(|(op, operand)| {
                                (format!("${}", op.name()), operand_to_bson(*op, operand))
                            })
                            .collect(),
                    ),
                },
            )
        })
        .collect()
}

fn operand_to_bson(op: Operator, operand: &Operand) -> Bson {
    match operand {
        // Regex patterns stay strings; casting would corrupt patterns that
        // happen to parse as numbers.
        Operand::Value(raw) if op == Operator::Regex => Bson::String(raw.clone()),
        Operand::Value(raw) => cast_operand(raw),
        Operand::List(items) => Bson::Array(items.iter().map(|item| cast_operand(item)).collect()),
    }
}

/// Casts a string operand to the most specific BSON type it parses as.
fn cast_operand(raw: &str) -> Bson {
    if let Ok(number) = raw.parse::<i64>() {
        return Bson::Int64(number);
    }
    if let Ok(number) = raw.parse::<f64>() {
        return Bson::Double(number);
    }
    if let Ok(flag) = raw.parse::<bool>() {
        return Bson::Boolean(flag);
    }
    if let Ok(instant) = ChronoDateTime::<FixedOffset>::parse_from_rfc3339(raw) {
        return Bson::DateTime(DateTime::from_chrono(instant));
    }
    Bson::String(raw.to_string())
}

/// Renders a sort spec (`-` prefix for descending) as a sort document.
pub(crate) fn sort_to_document(spec: &str) -> Document {
    terms(spec)
        .map(|term| match term.strip_prefix('-') {
            Some(field) => (field.to_string(), Bson::Int32(-1)),
            None => (term.to_string(), Bson::Int32(1)),
        })
        .collect()
}

/// Renders a field-selection spec (`-` prefix for exclusion) as a
/// projection document.
pub(crate) fn projection_to_document(spec: &str) -> Document {
    terms(spec)
        .map(|term| match term.strip_prefix('-') {
            Some(field) => (field.to_string(), Bson::Int32(0)),
            None => (term.to_string(), Bson::Int32(1)),
        })
        .collect()
}

fn terms(spec: &str) -> impl Iterator<Item = &str> {
    spec.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|term| !term.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;
    use docgate_core::conform::conform;

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
    fn literals_become_typed_equality() {
        let document = filter_to_document(&filter_of(&[("level", "4"), ("title", "rust")]));
        assert_eq!(document, doc! { "level": 4_i64, "title": "rust" });
    }

    #[test]
    fn chained_operators_share_one_field_document() {
        let document = filter_to_document(&filter_of(&[("level", "gte:2:lt:5")]));
        assert_eq!(document, doc! { "level": { "$gte": 2_i64, "$lt": 5_i64 } });
    }

    #[test]
    fn list_operands_become_typed_arrays() {
        let document = filter_to_document(&filter_of(&[("level", "in:1,2,abc")]));
        assert_eq!(
            document,
            doc! { "level": { "$in": [Bson::Int64(1), Bson::Int64(2), Bson::String("abc".to_string())] } }
        );
    }

    #[test]
    fn regex_operands_are_never_cast() {
        let document = filter_to_document(&filter_of(&[("title", "regex:123")]));
        assert_eq!(document, doc! { "title": { "$regex": "123" } });
    }

    #[test]
    fn operand_casting_prefers_specific_types() {
        assert_eq!(cast_operand("42"), Bson::Int64(42));
        assert_eq!(cast_operand("1.5"), Bson::Double(1.5));
        assert_eq!(cast_operand("true"), Bson::Boolean(true));
        assert!(matches!(
            cast_operand("2023-01-01T00:00:00Z"),
            Bson::DateTime(_)
        ));
        assert_eq!(cast_operand("rust"), Bson::String("rust".to_string()));
    }

    #[test]
    fn sort_and_projection_specs_render_directions() {
        assert_eq!(
            sort_to_document("-date title"),
            doc! { "date": -1, "title": 1 }
        );
        assert_eq!(
            projection_to_document("title,-_id"),
            doc! { "title": 1, "_id": 0 }
        );
    }
}
