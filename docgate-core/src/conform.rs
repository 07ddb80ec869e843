//! Query conformance: translation of a raw HTTP query-parameter map into a
//! structured filter/sort/projection/pagination request.
//!
//! The transport hands every parameter over as a string. [`conform`] strips
//! the four reserved keys (`_sort`, `_projection`, `_limit`, `_page`) into
//! their typed fields and treats everything else as a filter condition. A
//! filter value that embeds comparison operators (`price=gte:10:lt:20`) is
//! decoded into an [operator expression](FilterValue::Ops) by a forward
//! scanner over the raw string; anything else stays a literal, implying
//! equality in the consuming store.
//!
//! The inverse direction, [`serialize`], rebuilds the non-filter portion of
//! a query string for pagination-link generation and is byte-stable so that
//! links round-trip.

use std::collections::BTreeMap;

/// Default page size when `_limit` is missing or unusable.
pub const DEFAULT_LIMIT: u64 = 20;

/// The query keys consumed into typed fields instead of the filter.
pub const RESERVED_KEYS: [&str; 4] = ["_sort", "_projection", "_limit", "_page"];

/// Comparison operators recognized inside filter values.
///
/// The derived `Ord` follows the decoder's fixed priority order:
/// `eq, ne, gt, gte, lt, lte, regex, in, nin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Operator {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
    Regex,
    In,
    Nin,
}

impl Operator {
    /// The operator's name as it appears in a raw filter value.
    pub fn name(&self) -> &'static str {
        match self {
            Operator::Eq => "eq",
            Operator::Ne => "ne",
            Operator::Gt => "gt",
            Operator::Gte => "gte",
            Operator::Lt => "lt",
            Operator::Lte => "lte",
            Operator::Regex => "regex",
            Operator::In => "in",
            Operator::Nin => "nin",
        }
    }

    /// The token the decoder recognizes: the operator name plus `:`.
    fn token(&self) -> &'static str {
        match self {
            Operator::Eq => "eq:",
            Operator::Ne => "ne:",
            Operator::Gt => "gt:",
            Operator::Gte => "gte:",
            Operator::Lt => "lt:",
            Operator::Lte => "lte:",
            Operator::Regex => "regex:",
            Operator::In => "in:",
            Operator::Nin => "nin:",
        }
    }
}

/// The operand of a decoded operator.
///
/// `in`/`nin` operands are ordered string sequences (split on commas); every
/// other operator takes the raw string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    Value(String),
    List(Vec<String>),
}

/// A single filter condition: either a literal string (equality in the
/// consuming store) or a decoded operator expression.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Literal(String),
    Ops(BTreeMap<Operator, Operand>),
}

impl FilterValue {
    /// Builds a filter value from a raw query-string value, decoding it when
    /// it embeds at least one recognized operator token.
    pub fn from_raw(raw: String) -> Self {
        if contains_operator(&raw) {
            FilterValue::Ops(decode(&raw))
        } else {
            FilterValue::Literal(raw)
        }
    }
}

/// A filter mapping of field path to condition, with deterministic iteration
/// order.
pub type Filter = BTreeMap<String, FilterValue>;

/// The five-part structured form of a request's query parameters.
///
/// Invariant: `filter` never contains the four [`RESERVED_KEYS`]; those are
/// consumed into the typed fields during [`conform`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConformedQuery {
    /// Filter conditions keyed by field path.
    pub filter: Filter,
    /// Raw sort spec, passed through to the store unmodified.
    pub sort: Option<String>,
    /// Raw field-selection spec, passed through to the store unmodified.
    pub projection: Option<String>,
    /// Page size. Defaults to [`DEFAULT_LIMIT`].
    pub limit: u64,
    /// Zero-based page number.
    pub page: u64,
}

impl ConformedQuery {
    /// Zero-based document offset for this page. Both factors are
    /// caller-controlled, so the multiplication saturates; an absurd page
    /// lands past every document and reads back empty.
    pub fn offset(&self) -> u64 {
        self.page.saturating_mul(self.limit)
    }

    /// A copy of this query with the page overridden, used for link
    /// generation.
    pub fn with_page(&self, page: u64) -> Self {
        let mut query = self.clone();
        query.page = page;
        query
    }
}

/// Restructures a raw query-parameter mapping into a [`ConformedQuery`].
///
/// Reserved keys are consumed into their typed fields (`limit` defaults to
/// 20 when missing, non-numeric, or non-positive; `page` defaults to 0);
/// every remaining key becomes a filter condition. Duplicate keys keep the
/// last occurrence.
pub fn conform<I>(raw: I) -> ConformedQuery
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut sort = None;
    let mut projection = None;
    let mut limit = None;
    let mut page = None;
    let mut filter = Filter::new();

    for (key, value) in raw {
        match key.as_str() {
            "_sort" => sort = Some(value),
            "_projection" => projection = Some(value),
            "_limit" => limit = value.parse::<u64>().ok().filter(|n| *n > 0),
            "_page" => page = value.parse::<u64>().ok(),
            _ => {
                filter.insert(key, FilterValue::from_raw(value));
            }
        }
    }

    ConformedQuery {
        filter,
        sort,
        projection,
        limit: limit.unwrap_or(DEFAULT_LIMIT),
        page: page.unwrap_or(0),
    }
}

/// Whether a raw filter value embeds at least one recognized operator token.
///
/// This is a plain substring test, so an operator name followed by `:`
/// inside unrelated free text still counts. That sharp edge of pattern-based
/// decoding is part of the format; there is no escaping.
pub fn contains_operator(raw: &str) -> bool {
    ALL_OPERATORS.iter().any(|op| raw.contains(op.token()))
}

const ALL_OPERATORS: [Operator; 9] = [
    Operator::Eq,
    Operator::Ne,
    Operator::Gt,
    Operator::Gte,
    Operator::Lt,
    Operator::Lte,
    Operator::Regex,
    Operator::In,
    Operator::Nin,
];

/// Decodes a raw filter value into an operator expression.
///
/// The value is scanned left to right and cut at every occurrence of a
/// recognized `<operator>:` token; the text between two cuts is the operand
/// of the earlier operator. `in` and `nin` are mutually exclusive per
/// expression: when `nin:` occurs anywhere in the value, `in` is not
/// recognized at all. Each cut leaves a stray trailing character (the `:`
/// separating an operand from the next operator) on every operand except the
/// last, which is trimmed off. A repeated operator keeps its last operand.
///
/// Chained example: `gte:10:lt:20` decodes to `{gte: "10", lt: "20"}`.
pub fn decode(raw: &str) -> BTreeMap<Operator, Operand> {
    // `in` and `nin` are mutually exclusive; `nin:` anywhere wins.
    let eighth = if raw.contains(Operator::Nin.token()) {
        Operator::Nin
    } else {
        Operator::In
    };
    let recognized = [
        Operator::Eq,
        Operator::Ne,
        Operator::Gt,
        Operator::Gte,
        Operator::Lt,
        Operator::Lte,
        Operator::Regex,
        eighth,
    ];

    // Every (position, operator) where a recognized token starts. A matched
    // token is consumed whole, so the `in:` inside `nin:` never double-fires.
    let mut cuts: Vec<(usize, Operator)> = Vec::new();
    let mut pos = 0;
    while pos < raw.len() {
        match recognized
            .iter()
            .copied()
            .find(|op| raw[pos..].starts_with(op.token()))
        {
            Some(op) => {
                cuts.push((pos, op));
                pos += op.token().len();
            }
            None => {
                pos += raw[pos..].chars().next().map_or(1, char::len_utf8);
            }
        }
    }

    let mut decoded = BTreeMap::new();
    for (index, (start, op)) in cuts.iter().enumerate() {
        let operand_start = start + op.token().len();
        let operand_end = cuts
            .get(index + 1)
            .map_or(raw.len(), |(next_start, _)| *next_start);
        let mut operand = &raw[operand_start..operand_end];

        // Segment boundaries leave a stray trailing character on all but the
        // final piece.
        if index + 1 < cuts.len() {
            let mut chars = operand.chars();
            chars.next_back();
            operand = chars.as_str();
        }

        decoded.insert(
            *op,
            match op {
                Operator::In | Operator::Nin => {
                    Operand::List(operand.split(',').map(str::to_string).collect())
                }
                _ => Operand::Value(operand.to_string()),
            },
        );
    }

    decoded
}

/// Serializes the non-filter portion of a conformed query back into a query
/// string for link generation.
///
/// Non-null fields are joined as `key=value` pairs with `&` in the fixed
/// order sort, projection, limit, page. The filter is never included. The
/// output is stable, so conform-then-serialize round-trips the reserved
/// parameters byte for byte.
pub fn serialize(query: &ConformedQuery) -> String {
    let mut parts = Vec::with_capacity(4);

    if let Some(sort) = &query.sort {
        parts.push(format!("sort={sort}"));
    }
    if let Some(projection) = &query.projection {
        parts.push(format!("projection={projection}"));
    }
    parts.push(format!("limit={}", query.limit));
    parts.push(format!("page={}", query.page));

    parts.join("&")
}
