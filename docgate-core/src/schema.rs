//! Schema declarations, the legacy pluralizer, and resource resolution.
//!
//! A [`Schema`] describes one stored entity type: its fields, their types,
//! and which of them are required. Schemas are collected into a
//! [`SchemaRegistry`] once at process start; the registry is immutable
//! afterwards and shared read-only by every request handler. Each schema's
//! resource path is its pluralized name, so registering `skill` exposes
//! `/api/resources/skills`.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::{GatewayError, GatewayResult};

/// The type of a declared field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Number,
    Boolean,
    /// An RFC 3339 date-time string.
    Date,
    /// A reference to another schema by name, stored as an id string.
    Reference(String),
    /// An embedded object, not validated further.
    Object,
    /// A list whose elements all have the given kind.
    List(Box<FieldKind>),
}

impl FieldKind {
    /// Whether a JSON value is compatible with this kind.
    fn accepts(&self, value: &Value) -> bool {
        match self {
            FieldKind::String => value.is_string(),
            FieldKind::Number => value.is_number(),
            FieldKind::Boolean => value.is_boolean(),
            FieldKind::Date => value
                .as_str()
                .is_some_and(|s| chrono::DateTime::parse_from_rfc3339(s).is_ok()),
            FieldKind::Reference(_) => value.is_string(),
            FieldKind::Object => value.is_object(),
            FieldKind::List(element) => value
                .as_array()
                .is_some_and(|items| items.iter().all(|item| element.accepts(item))),
        }
    }
}

/// One declared field: its type and whether a document must carry it.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub kind: FieldKind,
    pub required: bool,
}

/// A named entity type with a field set.
///
/// Built once through [`Schema::builder`]; immutable afterwards.
#[derive(Debug, Clone)]
pub struct Schema {
    name: String,
    collection: String,
    fields: BTreeMap<String, FieldSpec>,
}

impl Schema {
    /// Starts declaring a schema with the given singular name.
    pub fn builder(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder {
            name: name.into(),
            fields: BTreeMap::new(),
        }
    }

    /// The schema's singular name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The pluralized name, which doubles as resource path segment and
    /// store collection name.
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// The declared fields.
    pub fn fields(&self) -> &BTreeMap<String, FieldSpec> {
        &self.fields
    }

    /// Validates a request body against this schema's constraints.
    ///
    /// A required field that is missing (or null), and a present field whose
    /// value is incompatible with its declared type, are both offences. All
    /// offending field names are collected into one
    /// [`GatewayError::Validation`]. Fields the schema does not declare pass
    /// through untouched.
    pub fn validate(&self, body: &Value) -> GatewayResult<()> {
        let Some(object) = body.as_object() else {
            return Err(GatewayError::Validation {
                fields: vec!["_body".to_string()],
            });
        };

        let mut offending = Vec::new();
        for (name, spec) in &self.fields {
            match object.get(name) {
                None | Some(Value::Null) => {
                    if spec.required {
                        offending.push(name.clone());
                    }
                }
                Some(value) => {
                    if !spec.kind.accepts(value) {
                        offending.push(name.clone());
                    }
                }
            }
        }

        if offending.is_empty() {
            Ok(())
        } else {
            Err(GatewayError::Validation { fields: offending })
        }
    }
}

/// Builder for declaring a [`Schema`]'s fields.
pub struct SchemaBuilder {
    name: String,
    fields: BTreeMap<String, FieldSpec>,
}

impl SchemaBuilder {
    /// Declares a required field.
    pub fn required(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.fields
            .insert(name.into(), FieldSpec { kind, required: true });
        self
    }

    /// Declares an optional field.
    pub fn optional(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.fields
            .insert(name.into(), FieldSpec { kind, required: false });
        self
    }

    /// Finalizes the schema, deriving its plural collection name.
    pub fn build(self) -> Schema {
        let collection = pluralize(&self.name);
        Schema {
            name: self.name,
            collection,
            fields: self.fields,
        }
    }
}

/// The process-lifetime mapping of plural resource names to schemas.
///
/// Constructed once at startup and never mutated; handlers share it behind
/// an `Arc`.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    schemas: Vec<Schema>,
}

impl SchemaRegistry {
    /// Starts building a registry.
    pub fn builder() -> SchemaRegistryBuilder {
        SchemaRegistryBuilder { schemas: Vec::new() }
    }

    /// Maps a URL path segment to the schema whose pluralized name matches.
    ///
    /// Exactly one schema matches each registered plural name; a miss is a
    /// [`GatewayError::NotFound`].
    pub fn resolve(&self, path_segment: &str) -> GatewayResult<&Schema> {
        self.schemas
            .iter()
            .find(|schema| schema.collection() == path_segment)
            .ok_or_else(|| GatewayError::NotFound(path_segment.to_string()))
    }

    /// All registered schemas, in registration order.
    pub fn schemas(&self) -> impl Iterator<Item = &Schema> {
        self.schemas.iter()
    }
}

/// Builder enforcing the registration-time invariant that no two schemas
/// pluralize to the same name.
pub struct SchemaRegistryBuilder {
    schemas: Vec<Schema>,
}

impl SchemaRegistryBuilder {
    pub fn register(mut self, schema: Schema) -> Self {
        self.schemas.push(schema);
        self
    }

    pub fn build(self) -> GatewayResult<SchemaRegistry> {
        for (index, schema) in self.schemas.iter().enumerate() {
            if self.schemas[..index]
                .iter()
                .any(|other| other.collection() == schema.collection())
            {
                return Err(GatewayError::Initialization(format!(
                    "schemas {:?} and another both pluralize to {:?}",
                    schema.name(),
                    schema.collection(),
                )));
            }
        }

        Ok(SchemaRegistry { schemas: self.schemas })
    }
}

/// Pluralizes a singular schema name with the legacy rule set.
///
/// Covers the suffix classes schema names can reasonably hit: words already
/// ending in `s` are left alone, sibilant endings take `es`, a consonant
/// followed by `y` becomes `ies`, everything else takes `s`.
pub fn pluralize(word: &str) -> String {
    let lower = word.to_lowercase();

    if lower.ends_with('s') {
        return lower;
    }
    if ["x", "ch", "ss", "sh"]
        .iter()
        .any(|suffix| lower.ends_with(suffix))
    {
        return format!("{lower}es");
    }
    if let Some(stem) = lower.strip_suffix('y') {
        let penultimate = stem.chars().next_back();
        if penultimate.is_some_and(|c| !"aeiouy".contains(c)) {
            return format!("{stem}ies");
        }
    }
    format!("{lower}s")
}
