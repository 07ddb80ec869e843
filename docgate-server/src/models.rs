//! The declared schemas.
//!
//! These are the seven entity types the gateway serves. Each registers
//! under its pluralized name, so `skill` answers at
//! `/api/resources/skills` and `skillset` at `/api/resources/skillsets`.
//! `screen` and `skill` carry caller-chosen string ids; every other type
//! gets a store-assigned id.

use docgate_core::error::GatewayResult;
use docgate_core::schema::{FieldKind, Schema, SchemaRegistry};

pub fn registry() -> GatewayResult<SchemaRegistry> {
    SchemaRegistry::builder()
        .register(
            Schema::builder("education")
                .required("icon", FieldKind::String)
                .required("institute", FieldKind::String)
                .required("degree", FieldKind::String)
                .required("start", FieldKind::Date)
                .required("end", FieldKind::Date)
                .required("location", FieldKind::String)
                .required("description", FieldKind::String)
                .build(),
        )
        .register(
            Schema::builder("experience")
                .required("icon", FieldKind::String)
                .required("organization", FieldKind::String)
                .required("position", FieldKind::String)
                .required("start", FieldKind::Date)
                .required("end", FieldKind::Date)
                .required("about", FieldKind::String)
                .required("location", FieldKind::String)
                .optional("achievements", FieldKind::List(Box::new(FieldKind::String)))
                .build(),
        )
        .register(
            Schema::builder("project")
                .required("date", FieldKind::Date)
                .required("title", FieldKind::String)
                .required("description", FieldKind::String)
                .optional("link", FieldKind::Object)
                .optional(
                    "skills",
                    FieldKind::List(Box::new(FieldKind::Reference("skill".to_string()))),
                )
                .required("media", FieldKind::String)
                .required("service", FieldKind::Reference("service".to_string()))
                .build(),
        )
        .register(
            Schema::builder("screen")
                .required("_id", FieldKind::String)
                .optional("header", FieldKind::String)
                .optional("description", FieldKind::String)
                .build(),
        )
        .register(
            Schema::builder("service")
                .required("icon", FieldKind::String)
                .required("title", FieldKind::String)
                .required("description", FieldKind::String)
                .build(),
        )
        .register(
            Schema::builder("skill")
                .required("_id", FieldKind::String)
                .required("title", FieldKind::String)
                .required("level", FieldKind::Number)
                .optional("skillset", FieldKind::Reference("skillset".to_string()))
                .build(),
        )
        .register(
            Schema::builder("skillset")
                .required("title", FieldKind::String)
                .optional(
                    "skills",
                    FieldKind::List(Box::new(FieldKind::Reference("skill".to_string()))),
                )
                .optional("show", FieldKind::Boolean)
                .build(),
        )
        .build()
}
