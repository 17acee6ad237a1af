// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![allow(clippy::pattern_type_mismatch)]

use crate::config::Extra;
use crate::constraints::Constraint;
use crate::hooks::Check;
use crate::schema::{registry, Field, SchemaType, Type};

use serde_json::{json, Map, Value as JsonValue};

const DRAFT: &str = "https://json-schema.org/draft/2020-12/schema";

/// JSON Schema (draft 2020-12) for `schema`. Nested record types are emitted
/// once under `$defs` and referenced from every use.
pub(super) fn generate(schema: &SchemaType) -> JsonValue {
    let mut defs = Map::new();
    let mut out = object_schema(schema, schema.name(), &mut defs);
    out.insert("$schema".to_string(), json!(DRAFT));
    if !defs.is_empty() {
        out.insert("$defs".to_string(), JsonValue::Object(defs));
    }
    JsonValue::Object(out)
}

fn object_schema(
    schema: &SchemaType,
    root: &str,
    defs: &mut Map<String, JsonValue>,
) -> Map<String, JsonValue> {
    let mut properties = Map::new();
    let mut required = vec![];
    for (name, field) in schema.fields() {
        let key = field.alias().unwrap_or(name);
        properties.insert(key.to_string(), field_schema(field, root, defs));
        if field.is_required() {
            required.push(json!(key));
        }
    }

    let mut out = Map::new();
    out.insert("title".to_string(), json!(schema.name()));
    if let Some(doc) = schema.doc() {
        out.insert("description".to_string(), json!(doc));
    }
    out.insert("type".to_string(), json!("object"));
    out.insert("properties".to_string(), JsonValue::Object(properties));
    if !required.is_empty() {
        out.insert("required".to_string(), JsonValue::Array(required));
    }
    match schema.config().extra_policy() {
        Extra::Forbid => {
            out.insert("additionalProperties".to_string(), json!(false));
        }
        Extra::Allow => {
            out.insert("additionalProperties".to_string(), json!(true));
        }
        Extra::Ignore => (),
    }
    out
}

fn field_schema(field: &Field, root: &str, defs: &mut Map<String, JsonValue>) -> JsonValue {
    let mut out = type_schema(&field.ty, root, defs);

    let sized_keys = match &field.ty {
        Type::String | Type::Bytes => ("minLength", "maxLength"),
        Type::Record { .. } => ("minProperties", "maxProperties"),
        _ => ("minItems", "maxItems"),
    };
    for constraint in field.constraints.iter() {
        let (key, value) = match constraint {
            Constraint::MinLength(n) => (sized_keys.0, json!(n)),
            Constraint::MaxLength(n) => (sized_keys.1, json!(n)),
            Constraint::Pattern(p) => ("pattern", json!(p)),
            Constraint::Format(f) => ("format", json!(f.as_str())),
            Constraint::Gt(n) => ("exclusiveMinimum", json!(n)),
            Constraint::Ge(n) => ("minimum", json!(n)),
            Constraint::Lt(n) => ("exclusiveMaximum", json!(n)),
            Constraint::Le(n) => ("maximum", json!(n)),
            Constraint::MultipleOf(n) => ("multipleOf", json!(n)),
            Constraint::MaxDigits(_) | Constraint::DecimalPlaces(_) | Constraint::Strict(_) => {
                continue
            }
        };
        out.insert(key.to_string(), value);
    }
    if field.hooks.has_check(Check::Unique) {
        out.insert("uniqueItems".to_string(), json!(true));
    }

    let meta = &field.meta;
    if let Some(default) = &meta.default {
        out.insert("default".to_string(), json!(default));
    }
    if let Some(title) = &meta.title {
        out.insert("title".to_string(), json!(title));
    }
    if let Some(description) = &meta.description {
        out.insert("description".to_string(), json!(description));
    }
    if let Some(examples) = &meta.examples {
        out.insert("examples".to_string(), json!(examples));
    }
    if meta.deprecated {
        out.insert("deprecated".to_string(), json!(true));
    }
    JsonValue::Object(out)
}

fn typed(name: &str) -> Map<String, JsonValue> {
    let mut out = Map::new();
    out.insert("type".to_string(), json!(name));
    out
}

fn formatted(format: &str) -> Map<String, JsonValue> {
    let mut out = typed("string");
    out.insert("format".to_string(), json!(format));
    out
}

fn reference(name: &str, root: &str) -> Map<String, JsonValue> {
    let target = if name == root {
        "#".to_string()
    } else {
        format!("#/$defs/{name}")
    };
    let mut out = Map::new();
    out.insert("$ref".to_string(), json!(target));
    out
}

fn type_schema(ty: &Type, root: &str, defs: &mut Map<String, JsonValue>) -> Map<String, JsonValue> {
    match ty {
        Type::Any => Map::new(),
        Type::Null => typed("null"),
        Type::Boolean => typed("boolean"),
        Type::Integer => typed("integer"),
        Type::Number => typed("number"),
        Type::Decimal => {
            let mut out = Map::new();
            out.insert(
                "anyOf".to_string(),
                json!([{ "type": "number" }, { "type": "string" }]),
            );
            out
        }
        Type::String => typed("string"),
        Type::Bytes => formatted("binary"),
        Type::Uuid => formatted("uuid"),
        Type::DateTime => formatted("date-time"),
        Type::Date => formatted("date"),
        Type::Time => formatted("time"),
        Type::Array(item) | Type::Set(item) => {
            let mut out = typed("array");
            out.insert("items".to_string(), field_schema(item, root, defs));
            if matches!(ty, Type::Set(_)) {
                out.insert("uniqueItems".to_string(), json!(true));
            }
            out
        }
        Type::Tuple(items) => {
            let mut out = typed("array");
            let prefix: Vec<JsonValue> = items
                .iter()
                .map(|f| field_schema(f, root, defs))
                .collect();
            out.insert("prefixItems".to_string(), JsonValue::Array(prefix));
            out.insert("minItems".to_string(), json!(items.len()));
            out.insert("maxItems".to_string(), json!(items.len()));
            out
        }
        Type::Record { key, value } => {
            let mut out = typed("object");
            if !key.constraints.is_empty() {
                out.insert("propertyNames".to_string(), field_schema(key, root, defs));
            }
            out.insert(
                "additionalProperties".to_string(),
                field_schema(value, root, defs),
            );
            out
        }
        Type::Union(members) => {
            let mut out = Map::new();
            let any_of: Vec<JsonValue> = members
                .iter()
                .map(|f| field_schema(f, root, defs))
                .collect();
            out.insert("anyOf".to_string(), JsonValue::Array(any_of));
            out
        }
        Type::Literal(values) => {
            let mut out = Map::new();
            match values.as_slice() {
                [single] => out.insert("const".to_string(), json!(single)),
                _ => out.insert("enum".to_string(), json!(values.as_slice())),
            };
            out
        }
        Type::Enum(e) => {
            let mut out = Map::new();
            out.insert("title".to_string(), json!(e.name()));
            out.insert(
                "enum".to_string(),
                JsonValue::Array(e.values().map(|v| json!(v)).collect()),
            );
            out
        }
        Type::Optional(inner) => {
            let mut out = Map::new();
            out.insert(
                "anyOf".to_string(),
                json!([field_schema(inner, root, defs), { "type": "null" }]),
            );
            out
        }
        Type::Model(schema) => {
            add_definition(schema, root, defs);
            reference(schema.name(), root)
        }
        Type::Ref(name) => {
            if name.as_ref() != root {
                if let Some(schema) = registry::schemas::get(name) {
                    add_definition(&schema, root, defs);
                }
            }
            reference(name, root)
        }
    }
}

fn add_definition(schema: &SchemaType, root: &str, defs: &mut Map<String, JsonValue>) {
    let name = schema.name().to_string();
    if name == root || defs.contains_key(&name) {
        return;
    }
    // Placeholder first so that a record reaching itself again stops here.
    defs.insert(name.clone(), JsonValue::Null);
    let body = object_schema(schema, root, defs);
    defs.insert(name, JsonValue::Object(body));
}
