// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg(test)]

use anyhow::{anyhow, Result};
use tyck::*;

fn profile() -> Result<SchemaType> {
    let address = model("InteropAddress")
        .field("city", string().min(1))
        .field("zip", optional(string().pattern("^[0-9]{5}$")))
        .strict()
        .extra(Extra::Forbid)
        .build()?;

    Ok(model("InteropProfile")
        .field("id", integer().positive())
        .field("name", string().min(1).max(10))
        .field("tags", array(string()).unique().default(Value::new_array()))
        .field("role", literal(["admin", "user"]))
        .field("score", optional(number().range(0, 100)))
        .field("address", &address)
        .field("labels", record(string(), integer().gte(0)).default(Value::new_object()))
        .strict()
        .extra(Extra::Forbid)
        .build()?)
}

// Documents both validators are expected to accept or reject alike.
const DOCUMENTS: &[(&str, bool)] = &[
    (r#"{"id": 1, "name": "Ada", "role": "admin", "address": {"city": "London"}}"#, true),
    (
        r#"{"id": 2, "name": "Grace", "tags": ["a", "b"], "role": "user", "score": 99.5,
            "address": {"city": "Arlington", "zip": "22201"}, "labels": {"x": 1}}"#,
        true,
    ),
    (r#"{"id": 3, "name": "Linus", "role": "user", "score": null, "address": {"city": "H", "zip": null}}"#, true),
    (r#"{"id": 0, "name": "Ada", "role": "admin", "address": {"city": "London"}}"#, false),
    (r#"{"id": "1", "name": "Ada", "role": "admin", "address": {"city": "London"}}"#, false),
    (r#"{"id": 1, "name": "", "role": "admin", "address": {"city": "London"}}"#, false),
    (r#"{"id": 1, "name": "Adalovelace", "role": "admin", "address": {"city": "London"}}"#, false),
    (r#"{"id": 1, "name": "Ada", "tags": ["a", "a"], "role": "admin", "address": {"city": "London"}}"#, false),
    (r#"{"id": 1, "name": "Ada", "role": "root", "address": {"city": "London"}}"#, false),
    (r#"{"id": 1, "name": "Ada", "role": "admin", "score": 101, "address": {"city": "London"}}"#, false),
    (r#"{"id": 1, "name": "Ada", "role": "admin"}"#, false),
    (r#"{"id": 1, "name": "Ada", "role": "admin", "address": {"city": 7}}"#, false),
    (r#"{"id": 1, "name": "Ada", "role": "admin", "address": {"city": "London", "zip": "123"}}"#, false),
    (r#"{"id": 1, "name": "Ada", "role": "admin", "address": {"city": "London", "street": "Main"}}"#, false),
    (r#"{"id": 1, "name": "Ada", "role": "admin", "address": {"city": "London"}, "x": 1}"#, false),
    (r#"{"id": 1, "name": "Ada", "role": "admin", "address": {"city": "London"}, "labels": {"x": -1}}"#, false),
    (r#"[]"#, false),
];

#[test]
fn generated_schema_is_a_valid_json_schema() -> Result<()> {
    let schema = profile()?.json_schema();
    jsonschema::validator_for(&schema).map_err(|e| anyhow!("{e}"))?;
    Ok(())
}

#[test]
fn validators_agree() -> Result<()> {
    let profile = profile()?;
    let validator =
        jsonschema::validator_for(&profile.json_schema()).map_err(|e| anyhow!("{e}"))?;

    for (document, expected) in DOCUMENTS {
        let json: serde_json::Value = serde_json::from_str(document)?;
        let data = Value::from_json_str(document)?;

        let ours = profile.validate(&data).is_ok();
        let theirs = validator.is_valid(&json);
        assert_eq!(ours, *expected, "tyck verdict for {document}");
        assert_eq!(theirs, *expected, "json schema verdict for {document}");
    }
    Ok(())
}

#[test]
fn self_referencing_schemas() -> Result<()> {
    let tree = model("InteropTree")
        .field("value", integer())
        .field("children", array(FieldDefinition::named("InteropTree")).default(Value::new_array()))
        .strict()
        .extra(Extra::Forbid)
        .build()?;
    let validator = jsonschema::validator_for(&tree.json_schema()).map_err(|e| anyhow!("{e}"))?;

    let valid = r#"{"value": 1, "children": [{"value": 2, "children": [{"value": 3}]}]}"#;
    let invalid = r#"{"value": 1, "children": [{"value": 2, "children": [{"value": "3"}]}]}"#;
    for (document, expected) in [(valid, true), (invalid, false)] {
        let json: serde_json::Value = serde_json::from_str(document)?;
        assert_eq!(validator.is_valid(&json), expected);
        assert_eq!(tree.validate(&Value::from_json_str(document)?).is_ok(), expected);
    }
    Ok(())
}

#[test]
fn derived_schemas_describe_themselves() -> Result<()> {
    let profile = profile()?;
    let patch = partial(&omit(&profile, ["id"])?)?;
    let validator = jsonschema::validator_for(&patch.json_schema()).map_err(|e| anyhow!("{e}"))?;

    assert!(patch.json_schema().get("required").is_none());
    for document in [r#"{}"#, r#"{"name": "Ada"}"#, r#"{"name": null}"#] {
        let json: serde_json::Value = serde_json::from_str(document)?;
        assert!(validator.is_valid(&json), "{document}");
        assert!(patch.validate(&Value::from_json_str(document)?).is_ok(), "{document}");
    }

    let json: serde_json::Value = serde_json::from_str(r#"{"id": 1}"#)?;
    assert!(!validator.is_valid(&json));
    assert!(patch.validate(&Value::from_json_str(r#"{"id": 1}"#)?).is_err());
    Ok(())
}
