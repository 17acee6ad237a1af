// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg(test)]

use anyhow::Result;
use serde::Deserialize;
use tyck::*;

#[derive(Debug, Deserialize, PartialEq)]
struct Account {
    id: u32,
    owner: String,
    balance: f64,
    tags: Vec<String>,
}

fn account(name: &str) -> ModelBuilder {
    model(name)
        .field("id", integer().positive())
        .field("owner", field(string().strip().min(1), FieldInfo::new().alias("ownerName")))
        .field("balance", number().gte(0))
        .field("tags", array(string()).default(Value::new_array()))
}

#[test]
fn builder_flags() -> Result<()> {
    let schema = account("ModelFlags")
        .frozen()
        .strict()
        .extra(Extra::Forbid)
        .validate_assignment()
        .populate_by_name()
        .use_enum_values()
        .build()?;

    let config = schema.config();
    assert!(config.is_frozen());
    assert!(config.is_strict());
    assert_eq!(config.extra_policy(), Extra::Forbid);
    assert!(config.validates_assignment());
    assert!(config.allows_population_by_name());
    assert!(config.uses_enum_values());
    assert!(!config.validates_default());
    Ok(())
}

#[test]
fn later_config_replaces_earlier_options() -> Result<()> {
    let schema = account("ModelConfigOrder")
        .frozen()
        .config(Config::new().frozen(false).extra(Extra::Allow))
        .strict()
        .build()?;

    assert!(!schema.config().is_frozen());
    assert!(schema.config().is_strict());
    assert_eq!(schema.config().extra_policy(), Extra::Allow);
    Ok(())
}

#[test]
fn field_info_sets_metadata() -> Result<()> {
    let schema = model("ModelFieldInfo")
        .field(
            "score",
            field(
                integer().description("kept"),
                FieldInfo::new()
                    .title("Score")
                    .examples([10, 20])
                    .deprecated(true)
                    .default(0),
            ),
        )
        .build()?;

    let score = schema.field("score").map(|f| &f.meta);
    assert_eq!(score.and_then(|m| m.title.as_deref()), Some("Score"));
    assert_eq!(score.and_then(|m| m.description.as_deref()), Some("kept"));
    assert_eq!(
        score.and_then(|m| m.examples.clone()),
        Some(vec![Value::from(10), Value::from(20)])
    );
    assert!(score.is_some_and(|m| m.deprecated));
    assert_eq!(
        schema.field("score").and_then(|f| f.default_value()),
        Some(&Value::from(0))
    );
    Ok(())
}

#[test]
fn instances_map_onto_serde_types() -> Result<()> {
    let schema = account("ModelDeserialize").build()?;
    let instance = schema.validate_json_str(
        r#"{"id": 7, "ownerName": "  Ada ", "balance": 10, "tags": ["a"]}"#,
    )?;

    let account: Account = instance.deserialize()?;
    assert_eq!(
        account,
        Account {
            id: 7,
            owner: "Ada".to_string(),
            balance: 10.0,
            tags: vec!["a".to_string()],
        }
    );
    Ok(())
}

#[test]
fn json_and_yaml_inputs_agree() -> Result<()> {
    let schema = account("ModelFormats").build()?;

    let from_json =
        schema.validate_json_str(r#"{"id": 1, "ownerName": "Ada", "balance": 2.5}"#)?;
    let from_yaml = schema.validate_yaml_str("id: 1\nownerName: Ada\nbalance: 2.5\n")?;
    assert_eq!(from_json, from_yaml);
    assert_eq!(from_yaml.get("tags"), Some(&Value::new_array()));

    assert!(schema.validate_json_str("[1, 2]").is_err());
    assert!(schema.validate_yaml_str("id: [").is_err());
    Ok(())
}

#[test]
fn serialization_by_name_and_alias() -> Result<()> {
    let schema = account("ModelSerialize").build()?;
    let instance = schema.validate(&Value::from_json_str(
        r#"{"id": 1, "ownerName": "Ada", "balance": 0, "tags": []}"#,
    )?)?;

    let by_name = Value::from_json_str(&instance.to_json_str()?)?;
    assert_eq!(by_name["owner"], Value::from("Ada"));
    assert_eq!(by_name["ownerName"], Value::Undefined);

    let by_alias = Value::from_json_str(&instance.to_json_str_by_alias()?)?;
    assert_eq!(by_alias["ownerName"], Value::from("Ada"));
    assert_eq!(by_alias, instance.to_value_by_alias());

    let yaml = Value::from_yaml_str(&instance.to_yaml_str()?)?;
    assert_eq!(yaml, instance.to_value());

    assert!(instance.to_string().starts_with("ModelSerialize(id=1, owner=\"Ada\""));
    Ok(())
}

#[test]
fn config_from_documents() -> Result<()> {
    let from_json = Config::from_json_str(r#"{"strict": true, "extra": "forbid"}"#)?;
    let from_yaml = Config::from_yaml_str("strict: true\nextra: forbid\n")?;
    assert_eq!(from_json, from_yaml);
    assert_eq!(from_json, Config::new().strict(true).extra(Extra::Forbid));

    assert!(Config::from_json_str(r#"{"stict": true}"#).is_err());
    assert!(Config::from_yaml_str("extra: sometimes\n").is_err());

    let schema = account("ModelDocumentConfig").config(from_yaml).build()?;
    let errors = schema
        .validate_json_str(r#"{"id": "1", "ownerName": "Ada", "balance": 1, "x": 0}"#)
        .unwrap_err()
        .downcast::<ValidationErrors>()?;
    assert_eq!(errors.paths(), vec!["id", "x"]);
    Ok(())
}

#[test]
fn frozen_instances_reject_assignment() -> Result<()> {
    let schema = account("ModelFrozen").frozen().build()?;
    let mut instance =
        schema.validate_json_str(r#"{"id": 1, "ownerName": "Ada", "balance": 1}"#)?;

    let e = instance.set("balance", 5).unwrap_err();
    assert_eq!(
        e,
        AssignmentError::Frozen {
            schema: "ModelFrozen".into(),
            field: "balance".into(),
        }
    );
    assert_eq!(instance.get("balance"), Some(&Value::from(1.0)));
    Ok(())
}

#[test]
fn validated_assignment() -> Result<()> {
    let schema = account("ModelAssignment").validate_assignment().build()?;
    let mut instance =
        schema.validate_json_str(r#"{"id": 1, "ownerName": "Ada", "balance": 1}"#)?;

    instance.set("owner", "  Grace ")?;
    assert_eq!(instance.get("owner"), Some(&Value::from("Grace")));

    let e = instance.set("balance", -1).unwrap_err();
    let AssignmentError::Invalid(errors) = e else {
        panic!("Expected a validation failure");
    };
    assert_eq!(errors.paths(), vec!["balance"]);
    assert_eq!(instance.get("balance"), Some(&Value::from(1.0)));

    assert!(matches!(
        instance.set("missing", 1),
        Err(AssignmentError::UnknownField { .. })
    ));
    Ok(())
}

#[test]
fn nested_models() -> Result<()> {
    let line = model("ModelLine")
        .field("sku", string().pattern("^[A-Z]{3}-[0-9]+$"))
        .field("qty", integer().gte(1))
        .build()?;
    let order = model("ModelOrder")
        .field("lines", array(&line).min(1))
        .field("note", optional(string().max(10)))
        .build()?;

    let instance = order.validate_yaml_str("lines:\n  - sku: ABC-1\n    qty: 2\n")?;
    assert_eq!(instance.get("note"), Some(&Value::Null));
    assert_eq!(instance.get("lines").map(|v| v[0]["qty"].clone()), Some(Value::from(2)));

    let errors = order
        .validate_yaml_str("lines:\n  - sku: abc\n    qty: 0\nnote: far too long a note\n")
        .unwrap_err()
        .downcast::<ValidationErrors>()?;
    assert_eq!(errors.paths(), vec!["lines[0].sku", "lines[0].qty", "note"]);
    assert_eq!(errors.schema(), "ModelOrder");
    Ok(())
}
