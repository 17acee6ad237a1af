// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg(test)]

use anyhow::Result;
use tyck::*;

#[test]
fn generated_names_are_deterministic() -> Result<()> {
    let first = interface(fields! {
        "zeta_gen" => string(),
        "alpha_gen" => integer(),
    })?;
    let second = interface(fields! {
        "alpha_gen" => integer().positive(),
        "zeta_gen" => string().min(3),
    })?;

    assert_eq!(first.name(), second.name());
    assert!(first.name().starts_with("Interface_"));
    assert_eq!(first.name().len(), "Interface_".len() + 8);
    assert_eq!(first.name(), &generated_name(["alpha_gen", "zeta_gen"]));

    // Same name, distinct types.
    assert_ne!(first, second);
    assert_eq!(first, first.clone());
    Ok(())
}

#[test]
fn generated_name_of_known_fields() -> Result<()> {
    // sha256("a_b") = 648fa9b3...
    assert_eq!(&*generated_name(["b", "a"]), "Interface_648fa9b3");
    Ok(())
}

#[test]
fn fields_keep_declaration_order() -> Result<()> {
    let schema = Interface::new()
        .name("OrderedFields")
        .field("c", string())
        .field("a", integer())
        .field("b", boolean())
        .build()?;
    assert_eq!(schema.field_names(), vec!["c", "a", "b"]);
    Ok(())
}

#[test]
fn empty_definitions() -> Result<()> {
    let r = Interface::new().name("EmptyRejected").build();
    assert_eq!(
        r.unwrap_err(),
        SchemaError::EmptyDefinition("EmptyRejected".into())
    );

    let schema = Interface::new().name("EmptyAllowed").allow_empty().build()?;
    assert!(schema.fields().is_empty());
    assert!(schema.validate(&Value::new_object()).is_ok());
    Ok(())
}

#[test]
fn duplicate_fields() -> Result<()> {
    let r = Interface::new()
        .name("DuplicateRejected")
        .field("a", string())
        .field("b", string())
        .field("a", integer())
        .build();
    assert_eq!(r.unwrap_err(), SchemaError::DuplicateField("a".into()));

    let schema = Interface::new()
        .name("DuplicateLastWins")
        .field("a", string())
        .field("b", string())
        .field("a", integer())
        .on_collision(Collision::LastWins)
        .build()?;
    assert_eq!(schema.field_names(), vec!["a", "b"]);
    assert_eq!(schema.field("a").map(|f| &f.ty), Some(&Type::Integer));
    Ok(())
}

#[test]
fn invalid_names() -> Result<()> {
    let r = Interface::new().name("   ").field("a", string()).build();
    assert!(matches!(r, Err(SchemaError::InvalidName(_))));
    Ok(())
}

#[test]
fn unrecognized_definitions_abort_synthesis() -> Result<()> {
    let r = Interface::new()
        .name("AbortedSynthesis")
        .field("ok", string())
        .field("bad", FieldDefinition::named("NotARealTypeName"))
        .build();
    let e = r.unwrap_err();
    assert!(matches!(e, SchemaError::UnrecognizedDefinition { .. }));
    assert!(e.to_string().contains("'bad'"));
    Ok(())
}

#[test]
fn mixed_definition_shapes() -> Result<()> {
    let address = model("ShapesAddress").field("city", string()).build()?;
    let schema = interface(fields! {
        "name" => string().min(1),
        "age" => Primitive::Int,
        "home" => &address,
        "tags" => Value::from(vec![Value::from("new")]),
        "score" => FieldDefinition::named("float"),
        "raw" => Field::new(Type::Any),
    })?;

    assert_eq!(schema.field("age").map(|f| &f.ty), Some(&Type::Integer));
    assert_eq!(
        schema.field("home").map(|f| &f.ty),
        Some(&Type::Model(address))
    );
    assert!(schema.field("tags").is_some_and(|f| !f.is_required()));

    let instance = schema.validate(&Value::from_json_str(
        r#"{"name": "Ada", "age": 36, "home": {"city": "London"}, "score": 1, "raw": [1]}"#,
    )?)?;
    assert_eq!(instance.get("tags"), Some(&Value::from(vec![Value::from("new")])));
    assert_eq!(instance.get("score"), Some(&Value::from(1.0)));
    Ok(())
}

#[test]
fn base_schema_is_inherited() -> Result<()> {
    let base = model("InheritBase")
        .field("id", integer())
        .field("kind", string().default("base"))
        .check("id", |v| v != &Value::from(0), Some("id must not be zero"))
        .config(Config::new().extra(Extra::Forbid).frozen(true))
        .build()?;

    let child = Interface::new()
        .name("InheritChild")
        .base(&base)
        .field("kind", string().default("child"))
        .field("label", string())
        .config(Config::new().frozen(false))
        .build()?;

    assert_eq!(child.field_names(), vec!["id", "kind", "label"]);
    assert_eq!(child.parent(), Some(&base));
    assert!(child.is_derived_from(&base));
    assert!(!base.is_derived_from(&child));
    assert_eq!(child.config().extra_policy(), Extra::Forbid);
    assert!(!child.config().is_frozen());

    let instance = child.validate(&Value::from_json_str(r#"{"id": 1, "label": "x"}"#)?)?;
    assert_eq!(instance.get("kind"), Some(&Value::from("child")));

    let errors = child
        .validate(&Value::from_json_str(r#"{"id": 0, "label": "x"}"#)?)
        .unwrap_err();
    assert_eq!(errors.paths(), vec!["id"]);
    Ok(())
}

#[test]
fn docs_and_registry() -> Result<()> {
    let schema = Interface::new()
        .name("RegistryDocumented")
        .doc("Kept on the type")
        .field("a", string())
        .build()?;

    assert_eq!(schema.doc(), Some("Kept on the type"));
    assert_eq!(
        schema::registry::schemas::get("RegistryDocumented"),
        Some(schema.clone())
    );
    assert_eq!(
        schema::registry::schemas::register(schema.clone()),
        Err(SchemaError::AlreadyRegistered("RegistryDocumented".into()))
    );
    Ok(())
}

#[test]
fn validators_and_checks() -> Result<()> {
    let schema = Interface::new()
        .name("InterfaceChecks")
        .field("name", string())
        .check("name", |v| matches!(v, Value::String(s) if !s.contains(' ')), None)
        .validator("name", |v| match v {
            Value::String(s) => Ok(Value::from(s.to_uppercase())),
            _ => Ok(v.clone()),
        })
        .build()?;

    let instance = schema.validate(&Value::object([("name", "ada")]))?;
    assert_eq!(instance.get("name"), Some(&Value::from("ADA")));

    let long = "x ".repeat(40);
    let errors = schema
        .validate(&Value::object([("name", long.as_str())]))
        .unwrap_err();
    let message = errors.errors()[0].to_string();
    assert!(message.contains("Validation failed for field 'name'. Received value: "));
    assert!(message.ends_with("..."));
    Ok(())
}
