// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg(test)]

use anyhow::Result;
use tyck::*;

fn user(name: &str) -> Result<SchemaType> {
    Ok(model(name)
        .field("id", integer().positive())
        .field("name", string().min(1).alias("fullName"))
        .field("email", string().email())
        .field("password", string().min(8))
        .check("password", |v| v != &Value::from("password"), None)
        .config(Config::new().extra(Extra::Forbid))
        .build()?)
}

fn data(json: &str) -> Result<Value> {
    Value::from_json_str(json)
}

#[test]
fn pick_subset() -> Result<()> {
    let user = user("AlgebraPickUser")?;
    let picked = pick(&user, ["id", "name"])?;

    assert_eq!(picked.field_names(), vec!["id", "name"]);
    assert_eq!(&**picked.name(), "Pick_AlgebraPickUser");
    assert_eq!(picked.field("id"), user.field("id"));
    assert_eq!(picked.field("name").and_then(|f| f.alias()), Some("fullName"));
    assert_eq!(picked.config(), user.config());
    assert!(picked.validators().is_empty());

    // Requested order wins over source order.
    let reordered = pick(&user, ["email", "id"])?;
    assert_eq!(reordered.field_names(), vec!["email", "id"]);

    // The source is untouched.
    assert_eq!(user.field_names(), vec!["id", "name", "email", "password"]);
    Ok(())
}

#[test]
fn pick_unknown_field() -> Result<()> {
    let user = user("AlgebraPickUnknown")?;
    let e = pick(&user, ["id", "age"]).unwrap_err();
    assert_eq!(
        e,
        SchemaError::UnknownField {
            field: "age".into(),
            schema: "AlgebraPickUnknown".into(),
        }
    );
    assert_eq!(e.to_string(), "Field 'age' not found in model 'AlgebraPickUnknown'");
    Ok(())
}

#[test]
fn omit_ignores_unknown_names() -> Result<()> {
    let user = user("AlgebraOmitUser")?;
    let omitted = omit(&user, ["password", "nickname"])?;

    assert_eq!(omitted.field_names(), vec!["id", "name", "email"]);
    assert_eq!(&**omitted.name(), "Omit_AlgebraOmitUser");
    assert!(omitted.validators().is_empty());

    let kept = omit(&user, ["id"])?;
    assert_eq!(kept.validators().len(), 1);
    assert!(kept.validate(&data(
        r#"{"fullName": "Ada", "email": "ada@example.com", "password": "password"}"#
    )?)
    .is_err());
    Ok(())
}

#[test]
fn pick_and_omit_are_complementary() -> Result<()> {
    let user = user("AlgebraComplement")?;
    let all = user.field_names();
    let subsets: [&[&str]; 4] = [&[], &["id"], &["name", "password"], &["id", "name", "email", "password"]];

    for subset in subsets {
        let picked = pick(&user, subset.iter().copied())?;
        let omitted = omit(&user, subset.iter().copied())?;

        let mut picked_names = picked.field_names();
        picked_names.sort_unstable();
        let mut expected: Vec<&str> = subset.to_vec();
        expected.sort_unstable();
        assert_eq!(picked_names, expected);

        let rest: Vec<&str> = all.iter().copied().filter(|n| !subset.contains(n)).collect();
        assert_eq!(omitted.field_names(), rest);
    }
    Ok(())
}

#[test]
fn partial_accepts_empty_data() -> Result<()> {
    let user = user("AlgebraPartial")?;
    let partial = partial(&user)?;

    assert_eq!(&**partial.name(), "Partial_AlgebraPartial");
    assert!(partial.fields().values().all(|f| !f.is_required()));
    assert!(partial.fields().values().all(|f| f.ty.is_optional()));

    let instance = partial.validate(&Value::new_object())?;
    assert!(instance.values().values().all(Value::is_null));

    // Content constraints still apply to given values.
    let errors = partial.validate(&data(r#"{"id": -1, "password": "short"}"#)?).unwrap_err();
    assert_eq!(errors.paths(), vec!["id", "password"]);

    // Metadata survives.
    assert_eq!(partial.field("name").and_then(|f| f.alias()), Some("fullName"));
    assert!(partial.validate(&data(r#"{"fullName": "Ada"}"#)?).is_ok());
    assert!(partial.validate(&data(r#"{"name": "Ada"}"#)?).is_err());
    Ok(())
}

#[test]
fn partial_does_not_rewrap() -> Result<()> {
    let schema = model("AlgebraAlreadyOptional")
        .field("note", optional(string()))
        .build()?;
    let partial = make_optional(&schema)?;
    assert_eq!(partial.field("note"), schema.field("note"));
    Ok(())
}

#[test]
fn required_reverses_partial() -> Result<()> {
    let user = user("AlgebraRequired")?;
    let restored = required(&partial(&user)?)?;

    assert_eq!(&**restored.name(), "Required_Partial_AlgebraRequired");
    assert!(restored.fields().values().all(Field::is_required));

    let errors = restored.validate(&Value::new_object()).unwrap_err();
    assert_eq!(errors.len(), 4);
    assert!(errors
        .errors()
        .iter()
        .all(|e| matches!(e, ValidationError::MissingRequiredProperty { .. })));

    let valid = r#"{"id": 1, "fullName": "Ada", "email": "ada@example.com", "password": "s3cret-pass"}"#;
    assert!(restored.validate(&data(valid)?).is_ok());
    assert!(user.validate(&data(valid)?).is_ok());

    let invalid = r#"{"id": 0, "fullName": "", "email": "ada", "password": "password"}"#;
    assert_eq!(
        restored.validate(&data(invalid)?).unwrap_err().len(),
        user.validate(&data(invalid)?).unwrap_err().len()
    );
    Ok(())
}

#[test]
fn required_drops_defaults() -> Result<()> {
    let schema = model("AlgebraDefaults")
        .field("role", string().default("member"))
        .field("age", integer())
        .build()?;
    let required = required(&schema)?;

    assert_eq!(required.field("role").and_then(|f| f.default_value()), None);
    assert!(schema.field("role").is_some_and(|f| !f.is_required()));
    assert!(required.validate(&data(r#"{"age": 1}"#)?).is_err());
    Ok(())
}

#[test]
fn extend_adds_and_overrides() -> Result<()> {
    let user = user("AlgebraExtendBase")?;
    let admin = extend(
        &user,
        fields! {
            "level" => integer().range(1, 5),
            "email" => string(),
        },
    )?;

    assert_eq!(&**admin.name(), "Extended_AlgebraExtendBase");
    assert_eq!(
        admin.field_names(),
        vec!["id", "name", "email", "password", "level"]
    );
    assert!(admin.field("email").is_some_and(|f| f.constraints.is_empty()));
    assert_eq!(admin.parent(), Some(&user));
    assert!(admin.is_derived_from(&user));
    assert_eq!(admin.validators().len(), 1);

    let valid = r#"{"id": 1, "fullName": "Ada", "email": "not-an-email", "password": "s3cret-pass", "level": 3}"#;
    assert!(admin.validate(&data(valid)?).is_ok());
    assert!(user.validate(&data(valid)?).is_err());
    Ok(())
}

#[test]
fn extend_replaced_field_drops_base_validators() -> Result<()> {
    let user = user("AlgebraExtendReplace")?;
    let rotated = extend(&user, fields! { "password" => integer() })?;

    assert!(rotated.validators().is_empty());
    assert!(rotated.field("password").is_some_and(|f| f.constraints.is_empty()));

    let instance = rotated.validate(&data(
        r#"{"id": 1, "fullName": "Ada", "email": "ada@example.com", "password": 42}"#,
    )?)?;
    assert_eq!(instance.get("password"), Some(&Value::from(42)));

    let kept = extend(&user, fields! { "level" => integer() })?;
    assert_eq!(kept.validators().len(), 1);
    let errors = kept
        .validate(&data(
            r#"{"id": 1, "fullName": "Ada", "email": "ada@example.com", "password": "password", "level": 1}"#,
        )?)
        .unwrap_err();
    assert_eq!(errors.errors()[0].path(), "password");
    Ok(())
}

#[test]
fn merge_last_definition_wins() -> Result<()> {
    let a = model("AlgebraMergeA")
        .field("x", string().max(3))
        .field("a", integer())
        .config(Config::new().strict(true).extra(Extra::Forbid))
        .build()?;
    let b = model("AlgebraMergeB")
        .field("b", integer())
        .field("x", string().min(5))
        .config(Config::new().extra(Extra::Allow))
        .build()?;

    let merged = merge([&a, &b])?;
    assert_eq!(&**merged.name(), "Merge_AlgebraMergeA_AlgebraMergeB");
    assert_eq!(merged.field_names(), vec!["x", "a", "b"]);
    assert_eq!(merged.field("x"), b.field("x"));
    assert_eq!(merged.config().extra_policy(), Extra::Allow);
    assert!(merged.config().is_strict());

    assert!(merged
        .validate(&data(r#"{"x": "longer", "a": 1, "b": 2}"#)?)
        .is_ok());
    assert!(merged
        .validate(&data(r#"{"x": "abc", "a": 1, "b": 2}"#)?)
        .is_err());
    Ok(())
}

#[test]
fn derive_options() -> Result<()> {
    let user = user("AlgebraOptions")?;
    let public = omit_with(
        &user,
        ["password"],
        DeriveOptions::new()
            .name("PublicUser")
            .config(Config::new().frozen(true)),
    )?;

    assert_eq!(&**public.name(), "PublicUser");
    assert!(public.config().is_frozen());
    assert_eq!(public.config().extra_policy(), Extra::Forbid);
    assert!(public.doc().is_none());

    let named = pick_with(&user, ["id"], DeriveOptions::new().name("JustId"))?;
    assert_eq!(&**named.name(), "JustId");

    let r = partial_with(&user, DeriveOptions::new().name(" "));
    assert!(matches!(r, Err(SchemaError::InvalidName(_))));
    Ok(())
}

#[test]
fn derived_schemas_may_be_empty() -> Result<()> {
    let user = user("AlgebraEmpty")?;
    let nothing = pick(&user, Vec::<&str>::new())?;
    assert!(nothing.fields().is_empty());
    assert!(nothing.validate(&Value::new_object()).is_ok());
    Ok(())
}

#[test]
fn operators_compose() -> Result<()> {
    let user = user("AlgebraCompose")?;
    let update = partial(&omit(&user, ["id"])?)?;
    let patch = update.validate(&data(r#"{"email": "ada@example.com"}"#)?)?;
    assert_eq!(patch.get("email"), Some(&Value::from("ada@example.com")));
    assert_eq!(patch.get("password"), Some(&Value::Null));
    Ok(())
}
