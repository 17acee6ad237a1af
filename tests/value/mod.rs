// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg(test)]

use anyhow::Result;
use tyck::*;

#[test]
fn json_round_trip() -> Result<()> {
    let json = r#"{"a":[1,-2,2.5,"x",null,true],"b":{"c":"d"}}"#;
    let value = Value::from_json_str(json)?;

    assert_eq!(value["a"][0], Value::from(1));
    assert_eq!(value["a"][1], Value::from(-2));
    assert_eq!(value["a"][2], Value::from(2.5));
    assert_eq!(value["b"]["c"], Value::from("d"));
    assert_eq!(value["missing"], Value::Undefined);
    assert_eq!(value["a"][10], Value::Undefined);

    assert_eq!(value.to_string(), json);
    Ok(())
}

#[test]
fn numbers_compare_across_representations() -> Result<()> {
    assert_eq!(Value::from(1), Value::from(1.0));
    assert_eq!(Number::from(3u64), Number::from(3i64));
    assert!(Value::from(-1) < Value::from(0.5));
    Ok(())
}

#[test]
fn nan_has_a_total_order() -> Result<()> {
    let nan = Value::from(f64::NAN);
    assert_eq!(nan, Value::from(f64::NAN));
    assert_ne!(nan, Value::from(0));
    assert!(Value::from(f64::INFINITY) < nan);
    assert!(Value::from(u64::MAX) < nan);

    let mut values = vec![nan.clone(), Value::from(2), Value::from(-1.5), Value::from(1)];
    values.sort();
    assert_eq!(
        values,
        vec![Value::from(-1.5), Value::from(1), Value::from(2), nan]
    );
    Ok(())
}

#[test]
fn type_names() -> Result<()> {
    assert_eq!(Value::Null.type_name(), "null");
    assert_eq!(Value::from(1).type_name(), "integer");
    assert_eq!(Value::from(1.5).type_name(), "number");
    assert_eq!(Value::from("s").type_name(), "string");
    assert_eq!(Value::new_array().type_name(), "array");
    assert_eq!(Value::new_object().type_name(), "object");
    Ok(())
}

#[test]
fn object_helper() -> Result<()> {
    let value = Value::object([("b", Value::from(2)), ("a", Value::from(1))]);
    // Keys are ordered.
    assert_eq!(value.to_string(), r#"{"a":1,"b":2}"#);
    assert_eq!(value.as_object()?.len(), 2);
    Ok(())
}

#[test]
fn yaml_values() -> Result<()> {
    let value = Value::from_yaml_str("name: ada\ntags: [a, b]\nage: 36\n")?;
    assert_eq!(value["name"], Value::from("ada"));
    assert_eq!(value["tags"].as_array()?.len(), 2);
    assert_eq!(value["age"], Value::from(36));
    Ok(())
}

#[test]
fn invalid_json_is_an_error() {
    assert!(Value::from_json_str("{").is_err());
}
