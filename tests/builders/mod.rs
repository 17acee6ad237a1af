// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg(test)]

use anyhow::Result;
use tyck::*;

use std::thread;

#[test]
fn chain_calls_never_change_the_receiver() -> Result<()> {
    let base = string().min(1);
    let before = base.constraints().clone();

    let _ = base.max(5);
    let _ = base.pattern("^[a-z]+$");
    let _ = base.email();
    let _ = base.default("x");
    let _ = base.alias("other");
    let _ = base.strip();

    assert_eq!(base.constraints(), &before);
    assert!(base.metadata().is_required());
    assert!(base.metadata().alias.is_none());
    assert!(base.hooks().is_empty());

    let n = number();
    let _ = n.range(1, 2).positive().finite().multiple_of(3);
    assert!(n.constraints().is_empty());
    assert!(n.hooks().is_empty());
    Ok(())
}

#[test]
fn last_write_wins() -> Result<()> {
    let once = string().min(5);
    let twice = string().min(2).min(5);
    assert_eq!(once.constraints(), twice.constraints());
    assert_eq!(twice.constraints().min_length(), Some(5));
    Ok(())
}

#[test]
fn min_max_scenario() -> Result<()> {
    let schema = model("BuilderScenario")
        .field("code", string().min(2).max(5))
        .build()?;

    assert!(schema.validate(&Value::object([("code", "ABC")])).is_ok());
    assert!(schema.validate(&Value::object([("code", "A")])).is_err());
    assert!(schema.validate(&Value::object([("code", "ABCDEF")])).is_err());
    Ok(())
}

#[test]
fn unique_scenario() -> Result<()> {
    let schema = model("UniqueScenario")
        .field("tags", array(string()).unique())
        .build()?;

    let tags = |items: &[&str]| {
        Value::object([(
            "tags",
            Value::from(items.iter().map(|s| Value::from(*s)).collect::<Vec<_>>()),
        )])
    };
    assert!(schema.validate(&tags(&["a", "b"])).is_ok());
    assert!(schema.validate(&tags(&["a", "a", "b"])).is_err());
    Ok(())
}

#[test]
fn finite_scenario() -> Result<()> {
    let schema = model("FiniteScenario")
        .field("x", number().finite())
        .build()?;

    assert!(schema.validate(&Value::object([("x", 1.5)])).is_ok());
    let errors = schema
        .validate(&Value::object([("x", f64::INFINITY)]))
        .unwrap_err();
    assert_eq!(errors.paths(), vec!["x"]);
    Ok(())
}

#[test]
fn one_builder_many_schemas() -> Result<()> {
    let email = string().email().max(64);
    let a = model("SharedBuilderA").field("email", &email).build()?;
    let b = model("SharedBuilderB")
        .field("contact", &email)
        .field("backup", email.optional())
        .build()?;

    assert_eq!(a.field("email").map(|f| &f.constraints), Some(email.constraints()));
    assert_eq!(
        b.field("contact").map(|f| &f.constraints),
        Some(email.constraints())
    );
    assert!(b.field("backup").is_some_and(|f| !f.is_required()));
    assert!(email.metadata().is_required());
    Ok(())
}

#[test]
fn builders_are_shared_across_threads() -> Result<()> {
    let shared = integer().gte(0);
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let builder = shared.clone();
            thread::spawn(move || {
                model(&format!("ThreadedSchema{i}"))
                    .field("n", builder.lte(i))
                    .build()
                    .map(|s| s.field_names().len())
            })
        })
        .collect();

    for handle in handles {
        let fields = handle.join().map_err(|_| anyhow::anyhow!("thread panicked"))??;
        assert_eq!(fields, 1);
    }
    assert!(shared.constraints().le().is_none());
    Ok(())
}

#[test]
fn containers_hold_children_by_reference() -> Result<()> {
    let item = string().min(2);
    let list = array(&item).max(3);
    let longer = list.max(10);

    assert_eq!(list.constraints().max_length(), Some(3));
    assert_eq!(longer.constraints().max_length(), Some(10));
    assert!(matches!(list.item(), FieldDefinition::Builder(_)));
    assert_eq!(item.constraints().min_length(), Some(2));
    Ok(())
}
