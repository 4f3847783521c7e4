use pretty_assertions::assert_eq;
use tests::{builder, models::User, prelude::*, setup, sqlite, ExecLog};
use weave::{Db, Mapping, Value};

fn declared_out_of_order(log: &ExecLog, mapping: Mapping) -> Db {
    let mut builder = builder(log);
    builder
        .register_source(sqlite("c", 2))
        .unwrap()
        .register_source(sqlite("a", 0))
        .unwrap()
        .register_source(sqlite("b", 1))
        .unwrap();
    builder.mapping(mapping);
    setup(&builder, log)
}

#[test]
fn save_visits_sources_by_ascending_order() {
    let log = ExecLog::new();
    let db = declared_out_of_order(&log, User::mapping());

    let mut user = User::new("Ada");
    assert_ok!(db.save(&mut user));

    assert_eq!(log.sources(), ["a", "b", "c"]);
}

#[test]
fn delete_visits_sources_by_descending_order() {
    let log = ExecLog::new();
    let db = declared_out_of_order(&log, User::mapping());

    let mut user = User::new("Ada");
    assert_ok!(db.save(&mut user));
    log.clear();

    assert_ok!(db.delete(&user));

    assert_eq!(log.sources(), ["c", "b", "a"]);
    for entry in log.entries() {
        assert!(entry.command.text.starts_with(r#"DELETE FROM "user_""#));
    }
}

#[test]
fn generated_identity_reaches_later_sources() {
    let log = ExecLog::new();
    let db = declared_out_of_order(&log, User::mapping());

    let mut user = User::new("Ada");
    assert_ok!(db.save(&mut user));
    assert_eq!(user.id, 1);

    let primary = log.pop();
    assert_eq!(primary.source, "a");
    assert!(primary.command.generates_key);
    assert_eq!(
        primary.command.text,
        r#"INSERT INTO "user_" ("name", "email") VALUES (?1, ?2);"#
    );

    for source in ["b", "c"] {
        let entry = log.pop();
        assert_eq!(entry.source, source);
        assert!(!entry.command.generates_key);
        assert_eq!(entry.command.params[0], Value::I64(1));
    }

    log.assert_empty();
}

#[test]
fn mapping_order_overrides_source_order() {
    let mut mapping = User::mapping_builder();
    mapping.source_with_order("a", 5).source("b");

    let log = ExecLog::new();
    let db = declared_out_of_order(&log, mapping.build().unwrap());

    let orders: Vec<_> = assert_ok!(db.bindings("User"))
        .iter()
        .map(|binding| (binding.source_name().to_string(), binding.order()))
        .collect();
    assert_eq!(orders, [("b".to_string(), 1), ("a".to_string(), 5)]);

    let mut user = User::new("Ada");
    assert_ok!(db.save(&mut user));

    assert_eq!(log.sources(), ["b", "a"]);
    assert!(log.commands_for("c").is_empty());
}

#[test]
fn non_writable_sources_are_skipped() {
    let log = ExecLog::new();

    let mut builder = builder(&log);
    builder
        .register_source(sqlite("a", 0))
        .unwrap()
        .register_source(sqlite("b", 1).writable(false))
        .unwrap();
    builder.mapping(User::mapping());
    let db = setup(&builder, &log);

    let mut user = User::new("Ada");
    assert_ok!(db.save(&mut user));
    assert_ok!(db.delete(&user));

    assert_eq!(log.sources(), ["a", "a"]);
}

fn drop_users(db: &Db, source: &str) {
    let binding = assert_some!(assert_ok!(db.bindings("User"))
        .iter()
        .find(|binding| binding.source_name() == source));
    let drop = binding
        .generator()
        .source()
        .batch()
        .add_command(weave::driver::Command::text(r#"DROP TABLE "user_";"#));
    assert_ok!(drop.execute());
}

fn rows_on(db: &Db, source: &str) -> Vec<weave::Record> {
    let binding = assert_some!(assert_ok!(db.bindings("User"))
        .iter()
        .find(|binding| binding.source_name() == source));
    assert_ok!(assert_ok!(binding.generator().all(&[])).execute_dynamic())
}

#[test]
fn failing_source_does_not_stop_later_sources() {
    let log = ExecLog::new();
    let db = declared_out_of_order(&log, User::mapping());

    drop_users(&db, "b");
    log.clear();

    let mut user = User::new("Ada");
    let err = assert_err!(db.save(&mut user));

    assert!(err.is_execution_failed());
    assert_eq!(err.failed_source(), Some("b"));
    assert_eq!(err.failed_operation(), Some("insert"));

    // `b` can be retried on its own with the identity `a` generated
    assert_eq!(log.sources(), ["a", "b", "c"]);
    assert_eq!(user.id, 1);

    for source in ["a", "c"] {
        let rows = rows_on(&db, source);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].value("id"), &Value::I64(1));
        assert_eq!(rows[0].value("name"), &Value::from("Ada"));
    }
}

#[test]
fn failing_source_does_not_stop_the_delete() {
    let log = ExecLog::new();
    let db = declared_out_of_order(&log, User::mapping());

    let mut user = User::new("Ada");
    assert_ok!(db.save(&mut user));

    drop_users(&db, "b");
    log.clear();

    let err = assert_err!(db.delete(&user));
    assert_eq!(err.failed_source(), Some("b"));
    assert_eq!(err.failed_operation(), Some("delete"));

    assert_eq!(log.sources(), ["c", "b", "a"]);
    assert_empty!(rows_on(&db, "a"));
    assert_empty!(rows_on(&db, "c"));
}
