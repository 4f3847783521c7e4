use pretty_assertions::assert_eq;
use tests::{builder, models::User, prelude::*, setup, sqlite, ExecLog};
use weave::{Db, Filter, Record, Value};

fn single_source(log: &ExecLog) -> Db {
    let mut builder = builder(log);
    builder.register_source(sqlite("main", 0)).unwrap();
    builder.mapping(User::mapping());
    setup(&builder, log)
}

#[test]
fn save_then_any_by_identity() {
    let log = ExecLog::new();
    let db = single_source(&log);

    let mut user = User {
        email: Some("ada@example.com".to_string()),
        ..User::new("Ada")
    };
    assert_ok!(db.save(&mut user));
    assert_eq!(user.id, 1);

    let found: User = assert_some!(assert_ok!(db.any(&[Filter::eq("id", user.id)])));
    assert_eq!(found, user);
}

#[test]
fn saving_an_assigned_identity_updates() {
    let log = ExecLog::new();
    let db = single_source(&log);

    let mut user = User::new("Ada");
    assert_ok!(db.save(&mut user));
    log.clear();

    user.name = "Ada Lovelace".to_string();
    assert_ok!(db.save(&mut user));

    let entry = log.pop();
    assert_eq!(
        entry.command.text,
        r#"UPDATE "user_" SET "name" = ?1, "email" = ?2 WHERE "id" = ?3;"#
    );
    log.assert_empty();

    let users: Vec<User> = assert_ok!(db.all(&[]));
    assert_eq!(users, [user]);
}

#[test]
fn get_by_identity() {
    let log = ExecLog::new();
    let db = single_source(&log);

    let mut user = User::new("Ada");
    assert_ok!(db.save(&mut user));

    let found: User = assert_ok!(db.get(user.id));
    assert_eq!(found, user);

    let err = assert_err!(db.get::<User>(42));
    assert!(err.is_record_not_found());
    assert_eq!(err.to_string(), "record not found: entity=User identity=42");
}

#[test]
fn update_of_a_missing_row_inserts() {
    let log = ExecLog::new();
    let db = single_source(&log);

    let mut user = User {
        id: 7,
        ..User::new("Grace")
    };
    assert_ok!(db.save(&mut user));

    assert!(log.pop().command.text.starts_with("UPDATE"));
    assert!(log.pop().command.text.starts_with("INSERT"));
    log.assert_empty();

    let found: User = assert_some!(assert_ok!(db.any(&[Filter::eq("id", 7)])));
    assert_eq!(found.name, "Grace");
}

#[test]
fn filters_and_limits() {
    let log = ExecLog::new();
    let db = single_source(&log);

    let mut users: Vec<User> = ["Ada", "Grace", "Barbara"].map(User::new).into();
    assert_ok!(db.save_all(&mut users));

    let ids: Vec<_> = users.iter().map(|user| user.id).collect();
    assert_eq!(ids, [1, 2, 3]);
    assert_unique!(ids);

    let later: Vec<User> = assert_ok!(db.all(&[Filter::gt("id", 1)]));
    assert_eq!(later.len(), 2);

    let named: Vec<User> = assert_ok!(db.all(&[Filter::eq("name", "Grace")]));
    assert_eq!(named, [users[1].clone()]);

    let limited: Vec<User> = assert_ok!(db.all_limit(2, &[]));
    assert_eq!(limited.len(), 2);

    let none: Option<User> = assert_ok!(db.any(&[Filter::eq("name", "Hedy")]));
    assert_none!(none);
}

#[test]
fn delete_removes_the_row() {
    let log = ExecLog::new();
    let db = single_source(&log);

    let mut user = User::new("Ada");
    assert_ok!(db.save(&mut user));
    assert_ok!(db.delete(&user));

    let users: Vec<User> = assert_ok!(db.all(&[]));
    assert_empty!(users);
}

#[test]
fn dynamic_records() {
    let log = ExecLog::new();
    let db = single_source(&log);

    let mut record = Record::new().with("name", "Ada").with("email", Value::Null);
    assert_ok!(db.save_record("User", &mut record));
    assert_eq!(record.value("id"), &Value::I64(1));

    let found = assert_some!(assert_ok!(db.any_record("User", &[Filter::eq("id", 1)])));
    assert_eq!(found, record);

    assert_ok!(db.delete_record("User", &record));
    assert_empty!(assert_ok!(db.all_records("User", &[])));
}

#[test]
fn unmapped_entities_are_lookup_errors() {
    let log = ExecLog::new();
    let db = single_source(&log);

    let err = assert_err!(db.all_records("Invoice", &[]));
    assert!(err.is_unknown_mapping());
    assert_eq!(err.to_string(), "no mapping registered for `Invoice`");

    assert!(assert_err!(db.source("archive")).is_unknown_source());
}
