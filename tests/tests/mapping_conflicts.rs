use pretty_assertions::assert_eq;
use tests::{builder, models::User, prelude::*, setup, sqlite, ExecLog};
use weave::Mapping;

#[test]
fn first_registered_mapping_wins() {
    let log = ExecLog::new();
    tests::init_tracing();

    let mut people = User::mapping_builder();
    people.table("people").source_with_order("main", 9);

    let mut builder = builder(&log);
    builder.register_source(sqlite("main", 0)).unwrap();
    builder.mapping(User::mapping()).mapping(people.build().unwrap());
    let db = setup(&builder, &log);

    let bindings = assert_ok!(db.bindings("User"));
    assert_eq!(bindings.len(), 1);
    assert_eq!(bindings[0].mapping().table_name, "user_");
    assert_eq!(bindings[0].order(), 0);

    let mut user = User::new("Ada");
    assert_ok!(db.save(&mut user));
    assert!(log.pop().command.text.starts_with(r#"INSERT INTO "user_""#));
}

#[test]
fn later_mappings_fill_other_sources() {
    let log = ExecLog::new();

    let mut primary = User::mapping_builder();
    primary.source("main");

    let mut archive = User::mapping_builder();
    archive.table("archived_user").source("archive");

    let mut builder = builder(&log);
    builder
        .register_source(sqlite("main", 0))
        .unwrap()
        .register_source(sqlite("archive", 1))
        .unwrap();
    builder
        .mapping(primary.build().unwrap())
        .mapping(archive.build().unwrap());
    let db = setup(&builder, &log);

    let tables: Vec<_> = assert_ok!(db.bindings("User"))
        .iter()
        .map(|binding| binding.mapping().table_name.as_str())
        .collect();
    assert_eq!(tables, ["user_", "archived_user"]);

    let mut user = User::new("Ada");
    assert_ok!(db.save(&mut user));

    let archived = log.commands_for("archive").remove(0);
    assert!(archived.text.starts_with(r#"INSERT INTO "archived_user""#));
}

#[test]
fn identity_can_only_be_declared_once() {
    let mut builder = Mapping::builder("User");
    builder.identity("id").unwrap();

    let err = assert_err!(builder.identity("email"));
    assert!(err.is_duplicate_identity());

    let mapping = assert_ok!(builder.build());
    assert_eq!(assert_some!(mapping.identity()).name, "id");
}
