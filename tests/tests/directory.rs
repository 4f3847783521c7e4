use pretty_assertions::assert_eq;
use tests::{builder, directory, models::User, prelude::*, setup, sqlite, ExecLog};
use weave::{Filter, Mapping, Record, Value};

#[test]
fn relational_primary_with_directory_replica() {
    let log = ExecLog::new();

    let mut builder = builder(&log);
    builder
        .register_source(sqlite("main", 0))
        .unwrap()
        .register_source(directory("people", 1))
        .unwrap();
    builder.mapping(User::mapping());
    let db = setup(&builder, &log);

    let mut user = User {
        email: Some("ada@example.com".to_string()),
        ..User::new("Ada")
    };
    assert_ok!(db.save(&mut user));

    // The directory names the entry with the identity the relational store
    // generated
    let add = log.commands_for("people").remove(0);
    assert_eq!(add.text, "add");
    let body = assert_some!(add.params[0].as_record());
    assert_eq!(body.value("rdn"), &Value::from("id=1"));

    let users: Vec<User> = assert_ok!(db.all(&[]));
    assert_eq!(users, [user.clone()]);

    assert_ok!(db.delete(&user));
    assert_eq!(log.commands_for("people").last().unwrap().text, "delete");
    assert_empty!(assert_ok!(db.all::<User>(&[])));
}

#[test]
fn directory_only_reads() {
    let log = ExecLog::new();

    let mut builder = builder(&log);
    builder
        .register_source(sqlite("main", 0).readable(false))
        .unwrap()
        .register_source(directory("people", 1))
        .unwrap();
    builder.mapping(User::mapping());
    let db = setup(&builder, &log);

    for name in ["Ada", "Grace", "Barbara"] {
        let mut user = User::new(name);
        assert_ok!(db.save(&mut user));
    }
    log.clear();

    let found: User = assert_some!(assert_ok!(db.any(&[Filter::eq("name", "Grace")])));
    assert_eq!(found.id, 2);
    assert_eq!(found.email, None);
    assert_eq!(log.sources(), ["people"]);

    assert_eq!(assert_ok!(db.page_count::<User>(2)), 2);
}

#[test]
fn directory_entries_need_an_identity() {
    let log = ExecLog::new();

    let mut user = User::mapping_builder();
    user.source("people");

    let mut builder = builder(&log);
    builder.register_source(directory("people", 0)).unwrap();
    builder.mapping(user.build().unwrap());
    let db = setup(&builder, &log);

    let mut record = Record::new().with("name", "Ada");
    let err = assert_err!(db.save_record("User", &mut record));
    assert!(err.is_invalid_argument());
    log.assert_empty();
}

#[test]
fn raw_text_overrides_are_rejected() {
    let log = ExecLog::new();

    let mut user = User::mapping_builder();
    user.all_command(weave::RawCommand::text("SELECT * FROM user_"));

    let mut builder = builder(&log);
    builder.register_source(directory("people", 0)).unwrap();
    builder.mapping(user.build().unwrap());
    let db = setup(&builder, &log);

    let err = assert_err!(db.all_records("User", &[]));
    assert!(err.is_unsupported_feature());
}

#[test]
fn associations_without_joins() {
    let mut team = Mapping::builder("Team");
    team.identity("id").unwrap();
    team.reference("name");
    team.many_to_one("members", "Member").foreign_field("team");

    let mut member = Mapping::builder("Member");
    member.identity("id").unwrap();
    member.reference("name");
    member.map("team", "Team");

    let log = ExecLog::new();
    let mut builder = builder(&log);
    builder.register_source(directory("people", 0)).unwrap();
    builder
        .mapping(team.build().unwrap())
        .mapping(member.build().unwrap());
    let db = setup(&builder, &log);

    let mut team = Record::new().with("id", 1).with("name", "Compilers");
    assert_ok!(db.save_record("Team", &mut team));

    for (id, name) in [(1, "Grace"), (2, "Frances")] {
        let mut member = Record::new()
            .with("id", id)
            .with("name", name)
            .with("team_id", 1);
        assert_ok!(db.save_record("Member", &mut member));
    }

    let members = assert_ok!(db.load_property("Team", &team, "members"));
    assert_eq!(members.len(), 2);

    let owner = assert_ok!(db.load_property("Member", &members[0], "team"));
    assert_eq!(owner, [team]);
}

#[test]
fn bindings_report_provider_capability() {
    let log = ExecLog::new();

    let mut builder = builder(&log);
    builder
        .register_source(sqlite("main", 0))
        .unwrap()
        .register_source(directory("people", 1))
        .unwrap();
    builder.mapping(User::mapping());
    let db = setup(&builder, &log);

    let bindings = assert_ok!(db.bindings("User"));
    let [main, people] = bindings else {
        panic!("expected two bindings, got {}", bindings.len());
    };

    assert_eq!(main.source_name(), "main");
    assert!(main.capability().joins);
    assert!(main.capability().auto_increment);

    assert_eq!(people.source_name(), "people");
    assert!(!people.capability().joins);
    assert!(!people.capability().paging);
}
