use pretty_assertions::assert_eq;
use tests::{builder, models::User, prelude::*, setup, sqlite, AuditEvent, AuditLog, ExecLog};

fn event(source: &str, operation: &str, identity: &str) -> AuditEvent {
    AuditEvent {
        source: source.to_string(),
        entity: "User".to_string(),
        operation: operation.to_string(),
        identity: identity.to_string(),
    }
}

#[test]
fn writes_to_audited_sources_emit_events() {
    let log = ExecLog::new();

    let mut builder = builder(&log);
    builder
        .register_source(sqlite("main", 0).audit(true))
        .unwrap()
        .register_source(sqlite("cache", 1))
        .unwrap();
    builder.mapping(User::mapping());
    let db = setup(&builder, &log);

    let (_, events) = AuditLog::capture(|| {
        let mut user = User::new("Ada");
        db.save(&mut user).unwrap();

        user.name = "Ada Lovelace".to_string();
        db.save(&mut user).unwrap();

        db.delete(&user).unwrap();
    });

    assert_eq!(
        events,
        [
            event("main", "insert", "1"),
            event("main", "update", "1"),
            event("main", "delete", "1"),
        ]
    );
}

#[test]
fn reads_are_not_audited() {
    let log = ExecLog::new();

    let mut builder = builder(&log);
    builder
        .register_source(sqlite("main", 0).audit(true))
        .unwrap();
    builder.mapping(User::mapping());
    let db = setup(&builder, &log);

    let (users, events) = AuditLog::capture(|| db.all::<User>(&[]));
    assert_empty!(assert_ok!(users));
    assert_empty!(events);
}
