use tests::{builder, models::User, prelude::*, setup, sqlite, ExecLog};
use weave::Db;

fn assert_sync_send<T: Send + Sync>(_: T) {}

#[test]
fn db_is_sync_send() {
    let log = ExecLog::new();

    let mut builder = builder(&log);
    builder.register_source(sqlite("main", 0)).unwrap();
    builder.mapping(User::mapping());
    let db = setup(&builder, &log);

    assert_sync_send(db.clone());

    // Clones share one context
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let db: Db = db.clone();
            std::thread::spawn(move || {
                let mut user = User::new(&format!("user {i}"));
                db.save(&mut user).unwrap();
                user.id
            })
        })
        .collect();

    let mut ids: Vec<_> = handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .collect();
    ids.sort();

    assert_unique!(ids);
    assert_eq!(assert_ok!(db.all::<User>(&[])).len(), 4);
}
