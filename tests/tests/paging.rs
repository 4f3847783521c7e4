use pretty_assertions::assert_eq;
use tests::{builder, models::User, prelude::*, setup, sqlite, ExecLog};
use weave::{Db, OrderBy};

fn with_users(log: &ExecLog, count: usize) -> Db {
    let mut builder = builder(log);
    builder.register_source(sqlite("main", 0)).unwrap();
    builder.mapping(User::mapping());
    let db = setup(&builder, log);

    for i in 0..count {
        let mut user = User::new(&format!("user {i}"));
        db.save(&mut user).unwrap();
    }

    db
}

#[test]
fn page_count_rounds_up() {
    let log = ExecLog::new();
    let db = with_users(&log, 101);

    assert_eq!(assert_ok!(db.page_count::<User>(25)), 5);
    assert_eq!(assert_ok!(db.page_count::<User>(101)), 1);
    assert_eq!(assert_ok!(db.page_count::<User>(1000)), 1);
}

#[test]
fn last_page_is_partial() {
    let log = ExecLog::new();
    let db = with_users(&log, 101);

    let page: Vec<User> = assert_ok!(db.paged(25, 4, &[]));
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].id, 101);

    let first: Vec<User> = assert_ok!(db.paged(25, 0, &[]));
    let ids: Vec<_> = first.iter().map(|user| user.id).collect();
    assert_eq!(ids, (1..=25).collect::<Vec<_>>());

    let past_the_end: Vec<User> = assert_ok!(db.paged(25, 5, &[]));
    assert_empty!(past_the_end);
}

#[test]
fn pages_follow_the_requested_order() {
    let log = ExecLog::new();
    let db = with_users(&log, 10);

    let page: Vec<User> = assert_ok!(db.paged(3, 1, &[OrderBy::desc("id")]));
    let ids: Vec<_> = page.iter().map(|user| user.id).collect();
    assert_eq!(ids, [7, 6, 5]);
}

#[test]
fn empty_container_has_no_pages() {
    let log = ExecLog::new();
    let db = with_users(&log, 0);

    assert_eq!(assert_ok!(db.page_count::<User>(25)), 0);
}

#[test]
fn zero_page_size_is_rejected() {
    let log = ExecLog::new();
    let db = with_users(&log, 1);
    log.clear();

    assert!(assert_err!(db.page_count::<User>(0)).is_invalid_argument());
    assert!(assert_err!(db.paged::<User>(0, 0, &[])).is_invalid_argument());
    log.assert_empty();
}
