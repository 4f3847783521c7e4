use pretty_assertions::assert_eq;
use tests::{builder, prelude::*, setup, sqlite, ExecLog};
use weave::{Db, Mapping, Record, Value};

fn blog(log: &ExecLog) -> Db {
    let mut post = Mapping::builder("Post");
    post.identity("id").unwrap().auto_increment();
    post.reference("title");
    post.many_to_many("tags", "Tag").cascade_on_update();

    let mut tag = Mapping::builder("Tag");
    tag.identity("name").unwrap();

    let mut builder = builder(log);
    builder.register_source(sqlite("main", 0)).unwrap();
    builder
        .mapping(post.build().unwrap())
        .mapping(tag.build().unwrap());
    setup(&builder, log)
}

fn tags(names: &[&str]) -> Value {
    Value::list_from_vec(
        names
            .iter()
            .map(|name| Record::new().with("name", *name).into())
            .collect(),
    )
}

fn tag_names(db: &Db, post: &Record) -> Vec<String> {
    assert_ok!(db.load_property("Post", post, "tags"))
        .into_iter()
        .map(|tag| tag.value("name").as_str().unwrap().to_string())
        .collect()
}

#[test]
fn links_follow_the_held_targets() {
    let log = ExecLog::new();
    let db = blog(&log);

    let mut post = Record::new()
        .with("title", "Hello")
        .with("tags", tags(&["orm", "rust"]));
    assert_ok!(db.save_record("Post", &mut post));

    assert_eq!(tag_names(&db, &post), ["orm", "rust"]);
    assert_eq!(assert_ok!(db.all_records("Tag", &[])).len(), 2);

    post.insert("tags", tags(&["rust"]));
    assert_ok!(db.save_record("Post", &mut post));
    assert_eq!(tag_names(&db, &post), ["rust"]);
}

#[test]
fn links_of_an_absent_collection_are_kept() {
    let log = ExecLog::new();
    let db = blog(&log);

    let mut post = Record::new()
        .with("title", "Hello")
        .with("tags", tags(&["rust"]));
    assert_ok!(db.save_record("Post", &mut post));

    post.remove("tags");
    post.insert("title", "Hello again");
    assert_ok!(db.save_record("Post", &mut post));

    assert_eq!(tag_names(&db, &post), ["rust"]);
}

#[test]
fn delete_removes_links_before_the_row() {
    let log = ExecLog::new();
    let db = blog(&log);

    let mut post = Record::new()
        .with("title", "Hello")
        .with("tags", tags(&["orm", "rust"]));
    assert_ok!(db.save_record("Post", &mut post));
    log.clear();

    assert_ok!(db.delete_record("Post", &post));

    let texts: Vec<_> = log
        .entries()
        .into_iter()
        .map(|entry| entry.command.text)
        .collect();
    assert_eq!(
        texts,
        [
            r#"DELETE FROM "post_tag_" WHERE "post_id" = ?1;"#,
            r#"DELETE FROM "post_" WHERE "id" = ?1;"#,
        ]
    );

    assert_empty!(tag_names(&db, &post));
    assert_eq!(assert_ok!(db.all_records("Tag", &[])).len(), 2);
}
