use pretty_assertions::assert_eq;
use tests::{
    builder,
    models::{Author, Book},
    prelude::*,
    setup, sqlite, ExecLog,
};
use weave::{Db, Filter, Lazy, Mapping, Record, Value};

fn library(log: &ExecLog) -> Db {
    let mut builder = builder(log);
    builder.register_source(sqlite("main", 0)).unwrap();
    builder.mapping(Author::mapping()).mapping(Book::mapping());
    setup(&builder, log)
}

#[test]
fn collection_targets_are_saved_after_their_owner() {
    let log = ExecLog::new();
    let db = library(&log);

    let mut author = Author::new("Le Guin");
    author.books = Lazy::loaded(vec![
        Book::new("The Dispossessed"),
        Book::new("The Lathe of Heaven"),
    ]);
    assert_ok!(db.save(&mut author));

    assert_eq!(author.id, 1);
    let books = assert_some!(author.books.get());
    for (i, book) in books.iter().enumerate() {
        assert_eq!(book.id, i as i64 + 1);
        assert_eq!(book.author_id, Some(1));
    }

    let texts: Vec<_> = log
        .entries()
        .into_iter()
        .map(|entry| entry.command.text)
        .collect();
    assert!(texts[0].starts_with(r#"INSERT INTO "author_""#));
    assert!(texts[1].starts_with(r#"INSERT INTO "book_""#));
    assert!(texts[2].starts_with(r#"INSERT INTO "book_""#));

    let loaded: Vec<Book> = assert_ok!(db.load(&author, "books"));
    assert_eq!(&loaded, books);
}

#[test]
fn unloaded_collections_are_left_alone() {
    let log = ExecLog::new();
    let db = library(&log);

    let mut author = Author::new("Le Guin");
    author.books = Lazy::loaded(vec![Book::new("The Dispossessed")]);
    assert_ok!(db.save(&mut author));

    let mut renamed = Author {
        id: author.id,
        ..Author::new("Ursula K. Le Guin")
    };
    log.clear();
    assert_ok!(db.save(&mut renamed));

    assert_eq!(log.len(), 1);
    assert_eq!(assert_ok!(db.all::<Book>(&[])).len(), 1);
}

#[test]
fn deleting_the_owner_deletes_its_collection() {
    let log = ExecLog::new();
    let db = library(&log);

    let mut author = Author::new("Le Guin");
    author.books = Lazy::loaded(vec![Book::new("A"), Book::new("B")]);
    assert_ok!(db.save(&mut author));

    let mut other = Author::new("Butler");
    other.books = Lazy::loaded(vec![Book::new("Kindred")]);
    assert_ok!(db.save(&mut other));

    assert_ok!(db.delete(&author));

    let remaining: Vec<Book> = assert_ok!(db.all(&[]));
    let titles: Vec<_> = remaining.iter().map(|book| book.title.as_str()).collect();
    assert_eq!(titles, ["Kindred"]);
    assert_none!(assert_ok!(db.any::<Author>(&[Filter::eq("id", author.id)])));
}

fn publishing(log: &ExecLog) -> Db {
    let mut publisher = Mapping::builder("Publisher");
    publisher.identity("id").unwrap().auto_increment();
    publisher.reference("name");
    publisher.many_to_one("titles", "Title").set_null_on_delete();

    let mut title = Mapping::builder("Title");
    title.identity("id").unwrap().auto_increment();
    title.reference("name");
    title.map("publisher", "Publisher").nullable().cascade_on_update();

    let mut builder = builder(log);
    builder.register_source(sqlite("main", 0)).unwrap();
    builder
        .mapping(publisher.build().unwrap())
        .mapping(title.build().unwrap());
    setup(&builder, log)
}

#[test]
fn single_valued_targets_are_saved_before_their_owner() {
    let log = ExecLog::new();
    let db = publishing(&log);

    let mut title = Record::new()
        .with("name", "Earthsea")
        .with("publisher", Record::new().with("name", "Parnassus"));
    assert_ok!(db.save_record("Title", &mut title));

    assert_eq!(
        title.value("publisher"),
        &Value::from(Record::new().with("name", "Parnassus").with("id", 1))
    );
    assert_eq!(title.value("publisher_id"), &Value::I64(1));

    let sources = log.entries();
    assert!(sources[0].command.text.starts_with(r#"INSERT INTO "publisher_""#));
    assert!(sources[1].command.text.starts_with(r#"INSERT INTO "title_""#));

    let publisher = assert_ok!(db.load_property("Title", &title, "publisher"));
    assert_eq!(publisher.len(), 1);
    assert_eq!(publisher[0].value("name"), &Value::from("Parnassus"));
}

#[test]
fn set_null_on_delete_clears_the_reference() {
    let log = ExecLog::new();
    let db = publishing(&log);

    let mut publisher = Record::new().with("name", "Parnassus");
    assert_ok!(db.save_record("Publisher", &mut publisher));

    for name in ["Earthsea", "The Word for World Is Forest"] {
        let mut title = Record::new()
            .with("name", name)
            .with("publisher_id", publisher.value("id").clone());
        assert_ok!(db.save_record("Title", &mut title));
    }

    assert_eq!(
        assert_ok!(db.load_property("Publisher", &publisher, "titles")).len(),
        2
    );

    assert_ok!(db.delete_record("Publisher", &publisher));

    let titles = assert_ok!(db.all_records("Title", &[]));
    assert_eq!(titles.len(), 2);
    for title in titles {
        assert_eq!(title.value("publisher_id"), &Value::Null);
    }
    assert_empty!(assert_ok!(db.all_records("Publisher", &[])));
}

#[test]
fn loading_a_scalar_is_a_mapping_error() {
    let log = ExecLog::new();
    let db = publishing(&log);

    let publisher = Record::new().with("id", 1);
    let err = assert_err!(db.load_property("Publisher", &publisher, "name"));
    assert!(err.is_invalid_mapping());

    let err = assert_err!(db.load_property("Publisher", &publisher, "missing"));
    assert!(err.is_invalid_mapping());
}

#[test]
fn single_valued_targets_are_deleted_before_their_owner() {
    let mut profile = Mapping::builder("Profile");
    profile.identity("id").unwrap().auto_increment();
    profile.reference("bio");

    let mut account = Mapping::builder("Account");
    account.identity("id").unwrap().auto_increment();
    account.reference("login");
    account
        .map("profile", "Profile")
        .cascade_on_update()
        .cascade_on_delete();

    let log = ExecLog::new();
    let mut builder = builder(&log);
    builder.register_source(sqlite("main", 0)).unwrap();
    builder
        .mapping(profile.build().unwrap())
        .mapping(account.build().unwrap());
    let db = setup(&builder, &log);

    let mut account = Record::new()
        .with("login", "ursula")
        .with("profile", Record::new().with("bio", "Writer"));
    assert_ok!(db.save_record("Account", &mut account));
    assert_eq!(account.value("profile_id"), &Value::I64(1));

    log.clear();
    assert_ok!(db.delete_record("Account", &account));

    let texts: Vec<_> = log
        .entries()
        .into_iter()
        .map(|entry| entry.command.text)
        .collect();
    assert_eq!(texts.len(), 2);
    assert!(texts[0].starts_with(r#"DELETE FROM "profile_""#));
    assert!(texts[1].starts_with(r#"DELETE FROM "account_""#));

    assert_empty!(assert_ok!(db.all_records("Profile", &[])));
    assert_empty!(assert_ok!(db.all_records("Account", &[])));
}
