use pretty_assertions::assert_eq;
use tests::{
    builder,
    models::{Author, Book},
    prelude::*,
    setup, sqlite, ExecLog,
};
use weave::{Db, Lazy};

fn library(log: &ExecLog) -> Db {
    let mut builder = builder(log);
    builder.register_source(sqlite("main", 0)).unwrap();
    builder.mapping(Author::mapping()).mapping(Book::mapping());
    setup(&builder, log)
}

#[test]
fn association_is_loaded_once() {
    let log = ExecLog::new();
    let db = library(&log);

    let mut author = Author::new("Le Guin");
    author.books = Lazy::loaded(vec![Book::new("The Dispossessed")]);
    assert_ok!(db.save(&mut author));

    let fetched: Author = assert_some!(assert_ok!(db.any(&[])));
    assert!(!fetched.books.is_loaded());
    log.clear();

    let books = assert_ok!(fetched.books.get_or_load(|| db.load(&fetched, "books")));
    assert_eq!(books.len(), 1);
    assert_eq!(books[0].title, "The Dispossessed");
    assert_eq!(log.len(), 1);

    // Served from the cache
    let again = assert_ok!(fetched.books.get_or_load(|| db.load(&fetched, "books")));
    assert_eq!(again.len(), 1);
    assert_eq!(log.len(), 1);
}

#[test]
fn single_valued_load() {
    let log = ExecLog::new();
    let db = library(&log);

    let mut author = Author::new("Le Guin");
    author.books = Lazy::loaded(vec![Book::new("The Dispossessed")]);
    assert_ok!(db.save(&mut author));

    let book: Book = assert_some!(assert_ok!(db.any(&[])));
    let owner: Author = assert_some!(assert_ok!(db.load_one(&book, "author")));
    assert_eq!(owner.id, author.id);
    assert_eq!(owner.name, "Le Guin");

    let orphan = Book::new("Unpublished");
    let none: Option<Author> = assert_ok!(db.load_one(&orphan, "author"));
    assert_none!(none);
}
