//! Entities shared by the scenario tests.

use weave::{schema::MappingBuilder, Entity, FromValue, Lazy, Mapping, Record, Result, Value};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
}

impl User {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    /// `user_` with a generated identity, bound to every source.
    pub fn mapping() -> Mapping {
        Self::mapping_builder().build().unwrap()
    }

    pub fn mapping_builder() -> MappingBuilder {
        let mut builder = Mapping::builder("User");
        builder.identity("id").unwrap().auto_increment();
        builder.reference("name");
        builder.reference("email").nullable();
        builder
    }
}

impl Entity for User {
    const NAME: &'static str = "User";

    fn to_record(&self) -> Record {
        Record::new()
            .with("id", self.id)
            .with("name", &self.name)
            .with("email", self.email.clone())
    }

    fn from_record(mut record: Record) -> Result<Self> {
        Ok(Self {
            id: i64::take(&mut record, "id")?,
            name: String::take(&mut record, "name")?,
            email: FromValue::take(&mut record, "email")?,
        })
    }
}

#[derive(Debug, Default)]
pub struct Author {
    pub id: i64,
    pub name: String,
    pub books: Lazy<Vec<Book>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author_id: Option<i64>,
}

impl Author {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    /// `books` is saved and deleted together with the author.
    pub fn mapping() -> Mapping {
        let mut builder = Mapping::builder("Author");
        builder.identity("id").unwrap().auto_increment();
        builder.reference("name");
        builder
            .many_to_one("books", "Book")
            .cascade_on_update()
            .cascade_on_delete();
        builder.build().unwrap()
    }
}

impl Book {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            ..Self::default()
        }
    }

    pub fn mapping() -> Mapping {
        let mut builder = Mapping::builder("Book");
        builder.identity("id").unwrap().auto_increment();
        builder.reference("title");
        builder.map("author", "Author").nullable();
        builder.build().unwrap()
    }
}

impl Entity for Author {
    const NAME: &'static str = "Author";

    fn to_record(&self) -> Record {
        let mut record = Record::new().with("id", self.id).with("name", &self.name);

        // Unloaded collections are left out so their rows are not touched
        if let Some(books) = self.books.get() {
            let books = books.iter().map(|book| book.to_record().into()).collect();
            record.insert("books", Value::list_from_vec(books));
        }

        record
    }

    fn from_record(mut record: Record) -> Result<Self> {
        let books = match record.remove("books") {
            Some(Value::List(items)) => Lazy::loaded(
                items
                    .into_iter()
                    .map(|item| Book::from_record(item.into_record()?))
                    .collect::<Result<_>>()?,
            ),
            _ => Lazy::default(),
        };

        Ok(Self {
            id: i64::take(&mut record, "id")?,
            name: String::take(&mut record, "name")?,
            books,
        })
    }
}

impl Entity for Book {
    const NAME: &'static str = "Book";

    fn to_record(&self) -> Record {
        Record::new()
            .with("id", self.id)
            .with("title", &self.title)
            .with("author_id", self.author_id)
    }

    fn from_record(mut record: Record) -> Result<Self> {
        Ok(Self {
            id: i64::take(&mut record, "id")?,
            title: String::take(&mut record, "title")?,
            author_id: FromValue::take(&mut record, "author_id")?,
        })
    }
}
