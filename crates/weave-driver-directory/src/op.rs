mod add;
mod count;
mod delete;
mod modify;
mod search;

pub use add::Add;
pub use count::Count;
pub use delete::Delete;
pub use modify::Modify;
pub use search::Search;

use super::{Connection, Store};
use weave_core::{
    driver::{Command, CommandKind, Response},
    Error, Record, Result, Value,
};

/// One native directory operation.
///
/// Requests travel inside a [`Command`]: the verb is the command text and the
/// request body is its single `Record` parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    Search(Search),
    Add(Add),
    Modify(Modify),
    Delete(Delete),
    Count(Count),
}

impl Request {
    pub fn into_command(self) -> Command {
        let (verb, body) = match self {
            Request::Search(op) => ("search", op.into_record()),
            Request::Add(op) => ("add", op.into_record()),
            Request::Modify(op) => ("modify", op.into_record()),
            Request::Delete(op) => ("delete", op.into_record()),
            Request::Count(op) => ("count", op.into_record()),
        };

        Command::native(verb).param(body)
    }

    pub fn from_command(command: &Command) -> Result<Self> {
        if command.kind != CommandKind::Native {
            return Err(Error::unsupported_feature(format!(
                "{} commands on a directory source",
                command.kind
            )));
        }

        let [Value::Record(body)] = command.params.as_slice() else {
            return Err(malformed(&command.text, "expected a single record parameter"));
        };

        Ok(match command.text.as_str() {
            "search" => Request::Search(Search::from_record(body)?),
            "add" => Request::Add(Add::from_record(body)?),
            "modify" => Request::Modify(Modify::from_record(body)?),
            "delete" => Request::Delete(Delete::from_record(body)?),
            "count" => Request::Count(Count::from_record(body)?),
            verb => {
                return Err(Error::unsupported_feature(format!(
                    "directory verb `{verb}`"
                )))
            }
        })
    }
}

impl From<Search> for Request {
    fn from(value: Search) -> Self {
        Request::Search(value)
    }
}

impl From<Add> for Request {
    fn from(value: Add) -> Self {
        Request::Add(value)
    }
}

impl From<Modify> for Request {
    fn from(value: Modify) -> Self {
        Request::Modify(value)
    }
}

impl From<Delete> for Request {
    fn from(value: Delete) -> Self {
        Request::Delete(value)
    }
}

impl From<Count> for Request {
    fn from(value: Count) -> Self {
        Request::Count(value)
    }
}

impl Connection {
    pub(crate) fn apply(&self, store: &mut Store, request: Request) -> Result<Response> {
        match request {
            Request::Search(op) => self.exec_search(store, op),
            Request::Add(op) => self.exec_add(store, op),
            Request::Modify(op) => self.exec_modify(store, op),
            Request::Delete(op) => self.exec_delete(store, op),
            Request::Count(op) => self.exec_count(store, op),
        }
    }
}

fn malformed(verb: &str, reason: &str) -> Error {
    Error::invalid_argument(format!("malformed directory `{verb}` request: {reason}"))
}

fn string(body: &Record, verb: &str, field: &str) -> Result<String> {
    body.value(field)
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| malformed(verb, &format!("`{field}` must be a string")))
}

fn record(body: &Record, verb: &str, field: &str) -> Result<Record> {
    body.value(field)
        .as_record()
        .cloned()
        .ok_or_else(|| malformed(verb, &format!("`{field}` must be a record")))
}

fn list<'a>(body: &'a Record, verb: &str, field: &str) -> Result<&'a [Value]> {
    match body.value(field) {
        Value::Null => Ok(&[]),
        value => value
            .as_list()
            .ok_or_else(|| malformed(verb, &format!("`{field}` must be a list"))),
    }
}

fn optional_u64(body: &Record, verb: &str, field: &str) -> Result<Option<u64>> {
    match body.value(field) {
        Value::Null => Ok(None),
        Value::I64(value) if *value >= 0 => Ok(Some(*value as u64)),
        _ => Err(malformed(
            verb,
            &format!("`{field}` must be a non-negative integer"),
        )),
    }
}

fn u64_value(value: u64) -> Value {
    Value::I64(i64::try_from(value).unwrap_or(i64::MAX))
}
