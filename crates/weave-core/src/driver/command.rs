use crate::stmt::Value;

use std::fmt;

/// One provider-native command with its positional parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    /// Command text, stored procedure name or native verb depending on `kind`
    pub text: String,

    pub kind: CommandKind,

    /// Parameters bound in order
    pub params: Vec<Value>,

    /// The command inserts a row whose key is generated by the store; the
    /// response carries the key.
    pub generates_key: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommandKind {
    /// Command text in the provider's language, e.g. SQL
    #[default]
    Text,

    /// Name of a stored procedure
    StoredProcedure,

    /// A provider-specific verb whose parameters are records
    Native,
}

impl Command {
    pub fn new(text: impl Into<String>, kind: CommandKind) -> Self {
        Self {
            text: text.into(),
            kind,
            params: vec![],
            generates_key: false,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::new(text, CommandKind::Text)
    }

    pub fn native(verb: impl Into<String>) -> Self {
        Self::new(verb, CommandKind::Native)
    }

    pub fn param(mut self, value: impl Into<Value>) -> Self {
        self.params.push(value.into());
        self
    }

    pub fn params(mut self, values: impl IntoIterator<Item = Value>) -> Self {
        self.params.extend(values);
        self
    }

    pub fn generates_key(mut self) -> Self {
        self.generates_key = true;
        self
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Text => "text",
            Self::StoredProcedure => "stored_procedure",
            Self::Native => "native",
        })
    }
}
