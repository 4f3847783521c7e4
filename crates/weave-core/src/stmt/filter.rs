use super::{Record, Value};

use std::cmp::Ordering;

/// A single predicate on an entity field, passed to `All`/`Any` reads.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    /// Application-level field name (not the storage column)
    pub field: String,
    pub op: FilterOp,
    pub value: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl Filter {
    pub fn new(field: impl Into<String>, op: FilterOp, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            op,
            value: value.into(),
        }
    }

    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, FilterOp::Eq, value)
    }

    pub fn ne(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, FilterOp::Ne, value)
    }

    pub fn lt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, FilterOp::Lt, value)
    }

    pub fn le(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, FilterOp::Le, value)
    }

    pub fn gt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, FilterOp::Gt, value)
    }

    pub fn ge(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, FilterOp::Ge, value)
    }

    /// Evaluates the predicate against a record's `field` value. Used by
    /// backends that filter in process.
    pub fn matches(&self, record: &Record) -> bool {
        self.op.eval(record.value(&self.field), &self.value)
    }
}

impl FilterOp {
    pub fn eval(self, lhs: &Value, rhs: &Value) -> bool {
        match self {
            FilterOp::Eq => lhs == rhs || lhs.compare(rhs) == Some(Ordering::Equal),
            FilterOp::Ne => !FilterOp::Eq.eval(lhs, rhs),
            FilterOp::Lt => lhs.compare(rhs) == Some(Ordering::Less),
            FilterOp::Le => matches!(lhs.compare(rhs), Some(Ordering::Less | Ordering::Equal)),
            FilterOp::Gt => lhs.compare(rhs) == Some(Ordering::Greater),
            FilterOp::Ge => matches!(
                lhs.compare(rhs),
                Some(Ordering::Greater | Ordering::Equal)
            ),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FilterOp::Eq => "=",
            FilterOp::Ne => "<>",
            FilterOp::Lt => "<",
            FilterOp::Le => "<=",
            FilterOp::Gt => ">",
            FilterOp::Ge => ">=",
        }
    }

    pub fn parse(src: &str) -> Option<FilterOp> {
        Some(match src {
            "=" => FilterOp::Eq,
            "<>" => FilterOp::Ne,
            "<" => FilterOp::Lt,
            "<=" => FilterOp::Le,
            ">" => FilterOp::Gt,
            ">=" => FilterOp::Ge,
            _ => return None,
        })
    }
}
