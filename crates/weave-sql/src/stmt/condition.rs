use super::Column;

use weave_core::{stmt::FilterOp, Value};

/// `column <op> value`. Comparing to `Null` with `=`/`<>` renders as
/// `IS NULL`/`IS NOT NULL`.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub column: Column,
    pub op: FilterOp,
    pub value: Value,
}

impl Condition {
    pub fn new(column: Column, op: FilterOp, value: impl Into<Value>) -> Self {
        Self {
            column,
            op,
            value: value.into(),
        }
    }

    pub fn eq(column: Column, value: impl Into<Value>) -> Self {
        Self::new(column, FilterOp::Eq, value)
    }
}
