use super::Condition;

use weave_core::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct Update {
    pub table: String,
    pub assignments: Vec<(String, Value)>,

    /// Conditions joined with `AND`
    pub filter: Vec<Condition>,
}
