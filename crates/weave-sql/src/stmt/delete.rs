use super::Condition;

#[derive(Debug, Clone, PartialEq)]
pub struct Delete {
    pub table: String,

    /// Conditions joined with `AND`
    pub filter: Vec<Condition>,
}
