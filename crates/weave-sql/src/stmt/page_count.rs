use super::Condition;

/// Number of pages of `page_size` rows, rounded up.
#[derive(Debug, Clone, PartialEq)]
pub struct PageCount {
    pub table: String,
    pub page_size: u64,
    pub filter: Vec<Condition>,
}
