/// Ordering clause for paged reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    /// Application-level field name
    pub field: String,
    pub direction: Direction,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl OrderBy {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: Direction::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: Direction::Desc,
        }
    }

    pub fn is_desc(&self) -> bool {
        self.direction == Direction::Desc
    }
}
