/// SQL dialect targeted by a [`Serializer`](super::Serializer).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flavor {
    Postgresql,
    Sqlite,
    Mysql,
}

impl Flavor {
    pub(super) fn quote(self) -> char {
        match self {
            Self::Mysql => '`',
            Self::Postgresql | Self::Sqlite => '"',
        }
    }
}
