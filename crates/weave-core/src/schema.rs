mod builder;
pub use builder::{MappingBuilder, PropertyBuilder};

pub mod mapping;
pub use mapping::{Mapping, RawCommand, SourceBinding};

mod name;
pub use name::Name;

mod property;
pub use property::{Association, Cascade, JoinTable, Property, PropertyKind};

mod registry;
pub use registry::Schema;
