mod filter;
pub use filter::{Filter, FilterOp};

mod order_by;
pub use order_by::{Direction, OrderBy};

mod record;
pub use record::Record;

mod value;
pub use value::Value;
