use crate::{Error, Record, Result, Value};

/// An application type persisted through one or more mappings.
///
/// Implementations convert between the typed instance and its dynamic
/// [`Record`] form. `from_record` must accept records carrying extra fields,
/// e.g. flattened foreign reference columns.
pub trait Entity: Sized {
    /// Entity name the mappings are declared under
    const NAME: &'static str;

    fn to_record(&self) -> Record;

    fn from_record(record: Record) -> Result<Self>;
}

/// Conversion from one field of a dynamic record.
pub trait FromValue: Sized {
    fn from_value(value: Value) -> Result<Self>;

    /// Removes `field` from `record` and converts it. Absent fields read as
    /// `Null`.
    fn take(record: &mut Record, field: &str) -> Result<Self> {
        Self::from_value(record.remove(field).unwrap_or_default())
            .map_err(|err| err.context(crate::err!("field `{field}`")))
    }
}

macro_rules! impl_from_value {
    ( $( $ty:ty ),* ) => {
        $(
            impl FromValue for $ty {
                fn from_value(value: Value) -> Result<Self> {
                    <$ty>::try_from(value)
                }
            }
        )*
    };
}

impl_from_value!(bool, i64, i32, f64, String, Record);

impl FromValue for Value {
    fn from_value(value: Value) -> Result<Self> {
        Ok(value)
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(None),
            value => T::from_value(value).map(Some),
        }
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(vec![]),
            Value::List(items) => items.into_iter().map(T::from_value).collect(),
            other => Err(Error::type_conversion(other, "List")),
        }
    }
}
