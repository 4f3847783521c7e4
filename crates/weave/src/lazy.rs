use crate::Result;

use std::{fmt, sync::OnceLock};

/// An association value materialized on first access.
///
/// The first successful [`get_or_load`](Lazy::get_or_load) stores the loaded
/// value; later reads return it without loading again. A failed load leaves
/// the cell empty.
pub struct Lazy<T> {
    value: OnceLock<T>,
}

impl<T> Lazy<T> {
    pub const fn new() -> Self {
        Self {
            value: OnceLock::new(),
        }
    }

    /// A cell already holding `value`.
    pub fn loaded(value: T) -> Self {
        Self {
            value: OnceLock::from(value),
        }
    }

    pub fn get(&self) -> Option<&T> {
        self.value.get()
    }

    pub fn is_loaded(&self) -> bool {
        self.value.get().is_some()
    }

    pub fn get_or_load(&self, load: impl FnOnce() -> Result<T>) -> Result<&T> {
        if let Some(value) = self.value.get() {
            return Ok(value);
        }

        let value = load()?;
        Ok(self.value.get_or_init(|| value))
    }

    pub fn set(&mut self, value: T) {
        self.value = OnceLock::from(value);
    }

    pub fn take(&mut self) -> Option<T> {
        self.value.take()
    }
}

impl<T> Default for Lazy<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for Lazy<T> {
    fn clone(&self) -> Self {
        match self.value.get() {
            Some(value) => Self::loaded(value.clone()),
            None => Self::new(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Lazy<T> {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value.get() {
            Some(value) => value.fmt(fmt),
            None => write!(fmt, "<not loaded>"),
        }
    }
}
