use super::{flatten, primary, run_dynamic};
use crate::{
    db::{Binding, Shared},
    Record, Result, Value,
};

use indexmap::{map::Entry, IndexMap};
use weave_core::{
    driver::{Batch, Generator},
    Error, Mapping,
};

/// Runs one read on every readable source bound to `entity` and merges the
/// results by identity. Fields missing from a record are filled from the
/// next source in order, so lower-order sources take precedence.
pub(crate) fn read(
    shared: &Shared,
    entity: &str,
    operation: &str,
    limit: Option<u64>,
    f: impl Fn(&dyn Generator) -> Result<Batch>,
) -> Result<Vec<Record>> {
    let bindings = shared.bindings(entity)?;
    let mapping = primary(shared, entity)?;

    merge(bindings, entity, operation, mapping, limit, |binding| {
        f(binding.generator())
    })
}

/// Largest page count reported by any readable source.
pub(crate) fn page_count(shared: &Shared, entity: &str, page_size: u64) -> Result<u64> {
    let mut pages = 0;

    for binding in readable(shared.bindings(entity)?, entity) {
        let batch = binding.generator().page_count(page_size)?;

        let value = run_dynamic(binding, entity, "page_count", batch)?
            .into_iter()
            .next()
            .and_then(|record| record.into_iter().next())
            .map(|(_, value)| value)
            .unwrap_or_default();

        let count = match value {
            Value::Null => 0,
            Value::I64(count) if count >= 0 => count as u64,
            other => return Err(Error::type_conversion(other, "u64")),
        };

        pages = pages.max(count);
    }

    Ok(pages)
}

/// Materializes the targets of one association of `record`.
pub(crate) fn load(
    shared: &Shared,
    entity: &str,
    record: &Record,
    property: &str,
) -> Result<Vec<Record>> {
    let bindings = shared.bindings(entity)?;
    let mapping = primary(shared, entity)?;

    let declared = mapping.property(property).ok_or_else(|| {
        Error::invalid_mapping(format!("`{entity}` has no property `{property}`"))
    })?;

    let target = declared.target().ok_or_else(|| {
        Error::invalid_mapping(format!("`{entity}::{property}` is not an association"))
    })?;

    let mut owner = record.clone();
    flatten(shared, mapping, &mut owner)?;

    let limit = (!declared.is_collection()).then_some(1);

    merge(
        bindings,
        entity,
        "load_property",
        primary(shared, target)?,
        limit,
        |binding| match binding.mapping().property(property) {
            Some(property) => binding.generator().load_property(&owner, property),
            None => Ok(binding.generator().source().batch()),
        },
    )
}

fn readable<'a>(bindings: &'a [Binding], entity: &'a str) -> impl Iterator<Item = &'a Binding> {
    bindings.iter().filter(move |binding| {
        let readable = binding.source().readable;
        if !readable {
            tracing::debug!(
                source = binding.source_name(),
                entity,
                "source is not readable; skipping"
            );
        }
        readable
    })
}

/// `key` supplies the identity records are merged by.
fn merge(
    bindings: &[Binding],
    entity: &str,
    operation: &str,
    key: &Mapping,
    limit: Option<u64>,
    batch: impl Fn(&Binding) -> Result<Batch>,
) -> Result<Vec<Record>> {
    let mut keyed: IndexMap<Value, Record> = IndexMap::new();
    let mut unkeyed = vec![];

    for binding in readable(bindings, entity) {
        for record in run_dynamic(binding, entity, operation, batch(binding)?)? {
            let identity = key.identity_value(&record).clone();

            if identity.is_default() {
                unkeyed.push(record);
                continue;
            }

            match keyed.entry(identity) {
                Entry::Occupied(mut entry) => entry.get_mut().fill_from(&record),
                Entry::Vacant(entry) => {
                    entry.insert(record);
                }
            }
        }
    }

    let mut records: Vec<_> = keyed.into_values().chain(unkeyed).collect();

    if let Some(limit) = limit {
        records.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
    }

    Ok(records)
}
