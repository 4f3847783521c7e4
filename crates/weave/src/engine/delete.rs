use super::{audit, load, primary, run, save, targets, Failures};
use crate::{db::Shared, Record, Result, Value};

use std::slice;
use weave_core::schema::PropertyKind;

/// Deletes `record` from every writable source bound to `entity`, in
/// descending order.
///
/// Link rows go first, then dependents referencing the record and
/// single-valued targets marked for cascading delete, then the record
/// itself. A source whose link rows could not be removed keeps its row; the
/// other sources carry on and the first failure is returned.
pub(crate) fn delete(shared: &Shared, entity: &str, record: &Record) -> Result<()> {
    let bindings = shared.bindings(entity)?;
    let mapping = primary(shared, entity)?.clone();

    for binding in bindings.iter().filter(|b| !b.source().writable) {
        tracing::debug!(
            source = binding.source_name(),
            entity,
            "source is not writable; skipping"
        );
    }

    let writable = || {
        bindings
            .iter()
            .rev()
            .filter(|binding| binding.source().writable)
    };

    let mut failures = Failures::default();

    for binding in writable().filter(|binding| binding.capability().joins) {
        let res = binding
            .mapping()
            .associations()
            .filter(|property| property.as_many_to_many().is_some())
            .try_for_each(|property| {
                let batch = binding.generator().joins_delete(record, property)?;
                run(binding, entity, "joins_delete", batch).map(|_| ())
            });

        if let Err(err) = res {
            failures.record(binding, entity, err);
        }
    }

    for property in mapping.associations() {
        let PropertyKind::ManyToOne(assoc) = &property.kind else {
            continue;
        };

        let cascade = property.cascade;
        if !cascade.on_delete && !cascade.set_null_on_delete {
            continue;
        }

        let foreign = primary(shared, &assoc.target)?
            .stored_key(assoc.foreign_field())
            .to_string();

        for mut dependent in load(shared, entity, record, &property.name)? {
            if cascade.on_delete {
                delete(shared, &assoc.target, &dependent)?;
            } else {
                dependent.insert(foreign.clone(), Value::Null);
                save(shared, &assoc.target, &mut dependent)?;
            }
        }
    }

    for property in mapping.associations() {
        let PropertyKind::Map(assoc) = &property.kind else {
            continue;
        };

        if !property.cascade.on_delete {
            continue;
        }

        let owned: Vec<Record> = match record.get(&property.name) {
            Some(value) if value.is_record() => targets(value).into_iter().cloned().collect(),
            _ => load(shared, entity, record, &property.name)?,
        };

        for target in &owned {
            delete(shared, &assoc.target, target)?;
        }
    }

    for binding in writable() {
        if failures.contains(binding) {
            continue;
        }

        let batch = match binding.generator().delete(slice::from_ref(record)) {
            Ok(batch) => batch,
            Err(err) => {
                failures.record(binding, entity, err);
                continue;
            }
        };

        if batch.is_empty() {
            tracing::debug!(
                source = binding.source_name(),
                entity,
                "delete not supported by source; skipping"
            );
            continue;
        }

        match run(binding, entity, "delete", batch) {
            Ok(_) => audit(binding, entity, "delete", binding.mapping().identity_value(record)),
            Err(err) => failures.record(binding, entity, err),
        }
    }

    failures.into_result()
}
