use super::{audit, flatten, primary, run, run_with_keys, targets_mut, Failures};
use crate::{
    db::{Binding, Shared},
    Record, Result, Value,
};

use std::slice;
use weave_core::{schema::PropertyKind, Mapping};

/// Saves `record` on every writable source bound to `entity`, in ascending
/// order.
///
/// Whether the record is inserted or updated is decided once, from the
/// identity it holds before the save. An identity generated by the first
/// inserting source is written back into the record before later sources
/// are visited.
///
/// A failing source does not stop the others. Associations are only saved
/// once every source has accepted the record, and the first failure is
/// returned.
pub(crate) fn save(shared: &Shared, entity: &str, record: &mut Record) -> Result<()> {
    let bindings = shared.bindings(entity)?;
    let mapping = primary(shared, entity)?.clone();

    // Single-valued targets go first so the owner can reference them
    for property in mapping.associations() {
        let PropertyKind::Map(assoc) = &property.kind else {
            continue;
        };

        if property.cascade.on_update {
            if let Some(Value::Record(target)) = record.get_mut(&property.name) {
                save(shared, &assoc.target, target)?;
            }
        }
    }

    flatten(shared, &mapping, record)?;

    let update = !mapping.identity_value(record).is_default();
    let mut failures = Failures::default();

    for binding in bindings {
        if !binding.source().writable {
            tracing::debug!(
                source = binding.source_name(),
                entity,
                "source is not writable; skipping"
            );
            continue;
        }

        // An earlier source was meant to generate the identity
        if !update
            && !failures.is_empty()
            && !binding.capability().auto_increment
            && mapping.identity_value(record).is_default()
        {
            tracing::debug!(
                source = binding.source_name(),
                entity,
                "no identity was generated; skipping"
            );
            continue;
        }

        let res = if update {
            update_one(binding, entity, record)
        } else {
            insert_one(binding, entity, record)
        };

        if let Err(err) = res {
            failures.record(binding, entity, err);
        }
    }

    if !failures.is_empty() {
        tracing::warn!(entity, "not saving associations after a failed source");
        return failures.into_result();
    }

    save_collections(shared, &mapping, bindings, entity, record)
}

fn insert_one(binding: &Binding, entity: &str, record: &mut Record) -> Result<()> {
    let generator = binding.generator();
    let batch = generator.insert(slice::from_ref(record))?;

    if batch.is_empty() {
        tracing::debug!(
            source = binding.source_name(),
            entity,
            "insert not supported by source; skipping"
        );
        return Ok(());
    }

    let (_, keys) = run_with_keys(binding, entity, "insert", batch)?;
    let mapping = generator.mapping();

    if let (Some(identity), Some(Some(key))) = (mapping.identity(), keys.into_iter().next()) {
        if mapping.identity_value(record).is_default() {
            tracing::debug!(
                source = binding.source_name(),
                entity,
                identity = %key,
                "propagating generated identity"
            );
            record.insert(identity.name.clone(), key);
        }
    }

    audit(binding, entity, "insert", mapping.identity_value(record));
    Ok(())
}

fn update_one(binding: &Binding, entity: &str, record: &mut Record) -> Result<()> {
    let generator = binding.generator();
    let batch = generator.update(slice::from_ref(record))?;

    if batch.is_empty() {
        tracing::debug!(
            source = binding.source_name(),
            entity,
            "update not supported by source; skipping"
        );
        return Ok(());
    }

    if run(binding, entity, "update", batch)? == 0 {
        tracing::debug!(
            source = binding.source_name(),
            entity,
            "update matched no rows; inserting"
        );
        return insert_one(binding, entity, record);
    }

    audit(binding, entity, "update", generator.mapping().identity_value(record));
    Ok(())
}

/// Saves collection targets after their owner, then rewrites link rows.
fn save_collections(
    shared: &Shared,
    mapping: &Mapping,
    bindings: &[Binding],
    entity: &str,
    record: &mut Record,
) -> Result<()> {
    let owner = mapping.identity_value(record).clone();

    for property in mapping.associations() {
        match &property.kind {
            PropertyKind::ManyToOne(assoc) if property.cascade.on_update => {
                let foreign = primary(shared, &assoc.target)?
                    .stored_key(assoc.foreign_field())
                    .to_string();

                let Some(value) = record.get_mut(&property.name) else {
                    continue;
                };

                for target in targets_mut(value) {
                    target.insert(foreign.clone(), owner.clone());
                    save(shared, &assoc.target, target)?;
                }
            }
            PropertyKind::ManyToMany(join) => {
                // Links of an association that was never loaded are kept
                let Some(value) = record.get_mut(&property.name) else {
                    continue;
                };

                if property.cascade.on_update {
                    for target in targets_mut(value) {
                        save(shared, &join.target, target)?;
                    }
                }

                for binding in bindings.iter().filter(|b| b.source().writable) {
                    if !binding.capability().joins {
                        continue;
                    }

                    let Some(property) = binding.mapping().property(&property.name) else {
                        continue;
                    };

                    let batch = binding.generator().joins_save(record, property)?;
                    run(binding, entity, "joins_save", batch)?;
                }
            }
            _ => {}
        }
    }

    Ok(())
}
