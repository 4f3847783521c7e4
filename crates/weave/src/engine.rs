mod delete;
pub(crate) use delete::delete;

mod read;
pub(crate) use read::{load, page_count, read};

mod save;
pub(crate) use save::save;

use crate::{
    db::{Binding, Shared},
    Record, Result, Value,
};

use std::sync::Arc;
use weave_core::{driver::Batch, schema::PropertyKind, Error, Mapping};

/// The first declared mapping of `entity`. It defines the associations the
/// engine cascades through.
fn primary<'a>(shared: &'a Shared, entity: &str) -> Result<&'a Arc<Mapping>> {
    shared
        .schema
        .mappings(entity)?
        .first()
        .ok_or_else(|| Error::unknown_mapping(entity))
}

/// Name of the identity field of `entity`.
pub(crate) fn identity_name<'a>(shared: &'a Shared, entity: &str) -> Result<&'a str> {
    let mapping = primary(shared, entity)?;

    match mapping.identity() {
        Some(identity) => Ok(&identity.name),
        None => Err(Error::invalid_mapping(format!("`{entity}` has no identity"))),
    }
}

/// Copies the identity of every nested single-valued target into its
/// foreign reference column. Unassigned identities are not copied.
fn flatten(shared: &Shared, mapping: &Mapping, record: &mut Record) -> Result<()> {
    for property in mapping.associations() {
        let PropertyKind::Map(assoc) = &property.kind else {
            continue;
        };

        let Some(Value::Record(target)) = record.get(&property.name) else {
            continue;
        };

        let identity = primary(shared, &assoc.target)?.identity_value(target).clone();
        if !identity.is_default() {
            record.insert(property.column.clone(), identity);
        }
    }

    Ok(())
}

/// Executes `batch` on the binding's source, returning the rows affected.
/// Failures name the source and the operation.
pub(crate) fn run(binding: &Binding, entity: &str, operation: &str, batch: Batch) -> Result<u64> {
    if batch.is_empty() {
        return Ok(0);
    }

    trace_batch(binding, entity, operation, &batch);
    batch
        .execute()
        .map_err(|err| err.context(Error::execution_failed(binding.source_name(), operation)))
}

/// Like [`run`], also returning the key each command generated.
pub(crate) fn run_with_keys(
    binding: &Binding,
    entity: &str,
    operation: &str,
    batch: Batch,
) -> Result<(u64, Vec<Option<Value>>)> {
    if batch.is_empty() {
        return Ok((0, vec![]));
    }

    trace_batch(binding, entity, operation, &batch);
    batch
        .execute_with_keys()
        .map_err(|err| err.context(Error::execution_failed(binding.source_name(), operation)))
}

/// Like [`run`], materializing the final result set.
pub(crate) fn run_dynamic(
    binding: &Binding,
    entity: &str,
    operation: &str,
    batch: Batch,
) -> Result<Vec<Record>> {
    if batch.is_empty() {
        return Ok(vec![]);
    }

    trace_batch(binding, entity, operation, &batch);
    batch
        .execute_dynamic()
        .map_err(|err| err.context(Error::execution_failed(binding.source_name(), operation)))
}

fn trace_batch(binding: &Binding, entity: &str, operation: &str, batch: &Batch) {
    tracing::debug!(
        source = binding.source_name(),
        entity,
        operation,
        commands = batch.command_count(),
        "executing generator batch"
    );
}

/// Sources that failed during one multi-source write.
///
/// A failure only ends that source's part of the call. The remaining sources
/// are still visited and the first error is returned once they are done.
#[derive(Debug, Default)]
struct Failures {
    first: Option<Error>,
    sources: Vec<String>,
}

impl Failures {
    fn record(&mut self, binding: &Binding, entity: &str, err: Error) {
        tracing::warn!(
            source = binding.source_name(),
            entity,
            error = %err,
            "source failed; continuing with the remaining sources"
        );

        self.sources.push(binding.source_name().to_string());
        self.first.get_or_insert(err);
    }

    fn contains(&self, binding: &Binding) -> bool {
        self.sources.iter().any(|name| name == binding.source_name())
    }

    fn is_empty(&self) -> bool {
        self.first.is_none()
    }

    fn into_result(self) -> Result<()> {
        match self.first {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Emits an audit event for a write to a source with auditing enabled.
fn audit(binding: &Binding, entity: &str, operation: &str, identity: &Value) {
    if binding.source().audit {
        tracing::info!(
            target: "weave::audit",
            source = binding.source_name(),
            entity,
            operation,
            identity = %identity,
            "write"
        );
    }
}

/// Records held by an association value: a single nested record or a list
/// of them.
fn targets_mut(value: &mut Value) -> Vec<&mut Record> {
    match value {
        Value::Record(record) => vec![record],
        Value::List(items) => items.iter_mut().filter_map(Value::as_record_mut).collect(),
        _ => vec![],
    }
}

fn targets(value: &Value) -> Vec<&Record> {
    match value {
        Value::Record(record) => vec![record],
        Value::List(items) => items.iter().filter_map(Value::as_record).collect(),
        _ => vec![],
    }
}
