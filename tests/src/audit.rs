use std::{
    fmt,
    sync::{Arc, Mutex},
};
use tracing::{
    field::{Field, Visit},
    Event, Subscriber,
};
use tracing_subscriber::{layer::Context, prelude::*, Layer};

/// One event emitted under the `weave::audit` target.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditEvent {
    pub source: String,
    pub entity: String,
    pub operation: String,
    pub identity: String,
}

/// Collects audit events while a closure runs.
#[derive(Debug, Clone, Default)]
pub struct AuditLog {
    events: Arc<Mutex<Vec<AuditEvent>>>,
}

impl AuditLog {
    /// Runs `f` with a subscriber that captures audit events, returning its
    /// result and everything captured.
    pub fn capture<R>(f: impl FnOnce() -> R) -> (R, Vec<AuditEvent>) {
        let log = AuditLog::default();
        let subscriber = tracing_subscriber::registry().with(log.clone());

        let ret = tracing::subscriber::with_default(subscriber, f);
        let events = log.events.lock().unwrap().clone();
        (ret, events)
    }
}

impl<S: Subscriber> Layer<S> for AuditLog {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if event.metadata().target() != "weave::audit" {
            return;
        }

        let mut audit = AuditEvent::default();
        event.record(&mut audit);
        self.events.lock().unwrap().push(audit);
    }
}

impl Visit for AuditEvent {
    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "source" => self.source = value.to_string(),
            "entity" => self.entity = value.to_string(),
            "operation" => self.operation = value.to_string(),
            _ => {}
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        // `identity` is recorded through its `Display` impl
        if field.name() == "identity" {
            self.identity = format!("{value:?}");
        }
    }
}
