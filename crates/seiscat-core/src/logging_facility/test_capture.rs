//! In-memory event capture for tests
//!
//! `init_test_capture` installs a process-wide layer once; every test gets a
//! handle onto the same buffer. Tests run in parallel, so filter on an op
//! name or id that only your test uses.

use crate::core_types::schema::{
    FIELD_COMMAND_ID, FIELD_COMPONENT, FIELD_EVENT, FIELD_OP, FIELD_REQUEST_ID, FIELD_TARGET_ID,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};
use tracing::field::{Field, Visit};
use tracing::{Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

type Buffer = Arc<Mutex<Vec<CapturedEvent>>>;

#[derive(Clone, Debug)]
pub struct CapturedEvent {
    pub level: Level,
    fields: HashMap<String, String>,
}

impl CapturedEvent {
    /// Recorded value of a field; strings are unquoted, numbers decimal
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Module path of the emitting code
    pub fn component(&self) -> Option<&str> {
        self.field(FIELD_COMPONENT)
    }

    pub fn op(&self) -> Option<&str> {
        self.field(FIELD_OP)
    }

    /// `start`, `end` or `end_error` for operation boundaries
    pub fn event(&self) -> Option<&str> {
        self.field(FIELD_EVENT)
    }
}

#[derive(Default)]
struct Fields(HashMap<String, String>);

impl Visit for Fields {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.0.insert(field.name().to_string(), format!("{value:?}"));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.insert(field.name().to_string(), value.to_string());
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.0.insert(field.name().to_string(), value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.0.insert(field.name().to_string(), value.to_string());
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.0.insert(field.name().to_string(), value.to_string());
    }
}

struct CaptureLayer(Buffer);

impl<S> Layer<S> for CaptureLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let mut fields = Fields::default();
        event.record(&mut fields);
        if let Ok(mut buffer) = self.0.lock() {
            buffer.push(CapturedEvent {
                level: *event.metadata().level(),
                fields: fields.0,
            });
        }
    }
}

#[derive(Clone)]
pub struct TestCapture(Buffer);

impl TestCapture {
    /// Snapshot of everything captured so far
    pub fn events(&self) -> Vec<CapturedEvent> {
        self.0.lock().map(|b| b.clone()).unwrap_or_default()
    }

    fn matching(&self, keep: impl Fn(&CapturedEvent) -> bool) -> Vec<CapturedEvent> {
        self.events().into_iter().filter(|e| keep(e)).collect()
    }

    pub fn events_for_op(&self, op: &str) -> Vec<CapturedEvent> {
        self.matching(|e| e.op() == Some(op))
    }

    pub fn warnings_for_op(&self, op: &str) -> Vec<CapturedEvent> {
        self.matching(|e| e.op() == Some(op) && e.level == Level::WARN)
    }

    /// Events whose `command_id` or `target_id` is `id`
    pub fn events_for_id(&self, id: i64) -> Vec<CapturedEvent> {
        let id = id.to_string();
        self.matching(|e| {
            e.field(FIELD_COMMAND_ID) == Some(id.as_str())
                || e.field(FIELD_TARGET_ID) == Some(id.as_str())
        })
    }

    pub fn events_for_request(&self, request_id: &str) -> Vec<CapturedEvent> {
        self.matching(|e| e.field(FIELD_REQUEST_ID) == Some(request_id))
    }

    pub fn count_events(&self, predicate: impl Fn(&CapturedEvent) -> bool) -> usize {
        self.matching(predicate).len()
    }

    /// # Panics
    ///
    /// When no captured event has this `op` and `event`
    pub fn assert_event_exists(&self, op: &str, event: &str) {
        let hits = self.count_events(|e| e.op() == Some(op) && e.event() == Some(event));
        assert!(hits > 0, "no {event} event captured for op {op}");
    }
}

static CAPTURE: OnceLock<TestCapture> = OnceLock::new();

/// ```
/// use seiscat_core::logging_facility::test_capture::init_test_capture;
/// use seiscat_core::log_op_start;
///
/// let capture = init_test_capture();
/// log_op_start!("doc_capture_example");
/// capture.assert_event_exists("doc_capture_example", "start");
/// ```
pub fn init_test_capture() -> TestCapture {
    CAPTURE
        .get_or_init(|| {
            let buffer = Buffer::default();
            let _ = tracing_subscriber::registry()
                .with(CaptureLayer(buffer.clone()))
                .try_init();
            TestCapture(buffer)
        })
        .clone()
}
