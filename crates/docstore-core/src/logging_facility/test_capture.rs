//! Test capture mode for deterministic logging assertions
//!
//! Installs a global subscriber layer that records every event in memory.
//! Tests share one capture per process, so assertions should filter on a
//! value unique to the test (an op name, a table, a resource id).

use crate::core_types::schema::{
    FIELD_COMPONENT, FIELD_EVENT, FIELD_OP, FIELD_RESOURCE_ID, FIELD_TABLE,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};
use tracing::field::{Field, Visit};
use tracing::{Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

/// One recorded event, with every field rendered as a string
#[derive(Clone, Debug)]
pub struct CapturedEvent {
    pub level: Level,
    pub target: String,
    pub fields: HashMap<String, String>,
}

impl CapturedEvent {
    /// Look up a field by name
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn component(&self) -> Option<&str> {
        self.field(FIELD_COMPONENT)
    }

    pub fn op(&self) -> Option<&str> {
        self.field(FIELD_OP)
    }

    pub fn event(&self) -> Option<&str> {
        self.field(FIELD_EVENT)
    }

    pub fn table(&self) -> Option<&str> {
        self.field(FIELD_TABLE)
    }

    pub fn resource_id(&self) -> Option<&str> {
        self.field(FIELD_RESOURCE_ID)
    }

    /// True for the `event` phase of operation `op`
    pub fn is(&self, op: &str, event: &str) -> bool {
        self.op() == Some(op) && self.event() == Some(event)
    }
}

// Integers and bools fall through to `record_debug`, which renders them
// the same way `Display` would.
#[derive(Default)]
struct FieldRecorder(HashMap<String, String>);

impl Visit for FieldRecorder {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.insert(field.name().to_string(), value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.0.insert(field.name().to_string(), format!("{:?}", value));
    }
}

/// Layer appending every event to a shared buffer
pub struct TestCaptureLayer {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl TestCaptureLayer {
    pub fn new() -> (Self, TestCapture) {
        let events = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                events: Arc::clone(&events),
            },
            TestCapture { events },
        )
    }
}

impl<S> Layer<S> for TestCaptureLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let mut recorder = FieldRecorder::default();
        event.record(&mut recorder);

        let metadata = event.metadata();
        let captured = CapturedEvent {
            level: *metadata.level(),
            target: metadata.target().to_string(),
            fields: recorder.0,
        };

        if let Ok(mut events) = self.events.lock() {
            events.push(captured);
        }
    }
}

/// Read side of the capture buffer
#[derive(Clone)]
pub struct TestCapture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl TestCapture {
    /// Snapshot of everything captured so far
    pub fn events(&self) -> Vec<CapturedEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Events of phase `event` for operation `op`
    pub fn matching(&self, op: &str, event: &str) -> Vec<CapturedEvent> {
        self.events().into_iter().filter(|e| e.is(op, event)).collect()
    }

    /// Events tagged with `table`
    pub fn for_table(&self, table: &str) -> Vec<CapturedEvent> {
        self.events()
            .into_iter()
            .filter(|e| e.table() == Some(table))
            .collect()
    }

    /// Count events matching a predicate
    pub fn count_events<F>(&self, predicate: F) -> usize
    where
        F: Fn(&CapturedEvent) -> bool,
    {
        self.events().iter().filter(|e| predicate(e)).count()
    }

    /// # Panics
    ///
    /// Panics when no event of phase `event` was captured for `op`.
    pub fn assert_event_exists(&self, op: &str, event: &str) {
        let total = self.events().len();
        assert!(
            !self.matching(op, event).is_empty(),
            "no {} event for op {} among {} captured",
            event,
            op,
            total
        );
    }
}

static GLOBAL_CAPTURE: OnceLock<TestCapture> = OnceLock::new();

/// Install the process-wide capture on first use and return a handle to it
///
/// ```
/// use docstore_core::logging_facility::test_capture::init_test_capture;
/// use docstore_core::log_op_start;
///
/// let capture = init_test_capture();
/// log_op_start!("doc_example_op");
/// capture.assert_event_exists("doc_example_op", "start");
/// ```
pub fn init_test_capture() -> TestCapture {
    GLOBAL_CAPTURE
        .get_or_init(|| {
            let (layer, capture) = TestCaptureLayer::new();
            let _ = tracing_subscriber::registry().with(layer).try_init();
            capture
        })
        .clone()
}
