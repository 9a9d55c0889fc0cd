#![forbid(unsafe_code)]

//! Structured logging emitted by the undo manager.
//!
//! Captures `pen.undo` events with a `tracing-subscriber` layer and checks
//! that each history transition is reported with its fields.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use pen_undo::{UndoManager, UndoableAction};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::Layer;

// ============================================================================
// Test Infrastructure
// ============================================================================

#[derive(Debug, Clone)]
struct CapturedEvent {
    level: tracing::Level,
    target: String,
    message: String,
    fields: HashMap<String, String>,
}

struct EventCapture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

#[derive(Default)]
struct FieldVisitor {
    message: String,
    fields: HashMap<String, String>,
}

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            self.fields
                .insert(field.name().to_string(), format!("{value:?}"));
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.fields.insert(field.name().to_string(), value.to_string());
        }
    }
}

impl<S: tracing::Subscriber> Layer<S> for EventCapture {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);
        let meta = event.metadata();
        self.events.lock().unwrap().push(CapturedEvent {
            level: *meta.level(),
            target: meta.target().to_string(),
            message: visitor.message,
            fields: visitor.fields,
        });
    }
}

fn capture<F: FnOnce()>(f: F) -> Vec<CapturedEvent> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let subscriber = tracing_subscriber::registry().with(EventCapture {
        events: events.clone(),
    });
    tracing::subscriber::with_default(subscriber, f);
    let captured = events.lock().unwrap().clone();
    captured
        .into_iter()
        .filter(|e| e.target == "pen.undo")
        .collect()
}

struct Noop(bool);

impl UndoableAction for Noop {
    type Target = ();
    fn undo(&mut self, _: &mut ()) {}
    fn redo(&mut self, _: &mut ()) {}
    fn is_nonpersistent(&self) -> bool {
        self.0
    }
}

fn messages(events: &[CapturedEvent]) -> Vec<&str> {
    events.iter().map(|e| e.message.as_str()).collect()
}

// ============================================================================
// Tests
// ============================================================================

#[test]
fn command_lifecycle_is_logged_at_debug() {
    let events = capture(|| {
        let mut mgr = UndoManager::with_capacity(5);
        mgr.begin_command(42, "Add course");
        mgr.record_action(Noop(false));
        mgr.end_command(42);
        mgr.undo(&mut ());
        mgr.redo(&mut ());
        mgr.mark_clean();
    });

    assert_eq!(
        messages(&events),
        ["begin command", "end command", "undo", "redo", "mark clean"]
    );
    assert!(events.iter().all(|e| e.level == tracing::Level::DEBUG));

    let end = &events[1];
    assert_eq!(end.fields.get("code").map(String::as_str), Some("42"));
    assert_eq!(end.fields.get("name").map(String::as_str), Some("Add course"));
    assert_eq!(end.fields.get("actions").map(String::as_str), Some("1"));
}

#[test]
fn eviction_names_the_dropped_command() {
    let events = capture(|| {
        let mut mgr = UndoManager::with_capacity(1);
        for (code, name) in [(1, "first"), (2, "second")] {
            mgr.begin_command(code, name);
            mgr.record_action(Noop(false));
            mgr.end_command(code);
        }
    });

    let evicted: Vec<_> = events
        .iter()
        .filter(|e| e.message == "evicted oldest command")
        .collect();
    assert_eq!(evicted.len(), 1);
    assert_eq!(
        evicted[0].fields.get("name").map(String::as_str),
        Some("first")
    );
}

#[test]
fn nonpersistent_merge_is_traced() {
    let events = capture(|| {
        let mut mgr = UndoManager::with_capacity(5);
        mgr.begin_command(1, "Edit");
        mgr.record_action(Noop(false));
        mgr.end_command(1);

        mgr.begin_command(2, "Select");
        mgr.record_action(Noop(true));
        mgr.end_command(2);
    });

    let merged = events
        .iter()
        .find(|e| e.message == "nonpersistent command merged")
        .expect("merge event");
    assert_eq!(merged.level, tracing::Level::TRACE);
    assert_eq!(merged.fields.get("into").map(String::as_str), Some("Edit"));
}

#[test]
fn rollback_and_empty_commands_are_logged() {
    let events = capture(|| {
        let mut mgr = UndoManager::<Noop>::with_capacity(5);
        mgr.begin_command(3, "Nothing");
        mgr.end_command(3);

        mgr.begin_command(4, "Abandoned");
        mgr.record_action(Noop(false));
        mgr.rollback(&mut ());
    });

    let msgs = messages(&events);
    assert!(msgs.contains(&"empty command discarded"));
    assert!(msgs.contains(&"rollback"));
    assert!(!msgs.contains(&"end command"));
}
