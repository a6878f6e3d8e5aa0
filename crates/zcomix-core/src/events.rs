//! Event model and handler registration table

use crate::dom::NodeId;
use std::collections::HashMap;

/// Index of a widget installed on a [`crate::PageRuntime`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WidgetId(pub usize);

/// DOM event types the widgets listen to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    Blur,
    Focus,
    Change,
    KeyPress,
    Resize,
}

/// Key code of the Enter key in keypress events
pub const KEY_ENTER: u32 = 13;

/// An event fired at a target node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event {
    pub kind: EventKind,
    pub target: NodeId,
    /// Key code for keypress events
    pub key_code: Option<u32>,
}

impl Event {
    pub fn new(kind: EventKind, target: NodeId) -> Self {
        Self {
            kind,
            target,
            key_code: None,
        }
    }

    pub fn click(target: NodeId) -> Self {
        Self::new(EventKind::Click, target)
    }

    pub fn key_press(target: NodeId, key_code: u32) -> Self {
        Self {
            kind: EventKind::KeyPress,
            target,
            key_code: Some(key_code),
        }
    }
}

/// Numeric field preset a formatter binding uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldPreset {
    Currency,
    CurrencyOrBlank,
}

/// What a registered node is to the widget that registered it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Slide,
    Dot,
    AmountInput,
    ContributeLink,
    MoreLink,
    NumericField(FieldPreset),
    FixmeLink,
    Window,
}

/// Tags for delayed work a widget asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerTag {
    StartSlideShow,
    ArmNotices,
}

/// Side effects handlers ask the host page to perform
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Open a new browser window at the URL
    OpenWindow(String),
    /// Show a modal alert
    Alert(String),
}

/// A handler invocation: the event plus the node and role it was bound through
#[derive(Debug, Clone, Copy)]
pub struct Trigger<'a> {
    pub event: &'a Event,
    /// Node the handler was registered on
    pub node: NodeId,
    pub role: Role,
}

/// Handler binding stored in the [`HandlerTable`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding {
    pub widget: WidgetId,
    pub role: Role,
}

/// Handlers keyed by (node, event kind), kept in registration order
#[derive(Debug, Default)]
pub struct HandlerTable {
    bindings: HashMap<(NodeId, EventKind), Vec<Binding>>,
}

impl HandlerTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, node: NodeId, kind: EventKind, binding: Binding) {
        self.bindings.entry((node, kind)).or_default().push(binding);
    }

    pub fn bindings(&self, node: NodeId, kind: EventKind) -> &[Binding] {
        self.bindings
            .get(&(node, kind))
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Total number of bindings
    pub(crate) fn len(&self) -> usize {
        self.bindings.values().map(|v| v.len()).sum()
    }
}

/// Requests a handler collects while it runs
#[derive(Debug, Default)]
pub struct EventContext {
    pub(crate) default_prevented: bool,
    pub(crate) propagation_stopped: bool,
    pub(crate) effects: Vec<Effect>,
    pub(crate) follow_ups: Vec<Event>,
    pub(crate) listens: Vec<(NodeId, EventKind, Role)>,
    pub(crate) timers: Vec<(u64, TimerTag)>,
}

impl EventContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn emit(&mut self, effect: Effect) {
        self.effects.push(effect);
    }

    /// Dispatch `event` once the current dispatch completes
    pub fn follow_up(&mut self, event: Event) {
        self.follow_ups.push(event);
    }

    /// Bind the calling widget to `kind` events on `node`
    pub fn listen(&mut self, node: NodeId, kind: EventKind, role: Role) {
        self.listens.push((node, kind, role));
    }

    /// Run the calling widget's timer `tag` after `delay_ms`
    pub fn schedule(&mut self, delay_ms: u64, tag: TimerTag) {
        self.timers.push((delay_ms, tag));
    }
}

/// Result of dispatching one event, follow-ups included
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DispatchOutcome {
    pub default_prevented: bool,
    pub propagation_stopped: bool,
    /// Number of handlers that ran
    pub handled: usize,
    pub effects: Vec<Effect>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_keeps_registration_order() {
        let mut table = HandlerTable::new();
        let node = NodeId(3);
        let first = Binding { widget: WidgetId(0), role: Role::Slide };
        let second = Binding { widget: WidgetId(1), role: Role::Dot };
        table.register(node, EventKind::Click, first);
        table.register(node, EventKind::Click, second);
        table.register(node, EventKind::Blur, first);

        assert_eq!(table.bindings(node, EventKind::Click), &[first, second]);
        assert_eq!(table.bindings(node, EventKind::Blur), &[first]);
        assert!(table.bindings(node, EventKind::Focus).is_empty());
        assert!(table.bindings(NodeId(4), EventKind::Click).is_empty());
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_event_constructors() {
        let event = Event::key_press(NodeId(1), KEY_ENTER);
        assert_eq!(event.kind, EventKind::KeyPress);
        assert_eq!(event.key_code, Some(13));
        assert_eq!(Event::click(NodeId(2)).key_code, None);
    }
}
