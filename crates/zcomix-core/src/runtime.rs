//! Page runtime: widgets, handler table and timers around one document

use crate::dom::Dom;
use crate::error::{CoreError, CoreResult};
use crate::events::{
    Binding, DispatchOutcome, Event, EventContext, HandlerTable, TimerTag, Trigger, WidgetId,
};
use crate::scheduler::{Scheduler, TaskHandle};
use std::collections::VecDeque;

/// A page behavior bound to part of a document
pub trait Widget {
    /// Short name used in log lines
    fn name(&self) -> &str;

    /// Read the widget's scope and register its handlers and timers
    fn install(&mut self, dom: &mut dyn Dom, ctx: &mut EventContext) -> CoreResult<()>;

    /// Handle an event delivered through one of the widget's bindings
    fn handle(
        &mut self,
        dom: &mut dyn Dom,
        trigger: &Trigger<'_>,
        ctx: &mut EventContext,
    ) -> CoreResult<()>;

    /// Run a timer the widget scheduled
    fn on_timer(
        &mut self,
        _dom: &mut dyn Dom,
        _tag: TimerTag,
        _ctx: &mut EventContext,
    ) -> CoreResult<()> {
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
struct ScheduledTimer {
    widget: WidgetId,
    tag: TimerTag,
}

/// Owns a document and drives the widgets installed on it
pub struct PageRuntime<D: Dom> {
    dom: D,
    widgets: Vec<Box<dyn Widget>>,
    handlers: HandlerTable,
    scheduler: Scheduler<ScheduledTimer>,
    handles: Vec<TaskHandle>,
}

impl<D: Dom> std::fmt::Debug for PageRuntime<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageRuntime")
            .field("widgets", &self.widgets.iter().map(|w| w.name()).collect::<Vec<_>>())
            .field("handlers", &self.handlers.len())
            .field("pending_timers", &self.scheduler.pending_count())
            .finish()
    }
}

impl<D: Dom> PageRuntime<D> {
    pub fn new(dom: D) -> Self {
        Self {
            dom,
            widgets: Vec::new(),
            handlers: HandlerTable::new(),
            scheduler: Scheduler::new(),
            handles: Vec::new(),
        }
    }

    pub fn dom(&self) -> &D {
        &self.dom
    }

    pub fn dom_mut(&mut self) -> &mut D {
        &mut self.dom
    }

    pub fn widget_count(&self) -> usize {
        self.widgets.len()
    }

    /// Virtual time in milliseconds since the page was ready
    pub fn now(&self) -> u64 {
        self.scheduler.now()
    }

    pub fn next_deadline(&self) -> Option<u64> {
        self.scheduler.next_deadline()
    }

    pub fn pending_timers(&self) -> usize {
        self.scheduler.pending_count()
    }

    /// Install a widget. On error nothing it requested is registered.
    pub fn install(&mut self, mut widget: Box<dyn Widget>) -> CoreResult<WidgetId> {
        let id = WidgetId(self.widgets.len());
        let mut ctx = EventContext::new();
        widget.install(&mut self.dom, &mut ctx)?;
        log::debug!(
            "installed widget {} ({}) with {} bindings, {} timers",
            id.0,
            widget.name(),
            ctx.listens.len(),
            ctx.timers.len()
        );
        self.widgets.push(widget);
        self.apply_requests(id, &mut ctx);
        Ok(id)
    }

    /// Dispatch an event, bubbling from its target up to the root.
    ///
    /// Handlers on one node all run even when one stops propagation.
    /// Follow-up events requested by handlers run afterwards and their
    /// effects are merged into the returned outcome.
    pub fn dispatch(&mut self, event: Event) -> DispatchOutcome {
        let mut outcome = DispatchOutcome::default();
        let mut queue = VecDeque::from([event]);
        let mut first = true;

        while let Some(event) = queue.pop_front() {
            let mut stopped = false;
            let mut prevented = false;

            for node in self.dom.ancestor_path(event.target) {
                let bindings: Vec<Binding> = self.handlers.bindings(node, event.kind).to_vec();
                for binding in bindings {
                    let mut ctx = EventContext::new();
                    let trigger = Trigger {
                        event: &event,
                        node,
                        role: binding.role,
                    };
                    if let Err(e) = self.run_handler(binding.widget, &trigger, &mut ctx) {
                        e.log("dispatch");
                    }
                    outcome.handled += 1;
                    stopped |= ctx.propagation_stopped;
                    prevented |= ctx.default_prevented;
                    outcome.effects.append(&mut ctx.effects);
                    queue.extend(ctx.follow_ups.drain(..));
                    self.apply_requests(binding.widget, &mut ctx);
                }
                if stopped {
                    break;
                }
            }

            if first {
                outcome.default_prevented = prevented;
                outcome.propagation_stopped = stopped;
                first = false;
            }
        }

        outcome
    }

    /// Advance the virtual clock by `ms`, running every timer that comes due
    pub fn advance_time(&mut self, ms: u64) -> DispatchOutcome {
        let until = self.scheduler.now().saturating_add(ms);
        self.run_until(until)
    }

    /// Run every timer due at or before `until`
    pub fn run_until(&mut self, until: u64) -> DispatchOutcome {
        let mut outcome = DispatchOutcome::default();
        while let Some(timer) = self.scheduler.pop_due(until) {
            let mut ctx = EventContext::new();
            let result = match self.widgets.get_mut(timer.widget.0) {
                Some(widget) => {
                    log::debug!("timer {:?} fired for {}", timer.tag, widget.name());
                    widget.on_timer(&mut self.dom, timer.tag, &mut ctx)
                }
                None => Err(CoreError::UnknownWidget { id: timer.widget.0 }),
            };
            if let Err(e) = result {
                e.log("timer");
            }
            outcome.handled += 1;
            outcome.effects.append(&mut ctx.effects);
            let follow_ups: Vec<Event> = ctx.follow_ups.drain(..).collect();
            self.apply_requests(timer.widget, &mut ctx);
            for event in follow_ups {
                let mut nested = self.dispatch(event);
                outcome.handled += nested.handled;
                outcome.effects.append(&mut nested.effects);
            }
        }
        self.scheduler.set_now(until);
        outcome
    }

    /// Cancel every pending timer. Returns how many were cancelled.
    pub fn teardown(&mut self) -> usize {
        let mut cancelled = 0;
        for handle in self.handles.drain(..) {
            if self.scheduler.cancel(handle) {
                cancelled += 1;
            }
        }
        if cancelled > 0 {
            log::debug!("teardown cancelled {} pending timers", cancelled);
        }
        cancelled
    }

    fn run_handler(
        &mut self,
        widget: WidgetId,
        trigger: &Trigger<'_>,
        ctx: &mut EventContext,
    ) -> CoreResult<()> {
        let Some(handler) = self.widgets.get_mut(widget.0) else {
            return Err(CoreError::UnknownWidget { id: widget.0 });
        };
        handler.handle(&mut self.dom, trigger, ctx)
    }

    fn apply_requests(&mut self, widget: WidgetId, ctx: &mut EventContext) {
        for (node, kind, role) in ctx.listens.drain(..) {
            self.handlers.register(node, kind, Binding { widget, role });
        }
        self.handles.retain(|h| self.scheduler.is_pending(*h));
        for (delay_ms, tag) in ctx.timers.drain(..) {
            let handle = self.scheduler.schedule(delay_ms, ScheduledTimer { widget, tag });
            self.handles.push(handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Element, NodeId, Page};
    use crate::events::{Effect, EventKind, Role};

    /// Records what reaches it and optionally stops propagation
    struct Probe {
        name: &'static str,
        node: NodeId,
        stop: bool,
        delay_ms: Option<u64>,
    }

    impl Widget for Probe {
        fn name(&self) -> &str {
            self.name
        }

        fn install(&mut self, _dom: &mut dyn Dom, ctx: &mut EventContext) -> CoreResult<()> {
            ctx.listen(self.node, EventKind::Click, Role::MoreLink);
            if let Some(delay) = self.delay_ms {
                ctx.schedule(delay, TimerTag::ArmNotices);
            }
            Ok(())
        }

        fn handle(
            &mut self,
            _dom: &mut dyn Dom,
            trigger: &Trigger<'_>,
            ctx: &mut EventContext,
        ) -> CoreResult<()> {
            ctx.emit(Effect::Alert(format!("{}@{}", self.name, trigger.node.0)));
            if self.stop {
                ctx.stop_propagation();
            }
            Ok(())
        }

        fn on_timer(
            &mut self,
            _dom: &mut dyn Dom,
            _tag: TimerTag,
            ctx: &mut EventContext,
        ) -> CoreResult<()> {
            ctx.emit(Effect::Alert(format!("{} timer", self.name)));
            Ok(())
        }
    }

    fn probe(name: &'static str, node: NodeId, stop: bool) -> Box<Probe> {
        Box::new(Probe { name, node, stop, delay_ms: None })
    }

    fn nested_page() -> (Page, NodeId, NodeId) {
        let mut page = Page::new(800);
        let outer = page.append(page.root(), Element::new("div"));
        let inner = page.append(outer, Element::new("a"));
        (page, outer, inner)
    }

    fn alerts(outcome: &DispatchOutcome) -> Vec<String> {
        outcome
            .effects
            .iter()
            .map(|e| match e {
                Effect::Alert(m) | Effect::OpenWindow(m) => m.clone(),
            })
            .collect()
    }

    #[test]
    fn test_bubbles_from_target_to_ancestors() {
        let (page, outer, inner) = nested_page();
        let mut runtime = PageRuntime::new(page);
        runtime.install(probe("outer", outer, false)).unwrap();
        runtime.install(probe("inner", inner, false)).unwrap();

        let outcome = runtime.dispatch(Event::click(inner));
        assert_eq!(outcome.handled, 2);
        assert_eq!(alerts(&outcome), vec!["inner@2", "outer@1"]);
    }

    #[test]
    fn test_stop_propagation_finishes_current_node() {
        let (page, outer, inner) = nested_page();
        let mut runtime = PageRuntime::new(page);
        runtime.install(probe("outer", outer, false)).unwrap();
        runtime.install(probe("first", inner, true)).unwrap();
        runtime.install(probe("second", inner, false)).unwrap();

        let outcome = runtime.dispatch(Event::click(inner));
        assert!(outcome.propagation_stopped);
        assert_eq!(alerts(&outcome), vec!["first@2", "second@2"]);
    }

    #[test]
    fn test_timers_fire_once_and_teardown_cancels() {
        let (page, outer, _) = nested_page();
        let mut runtime = PageRuntime::new(page);
        runtime
            .install(Box::new(Probe { name: "a", node: outer, stop: false, delay_ms: Some(1000) }))
            .unwrap();
        runtime
            .install(Box::new(Probe { name: "b", node: outer, stop: false, delay_ms: Some(3000) }))
            .unwrap();

        assert_eq!(runtime.next_deadline(), Some(1000));
        assert!(runtime.advance_time(999).effects.is_empty());
        assert_eq!(alerts(&runtime.advance_time(1)), vec!["a timer"]);
        assert!(runtime.advance_time(1000).effects.is_empty());
        assert_eq!(runtime.now(), 2000);

        assert_eq!(runtime.teardown(), 1);
        assert!(runtime.advance_time(5000).effects.is_empty());
        assert_eq!(runtime.pending_timers(), 0);
    }

    #[test]
    fn test_unbound_event_is_ignored() {
        let (page, _, inner) = nested_page();
        let mut runtime = PageRuntime::new(page);
        let outcome = runtime.dispatch(Event::new(EventKind::Blur, inner));
        assert_eq!(outcome, DispatchOutcome::default());
    }
}
