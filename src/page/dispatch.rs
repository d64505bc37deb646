use super::Page;
use crate::Result;
use crate::dom::NodeId;
use crate::host::{EventTarget, Host};
use crate::runtime_state::Event;

impl Page {
    pub(crate) fn dispatch_event(&mut self, target: NodeId, event_type: &str) -> Result<Event> {
        self.dispatch_prepared_event(Event::new(event_type, EventTarget::Node(target)))
    }

    pub(crate) fn dispatch_window_event(&mut self, event_type: &str) -> Result<Event> {
        self.dispatch_prepared_event(Event::new(event_type, EventTarget::Window))
    }

    /// Runs target-phase listeners, then bubbles through the ancestors,
    /// the document and finally the window.
    pub(crate) fn dispatch_prepared_event(&mut self, mut event: Event) -> Result<Event> {
        let path = self.event_path(event.target, event.bubbles());
        self.trace_event_line(format!(
            "[event] dispatch {} target={} path_len={}",
            event.event_type,
            self.target_label(event.target),
            path.len()
        ));

        for current in path {
            event.current_target = current;
            self.invoke_listeners(current, &mut event)?;
            if event.propagation_stopped {
                self.trace_event_done(&event, "propagation_stopped");
                return Ok(event);
            }
        }

        self.trace_event_done(&event, "completed");
        Ok(event)
    }

    fn event_path(&self, target: EventTarget, bubbles: bool) -> Vec<EventTarget> {
        let EventTarget::Node(node) = target else {
            return vec![EventTarget::Window];
        };
        if !bubbles {
            return vec![target];
        }

        let mut path = Vec::new();
        let mut cursor = Some(node);
        while let Some(current) = cursor {
            path.push(EventTarget::Node(current));
            cursor = self.dom.parent(current);
        }
        // Only events that reach the document continue on to the window.
        if path.last() == Some(&EventTarget::Node(self.dom.root)) {
            path.push(EventTarget::Window);
        }
        path
    }

    fn invoke_listeners(&mut self, current: EventTarget, event: &mut Event) -> Result<()> {
        // Snapshot: listeners added during dispatch run from the next event on.
        let listeners = self.listeners.get(current, &event.event_type);
        for listener in listeners {
            let host: &mut dyn Host = self;
            listener(host, event)?;
            if event.immediate_propagation_stopped {
                break;
            }
        }
        Ok(())
    }

    fn trace_event_done(&mut self, event: &Event, outcome: &str) {
        if !(self.trace_state.enabled && self.trace_state.events) {
            return;
        }
        let target_label = self.target_label(event.target);
        let current_label = self.target_label(event.current_target);
        self.trace_event_line(format!(
            "[event] done {} target={} current={} outcome={} default_prevented={} propagation_stopped={}",
            event.event_type,
            target_label,
            current_label,
            outcome,
            event.default_prevented,
            event.propagation_stopped
        ));
    }

    pub(crate) fn target_label(&self, target: EventTarget) -> String {
        match target {
            EventTarget::Window => "window".into(),
            EventTarget::Node(node) => self.node_label(node),
        }
    }
}
