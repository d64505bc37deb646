use super::Page;
use crate::dom::{NodeId, Rect};
use crate::host::{
    EventTarget, FrameFn, Host, IntersectionOptions, ListenerFn, ObserverFn, ObserverId,
    ReadyState, ScrollBehavior, ScrollBlock, TimerFn, TimerId,
};
use crate::runtime_state::{
    LocationNavigation, LocationNavigationKind, ObserverState, ScrollRequest, TaskCallback,
};
use crate::{Error, Result};

impl Host for Page {
    fn document(&self) -> NodeId {
        self.dom.root
    }

    fn body(&self) -> Option<NodeId> {
        self.dom.first_by_tag("body")
    }

    fn head(&self) -> Option<NodeId> {
        self.dom.first_by_tag("head")
    }

    fn query_selector(&self, selector: &str) -> Result<Option<NodeId>> {
        self.dom.query_selector_from(self.dom.root, selector)
    }

    fn query_selector_all(&self, selector: &str) -> Result<Vec<NodeId>> {
        self.dom.query_selector_all(selector)
    }

    fn query_selector_within(&self, root: NodeId, selector: &str) -> Result<Option<NodeId>> {
        self.dom.query_selector_from(root, selector)
    }

    fn query_selector_all_within(&self, root: NodeId, selector: &str) -> Result<Vec<NodeId>> {
        self.dom.query_selector_all_from(root, selector)
    }

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.dom.by_id(id)
    }

    fn closest(&self, node: NodeId, selector: &str) -> Result<Option<NodeId>> {
        self.dom.closest(node, selector)
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.dom.parent(node)
    }

    fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.dom.contains(ancestor, node)
    }

    fn is_connected(&self, node: NodeId) -> bool {
        self.dom.is_connected(node)
    }

    fn attr(&self, node: NodeId, name: &str) -> Option<String> {
        self.dom.attr(node, name)
    }

    fn set_attr(&mut self, node: NodeId, name: &str, value: &str) -> Result<()> {
        self.dom.set_attr(node, name, value)
    }

    fn remove_attr(&mut self, node: NodeId, name: &str) -> Result<()> {
        self.dom.remove_attr(node, name)
    }

    fn has_class(&self, node: NodeId, class_name: &str) -> bool {
        self.dom.class_contains(node, class_name)
    }

    fn add_class(&mut self, node: NodeId, class_name: &str) -> Result<()> {
        self.dom.class_add(node, class_name)
    }

    fn remove_class(&mut self, node: NodeId, class_name: &str) -> Result<()> {
        self.dom.class_remove(node, class_name)
    }

    fn style(&self, node: NodeId, property: &str) -> Option<String> {
        self.dom.style_get(node, property)
    }

    fn set_style(&mut self, node: NodeId, property: &str, value: &str) -> Result<()> {
        self.dom.style_set(node, property, value)
    }

    fn computed_style(&self, node: NodeId, property: &str) -> String {
        if let Some(value) = self.dom.style_get(node, property) {
            return value;
        }
        match property {
            "position" => "static",
            "overflow" => "visible",
            "opacity" => "1",
            "visibility" => "visible",
            "transform" => "none",
            _ => "",
        }
        .to_string()
    }

    fn text_content(&self, node: NodeId) -> String {
        self.dom.text_content(node)
    }

    fn set_text_content(&mut self, node: NodeId, text: &str) -> Result<()> {
        self.dom.set_text_content(node, text)
    }

    fn inner_html(&self, node: NodeId) -> Result<String> {
        self.dom.inner_html(node)
    }

    fn set_inner_html(&mut self, node: NodeId, html: &str) -> Result<()> {
        self.dom.set_inner_html(node, html)
    }

    fn value(&self, node: NodeId) -> Result<String> {
        self.dom.value(node)
    }

    fn checked(&self, node: NodeId) -> Result<bool> {
        self.dom.checked(node)
    }

    fn input_type(&self, node: NodeId) -> String {
        self.dom.input_type(node)
    }

    fn set_disabled(&mut self, node: NodeId, disabled: bool) -> Result<()> {
        if disabled {
            self.dom.set_attr(node, "disabled", "")
        } else {
            self.dom.remove_attr(node, "disabled")
        }
    }

    fn focus(&mut self, node: NodeId) -> Result<()> {
        self.focus_node(node)
    }

    fn create_element(&mut self, tag: &str) -> NodeId {
        self.dom.create_detached_element(tag)
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.dom.append_child(parent, child)
    }

    fn remove_node(&mut self, node: NodeId) -> Result<()> {
        if self
            .active_element
            .is_some_and(|active| self.dom.contains(node, active))
        {
            self.active_element = None;
        }
        let was_attached = self.dom.parent(node).is_some();
        self.dom.remove_node(node)?;
        if was_attached {
            // Listeners do not survive removal.
            let mut detached = self.dom.descendant_elements(node);
            detached.push(node);
            self.listeners.forget_nodes(&detached);
        }
        Ok(())
    }

    fn offset_top(&self, node: NodeId) -> f64 {
        self.dom.layout(node).top
    }

    fn offset_height(&self, node: NodeId) -> f64 {
        self.dom.layout(node).height
    }

    fn bounding_client_rect(&self, node: NodeId) -> Rect {
        let layout = self.dom.layout(node);
        Rect {
            top: layout.top - self.viewport.scroll_y,
            left: layout.left,
            width: layout.width,
            height: layout.height,
        }
    }

    fn scroll_y(&self) -> f64 {
        self.viewport.scroll_y
    }

    fn inner_width(&self) -> f64 {
        self.viewport.width
    }

    fn scroll_to(&mut self, top: f64, behavior: ScrollBehavior) -> Result<()> {
        if !top.is_finite() {
            return Err(Error::Runtime(format!("scroll target must be finite: {top}")));
        }
        self.platform
            .scroll_requests
            .push(ScrollRequest { top, behavior });
        self.apply_scroll(top)
    }

    fn scroll_into_view(
        &mut self,
        node: NodeId,
        behavior: ScrollBehavior,
        block: ScrollBlock,
    ) -> Result<()> {
        let layout = self.dom.layout(node);
        let top = match block {
            ScrollBlock::Start => layout.top,
            ScrollBlock::Center => layout.top + layout.height / 2.0 - self.viewport.height / 2.0,
        };
        Host::scroll_to(self, top.max(0.0), behavior)
    }

    fn add_event_listener(&mut self, target: EventTarget, event_type: &str, listener: ListenerFn) {
        self.listeners.add(target, event_type, listener);
        self.trace_event_line(format!(
            "[event] listen {} target={} total={}",
            event_type,
            self.target_label(target),
            self.listeners.count(target, event_type)
        ));
    }

    fn now_ms(&self) -> i64 {
        self.scheduler.now_ms
    }

    fn set_timeout(&mut self, delay_ms: i64, callback: TimerFn) -> TimerId {
        let due_at = self.scheduler.now_ms.saturating_add(delay_ms.max(0));
        self.schedule_task(due_at, TaskCallback::Timeout(callback))
    }

    fn clear_timeout(&mut self, timer: TimerId) {
        self.cancel_task(timer);
    }

    fn request_animation_frame(&mut self, callback: FrameFn) -> TimerId {
        let due_at = self.next_frame_due();
        self.schedule_task(due_at, TaskCallback::Frame(callback))
    }

    fn supports_intersection_observer(&self) -> bool {
        self.platform.intersection_observer_supported
    }

    fn create_intersection_observer(
        &mut self,
        options: IntersectionOptions,
        callback: ObserverFn,
    ) -> ObserverId {
        self.observers.push(ObserverState {
            options,
            callback,
            targets: Vec::new(),
        });
        ObserverId(self.observers.len() - 1)
    }

    fn observe(&mut self, observer: ObserverId, node: NodeId) {
        let Some(state) = self.observers.get_mut(observer.0) else {
            return;
        };
        if state.targets.iter().any(|(target, _)| *target == node) {
            return;
        }
        state.targets.push((node, None));
        self.queue_intersection_check();
    }

    fn unobserve(&mut self, observer: ObserverId, node: NodeId) {
        if let Some(state) = self.observers.get_mut(observer.0) {
            state.targets.retain(|(target, _)| *target != node);
        }
    }

    fn ready_state(&self) -> ReadyState {
        self.ready_state
    }

    fn locale(&self) -> String {
        self.platform.locale.clone()
    }

    fn is_online(&self) -> bool {
        self.platform.online
    }

    fn navigate(&mut self, url: &str) -> Result<()> {
        self.record_navigation(LocationNavigationKind::Assign, url);
        Ok(())
    }

    fn alert(&mut self, message: &str) {
        self.platform.alert_messages.push(message.to_string());
    }
}

impl Page {
    pub(crate) fn record_navigation(&mut self, kind: LocationNavigationKind, to: &str) {
        let from = std::mem::replace(&mut self.platform.url, to.to_string());
        self.trace_event_line(format!("[event] navigate kind={kind:?} from={from} to={to}"));
        self.platform.location_navigations.push(LocationNavigation {
            kind,
            from,
            to: to.to_string(),
        });
    }

    /// Moves the viewport and notifies `scroll` listeners.
    pub(crate) fn apply_scroll(&mut self, top: f64) -> Result<()> {
        self.viewport.scroll_y = top.max(0.0);
        self.queue_intersection_check();
        self.dispatch_window_event("scroll")?;
        Ok(())
    }
}
