use crate::dom::{Dom, NodeId, truncate_chars};
use crate::host::ReadyState;
use crate::html::parse_document;
use crate::runtime_state::{
    ListenerStore, ObserverState, PlatformMockState, SchedulerState, TraceState, ViewportState,
};
use crate::{Error, Result};

mod actions;
mod dispatch;
mod host_impl;
mod inspect;
mod observers;
mod timers;

/// Deterministic in-memory page.
///
/// A `Page` owns a parsed document, a fake clock with a task queue, a
/// viewport with per-element layout boxes set from the outside, and mocks
/// for the platform surface (connectivity, alerts, navigation, scrolling).
/// It implements [`crate::Host`], so enhancements run against it exactly
/// as they would against a browser, while tests drive it through the user
/// action and time methods.
///
/// Nothing runs on its own: timeouts, animation frames and intersection
/// observer deliveries are queued and executed by `advance_time`,
/// `advance_time_to`, `run_due_timers` or `flush`.
#[derive(Debug)]
pub struct Page {
    pub(crate) dom: Dom,
    pub(crate) listeners: ListenerStore,
    pub(crate) scheduler: SchedulerState,
    pub(crate) viewport: ViewportState,
    pub(crate) observers: Vec<ObserverState>,
    pub(crate) platform: PlatformMockState,
    pub(crate) trace_state: TraceState,
    pub(crate) ready_state: ReadyState,
    pub(crate) active_element: Option<NodeId>,
}

impl Page {
    /// Parses `html` into a fully loaded page.
    pub fn from_html(html: &str) -> Result<Self> {
        let mut page = Self::from_html_loading(html)?;
        page.ready_state = ReadyState::Complete;
        Ok(page)
    }

    /// Parses `html` into a page that still reports `ReadyState::Loading`
    /// until [`Page::finish_loading`] is called.
    pub fn from_html_loading(html: &str) -> Result<Self> {
        let dom = parse_document(html)?;
        Ok(Self {
            dom,
            listeners: ListenerStore::default(),
            scheduler: SchedulerState::default(),
            viewport: ViewportState::default(),
            observers: Vec::new(),
            platform: PlatformMockState::default(),
            trace_state: TraceState::default(),
            ready_state: ReadyState::Loading,
            active_element: None,
        })
    }

    /// Marks the document ready and dispatches `DOMContentLoaded`.
    pub fn finish_loading(&mut self) -> Result<()> {
        if self.ready_state == ReadyState::Complete {
            return Ok(());
        }
        self.ready_state = ReadyState::Complete;
        let root = self.dom.root;
        self.dispatch_event(root, "DOMContentLoaded")?;
        Ok(())
    }

    pub fn set_timer_step_limit(&mut self, max_steps: usize) -> Result<()> {
        if max_steps == 0 {
            return Err(Error::Config(
                "timer step limit must be greater than zero".into(),
            ));
        }
        self.scheduler.timer_step_limit = max_steps;
        Ok(())
    }

    pub fn set_frame_interval_ms(&mut self, interval_ms: i64) -> Result<()> {
        if interval_ms <= 0 {
            return Err(Error::Config(
                "frame interval must be greater than zero".into(),
            ));
        }
        self.scheduler.frame_interval_ms = interval_ms;
        Ok(())
    }

    pub fn set_online(&mut self, online: bool) {
        self.platform.online = online;
    }

    pub fn set_locale(&mut self, locale: &str) {
        self.platform.locale = locale.to_string();
    }

    pub fn set_url(&mut self, url: &str) {
        self.platform.url = url.to_string();
    }

    pub fn url(&self) -> &str {
        &self.platform.url
    }

    pub fn set_intersection_observer_supported(&mut self, supported: bool) {
        self.platform.intersection_observer_supported = supported;
    }

    /// Sets the viewport size without dispatching `resize`.
    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.viewport.width = width;
        self.viewport.height = height;
    }

    pub fn enable_trace(&mut self, enabled: bool) {
        self.trace_state.enabled = enabled;
    }

    pub fn set_trace_events(&mut self, enabled: bool) {
        self.trace_state.events = enabled;
    }

    pub fn set_trace_timers(&mut self, enabled: bool) {
        self.trace_state.timers = enabled;
    }

    pub fn set_trace_stderr(&mut self, enabled: bool) {
        self.trace_state.to_stderr = enabled;
    }

    pub fn set_trace_log_limit(&mut self, max_entries: usize) -> Result<()> {
        if max_entries == 0 {
            return Err(Error::Config(
                "trace log limit must be greater than zero".into(),
            ));
        }
        self.trace_state.log_limit = max_entries;
        while self.trace_state.logs.len() > max_entries {
            self.trace_state.logs.pop_front();
        }
        Ok(())
    }

    pub fn take_trace_logs(&mut self) -> Vec<String> {
        self.trace_state.logs.drain(..).collect()
    }

    pub(crate) fn trace_event_line(&mut self, line: String) {
        if self.trace_state.enabled && self.trace_state.events {
            self.trace_line(line);
        }
    }

    pub(crate) fn trace_timer_line(&mut self, line: String) {
        if self.trace_state.enabled && self.trace_state.timers {
            self.trace_line(line);
        }
    }

    fn trace_line(&mut self, line: String) {
        if self.trace_state.to_stderr {
            eprintln!("{line}");
        }
        if self.trace_state.logs.len() >= self.trace_state.log_limit {
            self.trace_state.logs.pop_front();
        }
        self.trace_state.logs.push_back(line);
    }

    pub(crate) fn select_one(&self, selector: &str) -> Result<NodeId> {
        self.dom
            .query_selector_from(self.dom.root, selector)?
            .ok_or_else(|| Error::SelectorNotFound(selector.to_string()))
    }

    pub(crate) fn node_snippet(&self, node_id: NodeId) -> String {
        truncate_chars(&self.dom.dump_node(node_id), 200)
    }

    pub(crate) fn node_label(&self, node_id: NodeId) -> String {
        if node_id == self.dom.root {
            return "document".into();
        }
        let Some(element) = self.dom.element(node_id) else {
            return "#text".into();
        };
        let mut label = element.tag_name.clone();
        if let Some(id) = element.attrs.get("id").filter(|id| !id.is_empty()) {
            label.push('#');
            label.push_str(id);
        } else if let Some(class) = element
            .attrs
            .get("class")
            .and_then(|class| class.split_whitespace().next())
        {
            label.push('.');
            label.push_str(class);
        }
        label
    }
}
