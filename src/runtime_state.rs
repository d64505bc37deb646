use std::collections::{HashMap, VecDeque};
use std::fmt;

use crate::dom::NodeId;
use crate::host::{
    EventTarget, FrameFn, IntersectionOptions, ListenerFn, ObserverFn, ScrollBehavior, TimerFn,
};

/// A dispatched event as listeners see it.
#[derive(Debug, Clone)]
pub struct Event {
    pub event_type: String,
    pub target: EventTarget,
    pub current_target: EventTarget,
    pub key: Option<String>,
    pub client_x: f64,
    pub client_y: f64,
    pub button: i16,
    pub(crate) default_prevented: bool,
    pub(crate) propagation_stopped: bool,
    pub(crate) immediate_propagation_stopped: bool,
}

impl Event {
    pub fn new(event_type: &str, target: EventTarget) -> Self {
        Self {
            event_type: event_type.to_string(),
            target,
            current_target: target,
            key: None,
            client_x: 0.0,
            client_y: 0.0,
            button: 0,
            default_prevented: false,
            propagation_stopped: false,
            immediate_propagation_stopped: false,
        }
    }

    pub fn with_key(mut self, key: &str) -> Self {
        self.key = Some(key.to_string());
        self
    }

    pub fn with_pointer(mut self, client_x: f64, client_y: f64) -> Self {
        self.client_x = client_x;
        self.client_y = client_y;
        self
    }

    pub fn with_button(mut self, button: i16) -> Self {
        self.button = button;
        self
    }

    pub fn target_node(&self) -> Option<NodeId> {
        match self.target {
            EventTarget::Node(node) => Some(node),
            EventTarget::Window => None,
        }
    }

    pub fn current_node(&self) -> Option<NodeId> {
        match self.current_target {
            EventTarget::Node(node) => Some(node),
            EventTarget::Window => None,
        }
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }

    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn stop_immediate_propagation(&mut self) {
        self.propagation_stopped = true;
        self.immediate_propagation_stopped = true;
    }

    pub(crate) fn bubbles(&self) -> bool {
        !matches!(
            self.event_type.as_str(),
            "mouseenter" | "mouseleave" | "focus" | "blur" | "error" | "load" | "scroll" | "resize"
        )
    }
}

#[derive(Default, Clone)]
pub(crate) struct ListenerStore {
    map: HashMap<EventTarget, HashMap<String, Vec<ListenerFn>>>,
}

impl ListenerStore {
    pub(crate) fn add(&mut self, target: EventTarget, event: &str, listener: ListenerFn) {
        self.map
            .entry(target)
            .or_default()
            .entry(event.to_string())
            .or_default()
            .push(listener);
    }

    pub(crate) fn get(&self, target: EventTarget, event: &str) -> Vec<ListenerFn> {
        self.map
            .get(&target)
            .and_then(|events| events.get(event))
            .cloned()
            .unwrap_or_default()
    }

    /// Drops every listener registered on `nodes`.
    pub(crate) fn forget_nodes(&mut self, nodes: &[NodeId]) {
        for node in nodes {
            self.map.remove(&EventTarget::Node(*node));
        }
    }

    pub(crate) fn target_count(&self) -> usize {
        self.map.len()
    }

    pub(crate) fn count(&self, target: EventTarget, event: &str) -> usize {
        self.map
            .get(&target)
            .and_then(|events| events.get(event))
            .map(Vec::len)
            .unwrap_or(0)
    }
}

impl fmt::Debug for ListenerStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self
            .map
            .values()
            .flat_map(HashMap::values)
            .map(Vec::len)
            .sum::<usize>();
        f.debug_struct("ListenerStore")
            .field("targets", &self.map.len())
            .field("listeners", &total)
            .finish()
    }
}

pub(crate) enum TaskCallback {
    Timeout(TimerFn),
    Frame(FrameFn),
    IntersectionCheck,
}

impl TaskCallback {
    pub(crate) fn kind(&self) -> PendingTimerKind {
        match self {
            Self::Timeout(_) => PendingTimerKind::Timeout,
            Self::Frame(_) => PendingTimerKind::AnimationFrame,
            Self::IntersectionCheck => PendingTimerKind::IntersectionCheck,
        }
    }
}

pub(crate) struct ScheduledTask {
    pub(crate) id: i64,
    pub(crate) due_at: i64,
    pub(crate) order: i64,
    pub(crate) callback: TaskCallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingTimerKind {
    Timeout,
    AnimationFrame,
    IntersectionCheck,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTimer {
    pub id: i64,
    pub due_at: i64,
    pub order: i64,
    pub kind: PendingTimerKind,
}

pub(crate) struct SchedulerState {
    pub(crate) task_queue: Vec<ScheduledTask>,
    pub(crate) now_ms: i64,
    pub(crate) timer_step_limit: usize,
    pub(crate) next_timer_id: i64,
    pub(crate) next_task_order: i64,
    pub(crate) frame_interval_ms: i64,
    pub(crate) intersection_check_queued: bool,
}

impl Default for SchedulerState {
    fn default() -> Self {
        Self {
            task_queue: Vec::new(),
            now_ms: 0,
            timer_step_limit: 10_000,
            next_timer_id: 1,
            next_task_order: 0,
            frame_interval_ms: 16,
            intersection_check_queued: false,
        }
    }
}

impl fmt::Debug for SchedulerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchedulerState")
            .field("pending", &self.task_queue.len())
            .field("now_ms", &self.now_ms)
            .field("next_timer_id", &self.next_timer_id)
            .finish()
    }
}

pub(crate) struct ObserverState {
    pub(crate) options: IntersectionOptions,
    pub(crate) callback: ObserverFn,
    // Last delivered intersecting state per target; `None` until the first
    // delivery after `observe`.
    pub(crate) targets: Vec<(NodeId, Option<bool>)>,
}

impl fmt::Debug for ObserverState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserverState")
            .field("options", &self.options)
            .field("targets", &self.targets)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ViewportState {
    pub(crate) width: f64,
    pub(crate) height: f64,
    pub(crate) scroll_y: f64,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 800.0,
            scroll_y: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationNavigationKind {
    Assign,
    AnchorClick,
    FormSubmit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationNavigation {
    pub kind: LocationNavigationKind,
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollRequest {
    pub top: f64,
    pub behavior: ScrollBehavior,
}

#[derive(Debug)]
pub(crate) struct PlatformMockState {
    pub(crate) url: String,
    pub(crate) online: bool,
    pub(crate) locale: String,
    pub(crate) intersection_observer_supported: bool,
    pub(crate) alert_messages: Vec<String>,
    pub(crate) location_navigations: Vec<LocationNavigation>,
    pub(crate) scroll_requests: Vec<ScrollRequest>,
}

impl Default for PlatformMockState {
    fn default() -> Self {
        Self {
            url: "https://app.local/".to_string(),
            online: true,
            locale: "en-US".to_string(),
            intersection_observer_supported: true,
            alert_messages: Vec::new(),
            location_navigations: Vec::new(),
            scroll_requests: Vec::new(),
        }
    }
}

#[derive(Debug)]
pub(crate) struct TraceState {
    pub(crate) enabled: bool,
    pub(crate) events: bool,
    pub(crate) timers: bool,
    pub(crate) logs: VecDeque<String>,
    pub(crate) log_limit: usize,
    pub(crate) to_stderr: bool,
}

impl Default for TraceState {
    fn default() -> Self {
        Self {
            enabled: false,
            events: true,
            timers: true,
            logs: VecDeque::new(),
            log_limit: 10_000,
            to_stderr: true,
        }
    }
}
