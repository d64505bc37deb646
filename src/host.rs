use std::rc::Rc;

use crate::Result;
use crate::dom::{NodeId, Rect};
use crate::runtime_state::Event;

/// Event listener. Receives the host it was dispatched on.
pub type ListenerFn = Rc<dyn Fn(&mut dyn Host, &mut Event) -> Result<()>>;

/// One-shot timeout callback.
pub type TimerFn = Box<dyn FnOnce(&mut dyn Host) -> Result<()>>;

/// Animation-frame callback; the second argument is the frame timestamp in
/// milliseconds.
pub type FrameFn = Box<dyn FnOnce(&mut dyn Host, f64) -> Result<()>>;

/// Intersection-observer callback.
pub type ObserverFn = Rc<dyn Fn(&mut dyn Host, ObserverId, &[IntersectionEntry]) -> Result<()>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventTarget {
    Window,
    Node(NodeId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub(crate) i64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(pub(crate) usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBehavior {
    Auto,
    Smooth,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBlock {
    Start,
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadyState {
    Loading,
    Complete,
}

/// Root margin in pixels. Negative values shrink the observed viewport.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RootMargin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct IntersectionOptions {
    pub threshold: f64,
    pub root_margin: RootMargin,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionEntry {
    pub target: NodeId,
    pub is_intersecting: bool,
    pub intersection_ratio: f64,
}

/// Everything the page enhancements need from a document.
///
/// Selector-taking methods return `Err(Error::UnsupportedSelector)` for
/// syntax they cannot evaluate; lookups that find nothing return `None` or
/// an empty list.
pub trait Host {
    fn document(&self) -> NodeId;
    fn body(&self) -> Option<NodeId>;
    fn head(&self) -> Option<NodeId>;
    fn query_selector(&self, selector: &str) -> Result<Option<NodeId>>;
    fn query_selector_all(&self, selector: &str) -> Result<Vec<NodeId>>;
    fn query_selector_within(&self, root: NodeId, selector: &str) -> Result<Option<NodeId>>;
    fn query_selector_all_within(&self, root: NodeId, selector: &str) -> Result<Vec<NodeId>>;
    fn element_by_id(&self, id: &str) -> Option<NodeId>;
    fn closest(&self, node: NodeId, selector: &str) -> Result<Option<NodeId>>;
    fn parent(&self, node: NodeId) -> Option<NodeId>;
    /// Inclusive: a node contains itself.
    fn contains(&self, ancestor: NodeId, node: NodeId) -> bool;
    fn is_connected(&self, node: NodeId) -> bool;

    fn attr(&self, node: NodeId, name: &str) -> Option<String>;
    fn set_attr(&mut self, node: NodeId, name: &str, value: &str) -> Result<()>;
    fn remove_attr(&mut self, node: NodeId, name: &str) -> Result<()>;
    fn has_class(&self, node: NodeId, class_name: &str) -> bool;
    fn add_class(&mut self, node: NodeId, class_name: &str) -> Result<()>;
    fn remove_class(&mut self, node: NodeId, class_name: &str) -> Result<()>;

    /// Inline style declaration, if set.
    fn style(&self, node: NodeId, property: &str) -> Option<String>;
    /// An empty value clears the declaration.
    fn set_style(&mut self, node: NodeId, property: &str, value: &str) -> Result<()>;
    fn computed_style(&self, node: NodeId, property: &str) -> String;

    fn text_content(&self, node: NodeId) -> String;
    fn set_text_content(&mut self, node: NodeId, text: &str) -> Result<()>;
    fn inner_html(&self, node: NodeId) -> Result<String>;
    fn set_inner_html(&mut self, node: NodeId, html: &str) -> Result<()>;

    fn value(&self, node: NodeId) -> Result<String>;
    fn checked(&self, node: NodeId) -> Result<bool>;
    /// Lowercased `type` for inputs, the tag name for other elements.
    fn input_type(&self, node: NodeId) -> String;
    fn set_disabled(&mut self, node: NodeId, disabled: bool) -> Result<()>;
    fn focus(&mut self, node: NodeId) -> Result<()>;

    fn create_element(&mut self, tag: &str) -> NodeId;
    fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<()>;
    fn remove_node(&mut self, node: NodeId) -> Result<()>;

    fn offset_top(&self, node: NodeId) -> f64;
    fn offset_height(&self, node: NodeId) -> f64;
    fn bounding_client_rect(&self, node: NodeId) -> Rect;

    fn scroll_y(&self) -> f64;
    fn inner_width(&self) -> f64;
    fn scroll_to(&mut self, top: f64, behavior: ScrollBehavior) -> Result<()>;
    fn scroll_into_view(
        &mut self,
        node: NodeId,
        behavior: ScrollBehavior,
        block: ScrollBlock,
    ) -> Result<()>;

    fn add_event_listener(&mut self, target: EventTarget, event_type: &str, listener: ListenerFn);

    fn now_ms(&self) -> i64;
    fn set_timeout(&mut self, delay_ms: i64, callback: TimerFn) -> TimerId;
    fn clear_timeout(&mut self, timer: TimerId);
    fn request_animation_frame(&mut self, callback: FrameFn) -> TimerId;

    fn supports_intersection_observer(&self) -> bool;
    fn create_intersection_observer(
        &mut self,
        options: IntersectionOptions,
        callback: ObserverFn,
    ) -> ObserverId;
    fn observe(&mut self, observer: ObserverId, node: NodeId);
    fn unobserve(&mut self, observer: ObserverId, node: NodeId);

    fn ready_state(&self) -> ReadyState;
    fn locale(&self) -> String;
    fn is_online(&self) -> bool;
    fn navigate(&mut self, url: &str) -> Result<()>;
    fn alert(&mut self, message: &str);
}
