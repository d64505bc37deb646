//! Page enhancements (navigation toggle, scroll effects, form validation,
//! transient overlays) wired through a [`Host`] abstraction, with
//! [`Page`] as a deterministic in-memory host for tests and embedding.

use std::error::Error as StdError;
use std::fmt;

mod bootstrap;
mod config;
mod dom;
mod features;
mod host;
mod html;
mod intl;
mod page;
mod rate_limit;
mod runtime_state;
mod selector;
mod transient;
mod validation;

pub use bootstrap::{Enhancer, Feature, FeatureOutcome, InitReport, InitState};
pub use config::EnhancerConfig;
pub use dom::{LayoutBox, NodeId, Rect};
pub use host::{
    EventTarget, FrameFn, Host, IntersectionEntry, IntersectionOptions, ListenerFn, ObserverFn,
    ObserverId, ReadyState, RootMargin, ScrollBehavior, ScrollBlock, TimerFn, TimerId,
};
pub use intl::format_integer;
pub use page::Page;
pub use rate_limit::{Debounce, Throttle, debounce, throttle};
pub use runtime_state::{
    Event, LocationNavigation, LocationNavigationKind, PendingTimer, PendingTimerKind,
    ScrollRequest,
};
pub use transient::Transient;
pub use validation::{FieldRule, FieldSnapshot, FieldVerdict, RuleTable, messages};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    HtmlParse(String),
    UnsupportedSelector(String),
    SelectorNotFound(String),
    TypeMismatch {
        selector: String,
        expected: String,
        actual: String,
    },
    Runtime(String),
    Pattern {
        field: String,
        message: String,
    },
    Config(String),
    AssertionFailed {
        selector: String,
        expected: String,
        actual: String,
        dom_snippet: String,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HtmlParse(msg) => write!(f, "html parse error: {msg}"),
            Self::UnsupportedSelector(selector) => write!(f, "unsupported selector: {selector}"),
            Self::SelectorNotFound(selector) => write!(f, "selector not found: {selector}"),
            Self::TypeMismatch {
                selector,
                expected,
                actual,
            } => write!(
                f,
                "type mismatch for {selector}: expected {expected}, actual {actual}"
            ),
            Self::Runtime(msg) => write!(f, "runtime error: {msg}"),
            Self::Pattern { field, message } => {
                write!(f, "pattern error for field {field}: {message}")
            }
            Self::Config(msg) => write!(f, "invalid configuration: {msg}"),
            Self::AssertionFailed {
                selector,
                expected,
                actual,
                dom_snippet,
            } => write!(
                f,
                "assertion failed for {selector}: expected {expected}, actual {actual}, snippet {dom_snippet}"
            ),
        }
    }
}

impl StdError for Error {}
