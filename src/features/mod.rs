//! The page enhancements. Each module exposes one `init` that wires its
//! listeners through a [`Host`] and reports whether the page had the
//! elements it needs.

use std::rc::Rc;

use crate::Result;
use crate::bootstrap::FeatureOutcome;
use crate::config::EnhancerConfig;
use crate::host::{Host, ListenerFn};
use crate::runtime_state::Event;
use crate::validation::RuleTable;

pub(crate) mod card_hover;
pub(crate) mod count_up;
pub(crate) mod form_validation;
pub(crate) mod images;
pub(crate) mod micro_interactions;
pub(crate) mod nav_menu;
pub(crate) mod privacy_modal;
pub(crate) mod scroll_reveal;
pub(crate) mod scroll_spy;
pub(crate) mod scroll_to_top;
pub(crate) mod smooth_scroll;

/// Shared, read-only inputs of every initializer.
#[derive(Debug, Clone)]
pub(crate) struct FeatureContext {
    pub(crate) config: Rc<EnhancerConfig>,
    pub(crate) rules: Rc<RuleTable>,
}

pub(crate) type InitFn = fn(&mut dyn Host, &FeatureContext) -> Result<FeatureOutcome>;

pub(crate) fn listener<F>(handler: F) -> ListenerFn
where
    F: Fn(&mut dyn Host, &mut Event) -> Result<()> + 'static,
{
    Rc::new(handler)
}

/// Transition shared by the hover lifts.
pub(crate) const HOVER_TRANSITION: &str = "all 0.3s cubic-bezier(0.4, 0, 0.2, 1)";

/// `"{value}px"`, printing whole numbers without a fraction.
pub(crate) fn px(value: f64) -> String {
    format!("{value}px")
}
