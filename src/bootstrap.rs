use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use tracing::{debug, warn};

use crate::config::EnhancerConfig;
use crate::features::{
    self, FeatureContext, InitFn, card_hover, count_up, form_validation, images,
    micro_interactions, nav_menu, privacy_modal, scroll_reveal, scroll_spy, scroll_to_top,
    smooth_scroll,
};
use crate::host::{EventTarget, Host, ReadyState};
use crate::validation::RuleTable;
use crate::{Error, Result};

/// The enhancements, in the order `init` runs them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    NavMenu,
    ScrollReveal,
    ScrollSpy,
    SmoothScroll,
    MicroInteractions,
    CountUp,
    FormValidation,
    ScrollToTop,
    Images,
    PrivacyModal,
    CardHover,
}

impl Feature {
    pub const ALL: [Feature; 11] = [
        Feature::NavMenu,
        Feature::ScrollReveal,
        Feature::ScrollSpy,
        Feature::SmoothScroll,
        Feature::MicroInteractions,
        Feature::CountUp,
        Feature::FormValidation,
        Feature::ScrollToTop,
        Feature::Images,
        Feature::PrivacyModal,
        Feature::CardHover,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Feature::NavMenu => "nav-menu",
            Feature::ScrollReveal => "scroll-reveal",
            Feature::ScrollSpy => "scroll-spy",
            Feature::SmoothScroll => "smooth-scroll",
            Feature::MicroInteractions => "micro-interactions",
            Feature::CountUp => "count-up",
            Feature::FormValidation => "form-validation",
            Feature::ScrollToTop => "scroll-to-top",
            Feature::Images => "images",
            Feature::PrivacyModal => "privacy-modal",
            Feature::CardHover => "card-hover",
        }
    }

    fn index(self) -> usize {
        self as usize
    }

    fn initializer(self) -> InitFn {
        match self {
            Feature::NavMenu => nav_menu::init,
            Feature::ScrollReveal => scroll_reveal::init,
            Feature::ScrollSpy => scroll_spy::init,
            Feature::SmoothScroll => smooth_scroll::init,
            Feature::MicroInteractions => micro_interactions::init,
            Feature::CountUp => count_up::init,
            Feature::FormValidation => form_validation::init,
            Feature::ScrollToTop => scroll_to_top::init,
            Feature::Images => images::init,
            Feature::PrivacyModal => privacy_modal::init,
            Feature::CardHover => card_hover::init,
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeatureOutcome {
    Installed,
    /// The page lacks what the feature needs; nothing was wired.
    Skipped(&'static str),
    /// The initializer failed part-way; the error was logged.
    Failed(Error),
    /// Already initialized on an earlier run.
    AlreadyInitialized,
}

/// Per-feature "initialized" flags plus the overall "bootstrapped" flag.
/// Flags are only ever set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InitState {
    bootstrapped: bool,
    features: [bool; Feature::ALL.len()],
}

impl InitState {
    pub fn is_bootstrapped(&self) -> bool {
        self.bootstrapped
    }

    pub fn is_initialized(&self, feature: Feature) -> bool {
        self.features[feature.index()]
    }

    /// Sets the flag and reports whether it was clear before.
    fn claim(&mut self, feature: Feature) -> bool {
        !std::mem::replace(&mut self.features[feature.index()], true)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InitReport {
    pub outcomes: Vec<(Feature, FeatureOutcome)>,
}

impl InitReport {
    pub fn outcome(&self, feature: Feature) -> Option<&FeatureOutcome> {
        self.outcomes
            .iter()
            .find(|(candidate, _)| *candidate == feature)
            .map(|(_, outcome)| outcome)
    }

    pub fn failures(&self) -> impl Iterator<Item = (Feature, &Error)> {
        self.outcomes.iter().filter_map(|(feature, outcome)| match outcome {
            FeatureOutcome::Failed(err) => Some((*feature, err)),
            _ => None,
        })
    }
}

/// Runs every enhancement at most once per page.
///
/// Cloning an `Enhancer` shares its flags, so a clone captured by the
/// `DOMContentLoaded` listener and the original see the same state.
#[derive(Debug, Clone)]
pub struct Enhancer {
    context: FeatureContext,
    state: Rc<RefCell<InitState>>,
    last_report: Rc<RefCell<Option<InitReport>>>,
}

impl Enhancer {
    pub fn new(config: EnhancerConfig) -> Result<Self> {
        config.validate()?;
        let rules = RuleTable::standard()?;
        Ok(Self::with_rules(config, rules))
    }

    /// Like [`Enhancer::new`] with a caller-supplied rule table. The config
    /// is still validated by `new` only.
    pub fn with_rules(config: EnhancerConfig, rules: RuleTable) -> Self {
        Self {
            context: FeatureContext {
                config: Rc::new(config),
                rules: Rc::new(rules),
            },
            state: Rc::new(RefCell::new(InitState::default())),
            last_report: Rc::new(RefCell::new(None)),
        }
    }

    pub fn config(&self) -> &EnhancerConfig {
        &self.context.config
    }

    pub fn state(&self) -> InitState {
        self.state.borrow().clone()
    }

    /// Report of the run that bootstrapped the page, if it happened.
    pub fn last_report(&self) -> Option<InitReport> {
        self.last_report.borrow().clone()
    }

    /// Initializes now when the document is ready, otherwise once
    /// `DOMContentLoaded` fires. Returns the report when `init` ran.
    pub fn attach(&self, host: &mut dyn Host) -> Option<InitReport> {
        if host.ready_state() == ReadyState::Loading {
            debug!("document still loading, deferring enhancements");
            let enhancer = self.clone();
            let document = host.document();
            host.add_event_listener(
                EventTarget::Node(document),
                "DOMContentLoaded",
                features::listener(move |host, _event| {
                    enhancer.init(host);
                    Ok(())
                }),
            );
            return None;
        }
        Some(self.init(host))
    }

    /// Runs every initializer that has not run yet. A failing initializer
    /// is logged and reported; the remaining ones still run.
    pub fn init(&self, host: &mut dyn Host) -> InitReport {
        let mut report = InitReport::default();
        if std::mem::replace(&mut self.state.borrow_mut().bootstrapped, true) {
            report.outcomes = Feature::ALL
                .iter()
                .map(|feature| (*feature, FeatureOutcome::AlreadyInitialized))
                .collect();
            return report;
        }

        for feature in Feature::ALL {
            let outcome = self.init_feature(host, feature);
            report.outcomes.push((feature, outcome));
        }
        *self.last_report.borrow_mut() = Some(report.clone());
        report
    }

    /// Runs one initializer unless it already ran.
    pub fn init_feature(&self, host: &mut dyn Host, feature: Feature) -> FeatureOutcome {
        if !self.state.borrow_mut().claim(feature) {
            return FeatureOutcome::AlreadyInitialized;
        }
        match (feature.initializer())(host, &self.context) {
            Ok(FeatureOutcome::Skipped(reason)) => {
                debug!(feature = feature.name(), reason, "enhancement skipped");
                FeatureOutcome::Skipped(reason)
            }
            Ok(outcome) => {
                debug!(feature = feature.name(), "enhancement installed");
                outcome
            }
            Err(err) => {
                warn!(feature = feature.name(), error = %err, "enhancement failed to initialize");
                FeatureOutcome::Failed(err)
            }
        }
    }
}
