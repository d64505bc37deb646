use crate::{Error, Result};

/// Tunables for the enhancements. `Default` matches the production page.
#[derive(Debug, Clone, PartialEq)]
pub struct EnhancerConfig {
    /// Viewport width below which the navigation is treated as mobile.
    pub mobile_breakpoint: f64,
    pub resize_debounce_ms: i64,
    pub scroll_throttle_ms: i64,
    /// Distance above a section at which scroll-spy already activates it.
    pub header_offset: f64,
    /// Used for anchor scrolling when the page has no `.navbar`.
    pub fallback_nav_height: f64,
    pub reveal_threshold: f64,
    pub reveal_bottom_margin: f64,
    pub reveal_offset: f64,
    pub count_up_threshold: f64,
    pub count_up_duration_ms: f64,
    pub ripple_duration_ms: i64,
    pub submit_delay_ms: i64,
    pub confirmation_url: String,
    pub scroll_top_threshold: f64,
    pub privacy_href: String,
    pub modal_open_delay_ms: i64,
    pub modal_fade_ms: i64,
}

impl Default for EnhancerConfig {
    fn default() -> Self {
        Self {
            mobile_breakpoint: 768.0,
            resize_debounce_ms: 150,
            scroll_throttle_ms: 150,
            header_offset: 100.0,
            fallback_nav_height: 80.0,
            reveal_threshold: 0.1,
            reveal_bottom_margin: -50.0,
            reveal_offset: 30.0,
            count_up_threshold: 0.5,
            count_up_duration_ms: 2000.0,
            ripple_duration_ms: 600,
            submit_delay_ms: 800,
            confirmation_url: "thank_you.html".to_string(),
            scroll_top_threshold: 300.0,
            privacy_href: "privacy.html".to_string(),
            modal_open_delay_ms: 10,
            modal_fade_ms: 300,
        }
    }
}

impl EnhancerConfig {
    pub fn validate(&self) -> Result<()> {
        let delays = [
            ("resize_debounce_ms", self.resize_debounce_ms),
            ("scroll_throttle_ms", self.scroll_throttle_ms),
            ("ripple_duration_ms", self.ripple_duration_ms),
            ("submit_delay_ms", self.submit_delay_ms),
            ("modal_open_delay_ms", self.modal_open_delay_ms),
            ("modal_fade_ms", self.modal_fade_ms),
        ];
        for (name, value) in delays {
            if value < 0 {
                return Err(Error::Config(format!("{name} must not be negative: {value}")));
            }
        }

        for (name, value) in [
            ("reveal_threshold", self.reveal_threshold),
            ("count_up_threshold", self.count_up_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::Config(format!("{name} must be within 0..=1: {value}")));
            }
        }

        if !(self.count_up_duration_ms.is_finite() && self.count_up_duration_ms > 0.0) {
            return Err(Error::Config(format!(
                "count_up_duration_ms must be positive: {}",
                self.count_up_duration_ms
            )));
        }
        if !(self.mobile_breakpoint.is_finite() && self.mobile_breakpoint > 0.0) {
            return Err(Error::Config(format!(
                "mobile_breakpoint must be positive: {}",
                self.mobile_breakpoint
            )));
        }
        for (name, value) in [
            ("header_offset", self.header_offset),
            ("fallback_nav_height", self.fallback_nav_height),
            ("reveal_bottom_margin", self.reveal_bottom_margin),
            ("reveal_offset", self.reveal_offset),
            ("scroll_top_threshold", self.scroll_top_threshold),
        ] {
            if !value.is_finite() {
                return Err(Error::Config(format!("{name} must be finite: {value}")));
            }
        }
        if self.confirmation_url.trim().is_empty() {
            return Err(Error::Config("confirmation_url must not be empty".into()));
        }
        if self.privacy_href.trim().is_empty() {
            return Err(Error::Config("privacy_href must not be empty".into()));
        }
        Ok(())
    }
}
