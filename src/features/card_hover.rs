use super::{FeatureContext, HOVER_TRANSITION, listener};
use crate::Result;
use crate::bootstrap::FeatureOutcome;
use crate::host::{EventTarget, Host};

pub(crate) fn init(host: &mut dyn Host, _ctx: &FeatureContext) -> Result<FeatureOutcome> {
    let cards = host.query_selector_all(".card, .service-card, .accordion-item")?;
    if cards.is_empty() {
        return Ok(FeatureOutcome::Skipped("no cards"));
    }

    for card in cards {
        host.add_event_listener(
            EventTarget::Node(card),
            "mouseenter",
            listener(move |host, _event| {
                host.set_style(card, "transition", HOVER_TRANSITION)?;
                host.set_style(card, "transform", "translateY(-8px) scale(1.02)")?;
                host.set_style(card, "boxShadow", "0 12px 40px rgba(0,0,0,0.15)")
            }),
        );
        host.add_event_listener(
            EventTarget::Node(card),
            "mouseleave",
            listener(move |host, _event| {
                host.set_style(card, "transform", "translateY(0) scale(1)")?;
                host.set_style(card, "boxShadow", "")
            }),
        );
    }

    Ok(FeatureOutcome::Installed)
}
