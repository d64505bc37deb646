use super::{FeatureContext, listener};
use crate::Result;
use crate::bootstrap::FeatureOutcome;
use crate::host::{EventTarget, Host, ScrollBehavior};

pub(crate) fn init(host: &mut dyn Host, ctx: &FeatureContext) -> Result<FeatureOutcome> {
    let fallback_offset = ctx.config.fallback_nav_height;
    let document = host.document();
    host.add_event_listener(
        EventTarget::Node(document),
        "click",
        listener(move |host, event| {
            let Some(clicked) = event.target_node() else {
                return Ok(());
            };
            let Some(anchor) = host.closest(clicked, r##"a[href^="#"]"##)? else {
                return Ok(());
            };
            let href = host.attr(anchor, "href").unwrap_or_default();
            if href == "#" || href == "#!" {
                return Ok(());
            }
            let Some(section) = host.element_by_id(&href[1..]) else {
                return Ok(());
            };

            event.prevent_default();
            let offset = match host.query_selector(".navbar")? {
                Some(navbar) => host.offset_height(navbar),
                None => fallback_offset,
            };
            let top = (host.offset_top(section) - offset).max(0.0);
            host.scroll_to(top, ScrollBehavior::Smooth)
        }),
    );
    Ok(FeatureOutcome::Installed)
}
