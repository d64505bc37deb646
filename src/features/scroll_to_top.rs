use super::{FeatureContext, listener};
use crate::Result;
use crate::bootstrap::FeatureOutcome;
use crate::host::{EventTarget, Host, ScrollBehavior};
use crate::rate_limit::throttle;

const BUTTON_STYLE: &str = "position: fixed; bottom: 30px; right: 30px; width: 50px; \
height: 50px; background: linear-gradient(135deg, #d4a5c0, #e8b4cb); color: white; \
border: none; border-radius: 50%; cursor: pointer; opacity: 0; visibility: hidden; \
transition: all 0.3s ease; z-index: 999; font-size: 24px; \
box-shadow: 0 4px 16px rgba(0,0,0,0.2);";

pub(crate) fn init(host: &mut dyn Host, ctx: &FeatureContext) -> Result<FeatureOutcome> {
    let Some(body) = host.body() else {
        return Ok(FeatureOutcome::Skipped("no body"));
    };

    let button = host.create_element("button");
    host.set_text_content(button, "↑")?;
    host.set_attr(button, "class", "scroll-to-top")?;
    host.set_attr(button, "aria-label", "Nach oben scrollen")?;
    host.set_attr(button, "style", BUTTON_STYLE)?;
    host.append_child(body, button)?;

    let threshold = ctx.config.scroll_top_threshold;
    let on_scroll = throttle(ctx.config.scroll_throttle_ms, move |host, ()| {
        let (opacity, visibility) = if host.scroll_y() > threshold {
            ("1", "visible")
        } else {
            ("0", "hidden")
        };
        host.set_style(button, "opacity", opacity)?;
        host.set_style(button, "visibility", visibility)
    });
    host.add_event_listener(EventTarget::Window, "scroll", on_scroll.listener());

    let target = EventTarget::Node(button);
    host.add_event_listener(
        target,
        "click",
        listener(|host, _event| host.scroll_to(0.0, ScrollBehavior::Smooth)),
    );
    host.add_event_listener(
        target,
        "mouseenter",
        listener(move |host, _event| {
            host.set_style(button, "transform", "translateY(-5px)")?;
            host.set_style(button, "boxShadow", "0 6px 20px rgba(0,0,0,0.3)")
        }),
    );
    host.add_event_listener(
        target,
        "mouseleave",
        listener(move |host, _event| {
            host.set_style(button, "transform", "translateY(0)")?;
            host.set_style(button, "boxShadow", "0 4px 16px rgba(0,0,0,0.2)")
        }),
    );

    Ok(FeatureOutcome::Installed)
}
