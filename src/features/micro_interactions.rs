use super::{FeatureContext, HOVER_TRANSITION, listener, px};
use crate::Result;
use crate::bootstrap::FeatureOutcome;
use crate::dom::NodeId;
use crate::host::{EventTarget, Host};
use crate::runtime_state::Event;
use crate::transient::Transient;

const INTERACTIVE_TARGETS: &str = r#".btn, .card, .nav-link, .accordion-button, a[class*="btn"]"#;
const RIPPLE_KEYFRAMES: &str = "@keyframes ripple { to { transform: scale(4); opacity: 0; } }";

pub(crate) fn init(host: &mut dyn Host, ctx: &FeatureContext) -> Result<FeatureOutcome> {
    let ripple_ms = ctx.config.ripple_duration_ms;
    for element in host.query_selector_all(INTERACTIVE_TARGETS)? {
        let target = EventTarget::Node(element);
        host.add_event_listener(
            target,
            "mouseenter",
            listener(move |host, _event| {
                host.set_style(element, "transition", HOVER_TRANSITION)?;
                host.set_style(element, "transform", "translateY(-2px)")
            }),
        );
        host.add_event_listener(
            target,
            "mouseleave",
            listener(move |host, _event| host.set_style(element, "transform", "translateY(0)")),
        );
        host.add_event_listener(
            target,
            "mousedown",
            listener(move |host, event| {
                if event.button != 0 {
                    return Ok(());
                }
                spawn_ripple(host, element, event, ripple_ms).map(|_| ())
            }),
        );
    }

    let style = host.create_element("style");
    host.set_text_content(style, RIPPLE_KEYFRAMES)?;
    if let Some(parent) = host.head().or_else(|| host.body()) {
        host.append_child(parent, style)?;
    }

    Ok(FeatureOutcome::Installed)
}

/// Appends a ripple centred on the pointer; it removes itself after
/// `duration_ms`.
fn spawn_ripple(
    host: &mut dyn Host,
    element: NodeId,
    event: &Event,
    duration_ms: i64,
) -> Result<Transient> {
    let rect = host.bounding_client_rect(element);
    let size = rect.width.max(rect.height);
    let left = event.client_x - rect.left - size / 2.0;
    let top = event.client_y - rect.top - size / 2.0;

    let ripple = host.create_element("span");
    for (property, value) in [
        ("width", px(size)),
        ("height", px(size)),
        ("left", px(left)),
        ("top", px(top)),
        ("position", "absolute".to_string()),
        ("borderRadius", "50%".to_string()),
        ("background", "rgba(255, 255, 255, 0.5)".to_string()),
        ("transform", "scale(0)".to_string()),
        ("animation", "ripple 0.6s ease-out".to_string()),
        ("pointerEvents", "none".to_string()),
    ] {
        host.set_style(ripple, property, &value)?;
    }

    if host.computed_style(element, "position") == "static" {
        host.set_style(element, "position", "relative")?;
    }
    if host.computed_style(element, "overflow") != "hidden" {
        host.set_style(element, "overflow", "hidden")?;
    }

    let transient = Transient::attach(host, element, ripple)?;
    transient.remove_after(host, duration_ms);
    Ok(transient)
}
