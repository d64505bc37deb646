use std::cell::Cell;
use std::rc::Rc;

use super::{FeatureContext, listener};
use crate::Result;
use crate::bootstrap::FeatureOutcome;
use crate::dom::NodeId;
use crate::host::{EventTarget, Host, TimerId};
use crate::transient::Transient;

const OVERLAY_STYLE: &str = "position: fixed; top: 0; left: 0; width: 100%; height: 100%; \
background: rgba(0,0,0,0.8); z-index: 9999; display: flex; align-items: center; \
justify-content: center; padding: 20px; opacity: 0; transition: opacity 0.3s ease;";
const CONTENT_STYLE: &str = "background: white; padding: 40px; border-radius: 12px; \
max-width: 600px; max-height: 80vh; overflow-y: auto; position: relative; \
transform: scale(0.9); transition: transform 0.3s ease;";

fn content_html(privacy_href: &str) -> String {
    format!(
        concat!(
            r#"<h2 style="margin-top: 0;">Datenschutzerklärung</h2>"#,
            r#"<p>Weitere Informationen finden Sie auf unserer "#,
            r##"<a href="{href}" style="color: #d4a5c0; text-decoration: underline;">Datenschutzseite</a>.</p>"##,
            r#"<button style="margin-top: 20px; padding: 12px 24px; "#,
            r#"background: linear-gradient(135deg, #d4a5c0, #e8b4cb); color: white; border: none; "#,
            r#"border-radius: 8px; cursor: pointer; font-weight: bold;">Schließen</button>"#,
        ),
        href = privacy_href
    )
}

/// One open overlay. Dismissal fades it out and removes it once.
struct PrivacyOverlay {
    overlay: Transient,
    content: NodeId,
    fade_in: Cell<Option<TimerId>>,
    fade_ms: i64,
}

impl PrivacyOverlay {
    fn dismiss(&self, host: &mut dyn Host) -> Result<()> {
        if self.overlay.is_teardown_pending() || self.overlay.is_removed() {
            return Ok(());
        }
        if let Some(timer) = self.fade_in.take() {
            host.clear_timeout(timer);
        }
        host.set_style(self.overlay.node(), "opacity", "0")?;
        host.set_style(self.content, "transform", "scale(0.9)")?;
        self.overlay.remove_after(host, self.fade_ms);
        Ok(())
    }
}

pub(crate) fn init(host: &mut dyn Host, ctx: &FeatureContext) -> Result<FeatureOutcome> {
    let links = host.query_selector_all(r#"a[href*="privacy"]"#)?;
    if links.is_empty() {
        return Ok(FeatureOutcome::Skipped("no privacy links"));
    }

    for link in links {
        let config = Rc::clone(&ctx.config);
        host.add_event_listener(
            EventTarget::Node(link),
            "click",
            listener(move |host, event| {
                if host.attr(link, "href").as_deref() == Some(config.privacy_href.as_str()) {
                    return Ok(());
                }
                event.prevent_default();
                open_overlay(
                    host,
                    &config.privacy_href,
                    config.modal_open_delay_ms,
                    config.modal_fade_ms,
                )
                .map(|_| ())
            }),
        );
    }

    Ok(FeatureOutcome::Installed)
}

/// Appends a new overlay to the body. `None` when there is no body.
fn open_overlay(
    host: &mut dyn Host,
    privacy_href: &str,
    open_delay_ms: i64,
    fade_ms: i64,
) -> Result<Option<Transient>> {
    let Some(body) = host.body() else {
        return Ok(None);
    };

    let overlay_node = host.create_element("div");
    host.set_attr(overlay_node, "style", OVERLAY_STYLE)?;
    let content = host.create_element("div");
    host.set_attr(content, "style", CONTENT_STYLE)?;
    host.set_inner_html(content, &content_html(privacy_href))?;
    host.append_child(overlay_node, content)?;
    let overlay = Transient::attach(host, body, overlay_node)?;

    let fade_in = host.set_timeout(
        open_delay_ms,
        Box::new(move |host: &mut dyn Host| {
            host.set_style(overlay_node, "opacity", "1")?;
            host.set_style(content, "transform", "scale(1)")
        }),
    );
    let state = Rc::new(PrivacyOverlay {
        overlay: overlay.clone(),
        content,
        fade_in: Cell::new(Some(fade_in)),
        fade_ms,
    });

    if let Some(close_button) = host.query_selector_within(content, "button")? {
        let state = Rc::clone(&state);
        host.add_event_listener(
            EventTarget::Node(close_button),
            "click",
            listener(move |host, _event| state.dismiss(host)),
        );
    }
    host.add_event_listener(
        EventTarget::Node(overlay_node),
        "click",
        listener(move |host, event| {
            if event.target_node() == Some(overlay_node) {
                state.dismiss(host)?;
            }
            Ok(())
        }),
    );

    Ok(Some(overlay))
}
