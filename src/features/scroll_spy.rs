use std::rc::Rc;

use super::FeatureContext;
use crate::Result;
use crate::bootstrap::FeatureOutcome;
use crate::dom::NodeId;
use crate::host::{EventTarget, Host};
use crate::rate_limit::throttle;

struct ScrollSpy {
    sections: Vec<NodeId>,
    links: Vec<NodeId>,
    header_offset: f64,
}

impl ScrollSpy {
    /// Highlights the link of the last section whose band
    /// `[top - header_offset, bottom - header_offset)` contains the scroll
    /// offset. Leaves everything as is when no band does.
    fn update(&self, host: &mut dyn Host) -> Result<()> {
        let position = host.scroll_y();
        for &section in &self.sections {
            let top = host.offset_top(section) - self.header_offset;
            let bottom = top + host.offset_height(section);
            if position < top || position >= bottom {
                continue;
            }
            let href = format!("#{}", host.attr(section, "id").unwrap_or_default());
            for &link in &self.links {
                host.remove_class(link, "active")?;
                host.remove_attr(link, "aria-current")?;
                if host.attr(link, "href").as_deref() == Some(href.as_str()) {
                    host.add_class(link, "active")?;
                    host.set_attr(link, "aria-current", "page")?;
                }
            }
        }
        Ok(())
    }
}

pub(crate) fn init(host: &mut dyn Host, ctx: &FeatureContext) -> Result<FeatureOutcome> {
    let sections = host.query_selector_all("section[id]")?;
    let links = host.query_selector_all(r##".nav-link[href^="#"]"##)?;
    if sections.is_empty() || links.is_empty() {
        return Ok(FeatureOutcome::Skipped("no sections or in-page nav links"));
    }

    let spy = Rc::new(ScrollSpy {
        sections,
        links,
        header_offset: ctx.config.header_offset,
    });

    let on_scroll = {
        let spy = Rc::clone(&spy);
        throttle(ctx.config.scroll_throttle_ms, move |host, ()| spy.update(host))
    };
    host.add_event_listener(EventTarget::Window, "scroll", on_scroll.listener());
    spy.update(host)?;

    Ok(FeatureOutcome::Installed)
}
