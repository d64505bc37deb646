use std::cell::Cell;
use std::rc::Rc;

use super::{FeatureContext, listener};
use crate::Result;
use crate::bootstrap::FeatureOutcome;
use crate::dom::NodeId;
use crate::host::{EventTarget, Host};
use crate::rate_limit::debounce;

struct NavMenu {
    toggler: NodeId,
    panel: NodeId,
    body: Option<NodeId>,
    is_open: Cell<bool>,
}

impl NavMenu {
    fn open(&self, host: &mut dyn Host) -> Result<()> {
        host.add_class(self.panel, "show")?;
        host.set_style(self.panel, "maxHeight", "calc(100vh - 70px)")?;
        host.set_attr(self.toggler, "aria-expanded", "true")?;
        if let Some(body) = self.body {
            host.set_style(body, "overflow", "hidden")?;
        }
        self.is_open.set(true);
        Ok(())
    }

    fn close(&self, host: &mut dyn Host) -> Result<()> {
        host.remove_class(self.panel, "show")?;
        host.set_style(self.panel, "maxHeight", "0")?;
        host.set_attr(self.toggler, "aria-expanded", "false")?;
        if let Some(body) = self.body {
            host.set_style(body, "overflow", "")?;
        }
        self.is_open.set(false);
        Ok(())
    }
}

pub(crate) fn init(host: &mut dyn Host, ctx: &FeatureContext) -> Result<FeatureOutcome> {
    let Some(toggler) = host.query_selector(".navbar-toggler")? else {
        return Ok(FeatureOutcome::Skipped("no .navbar-toggler"));
    };
    let Some(panel) = host.query_selector(".navbar-collapse")? else {
        return Ok(FeatureOutcome::Skipped("no .navbar-collapse"));
    };
    let links = host.query_selector_all(".nav-link")?;
    let breakpoint = ctx.config.mobile_breakpoint;

    let menu = Rc::new(NavMenu {
        toggler,
        panel,
        body: host.body(),
        is_open: Cell::new(false),
    });

    let toggle_menu = Rc::clone(&menu);
    host.add_event_listener(
        EventTarget::Node(toggler),
        "click",
        listener(move |host, event| {
            event.prevent_default();
            event.stop_propagation();
            if toggle_menu.is_open.get() {
                toggle_menu.close(host)
            } else {
                toggle_menu.open(host)
            }
        }),
    );

    for link in links {
        let link_menu = Rc::clone(&menu);
        host.add_event_listener(
            EventTarget::Node(link),
            "click",
            listener(move |host, _event| {
                if host.inner_width() < breakpoint {
                    link_menu.close(host)?;
                }
                Ok(())
            }),
        );
    }

    let outside_menu = Rc::clone(&menu);
    let document = host.document();
    host.add_event_listener(
        EventTarget::Node(document),
        "click",
        listener(move |host, event| {
            if !outside_menu.is_open.get() {
                return Ok(());
            }
            let Some(target) = event.target_node() else {
                return Ok(());
            };
            if !host.contains(outside_menu.panel, target)
                && !host.contains(outside_menu.toggler, target)
            {
                outside_menu.close(host)?;
            }
            Ok(())
        }),
    );

    let escape_menu = Rc::clone(&menu);
    host.add_event_listener(
        EventTarget::Node(document),
        "keydown",
        listener(move |host, event| {
            if event.key.as_deref() == Some("Escape") && escape_menu.is_open.get() {
                escape_menu.close(host)?;
            }
            Ok(())
        }),
    );

    let resize_menu = Rc::clone(&menu);
    let on_resize = debounce(ctx.config.resize_debounce_ms, move |host, ()| {
        if host.inner_width() >= breakpoint && resize_menu.is_open.get() {
            resize_menu.close(host)?;
        }
        Ok(())
    });
    host.add_event_listener(EventTarget::Window, "resize", on_resize.listener());

    Ok(FeatureOutcome::Installed)
}
