use super::Page;
use crate::dom::{LayoutBox, NodeId};
use crate::host::EventTarget;
use crate::runtime_state::{Event, LocationNavigationKind};
use crate::{Error, Result};

impl Page {
    /// Clicks the first element matching `selector`, then runs the default
    /// action unless a listener prevented it: checkbox/radio toggling, form
    /// submission for submit buttons, and link navigation.
    pub fn click(&mut self, selector: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        self.click_node(target)
    }

    pub(crate) fn click_node(&mut self, target: NodeId) -> Result<()> {
        if self.dom.disabled(target) {
            return Ok(());
        }

        let outcome = self.dispatch_event(target, "click")?;
        if outcome.default_prevented {
            return Ok(());
        }

        match self.dom.input_type(target).as_str() {
            "checkbox" => {
                let current = self.dom.checked(target)?;
                self.dom.set_checked(target, !current)?;
                self.dispatch_event(target, "input")?;
                self.dispatch_event(target, "change")?;
                return Ok(());
            }
            "radio" => {
                if !self.dom.checked(target)? {
                    self.dom.set_checked(target, true)?;
                    self.dispatch_event(target, "input")?;
                    self.dispatch_event(target, "change")?;
                }
                return Ok(());
            }
            _ => {}
        }

        if self.is_submit_control(target) {
            if let Some(form) = self.form_owner(target) {
                return self.submit_form(form);
            }
            return Ok(());
        }

        if let Some(anchor) = self.dom.closest(target, "a[href]")? {
            let href = self.dom.attr(anchor, "href").unwrap_or_default();
            self.follow_link(&href)?;
        }
        Ok(())
    }

    fn follow_link(&mut self, href: &str) -> Result<()> {
        let Some(fragment) = href.strip_prefix('#') else {
            self.record_navigation(LocationNavigationKind::AnchorClick, href);
            return Ok(());
        };
        let base = self
            .platform
            .url
            .split('#')
            .next()
            .unwrap_or_default()
            .to_string();
        self.platform.url = format!("{base}{href}");
        if let Some(node) = self.dom.by_id(fragment) {
            let top = self.dom.layout(node).top;
            self.apply_scroll(top)?;
        }
        Ok(())
    }

    fn is_submit_control(&self, node: NodeId) -> bool {
        match self.dom.tag_name(node) {
            Some("button") => self
                .dom
                .attr(node, "type")
                .is_none_or(|kind| kind.eq_ignore_ascii_case("submit")),
            Some("input") => self.dom.input_type(node) == "submit",
            _ => false,
        }
    }

    fn form_owner(&self, node: NodeId) -> Option<NodeId> {
        let mut cursor = Some(node);
        while let Some(current) = cursor {
            if self.dom.has_tag(current, "form") {
                return Some(current);
            }
            cursor = self.dom.parent(current);
        }
        None
    }

    /// Dispatches `submit` on the form matching `selector` (or the form
    /// owning the matched control). An unprevented submit is recorded as a
    /// navigation to the form's `action`.
    pub fn submit(&mut self, selector: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        let Some(form) = self.form_owner(target) else {
            return Err(Error::TypeMismatch {
                selector: selector.to_string(),
                expected: "form or form control".into(),
                actual: self.node_label(target),
            });
        };
        self.submit_form(form)
    }

    fn submit_form(&mut self, form: NodeId) -> Result<()> {
        let outcome = self.dispatch_event(form, "submit")?;
        if outcome.default_prevented {
            return Ok(());
        }
        let action = self
            .dom
            .attr(form, "action")
            .filter(|action| !action.is_empty())
            .unwrap_or_else(|| self.platform.url.clone());
        self.record_navigation(LocationNavigationKind::FormSubmit, &action);
        Ok(())
    }

    /// Replaces the value of an input or textarea and dispatches `input`.
    pub fn type_text(&mut self, selector: &str, text: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        if self.dom.disabled(target) {
            return Ok(());
        }
        let tag = self.dom.tag_name(target).unwrap_or_default().to_string();
        if tag != "input" && tag != "textarea" {
            return Err(Error::TypeMismatch {
                selector: selector.to_string(),
                expected: "input or textarea".into(),
                actual: tag,
            });
        }
        self.dom.set_value(target, text)?;
        self.dispatch_event(target, "input")?;
        Ok(())
    }

    pub fn set_checked(&mut self, selector: &str, checked: bool) -> Result<()> {
        let target = self.select_one(selector)?;
        let kind = self.dom.input_type(target);
        if kind != "checkbox" && kind != "radio" {
            return Err(Error::TypeMismatch {
                selector: selector.to_string(),
                expected: "checkbox or radio input".into(),
                actual: kind,
            });
        }
        if self.dom.disabled(target) {
            return Ok(());
        }
        if self.dom.checked(target)? != checked {
            self.dom.set_checked(target, checked)?;
            self.dispatch_event(target, "input")?;
            self.dispatch_event(target, "change")?;
        }
        Ok(())
    }

    pub fn focus(&mut self, selector: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        self.focus_node(target)
    }

    pub fn blur(&mut self, selector: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        self.blur_node(target)
    }

    pub(crate) fn focus_node(&mut self, node: NodeId) -> Result<()> {
        if self.dom.disabled(node) || self.active_element == Some(node) {
            return Ok(());
        }
        if let Some(current) = self.active_element {
            self.blur_node(current)?;
        }
        self.active_element = Some(node);
        self.dispatch_event(node, "focus")?;
        self.dispatch_event(node, "focusin")?;
        Ok(())
    }

    pub(crate) fn blur_node(&mut self, node: NodeId) -> Result<()> {
        if self.active_element != Some(node) {
            return Ok(());
        }
        self.active_element = None;
        self.dispatch_event(node, "blur")?;
        self.dispatch_event(node, "focusout")?;
        Ok(())
    }

    /// Dispatches `keydown` on the focused element, or the document when
    /// nothing has focus.
    pub fn press_key(&mut self, key: &str) -> Result<()> {
        let target = self.active_element.unwrap_or(self.dom.root);
        let event = Event::new("keydown", EventTarget::Node(target)).with_key(key);
        self.dispatch_prepared_event(event)?;
        Ok(())
    }

    pub fn hover(&mut self, selector: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        self.dispatch_event(target, "mouseenter")?;
        Ok(())
    }

    pub fn unhover(&mut self, selector: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        self.dispatch_event(target, "mouseleave")?;
        Ok(())
    }

    /// Presses the primary button at viewport coordinates `(client_x, client_y)`.
    pub fn mouse_down(&mut self, selector: &str, client_x: f64, client_y: f64) -> Result<()> {
        self.mouse_down_with_button(selector, 0, client_x, client_y)
    }

    /// `button` follows `MouseEvent.button`: 0 primary, 1 auxiliary, 2 secondary.
    pub fn mouse_down_with_button(
        &mut self,
        selector: &str,
        button: i16,
        client_x: f64,
        client_y: f64,
    ) -> Result<()> {
        let target = self.select_one(selector)?;
        let event = Event::new("mousedown", EventTarget::Node(target))
            .with_pointer(client_x, client_y)
            .with_button(button);
        self.dispatch_prepared_event(event)?;
        Ok(())
    }

    /// User scroll: moves the viewport and dispatches `scroll` on the window.
    pub fn scroll_to(&mut self, scroll_y: f64) -> Result<()> {
        if !scroll_y.is_finite() {
            return Err(Error::Runtime(format!(
                "scroll offset must be finite: {scroll_y}"
            )));
        }
        self.apply_scroll(scroll_y)
    }

    /// Resizes the viewport and dispatches `resize` on the window.
    pub fn resize(&mut self, width: f64, height: f64) -> Result<()> {
        self.set_viewport(width, height);
        self.queue_intersection_check();
        self.dispatch_window_event("resize")?;
        Ok(())
    }

    /// Simulates a failed image fetch by dispatching `error` on the image.
    pub fn fail_image_load(&mut self, selector: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        if !self.dom.has_tag(target, "img") {
            return Err(Error::TypeMismatch {
                selector: selector.to_string(),
                expected: "img".into(),
                actual: self.node_label(target),
            });
        }
        self.dispatch_event(target, "error")?;
        Ok(())
    }

    /// Dispatches a plain event of `event_type` on the first match.
    pub fn dispatch(&mut self, selector: &str, event_type: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        self.dispatch_event(target, event_type)?;
        Ok(())
    }

    pub fn dispatch_on_window(&mut self, event_type: &str) -> Result<()> {
        self.dispatch_window_event(event_type)?;
        Ok(())
    }

    /// Sets the document-coordinate box of the first match.
    pub fn set_layout(&mut self, selector: &str, layout: LayoutBox) -> Result<()> {
        let target = self.select_one(selector)?;
        self.dom.set_layout(target, layout);
        self.queue_intersection_check();
        Ok(())
    }
}
