//! Nodes with a bounded lifetime: ripple spans and modal overlays.

use std::cell::Cell;
use std::rc::Rc;

use crate::Result;
use crate::dom::NodeId;
use crate::host::{Host, TimerId};

#[derive(Debug, Default)]
struct TeardownState {
    timer: Cell<Option<TimerId>>,
    removed: Cell<bool>,
}

/// Handle to an attached node that owns at most one pending teardown.
///
/// Clones share the same teardown slot, so listeners holding a clone see
/// a removal scheduled through any other clone.
#[derive(Debug, Clone)]
pub struct Transient {
    node: NodeId,
    state: Rc<TeardownState>,
}

impl Transient {
    /// Appends `node` to `parent` and takes ownership of its lifetime.
    pub fn attach(host: &mut dyn Host, parent: NodeId, node: NodeId) -> Result<Self> {
        host.append_child(parent, node)?;
        Ok(Self {
            node,
            state: Rc::new(TeardownState::default()),
        })
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Schedules removal `delay_ms` from now. Returns `false` without
    /// scheduling anything when a teardown is already pending or the node
    /// is gone.
    pub fn remove_after(&self, host: &mut dyn Host, delay_ms: i64) -> bool {
        if self.state.removed.get() || self.state.timer.get().is_some() {
            return false;
        }
        let handle = self.clone();
        let timer = host.set_timeout(
            delay_ms,
            Box::new(move |host: &mut dyn Host| {
                handle.state.timer.set(None);
                handle.remove_now(host)
            }),
        );
        self.state.timer.set(Some(timer));
        true
    }

    /// Cancels a pending teardown; the node stays attached.
    pub fn cancel_teardown(&self, host: &mut dyn Host) -> bool {
        match self.state.timer.take() {
            Some(timer) => {
                host.clear_timeout(timer);
                true
            }
            None => false,
        }
    }

    /// Detaches the node now, dropping any pending teardown.
    pub fn remove_now(&self, host: &mut dyn Host) -> Result<()> {
        if self.state.removed.replace(true) {
            return Ok(());
        }
        if let Some(timer) = self.state.timer.take() {
            host.clear_timeout(timer);
        }
        host.remove_node(self.node)
    }

    pub fn is_teardown_pending(&self) -> bool {
        self.state.timer.get().is_some()
    }

    pub fn is_removed(&self) -> bool {
        self.state.removed.get()
    }
}

#[cfg(test)]
mod tests {
    use super::Transient;
    use crate::Result;
    use crate::host::Host;
    use crate::page::Page;

    #[test]
    fn second_removal_request_is_ignored() -> Result<()> {
        let mut page = Page::from_html("<body><div id='root'></div></body>")?;
        let root = page.element_by_id("root").expect("root");
        let span = page.create_element("span");
        let transient = Transient::attach(&mut page, root, span)?;

        assert!(transient.remove_after(&mut page, 300));
        page.advance_time(100)?;
        assert!(!transient.remove_after(&mut page, 300));
        assert_eq!(page.pending_timers().len(), 1);

        page.advance_time(200)?;
        assert!(transient.is_removed());
        assert!(!page.is_connected(span));
        assert_eq!(page.count("span")?, 0);
        Ok(())
    }

    #[test]
    fn cancelled_teardown_keeps_the_node() -> Result<()> {
        let mut page = Page::from_html("<body></body>")?;
        let body = page.body().expect("body");
        let span = page.create_element("span");
        let transient = Transient::attach(&mut page, body, span)?;

        transient.remove_after(&mut page, 600);
        assert!(transient.cancel_teardown(&mut page));
        page.advance_time(1_000)?;

        assert!(!transient.is_removed());
        assert!(page.is_connected(span));
        Ok(())
    }
}
