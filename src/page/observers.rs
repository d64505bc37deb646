use super::Page;
use crate::Result;
use crate::dom::NodeId;
use crate::host::{Host, IntersectionEntry, IntersectionOptions, ObserverId};

impl Page {
    /// Delivers one batch of entries per observer whose targets changed
    /// intersecting state since the last delivery. A freshly observed
    /// target always gets an initial entry.
    pub(crate) fn run_intersection_check(&mut self) -> Result<()> {
        for index in 0..self.observers.len() {
            let Some(observer) = self.observers.get(index) else {
                break;
            };
            let options = observer.options;
            let targets = observer.targets.clone();

            let mut entries = Vec::new();
            let mut next_states = Vec::with_capacity(targets.len());
            for (target, previous) in targets {
                let (is_intersecting, ratio) = self.intersection_state(target, &options);
                if previous != Some(is_intersecting) {
                    entries.push(IntersectionEntry {
                        target,
                        is_intersecting,
                        intersection_ratio: ratio,
                    });
                }
                next_states.push((target, is_intersecting));
            }

            let Some(observer) = self.observers.get_mut(index) else {
                break;
            };
            for (target, state) in next_states {
                if let Some(slot) = observer.targets.iter_mut().find(|(node, _)| *node == target)
                {
                    slot.1 = Some(state);
                }
            }
            if entries.is_empty() {
                continue;
            }

            let callback = observer.callback.clone();
            self.trace_event_line(format!(
                "[event] intersection observer={index} entries={}",
                entries.len()
            ));
            let host: &mut dyn Host = self;
            callback(host, ObserverId(index), &entries)?;
        }
        Ok(())
    }

    fn intersection_state(&self, target: NodeId, options: &IntersectionOptions) -> (bool, f64) {
        if !self.dom.is_connected(target) {
            return (false, 0.0);
        }
        let layout = self.dom.layout(target);
        let margin = options.root_margin;
        let root_top = -margin.top;
        let root_bottom = self.viewport.height + margin.bottom;
        let root_left = -margin.left;
        let root_right = self.viewport.width + margin.right;

        let top = layout.top - self.viewport.scroll_y;
        let vertical = axis_fraction(top, layout.height, root_top, root_bottom);
        let horizontal = axis_fraction(layout.left, layout.width, root_left, root_right);
        let Some(ratio) = vertical.zip(horizontal).map(|(v, h)| v * h) else {
            return (false, 0.0);
        };
        (ratio >= options.threshold, ratio)
    }
}

/// Visible fraction of `[start, start + len)` inside `[lo, hi]`; `None`
/// when the span lies entirely outside. Zero-length spans count as fully
/// visible when their position is inside.
fn axis_fraction(start: f64, len: f64, lo: f64, hi: f64) -> Option<f64> {
    if len <= 0.0 {
        return (start >= lo && start <= hi).then_some(1.0);
    }
    let visible = (start + len).min(hi) - start.max(lo);
    if visible <= 0.0 {
        return None;
    }
    Some(visible / len)
}
