use std::rc::Rc;

use super::{FeatureContext, px};
use crate::Result;
use crate::bootstrap::FeatureOutcome;
use crate::host::{Host, IntersectionEntry, IntersectionOptions, ObserverId, RootMargin};

const REVEAL_TARGETS: &str =
    ".card, .btn, img, .hero-section, .accordion-item, .service-card, .breadcrumb";

pub(crate) fn init(host: &mut dyn Host, ctx: &FeatureContext) -> Result<FeatureOutcome> {
    let targets = host.query_selector_all(REVEAL_TARGETS)?;
    if targets.is_empty() {
        return Ok(FeatureOutcome::Skipped("no reveal targets"));
    }

    if !host.supports_intersection_observer() {
        for target in targets {
            host.set_style(target, "opacity", "1")?;
            host.set_style(target, "transform", "translateY(0)")?;
        }
        return Ok(FeatureOutcome::Installed);
    }

    let options = IntersectionOptions {
        threshold: ctx.config.reveal_threshold,
        root_margin: RootMargin {
            bottom: ctx.config.reveal_bottom_margin,
            ..RootMargin::default()
        },
    };
    let observer = host.create_intersection_observer(
        options,
        Rc::new(
            |host: &mut dyn Host, observer: ObserverId, entries: &[IntersectionEntry]| {
                for entry in entries.iter().filter(|entry| entry.is_intersecting) {
                    host.set_style(entry.target, "opacity", "1")?;
                    host.set_style(entry.target, "transform", "translateY(0)")?;
                    host.unobserve(observer, entry.target);
                }
                Ok(())
            },
        ),
    );

    let hidden_transform = format!("translateY({})", px(ctx.config.reveal_offset));
    for target in targets {
        host.set_style(target, "opacity", "0")?;
        host.set_style(target, "transform", &hidden_transform)?;
        host.set_style(
            target,
            "transition",
            "opacity 0.8s ease-out, transform 0.8s ease-out",
        )?;
        host.observe(observer, target);
    }

    Ok(FeatureOutcome::Installed)
}
