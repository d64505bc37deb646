use std::cell::Cell;
use std::rc::Rc;

use super::FeatureContext;
use crate::Result;
use crate::bootstrap::FeatureOutcome;
use crate::dom::NodeId;
use crate::host::{Host, IntersectionEntry, IntersectionOptions, ObserverId};
use crate::intl::format_integer;

struct CountUp {
    node: NodeId,
    target: i64,
    duration_ms: f64,
    started_at: Cell<Option<f64>>,
}

pub(crate) fn init(host: &mut dyn Host, ctx: &FeatureContext) -> Result<FeatureOutcome> {
    let counters = host.query_selector_all("[data-count]")?;
    if counters.is_empty() {
        return Ok(FeatureOutcome::Skipped("no [data-count] elements"));
    }
    if !host.supports_intersection_observer() {
        return Ok(FeatureOutcome::Skipped("intersection observation unavailable"));
    }

    let duration_ms = ctx.config.count_up_duration_ms;
    let observer = host.create_intersection_observer(
        IntersectionOptions {
            threshold: ctx.config.count_up_threshold,
            ..IntersectionOptions::default()
        },
        Rc::new(
            move |host: &mut dyn Host, observer: ObserverId, entries: &[IntersectionEntry]| {
                for entry in entries.iter().filter(|entry| entry.is_intersecting) {
                    host.unobserve(observer, entry.target);
                    start(host, entry.target, duration_ms);
                }
                Ok(())
            },
        ),
    );
    for counter in counters {
        host.observe(observer, counter);
    }

    Ok(FeatureOutcome::Installed)
}

/// Elements whose `data-count` has no integer prefix are left alone.
fn start(host: &mut dyn Host, node: NodeId, duration_ms: f64) {
    let Some(target) = host.attr(node, "data-count").as_deref().and_then(parse_int) else {
        return;
    };
    let animation = Rc::new(CountUp {
        node,
        target,
        duration_ms,
        started_at: Cell::new(None),
    });
    request_step(host, animation);
}

fn request_step(host: &mut dyn Host, animation: Rc<CountUp>) {
    host.request_animation_frame(Box::new(move |host: &mut dyn Host, timestamp: f64| {
        step(host, animation, timestamp)
    }));
}

fn step(host: &mut dyn Host, animation: Rc<CountUp>, timestamp: f64) -> Result<()> {
    let started_at = animation.started_at.get().unwrap_or(timestamp);
    animation.started_at.set(Some(started_at));
    let elapsed = timestamp - started_at;
    let locale = host.locale();

    let current = count_up_value(elapsed, animation.duration_ms, animation.target);
    host.set_text_content(animation.node, &format_integer(current, &locale))?;

    if elapsed < animation.duration_ms {
        request_step(host, animation);
    } else {
        host.set_text_content(animation.node, &format_integer(animation.target, &locale))?;
    }
    Ok(())
}

/// Displayed value `elapsed_ms` into an animation towards `target`:
/// `min(floor(elapsed / duration * target), target)`.
pub(crate) fn count_up_value(elapsed_ms: f64, duration_ms: f64, target: i64) -> i64 {
    let scaled = (elapsed_ms / duration_ms * target as f64).floor();
    (scaled as i64).min(target)
}

/// Integer prefix of `src` the way `parseInt(src)` reads it: leading
/// whitespace, an optional sign, then decimal digits or a `0x` hex run.
pub(crate) fn parse_int(src: &str) -> Option<i64> {
    let trimmed = src.trim_start();
    let (negative, unsigned) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let (radix, body) = match unsigned.get(..2) {
        Some("0x" | "0X") => (16, &unsigned[2..]),
        _ => (10, unsigned),
    };
    let digits = body
        .char_indices()
        .find(|(_, ch)| !ch.is_digit(radix))
        .map_or(body, |(end, _)| &body[..end]);
    if digits.is_empty() {
        return None;
    }

    let magnitude = i64::from_str_radix(digits, radix).ok()?;
    Some(if negative { -magnitude } else { magnitude })
}
