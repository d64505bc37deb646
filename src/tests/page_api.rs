use std::cell::RefCell;
use std::rc::Rc;

use super::*;

const NESTED_HTML: &str = r#"
<html><head></head><body>
  <div id="outer"><p id="inner">Text</p></div>
  <input id="city" value="Köln">
</body></html>
"#;

type Seen = Rc<RefCell<Vec<String>>>;

fn recording_listener(seen: &Seen, label: &'static str, stop_immediate: bool) -> ListenerFn {
    let seen = Rc::clone(seen);
    Rc::new(move |host: &mut dyn Host, event: &mut Event| {
        let current = event
            .current_node()
            .and_then(|node| host.attr(node, "id"))
            .unwrap_or_else(|| "window".into());
        seen.borrow_mut().push(format!("{label}@{current}"));
        if stop_immediate {
            event.stop_immediate_propagation();
        }
        Ok(())
    })
}

fn node(page: &Page, id: &str) -> Result<NodeId> {
    Host::element_by_id(page, id).ok_or_else(|| Error::SelectorNotFound(format!("#{id}")))
}

#[test]
fn events_bubble_from_target_to_ancestors_and_window() -> Result<()> {
    let mut page = Page::from_html(NESTED_HTML)?;
    let seen: Seen = Rc::default();
    let inner = node(&page, "inner")?;
    let outer = node(&page, "outer")?;
    page.add_event_listener(
        EventTarget::Node(outer),
        "ping",
        recording_listener(&seen, "outer", false),
    );
    page.add_event_listener(
        EventTarget::Node(inner),
        "ping",
        recording_listener(&seen, "inner", false),
    );
    page.add_event_listener(
        EventTarget::Window,
        "ping",
        recording_listener(&seen, "win", false),
    );

    page.dispatch("#inner", "ping")?;
    assert_eq!(
        *seen.borrow(),
        vec!["inner@inner", "outer@outer", "win@window"]
    );
    Ok(())
}

#[test]
fn stop_immediate_propagation_skips_later_listeners() -> Result<()> {
    let mut page = Page::from_html(NESTED_HTML)?;
    let seen: Seen = Rc::default();
    let inner = node(&page, "inner")?;
    let outer = node(&page, "outer")?;
    page.add_event_listener(
        EventTarget::Node(inner),
        "ping",
        recording_listener(&seen, "first", true),
    );
    page.add_event_listener(
        EventTarget::Node(inner),
        "ping",
        recording_listener(&seen, "second", false),
    );
    page.add_event_listener(
        EventTarget::Node(outer),
        "ping",
        recording_listener(&seen, "outer", false),
    );

    page.dispatch("#inner", "ping")?;
    assert_eq!(*seen.borrow(), vec!["first@inner"]);
    Ok(())
}

#[test]
fn window_events_reach_only_window_listeners() -> Result<()> {
    let mut page = Page::from_html(NESTED_HTML)?;
    let seen: Seen = Rc::default();
    let outer = node(&page, "outer")?;
    page.add_event_listener(
        EventTarget::Node(outer),
        "resize",
        recording_listener(&seen, "outer", false),
    );
    page.add_event_listener(
        EventTarget::Window,
        "resize",
        recording_listener(&seen, "win", false),
    );

    page.dispatch_on_window("resize")?;
    assert_eq!(*seen.borrow(), vec!["win@window"]);
    Ok(())
}

#[test]
fn inspection_helpers_read_values_and_markup() -> Result<()> {
    let mut page = Page::from_html(NESTED_HTML)?;
    assert_eq!(page.value_of("#city")?, "Köln");
    page.type_text("#city", "Bonn")?;
    assert_eq!(page.value_of("#city")?, "Bonn");

    page.assert_exists("#outer > #inner")?;
    assert!(matches!(
        page.assert_exists("#outer > span"),
        Err(Error::SelectorNotFound(_))
    ));
    assert_eq!(
        page.dump_dom("#outer")?,
        r#"<div id="outer"><p id="inner">Text</p></div>"#
    );
    Ok(())
}

#[test]
fn navigations_record_the_url_they_leave() -> Result<()> {
    let mut page = Page::from_html(NESTED_HTML)?;
    page.set_url("https://praxis.example/kontakt");
    Host::navigate(&mut page, "thank_you.html")?;

    assert_eq!(page.url(), "thank_you.html");
    assert_eq!(
        page.take_location_navigations(),
        vec![LocationNavigation {
            kind: LocationNavigationKind::Assign,
            from: "https://praxis.example/kontakt".into(),
            to: "thank_you.html".into(),
        }]
    );
    Ok(())
}
