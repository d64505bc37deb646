use super::*;

const SPY_HTML: &str = r##"
<html><head></head><body>
  <nav class="navbar">
    <a class="nav-link" href="#home">Home</a>
    <a class="nav-link" href="#services">Leistungen</a>
    <a class="nav-link" href="#contact">Kontakt</a>
    <a class="nav-link" href="/impressum.html">Impressum</a>
  </nav>
  <section id="home"><h1>Home</h1></section>
  <section id="services"><h2>Leistungen</h2></section>
  <section id="contact"><h2>Kontakt</h2></section>
</body></html>
"##;

fn spy_page() -> Result<Page> {
    let mut page = Page::from_html(SPY_HTML)?;
    page.set_layout(".navbar", LayoutBox::new(0.0, 0.0, 1280.0, 70.0))?;
    page.set_layout("#home", LayoutBox::new(0.0, 0.0, 1280.0, 600.0))?;
    page.set_layout("#services", LayoutBox::new(600.0, 0.0, 1280.0, 600.0))?;
    page.set_layout("#contact", LayoutBox::new(1200.0, 0.0, 1280.0, 600.0))?;
    let enhancer = Enhancer::new(EnhancerConfig::default())?;
    enhancer.attach(&mut page);
    Ok(page)
}

fn active_link(page: &Page) -> Result<Option<String>> {
    assert!(page.count(".nav-link.active")? <= 1);
    if page.count(".nav-link.active")? == 0 {
        return Ok(None);
    }
    page.attr_of(".nav-link.active", "href")
}

#[test]
fn scroll_spy_highlights_the_section_in_view() -> Result<()> {
    let mut page = spy_page()?;
    assert_eq!(active_link(&page)?.as_deref(), Some("#home"));
    page.assert_attr(r##".nav-link[href="#home"]"##, "aria-current", Some("page"))?;

    // Bands start 100px above each section.
    page.scroll_to(520.0)?;
    assert_eq!(active_link(&page)?.as_deref(), Some("#services"));
    page.assert_attr(r##".nav-link[href="#home"]"##, "aria-current", None)?;
    page.assert_attr(
        r##".nav-link[href="#services"]"##,
        "aria-current",
        Some("page"),
    )?;
    Ok(())
}

#[test]
fn scroll_spy_throttles_and_keeps_the_last_scroll() -> Result<()> {
    let mut page = spy_page()?;
    page.scroll_to(520.0)?;
    page.advance_time(50)?;
    page.scroll_to(1150.0)?;
    assert_eq!(active_link(&page)?.as_deref(), Some("#services"));

    page.advance_time(99)?;
    assert_eq!(active_link(&page)?.as_deref(), Some("#services"));
    page.advance_time(1)?;
    assert_eq!(active_link(&page)?.as_deref(), Some("#contact"));
    Ok(())
}

#[test]
fn scroll_spy_leaves_highlight_when_no_section_matches() -> Result<()> {
    let mut page = spy_page()?;
    page.scroll_to(1300.0)?;
    assert_eq!(active_link(&page)?.as_deref(), Some("#contact"));

    page.advance_time(500)?;
    page.scroll_to(5000.0)?;
    assert_eq!(active_link(&page)?.as_deref(), Some("#contact"));
    Ok(())
}

#[test]
fn anchor_click_scrolls_below_the_navbar() -> Result<()> {
    let mut page = spy_page()?;
    page.click(r##".nav-link[href="#contact"]"##)?;

    assert_eq!(
        page.take_scroll_requests(),
        vec![ScrollRequest {
            top: 1130.0,
            behavior: ScrollBehavior::Smooth,
        }]
    );
    assert_eq!(page.scroll_y(), 1130.0);
    assert_eq!(active_link(&page)?.as_deref(), Some("#contact"));
    Ok(())
}

#[test]
fn anchor_click_uses_fallback_offset_and_clamps_at_zero() -> Result<()> {
    let html = r##"
    <body>
      <a id="to-intro" href="#intro"><span id="label">Intro</span></a>
      <a id="to-faq" href="#faq">FAQ</a>
      <a id="bare" href="#">Top</a>
      <a id="missing" href="#nowhere">Nowhere</a>
      <div id="intro"></div>
      <div id="faq"></div>
    </body>
    "##;
    let mut page = Page::from_html(html)?;
    page.set_layout("#intro", LayoutBox::new(50.0, 0.0, 800.0, 300.0))?;
    page.set_layout("#faq", LayoutBox::new(2000.0, 0.0, 800.0, 300.0))?;
    let enhancer = Enhancer::new(EnhancerConfig::default())?;
    enhancer.attach(&mut page);

    page.click("#label")?;
    page.click("#to-faq")?;
    assert_eq!(
        page.take_scroll_requests(),
        vec![
            ScrollRequest {
                top: 0.0,
                behavior: ScrollBehavior::Smooth,
            },
            ScrollRequest {
                top: 1920.0,
                behavior: ScrollBehavior::Smooth,
            },
        ]
    );

    page.click("#bare")?;
    page.click("#missing")?;
    assert!(page.take_scroll_requests().is_empty());
    assert!(page.url().ends_with("#nowhere"));
    Ok(())
}

const REVEAL_HTML: &str = r#"
<body>
  <div class="card" id="near">Nah</div>
  <div class="service-card" id="far">Fern</div>
</body>
"#;

#[test]
fn reveal_hides_targets_until_they_scroll_into_view() -> Result<()> {
    let mut page = Page::from_html(REVEAL_HTML)?;
    page.set_layout("#near", LayoutBox::new(200.0, 0.0, 400.0, 200.0))?;
    page.set_layout("#far", LayoutBox::new(2000.0, 0.0, 400.0, 200.0))?;
    let enhancer = Enhancer::new(EnhancerConfig::default())?;
    enhancer.attach(&mut page);

    assert_eq!(page.style_of("#far", "opacity")?.as_deref(), Some("0"));
    assert_eq!(
        page.style_of("#far", "transform")?.as_deref(),
        Some("translateY(30px)")
    );
    assert_eq!(
        page.style_of("#far", "transition")?.as_deref(),
        Some("opacity 0.8s ease-out, transform 0.8s ease-out")
    );

    page.run_due_timers()?;
    assert_eq!(page.style_of("#near", "opacity")?.as_deref(), Some("1"));
    assert_eq!(
        page.style_of("#near", "transform")?.as_deref(),
        Some("translateY(0)")
    );
    assert_eq!(page.style_of("#far", "opacity")?.as_deref(), Some("0"));

    // 10px of 200 inside the shrunken viewport is below the threshold.
    page.scroll_to(1260.0)?;
    page.run_due_timers()?;
    assert_eq!(page.style_of("#far", "opacity")?.as_deref(), Some("0"));

    page.scroll_to(1400.0)?;
    page.run_due_timers()?;
    assert_eq!(page.style_of("#far", "opacity")?.as_deref(), Some("1"));

    // Revealed elements stay revealed.
    page.scroll_to(0.0)?;
    page.run_due_timers()?;
    assert_eq!(page.style_of("#far", "opacity")?.as_deref(), Some("1"));
    Ok(())
}

#[test]
fn reveal_without_observer_support_shows_everything() -> Result<()> {
    let mut page = Page::from_html(REVEAL_HTML)?;
    page.set_intersection_observer_supported(false);
    page.set_layout("#far", LayoutBox::new(2000.0, 0.0, 400.0, 200.0))?;
    let enhancer = Enhancer::new(EnhancerConfig::default())?;
    let report = enhancer.attach(&mut page);

    assert_eq!(
        report.and_then(|report| report.outcome(Feature::ScrollReveal).cloned()),
        Some(FeatureOutcome::Installed)
    );
    assert_eq!(page.style_of("#far", "opacity")?.as_deref(), Some("1"));
    assert_eq!(
        page.style_of("#far", "transform")?.as_deref(),
        Some("translateY(0)")
    );
    assert!(page.pending_timers().is_empty());
    Ok(())
}

#[test]
fn scroll_to_top_button_follows_scroll_offset() -> Result<()> {
    let (mut page, _enhancer) = enhanced_page("<html><body><main>Inhalt</main></body></html>")?;
    page.assert_text("button.scroll-to-top", "↑")?;
    page.assert_attr(
        "button.scroll-to-top",
        "aria-label",
        Some("Nach oben scrollen"),
    )?;
    assert_eq!(
        page.style_of(".scroll-to-top", "visibility")?.as_deref(),
        Some("hidden")
    );

    page.scroll_to(400.0)?;
    assert_eq!(page.style_of(".scroll-to-top", "opacity")?.as_deref(), Some("1"));
    assert_eq!(
        page.style_of(".scroll-to-top", "visibility")?.as_deref(),
        Some("visible")
    );

    page.advance_time(200)?;
    page.scroll_to(300.0)?;
    assert_eq!(page.style_of(".scroll-to-top", "opacity")?.as_deref(), Some("0"));
    assert_eq!(
        page.style_of(".scroll-to-top", "visibility")?.as_deref(),
        Some("hidden")
    );
    Ok(())
}

#[test]
fn scroll_to_top_click_scrolls_home_smoothly() -> Result<()> {
    let (mut page, _enhancer) = enhanced_page("<body><main>Inhalt</main></body>")?;
    page.scroll_to(900.0)?;
    page.click(".scroll-to-top")?;

    assert_eq!(
        page.take_scroll_requests(),
        vec![ScrollRequest {
            top: 0.0,
            behavior: ScrollBehavior::Smooth,
        }]
    );
    assert_eq!(page.scroll_y(), 0.0);

    page.hover(".scroll-to-top")?;
    assert_eq!(
        page.style_of(".scroll-to-top", "transform")?.as_deref(),
        Some("translateY(-5px)")
    );
    page.unhover(".scroll-to-top")?;
    assert_eq!(
        page.style_of(".scroll-to-top", "box-shadow")?.as_deref(),
        Some("0 4px 16px rgba(0,0,0,0.2)")
    );
    Ok(())
}

#[test]
fn scroll_to_top_skips_pages_without_body() -> Result<()> {
    let mut page = Page::from_html("<div>fragment</div>")?;
    let enhancer = Enhancer::new(EnhancerConfig::default())?;
    let report = enhancer.init(&mut page);
    assert_eq!(
        report.outcome(Feature::ScrollToTop),
        Some(&FeatureOutcome::Skipped("no body"))
    );
    assert_eq!(page.count(".scroll-to-top")?, 0);
    Ok(())
}
