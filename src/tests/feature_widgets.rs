use super::*;
use crate::features::images::PLACEHOLDER_SRC;

const BUTTON_HTML: &str = r#"
<html><head><title>Start</title></head><body>
  <div class="hero-section">
    <button class="btn btn-primary" id="cta">Termin buchen</button>
    <a class="btn-outline" id="more" href="/mehr">Mehr</a>
  </div>
</body></html>
"#;

fn button_page() -> Result<Page> {
    let mut page = Page::from_html(BUTTON_HTML)?;
    page.set_layout("#cta", LayoutBox::new(100.0, 20.0, 200.0, 50.0))?;
    let enhancer = Enhancer::new(EnhancerConfig::default())?;
    enhancer.attach(&mut page);
    page.run_due_timers()?;
    Ok(page)
}

#[test]
fn ripple_is_positioned_at_the_pointer_and_removed_after_its_animation() -> Result<()> {
    let mut page = button_page()?;
    page.mouse_down("#cta", 70.0, 45.0)?;

    assert_eq!(page.count("#cta span")?, 1);
    assert_eq!(page.style_of("#cta span", "width")?.as_deref(), Some("200px"));
    assert_eq!(page.style_of("#cta span", "height")?.as_deref(), Some("200px"));
    assert_eq!(page.style_of("#cta span", "left")?.as_deref(), Some("-50px"));
    assert_eq!(page.style_of("#cta span", "top")?.as_deref(), Some("-155px"));
    assert_eq!(
        page.style_of("#cta span", "animation")?.as_deref(),
        Some("ripple 0.6s ease-out")
    );
    assert_eq!(
        page.style_of("#cta span", "pointer-events")?.as_deref(),
        Some("none")
    );
    assert_eq!(page.style_of("#cta", "position")?.as_deref(), Some("relative"));
    assert_eq!(page.style_of("#cta", "overflow")?.as_deref(), Some("hidden"));

    page.advance_time(599)?;
    assert_eq!(page.count("#cta span")?, 1);
    page.advance_time(1)?;
    assert_eq!(page.count("#cta span")?, 0);
    Ok(())
}

#[test]
fn overlapping_ripples_each_expire_on_their_own_schedule() -> Result<()> {
    let mut page = button_page()?;
    page.mouse_down("#cta", 120.0, 110.0)?;
    page.advance_time(300)?;
    page.mouse_down("#cta", 130.0, 120.0)?;
    assert_eq!(page.count("#cta span")?, 2);

    page.advance_time(300)?;
    assert_eq!(page.count("#cta span")?, 1);
    page.advance_time(300)?;
    assert_eq!(page.count("#cta span")?, 0);
    Ok(())
}

#[test]
fn only_primary_button_presses_spawn_ripples() -> Result<()> {
    let mut page = button_page()?;
    page.mouse_down_with_button("#cta", 2, 70.0, 45.0)?;
    page.mouse_down_with_button("#cta", 1, 70.0, 45.0)?;
    assert_eq!(page.count("#cta span")?, 0);

    page.mouse_down_with_button("#cta", 0, 70.0, 45.0)?;
    assert_eq!(page.count("#cta span")?, 1);
    Ok(())
}

#[test]
fn ripple_keeps_existing_positioning() -> Result<()> {
    let html = r#"
    <body>
      <a class="btn" id="fixed" href="/x" style="position: absolute; overflow: hidden;">Los</a>
    </body>
    "#;
    let (mut page, _enhancer) = enhanced_page(html)?;
    page.mouse_down("#fixed", 0.0, 0.0)?;
    assert_eq!(page.style_of("#fixed", "position")?.as_deref(), Some("absolute"));
    assert_eq!(page.count("#fixed span")?, 1);
    Ok(())
}

#[test]
fn keyframes_are_installed_once_in_head() -> Result<()> {
    let page = button_page()?;
    assert_eq!(page.count("head style")?, 1);
    assert_eq!(
        page.text_of("head style")?,
        "@keyframes ripple { to { transform: scale(4); opacity: 0; } }"
    );
    Ok(())
}

#[test]
fn hover_lifts_buttons_and_class_matched_links() -> Result<()> {
    let mut page = button_page()?;
    page.hover("#cta")?;
    assert_eq!(
        page.style_of("#cta", "transform")?.as_deref(),
        Some("translateY(-2px)")
    );
    assert_eq!(
        page.style_of("#cta", "transition")?.as_deref(),
        Some("all 0.3s cubic-bezier(0.4, 0, 0.2, 1)")
    );
    page.unhover("#cta")?;
    assert_eq!(
        page.style_of("#cta", "transform")?.as_deref(),
        Some("translateY(0)")
    );

    page.hover("#more")?;
    assert_eq!(
        page.style_of("#more", "transform")?.as_deref(),
        Some("translateY(-2px)")
    );
    Ok(())
}

#[test]
fn card_hover_lifts_and_restores() -> Result<()> {
    let html = r#"
    <body>
      <div class="service-card" id="svc">Beratung</div>
      <div class="accordion-item" id="faq">Frage</div>
    </body>
    "#;
    let (mut page, _enhancer) = enhanced_page(html)?;

    page.hover("#svc")?;
    assert_eq!(
        page.style_of("#svc", "transform")?.as_deref(),
        Some("translateY(-8px) scale(1.02)")
    );
    assert_eq!(
        page.style_of("#svc", "box-shadow")?.as_deref(),
        Some("0 12px 40px rgba(0,0,0,0.15)")
    );

    page.unhover("#svc")?;
    assert_eq!(
        page.style_of("#svc", "transform")?.as_deref(),
        Some("translateY(0) scale(1)")
    );
    assert_eq!(page.style_of("#svc", "box-shadow")?, None);

    page.hover("#faq")?;
    assert_eq!(
        page.style_of("#faq", "transform")?.as_deref(),
        Some("translateY(-8px) scale(1.02)")
    );
    Ok(())
}

#[test]
fn images_load_lazily_and_fall_back_to_placeholder() -> Result<()> {
    let html = r#"
    <body>
      <img id="team" src="team.jpg" alt="Team">
      <img id="logo" src="logo.svg" loading="eager" alt="Logo">
    </body>
    "#;
    let (mut page, _enhancer) = enhanced_page(html)?;
    page.assert_attr("#team", "loading", Some("lazy"))?;
    page.assert_attr("#logo", "loading", Some("eager"))?;

    page.fail_image_load("#team")?;
    page.assert_attr("#team", "src", Some(PLACEHOLDER_SRC))?;
    page.fail_image_load("#team")?;
    page.assert_attr("#team", "src", Some(PLACEHOLDER_SRC))?;
    page.assert_attr("#logo", "src", Some("logo.svg"))?;

    assert!(matches!(
        page.fail_image_load("body"),
        Err(Error::TypeMismatch { .. })
    ));
    Ok(())
}

const COUNTER_HTML: &str = r#"
<body>
  <div class="stats">
    <span id="clients" data-count="1000">0</span>
    <span id="years" data-count="25+">0</span>
    <span id="broken" data-count="viele">?</span>
  </div>
</body>
"#;

#[test]
fn count_up_reaches_half_way_at_half_duration() -> Result<()> {
    let mut page = Page::from_html(COUNTER_HTML)?;
    page.set_frame_interval_ms(100)?;
    let enhancer = Enhancer::new(EnhancerConfig::default())?;
    enhancer.attach(&mut page);
    page.run_due_timers()?;

    // The first frame at 100ms records the start.
    page.advance_time_to(1100)?;
    page.assert_text("#clients", "500")?;
    page.assert_text("#years", "12")?;

    page.advance_time_to(2100)?;
    page.assert_text("#clients", "1,000")?;
    page.assert_text("#years", "25")?;
    page.assert_text("#broken", "?")?;
    assert!(page.pending_timers().is_empty());
    Ok(())
}

#[test]
fn count_up_formats_with_the_page_locale() -> Result<()> {
    let mut page = Page::from_html(COUNTER_HTML)?;
    page.set_locale("de-DE");
    let enhancer = Enhancer::new(EnhancerConfig::default())?;
    enhancer.attach(&mut page);

    page.flush()?;
    page.assert_text("#clients", "1.000")?;
    Ok(())
}

#[test]
fn count_up_waits_until_the_counter_is_visible() -> Result<()> {
    let mut page = Page::from_html(COUNTER_HTML)?;
    page.set_layout("#clients", LayoutBox::new(3000.0, 0.0, 100.0, 40.0))?;
    let enhancer = Enhancer::new(EnhancerConfig::default())?;
    enhancer.attach(&mut page);

    page.advance_time(5000)?;
    page.assert_text("#clients", "0")?;

    page.scroll_to(2500.0)?;
    page.flush()?;
    page.assert_text("#clients", "1,000")?;

    // Leaving and re-entering the viewport does not restart the animation.
    page.scroll_to(0.0)?;
    page.scroll_to(2500.0)?;
    page.run_due_timers()?;
    assert!(
        page.pending_timers()
            .iter()
            .all(|timer| timer.kind != PendingTimerKind::AnimationFrame)
    );
    page.assert_text("#clients", "1,000")?;
    Ok(())
}

#[test]
fn count_up_without_observer_support_leaves_text_alone() -> Result<()> {
    let mut page = Page::from_html(COUNTER_HTML)?;
    page.set_intersection_observer_supported(false);
    let enhancer = Enhancer::new(EnhancerConfig::default())?;
    let report = enhancer.init(&mut page);

    assert_eq!(
        report.outcome(Feature::CountUp),
        Some(&FeatureOutcome::Skipped("intersection observation unavailable"))
    );
    page.flush()?;
    page.assert_text("#clients", "0")?;
    Ok(())
}
