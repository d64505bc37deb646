use super::*;

const FOOTER_HTML: &str = r#"
<html><head></head><body>
  <footer>
    <a id="cookie-link" href="privacy.html#cookies">Cookies</a>
    <a id="policy-link" href="privacy.html">Datenschutz</a>
  </footer>
</body></html>
"#;

const OVERLAY: &str = "body > div";

fn overlay_opacity(page: &Page) -> Result<Option<String>> {
    page.style_of(OVERLAY, "opacity")
}

#[test]
fn clicking_a_privacy_link_opens_and_fades_in_the_overlay() -> Result<()> {
    let (mut page, _enhancer) = enhanced_page(FOOTER_HTML)?;
    page.click("#cookie-link")?;

    assert_eq!(page.count(OVERLAY)?, 1);
    assert!(page.take_location_navigations().is_empty());
    page.assert_text("body > div h2", "Datenschutzerklärung")?;
    page.assert_attr("body > div p a", "href", Some("privacy.html"))?;
    page.assert_text("body > div button", "Schließen")?;
    assert_eq!(page.style_of(OVERLAY, "position")?.as_deref(), Some("fixed"));
    assert_eq!(page.style_of(OVERLAY, "z-index")?.as_deref(), Some("9999"));
    assert_eq!(overlay_opacity(&page)?.as_deref(), Some("0"));
    assert_eq!(
        page.style_of("body > div > div", "transform")?.as_deref(),
        Some("scale(0.9)")
    );

    page.advance_time(10)?;
    assert_eq!(overlay_opacity(&page)?.as_deref(), Some("1"));
    assert_eq!(
        page.style_of("body > div > div", "transform")?.as_deref(),
        Some("scale(1)")
    );
    Ok(())
}

#[test]
fn close_button_fades_out_and_removes_the_overlay() -> Result<()> {
    let (mut page, _enhancer) = enhanced_page(FOOTER_HTML)?;
    page.click("#cookie-link")?;
    page.advance_time(10)?;

    page.click("body > div button")?;
    assert_eq!(overlay_opacity(&page)?.as_deref(), Some("0"));
    assert_eq!(
        page.style_of("body > div > div", "transform")?.as_deref(),
        Some("scale(0.9)")
    );

    // A second dismissal schedules nothing new.
    page.click("body > div button")?;
    assert_eq!(page.pending_timers().len(), 1);

    page.advance_time(299)?;
    assert_eq!(page.count(OVERLAY)?, 1);
    page.advance_time(1)?;
    assert_eq!(page.count(OVERLAY)?, 0);
    assert!(page.pending_timers().is_empty());
    Ok(())
}

#[test]
fn clicks_inside_the_content_keep_the_overlay_open() -> Result<()> {
    let (mut page, _enhancer) = enhanced_page(FOOTER_HTML)?;
    page.click("#cookie-link")?;
    page.advance_time(10)?;

    page.click("body > div h2")?;
    page.advance_time(1000)?;
    assert_eq!(page.count(OVERLAY)?, 1);
    assert_eq!(overlay_opacity(&page)?.as_deref(), Some("1"));

    page.click(OVERLAY)?;
    page.advance_time(300)?;
    assert_eq!(page.count(OVERLAY)?, 0);
    Ok(())
}

#[test]
fn dismissal_before_fade_in_cancels_it() -> Result<()> {
    let (mut page, _enhancer) = enhanced_page(FOOTER_HTML)?;
    page.click("#cookie-link")?;
    page.click(OVERLAY)?;

    page.advance_time(10)?;
    assert_eq!(overlay_opacity(&page)?.as_deref(), Some("0"));
    page.advance_time(290)?;
    assert_eq!(page.count(OVERLAY)?, 0);
    Ok(())
}

#[test]
fn each_dismissal_removes_only_its_own_overlay() -> Result<()> {
    let (mut page, _enhancer) = enhanced_page(FOOTER_HTML)?;
    page.click("#cookie-link")?;
    page.advance_time(100)?;
    page.click("#cookie-link")?;
    assert_eq!(page.count(OVERLAY)?, 2);

    // The first match is the older overlay.
    page.click("body > div button")?;
    page.advance_time(300)?;
    assert_eq!(page.count(OVERLAY)?, 1);
    assert_eq!(overlay_opacity(&page)?.as_deref(), Some("1"));

    page.click("body > div button")?;
    page.advance_time(300)?;
    assert_eq!(page.count(OVERLAY)?, 0);
    Ok(())
}

#[test]
fn removed_overlays_release_their_listeners() -> Result<()> {
    let (mut page, _enhancer) = enhanced_page(FOOTER_HTML)?;
    let baseline = page.listeners.target_count();

    for _ in 0..3 {
        page.click("#cookie-link")?;
        assert_eq!(page.listeners.target_count(), baseline + 2);
        page.click("body > div button")?;
        page.advance_time(300)?;
        assert_eq!(page.count(OVERLAY)?, 0);
        assert_eq!(page.listeners.target_count(), baseline);
    }
    Ok(())
}

#[test]
fn canonical_privacy_link_navigates_normally() -> Result<()> {
    let (mut page, _enhancer) = enhanced_page(FOOTER_HTML)?;
    page.click("#policy-link")?;

    assert_eq!(page.count(OVERLAY)?, 0);
    assert_eq!(
        page.take_location_navigations(),
        vec![LocationNavigation {
            kind: LocationNavigationKind::AnchorClick,
            from: "https://app.local/".into(),
            to: "privacy.html".into(),
        }]
    );
    Ok(())
}

#[test]
fn pages_without_privacy_links_skip_the_modal() -> Result<()> {
    let mut page = Page::from_html("<body><footer><a href=\"/impressum\">Impressum</a></footer></body>")?;
    let enhancer = Enhancer::new(EnhancerConfig::default())?;
    let report = enhancer.init(&mut page);
    assert_eq!(
        report.outcome(Feature::PrivacyModal),
        Some(&FeatureOutcome::Skipped("no privacy links"))
    );
    Ok(())
}
