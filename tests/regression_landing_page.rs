use page_enhancer::{
    Enhancer, EnhancerConfig, Feature, FeatureOutcome, LayoutBox, LocationNavigationKind, Page,
    ScrollBehavior,
};

const LANDING_HTML: &str = r##"
<!DOCTYPE html>
<html lang="de">
<head>
  <meta charset="utf-8">
  <title>Praxis am Park</title>
  <script type="application/ld+json">{"@context":"https://schema.org","@type":"Dentist"}</script>
</head>
<body>
  <nav class="navbar">
    <a class="navbar-brand" href="#home">Praxis am Park</a>
    <button class="navbar-toggler" type="button" aria-expanded="false">
      <span class="navbar-toggler-icon"></span>
    </button>
    <div class="navbar-collapse">
      <ul>
        <li><a class="nav-link" href="#home">Start</a></li>
        <li><a class="nav-link" href="#leistungen">Leistungen</a></li>
        <li><a class="nav-link" href="#kontakt">Kontakt</a></li>
      </ul>
    </div>
  </nav>

  <section id="home" class="hero-section">
    <h1>Willkommen</h1>
    <a class="btn btn-primary" href="#kontakt">Termin anfragen</a>
    <img src="praxis.jpg" alt="Praxis">
  </section>

  <section id="leistungen">
    <div class="card service-card">Prophylaxe</div>
    <div class="card service-card">Implantate</div>
    <p><span data-count="1500">0</span> zufriedene Patienten</p>
  </section>

  <section id="kontakt">
    <form id="contact-form" novalidate>
      <div><input name="name" id="name" required></div>
      <div><input name="email" id="email" type="email" required></div>
      <div><input name="phone" id="phone" type="tel"></div>
      <div><textarea name="message" id="message" required></textarea></div>
      <div>
        <input name="privacy" id="privacy" type="checkbox" required>
        <label for="privacy">Ich akzeptiere die <a href="privacy.html#formular">Datenschutzerklärung</a></label>
      </div>
      <button type="submit" class="btn">Senden</button>
    </form>
  </section>

  <footer><a href="privacy.html">Datenschutz</a></footer>
</body>
</html>
"##;

fn landing_page() -> page_enhancer::Result<Page> {
    let mut page = Page::from_html_loading(LANDING_HTML)?;
    page.set_layout(".navbar", LayoutBox::new(0.0, 0.0, 1280.0, 72.0))?;
    page.set_layout("#home", LayoutBox::new(0.0, 0.0, 1280.0, 700.0))?;
    page.set_layout("#leistungen", LayoutBox::new(700.0, 0.0, 1280.0, 900.0))?;
    page.set_layout("[data-count]", LayoutBox::new(1300.0, 40.0, 120.0, 40.0))?;
    page.set_layout("#kontakt", LayoutBox::new(1600.0, 0.0, 1280.0, 800.0))?;
    Ok(page)
}

#[test]
fn landing_page_initializes_every_enhancement_after_loading() -> page_enhancer::Result<()> {
    let mut page = landing_page()?;
    let enhancer = Enhancer::new(EnhancerConfig::default())?;
    assert!(enhancer.attach(&mut page).is_none());
    page.finish_loading()?;

    let report = enhancer
        .last_report()
        .ok_or_else(|| page_enhancer::Error::Runtime("no init report".into()))?;
    for feature in Feature::ALL {
        assert_eq!(
            report.outcome(feature),
            Some(&FeatureOutcome::Installed),
            "{feature} was not installed"
        );
    }
    page.assert_class(".nav-link[href=\"#home\"]", "active", true)?;
    page.assert_attr("img", "loading", Some("lazy"))?;
    Ok(())
}

#[test]
fn visitor_journey_from_menu_to_confirmation() -> page_enhancer::Result<()> {
    let mut page = landing_page()?;
    let enhancer = Enhancer::new(EnhancerConfig::default())?;
    enhancer.attach(&mut page);
    page.finish_loading()?;
    page.set_frame_interval_ms(50)?;
    page.run_due_timers()?;
    page.set_viewport(390.0, 800.0);

    // Mobile menu: open, jump to the services, menu closes.
    page.click(".navbar-toggler")?;
    page.assert_class(".navbar-collapse", "show", true)?;
    page.click(".nav-link[href=\"#leistungen\"]")?;
    page.assert_class(".navbar-collapse", "show", false)?;
    let requests = page.take_scroll_requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].top, 628.0);
    assert_eq!(requests[0].behavior, ScrollBehavior::Smooth);
    page.assert_class(".nav-link[href=\"#leistungen\"]", "active", true)?;
    page.assert_class(".nav-link[href=\"#home\"]", "active", false)?;

    // The counter is in view now and counts up.
    page.flush()?;
    page.assert_text("[data-count]", "1,500")?;
    assert_eq!(page.style_of(".scroll-to-top", "opacity")?.as_deref(), Some("1"));

    // The privacy link inside the form label opens the overlay instead.
    page.click("label a")?;
    assert_eq!(page.count("body > div")?, 1);
    page.click("body > div button")?;
    page.advance_time(300)?;
    assert_eq!(page.count("body > div")?, 0);

    page.type_text("#name", "Jörg Müller")?;
    page.type_text("#email", "joerg@example.de")?;
    page.type_text("#message", "Ich möchte einen Termin zur Prophylaxe.")?;
    page.set_checked("#privacy", true)?;
    page.click("button[type=\"submit\"]")?;
    page.advance_time(800)?;

    let navigations = page.take_location_navigations();
    assert_eq!(navigations.len(), 1);
    assert_eq!(navigations[0].kind, LocationNavigationKind::Assign);
    assert_eq!(navigations[0].to, "thank_you.html");
    Ok(())
}
