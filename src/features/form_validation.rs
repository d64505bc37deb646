use std::rc::Rc;

use tracing::info;

use super::{FeatureContext, listener};
use crate::Result;
use crate::bootstrap::FeatureOutcome;
use crate::config::EnhancerConfig;
use crate::dom::NodeId;
use crate::host::{EventTarget, Host, ScrollBehavior, ScrollBlock};
use crate::validation::{FieldSnapshot, FieldVerdict, RuleTable};

const FIELD_SELECTOR: &str = "input, textarea, select";
const SUBMIT_SPINNER: &str =
    r#"<span class="spinner-border spinner-border-sm me-2"></span>Wird gesendet..."#;
pub(crate) const OFFLINE_MESSAGE: &str =
    "Fehler: Keine Internetverbindung. Bitte versuchen Sie es später erneut.";

pub(crate) fn init(host: &mut dyn Host, ctx: &FeatureContext) -> Result<FeatureOutcome> {
    let forms = host.query_selector_all("form")?;
    if forms.is_empty() {
        return Ok(FeatureOutcome::Skipped("no forms"));
    }

    for form in forms {
        let fields = Rc::new(host.query_selector_all_within(form, FIELD_SELECTOR)?);
        for &field in fields.iter() {
            let rules = Rc::clone(&ctx.rules);
            host.add_event_listener(
                EventTarget::Node(field),
                "blur",
                listener(move |host, _event| validate_field(host, &rules, field).map(|_| ())),
            );

            let rules = Rc::clone(&ctx.rules);
            host.add_event_listener(
                EventTarget::Node(field),
                "input",
                listener(move |host, _event| {
                    if host.has_class(field, "is-invalid") {
                        validate_field(host, &rules, field)?;
                    }
                    Ok(())
                }),
            );
        }

        let rules = Rc::clone(&ctx.rules);
        let config = Rc::clone(&ctx.config);
        host.add_event_listener(
            EventTarget::Node(form),
            "submit",
            listener(move |host, event| {
                event.prevent_default();
                submit(host, &rules, &config, form, &fields)
            }),
        );
    }

    Ok(FeatureOutcome::Installed)
}

/// Validates every field, then either focuses the first invalid one or
/// starts the simulated submission.
fn submit(
    host: &mut dyn Host,
    rules: &RuleTable,
    config: &EnhancerConfig,
    form: NodeId,
    fields: &[NodeId],
) -> Result<()> {
    let mut all_valid = true;
    for &field in fields {
        all_valid &= validate_field(host, rules, field)?;
    }

    if !all_valid {
        if let Some(first_invalid) = host.query_selector_within(form, ".is-invalid")? {
            host.focus(first_invalid)?;
            host.scroll_into_view(first_invalid, ScrollBehavior::Smooth, ScrollBlock::Center)?;
        }
        return Ok(());
    }

    let button = host.query_selector_within(form, r#"button[type="submit"]"#)?;
    let original_label = match button {
        Some(button) => {
            let label = host.inner_html(button)?;
            host.set_disabled(button, true)?;
            host.set_inner_html(button, SUBMIT_SPINNER)?;
            label
        }
        None => String::new(),
    };

    let confirmation_url = config.confirmation_url.clone();
    host.set_timeout(
        config.submit_delay_ms,
        Box::new(move |host: &mut dyn Host| {
            if host.is_online() {
                info!(url = %confirmation_url, "form submitted, redirecting");
                return host.navigate(&confirmation_url);
            }
            info!("form submission failed: offline");
            host.alert(OFFLINE_MESSAGE);
            if let Some(button) = button {
                host.set_disabled(button, false)?;
                host.set_inner_html(button, &original_label)?;
            }
            Ok(())
        }),
    );
    Ok(())
}

/// Re-validates `field`, updating its error state. Returns whether it is
/// valid.
fn validate_field(host: &mut dyn Host, rules: &RuleTable, field: NodeId) -> Result<bool> {
    let snapshot = snapshot(host, field)?;
    clear_error(host, field)?;
    match rules.validate(&snapshot)? {
        FieldVerdict::Valid => Ok(true),
        FieldVerdict::Invalid { message } => {
            show_error(host, field, &message)?;
            Ok(false)
        }
    }
}

fn snapshot(host: &dyn Host, field: NodeId) -> Result<FieldSnapshot> {
    let name = host
        .attr(field, "name")
        .filter(|name| !name.is_empty())
        .or_else(|| host.attr(field, "id"))
        .unwrap_or_default();
    Ok(FieldSnapshot {
        name,
        value: host.value(field)?,
        input_type: host.input_type(field),
        required: host.attr(field, "required").is_some(),
        checked: host.checked(field)?,
    })
}

fn show_error(host: &mut dyn Host, field: NodeId, message: &str) -> Result<()> {
    if let Some(parent) = host.parent(field) {
        let feedback = match host.query_selector_within(parent, ".invalid-feedback")? {
            Some(feedback) => feedback,
            None => {
                let feedback = host.create_element("div");
                host.set_attr(feedback, "class", "invalid-feedback")?;
                host.append_child(parent, feedback)?;
                feedback
            }
        };
        host.set_text_content(feedback, message)?;
        host.add_class(feedback, "is-visible")?;
    }
    host.add_class(field, "is-invalid")
}

fn clear_error(host: &mut dyn Host, field: NodeId) -> Result<()> {
    if let Some(parent) = host.parent(field) {
        if let Some(feedback) = host.query_selector_within(parent, ".invalid-feedback")? {
            host.remove_class(feedback, "is-visible")?;
        }
    }
    host.remove_class(field, "is-invalid")
}
