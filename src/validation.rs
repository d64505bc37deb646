//! Field validation rules, independent of any document.

use std::collections::HashMap;
use std::fmt;

use fancy_regex::Regex;
use unicode_normalization::UnicodeNormalization;

use crate::{Error, Result};

/// User-facing messages of the standard rule table.
pub mod messages {
    pub const FIRST_NAME: &str = "Bitte geben Sie einen gültigen Vornamen ein (2-50 Zeichen)";
    pub const LAST_NAME: &str = "Bitte geben Sie einen gültigen Nachnamen ein (2-50 Zeichen)";
    pub const NAME: &str = "Bitte geben Sie einen gültigen Namen ein (2-100 Zeichen)";
    pub const EMAIL: &str = "Bitte geben Sie eine gültige E-Mail-Adresse ein";
    pub const PHONE: &str = "Bitte geben Sie eine gültige Telefonnummer ein";
    pub const MESSAGE: &str = "Die Nachricht muss mindestens 10 Zeichen enthalten";
    pub const PRIVACY: &str = "Bitte akzeptieren Sie die Datenschutzerklärung";
    pub const REQUIRED: &str = "Dieses Feld ist erforderlich";
}

const PERSON_NAME_CHARS: &str = r"[a-zA-ZÀ-ÿ\s\-']";
const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

/// Message plus an optional pattern for one field name.
#[derive(Debug, Clone)]
pub struct FieldRule {
    pattern: Option<Regex>,
    message: String,
}

impl FieldRule {
    pub fn new(field: &str, pattern: Option<&str>, message: &str) -> Result<Self> {
        let pattern = pattern
            .map(|source| {
                Regex::new(source).map_err(|err| Error::Pattern {
                    field: field.to_string(),
                    message: err.to_string(),
                })
            })
            .transpose()?;
        Ok(Self {
            pattern,
            message: message.to_string(),
        })
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn pattern(&self) -> Option<&str> {
        self.pattern.as_ref().map(Regex::as_str)
    }

    fn accepts(&self, field: &str, value: &str) -> Result<bool> {
        let Some(pattern) = &self.pattern else {
            return Ok(true);
        };
        pattern.is_match(value).map_err(|err| Error::Pattern {
            field: field.to_string(),
            message: err.to_string(),
        })
    }
}

/// What the validator needs to know about a form control.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSnapshot {
    /// `name` attribute, falling back to `id`.
    pub name: String,
    pub value: String,
    /// Lowercased input type (`text`, `email`, `checkbox`, ...).
    pub input_type: String,
    pub required: bool,
    pub checked: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldVerdict {
    Valid,
    Invalid { message: String },
}

impl FieldVerdict {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Valid => None,
            Self::Invalid { message } => Some(message),
        }
    }

    fn invalid(message: &str) -> Self {
        Self::Invalid {
            message: message.to_string(),
        }
    }
}

impl fmt::Display for FieldVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Valid => write!(f, "valid"),
            Self::Invalid { message } => write!(f, "invalid: {message}"),
        }
    }
}

/// Field name → rule, plus the generic `required` message.
#[derive(Debug, Clone)]
pub struct RuleTable {
    rules: HashMap<String, FieldRule>,
    required_message: String,
}

impl RuleTable {
    /// The contact-form rules the enhancer ships with.
    pub fn standard() -> Result<Self> {
        let person_name = |max: usize| format!("^{PERSON_NAME_CHARS}{{2,{max}}}$");
        let table = Self::empty(messages::REQUIRED)
            .with_rule("firstName", Some(&person_name(50)), messages::FIRST_NAME)?
            .with_rule("lastName", Some(&person_name(50)), messages::LAST_NAME)?
            .with_rule("name", Some(&person_name(100)), messages::NAME)?
            .with_rule("email", Some(EMAIL_PATTERN), messages::EMAIL)?
            .with_rule("phone", Some(r"^[0-9\s+\-()]{10,20}$"), messages::PHONE)?
            .with_rule("message", Some(r"(?s)^.{10,}$"), messages::MESSAGE)?
            .with_rule("privacy", None, messages::PRIVACY)?;
        Ok(table)
    }

    pub fn empty(required_message: &str) -> Self {
        Self {
            rules: HashMap::new(),
            required_message: required_message.to_string(),
        }
    }

    pub fn with_rule(mut self, field: &str, pattern: Option<&str>, message: &str) -> Result<Self> {
        let rule = FieldRule::new(field, pattern, message)?;
        self.rules.insert(field.to_string(), rule);
        Ok(self)
    }

    pub fn rule(&self, field: &str) -> Option<&FieldRule> {
        self.rules.get(field)
    }

    pub fn required_message(&self) -> &str {
        &self.required_message
    }

    /// Checks run in order: required-and-empty, unchecked required
    /// checkbox, the field's own pattern, then the email pattern for
    /// `type="email"` controls. The first failing check decides the message.
    pub fn validate(&self, field: &FieldSnapshot) -> Result<FieldVerdict> {
        let value = field.value.trim();

        if field.required && value.is_empty() {
            return Ok(FieldVerdict::invalid(&self.required_message));
        }

        if field.input_type == "checkbox" && field.required && !field.checked {
            let message = self
                .rule(&field.name)
                .map(FieldRule::message)
                .unwrap_or(self.required_message.as_str());
            return Ok(FieldVerdict::invalid(message));
        }

        if value.is_empty() {
            return Ok(FieldVerdict::Valid);
        }
        let normalized = value.nfc().collect::<String>();

        if let Some(rule) = self.rule(&field.name) {
            if !rule.accepts(&field.name, &normalized)? {
                return Ok(FieldVerdict::invalid(rule.message()));
            }
        }

        if field.input_type == "email" {
            if let Some(rule) = self.rule("email") {
                if !rule.accepts("email", &normalized)? {
                    return Ok(FieldVerdict::invalid(rule.message()));
                }
            }
        }

        Ok(FieldVerdict::Valid)
    }
}
