//! Form validation
//!
//! Runs field rules against a form and keeps the per-field failure markers
//! shown under each form item.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use futures::channel::oneshot;
use serde_json::Value;

use crate::descriptor::ValidationCallback;
use crate::error::{Error, Result};
use crate::value::FormData;

/// Validator bound to one field, called with the field value
pub type RuleValidator = Arc<dyn Fn(Option<&Value>, ValidationCallback) + Send + Sync>;

/// A rule ready to run
#[derive(Clone, Default)]
pub struct FieldRule {
    pub required: bool,
    pub message: Option<String>,
    pub validator: Option<RuleValidator>,
}

impl fmt::Debug for FieldRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldRule")
            .field("required", &self.required)
            .field("message", &self.message)
            .field("validator", &self.validator.is_some())
            .finish()
    }
}

/// Rules per form key, in field order
pub type Rules = Vec<(String, Vec<FieldRule>)>;

/// Whether a value fails a required rule
pub fn is_missing(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(_) => false,
    }
}

/// Run one rule; returns the failure message
pub async fn check(key: &str, rule: &FieldRule, value: Option<&Value>) -> Option<String> {
    let failure = || {
        rule.message
            .clone()
            .unwrap_or_else(|| format!("{key} is invalid"))
    };
    if rule.required && is_missing(value) {
        return Some(failure());
    }
    let validator = rule.validator.as_ref()?;
    let (tx, rx) = oneshot::channel();
    validator(
        value,
        ValidationCallback::new(move |result| {
            let _ = tx.send(result);
        }),
    );
    match rx.await {
        Ok(Some(message)) if !message.is_empty() => Some(message),
        Ok(Some(_)) => Some(failure()),
        Ok(None) => None,
        Err(_) => {
            tracing::warn!(key, "Validator dropped its callback without answering");
            None
        }
    }
}

/// Validate a form; the first failing rule of each field is reported
pub async fn validate(rules: &Rules, form: &FormData) -> Result<()> {
    let mut errors = BTreeMap::new();
    for (key, field_rules) in rules {
        let value = form.get(key);
        for rule in field_rules {
            if let Some(message) = check(key, rule, value).await {
                errors.insert(key.clone(), message);
                break;
            }
        }
    }
    if errors.is_empty() {
        Ok(())
    } else {
        tracing::debug!(?errors, "Form validation failed");
        Err(Error::Validation { errors })
    }
}

/// Failure markers of a form
#[derive(Debug, Clone, Default)]
pub struct FormValidator {
    errors: BTreeMap<String, String>,
}

impl FormValidator {
    /// Validate and record the markers
    pub async fn validate(&mut self, rules: &Rules, form: &FormData) -> Result<()> {
        let result = validate(rules, form).await;
        self.apply(&result);
        result
    }

    /// Record the markers of a finished validation
    pub fn apply(&mut self, result: &Result<()>) {
        self.errors = match result {
            Err(err) => err.field_errors().cloned().unwrap_or_default(),
            Ok(()) => BTreeMap::new(),
        };
    }

    /// Drop every marker
    pub fn clear(&mut self) {
        self.errors.clear();
    }

    /// Marker of one field
    pub fn error(&self, key: &str) -> Option<&str> {
        self.errors.get(key).map(String::as_str)
    }

    /// All markers
    pub fn errors(&self) -> &BTreeMap<String, String> {
        &self.errors
    }
}
