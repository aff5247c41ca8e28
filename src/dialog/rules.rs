//! Rule derivation for dialog fields

use std::sync::Arc;

use serde_json::Value;

use crate::descriptor::{FieldDescriptor, FieldValidator, Rule, ValidationCallback};
use crate::i18n::{self, Locale};
use crate::validation::{FieldRule, RuleValidator, Rules};
use crate::value::FormData;

/// Effective rules of every keyed field for the current form.
///
/// A required field gets a synthesized required rule in front of its own
/// rules. Validators are bound to a snapshot of `form`.
pub fn derive_rules(fields: &[FieldDescriptor], form: &FormData, locale: Locale) -> Rules {
    fields
        .iter()
        .filter_map(|field| {
            let key = field.key.as_deref().filter(|k| !k.is_empty())?;
            let mut rules = Vec::with_capacity(field.rules.len() + 1);
            if field.is_required(form) {
                rules.push(FieldRule {
                    required: true,
                    message: Some(i18n::required_message(locale, &field.label)),
                    validator: None,
                });
            }
            rules.extend(field.rules.iter().map(|rule| bind_rule(rule, form)));
            Some((key.to_string(), rules))
        })
        .collect()
}

fn bind_rule(rule: &Rule, form: &FormData) -> FieldRule {
    FieldRule {
        required: rule.required,
        message: rule.message.clone(),
        validator: rule
            .validator
            .as_ref()
            .map(|validator| bind_validator(validator.clone(), form.clone())),
    }
}

/// Give a field validator the whole form, and treat any empty answer as success
fn bind_validator(validator: FieldValidator, form: FormData) -> RuleValidator {
    Arc::new(move |value: Option<&Value>, callback: ValidationCallback| {
        validator(
            value,
            &form,
            ValidationCallback::new(move |result| match result.filter(|m| !m.is_empty()) {
                Some(message) => callback.fail(message),
                None => callback.ok(),
            }),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::Flag;
    use crate::validation;
    use serde_json::json;

    #[test]
    fn test_required_rule_goes_first() {
        let fields = vec![
            FieldDescriptor::new("name", "Name")
                .required(true)
                .rule(Rule::validator(|_, _, cb| cb.ok()).message("bad name"))
                .rule(Rule::required("custom required")),
            FieldDescriptor::new("note", "Note"),
            FieldDescriptor::display("Banner", |_| "hello".into()),
        ];
        let rules = derive_rules(&fields, &FormData::new(), Locale::EnUS);
        assert_eq!(rules.len(), 2);

        let (key, name_rules) = &rules[0];
        assert_eq!(key, "name");
        assert_eq!(name_rules.len(), 3);
        assert!(name_rules[0].required);
        assert_eq!(name_rules[0].message.as_deref(), Some("Name is required"));
        assert_eq!(name_rules[1].message.as_deref(), Some("bad name"));
        assert_eq!(name_rules[2].message.as_deref(), Some("custom required"));

        assert!(rules[1].1.is_empty());
    }

    #[test]
    fn test_required_by_predicate() {
        let fields = vec![FieldDescriptor::new("reason", "原因")
            .required(Flag::when(|form| form.get("status") == Some(&json!(0))))];
        let off = derive_rules(&fields, &FormData::from_value(json!({"status": 1})), Locale::ZhCN);
        assert!(off[0].1.is_empty());
        let on = derive_rules(&fields, &FormData::from_value(json!({"status": 0})), Locale::ZhCN);
        assert_eq!(on[0].1[0].message.as_deref(), Some("原因必填"));
    }

    #[tokio::test]
    async fn test_validator_sees_whole_form() {
        let fields = vec![FieldDescriptor::new("confirm", "Confirm").rule(Rule::validator(
            |value, form, cb| {
                if value == form.get("password") {
                    cb.call(None);
                } else {
                    cb.fail("passwords differ");
                }
            },
        ))];
        let form = FormData::from_value(json!({"password": "a", "confirm": "b"}));
        let rules = derive_rules(&fields, &form, Locale::EnUS);
        let err = validation::validate(&rules, &form).await.expect_err("mismatch");
        assert_eq!(
            err.field_errors().and_then(|e| e.get("confirm")).map(String::as_str),
            Some("passwords differ")
        );

        let form = FormData::from_value(json!({"password": "a", "confirm": "a"}));
        let rules = derive_rules(&fields, &form, Locale::EnUS);
        assert!(validation::validate(&rules, &form).await.is_ok());
    }

    #[tokio::test]
    async fn test_empty_answer_is_success() {
        let fields = vec![FieldDescriptor::new("code", "Code")
            .rule(Rule::validator(|_, _, cb| cb.fail("")))];
        let form = FormData::from_value(json!({"code": Value::Null}));
        let rules = derive_rules(&fields, &form, Locale::EnUS);
        assert!(validation::validate(&rules, &form).await.is_ok());
    }
}
