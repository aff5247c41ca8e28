//! Widget kinds, choices and display coercion

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::value;

/// Control used for a filter or form field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Widget {
    /// Single line text input
    #[default]
    Input,
    /// Dropdown over the field's choices
    Select,
    /// One-of radio buttons over the field's choices
    RadioGroup,
    /// Many-of checkboxes over the field's choices; the value is an array
    CheckboxGroup,
    /// Boolean switch
    Switch,
    /// Toolkit-specific control the painter knows by name
    Named(String),
}

impl Widget {
    /// Look a widget up by its toolkit name
    pub fn named(name: &str) -> Self {
        match name.trim_start_matches("el-") {
            "input" => Widget::Input,
            "select" => Widget::Select,
            "radio-group" => Widget::RadioGroup,
            "checkbox-group" => Widget::CheckboxGroup,
            "switch" => Widget::Switch,
            other => Widget::Named(other.to_string()),
        }
    }

    /// Whether the widget renders the field's choices
    pub fn has_choices(&self) -> bool {
        matches!(
            self,
            Widget::Select | Widget::RadioGroup | Widget::CheckboxGroup
        )
    }
}

/// One selectable option
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    pub value: Value,
    pub label: String,
}

impl Choice {
    pub fn new(value: impl Into<Value>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }

    /// Checkbox-group value after toggling this choice in `current`
    pub fn toggle_in(&self, current: Option<&Value>) -> Value {
        let mut items = current
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        match items.iter().position(|v| v == &self.value) {
            Some(index) => {
                items.remove(index);
            }
            None => items.push(self.value.clone()),
        }
        Value::Array(items)
    }
}

/// Coercion applied to a form value before it is displayed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    /// Pass-through
    #[default]
    Default,
    /// Numeric coercion
    Number,
}

impl DataType {
    /// Display value for a stored value. Never written back to the form.
    pub fn coerce(self, stored: Option<&Value>) -> Option<Value> {
        match self {
            DataType::Default => stored.cloned(),
            DataType::Number => Some(
                value::to_number(stored)
                    .and_then(serde_json::Number::from_f64)
                    .map(|n| match n.as_f64() {
                        Some(f) if f.fract() == 0.0 && f.abs() < 9.0e15 => Value::from(f as i64),
                        _ => Value::Number(n),
                    })
                    .unwrap_or_else(|| Value::String("NaN".to_string())),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_widget_named() {
        assert_eq!(Widget::named("el-select"), Widget::Select);
        assert_eq!(Widget::named("radio-group"), Widget::RadioGroup);
        assert_eq!(Widget::named("el-date-picker"), Widget::Named("date-picker".into()));
        assert!(Widget::CheckboxGroup.has_choices());
        assert!(!Widget::Input.has_choices());
    }

    #[test]
    fn test_checkbox_group_toggle() {
        let a = Choice::new("a", "A");
        let b = Choice::new("b", "B");
        let value = a.toggle_in(None);
        assert_eq!(value, json!(["a"]));
        let value = b.toggle_in(Some(&value));
        assert_eq!(value, json!(["a", "b"]));
        assert_eq!(a.toggle_in(Some(&value)), json!(["b"]));
    }

    #[test]
    fn test_number_coercion() {
        assert_eq!(DataType::Number.coerce(Some(&json!("12"))), Some(json!(12)));
        assert_eq!(DataType::Number.coerce(Some(&json!("1.5"))), Some(json!(1.5)));
        assert_eq!(DataType::Number.coerce(None), Some(json!("NaN")));
        assert_eq!(DataType::Default.coerce(Some(&json!("12"))), Some(json!("12")));
        assert_eq!(DataType::Default.coerce(None), None);
    }
}
