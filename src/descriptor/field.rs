//! Form Field Descriptor
//!
//! Describes one field of a dialog form: its label, control, binding and
//! validation.

use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

use super::flag::Flag;
use super::widget::{Choice, DataType, Widget};
use crate::dialog::DialogEvent;
use crate::render::Node;
use crate::value::FormData;

/// Custom field renderer, receives the whole form
pub type FormRender = Arc<dyn Fn(&FormData) -> Node<DialogEvent> + Send + Sync>;

/// Field validator called as `(value, whole_form, callback)`
pub type FieldValidator = Arc<dyn Fn(Option<&Value>, &FormData, ValidationCallback) + Send + Sync>;

/// Completion handle passed to a validator.
///
/// Answer with `ok()` or `fail(message)`; the validator may answer later from
/// another task.
pub struct ValidationCallback {
    inner: Box<dyn FnOnce(Option<String>) + Send>,
}

impl ValidationCallback {
    /// Wrap a completion function
    pub fn new(inner: impl FnOnce(Option<String>) + Send + 'static) -> Self {
        Self {
            inner: Box::new(inner),
        }
    }

    /// Report success
    pub fn ok(self) {
        (self.inner)(None)
    }

    /// Report failure with a message
    pub fn fail(self, message: impl Into<String>) {
        (self.inner)(Some(message.into()))
    }

    /// Report a raw result, `None` meaning success
    pub fn call(self, result: Option<String>) {
        (self.inner)(result)
    }
}

impl fmt::Debug for ValidationCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ValidationCallback")
    }
}

/// One validation rule of a field
#[derive(Clone, Default)]
pub struct Rule {
    /// Value must be present
    pub required: bool,
    /// Message reported when the rule fails
    pub message: Option<String>,
    /// Custom validator
    pub validator: Option<FieldValidator>,
}

impl Rule {
    /// Required rule with a message
    pub fn required(message: impl Into<String>) -> Self {
        Self {
            required: true,
            message: Some(message.into()),
            validator: None,
        }
    }

    /// Rule backed by a custom validator
    pub fn validator(
        validator: impl Fn(Option<&Value>, &FormData, ValidationCallback) + Send + Sync + 'static,
    ) -> Self {
        Self {
            required: false,
            message: None,
            validator: Some(Arc::new(validator)),
        }
    }

    /// Set the failure message
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("required", &self.required)
            .field("message", &self.message)
            .field("validator", &self.validator.is_some())
            .finish()
    }
}

/// Form field descriptor
#[derive(Clone, Default)]
pub struct FieldDescriptor {
    /// Form key; fields without a key are display-only
    pub key: Option<String>,
    pub label: String,
    pub required: Option<Flag>,
    pub rules: Vec<Rule>,
    pub render: Option<FormRender>,
    pub show: Option<Flag>,
    pub widget: Widget,
    pub widget_props: Map<String, Value>,
    pub attrs: Map<String, Value>,
    pub placeholder: Option<String>,
    pub options: Vec<Choice>,
    pub data_type: DataType,
}

impl FieldDescriptor {
    /// Create a keyed field with a text input
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            label: label.into(),
            ..Default::default()
        }
    }

    /// Create a display-only field without a key
    pub fn display(label: impl Into<String>, render: impl Fn(&FormData) -> Node<DialogEvent> + Send + Sync + 'static) -> Self {
        Self {
            label: label.into(),
            render: Some(Arc::new(render)),
            ..Default::default()
        }
    }

    /// Mark required, either always or by predicate
    pub fn required(mut self, required: impl Into<Flag>) -> Self {
        self.required = Some(required.into());
        self
    }

    /// Append a rule
    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Append several rules
    pub fn rules(mut self, rules: impl IntoIterator<Item = Rule>) -> Self {
        self.rules.extend(rules);
        self
    }

    /// Custom renderer
    pub fn render(mut self, render: impl Fn(&FormData) -> Node<DialogEvent> + Send + Sync + 'static) -> Self {
        self.render = Some(Arc::new(render));
        self
    }

    /// Visibility flag
    pub fn show(mut self, show: impl Into<Flag>) -> Self {
        self.show = Some(show.into());
        self
    }

    /// Control to use
    pub fn widget(mut self, widget: Widget) -> Self {
        self.widget = widget;
        self
    }

    /// Choices for select / radio / checkbox widgets
    pub fn options(mut self, options: Vec<Choice>) -> Self {
        self.options = options;
        self
    }

    /// Extra props forwarded to the control
    pub fn widget_prop(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.widget_props.insert(name.into(), value.into());
        self
    }

    /// Extra attributes forwarded to the control
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    /// Placeholder text
    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    /// Display coercion
    pub fn data_type(mut self, data_type: DataType) -> Self {
        self.data_type = data_type;
        self
    }

    /// Whether the field is visible for the current form
    pub fn is_visible(&self, form: &FormData) -> bool {
        self.show.as_ref().is_none_or(|show| show.eval(form))
    }

    /// Whether the field is required for the current form
    pub fn is_required(&self, form: &FormData) -> bool {
        self.required.as_ref().is_some_and(|required| required.eval(form))
    }
}

impl fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("key", &self.key)
            .field("label", &self.label)
            .field("required", &self.required)
            .field("rules", &self.rules)
            .field("widget", &self.widget)
            .field("data_type", &self.data_type)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_visibility_defaults_to_shown() {
        let field = FieldDescriptor::new("name", "Name");
        assert!(field.is_visible(&FormData::new()));
        assert!(!field.is_required(&FormData::new()));
    }

    #[test]
    fn test_predicate_visibility() {
        let field = FieldDescriptor::new("tax_id", "Tax ID")
            .show(Flag::when(|form| form.get("kind") == Some(&json!("company"))));
        assert!(!field.is_visible(&FormData::new()));
        assert!(field.is_visible(&FormData::from_value(json!({"kind": "company"}))));
    }

    #[test]
    fn test_callback_reports_result() {
        let (tx, rx) = std::sync::mpsc::channel();
        ValidationCallback::new(move |res| {
            let _ = tx.send(res);
        })
        .fail("bad");
        assert_eq!(rx.recv().ok().flatten(), Some("bad".to_string()));
    }
}
