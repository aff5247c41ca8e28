//! Filter Field Descriptor

use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

use super::widget::{Choice, Widget};

/// Maps a filter value to request parameters.
///
/// With a filter key the result is nested under that key, otherwise the
/// result's own keys are merged into the request.
pub type CustomParams = Arc<dyn Fn(Option<&Value>) -> Value + Send + Sync>;

/// Filter bar field descriptor
#[derive(Clone)]
pub struct FilterDescriptor {
    pub key: Option<String>,
    pub label: String,
    /// Current value, changed through the filter bar's binding
    pub value: Option<Value>,
    pub widget: Widget,
    pub props: Map<String, Value>,
    pub attrs: Map<String, Value>,
    pub placeholder: Option<String>,
    pub clearable: bool,
    pub options: Vec<Choice>,
    pub custom_params: Option<CustomParams>,
}

impl FilterDescriptor {
    /// Create a keyed filter with a text input
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            label: label.into(),
            value: None,
            widget: Widget::Input,
            props: Map::new(),
            attrs: Map::new(),
            placeholder: None,
            clearable: true,
            options: Vec::new(),
            custom_params: None,
        }
    }

    /// Create a keyless filter whose params come from `custom_params`
    pub fn custom(
        label: impl Into<String>,
        custom_params: impl Fn(Option<&Value>) -> Value + Send + Sync + 'static,
    ) -> Self {
        let mut filter = Self::new("", label);
        filter.key = None;
        filter.custom_params = Some(Arc::new(custom_params));
        filter
    }

    /// Initial value
    pub fn value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(value.into());
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
    pub fn prop(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.props.insert(name.into(), value.into());
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

    /// Whether the control shows a clear affordance
    pub fn clearable(mut self, clearable: bool) -> Self {
        self.clearable = clearable;
        self
    }

    /// Map the value to params with a function
    pub fn custom_params(
        mut self,
        custom_params: impl Fn(Option<&Value>) -> Value + Send + Sync + 'static,
    ) -> Self {
        self.custom_params = Some(Arc::new(custom_params));
        self
    }
}

impl fmt::Debug for FilterDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterDescriptor")
            .field("key", &self.key)
            .field("label", &self.label)
            .field("value", &self.value)
            .field("widget", &self.widget)
            .field("custom_params", &self.custom_params.is_some())
            .finish_non_exhaustive()
    }
}
