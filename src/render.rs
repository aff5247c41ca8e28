//! Render Tree
//!
//! Toolkit-neutral description of what a component draws. Interactive leaves
//! carry the event they emit, so a painter only has to draw nodes and hand
//! events back to the owning controller.

use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::descriptor::{Choice, Widget};

/// Builds the event emitted when an input changes to a new value
pub type Emit<E> = Arc<dyn Fn(Option<Value>) -> E + Send + Sync>;

/// Button style
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ButtonKind {
    /// Main action
    #[default]
    Primary,
    /// Secondary action
    Default,
    /// Link-like button inside a table cell
    Text,
}

/// A bound input control
pub struct InputNode<E> {
    pub widget: Widget,
    /// Value shown by the control (after display coercion)
    pub value: Option<Value>,
    pub placeholder: Option<String>,
    pub clearable: bool,
    pub options: Vec<Choice>,
    pub props: Map<String, Value>,
    pub attrs: Map<String, Value>,
    pub on_input: Emit<E>,
}

impl<E> InputNode<E> {
    /// Event for a new value
    pub fn input(&self, value: Option<Value>) -> E {
        (self.on_input)(value)
    }
}

impl<E> Clone for InputNode<E> {
    fn clone(&self) -> Self {
        Self {
            widget: self.widget.clone(),
            value: self.value.clone(),
            placeholder: self.placeholder.clone(),
            clearable: self.clearable,
            options: self.options.clone(),
            props: self.props.clone(),
            attrs: self.attrs.clone(),
            on_input: self.on_input.clone(),
        }
    }
}

impl<E> fmt::Debug for InputNode<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputNode")
            .field("widget", &self.widget)
            .field("value", &self.value)
            .field("placeholder", &self.placeholder)
            .field("options", &self.options.len())
            .finish()
    }
}

/// Render tree node
#[derive(Clone, Debug)]
pub enum Node<E> {
    /// Nothing
    Empty,
    /// Plain text
    Text(String),
    /// Children laid out in a row
    Group(Vec<Node<E>>),
    /// Clickable button
    Button {
        label: String,
        kind: ButtonKind,
        loading: bool,
        on_click: E,
    },
    /// Checkbox; `on_change` carries the toggled state
    Checkbox {
        checked: bool,
        label: Option<String>,
        on_change: E,
    },
    /// Two-state switch; `on_change` carries the value after toggling
    Switch {
        on: bool,
        active_text: String,
        inactive_text: String,
        on_change: E,
    },
    /// Value-bound input control
    Input(InputNode<E>),
}

impl<E> Node<E> {
    /// Plain text node
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text(text.into())
    }

    /// Text content of this node and its children, for assertions and logs
    pub fn text_content(&self) -> String {
        match self {
            Node::Empty => String::new(),
            Node::Text(text) => text.clone(),
            Node::Group(children) => children
                .iter()
                .map(Node::text_content)
                .collect::<Vec<_>>()
                .join(" "),
            Node::Button { label, .. } => label.clone(),
            Node::Checkbox { label, .. } => label.clone().unwrap_or_default(),
            Node::Switch {
                on,
                active_text,
                inactive_text,
                ..
            } => {
                if *on {
                    active_text.clone()
                } else {
                    inactive_text.clone()
                }
            }
            Node::Input(input) => crate::value::display(input.value.as_ref()),
        }
    }
}

impl<E> Default for Node<E> {
    fn default() -> Self {
        Node::Empty
    }
}

impl<E> From<String> for Node<E> {
    fn from(text: String) -> Self {
        Node::Text(text)
    }
}

impl<E> From<&str> for Node<E> {
    fn from(text: &str) -> Self {
        Node::Text(text.to_string())
    }
}
