//! Node Painter
//!
//! Turns a render tree into GPUI elements. Interactive leaves hand their
//! event to a [`Dispatch`] owned by the view that produced the tree.

use std::rc::Rc;

use gpui::{AnyElement, App, Context, ElementId, IntoElement, ParentElement, SharedString, Styled, Window, div};
use gpui_component::h_flex;
use serde_json::Value;

use crate::components::primitives::{Button, Checkbox, ChoiceGroup, Switch, TextInputs};
use crate::descriptor::Widget;
use crate::render::{InputNode, Node};
use crate::theme::TableColors;

/// Routes an event back to its controller
pub type Dispatch<E> = Rc<dyn Fn(E, &mut Window, &mut App) + 'static>;

/// Element id from a string path
pub fn element_id(id: &str) -> ElementId {
    ElementId::Name(SharedString::from(id.to_string()))
}

/// Paint a node; `id` must be unique within the window
pub fn paint<V: 'static, E: Clone + 'static>(
    id: &str,
    node: &Node<E>,
    dispatch: &Dispatch<E>,
    inputs: &mut TextInputs,
    window: &mut Window,
    cx: &mut Context<V>,
) -> AnyElement {
    match node {
        Node::Empty => div().into_any_element(),
        Node::Text(text) => div()
            .text_sm()
            .text_color(TableColors::text_primary())
            .child(text.clone())
            .into_any_element(),
        Node::Group(children) => {
            let mut painted = Vec::with_capacity(children.len());
            for (index, child) in children.iter().enumerate() {
                painted.push(paint(&format!("{id}-{index}"), child, dispatch, inputs, window, cx));
            }
            h_flex().gap_2().items_center().children(painted).into_any_element()
        }
        Node::Button {
            label,
            kind,
            loading,
            on_click,
        } => {
            let event = on_click.clone();
            let dispatch = dispatch.clone();
            Button::new(element_id(id), label.clone())
                .kind(*kind)
                .loading(*loading)
                .loading_label(format!("{label}..."))
                .on_click(move |_event, window, cx| dispatch(event.clone(), window, cx))
                .into_any_element()
        }
        Node::Checkbox {
            checked,
            label,
            on_change,
        } => {
            let event = on_change.clone();
            let dispatch = dispatch.clone();
            let mut checkbox = Checkbox::new(element_id(id))
                .checked(*checked)
                .on_change(move |_checked, window, cx| dispatch(event.clone(), window, cx));
            if let Some(label) = label {
                checkbox = checkbox.label(label.clone());
            }
            checkbox.into_any_element()
        }
        Node::Switch {
            on,
            active_text,
            inactive_text,
            on_change,
        } => {
            let event = on_change.clone();
            let dispatch = dispatch.clone();
            Switch::new(element_id(id), *on)
                .texts(active_text.clone(), inactive_text.clone())
                .on_toggle(move |window, cx| dispatch(event.clone(), window, cx))
                .into_any_element()
        }
        Node::Input(input) => paint_input(id, input, dispatch, inputs, window, cx),
    }
}

fn paint_input<V: 'static, E: Clone + 'static>(
    id: &str,
    input: &InputNode<E>,
    dispatch: &Dispatch<E>,
    inputs: &mut TextInputs,
    window: &mut Window,
    cx: &mut Context<V>,
) -> AnyElement {
    let emit = input.on_input.clone();
    let dispatch = dispatch.clone();
    let on_value = Rc::new(move |value: Option<Value>, window: &mut Window, cx: &mut App| {
        dispatch(emit(value), window, cx)
    });

    match &input.widget {
        widget if widget.has_choices() => ChoiceGroup::new(id.to_string(), widget.clone(), input.options.clone())
            .value(input.value.clone())
            .clearable(input.clearable)
            .on_pick(move |value, window, cx| on_value(value, window, cx))
            .into_any_element(),
        Widget::Switch => {
            let on = input.value.as_ref().is_some_and(|v| v == &Value::Bool(true));
            Switch::new(element_id(id), on)
                .on_toggle(move |window, cx| on_value(Some(Value::Bool(!on)), window, cx))
                .into_any_element()
        }
        _ => inputs.element(SharedString::from(id.to_string()), input, on_value, window, cx),
    }
}
