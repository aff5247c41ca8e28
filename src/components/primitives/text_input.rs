//! TextInput Component
//!
//! Keeps one `InputState` per bound text control so edits survive re-renders
//! of the render tree, and forwards every change as a new value.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use gpui::{
    AnyElement, App, AppContext, Context, Entity, IntoElement, SharedString, Styled, Subscription, Window, px,
};
use gpui_component::input::{Input, InputEvent, InputState};
use serde_json::Value;

use crate::render::InputNode;
use crate::value;

/// Receives the value typed into a control
pub type OnText = Rc<dyn Fn(Option<Value>, &mut Window, &mut App) + 'static>;

struct Slot {
    state: Entity<InputState>,
    on_text: Rc<RefCell<Option<OnText>>>,
    _subscription: Subscription,
}

/// Text input states of one view, keyed by element id
#[derive(Default)]
pub struct TextInputs {
    slots: HashMap<SharedString, Slot>,
}

impl TextInputs {
    /// Text input element for a bound control
    pub fn element<V: 'static, E: 'static>(
        &mut self,
        id: SharedString,
        node: &InputNode<E>,
        on_text: OnText,
        window: &mut Window,
        cx: &mut Context<V>,
    ) -> AnyElement {
        let display = value::display(node.value.as_ref());
        let slot = self.slots.entry(id).or_insert_with(|| {
            let placeholder = node.placeholder.clone().unwrap_or_default();
            let state = cx.new(|cx| {
                InputState::new(window, cx)
                    .clean_on_escape()
                    .placeholder(placeholder)
            });
            let handler: Rc<RefCell<Option<OnText>>> = Rc::default();
            let target = handler.clone();
            let subscription = cx.subscribe_in(&state, window, move |_this, state, event, window, cx| {
                if matches!(event, InputEvent::Change) {
                    let text = state.read(cx).value().to_string();
                    // The owning view is mid-update here; run the handler after it
                    if let Some(callback) = target.borrow().clone() {
                        window.defer(cx, move |window, cx| {
                            callback(Some(Value::String(text)), window, cx)
                        });
                    }
                }
            });
            Slot {
                state,
                on_text: handler,
                _subscription: subscription,
            }
        });
        slot.on_text.replace(Some(on_text));

        if slot.state.read(cx).value().to_string() != display {
            slot.state.update(cx, |state, cx| state.set_value(display, window, cx));
        }

        Input::new(&slot.state)
            .cleanable(node.clearable)
            .min_w(px(180.0))
            .into_any_element()
    }
}
