//! ChoiceGroup Component
//!
//! Select, radio group and checkbox group over a list of choices, drawn as a
//! row of clickable chips.

use std::rc::Rc;

use gpui::{
    App, ElementId, InteractiveElement, IntoElement, ParentElement, RenderOnce, SharedString,
    StatefulInteractiveElement, Styled, Window, div, prelude::*, px,
};
use serde_json::Value;

use crate::descriptor::{Choice, Widget};
use crate::theme::TableColors;

type PickHandler = Rc<dyn Fn(Option<Value>, &mut Window, &mut App) + 'static>;

/// A group of choices bound to one value
#[derive(IntoElement)]
pub struct ChoiceGroup {
    id: SharedString,
    widget: Widget,
    value: Option<Value>,
    options: Vec<Choice>,
    clearable: bool,
    on_pick: Option<PickHandler>,
}

impl ChoiceGroup {
    /// Create a group for a choice widget
    pub fn new(id: impl Into<SharedString>, widget: Widget, options: Vec<Choice>) -> Self {
        Self {
            id: id.into(),
            widget,
            value: None,
            options,
            clearable: false,
            on_pick: None,
        }
    }

    /// Set the bound value
    pub fn value(mut self, value: Option<Value>) -> Self {
        self.value = value;
        self
    }

    /// Clicking the selected choice of a select clears it
    pub fn clearable(mut self, clearable: bool) -> Self {
        self.clearable = clearable;
        self
    }

    /// Set the handler receiving the new value
    pub fn on_pick(mut self, handler: impl Fn(Option<Value>, &mut Window, &mut App) + 'static) -> Self {
        self.on_pick = Some(Rc::new(handler));
        self
    }

    fn is_selected(&self, choice: &Choice) -> bool {
        match (&self.widget, &self.value) {
            (Widget::CheckboxGroup, Some(Value::Array(items))) => items.contains(&choice.value),
            (_, Some(value)) => value == &choice.value,
            _ => false,
        }
    }

    fn next_value(&self, choice: &Choice, selected: bool) -> Option<Value> {
        match self.widget {
            Widget::CheckboxGroup => Some(choice.toggle_in(self.value.as_ref())),
            Widget::Select if selected && self.clearable => None,
            _ => Some(choice.value.clone()),
        }
    }
}

impl RenderOnce for ChoiceGroup {
    fn render(self, _window: &mut Window, _cx: &mut App) -> impl IntoElement {
        let chips: Vec<_> = self
            .options
            .iter()
            .enumerate()
            .map(|(index, choice)| {
                let selected = self.is_selected(choice);
                let next = self.next_value(choice, selected);
                let marker = match (&self.widget, selected) {
                    (Widget::RadioGroup, true) => "◉ ",
                    (Widget::RadioGroup, false) => "○ ",
                    (Widget::CheckboxGroup, true) => "☑ ",
                    (Widget::CheckboxGroup, false) => "☐ ",
                    _ => "",
                };
                let (bg, fg) = if selected {
                    (TableColors::accent_light(), TableColors::accent())
                } else {
                    (TableColors::input_bg(), TableColors::text_secondary())
                };
                div()
                    .id(ElementId::Name(SharedString::from(format!("{}-choice-{index}", self.id))))
                    .px_2()
                    .py_1()
                    .rounded_md()
                    .border_1()
                    .border_color(TableColors::input_border())
                    .bg(bg)
                    .text_color(fg)
                    .text_sm()
                    .cursor_pointer()
                    .child(format!("{marker}{}", choice.label))
                    .when_some(self.on_pick.clone(), move |el, handler| {
                        el.on_click(move |_event, window, cx| handler(next.clone(), window, cx))
                    })
            })
            .collect();

        div()
            .flex()
            .flex_wrap()
            .items_center()
            .gap_1()
            .min_w(px(150.0))
            .children(chips)
    }
}
