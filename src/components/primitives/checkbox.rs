//! Checkbox Component

use gpui::{
    App, ElementId, InteractiveElement, IntoElement, ParentElement, RenderOnce, SharedString,
    StatefulInteractiveElement, Styled, Window, div, px,
};

use crate::theme::TableColors;

/// A checkbox; the handler receives the toggled state
#[derive(IntoElement)]
pub struct Checkbox {
    id: ElementId,
    checked: bool,
    label: Option<SharedString>,
    on_change: Option<Box<dyn Fn(bool, &mut Window, &mut App) + 'static>>,
}

impl Checkbox {
    /// Create a new checkbox
    pub fn new(id: impl Into<ElementId>) -> Self {
        Self {
            id: id.into(),
            checked: false,
            label: None,
            on_change: None,
        }
    }

    /// Set the checked state
    pub fn checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }

    /// Set the label
    pub fn label(mut self, label: impl Into<SharedString>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set the change handler
    pub fn on_change(mut self, handler: impl Fn(bool, &mut Window, &mut App) + 'static) -> Self {
        self.on_change = Some(Box::new(handler));
        self
    }
}

impl RenderOnce for Checkbox {
    fn render(self, _window: &mut Window, _cx: &mut App) -> impl IntoElement {
        let checked = self.checked;

        let (checkbox_bg, border_color) = if checked {
            (TableColors::accent(), TableColors::accent())
        } else {
            (TableColors::input_bg(), TableColors::input_border())
        };

        let mut checkbox = div()
            .id(self.id)
            .flex()
            .items_center()
            .gap_2()
            .cursor_pointer()
            .child(
                div()
                    .size(px(16.0))
                    .rounded_sm()
                    .border_1()
                    .border_color(border_color)
                    .bg(checkbox_bg)
                    .flex()
                    .items_center()
                    .justify_center()
                    .text_color(TableColors::text_light())
                    .text_size(px(11.0))
                    .child(if checked { "✓" } else { "" }),
            );

        if let Some(label) = self.label {
            checkbox = checkbox.child(
                div()
                    .text_sm()
                    .text_color(TableColors::text_primary())
                    .child(label),
            );
        }

        if let Some(handler) = self.on_change {
            checkbox = checkbox.on_click(move |_event, window, cx| {
                handler(!checked, window, cx);
            });
        }

        checkbox
    }
}
