//! Switch Component

use gpui::{
    App, ElementId, InteractiveElement, IntoElement, ParentElement, RenderOnce, SharedString,
    StatefulInteractiveElement, Styled, Window, div, prelude::*, px,
};

use crate::theme::TableColors;

/// Two-state switch with a text for each state
#[derive(IntoElement)]
pub struct Switch {
    id: ElementId,
    on: bool,
    active_text: SharedString,
    inactive_text: SharedString,
    on_toggle: Option<Box<dyn Fn(&mut Window, &mut App) + 'static>>,
}

impl Switch {
    /// Create a new switch
    pub fn new(id: impl Into<ElementId>, on: bool) -> Self {
        Self {
            id: id.into(),
            on,
            active_text: SharedString::default(),
            inactive_text: SharedString::default(),
            on_toggle: None,
        }
    }

    /// Texts for the two states
    pub fn texts(mut self, active: impl Into<SharedString>, inactive: impl Into<SharedString>) -> Self {
        self.active_text = active.into();
        self.inactive_text = inactive.into();
        self
    }

    /// Set the toggle handler
    pub fn on_toggle(mut self, handler: impl Fn(&mut Window, &mut App) + 'static) -> Self {
        self.on_toggle = Some(Box::new(handler));
        self
    }
}

impl RenderOnce for Switch {
    fn render(self, _window: &mut Window, _cx: &mut App) -> impl IntoElement {
        let on = self.on;
        let track = if on {
            TableColors::switch_on()
        } else {
            TableColors::switch_off()
        };

        div()
            .id(self.id)
            .flex()
            .items_center()
            .gap_2()
            .cursor_pointer()
            .child(
                div()
                    .w(px(36.0))
                    .h(px(18.0))
                    .rounded_full()
                    .bg(track)
                    .flex()
                    .items_center()
                    .px(px(2.0))
                    .when(on, |el| el.justify_end())
                    .child(div().size(px(14.0)).rounded_full().bg(TableColors::content_bg())),
            )
            .child(
                div()
                    .text_sm()
                    .text_color(TableColors::text_secondary())
                    .child(if on { self.active_text } else { self.inactive_text }),
            )
            .when_some(self.on_toggle, |el, handler| {
                el.on_click(move |_event, window, cx| handler(window, cx))
            })
    }
}
