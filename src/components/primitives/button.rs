//! Button Component

use gpui::{
    App, ClickEvent, ElementId, InteractiveElement, IntoElement, ParentElement, RenderOnce,
    SharedString, StatefulInteractiveElement, Styled, Window, div, prelude::*, px,
};

use crate::render::ButtonKind;
use crate::theme::TableColors;

/// A styled button
#[derive(IntoElement)]
pub struct Button {
    id: ElementId,
    label: SharedString,
    kind: ButtonKind,
    loading: bool,
    loading_label: SharedString,
    on_click: Option<Box<dyn Fn(&ClickEvent, &mut Window, &mut App) + 'static>>,
}

impl Button {
    /// Create a new button
    pub fn new(id: impl Into<ElementId>, label: impl Into<SharedString>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            kind: ButtonKind::Primary,
            loading: false,
            loading_label: "...".into(),
            on_click: None,
        }
    }

    /// Set the button style
    pub fn kind(mut self, kind: ButtonKind) -> Self {
        self.kind = kind;
        self
    }

    /// Set whether the button is loading
    pub fn loading(mut self, loading: bool) -> Self {
        self.loading = loading;
        self
    }

    /// Label shown while loading
    pub fn loading_label(mut self, label: impl Into<SharedString>) -> Self {
        self.loading_label = label.into();
        self
    }

    /// Set the click handler
    pub fn on_click(mut self, handler: impl Fn(&ClickEvent, &mut Window, &mut App) + 'static) -> Self {
        self.on_click = Some(Box::new(handler));
        self
    }
}

impl RenderOnce for Button {
    fn render(self, _window: &mut Window, _cx: &mut App) -> impl IntoElement {
        let (bg_color, text_color, hover_bg, border) = match self.kind {
            ButtonKind::Primary => (
                TableColors::accent(),
                TableColors::text_light(),
                TableColors::accent_hover(),
                TableColors::accent(),
            ),
            ButtonKind::Default => (
                TableColors::button_default_bg(),
                TableColors::text_secondary(),
                TableColors::button_default_hover(),
                TableColors::button_default_border(),
            ),
            ButtonKind::Text => (
                gpui::rgba(0x00000000),
                TableColors::accent(),
                gpui::rgba(0x00000000),
                gpui::rgba(0x00000000),
            ),
        };

        let (padding_x, padding_y) = match self.kind {
            ButtonKind::Text => (px(4.0), px(2.0)),
            _ => (px(16.0), px(6.0)),
        };

        let label = if self.loading {
            self.loading_label
        } else {
            self.label
        };

        let mut element = div()
            .id(self.id)
            .px(padding_x)
            .py(padding_y)
            .bg(bg_color)
            .border_1()
            .border_color(border)
            .text_color(text_color)
            .text_sm()
            .rounded_md()
            .cursor_pointer()
            .opacity(if self.loading { 0.6 } else { 1.0 })
            .child(label);

        if !self.loading {
            element = element.hover(|s| s.bg(hover_bg));

            if let Some(handler) = self.on_click {
                element = element.on_click(handler);
            }
        }

        element
    }
}
