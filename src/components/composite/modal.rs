//! Modal Component
//!
//! A modal dialog component.

use gpui::{
    AnyElement, App, ClickEvent, InteractiveElement, IntoElement, ParentElement, RenderOnce,
    SharedString, StatefulInteractiveElement, Styled, Window, div, prelude::*, px,
};

use crate::theme::TableColors;

type CloseHandler = Box<dyn Fn(&mut Window, &mut App) + 'static>;

/// Modal component
#[derive(IntoElement)]
pub struct Modal {
    title: Option<SharedString>,
    width: Option<f32>,
    children: Vec<AnyElement>,
    footer: Option<AnyElement>,
    on_close: Option<CloseHandler>,
}

impl Modal {
    /// Create a new modal
    pub fn new() -> Self {
        Self {
            title: None,
            width: None,
            children: Vec::new(),
            footer: None,
            on_close: None,
        }
    }

    /// Set the title
    pub fn title(mut self, title: Option<impl Into<SharedString>>) -> Self {
        self.title = title.map(Into::into);
        self
    }

    /// Set a fixed width in pixels
    pub fn width(mut self, width: Option<f32>) -> Self {
        self.width = width;
        self
    }

    /// Add a child element
    pub fn child(mut self, child: impl IntoElement) -> Self {
        self.children.push(child.into_any_element());
        self
    }

    /// Add child elements
    pub fn children(mut self, children: impl IntoIterator<Item = AnyElement>) -> Self {
        self.children.extend(children);
        self
    }

    /// Set the footer row
    pub fn footer(mut self, footer: impl IntoElement) -> Self {
        self.footer = Some(footer.into_any_element());
        self
    }

    /// Set the close handler
    pub fn on_close(mut self, handler: impl Fn(&mut Window, &mut App) + 'static) -> Self {
        self.on_close = Some(Box::new(handler));
        self
    }
}

impl Default for Modal {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderOnce for Modal {
    fn render(self, _window: &mut Window, _cx: &mut App) -> impl IntoElement {
        let on_close = self.on_close;

        // Backdrop
        div()
            .absolute()
            .inset_0()
            .bg(TableColors::backdrop())
            .flex()
            .items_center()
            .justify_center()
            .child(
                // Modal container
                div()
                    .bg(TableColors::content_bg())
                    .rounded_lg()
                    .shadow_lg()
                    .map(|el| match self.width {
                        Some(width) => el.w(px(width)),
                        None => el.min_w(px(400.0)).max_w(px(600.0)),
                    })
                    .flex()
                    .flex_col()
                    // Header
                    .child(
                        div()
                            .px_6()
                            .py_4()
                            .border_b_1()
                            .border_color(TableColors::border())
                            .flex()
                            .items_center()
                            .justify_between()
                            .child(
                                div()
                                    .text_size(px(16.0))
                                    .font_weight(gpui::FontWeight::SEMIBOLD)
                                    .text_color(TableColors::text_primary())
                                    .children(self.title),
                            )
                            .child(
                                div()
                                    .id("modal-close")
                                    .size(px(24.0))
                                    .rounded_sm()
                                    .flex()
                                    .items_center()
                                    .justify_center()
                                    .text_color(TableColors::text_muted())
                                    .text_size(px(16.0))
                                    .cursor_pointer()
                                    .hover(|s| s.bg(TableColors::table_row_hover()))
                                    .when_some(on_close, |el, handler| {
                                        el.on_click(move |_event: &ClickEvent, window, cx| {
                                            handler(window, cx);
                                        })
                                    })
                                    .child("×"),
                            ),
                    )
                    // Content
                    .child(
                        div()
                            .px_6()
                            .py_4()
                            .flex()
                            .flex_col()
                            .gap_4()
                            .children(self.children),
                    )
                    .when_some(self.footer, |el, footer| {
                        el.child(
                            div()
                                .px_6()
                                .py_3()
                                .border_t_1()
                                .border_color(TableColors::border())
                                .flex()
                                .justify_end()
                                .child(footer),
                        )
                    }),
            )
    }
}
