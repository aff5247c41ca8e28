//! Pagination Component
//!
//! Page navigation and page size options for the DataTable.

use std::rc::Rc;

use gpui::{
    App, ElementId, InteractiveElement, IntoElement, ParentElement, RenderOnce, SharedString,
    StatefulInteractiveElement, Styled, Window, div, prelude::*,
};

use crate::i18n::{self, Locale};
use crate::table::PageState;
use crate::theme::TableColors;

type PageHandler = Rc<dyn Fn(u64, &mut Window, &mut App) + 'static>;

/// Pagination component
#[derive(IntoElement)]
pub struct Pagination {
    page: PageState,
    page_sizes: Vec<u64>,
    locale: Locale,
    on_page_change: Option<PageHandler>,
    on_size_change: Option<PageHandler>,
}

impl Pagination {
    /// Create a pagination bar for a page state
    pub fn new(page: PageState, page_sizes: Vec<u64>) -> Self {
        Self {
            page,
            page_sizes,
            locale: Locale::default(),
            on_page_change: None,
            on_size_change: None,
        }
    }

    /// Set the locale of the labels
    pub fn locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    /// Set the page change handler
    pub fn on_page_change(mut self, handler: impl Fn(u64, &mut Window, &mut App) + 'static) -> Self {
        self.on_page_change = Some(Rc::new(handler));
        self
    }

    /// Set the page size change handler
    pub fn on_size_change(mut self, handler: impl Fn(u64, &mut Window, &mut App) + 'static) -> Self {
        self.on_size_change = Some(Rc::new(handler));
        self
    }

    fn nav_button(
        id: &'static str,
        label: &'static str,
        target: Option<u64>,
        handler: Option<PageHandler>,
    ) -> impl IntoElement {
        let enabled = target.is_some();
        div()
            .id(id)
            .px_2()
            .py_1()
            .rounded_sm()
            .text_sm()
            .text_color(if enabled {
                TableColors::text_primary()
            } else {
                TableColors::text_muted()
            })
            .child(label)
            .when(enabled, |btn| {
                btn.cursor_pointer()
                    .hover(|s| s.bg(TableColors::table_row_hover()))
            })
            .when_some(target.zip(handler), |btn, (page, handler)| {
                btn.on_click(move |_event, window, cx| handler(page, window, cx))
            })
    }
}

impl RenderOnce for Pagination {
    fn render(self, _window: &mut Window, _cx: &mut App) -> impl IntoElement {
        let page = self.page;
        let current = page.current.unwrap_or(1);
        let prev = page.has_prev().then(|| current - 1);
        let next = page.has_next().then(|| current + 1);
        let count = page
            .page_count
            .map_or_else(|| "-".to_string(), |c| c.to_string());
        let total = page.total.map_or_else(|| "-".to_string(), |t| t.to_string());
        let per_page = i18n::t(self.locale, "table-per-page");

        let sizes: Vec<_> = self
            .page_sizes
            .iter()
            .map(|&size| {
                let selected = page.size == Some(size);
                div()
                    .id(ElementId::Name(SharedString::from(format!("page-size-{size}"))))
                    .px_2()
                    .py_1()
                    .rounded_sm()
                    .text_sm()
                    .cursor_pointer()
                    .text_color(if selected {
                        TableColors::accent()
                    } else {
                        TableColors::text_secondary()
                    })
                    .hover(|s| s.bg(TableColors::table_row_hover()))
                    .child(format!("{size} {per_page}"))
                    .when_some(self.on_size_change.clone(), move |el, handler| {
                        el.on_click(move |_event, window, cx| handler(size, window, cx))
                    })
            })
            .collect();

        div()
            .w_full()
            .px_4()
            .py_2()
            .flex()
            .items_center()
            .justify_between()
            .border_t_1()
            .border_color(TableColors::border())
            // Item count
            .child(
                div()
                    .text_sm()
                    .text_color(TableColors::text_secondary())
                    .child(format!("{} {total}", i18n::t(self.locale, "table-total"))),
            )
            .child(
                div()
                    .flex()
                    .items_center()
                    .gap_2()
                    .child(div().flex().items_center().gap_1().children(sizes))
                    .child(Self::nav_button("prev-page", "←", prev, self.on_page_change.clone()))
                    .child(
                        div()
                            .text_sm()
                            .text_color(TableColors::text_primary())
                            .child(format!("{current} / {count}")),
                    )
                    .child(Self::nav_button("next-page", "→", next, self.on_page_change.clone())),
            )
    }
}
