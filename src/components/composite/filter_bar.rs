//! Filter Bar View
//!
//! Paints a [`FilterBarView`] and hosts a standalone filter bar that emits
//! the derived params on every search.

use std::rc::Rc;

use gpui::{
    AnyElement, App, Context, EventEmitter, IntoElement, ParentElement, Render, Styled, Window, div,
};
use gpui_component::h_flex;

use super::node::{Dispatch, paint};
use crate::components::primitives::TextInputs;
use crate::filter_bar::{FilterBarController, FilterBarView, FilterEvent};
use crate::theme::TableColors;
use crate::value::Params;

/// Paint the filter items followed by the search trigger and the trailing
/// regions; `extra` is already painted by the host
pub fn render_filter_bar<V: 'static>(
    id: &str,
    view: &FilterBarView,
    extra: Option<AnyElement>,
    dispatch: &Dispatch<FilterEvent>,
    inputs: &mut TextInputs,
    window: &mut Window,
    cx: &mut Context<V>,
) -> AnyElement {
    let mut items = Vec::with_capacity(view.items.len() + 1);
    for (index, item) in view.items.iter().enumerate() {
        let control = paint(&format!("{id}-filter-{index}"), &item.control, dispatch, inputs, window, cx);
        items.push(
            h_flex()
                .gap_2()
                .items_center()
                .child(
                    div()
                        .text_sm()
                        .text_color(TableColors::text_secondary())
                        .child(item.label.clone()),
                )
                .child(control)
                .into_any_element(),
        );
    }
    items.push(paint(&format!("{id}-search"), &view.search, dispatch, inputs, window, cx));
    if let Some(trailing) = &view.trailing {
        items.push(paint(&format!("{id}-trailing"), trailing, dispatch, inputs, window, cx));
    }
    items.extend(extra);

    h_flex()
        .w_full()
        .flex_wrap()
        .gap_4()
        .items_center()
        .py_2()
        .children(items)
        .into_any_element()
}

/// Emitted with the params of every search
#[derive(Debug, Clone)]
pub struct SearchEvent(pub Params);

/// Standalone filter bar
pub struct FilterBar {
    controller: FilterBarController,
    inputs: TextInputs,
}

impl EventEmitter<SearchEvent> for FilterBar {}

impl FilterBar {
    /// Create a filter bar view over a controller
    pub fn new(controller: FilterBarController, _cx: &mut Context<Self>) -> Self {
        Self {
            controller,
            inputs: TextInputs::default(),
        }
    }

    /// The underlying controller
    pub fn controller(&self) -> &FilterBarController {
        &self.controller
    }

    fn handle_event(&mut self, event: FilterEvent, cx: &mut Context<Self>) {
        if let Some(params) = self.controller.handle(event) {
            cx.emit(SearchEvent(params));
        }
        cx.notify();
    }
}

impl Render for FilterBar {
    fn render(&mut self, window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let entity = cx.entity().downgrade();
        let dispatch: Dispatch<FilterEvent> = Rc::new(move |event: FilterEvent, _window: &mut Window, cx: &mut App| {
            let _ = entity.update(cx, |bar, cx| bar.handle_event(event, cx));
        });
        let view = self.controller.render(false);
        render_filter_bar("filter-bar", &view, None, &dispatch, &mut self.inputs, window, cx)
    }
}
