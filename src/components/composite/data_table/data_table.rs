//! DataTable Component
//!
//! GPUI view over a [`TableController`]: filter bar, grouped header, rows
//! and pagination. Fetches and switch callbacks run on spawned tasks and are
//! applied back through the controller's split-phase API.

use std::rc::Rc;

use gpui::{
    AnyElement, App, Context, Div, InteractiveElement, IntoElement, ParentElement, Render, Styled,
    Window, div, prelude::*, px, relative,
};
use gpui_component::{h_flex, v_flex};
use serde_json::Value;

use super::pagination::Pagination;
use crate::components::composite::filter_bar::render_filter_bar;
use crate::components::composite::node::{Dispatch, element_id, paint};
use crate::components::primitives::TextInputs;
use crate::descriptor::{Align, ColumnWidth};
use crate::filter_bar::FilterEvent;
use crate::table::{
    ColumnLayout, Effect, HeaderView, SortOrder, SwitchRequest, TableController, TableEvent,
    TableView,
};
use crate::theme::TableColors;
use crate::value::Params;

const SELECTION_WIDTH: f32 = 44.0;

/// DataTable component
pub struct DataTable {
    controller: TableController,
    inputs: TextInputs,
    row_height: f32,
    header_height: f32,
}

impl DataTable {
    /// Create the view and run the initial load
    pub fn new(controller: TableController, cx: &mut Context<Self>) -> Self {
        let mut table = Self {
            controller,
            inputs: TextInputs::default(),
            row_height: 40.0,
            header_height: 40.0,
        };
        if table.controller.prepare_mount() {
            table.reload(cx);
        }
        table
    }

    /// The underlying controller
    pub fn controller(&self) -> &TableController {
        &self.controller
    }

    /// The underlying controller, mutable
    pub fn controller_mut(&mut self) -> &mut TableController {
        &mut self.controller
    }

    /// Fetch rows for the current state
    pub fn reload(&mut self, cx: &mut Context<Self>) {
        let request = self.controller.begin_reload();
        cx.notify();
        cx.spawn(async move |this, cx| match request.fetch().await {
            Ok(response) => {
                let _ = this.update(cx, |table, cx| {
                    table.controller.finish_reload(response);
                    cx.notify();
                });
            }
            Err(e) => {
                tracing::error!("Failed to load table rows: {}", e);
            }
        })
        .detach();
    }

    /// Search with the embedded filter bar's params
    pub fn search(&mut self, cx: &mut Context<Self>) {
        self.handle_event(TableEvent::Filter(FilterEvent::Search), cx);
    }

    /// Apply an event from the painted controls
    pub fn handle_event(&mut self, event: TableEvent, cx: &mut Context<Self>) {
        match self.controller.handle(event) {
            Effect::None => cx.notify(),
            Effect::Reload => self.reload(cx),
            Effect::Switch(request) => self.run_switch(request, cx),
        }
    }

    fn run_switch(&mut self, request: SwitchRequest, cx: &mut Context<Self>) {
        cx.spawn(async move |this, cx| match request.run().await {
            Ok(()) => {
                let _ = this.update(cx, |table, cx| {
                    table.controller.commit_switch(&request);
                    cx.notify();
                });
            }
            Err(e) => {
                tracing::error!(row = request.row, "Switch callback failed: {}", e);
            }
        })
        .detach();
    }

    fn sized(cell: Div, width: ColumnWidth) -> Div {
        match width {
            ColumnWidth::Fixed(w) => cell.w(px(w)).flex_none(),
            ColumnWidth::Flex { min, max } => {
                let cell = cell.flex_1().min_w(px(min.unwrap_or(80.0)));
                match max {
                    Some(max) => cell.max_w(px(max)),
                    None => cell,
                }
            }
            ColumnWidth::Percent(p) => cell.w(relative(p / 100.0)).flex_none(),
        }
    }

    fn aligned(cell: Div, align: Align) -> Div {
        match align {
            Align::Left => cell.justify_start(),
            Align::Center => cell.justify_center(),
            Align::Right => cell.justify_end(),
        }
    }

    fn sort_marker(order: Option<SortOrder>) -> &'static str {
        match order {
            Some(SortOrder::Ascending) => " ▲",
            Some(SortOrder::Descending) => " ▼",
            None => " ↕",
        }
    }

    /// Header cells of `level` covering `span` leaves, nested under groups
    fn header_block(
        &self,
        rows: &[Vec<HeaderView>],
        level: usize,
        cursors: &mut [usize],
        span: usize,
        columns: &[ColumnLayout],
        dispatch: &Dispatch<TableEvent>,
    ) -> Vec<AnyElement> {
        let mut out = Vec::new();
        let mut covered = 0;
        while covered < span {
            let Some(header) = rows.get(level).and_then(|row| row.get(cursors[level])) else {
                break;
            };
            cursors[level] += 1;
            covered += header.cell.col_span;
            let cell = &header.cell;

            let element = match cell.leaf {
                Some(leaf) => {
                    let layout = columns.get(leaf).copied().unwrap_or(ColumnLayout {
                        width: cell.width,
                        align: cell.align,
                    });
                    let label = match &header.sort {
                        Some((order, _)) => format!("{}{}", cell.label, Self::sort_marker(*order)),
                        None => cell.label.clone(),
                    };
                    let base = div()
                        .id(element_id(&format!("header-{leaf}")))
                        .h(px(self.header_height * cell.row_span as f32))
                        .px_3()
                        .flex()
                        .items_center()
                        .border_r_1()
                        .border_color(TableColors::border())
                        .text_sm()
                        .font_weight(gpui::FontWeight::MEDIUM)
                        .text_color(TableColors::text_secondary())
                        .child(label);
                    let base = match header.sort.clone() {
                        Some((_, event)) => {
                            let dispatch = dispatch.clone();
                            base.cursor_pointer()
                                .on_click(move |_event, window, cx| dispatch(event.clone(), window, cx))
                        }
                        None => base,
                    };
                    let wrapper = Self::aligned(div().flex(), layout.align).child(base);
                    Self::sized(wrapper, layout.width).into_any_element()
                }
                None => {
                    let children =
                        self.header_block(rows, level + 1, cursors, cell.col_span, columns, dispatch);
                    v_flex()
                        .flex_1()
                        .child(
                            Self::aligned(
                                div()
                                    .h(px(self.header_height))
                                    .flex()
                                    .items_center()
                                    .border_b_1()
                                    .border_r_1()
                                    .border_color(TableColors::border()),
                                cell.align,
                            )
                            .text_sm()
                            .font_weight(gpui::FontWeight::MEDIUM)
                            .text_color(TableColors::text_secondary())
                            .child(cell.label.clone()),
                        )
                        .child(h_flex().children(children))
                        .into_any_element()
                }
            };
            out.push(element);
        }
        out
    }

    fn render_header(&mut self, view: &TableView, dispatch: &Dispatch<TableEvent>, window: &mut Window, cx: &mut Context<Self>) -> Vec<AnyElement> {
        let depth = view.header.len().max(1);
        let height = px(self.header_height * depth as f32);
        let mut header = Vec::new();

        if let Some(select_all) = &view.selection_header {
            header.push(
                div()
                    .w(px(SELECTION_WIDTH))
                    .h(height)
                    .flex()
                    .items_center()
                    .justify_center()
                    .child(paint("select-all", select_all, dispatch, &mut self.inputs, window, cx))
                    .into_any_element(),
            );
        }

        let mut cursors = vec![0; view.header.len()];
        header.extend(self.header_block(
            &view.header,
            0,
            &mut cursors,
            view.columns.len(),
            &view.columns,
            dispatch,
        ));

        if let Some(options) = &view.options_header {
            let cell = Self::aligned(div().h(height).flex().items_center().px_3(), options.align)
                .text_sm()
                .font_weight(gpui::FontWeight::MEDIUM)
                .text_color(TableColors::text_secondary())
                .child(options.label.clone());
            header.push(Self::sized(cell, options.width).into_any_element());
        }

        header
    }

    fn render_rows(&mut self, view: &TableView, dispatch: &Dispatch<TableEvent>, window: &mut Window, cx: &mut Context<Self>) -> Vec<AnyElement> {
        let options_layout = view.options_header.as_ref().map(|o| (o.width, o.align));
        let mut rows = Vec::with_capacity(view.rows.len());
        for (index, row) in view.rows.iter().enumerate() {
            let bg = if index % 2 == 0 || !Self::prop_flag(&view.table_props, "stripe") {
                TableColors::content_bg()
            } else {
                TableColors::table_row_alt()
            };
            let mut cells = Vec::new();
            if let Some(selection) = &row.selection {
                let checkbox = paint(&format!("row-{index}-select"), selection, dispatch, &mut self.inputs, window, cx);
                cells.push(
                    div()
                        .w(px(SELECTION_WIDTH))
                        .flex()
                        .justify_center()
                        .child(checkbox)
                        .into_any_element(),
                );
            }
            for (column, (cell, layout)) in row.cells.iter().zip(&view.columns).enumerate() {
                let content = paint(&format!("row-{index}-cell-{column}"), cell, dispatch, &mut self.inputs, window, cx);
                let cell = Self::aligned(div().flex().items_center().px_3().overflow_hidden(), layout.align)
                    .child(content);
                cells.push(Self::sized(cell, layout.width).into_any_element());
            }
            if let (Some(options), Some((width, align))) = (&row.options, options_layout) {
                let content = paint(&format!("row-{index}-options"), options, dispatch, &mut self.inputs, window, cx);
                let cell = Self::aligned(div().flex().items_center().px_3(), align).child(content);
                cells.push(Self::sized(cell, width).into_any_element());
            }

            rows.push(
                h_flex()
                    .id(element_id(&format!("row-{index}")))
                    .min_h(px(self.row_height))
                    .w_full()
                    .items_center()
                    .bg(bg)
                    .hover(|s| s.bg(TableColors::table_row_hover()))
                    .border_b_1()
                    .border_color(TableColors::border())
                    .children(cells)
                    .into_any_element(),
            );
        }
        rows
    }

    /// Boolean table property, on unless set to `false`
    fn prop_flag(props: &Params, name: &str) -> bool {
        props.get(name).and_then(Value::as_bool).unwrap_or(true)
    }

    fn apply_props(&mut self, props: &Params) {
        if let Some(height) = props.get("row_height").and_then(Value::as_f64) {
            self.row_height = height as f32;
        }
        if let Some(height) = props.get("header_height").and_then(Value::as_f64) {
            self.header_height = height as f32;
        }
    }

    fn render_placeholder(&self, text: String) -> impl IntoElement {
        div()
            .h(px(self.row_height * 3.0))
            .flex()
            .items_center()
            .justify_center()
            .text_sm()
            .text_color(TableColors::text_muted())
            .child(text)
    }
}

impl Render for DataTable {
    fn render(&mut self, window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let entity = cx.entity().downgrade();
        let dispatch: Dispatch<TableEvent> = Rc::new(move |event: TableEvent, _window: &mut Window, cx: &mut App| {
            let _ = entity.update(cx, |table, cx| table.handle_event(event, cx));
        });
        let view = self.controller.render();
        self.apply_props(&view.table_props);

        let bar = view
            .bar
            .as_ref()
            .map(|bar| paint("table-bar", bar, &dispatch, &mut self.inputs, window, cx));
        let filter_bar = view.filter_bar.as_ref().map(|filters| {
            let dispatch = dispatch.clone();
            let filter_dispatch: Dispatch<FilterEvent> =
                Rc::new(move |event: FilterEvent, window: &mut Window, cx: &mut App| {
                    dispatch(TableEvent::Filter(event), window, cx)
                });
            render_filter_bar("table", filters, bar, &filter_dispatch, &mut self.inputs, window, cx)
        });
        let content = view
            .content
            .as_ref()
            .map(|content| paint("table-content", content, &dispatch, &mut self.inputs, window, cx));

        let header = self.render_header(&view, &dispatch, window, cx);
        let body = if view.rows.is_empty() {
            let text = if view.loading {
                view.loading_text.clone()
            } else {
                view.empty_text.clone()
            };
            vec![self.render_placeholder(text).into_any_element()]
        } else {
            self.render_rows(&view, &dispatch, window, cx)
        };

        let pagination = view.pagination.clone().map(|pagination| {
            let on_page = dispatch.clone();
            let on_size = dispatch.clone();
            Pagination::new(pagination.page, pagination.page_sizes)
                .locale(self.controller.locale())
                .on_page_change(move |page, window, cx| on_page(TableEvent::PageChange(page), window, cx))
                .on_size_change(move |size, window, cx| on_size(TableEvent::SizeChange(size), window, cx))
        });

        v_flex()
            .size_full()
            .gap_2()
            .children(filter_bar)
            .children(content)
            .child(
                v_flex()
                    .flex_1()
                    .bg(TableColors::content_bg())
                    .when(Self::prop_flag(&view.table_props, "border"), |el| {
                        el.border_1().border_color(TableColors::border())
                    })
                    .rounded_md()
                    .overflow_hidden()
                    .child(
                        h_flex()
                            .w_full()
                            .bg(TableColors::table_header_bg())
                            .border_b_1()
                            .border_color(TableColors::border())
                            .children(header),
                    )
                    .child(
                        div()
                            .id("data-table-rows")
                            .flex_1()
                            .overflow_y_scroll()
                            .when(view.loading && !view.rows.is_empty(), |el| el.opacity(0.6))
                            .children(body),
                    )
                    .children(pagination),
            )
    }
}
