//! Table Controller
//!
//! Owns rows, pagination, sort and selection. Every change that needs the
//! server goes through [`TableController::reload`], which builds the request
//! from the last filter params, the sort and the page, and remaps the
//! response through the field map.

use std::fmt;
use std::sync::Arc;

use futures::future::BoxFuture;
use serde_json::Value;

use super::columns::{self, CellKind, HeaderCell, LeafColumn};
use super::state::{DEFAULT_PAGE_SIZES, PageState, Selection, SortOrder, SortState};
use super::{CellContext, TableEvent};
use crate::descriptor::{
    Align, ColumnDescriptor, ColumnWidth, FilterDescriptor, OptionsColumn, SwitchHandler,
};
use crate::error::{Error, Result};
use crate::field_map::{FieldMap, FieldMapOverride};
use crate::filter_bar::{FilterBarController, FilterBarView, FilterEvent};
use crate::i18n::{self, Locale};
use crate::render::{ButtonKind, Node};
use crate::settings::TableSettings;
use crate::value::{self, Params};

/// Injected data source: request params in, response payload out
pub type ListApi = Arc<dyn Fn(Params) -> BoxFuture<'static, Result<Value>> + Send + Sync>;

/// Post-processor whose result replaces the rows
pub type Fetched = Arc<dyn Fn(Value) -> Vec<Value> + Send + Sync>;

/// Handler for events from custom cell renderers
pub type CustomHandler = Arc<dyn Fn(&CellContext<'_>, &str, &Value) + Send + Sync>;

/// Caller region rendered against the loaded rows
pub type TableSlot = Arc<dyn Fn(&[Value]) -> Node<TableEvent> + Send + Sync>;

/// Async work the host must run after a state transition
pub enum Effect {
    /// Nothing to do
    None,
    /// Reload the rows
    Reload,
    /// Run a switch callback, then commit
    Switch(SwitchRequest),
}

impl fmt::Debug for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Effect::None => f.write_str("None"),
            Effect::Reload => f.write_str("Reload"),
            Effect::Switch(request) => f.debug_tuple("Switch").field(request).finish(),
        }
    }
}

/// A fetch prepared by [`TableController::begin_reload`]
pub struct ReloadRequest {
    pub params: Params,
    fetch: ListApi,
}

impl ReloadRequest {
    /// Call the list API
    pub fn fetch(&self) -> BoxFuture<'static, Result<Value>> {
        (self.fetch)(self.params.clone())
    }
}

/// A pending switch-cell change
pub struct SwitchRequest {
    pub row: usize,
    pub key: String,
    pub value: Value,
    row_snapshot: Value,
    handler: Option<SwitchHandler>,
    generation: u64,
}

impl SwitchRequest {
    /// Run the caller's side effect; an error means the value must not be committed
    pub fn run(&self) -> BoxFuture<'static, Result<()>> {
        match &self.handler {
            Some(handler) => handler(self.value.clone(), self.row_snapshot.clone()),
            None => Box::pin(async { Ok(()) }),
        }
    }
}

impl fmt::Debug for SwitchRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SwitchRequest")
            .field("row", &self.row)
            .field("key", &self.key)
            .field("value", &self.value)
            .finish_non_exhaustive()
    }
}

/// Header cell plus its sort control
#[derive(Debug, Clone)]
pub struct HeaderView {
    pub cell: HeaderCell,
    /// Current order and the event a click emits, for sortable columns
    pub sort: Option<(Option<SortOrder>, TableEvent)>,
}

/// One rendered row
#[derive(Debug, Clone)]
pub struct RowView {
    pub selection: Option<Node<TableEvent>>,
    pub cells: Vec<Node<TableEvent>>,
    pub options: Option<Node<TableEvent>>,
}

/// Layout of a body column
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnLayout {
    pub width: ColumnWidth,
    pub align: Align,
}

/// Options column header
#[derive(Debug, Clone, PartialEq)]
pub struct OptionsHeader {
    pub label: String,
    pub width: ColumnWidth,
    pub align: Align,
}

/// Pagination control state
#[derive(Debug, Clone, PartialEq)]
pub struct PaginationView {
    pub page: PageState,
    pub page_sizes: Vec<u64>,
}

/// Render output of the table
#[derive(Debug, Clone)]
pub struct TableView {
    pub filter_bar: Option<FilterBarView>,
    pub header: Vec<Vec<HeaderView>>,
    pub selection_header: Option<Node<TableEvent>>,
    pub options_header: Option<OptionsHeader>,
    pub columns: Vec<ColumnLayout>,
    pub rows: Vec<RowView>,
    pub loading: bool,
    pub loading_text: String,
    pub empty_text: String,
    pub pagination: Option<PaginationView>,
    /// Caller region after the filter bar's search trigger
    pub bar: Option<Node<TableEvent>>,
    /// Caller region between the filter bar and the table
    pub content: Option<Node<TableEvent>>,
    /// Toolkit table properties passed through untouched
    pub table_props: Params,
}

/// Builder for [`TableController`]
pub struct TableBuilder {
    list_api: ListApi,
    columns: Vec<ColumnDescriptor>,
    options: Option<OptionsColumn>,
    filters: Option<Vec<FilterDescriptor>>,
    fetched: Option<Fetched>,
    field_map: FieldMapOverride,
    no_page: bool,
    selectable: bool,
    reload_on_mount: bool,
    page_size: u64,
    page_sizes: Vec<u64>,
    locale: Locale,
    on_custom: Option<CustomHandler>,
    bar: Option<TableSlot>,
    content: Option<TableSlot>,
    table_props: Params,
}

impl TableBuilder {
    /// Column descriptors
    pub fn columns(mut self, columns: Vec<ColumnDescriptor>) -> Self {
        self.columns = columns;
        self
    }

    /// Trailing options column
    pub fn options(mut self, options: OptionsColumn) -> Self {
        self.options = Some(options);
        self
    }

    /// Embedded filter bar
    pub fn filters(mut self, filters: Vec<FilterDescriptor>) -> Self {
        self.filters = Some(filters);
        self
    }

    /// Post-process every response into rows
    pub fn fetched(mut self, fetched: impl Fn(Value) -> Vec<Value> + Send + Sync + 'static) -> Self {
        self.fetched = Some(Arc::new(fetched));
        self
    }

    /// Field names that differ from the defaults
    pub fn field_map(mut self, field_map: FieldMapOverride) -> Self {
        self.field_map = field_map;
        self
    }

    /// Data is not paged; the response is the row list
    pub fn no_page(mut self, no_page: bool) -> Self {
        self.no_page = no_page;
        self
    }

    /// Show the leading checkbox column
    pub fn selectable(mut self, selectable: bool) -> Self {
        self.selectable = selectable;
        self
    }

    /// Load when first mounted
    pub fn reload_on_mount(mut self, reload_on_mount: bool) -> Self {
        self.reload_on_mount = reload_on_mount;
        self
    }

    /// Initial page size
    pub fn page_size(mut self, page_size: u64) -> Self {
        self.page_size = page_size;
        self
    }

    /// Locale of the default texts
    pub fn locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    /// Handler for [`TableEvent::Custom`]
    pub fn on_custom(
        mut self,
        handler: impl Fn(&CellContext<'_>, &str, &Value) + Send + Sync + 'static,
    ) -> Self {
        self.on_custom = Some(Arc::new(handler));
        self
    }

    /// Region placed after the filter bar's search trigger
    pub fn bar(mut self, slot: impl Fn(&[Value]) -> Node<TableEvent> + Send + Sync + 'static) -> Self {
        self.bar = Some(Arc::new(slot));
        self
    }

    /// Region placed between the filter bar and the table
    pub fn content(mut self, slot: impl Fn(&[Value]) -> Node<TableEvent> + Send + Sync + 'static) -> Self {
        self.content = Some(Arc::new(slot));
        self
    }

    /// Properties handed to the toolkit table as they are
    pub fn table_props(mut self, props: Params) -> Self {
        self.table_props = props;
        self
    }

    /// Apply loaded settings
    pub fn settings(mut self, settings: &TableSettings) -> Self {
        self.page_size = settings.page_size;
        self.page_sizes = settings.page_sizes.clone();
        self.no_page = settings.no_page;
        self.selectable = settings.selectable;
        self.reload_on_mount = settings.reload_on_mount;
        self.field_map = settings.field_map.clone();
        if let Some(locale) = settings.locale {
            self.locale = locale;
        }
        self
    }

    /// Validate the configuration and build the controller
    pub fn build(self) -> Result<TableController> {
        columns::validate(&self.columns)?;
        if self.page_size == 0 || self.page_sizes.contains(&0) {
            return Err(Error::Invalid {
                message: "page sizes must be positive".to_string(),
            });
        }
        let filter_bar = match self.filters {
            Some(filters) => {
                let mut bar = FilterBarController::new(filters)?;
                bar.set_locale(self.locale);
                Some(bar)
            }
            None => None,
        };
        Ok(TableController {
            leaves: columns::flatten(&self.columns),
            columns: self.columns,
            options: self.options,
            filter_bar,
            list_api: self.list_api,
            fetched: self.fetched,
            field_map: FieldMap::with_override(&self.field_map),
            no_page: self.no_page,
            selectable: self.selectable,
            reload_on_mount: self.reload_on_mount,
            page_sizes: self.page_sizes,
            locale: self.locale,
            on_custom: self.on_custom,
            bar: self.bar,
            content: self.content,
            table_props: self.table_props,
            rows: Vec::new(),
            loading: false,
            page: PageState::with_size(self.page_size),
            sort: SortState::None,
            selection: Selection::default(),
            params: Params::new(),
            generation: 0,
        })
    }
}

/// Table state and request/response mapping
pub struct TableController {
    columns: Vec<ColumnDescriptor>,
    leaves: Vec<LeafColumn>,
    options: Option<OptionsColumn>,
    filter_bar: Option<FilterBarController>,
    list_api: ListApi,
    fetched: Option<Fetched>,
    field_map: FieldMap,
    no_page: bool,
    selectable: bool,
    reload_on_mount: bool,
    page_sizes: Vec<u64>,
    locale: Locale,
    on_custom: Option<CustomHandler>,
    bar: Option<TableSlot>,
    content: Option<TableSlot>,
    table_props: Params,
    rows: Vec<Value>,
    loading: bool,
    page: PageState,
    sort: SortState,
    selection: Selection,
    params: Params,
    generation: u64,
}

impl TableController {
    /// Start building a table over a list API
    pub fn builder(
        list_api: impl Fn(Params) -> BoxFuture<'static, Result<Value>> + Send + Sync + 'static,
    ) -> TableBuilder {
        TableBuilder {
            list_api: Arc::new(list_api),
            columns: Vec::new(),
            options: None,
            filters: None,
            fetched: None,
            field_map: FieldMapOverride::default(),
            no_page: false,
            selectable: false,
            reload_on_mount: true,
            page_size: super::state::DEFAULT_PAGE_SIZE,
            page_sizes: DEFAULT_PAGE_SIZES.to_vec(),
            locale: Locale::default(),
            on_custom: None,
            bar: None,
            content: None,
            table_props: Params::new(),
        }
    }

    // ==================== Getters ====================

    /// Loaded rows
    pub fn rows(&self) -> &[Value] {
        &self.rows
    }

    /// Whether a fetch is in flight
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Pagination state
    pub fn page(&self) -> &PageState {
        &self.page
    }

    /// Sort state
    pub fn sort(&self) -> &SortState {
        &self.sort
    }

    /// Last filter params
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Selection over the loaded rows
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Selected rows
    pub fn selected_rows(&self) -> Vec<&Value> {
        self.selection
            .indices()
            .filter_map(|i| self.rows.get(i))
            .collect()
    }

    /// Header checkbox state
    pub fn all_selected(&self) -> bool {
        self.selection.all_selected(self.rows.len())
    }

    /// Resolved field map
    pub fn field_map(&self) -> &FieldMap {
        &self.field_map
    }

    /// Column descriptors
    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    /// Embedded filter bar
    pub fn filter_bar(&self) -> Option<&FilterBarController> {
        self.filter_bar.as_ref()
    }

    /// Embedded filter bar, mutable
    pub fn filter_bar_mut(&mut self) -> Option<&mut FilterBarController> {
        self.filter_bar.as_mut()
    }

    /// Whether the table pages its data
    pub fn is_paged(&self) -> bool {
        !self.no_page
    }

    /// Locale of the default texts
    pub fn locale(&self) -> Locale {
        self.locale
    }

    // ==================== Reload ====================

    /// Request params for the current state
    pub fn request_params(&self) -> Params {
        let mut params = self.params.clone();
        params.extend(self.sort.to_params(&self.field_map.request.sort));
        if !self.no_page {
            // Both keys are always present; a page field the server omitted goes out as null
            let names = &self.field_map.request.page;
            params.insert(names.current.clone(), self.page.current.map_or(Value::Null, Value::from));
            params.insert(names.size.clone(), self.page.size.map_or(Value::Null, Value::from));
        }
        params
    }

    /// First phase of a reload: mark loading, clear selection, build the request
    pub fn begin_reload(&mut self) -> ReloadRequest {
        self.loading = true;
        self.selection.clear();
        self.generation += 1;
        let params = self.request_params();
        tracing::debug!(?params, "Reloading table");
        ReloadRequest {
            params,
            fetch: self.list_api.clone(),
        }
    }

    /// Second phase of a reload: apply the response
    pub fn finish_reload(&mut self, response: Value) {
        if !self.no_page {
            let names = &self.field_map.response.page;
            self.page = PageState {
                current: value::as_count(response.get(&names.current)),
                size: value::as_count(response.get(&names.size)),
                total: value::as_count(response.get(&names.total)),
                page_count: value::as_count(response.get(&names.page_count)),
            };
        }
        self.rows = if let Some(fetched) = &self.fetched {
            fetched(response)
        } else if self.no_page {
            into_rows(response)
        } else {
            match response {
                Value::Object(mut map) => map
                    .remove(&self.field_map.response.list)
                    .map(into_rows)
                    .unwrap_or_default(),
                other => {
                    tracing::warn!(?other, "Paged response is not an object");
                    Vec::new()
                }
            }
        };
        self.loading = false;
        tracing::debug!(rows = self.rows.len(), page = ?self.page, "Table reloaded");
    }

    /// Fetch and apply. A fetch error is returned and leaves `loading` set.
    pub async fn reload(&mut self) -> Result<()> {
        let request = self.begin_reload();
        let response = request.fetch().await?;
        self.finish_reload(response);
        Ok(())
    }

    /// Take the filter bar params for the first load; false when mount loading is off
    pub fn prepare_mount(&mut self) -> bool {
        if !self.reload_on_mount {
            return false;
        }
        self.params = self
            .filter_bar
            .as_ref()
            .map(FilterBarController::get_params)
            .unwrap_or_default();
        true
    }

    /// Initial load
    pub async fn mount(&mut self) -> Result<()> {
        if self.prepare_mount() {
            self.reload().await?;
        }
        Ok(())
    }

    // ==================== State transitions ====================

    /// New filter params; back to page one
    pub fn apply_search(&mut self, params: Params) {
        self.params = params;
        self.page.current = Some(1);
    }

    /// Search with params and reload
    pub async fn on_search(&mut self, params: Params) -> Result<()> {
        self.apply_search(params);
        self.reload().await
    }

    /// Search with the embedded filter bar's params
    pub async fn search(&mut self) -> Result<()> {
        match self.handle(TableEvent::Filter(FilterEvent::Search)) {
            Effect::Reload => self.reload().await,
            _ => Ok(()),
        }
    }

    /// Move to a page and reload
    pub async fn on_page_change(&mut self, page: u64) -> Result<()> {
        self.page.current = Some(page.max(1));
        self.reload().await
    }

    /// Change the sort and reload
    pub async fn on_sort(&mut self, field: &str, order: Option<SortOrder>) -> Result<()> {
        self.sort = SortState::from_event(field, order);
        self.reload().await
    }

    /// Change the page size, back to page one, and reload
    pub async fn on_size_change(&mut self, size: u64) -> Result<()> {
        self.page.size = Some(size.max(1));
        self.page.current = Some(1);
        self.reload().await
    }

    /// Apply an event synchronously and return the async work it needs
    pub fn handle(&mut self, event: TableEvent) -> Effect {
        match event {
            TableEvent::SelectRow { row, selected } => {
                if row < self.rows.len() {
                    self.selection.toggle(row, selected);
                }
                Effect::None
            }
            TableEvent::SelectAll(selected) => {
                if selected {
                    self.selection.select_all(self.rows.len());
                } else {
                    self.selection.clear();
                }
                Effect::None
            }
            TableEvent::Sort { field, order } => {
                self.sort = SortState::from_event(&field, order);
                Effect::Reload
            }
            TableEvent::PageChange(page) => {
                self.page.current = Some(page.max(1));
                Effect::Reload
            }
            TableEvent::SizeChange(size) => {
                self.page.size = Some(size.max(1));
                self.page.current = Some(1);
                Effect::Reload
            }
            TableEvent::Switch { row, column, value } => self
                .switch_request(row, column, value)
                .map_or(Effect::None, Effect::Switch),
            TableEvent::Action { row, name } => {
                self.run_action(row, &name);
                Effect::None
            }
            TableEvent::Custom { row, name, payload } => {
                if let (Some(handler), Some(data)) = (&self.on_custom, self.rows.get(row)) {
                    handler(&CellContext { row: data, row_index: row }, &name, &payload);
                }
                Effect::None
            }
            TableEvent::Filter(event) => {
                let Some(bar) = self.filter_bar.as_mut() else {
                    return Effect::None;
                };
                match bar.handle(event) {
                    Some(params) => {
                        self.apply_search(params);
                        Effect::Reload
                    }
                    None => Effect::None,
                }
            }
        }
    }

    /// Apply an event and run its effect to completion
    pub async fn dispatch(&mut self, event: TableEvent) -> Result<()> {
        match self.handle(event) {
            Effect::None => Ok(()),
            Effect::Reload => self.reload().await,
            Effect::Switch(request) => {
                request.run().await?;
                self.commit_switch(&request);
                Ok(())
            }
        }
    }

    fn switch_request(&self, row: usize, column: usize, value: Value) -> Option<SwitchRequest> {
        let leaf = self.leaves.get(column)?;
        let CellKind::Switch(options) = &leaf.cell else {
            tracing::warn!(column = %leaf.key, "Switch event for a non-switch column");
            return None;
        };
        let row_snapshot = self.rows.get(row)?.clone();
        Some(SwitchRequest {
            row,
            key: options.value_key.clone().unwrap_or_else(|| leaf.key.clone()),
            value,
            row_snapshot,
            handler: options.on_switch.clone(),
            generation: self.generation,
        })
    }

    /// Write a switch value into its row once the side effect succeeded
    pub fn commit_switch(&mut self, request: &SwitchRequest) {
        if request.generation != self.generation {
            tracing::warn!(row = request.row, "Rows reloaded before switch completed, change dropped");
            return;
        }
        match self.rows.get_mut(request.row) {
            Some(Value::Object(map)) => {
                map.insert(request.key.clone(), request.value.clone());
            }
            _ => tracing::warn!(row = request.row, "Switch row is not an object"),
        }
    }

    fn run_action(&self, row: usize, name: &str) {
        let (Some(options), Some(data)) = (&self.options, self.rows.get(row)) else {
            return;
        };
        let cell = CellContext { row: data, row_index: row };
        match options.buttons.for_row(&cell).into_iter().find(|b| b.name == name) {
            Some(button) => (button.handler)(&cell),
            None => tracing::warn!(row, name, "Unknown action button"),
        }
    }

    // ==================== Rendering ====================

    fn render_cell(&self, leaf_index: usize, leaf: &LeafColumn, row_index: usize, row: &Value) -> Node<TableEvent> {
        match &leaf.cell {
            CellKind::Custom(render) => render(&CellContext { row, row_index }),
            CellKind::Switch(options) => {
                let key = options.value_key.as_deref().unwrap_or(&leaf.key);
                let on = row.get(key) == Some(&options.active_value);
                let next = if on {
                    options.inactive_value.clone()
                } else {
                    options.active_value.clone()
                };
                Node::Switch {
                    on,
                    active_text: options
                        .active_text
                        .clone()
                        .unwrap_or_else(|| i18n::t(self.locale, "switch-active")),
                    inactive_text: options
                        .inactive_text
                        .clone()
                        .unwrap_or_else(|| i18n::t(self.locale, "switch-inactive")),
                    on_change: TableEvent::Switch {
                        row: row_index,
                        column: leaf_index,
                        value: next,
                    },
                }
            }
            CellKind::Plain => Node::Text(value::display(row.get(&leaf.key))),
        }
    }

    fn render_options(&self, row_index: usize, row: &Value) -> Option<Node<TableEvent>> {
        let options = self.options.as_ref()?;
        let cell = CellContext { row, row_index };
        let buttons = options
            .buttons
            .for_row(&cell)
            .into_iter()
            .map(|button| Node::Button {
                label: button.name.clone(),
                kind: ButtonKind::Text,
                loading: false,
                on_click: TableEvent::Action {
                    row: row_index,
                    name: button.name,
                },
            })
            .collect();
        Some(Node::Group(buttons))
    }

    /// Cells of one row, one per leaf column
    pub fn render_row(&self, row_index: usize) -> Option<RowView> {
        let row = self.rows.get(row_index)?;
        let selection = self.selectable.then(|| {
            let checked = self.selection.contains(row_index);
            Node::Checkbox {
                checked,
                label: None,
                on_change: TableEvent::SelectRow {
                    row: row_index,
                    selected: !checked,
                },
            }
        });
        let cells = self
            .leaves
            .iter()
            .enumerate()
            .map(|(i, leaf)| self.render_cell(i, leaf, row_index, row))
            .collect();
        Some(RowView {
            selection,
            cells,
            options: self.render_options(row_index, row),
        })
    }

    /// Full render tree
    pub fn render(&self) -> TableView {
        let header = columns::header_rows(&self.columns)
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|cell| {
                        let sort = cell.sort_key.as_ref().map(|field| {
                            (
                                self.sort.order_of(field),
                                TableEvent::Sort {
                                    field: field.clone(),
                                    order: self.sort.cycle(field),
                                },
                            )
                        });
                        HeaderView { cell, sort }
                    })
                    .collect()
            })
            .collect();
        let selection_header = self.selectable.then(|| {
            let checked = self.all_selected();
            Node::Checkbox {
                checked,
                label: None,
                on_change: TableEvent::SelectAll(!checked),
            }
        });
        let options_header = self.options.as_ref().map(|options| OptionsHeader {
            label: options
                .label
                .clone()
                .unwrap_or_else(|| i18n::t(self.locale, "table-options")),
            width: options.width,
            align: options.align.unwrap_or_default(),
        });
        TableView {
            filter_bar: self.filter_bar.as_ref().map(|bar| bar.render(self.loading)),
            header,
            selection_header,
            options_header,
            columns: self
                .leaves
                .iter()
                .map(|leaf| ColumnLayout {
                    width: leaf.width,
                    align: leaf.align,
                })
                .collect(),
            rows: (0..self.rows.len())
                .filter_map(|i| self.render_row(i))
                .collect(),
            loading: self.loading,
            loading_text: i18n::t(self.locale, "table-loading"),
            empty_text: i18n::t(self.locale, "table-no-data"),
            pagination: (!self.no_page).then(|| PaginationView {
                page: self.page,
                page_sizes: self.page_sizes.clone(),
            }),
            bar: self.bar.as_ref().map(|slot| slot(&self.rows)),
            content: self.content.as_ref().map(|slot| slot(&self.rows)),
            table_props: self.table_props.clone(),
        }
    }
}

fn into_rows(value: Value) -> Vec<Value> {
    match value {
        Value::Array(rows) => rows,
        Value::Null => Vec::new(),
        other => {
            tracing::warn!(?other, "List field is not an array");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::descriptor::{ActionButton, SwitchOptions};
    use serde_json::json;

    type Requests = Arc<Mutex<Vec<Params>>>;

    fn fake_api(response: Value) -> (Requests, impl Fn(Params) -> BoxFuture<'static, Result<Value>> + Send + Sync + 'static) {
        let requests: Requests = Arc::new(Mutex::new(Vec::new()));
        let sink = requests.clone();
        let api = move |params: Params| -> BoxFuture<'static, Result<Value>> {
            if let Ok(mut seen) = sink.lock() {
                seen.push(params);
            }
            let response = response.clone();
            Box::pin(async move { Ok(response) })
        };
        (requests, api)
    }

    fn last_request(requests: &Requests) -> Params {
        requests
            .lock()
            .ok()
            .and_then(|r| r.last().cloned())
            .unwrap_or_default()
    }

    fn paged_response() -> Value {
        json!({
            "list": [{"id": 1, "status": 1}, {"id": 2, "status": 0}, {"id": 3, "status": 1}],
            "current": 2,
            "size": 3,
            "total": 9,
            "pageCount": 3,
        })
    }

    #[tokio::test]
    async fn test_paged_reload_sends_and_reads_page_fields() {
        let (requests, api) = fake_api(paged_response());
        let mut table = TableController::builder(api).build().expect("table");
        table.reload().await.expect("reload");

        let sent = last_request(&requests);
        assert_eq!(sent.get("current"), Some(&json!(1)));
        assert_eq!(sent.get("size"), Some(&json!(20)));

        assert_eq!(table.rows().len(), 3);
        assert_eq!(
            *table.page(),
            PageState {
                current: Some(2),
                size: Some(3),
                total: Some(9),
                page_count: Some(3),
            }
        );
        assert!(!table.is_loading());
    }

    #[tokio::test]
    async fn test_missing_page_fields_pass_through_as_none() {
        let (_, api) = fake_api(json!({"list": [], "total": 0}));
        let mut table = TableController::builder(api).build().expect("table");
        table.reload().await.expect("reload");
        assert_eq!(table.page().total, Some(0));
        assert_eq!(table.page().current, None);
        assert_eq!(table.page().size, None);

        let params = table.request_params();
        assert_eq!(params.get("current"), Some(&Value::Null));
        assert_eq!(params.get("size"), Some(&Value::Null));
    }

    #[tokio::test]
    async fn test_custom_field_map() {
        let (requests, api) = fake_api(json!({
            "records": [{"id": 1}],
            "pageNo": 1,
            "pageSize": 10,
            "totalCount": 1,
            "pages": 1,
        }));
        let over: FieldMapOverride = serde_json::from_value(json!({
            "request": {"page": {"current": "pageNo", "size": "pageSize"}},
            "response": {
                "list": "records",
                "page": {"current": "pageNo", "size": "pageSize", "total": "totalCount", "pageCount": "pages"}
            }
        }))
        .expect("override");
        let mut table = TableController::builder(api)
            .field_map(over)
            .page_size(10)
            .build()
            .expect("table");
        table.reload().await.expect("reload");

        let sent = last_request(&requests);
        assert_eq!(sent.get("pageNo"), Some(&json!(1)));
        assert_eq!(sent.get("pageSize"), Some(&json!(10)));
        assert_eq!(table.rows(), &[json!({"id": 1})]);
        assert_eq!(table.page().total, Some(1));
        assert_eq!(table.page().page_count, Some(1));
    }

    #[tokio::test]
    async fn test_unpaged_reload_leaves_page_untouched() {
        let (requests, api) = fake_api(json!([1, 2, 3]));
        let mut table = TableController::builder(api).no_page(true).build().expect("table");
        let before = *table.page();
        table.reload().await.expect("reload");
        assert_eq!(table.rows(), &[json!(1), json!(2), json!(3)]);
        assert_eq!(*table.page(), before);
        assert!(last_request(&requests).is_empty());
        assert!(table.render().pagination.is_none());
    }

    #[tokio::test]
    async fn test_fetched_replaces_rows() {
        let (_, api) = fake_api(json!({"data": {"items": ["a", "b"]}, "total": 2}));
        let mut table = TableController::builder(api)
            .fetched(|response| {
                response
                    .pointer("/data/items")
                    .and_then(Value::as_array)
                    .cloned()
                    .unwrap_or_default()
            })
            .build()
            .expect("table");
        table.reload().await.expect("reload");
        assert_eq!(table.rows(), &[json!("a"), json!("b")]);
        assert_eq!(table.page().total, Some(2));
    }

    #[tokio::test]
    async fn test_fetch_error_leaves_loading() {
        let api = |_params: Params| -> BoxFuture<'static, Result<Value>> {
            Box::pin(async { Err(Error::fetch("down")) })
        };
        let mut table = TableController::builder(api).build().expect("table");
        let err = table.reload().await.expect_err("fetch fails");
        assert!(matches!(err, Error::Fetch { .. }));
        assert!(table.is_loading());
    }

    #[tokio::test]
    async fn test_search_resets_page_and_merges_sort() {
        let (requests, api) = fake_api(paged_response());
        let mut table = TableController::builder(api).build().expect("table");
        table.on_page_change(3).await.expect("page");
        assert_eq!(last_request(&requests).get("current"), Some(&json!(3)));

        table
            .on_sort("id", Some(SortOrder::Descending))
            .await
            .expect("sort");
        let mut params = Params::new();
        params.insert("name".to_string(), json!("abc"));
        table.on_search(params).await.expect("search");

        let sent = last_request(&requests);
        assert_eq!(sent.get("current"), Some(&json!(1)));
        assert_eq!(sent.get("name"), Some(&json!("abc")));
        assert_eq!(sent.get("type"), Some(&json!("desc")));
        assert_eq!(sent.get("field"), Some(&json!("id")));

        table.on_sort("id", None).await.expect("clear sort");
        let sent = last_request(&requests);
        assert!(!sent.contains_key("type"));
        assert!(!sent.contains_key("field"));
    }

    #[tokio::test]
    async fn test_size_change_goes_to_first_page() {
        let (requests, api) = fake_api(paged_response());
        let mut table = TableController::builder(api).build().expect("table");
        table.dispatch(TableEvent::PageChange(0)).await.expect("page");
        assert_eq!(last_request(&requests).get("current"), Some(&json!(1)));
        table.on_size_change(30).await.expect("size");
        let sent = last_request(&requests);
        assert_eq!(sent.get("size"), Some(&json!(30)));
        assert_eq!(sent.get("current"), Some(&json!(1)));
    }

    #[tokio::test]
    async fn test_header_checkbox_tracks_loaded_rows() {
        let (_, api) = fake_api(paged_response());
        let mut table = TableController::builder(api)
            .selectable(true)
            .build()
            .expect("table");
        table.reload().await.expect("reload");

        table.handle(TableEvent::SelectAll(true));
        assert!(table.all_selected());
        assert_eq!(table.selected_rows().len(), 3);

        table.handle(TableEvent::SelectRow { row: 1, selected: false });
        assert!(!table.all_selected());
        let Some(Node::Checkbox { checked, on_change, .. }) = table.render().selection_header else {
            panic!("expected header checkbox");
        };
        assert!(!checked);
        assert_eq!(on_change, TableEvent::SelectAll(true));

        table.handle(TableEvent::SelectAll(false));
        assert!(table.selection().is_empty());
    }

    #[tokio::test]
    async fn test_reload_clears_selection() {
        let (_, first) = fake_api(paged_response());
        let mut table = TableController::builder(first).selectable(true).build().expect("table");
        table.reload().await.expect("reload");
        table.handle(TableEvent::SelectAll(true));
        assert!(table.all_selected());

        table.finish_reload(json!({"list": [{"id": 1}, {"id": 2}]}));
        assert!(!table.all_selected());

        table.begin_reload();
        assert!(table.selection().is_empty());
        table.finish_reload(json!({"list": [{"id": 1}, {"id": 2}]}));
        table.handle(TableEvent::SelectRow { row: 0, selected: true });
        table.handle(TableEvent::SelectRow { row: 1, selected: true });
        assert!(table.all_selected());
    }

    #[tokio::test]
    async fn test_mount_uses_filter_params() {
        let (requests, api) = fake_api(paged_response());
        let mut table = TableController::builder(api)
            .filters(vec![
                FilterDescriptor::new("name", "Name").value("abc"),
                FilterDescriptor::new("status", "Status").value(""),
            ])
            .build()
            .expect("table");
        table.mount().await.expect("mount");
        let sent = last_request(&requests);
        assert_eq!(sent.get("name"), Some(&json!("abc")));
        assert!(!sent.contains_key("status"));

        table.dispatch(TableEvent::Filter(FilterEvent::Input {
            index: 1,
            value: Some(json!("on")),
        }))
        .await
        .expect("input");
        table.dispatch(TableEvent::Filter(FilterEvent::Search)).await.expect("search");
        assert_eq!(last_request(&requests).get("status"), Some(&json!("on")));
    }

    #[tokio::test]
    async fn test_mount_disabled() {
        let (requests, api) = fake_api(paged_response());
        let mut table = TableController::builder(api)
            .reload_on_mount(false)
            .build()
            .expect("table");
        table.mount().await.expect("mount");
        assert!(requests.lock().map(|r| r.is_empty()).unwrap_or_default());
    }

    fn switch_table(
        api: impl Fn(Params) -> BoxFuture<'static, Result<Value>> + Send + Sync + 'static,
        fail: bool,
    ) -> TableController {
        TableController::builder(api)
            .columns(vec![
                ColumnDescriptor::new("id", "ID"),
                ColumnDescriptor::new("status", "Status").pre_def(SwitchOptions::default().on_switch(
                    move |_value, _row| {
                        Box::pin(async move {
                            if fail {
                                Err(Error::callback("rejected"))
                            } else {
                                Ok(())
                            }
                        })
                    },
                )),
            ])
            .locale(Locale::EnUS)
            .build()
            .expect("table")
    }

    #[tokio::test]
    async fn test_switch_commits_after_callback() {
        let (_, api) = fake_api(paged_response());
        let mut table = switch_table(api, false);
        table.reload().await.expect("reload");

        let row = table.render_row(1).expect("row");
        let Node::Switch { on, inactive_text, on_change, .. } = &row.cells[1] else {
            panic!("expected switch cell");
        };
        assert!(!on);
        assert_eq!(inactive_text, "Disabled");

        table.dispatch(on_change.clone()).await.expect("switch");
        assert_eq!(table.rows()[1]["status"], json!(1));
    }

    #[tokio::test]
    async fn test_switch_failure_does_not_commit() {
        let (_, api) = fake_api(paged_response());
        let mut table = switch_table(api, true);
        table.reload().await.expect("reload");
        let event = TableEvent::Switch {
            row: 0,
            column: 1,
            value: json!(0),
        };
        assert!(table.dispatch(event).await.is_err());
        assert_eq!(table.rows()[0]["status"], json!(1));
    }

    #[tokio::test]
    async fn test_switch_dropped_after_reload() {
        let (_, api) = fake_api(paged_response());
        let mut table = switch_table(api, false);
        table.reload().await.expect("reload");
        let Effect::Switch(request) = table.handle(TableEvent::Switch {
            row: 0,
            column: 1,
            value: json!(0),
        }) else {
            panic!("expected switch effect");
        };
        table.reload().await.expect("reload");
        table.commit_switch(&request);
        assert_eq!(table.rows()[0]["status"], json!(1));
    }

    #[tokio::test]
    async fn test_cells_and_options() {
        let (_, api) = fake_api(paged_response());
        let clicked = Arc::new(Mutex::new(Vec::new()));
        let sink = clicked.clone();
        let mut table = TableController::builder(api)
            .columns(vec![
                ColumnDescriptor::new("id", "ID").sortable(),
                ColumnDescriptor::new("", "Label").render(|cell| {
                    Node::text(format!("#{} row {}", cell.row["id"], cell.row_index))
                }),
            ])
            .options(OptionsColumn::per_row(move |cell| {
                let sink = sink.clone();
                let mut buttons = vec![ActionButton::new("Edit", move |cell| {
                    if let Ok(mut seen) = sink.lock() {
                        seen.push(cell.row_index);
                    }
                })];
                if cell.row["status"] == json!(0) {
                    buttons.push(ActionButton::new("Enable", |_| {}));
                }
                buttons
            }))
            .locale(Locale::EnUS)
            .build()
            .expect("table");
        table.reload().await.expect("reload");

        let view = table.render();
        assert_eq!(view.options_header.as_ref().map(|h| h.label.as_str()), Some("Actions"));
        assert_eq!(view.rows[0].cells[0].text_content(), "1");
        assert_eq!(view.rows[2].cells[1].text_content(), "#3 row 2");
        assert_eq!(
            view.rows[1].options.as_ref().map(Node::text_content).as_deref(),
            Some("Edit Enable")
        );
        assert_eq!(view.rows[0].options.as_ref().map(Node::text_content).as_deref(), Some("Edit"));
        assert!(view.rows[0].selection.is_none());

        let (order, event) = view.header[0][0].sort.clone().expect("sortable header");
        assert_eq!(order, None);
        assert_eq!(
            event,
            TableEvent::Sort { field: "id".to_string(), order: Some(SortOrder::Ascending) }
        );

        table.handle(TableEvent::Action { row: 2, name: "Edit".to_string() });
        assert_eq!(clicked.lock().map(|c| c.clone()).unwrap_or_default(), vec![2]);
    }

    #[tokio::test]
    async fn test_slot_regions_render_against_rows() {
        let (_, api) = fake_api(paged_response());
        let mut props = Params::new();
        props.insert("stripe".to_string(), json!(false));
        let mut table = TableController::builder(api)
            .columns(vec![ColumnDescriptor::new("id", "ID")])
            .filters(vec![FilterDescriptor::new("name", "Name")])
            .bar(|rows| Node::Button {
                label: format!("Export {}", rows.len()),
                kind: ButtonKind::Default,
                loading: false,
                on_click: TableEvent::PageChange(1),
            })
            .content(|rows| Node::text(format!("{} loaded", rows.len())))
            .table_props(props)
            .build()
            .expect("table");

        let view = table.render();
        assert_eq!(view.content.as_ref().map(Node::text_content).as_deref(), Some("0 loaded"));

        table.reload().await.expect("reload");
        let view = table.render();
        assert_eq!(view.bar.as_ref().map(Node::text_content).as_deref(), Some("Export 3"));
        assert_eq!(view.content.as_ref().map(Node::text_content).as_deref(), Some("3 loaded"));
        assert_eq!(view.table_props.get("stripe"), Some(&json!(false)));
        assert!(view.filter_bar.is_some());
    }

    #[test]
    fn test_build_rejects_zero_page_size() {
        let (_, api) = fake_api(json!(null));
        assert!(TableController::builder(api).page_size(0).build().is_err());
    }
}
