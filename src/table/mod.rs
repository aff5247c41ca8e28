//! Table
//!
//! Controller for a paginated, sortable, selectable data table fed by an
//! injected list API.

pub mod columns;
pub mod controller;
pub mod state;

use serde_json::Value;

use crate::filter_bar::FilterEvent;

pub use columns::{CellKind, HeaderCell, LeafColumn};
pub use controller::{
    ColumnLayout, CustomHandler, Effect, Fetched, HeaderView, ListApi, OptionsHeader,
    PaginationView, ReloadRequest, RowView, SwitchRequest, TableBuilder, TableController,
    TableView,
};
pub use state::{PageState, Selection, SortOrder, SortState};

/// Scope passed to cell renderers and action buttons
#[derive(Debug, Clone, Copy)]
pub struct CellContext<'a> {
    pub row: &'a Value,
    pub row_index: usize,
}

/// Events emitted by the table's controls
#[derive(Debug, Clone, PartialEq)]
pub enum TableEvent {
    /// Row checkbox toggled
    SelectRow { row: usize, selected: bool },
    /// Header checkbox toggled
    SelectAll(bool),
    /// Sort control changed
    Sort {
        field: String,
        order: Option<SortOrder>,
    },
    /// Pagination moved to a page
    PageChange(u64),
    /// Pagination page size changed
    SizeChange(u64),
    /// Switch cell toggled to `value`
    Switch {
        row: usize,
        column: usize,
        value: Value,
    },
    /// Options column button clicked
    Action { row: usize, name: String },
    /// Event from a custom cell renderer
    Custom {
        row: usize,
        name: String,
        payload: Value,
    },
    /// Event from the embedded filter bar
    Filter(FilterEvent),
}
