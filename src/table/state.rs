//! Table state: pagination, sort and selection

use std::collections::BTreeSet;

use serde_json::Value;

use crate::field_map::SortFields;
use crate::value::Params;

/// Default rows per page
pub const DEFAULT_PAGE_SIZE: u64 = 20;

/// Default page size options offered by the pagination control
pub const DEFAULT_PAGE_SIZES: [u64; 3] = [10, 20, 30];

/// Pagination state.
///
/// `current` and `size` are sent upstream; all four fields are overwritten
/// from the server response and become `None` when the server omits them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageState {
    pub current: Option<u64>,
    pub size: Option<u64>,
    pub total: Option<u64>,
    pub page_count: Option<u64>,
}

impl Default for PageState {
    fn default() -> Self {
        Self::with_size(DEFAULT_PAGE_SIZE)
    }
}

impl PageState {
    /// First page with the given size
    pub fn with_size(size: u64) -> Self {
        Self {
            current: Some(1),
            size: Some(size.max(1)),
            total: Some(1),
            page_count: Some(1),
        }
    }

    /// Whether a previous page exists
    pub fn has_prev(&self) -> bool {
        self.current.is_some_and(|c| c > 1)
    }

    /// Whether a next page exists
    pub fn has_next(&self) -> bool {
        match (self.current, self.page_count) {
            (Some(current), Some(count)) => current < count,
            _ => false,
        }
    }
}

/// Order requested by the table's sort control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    /// Request value
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Ascending => "asc",
            SortOrder::Descending => "desc",
        }
    }
}

/// Current server-side sort
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SortState {
    /// No sort
    #[default]
    None,
    /// Sorted by a field
    By { field: String, order: SortOrder },
}

impl SortState {
    /// Sort state for a sort-change event
    pub fn from_event(field: &str, order: Option<SortOrder>) -> Self {
        match order {
            Some(order) => SortState::By {
                field: field.to_string(),
                order,
            },
            None => SortState::None,
        }
    }

    /// Order applied to a field, if it is the sorted one
    pub fn order_of(&self, field: &str) -> Option<SortOrder> {
        match self {
            SortState::By { field: f, order } if f == field => Some(*order),
            _ => None,
        }
    }

    /// Next state when the header of `field` is clicked: asc, desc, none
    pub fn cycle(&self, field: &str) -> Option<SortOrder> {
        match self.order_of(field) {
            None => Some(SortOrder::Ascending),
            Some(SortOrder::Ascending) => Some(SortOrder::Descending),
            Some(SortOrder::Descending) => None,
        }
    }

    /// Request parameters for this sort
    pub fn to_params(&self, names: &SortFields) -> Params {
        let mut params = Params::new();
        if let SortState::By { field, order } = self {
            params.insert(names.direction.clone(), Value::from(order.as_str()));
            params.insert(names.field.clone(), Value::from(field.as_str()));
        }
        params
    }
}

/// Selected rows, by their index in the currently loaded rows
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    rows: BTreeSet<usize>,
}

impl Selection {
    /// Add or remove a row
    pub fn toggle(&mut self, row: usize, selected: bool) {
        if selected {
            self.rows.insert(row);
        } else {
            self.rows.remove(&row);
        }
    }

    /// Select rows `0..count`
    pub fn select_all(&mut self, count: usize) {
        self.rows = (0..count).collect();
    }

    /// Clear the selection
    pub fn clear(&mut self) {
        self.rows.clear();
    }

    /// Whether a row is selected
    pub fn contains(&self, row: usize) -> bool {
        self.rows.contains(&row)
    }

    /// Number of selected rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Header checkbox state: every loaded row is selected
    pub fn all_selected(&self, row_count: usize) -> bool {
        self.rows.len() == row_count
    }

    /// Selected indices in ascending order
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.rows.iter().copied()
    }
}
