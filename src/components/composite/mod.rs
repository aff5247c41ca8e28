//! Composite Components
//!
//! Views combining primitives with the headless controllers.

pub mod data_table;
pub mod filter_bar;
pub mod form_dialog;
pub mod modal;
pub mod node;

pub use data_table::{DataTable, Pagination};
pub use filter_bar::{FilterBar, SearchEvent};
pub use form_dialog::{FormDialog, SubmittedEvent};
pub use modal::Modal;
