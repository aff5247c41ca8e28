//! Descriptors
//!
//! Plain configuration describing table columns, filter fields and form
//! fields. Callers build them; the controllers interpret them.

pub mod column;
pub mod field;
pub mod filter;
pub mod flag;
pub mod widget;

pub use column::{
    ActionButton, Align, Buttons, CellRender, ColumnDescriptor, ColumnWidth, OptionsColumn, PreDef,
    SwitchHandler, SwitchOptions,
};
pub use field::{FieldDescriptor, FieldValidator, FormRender, Rule, ValidationCallback};
pub use filter::{CustomParams, FilterDescriptor};
pub use flag::Flag;
pub use widget::{Choice, DataType, Widget};
