//! Column Definition
//!
//! Defines table columns with their properties and cell renderers.

use std::fmt;
use std::sync::Arc;

use futures::future::BoxFuture;
use serde_json::Value;

use crate::error::Result;
use crate::render::Node;
use crate::table::{CellContext, TableEvent};

/// Custom cell renderer
pub type CellRender = Arc<dyn Fn(&CellContext<'_>) -> Node<TableEvent> + Send + Sync>;

/// Called with `(new_value, row)` before a switch cell commits its value
pub type SwitchHandler = Arc<dyn Fn(Value, Value) -> BoxFuture<'static, Result<()>> + Send + Sync>;

/// Column width specification
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColumnWidth {
    /// Fixed width in pixels
    Fixed(f32),
    /// Flexible width with optional min/max
    Flex { min: Option<f32>, max: Option<f32> },
    /// Percentage of available space
    Percent(f32),
}

impl Default for ColumnWidth {
    fn default() -> Self {
        ColumnWidth::Flex { min: None, max: None }
    }
}

/// Horizontal alignment of a column
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Align {
    Left,
    #[default]
    Center,
    Right,
}

/// Options of the built-in switch cell
#[derive(Clone)]
pub struct SwitchOptions {
    /// Row field bound to the switch; defaults to the column key
    pub value_key: Option<String>,
    pub active_value: Value,
    pub inactive_value: Value,
    /// Defaults to the localized "Enabled"
    pub active_text: Option<String>,
    /// Defaults to the localized "Disabled"
    pub inactive_text: Option<String>,
    pub on_switch: Option<SwitchHandler>,
}

impl Default for SwitchOptions {
    fn default() -> Self {
        Self {
            value_key: None,
            active_value: Value::from(1),
            inactive_value: Value::from(0),
            active_text: None,
            inactive_text: None,
            on_switch: None,
        }
    }
}

impl SwitchOptions {
    /// Bind to a different row field than the column key
    pub fn value_key(mut self, key: impl Into<String>) -> Self {
        self.value_key = Some(key.into());
        self
    }

    /// Values stored for the two states
    pub fn values(mut self, active: impl Into<Value>, inactive: impl Into<Value>) -> Self {
        self.active_value = active.into();
        self.inactive_value = inactive.into();
        self
    }

    /// Labels for the two states
    pub fn texts(mut self, active: impl Into<String>, inactive: impl Into<String>) -> Self {
        self.active_text = Some(active.into());
        self.inactive_text = Some(inactive.into());
        self
    }

    /// Side effect run before the new value is committed
    pub fn on_switch(
        mut self,
        handler: impl Fn(Value, Value) -> BoxFuture<'static, Result<()>> + Send + Sync + 'static,
    ) -> Self {
        self.on_switch = Some(Arc::new(handler));
        self
    }
}

impl fmt::Debug for SwitchOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SwitchOptions")
            .field("value_key", &self.value_key)
            .field("active_value", &self.active_value)
            .field("inactive_value", &self.inactive_value)
            .field("on_switch", &self.on_switch.is_some())
            .finish_non_exhaustive()
    }
}

/// Pre-defined cell type selection
#[derive(Clone, Debug)]
pub enum PreDef {
    /// Built-in cell by name with default options
    Named(String),
    /// Switch cell with options
    Switch(SwitchOptions),
}

impl PreDef {
    /// Resolve to switch options when this names the switch cell
    pub fn switch_options(&self) -> Option<SwitchOptions> {
        match self {
            PreDef::Named(name) if name == "switch" => Some(SwitchOptions::default()),
            PreDef::Named(_) => None,
            PreDef::Switch(options) => Some(options.clone()),
        }
    }
}

impl From<&str> for PreDef {
    fn from(name: &str) -> Self {
        PreDef::Named(name.to_string())
    }
}

impl From<SwitchOptions> for PreDef {
    fn from(options: SwitchOptions) -> Self {
        PreDef::Switch(options)
    }
}

/// Column definition for the data table
#[derive(Clone, Default)]
pub struct ColumnDescriptor {
    /// Row field shown by the column; empty for group headers
    pub key: String,
    /// Column header label
    pub label: String,
    pub width: ColumnWidth,
    /// Defaults to center
    pub align: Option<Align>,
    /// Whether server-side sort is requested for this column
    pub sortable: bool,
    pub render: Option<CellRender>,
    pub pre_def: Option<PreDef>,
    /// Nested columns under a grouped header
    pub children: Vec<ColumnDescriptor>,
}

impl ColumnDescriptor {
    /// Create a new column
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            ..Default::default()
        }
    }

    /// Create a group header over child columns
    pub fn group(label: impl Into<String>, children: Vec<ColumnDescriptor>) -> Self {
        Self {
            label: label.into(),
            children,
            ..Default::default()
        }
    }

    /// Set fixed width
    pub fn fixed_width(mut self, width: f32) -> Self {
        self.width = ColumnWidth::Fixed(width);
        self
    }

    /// Set flexible width with optional constraints
    pub fn flex_width(mut self, min: Option<f32>, max: Option<f32>) -> Self {
        self.width = ColumnWidth::Flex { min, max };
        self
    }

    /// Set percentage width
    pub fn percent_width(mut self, percent: f32) -> Self {
        self.width = ColumnWidth::Percent(percent);
        self
    }

    /// Set alignment
    pub fn align(mut self, align: Align) -> Self {
        self.align = Some(align);
        self
    }

    /// Make the column sortable
    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    /// Custom cell renderer
    pub fn render(
        mut self,
        render: impl Fn(&CellContext<'_>) -> Node<TableEvent> + Send + Sync + 'static,
    ) -> Self {
        self.render = Some(Arc::new(render));
        self
    }

    /// Use a pre-defined cell type
    pub fn pre_def(mut self, pre_def: impl Into<PreDef>) -> Self {
        self.pre_def = Some(pre_def.into());
        self
    }

    /// Whether this column is a group header
    pub fn is_group(&self) -> bool {
        !self.children.is_empty()
    }
}

impl fmt::Debug for ColumnDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnDescriptor")
            .field("key", &self.key)
            .field("label", &self.label)
            .field("width", &self.width)
            .field("sortable", &self.sortable)
            .field("render", &self.render.is_some())
            .field("pre_def", &self.pre_def)
            .field("children", &self.children)
            .finish_non_exhaustive()
    }
}

/// One button of the options column
#[derive(Clone)]
pub struct ActionButton {
    pub name: String,
    pub handler: Arc<dyn Fn(&CellContext<'_>) + Send + Sync>,
}

impl ActionButton {
    pub fn new(name: impl Into<String>, handler: impl Fn(&CellContext<'_>) + Send + Sync + 'static) -> Self {
        Self {
            name: name.into(),
            handler: Arc::new(handler),
        }
    }
}

impl fmt::Debug for ActionButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ActionButton").field(&self.name).finish()
    }
}

/// Buttons of the options column
#[derive(Clone)]
pub enum Buttons {
    /// Same buttons on every row
    Static(Vec<ActionButton>),
    /// Buttons computed per row
    PerRow(Arc<dyn Fn(&CellContext<'_>) -> Vec<ActionButton> + Send + Sync>),
}

impl Buttons {
    /// Buttons for a row
    pub fn for_row(&self, cell: &CellContext<'_>) -> Vec<ActionButton> {
        match self {
            Buttons::Static(buttons) => buttons.clone(),
            Buttons::PerRow(compute) => compute(cell),
        }
    }
}

/// Trailing column with one action button per entry
#[derive(Clone)]
pub struct OptionsColumn {
    /// Defaults to the localized "Actions"
    pub label: Option<String>,
    pub width: ColumnWidth,
    pub align: Option<Align>,
    pub buttons: Buttons,
}

impl OptionsColumn {
    /// Options column with the same buttons on every row
    pub fn new(buttons: Vec<ActionButton>) -> Self {
        Self {
            label: None,
            width: ColumnWidth::default(),
            align: None,
            buttons: Buttons::Static(buttons),
        }
    }

    /// Options column with per-row buttons
    pub fn per_row(
        compute: impl Fn(&CellContext<'_>) -> Vec<ActionButton> + Send + Sync + 'static,
    ) -> Self {
        Self {
            label: None,
            width: ColumnWidth::default(),
            align: None,
            buttons: Buttons::PerRow(Arc::new(compute)),
        }
    }

    /// Header label
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set fixed width
    pub fn fixed_width(mut self, width: f32) -> Self {
        self.width = ColumnWidth::Fixed(width);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pre_def_resolution() {
        assert!(PreDef::from("switch").switch_options().is_some());
        assert!(PreDef::from("rating").switch_options().is_none());
        let opts = PreDef::from(SwitchOptions::default().values("on", "off"))
            .switch_options()
            .expect("switch options");
        assert_eq!(opts.active_value, Value::from("on"));
    }

    #[test]
    fn test_switch_defaults() {
        let opts = SwitchOptions::default();
        assert_eq!(opts.active_value, Value::from(1));
        assert_eq!(opts.inactive_value, Value::from(0));
        assert!(opts.value_key.is_none());
    }
}
