//! Column layout
//!
//! Resolves the column descriptor tree into leaf columns (one per cell) and
//! grouped header rows.

use crate::descriptor::{Align, CellRender, ColumnDescriptor, ColumnWidth, SwitchOptions};
use crate::error::{Error, Result};

/// How a leaf column produces its cells
#[derive(Clone)]
pub enum CellKind {
    /// Display string of `row[key]`
    Plain,
    /// Caller renderer
    Custom(CellRender),
    /// Built-in switch cell
    Switch(SwitchOptions),
}

/// A column that owns cells
#[derive(Clone)]
pub struct LeafColumn {
    pub key: String,
    pub label: String,
    pub width: ColumnWidth,
    pub align: Align,
    pub sortable: bool,
    pub cell: CellKind,
}

impl LeafColumn {
    fn from_descriptor(column: &ColumnDescriptor) -> Self {
        let cell = if let Some(render) = &column.render {
            CellKind::Custom(render.clone())
        } else if let Some(options) = column.pre_def.as_ref().and_then(|p| p.switch_options()) {
            CellKind::Switch(options)
        } else {
            if let Some(pre_def) = &column.pre_def {
                tracing::debug!(column = %column.key, ?pre_def, "Unknown pre-defined cell, using plain cell");
            }
            CellKind::Plain
        };
        Self {
            key: column.key.clone(),
            label: column.label.clone(),
            width: column.width,
            align: column.align.unwrap_or_default(),
            sortable: column.sortable,
            cell,
        }
    }
}

/// One header cell of the grouped header
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderCell {
    pub label: String,
    /// Sort field, for sortable leaf columns
    pub sort_key: Option<String>,
    pub align: Align,
    pub width: ColumnWidth,
    pub col_span: usize,
    pub row_span: usize,
    /// Index into the leaf columns, for leaf headers
    pub leaf: Option<usize>,
}

/// Leaf columns in display order
pub fn flatten(columns: &[ColumnDescriptor]) -> Vec<LeafColumn> {
    let mut leaves = Vec::new();
    collect_leaves(columns, &mut leaves);
    leaves
}

fn collect_leaves(columns: &[ColumnDescriptor], out: &mut Vec<LeafColumn>) {
    for column in columns {
        if column.is_group() {
            collect_leaves(&column.children, out);
        } else {
            out.push(LeafColumn::from_descriptor(column));
        }
    }
}

fn depth(columns: &[ColumnDescriptor]) -> usize {
    columns
        .iter()
        .map(|c| if c.is_group() { 1 + depth(&c.children) } else { 1 })
        .max()
        .unwrap_or(0)
}

fn leaf_count(column: &ColumnDescriptor) -> usize {
    if column.is_group() {
        column.children.iter().map(leaf_count).sum()
    } else {
        1
    }
}

/// Header rows for a column tree; leaf headers span down to the last row
pub fn header_rows(columns: &[ColumnDescriptor]) -> Vec<Vec<HeaderCell>> {
    let total = depth(columns);
    let mut rows = vec![Vec::new(); total];
    let mut next_leaf = 0;
    layout(columns, 0, total, &mut next_leaf, &mut rows);
    rows
}

fn layout(
    columns: &[ColumnDescriptor],
    level: usize,
    total: usize,
    next_leaf: &mut usize,
    rows: &mut [Vec<HeaderCell>],
) {
    for column in columns {
        if column.is_group() {
            rows[level].push(HeaderCell {
                label: column.label.clone(),
                sort_key: None,
                align: column.align.unwrap_or_default(),
                width: column.width,
                col_span: leaf_count(column),
                row_span: 1,
                leaf: None,
            });
            layout(&column.children, level + 1, total, next_leaf, rows);
        } else {
            rows[level].push(HeaderCell {
                label: column.label.clone(),
                sort_key: column.sortable.then(|| column.key.clone()),
                align: column.align.unwrap_or_default(),
                width: column.width,
                col_span: 1,
                row_span: total - level,
                leaf: Some(*next_leaf),
            });
            *next_leaf += 1;
        }
    }
}

/// Reject column trees that cannot produce cells
pub fn validate(columns: &[ColumnDescriptor]) -> Result<()> {
    for column in columns {
        if column.is_group() {
            validate(&column.children)?;
        } else if column.key.is_empty() && column.render.is_none() {
            return Err(Error::Invalid {
                message: format!("column '{}' needs a key or a render function", column.label),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Node;

    fn tree() -> Vec<ColumnDescriptor> {
        vec![
            ColumnDescriptor::new("id", "ID").sortable(),
            ColumnDescriptor::group(
                "Address",
                vec![
                    ColumnDescriptor::new("city", "City"),
                    ColumnDescriptor::group(
                        "Street",
                        vec![
                            ColumnDescriptor::new("name", "Name"),
                            ColumnDescriptor::new("no", "No."),
                        ],
                    ),
                ],
            ),
            ColumnDescriptor::new("status", "Status").pre_def("switch"),
        ]
    }

    #[test]
    fn test_flatten_leaves() {
        let leaves = flatten(&tree());
        let keys: Vec<_> = leaves.iter().map(|l| l.key.as_str()).collect();
        assert_eq!(keys, vec!["id", "city", "name", "no", "status"]);
        assert!(matches!(leaves[4].cell, CellKind::Switch(_)));
        assert!(matches!(leaves[0].cell, CellKind::Plain));
        assert_eq!(leaves[0].align, Align::Center);
    }

    #[test]
    fn test_header_rows_spans() {
        let rows = header_rows(&tree());
        assert_eq!(rows.len(), 3);

        let top: Vec<_> = rows[0]
            .iter()
            .map(|c| (c.label.as_str(), c.col_span, c.row_span))
            .collect();
        assert_eq!(top, vec![("ID", 1, 3), ("Address", 3, 1), ("Status", 1, 3)]);
        assert_eq!(rows[0][0].sort_key.as_deref(), Some("id"));
        assert_eq!(rows[0][2].leaf, Some(4));

        let middle: Vec<_> = rows[1]
            .iter()
            .map(|c| (c.label.as_str(), c.col_span, c.row_span))
            .collect();
        assert_eq!(middle, vec![("City", 1, 2), ("Street", 2, 1)]);

        let bottom: Vec<_> = rows[2].iter().map(|c| c.leaf).collect();
        assert_eq!(bottom, vec![Some(2), Some(3)]);
    }

    #[test]
    fn test_validate_requires_key_or_render() {
        assert!(validate(&tree()).is_ok());
        let bad = vec![ColumnDescriptor::group("G", vec![ColumnDescriptor::new("", "Nothing")])];
        assert!(validate(&bad).is_err());
        let custom = vec![ColumnDescriptor::new("", "Custom").render(|_| Node::text("x"))];
        assert!(validate(&custom).is_ok());
    }
}
