//! Demo Page
//!
//! A device list backed by an in-memory store: filter bar, grouped header,
//! switch cells, and an edit dialog opened from the options column.

use std::cmp::Ordering;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures::channel::mpsc;
use futures::{FutureExt, StreamExt};
use gpui::{
    AppContext, Context, Entity, IntoElement, ParentElement, Render, Styled, Subscription, Window, div,
};
use gpui_component::{h_flex, v_flex};
use serde_json::{Value, json};

use crate::components::composite::data_table::DataTable;
use crate::components::composite::form_dialog::{FormDialog, SubmittedEvent};
use crate::components::primitives::Button;
use crate::descriptor::{
    ActionButton, Choice, ColumnDescriptor, FieldDescriptor, FilterDescriptor, OptionsColumn,
    Rule, SwitchOptions, Widget,
};
use crate::dialog::DialogController;
use crate::error::{Error, Result};
use crate::render::{ButtonKind, Node};
use crate::settings::TableSettings;
use crate::table::TableController;
use crate::theme::TableColors;
use crate::value::{self, FormData, Params};

type Store = Arc<Mutex<Vec<Value>>>;

/// Row action forwarded from the options column
#[derive(Debug, Clone)]
pub enum RowAction {
    Edit(Value),
    Delete(Value),
}

/// Controllers and the action channel of a demo page
pub struct DemoParts {
    table: TableController,
    dialog: DialogController,
    store: Store,
    actions: mpsc::UnboundedReceiver<RowAction>,
}

fn seed() -> Vec<Value> {
    let names = ["Gateway", "Sensor", "Inverter", "Meter", "Relay", "Camera"];
    (0..42)
        .map(|i| {
            let created = chrono::Local::now() - chrono::Duration::hours(i * 7);
            json!({
                "id": uuid::Uuid::now_v7().to_string(),
                "name": format!("{}-{:02}", names[i as usize % names.len()], i),
                "status": i % 3 != 0,
                "enabled": if i % 4 == 0 { 0 } else { 1 },
                "region": if i % 2 == 0 { "north" } else { "south" },
                "firmware": format!("1.{}.{}", i % 5, i % 9),
                "created": created.format("%Y-%m-%d %H:%M").to_string(),
            })
        })
        .collect()
}

fn compare(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (value::to_number(a), value::to_number(b)) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        _ => value::display(a).cmp(&value::display(b)),
    }
}

/// Filter, sort and page `rows` the way a list endpoint would
pub fn query(rows: &[Value], params: &Params) -> Value {
    let name = params.get("name").and_then(Value::as_str).map(str::to_lowercase);
    let status = params.get("status").filter(|v| !v.is_null());
    let region = params.get("region").and_then(Value::as_str);

    let mut matched: Vec<Value> = rows
        .iter()
        .filter(|row| {
            name.as_ref().is_none_or(|name| {
                value::display(row.get("name")).to_lowercase().contains(name.as_str())
            })
        })
        .filter(|row| status.is_none_or(|status| row.get("status") == Some(status)))
        .filter(|row| region.is_none_or(|region| row.get("region").and_then(Value::as_str) == Some(region)))
        .cloned()
        .collect();

    if let Some(field) = params.get("field").and_then(Value::as_str) {
        let descending = params.get("type").and_then(Value::as_str) == Some("desc");
        matched.sort_by(|a, b| {
            let ordering = compare(a.get(field), b.get(field));
            if descending { ordering.reverse() } else { ordering }
        });
    }

    let total = matched.len() as u64;
    let current = value::as_count(params.get("current"));
    let size = value::as_count(params.get("size")).filter(|&s| s > 0);
    match (current, size) {
        (Some(current), Some(size)) => {
            let start = ((current.max(1) - 1) * size) as usize;
            let list: Vec<Value> = matched.into_iter().skip(start).take(size as usize).collect();
            json!({
                "list": list,
                "total": total,
                "pageCount": total.div_ceil(size),
            })
        }
        _ => json!({ "list": matched, "total": total }),
    }
}

fn lock(store: &Store) -> Result<std::sync::MutexGuard<'_, Vec<Value>>> {
    store.lock().map_err(|_| Error::callback("device store poisoned"))
}

fn save(store: &Store, form: &FormData) -> Result<()> {
    let mut record = form.to_value();
    let mut rows = lock(store)?;
    let id = record.get("id").and_then(Value::as_str).map(str::to_string);
    match id.and_then(|id| rows.iter().position(|r| r.get("id").and_then(Value::as_str) == Some(&id))) {
        Some(index) => rows[index] = record,
        None => {
            if let Value::Object(map) = &mut record {
                map.insert("id".into(), Value::String(uuid::Uuid::new_v4().to_string()));
                map.insert(
                    "created".into(),
                    Value::String(chrono::Local::now().format("%Y-%m-%d %H:%M").to_string()),
                );
            }
            rows.insert(0, record);
        }
    }
    Ok(())
}

fn columns(store: &Store) -> Vec<ColumnDescriptor> {
    let switch_store = store.clone();
    vec![
        ColumnDescriptor::group(
            "Device",
            vec![
                ColumnDescriptor::new("name", "Name").flex_width(Some(160.0), None).sortable(),
                ColumnDescriptor::new("firmware", "Firmware").fixed_width(110.0),
            ],
        ),
        ColumnDescriptor::new("region", "Region").fixed_width(100.0),
        ColumnDescriptor::new("status", "Status")
            .fixed_width(100.0)
            .render(|cell| {
                let online = cell.row.get("status") == Some(&Value::Bool(true));
                Node::text(if online { "Online" } else { "Offline" })
            }),
        ColumnDescriptor::new("enabled", "Enabled").fixed_width(120.0).pre_def(
            SwitchOptions::default().on_switch(move |next, row| {
                let store = switch_store.clone();
                async move {
                    smol::Timer::after(Duration::from_millis(200)).await;
                    let mut rows = lock(&store)?;
                    if let Some(stored) = rows.iter_mut().find(|r| r.get("id") == row.get("id")) {
                        stored["enabled"] = next;
                    }
                    Ok(())
                }
                .boxed()
            }),
        ),
        ColumnDescriptor::new("created", "Created").fixed_width(160.0).sortable(),
    ]
}

fn filters() -> Vec<FilterDescriptor> {
    vec![
        FilterDescriptor::new("name", "Name").placeholder("Device name"),
        FilterDescriptor::new("status", "Status")
            .widget(Widget::Select)
            .options(vec![Choice::new(true, "Online"), Choice::new(false, "Offline")]),
        FilterDescriptor::custom("South only", |value| {
            if value == Some(&Value::Bool(true)) {
                json!({ "region": "south" })
            } else {
                json!({})
            }
        })
        .widget(Widget::Switch),
    ]
}

fn fields() -> Vec<FieldDescriptor> {
    vec![
        FieldDescriptor::new("name", "Name").required(true).placeholder("Device name"),
        FieldDescriptor::new("region", "Region")
            .required(true)
            .widget(Widget::RadioGroup)
            .options(vec![Choice::new("north", "North"), Choice::new("south", "South")]),
        FieldDescriptor::new("status", "Status")
            .widget(Widget::Select)
            .options(vec![Choice::new(true, "Online"), Choice::new(false, "Offline")]),
        FieldDescriptor::new("firmware", "Firmware").rule(
            Rule::validator(|value, _form, callback| {
                let text = value::display(value);
                if text.is_empty() || text.split('.').all(|part| part.parse::<u32>().is_ok()) {
                    callback.ok();
                } else {
                    callback.fail("Use dotted numbers, e.g. 1.2.3");
                }
            }),
        ),
    ]
}

impl DemoParts {
    /// Build the controllers over a seeded store
    pub fn new(settings: &TableSettings) -> Result<Self> {
        let store: Store = Arc::new(Mutex::new(seed()));
        let (sender, actions) = mpsc::unbounded();

        let edit = sender.clone();
        let delete = sender;
        let options = OptionsColumn::new(vec![
            ActionButton::new("Edit", move |cell| {
                let _ = edit.unbounded_send(RowAction::Edit(cell.row.clone()));
            }),
            ActionButton::new("Delete", move |cell| {
                let _ = delete.unbounded_send(RowAction::Delete(cell.row.clone()));
            }),
        ])
        .fixed_width(160.0);

        let api_store = store.clone();
        let table = TableController::builder(move |params: Params| {
            let store = api_store.clone();
            async move {
                smol::Timer::after(Duration::from_millis(300)).await;
                let rows = lock(&store).map_err(|e| Error::fetch(e.to_string()))?;
                Ok(query(&rows, &params))
            }
            .boxed()
        })
        .columns(columns(&store))
        .filters(filters())
        .options(options)
        .selectable(true)
        .settings(settings)
        .build()?;

        let submit_store = store.clone();
        let dialog = DialogController::new(fields())?
            .title("Device")
            .width(480.0)
            .on_submit(move |form| {
                let store = submit_store.clone();
                async move { save(&store, &form) }.boxed()
            });

        Ok(Self {
            table,
            dialog,
            store,
            actions,
        })
    }
}

/// Demo page
pub struct DemoPage {
    table: Entity<DataTable>,
    dialog: Entity<FormDialog>,
    store: Store,
    _subscriptions: Vec<Subscription>,
}

impl DemoPage {
    pub fn new(parts: DemoParts, cx: &mut Context<Self>) -> Self {
        let DemoParts {
            table,
            dialog,
            store,
            actions,
        } = parts;
        let table = cx.new(|cx| DataTable::new(table, cx));
        let dialog = cx.new(|cx| FormDialog::new(dialog, cx));

        let subscriptions = vec![cx.subscribe(&dialog, |this, _dialog, _event: &SubmittedEvent, cx| {
            this.table.update(cx, |table, cx| table.reload(cx));
        })];

        Self::start_action_pump(actions, cx);

        Self {
            table,
            dialog,
            store,
            _subscriptions: subscriptions,
        }
    }

    /// Forward options column clicks onto the UI thread
    fn start_action_pump(mut actions: mpsc::UnboundedReceiver<RowAction>, cx: &mut Context<Self>) {
        cx.spawn(async move |this, cx| {
            while let Some(action) = actions.next().await {
                let result = this.update(cx, |page, cx| page.apply(action, cx));
                if result.is_err() {
                    break;
                }
            }
        })
        .detach();
    }

    fn apply(&mut self, action: RowAction, cx: &mut Context<Self>) {
        match action {
            RowAction::Edit(row) => {
                self.dialog.update(cx, |dialog, cx| dialog.show(FormData::from_value(row), cx));
            }
            RowAction::Delete(row) => {
                match lock(&self.store) {
                    Ok(mut rows) => rows.retain(|r| r.get("id") != row.get("id")),
                    Err(e) => {
                        tracing::error!("Failed to delete row: {}", e);
                        return;
                    }
                }
                tracing::info!(id = %value::display(row.get("id")), "Deleted device");
                self.table.update(cx, |table, cx| table.reload(cx));
            }
        }
    }

    fn create(&mut self, cx: &mut Context<Self>) {
        let mut form = FormData::new();
        form.set("status", Some(Value::Bool(true)));
        form.set("enabled", Some(Value::from(1)));
        self.dialog.update(cx, |dialog, cx| dialog.show(form, cx));
    }
}

impl Render for DemoPage {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let entity = cx.entity().downgrade();
        v_flex()
            .relative()
            .size_full()
            .p_4()
            .gap_2()
            .bg(TableColors::background())
            .child(
                h_flex()
                    .justify_between()
                    .items_center()
                    .child(
                        div()
                            .text_lg()
                            .text_color(TableColors::text_primary())
                            .child("Devices"),
                    )
                    .child(
                        Button::new("new-device", "New")
                            .kind(ButtonKind::Primary)
                            .on_click(move |_event, _window, cx| {
                                let _ = entity.update(cx, |page, cx| page.create(cx));
                            }),
                    ),
            )
            .child(self.table.clone())
            .child(self.dialog.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows() -> Vec<Value> {
        vec![
            json!({"id": "a", "name": "Gateway-01", "status": true, "region": "north"}),
            json!({"id": "b", "name": "Sensor-02", "status": false, "region": "south"}),
            json!({"id": "c", "name": "Gateway-03", "status": true, "region": "south"}),
        ]
    }

    fn params(value: Value) -> Params {
        match value {
            Value::Object(map) => map,
            _ => Params::new(),
        }
    }

    #[test]
    fn test_query_filters_and_pages() {
        let response = query(
            &rows(),
            &params(json!({"name": "gateway", "current": 2, "size": 1})),
        );
        assert_eq!(response["total"], json!(2));
        assert_eq!(response["pageCount"], json!(2));
        assert_eq!(response["list"][0]["id"], json!("c"));
    }

    #[test]
    fn test_query_without_paging_returns_all() {
        let response = query(
            &rows(),
            &params(json!({"current": null, "size": null, "region": "south"})),
        );
        assert_eq!(response["list"].as_array().map(Vec::len), Some(2));
        assert!(response.get("pageCount").is_none());
    }

    #[test]
    fn test_query_sorts_descending() {
        let response = query(&rows(), &params(json!({"field": "name", "type": "desc"})));
        assert_eq!(response["list"][0]["id"], json!("b"));
    }

    #[test]
    fn test_save_inserts_and_updates() {
        let store: Store = Arc::new(Mutex::new(rows()));
        let mut form = FormData::from_value(json!({"id": "a", "name": "Renamed"}));
        assert!(save(&store, &form).is_ok());
        form = FormData::from_value(json!({"name": "Fresh"}));
        assert!(save(&store, &form).is_ok());

        let rows = store.lock().expect("store");
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0]["name"], json!("Fresh"));
        assert!(rows.iter().any(|r| r["name"] == json!("Renamed")));
    }
}
