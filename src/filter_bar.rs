//! Filter Bar Controller
//!
//! Owns the filter values and derives the request parameter object from
//! them. Values change only through [`FilterBarController::set_value`].

use std::sync::Arc;

use serde_json::Value;

use crate::descriptor::FilterDescriptor;
use crate::error::{Error, Result};
use crate::i18n::{self, Locale};
use crate::render::{ButtonKind, InputNode, Node};
use crate::value::{self, Params};

/// Events emitted by the filter bar's controls
#[derive(Debug, Clone, PartialEq)]
pub enum FilterEvent {
    /// A control produced a new value
    Input { index: usize, value: Option<Value> },
    /// The search trigger was activated
    Search,
}

/// Receives the params of every search
pub type SearchListener = Box<dyn FnMut(&Params) + Send>;

/// Custom search trigger region; receives the event that starts a search
pub type SearchSlot = Arc<dyn Fn(FilterEvent) -> Node<FilterEvent> + Send + Sync>;

/// Caller region after the search trigger, rendered against the current params
pub type TrailingSlot = Arc<dyn Fn(&Params) -> Node<FilterEvent> + Send + Sync>;

/// One labeled filter control
#[derive(Debug, Clone)]
pub struct FilterItem {
    pub label: String,
    pub control: Node<FilterEvent>,
}

/// Render output of the filter bar
#[derive(Debug, Clone)]
pub struct FilterBarView {
    pub items: Vec<FilterItem>,
    pub search: Node<FilterEvent>,
    pub trailing: Option<Node<FilterEvent>>,
}

/// Filter bar state and parameter derivation
pub struct FilterBarController {
    filters: Vec<FilterDescriptor>,
    listeners: Vec<SearchListener>,
    search_slot: Option<SearchSlot>,
    trailing_slot: Option<TrailingSlot>,
    locale: Locale,
}

impl FilterBarController {
    /// Create a controller over a list of filters
    pub fn new(filters: Vec<FilterDescriptor>) -> Result<Self> {
        for filter in &filters {
            let keyless = filter.key.as_deref().is_none_or(str::is_empty);
            if keyless && filter.custom_params.is_none() {
                return Err(Error::Invalid {
                    message: format!("filter '{}' needs a key or custom params", filter.label),
                });
            }
        }
        Ok(Self {
            filters,
            listeners: Vec::new(),
            search_slot: None,
            trailing_slot: None,
            locale: Locale::default(),
        })
    }

    /// Set the locale of the default search button
    pub fn set_locale(&mut self, locale: Locale) {
        self.locale = locale;
    }

    /// Replace the default search button
    pub fn set_search_slot(
        &mut self,
        slot: impl Fn(FilterEvent) -> Node<FilterEvent> + Send + Sync + 'static,
    ) {
        self.search_slot = Some(Arc::new(slot));
    }

    /// Add a region after the search trigger
    pub fn set_trailing_slot(
        &mut self,
        slot: impl Fn(&Params) -> Node<FilterEvent> + Send + Sync + 'static,
    ) {
        self.trailing_slot = Some(Arc::new(slot));
    }

    /// Register a search listener
    pub fn on_search(&mut self, listener: impl FnMut(&Params) + Send + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Filters in declared order
    pub fn filters(&self) -> &[FilterDescriptor] {
        &self.filters
    }

    /// Current value of a filter
    pub fn value(&self, index: usize) -> Option<&Value> {
        self.filters.get(index).and_then(|f| f.value.as_ref())
    }

    /// Bind a new value to a filter
    pub fn set_value(&mut self, index: usize, value: Option<Value>) {
        match self.filters.get_mut(index) {
            Some(filter) => filter.value = value,
            None => tracing::warn!(index, "Input for unknown filter ignored"),
        }
    }

    /// Request parameters derived from the current values
    pub fn get_params(&self) -> Params {
        let mut params = Params::new();
        for filter in &self.filters {
            let key = filter.key.as_deref().filter(|k| !k.is_empty());
            if let Some(custom) = &filter.custom_params {
                let data = custom(filter.value.as_ref());
                match (key, data) {
                    (Some(key), data) => {
                        params.insert(key.to_string(), data);
                    }
                    (None, Value::Object(map)) => params.extend(map),
                    (None, other) => {
                        tracing::debug!(label = %filter.label, ?other, "Keyless custom params did not return an object");
                    }
                }
            } else if !value::is_empty(filter.value.as_ref()) {
                if let (Some(key), Some(value)) = (key, &filter.value) {
                    params.insert(key.to_string(), value.clone());
                }
            }
        }
        params
    }

    /// Compute params and emit them to every listener
    pub fn search(&mut self) -> Params {
        let params = self.get_params();
        tracing::debug!(?params, "Filter bar search");
        for listener in &mut self.listeners {
            listener(&params);
        }
        params
    }

    /// Apply an event; returns the params when a search was triggered
    pub fn handle(&mut self, event: FilterEvent) -> Option<Params> {
        match event {
            FilterEvent::Input { index, value } => {
                self.set_value(index, value);
                None
            }
            FilterEvent::Search => Some(self.search()),
        }
    }

    /// Render tree; `loading` is shown on the default search button
    pub fn render(&self, loading: bool) -> FilterBarView {
        let items = self
            .filters
            .iter()
            .enumerate()
            .map(|(index, filter)| FilterItem {
                label: filter.label.clone(),
                control: Node::Input(InputNode {
                    widget: filter.widget.clone(),
                    value: filter.value.clone(),
                    placeholder: filter.placeholder.clone(),
                    clearable: filter.clearable,
                    options: filter.options.clone(),
                    props: filter.props.clone(),
                    attrs: filter.attrs.clone(),
                    on_input: Arc::new(move |value| FilterEvent::Input { index, value }),
                }),
            })
            .collect();
        let search = match &self.search_slot {
            Some(slot) => slot(FilterEvent::Search),
            None => Node::Button {
                label: i18n::t(self.locale, "filter-search"),
                kind: ButtonKind::Primary,
                loading,
                on_click: FilterEvent::Search,
            },
        };
        let trailing = self
            .trailing_slot
            .as_ref()
            .map(|slot| slot(&self.get_params()));
        FilterBarView {
            items,
            search,
            trailing,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_values_are_omitted() {
        let values = [
            json!({}),
            json!([]),
            json!(""),
            json!("null"),
            json!("undefined"),
            json!(null),
        ];
        let mut filters: Vec<_> = values
            .iter()
            .enumerate()
            .map(|(i, v)| FilterDescriptor::new(format!("f{i}"), "F").value(v.clone()))
            .collect();
        filters.push(FilterDescriptor::new("unset", "Unset"));
        let bar = FilterBarController::new(filters).expect("valid filters");
        assert!(bar.get_params().is_empty());
    }

    #[test]
    fn test_name_and_blank_status() {
        let bar = FilterBarController::new(vec![
            FilterDescriptor::new("name", "Name").value("abc"),
            FilterDescriptor::new("status", "Status").value(""),
        ])
        .expect("valid filters");
        let params = bar.get_params();
        assert_eq!(Value::Object(params), json!({"name": "abc"}));
    }

    #[test]
    fn test_custom_params_flat_merge_and_nest() {
        let range = |value: Option<&Value>| {
            let parts = value.and_then(Value::as_array).cloned().unwrap_or_default();
            json!({
                "start": parts.first().cloned().unwrap_or(Value::Null),
                "end": parts.get(1).cloned().unwrap_or(Value::Null),
            })
        };
        let bar = FilterBarController::new(vec![
            FilterDescriptor::custom("Range", range).value(json!(["2024-01-01", "2024-02-01"])),
            FilterDescriptor::new("window", "Window")
                .custom_params(range)
                .value(json!(["a", "b"])),
        ])
        .expect("valid filters");
        assert_eq!(
            Value::Object(bar.get_params()),
            json!({
                "start": "2024-01-01",
                "end": "2024-02-01",
                "window": {"start": "a", "end": "b"},
            })
        );
    }

    #[test]
    fn test_custom_params_called_even_when_empty() {
        let bar = FilterBarController::new(vec![
            FilterDescriptor::new("flag", "Flag").custom_params(|v| json!(v.is_some())),
        ])
        .expect("valid filters");
        assert_eq!(bar.get_params().get("flag"), Some(&json!(false)));
    }

    #[test]
    fn test_keyless_filter_without_custom_params_is_rejected() {
        let mut filter = FilterDescriptor::new("", "Broken");
        filter.key = None;
        assert!(FilterBarController::new(vec![filter]).is_err());
    }

    #[test]
    fn test_input_and_search_emit_to_listeners() {
        let seen = std::sync::Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let mut bar = FilterBarController::new(vec![FilterDescriptor::new("name", "Name")])
            .expect("valid filters");
        bar.on_search(move |params| {
            if let Ok(mut seen) = sink.lock() {
                seen.push(params.clone());
            }
        });

        assert!(bar.handle(FilterEvent::Input { index: 0, value: Some(json!("bob")) }).is_none());
        let params = bar.handle(FilterEvent::Search).expect("search params");
        assert_eq!(params.get("name"), Some(&json!("bob")));
        assert_eq!(seen.lock().map(|s| s.len()).unwrap_or_default(), 1);
    }

    #[test]
    fn test_render_default_and_custom_search() {
        let mut bar = FilterBarController::new(vec![FilterDescriptor::new("name", "Name")])
            .expect("valid filters");
        let view = bar.render(true);
        assert_eq!(view.items.len(), 1);
        match &view.search {
            Node::Button { loading, on_click, .. } => {
                assert!(*loading);
                assert_eq!(on_click, &FilterEvent::Search);
            }
            other => panic!("unexpected search node {other:?}"),
        }
        let Node::Input(input) = &view.items[0].control else {
            panic!("expected input control");
        };
        assert!(input.clearable);
        assert_eq!(
            input.input(Some(json!("x"))),
            FilterEvent::Input { index: 0, value: Some(json!("x")) }
        );

        bar.set_search_slot(|search| Node::Group(vec![Node::Button {
            label: "Go".to_string(),
            kind: ButtonKind::Default,
            loading: false,
            on_click: search,
        }]));
        assert_eq!(bar.render(false).search.text_content(), "Go");
        assert!(bar.render(false).trailing.is_none());
    }

    #[test]
    fn test_trailing_region_sees_current_params() {
        let mut bar = FilterBarController::new(vec![FilterDescriptor::new("name", "Name")])
            .expect("valid filters");
        bar.set_trailing_slot(|params| Node::text(format!("{} active", params.len())));
        assert_eq!(bar.render(false).trailing.map(|n| n.text_content()).as_deref(), Some("0 active"));

        bar.set_value(0, Some(json!("abc")));
        assert_eq!(bar.render(false).trailing.map(|n| n.text_content()).as_deref(), Some("1 active"));
    }
}
