//! Field Map
//!
//! Naming convention between the table's internal page/list fields and a
//! backend's request and response fields. Callers supply a partial
//! [`FieldMapOverride`] which is merged over the defaults.

use serde::{Deserialize, Serialize};

/// Page field names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageFields {
    pub current: String,
    pub size: String,
    pub total: String,
    pub page_count: String,
}

impl Default for PageFields {
    fn default() -> Self {
        Self {
            current: "current".to_string(),
            size: "size".to_string(),
            total: "total".to_string(),
            page_count: "pageCount".to_string(),
        }
    }
}

/// Sort field names sent with a request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortFields {
    /// Name of the sorted column parameter
    pub field: String,
    /// Name of the direction parameter (`asc` / `desc`)
    pub direction: String,
}

impl Default for SortFields {
    fn default() -> Self {
        Self {
            field: "field".to_string(),
            direction: "type".to_string(),
        }
    }
}

/// Names used when building a request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestFields {
    pub page: PageFields,
    pub sort: SortFields,
}

/// Names read from a response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseFields {
    pub list: String,
    pub page: PageFields,
}

impl Default for ResponseFields {
    fn default() -> Self {
        Self {
            list: "list".to_string(),
            page: PageFields::default(),
        }
    }
}

/// Complete field map
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMap {
    pub request: RequestFields,
    pub response: ResponseFields,
}

/// Partial page field names
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PageFieldsOverride {
    pub current: Option<String>,
    pub size: Option<String>,
    pub total: Option<String>,
    pub page_count: Option<String>,
}

/// Partial sort field names
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SortFieldsOverride {
    pub field: Option<String>,
    pub direction: Option<String>,
}

/// Partial request names
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestFieldsOverride {
    pub page: Option<PageFieldsOverride>,
    pub sort: Option<SortFieldsOverride>,
}

/// Partial response names
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponseFieldsOverride {
    pub list: Option<String>,
    pub page: Option<PageFieldsOverride>,
}

/// Caller override; only the names that differ from convention need to be set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldMapOverride {
    pub request: Option<RequestFieldsOverride>,
    pub response: Option<ResponseFieldsOverride>,
}

fn pick(base: &str, over: Option<&String>) -> String {
    over.cloned().unwrap_or_else(|| base.to_string())
}

impl PageFields {
    fn merged(&self, over: Option<&PageFieldsOverride>) -> Self {
        let Some(over) = over else {
            return self.clone();
        };
        Self {
            current: pick(&self.current, over.current.as_ref()),
            size: pick(&self.size, over.size.as_ref()),
            total: pick(&self.total, over.total.as_ref()),
            page_count: pick(&self.page_count, over.page_count.as_ref()),
        }
    }
}

impl SortFields {
    fn merged(&self, over: Option<&SortFieldsOverride>) -> Self {
        let Some(over) = over else {
            return self.clone();
        };
        Self {
            field: pick(&self.field, over.field.as_ref()),
            direction: pick(&self.direction, over.direction.as_ref()),
        }
    }
}

impl FieldMap {
    /// Merge an override over this map, returning a new map
    pub fn merged(&self, over: &FieldMapOverride) -> Self {
        let request = over.request.as_ref();
        let response = over.response.as_ref();
        Self {
            request: RequestFields {
                page: self.request.page.merged(request.and_then(|r| r.page.as_ref())),
                sort: self.request.sort.merged(request.and_then(|r| r.sort.as_ref())),
            },
            response: ResponseFields {
                list: pick(&self.response.list, response.and_then(|r| r.list.as_ref())),
                page: self.response.page.merged(response.and_then(|r| r.page.as_ref())),
            },
        }
    }

    /// Defaults merged with an override
    pub fn with_override(over: &FieldMapOverride) -> Self {
        Self::default().merged(over)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let map = FieldMap::default();
        assert_eq!(map.request.page.current, "current");
        assert_eq!(map.request.page.size, "size");
        assert_eq!(map.request.sort.direction, "type");
        assert_eq!(map.response.list, "list");
        assert_eq!(map.response.page.page_count, "pageCount");
    }

    #[test]
    fn test_partial_override_keeps_siblings() {
        let over = FieldMapOverride {
            response: Some(ResponseFieldsOverride {
                list: Some("records".to_string()),
                page: Some(PageFieldsOverride {
                    total: Some("totalCount".to_string()),
                    ..Default::default()
                }),
            }),
            ..Default::default()
        };
        let map = FieldMap::with_override(&over);
        assert_eq!(map.response.list, "records");
        assert_eq!(map.response.page.total, "totalCount");
        assert_eq!(map.response.page.current, "current");
        assert_eq!(map.request, RequestFields::default());
    }

    #[test]
    fn test_override_from_json() {
        let over: FieldMapOverride = serde_json::from_str(
            r#"{"request": {"page": {"current": "pageNo", "size": "pageSize"}}}"#,
        )
        .expect("valid override");
        let map = FieldMap::with_override(&over);
        assert_eq!(map.request.page.current, "pageNo");
        assert_eq!(map.request.page.size, "pageSize");
        assert_eq!(map.response, ResponseFields::default());
    }
}
