//! Table settings
//!
//! Defaults shared by every table of an application, loaded from a TOML or
//! JSON file.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use snafu::ResultExt;

use crate::error::{IoSnafu, JsonSnafu, Result, TomlDeSnafu};
use crate::field_map::FieldMapOverride;
use crate::i18n::Locale;
use crate::table::state::{DEFAULT_PAGE_SIZE, DEFAULT_PAGE_SIZES};

/// Settings applied through [`TableBuilder::settings`](crate::table::TableBuilder::settings)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableSettings {
    pub page_size: u64,
    pub page_sizes: Vec<u64>,
    pub no_page: bool,
    pub selectable: bool,
    pub reload_on_mount: bool,
    /// Falls back to the builder's locale when unset
    pub locale: Option<Locale>,
    pub field_map: FieldMapOverride,
}

impl Default for TableSettings {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            page_sizes: DEFAULT_PAGE_SIZES.to_vec(),
            no_page: false,
            selectable: false,
            reload_on_mount: true,
            locale: None,
            field_map: FieldMapOverride::default(),
        }
    }
}

/// Settings file format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Toml,
    Json,
}

impl Format {
    /// Format by file extension; anything but `.json` is read as TOML
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Format::Json,
            _ => Format::Toml,
        }
    }
}

/// Parse settings text
pub fn parse(content: &str, format: Format) -> Result<TableSettings> {
    match format {
        Format::Toml => toml::from_str(content).context(TomlDeSnafu),
        Format::Json => serde_json::from_str(content).context(JsonSnafu),
    }
}

/// Load settings from a file; a missing file yields the defaults
pub fn load(path: impl AsRef<Path>) -> Result<TableSettings> {
    let path = path.as_ref();
    if !path.exists() {
        tracing::debug!(path = %path.display(), "Settings file not found, using defaults");
        return Ok(TableSettings::default());
    }
    let content = fs::read_to_string(path).context(IoSnafu)?;
    let settings = parse(&content, Format::from_path(path))?;
    tracing::info!(path = %path.display(), "Loaded table settings");
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_missing_file_gives_defaults() {
        let settings = load("/nonexistent/common-table/settings.toml").expect("defaults");
        assert_eq!(settings, TableSettings::default());
        assert_eq!(settings.page_size, 20);
        assert_eq!(settings.page_sizes, vec![10, 20, 30]);
        assert!(settings.reload_on_mount);
    }

    #[test]
    fn test_parse_toml() {
        let settings = parse(
            r#"
page_size = 50
page_sizes = [50, 100]
selectable = true
locale = "en-US"

[field_map.response]
list = "records"

[field_map.response.page]
total = "totalCount"
"#,
            Format::Toml,
        )
        .expect("valid toml");
        assert_eq!(settings.page_size, 50);
        assert_eq!(settings.page_sizes, vec![50, 100]);
        assert!(settings.selectable);
        assert_eq!(settings.locale, Some(Locale::EnUS));
        let response = settings.field_map.response.expect("response override");
        assert_eq!(response.list.as_deref(), Some("records"));
        assert_eq!(
            response.page.and_then(|p| p.total).as_deref(),
            Some("totalCount")
        );
    }

    #[test]
    fn test_parse_json() {
        let settings = parse(r#"{"no_page": true, "locale": "zh-CN"}"#, Format::Json)
            .expect("valid json");
        assert!(settings.no_page);
        assert_eq!(settings.locale, Some(Locale::ZhCN));
        assert_eq!(settings.page_size, 20);
    }

    #[test]
    fn test_bad_input() {
        assert!(matches!(parse("page_size = [", Format::Toml), Err(Error::TomlDe { .. })));
        assert!(matches!(parse("{", Format::Json), Err(Error::Json { .. })));
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(Format::from_path(Path::new("a/table.JSON")), Format::Json);
        assert_eq!(Format::from_path(Path::new("table.toml")), Format::Toml);
        assert_eq!(Format::from_path(Path::new("table")), Format::Toml);
    }
}
