//! i18n - Internationalization Module
//!
//! Default texts for the generated controls (buttons, switch labels,
//! required-rule messages) using HashMap-based lookups.

use std::collections::HashMap;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

/// Supported locales
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Locale {
    /// English (US)
    #[serde(rename = "en-US", alias = "en")]
    EnUS,
    /// Chinese (Simplified)
    #[default]
    #[serde(rename = "zh-CN", alias = "zh")]
    ZhCN,
}

impl Locale {
    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            Locale::EnUS => "English",
            Locale::ZhCN => "中文",
        }
    }

    /// Pick a locale from the user's OS settings
    pub fn detect() -> Self {
        let tags = locale_config::Locale::user_default().to_string();
        Self::from_tag(&tags)
    }

    /// Map a language tag list (e.g. `en-US,zh-CN`) to a supported locale
    pub fn from_tag(tags: &str) -> Self {
        let first = tags
            .split(',')
            .map(|tag| tag.rsplit('=').next().unwrap_or(tag).trim())
            .find(|tag| !tag.is_empty())
            .unwrap_or_default()
            .to_ascii_lowercase();
        if first.starts_with("zh") {
            Locale::ZhCN
        } else if first.starts_with("en") {
            Locale::EnUS
        } else {
            Locale::default()
        }
    }
}

/// Translation resources
static TRANSLATIONS: OnceLock<HashMap<&'static str, (&'static str, &'static str)>> = OnceLock::new();

/// Initialize translations (key -> (en, zh))
fn init_translations() -> HashMap<&'static str, (&'static str, &'static str)> {
    let mut map = HashMap::new();

    // Filter bar
    map.insert("filter-search", ("Search", "搜索"));

    // Dialog
    map.insert("dialog-confirm", ("Confirm", "确定"));
    map.insert("dialog-cancel", ("Cancel", "取消"));
    map.insert("rule-required", (" is required", "必填"));

    // Table
    map.insert("table-options", ("Actions", "操作"));
    map.insert("table-no-data", ("No data", "无数据"));
    map.insert("table-loading", ("Loading...", "加载中..."));
    map.insert("table-total", ("Total", "共"));
    map.insert("table-per-page", ("/ page", "条/页"));

    // Switch cell
    map.insert("switch-active", ("Enabled", "正常"));
    map.insert("switch-inactive", ("Disabled", "禁用"));

    map
}

/// Get translations
fn translations() -> &'static HashMap<&'static str, (&'static str, &'static str)> {
    TRANSLATIONS.get_or_init(init_translations)
}

/// Translate a key
pub fn t(locale: Locale, key: &str) -> String {
    if let Some(&(en, zh)) = translations().get(key) {
        match locale {
            Locale::EnUS => en.to_string(),
            Locale::ZhCN => zh.to_string(),
        }
    } else {
        // Fallback: return the key itself
        key.to_string()
    }
}

/// Message of the synthesized required rule for a field label
pub fn required_message(locale: Locale, label: &str) -> String {
    format!("{label}{}", t(locale, "rule-required"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_known_key() {
        assert_eq!(t(Locale::EnUS, "filter-search"), "Search");
        assert_eq!(t(Locale::ZhCN, "filter-search"), "搜索");
    }

    #[test]
    fn test_translate_unknown_key_falls_back() {
        assert_eq!(t(Locale::EnUS, "no-such-key"), "no-such-key");
    }

    #[test]
    fn test_required_message() {
        assert_eq!(required_message(Locale::EnUS, "Name"), "Name is required");
        assert_eq!(required_message(Locale::ZhCN, "名称"), "名称必填");
    }

    #[test]
    fn test_from_tag() {
        assert_eq!(Locale::from_tag("en-US"), Locale::EnUS);
        assert_eq!(Locale::from_tag("zh-CN,en-US"), Locale::ZhCN);
        assert_eq!(Locale::from_tag("LC_ALL=en_GB"), Locale::EnUS);
        assert_eq!(Locale::from_tag("fr-FR"), Locale::default());
    }
}
