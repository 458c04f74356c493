//! The API a host editor hands to a block at construction time.

use std::collections::HashMap;

/// Translation service; unknown keys come back unchanged
pub trait I18n {
    fn t(&self, key: &str) -> String;
}

/// Host-wide CSS class tokens used to theme blocks. Values are opaque.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Styles {
    pub block: String,
    pub input: String,
}

impl Default for Styles {
    fn default() -> Self {
        Self {
            block: "cdx-block".to_string(),
            input: "cdx-input".to_string(),
        }
    }
}

pub trait HostApi {
    fn i18n(&self) -> &dyn I18n;
    fn styles(&self) -> &Styles;
}

/// Translator backed by a key → text catalog
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: HashMap<String, String>,
}

impl Catalog {
    pub fn new(entries: HashMap<String, String>) -> Self {
        Self { entries }
    }
}

impl I18n for Catalog {
    fn t(&self, key: &str) -> String {
        self.entries
            .get(key)
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }
}

/// Host API for embedders that have no editor runtime of their own
#[derive(Debug, Clone, Default)]
pub struct StaticHost {
    pub catalog: Catalog,
    pub styles: Styles,
}

impl HostApi for StaticHost {
    fn i18n(&self) -> &dyn I18n {
        &self.catalog
    }

    fn styles(&self) -> &Styles {
        &self.styles
    }
}
