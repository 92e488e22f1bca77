//! Template catalog.
//!
//! Maps single-character selectors (`"1"`..`"5"`) to template images stored
//! in an assets directory. The catalog is built once at startup and never
//! mutated afterwards.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Selector reserved for "use your own image".
pub const UPLOAD_SELECTOR: &str = "6";

/// Maximum number of templates a catalog may hold.
pub const MAX_TEMPLATES: usize = 5;

/// A single catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateEntry {
    /// Selector the user types.
    pub selector: String,
    /// Human readable name shown in the menu.
    pub label: String,
    /// Image file name, relative to the assets directory.
    pub file: String,
}

impl TemplateEntry {
    /// Create a new entry.
    pub fn new(
        selector: impl Into<String>,
        label: impl Into<String>,
        file: impl Into<String>,
    ) -> Self {
        Self {
            selector: selector.into(),
            label: label.into(),
            file: file.into(),
        }
    }
}

/// Immutable selector → template mapping.
#[derive(Debug, Clone)]
pub struct TemplateCatalog {
    entries: BTreeMap<String, TemplateEntry>,
    assets_dir: PathBuf,
}

impl TemplateCatalog {
    /// Build a catalog, validating the entries.
    ///
    /// Selectors must be single digits from `1` to `5` and unique; at least
    /// one entry is required.
    pub fn new(
        entries: impl IntoIterator<Item = TemplateEntry>,
        assets_dir: impl Into<PathBuf>,
    ) -> Result<Self> {
        let mut map = BTreeMap::new();
        for entry in entries {
            validate_selector(&entry.selector)?;
            if entry.file.trim().is_empty() {
                return Err(Error::catalog(format!(
                    "template '{}' has no file",
                    entry.selector
                )));
            }
            if map.contains_key(&entry.selector) {
                return Err(Error::catalog(format!(
                    "duplicate selector '{}'",
                    entry.selector
                )));
            }
            map.insert(entry.selector.clone(), entry);
        }

        if map.is_empty() {
            return Err(Error::catalog("at least one template is required"));
        }

        Ok(Self {
            entries: map,
            assets_dir: assets_dir.into(),
        })
    }

    /// Catalog with the built-in templates.
    #[must_use]
    pub fn with_defaults(assets_dir: impl Into<PathBuf>) -> Self {
        Self {
            entries: default_entries()
                .into_iter()
                .map(|entry| (entry.selector.clone(), entry))
                .collect(),
            assets_dir: assets_dir.into(),
        }
    }

    /// Look up an entry by selector.
    #[must_use]
    pub fn get(&self, selector: &str) -> Option<&TemplateEntry> {
        self.entries.get(selector)
    }

    /// Resolve a selector to the template file path.
    #[must_use]
    pub fn resolve(&self, selector: &str) -> Option<PathBuf> {
        self.get(selector)
            .map(|entry| self.assets_dir.join(&entry.file))
    }

    /// Entries in selector order.
    pub fn entries(&self) -> impl Iterator<Item = &TemplateEntry> {
        self.entries.values()
    }

    /// Number of templates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog is empty. Always false for a validated catalog.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Directory templates are resolved against.
    #[must_use]
    pub fn assets_dir(&self) -> &Path {
        &self.assets_dir
    }

    /// Menu lines, one per template, e.g. `"1. Invoice - invoice.jpg"`.
    #[must_use]
    pub fn menu_lines(&self) -> Vec<String> {
        self.entries()
            .map(|entry| format!("{}. {} - {}", entry.selector, entry.label, entry.file))
            .collect()
    }

    /// Templates whose files are missing from the assets directory.
    #[must_use]
    pub fn missing_files(&self) -> Vec<PathBuf> {
        self.entries()
            .map(|entry| self.assets_dir.join(&entry.file))
            .filter(|path| !path.is_file())
            .collect()
    }
}

fn validate_selector(selector: &str) -> Result<()> {
    let mut chars = selector.chars();
    let valid = matches!(
        (chars.next(), chars.next()),
        (Some('1'..='5'), None)
    );

    if valid {
        Ok(())
    } else {
        Err(Error::catalog(format!(
            "selector '{selector}' must be a digit from 1 to {MAX_TEMPLATES}"
        )))
    }
}

/// Built-in template entries.
#[must_use]
pub fn default_entries() -> Vec<TemplateEntry> {
    vec![
        TemplateEntry::new("1", "Invoice", "invoice.jpg"),
        TemplateEntry::new("2", "Contract (two pages)", "contract.png"),
        TemplateEntry::new("3", "Account statement", "statement.jpg"),
        TemplateEntry::new("4", "Certificate", "certificate.jpg"),
        TemplateEntry::new("5", "Receipt", "receipt.jpg"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog() {
        let catalog = TemplateCatalog::with_defaults("assets/templates");
        assert_eq!(catalog.len(), 5);
        assert_eq!(
            catalog.resolve("3"),
            Some(PathBuf::from("assets/templates/statement.jpg"))
        );
        assert!(catalog.resolve(UPLOAD_SELECTOR).is_none());
        assert!(catalog.resolve("0").is_none());
        assert!(catalog.resolve("").is_none());
    }

    #[test]
    fn test_menu_lines_in_selector_order() {
        let catalog = TemplateCatalog::with_defaults(".");
        let lines = catalog.menu_lines();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "1. Invoice - invoice.jpg");
        assert!(lines[4].starts_with("5. "));
    }

    #[test]
    fn test_rejects_bad_selectors() {
        for selector in ["6", "0", "12", "a", ""] {
            let result = TemplateCatalog::new([TemplateEntry::new(selector, "x", "x.png")], ".");
            assert!(result.is_err(), "selector {selector:?} accepted");
        }
    }

    #[test]
    fn test_rejects_duplicates_and_empty() {
        let dup = TemplateCatalog::new(
            [
                TemplateEntry::new("1", "a", "a.png"),
                TemplateEntry::new("1", "b", "b.png"),
            ],
            ".",
        );
        assert!(matches!(dup, Err(Error::Catalog(_))));

        let empty = TemplateCatalog::new(Vec::new(), ".");
        assert!(empty.is_err());
    }

    #[test]
    fn test_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("invoice.jpg"), b"x").unwrap();

        let catalog = TemplateCatalog::with_defaults(dir.path());
        let missing = catalog.missing_files();
        assert_eq!(missing.len(), 4);
        assert!(!missing.contains(&dir.path().join("invoice.jpg")));
    }

    #[test]
    fn test_entries_deserialize() {
        let json = r#"[{"selector":"2","label":"Deed","file":"deed.png"}]"#;
        let entries: Vec<TemplateEntry> = serde_json::from_str(json).unwrap();
        let catalog = TemplateCatalog::new(entries, "/srv/assets").unwrap();
        assert_eq!(
            catalog.resolve("2"),
            Some(PathBuf::from("/srv/assets/deed.png"))
        );
    }
}
