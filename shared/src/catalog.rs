//! Item catalog: raw game class names to display names.
//!
//! The parsing service reports objects by their internal class name
//! (e.g. `Desc_IronPlate_C`). The catalog maps those to human-readable names and a
//! category so counts can be grouped into materials and buildings.
//!
//! A catalog is an ordinary value. Load it once, then pass it by reference to
//! whatever needs it.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

/// What kind of game object a catalog entry describes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemCategory {
    Material,
    Building,
    #[default]
    Other,
}

/// One catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Display name shown to users
    pub name: String,
    #[serde(default)]
    pub category: ItemCategory,
}

/// Lookup table from class name to [`CatalogEntry`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemCatalog {
    items: HashMap<String, CatalogEntry>,
}

impl ItemCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a catalog from a JSON object of `class -> {name, category}`.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn insert(&mut self, class: impl Into<String>, name: impl Into<String>, category: ItemCategory) {
        self.items.insert(
            class.into(),
            CatalogEntry {
                name: name.into(),
                category,
            },
        );
    }

    pub fn get(&self, class: &str) -> Option<&CatalogEntry> {
        self.items.get(class)
    }

    /// Display name for `class`, or `class` itself when unknown.
    pub fn display_name<'a>(&'a self, class: &'a str) -> &'a str {
        self.get(class).map_or(class, |entry| entry.name.as_str())
    }

    /// Category for `class`; unknown classes are [`ItemCategory::Other`].
    pub fn category(&self, class: &str) -> ItemCategory {
        self.get(class).map(|entry| entry.category).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
