//! Bottle gallery catalog.
//!
//! The gallery is a browsable, in-memory list of sample bottles with a free
//! text search, a spirit-type filter and an optional detail selection.

use serde::{Deserialize, Serialize};

/// A bottle shown in the gallery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryEntry {
    pub id: u64,
    pub name: String,
    /// Spirit type (e.g. "Bourbon")
    #[serde(rename = "type")]
    pub spirit_type: String,
    #[serde(default)]
    pub region: String,
    /// Alcohol by volume, percent
    pub abv: f64,
    /// Price in USD
    pub price: f64,
    #[serde(default)]
    pub image_url: String,
}

impl GalleryEntry {
    /// Case-insensitive match of `needle` (already lowercased) against the
    /// name and spirit type.
    fn matches_search(&self, needle: &str) -> bool {
        needle.is_empty()
            || self.name.to_lowercase().contains(needle)
            || self.spirit_type.to_lowercase().contains(needle)
    }
}

/// A fixed set of gallery entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    entries: Vec<GalleryEntry>,
}

impl Catalog {
    pub fn new(entries: Vec<GalleryEntry>) -> Self {
        Self { entries }
    }

    /// Parse a catalog from a JSON array of entries.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn entries(&self) -> &[GalleryEntry] {
        &self.entries
    }

    pub fn find(&self, id: u64) -> Option<&GalleryEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Distinct spirit types in first-seen order.
    pub fn spirit_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = Vec::new();
        for entry in &self.entries {
            if !types.contains(&entry.spirit_type.as_str()) {
                types.push(&entry.spirit_type);
            }
        }
        types
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Search, filter and selection state over a [`Catalog`].
///
/// The selection is held by id and resolved on access, so it can never point
/// at an entry that is not currently visible.
#[derive(Debug, Clone, Default)]
pub struct Gallery {
    catalog: Catalog,
    search: String,
    type_filter: Option<String>,
    selected: Option<u64>,
}

impl Gallery {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            ..Default::default()
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn search_term(&self) -> &str {
        &self.search
    }

    pub fn type_filter(&self) -> Option<&str> {
        self.type_filter.as_deref()
    }

    /// Update the search term. Drops the selection if it is filtered out.
    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
        self.drop_hidden_selection();
    }

    pub fn clear_search(&mut self) {
        self.set_search(String::new());
    }

    /// Restrict to one spirit type, or `None` for all types.
    pub fn set_type_filter(&mut self, spirit_type: Option<String>) {
        self.type_filter = spirit_type.filter(|t| !t.is_empty());
        self.drop_hidden_selection();
    }

    /// Entries passing both the search term and the type filter.
    pub fn visible(&self) -> Vec<&GalleryEntry> {
        let needle = self.search.to_lowercase();
        self.catalog
            .entries()
            .iter()
            .filter(|e| e.matches_search(&needle))
            .filter(|e| {
                self.type_filter
                    .as_deref()
                    .map_or(true, |t| e.spirit_type == t)
            })
            .collect()
    }

    fn is_visible(&self, id: u64) -> bool {
        self.visible().iter().any(|e| e.id == id)
    }

    /// Open the detail view for `id`. Returns the entry, or `None` if no
    /// visible entry has that id (the selection is left unchanged).
    pub fn select(&mut self, id: u64) -> Option<&GalleryEntry> {
        if !self.is_visible(id) {
            return None;
        }
        self.selected = Some(id);
        self.catalog.find(id)
    }

    /// The entry shown in the detail view, if any.
    pub fn selected(&self) -> Option<&GalleryEntry> {
        self.selected.and_then(|id| self.catalog.find(id))
    }

    /// Close the detail view.
    pub fn close_detail(&mut self) {
        self.selected = None;
    }

    fn drop_hidden_selection(&mut self) {
        if let Some(id) = self.selected {
            if !self.is_visible(id) {
                self.selected = None;
            }
        }
    }
}
