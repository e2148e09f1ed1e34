//! Menu catalog - the immutable master navigation tree.
//!
//! The catalog is built once at startup, either in code or from a catalog
//! file grouped by top-level domain, and is only ever handed out as deep
//! copies so no caller can corrupt the shared tree.

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::item::MenuItem;
use crate::error::{MenuError, MenuResult};

/// One top-level domain of the catalog (e.g. "Inventory", "Customer").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogGroup {
    /// Domain label, used only for logging.
    pub domain: String,
    /// Root items contributed by this domain, in display order.
    #[serde(default)]
    pub items: Vec<MenuItem>,
}

/// On-disk catalog document.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    groups: Vec<CatalogGroup>,
}

/// Immutable master menu tree.
///
/// Cloning a `MenuCatalog` clones the handle, not the tree.
#[derive(Debug, Clone, Default)]
pub struct MenuCatalog {
    items: Arc<Vec<MenuItem>>,
}

impl MenuCatalog {
    /// Create a catalog from root items.
    pub fn new(items: Vec<MenuItem>) -> Self {
        Self {
            items: Arc::new(items),
        }
    }

    /// Create a catalog by concatenating domain groups in order.
    pub fn from_groups(groups: Vec<CatalogGroup>) -> Self {
        let mut items = Vec::new();

        for group in groups {
            if group.items.is_empty() {
                warn!(domain = %group.domain, "skipping empty menu catalog group");
                continue;
            }
            debug!(domain = %group.domain, roots = group.items.len(), "added catalog group");
            items.extend(group.items);
        }

        Self::new(items)
    }

    /// Load a catalog file. The format is chosen by extension.
    pub fn load(path: &Path) -> MenuResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| MenuError::CatalogRead {
            path: path.to_path_buf(),
            source,
        })?;

        let catalog = Self::parse(path, &text)?;
        info!(
            path = %path.display(),
            roots = catalog.items.len(),
            nodes = catalog.len(),
            "menu catalog loaded"
        );
        Ok(catalog)
    }

    /// Parse catalog text; `path` selects the format and labels errors.
    pub fn parse(path: &Path, text: &str) -> MenuResult<Self> {
        let parse_err = |details: String| MenuError::CatalogParse {
            path: path.to_path_buf(),
            details,
        };

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        let file: CatalogFile = match extension.as_deref() {
            Some("yml" | "yaml") => {
                serde_yml::from_str(text).map_err(|e| parse_err(e.to_string()))?
            }
            Some("json") => serde_json::from_str(text).map_err(|e| parse_err(e.to_string()))?,
            Some("toml") => toml::from_str(text).map_err(|e| parse_err(e.to_string()))?,
            _ => {
                return Err(MenuError::UnsupportedCatalogFormat {
                    path: path.to_path_buf(),
                });
            }
        };

        Ok(Self::from_groups(file.groups))
    }

    /// Deep copy of the master tree.
    pub fn master_tree(&self) -> Vec<MenuItem> {
        self.items.as_ref().clone()
    }

    /// Every distinct feature flag referenced anywhere in the tree.
    pub fn feature_flags(&self) -> BTreeSet<String> {
        let mut flags = BTreeSet::new();
        collect_flags(&self.items, &mut flags);
        flags
    }

    /// Total node count, nested items included.
    pub fn len(&self) -> usize {
        self.items.iter().map(MenuItem::node_count).sum()
    }

    /// Check if the catalog has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

fn collect_flags(items: &[MenuItem], flags: &mut BTreeSet<String>) {
    for item in items {
        if let Some(flag) = &item.feature_flag {
            flags.insert(flag.clone());
        }
        collect_flags(&item.sub_menus, flags);
    }
}
