//! Navigation view and search index over a filtered tree.
//!
//! Search-only items are hidden from hierarchical navigation but are still
//! reachable through the search index.

use serde::Serialize;

use super::item::MenuItem;

/// A navigable item as it appears in search results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchEntry {
    pub name: String,
    pub path: String,
    /// Ancestor names from the root down, excluding the item itself.
    pub trail: Vec<String>,
}

/// Copy of `filtered` without search-only items, dead containers pruned.
pub fn navigation_view(filtered: &[MenuItem]) -> Vec<MenuItem> {
    filtered
        .iter()
        .filter(|item| !item.searchable_only)
        .filter_map(|item| {
            let view = MenuItem {
                sub_menus: navigation_view(&item.sub_menus),
                ..item.clone()
            };
            (!view.is_dead_container()).then_some(view)
        })
        .collect()
}

/// Every item with a path, in depth-first pre-order.
pub fn search_index(filtered: &[MenuItem]) -> Vec<SearchEntry> {
    let mut out = Vec::new();
    let mut trail = Vec::new();
    index_items(filtered, &mut trail, &mut out);
    out
}

fn index_items(items: &[MenuItem], trail: &mut Vec<String>, out: &mut Vec<SearchEntry>) {
    for item in items {
        if let Some(path) = &item.path {
            out.push(SearchEntry {
                name: item.name.clone(),
                path: path.clone(),
                trail: trail.clone(),
            });
        }
        trail.push(item.name.clone());
        index_items(&item.sub_menus, trail, out);
        trail.pop();
    }
}

/// Case-insensitive substring match on entry names, in index order.
pub fn search<'a>(index: &'a [SearchEntry], query: &str) -> Vec<&'a SearchEntry> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return Vec::new();
    }
    index
        .iter()
        .filter(|entry| entry.name.to_lowercase().contains(&query))
        .collect()
}
