//! Menu item tree node.

use serde::{Deserialize, Serialize};

/// A node in the navigation catalog.
///
/// Absent and empty `sub_menus`/`roles` mean the same thing. Insertion order
/// of `sub_menus` is display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    /// Display label, also the identity key for filtering and flag lookup.
    pub name: String,

    /// Navigable route. `None` for containers that only group children.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Presentation hint; ignored by filtering.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    /// Child items in display order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sub_menus: Vec<MenuItem>,

    /// Roles allowed to see this item (any one suffices). Empty = public.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<String>,

    /// Item only appears in the search index, not in hierarchical navigation.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub searchable_only: bool,

    /// Feature flag that must resolve to `true` for the item to be shown.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_flag: Option<String>,
}

impl MenuItem {
    /// Create a container item with only a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: None,
            icon: None,
            sub_menus: Vec::new(),
            roles: Vec::new(),
            searchable_only: false,
            feature_flag: None,
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Require any one of `roles`.
    pub fn with_roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.roles = roles.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_feature_flag(mut self, flag: impl Into<String>) -> Self {
        self.feature_flag = Some(flag.into());
        self
    }

    /// Mark the item as search-only.
    pub fn searchable_only(mut self) -> Self {
        self.searchable_only = true;
        self
    }

    pub fn with_sub_menus(mut self, sub_menus: Vec<MenuItem>) -> Self {
        self.sub_menus = sub_menus;
        self
    }

    /// A leaf has no children (possibly after filtering).
    pub fn is_leaf(&self) -> bool {
        self.sub_menus.is_empty()
    }

    /// Neither navigable nor grouping anything.
    pub fn is_dead_container(&self) -> bool {
        self.path.is_none() && self.sub_menus.is_empty()
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        1 + self.sub_menus.iter().map(MenuItem::node_count).sum::<usize>()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_camel_case_fields() {
        let json = r#"{
            "name": "Inventory",
            "subMenus": [
                {"name": "Stock", "path": "/inventory/stock", "featureFlag": "stock-v2"},
                {"name": "Lookup", "path": "/inventory/lookup", "searchableOnly": true}
            ],
            "roles": ["INVENTORY_ADMIN"]
        }"#;

        let item: MenuItem = serde_json::from_str(json).unwrap();

        assert_eq!(item.name, "Inventory");
        assert!(item.path.is_none());
        assert_eq!(item.roles, vec!["INVENTORY_ADMIN"]);
        assert_eq!(item.sub_menus.len(), 2);
        assert_eq!(item.sub_menus[0].feature_flag.as_deref(), Some("stock-v2"));
        assert!(item.sub_menus[1].searchable_only);
    }

    #[test]
    fn serialization_omits_empty_fields() {
        let item = MenuItem::new("Stores").with_path("/stores");
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json, serde_json::json!({"name": "Stores", "path": "/stores"}));
    }

    #[test]
    fn dead_container_detection() {
        assert!(MenuItem::new("Empty").is_dead_container());
        assert!(!MenuItem::new("Page").with_path("/page").is_dead_container());
        assert!(
            !MenuItem::new("Group")
                .with_sub_menus(vec![MenuItem::new("Child").with_path("/c")])
                .is_dead_container()
        );
    }

    #[test]
    fn node_count_includes_descendants() {
        let tree = MenuItem::new("Root").with_sub_menus(vec![
            MenuItem::new("A").with_path("/a"),
            MenuItem::new("B").with_sub_menus(vec![MenuItem::new("C").with_path("/c")]),
        ]);
        assert_eq!(tree.node_count(), 4);
    }
}
