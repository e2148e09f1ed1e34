//! Active route resolution.
//!
//! Finds the leaf whose path prefixes the current URL and reports it together
//! with its top-level ancestor. The tree is walked by reference; nothing is
//! stamped onto the nodes.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::item::MenuItem;
use crate::error::MenuError;

/// The currently navigated leaf and its root ancestor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveMenu {
    pub root_menu: Option<MenuItem>,
    pub sub_menu: Option<MenuItem>,
}

impl ActiveMenu {
    pub fn is_none(&self) -> bool {
        self.sub_menu.is_none()
    }

    pub fn root_name(&self) -> Option<&str> {
        self.root_menu.as_ref().map(|m| m.name.as_str())
    }

    pub fn sub_name(&self) -> Option<&str> {
        self.sub_menu.as_ref().map(|m| m.name.as_str())
    }
}

/// Tie-break between several leaves whose paths prefix the current URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchStrategy {
    /// Last match in depth-first pre-order.
    #[default]
    LastMatch,
    /// Longest matching path; equal lengths keep the later leaf.
    LongestPrefix,
}

impl FromStr for MatchStrategy {
    type Err = MenuError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "last" | "last-match" => Ok(Self::LastMatch),
            "longest" | "longest-prefix" => Ok(Self::LongestPrefix),
            other => Err(MenuError::InvalidMatchStrategy(other.to_string())),
        }
    }
}

/// A leaf paired with the root it hangs under.
#[derive(Debug, Clone, Copy)]
pub struct Leaf<'a> {
    pub root: &'a MenuItem,
    pub item: &'a MenuItem,
}

/// All leaves in depth-first pre-order. A root with no children is its own root.
pub fn leaves(tree: &[MenuItem]) -> Vec<Leaf<'_>> {
    let mut out = Vec::new();
    for root in tree {
        collect_leaves(root, root, &mut out);
    }
    out
}

fn collect_leaves<'a>(root: &'a MenuItem, item: &'a MenuItem, out: &mut Vec<Leaf<'a>>) {
    if item.is_leaf() {
        out.push(Leaf { root, item });
        return;
    }
    for child in &item.sub_menus {
        collect_leaves(root, child, out);
    }
}

/// Resolve the active menu for `current_path`.
///
/// Matching is a plain prefix test, so `/inventory` also matches
/// `/inventory-order`.
pub fn resolve_active(
    tree: &[MenuItem],
    current_path: &str,
    strategy: MatchStrategy,
) -> ActiveMenu {
    let matches = leaves(tree).into_iter().filter(|leaf| {
        leaf.item
            .path
            .as_deref()
            .is_some_and(|p| current_path.starts_with(p))
    });

    let best = match strategy {
        MatchStrategy::LastMatch => matches.last(),
        // max_by_key returns the last of equal maxima.
        MatchStrategy::LongestPrefix => {
            matches.max_by_key(|leaf| leaf.item.path.as_deref().map_or(0, str::len))
        }
    };

    match best {
        Some(leaf) => ActiveMenu {
            root_menu: Some(leaf.root.clone()),
            sub_menu: Some(leaf.item.clone()),
        },
        None => ActiveMenu::default(),
    }
}
