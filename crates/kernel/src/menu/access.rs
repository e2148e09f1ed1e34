//! Role and feature-flag filtering of the menu tree.
//!
//! All filters consume an owned copy of the tree and keep sibling order.
//! After each pass, containers left with neither a path nor children are
//! dropped.

use std::collections::{BTreeMap, BTreeSet};

use super::item::MenuItem;

/// The roles held by the current user.
pub type RoleSet = BTreeSet<String>;

/// State of a single feature flag lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlagResolution {
    /// No value received yet. Treated as disabled.
    #[default]
    Unresolved,
    Enabled,
    Disabled,
}

impl From<bool> for FlagResolution {
    fn from(enabled: bool) -> Self {
        if enabled {
            Self::Enabled
        } else {
            Self::Disabled
        }
    }
}

/// Latest resolution per feature flag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagResolutions {
    flags: BTreeMap<String, FlagResolution>,
}

impl FlagResolutions {
    /// All `flags` start out unresolved.
    pub fn pending<I, S>(flags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            flags: flags
                .into_iter()
                .map(|f| (f.into(), FlagResolution::Unresolved))
                .collect(),
        }
    }

    /// Record a resolved value. Returns `true` if the stored resolution changed.
    pub fn resolve(&mut self, flag: &str, enabled: bool) -> bool {
        let next = FlagResolution::from(enabled);
        match self.flags.get_mut(flag) {
            Some(current) if *current == next => false,
            Some(current) => {
                *current = next;
                true
            }
            None => {
                self.flags.insert(flag.to_string(), next);
                true
            }
        }
    }

    pub fn get(&self, flag: &str) -> FlagResolution {
        self.flags.get(flag).copied().unwrap_or_default()
    }

    /// Only an explicit `true` enables a flag.
    pub fn is_enabled(&self, flag: &str) -> bool {
        self.get(flag) == FlagResolution::Enabled
    }

    /// Flags still waiting on a value.
    pub fn unresolved(&self) -> impl Iterator<Item = &str> {
        self.flags
            .iter()
            .filter(|(_, r)| **r == FlagResolution::Unresolved)
            .map(|(f, _)| f.as_str())
    }
}

impl<S: Into<String>> FromIterator<(S, bool)> for FlagResolutions {
    fn from_iter<T: IntoIterator<Item = (S, bool)>>(iter: T) -> Self {
        Self {
            flags: iter
                .into_iter()
                .map(|(f, enabled)| (f.into(), FlagResolution::from(enabled)))
                .collect(),
        }
    }
}

/// Keep items whose `roles` are empty or intersect `user_roles`.
pub fn filter_by_roles(items: Vec<MenuItem>, user_roles: &RoleSet) -> Vec<MenuItem> {
    prune(items, &|item| {
        item.roles.is_empty() || item.roles.iter().any(|r| user_roles.contains(r))
    })
}

/// Keep items without a feature flag, or whose flag resolved to `true`.
pub fn filter_by_flags(items: Vec<MenuItem>, flags: &FlagResolutions) -> Vec<MenuItem> {
    prune(items, &|item| {
        item.feature_flag
            .as_deref()
            .is_none_or(|flag| flags.is_enabled(flag))
    })
}

/// Role pass followed by the feature-flag pass.
pub fn filter_menu(
    items: Vec<MenuItem>,
    user_roles: &RoleSet,
    flags: &FlagResolutions,
) -> Vec<MenuItem> {
    filter_by_flags(filter_by_roles(items, user_roles), flags)
}

/// Depth-first pre-order filter; dropped parents take their subtree with them.
fn prune(items: Vec<MenuItem>, keep: &dyn Fn(&MenuItem) -> bool) -> Vec<MenuItem> {
    items
        .into_iter()
        .filter(|item| keep(item))
        .filter_map(|mut item| {
            let children = std::mem::take(&mut item.sub_menus);
            item.sub_menus = prune(children, keep);
            (!item.is_dead_container()).then_some(item)
        })
        .collect()
}
