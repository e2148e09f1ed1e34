//! Holder for the master catalog and the currently published filtered tree.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use super::catalog::MenuCatalog;
use super::item::MenuItem;

/// Snapshot of a published filtered tree.
pub type MenuTree = Arc<Vec<MenuItem>>;

/// Master catalog plus the latest filtered view.
///
/// Subscribers see the latest published tree immediately and every later
/// update; intermediate values may be skipped if a subscriber lags.
#[derive(Debug)]
pub struct AccessMenuState {
    catalog: MenuCatalog,
    filtered: watch::Sender<MenuTree>,
}

impl AccessMenuState {
    /// Create the state. Nothing is visible until the first publish.
    pub fn new(catalog: MenuCatalog) -> Self {
        let (filtered, _) = watch::channel(Arc::new(Vec::new()));
        Self { catalog, filtered }
    }

    pub fn catalog(&self) -> &MenuCatalog {
        &self.catalog
    }

    /// Deep copy of the master tree.
    pub fn master_tree(&self) -> Vec<MenuItem> {
        self.catalog.master_tree()
    }

    /// Replace the broadcast filtered tree.
    pub fn publish_filtered(&self, tree: Vec<MenuItem>) {
        debug!(roots = tree.len(), "publishing filtered menu");
        self.filtered.send_replace(Arc::new(tree));
    }

    /// Latest published tree.
    pub fn current_filtered(&self) -> MenuTree {
        Arc::clone(&self.filtered.borrow())
    }

    pub fn subscribe(&self) -> watch::Receiver<MenuTree> {
        self.filtered.subscribe()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn state() -> AccessMenuState {
        AccessMenuState::new(MenuCatalog::new(vec![
            MenuItem::new("Stores").with_path("/stores"),
            MenuItem::new("Customers").with_path("/customers"),
        ]))
    }

    #[test]
    fn starts_with_empty_filtered_tree() {
        assert!(state().current_filtered().is_empty());
    }

    #[test]
    fn master_tree_does_not_alias_catalog() {
        let state = state();
        let mut copy = state.master_tree();
        copy.clear();
        assert_eq!(state.master_tree().len(), 2);
    }

    #[tokio::test]
    async fn late_subscriber_sees_latest_value() {
        let state = state();
        state.publish_filtered(vec![MenuItem::new("First").with_path("/1")]);
        state.publish_filtered(vec![MenuItem::new("Second").with_path("/2")]);

        let rx = state.subscribe();
        assert_eq!(rx.borrow()[0].name, "Second");
    }

    #[tokio::test]
    async fn subscriber_observes_updates() {
        let state = state();
        let mut rx = state.subscribe();

        state.publish_filtered(state.master_tree());
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().len(), 2);
        assert_eq!(state.current_filtered().len(), 2);
    }
}
