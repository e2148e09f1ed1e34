//! Central console test utilities.
//!
//! Helpers for integration testing: sample menu trees, role and flag
//! builders, and channel-backed sources for driving a live menu pipeline.

use std::time::Duration;

use central_kernel::menu::{
    ActiveMenu, FlagChannels, FlagResolutions, MenuCatalog, MenuItem, MenuPipeline, MenuService,
    MenuTree, NavigationChannel, RoleChannel, RoleSet,
};

/// How long pipeline helpers wait for a matching publish.
pub const PUBLISH_TIMEOUT: Duration = Duration::from_secs(5);

/// How long "nothing was published" checks give the pipeline to react.
pub const QUIET_PERIOD: Duration = Duration::from_millis(50);

/// Build a role set from string literals.
pub fn roles(names: &[&str]) -> RoleSet {
    names.iter().map(|r| r.to_string()).collect()
}

/// Build resolved flags from `(name, enabled)` pairs.
pub fn flags(values: &[(&str, bool)]) -> FlagResolutions {
    values.iter().map(|(f, enabled)| (*f, *enabled)).collect()
}

/// The secured sample tree.
///
/// `Secured Root` requires `TEST_ROLE`; `Secured1` requires `TEST_SUB_ROLE`;
/// `Secured2` and its child `Secured3` require `TEST_SUB_ROLE2`.
pub fn secured_tree() -> Vec<MenuItem> {
    vec![
        MenuItem::new("Secured Root")
            .with_icon("lock")
            .with_roles(["TEST_ROLE"])
            .with_sub_menus(vec![
                MenuItem::new("Secured1")
                    .with_path("secured-root/secured1")
                    .with_roles(["TEST_SUB_ROLE"]),
                MenuItem::new("Secured2")
                    .with_path("secured-root/secured2")
                    .with_roles(["TEST_SUB_ROLE2"])
                    .with_sub_menus(vec![
                        MenuItem::new("Secured3")
                            .with_path("secured-root/secured2/secured3")
                            .with_roles(["TEST_SUB_ROLE2"]),
                    ]),
            ]),
    ]
}

/// A small console catalog spanning several domains, with flagged and
/// search-only entries.
pub fn console_tree() -> Vec<MenuItem> {
    vec![
        MenuItem::new("Maintenance")
            .with_icon("build")
            .with_roles(["SUPPORT"])
            .with_sub_menus(vec![
                MenuItem::new("Log Levels").with_path("/maintenance/log-levels"),
                MenuItem::new("Technical Bulletins")
                    .with_path("/maintenance/bulletins")
                    .with_feature_flag("bulletins"),
            ]),
        MenuItem::new("Inventory")
            .with_icon("inventory")
            .with_sub_menus(vec![
                MenuItem::new("Inventory").with_path("/inventory"),
                MenuItem::new("Inventory Orders")
                    .with_path("/inventory-order")
                    .with_roles(["INVENTORY_ADMIN"]),
                MenuItem::new("Part Lookup")
                    .with_path("/inventory/lookup")
                    .searchable_only(),
            ]),
        MenuItem::new("Digital")
            .with_icon("devices")
            .with_feature_flag("digital")
            .with_sub_menus(vec![MenuItem::new("Kiosk").with_path("/digital/kiosk")]),
    ]
}

/// Channel-backed sources for one pipeline.
#[derive(Debug, Default)]
pub struct TestSources {
    pub roles: RoleChannel,
    pub flags: FlagChannels,
    pub router: NavigationChannel,
}

impl TestSources {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start `service` against these sources.
    pub fn spawn(&self, service: &MenuService) -> MenuPipeline {
        service.spawn(&self.roles, &self.flags, &self.router)
    }
}

/// Service over `tree` with the default match strategy.
pub fn service_for(tree: Vec<MenuItem>) -> MenuService {
    MenuService::new(MenuCatalog::new(tree), Default::default())
}

/// Wait until the published filtered tree satisfies `pred`.
pub async fn wait_for_filtered(
    service: &MenuService,
    pred: impl FnMut(&MenuTree) -> bool,
) -> MenuTree {
    let mut rx = service.subscribe_filtered();
    let waited = tokio::time::timeout(PUBLISH_TIMEOUT, rx.wait_for(pred)).await;
    match waited {
        Ok(Ok(tree)) => tree.clone(),
        Ok(Err(_)) => panic!("menu service dropped while waiting for filtered tree"),
        Err(_) => panic!("timed out waiting for filtered tree"),
    }
}

/// Wait until the published active menu satisfies `pred`.
pub async fn wait_for_active(
    service: &MenuService,
    pred: impl FnMut(&ActiveMenu) -> bool,
) -> ActiveMenu {
    let mut rx = service.subscribe_active();
    let waited = tokio::time::timeout(PUBLISH_TIMEOUT, rx.wait_for(pred)).await;
    match waited {
        Ok(Ok(active)) => active.clone(),
        Ok(Err(_)) => panic!("menu service dropped while waiting for active menu"),
        Err(_) => panic!("timed out waiting for active menu"),
    }
}

/// Assert that no filtered tree satisfying `pred` is published within
/// [`QUIET_PERIOD`].
pub async fn assert_no_filtered(service: &MenuService, pred: impl FnMut(&MenuTree) -> bool) {
    let mut rx = service.subscribe_filtered();
    let waited = tokio::time::timeout(QUIET_PERIOD, rx.wait_for(pred)).await;
    if let Ok(Ok(tree)) = waited {
        panic!("unexpected filtered tree published: {:?}", names(&tree));
    }
}

/// Assert that no active menu satisfying `pred` is published within
/// [`QUIET_PERIOD`].
pub async fn assert_no_active(service: &MenuService, pred: impl FnMut(&ActiveMenu) -> bool) {
    let mut rx = service.subscribe_active();
    let waited = tokio::time::timeout(QUIET_PERIOD, rx.wait_for(pred)).await;
    if let Ok(Ok(active)) = waited {
        panic!("unexpected active menu published: {:?}", *active);
    }
}

/// Names of the given items, in order.
pub fn names(items: &[MenuItem]) -> Vec<&str> {
    items.iter().map(|i| i.name.as_str()).collect()
}
