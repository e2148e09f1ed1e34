#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Menu pipeline tests.
//!
//! Drives a live `MenuService` through channel-backed role, flag and router
//! sources and checks what gets published.

use central_kernel::menu::{
    FlagChannels, MatchStrategy, MenuCatalog, MenuItem, MenuService, NavigationChannel,
    RoleChannel,
};
use central_test_utils::{
    QUIET_PERIOD, TestSources, assert_no_active, assert_no_filtered, console_tree, names,
    secured_tree, service_for, wait_for_active, wait_for_filtered,
};

#[tokio::test]
async fn test_roles_before_flags_publish_conservative_tree() {
    let service = service_for(console_tree());
    let sources = TestSources::new();
    let pipeline = sources.spawn(&service);

    sources.roles.set(["SUPPORT"]);
    let tree = wait_for_filtered(&service, |t| !t.is_empty()).await;
    assert_eq!(names(&tree), vec!["Maintenance", "Inventory"]);
    assert_eq!(names(&tree[0].sub_menus), vec!["Log Levels"]);

    sources.flags.set("bulletins", true);
    let tree = wait_for_filtered(&service, |t| {
        t.first().is_some_and(|m| m.sub_menus.len() == 2)
    })
    .await;
    assert_eq!(
        names(&tree[0].sub_menus),
        vec!["Log Levels", "Technical Bulletins"]
    );

    pipeline.shutdown().await;
}

#[tokio::test]
async fn test_flags_before_roles_apply_once_roles_arrive() {
    let service = service_for(console_tree());
    let sources = TestSources::new();
    sources.flags.set("digital", true);
    let pipeline = sources.spawn(&service);

    assert_no_filtered(&service, |t| !t.is_empty()).await;

    sources.roles.set(Vec::<String>::new());
    let tree = wait_for_filtered(&service, |t| t.iter().any(|m| m.name == "Digital")).await;
    assert_eq!(names(&tree), vec!["Inventory", "Digital"]);

    pipeline.shutdown().await;
}

#[tokio::test]
async fn test_flag_resolved_false_stays_hidden() {
    let service = service_for(console_tree());
    let sources = TestSources::new();
    let pipeline = sources.spawn(&service);

    sources.flags.set("digital", false);
    sources.roles.set(["SUPPORT"]);
    sources.flags.set("bulletins", true);

    let tree = wait_for_filtered(&service, |t| {
        t.first().is_some_and(|m| m.sub_menus.len() == 2)
    })
    .await;
    assert!(tree.iter().all(|m| m.name != "Digital"));

    pipeline.shutdown().await;
}

#[tokio::test]
async fn test_navigation_resolves_active_menu() {
    let service = service_for(secured_tree());
    let sources = TestSources::new();
    let pipeline = sources.spawn(&service);

    sources.roles.set(["TEST_ROLE", "TEST_SUB_ROLE"]);
    sources.router.navigate("secured-root/secured1");

    let active = wait_for_active(&service, |a| a.sub_menu.is_some()).await;
    assert_eq!(active.root_name(), Some("Secured Root"));
    assert_eq!(active.sub_name(), Some("Secured1"));

    sources.router.navigate("somewhere/else");
    let active = wait_for_active(&service, |a| a.is_none()).await;
    assert!(active.root_menu.is_none());

    pipeline.shutdown().await;
}

#[tokio::test]
async fn test_role_change_reresolves_active_menu() {
    let service = service_for(secured_tree());
    let sources = TestSources::new();
    let pipeline = sources.spawn(&service);

    sources.roles.set(["TEST_ROLE", "TEST_SUB_ROLE"]);
    sources.router.navigate("secured-root/secured1");
    wait_for_active(&service, |a| a.sub_name() == Some("Secured1")).await;

    // Losing TEST_SUB_ROLE removes the active leaf from the tree.
    sources.roles.set(["TEST_ROLE", "TEST_SUB_ROLE2"]);
    let active = wait_for_active(&service, |a| a.is_none()).await;
    assert_eq!(active.root_name(), None);

    let tree = service.filtered();
    assert_eq!(names(&tree[0].sub_menus), vec!["Secured2"]);

    pipeline.shutdown().await;
}

#[tokio::test]
async fn test_navigation_before_roles_resolves_after_roles() {
    let service = service_for(secured_tree());
    let sources = TestSources::new();
    let pipeline = sources.spawn(&service);

    sources.router.navigate("secured-root/secured2/secured3");
    assert_no_active(&service, |a| !a.is_none()).await;

    sources
        .roles
        .set(["TEST_ROLE", "TEST_SUB_ROLE", "TEST_SUB_ROLE2"]);
    let active = wait_for_active(&service, |a| a.sub_menu.is_some()).await;
    assert_eq!(active.sub_name(), Some("Secured3"));
    assert_eq!(active.root_name(), Some("Secured Root"));

    pipeline.shutdown().await;
}

#[tokio::test]
async fn test_match_strategy_controls_tie_break() {
    let tree = vec![MenuItem::new("Inventory").with_sub_menus(vec![
        MenuItem::new("Inventory Orders").with_path("/inventory-order"),
        MenuItem::new("Inventory").with_path("/inventory"),
    ])];

    for (strategy, expected) in [
        (MatchStrategy::LastMatch, "Inventory"),
        (MatchStrategy::LongestPrefix, "Inventory Orders"),
    ] {
        let service = MenuService::new(MenuCatalog::new(tree.clone()), strategy);
        let sources = TestSources::new();
        let pipeline = sources.spawn(&service);

        sources.roles.set(Vec::<String>::new());
        sources.router.navigate("/inventory-order/17");

        let active = wait_for_active(&service, |a| a.sub_menu.is_some()).await;
        assert_eq!(active.sub_name(), Some(expected), "{strategy:?}");

        pipeline.shutdown().await;
    }
}

#[tokio::test]
async fn test_late_subscriber_sees_latest_tree() {
    let service = service_for(secured_tree());
    let sources = TestSources::new();
    let pipeline = sources.spawn(&service);

    sources.roles.set(["TEST_ROLE", "TEST_SUB_ROLE2"]);
    wait_for_filtered(&service, |t| !t.is_empty()).await;

    let rx = service.subscribe_filtered();
    assert_eq!(names(&rx.borrow()[0].sub_menus), vec!["Secured2"]);

    pipeline.shutdown().await;
}

#[tokio::test]
async fn test_master_tree_unchanged_by_pipeline() {
    let service = service_for(console_tree());
    let sources = TestSources::new();
    let pipeline = sources.spawn(&service);

    sources.roles.set(["SUPPORT"]);
    sources.flags.set("digital", true);
    sources.router.navigate("/digital/kiosk");
    wait_for_active(&service, |a| a.sub_name() == Some("Kiosk")).await;

    assert_eq!(service.state().master_tree(), console_tree());

    pipeline.shutdown().await;
}

#[tokio::test]
async fn test_dropped_pipeline_stops_publishing() {
    let service = service_for(secured_tree());
    let sources = TestSources::new();
    let pipeline = sources.spawn(&service);

    drop(pipeline);
    // Let the task observe the closed stop channel before any input arrives.
    tokio::time::sleep(QUIET_PERIOD).await;

    sources.roles.set(["TEST_ROLE", "TEST_SUB_ROLE"]);
    assert_no_filtered(&service, |t| !t.is_empty()).await;
    assert!(service.filtered().is_empty());
}

#[tokio::test]
async fn test_closed_role_source_keeps_serving_flags_and_navigation() {
    let service = service_for(console_tree());
    let roles = RoleChannel::new();
    let flags = FlagChannels::new();
    let router = NavigationChannel::new();
    let pipeline = service.spawn(&roles, &flags, &router);

    roles.set(["SUPPORT"]);
    wait_for_filtered(&service, |t| !t.is_empty()).await;

    // The role stream ends; the last role set stays in effect.
    drop(roles);

    flags.set("bulletins", true);
    let tree = wait_for_filtered(&service, |t| {
        t.first().is_some_and(|m| m.sub_menus.len() == 2)
    })
    .await;
    assert_eq!(
        names(&tree[0].sub_menus),
        vec!["Log Levels", "Technical Bulletins"]
    );

    router.navigate("/maintenance/bulletins");
    let active = wait_for_active(&service, |a| a.sub_menu.is_some()).await;
    assert_eq!(active.sub_name(), Some("Technical Bulletins"));
    assert_eq!(active.root_name(), Some("Maintenance"));

    assert!(!pipeline.is_finished());
    pipeline.shutdown().await;
}
