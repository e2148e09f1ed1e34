//! Menu service: recomputes the filtered tree and the active menu as roles,
//! feature flags and navigations arrive.
//!
//! A single task owns the latest value of every input and reacts to one event
//! at a time, so each publish reflects one consistent set of inputs:
//!
//! - roles event: refilter and publish, then re-resolve if a path is known
//! - flag event: same, but only if the flag's resolution actually changed
//! - navigation event: re-resolve against the current filtered tree
//!
//! Nothing is published until roles are known. Flags start unresolved, which
//! hides flagged items until a value arrives.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_stream::{StreamExt, StreamMap};
use tracing::{debug, info};

use super::access::{FlagResolutions, RoleSet, filter_menu};
use super::active::{ActiveMenu, MatchStrategy, resolve_active};
use super::catalog::MenuCatalog;
use super::source::{
    FeatureFlagSource, FlagStream, NavigationSource, NavigationStream, RoleSource, RoleStream,
};
use super::state::{AccessMenuState, MenuTree};

/// Publishes the filtered menu tree and the active menu.
#[derive(Clone)]
pub struct MenuService {
    inner: Arc<MenuServiceInner>,
}

struct MenuServiceInner {
    state: AccessMenuState,
    active: watch::Sender<ActiveMenu>,
    strategy: MatchStrategy,
}

impl MenuService {
    pub fn new(catalog: MenuCatalog, strategy: MatchStrategy) -> Self {
        let (active, _) = watch::channel(ActiveMenu::default());
        Self {
            inner: Arc::new(MenuServiceInner {
                state: AccessMenuState::new(catalog),
                active,
                strategy,
            }),
        }
    }

    pub fn state(&self) -> &AccessMenuState {
        &self.inner.state
    }

    pub fn strategy(&self) -> MatchStrategy {
        self.inner.strategy
    }

    /// Latest filtered tree.
    pub fn filtered(&self) -> MenuTree {
        self.inner.state.current_filtered()
    }

    pub fn subscribe_filtered(&self) -> watch::Receiver<MenuTree> {
        self.inner.state.subscribe()
    }

    /// Latest active menu.
    pub fn active_menu(&self) -> ActiveMenu {
        self.inner.active.borrow().clone()
    }

    pub fn subscribe_active(&self) -> watch::Receiver<ActiveMenu> {
        self.inner.active.subscribe()
    }

    /// Subscribe to the sources and start recomputing in a background task.
    ///
    /// One flag stream is opened per distinct flag in the catalog.
    pub fn spawn(
        &self,
        roles: &dyn RoleSource,
        flags: &dyn FeatureFlagSource,
        router: &dyn NavigationSource,
    ) -> MenuPipeline {
        let flag_names = self.inner.state.catalog().feature_flags();

        let mut flag_streams: StreamMap<String, FlagStream> = StreamMap::new();
        for name in &flag_names {
            flag_streams.insert(name.clone(), flags.flag(name));
        }

        let (stop_tx, stop_rx) = watch::channel(false);
        let inputs = PipelineInputs {
            roles: None,
            flags: FlagResolutions::pending(flag_names),
            path: None,
        };

        info!(
            flags = flag_streams.len(),
            strategy = ?self.inner.strategy,
            "starting menu pipeline"
        );

        let inner = Arc::clone(&self.inner);
        let handle = tokio::spawn(run_pipeline(
            inner,
            inputs,
            roles.my_roles(),
            flag_streams,
            router.navigation_ends(),
            stop_rx,
        ));

        MenuPipeline { stop_tx, handle }
    }
}

/// Handle to a running pipeline task.
pub struct MenuPipeline {
    stop_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl MenuPipeline {
    /// Stop the pipeline and wait for the task to finish.
    pub async fn shutdown(self) {
        let _ = self.stop_tx.send(true);
        let _ = self.handle.await;
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

/// Latest value of every input.
struct PipelineInputs {
    roles: Option<RoleSet>,
    flags: FlagResolutions,
    path: Option<String>,
}

async fn run_pipeline(
    inner: Arc<MenuServiceInner>,
    mut inputs: PipelineInputs,
    mut roles: RoleStream,
    mut flags: StreamMap<String, FlagStream>,
    mut navigations: NavigationStream,
    mut stop_rx: watch::Receiver<bool>,
) {
    let mut roles_open = true;
    let mut navigations_open = true;

    loop {
        tokio::select! {
            changed = stop_rx.changed() => {
                if changed.is_err() || *stop_rx.borrow() {
                    debug!("menu pipeline stopping");
                    break;
                }
            }
            next = roles.next(), if roles_open => match next {
                Some(user_roles) => {
                    debug!(roles = ?user_roles, "roles updated");
                    inputs.roles = Some(user_roles);
                    inner.refilter(&inputs);
                }
                None => roles_open = false,
            },
            Some((name, enabled)) = flags.next(), if !flags.is_empty() => {
                if inputs.flags.resolve(&name, enabled) {
                    debug!(flag = %name, enabled, "feature flag resolved");
                    inner.refilter(&inputs);
                }
            }
            next = navigations.next(), if navigations_open => match next {
                Some(nav) => {
                    inputs.path = Some(nav.url);
                    if inputs.roles.is_some() {
                        inner.reresolve(&inputs);
                    }
                }
                None => navigations_open = false,
            },
        }
    }

    info!("menu pipeline stopped");
}

impl MenuServiceInner {
    fn refilter(&self, inputs: &PipelineInputs) {
        let Some(user_roles) = &inputs.roles else {
            return;
        };

        let filtered = filter_menu(self.state.master_tree(), user_roles, &inputs.flags);
        self.state.publish_filtered(filtered);

        if inputs.path.is_some() {
            self.reresolve(inputs);
        }
    }

    fn reresolve(&self, inputs: &PipelineInputs) {
        let Some(path) = &inputs.path else {
            return;
        };

        let tree = self.state.current_filtered();
        let active = resolve_active(&tree, path, self.strategy);
        debug!(
            path = %path,
            root = ?active.root_name(),
            sub = ?active.sub_name(),
            "active menu resolved"
        );
        self.active.send_replace(active);
    }
}
