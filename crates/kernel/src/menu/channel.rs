//! In-process sources backed by tokio channels.
//!
//! Used by the CLI `watch` command and by tests to drive the pipeline by hand.

use dashmap::DashMap;
use tokio::sync::{broadcast, watch};
use tokio_stream::StreamExt;
use tokio_stream::wrappers::{BroadcastStream, WatchStream};
use tracing::warn;

use super::access::RoleSet;
use super::source::{
    FeatureFlagSource, FlagStream, NavigationEnd, NavigationSource, NavigationStream, RoleSource,
    RoleStream,
};

/// Buffered navigations per subscriber before it starts lagging.
const NAVIGATION_BUFFER: usize = 64;

/// Role source that replays the latest role set to late subscribers.
#[derive(Debug)]
pub struct RoleChannel {
    tx: watch::Sender<Option<RoleSet>>,
}

impl RoleChannel {
    /// No roles are known until [`RoleChannel::set`] is called.
    pub fn new() -> Self {
        let (tx, _) = watch::channel(None);
        Self { tx }
    }

    pub fn set<I, S>(&self, roles: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tx
            .send_replace(Some(roles.into_iter().map(Into::into).collect()));
    }
}

impl Default for RoleChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl RoleSource for RoleChannel {
    fn my_roles(&self) -> RoleStream {
        Box::pin(WatchStream::new(self.tx.subscribe()).filter_map(|roles| roles))
    }
}

/// Flag source with one replaying channel per flag, created on first use.
#[derive(Debug, Default)]
pub struct FlagChannels {
    flags: DashMap<String, watch::Sender<Option<bool>>>,
}

impl FlagChannels {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve `name` to `enabled`.
    pub fn set(&self, name: &str, enabled: bool) {
        self.flags
            .entry(name.to_string())
            .or_insert_with(|| watch::channel(None).0)
            .send_replace(Some(enabled));
    }
}

impl FeatureFlagSource for FlagChannels {
    fn flag(&self, name: &str) -> FlagStream {
        let rx = self
            .flags
            .entry(name.to_string())
            .or_insert_with(|| watch::channel(None).0)
            .subscribe();
        Box::pin(WatchStream::new(rx).filter_map(|value| value))
    }
}

/// Router stand-in. Navigations are not replayed to late subscribers.
#[derive(Debug)]
pub struct NavigationChannel {
    tx: broadcast::Sender<NavigationEnd>,
}

impl NavigationChannel {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(NAVIGATION_BUFFER);
        Self { tx }
    }

    /// Emit a completed navigation. Dropped if nobody is listening.
    pub fn navigate(&self, url: impl Into<String>) {
        let _ = self.tx.send(NavigationEnd::new(url));
    }
}

impl Default for NavigationChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl NavigationSource for NavigationChannel {
    fn navigation_ends(&self) -> NavigationStream {
        Box::pin(
            BroadcastStream::new(self.tx.subscribe()).filter_map(|event| match event {
                Ok(nav) => Some(nav),
                Err(e) => {
                    warn!(error = %e, "navigation subscriber lagged");
                    None
                }
            }),
        )
    }
}
