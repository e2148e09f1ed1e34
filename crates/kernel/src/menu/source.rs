//! Contracts for the asynchronous inputs of the menu pipeline.
//!
//! Role, feature-flag and navigation sources are owned elsewhere (session,
//! flag service, router). The pipeline only needs a stream from each.

use std::pin::Pin;

use futures_core::Stream;

use super::access::RoleSet;

/// Stream of the current user's role sets.
pub type RoleStream = Pin<Box<dyn Stream<Item = RoleSet> + Send>>;

/// Stream of resolved values for a single feature flag.
pub type FlagStream = Pin<Box<dyn Stream<Item = bool> + Send>>;

/// Stream of completed navigations.
pub type NavigationStream = Pin<Box<dyn Stream<Item = NavigationEnd> + Send>>;

/// A completed navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationEnd {
    /// Path after redirects.
    pub url: String,
}

impl NavigationEnd {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

/// Provides the user's roles; may emit more than once per session.
pub trait RoleSource: Send + Sync {
    fn my_roles(&self) -> RoleStream;
}

/// Evaluates feature flags by name.
pub trait FeatureFlagSource: Send + Sync {
    fn flag(&self, name: &str) -> FlagStream;
}

/// Emits one event per completed navigation.
pub trait NavigationSource: Send + Sync {
    fn navigation_ends(&self) -> NavigationStream;
}
