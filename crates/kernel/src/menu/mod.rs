//! Menu access control and active route resolution.
//!
//! The master catalog is filtered per user and republished whenever inputs
//! change:
//! - Role filtering (any one listed role grants access)
//! - Feature-flag filtering (unresolved flags hide their items)
//! - Active route resolution against the filtered tree

mod access;
mod active;
mod catalog;
mod channel;
mod item;
mod search;
mod service;
mod source;
mod state;

pub use access::{
    FlagResolution, FlagResolutions, RoleSet, filter_by_flags, filter_by_roles, filter_menu,
};
pub use active::{ActiveMenu, Leaf, MatchStrategy, leaves, resolve_active};
pub use catalog::{CatalogGroup, MenuCatalog};
pub use channel::{FlagChannels, NavigationChannel, RoleChannel};
pub use item::MenuItem;
pub use search::{SearchEntry, navigation_view, search, search_index};
pub use service::{MenuPipeline, MenuService};
pub use source::{
    FeatureFlagSource, FlagStream, NavigationEnd, NavigationSource, NavigationStream, RoleSource,
    RoleStream,
};
pub use state::{AccessMenuState, MenuTree};
