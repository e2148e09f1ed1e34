//! Central console kernel library.
//!
//! Exposes the menu engine for embedding and integration testing.
//! The `central-menu` binary wraps it in a command-line tool.

pub mod config;
pub mod error;
pub mod menu;

pub use config::Config;
pub use error::{MenuError, MenuResult};
