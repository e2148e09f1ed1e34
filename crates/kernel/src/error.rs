//! Menu engine error types.
//!
//! Filtering and route resolution are infallible in-memory transforms. Errors
//! only arise while loading configuration: reading the catalog file, parsing
//! it, or interpreting environment/CLI values.

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while configuring the menu engine.
#[derive(Debug, Error)]
pub enum MenuError {
    /// The catalog file could not be read.
    #[error("menu catalog '{}': failed to read: {source}", path.display())]
    CatalogRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The catalog file was read but is not a valid catalog document.
    #[error("menu catalog '{}': failed to parse: {details}", path.display())]
    CatalogParse { path: PathBuf, details: String },

    /// The catalog file extension does not map to a known format.
    #[error(
        "menu catalog '{}': unsupported format. Use one of: .yml, .yaml, .json, .toml",
        path.display()
    )]
    UnsupportedCatalogFormat { path: PathBuf },

    /// `MENU_MATCH_STRATEGY` (or `--strategy`) held an unknown value.
    #[error("unknown match strategy '{0}'. Valid strategies: last, longest")]
    InvalidMatchStrategy(String),

    /// A `name=bool` flag assignment could not be parsed.
    #[error("invalid feature flag assignment '{0}'. Expected NAME=true or NAME=false")]
    InvalidFlagAssignment(String),

    /// A `watch` stdin line started with an unknown verb.
    #[error("unknown command '{0}'. Expected roles, flag or nav")]
    UnknownCommand(String),
}

/// Result type alias using MenuError.
pub type MenuResult<T> = Result<T, MenuError>;
