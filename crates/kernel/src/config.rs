//! Configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::error::{MenuError, MenuResult};
use crate::menu::MatchStrategy;

/// Menu engine configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the menu catalog file (default: ./config/menu.yml).
    pub catalog_path: PathBuf,

    /// Tie-break for overlapping route prefixes (default: last).
    pub match_strategy: MatchStrategy,

    /// Roles used by CLI commands when `--roles` is not given (comma-separated).
    pub default_roles: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let catalog_path = lookup("MENU_CATALOG")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./config/menu.yml"));

        let match_strategy = lookup("MENU_MATCH_STRATEGY")
            .unwrap_or_else(|| "last".to_string())
            .parse()
            .context("MENU_MATCH_STRATEGY must be 'last' or 'longest'")?;

        let default_roles = lookup("MENU_ROLES")
            .map(|v| split_list(&v))
            .unwrap_or_default();

        Ok(Self {
            catalog_path,
            match_strategy,
            default_roles,
        })
    }
}

/// Split a comma-separated list, dropping blanks.
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Parse a `NAME=true|false` feature flag assignment.
pub fn parse_flag_assignment(value: &str) -> MenuResult<(String, bool)> {
    let invalid = || MenuError::InvalidFlagAssignment(value.to_string());

    let (name, enabled) = value.split_once('=').ok_or_else(invalid)?;
    let name = name.trim();
    if name.is_empty() {
        return Err(invalid());
    }
    let enabled = match enabled.trim().to_ascii_lowercase().as_str() {
        "true" | "on" | "1" => true,
        "false" | "off" | "0" => false,
        _ => return Err(invalid()),
    };

    Ok((name.to_string(), enabled))
}

/// One line of the `watch` command's stdin grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchCommand {
    /// `roles A,B`: replace the current role set.
    Roles(Vec<String>),
    /// `flag NAME true|false` (or `flag NAME=true`): resolve one flag.
    Flag(String, bool),
    /// `nav PATH`: report a completed navigation.
    Navigate(String),
}

/// Parse a `watch` stdin line. Blank lines yield `None`.
pub fn parse_watch_command(line: &str) -> MenuResult<Option<WatchCommand>> {
    let line = line.trim();
    let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();

    let command = match verb {
        "" => return Ok(None),
        "roles" => WatchCommand::Roles(split_list(rest)),
        "flag" => {
            let (name, enabled) = parse_flag_assignment(&rest.replacen(' ', "=", 1))?;
            WatchCommand::Flag(name, enabled)
        }
        "nav" => WatchCommand::Navigate(rest.to_string()),
        other => return Err(MenuError::UnknownCommand(other.to_string())),
    };

    Ok(Some(command))
}
