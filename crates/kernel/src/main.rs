//! Central console menu tool
//!
//! Inspects the menu catalog as a given user would see it and drives a live
//! menu pipeline from stdin.
//!
//! Usage:
//!   central-menu --catalog config/menu.yml tree --roles STORE_MANAGER --flag transfers=true
//!   central-menu resolve --roles STORE_MANAGER --path /inventory/stock
//!   central-menu watch

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use futures_core::Stream;
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_stream::StreamExt;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use central_kernel::Config;
use central_kernel::config::{WatchCommand, parse_flag_assignment, parse_watch_command};
use central_kernel::menu::{
    FlagChannels, FlagResolutions, MatchStrategy, MenuCatalog, MenuItem, MenuService,
    NavigationChannel, RoleChannel, RoleSet, filter_menu, navigation_view, resolve_active, search,
    search_index,
};

/// Menu engine command-line interface.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Menu catalog file (overrides MENU_CATALOG).
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Prefix tie-break: "last" or "longest" (overrides MENU_MATCH_STRATEGY).
    #[arg(long, global = true)]
    strategy: Option<MatchStrategy>,

    #[command(subcommand)]
    command: Command,
}

/// Who is looking at the menu.
#[derive(Args, Debug)]
struct AccessArgs {
    /// Comma-separated roles (default: MENU_ROLES).
    #[arg(long, value_delimiter = ',')]
    roles: Option<Vec<String>>,

    /// Resolved feature flag, repeatable. Unlisted flags stay unresolved.
    #[arg(long = "flag", value_name = "NAME=BOOL")]
    flags: Vec<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every feature flag referenced by the catalog.
    Flags,
    /// Print the filtered menu tree.
    Tree {
        #[command(flatten)]
        access: AccessArgs,
        /// Hide search-only items.
        #[arg(long)]
        navigation: bool,
    },
    /// Resolve the active menu for a path.
    Resolve {
        #[command(flatten)]
        access: AccessArgs,
        /// Current route.
        #[arg(long)]
        path: String,
    },
    /// Search visible items by name.
    Search {
        #[command(flatten)]
        access: AccessArgs,
        query: String,
    },
    /// Run a live pipeline fed by stdin lines:
    /// `roles A,B`, `flag NAME true|false`, `nav PATH`.
    Watch,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_tracing();

    let cli = Cli::parse();
    let config = Config::from_env().context("failed to load configuration")?;

    let catalog_path = cli.catalog.unwrap_or_else(|| config.catalog_path.clone());
    let strategy = cli.strategy.unwrap_or(config.match_strategy);
    let catalog = MenuCatalog::load(&catalog_path).context("failed to load menu catalog")?;

    match cli.command {
        Command::Flags => print_json(&catalog.feature_flags()),
        Command::Tree { access, navigation } => {
            let tree = filter_for(&catalog, &access, &config)?;
            if navigation {
                print_json(&navigation_view(&tree))
            } else {
                print_json(&tree)
            }
        }
        Command::Resolve { access, path } => {
            let tree = filter_for(&catalog, &access, &config)?;
            print_json(&resolve_active(&tree, &path, strategy))
        }
        Command::Search { access, query } => {
            let tree = filter_for(&catalog, &access, &config)?;
            let index = search_index(&tree);
            print_json(&search(&index, &query))
        }
        Command::Watch => watch(catalog, strategy, &config).await,
    }
}

fn filter_for(catalog: &MenuCatalog, access: &AccessArgs, config: &Config) -> Result<Vec<MenuItem>> {
    let roles: RoleSet = access
        .roles
        .clone()
        .unwrap_or_else(|| config.default_roles.clone())
        .into_iter()
        .collect();

    let mut flags = FlagResolutions::pending(catalog.feature_flags());
    for assignment in &access.flags {
        let (name, enabled) = parse_flag_assignment(assignment)?;
        flags.resolve(&name, enabled);
    }

    Ok(filter_menu(catalog.master_tree(), &roles, &flags))
}

async fn watch(catalog: MenuCatalog, strategy: MatchStrategy, config: &Config) -> Result<()> {
    let service = MenuService::new(catalog, strategy);
    let roles = RoleChannel::new();
    let flags = FlagChannels::new();
    let router = NavigationChannel::new();

    if !config.default_roles.is_empty() {
        roles.set(config.default_roles.iter().cloned());
    }

    let mut filtered_rx = service.subscribe_filtered();
    let mut active_rx = service.subscribe_active();
    let pipeline = service.spawn(&roles, &flags, &router);

    let commands = stdin_lines();
    tokio::pin!(commands);

    loop {
        tokio::select! {
            line = commands.next() => {
                let Some(line) = line else { break };
                apply_command(&line, &roles, &flags, &router);
            }
            Ok(()) = filtered_rx.changed() => {
                let tree = filtered_rx.borrow_and_update().clone();
                print_json(&*tree)?;
            }
            Ok(()) = active_rx.changed() => {
                let active = active_rx.borrow_and_update().clone();
                print_json(&active)?;
            }
        }
    }

    info!("stdin closed, stopping");
    pipeline.shutdown().await;
    Ok(())
}

fn apply_command(
    line: &str,
    roles: &RoleChannel,
    flags: &FlagChannels,
    router: &NavigationChannel,
) {
    match parse_watch_command(line) {
        Ok(None) => {}
        Ok(Some(WatchCommand::Roles(names))) => roles.set(names),
        Ok(Some(WatchCommand::Flag(name, enabled))) => flags.set(&name, enabled),
        Ok(Some(WatchCommand::Navigate(path))) => router.navigate(path),
        Err(e) => warn!(error = %e, "ignoring command"),
    }
}

fn stdin_lines() -> impl Stream<Item = String> {
    async_stream::stream! {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => yield line,
                Ok(None) => break,
                Err(e) => {
                    warn!(error = %e, "failed to read stdin");
                    break;
                }
            }
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    println!("{json}");
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
