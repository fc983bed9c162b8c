//! CLI entry and dispatch.

use anyhow::{Context, Result};
use clap::Parser;
use shelf_core::{Config, logging};

mod commands;

#[derive(Parser)]
#[command(name = "shelf")]
#[command(version)]
#[command(about = "Product catalog admin client")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Screen to open in the interactive UI (e.g. /products, /login)
    #[arg(long, default_value = "/")]
    route: String,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Print one page of products
    Products {
        /// 1-based page number
        #[arg(long, default_value_t = 1)]
        page: u32,

        /// Products per page (defaults to page_size from config)
        #[arg(long)]
        limit: Option<u32>,

        /// Search text
        #[arg(long, default_value = "")]
        search: String,

        /// Sort the page by brand, sku, rating, or price
        #[arg(long, value_name = "FIELD")]
        sort: Option<String>,

        /// Sort descending instead of ascending
        #[arg(long, requires = "sort")]
        desc: bool,
    },

    /// Sign in and remember the session
    Login {
        #[arg(short, long)]
        username: String,

        #[arg(short, long)]
        password: String,
    },

    /// Sign out (clear stored tokens)
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let _log_guard = match logging::init() {
        Ok(guard) => Some(guard),
        Err(err) => {
            eprintln!("Warning: logging disabled: {err:#}");
            None
        }
    };

    // one tokio runtime for everything
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;
    rt.block_on(async move { dispatch(cli).await })
}

async fn dispatch(cli: Cli) -> Result<()> {
    let Cli { command, route } = cli;

    // Config commands work even when the config file is broken
    let command = match command {
        Some(Commands::Config { command }) => {
            return match command {
                ConfigCommands::Path => {
                    commands::config::path();
                    Ok(())
                }
                ConfigCommands::Init => commands::config::init(),
            };
        }
        other => other,
    };

    let config = Config::load().context("load config")?;

    // default to the interactive UI
    let Some(command) = command else {
        return interactive(&config, &route).await;
    };

    match command {
        Commands::Products {
            page,
            limit,
            search,
            sort,
            desc,
        } => {
            commands::products::run(
                &config,
                commands::products::ProductsArgs {
                    page,
                    limit,
                    search: &search,
                    sort: sort.as_deref(),
                    desc,
                },
            )
            .await
        }
        Commands::Login { username, password } => {
            commands::auth::login(&config, &username, &password).await
        }
        Commands::Logout => commands::auth::logout(),
        Commands::Whoami => commands::auth::whoami(&config).await,
        Commands::Config { .. } => anyhow::bail!("config commands run before config is loaded"),
    }
}

#[cfg(feature = "tui")]
async fn interactive(config: &Config, route: &str) -> Result<()> {
    shelf_tui::run_interactive(config, route).await
}

#[cfg(not(feature = "tui"))]
async fn interactive(_config: &Config, route: &str) -> Result<()> {
    tracing::warn!(route, "interactive UI requested in a build without it");
    anyhow::bail!("This build has no interactive UI. Use `shelf products`.")
}
