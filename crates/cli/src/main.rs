//! SoftBenny CLI - browse the catalog, manage an account, buy and print tickets.
//!
//! # Usage
//!
//! ```bash
//! # Browse
//! softbenny products --search mouse --category Accesorios
//! softbenny categories
//!
//! # Accounts
//! softbenny register -n "Ana" -e ana@example.com -p secret
//! softbenny login -e ana@example.com -p secret
//! softbenny whoami
//! softbenny logout
//!
//! # Purchases
//! softbenny buy --item 8:2 --item 3 --ticket ticket.html
//! softbenny history
//! softbenny ticket 3F2A9C1E --out ticket.html
//! ```
//!
//! The session survives between invocations; the cart lives only for the
//! duration of one `buy`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use secrecy::ExposeSecret;
use softbenny_storefront::{Storefront, StorefrontConfig};

mod commands;

use commands::orders::CartItem;

#[derive(Parser)]
#[command(name = "softbenny")]
#[command(author, version, about = "SoftBenny storefront")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List catalog products
    Products {
        /// Case-insensitive search in name and description
        #[arg(short, long)]
        search: Option<String>,

        /// Only this category ("Todos" for all)
        #[arg(short, long)]
        category: Option<String>,
    },
    /// List catalog categories
    Categories,
    /// Create an account and log in
    Register {
        /// Display name
        #[arg(short, long)]
        name: String,

        /// Email address
        #[arg(short, long)]
        email: String,

        /// Password
        #[arg(short, long)]
        password: String,
    },
    /// Log in to an existing account
    Login {
        /// Email address
        #[arg(short, long)]
        email: String,

        /// Password
        #[arg(short, long)]
        password: String,
    },
    /// Log out
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Fill a cart and check out
    Buy {
        /// Product to add, as `ID` or `ID:QUANTITY` (repeatable)
        #[arg(short, long = "item", required = true)]
        items: Vec<CartItem>,

        /// Also write the receipt to this file
        #[arg(long)]
        ticket: Option<PathBuf>,
    },
    /// List your purchases
    History,
    /// Render the receipt for one of your purchases
    Ticket {
        /// Order number (first 8 characters) or full purchase ID
        order: String,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.expose_secret(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR => sentry_tracing::EventFilter::Event,
        tracing::Level::WARN | tracing::Level::INFO => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            #[allow(clippy::print_stderr)]
            {
                eprintln!("softbenny: {e}");
            }
            return ExitCode::FAILURE;
        }
    };

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "softbenny=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    match run(cli, config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            e.capture();
            #[allow(clippy::print_stderr)]
            {
                eprintln!("softbenny: {e}");
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli, config: StorefrontConfig) -> softbenny_storefront::Result<()> {
    let mut store = Storefront::open(config)?;

    match cli.command {
        Commands::Products { search, category } => {
            commands::catalog::products(&store, search, category);
        }
        Commands::Categories => commands::catalog::categories(&store),
        Commands::Register {
            name,
            email,
            password,
        } => commands::account::register(&mut store, &name, &email, password)?,
        Commands::Login { email, password } => {
            commands::account::login(&mut store, &email, password)?;
        }
        Commands::Logout => commands::account::logout(&mut store)?,
        Commands::Whoami => commands::account::whoami(&store),
        Commands::Buy { items, ticket } => {
            commands::orders::buy(&mut store, &items, ticket.as_deref())?;
        }
        Commands::History => commands::orders::history(&store),
        Commands::Ticket { order, out } => {
            commands::orders::ticket(&store, &order, out.as_deref())?;
        }
    }
    Ok(())
}
