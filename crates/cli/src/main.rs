//! Oud Cart CLI - one storefront session per invocation.
//!
//! # Usage
//!
//! ```bash
//! # List the catalog
//! oud-cart catalog
//!
//! # Add product 4 to the cart, then bump it once more
//! oud-cart add 4
//! oud-cart inc 4
//!
//! # Add something that is not in the catalog
//! oud-cart add-item --name "Gift wrap" --price 15
//!
//! # Try a coupon against the current total
//! oud-cart coupon DISCOUNT10
//!
//! # Run the recommendation wizard and add the result
//! oud-cart wizard "evening out" "warm woods" "roses" --add
//! ```
//!
//! # Commands
//!
//! - `catalog` - Show the product grid
//! - `show` - Show the cart
//! - `add`, `add-item`, `inc`, `dec`, `remove` - Change the cart
//! - `coupon` - Show the discounted total for a code
//! - `wizard` - Answer the three wizard questions
//!
//! Configuration comes from the environment (see
//! [`oud_cart_storefront::config`]). Logs go to stderr.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use oud_cart_core::{Price, ProductId};
use oud_cart_storefront::config::StorefrontConfig;
use oud_cart_storefront::error::AppError;
use oud_cart_storefront::render::Format;
use rust_decimal::Decimal;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "oud-cart")]
#[command(author, version, about = "Oud Cart storefront session")]
struct Cli {
    /// Print HTML fragments instead of plain text
    #[arg(long, global = true)]
    html: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the product grid
    Catalog,
    /// Show the cart
    Show,
    /// Add a catalog product to the cart
    Add {
        /// Product id
        id: ProductId,
    },
    /// Add an item that is not in the catalog
    AddItem {
        /// Item name; adding the same name again bumps its quantity
        #[arg(short, long)]
        name: String,

        /// Unit price
        #[arg(short, long, value_parser = parse_price)]
        price: Price,

        /// Image URL
        #[arg(short, long, default_value = "")]
        image: String,
    },
    /// Add one unit of a cart line
    Inc {
        /// Product id
        id: ProductId,
    },
    /// Remove one unit of a cart line, dropping it at zero
    Dec {
        /// Product id
        id: ProductId,
    },
    /// Remove a cart line
    Remove {
        /// Product id
        id: ProductId,
    },
    /// Apply a coupon code to the current total
    Coupon {
        /// Coupon code
        code: String,
    },
    /// Answer the recommendation wizard
    Wizard {
        /// One answer per question
        #[arg(num_args = 3, required = true)]
        answers: Vec<String>,

        /// Add the recommended product to the cart
        #[arg(long)]
        add: bool,
    },
}

fn parse_price(raw: &str) -> Result<Price, String> {
    let amount: Decimal = raw.trim().parse().map_err(|e| format!("{e}"))?;
    Price::new(amount).map_err(|e| e.to_string())
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

fn init_tracing() {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "oud_cart_storefront=info,oud_cart_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Load configuration from environment (needed for Sentry init)
    let config = StorefrontConfig::from_env();

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = config.as_ref().ok().and_then(init_sentry);
    init_tracing();

    let result = match config {
        Ok(config) => run(cli, &config).await,
        Err(e) => Err(AppError::from(e)),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            e.report();
            if e.is_fatal() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            }
        }
    }
}

async fn run(cli: Cli, config: &StorefrontConfig) -> Result<(), AppError> {
    let format = if cli.html { Format::Html } else { Format::Text };

    match cli.command {
        Commands::Catalog => commands::catalog::show(config, format).await,
        Commands::Show => commands::cart::show(config, format).await,
        Commands::Add { id } => commands::cart::add(config, format, id).await,
        Commands::AddItem { name, price, image } => {
            commands::cart::add_item(config, format, &name, price, &image).await
        }
        Commands::Inc { id } => commands::cart::increment(config, format, id).await,
        Commands::Dec { id } => commands::cart::decrement(config, format, id).await,
        Commands::Remove { id } => commands::cart::remove(config, format, id).await,
        Commands::Coupon { code } => commands::cart::coupon(config, format, &code).await,
        Commands::Wizard { answers, add } => {
            commands::wizard::run(config, format, &answers, add).await
        }
    }
}
