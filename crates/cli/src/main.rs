//! Mini Catalog CLI - Browse products and manage the cart.
//!
//! # Usage
//!
//! ```bash
//! # List products, cheapest first
//! catalog-cli products
//!
//! # Search titles and sort by price, highest first
//! catalog-cli products --search mug --sort price-desc
//!
//! # Edit the cart (persisted locally after every change)
//! catalog-cli cart add mug -q 2
//! catalog-cli cart update mug 5
//! catalog-cli cart remove mug
//! catalog-cli cart clear
//!
//! # Show the cart, or submit it to the remote cart store
//! catalog-cli cart show
//! catalog-cli cart save
//! ```
//!
//! Configuration comes from the environment; see
//! `mini_catalog_storefront::config` for the variables.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use mini_catalog_core::SortOption;
use mini_catalog_storefront::config::CartConfig;

mod commands;

#[derive(Parser)]
#[command(name = "catalog-cli")]
#[command(author, version, about = "Mini Catalog product and cart tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List products
    Products {
        /// Only show products whose title contains this text (case-insensitive)
        #[arg(short, long, default_value = "")]
        search: String,

        /// Price ordering (`price-asc`, `price-desc`)
        #[arg(long, default_value = "price-asc")]
        sort: SortOption,
    },
    /// Manage the cart
    Cart {
        #[command(subcommand)]
        action: CartCommand,
    },
}

#[derive(Subcommand)]
enum CartCommand {
    /// Show cart contents and save status
    Show,
    /// Add a product to the cart
    Add {
        /// Product ID
        product_id: String,

        /// Units to add
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Set a line's quantity (0 or less removes it)
    Update {
        /// Product ID
        product_id: String,

        /// New quantity
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Remove a product from the cart
    Remove {
        /// Product ID
        product_id: String,
    },
    /// Remove every line
    Clear,
    /// Submit the cart to the remote cart store
    Save,
}

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        #[allow(clippy::print_stderr)]
        {
            eprintln!("{}", e.user_message());
        }
        std::process::exit(1);
    }
}

/// Initialize tracing with `EnvFilter`, writing to stderr so command output
/// stays clean on stdout.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "mini_catalog_storefront=warn,mini_catalog_cli=info".into());

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> mini_catalog_storefront::Result<()> {
    let config = CartConfig::from_env()?;

    match cli.command {
        Commands::Products { search, sort } => {
            commands::products::list(&config, &search, sort).await?;
        }
        Commands::Cart { action } => match action {
            CartCommand::Show => commands::cart::show(&config),
            CartCommand::Add {
                product_id,
                quantity,
            } => commands::cart::add(&config, &product_id, quantity).await?,
            CartCommand::Update {
                product_id,
                quantity,
            } => commands::cart::update(&config, &product_id, quantity),
            CartCommand::Remove { product_id } => commands::cart::remove(&config, &product_id),
            CartCommand::Clear => commands::cart::clear(&config),
            CartCommand::Save => commands::cart::save(&config).await?,
        },
    }
    Ok(())
}
