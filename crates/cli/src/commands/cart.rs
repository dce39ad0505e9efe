//! Cart commands.
//!
//! Each invocation opens a session on the file-backed snapshot, applies one
//! command, and exits. The snapshot is rewritten after every change, so the
//! cart carries over between invocations; the saved/unsaved distinction only
//! lives as long as the process.
//!
//! # Environment Variables
//!
//! - `CART_DATA_DIR` - Directory holding the snapshot file
//! - `CART_STORAGE_KEY` - Snapshot slot name
//! - `CATALOG_PATH` - Product catalog, used by `cart add`
//! - `CART_REMOTE_*` - Simulated remote store behaviour
//! - `CART_CURRENCY` - Currency used to display prices

use mini_catalog_core::catalog::find;
use mini_catalog_core::{CurrencyCode, ProductId};
use mini_catalog_storefront::AppError;
use mini_catalog_storefront::cart::{CartSession, SaveOutcome, SimulatedRemoteStore};
use mini_catalog_storefront::catalog::load_products;
use mini_catalog_storefront::config::CartConfig;
use mini_catalog_storefront::storage::FileStorage;
use tracing::info;

type Session = CartSession<SimulatedRemoteStore, FileStorage>;

fn open_session(config: &CartConfig) -> Session {
    CartSession::new(
        SimulatedRemoteStore::new(config.remote.clone()),
        FileStorage::new(&config.data_dir),
        config.storage_key.clone(),
    )
}

/// Print lines, totals, and save status.
#[allow(clippy::print_stdout)]
fn print_cart(session: &Session, currency: CurrencyCode) {
    if session.lines().is_empty() {
        println!("Your cart is empty.");
    } else {
        for line in session.lines() {
            println!(
                "{:<16} {:<32} {:>4} x {:>12} = {:>12}",
                line.product.id,
                line.product.title,
                line.quantity,
                line.product.price.display_in(currency),
                line.line_total().display_in(currency)
            );
        }
    }

    println!("Items: {}", session.total_item_count());
    println!("Subtotal: {}", session.subtotal().display_in(currency));

    if session.is_saving() {
        println!("Saving...");
    } else if session.has_unsaved_changes() {
        println!("You have unsaved changes.");
    }
    if let Some(error) = session.last_error() {
        println!("Error: {error}");
    }
}

/// Show the cart.
pub fn show(config: &CartConfig) {
    let session = open_session(config);
    print_cart(&session, config.currency);
}

/// Add a catalog product to the cart.
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded or has no such product.
pub async fn add(
    config: &CartConfig,
    product_id: &str,
    quantity: u32,
) -> mini_catalog_storefront::Result<()> {
    let products = load_products(&config.catalog_path).await?;
    let id = ProductId::from(product_id);
    let product = find(&products, &id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    let mut session = open_session(config);
    info!(product_id = %id, quantity, "Adding to cart");
    session.add_item(product, quantity);
    print_cart(&session, config.currency);
    Ok(())
}

/// Set a line's quantity.
pub fn update(config: &CartConfig, product_id: &str, quantity: i64) {
    let mut session = open_session(config);
    session.update_quantity(&ProductId::from(product_id), quantity);
    print_cart(&session, config.currency);
}

/// Remove a line.
pub fn remove(config: &CartConfig, product_id: &str) {
    let mut session = open_session(config);
    session.remove_item(&ProductId::from(product_id));
    print_cart(&session, config.currency);
}

/// Empty the cart.
pub fn clear(config: &CartConfig) {
    let mut session = open_session(config);
    session.clear();
    print_cart(&session, config.currency);
}

/// One-line result of `cart save`.
fn save_summary(outcome: &SaveOutcome) -> String {
    match outcome {
        SaveOutcome::Saved(lines) => format!("Cart saved ({} lines).", lines.len()),
        SaveOutcome::Failed(_) => "Cart save failed; the local cart is unchanged.".to_string(),
    }
}

/// Submit the cart to the remote store.
///
/// A failed save is reported, not returned as an error. A fresh session has
/// no edits beyond its stored snapshot, so the failure leaves the local cart
/// as it was and the message is part of the printed status.
///
/// # Errors
///
/// Returns an error only if a save is already in flight, which cannot happen
/// for a freshly opened session.
#[allow(clippy::print_stdout)]
pub async fn save(config: &CartConfig) -> mini_catalog_storefront::Result<()> {
    let mut session = open_session(config);
    println!("Saving...");

    let outcome = session.save().await?;
    println!("{}", save_summary(&outcome));

    print_cart(&session, config.currency);
    Ok(())
}
