//! Product listing command.
//!
//! # Environment Variables
//!
//! - `CATALOG_PATH` - Product catalog JSON file

use mini_catalog_core::{ProductQuery, SortOption};
use mini_catalog_storefront::catalog::load_products;
use mini_catalog_storefront::config::CartConfig;
use tracing::info;

/// List products matching `search`, ordered by `sort`.
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded. No retry is attempted.
#[allow(clippy::print_stdout)]
pub async fn list(
    config: &CartConfig,
    search: &str,
    sort: SortOption,
) -> mini_catalog_storefront::Result<()> {
    let products = load_products(&config.catalog_path).await?;
    let query = ProductQuery::new(search, sort);
    let matches = query.apply(&products);

    info!(total = products.len(), shown = matches.len(), %sort, "Listing products");

    if matches.is_empty() {
        println!("No products found matching your search.");
        return Ok(());
    }

    for product in matches {
        let tags = if product.tags.is_empty() {
            String::new()
        } else {
            format!("  [{}]", product.tags.join(", "))
        };
        println!(
            "{:<16} {:<32} {:>12}{tags}",
            product.id,
            product.title,
            product.price.display_in(config.currency)
        );
    }

    Ok(())
}
