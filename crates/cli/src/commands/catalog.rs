//! Catalog browsing commands.

use softbenny_storefront::storage::KeyValueStore;
use softbenny_storefront::{ProductFilter, Storefront};

/// Print the products matching the search term and category.
#[allow(clippy::print_stdout)]
pub fn products<S: KeyValueStore>(
    store: &Storefront<S>,
    search: Option<String>,
    category: Option<String>,
) {
    let filter = ProductFilter { search, category };

    let mut shown = 0_usize;
    for product in store.catalog().filter(&filter) {
        println!(
            "{:>4}  {:<32} {:>10}  [{}]",
            product.id.as_i32(),
            product.name,
            product.price.to_string(),
            product.category
        );
        shown += 1;
    }

    if shown == 0 {
        println!("No products found");
    }
}

/// Print the catalog categories.
#[allow(clippy::print_stdout)]
pub fn categories<S: KeyValueStore>(store: &Storefront<S>) {
    for category in store.catalog().categories() {
        println!("{category}");
    }
}
