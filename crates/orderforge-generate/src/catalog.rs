//! Seed catalog: filters product rows down to the sellable set.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::errors::GenerationError;
use crate::model::{OrderConstraints, Product, round_money};

/// Status value marking a product row as sellable.
pub const AVAILABLE_STATUS: &str = "Available";

/// Raw row of the products seed.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductRow {
    pub product_id: String,
    pub seller_sku: String,
    pub price: String,
    pub status: String,
}

/// Filter rows to available products and parse prices as exact decimals.
///
/// Fails when any retained price is unparsable, or when fewer products
/// survive than a single order needs.
pub fn load_products<I>(
    rows: I,
    constraints: &OrderConstraints,
) -> Result<Vec<Product>, GenerationError>
where
    I: IntoIterator<Item = ProductRow>,
{
    let mut products = Vec::new();
    for row in rows {
        if row.status != AVAILABLE_STATUS {
            continue;
        }
        let price = Decimal::from_str(row.price.trim()).map_err(|err| {
            GenerationError::DataFormat(format!(
                "invalid price '{}' for product '{}': {err}",
                row.price, row.product_id
            ))
        })?;
        products.push(Product {
            product_id: row.product_id,
            sku: row.seller_sku,
            price: round_money(price),
        });
    }

    if products.len() < constraints.min_items as usize {
        return Err(GenerationError::InsufficientData(format!(
            "only {} available products, need at least {} to build an order",
            products.len(),
            constraints.min_items
        )));
    }

    Ok(products)
}
