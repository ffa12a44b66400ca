//! Order assembly: turns a buyer plan and a catalog into order-line rows.

use chrono::{DateTime, Duration, Timelike, Utc};
use rand::Rng;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::errors::GenerationError;
use crate::model::{Buyer, CURRENCY, OrderConstraints, OrderLine, Product, round_money};

/// Distinct items per order after capping by catalog size.
pub fn effective_max_items(products: &[Product], constraints: &OrderConstraints) -> u32 {
    constraints.max_items.min(products.len() as u32)
}

/// Build the line rows for every planned order.
///
/// Lines are grouped by order in plan order; within an order they follow the
/// product draw order. All constraint checks happen up front, so assembly
/// never fails mid-stream.
pub fn assemble_orders<R: Rng>(
    plan: &[&Buyer],
    products: &[Product],
    processed_at: DateTime<Utc>,
    constraints: &OrderConstraints,
    rng: &mut R,
) -> Result<Vec<OrderLine>, GenerationError> {
    let max_items = effective_max_items(products, constraints);
    if max_items < constraints.min_items {
        return Err(GenerationError::InsufficientData(format!(
            "catalog holds {} products, orders need at least {} distinct items",
            products.len(),
            constraints.min_items
        )));
    }

    let processed_at = truncate_to_seconds(processed_at);
    let mut rows = Vec::new();

    for buyer in plan {
        let order_id = random_uuid(rng);
        let created_at = random_created_at(rng, processed_at);
        let item_count = rng.random_range(constraints.min_items..=max_items) as usize;

        for product in sample_distinct(products, item_count, rng) {
            let quantity = rng.random_range(1..=5u32);
            let total_price = round_money(product.price * Decimal::from(quantity));
            rows.push(OrderLine {
                order_id,
                created_at,
                processed_at,
                order_item_id: random_uuid(rng),
                product_id: product.product_id.clone(),
                sku: product.sku.clone(),
                quantity,
                price: product.price,
                currency: CURRENCY.to_string(),
                total_price,
                customer_id: buyer.identifier.clone(),
                is_b2b: buyer.is_b2b,
            });
        }
    }

    Ok(rows)
}

/// UUID in v4 format whose bytes come from the run's seeded stream, keeping
/// identifiers on the reproducibility contract.
fn random_uuid<R: Rng>(rng: &mut R) -> Uuid {
    let mut bytes = [0u8; 16];
    rng.fill_bytes(&mut bytes);
    uuid::Builder::from_random_bytes(bytes).into_uuid()
}

/// Uniform timestamp between midnight UTC and `processed_at`, at second
/// precision. A run at exactly midnight collapses to `processed_at`.
fn random_created_at<R: Rng>(rng: &mut R, processed_at: DateTime<Utc>) -> DateTime<Utc> {
    let start_of_day = processed_at
        .date_naive()
        .and_hms_opt(0, 0, 0)
        .map(|naive| naive.and_utc())
        .unwrap_or(processed_at);
    let span = (processed_at - start_of_day).num_seconds();
    if span <= 0 {
        return processed_at;
    }
    start_of_day + Duration::seconds(rng.random_range(0..=span))
}

/// Sample `count` distinct products uniformly without replacement, preserving
/// draw order.
fn sample_distinct<'a, R: Rng>(
    products: &'a [Product],
    count: usize,
    rng: &mut R,
) -> Vec<&'a Product> {
    let mut remaining: Vec<usize> = (0..products.len()).collect();
    let mut picked = Vec::with_capacity(count);
    for _ in 0..count {
        let slot = rng.random_range(0..remaining.len());
        picked.push(&products[remaining.swap_remove(slot)]);
    }
    picked
}

fn truncate_to_seconds(ts: DateTime<Utc>) -> DateTime<Utc> {
    ts.with_nanosecond(0).unwrap_or(ts)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::str::FromStr;

    use chrono::TimeZone;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    fn catalog(count: usize) -> Vec<Product> {
        (0..count)
            .map(|idx| Product {
                product_id: format!("p{idx}"),
                sku: format!("SKU-{idx}"),
                price: Decimal::from_str("5.50").expect("price"),
            })
            .collect()
    }

    fn buyer() -> Buyer {
        Buyer {
            identifier: "c1".to_string(),
            is_b2b: false,
        }
    }

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 14, 12, 0, 0).single().expect("timestamp")
    }

    #[test]
    fn item_counts_stay_within_bounds() {
        let products = catalog(8);
        let constraints = OrderConstraints::api();
        let owner = buyer();
        let plan = vec![&owner; 10];
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        // cap 4 exceeded by the handcrafted plan on purpose; the assembler
        // does not re-check the planner's invariant
        let rows = assemble_orders(&plan, &products, noon(), &constraints, &mut rng).expect("rows");

        let mut per_order: std::collections::HashMap<Uuid, HashSet<&str>> =
            std::collections::HashMap::new();
        for row in &rows {
            per_order.entry(row.order_id).or_default().insert(row.product_id.as_str());
        }
        assert_eq!(per_order.len(), 10);
        for items in per_order.values() {
            assert!(items.len() >= 3 && items.len() <= 5, "got {}", items.len());
        }
    }

    #[test]
    fn products_within_an_order_are_distinct() {
        let products = catalog(5);
        let owner = buyer();
        let plan = vec![&owner; 4];
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let rows = assemble_orders(&plan, &products, noon(), &OrderConstraints::api(), &mut rng)
            .expect("rows");

        let mut seen: std::collections::HashMap<Uuid, HashSet<String>> =
            std::collections::HashMap::new();
        for row in &rows {
            assert!(
                seen.entry(row.order_id).or_default().insert(row.product_id.clone()),
                "product repeated within one order"
            );
        }
    }

    #[test]
    fn totals_use_half_up_rounding() {
        let products = vec![Product {
            product_id: "p0".to_string(),
            sku: "SKU-0".to_string(),
            price: Decimal::from_str("3.33").expect("price"),
        }];
        let constraints = OrderConstraints {
            min_items: 1,
            max_items: 1,
            max_orders_per_customer: 4,
        };
        let owner = buyer();
        let plan = vec![&owner];
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let rows = assemble_orders(&plan, &products, noon(), &constraints, &mut rng).expect("rows");

        for row in &rows {
            let expected = round_money(row.price * Decimal::from(row.quantity));
            assert_eq!(row.total_price, expected);
            assert!(row.quantity >= 1 && row.quantity <= 5);
        }
    }

    #[test]
    fn midnight_run_pins_created_at() {
        let midnight = Utc.with_ymd_and_hms(2025, 3, 14, 0, 0, 0).single().expect("timestamp");
        let products = catalog(3);
        let owner = buyer();
        let plan = vec![&owner; 2];
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let rows = assemble_orders(&plan, &products, midnight, &OrderConstraints::api(), &mut rng)
            .expect("rows");

        for row in &rows {
            assert_eq!(row.created_at, midnight);
        }
    }

    #[test]
    fn created_at_stays_inside_the_day_window() {
        let products = catalog(3);
        let owner = buyer();
        let plan = vec![&owner; 6];
        let processed_at = noon();
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        let rows = assemble_orders(&plan, &products, processed_at, &OrderConstraints::api(), &mut rng)
            .expect("rows");

        let start_of_day = Utc.with_ymd_and_hms(2025, 3, 14, 0, 0, 0).single().expect("timestamp");
        for row in &rows {
            assert!(row.created_at >= start_of_day && row.created_at <= processed_at);
            assert_eq!(row.created_at.nanosecond(), 0);
            assert_eq!(row.processed_at, processed_at);
        }
    }

    #[test]
    fn small_catalog_fails_up_front() {
        let products = catalog(2);
        let owner = buyer();
        let plan = vec![&owner];
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let err = assemble_orders(&plan, &products, noon(), &OrderConstraints::api(), &mut rng)
            .unwrap_err();
        assert!(matches!(err, GenerationError::InsufficientData(_)), "{err}");
    }
}
