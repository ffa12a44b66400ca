//! Allocation planning: assigns each order slot to a buyer before any order
//! content is generated.

use rand::Rng;

use crate::errors::GenerationError;
use crate::model::{Buyer, OrderConstraints};

/// Default order goal when the caller does not request one.
pub const DEFAULT_ORDERS_PER_BUYER: u64 = 5;

/// Total order capacity of a pool under the per-buyer cap.
pub fn capacity(buyer_count: usize, constraints: &OrderConstraints) -> u64 {
    buyer_count as u64 * u64::from(constraints.max_orders_per_customer)
}

/// Resolve the requested order goal: default to five orders per buyer and
/// clamp to pool capacity. A goal that resolves to zero cannot produce a
/// payload and is rejected.
pub fn resolve_order_goal(
    requested: Option<u64>,
    buyer_count: usize,
    constraints: &OrderConstraints,
) -> Result<u64, GenerationError> {
    let desired = requested.unwrap_or(buyer_count as u64 * DEFAULT_ORDERS_PER_BUYER);
    let resolved = desired.min(capacity(buyer_count, constraints));
    if resolved == 0 {
        return Err(GenerationError::InsufficientData(
            "order_goal resolved to zero; increase input parameters".to_string(),
        ));
    }
    Ok(resolved)
}

/// Assign one buyer per order slot, uniformly among buyers still under the
/// cap.
///
/// The eligible list is rebuilt in pool order for every slot and exactly one
/// draw is consumed per slot, so a fixed `(buyers, desired_orders, seed)`
/// reproduces the plan byte for byte. When every buyer hits the cap the plan
/// stops early; a shorter plan is a defined outcome, not an error.
pub fn plan_orders<'a, R: Rng>(
    buyers: &'a [Buyer],
    desired_orders: u64,
    constraints: &OrderConstraints,
    rng: &mut R,
) -> Vec<&'a Buyer> {
    let cap = constraints.max_orders_per_customer;
    let mut counts = vec![0u32; buyers.len()];
    let mut plan = Vec::new();

    for _ in 0..desired_orders {
        let eligible: Vec<usize> = (0..buyers.len()).filter(|&idx| counts[idx] < cap).collect();
        if eligible.is_empty() {
            break;
        }
        let chosen = eligible[rng.random_range(0..eligible.len())];
        counts[chosen] += 1;
        plan.push(&buyers[chosen]);
    }

    plan
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    fn pool(count: usize) -> Vec<Buyer> {
        (0..count)
            .map(|idx| Buyer {
                identifier: format!("buyer-{idx}"),
                is_b2b: idx % 2 == 1,
            })
            .collect()
    }

    #[test]
    fn respects_per_buyer_cap() {
        let buyers = pool(3);
        let constraints = OrderConstraints::api();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let plan = plan_orders(&buyers, 12, &constraints, &mut rng);

        assert_eq!(plan.len(), 12);
        for buyer in &buyers {
            let assigned = plan.iter().filter(|b| b.identifier == buyer.identifier).count();
            assert!(assigned <= constraints.max_orders_per_customer as usize);
        }
    }

    #[test]
    fn stops_early_when_capacity_is_exhausted() {
        let buyers = pool(2);
        let constraints = OrderConstraints::api();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let plan = plan_orders(&buyers, 100, &constraints, &mut rng);

        // 2 buyers x cap 4
        assert_eq!(plan.len(), 8);
    }

    #[test]
    fn same_seed_reproduces_the_plan() {
        let buyers = pool(5);
        let constraints = OrderConstraints::bulk_export();

        let mut rng_a = ChaCha8Rng::seed_from_u64(42);
        let mut rng_b = ChaCha8Rng::seed_from_u64(42);
        let plan_a = plan_orders(&buyers, 20, &constraints, &mut rng_a);
        let plan_b = plan_orders(&buyers, 20, &constraints, &mut rng_b);

        let ids_a: Vec<&str> = plan_a.iter().map(|b| b.identifier.as_str()).collect();
        let ids_b: Vec<&str> = plan_b.iter().map(|b| b.identifier.as_str()).collect();
        assert_eq!(ids_a, ids_b);
    }

    #[test]
    fn resolves_default_goal_and_clamps_to_capacity() {
        let constraints = OrderConstraints::api();
        // default: 5 per buyer, 3 buyers -> 15, capacity 12
        assert_eq!(resolve_order_goal(None, 3, &constraints).expect("goal"), 12);
        assert_eq!(resolve_order_goal(Some(4), 3, &constraints).expect("goal"), 4);
        assert_eq!(resolve_order_goal(Some(500), 3, &constraints).expect("goal"), 12);
    }

    #[test]
    fn zero_goal_is_rejected() {
        let constraints = OrderConstraints::api();
        let err = resolve_order_goal(Some(0), 3, &constraints).unwrap_err();
        assert!(matches!(err, GenerationError::InsufficientData(_)), "{err}");
        let err = resolve_order_goal(None, 0, &constraints).unwrap_err();
        assert!(matches!(err, GenerationError::InsufficientData(_)), "{err}");
    }
}
