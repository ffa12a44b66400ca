//! Buyer pool: merges individual customers and business accounts.

use serde::Deserialize;

use crate::errors::GenerationError;
use crate::model::Buyer;

/// Raw row of the customer seed. Extra columns are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct CustomerRow {
    #[serde(default)]
    pub customer_id: Option<String>,
}

/// Raw row of the accounts seed.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountRow {
    #[serde(default)]
    pub account_id: Option<String>,
}

/// Merge customer and account rows into one flat pool, customers first.
///
/// Rows without an identifier are skipped. Identifiers are assumed unique
/// across both sources; a collision simply yields two distinct buyers with
/// the same printed identifier.
pub fn load_buyers<C, A>(customer_rows: C, account_rows: A) -> Result<Vec<Buyer>, GenerationError>
where
    C: IntoIterator<Item = CustomerRow>,
    A: IntoIterator<Item = AccountRow>,
{
    let mut buyers = Vec::new();

    for row in customer_rows {
        if let Some(identifier) = nonempty(row.customer_id) {
            buyers.push(Buyer {
                identifier,
                is_b2b: false,
            });
        }
    }
    for row in account_rows {
        if let Some(identifier) = nonempty(row.account_id) {
            buyers.push(Buyer {
                identifier,
                is_b2b: true,
            });
        }
    }

    if buyers.is_empty() {
        return Err(GenerationError::InsufficientData(
            "no buyers available from customer or accounts seeds".to_string(),
        ));
    }

    Ok(buyers)
}

fn nonempty(value: Option<String>) -> Option<String> {
    value.filter(|raw| !raw.is_empty())
}
