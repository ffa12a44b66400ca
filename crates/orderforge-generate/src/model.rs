use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Currency code stamped on every generated line.
pub const CURRENCY: &str = "EUR";

/// Output column order for flat-record (CSV) rendering.
pub const ORDER_COLUMNS: [&str; 12] = [
    "order_id",
    "created_at",
    "processed_at",
    "order_item_id",
    "product_id",
    "SKU",
    "quantity",
    "price",
    "currency",
    "total_price",
    "customer_id",
    "is_b2b",
];

/// A sellable product from the filtered catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub product_id: String,
    pub sku: String,
    pub price: Decimal,
}

/// One entry of the merged buyer pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Buyer {
    pub identifier: String,
    pub is_b2b: bool,
}

/// Generation constraints for one run.
///
/// The two presets mirror the constant sets of the historical API-facing and
/// CSV-export implementations; neither is hardcoded anywhere else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderConstraints {
    /// Minimum distinct products per order.
    pub min_items: u32,
    /// Maximum distinct products per order (further capped by catalog size).
    pub max_items: u32,
    /// Maximum orders assigned to a single buyer.
    pub max_orders_per_customer: u32,
}

impl OrderConstraints {
    /// Constants used by the API-facing generator.
    pub const fn api() -> Self {
        Self {
            min_items: 3,
            max_items: 5,
            max_orders_per_customer: 4,
        }
    }

    /// Constants used by the bulk CSV export generator.
    pub const fn bulk_export() -> Self {
        Self {
            min_items: 3,
            max_items: 10,
            max_orders_per_customer: 14,
        }
    }
}

impl Default for OrderConstraints {
    fn default() -> Self {
        Self::api()
    }
}

/// One output row: a single product entry within an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub order_id: Uuid,
    #[serde(with = "rfc3339_seconds")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "rfc3339_seconds")]
    pub processed_at: DateTime<Utc>,
    pub order_item_id: Uuid,
    pub product_id: String,
    #[serde(rename = "SKU")]
    pub sku: String,
    pub quantity: u32,
    pub price: Decimal,
    pub currency: String,
    pub total_price: Decimal,
    pub customer_id: String,
    pub is_b2b: bool,
}

/// Resolved locations of the three seed files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedPaths {
    pub products: PathBuf,
    pub customers: PathBuf,
    pub accounts: PathBuf,
}

impl SeedPaths {
    /// Standard seed file names inside a single directory.
    pub fn from_dir(dir: &Path) -> Self {
        Self {
            products: dir.join("products.csv"),
            customers: dir.join("customer.csv"),
            accounts: dir.join("accounts.csv"),
        }
    }
}

/// Constraints actually applied during a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConstraintSummary {
    pub max_orders_per_customer: u32,
    /// Closed range of distinct items per order after the catalog cap.
    pub item_count_range: [u32; 2],
}

/// Resolved generation parameters, echoed back for reproducibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationParameters {
    pub order_goal: u64,
    pub seed: Option<u64>,
}

/// Provenance metadata attached to a payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayloadMetadata {
    pub sources: SeedPaths,
    #[serde(with = "rfc3339_seconds")]
    pub generated_at: DateTime<Utc>,
    pub record_count: usize,
    pub unique_orders: usize,
    pub columns: Vec<String>,
    pub constraints: ConstraintSummary,
    pub parameters: GenerationParameters,
}

/// Final result of a generation run: metadata plus ordered line rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderPayload {
    pub metadata: PayloadMetadata,
    pub data: Vec<OrderLine>,
}

/// Quantize a monetary amount to two fractional digits, rounding half-up,
/// and keep the 2-digit scale so values render as `10.50` rather than `10.5`.
pub fn round_money(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}

/// RFC 3339 timestamps truncated to whole seconds.
pub(crate) mod rfc3339_seconds {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Secs, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|ts| ts.with_timezone(&Utc))
            .map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn dec(raw: &str) -> Decimal {
        Decimal::from_str(raw).expect("decimal literal")
    }

    #[test]
    fn rounds_half_up() {
        assert_eq!(round_money(dec("2.005")).to_string(), "2.01");
        assert_eq!(round_money(dec("2.004")).to_string(), "2.00");
        assert_eq!(round_money(dec("9.99")).to_string(), "9.99");
    }

    #[test]
    fn keeps_two_digit_scale() {
        assert_eq!(round_money(dec("10.5")).to_string(), "10.50");
        assert_eq!(round_money(dec("7")).to_string(), "7.00");
    }

    #[test]
    fn presets_match_historical_constants() {
        let api = OrderConstraints::api();
        assert_eq!((api.min_items, api.max_items, api.max_orders_per_customer), (3, 5, 4));

        let bulk = OrderConstraints::bulk_export();
        assert_eq!(
            (bulk.min_items, bulk.max_items, bulk.max_orders_per_customer),
            (3, 10, 14)
        );
        assert_eq!(OrderConstraints::default(), api);
    }
}
