use serde::{Deserialize, Serialize};

/// A lot bought by the school network, listed so staff can offer it before
/// it expires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseLot {
    pub item: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchase_date: Option<String>,
    pub quantity: f64,
}
