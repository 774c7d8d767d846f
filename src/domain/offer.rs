// src/domain/offer.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle of an offer. Declaration order is lifecycle order, so the
/// derived `Ord` is what the monotonic-transition check relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OfferStatus {
    Available,
    Reserved,
    Collected,
}

impl OfferStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OfferStatus::Available => "available",
            OfferStatus::Reserved => "reserved",
            OfferStatus::Collected => "collected",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OfferStatus::Collected)
    }
}

impl fmt::Display for OfferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A ranked, distance-annotated candidate captured when the offer was published.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub entity_id: String,
    pub entity_name: String,
    pub distance_km: f64,
    pub address: String,
}

/// One donation lot, as persisted in the offers collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Offer {
    pub offer_id: String,
    pub item: String,
    pub quantity: String,
    pub expiry: String,
    pub school_code: String,
    pub school_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub published_at: DateTime<Utc>,
    pub status: OfferStatus,
    #[serde(default)]
    pub reserved_by: Option<String>,
    #[serde(default)]
    pub collected_by: Option<String>,
    #[serde(default)]
    pub recommendations: Vec<Recommendation>,
}

/// Result of asking an offer to move to a new status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Already at the requested status.
    Unchanged,
    Advanced { from: OfferStatus },
    /// Requested status is behind the current one; nothing changed.
    Refused { current: OfferStatus },
}

impl Offer {
    /// Move forward to `target`, recording `actor` against the matching
    /// `*_by` field. Never regresses.
    pub fn advance_to(&mut self, target: OfferStatus, actor: Option<&str>) -> Transition {
        if self.status == target {
            return Transition::Unchanged;
        }
        if target < self.status {
            return Transition::Refused {
                current: self.status,
            };
        }

        let from = self.status;
        self.status = target;

        if let Some(actor) = actor {
            match target {
                OfferStatus::Reserved => self.reserved_by = Some(actor.to_string()),
                OfferStatus::Collected => self.collected_by = Some(actor.to_string()),
                OfferStatus::Available => {}
            }
        }

        Transition::Advanced { from }
    }

    /// The history row written when this offer is collected on `date`.
    pub fn history_record(&self, date: NaiveDate) -> HistoricalRecord {
        HistoricalRecord {
            offer_id: self.offer_id.clone(),
            item: self.item.clone(),
            quantity: self.quantity.clone(),
            school_code: self.school_code.clone(),
            collection_date: date,
        }
    }
}

/// One row of the append-only collection log. Field order is column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalRecord {
    pub offer_id: String,
    pub item: String,
    pub quantity: String,
    pub school_code: String,
    pub collection_date: NaiveDate,
}
