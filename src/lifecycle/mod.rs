//! Offer lifecycle: publishing new offers and applying status commands.
//!
//! Both flows are load → compute → save against the [`RecordStore`]; every
//! anticipated problem (missing fields, unknown offer, failed geocoding,
//! unrecognized comment) ends in an outcome value rather than an error.
//! Only a failed write surfaces as `Err`.

mod publish;
mod status;

use crate::config::MatchingConfig;
use crate::domain::{Offer, OfferStatus};
use crate::geo::{CoordinateResolver, DistanceRanker};
use crate::parsing::OfferField;
use crate::store::RecordStore;
use chrono::{DateTime, Utc};

/// Result of the new-offer flow.
#[derive(Debug, Clone, PartialEq)]
pub enum PublishOutcome {
    Created(Offer),
    /// Required fields missing; nothing was written.
    Incomplete { missing: Vec<OfferField> },
    /// An offer with this id already exists; nothing was written.
    AlreadyPublished(Offer),
}

/// Result of the status-update flow.
#[derive(Debug, Clone, PartialEq)]
pub enum StatusOutcome {
    NoCommand,
    NotFound {
        requested: OfferStatus,
    },
    Unchanged {
        status: OfferStatus,
    },
    /// Requested status is behind the current one.
    Refused {
        current: OfferStatus,
        requested: OfferStatus,
    },
    Advanced {
        from: OfferStatus,
        offer: Offer,
        history_appended: bool,
    },
}

pub struct OfferManager<'a> {
    store: &'a RecordStore,
    resolver: &'a CoordinateResolver,
    ranker: DistanceRanker,
    clock: fn() -> DateTime<Utc>,
}

impl<'a> OfferManager<'a> {
    pub fn new(
        store: &'a RecordStore,
        resolver: &'a CoordinateResolver,
        matching: &MatchingConfig,
    ) -> Self {
        Self {
            store,
            resolver,
            ranker: DistanceRanker::new(matching),
            clock: Utc::now,
        }
    }

    /// Replace the wall clock (publication timestamps, collection dates).
    #[cfg(test)]
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }
}
