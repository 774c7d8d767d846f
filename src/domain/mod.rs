pub mod catalog;
pub mod offer;
pub mod purchase;

pub use catalog::{Entity, School};
pub use offer::{HistoricalRecord, Offer, OfferStatus, Recommendation, Transition};
pub use purchase::PurchaseLot;
