mod collection;
mod history;

pub use collection::JsonCollection;
pub use history::HistoryLog;

use crate::config::StoreConfig;
use crate::domain::{Entity, Offer, PurchaseLot, School};
use crate::errors::StoreError;

/// Sole owner of durable state: the JSON collections and the history log.
#[derive(Debug, Clone)]
pub struct RecordStore {
    offers: JsonCollection<Offer>,
    schools: JsonCollection<School>,
    entities: JsonCollection<Entity>,
    history: HistoryLog,
    expiring_stock: JsonCollection<PurchaseLot>,
}

impl RecordStore {
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            offers: JsonCollection::new(config.offers_path()),
            schools: JsonCollection::new(config.schools_path()),
            entities: JsonCollection::new(config.entities_path()),
            history: HistoryLog::new(config.history_path()),
            expiring_stock: JsonCollection::new(config.expiring_stock_path()),
        }
    }

    #[cfg(test)]
    pub fn offers(&self) -> &JsonCollection<Offer> {
        &self.offers
    }

    #[cfg(test)]
    pub fn schools(&self) -> &JsonCollection<School> {
        &self.schools
    }

    #[cfg(test)]
    pub fn entities(&self) -> &JsonCollection<Entity> {
        &self.entities
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    pub fn expiring_stock(&self) -> &JsonCollection<PurchaseLot> {
        &self.expiring_stock
    }

    pub fn load_offers(&self) -> Vec<Offer> {
        self.offers.load()
    }

    pub fn find_school(&self, school_code: &str) -> Option<School> {
        self.schools
            .load()
            .into_iter()
            .find(|s| s.school_code == school_code)
    }

    pub fn load_entities(&self) -> Vec<Entity> {
        self.entities.load()
    }

    /// Scoped read-modify-write over the offers collection.
    pub fn with_offers<F, R, E>(&self, f: F) -> Result<R, E>
    where
        F: FnOnce(&mut Vec<Offer>) -> Result<R, E>,
        E: From<StoreError>,
    {
        self.offers.with_records(f)
    }
}
