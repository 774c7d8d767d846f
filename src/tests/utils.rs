use crate::config::{MatchingConfig, StoreConfig};
use crate::domain::{Entity, Offer, School};
use crate::geo::{Coordinate, CoordinateResolver, GeocodeError, Geocoder};
use crate::store::RecordStore;
use chrono::{DateTime, TimeZone, Utc};
use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;
use tempfile::TempDir;

/// A throwaway data directory with a store pointing into it.
pub struct TestStore {
    _dir: TempDir,
    pub store: RecordStore,
    pub matching: MatchingConfig,
}

impl TestStore {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let config = StoreConfig {
            data_dir: dir.path().join("_data"),
            ..StoreConfig::default()
        };
        Self {
            store: RecordStore::new(&config),
            _dir: dir,
            matching: MatchingConfig::default(),
        }
    }

    pub fn with_schools(self, schools: &[School]) -> Self {
        self.store.schools().save(schools).unwrap();
        self
    }

    pub fn with_entities(self, entities: &[Entity]) -> Self {
        self.store.entities().save(entities).unwrap();
        self
    }

    pub fn with_offers(self, offers: &[Offer]) -> Self {
        self.store.offers().save(offers).unwrap();
        self
    }

    pub fn offers_file_exists(&self) -> bool {
        self.store.offers().path().exists()
    }
}

/// 2025-07-14 15:30 UTC
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 7, 14, 15, 30, 0).unwrap()
}

pub fn school(code: &str, lat: f64, lon: f64) -> School {
    School {
        school_code: code.to_string(),
        name: format!("Escola {code}"),
        latitude: Some(lat),
        longitude: Some(lon),
        address: None,
        postal_code: None,
    }
}

pub fn school_at_address(code: &str, address: &str) -> School {
    School {
        school_code: code.to_string(),
        name: format!("Escola {code}"),
        latitude: None,
        longitude: None,
        address: Some(address.to_string()),
        postal_code: None,
    }
}

pub fn entity(id: &str, lat: f64, lon: f64) -> Entity {
    Entity {
        entity_id: id.to_string(),
        name: format!("Entidade {id}"),
        status: "active".to_string(),
        latitude: Some(lat),
        longitude: Some(lon),
        address: format!("Rua {id}, 1"),
        postal_code: None,
    }
}

pub fn entity_at_address(id: &str, address: &str, postal_code: Option<&str>) -> Entity {
    Entity {
        entity_id: id.to_string(),
        name: format!("Entidade {id}"),
        status: "active".to_string(),
        latitude: None,
        longitude: None,
        address: address.to_string(),
        postal_code: postal_code.map(str::to_string),
    }
}

/// Geocoder answering from a fixed table of known addresses and counting calls.
pub struct FixtureGeocoder {
    pub calls: Rc<Cell<usize>>,
}

const KNOWN_PLACES: [(&str, &str, f64, f64); 4] = [
    ("Rua da Mooca, 1000", "03001-000", -23.5563, -46.6082),
    ("Av. Rio Branco, 100", "20040-004", -22.9035, -43.1764),
    ("Av. Afonso Pena, 500", "30110-000", -19.9191, -43.9386),
    ("Escola Modelo 1", "", -23.5500, -46.6300),
];

impl Geocoder for FixtureGeocoder {
    fn geocode(
        &self,
        address: &str,
        postal_code: Option<&str>,
    ) -> Result<Coordinate, GeocodeError> {
        self.calls.set(self.calls.get() + 1);

        KNOWN_PLACES
            .iter()
            .find(|(addr, cep, _, _)| {
                address.contains(addr) || (!cep.is_empty() && postal_code == Some(*cep))
            })
            .and_then(|(_, _, lat, lon)| Coordinate::new(*lat, *lon))
            .ok_or(GeocodeError::NoMatch)
    }
}

/// Resolver backed by [`FixtureGeocoder`], plus a handle on its call count.
pub fn fixture_resolver() -> (CoordinateResolver, Rc<Cell<usize>>) {
    let calls = Rc::new(Cell::new(0));
    let geocoder = FixtureGeocoder {
        calls: Rc::clone(&calls),
    };
    (
        CoordinateResolver::new(Box::new(geocoder), Duration::ZERO),
        calls,
    )
}
