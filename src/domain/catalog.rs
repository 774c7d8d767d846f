// src/domain/catalog.rs

use crate::geo::LocationRef;
use serde::{Deserialize, Serialize};

/// A publishing school, as listed in the schools collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct School {
    pub school_code: String,
    pub name: String,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
}

impl School {
    pub fn location(&self) -> LocationRef<'_> {
        LocationRef::from_parts(
            self.latitude,
            self.longitude,
            self.address.as_deref(),
            self.postal_code.as_deref(),
        )
    }
}

/// A receiving organization (shelter, charity).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub entity_id: String,
    pub name: String,
    pub status: String,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub postal_code: Option<String>,
}

impl Entity {
    /// Only `active` entities (or the Portuguese `ativa`/`ativo`) are candidates.
    pub fn is_active(&self) -> bool {
        let status = self.status.trim();
        ["active", "ativa", "ativo"]
            .iter()
            .any(|s| status.eq_ignore_ascii_case(s))
    }

    pub fn location(&self) -> LocationRef<'_> {
        LocationRef::from_parts(
            self.latitude,
            self.longitude,
            Some(self.address.as_str()),
            self.postal_code.as_deref(),
        )
    }
}
