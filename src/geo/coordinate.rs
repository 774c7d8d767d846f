use serde::{Deserialize, Serialize};

/// A validated WGS84 point in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    /// Returns `None` for non-finite or out-of-range values.
    pub fn new(latitude: f64, longitude: f64) -> Option<Self> {
        let valid = latitude.is_finite()
            && longitude.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude);

        valid.then_some(Self {
            latitude,
            longitude,
        })
    }

    pub fn from_parts(latitude: Option<f64>, longitude: Option<f64>) -> Option<Self> {
        Self::new(latitude?, longitude?)
    }
}

/// Where a school or entity is, as far as the records say.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LocationRef<'a> {
    Point(Coordinate),
    Address {
        address: &'a str,
        postal_code: Option<&'a str>,
    },
    /// Neither a usable coordinate nor anything to geocode.
    Unknown,
}

impl<'a> LocationRef<'a> {
    /// A valid coordinate pair wins; otherwise any non-blank address or postal code.
    pub fn from_parts(
        latitude: Option<f64>,
        longitude: Option<f64>,
        address: Option<&'a str>,
        postal_code: Option<&'a str>,
    ) -> Self {
        if let Some(point) = Coordinate::from_parts(latitude, longitude) {
            return LocationRef::Point(point);
        }

        let address = address.map(str::trim).unwrap_or("");
        let postal_code = postal_code.map(str::trim).filter(|p| !p.is_empty());

        if address.is_empty() && postal_code.is_none() {
            LocationRef::Unknown
        } else {
            LocationRef::Address {
                address,
                postal_code,
            }
        }
    }
}
