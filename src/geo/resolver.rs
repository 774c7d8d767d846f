// resolver.rs
use crate::geo::rate_limit::RateLimiter;
use crate::geo::{Coordinate, Geocoder, LocationRef, ResolutionFailure};
use std::cell::RefCell;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};

type CacheKey = (String, Option<String>);

/// Turns location references into coordinates.
///
/// Direct coordinates are returned untouched. Addresses go through the
/// geocoder, one request per rate-limit window, with successful lookups
/// memoized for the lifetime of the resolver. Every failure is logged
/// against `subject` and returned as a recoverable [`ResolutionFailure`].
pub struct CoordinateResolver {
    geocoder: Option<Box<dyn Geocoder>>,
    limiter: RateLimiter,
    cache: RefCell<HashMap<CacheKey, Coordinate>>,
}

impl CoordinateResolver {
    pub fn new(geocoder: Box<dyn Geocoder>, rate_limit: Duration) -> Self {
        Self {
            geocoder: Some(geocoder),
            limiter: RateLimiter::new(rate_limit),
            cache: RefCell::new(HashMap::new()),
        }
    }

    /// A resolver that only accepts direct coordinates.
    pub fn offline() -> Self {
        Self {
            geocoder: None,
            limiter: RateLimiter::new(Duration::ZERO),
            cache: RefCell::new(HashMap::new()),
        }
    }

    pub fn resolve(
        &self,
        subject: &str,
        location: LocationRef<'_>,
    ) -> Result<Coordinate, ResolutionFailure> {
        let result = match location {
            LocationRef::Point(point) => return Ok(point),
            LocationRef::Unknown => Err(ResolutionFailure::NoLocation),
            LocationRef::Address {
                address,
                postal_code,
            } => self.geocode(address, postal_code),
        };

        if let Err(e) = &result {
            warn!("Could not resolve location for {subject}: {e}");
        }
        result
    }

    fn geocode(
        &self,
        address: &str,
        postal_code: Option<&str>,
    ) -> Result<Coordinate, ResolutionFailure> {
        let key = (address.to_string(), postal_code.map(str::to_string));
        if let Some(hit) = self.cache.borrow().get(&key) {
            debug!("Geocode cache hit for '{address}'");
            return Ok(*hit);
        }

        let geocoder = self
            .geocoder
            .as_ref()
            .ok_or(ResolutionFailure::GeocoderDisabled)?;

        self.limiter.wait();
        debug!("Geocoding '{address}' (postal code {postal_code:?})");
        let coordinate = geocoder.geocode(address, postal_code)?;

        self.cache.borrow_mut().insert(key, coordinate);
        Ok(coordinate)
    }
}
