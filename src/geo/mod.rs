mod coordinate;
mod distance;
mod geo_error;
mod geocoder;
mod rate_limit;
mod resolver;

pub use coordinate::{Coordinate, LocationRef};
pub use distance::{Candidate, DistanceRanker};
pub use geo_error::{GeocodeError, ResolutionFailure};
pub use geocoder::{GeocodeConfigError, Geocoder, NominatimGeocoder};
pub use resolver::CoordinateResolver;
