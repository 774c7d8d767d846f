// distance.rs
use crate::config::MatchingConfig;
use crate::domain::{Entity, Recommendation};
use crate::geo::Coordinate;

/// Great-circle distance in kilometres (haversine).
pub fn haversine_km(a: Coordinate, b: Coordinate, earth_radius_km: f64) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let dlat = lat2 - lat1;
    let dlon = (b.longitude - a.longitude).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    // clamp guards sqrt(1 - h) against rounding just past 1.0 at antipodes
    let h = h.clamp(0.0, 1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    earth_radius_km * c
}

fn round_2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// An entity paired with whatever coordinate resolution produced for it.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    pub entity: &'a Entity,
    pub coordinate: Option<Coordinate>,
}

/// Ranks candidate entities by distance from an origin.
#[derive(Debug, Clone, Copy)]
pub struct DistanceRanker {
    earth_radius_km: f64,
    limit: usize,
}

impl DistanceRanker {
    pub fn new(config: &MatchingConfig) -> Self {
        Self {
            earth_radius_km: config.earth_radius_km,
            limit: config.max_recommendations,
        }
    }

    /// Closest `limit` active candidates with a coordinate, nearest first.
    /// Equal distances keep input order.
    pub fn rank(&self, origin: Coordinate, candidates: &[Candidate<'_>]) -> Vec<Recommendation> {
        let mut scored: Vec<(f64, &Entity)> = candidates
            .iter()
            .filter(|c| c.entity.is_active())
            .filter_map(|c| {
                let point = c.coordinate?;
                Some((haversine_km(origin, point, self.earth_radius_km), c.entity))
            })
            .collect();

        // sort_by is stable
        scored.sort_by(|a, b| a.0.total_cmp(&b.0));
        scored.truncate(self.limit);

        scored
            .into_iter()
            .map(|(distance, entity)| Recommendation {
                entity_id: entity.entity_id.clone(),
                entity_name: entity.name.clone(),
                distance_km: round_2(distance),
                address: entity.address.clone(),
            })
            .collect()
    }
}
