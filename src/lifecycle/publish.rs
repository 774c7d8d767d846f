use super::{OfferManager, PublishOutcome};
use crate::domain::{Offer, OfferStatus, Recommendation, School};
use crate::errors::StoreError;
use crate::geo::{Candidate, Coordinate};
use crate::parsing::{parse_offer, OfferDraft};
use tracing::{error, info, warn};

impl OfferManager<'_> {
    /// New-offer flow: parse, locate the school, rank nearby entities, persist.
    pub fn publish(
        &self,
        offer_id: &str,
        title: &str,
        body: &str,
    ) -> Result<PublishOutcome, StoreError> {
        let parsed = parse_offer(title, body);

        let Some(draft) = parsed.draft() else {
            let missing: Vec<&str> = parsed.missing.iter().map(|f| f.key()).collect();
            error!(
                "Offer {offer_id}: missing required fields {missing:?}; extracted {:?}. No offer created.",
                parsed.fields
            );
            return Ok(PublishOutcome::Incomplete {
                missing: parsed.missing,
            });
        };

        if !parsed.inferred.is_empty() {
            let inferred: Vec<&str> = parsed.inferred.iter().map(|f| f.key()).collect();
            warn!("Offer {offer_id}: {inferred:?} taken from title '{title}'; verify before relying on them");
        }

        if let Some(existing) = self
            .store
            .load_offers()
            .into_iter()
            .find(|o| o.offer_id == offer_id)
        {
            warn!("Offer {offer_id} already published; leaving it untouched");
            return Ok(PublishOutcome::AlreadyPublished(existing));
        }

        let school = self.store.find_school(&draft.school_code);
        if school.is_none() {
            warn!(
                "Offer {offer_id}: school {} not in catalog; publishing without recommendations",
                draft.school_code
            );
        }

        let recommendations = school
            .as_ref()
            .map(|s| self.recommend(offer_id, s))
            .unwrap_or_default();

        let offer = build_offer(offer_id, draft, school, recommendations, self.now());

        self.store.with_offers(|offers| {
            offers.push(offer.clone());
            Ok::<_, StoreError>(())
        })?;

        info!(
            "Offer {offer_id} published ({} {}) with {} recommendation(s)",
            offer.quantity,
            offer.item,
            offer.recommendations.len()
        );
        Ok(PublishOutcome::Created(offer))
    }

    /// Closest active entities to `school`; empty when the school cannot be located.
    fn recommend(&self, offer_id: &str, school: &School) -> Vec<Recommendation> {
        let subject = format!("school {}", school.school_code);
        let Ok(origin) = self.resolver.resolve(&subject, school.location()) else {
            warn!("Offer {offer_id}: publishing without recommendations (school location unresolved)");
            return Vec::new();
        };

        let entities = self.store.load_entities();
        let coordinates: Vec<Option<Coordinate>> = entities
            .iter()
            .map(|entity| {
                if !entity.is_active() {
                    return None;
                }
                let subject = format!("entity {}", entity.entity_id);
                self.resolver.resolve(&subject, entity.location()).ok()
            })
            .collect();

        let candidates: Vec<Candidate<'_>> = entities
            .iter()
            .zip(coordinates)
            .map(|(entity, coordinate)| Candidate { entity, coordinate })
            .collect();

        self.ranker.rank(origin, &candidates)
    }
}

fn build_offer(
    offer_id: &str,
    draft: OfferDraft,
    school: Option<School>,
    recommendations: Vec<Recommendation>,
    published_at: chrono::DateTime<chrono::Utc>,
) -> Offer {
    Offer {
        offer_id: offer_id.to_string(),
        item: draft.item,
        quantity: draft.quantity,
        expiry: draft.expiry,
        school_code: draft.school_code,
        school_name: school.map(|s| s.name).unwrap_or_default(),
        notes: draft.notes,
        published_at,
        status: OfferStatus::Available,
        reserved_by: None,
        collected_by: None,
        recommendations,
    }
}
