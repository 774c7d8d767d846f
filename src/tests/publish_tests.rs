// src/tests/publish_tests.rs

use super::utils::*;
use crate::config::MatchingConfig;
use crate::domain::{Entity, OfferStatus};
use crate::geo::CoordinateResolver;
use crate::lifecycle::{OfferManager, PublishOutcome};
use crate::parsing::OfferField;
use std::fs;

const RICE_BODY: &str = "school_code: S1\nitem: Rice\nquantity: 10kg\nexpiry: 2025-12-31";

#[test]
fn scenario_a_creates_available_offer_with_one_recommendation() {
    let t = TestStore::new()
        .with_schools(&[school("S1", -23.55, -46.63)])
        .with_entities(&[entity("E1", -23.56, -46.61)]);
    let resolver = CoordinateResolver::offline();
    let manager = OfferManager::new(&t.store, &resolver, &t.matching).with_clock(fixed_now);

    let outcome = manager.publish("101", "Rice donation", RICE_BODY).unwrap();

    let PublishOutcome::Created(offer) = outcome else {
        panic!("expected Created, got {outcome:?}");
    };
    assert_eq!(offer.status, OfferStatus::Available);
    assert_eq!(offer.school_name, "Escola S1");
    assert_eq!(offer.published_at, fixed_now());
    assert_eq!(offer.recommendations.len(), 1);

    let rec = &offer.recommendations[0];
    assert_eq!(rec.entity_id, "E1");
    assert!((rec.distance_km - 2.3).abs() < 0.05, "got {}", rec.distance_km);

    // persisted form equals the returned offer
    assert_eq!(t.store.load_offers(), vec![offer]);
}

#[test]
fn scenario_b_missing_quantity_creates_nothing() {
    let t = TestStore::new().with_schools(&[school("S1", -23.55, -46.63)]);
    let resolver = CoordinateResolver::offline();
    let manager = OfferManager::new(&t.store, &resolver, &t.matching);

    let outcome = manager
        .publish("102", "", "school_code: S1\nitem: Rice\nexpiry: 2025-12-31")
        .unwrap();

    assert_eq!(
        outcome,
        PublishOutcome::Incomplete {
            missing: vec![OfferField::Quantity]
        }
    );
    assert!(!t.offers_file_exists());
}

#[test]
fn incomplete_offer_leaves_existing_store_byte_identical() {
    let t = TestStore::new().with_offers(&[]);
    let before = fs::read(t.store.offers().path()).unwrap();
    let resolver = CoordinateResolver::offline();
    let manager = OfferManager::new(&t.store, &resolver, &t.matching);

    manager.publish("103", "", "item: Rice").unwrap();

    assert_eq!(fs::read(t.store.offers().path()).unwrap(), before);
}

#[test]
fn unknown_school_publishes_without_recommendations() {
    let t = TestStore::new().with_entities(&[entity("E1", -23.56, -46.61)]);
    let resolver = CoordinateResolver::offline();
    let manager = OfferManager::new(&t.store, &resolver, &t.matching);

    let outcome = manager.publish("104", "", RICE_BODY).unwrap();

    let PublishOutcome::Created(offer) = outcome else {
        panic!("expected Created");
    };
    assert!(offer.recommendations.is_empty());
    assert_eq!(offer.school_name, "");
    assert_eq!(t.store.load_offers().len(), 1);
}

#[test]
fn unresolvable_school_degrades_to_no_recommendations() {
    let t = TestStore::new()
        .with_schools(&[school_at_address("S1", "Rua Desconhecida, 0")])
        .with_entities(&[entity("E1", -23.56, -46.61)]);
    let (resolver, calls) = fixture_resolver();
    let manager = OfferManager::new(&t.store, &resolver, &t.matching);

    let outcome = manager.publish("105", "", RICE_BODY).unwrap();

    let PublishOutcome::Created(offer) = outcome else {
        panic!("expected Created");
    };
    assert!(offer.recommendations.is_empty());
    assert_eq!(offer.school_name, "Escola S1");
    assert_eq!(calls.get(), 1);
}

#[test]
fn addresses_are_geocoded_for_school_and_entities() {
    let mut inactive = entity_at_address("E3", "Av. Afonso Pena, 500", None);
    inactive.status = "inactive".to_string();

    let t = TestStore::new()
        .with_schools(&[school_at_address("S1", "Escola Modelo 1, São Paulo")])
        .with_entities(&[
            entity_at_address("E2", "Av. Rio Branco, 100", Some("20040-004")),
            entity_at_address("E1", "Rua da Mooca, 1000", None),
            inactive,
        ]);
    let (resolver, calls) = fixture_resolver();
    let manager = OfferManager::new(&t.store, &resolver, &t.matching);

    let PublishOutcome::Created(offer) = manager.publish("106", "", RICE_BODY).unwrap() else {
        panic!("expected Created");
    };

    let ids: Vec<_> = offer
        .recommendations
        .iter()
        .map(|r| r.entity_id.as_str())
        .collect();
    assert_eq!(ids, ["E1", "E2"]);
    // school + two active entities; the inactive one is never looked up
    assert_eq!(calls.get(), 3);
}

#[test]
fn recommendations_are_capped_and_sorted() {
    let entities: Vec<Entity> = (1..=5)
        .map(|i| entity(&format!("E{i}"), -23.55 - 0.01 * (6 - i) as f64, -46.63))
        .collect();
    let t = TestStore::new()
        .with_schools(&[school("S1", -23.55, -46.63)])
        .with_entities(&entities);
    let resolver = CoordinateResolver::offline();
    let manager = OfferManager::new(&t.store, &resolver, &t.matching);

    let PublishOutcome::Created(offer) = manager.publish("107", "", RICE_BODY).unwrap() else {
        panic!("expected Created");
    };

    let ids: Vec<_> = offer
        .recommendations
        .iter()
        .map(|r| r.entity_id.as_str())
        .collect();
    assert_eq!(ids, ["E5", "E4", "E3"]);
    assert!(offer
        .recommendations
        .windows(2)
        .all(|w| w[0].distance_km <= w[1].distance_km));
}

#[test]
fn max_recommendations_comes_from_config() {
    let t = TestStore::new()
        .with_schools(&[school("S1", 0.0, 0.0)])
        .with_entities(&[entity("E1", 0.0, 0.1), entity("E2", 0.0, 0.2)]);
    let resolver = CoordinateResolver::offline();
    let matching = MatchingConfig {
        max_recommendations: 1,
        ..MatchingConfig::default()
    };
    let manager = OfferManager::new(&t.store, &resolver, &matching);

    let PublishOutcome::Created(offer) = manager.publish("108", "", RICE_BODY).unwrap() else {
        panic!("expected Created");
    };
    assert_eq!(offer.recommendations.len(), 1);
    assert_eq!(offer.recommendations[0].entity_id, "E1");
}

#[test]
fn same_offer_id_is_published_once() {
    let t = TestStore::new().with_schools(&[school("S1", -23.55, -46.63)]);
    let resolver = CoordinateResolver::offline();
    let manager = OfferManager::new(&t.store, &resolver, &t.matching);

    let first = manager.publish("109", "", RICE_BODY).unwrap();
    let second = manager
        .publish("109", "", "school_code: S1\nitem: Beans\nquantity: 1kg\nexpiry: 2026-01-01")
        .unwrap();

    let PublishOutcome::Created(created) = first else {
        panic!("expected Created");
    };
    assert_eq!(second, PublishOutcome::AlreadyPublished(created.clone()));
    assert_eq!(t.store.load_offers(), vec![created]);
}

#[test]
fn title_fallback_fills_item_and_school_code() {
    let t = TestStore::new().with_schools(&[school("35000012", -23.55, -46.63)]);
    let resolver = CoordinateResolver::offline();
    let manager = OfferManager::new(&t.store, &resolver, &t.matching);

    let outcome = manager
        .publish(
            "110",
            "Doação: Feijão - 35000012",
            "quantidade: 3 sacos\nvalidade: 2025-10-01",
        )
        .unwrap();

    let PublishOutcome::Created(offer) = outcome else {
        panic!("expected Created");
    };
    assert_eq!(offer.item, "Feijão");
    assert_eq!(offer.school_code, "35000012");
    assert_eq!(offer.quantity, "3 sacos");
}

#[test]
fn malformed_offers_file_is_replaced_on_publish() {
    let t = TestStore::new();
    let path = t.store.offers().path().to_path_buf();
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, "not json at all").unwrap();

    let resolver = CoordinateResolver::offline();
    let manager = OfferManager::new(&t.store, &resolver, &t.matching);
    manager.publish("111", "", RICE_BODY).unwrap();

    let offers = t.store.load_offers();
    assert_eq!(offers.len(), 1);
    assert_eq!(offers[0].offer_id, "111");
}
