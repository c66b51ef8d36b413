mod common;

use cabinflix_catalog::OverrideTable;
use cabinflix_import::*;
use common::{FakeLookup, movie};

#[test]
fn verbatim_hit_stops_the_search() {
    let lookup = FakeLookup::new().with("Memento", movie(77, "Memento"));
    let overrides = OverrideTable::default();
    let resolver = MatchResolver::new(&lookup, &overrides);

    let m = resolver.resolve("Memento").unwrap();
    assert_eq!(m.external_id, 77);
    assert_eq!(lookup.calls(), vec!["Memento"]);
    assert_eq!(resolver.searches(), 1);
}

#[test]
fn candidates_are_tried_in_order_until_one_hits() {
    let lookup = FakeLookup::new().with("Iceman", movie(5, "The Iceman"));
    let overrides = OverrideTable::default();
    let resolver = MatchResolver::new(&lookup, &overrides);

    let m = resolver.resolve("The Iceman (2012)").unwrap();
    assert_eq!(m.external_id, 5);
    assert_eq!(lookup.calls(), vec!["The Iceman (2012)", "Iceman"]);
}

#[test]
fn exhausted_candidates_yield_none() {
    let lookup = FakeLookup::new();
    let overrides = OverrideTable::default();
    let resolver = MatchResolver::new(&lookup, &overrides);

    assert!(resolver.resolve("Tom & Jerry: The Movie").is_none());
    let calls = lookup.calls();
    assert_eq!(calls[0], "Tom & Jerry: The Movie");
    assert!(calls.contains(&"Tom and Jerry: The Movie".to_string()));
    assert!(calls.contains(&"Tom & Jerry The Movie".to_string()));
}

#[test]
fn lookup_errors_are_swallowed_and_next_candidate_tried() {
    let lookup = FakeLookup::new()
        .failing("Ocean's Eleven (2001)")
        .with("Ocean's Eleven", movie(161, "Ocean's Eleven"));
    let overrides = OverrideTable::default();
    let resolver = MatchResolver::new(&lookup, &overrides);

    let m = resolver.resolve("Ocean's Eleven (2001)").unwrap();
    assert_eq!(m.external_id, 161);
    assert_eq!(resolver.failures(), 1);
}

#[test]
fn correction_searches_only_the_corrected_title() {
    let lookup = FakeLookup::new()
        .with("Davinci Cope, The", movie(1, "Wrong Movie"))
        .with("The Da Vinci Code", movie(591, "The Da Vinci Code"));
    let overrides = OverrideTable::builtin();
    let resolver = MatchResolver::new(&lookup, &overrides);

    match resolver.resolve_title("Davinci Cope, The") {
        ResolvedTitle::Single {
            title,
            corrected,
            matched,
        } => {
            assert_eq!(title, "The Da Vinci Code");
            assert!(corrected);
            assert_eq!(matched.unwrap().external_id, 591);
        }
        other => panic!("expected a single title, got {other:?}"),
    }
    assert_eq!(lookup.calls(), vec!["The Da Vinci Code"]);
}

#[test]
fn unmatched_correction_is_not_normalized() {
    let lookup = FakeLookup::new();
    let overrides = OverrideTable::builtin();
    let resolver = MatchResolver::new(&lookup, &overrides);

    assert!(resolver.resolve("Davinci Cope, The").is_none());
    assert_eq!(lookup.calls(), vec!["The Da Vinci Code"]);
}

#[test]
fn collection_split_looks_up_each_part_once() {
    let lookup = FakeLookup::new()
        .with("Candyman", movie(9725, "Candyman"))
        .with("Candyman: Day of the Dead", movie(10_000, "Candyman: Day of the Dead"));
    let overrides = OverrideTable::builtin();
    let resolver = MatchResolver::new(&lookup, &overrides);

    let ResolvedTitle::Split { parts } = resolver.resolve_title("Candy Man 1,2,3") else {
        panic!("expected a split");
    };
    assert_eq!(parts.len(), 3);
    assert_eq!(parts[0].matched.as_ref().unwrap().external_id, 9725);
    assert!(parts[1].matched.is_none());
    assert_eq!(parts[2].matched.as_ref().unwrap().external_id, 10_000);
    assert_eq!(
        lookup.calls(),
        vec![
            "Candyman",
            "Candyman: Farewell to the Flesh",
            "Candyman: Day of the Dead"
        ]
    );
    assert!(resolver.resolve("Candy Man 1,2,3").is_none());
}

#[test]
fn offline_resolver_never_searches() {
    let overrides = OverrideTable::builtin();
    let resolver = MatchResolver::offline(&overrides);

    assert!(resolver.is_offline());
    assert!(resolver.resolve("Memento").is_none());
    assert_eq!(resolver.searches(), 0);
}
