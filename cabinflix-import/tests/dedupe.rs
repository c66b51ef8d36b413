mod common;

use cabinflix_catalog::{AliasPair, CatalogRecord, RawTitle};
use cabinflix_db::*;
use cabinflix_import::*;
use common::movie;

fn bare(title: &str) -> CatalogRecord {
    CatalogRecord::unenriched(title, &RawTitle::new(title, "Movies", 0))
}

fn enriched(title: &str, id: i64) -> CatalogRecord {
    let mut record = bare(title);
    record.apply_match(&movie(id, title));
    record
}

fn alias(unenriched: &str, enriched: &str) -> AliasPair {
    AliasPair {
        unenriched: unenriched.to_string(),
        enriched: enriched.to_string(),
    }
}

#[test]
fn shared_external_id_keeps_first_in_order() {
    let records = vec![
        enriched("Bourne Legacy, The", 49040),
        bare("Memento"),
        enriched("The Bourne Legacy", 49040),
    ];
    let (survivors, plan) = dedupe_records(records, &[]);

    let titles: Vec<&str> = survivors.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["Bourne Legacy, The", "Memento"]);
    assert_eq!(plan.removals.len(), 1);
    assert_eq!(plan.removals[0].index, 2);
    assert_eq!(
        plan.removals[0].reason,
        RemovalReason::SharedExternalId {
            external_id: 49040,
            kept: "Bourne Legacy, The".to_string()
        }
    );
    assert_eq!(plan.shared_id_removals(), 1);
    assert_eq!(plan.alias_removals(), 0);
}

#[test]
fn first_writer_wins_regardless_of_richness() {
    let mut sparse = bare("Heat");
    sparse.external_id = Some(949);
    let records = vec![sparse, enriched("Heat (1995)", 949)];
    let (survivors, _) = dedupe_records(records, &[]);

    assert_eq!(survivors.len(), 1);
    assert_eq!(survivors[0].title, "Heat");
    assert_eq!(survivors[0].overview, None);
}

#[test]
fn unenriched_title_shadowed_by_enriched_record_is_removed() {
    let records = vec![bare("Heat"), enriched("Heat", 949)];
    let (survivors, plan) = dedupe_records(records, &[]);

    assert_eq!(survivors.len(), 1);
    assert!(survivors[0].is_enriched());
    assert_eq!(
        plan.removals[0].reason,
        RemovalReason::Shadowed { external_id: 949 }
    );
}

#[test]
fn alias_pair_removes_unenriched_variant() {
    let records = vec![
        bare("Baurne Legacy, The"),
        enriched("Bourne Legacy, The", 49040),
    ];
    let aliases = vec![alias("Baurne Legacy, The", "Bourne Legacy, The")];
    let (survivors, plan) = dedupe_records(records, &aliases);

    assert_eq!(survivors.len(), 1);
    assert_eq!(survivors[0].title, "Bourne Legacy, The");
    assert_eq!(plan.alias_removals(), 1);
    assert!(plan.ambiguities.is_empty());
}

#[test]
fn alias_pair_without_enrichment_is_reported_not_touched() {
    let records = vec![bare("Lone Ranger"), bare("Lone Ranger, The")];
    let aliases = vec![alias("Lone Ranger", "Lone Ranger, The")];
    let (survivors, plan) = dedupe_records(records, &aliases);

    assert_eq!(survivors.len(), 2);
    assert!(plan.removals.is_empty());
    assert_eq!(plan.ambiguities.len(), 1);
    assert_eq!(plan.ambiguities[0].reason, "neither side is enriched");
}

#[test]
fn alias_pair_with_only_one_side_present_is_ignored() {
    let records = vec![enriched("Bourne Legacy, The", 49040)];
    let aliases = vec![alias("Baurne Legacy, The", "Bourne Legacy, The")];
    let plan = plan_dedupe(&records, &aliases);
    assert!(plan.is_empty());
}

#[test]
fn store_pass_keeps_lower_id() {
    let conn = open_memory().unwrap();
    let first = insert_movie(&conn, &bare("Memento")).unwrap();
    let second = insert_movie(&conn, &bare("Heat")).unwrap();
    let third = insert_movie(&conn, &bare("Baurne Legacy, The")).unwrap();
    let fourth = insert_movie(&conn, &enriched("Bourne Legacy, The", 49040)).unwrap();
    let aliases = vec![alias("Baurne Legacy, The", "Bourne Legacy, The")];

    let plan = dedupe_store(&conn, &aliases, false).unwrap();
    assert_eq!(plan.removals.len(), 1);
    assert_eq!(plan.removals[0].id, Some(third));

    let ids: Vec<i64> = list_movies(&conn)
        .unwrap()
        .iter()
        .filter_map(|r| r.id)
        .collect();
    assert_eq!(ids, vec![first, second, fourth]);
}

#[test]
fn store_pass_dry_run_deletes_nothing() {
    let conn = open_memory().unwrap();
    insert_movie(&conn, &bare("Baurne Legacy, The")).unwrap();
    insert_movie(&conn, &enriched("Bourne Legacy, The", 49040)).unwrap();
    let aliases = vec![alias("Baurne Legacy, The", "Bourne Legacy, The")];

    let plan = dedupe_store(&conn, &aliases, true).unwrap();
    assert_eq!(plan.removals.len(), 1);
    assert_eq!(count_movies(&conn).unwrap(), 2);
}
