use cabinflix_catalog::types::CatalogRecord;
use cabinflix_db::*;

fn setup_db() -> Connection {
    let conn = open_memory().unwrap();
    seed_default_genres(&conn).unwrap();

    let heat = CatalogRecord {
        title: "Heat".to_string(),
        external_id: Some(949),
        genres: ["Action", "Crime"].iter().map(|g| g.to_string()).collect(),
        ..CatalogRecord::default()
    };
    let amelie = CatalogRecord {
        title: "Amélie".to_string(),
        external_id: Some(194),
        genres: ["Comedy", "Romance"].iter().map(|g| g.to_string()).collect(),
        ..CatalogRecord::default()
    };
    insert_movie(&conn, &heat).unwrap();
    insert_movie_if_absent(&conn, &CatalogRecord {
        title: "zardoz home cut".to_string(),
        ..CatalogRecord::default()
    })
    .unwrap();
    insert_movie(&conn, &amelie).unwrap();
    insert_movie_if_absent(&conn, &CatalogRecord {
        title: "Alien Workprint".to_string(),
        ..CatalogRecord::default()
    })
    .unwrap();
    conn
}

#[test]
fn list_movies_in_id_order_with_genres() {
    let conn = setup_db();
    let movies = list_movies(&conn).unwrap();
    let titles: Vec<&str> = movies.iter().map(|m| m.title.as_str()).collect();
    assert_eq!(
        titles,
        vec!["Heat", "zardoz home cut", "Amélie", "Alien Workprint"]
    );
    assert_eq!(movies[0].genres.len(), 2);
    assert!(movies[1].genres.is_empty());
    assert!(movies[0].id < movies[1].id);
}

#[test]
fn stats_count_enrichment() {
    let conn = setup_db();
    let stats = catalog_stats(&conn).unwrap();
    assert_eq!(stats.movies, 4);
    assert_eq!(stats.enriched, 2);
    assert_eq!(stats.unenriched, 2);
    assert_eq!(stats.genres, DEFAULT_GENRES.len() as i64);
    assert_eq!(stats.genre_links, 4);
    assert!((stats.enrichment_rate() - 50.0).abs() < f64::EPSILON);
}

#[test]
fn empty_catalog_rate_is_zero() {
    let conn = open_memory().unwrap();
    assert_eq!(catalog_stats(&conn).unwrap().enrichment_rate(), 0.0);
}

#[test]
fn remaining_unmatched_sorted_case_insensitive() {
    let conn = setup_db();
    assert_eq!(
        remaining_unmatched(&conn).unwrap(),
        vec!["Alien Workprint", "zardoz home cut"]
    );
}

#[test]
fn genre_counts_most_used_first() {
    let conn = setup_db();
    let counts = genre_counts(&conn).unwrap();
    assert_eq!(counts.len(), DEFAULT_GENRES.len());
    assert_eq!(counts[0].1, 1);
    assert_eq!(counts.last().unwrap().1, 0);
}

#[test]
fn get_missing_movie() {
    let conn = setup_db();
    assert!(get_movie(&conn, 999).unwrap().is_none());
}
