use cabinflix_catalog::{ExternalMatch, GenerationEntry, load_generation, write_generation};
use std::fs;
use tempfile::TempDir;

fn heat() -> ExternalMatch {
    ExternalMatch {
        external_id: 949,
        canonical_title: "Heat".into(),
        release_date: Some("1995-12-15".into()),
        runtime: Some(170),
        content_rating: Some("R".into()),
        genres: vec!["Action".into(), "Crime".into()],
        cast: vec!["Al Pacino".into()],
        ..ExternalMatch::default()
    }
}

#[test]
fn load_legacy_generation_file() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("enriched.json");
    fs::write(
        &path,
        r#"[
  {
    "id": 1,
    "title": "Heat",
    "original_title": "Heat",
    "tmdb_id": 949,
    "release_date": "1995-12-15",
    "runtime": 170,
    "overview": "",
    "poster_path": "/heat.jpg",
    "backdrop_path": null,
    "vote_average": 7.9,
    "vote_count": 6000,
    "popularity": 40.5,
    "trailer_url": "https://www.youtube.com/watch?v=abc",
    "rating": "R",
    "genres": ["Action", "Crime"],
    "cast": ["Al Pacino", "Robert De Niro"],
    "sheet": "Action"
  }
]"#,
    )
    .unwrap();

    let entries = load_generation(&path).unwrap();
    assert_eq!(entries.len(), 1);
    let e = &entries[0];
    assert_eq!(e.tmdb_id, Some(949));
    assert_eq!(e.overview, None);
    assert_eq!(e.origin.as_deref(), Some("Action"));

    let m = e.to_match().unwrap();
    assert_eq!(m.canonical_title, "Heat");
    assert_eq!(m.content_rating.as_deref(), Some("R"));
    assert_eq!(m.vote_average, Some(7.9));
    assert_eq!(m.cast.len(), 2);
}

#[test]
fn write_then_load() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("nested").join("generation.json");

    let entries = vec![
        GenerationEntry::from_match("Heat (1995)", Some("Action".into()), &heat()),
        GenerationEntry::unmatched("Some Home Video", Some("Misc".into())),
    ];
    write_generation(&path, &entries).unwrap();

    let loaded = load_generation(&path).unwrap();
    assert_eq!(loaded, entries);
    assert_eq!(loaded[0].source_title.as_deref(), Some("Heat (1995)"));
    assert!(loaded[1].to_match().is_none());
}

#[test]
fn from_match_keeps_every_field() {
    let entry = GenerationEntry::from_match("Heat", None, &heat());
    assert_eq!(entry.to_match().unwrap(), heat());
}
