use super::*;

const DETAILS_JSON: &str = r#"{
  "id": 949,
  "title": "Heat",
  "original_title": "Heat",
  "release_date": "1995-12-15",
  "runtime": 170,
  "overview": "Obsessive master thief Neil McCauley...",
  "poster_path": "/heat.jpg",
  "backdrop_path": null,
  "vote_average": 7.9,
  "vote_count": 6400,
  "popularity": 40.2,
  "genres": [{"id": 28, "name": "Action"}, {"id": 80, "name": "Crime"}],
  "credits": {"cast": [
    {"name": "Al Pacino", "character": "Vincent Hanna"},
    {"name": "Robert De Niro"},
    {"name": "Val Kilmer"},
    {"name": "Jon Voight"},
    {"name": "Tom Sizemore"},
    {"name": "Diane Venora"}
  ]},
  "videos": {"results": [
    {"key": "teaser1", "site": "YouTube", "type": "Teaser", "official": true},
    {"key": "fan1", "site": "YouTube", "type": "Trailer", "official": false},
    {"key": "vim1", "site": "Vimeo", "type": "Trailer", "official": true},
    {"key": "off1", "site": "YouTube", "type": "Trailer", "official": true}
  ]},
  "release_dates": {"results": [
    {"iso_3166_1": "DE", "release_dates": [{"certification": "16", "type": 3}]},
    {"iso_3166_1": "US", "release_dates": [
      {"certification": "", "type": 1},
      {"certification": "R", "type": 3},
      {"certification": "NR", "type": 5}
    ]}
  ]}
}"#;

fn details() -> MovieDetails {
    serde_json::from_str(DETAILS_JSON).unwrap()
}

#[test]
fn certification_uses_us_theatrical_release() {
    assert_eq!(details().certification().as_deref(), Some("R"));
}

#[test]
fn certification_missing_without_us_theatrical() {
    let mut d = details();
    if let Some(rd) = d.release_dates.as_mut() {
        rd.results.retain(|c| c.iso_3166_1 != "US");
    }
    assert_eq!(d.certification(), None);

    let mut d = details();
    d.release_dates = None;
    assert_eq!(d.certification(), None);
}

#[test]
fn empty_certification_is_missing() {
    let json = r#"{"id": 1, "title": "X", "release_dates": {"results": [
        {"iso_3166_1": "US", "release_dates": [{"certification": "", "type": 3}]}
    ]}}"#;
    let d: MovieDetails = serde_json::from_str(json).unwrap();
    assert_eq!(d.certification(), None);
}

#[test]
fn trailer_prefers_official() {
    assert_eq!(
        details().trailer_url().as_deref(),
        Some("https://www.youtube.com/watch?v=off1")
    );
}

#[test]
fn trailer_falls_back_to_first_youtube_trailer() {
    let mut d = details();
    if let Some(v) = d.videos.as_mut() {
        v.results.retain(|v| v.key != "off1");
    }
    assert_eq!(
        d.trailer_url().as_deref(),
        Some("https://www.youtube.com/watch?v=fan1")
    );
}

#[test]
fn no_trailer_without_youtube_trailers() {
    let mut d = details();
    if let Some(v) = d.videos.as_mut() {
        v.results.retain(|v| v.site != "YouTube" || v.video_type != "Trailer");
    }
    assert_eq!(d.trailer_url(), None);
}

#[test]
fn into_match_converts_every_field() {
    let m = details().into_match();
    assert_eq!(m.external_id, 949);
    assert_eq!(m.canonical_title, "Heat");
    assert_eq!(m.runtime, Some(170));
    assert_eq!(m.backdrop_path, None);
    assert_eq!(m.genres, vec!["Action", "Crime"]);
    assert_eq!(m.cast.len(), 5);
    assert_eq!(m.cast[0], "Al Pacino");
    assert_eq!(m.content_rating.as_deref(), Some("R"));
}

#[test]
fn minimal_details_parse() {
    let d: MovieDetails = serde_json::from_str(r#"{"id": 7, "title": "Q", "release_date": ""}"#).unwrap();
    let m = d.into_match();
    assert_eq!(m.release_date, None);
    assert!(m.genres.is_empty());
    assert!(m.cast.is_empty());
    assert_eq!(m.trailer_url, None);
}

#[test]
fn search_response_keeps_provider_order() {
    let json = r#"{"page": 1, "total_results": 2, "results": [
        {"id": 2, "title": "Second Best", "popularity": 99.0},
        {"id": 1, "title": "First"}
    ]}"#;
    let r: SearchResponse = serde_json::from_str(json).unwrap();
    assert_eq!(r.results[0].id, 2);
    assert_eq!(r.total_results, 2);
}
