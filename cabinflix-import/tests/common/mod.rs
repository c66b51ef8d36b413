#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use cabinflix_catalog::{ExternalMatch, RawTitle};
use cabinflix_tmdb::{LookupError, MetadataLookup, SearchHit};

/// In-memory metadata provider. Searches match on exact key; every search
/// key is recorded in call order.
#[derive(Default)]
pub struct FakeLookup {
    by_key: HashMap<String, i64>,
    movies: HashMap<i64, ExternalMatch>,
    failing: HashSet<String>,
    calls: RefCell<Vec<String>>,
}

impl FakeLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `key` resolve to `m`.
    pub fn with(mut self, key: &str, m: ExternalMatch) -> Self {
        self.by_key.insert(key.to_string(), m.external_id);
        self.movies.insert(m.external_id, m);
        self
    }

    /// Make searches for `key` fail with a provider error.
    pub fn failing(mut self, key: &str) -> Self {
        self.failing.insert(key.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl MetadataLookup for FakeLookup {
    fn search(&self, title: &str) -> Result<Vec<SearchHit>, LookupError> {
        self.calls.borrow_mut().push(title.to_string());
        if self.failing.contains(title) {
            return Err(LookupError::Status {
                status: 503,
                message: "service unavailable".to_string(),
            });
        }
        Ok(self
            .by_key
            .get(title)
            .map(|id| {
                vec![SearchHit {
                    id: *id,
                    title: self.movies[id].canonical_title.clone(),
                    original_title: None,
                    release_date: None,
                    popularity: None,
                }]
            })
            .unwrap_or_default())
    }

    fn details(&self, external_id: i64) -> Result<ExternalMatch, LookupError> {
        self.movies
            .get(&external_id)
            .cloned()
            .ok_or_else(|| LookupError::NotFound(format!("movie {external_id}")))
    }
}

/// A fully populated match.
pub fn movie(id: i64, title: &str) -> ExternalMatch {
    ExternalMatch {
        external_id: id,
        canonical_title: title.to_string(),
        original_title: Some(title.to_string()),
        release_date: Some("2006-05-19".to_string()),
        runtime: Some(149),
        overview: Some(format!("Overview of {title}")),
        poster_path: Some(format!("/poster{id}.jpg")),
        backdrop_path: Some(format!("/backdrop{id}.jpg")),
        vote_average: Some(6.7),
        vote_count: Some(9000),
        popularity: Some(31.5),
        content_rating: Some("PG-13".to_string()),
        trailer_url: Some(format!("https://www.youtube.com/watch?v=key{id}")),
        genres: vec!["Mystery".to_string(), "Thriller".to_string()],
        cast: vec!["Someone".to_string()],
    }
}

/// Curated titles with the given texts, all from one sheet, in order.
pub fn titles(texts: &[&str]) -> Vec<RawTitle> {
    texts
        .iter()
        .enumerate()
        .map(|(i, t)| RawTitle::new(*t, "Movies", i))
        .collect()
}
