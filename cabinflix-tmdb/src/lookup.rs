use cabinflix_catalog::ExternalMatch;

use crate::client::TmdbClient;
use crate::error::LookupError;
use crate::types::SearchHit;

/// A source of movie metadata.
///
/// The reconciliation engine depends only on this trait, so it can run
/// against TMDB, a recorded fixture, or a test double.
pub trait MetadataLookup {
    /// Candidate movies for a title, most relevant first. May be empty.
    fn search(&self, title: &str) -> Result<Vec<SearchHit>, LookupError>;

    /// Full metadata for one provider id.
    fn details(&self, external_id: i64) -> Result<ExternalMatch, LookupError>;
}

impl MetadataLookup for TmdbClient {
    fn search(&self, title: &str) -> Result<Vec<SearchHit>, LookupError> {
        self.search_movie(title)
    }

    fn details(&self, external_id: i64) -> Result<ExternalMatch, LookupError> {
        Ok(self.movie_details(external_id)?.into_match())
    }
}

impl<T: MetadataLookup + ?Sized> MetadataLookup for &T {
    fn search(&self, title: &str) -> Result<Vec<SearchHit>, LookupError> {
        (**self).search(title)
    }

    fn details(&self, external_id: i64) -> Result<ExternalMatch, LookupError> {
        (**self).details(external_id)
    }
}

/// Search for `title` and fetch details of the top hit.
///
/// `Ok(None)` means the search returned no candidates.
pub fn lookup_first(
    lookup: &dyn MetadataLookup,
    title: &str,
) -> Result<Option<ExternalMatch>, LookupError> {
    let hits = lookup.search(title)?;
    match hits.first() {
        Some(hit) => lookup.details(hit.id).map(Some),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct Canned {
        hits: Vec<SearchHit>,
        fetched: RefCell<Vec<i64>>,
    }

    impl MetadataLookup for Canned {
        fn search(&self, _title: &str) -> Result<Vec<SearchHit>, LookupError> {
            Ok(self.hits.clone())
        }

        fn details(&self, external_id: i64) -> Result<ExternalMatch, LookupError> {
            self.fetched.borrow_mut().push(external_id);
            Ok(ExternalMatch {
                external_id,
                canonical_title: format!("movie {external_id}"),
                ..ExternalMatch::default()
            })
        }
    }

    fn hit(id: i64) -> SearchHit {
        SearchHit {
            id,
            title: String::new(),
            original_title: None,
            release_date: None,
            popularity: None,
        }
    }

    #[test]
    fn takes_first_hit_only() {
        let lookup = Canned {
            hits: vec![hit(7), hit(3)],
            fetched: RefCell::new(Vec::new()),
        };
        let m = lookup_first(&lookup, "anything").unwrap().unwrap();
        assert_eq!(m.external_id, 7);
        assert_eq!(*lookup.fetched.borrow(), vec![7]);
    }

    #[test]
    fn no_hits_is_none() {
        let lookup = Canned {
            hits: vec![],
            fetched: RefCell::new(Vec::new()),
        };
        assert!(lookup_first(&lookup, "anything").unwrap().is_none());
        assert!(lookup.fetched.borrow().is_empty());
    }
}
