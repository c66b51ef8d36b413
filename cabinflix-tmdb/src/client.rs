use std::sync::Mutex;
use std::time::{Duration, Instant};

use serde::de::DeserializeOwned;

use crate::config::TmdbConfig;
use crate::error::LookupError;
use crate::types::{ErrorBody, MovieDetails, SearchHit, SearchResponse};

const BASE_URL: &str = "https://api.themoviedb.org/3";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Blocking HTTP client for the TMDB v3 API with a flat inter-request delay.
pub struct TmdbClient {
    http: reqwest::blocking::Client,
    api_key: String,
    language: String,
    base_url: String,
    min_interval: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl TmdbClient {
    pub fn new(config: &TmdbConfig) -> Result<Self, LookupError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            api_key: config.api_key.clone(),
            language: config.language.clone(),
            base_url: BASE_URL.to_string(),
            min_interval: config.request_delay,
            last_request: Mutex::new(None),
        })
    }

    /// Point the client at a different API root (e.g. a local mock server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Search movies by title. Results are in provider relevance order.
    pub fn search_movie(&self, query: &str) -> Result<Vec<SearchHit>, LookupError> {
        let resp: SearchResponse = self.get_json(
            "/search/movie",
            &[
                ("query", query),
                ("language", self.language.as_str()),
                ("page", "1"),
                ("include_adult", "false"),
            ],
        )?;
        log::debug!(
            "TMDB search '{}': {} result(s)",
            query,
            resp.total_results
        );
        Ok(resp.results)
    }

    /// Full details for one movie, with credits, videos and release dates.
    pub fn movie_details(&self, tmdb_id: i64) -> Result<MovieDetails, LookupError> {
        self.get_json(
            &format!("/movie/{tmdb_id}"),
            &[
                ("language", self.language.as_str()),
                ("append_to_response", "credits,videos,release_dates"),
            ],
        )
    }

    fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T, LookupError> {
        self.rate_limit();

        let resp = self
            .http
            .get(format!("{}{}", self.base_url, path))
            .query(&[("api_key", self.api_key.as_str())])
            .query(params)
            .send()?;

        let status = resp.status();
        let text = resp.text()?;

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(LookupError::InvalidApiKey);
        }
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(LookupError::RateLimit);
        }
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(LookupError::NotFound(path.to_string()));
        }
        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&text)
                .map(|b| b.status_message)
                .unwrap_or_else(|_| text.chars().take(200).collect());
            return Err(LookupError::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(serde_json::from_str(&text)?)
    }

    /// Sleep until at least `min_interval` has passed since the last request.
    fn rate_limit(&self) {
        let mut last = self
            .last_request
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(prev) = *last {
            let elapsed = prev.elapsed();
            if elapsed < self.min_interval {
                std::thread::sleep(self.min_interval - elapsed);
            }
        }
        *last = Some(Instant::now());
    }
}
