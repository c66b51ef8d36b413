use cabinflix_catalog::ExternalMatch;
use serde::Deserialize;

/// Region whose certification is used as the content rating.
const CERTIFICATION_REGION: &str = "US";
/// TMDB release type code for a theatrical release.
const THEATRICAL_RELEASE: i64 = 3;
/// Number of top-billed cast names kept.
const CAST_LIMIT: usize = 5;

const YOUTUBE_WATCH_URL: &str = "https://www.youtube.com/watch?v=";

/// Response body of `/search/movie`.
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<SearchHit>,
    #[serde(default)]
    pub total_results: i64,
}

/// One candidate from a title search, in provider relevance order.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SearchHit {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub original_title: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub popularity: Option<f64>,
}

/// Response body of `/movie/{id}` with credits, videos and release dates
/// appended.
#[derive(Debug, Clone, Deserialize)]
pub struct MovieDetails {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub original_title: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub runtime: Option<i64>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub vote_count: Option<i64>,
    #[serde(default)]
    pub popularity: Option<f64>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub credits: Option<Credits>,
    #[serde(default)]
    pub videos: Option<Videos>,
    #[serde(default)]
    pub release_dates: Option<ReleaseDates>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Genre {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Credits {
    #[serde(default)]
    pub cast: Vec<CastMember>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CastMember {
    pub name: String,
    #[serde(default)]
    pub character: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Videos {
    #[serde(default)]
    pub results: Vec<Video>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Video {
    pub key: String,
    #[serde(default)]
    pub site: String,
    #[serde(default, rename = "type")]
    pub video_type: String,
    #[serde(default)]
    pub official: bool,
}

impl Video {
    fn is_youtube_trailer(&self) -> bool {
        self.site == "YouTube" && self.video_type == "Trailer"
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReleaseDates {
    #[serde(default)]
    pub results: Vec<CountryReleases>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CountryReleases {
    pub iso_3166_1: String,
    #[serde(default)]
    pub release_dates: Vec<Release>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Release {
    #[serde(default)]
    pub certification: String,
    #[serde(rename = "type")]
    pub release_type: i64,
}

/// Error body TMDB returns alongside non-2xx statuses.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub status_code: i64,
    #[serde(default)]
    pub status_message: String,
}

impl MovieDetails {
    /// US theatrical certification, if one is listed.
    pub fn certification(&self) -> Option<String> {
        let country = self
            .release_dates
            .as_ref()?
            .results
            .iter()
            .find(|c| c.iso_3166_1 == CERTIFICATION_REGION)?;
        let release = country
            .release_dates
            .iter()
            .find(|r| r.release_type == THEATRICAL_RELEASE)?;
        let cert = release.certification.trim();
        (!cert.is_empty()).then(|| cert.to_string())
    }

    /// Watch URL of the official YouTube trailer, else the first YouTube
    /// trailer.
    pub fn trailer_url(&self) -> Option<String> {
        let videos = &self.videos.as_ref()?.results;
        let trailer = videos
            .iter()
            .find(|v| v.is_youtube_trailer() && v.official)
            .or_else(|| videos.iter().find(|v| v.is_youtube_trailer()))?;
        Some(format!("{YOUTUBE_WATCH_URL}{}", trailer.key))
    }

    /// Top-billed cast names.
    pub fn top_cast(&self) -> Vec<String> {
        self.credits
            .as_ref()
            .map(|c| {
                c.cast
                    .iter()
                    .take(CAST_LIMIT)
                    .map(|m| m.name.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Convert to the engine's provider-neutral record.
    pub fn into_match(self) -> ExternalMatch {
        let content_rating = self.certification();
        let trailer_url = self.trailer_url();
        let cast = self.top_cast();
        ExternalMatch {
            external_id: self.id,
            canonical_title: self.title,
            original_title: non_empty(self.original_title),
            release_date: non_empty(self.release_date),
            runtime: self.runtime,
            overview: non_empty(self.overview),
            poster_path: non_empty(self.poster_path),
            backdrop_path: non_empty(self.backdrop_path),
            vote_average: self.vote_average,
            vote_count: self.vote_count,
            popularity: self.popularity,
            content_rating,
            trailer_url,
            genres: self.genres.into_iter().map(|g| g.name).collect(),
            cast,
        }
    }
}

/// TMDB sends `""` for some unknown dates and overviews.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
#[path = "tests/types_tests.rs"]
mod tests;
