//! Search-key generation for noisy curated titles.
//!
//! Curated titles are typed by hand and rarely match the provider's spelling
//! on the first try. [`normalize`] yields the ordered search keys the match
//! resolver tries, most specific first:
//!
//! ```text
//! 1. the raw title verbatim
//! 2. trailing "(1999)" / "(film)" / "(movie)" removed, leading article removed
//! 3. punctuation variants, each applied on its own to the raw title:
//!    " & " -> " and ", " and " -> " & ", and ' " : ! ? stripped
//! ```
//!
//! Candidates are produced lazily so the resolver stops generating keys as
//! soon as one of them hits. A key identical to one already produced is
//! skipped, and empty keys are never produced.

/// Articles removed from the front of a title when building the cleaned key.
const LEADING_ARTICLES: &[&str] = &["The ", "A ", "An "];

/// Parenthetical markers removed from the end of a title (besides years).
const RELEASE_MARKERS: &[&str] = &["film", "movie"];

/// Punctuation variant `i`, applied to the raw title. `None` past the last one.
fn variant(i: usize, title: &str) -> Option<String> {
    let v = match i {
        0 => title.replace(" & ", " and "),
        1 => title.replace(" and ", " & "),
        2 => title.replace('\'', ""),
        3 => title.replace('"', ""),
        4 => title.replace(':', ""),
        5 => title.replace('!', ""),
        6 => title.replace('?', ""),
        _ => return None,
    };
    Some(v)
}

/// Produce the ordered search keys for a raw title.
///
/// ```
/// use cabinflix_catalog::normalize::normalize;
///
/// let keys: Vec<String> = normalize("The Iceman (2012)").collect();
/// assert_eq!(keys, vec!["The Iceman (2012)", "Iceman"]);
///
/// let keys: Vec<String> = normalize("Memento").collect();
/// assert_eq!(keys, vec!["Memento"]);
/// ```
pub fn normalize(raw: &str) -> Candidates<'_> {
    Candidates {
        raw,
        stage: Stage::Verbatim,
        emitted: Vec::new(),
    }
}

#[derive(Debug, Clone, Copy)]
enum Stage {
    Verbatim,
    Cleaned,
    Variant(usize),
    Done,
}

/// Lazy iterator over the search keys for one raw title.
#[derive(Debug, Clone)]
pub struct Candidates<'a> {
    raw: &'a str,
    stage: Stage,
    emitted: Vec<String>,
}

impl Iterator for Candidates<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        loop {
            let candidate = match self.stage {
                Stage::Verbatim => {
                    self.stage = Stage::Cleaned;
                    self.raw.to_string()
                }
                Stage::Cleaned => {
                    self.stage = Stage::Variant(0);
                    clean_title(self.raw)
                }
                Stage::Variant(i) => match variant(i, self.raw) {
                    Some(v) => {
                        self.stage = Stage::Variant(i + 1);
                        v
                    }
                    None => {
                        self.stage = Stage::Done;
                        continue;
                    }
                },
                Stage::Done => return None,
            };

            if candidate.trim().is_empty() || self.emitted.contains(&candidate) {
                continue;
            }
            self.emitted.push(candidate.clone());
            return Some(candidate);
        }
    }
}

/// Trimmed title with release marker and leading article removed.
fn clean_title(raw: &str) -> String {
    strip_leading_article(strip_release_suffix(raw.trim()))
        .trim()
        .to_string()
}

/// Remove a trailing parenthetical year, `(film)` or `(movie)` marker.
///
/// Matching is case-insensitive. Any other parenthetical is left alone.
///
/// ```
/// use cabinflix_catalog::normalize::strip_release_suffix;
///
/// assert_eq!(strip_release_suffix("Crash (2004)"), "Crash");
/// assert_eq!(strip_release_suffix("Heat (FILM)"), "Heat");
/// assert_eq!(strip_release_suffix("Alien (Director's Cut)"), "Alien (Director's Cut)");
/// ```
pub fn strip_release_suffix(title: &str) -> &str {
    if !title.ends_with(')') {
        return title;
    }
    let Some(open) = title.rfind('(') else {
        return title;
    };
    let inner = &title[open + 1..title.len() - 1];
    let is_marker = is_year(inner)
        || RELEASE_MARKERS
            .iter()
            .any(|m| inner.eq_ignore_ascii_case(m));
    if is_marker {
        title[..open].trim_end()
    } else {
        title
    }
}

/// Remove a single leading "The ", "A " or "An ".
///
/// Case-sensitive, and never reduces a title to nothing.
pub fn strip_leading_article(title: &str) -> &str {
    for article in LEADING_ARTICLES {
        if let Some(rest) = title.strip_prefix(article) {
            if !rest.trim().is_empty() {
                return rest;
            }
        }
    }
    title
}

fn is_year(s: &str) -> bool {
    s.len() == 4
        && s.bytes().all(|b| b.is_ascii_digit())
        && (s.starts_with("19") || s.starts_with("20"))
}
