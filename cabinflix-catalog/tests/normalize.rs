use cabinflix_catalog::normalize::{normalize, strip_leading_article, strip_release_suffix};

fn keys(raw: &str) -> Vec<String> {
    normalize(raw).collect()
}

#[test]
fn plain_title_yields_only_verbatim() {
    assert_eq!(keys("Memento"), vec!["Memento"]);
}

#[test]
fn verbatim_always_first() {
    let k = keys("The Thing (1982)");
    assert_eq!(k[0], "The Thing (1982)");
    assert_eq!(k[1], "Thing");
}

#[test]
fn film_marker_is_case_insensitive() {
    assert_eq!(keys("Crash (Film)"), vec!["Crash (Film)", "Crash"]);
    assert_eq!(keys("Crash (MOVIE)"), vec!["Crash (MOVIE)", "Crash"]);
}

#[test]
fn other_parentheticals_are_kept() {
    assert_eq!(strip_release_suffix("Alien (Special Edition)"), "Alien (Special Edition)");
    assert_eq!(strip_release_suffix("Alien (1879)"), "Alien (1879)");
    assert_eq!(strip_release_suffix("Alien (2003)"), "Alien");
}

#[test]
fn ampersand_and_word_swap_both_ways() {
    assert_eq!(
        keys("Harold & Kumar"),
        vec!["Harold & Kumar", "Harold and Kumar"]
    );
    assert_eq!(
        keys("Cloudy with a Chance of Meatballs and More"),
        vec![
            "Cloudy with a Chance of Meatballs and More",
            "Cloudy with a Chance of Meatballs & More",
        ]
    );
}

#[test]
fn punctuation_variants_are_independent() {
    let k = keys("Don't Look Up: Really?");
    assert_eq!(
        k,
        vec![
            "Don't Look Up: Really?",
            "Dont Look Up: Really?",
            "Don't Look Up Really?",
            "Don't Look Up: Really",
        ]
    );
}

#[test]
fn duplicate_keys_are_not_repeated() {
    // Nothing to clean, and no variant applies: one key only.
    assert_eq!(keys("Heat"), vec!["Heat"]);
    // Only the quote-stripping variant differs from the raw title.
    let k = keys("\"Crocodile\" Dundee");
    assert_eq!(k, vec!["\"Crocodile\" Dundee", "Crocodile Dundee"]);
}

#[test]
fn article_stripping_never_empties() {
    assert_eq!(strip_leading_article("The "), "The ");
    assert_eq!(strip_leading_article("A Bug's Life"), "Bug's Life");
    assert_eq!(strip_leading_article("Theodore"), "Theodore");
    assert_eq!(strip_leading_article("the Birds"), "the Birds");
}

#[test]
fn blank_title_yields_nothing() {
    assert!(keys("   ").is_empty());
}

#[test]
fn deterministic() {
    let raw = "The Lord of the Rings: The Two Towers (2002)";
    assert_eq!(keys(raw), keys(raw));
}

#[test]
fn lazy_iteration_stops_early() {
    let mut it = normalize("Bill & Ted's Excellent Adventure (1989)");
    assert_eq!(it.next().as_deref(), Some("Bill & Ted's Excellent Adventure (1989)"));
    assert_eq!(it.next().as_deref(), Some("Bill & Ted's Excellent Adventure"));
}
