//! Centralized name handling for source paths.
//!
//! Every artifact derives two things from its filesystem name: a display title
//! and (when prettification is on) a normalized URL path. Both live here so the
//! artifact model, navigation, and home resolution agree on them.
//!
//! ## Display Titles
//!
//! Separators (`-` and `_`) become spaces unless they sit between two digits,
//! then every word is title-cased:
//! - `my-page` → "My Page"
//! - `getting_started` → "Getting Started"
//! - `2024-01-05` → "2024-01-05" (date separators survive)
//! - `release_1_2` → "Release 1_2"
//!
//! ## Pretty Paths
//!
//! Directory paths are normalized to lowercase, hyphen-separated segments:
//! - `My Blog/Old_Posts` → `my-blog/old-posts`
//! - `Q&A` → `qa`

use regex::Regex;
use std::sync::LazyLock;

static SEPARATOR_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[_\-\s]+").expect("separator pattern is valid"));

static DISALLOWED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9/\-]").expect("disallowed pattern is valid"));

fn is_separator(c: char) -> bool {
    c == '-' || c == '_'
}

/// Convert a file stem into a displayable title.
///
/// Runs two passes over the name: the first turns a separator into a space
/// when the character before it is not a digit, the second when the character
/// after it is not a digit. A separator flanked by digits on both sides is
/// kept as-is.
pub fn slug_to_title(slug: &str) -> String {
    let original: Vec<char> = slug.chars().collect();

    let mut first: Vec<char> = original.clone();
    for i in 1..original.len() {
        if is_separator(original[i]) && !original[i - 1].is_ascii_digit() {
            first[i] = ' ';
        }
    }

    let mut second = first.clone();
    for i in 0..first.len().saturating_sub(1) {
        if is_separator(first[i]) && !first[i + 1].is_ascii_digit() {
            second[i] = ' ';
        }
    }

    let spaced: String = second.into_iter().collect();
    title_case(spaced.trim())
}

/// Uppercase the first letter of every word and lowercase the rest.
///
/// A "word" starts at any letter that follows a non-letter, so `2nd` becomes
/// `2Nd` and `o'neil` becomes `O'Neil`.
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

/// Normalize a `/`-separated directory path for use in URLs.
///
/// Separator runs collapse to a single `-`, anything outside
/// `[a-zA-Z0-9/-]` is dropped, and the result is lowercased. Segments left
/// empty by the normalization are removed.
pub fn prettify_dir(dir: &str) -> String {
    let hyphenated = SEPARATOR_RUNS.replace_all(dir, "-");
    let cleaned = DISALLOWED.replace_all(&hyphenated, "");
    cleaned
        .to_lowercase()
        .split('/')
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}
