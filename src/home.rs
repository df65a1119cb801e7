//! Home page resolution.
//!
//! Picks exactly one page as the site's home, first match wins:
//!
//! 1. the configured `home` source file, if it was discovered
//! 2. the first root page whose title contains `home`, `main`, `landing` or
//!    `welcome` (checked keyword by keyword, in that order)
//! 3. the first root page
//!
//! "First" in both rules means ordered by the name of the page's destination
//! directory, so a collapsed `zoo/a.md` sorts as `a` and the root index as the
//! empty name.
//!
//! A configured home that does not exist is a warning, not an error. A site
//! with no root pages at all is [`HomeError::NoContent`].

use crate::artifact::Artifact;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum HomeError {
    #[error("no pages found to use as the home page; check `source` and `pages`")]
    NoContent,
}

/// Title keywords that mark a home page, most preferred first.
pub const HOME_KEYWORDS: &[&str] = &["home", "main", "landing", "welcome"];

/// Where the home page came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeSource {
    Configured,
    Keyword(&'static str),
    FirstRootPage,
}

/// Resolve the home page among `root_pages` (indices into `artifacts`).
pub fn resolve_home(
    configured: Option<&Path>,
    source_root: &Path,
    artifacts: &[Artifact],
    root_pages: &[usize],
) -> Result<(usize, HomeSource), HomeError> {
    if let Some(home) = configured {
        match find_configured(home, source_root, artifacts) {
            Some(i) => return Ok((i, HomeSource::Configured)),
            None => tracing::warn!(
                home = %home.display(),
                "configured home page not found; falling back to title heuristics"
            ),
        }
    }

    let mut candidates = root_pages.to_vec();
    candidates.sort_by_cached_key(|&i| sort_key(&artifacts[i]));

    for keyword in HOME_KEYWORDS {
        let hit = candidates.iter().copied().find(|&i| {
            artifacts[i]
                .title()
                .is_some_and(|t| t.to_lowercase().contains(keyword))
        });
        if let Some(i) = hit {
            return Ok((i, HomeSource::Keyword(*keyword)));
        }
    }

    let first = candidates.first().copied().ok_or(HomeError::NoContent)?;
    Ok((first, HomeSource::FirstRootPage))
}

fn find_configured(home: &Path, source_root: &Path, artifacts: &[Artifact]) -> Option<usize> {
    let wanted: PathBuf = if home.is_absolute() {
        home.to_path_buf()
    } else {
        source_root.join(home)
    };
    let wanted = crate::paths::absolutize(&wanted).unwrap_or(wanted);
    artifacts
        .iter()
        .position(|a| a.kind.is_page() && a.is_live() && a.source == wanted)
}

/// Name of the destination's parent directory; empty for the root index.
fn sort_key(artifact: &Artifact) -> String {
    let context = artifact.context();
    let dst = context.get_str("dst").unwrap_or("");
    let dir = dst.rsplit_once('/').map_or("", |(dir, _)| dir);
    dir.rsplit('/').next().unwrap_or("").to_string()
}

/// Move the home page to the front of the root page list.
pub fn home_first(root_pages: &mut Vec<usize>, home: usize) {
    if let Some(pos) = root_pages.iter().position(|&i| i == home) {
        let entry = root_pages.remove(pos);
        root_pages.insert(0, entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::model;

    fn home_url(pages: &[&str], configured: Option<&str>) -> Result<(String, HomeSource), HomeError> {
        let m = model(pages, true);
        let nav = m.navigator();
        let roots = nav.root_pages();
        let configured = configured.map(Path::new);
        resolve_home(configured, &m.paths.source, &m.artifacts, &roots)
            .map(|(i, how)| (m.artifacts[i].url().unwrap_or("").to_string(), how))
    }

    #[test]
    fn configured_home_wins() {
        let (url, how) = home_url(&["home.md", "about.md"], Some("about.md")).unwrap();
        assert_eq!(url, "/about/");
        assert_eq!(how, HomeSource::Configured);
    }

    #[test]
    fn missing_configured_home_falls_back() {
        let (url, how) = home_url(&["zeta.md", "home.md"], Some("nope.md")).unwrap();
        assert_eq!(url, "/home/");
        assert_eq!(how, HomeSource::Keyword("home"));
    }

    #[test]
    fn home_keyword_beats_alphabetical_order() {
        let (url, _) = home_url(&["about.md", "contact.md", "home.md"], None).unwrap();
        assert_eq!(url, "/home/");
    }

    #[test]
    fn keywords_are_checked_in_preference_order() {
        let (url, how) = home_url(&["a-welcome.md", "main-page.md"], None).unwrap();
        assert_eq!(url, "/main-page/");
        assert_eq!(how, HomeSource::Keyword("main"));
    }

    #[test]
    fn keyword_match_is_case_insensitive_substring() {
        let (url, _) = home_url(&["about.md", "WELCOME_TOUR.md"], None).unwrap();
        assert_eq!(url, "/welcome-tour/");
    }

    #[test]
    fn falls_back_to_first_root_page_by_directory() {
        let (url, how) = home_url(&["zebra.md", "apple.md"], None).unwrap();
        assert_eq!(url, "/apple/");
        assert_eq!(how, HomeSource::FirstRootPage);
    }

    #[test]
    fn collapsed_page_sorts_by_its_own_name() {
        let (url, how) = home_url(&["b.md", "zoo/a.md"], None).unwrap();
        assert_eq!(url, "/zoo/a/");
        assert_eq!(how, HomeSource::FirstRootPage);
    }

    #[test]
    fn keyword_ties_go_to_the_first_name() {
        let (url, how) = home_url(&["welcome-z.md", "x/welcome-a.md"], None).unwrap();
        assert_eq!(url, "/x/welcome-a/");
        assert_eq!(how, HomeSource::Keyword("welcome"));
    }

    #[test]
    fn root_index_sorts_first() {
        let (url, _) = home_url(&["about.md", "index.md"], None).unwrap();
        assert_eq!(url, "/");
    }

    #[test]
    fn nested_only_page_is_home() {
        let (url, _) = home_url(&["docs/intro.md"], None).unwrap();
        assert_eq!(url, "/docs/intro/");
    }

    #[test]
    fn no_root_pages_is_no_content() {
        assert_eq!(home_url(&[], None), Err(HomeError::NoContent));
    }

    #[test]
    fn home_first_reorders() {
        let mut roots = vec![3, 1, 2];
        home_first(&mut roots, 2);
        assert_eq!(roots, vec![2, 3, 1]);
    }
}
