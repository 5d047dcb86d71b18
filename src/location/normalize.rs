//! Splitting and canonicalizing raw location mentions.

use std::sync::LazyLock;

use regex::Regex;

static ROUTE_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*(?:->|=>|→|—|–)\s*|\s+-\s+").expect("static regex"));

/// Characters authors leave at the end of a name as markers. Closing
/// brackets and double quotes count only when left unbalanced.
const DECORATION: &[char] = &['*', '?', '!', '.', ',', ';', ':', '~', '#', '+', '\''];

/// Splits a multi-stop route (`"A -> B - C"`) into its stops.
///
/// Hyphens inside a word (`"Nowa-Wieś"`) are not separators.
#[must_use]
pub fn split_route(text: &str) -> Vec<&str> {
    ROUTE_SEPARATOR
        .split(text)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Path segments of a mention with whitespace collapsed. Segments that are
/// empty, or only decoration, are dropped.
#[must_use]
pub fn segments(mention: &str) -> Vec<String> {
    mention
        .split('/')
        .map(collapse_whitespace)
        .filter(|s| !segment_key(s).is_empty())
        .collect()
}

/// Grouping key of a single segment: decoration stripped, case folded.
#[must_use]
pub fn segment_key(segment: &str) -> String {
    strip_decoration(&collapse_whitespace(segment)).to_lowercase()
}

/// A segment without its trailing decoration.
///
/// `Dom (Stary)` keeps its bracket; `Dom (Stary))` and `Młyn"` lose the
/// unmatched one.
#[must_use]
pub fn strip_decoration(segment: &str) -> &str {
    let mut rest = segment.trim_end();
    while let Some(last) = rest.chars().next_back() {
        let strip = match last {
            ')' => unbalanced(rest, '(', ')'),
            ']' => unbalanced(rest, '[', ']'),
            '}' => unbalanced(rest, '{', '}'),
            '"' => rest.matches('"').count() % 2 == 1,
            other => DECORATION.contains(&other),
        };
        if !strip {
            break;
        }
        rest = rest[..rest.len() - last.len_utf8()].trim_end();
    }
    rest
}

fn unbalanced(s: &str, open: char, close: char) -> bool {
    s.matches(close).count() > s.matches(open).count()
}

/// Same spelling with decoration removed from every segment.
#[must_use]
pub fn undecorated(spelling: &str) -> String {
    spelling
        .split('/')
        .map(strip_decoration)
        .collect::<Vec<_>>()
        .join("/")
}

/// True if any segment of `spelling` ends in decoration.
#[must_use]
pub fn is_decorated(spelling: &str) -> bool {
    spelling.split('/').any(|s| strip_decoration(s) != s.trim_end())
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_route() {
        assert_eq!(split_route("A -> B - C"), vec!["A", "B", "C"]);
        assert_eq!(split_route("Brama => Rynek → Zamek"), vec!["Brama", "Rynek", "Zamek"]);
        assert_eq!(split_route("Nowa-Wieś"), vec!["Nowa-Wieś"]);
        assert_eq!(split_route("  Stolica/Targowisko  "), vec!["Stolica/Targowisko"]);
        assert!(split_route(" -> ").is_empty());
    }

    #[test]
    fn test_segments() {
        assert_eq!(segments("Stolica / Stare  Miasto"), vec!["Stolica", "Stare Miasto"]);
        assert_eq!(segments("Stolica/"), vec!["Stolica"]);
        assert_eq!(segments("*/Brama"), vec!["Brama"]);
    }

    #[test]
    fn test_segment_key() {
        assert_eq!(segment_key("targowisko*"), "targowisko");
        assert_eq!(segment_key(" Targowisko?! "), "targowisko");
        assert_eq!(segment_key("***"), "");
    }

    #[test]
    fn test_balanced_brackets_and_quotes_are_kept() {
        assert_eq!(segment_key("Karczma \"Pod Kogutem\""), "karczma \"pod kogutem\"");
        assert_eq!(segment_key("Karczma \"Pod Kogutem\"*"), "karczma \"pod kogutem\"");
        assert_eq!(segment_key("Dom (Stary)"), "dom (stary)");
        assert_eq!(segment_key("Dom (Stary)?"), "dom (stary)");
        assert_eq!(segment_key("Dom [Stary]]"), "dom [stary]");
        assert_eq!(segment_key("Młyn)"), "młyn");
        assert_eq!(segment_key("Młyn\""), "młyn");
        assert!(!is_decorated("Dom (Stary)"));
        assert!(is_decorated("Młyn)"));
    }

    #[test]
    fn test_decoration_helpers() {
        assert!(is_decorated("targowisko*"));
        assert!(is_decorated("Stolica*/Brama"));
        assert!(!is_decorated("Stolica/Brama"));
        assert_eq!(undecorated("Stolica*/Brama?"), "Stolica/Brama");
    }
}
