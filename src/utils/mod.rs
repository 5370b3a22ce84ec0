//! Utility functions and helpers.

pub mod log;

use scraper::{ElementRef, Selector};
use url::Url;

use crate::error::{AppError, Result};

/// Resolve a potentially relative URL against a base URL.
pub fn resolve_url(base: &Url, href: &str) -> String {
    base.join(href)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| href.to_string())
}

/// Compile a CSS selector, mapping failures to [`AppError::Selector`].
pub fn selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}

/// Text content of an element with whitespace runs collapsed.
pub fn element_text(element: &ElementRef) -> String {
    normalize_whitespace(&element.text().collect::<String>())
}

pub fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_url() {
        let base = Url::parse("https://www.pro-football-reference.com/years/2023/").unwrap();
        assert_eq!(
            resolve_url(&base, "/boxscores/202309070kan.htm"),
            "https://www.pro-football-reference.com/boxscores/202309070kan.htm"
        );
        assert_eq!(
            resolve_url(&base, "week_2.htm"),
            "https://www.pro-football-reference.com/years/2023/week_2.htm"
        );
        assert_eq!(resolve_url(&base, "https://other.com/x"), "https://other.com/x");
    }

    #[test]
    fn test_selector() {
        assert!(selector("table#kicking tbody tr").is_ok());
        assert!(selector("[[invalid").is_err());
    }

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_whitespace("  Tom \n  Brady\t"), "Tom Brady");
    }
}
