//! Slug derivation for primary text fields.

use std::sync::LazyLock;

use regex::Regex;

static NON_SLUG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9_\s-]").unwrap());
static RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\s-]+").unwrap());
static SEPARATOR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\s_]").unwrap());

/// Derive the `stripped` slug: lowercase, drop everything outside
/// `[a-z0-9_ -]`, collapse whitespace/dash runs, then join with dashes.
pub fn strip_text(text: &str) -> String {
    let lowered = text.to_lowercase();
    let cleaned = NON_SLUG.replace_all(&lowered, "");
    let collapsed = RUNS.replace_all(&cleaned, " ");
    SEPARATOR.replace_all(&collapsed, "-").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_title() {
        assert_eq!(strip_text("Hello, World!"), "hello-world");
    }

    #[test]
    fn punctuation_is_dropped_before_joining() {
        assert_eq!(strip_text("Law & Order: Annual Review"), "law-order-annual-review");
    }

    #[test]
    fn runs_of_spaces_and_dashes_collapse() {
        assert_eq!(strip_text("spaced   --  out"), "spaced-out");
    }

    #[test]
    fn underscores_become_dashes() {
        assert_eq!(strip_text("snake_case_title"), "snake-case-title");
    }

    #[test]
    fn digits_survive() {
        assert_eq!(strip_text("Top 10 Rulings of 2024"), "top-10-rulings-of-2024");
    }

    #[test]
    fn idempotent_on_existing_slugs() {
        let once = strip_text("Annual General Meeting");
        assert_eq!(strip_text(&once), once);
    }
}
