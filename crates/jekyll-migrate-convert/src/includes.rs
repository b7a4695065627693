use std::borrow::Cow;
use std::collections::HashSet;
use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Layout-level fragments with no counterpart in the target dialect.
///
/// Entries may carry a directory prefix; a reference matches when it equals an
/// entry or ends with `/<entry>`.
pub const STRUCTURAL_FRAGMENTS: &[&str] = &[
    "toc.html",
    "toc_2-3.html",
    "toc_2-4.html",
    "head.html",
    "footer.html",
    "header_menu.html",
    "nav.html",
    "mermaid_setup.html",
    "gtag_frame.html",
    "swagger.html",
    "authorization.html",
    "vendor/anchor_headings.html",
    "setup.md",
];

/// Leading text of every review marker left behind for unresolved includes.
pub const REVIEW_MARKER_PREFIX: &str = "<!-- Jekyll include:";

static FRAGMENT_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| STRUCTURAL_FRAGMENTS.iter().copied().collect());

static INCLUDE_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{%\s*(?:include|include_relative)\s+([^\s%}]+)\s*%\}")
        .expect("include pattern is valid")
});

/// Tally of include tags dropped versus flagged for review.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IncludeHits {
    pub removed: usize,
    pub flagged: usize,
}

/// Whether `reference` names an allow-listed structural fragment.
pub fn is_structural_fragment(reference: &str) -> bool {
    if FRAGMENT_SET.contains(reference) {
        return true;
    }
    reference
        .match_indices('/')
        .any(|(idx, _)| FRAGMENT_SET.contains(&reference[idx + 1..]))
}

/// Marker comment substituted for an include that could not be resolved.
pub fn review_marker(reference: &str) -> String {
    format!("{REVIEW_MARKER_PREFIX} {reference} needs review -->")
}

pub fn contains_review_marker(text: &str) -> bool {
    text.contains(REVIEW_MARKER_PREFIX)
}

/// Drop structural `include`/`include_relative` tags and flag the rest.
pub fn rewrite_includes(text: &str) -> Cow<'_, str> {
    let mut hits = IncludeHits::default();
    rewrite_includes_counted(text, &mut hits)
}

pub(crate) fn rewrite_includes_counted<'t>(text: &'t str, hits: &mut IncludeHits) -> Cow<'t, str> {
    INCLUDE_TAG.replace_all(text, |caps: &Captures<'_>| {
        let reference = caps[1].trim();
        if is_structural_fragment(reference) {
            hits.removed += 1;
            String::new()
        } else {
            hits.flagged += 1;
            review_marker(reference)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allow_listed_fragment_is_removed() {
        assert_eq!(rewrite_includes("{% include toc.html %}"), "");
    }

    #[test]
    fn unknown_fragment_gets_review_marker() {
        assert_eq!(
            rewrite_includes("{% include custom_widget.html %}"),
            "<!-- Jekyll include: custom_widget.html needs review -->"
        );
    }

    #[test]
    fn include_relative_is_handled() {
        assert_eq!(
            rewrite_includes("a{% include_relative includes/setup.md %}b"),
            "ab"
        );
    }

    #[test]
    fn matches_on_final_path_segment() {
        assert!(is_structural_fragment("toc.html"));
        assert!(is_structural_fragment("partials/footer.html"));
        assert!(is_structural_fragment("vendor/anchor_headings.html"));
        assert!(is_structural_fragment("_includes/vendor/anchor_headings.html"));
        assert!(!is_structural_fragment("anchor_headings.html"));
        assert!(!is_structural_fragment("mytoc.html"));
        assert!(!is_structural_fragment("toc.html/extra"));
    }

    #[test]
    fn marker_keeps_qualified_reference() {
        let mut hits = IncludeHits::default();
        let out = rewrite_includes_counted(
            "{% include widgets/chart.html %}\n{% include nav.html %}\n",
            &mut hits,
        );
        assert_eq!(
            out,
            "<!-- Jekyll include: widgets/chart.html needs review -->\n\n"
        );
        assert_eq!(hits, IncludeHits { removed: 1, flagged: 1 });
    }

    #[test]
    fn marker_is_not_rematched() {
        let marked = rewrite_includes("{% include widget.html %}").into_owned();
        assert!(contains_review_marker(&marked));
        assert_eq!(rewrite_includes(&marked), marked);
    }
}
