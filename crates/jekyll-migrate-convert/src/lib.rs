//! Rewrite rules that migrate Jekyll liquid markup to admonition-flavoured Markdown.
//!
//! Conversion is a fixed pipeline of three independent text rules:
//! cross-reference links, fragment includes, then callout markers. Each rule
//! is exposed on its own so callers (and tests) can run it in isolation;
//! [`convert`] runs the full pipeline and tallies how often each rule fired.
//! Text that matches no rule is passed through untouched.

mod callouts;
mod includes;
mod links;

pub use callouts::{rewrite_callouts, CalloutKind, DEFAULT_WARNING_TITLE};
pub use includes::{
    contains_review_marker, is_structural_fragment, review_marker, rewrite_includes,
    IncludeHits, REVIEW_MARKER_PREFIX, STRUCTURAL_FRAGMENTS,
};
pub use links::rewrite_links;

/// Number of substitutions performed by each rule during a conversion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RuleHits {
    pub links: usize,
    pub includes_removed: usize,
    pub includes_flagged: usize,
    pub callouts: usize,
}

impl RuleHits {
    pub fn total(&self) -> usize {
        self.links + self.includes_removed + self.includes_flagged + self.callouts
    }
}

/// Result of running the full rule pipeline over one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    pub content: String,
    pub changed: bool,
    pub hits: RuleHits,
}

impl Conversion {
    /// True when the converted text still carries an unresolved-include marker.
    pub fn needs_review(&self) -> bool {
        contains_review_marker(&self.content)
    }
}

/// Apply link, include, and callout rewrites, in that order.
pub fn convert(text: &str) -> Conversion {
    let mut hits = RuleHits::default();

    let linked = links::rewrite_links_counted(text, &mut hits.links);

    let mut include_hits = IncludeHits::default();
    let included = includes::rewrite_includes_counted(&linked, &mut include_hits).into_owned();
    hits.includes_removed = include_hits.removed;
    hits.includes_flagged = include_hits.flagged;

    let content = callouts::rewrite_callouts_counted(&included, &mut hits.callouts).into_owned();

    Conversion {
        changed: content != text,
        content,
        hits,
    }
}
