use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};

/// `[label]({% link target %})`, tolerating whitespace inside the parentheses.
static WRAPPED_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[([^\]]+)\]\(\s*\{%\s*link\s+([^\s%}]+)\s*%\}\s*\)")
        .expect("wrapped link pattern is valid")
});

/// Bare `{% link target %}` anywhere in the text.
static BARE_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{%\s*link\s+([^\s%}]+)\s*%\}").expect("bare link pattern is valid")
});

/// Replace Jekyll `link` tags with their target path.
///
/// A tag wrapped in a Markdown link keeps its label (`[label](target)`); a bare
/// tag collapses to the target itself.
pub fn rewrite_links(text: &str) -> Cow<'_, str> {
    let mut hits = 0;
    rewrite_links_counted(text, &mut hits)
}

pub(crate) fn rewrite_links_counted<'t>(text: &'t str, hits: &mut usize) -> Cow<'t, str> {
    let wrapped = WRAPPED_LINK.replace_all(text, |caps: &Captures<'_>| {
        *hits += 1;
        format!("[{}]({})", &caps[1], &caps[2])
    });

    let bare = match BARE_LINK.replace_all(&wrapped, |caps: &Captures<'_>| {
        *hits += 1;
        caps[1].to_string()
    }) {
        Cow::Borrowed(_) => None,
        Cow::Owned(owned) => Some(owned),
    };

    match bare {
        Some(owned) => Cow::Owned(owned),
        None => wrapped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrapped_link_keeps_label() {
        assert_eq!(
            rewrite_links("[See guide]({% link path/to/file.md %})"),
            "[See guide](path/to/file.md)"
        );
    }

    #[test]
    fn bare_link_becomes_target() {
        assert_eq!(
            rewrite_links("{% link path/to/file.md %}"),
            "path/to/file.md"
        );
    }

    #[test]
    fn tolerates_padding_around_tag() {
        assert_eq!(
            rewrite_links("[Docs]( {%link   docs/index.md%} )"),
            "[Docs](docs/index.md)"
        );
    }

    #[test]
    fn counts_each_substitution() {
        let mut hits = 0;
        let out = rewrite_links_counted(
            "[a]({% link a.md %}) and {% link b.md %} and {% link c.md %}",
            &mut hits,
        );
        assert_eq!(out, "[a](a.md) and b.md and c.md");
        assert_eq!(hits, 3);
    }

    #[test]
    fn unmatched_text_is_borrowed() {
        let text = "[plain](plain.md) {% linkage %}";
        assert!(matches!(rewrite_links(text), Cow::Borrowed(_)));
    }

    #[test]
    fn tag_without_target_is_not_matched() {
        let text = "{% link %}";
        assert_eq!(rewrite_links(text), text);
    }
}
