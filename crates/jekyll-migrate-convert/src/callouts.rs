use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Title applied to warning admonitions that do not set one explicitly.
pub const DEFAULT_WARNING_TITLE: &str = "⚠️ Warning ⚠️";

/// `{: .kind }` or `{: .kind title="..." }` at the start of a line.
static CALLOUT_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?m)^[ \t]*\{:[ \t]*\.(note|warning|tip|danger|info|success)[ \t]*(?:title=[ \t]*"([^"]*)")?[ \t]*\}"#,
    )
    .expect("callout pattern is valid")
});

/// Callout kinds understood by the converter.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum CalloutKind {
    Note,
    Warning,
    Tip,
    Danger,
    Info,
    Success,
}

impl CalloutKind {
    pub const ALL: &'static [CalloutKind] = &[
        CalloutKind::Note,
        CalloutKind::Warning,
        CalloutKind::Tip,
        CalloutKind::Danger,
        CalloutKind::Info,
        CalloutKind::Success,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CalloutKind::Note => "note",
            CalloutKind::Warning => "warning",
            CalloutKind::Tip => "tip",
            CalloutKind::Danger => "danger",
            CalloutKind::Info => "info",
            CalloutKind::Success => "success",
        }
    }

    pub fn default_title(self) -> Option<&'static str> {
        match self {
            CalloutKind::Warning => Some(DEFAULT_WARNING_TITLE),
            _ => None,
        }
    }

    /// Render the admonition header, preferring a non-empty explicit title.
    pub fn admonition(self, title: Option<&str>) -> String {
        let title = title
            .filter(|title| !title.is_empty())
            .or_else(|| self.default_title());
        match title {
            Some(title) => format!("!!! {} \"{}\"", self.as_str(), title),
            None => format!("!!! {}", self.as_str()),
        }
    }
}

impl fmt::Display for CalloutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CalloutKind {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "note" => Ok(CalloutKind::Note),
            "warning" => Ok(CalloutKind::Warning),
            "tip" => Ok(CalloutKind::Tip),
            "danger" => Ok(CalloutKind::Danger),
            "info" => Ok(CalloutKind::Info),
            "success" => Ok(CalloutKind::Success),
            _ => Err(()),
        }
    }
}

/// Turn line-leading block-attribute callouts into `!!!` admonition headers.
pub fn rewrite_callouts(text: &str) -> Cow<'_, str> {
    let mut hits = 0;
    rewrite_callouts_counted(text, &mut hits)
}

pub(crate) fn rewrite_callouts_counted<'t>(text: &'t str, hits: &mut usize) -> Cow<'t, str> {
    CALLOUT_MARKER.replace_all(text, |caps: &Captures<'_>| {
        // The pattern only admits enumerated kinds.
        match caps[1].parse::<CalloutKind>() {
            Ok(kind) => {
                *hits += 1;
                kind.admonition(caps.get(2).map(|m| m.as_str()))
            }
            Err(()) => caps[0].to_string(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warning_gets_default_title() {
        assert_eq!(
            rewrite_callouts("{: .warning }"),
            "!!! warning \"⚠️ Warning ⚠️\""
        );
    }

    #[test]
    fn explicit_title_wins() {
        assert_eq!(
            rewrite_callouts("{: .note title=\"Heads up\" }"),
            "!!! note \"Heads up\""
        );
        assert_eq!(
            rewrite_callouts("{: .warning title=\"Careful\" }"),
            "!!! warning \"Careful\""
        );
    }

    #[test]
    fn kinds_without_default_have_no_title() {
        for kind in ["note", "tip", "danger", "info", "success"] {
            let marker = format!("{{: .{kind} }}");
            assert_eq!(rewrite_callouts(&marker), format!("!!! {kind}"));
        }
    }

    #[test]
    fn empty_title_falls_back_to_default() {
        assert_eq!(rewrite_callouts("{: .tip title=\"\" }"), "!!! tip");
        assert_eq!(
            rewrite_callouts("{: .warning title=\"\"}"),
            "!!! warning \"⚠️ Warning ⚠️\""
        );
    }

    #[test]
    fn leading_indent_is_consumed_but_blank_lines_are_kept() {
        assert_eq!(
            rewrite_callouts("intro\n\n  {:.info}\nbody\n"),
            "intro\n\n!!! info\nbody\n"
        );
    }

    #[test]
    fn unknown_kind_passes_through() {
        let text = "{: .highlight }\n{: .notebook }\n";
        assert_eq!(rewrite_callouts(text), text);
    }

    #[test]
    fn marker_split_across_lines_is_ignored() {
        let text = "{:\n.note\n}\n{: .tip\n}\n";
        assert_eq!(rewrite_callouts(text), text);
    }

    #[test]
    fn marker_mid_line_is_ignored() {
        let text = "see {: .note } here";
        assert_eq!(rewrite_callouts(text), text);
    }

    #[test]
    fn kind_round_trips_through_str() {
        for kind in CalloutKind::ALL {
            assert_eq!(kind.as_str().parse::<CalloutKind>(), Ok(*kind));
        }
        assert!("caution".parse::<CalloutKind>().is_err());
    }
}
