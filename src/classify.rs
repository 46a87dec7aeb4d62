//! Social-handle classification.
//!
//! [`split_entry`] is the one place that walks
//! [`SOCIAL_PATTERNS`](crate::catalog::SOCIAL_PATTERNS). It first sets aside
//! the entry's role marker, then finds the first pattern matching what is
//! left, so `Top @jake` is both a top and an Instagram handle. Renderers get
//! the split through [`EntryParts::render_social`] with their own callback:
//! captions pass [`html_social_link`], folder names pass
//! [`social_media_name`]; both see the same match.
//!
//! [`classify`] is the structured view of the same decision, used by the
//! `inspect` command to show how an entry was understood.

use crate::catalog::{Role, RoleMarker, SOCIAL_PATTERNS, SocialPattern};
use crate::role::{detect_role, title_case};
use maud::{PreEscaped, html};

/// An entry after role and social-pattern matching.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassifiedEntry {
    pub raw_text: String,
    /// Id of the first social pattern that matched, if any.
    pub pattern_id: Option<&'static str>,
    pub role: Role,
    /// Display name with role marker and handle notation removed.
    pub clean_name: String,
    pub handle_url: Option<String>,
}

/// One entry split on both axes.
#[derive(Debug, Clone, Default)]
pub struct EntryParts {
    /// Role marker found in the entry, if any.
    pub marker: Option<&'static RoleMarker>,
    /// Entry text with the role marker removed, trimmed.
    pub rest: String,
    /// First social pattern matching `rest`.
    pub social: Option<&'static SocialPattern>,
}

impl EntryParts {
    /// Render the handle through `render`. `None` when no pattern matched.
    pub fn render_social<F>(&self, render: F) -> Option<String>
    where
        F: Fn(&str, &SocialPattern) -> String,
    {
        self.social.map(|pattern| render(&self.rest, pattern))
    }

    pub fn role(&self) -> Role {
        self.marker.map_or(Role::None, |marker| marker.role)
    }
}

/// First social pattern matching `line`, in catalog order.
pub fn match_social(line: &str) -> Option<&'static SocialPattern> {
    SOCIAL_PATTERNS.iter().find(|p| p.regex.is_match(line))
}

/// Split `line` into its role marker and the rest, and match the rest
/// against the social patterns.
///
/// Empty lines short-circuit without touching either catalog.
pub fn split_entry(line: &str) -> EntryParts {
    let line = line.trim();
    if line.is_empty() {
        return EntryParts::default();
    }
    let marker = detect_role(line);
    let rest = match marker {
        Some(marker) => marker.regex.replace_all(line, "").trim().to_string(),
        None => line.to_string(),
    };
    let social = match_social(&rest);
    EntryParts {
        marker,
        rest,
        social,
    }
}

/// Caption renderer: a `His <Platform>:` span linking to the handle.
pub fn html_social_link(line: &str, pattern: &SocialPattern) -> String {
    let url = pattern.regex.replace_all(line, pattern.url_substitution);
    let text = pattern.regex.replace_all(line, "");
    html! {
        span {
            "His " (pattern.label) ":" (PreEscaped("&nbsp;"))
            strong {
                a href=(format!("https://{}", url.trim())) { (text.trim()) }
            }
        }
        br;
    }
    .into_string()
}

/// Folder renderer: the bare handle followed by `" - <suffix>"`.
pub fn social_media_name(line: &str, pattern: &SocialPattern) -> String {
    let name = pattern.regex.replace_all(line, "");
    let name = name.trim();
    if pattern.folder_suffix.is_empty() {
        name.to_string()
    } else {
        format!("{name} - {}", pattern.folder_suffix)
    }
}

/// Classify one free-text entry on both axes: role marker and social handle.
pub fn classify(raw: &str) -> ClassifiedEntry {
    let raw = raw.trim();
    if raw.is_empty() {
        return ClassifiedEntry::default();
    }

    let parts = split_entry(raw);
    let (pattern_id, name, handle_url) = match parts.social {
        Some(pattern) => {
            let url = pattern.regex.replace_all(&parts.rest, pattern.url_substitution);
            (
                Some(pattern.id),
                pattern.regex.replace_all(&parts.rest, "").into_owned(),
                Some(format!("https://{}", url.trim())),
            )
        }
        None => (None, parts.rest.clone(), None),
    };

    ClassifiedEntry {
        raw_text: raw.to_string(),
        pattern_id,
        role: parts.role(),
        clean_name: title_case(name.trim()),
        handle_url,
    }
}
