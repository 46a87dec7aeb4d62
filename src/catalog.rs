//! Static pattern catalog shared by every renderer.
//!
//! Two independent, ordered tables live here:
//!
//! - **Social patterns** recognise a platform-specific handle notation
//!   (`@handle`, `ig: handle`, `someblog.tumblr.com`). Each carries the
//!   substitution that turns the matched marker into a URL, the platform label
//!   used in `His <Platform>:` captions, and the short suffix appended in
//!   folder names.
//! - **Role markers** recognise the words that credit a person as top, bottom,
//!   makeup artist or photographer. Each carries the emoji prefix used in
//!   captions and the plain-text replacement used in folder names.
//!
//! ## Order is policy
//!
//! Matching stops at the first hit, so a table's order is its tie-break rule.
//! `tiktok: @x` must be tried before the bare `@x` pattern, and role markers
//! are always tested bottom → makeup → photographer → top. Reordering either
//! table changes output for ambiguous entries.
//!
//! Makeup and photographer markers are recognised in leading position only
//! (`photo by Jane`, `mua: Jane`) because their folder replacement (`by `,
//! `makeup by `) reads as a prefix. Top and bottom markers are removed outright,
//! so they are also recognised trailing (`Jake - top`, `Jake (bottom)`).

use regex::Regex;
use std::sync::LazyLock;

/// One recognised social-media handle notation.
#[derive(Debug)]
pub struct SocialPattern {
    /// Stable identifier, reported by [`crate::classify::classify`].
    pub id: &'static str,
    pub regex: Regex,
    /// Replacement for the matched marker that yields a scheme-less URL.
    pub url_substitution: &'static str,
    /// Human-readable platform name for `His <label>:` captions.
    pub label: &'static str,
    /// Appended as `" - <suffix>"` in folder names. Empty means no suffix.
    pub folder_suffix: &'static str,
}

/// Credited role of a person in a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Role {
    #[default]
    None,
    Top,
    Bottom,
    Makeup,
    Photographer,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::None => "none",
            Role::Top => "top",
            Role::Bottom => "bottom",
            Role::Makeup => "makeup",
            Role::Photographer => "photographer",
        }
    }
}

/// A role marker and its two renderings.
#[derive(Debug)]
pub struct RoleMarker {
    pub role: Role,
    pub regex: Regex,
    /// Display prefix placed before the bold name in captions.
    pub prefix: &'static str,
    /// Plain-text replacement for the marker in folder names.
    pub folder_substitution: &'static str,
}

/// Text of the info-list picker entry that means "use no names".
pub const FORM_BLANK: &str = "-- none --";

/// Substring that identifies a link produced by the social-link renderer.
pub const RENDERED_LINK_MARKER: &str = "<a href=\"https";

/// Host marker every accepted post URL must contain.
pub const HOST_MARKER: &str = "tumblr";

/// Hard ceiling on tags per post, imposed by the remote platform.
pub const MAX_TAGS: usize = 30;

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("catalog pattern must compile")
}

/// Social patterns in priority order. First match wins.
pub static SOCIAL_PATTERNS: LazyLock<Vec<SocialPattern>> = LazyLock::new(|| {
    vec![
        SocialPattern {
            id: "instagram",
            regex: compile(r"(?i)^\s*(?:ig|insta|instagram)\s*[:@]\s*@?"),
            url_substitution: "instagram.com/",
            label: "Instagram",
            folder_suffix: "IG",
        },
        SocialPattern {
            id: "twitter",
            regex: compile(r"(?i)^\s*(?:tw|twitter|x)\s*[:@]\s*@?"),
            url_substitution: "twitter.com/",
            label: "Twitter",
            folder_suffix: "Twitter",
        },
        SocialPattern {
            id: "tiktok",
            regex: compile(r"(?i)^\s*(?:tt|tiktok)\s*[:@]\s*@?"),
            url_substitution: "tiktok.com/@",
            label: "TikTok",
            folder_suffix: "TikTok",
        },
        SocialPattern {
            id: "onlyfans",
            regex: compile(r"(?i)^\s*(?:of|onlyfans)\s*[:@]\s*@?"),
            url_substitution: "onlyfans.com/",
            label: "OnlyFans",
            folder_suffix: "OF",
        },
        SocialPattern {
            id: "tumblr",
            regex: compile(r"(?i)\.tumblr\.com/?\s*$"),
            url_substitution: ".tumblr.com",
            label: "Tumblr",
            folder_suffix: "",
        },
        SocialPattern {
            id: "at-handle",
            regex: compile(r"^\s*@"),
            url_substitution: "instagram.com/",
            label: "Instagram",
            folder_suffix: "IG",
        },
    ]
});

/// Role markers in detection order: bottom, makeup, photographer, top.
pub static ROLE_MARKERS: LazyLock<Vec<RoleMarker>> = LazyLock::new(|| {
    vec![
        RoleMarker {
            role: Role::Bottom,
            regex: compile(
                r"(?i)^\s*(?:bottom|btm)\b\s*[:\-]?\s*|\s*[-(]?\s*\b(?:bottom|btm)\)?\s*$",
            ),
            prefix: "🍑 ",
            folder_substitution: "",
        },
        RoleMarker {
            role: Role::Makeup,
            regex: compile(
                r"(?i)^\s*(?:makeup\s+artist|make-?up\s+by|makeup|mua)\b\s*[:\-]?\s*",
            ),
            prefix: "💄 ",
            folder_substitution: "makeup by ",
        },
        RoleMarker {
            role: Role::Photographer,
            regex: compile(
                r"(?i)^\s*(?:(?:photographer|photographed\s+by|photography\s+by|photos?\s+by|shot\s+by)\b\s*[:\-]?|ph\s*[:\-])\s*",
            ),
            prefix: "📷 ",
            folder_substitution: "by ",
        },
        RoleMarker {
            role: Role::Top,
            regex: compile(r"(?i)^\s*top\b\s*[:\-]?\s*|\s*[-(]?\s*\btop\)?\s*$"),
            prefix: "🔝 ",
            folder_substitution: "",
        },
    ]
});

/// Noise removed from lower-cased entries before they become tags: handle
/// markers, blog hosts and role words.
pub static TAG_NOISE_RE: LazyLock<Regex> = LazyLock::new(|| {
    compile(concat!(
        r"(?i)^\s*(?:ig|insta|instagram|tw|twitter|x|tt|tiktok|of|onlyfans)\s*[:@]\s*",
        r"|@",
        r"|\.tumblr\.com/?",
        r"|^\s*(?:top|bottom|btm)\b\s*[:\-]?\s*",
        r"|\s*[-(]?\s*\b(?:top|bottom|btm)\)?\s*$",
        r"|^\s*(?:makeup\s+artist|make-?up\s+by|makeup|mua|photographer|photographed\s+by|photography\s+by|photos?\s+by|shot\s+by)\b\s*[:\-]?\s*",
        r"|^\s*ph\s*[:\-]\s*",
    ))
});

/// Residual site boilerplate stripped from folder names.
pub static SITE_RE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)https?://|www\.|\.tumblr\.com/?|tumblr\.com/?"));

/// Characters that cannot appear in a tag lookup for "more of him" links.
pub static NAME_SUBS_RE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)@|\.tumblr\.com|[^\p{L}\p{N}\s_.'\-]"));

/// A line break together with the indentation around it.
pub static LINE_BREAKS_RE: LazyLock<Regex> = LazyLock::new(|| compile(r"\s*\n\s*"));

/// Runs of two or more blanks.
pub static SPACE_RUNS_RE: LazyLock<Regex> = LazyLock::new(|| compile(r"[ \t]{2,}"));

/// Line breaks inside a media summary.
pub static LINES_RE: LazyLock<Regex> = LazyLock::new(|| compile(r"[\r\n]+"));

/// Whitespace inside a URL.
pub static SPACES_RE: LazyLock<Regex> = LazyLock::new(|| compile(r"\s+"));
