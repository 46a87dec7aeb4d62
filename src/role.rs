//! Role tagging for credited names.
//!
//! A credited name may carry one role marker (`Top Jake`, `photo by Jane`,
//! `Sam (bottom)`). The tagger finds the first marker in
//! [`ROLE_MARKERS`](crate::catalog::ROLE_MARKERS) order, removes it, and reports
//! which role it was. Later markers are not tested once one has matched.
//!
//! Captions and folder names strip the same markers but render them
//! differently: captions prepend an emoji prefix, folder names substitute
//! plain words (`photo by Jane` → `by Jane`).

use crate::catalog::{RENDERED_LINK_MARKER, ROLE_MARKERS, Role, RoleMarker};

/// Result of stripping a role marker from a name.
#[derive(Debug, Clone, PartialEq)]
pub struct RoleTag {
    pub role: Role,
    /// Caption prefix for the role, empty when no marker was found.
    pub prefix: &'static str,
    /// Name with the marker removed, title-cased.
    pub name: String,
}

/// First role marker present in `name`, in catalog order.
pub fn detect_role(name: &str) -> Option<&'static RoleMarker> {
    ROLE_MARKERS.iter().find(|marker| marker.regex.is_match(name))
}

/// Strip the first role marker from `name` and title-case what remains.
///
/// Names that already hold a rendered social link pass through verbatim with
/// no role.
pub fn strip_role(name: &str) -> RoleTag {
    if name.contains(RENDERED_LINK_MARKER) {
        return RoleTag {
            role: Role::None,
            prefix: "",
            name: name.to_string(),
        };
    }
    match detect_role(name) {
        Some(marker) => RoleTag {
            role: marker.role,
            prefix: marker.prefix,
            name: title_case(marker.regex.replace_all(name, "").trim()),
        },
        None => RoleTag {
            role: Role::None,
            prefix: "",
            name: title_case(name.trim()),
        },
    }
}

/// Replace the first role marker in `line` with its plain-text folder form.
pub fn strip_role_plain(line: &str) -> String {
    match detect_role(line) {
        Some(marker) => marker
            .regex
            .replace_all(line, marker.folder_substitution)
            .into_owned(),
        None => line.to_string(),
    }
}

/// Capitalize the first letter of every word and lower-case the rest.
///
/// A word starts at any letter that does not follow another letter, so
/// `o'neil` becomes `O'Neil` and `@model_123` becomes `@Model_123`.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_is_letter = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if prev_is_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(c);
            prev_is_letter = false;
        }
    }
    out
}

/// Upper-case the first character, leaving the rest as typed.
pub fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // strip_role
    // =========================================================================

    #[test]
    fn leading_top_marker() {
        let tag = strip_role("Top jake");
        assert_eq!(tag.role, Role::Top);
        assert_eq!(tag.prefix, "🔝 ");
        assert_eq!(tag.name, "Jake");
    }

    #[test]
    fn trailing_bottom_marker() {
        let tag = strip_role("sam rivers (bottom)");
        assert_eq!(tag.role, Role::Bottom);
        assert_eq!(tag.name, "Sam Rivers");

        let tag = strip_role("sam rivers - btm");
        assert_eq!(tag.role, Role::Bottom);
        assert_eq!(tag.name, "Sam Rivers");
    }

    #[test]
    fn makeup_and_photographer_markers() {
        let tag = strip_role("mua: jane doe");
        assert_eq!(tag.role, Role::Makeup);
        assert_eq!(tag.prefix, "💄 ");
        assert_eq!(tag.name, "Jane Doe");

        let tag = strip_role("Photo by lee");
        assert_eq!(tag.role, Role::Photographer);
        assert_eq!(tag.name, "Lee");
    }

    #[test]
    fn bottom_wins_over_top() {
        // Both markers present: only the first in catalog order applies.
        let tag = strip_role("top jake - bottom");
        assert_eq!(tag.role, Role::Bottom);
        assert_eq!(tag.name, "Top Jake");
    }

    #[test]
    fn no_marker_is_identity_up_to_title_case() {
        let tag = strip_role("jake o'neil");
        assert_eq!(tag.role, Role::None);
        assert_eq!(tag.prefix, "");
        assert_eq!(tag.name, "Jake O'Neil");
    }

    #[test]
    fn credential_is_not_a_photographer_marker() {
        let tag = strip_role("Ph.D Smith");
        assert_eq!(tag.role, Role::None);
        assert_eq!(tag.name, "Ph.D Smith");

        let tag = strip_role("ph: smith");
        assert_eq!(tag.role, Role::Photographer);
        assert_eq!(tag.name, "Smith");
    }

    #[test]
    fn stripping_twice_is_stable() {
        for input in ["Top jake", "photo by lee", "plain name", "@model_123"] {
            let once = strip_role(input);
            let twice = strip_role(&once.name);
            assert_eq!(twice.role, Role::None, "input: {input}");
            assert_eq!(twice.name, once.name, "input: {input}");
        }
    }

    #[test]
    fn rendered_link_passes_through() {
        let html = r#"<span>His Instagram:&nbsp;<strong><a href="https://instagram.com/jake">jake</a></strong></span><br/>"#;
        let tag = strip_role(html);
        assert_eq!(tag.role, Role::None);
        assert_eq!(tag.name, html);
    }

    // =========================================================================
    // strip_role_plain
    // =========================================================================

    #[test]
    fn plain_substitutions() {
        assert_eq!(strip_role_plain("photo by lee"), "by lee");
        assert_eq!(strip_role_plain("mua: jane"), "makeup by jane");
        assert_eq!(strip_role_plain("Top jake"), "jake");
        assert_eq!(strip_role_plain("jake - bottom"), "jake");
        assert_eq!(strip_role_plain("jake"), "jake");
    }

    // =========================================================================
    // title_case / capitalize_first
    // =========================================================================

    #[test]
    fn title_case_words() {
        assert_eq!(title_case("jake RIVERS"), "Jake Rivers");
        assert_eq!(title_case("@model_123"), "@Model_123");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn title_case_is_idempotent() {
        let once = title_case("mary-kate o'neil");
        assert_eq!(once, "Mary-Kate O'Neil");
        assert_eq!(title_case(&once), once);
    }

    #[test]
    fn capitalize_first_letter_only() {
        assert_eq!(capitalize_first("hello WORLD"), "Hello WORLD");
        assert_eq!(capitalize_first("élan"), "Élan");
        assert_eq!(capitalize_first(""), "");
    }
}
