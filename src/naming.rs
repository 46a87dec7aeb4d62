//! Folder names and tag lists derived from the info list.
//!
//! Both renderings start from the same entries the caption uses:
//!
//! - **Folder name**: each entry's handle becomes `name - <platform>`, role
//!   markers become plain words (`photo by Lee` → `by Lee`), site boilerplate
//!   is dropped, and the survivors are title-cased and joined with `" | "`.
//!   `["@jake", "photo by lee"]` → `"Jake - Ig | By Lee"`.
//! - **Tag list**: entries are lower-cased and stripped of handle and role
//!   noise, then deduplicated. The post type and any extra tags the operator
//!   picks are appended.
//!
//! ## The 30-tag ceiling
//!
//! The platform rejects posts with more than [`MAX_TAGS`] tags. The list is
//! never truncated automatically: [`reduce_to_limit`] keeps asking the
//! operator which tags to delete until the list fits. Cancelling the deletion
//! gives no tag list at all, and the caller publishes nothing.

use crate::catalog::{MAX_TAGS, SITE_RE, TAG_NOISE_RE};
use crate::classify::{social_media_name, split_entry};
use crate::prompt::Prompter;
use crate::role::{strip_role_plain, title_case};

/// Split a comma-separated string into trimmed, non-empty items.
pub fn split_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Render the info list as a folder name.
///
/// Entries that end up empty are dropped, so the result never starts or ends
/// with the separator. An empty list gives an empty string.
pub fn render_folder(info_list: &[String]) -> String {
    info_list
        .iter()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .map(folder_segment)
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join(" | ")
}

fn folder_segment(line: &str) -> String {
    let parts = split_entry(line);
    let line = match parts.render_social(social_media_name) {
        Some(handle) => {
            let role = parts.marker.map_or("", |marker| marker.folder_substitution);
            format!("{role}{handle}")
        }
        None => strip_role_plain(line),
    };
    let line = SITE_RE.replace_all(&line, "");
    title_case(line.trim())
}

/// Lower-case info-list entries, strip tag noise and drop duplicates.
///
/// The first occurrence of each normalized tag wins.
pub fn normalize_tags(info_list: &[String]) -> Vec<String> {
    let mut tags = Vec::new();
    for line in info_list {
        let lower = line.to_lowercase();
        let tag = TAG_NOISE_RE.replace_all(&lower, "");
        push_unique(&mut tags, tag.trim());
    }
    tags
}

/// Append `tag` unless it is empty or already present, ignoring case.
fn push_unique(tags: &mut Vec<String>, tag: &str) {
    if tag.is_empty() {
        return;
    }
    let lower = tag.to_lowercase();
    if !tags.iter().any(|t| t.to_lowercase() == lower) {
        tags.push(tag.to_string());
    }
}

/// Shrink `tags` to at most `limit` entries through `delete`.
///
/// `delete` receives the current list and how many tags must go, and returns
/// the list it kept. It is called until the list fits; a step that deletes
/// too few tags is simply asked again. A step returning `None` cancels the
/// reduction and the whole result is `None`.
pub fn reduce_to_limit<F>(mut tags: Vec<String>, limit: usize, mut delete: F) -> Option<Vec<String>>
where
    F: FnMut(Vec<String>, usize) -> Option<Vec<String>>,
{
    while tags.len() > limit {
        let excess = tags.len() - limit;
        tags = delete(tags, excess)?;
    }
    Some(tags)
}

/// Build the tag list for a post.
///
/// Info-list tags come first, then the post type, then the extra tags the
/// operator picks from `choices`. Asks the operator to delete tags while the
/// list exceeds [`MAX_TAGS`]; `None` when the operator cancels that.
pub fn make_tags<P>(
    info_list: &[String],
    post_type: &str,
    choices: &[String],
    prompter: &mut P,
) -> Option<Vec<String>>
where
    P: Prompter + ?Sized,
{
    let mut tags = normalize_tags(info_list);
    push_unique(&mut tags, post_type.trim());

    let picked = prompter.pick("Tag Selector", choices, true);
    for extra in split_list(&picked.join(",")) {
        push_unique(&mut tags, &extra);
    }

    reduce_to_limit(tags, MAX_TAGS, |tags, excess| {
        prompter.edit_list(&format!("Delete {excess} tags"), tags)
    })
}
