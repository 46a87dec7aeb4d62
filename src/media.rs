//! Downloadable media of a fetched post.
//!
//! Photo posts list one item per photo, video posts list the single video.
//! Each item gets a file title built from the post summary (or the photo's own
//! caption) so a download tool can name files after the post:
//!
//! ```text
//! summary "Beach day", 2 photos   →  " - Beach day 1", " - Beach day 2"
//! no summary, 1 photo             →  " "
//! ```
//!
//! Numbers are only added when a post has more than one photo.
//!
//! The other direction, local image files to upload, is collected by
//! [`collect_image_files`].

use crate::catalog::LINES_RE;
use crate::types::{MediaItem, Post, PostKind};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

/// All downloadable media of `post`, in post order.
pub fn media_from_post(post: &Post) -> Vec<MediaItem> {
    match post.kind() {
        PostKind::Photo => photo_items(post),
        PostKind::Video => vec![MediaItem {
            title: file_name(&post.summary, ""),
            url: post.video_url.clone().unwrap_or_default(),
        }],
        PostKind::Other => Vec::new(),
    }
}

fn photo_items(post: &Post) -> Vec<MediaItem> {
    let numbered = post.photos.len() > 1;
    post.photos
        .iter()
        .enumerate()
        .map(|(idx, photo)| {
            let caption = if photo.caption.is_empty() {
                &post.summary
            } else {
                &photo.caption
            };
            let number = if numbered {
                format!(" {}", idx + 1)
            } else {
                String::new()
            };
            MediaItem {
                title: file_name(caption, &number),
                url: photo.original_size.url.clone(),
            }
        })
        .collect()
}

/// File title for one media item.
///
/// `number` is either empty or already carries its leading space.
pub fn file_name(summary: &str, number: &str) -> String {
    if summary.is_empty() {
        return format!(" {number}");
    }
    let summary = LINES_RE.replace_all(summary, " ");
    format!(" - {summary}{number}")
}

/// Expand files and directories into the image files they hold.
///
/// Files named explicitly are kept in argument order; directories are walked
/// recursively and contribute their images sorted by path.
pub fn collect_image_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>, walkdir::Error> {
    let mut images = Vec::new();
    for path in paths {
        if !path.is_dir() {
            images.push(path.clone());
            continue;
        }
        let mut found = Vec::new();
        for entry in WalkDir::new(path) {
            let entry = entry?;
            if entry.file_type().is_file() && is_image(entry.path()) {
                found.push(entry.into_path());
            }
        }
        found.sort();
        images.extend(found);
    }
    Ok(images)
}

fn is_image(path: &Path) -> bool {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    IMAGE_EXTENSIONS.contains(&ext.as_str())
}
