//! Shared types passed between the renderers, the orchestrator and the CLI.
//!
//! [`Post`] mirrors the subset of the remote post record the curator reads.
//! Everything here lives for one operation and is never written back.

use serde::{Deserialize, Serialize};

/// Fetched state of the source post. Read-only once fetched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Post {
    pub id: u64,
    #[serde(rename = "type")]
    pub post_type: String,
    pub tags: Vec<String>,
    pub trail: Vec<TrailItem>,
    pub summary: String,
    pub photos: Vec<Photo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    pub blog_name: String,
    pub reblog_key: String,
    pub is_submission: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_author: Option<String>,
}

/// Coarse post kind; only photo and video carry downloadable media.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostKind {
    Photo,
    Video,
    Other,
}

impl Post {
    pub fn kind(&self) -> PostKind {
        PostKind::from_type(&self.post_type)
    }

    /// Name of the blog at the top of the reblog trail.
    pub fn trail_root_blog(&self) -> Option<&str> {
        self.trail.first().map(|item| item.blog.name.as_str())
    }
}

impl PostKind {
    pub fn from_type(post_type: &str) -> Self {
        match post_type {
            "photo" => PostKind::Photo,
            "video" => PostKind::Video,
            _ => PostKind::Other,
        }
    }
}

/// One ancestor in a post's reblog trail.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TrailItem {
    pub blog: TrailBlog,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TrailBlog {
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Photo {
    pub caption: String,
    pub original_size: PhotoSize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PhotoSize {
    pub url: String,
}

/// Answers to the post questionnaire. Created once per operation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormAnswers {
    pub info_list: Vec<String>,
    pub additional_text: String,
    pub url: String,
    pub url_text: String,
    pub keep_tree: bool,
}

/// Caption rendered for one destination blog.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaptionDraft {
    pub blog: String,
    pub caption: String,
}

/// One downloadable media file of a post.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MediaItem {
    /// File title suffix, e.g. `" - Beach day 2"`.
    pub title: String,
    pub url: String,
}

/// Everything needed to download a post's media.
#[derive(Debug, Clone, Serialize)]
pub struct DownloadData {
    pub post_type: String,
    pub post: Post,
    pub folder: String,
    pub media: Vec<MediaItem>,
}

/// Everything needed to re-publish a post to the selected blogs.
#[derive(Debug, Clone, Serialize)]
pub struct PostPlan {
    pub post_type: String,
    pub post_id: Option<u64>,
    pub reblog_key: Option<String>,
    pub keep_tree: bool,
    pub blog_captions: Vec<CaptionDraft>,
    pub tags: Vec<String>,
    pub folder: String,
    pub media: Vec<MediaItem>,
}

/// Result of one per-blog remote call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmitOutcome {
    pub blog: String,
    /// Id of the created post; `None` when the call failed.
    pub post_id: Option<u64>,
    /// Raw response or transport error, kept for failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SubmitOutcome {
    pub fn succeeded(&self) -> bool {
        self.post_id.is_some()
    }
}

/// A publishing run: the plan and what each blog made of it.
#[derive(Debug, Clone, Serialize)]
pub struct PublishReport {
    pub plan: PostPlan,
    pub outcomes: Vec<SubmitOutcome>,
}

impl PublishReport {
    pub fn failures(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.succeeded()).count()
    }
}
