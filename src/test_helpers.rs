//! Shared test utilities for the curator test suite.
//!
//! Provides scripted collaborators and post fixtures so orchestrator logic can
//! be exercised without a terminal or a network.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let prompter = ScriptedPrompter::new()
//!     .with_pick(&["Top Jake"])
//!     .with_form(&[("info_list", "Top Jake"), ("additional_text", "hot")]);
//! let platform = RecordingPlatform::with_post(photo_post(&["https://img/1.jpg"]));
//!
//! // ... run an operation ...
//!
//! assert_eq!(platform.calls.len(), 3);
//! assert!(prompter.alerts.is_empty());
//! ```

use std::collections::{BTreeMap, VecDeque};
use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde_json::json;

use crate::platform::{ApiResponse, PhotoPost, Platform, PlatformError, Reblog, TextPost};
use crate::prompt::{FieldSpec, FieldValue, FormValues, Prompter, ToastIcon};
use crate::types::{Photo, PhotoSize, Post, TrailBlog, TrailItem};

// =========================================================================
// Small builders
// =========================================================================

pub fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Deterministic random source.
pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Reblog trail whose entries come from the given blogs, root first.
pub fn trail(blogs: &[&str]) -> Vec<TrailItem> {
    blogs
        .iter()
        .map(|name| TrailItem {
            blog: TrailBlog {
                name: name.to_string(),
            },
        })
        .collect()
}

// =========================================================================
// Post fixtures
// =========================================================================

/// Photo post 7001 on `sourceblog`, tagged `top jake` and `beach`.
pub fn photo_post(urls: &[&str]) -> Post {
    Post {
        id: 7001,
        post_type: "photo".to_string(),
        tags: strings(&["top jake", "beach"]),
        summary: "Sunny".to_string(),
        photos: urls
            .iter()
            .map(|url| Photo {
                caption: String::new(),
                original_size: PhotoSize {
                    url: url.to_string(),
                },
            })
            .collect(),
        blog_name: "sourceblog".to_string(),
        reblog_key: "rk1".to_string(),
        ..Post::default()
    }
}

/// Video post 7002 on `sourceblog`.
pub fn video_post(url: &str) -> Post {
    Post {
        id: 7002,
        post_type: "video".to_string(),
        tags: strings(&["beach"]),
        summary: "Sunny".to_string(),
        video_url: Some(url.to_string()),
        blog_name: "sourceblog".to_string(),
        reblog_key: "rk2".to_string(),
        ..Post::default()
    }
}

// =========================================================================
// Scripted prompter
// =========================================================================

/// Prompter that answers from queues and records everything it is asked.
///
/// An exhausted queue answers like a cancelled prompt.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    picks: VecDeque<Vec<String>>,
    forms: VecDeque<FormValues>,
    texts: VecDeque<String>,
    delete_per_edit: usize,
    cancel_edits: bool,

    pub pick_titles: Vec<String>,
    pub pick_items: Vec<Vec<String>>,
    pub form_fields: Vec<Vec<FieldSpec>>,
    pub text_prompts: Vec<(String, String)>,
    pub alerts: Vec<(String, String)>,
    pub toasts: Vec<(String, ToastIcon)>,
    pub edit_titles: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the answer to the next list picker.
    pub fn with_pick(mut self, answer: &[&str]) -> Self {
        self.picks.push_back(strings(answer));
        self
    }

    /// Queue the answer to the next form, text fields only.
    pub fn with_form(mut self, answers: &[(&str, &str)]) -> Self {
        let values: BTreeMap<String, FieldValue> = answers
            .iter()
            .map(|(key, value)| (key.to_string(), FieldValue::Text(value.to_string())))
            .collect();
        self.forms.push_back(FormValues(values));
        self
    }

    /// Queue a full form answer.
    pub fn with_form_values(mut self, values: FormValues) -> Self {
        self.forms.push_back(values);
        self
    }

    /// Queue the answer to the next text prompt.
    pub fn with_text(mut self, answer: &str) -> Self {
        self.texts.push_back(answer.to_string());
        self
    }

    /// Make every list edit delete `n` items from the end.
    pub fn delete_from_end(mut self, n: usize) -> Self {
        self.delete_per_edit = n;
        self
    }

    /// Make every list edit answer like a cancelled prompt.
    pub fn cancelling_edits(mut self) -> Self {
        self.cancel_edits = true;
        self
    }

    pub fn alert_titles(&self) -> Vec<&str> {
        self.alerts.iter().map(|(title, _)| title.as_str()).collect()
    }
}

impl Prompter for ScriptedPrompter {
    fn form(&mut self, _title: &str, fields: &[FieldSpec]) -> FormValues {
        self.form_fields.push(fields.to_vec());
        self.forms.pop_front().unwrap_or_default()
    }

    fn pick(&mut self, title: &str, items: &[String], _multiple: bool) -> Vec<String> {
        self.pick_titles.push(title.to_string());
        self.pick_items.push(items.to_vec());
        self.picks.pop_front().unwrap_or_default()
    }

    fn text(&mut self, title: &str, default: &str) -> String {
        self.text_prompts.push((title.to_string(), default.to_string()));
        self.texts.pop_front().unwrap_or_default()
    }

    fn alert(&mut self, title: &str, message: &str) {
        self.alerts.push((title.to_string(), message.to_string()));
    }

    fn toast(&mut self, message: &str, icon: ToastIcon, _duration: Duration) {
        self.toasts.push((message.to_string(), icon));
    }

    fn edit_list(&mut self, title: &str, mut items: Vec<String>) -> Option<Vec<String>> {
        self.edit_titles.push(title.to_string());
        if self.cancel_edits {
            return None;
        }
        let keep = items.len().saturating_sub(self.delete_per_edit);
        items.truncate(keep);
        Some(items)
    }
}

// =========================================================================
// Recording platform
// =========================================================================

/// One call received by [`RecordingPlatform`].
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    FetchPost { blog: String, id: u64 },
    Like { id: u64, reblog_key: String },
    CreatePhoto { blog: String, post: PhotoPost },
    Reblog { blog: String, reblog: Reblog },
    CreateText { blog: String, post: TextPost },
    Submissions { blog: String },
}

/// Platform fake that serves one post and records every call.
///
/// Created posts get ids counting up from 9000. Blogs listed in
/// `rejecting_blogs` get a response without an id; blogs in `offline_blogs`
/// get a transport error.
#[derive(Debug)]
pub struct RecordingPlatform {
    pub post: Option<Post>,
    pub fetch_status: u16,
    pub rejecting_blogs: Vec<String>,
    pub offline_blogs: Vec<String>,
    pub calls: Vec<Call>,
    next_id: u64,
}

impl Default for RecordingPlatform {
    fn default() -> Self {
        Self {
            post: None,
            fetch_status: 200,
            rejecting_blogs: Vec::new(),
            offline_blogs: Vec::new(),
            calls: Vec::new(),
            next_id: 9000,
        }
    }
}

impl RecordingPlatform {
    pub fn with_post(post: Post) -> Self {
        Self {
            post: Some(post),
            ..Self::default()
        }
    }

    pub fn rejecting(mut self, blog: &str) -> Self {
        self.rejecting_blogs.push(blog.to_string());
        self
    }

    pub fn offline(mut self, blog: &str) -> Self {
        self.offline_blogs.push(blog.to_string());
        self
    }

    /// Blogs that received a create or reblog call, in call order.
    pub fn published_blogs(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::CreatePhoto { blog, .. } | Call::Reblog { blog, .. } => Some(blog.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn reblogs(&self) -> Vec<&Reblog> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::Reblog { reblog, .. } => Some(reblog),
                _ => None,
            })
            .collect()
    }

    fn create(&mut self, blog: &str) -> Result<ApiResponse, PlatformError> {
        if self.offline_blogs.iter().any(|b| b == blog) {
            return Err(PlatformError::Credentials(format!("{blog} unreachable")));
        }
        if self.rejecting_blogs.iter().any(|b| b == blog) {
            return Ok(ApiResponse {
                status: 400,
                body: json!({"meta": {"status": 400, "msg": "Bad Request"}, "response": []}),
            });
        }
        self.next_id += 1;
        Ok(ApiResponse {
            status: 201,
            body: json!({"id": self.next_id}),
        })
    }
}

impl Platform for RecordingPlatform {
    fn fetch_post(&mut self, blog: &str, id: u64) -> Result<ApiResponse, PlatformError> {
        self.calls.push(Call::FetchPost {
            blog: blog.to_string(),
            id,
        });
        if self.fetch_status != 200 {
            return Ok(ApiResponse {
                status: self.fetch_status,
                body: json!({"meta": {"status": self.fetch_status, "msg": "Not Found"}}),
            });
        }
        let posts = match &self.post {
            Some(post) => vec![serde_json::to_value(post)?],
            None => Vec::new(),
        };
        Ok(ApiResponse {
            status: 200,
            body: json!({ "posts": posts }),
        })
    }

    fn like(&mut self, id: u64, reblog_key: &str) -> Result<ApiResponse, PlatformError> {
        self.calls.push(Call::Like {
            id,
            reblog_key: reblog_key.to_string(),
        });
        Ok(ApiResponse {
            status: 200,
            body: json!([]),
        })
    }

    fn create_photo(&mut self, blog: &str, post: &PhotoPost) -> Result<ApiResponse, PlatformError> {
        self.calls.push(Call::CreatePhoto {
            blog: blog.to_string(),
            post: post.clone(),
        });
        self.create(blog)
    }

    fn reblog(&mut self, blog: &str, reblog: &Reblog) -> Result<ApiResponse, PlatformError> {
        self.calls.push(Call::Reblog {
            blog: blog.to_string(),
            reblog: reblog.clone(),
        });
        self.create(blog)
    }

    fn create_text(&mut self, blog: &str, post: &TextPost) -> Result<ApiResponse, PlatformError> {
        self.calls.push(Call::CreateText {
            blog: blog.to_string(),
            post: post.clone(),
        });
        self.create(blog)
    }

    fn submissions(&mut self, blog: &str) -> Result<ApiResponse, PlatformError> {
        self.calls.push(Call::Submissions {
            blog: blog.to_string(),
        });
        Ok(ApiResponse {
            status: 200,
            body: json!({"posts": [{"id": 1, "type": "photo", "post_author": "fan"}]}),
        })
    }
}
