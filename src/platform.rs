//! Remote blogging platform.
//!
//! [`Platform`] is the seam between the orchestrator and the network: six
//! request/response calls, each returning the platform's status code and the
//! JSON payload. Failures the platform reports *in a response* (non-200
//! status, missing `id`) come back as `Ok(ApiResponse)` for the caller to
//! judge; only transport, decoding and credential problems are
//! [`PlatformError`]s.
//!
//! [`TumblrClient`] implements the trait over the v2 REST API with a blocking
//! reqwest client. Authenticated calls carry the OAuth2 bearer token; the API
//! key is sent as a query parameter on every call.
//!
//! ## Response shape
//!
//! The API wraps every payload as `{"meta": {"status": ..}, "response": ..}`.
//! On success [`ApiResponse::body`] is the inner `response` value; on failure
//! it is the whole envelope, so alerts show the platform's error message.

use crate::config::ClientConfig;
use crate::types::Post;
use reqwest::blocking::Client;
use reqwest::blocking::multipart::{Form, Part};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

#[derive(Error, Debug)]
pub enum PlatformError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid API URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("invalid credentials: {0}")]
    Credentials(String),
}

/// Status and payload of one API call.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        self.status == 200 || self.status == 201
    }

    /// Id of a created post or reblog, if the platform returned one.
    pub fn created_id(&self) -> Option<u64> {
        let id = self.body.get("id")?;
        id.as_u64().or_else(|| id.as_str()?.parse().ok())
    }

    /// First post of a posts listing.
    pub fn first_post(&self) -> Result<Option<Post>, PlatformError> {
        match self.body.get("posts").and_then(|posts| posts.get(0)) {
            Some(post) => Ok(Some(serde_json::from_value(post.clone())?)),
            None => Ok(None),
        }
    }

    /// Pretty-printed payload for operator alerts.
    pub fn pretty(&self) -> String {
        serde_json::to_string_pretty(&self.body).unwrap_or_else(|_| self.body.to_string())
    }
}

/// One image file attached to a photo post.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PhotoPost {
    pub caption: String,
    pub tags: Vec<String>,
    pub images: Vec<ImageUpload>,
    /// Photoset layout, one digit per row (`"111"` stacks three photos).
    pub layout: String,
    pub state: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Reblog {
    pub id: u64,
    pub reblog_key: String,
    pub comment: String,
    pub tags: Vec<String>,
    /// `None` leaves the platform default in place.
    pub attach_reblog_tree: Option<bool>,
    /// Empty leaves the platform default in place.
    pub state: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextPost {
    pub title: String,
    pub body: String,
    pub slug: String,
    pub format: String,
    pub state: String,
    pub tags: Vec<String>,
}

/// Calls the curator makes against the remote platform.
pub trait Platform {
    fn fetch_post(&mut self, blog: &str, id: u64) -> Result<ApiResponse, PlatformError>;
    fn like(&mut self, id: u64, reblog_key: &str) -> Result<ApiResponse, PlatformError>;
    fn create_photo(&mut self, blog: &str, post: &PhotoPost) -> Result<ApiResponse, PlatformError>;
    fn reblog(&mut self, blog: &str, reblog: &Reblog) -> Result<ApiResponse, PlatformError>;
    fn create_text(&mut self, blog: &str, post: &TextPost) -> Result<ApiResponse, PlatformError>;
    fn submissions(&mut self, blog: &str) -> Result<ApiResponse, PlatformError>;
}

/// Full blog identifier: bare names get the platform host appended.
pub fn blog_identifier(blog: &str) -> String {
    if blog.contains('.') {
        blog.to_string()
    } else {
        format!("{blog}.tumblr.com")
    }
}

/// Blocking client for the Tumblr v2 API.
pub struct TumblrClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl TumblrClient {
    pub fn new(config: &ClientConfig) -> Result<Self, PlatformError> {
        let mut headers = HeaderMap::new();
        let token = config.oauth_token.trim();
        if !token.is_empty() {
            let auth = format!("Bearer {token}");
            let value = HeaderValue::from_str(&auth)
                .map_err(|e| PlatformError::Credentials(e.to_string()))?;
            headers.insert(AUTHORIZATION, value);
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.trim().to_string(),
        })
    }

    fn endpoint(&self, path: &str, query: &[(&str, String)]) -> Result<Url, PlatformError> {
        let mut url = Url::parse(&format!("{}/{path}", self.base_url))?;
        {
            let mut pairs = url.query_pairs_mut();
            if !self.api_key.is_empty() {
                pairs.append_pair("api_key", &self.api_key);
            }
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    fn get(&self, path: &str, query: &[(&str, String)]) -> Result<ApiResponse, PlatformError> {
        let url = self.endpoint(path, query)?;
        debug!(%url, "GET");
        let response = self.client.get(url).send()?;
        unwrap_envelope(response.status().as_u16(), response.json()?)
    }

    fn post_form(&self, path: &str, form: &[(&str, String)]) -> Result<ApiResponse, PlatformError> {
        let url = self.endpoint(path, &[])?;
        debug!(%url, "POST");
        let response = self.client.post(url).form(form).send()?;
        unwrap_envelope(response.status().as_u16(), response.json()?)
    }
}

/// Split the `{"meta", "response"}` envelope.
fn unwrap_envelope(http_status: u16, json: Value) -> Result<ApiResponse, PlatformError> {
    let status = json
        .pointer("/meta/status")
        .and_then(Value::as_u64)
        .and_then(|s| u16::try_from(s).ok())
        .unwrap_or(http_status);
    let response = ApiResponse { status, body: json };
    if !response.is_success() {
        warn!(status, "platform returned an error");
        return Ok(response);
    }
    let body = match response.body {
        Value::Object(mut map) => map.remove("response").unwrap_or(Value::Object(map)),
        other => other,
    };
    Ok(ApiResponse { status, body })
}

impl Platform for TumblrClient {
    fn fetch_post(&mut self, blog: &str, id: u64) -> Result<ApiResponse, PlatformError> {
        let path = format!("blog/{}/posts", blog_identifier(blog));
        self.get(&path, &[("id", id.to_string())])
    }

    fn like(&mut self, id: u64, reblog_key: &str) -> Result<ApiResponse, PlatformError> {
        self.post_form(
            "user/like",
            &[("id", id.to_string()), ("reblog_key", reblog_key.to_string())],
        )
    }

    fn create_photo(&mut self, blog: &str, post: &PhotoPost) -> Result<ApiResponse, PlatformError> {
        let url = self.endpoint(&format!("blog/{}/post", blog_identifier(blog)), &[])?;
        let mut form = Form::new()
            .text("type", "photo")
            .text("caption", post.caption.clone())
            .text("tags", post.tags.join(","))
            .text("state", post.state.clone())
            .text("photoset_layout", post.layout.clone());
        for (i, image) in post.images.iter().enumerate() {
            let part = Part::bytes(image.bytes.clone()).file_name(image.file_name.clone());
            form = form.part(format!("data[{i}]"), part);
        }
        debug!(%url, images = post.images.len(), "POST photo");
        let response = self.client.post(url).multipart(form).send()?;
        unwrap_envelope(response.status().as_u16(), response.json()?)
    }

    fn reblog(&mut self, blog: &str, reblog: &Reblog) -> Result<ApiResponse, PlatformError> {
        let mut form = vec![
            ("id", reblog.id.to_string()),
            ("reblog_key", reblog.reblog_key.clone()),
            ("comment", reblog.comment.clone()),
            ("tags", reblog.tags.join(",")),
        ];
        if !reblog.state.is_empty() {
            form.push(("state", reblog.state.clone()));
        }
        if let Some(attach) = reblog.attach_reblog_tree {
            form.push(("attach_reblog_tree", attach.to_string()));
        }
        self.post_form(&format!("blog/{}/post/reblog", blog_identifier(blog)), &form)
    }

    fn create_text(&mut self, blog: &str, post: &TextPost) -> Result<ApiResponse, PlatformError> {
        self.post_form(
            &format!("blog/{}/post", blog_identifier(blog)),
            &[
                ("type", "text".to_string()),
                ("title", post.title.clone()),
                ("body", post.body.clone()),
                ("slug", post.slug.clone()),
                ("format", post.format.clone()),
                ("state", post.state.clone()),
                ("tags", post.tags.join(",")),
            ],
        )
    }

    fn submissions(&mut self, blog: &str) -> Result<ApiResponse, PlatformError> {
        self.get(&format!("blog/{}/posts/submission", blog_identifier(blog)), &[])
    }
}
