//! Per-operation request context.
//!
//! Parsed once from the post URL the operator acted on and passed by
//! reference to everything that needs it. Accepted URLs look like
//! `https://<blog>.tumblr.com/post/<id>/<slug>`, optionally ending in
//! `#reblog` to request reblog mode.
//!
//! Anything without the host marker, or with a path whose second segment is
//! not numeric, yields `post_id == 0`. That is not an error: the operation runs
//! without a fetched post.

use crate::catalog::HOST_MARKER;
use url::Url;

const REBLOG_FRAGMENT: &str = "#reblog";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    /// Operator asked for a reblog rather than a fresh post.
    pub is_reblog: bool,
    /// Host of the post URL, e.g. `someblog.tumblr.com`.
    pub netloc: String,
    /// First label of the host, e.g. `someblog`.
    pub blog_name: String,
    /// Numeric post id, `0` when the URL does not name one.
    pub post_id: u64,
}

impl RequestContext {
    pub fn from_url(post_url: &str) -> Self {
        let is_reblog = post_url.contains(REBLOG_FRAGMENT);
        if !post_url.contains(HOST_MARKER) {
            return Self {
                is_reblog,
                ..Self::default()
            };
        }
        let Ok(parsed) = Url::parse(post_url) else {
            return Self {
                is_reblog,
                ..Self::default()
            };
        };

        let netloc = match (parsed.host_str(), parsed.port()) {
            (Some(host), Some(port)) => format!("{host}:{port}"),
            (Some(host), None) => host.to_string(),
            (None, _) => String::new(),
        };
        let blog_name = netloc.split('.').next().unwrap_or_default().to_string();
        let post_id = parsed
            .path_segments()
            .and_then(|mut segments| segments.nth(1))
            .and_then(|segment| segment.parse::<u64>().ok())
            .unwrap_or(0);

        Self {
            is_reblog,
            netloc,
            blog_name,
            post_id,
        }
    }

    /// Context for offline rendering with no source post.
    pub fn offline(is_reblog: bool) -> Self {
        Self {
            is_reblog,
            ..Self::default()
        }
    }

    pub fn has_post_id(&self) -> bool {
        self.post_id != 0
    }
}
