//! Post orchestrator: the operations an operator triggers on a post URL.
//!
//! Every publishing operation follows the same sequence:
//!
//! ```text
//! fetch post → like it → ask the questionnaire → tags (once)
//!     → pick destination blogs → caption per blog → one remote call per blog
//! ```
//!
//! [`Curator`] owns the three collaborators (platform, prompter, random
//! source) and the configuration. Per-operation state lives in the
//! [`RequestContext`] passed to each call, never in the curator itself.
//!
//! ## Failure handling
//!
//! A remote call that fails for one blog is alerted to the operator with the
//! raw response and recorded as a failed [`SubmitOutcome`]; the remaining
//! blogs are still attempted. Only a failed *fetch* aborts an operation, with
//! a [`CurateError`].
//!
//! A post URL without a usable id is not an error either: the operation runs
//! with no fetched post and neutral defaults.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use maud::{PreEscaped, html};
use pulldown_cmark::{Parser, html as md_html};
use rand::Rng;
use rand::seq::SliceRandom;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::caption::render_caption;
use crate::catalog::{FORM_BLANK, HOST_MARKER, MAX_TAGS, SPACES_RE};
use crate::config::CuratorConfig;
use crate::media::{collect_image_files, media_from_post};
use crate::naming::{make_tags, render_folder, split_list};
use crate::platform::{ApiResponse, ImageUpload, PhotoPost, Platform, PlatformError, Reblog, TextPost};
use crate::prompt::{FieldSpec, Prompter, ToastIcon};
use crate::request::RequestContext;
use crate::role::title_case;
use crate::types::{DownloadData, FormAnswers, Post, PostPlan, PublishReport, SubmitOutcome};

/// Slug of the submission-request post.
pub const SUBMISSION_SLUG: &str = "submission-guidelines";

/// Publish state of new photo posts and submission requests.
const QUEUE_STATE: &str = "queue";

const TOAST_DURATION: Duration = Duration::from_secs(2);

#[derive(Error, Debug)]
pub enum CurateError {
    #[error("platform error: {0}")]
    Platform(#[from] PlatformError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Runs curator operations against one platform and one operator.
pub struct Curator<P, Q, R> {
    pub config: CuratorConfig,
    pub platform: P,
    pub prompter: Q,
    rng: R,
}

impl<P, Q, R> Curator<P, Q, R>
where
    P: Platform,
    Q: Prompter,
    R: Rng,
{
    pub fn new(config: CuratorConfig, platform: P, prompter: Q, rng: R) -> Self {
        Self {
            config,
            platform,
            prompter,
            rng,
        }
    }

    // =========================================================================
    // Fetching
    // =========================================================================

    /// Fetch the post named by `ctx`. `None` when the URL names no post or the
    /// platform has none; a non-200 status is alerted.
    pub fn fetch_post(&mut self, ctx: &RequestContext) -> Result<Option<Post>, CurateError> {
        if !ctx.has_post_id() {
            debug!("no post id, skipping fetch");
            return Ok(None);
        }
        let response = self.platform.fetch_post(&ctx.blog_name, ctx.post_id)?;
        if !response.is_success() {
            self.prompter.alert("Error", &response.pretty());
        }
        let post = response.first_post()?;
        debug!(post_id = ctx.post_id, found = post.is_some(), "fetched post");
        Ok(post)
    }

    /// Like the post. Failures are logged and otherwise ignored.
    fn like_post(&mut self, ctx: &RequestContext, post: &Post) {
        if let Err(e) = self.platform.like(ctx.post_id, &post.reblog_key) {
            warn!(post_id = ctx.post_id, "like failed: {e}");
        }
    }

    /// Fetch and like a post and list what can be downloaded from it.
    ///
    /// `None` when there is no post to download.
    pub fn download_data(&mut self, ctx: &RequestContext) -> Result<Option<DownloadData>, CurateError> {
        let Some(post) = self.fetch_post(ctx)? else {
            return Ok(None);
        };
        self.like_post(ctx, &post);
        Ok(Some(DownloadData {
            post_type: post.post_type.clone(),
            folder: folder_for_download(&post),
            media: media_from_post(&post),
            post,
        }))
    }

    // =========================================================================
    // Questionnaire
    // =========================================================================

    /// Fetch the post, ask the operator about it and derive everything needed
    /// to publish it: tags, one caption per chosen blog, folder and media.
    pub fn prepare_post(&mut self, ctx: &RequestContext) -> Result<PostPlan, CurateError> {
        let post = self.fetch_post(ctx)?;
        let post_type = post
            .as_ref()
            .map(|p| p.post_type.clone())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| "photo".to_string());
        let media = post.as_ref().map(media_from_post).unwrap_or_default();
        if let Some(post) = &post {
            self.like_post(ctx, post);
        }

        let form = self.fill_form(ctx, post.as_ref());
        let (tags, blogs) = match make_tags(
            &form.info_list,
            &post_type,
            &self.config.tags.choices,
            &mut self.prompter,
        ) {
            Some(tags) => {
                let blogs = self.select_blogs(&tags);
                (tags, blogs)
            }
            None => {
                warn!(limit = MAX_TAGS, "tag deletion cancelled over the limit");
                self.prompter.alert(
                    "Too many tags",
                    &format!("At most {MAX_TAGS} tags; nothing will be published"),
                );
                (Vec::new(), Vec::new())
            }
        };
        let blog_captions = blogs
            .iter()
            .map(|blog| render_caption(ctx, &self.config, blog, &form, &mut self.rng))
            .collect();

        let mut folder = render_folder(&form.info_list);
        if folder.is_empty() {
            if let Some(post) = &post {
                folder = folder_for_download(post);
            }
        }

        info!(blogs = blogs.len(), tags = tags.len(), "prepared post");
        Ok(PostPlan {
            post_type,
            post_id: post.as_ref().map(|p| p.id),
            reblog_key: post.as_ref().map(|p| p.reblog_key.clone()),
            keep_tree: form.keep_tree,
            blog_captions,
            tags,
            folder,
            media,
        })
    }

    /// Ask the post questionnaire, pre-filled from the fetched post.
    ///
    /// A cancelled form yields empty answers.
    pub fn fill_form(&mut self, ctx: &RequestContext, post: Option<&Post>) -> FormAnswers {
        let (selections, url, url_text) = match post {
            Some(post) => {
                let selections = self.form_info_list(ctx, post);
                let (url, url_text) = self.form_url(ctx, post, &selections);
                (selections, url, url_text)
            }
            None => Default::default(),
        };

        let mut fields = vec![
            FieldSpec::text("info_list", "Info list", selections.join(",")).autocapitalized(),
            FieldSpec::text("additional_text", "Additional text", ""),
            FieldSpec::url("url", "Optional URL", url),
            FieldSpec::text("url_text", "URL text", url_text),
        ];
        if post.is_some_and(|post| should_keep_tree(ctx, post)) {
            fields.push(FieldSpec::switch("keep_tree", "Keep reblog tree", true));
        }

        let values = self.prompter.form("Questions", &fields);
        FormAnswers {
            info_list: split_list(&values.text("info_list")),
            additional_text: values.text("additional_text"),
            url: values.text("url"),
            url_text: values.text("url_text"),
            keep_tree: values.switch("keep_tree"),
        }
    }

    /// Names offered for the info list: the submitter's blog, the post's
    /// tags, the blank sentinel and the source host.
    ///
    /// With tags, the operator picks from them and the blank sentinel clears
    /// the pick. Without tags, reblogs fall back to the submitter or host.
    pub fn form_info_list(&mut self, ctx: &RequestContext, post: &Post) -> Vec<String> {
        let mut options = Vec::new();
        if post.is_submission {
            if let Some(author) = post.post_author.as_deref().filter(|a| !a.is_empty()) {
                options.push(format!("{author}.tumblr.com"));
            }
        }

        if post.tags.is_empty() {
            if ctx.is_reblog && options.is_empty() {
                return vec![ctx.netloc.clone()];
            }
            return options;
        }

        options.extend(post.tags.iter().map(|tag| {
            if tag.contains(HOST_MARKER) {
                tag.clone()
            } else {
                title_case(tag)
            }
        }));
        options.push(FORM_BLANK.to_string());
        if !ctx.netloc.is_empty() {
            options.push(ctx.netloc.clone());
        }

        let selections = self
            .prompter
            .pick("Select tags to use as names:", &options, true);
        if selections.iter().any(|s| s == FORM_BLANK) {
            return Vec::new();
        }
        selections
    }

    /// Offer to link one selected tag on reblogs of regular posts.
    ///
    /// Returns `(url, url_text)`, both empty when nothing is linked.
    pub fn form_url(
        &mut self,
        ctx: &RequestContext,
        post: &Post,
        selections: &[String],
    ) -> (String, String) {
        let links: Vec<String> = selections
            .iter()
            .filter(|s| s.as_str() != FORM_BLANK && **s != ctx.netloc)
            .cloned()
            .collect();
        if !ctx.is_reblog || post.is_submission || links.is_empty() {
            return (String::new(), String::new());
        }

        let picked = self
            .prompter
            .pick("Which tag do you want to link?", &links, false);
        let Some(tag) = picked.first() else {
            return (String::new(), String::new());
        };
        let url = format!("http://{}/tagged/{tag}", ctx.netloc);
        let url = SPACES_RE.replace_all(&url, "%20").into_owned();
        let url_text = html! {
            (PreEscaped("This tag \"")) strong { (tag) } (PreEscaped("\" is 🔥!&nbsp;&#8250;"))
        }
        .into_string();
        (url, url_text)
    }

    /// Ask which configured blogs to publish to.
    ///
    /// Blogs whose keywords appear among `tags` are listed first. Cancel
    /// selects nothing.
    pub fn select_blogs(&mut self, tags: &[String]) -> Vec<String> {
        let (suggested, rest): (Vec<_>, Vec<_>) = self.config.blogs.iter().partition(|blog| {
            blog.keywords
                .iter()
                .any(|k| tags.iter().any(|t| t.eq_ignore_ascii_case(k)))
        });
        let items: Vec<String> = suggested
            .into_iter()
            .chain(rest)
            .map(|blog| blog.name.clone())
            .collect();
        if items.is_empty() {
            return Vec::new();
        }
        self.prompter.pick("Post to which blogs?", &items, true)
    }

    // =========================================================================
    // Publishing
    // =========================================================================

    /// Post `images` as a new photo post to every chosen blog.
    ///
    /// Zero images is alerted but still attempted.
    pub fn post_images(
        &mut self,
        ctx: &RequestContext,
        images: Vec<ImageUpload>,
    ) -> Result<PublishReport, CurateError> {
        if images.is_empty() {
            self.prompter.alert("No images input", "");
        }
        let plan = self.prepare_post(ctx)?;
        let layout = "1".repeat(images.len());

        let mut outcomes = Vec::new();
        for draft in &plan.blog_captions {
            let request = PhotoPost {
                caption: draft.caption.clone(),
                tags: plan.tags.clone(),
                images: images.clone(),
                layout: layout.clone(),
                state: QUEUE_STATE.to_string(),
            };
            let result = self.platform.create_photo(&draft.blog, &request);
            outcomes.push(self.record(&draft.blog, result));
        }

        info!(blogs = outcomes.len(), "posted images");
        Ok(PublishReport { plan, outcomes })
    }

    /// Reblog the post to every chosen blog with a random publish state.
    pub fn post_reblog(&mut self, ctx: &RequestContext) -> Result<PublishReport, CurateError> {
        let plan = self.prepare_post(ctx)?;
        let (Some(id), Some(reblog_key)) = (plan.post_id, plan.reblog_key.clone()) else {
            self.prompter.alert("Error", "No post to reblog");
            return Ok(PublishReport {
                plan,
                outcomes: Vec::new(),
            });
        };

        let mut outcomes = Vec::new();
        for draft in &plan.blog_captions {
            let state = self
                .config
                .reblog
                .states
                .choose(&mut self.rng)
                .cloned()
                .unwrap_or_default();
            let request = Reblog {
                id,
                reblog_key: reblog_key.clone(),
                comment: draft.caption.clone(),
                tags: plan.tags.clone(),
                attach_reblog_tree: Some(plan.keep_tree),
                state,
            };
            let result = self.platform.reblog(&draft.blog, &request);
            outcomes.push(self.record(&draft.blog, result));
        }

        info!(blogs = outcomes.len(), "reblogged");
        Ok(PublishReport { plan, outcomes })
    }

    /// Reblog the post unchanged, with its own tags, to every configured blog.
    pub fn reblog_original(&mut self, ctx: &RequestContext) -> Result<Vec<SubmitOutcome>, CurateError> {
        let Some(post) = self.fetch_post(ctx)? else {
            self.prompter.alert("Error", "No post to reblog");
            return Ok(Vec::new());
        };
        let comment = self.prompter.text("Enter comment:", "");
        let state = self
            .prompter
            .pick("Reblog state:", &self.config.reblog.states, false)
            .into_iter()
            .next()
            .unwrap_or_default();

        let mut outcomes = Vec::new();
        for blog in self.config.blog_names() {
            let request = Reblog {
                id: ctx.post_id,
                reblog_key: post.reblog_key.clone(),
                comment: comment.clone(),
                tags: post.tags.clone(),
                attach_reblog_tree: None,
                state: state.clone(),
            };
            let result = self.platform.reblog(&blog, &request);
            outcomes.push(self.record(&blog, result));
        }

        info!(blogs = outcomes.len(), "reblogged original");
        Ok(outcomes)
    }

    /// Let the operator pick a blog and show its pending submissions.
    ///
    /// Returns the text shown, `None` when no blog was picked.
    pub fn show_submissions(&mut self) -> Result<Option<String>, CurateError> {
        let Some(blog) = self
            .prompter
            .pick("Submissions from which blog?", &self.config.blog_names(), false)
            .into_iter()
            .next()
        else {
            return Ok(None);
        };
        let response = self.platform.submissions(&blog)?;
        let text = response.pretty();
        self.prompter.text(&format!("Submissions to {blog}"), &text);
        Ok(Some(text))
    }

    /// Queue a post on `blog` asking readers for submissions.
    pub fn request_submissions(&mut self, blog: &str) -> Result<ApiResponse, CurateError> {
        let request = TextPost {
            title: self.config.submissions.request_title.clone(),
            body: markdown_to_html(&self.config.submissions.request_body),
            slug: SUBMISSION_SLUG.to_string(),
            format: "html".to_string(),
            state: QUEUE_STATE.to_string(),
            tags: Vec::new(),
        };
        let response = self.platform.create_text(blog, &request)?;
        debug!(blog, status = response.status, "submission request sent");
        if response.is_success() {
            self.prompter.toast(
                &format!("Submissions requested: {blog}"),
                ToastIcon::Success,
                TOAST_DURATION,
            );
        } else {
            self.prompter.alert("Error", &response.pretty());
        }
        Ok(response)
    }

    /// Turn one per-blog call result into an outcome, alerting on failure.
    fn record(
        &mut self,
        blog: &str,
        result: Result<ApiResponse, PlatformError>,
    ) -> SubmitOutcome {
        let error = match result {
            Ok(response) => match response.created_id() {
                Some(id) => {
                    debug!(blog, id, "published");
                    return SubmitOutcome {
                        blog: blog.to_string(),
                        post_id: Some(id),
                        error: None,
                    };
                }
                None => response.pretty(),
            },
            Err(e) => e.to_string(),
        };
        warn!(blog, "publishing failed");
        self.prompter.alert("Error", &error);
        SubmitOutcome {
            blog: blog.to_string(),
            post_id: None,
            error: Some(error),
        }
    }
}

/// Whether the reblog tree may be kept: reblogs only, with a trail of one or
/// two entries rooted at the post's own blog.
pub fn should_keep_tree(ctx: &RequestContext, post: &Post) -> bool {
    ctx.is_reblog
        && (1..=2).contains(&post.trail.len())
        && post.trail_root_blog() == Some(post.blog_name.as_str())
}

/// Folder for a plain download: the post's tags as a folder name, or the
/// source blog when the tags yield nothing.
pub fn folder_for_download(post: &Post) -> String {
    let folder = render_folder(&post.tags);
    if folder.is_empty() {
        post.blog_name.clone()
    } else {
        folder
    }
}

/// Read image files (or directories of them) for upload.
pub fn load_images(paths: &[PathBuf]) -> Result<Vec<ImageUpload>, CurateError> {
    let mut images = Vec::new();
    for path in collect_image_files(paths)? {
        let bytes = fs::read(&path)?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        images.push(ImageUpload { file_name, bytes });
    }
    Ok(images)
}

fn markdown_to_html(markdown: &str) -> String {
    let mut body = String::new();
    md_html::push_html(&mut body, Parser::new(markdown));
    body
}
