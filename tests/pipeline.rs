//! End-to-end runs of the derivation engine through the public API.
//!
//! Collaborators are local fakes: a prompter that answers by prompt title and
//! a platform that serves one post and remembers every reblog.
//!
//! Run with: cargo test --test pipeline

use std::collections::BTreeMap;
use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde_json::json;

use tumblr_curator::caption::{UNKNOWN_NAMES, collapse_whitespace, names_html, render_caption};
use tumblr_curator::config::CuratorConfig;
use tumblr_curator::naming::{make_tags, normalize_tags, render_folder};
use tumblr_curator::orchestrator::{Curator, should_keep_tree};
use tumblr_curator::platform::{ApiResponse, PhotoPost, Platform, PlatformError, Reblog, TextPost};
use tumblr_curator::prompt::{FieldSpec, FieldValue, FormValues, Prompter, ToastIcon};
use tumblr_curator::request::RequestContext;
use tumblr_curator::types::{FormAnswers, Post, TrailBlog, TrailItem};

const POST_URL: &str = "https://sourceblog.tumblr.com/post/7001/sunny-day";

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn trail(blogs: &[&str]) -> Vec<TrailItem> {
    blogs
        .iter()
        .map(|name| TrailItem {
            blog: TrailBlog {
                name: name.to_string(),
            },
        })
        .collect()
}

fn source_post() -> Post {
    Post {
        id: 7001,
        post_type: "photo".to_string(),
        tags: strings(&["top jake", "beach"]),
        trail: trail(&["sourceblog"]),
        blog_name: "sourceblog".to_string(),
        reblog_key: "rk1".to_string(),
        ..Post::default()
    }
}

// =============================================================================
// Fakes
// =============================================================================

/// Answers picks by title; anything unscripted is cancelled.
#[derive(Default)]
struct TitlePrompter {
    picks: BTreeMap<&'static str, Vec<String>>,
    form: FormValues,
    deletes: usize,
    alerts: Vec<String>,
}

impl Prompter for TitlePrompter {
    fn form(&mut self, _title: &str, _fields: &[FieldSpec]) -> FormValues {
        self.form.clone()
    }

    fn pick(&mut self, title: &str, _items: &[String], _multiple: bool) -> Vec<String> {
        self.picks.get(title).cloned().unwrap_or_default()
    }

    fn text(&mut self, _title: &str, _default: &str) -> String {
        String::new()
    }

    fn alert(&mut self, title: &str, message: &str) {
        self.alerts.push(format!("{title}: {message}"));
    }

    fn toast(&mut self, _message: &str, _icon: ToastIcon, _duration: Duration) {}

    fn edit_list(&mut self, _title: &str, mut items: Vec<String>) -> Option<Vec<String>> {
        if self.deletes == 0 {
            return None;
        }
        let keep = items.len().saturating_sub(self.deletes);
        items.truncate(keep);
        Some(items)
    }
}

#[derive(Default)]
struct OnePostPlatform {
    post: Option<Post>,
    reblogs: Vec<(String, Reblog)>,
}

impl Platform for OnePostPlatform {
    fn fetch_post(&mut self, _blog: &str, _id: u64) -> Result<ApiResponse, PlatformError> {
        let posts = match &self.post {
            Some(post) => vec![serde_json::to_value(post)?],
            None => Vec::new(),
        };
        Ok(ApiResponse {
            status: 200,
            body: json!({ "posts": posts }),
        })
    }

    fn like(&mut self, _id: u64, _reblog_key: &str) -> Result<ApiResponse, PlatformError> {
        Ok(ApiResponse {
            status: 200,
            body: json!([]),
        })
    }

    fn create_photo(&mut self, _blog: &str, _post: &PhotoPost) -> Result<ApiResponse, PlatformError> {
        unreachable!("photo posts are not created in these runs")
    }

    fn reblog(&mut self, blog: &str, reblog: &Reblog) -> Result<ApiResponse, PlatformError> {
        self.reblogs.push((blog.to_string(), reblog.clone()));
        Ok(ApiResponse {
            status: 201,
            body: json!({ "id": 9000 + self.reblogs.len() }),
        })
    }

    fn create_text(&mut self, _blog: &str, _post: &TextPost) -> Result<ApiResponse, PlatformError> {
        unreachable!("text posts are not created in these runs")
    }

    fn submissions(&mut self, _blog: &str) -> Result<ApiResponse, PlatformError> {
        unreachable!("submissions are not listed in these runs")
    }
}

// =============================================================================
// Derivation
// =============================================================================

#[test]
fn one_entry_three_renderings() {
    let entries = strings(&["Top @photog - @model_123"]);

    let folder = render_folder(&entries);
    assert_eq!(folder, "Photog - @Model_123 - Ig");
    assert!(!folder.to_lowercase().contains("top"));

    assert_eq!(normalize_tags(&entries), strings(&["photog - model_123"]));

    let html = names_html(&RequestContext::offline(false), "menswear-daily", &entries);
    assert!(html.starts_with("🔝 <span>His Instagram:"));
    assert!(html.contains("https://instagram.com/photog"));
}

#[test]
fn role_and_handle_survive_every_renderer() {
    let entries = strings(&["photo by @lee", "Jake (top)"]);

    assert_eq!(render_folder(&entries), "By Lee - Ig | Jake");
    assert_eq!(normalize_tags(&entries), strings(&["lee", "jake"]));

    let html = names_html(&RequestContext::offline(false), "menswear-daily", &entries);
    assert!(html.starts_with(
        "📷 <span>His Instagram:&nbsp;<strong><a href=\"https://instagram.com/lee\">lee</a>"
    ));
    assert!(html.contains("🔝 <strong>Jake</strong>"));
}

#[test]
fn empty_names_depend_on_mode() {
    assert_eq!(names_html(&RequestContext::offline(false), "b", &[]), UNKNOWN_NAMES);
    assert_eq!(names_html(&RequestContext::offline(true), "b", &[]), "");
}

#[test]
fn rendered_captions_are_collapsed() {
    let config = CuratorConfig::default();
    let form = FormAnswers {
        info_list: strings(&["Top Jake", "photo by lee", "ig: sam"]),
        additional_text: "Golden\n\nhour".to_string(),
        ..FormAnswers::default()
    };
    let mut rng = StdRng::seed_from_u64(3);
    for blog in config.blog_names() {
        let draft = render_caption(&RequestContext::offline(false), &config, &blog, &form, &mut rng);
        assert_eq!(collapse_whitespace(&draft.caption), draft.caption);
        assert!(!draft.caption.contains('\n'));
    }
}

#[test]
fn tags_never_exceed_thirty() {
    let entries: Vec<String> = (0..40).map(|i| format!("name{i}")).collect();
    let mut prompter = TitlePrompter {
        deletes: 4,
        ..TitlePrompter::default()
    };
    let tags = make_tags(&entries, "photo", &[], &mut prompter).unwrap();
    assert!(tags.len() <= 30);
    assert_eq!(tags[0], "name0");

    let mut cancelling = TitlePrompter::default();
    assert_eq!(make_tags(&entries, "photo", &[], &mut cancelling), None);
}

#[test]
fn duplicate_entries_give_one_tag() {
    let tags = normalize_tags(&strings(&["Jake", "top jake", "@jake"]));
    assert_eq!(tags, strings(&["jake"]));
}

#[test]
fn tree_is_kept_for_short_own_trails() {
    let ctx = RequestContext::from_url(&format!("{POST_URL}#reblog"));
    let mut post = source_post();
    for (blogs, expected) in [
        (vec![], false),
        (vec!["sourceblog"], true),
        (vec!["sourceblog", "a", "b"], false),
    ] {
        post.trail = trail(&blogs);
        assert_eq!(should_keep_tree(&ctx, &post), expected, "trail {blogs:?}");
    }
}

// =============================================================================
// Whole operation
// =============================================================================

#[test]
fn reblog_run_publishes_caption_and_tags() {
    let mut picks = BTreeMap::new();
    picks.insert("Select tags to use as names:", strings(&["Top Jake"]));
    picks.insert("Post to which blogs?", strings(&["menswear-daily"]));
    let form = FormValues(BTreeMap::from([
        ("info_list".to_string(), FieldValue::Text("Top Jake".to_string())),
        ("keep_tree".to_string(), FieldValue::Switch(true)),
    ]));
    let prompter = TitlePrompter {
        picks,
        form,
        ..TitlePrompter::default()
    };
    let platform = OnePostPlatform {
        post: Some(source_post()),
        ..OnePostPlatform::default()
    };
    let mut curator = Curator::new(
        CuratorConfig::default(),
        platform,
        prompter,
        StdRng::seed_from_u64(11),
    );

    let ctx = RequestContext::from_url(&format!("{POST_URL}#reblog"));
    let report = curator.post_reblog(&ctx).unwrap();

    assert_eq!(report.failures(), 0);
    assert_eq!(report.plan.tags, strings(&["jake", "photo"]));
    assert_eq!(report.plan.folder, "Jake");
    assert!(curator.prompter.alerts.is_empty());

    let (blog, reblog) = &curator.platform.reblogs[0];
    assert_eq!(blog, "menswear-daily");
    assert_eq!(reblog.id, 7001);
    assert_eq!(reblog.reblog_key, "rk1");
    assert_eq!(reblog.attach_reblog_tree, Some(true));
    assert!(reblog.comment.contains("Jake"));
    assert!(["published", "queue"].contains(&reblog.state.as_str()));
}
