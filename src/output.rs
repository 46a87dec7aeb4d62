//! CLI output formatting for every command.
//!
//! # Information-First Display
//!
//! Output is organised around what the operator acted on: the post, the
//! blogs it went to, the entries they typed. Each entity gets a header line
//! with a positional index and indented context lines below it.
//!
//! # Output Format
//!
//! ## Download
//!
//! ```text
//! Post 7001 (photo)
//!     Folder: Jake | Beach
//! Media
//! 001  - Sunny 1
//!     Source: https://64.media.tumblr.com/…/1.jpg
//! ```
//!
//! ## Post / Reblog
//!
//! ```text
//! Post 7001 (photo)
//!     Folder: Jake | By Lee
//!     Tags: jake, lee, photo
//! Blogs
//! 001 menswear-daily → post 9001
//!     Caption: 🔝 Jake More of him › …
//! 002 beach-boys-archive → failed
//!     Error: {"meta": …}
//!
//! Published to 1 of 2 blogs
//! ```
//!
//! ## Inspect
//!
//! ```text
//! Entries
//! 001 Top @photog
//!     Role: top
//!     Pattern: at-handle
//!     Name: Photog
//!     Handle: https://instagram.com/photog
//! Folder
//!     Photog - Ig
//! Tags
//!     photog
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::classify::ClassifiedEntry;
use crate::config::CuratorConfig;
use crate::types::{CaptionDraft, DownloadData, PostPlan, PublishReport, SubmitOutcome};

/// Longest caption excerpt shown per blog.
const CAPTION_EXCERPT: usize = 72;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Strip HTML tags from a string (simple angle-bracket stripping).
fn strip_html_tags(html: &str) -> String {
    let mut result = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(c),
            _ => {}
        }
    }
    result
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let head: String = text.chars().take(max).collect();
        format!("{head}...")
    }
}

/// Caption as plain text: tags removed, entities for spaces and arrows
/// decoded, cut to one line.
fn caption_excerpt(caption: &str) -> String {
    let text = strip_html_tags(caption)
        .replace("&nbsp;", " ")
        .replace("&#8250;", "›");
    truncate_chars(text.trim(), CAPTION_EXCERPT)
}

fn post_header(post_id: Option<u64>, post_type: &str) -> String {
    match post_id {
        Some(id) => format!("Post {id} ({post_type})"),
        None => format!("No post ({post_type})"),
    }
}

fn outcome_line(index: usize, outcome: &SubmitOutcome) -> String {
    match outcome.post_id {
        Some(id) => format!("{} {} → post {id}", format_index(index), outcome.blog),
        None => format!("{} {} → failed", format_index(index), outcome.blog),
    }
}

fn summary_line(outcomes: &[SubmitOutcome]) -> String {
    let ok = outcomes.iter().filter(|o| o.succeeded()).count();
    format!("Published to {ok} of {} blogs", outcomes.len())
}

// ============================================================================
// Download
// ============================================================================

pub fn format_download_output(data: &DownloadData) -> Vec<String> {
    let mut lines = vec![
        post_header(Some(data.post.id), &data.post_type),
        format!("{}Folder: {}", indent(1), data.folder),
    ];
    if data.media.is_empty() {
        lines.push(format!("{}No media", indent(1)));
        return lines;
    }
    lines.push("Media".to_string());
    for (i, item) in data.media.iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), item.title));
        lines.push(format!("{}Source: {}", indent(1), item.url));
    }
    lines
}

pub fn print_download_output(data: &DownloadData) {
    for line in format_download_output(data) {
        println!("{}", line);
    }
}

// ============================================================================
// Post / reblog
// ============================================================================

fn plan_header(plan: &PostPlan) -> Vec<String> {
    let mut lines = vec![post_header(plan.post_id, &plan.post_type)];
    if !plan.folder.is_empty() {
        lines.push(format!("{}Folder: {}", indent(1), plan.folder));
    }
    lines.push(format!("{}Tags: {}", indent(1), plan.tags.join(", ")));
    if plan.keep_tree {
        lines.push(format!("{}Keeping reblog tree", indent(1)));
    }
    lines
}

pub fn format_publish_report(report: &PublishReport) -> Vec<String> {
    let mut lines = plan_header(&report.plan);
    if report.outcomes.is_empty() {
        lines.push(format!("{}Nothing published", indent(1)));
        return lines;
    }
    lines.push("Blogs".to_string());
    for (i, outcome) in report.outcomes.iter().enumerate() {
        lines.push(outcome_line(i + 1, outcome));
        let caption = report
            .plan
            .blog_captions
            .iter()
            .find(|draft| draft.blog == outcome.blog);
        if let Some(draft) = caption {
            lines.push(format!("{}Caption: {}", indent(1), caption_excerpt(&draft.caption)));
        }
        if let Some(error) = &outcome.error {
            lines.push(format!("{}Error: {}", indent(1), truncate_chars(&one_line(error), CAPTION_EXCERPT)));
        }
    }
    lines.push(String::new());
    lines.push(summary_line(&report.outcomes));
    lines
}

pub fn print_publish_report(report: &PublishReport) {
    for line in format_publish_report(report) {
        println!("{}", line);
    }
}

/// Outcomes of a reblog-original run.
pub fn format_outcomes(outcomes: &[SubmitOutcome]) -> Vec<String> {
    let mut lines: Vec<String> = outcomes
        .iter()
        .enumerate()
        .map(|(i, outcome)| outcome_line(i + 1, outcome))
        .collect();
    lines.push(summary_line(outcomes));
    lines
}

pub fn print_outcomes(outcomes: &[SubmitOutcome]) {
    for line in format_outcomes(outcomes) {
        println!("{}", line);
    }
}

fn one_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

// ============================================================================
// Offline commands
// ============================================================================

/// Caption preview: the full HTML, then a plain-text rendering.
pub fn format_caption_output(draft: &CaptionDraft) -> Vec<String> {
    vec![
        format!("Caption for {}", draft.blog),
        format!("{}{}", indent(1), draft.caption),
        "Text".to_string(),
        format!("{}{}", indent(1), caption_excerpt(&draft.caption)),
    ]
}

pub fn print_caption_output(draft: &CaptionDraft) {
    for line in format_caption_output(draft) {
        println!("{}", line);
    }
}

/// How each entry was understood, and what it becomes as folder and tags.
pub fn format_inspect_output(
    entries: &[ClassifiedEntry],
    folder: &str,
    tags: &[String],
) -> Vec<String> {
    let mut lines = vec!["Entries".to_string()];
    for (i, entry) in entries.iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), entry.raw_text));
        lines.push(format!("{}Role: {}", indent(1), entry.role.as_str()));
        if let Some(pattern) = entry.pattern_id {
            lines.push(format!("{}Pattern: {}", indent(1), pattern));
        }
        lines.push(format!("{}Name: {}", indent(1), entry.clean_name));
        if let Some(url) = &entry.handle_url {
            lines.push(format!("{}Handle: {}", indent(1), url));
        }
    }
    lines.push("Folder".to_string());
    lines.push(format!("{}{}", indent(1), folder));
    lines.push("Tags".to_string());
    lines.push(format!("{}{}", indent(1), tags.join(", ")));
    lines
}

pub fn print_inspect_output(entries: &[ClassifiedEntry], folder: &str, tags: &[String]) {
    for line in format_inspect_output(entries, folder, tags) {
        println!("{}", line);
    }
}

/// Summary of a loaded configuration for the `check` command.
pub fn format_check_output(config: &CuratorConfig) -> Vec<String> {
    let mut lines = vec!["Blogs".to_string()];
    for (i, blog) in config.blogs.iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), blog.name));
        if !blog.keywords.is_empty() {
            lines.push(format!("{}Keywords: {}", indent(1), blog.keywords.join(", ")));
        }
    }
    lines.push("Client".to_string());
    lines.push(format!("{}{}", indent(1), config.client.base_url));
    let credentials = match (
        config.client.api_key.is_empty(),
        config.client.oauth_token.is_empty(),
    ) {
        (false, false) => "API key and OAuth token set",
        (false, true) => "API key set, OAuth token missing",
        (true, false) => "OAuth token set, API key missing",
        (true, true) => "no credentials",
    };
    lines.push(format!("{}{}", indent(1), credentials));
    lines
}

pub fn print_check_output(config: &CuratorConfig) {
    for line in format_check_output(config) {
        println!("{}", line);
    }
}
