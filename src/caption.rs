//! Caption HTML for one destination blog.
//!
//! A caption is four fragments concatenated in order:
//!
//! ```text
//! names      📷 <strong>Lee</strong> More of him ›<br>   (one line per entry)
//! text       <p>Operator's additional text.</p>
//! link       <p><a href="…">url text</a></p>         (only with URL and label)
//! footer     divider, follow link, submit link, other-blog plug
//! ```
//!
//! Names go through the shared entry splitter first. An entry holding a social
//! handle becomes a `His <Platform>:` link behind its role prefix, the rest are
//! role-tagged and bolded. The footer is blog-specific, which is why a caption
//! is rendered per destination blog rather than once per post.
//!
//! Markup is built with maud. Names and config strings are escaped; the
//! operator's additional text and link label are trusted HTML.
//!
//! The promotional "check out" link picks one *other* configured blog at
//! random. The random source is a parameter so tests can seed it.

use crate::catalog::{LINE_BREAKS_RE, NAME_SUBS_RE, RENDERED_LINK_MARKER, SPACE_RUNS_RE, SPACES_RE};
use crate::classify::{html_social_link, split_entry};
use crate::config::{BlogConfig, CuratorConfig};
use crate::request::RequestContext;
use crate::role::{capitalize_first, strip_role};
use crate::types::{CaptionDraft, FormAnswers};
use maud::{Markup, PreEscaped, html};
use rand::Rng;
use rand::seq::SliceRandom;

/// Names section shown when nobody is credited on a fresh post.
pub const UNKNOWN_NAMES: &str = "<strong>Who is this? Comment if you know.</strong>";

const NBSP: PreEscaped<&str> = PreEscaped("&nbsp;");
const NBSP_ARROW: PreEscaped<&str> = PreEscaped("&nbsp;&#8250;");

/// Render the full caption for `blog`.
///
/// A blog missing from the config still gets a caption, with an empty
/// divider and default phrasing.
pub fn render_caption<R>(
    ctx: &RequestContext,
    config: &CuratorConfig,
    blog: &str,
    form: &FormAnswers,
    rng: &mut R,
) -> CaptionDraft
where
    R: Rng + ?Sized,
{
    let blog_config = config.blog(blog).cloned().unwrap_or_else(|| BlogConfig {
        name: blog.to_string(),
        ..BlogConfig::default()
    });

    let caption = [
        names_html(ctx, blog, &form.info_list),
        additional_text_html(&form.additional_text),
        url_html(&form.url, &form.url_text),
        footer_html(&blog_config, &config.blog_names(), rng).into_string(),
    ]
    .concat();

    CaptionDraft {
        blog: blog.to_string(),
        caption: collapse_whitespace(&caption),
    }
}

/// Names section: one line per credited entry.
///
/// With no entries, fresh posts ask readers for names and reblogs stay silent.
pub fn names_html(ctx: &RequestContext, blog: &str, info_list: &[String]) -> String {
    let names: Vec<String> = info_list
        .iter()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .map(|line| name_line(blog, line))
        .collect();

    if names.is_empty() {
        return if ctx.is_reblog {
            String::new()
        } else {
            UNKNOWN_NAMES.to_string()
        };
    }

    names.concat()
}

fn name_line(blog: &str, line: &str) -> String {
    let parts = split_entry(line);
    match parts.render_social(html_social_link) {
        Some(link) => {
            let prefix = parts.marker.map_or("", |marker| marker.prefix);
            format!("{prefix}{link}")
        }
        None => html_name(blog, line),
    }
}

/// One credited name with its role prefix and "more of him" link.
fn html_name(blog: &str, name: &str) -> String {
    if name.contains(RENDERED_LINK_MARKER) {
        return name.to_string();
    }
    let tag = strip_role(name);
    html! {
        (tag.prefix) strong { (tag.name) } (more_of_him(&tag.name, blog)) br;
    }
    .into_string()
}

/// Link to the blog's tag page for `name`; empty when no usable tag remains.
pub fn more_of_him(name: &str, blog: &str) -> Markup {
    let term = NAME_SUBS_RE.replace_all(name, "");
    let term = term.trim();
    if term.is_empty() {
        return html! {};
    }
    let href = format!(
        "https://{blog}.tumblr.com/tagged/{}",
        SPACES_RE.replace_all(&term.to_lowercase(), "%20")
    );
    html! {
        " " a href=(href) { "More of him" (NBSP_ARROW) }
    }
}

/// Operator's free text with every `. `-separated sentence capitalized.
pub fn additional_text_html(text: &str) -> String {
    let text = text.trim();
    if text.is_empty() {
        return String::new();
    }
    let sentences: Vec<String> = text.split(". ").map(capitalize_first).collect();
    html! { p { (PreEscaped(sentences.join(". "))) } }.into_string()
}

/// Optional link paragraph; needs both a URL and its label.
pub fn url_html(url: &str, url_text: &str) -> String {
    if url.is_empty() || url_text.is_empty() {
        return String::new();
    }
    html! { p { a href=(url) { (PreEscaped(url_text)) } } }.into_string()
}

/// Blog footer: divider, follower text, follow and submit links, and a plug
/// for one other blog.
pub fn footer_html<R>(blog: &BlogConfig, all_blogs: &[String], rng: &mut R) -> Markup
where
    R: Rng + ?Sized,
{
    let home = format!("https://{}.tumblr.com", blog.name);
    let submit = format!("{home}/submit");
    html! {
        small {
            p { (blog.divider) }
            p {
                @if let Some(followers) = &blog.followers {
                    (followers) " "
                }
                "Follow" (NBSP)
                a href=(home) { (blog.name) (NBSP_ARROW) }
                br;
                (blog.submit_phrase()) (NBSP)
                a href=(submit) { "Submit to " (blog.name) (NBSP_ARROW) }
            }
            @if let Some(plug) = check_out_other_blog(&blog.name, all_blogs, rng) {
                (plug)
            }
        }
    }
}

/// Plug for a randomly chosen blog other than `current`.
pub fn check_out_other_blog<R>(current: &str, all_blogs: &[String], rng: &mut R) -> Option<Markup>
where
    R: Rng + ?Sized,
{
    let others: Vec<&String> = all_blogs.iter().filter(|b| *b != current).collect();
    let pick = others.choose(rng)?;
    Some(html! {
        small {
            "🥇 My blogs are lit! Check out: "
            a href=(format!("https://{pick}.tumblr.com/")) { (pick.as_str()) }
            " 🥇"
        }
    })
}

/// Fold line breaks and runs of blanks into single spaces.
///
/// Idempotent: collapsing an already collapsed string changes nothing.
pub fn collapse_whitespace(html: &str) -> String {
    let html = LINE_BREAKS_RE.replace_all(html, " ");
    let html = SPACE_RUNS_RE.replace_all(&html, " ");
    html.trim().to_string()
}
