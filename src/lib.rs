//! # Tumblr Curator
//!
//! Re-publishes photo and video posts from a source blog to a set of
//! destination blogs. The operator points the curator at a post URL, answers
//! a short questionnaire, and the curator derives captions, tags and a folder
//! name from the answers and pushes the result back as new posts or reblogs.
//!
//! # Architecture: One Parse, Three Renderings
//!
//! The interesting part is the text engine. Operators type loose entries like
//! `"Top @jake"` or `"photo by Lee"`; every entry goes through the same
//! classification and is then rendered three independent ways:
//!
//! ```text
//!                         ┌→ caption   🔝 His Instagram: <a href="https://instagram.com/jake">jake</a>
//! entry → role + handle ──┼→ folder    Jake - Ig
//!                         └→ tags      jake
//! ```
//!
//! The classification rules are a static, ordered pattern table. First match
//! wins, so the table order is the tie-break policy.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`catalog`] | Ordered social-handle patterns, role markers and cleanup regexes |
//! | [`classify`] | First-match social classification shared by every renderer |
//! | [`role`] | Role-marker detection and stripping, title-casing |
//! | [`caption`] | Per-blog caption HTML built with Maud |
//! | [`naming`] | Folder names and the 30-tag list |
//! | [`media`] | Downloadable media of a post, local image files for upload |
//! | [`request`] | Per-operation context parsed from the post URL |
//! | [`types`] | Shared post, form and plan types |
//! | [`platform`] | Remote platform trait and the blocking HTTP client |
//! | [`prompt`] | Operator prompt trait and the terminal implementation |
//! | [`orchestrator`] | The operations: download, post, reblog, submissions |
//! | [`config`] | `curator.toml` loading, validation and merging |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Collaborators Behind Traits
//!
//! The remote platform and the operator are both blocking request/response
//! collaborators, modelled as [`platform::Platform`] and
//! [`prompt::Prompter`]. Orchestration code is generic over both, so tests
//! run whole operations against a scripted operator and a recording platform.
//!
//! ## Cancel Means Empty
//!
//! Any dismissed prompt answers with an empty value and the operation carries
//! on. Only failing to *fetch* a post aborts; a failing blog during
//! publishing is reported and the next blog is tried.
//!
//! ## Injected Randomness
//!
//! The promotional blog in each caption footer and the reblog publish state
//! are chosen at random. The random source is a parameter, so tests seed it.
//!
//! ## Maud For Captions
//!
//! Captions are built with [Maud](https://maud.lambda.xyz/) rather than format
//! strings. Names typed by the operator are escaped; the free text and link
//! label fields are trusted HTML, as the operator writes them.

pub mod caption;
pub mod catalog;
pub mod classify;
pub mod config;
pub mod media;
pub mod naming;
pub mod orchestrator;
pub mod output;
pub mod platform;
pub mod prompt;
pub mod request;
pub mod role;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
