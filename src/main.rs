use clap::{Parser, Subcommand};
use rand::thread_rng;
use std::io::{self, BufReader};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use tumblr_curator::caption::render_caption;
use tumblr_curator::classify::classify;
use tumblr_curator::naming::{normalize_tags, render_folder};
use tumblr_curator::orchestrator::{Curator, load_images};
use tumblr_curator::platform::TumblrClient;
use tumblr_curator::prompt::TerminalPrompter;
use tumblr_curator::request::RequestContext;
use tumblr_curator::types::FormAnswers;
use tumblr_curator::{config, output};

#[derive(Parser)]
#[command(name = "tumblr-curator")]
#[command(about = "Curate and re-publish Tumblr posts to your blogs")]
#[command(long_about = "\
Curate and re-publish Tumblr posts to your blogs

Point the curator at a post URL and answer a few questions. Names you type
become captions, folder names and tags:

  entry           caption                     folder      tag
  Top @jake       🔝 His Instagram: jake      Jake - Ig   jake
  photo by lee    📷 Lee  More of him ›       By Lee      lee
  ig: sam         His Instagram: sam          Sam - Ig    sam

Post URLs look like https://<blog>.tumblr.com/post/<id>/<slug>. Append
#reblog to reblog instead of posting fresh.

Credentials come from curator.toml or the CURATOR_API_KEY and
CURATOR_OAUTH_TOKEN environment variables. Set RUST_LOG=debug to trace API
calls.

Run 'tumblr-curator gen-config' to generate a documented curator.toml.")]
#[command(version)]
struct Cli {
    /// Configuration file
    #[arg(long, default_value = "curator.toml", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Post local images as a new photo post, captioned from a source post
    Post {
        /// Source post URL
        url: String,
        /// Image files or directories of images
        images: Vec<PathBuf>,
    },
    /// Reblog a post to your blogs with a generated caption
    Reblog {
        /// Post URL (reblog mode is implied)
        url: String,
    },
    /// Reblog a post unchanged to every configured blog
    ReblogOriginal {
        /// Post URL
        url: String,
    },
    /// Like a post and list its downloadable media
    Download {
        /// Post URL
        url: String,
    },
    /// Show pending submissions of one of your blogs
    Submissions,
    /// Queue a post asking readers for submissions
    RequestSubmissions {
        /// Blog to post the request on
        blog: String,
    },
    /// Preview a caption offline
    Caption {
        /// Destination blog
        #[arg(long)]
        blog: String,
        /// Info-list entry (repeatable)
        #[arg(long = "entry")]
        entries: Vec<String>,
        /// Additional text
        #[arg(long, default_value = "")]
        text: String,
        /// Render as a reblog caption
        #[arg(long)]
        reblog: bool,
    },
    /// Show how entries are classified, and the folder and tags they produce
    Inspect {
        /// Info-list entries
        entries: Vec<String>,
    },
    /// Print a stock curator.toml with all options documented
    GenConfig,
    /// Validate the configuration without contacting the platform
    Check,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
        Command::Check => {
            println!("==> Checking {}", cli.config.display());
            let config = config::load_config(&cli.config)?;
            output::print_check_output(&config);
            println!("==> Config is valid");
        }
        Command::Inspect { entries } => {
            let classified: Vec<_> = entries.iter().map(|e| classify(e)).collect();
            let folder = render_folder(&entries);
            let tags = normalize_tags(&entries);
            output::print_inspect_output(&classified, &folder, &tags);
        }
        Command::Caption {
            blog,
            entries,
            text,
            reblog,
        } => {
            let config = config::load_config(&cli.config)?;
            let form = FormAnswers {
                info_list: entries,
                additional_text: text,
                ..FormAnswers::default()
            };
            let ctx = RequestContext::offline(reblog);
            let draft = render_caption(&ctx, &config, &blog, &form, &mut thread_rng());
            output::print_caption_output(&draft);
        }
        Command::Download { url } => {
            let mut curator = curator(&cli.config)?;
            match curator.download_data(&RequestContext::from_url(&url))? {
                Some(data) => output::print_download_output(&data),
                None => println!("==> No post found at {url}"),
            }
        }
        Command::Post { url, images } => {
            let images = load_images(&images)?;
            info!(images = images.len(), "loaded images");
            let mut curator = curator(&cli.config)?;
            let report = curator.post_images(&RequestContext::from_url(&url), images)?;
            output::print_publish_report(&report);
        }
        Command::Reblog { url } => {
            let url = if url.contains("#reblog") {
                url
            } else {
                format!("{url}#reblog")
            };
            let mut curator = curator(&cli.config)?;
            let report = curator.post_reblog(&RequestContext::from_url(&url))?;
            output::print_publish_report(&report);
        }
        Command::ReblogOriginal { url } => {
            let mut curator = curator(&cli.config)?;
            let outcomes = curator.reblog_original(&RequestContext::from_url(&url))?;
            output::print_outcomes(&outcomes);
        }
        Command::Submissions => {
            let mut curator = curator(&cli.config)?;
            if curator.show_submissions()?.is_none() {
                println!("==> No blog selected");
            }
        }
        Command::RequestSubmissions { blog } => {
            let mut curator = curator(&cli.config)?;
            let response = curator.request_submissions(&blog)?;
            println!("==> Platform answered {}", response.status);
        }
    }

    Ok(())
}

type TerminalCurator =
    Curator<TumblrClient, TerminalPrompter<BufReader<io::Stdin>, io::Stdout>, rand::rngs::ThreadRng>;

/// Load config and wire the curator to the live platform and the terminal.
fn curator(config_path: &std::path::Path) -> Result<TerminalCurator, Box<dyn std::error::Error>> {
    let config = config::load_config(config_path)?;
    let client = TumblrClient::new(&config.client)?;
    let prompter = TerminalPrompter::new(BufReader::new(io::stdin()), io::stdout());
    Ok(Curator::new(config, client, prompter, thread_rng()))
}
