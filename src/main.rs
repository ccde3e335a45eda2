//! `tubemeta` CLI - Inspect link detection and preview emitted tags

use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use tubemeta::{
    detect, Config, ContentItem, Enricher, MemoryAssetStore, MemoryMetaStore, UpstreamClient,
};

#[derive(Parser)]
#[command(name = "tubemeta")]
#[command(about = "YouTube metadata enrichment for content pages")]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan text for a YouTube link and print the video id
    Detect {
        /// Text to scan
        text: String,
    },

    /// Enrich a body text and print the Open Graph tags and JSON-LD
    Tags {
        /// Body text containing a YouTube link
        body: String,

        /// YouTube Data API key (defaults to TUBEMETA_API_KEY)
        #[arg(short, long)]
        api_key: Option<String>,

        /// Item title used for name/description fields
        #[arg(short, long, default_value = "Untitled")]
        title: String,

        /// Item permalink used for the JSON-LD @id
        #[arg(short, long, default_value = "https://example.com/")]
        permalink: String,

        /// Surface provider error detail as an HTML comment
        #[arg(short, long)]
        debug: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    FmtSubscriber::builder()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .with_target(false)
        .compact()
        .init();

    match cli.command {
        Commands::Detect { text } => cmd_detect(&text),
        Commands::Tags {
            body,
            api_key,
            title,
            permalink,
            debug,
        } => cmd_tags(&body, api_key, title, permalink, debug).await,
    }
}

fn cmd_detect(text: &str) -> Result<()> {
    match detect(text) {
        Some(reference) => {
            println!("🎬 video id: {}", reference.video_id);
            Ok(())
        }
        None => {
            println!("no YouTube link found");
            std::process::exit(1);
        }
    }
}

async fn cmd_tags(
    body: &str,
    api_key: Option<String>,
    title: String,
    permalink: String,
    debug: bool,
) -> Result<()> {
    let config = match api_key {
        Some(key) => Config::new(key),
        None => Config::from_env(),
    }
    .with_debug(debug);

    let enricher = Enricher::new(
        config,
        Arc::new(MemoryMetaStore::new()),
        Arc::new(MemoryAssetStore::new()),
        Arc::new(UpstreamClient::new()?),
    );

    let item = ContentItem {
        id: 1,
        title,
        body: body.to_string(),
        permalink,
        published: chrono::Utc::now(),
    };

    if !enricher.has_video(&item) {
        println!("no YouTube link found");
        std::process::exit(1);
    }

    let output = enricher.emit_open_graph_tags(&item).await;
    if let Some(comment) = &output.debug_comment {
        println!("<!-- {comment} -->");
    }
    if output.tags.is_empty() {
        println!("⚠️  no tags emitted (provider error or thumbnail failure)");
    } else {
        println!("🏷️  Open Graph:");
        for (property, content) in &output.tags {
            println!("<meta property=\"{property}\" content=\"{content}\">");
        }
    }

    if let Some(document) = enricher.emit_json_ld(&item).await {
        println!("\n📄 JSON-LD:");
        println!("{}", serde_json::to_string_pretty(&document)?);
    }

    Ok(())
}
