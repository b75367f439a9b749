//! CLI entry point for the photopull tool.

use anyhow::Result;
use clap::Parser;
use futures_util::TryStreamExt;
use photopull::auth::{ClientSecrets, OAuthFlow, READONLY_SCOPE, TokenStore};
use photopull::download::{destination_for, fetch_to_file};
use photopull::library::LibraryClient;
use tracing::{debug, info};

mod cli;

use cli::Args;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Determine log level based on verbose/quiet flags
    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt().with_env_filter(filter).init();

    debug!(?args, "CLI arguments parsed");
    info!("Photopull starting");

    let secrets = ClientSecrets::load(&args.credentials)?;
    let store = TokenStore::new(&args.tokens);
    let flow = OAuthFlow::new(secrets, store)?;

    let credential = flow.acquire(&[READONLY_SCOPE]).await?;
    let client = LibraryClient::new(flow, credential);
    let download_client = reqwest::Client::new();

    let mut total: u64 = 0;
    let mut page_count: u32 = 0;
    let mut pages = std::pin::pin!(client.pages());

    while let Some(page) = pages.try_next().await? {
        total += page.media_items.len() as u64;
        page_count += 1;
        info!(
            page_token = page.page_token.as_deref().unwrap_or("<first>"),
            items = page.media_items.len(),
            total,
            "page received"
        );

        if args.download {
            for item in &page.media_items {
                let dest = destination_for(&args.output_dir, item);
                info!(id = %item.id, dest = %dest.display(), "downloading");
                fetch_to_file(&download_client, &item.base_url, &dest).await?;
            }
        } else {
            for item in &page.media_items {
                debug!(id = %item.id, url = %item.product_url, "listed item");
            }
        }

        if let Some(max_pages) = args.max_pages {
            if page_count >= max_pages {
                info!(max_pages, "page limit reached, stopping");
                break;
            }
        }
    }

    info!(pages = page_count, total, "Listing complete");

    Ok(())
}
