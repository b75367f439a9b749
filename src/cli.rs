//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

/// Pull a Google Photos library to local disk.
///
/// Photopull authenticates via OAuth2 (opening a browser on first run),
/// walks the paginated media-item listing, and either logs each page or
/// downloads every item at full resolution.
#[derive(Parser, Debug)]
#[command(name = "photopull")]
#[command(author, version, about)]
pub struct Args {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,

    /// Download each item at full resolution (default: log pages only)
    #[arg(short, long)]
    pub download: bool,

    /// Directory downloads are written to
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Stop after this many pages (omit to walk the whole library)
    #[arg(long)]
    pub max_pages: Option<u32>,

    /// Path to the OAuth client secrets file
    #[arg(long, default_value = "credentials.json")]
    pub credentials: PathBuf,

    /// Path to the token cache file
    #[arg(long, default_value = "tokens.json")]
    pub tokens: PathBuf,
}
