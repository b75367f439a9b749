//! Streaming download of media bytes to disk.
//!
//! A media item's `baseUrl` is a capability URL: appending `=d` selects the
//! original full-resolution bytes. The body is streamed straight to the
//! destination file, never buffered whole. On any failure mid-stream the
//! partial file is removed best-effort and the original error propagates.

mod error;

pub use error::DownloadError;

use std::path::{Path, PathBuf};

use futures_util::StreamExt;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, instrument};

use crate::library::MediaItem;

/// Suffix appended to a capability URL to request full-resolution bytes.
pub const FULL_RESOLUTION_SUFFIX: &str = "=d";

/// Builds the destination path for a media item.
///
/// The filename is the item's creation timestamp plus an extension guessed
/// from the MIME type. Names are neither deduplicated nor sanitized: two
/// items captured in the same second overwrite each other.
#[must_use]
pub fn destination_for(output_dir: &Path, item: &MediaItem) -> PathBuf {
    let extension = extension_for_mime(&item.mime_type);
    output_dir.join(format!("{}{extension}", item.media_metadata.creation_time))
}

fn extension_for_mime(mime_type: &str) -> &'static str {
    match mime_type {
        "image/jpeg" => ".jpg",
        "image/png" => ".png",
        "image/gif" => ".gif",
        "image/heif" | "image/heic" => ".heic",
        "image/webp" => ".webp",
        "video/mp4" => ".mp4",
        "video/quicktime" => ".mov",
        _ => "",
    }
}

/// Fetches a media item's full-resolution bytes into `dest`.
///
/// The response status is checked before the file is created, so an HTTP
/// error leaves nothing on disk. A transport or write error mid-stream
/// removes the partial file (removal failures are ignored) and the error
/// is returned to the caller.
///
/// # Errors
///
/// Returns `DownloadError` on network failure, a non-success status, or a
/// filesystem error.
#[instrument(skip(client), fields(url = %base_url, dest = %dest.display()))]
pub async fn fetch_to_file(
    client: &reqwest::Client,
    base_url: &str,
    dest: &Path,
) -> Result<(), DownloadError> {
    let url = format!("{base_url}{FULL_RESOLUTION_SUFFIX}");

    let response = client
        .get(&url)
        .send()
        .await
        .map_err(|source| DownloadError::network(&url, source))?;

    let status = response.status();
    if !status.is_success() {
        return Err(DownloadError::http_status(&url, status.as_u16()));
    }

    let file = File::create(dest)
        .await
        .map_err(|source| DownloadError::io(dest, source))?;
    let mut writer = BufWriter::new(file);

    let result = stream_body(response, &url, &mut writer, dest).await;
    if result.is_err() {
        // Leave no partial file behind; the removal itself is best-effort.
        drop(writer);
        debug!(path = %dest.display(), "cleaning up partial file after error");
        let _ = tokio::fs::remove_file(dest).await;
        return result;
    }

    writer
        .flush()
        .await
        .map_err(|source| DownloadError::io(dest, source))?;
    debug!("download complete");
    Ok(())
}

async fn stream_body(
    response: reqwest::Response,
    url: &str,
    writer: &mut BufWriter<File>,
    dest: &Path,
) -> Result<(), DownloadError> {
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|source| DownloadError::network(url, source))?;
        writer
            .write_all(&chunk)
            .await
            .map_err(|source| DownloadError::io(dest, source))?;
    }
    Ok(())
}
