//! Best-effort image download for extracted articles.
//!
//! One streaming GET per image, body written to disk chunk by chunk. An
//! unsuccessful HTTP status is a soft miss: no file is created and no error
//! escapes to the caller. Transport and filesystem errors do surface as
//! `Err`, and the extractor logs and swallows them; an image can never
//! fail an article.

use futures::StreamExt;
use std::error::Error;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, instrument};

/// What a download attempt did.
#[derive(Debug, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Body streamed to the destination file.
    Saved,
    /// Server answered with a non-success status; nothing was written.
    Skipped(u16),
}

/// Decide from the response status whether the body may be persisted.
/// Any non-success status means the destination file must not be created.
fn persist_decision(status: reqwest::StatusCode) -> FetchOutcome {
    if status.is_success() {
        FetchOutcome::Saved
    } else {
        FetchOutcome::Skipped(status.as_u16())
    }
}

/// Destination path for the image belonging to the article at `index`
/// (1-based position in the extracted batch).
pub fn image_destination(output_dir: &Path, index: usize) -> PathBuf {
    output_dir.join(format!("article_{index}.jpg"))
}

/// Stream `url` into `dest`, overwriting any existing file.
///
/// A non-success response returns [`FetchOutcome::Skipped`] without touching
/// the filesystem. No retry is attempted.
#[instrument(level = "info", skip_all, fields(%url, dest = %dest.display()))]
pub async fn download_image(
    client: &reqwest::Client,
    url: &str,
    dest: &Path,
) -> Result<FetchOutcome, Box<dyn Error>> {
    let response = client.get(url).send().await?;
    if let FetchOutcome::Skipped(code) = persist_decision(response.status()) {
        debug!(status = code, "Image response not successful; skipping");
        return Ok(FetchOutcome::Skipped(code));
    }

    let mut file = File::create(dest).await?;
    let mut stream = response.bytes_stream();
    let mut bytes_written = 0usize;
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        bytes_written += chunk.len();
        file.write_all(&chunk).await?;
    }
    file.flush().await?;

    info!(bytes = bytes_written, "Saved article image");
    Ok(FetchOutcome::Saved)
}
