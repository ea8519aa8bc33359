use futures::StreamExt;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{Level, event, instrument};

use crate::backend::{ByteStream, MediaBackend};
use crate::error::DownloadError;

pub const IMAGE_EXTENSION: &str = "png";
pub const VIDEO_EXTENSION: &str = "mp4";

/// Deterministic output filename: lower-cased, whitespace runs collapsed to
/// single underscores, extension appended. Non-whitespace characters are
/// preserved as-is.
pub fn derived_filename(hint: &str, extension: &str) -> String {
    let mut out = String::with_capacity(hint.len() + extension.len() + 1);
    let mut in_whitespace = false;
    for ch in hint.chars() {
        if ch.is_whitespace() {
            if !in_whitespace {
                out.push('_');
                in_whitespace = true;
            }
        } else {
            in_whitespace = false;
            out.extend(ch.to_lowercase());
        }
    }
    out.push('.');
    out.push_str(extension);
    out
}

/// Fetch a derived asset and save it under `dest_dir`, named from
/// `filename_hint`. The fetched bytes live only for the duration of the
/// write; a failed transfer removes the partial file.
#[instrument(level = "info", skip(backend))]
pub async fn download<B: MediaBackend>(
    backend: &B,
    url: &str,
    filename_hint: &str,
    extension: &str,
    dest_dir: &Path,
) -> Result<PathBuf, DownloadError> {
    let mut stream = backend.fetch(url).await?;
    let path = dest_dir.join(derived_filename(filename_hint, extension));
    let mut file = fs::File::create(&path).await?;

    if let Err(err) = write_stream(&mut file, &mut stream).await {
        drop(file);
        let _ = fs::remove_file(&path).await;
        return Err(err);
    }

    event!(Level::INFO, path = %path.display(), "download complete");
    Ok(path)
}

async fn write_stream(file: &mut fs::File, stream: &mut ByteStream) -> Result<(), DownloadError> {
    while let Some(chunk) = stream.next().await {
        file.write_all(&chunk?).await?;
    }
    file.flush().await?;
    Ok(())
}
