use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Hard ceiling for video uploads, enforced before any network call.
pub const MAX_VIDEO_BYTES: u64 = 70 * 1024 * 1024;

/// Opaque identifier assigned by the backend when an upload succeeds.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct AssetId(String);

impl AssetId {
    pub fn new(id: impl Into<String>) -> Self {
        AssetId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Copy, Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

/// A file selected for upload. The size is captured at construction, before
/// any network call is made, because the backend does not echo it back
/// reliably.
#[derive(Clone, Debug)]
pub struct FilePayload {
    file_name: String,
    bytes: Vec<u8>,
}

impl FilePayload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        FilePayload {
            file_name: file_name.into(),
            bytes,
        }
    }

    pub async fn from_path(path: &Path) -> std::io::Result<Self> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "file".to_string());
        let bytes = tokio::fs::read(path).await?;
        Ok(FilePayload { file_name, bytes })
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn size_bytes(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// One uploaded source file. Never mutated after creation; a new upload
/// supersedes it instead.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Asset {
    pub id: AssetId,
    pub kind: MediaKind,
    pub original_size_bytes: u64,
    pub title: Option<String>,
    pub description: Option<String>,
}

/// User-supplied fields accompanying a video upload.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct VideoMetadata {
    pub title: String,
    pub description: String,
    pub original_size: u64,
}

/// Backend-computed video metadata, available some time after ingestion
/// through the list endpoint.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoInfo {
    pub public_id: String,
    pub title: String,
    pub description: String,
    pub original_size: u64,
    pub compressed_size: u64,
    /// Seconds.
    pub duration: f64,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl VideoInfo {
    /// How much smaller the compressed rendition is, as a rounded percentage.
    pub fn compression_percentage(&self) -> i64 {
        if self.original_size == 0 {
            return 0;
        }
        ((1.0 - self.compressed_size as f64 / self.original_size as f64) * 100.0).round() as i64
    }
}

/// `m:ss` rendering of a duration in seconds.
pub fn format_duration(seconds: f64) -> String {
    let mut minutes = (seconds / 60.0).floor() as u64;
    let mut remaining = (seconds % 60.0).round() as u64;
    if remaining == 60 {
        minutes += 1;
        remaining = 0;
    }
    format!("{}:{:02}", minutes, remaining)
}

/// Human-readable byte count, decimal units.
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1000.0 && unit < UNITS.len() - 1 {
        size /= 1000.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} B", bytes)
    } else {
        format!("{:.1} {}", size, UNITS[unit])
    }
}
