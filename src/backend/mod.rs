use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::Stream;
use std::pin::Pin;

use crate::api::{AssetId, FilePayload, VideoInfo, VideoMetadata};
use crate::descriptor::DeliveryBase;
use crate::error::{DownloadError, RenderError, UploadError};

mod hosted;

pub use hosted::HostedBackend;

/// Chunked body of a derived asset being delivered.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, DownloadError>> + Send>>;

/// The transformation service, reachable through two contracts: submit an
/// original and get an identifier back, and resolve identifier plus
/// parameters to a URL whose bytes the backend renders on first fetch.
#[async_trait]
pub trait MediaBackend {
    /// Upload one image. Every call creates a new remote asset; originals
    /// are never deduplicated by content.
    async fn upload_image(&self, file: &FilePayload) -> Result<AssetId, UploadError>;

    /// Upload one video together with its metadata fields.
    async fn upload_video(
        &self,
        file: &FilePayload,
        meta: &VideoMetadata,
    ) -> Result<AssetId, UploadError>;

    /// Read path for backend-computed video metadata (compressed size,
    /// duration), available some time after ingestion.
    async fn list_videos(&self) -> anyhow::Result<Vec<VideoInfo>>;

    /// Observe whether the backend has rendered the bytes behind a derived
    /// URL; an error is the render-failure signal.
    async fn probe_render(&self, url: &str) -> Result<(), RenderError>;

    /// Fetch a derived asset's bytes for delivery.
    async fn fetch(&self, url: &str) -> Result<ByteStream, DownloadError>;

    /// Root for pure derived-URL construction.
    fn delivery(&self) -> &DeliveryBase;
}
