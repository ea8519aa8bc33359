mod api;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use tracing::instrument;

use super::{ByteStream, MediaBackend};
use crate::api::{AssetId, FilePayload, VideoInfo, VideoMetadata};
use crate::client::Client;
use crate::descriptor::DeliveryBase;
use crate::error::{DownloadError, RenderError, UploadError};
use api::IngestResponse;

/// Client of the hosted ingestion and delivery endpoints.
pub struct HostedBackend {
    client: Client,
    api_base: String,
    delivery: DeliveryBase,
}

impl HostedBackend {
    pub fn new(api_base: &str, delivery_base: &str) -> Self {
        HostedBackend {
            client: Client::default(),
            api_base: api_base.trim_end_matches('/').to_string(),
            delivery: DeliveryBase::new(delivery_base),
        }
    }

    fn file_part(file: &FilePayload) -> Part {
        Part::bytes(file.bytes().to_vec()).file_name(file.file_name().to_string())
    }
}

#[async_trait]
impl MediaBackend for HostedBackend {
    #[instrument(level = "info", skip(self, file), fields(file_name = file.file_name(), size = file.size_bytes()))]
    async fn upload_image(&self, file: &FilePayload) -> Result<AssetId, UploadError> {
        let url = format!("{}/image-upload", self.api_base);
        let form = Form::new().part("file", Self::file_part(file));

        let response: IngestResponse = self
            .client
            .post_multipart(&url, form)
            .await
            .map_err(|e| UploadError::NetworkOrServer(e.to_string()))?;
        Ok(AssetId::new(response.public_id))
    }

    #[instrument(level = "info", skip(self, file, meta), fields(file_name = file.file_name(), size = file.size_bytes(), title = meta.title))]
    async fn upload_video(
        &self,
        file: &FilePayload,
        meta: &VideoMetadata,
    ) -> Result<AssetId, UploadError> {
        let url = format!("{}/video-upload", self.api_base);
        let form = Form::new()
            .part("file", Self::file_part(file))
            .text("title", meta.title.clone())
            .text("description", meta.description.clone())
            .text("originalSize", meta.original_size.to_string());

        let response: IngestResponse = self
            .client
            .post_multipart(&url, form)
            .await
            .map_err(|e| UploadError::NetworkOrServer(e.to_string()))?;
        Ok(AssetId::new(response.public_id))
    }

    async fn list_videos(&self) -> anyhow::Result<Vec<VideoInfo>> {
        let url = format!("{}/videos", self.api_base);
        self.client.get_json(&url).await
    }

    async fn probe_render(&self, url: &str) -> Result<(), RenderError> {
        self.client
            .probe(url)
            .await
            .map_err(|e| RenderError::new(e.to_string()))
    }

    async fn fetch(&self, url: &str) -> Result<ByteStream, DownloadError> {
        self.client.fetch_stream(url).await
    }

    fn delivery(&self) -> &DeliveryBase {
        &self.delivery
    }
}
