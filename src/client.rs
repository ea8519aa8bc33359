use futures::StreamExt;
use reqwest::multipart::Form;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{Level, event, instrument};

use crate::backend::ByteStream;
use crate::error::DownloadError;

/// A hung call surfaces through the same failure channel as any other
/// transport error rather than pending forever.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Clone)]
pub(crate) struct Client {
    client: reqwest::Client,
}

impl Client {
    pub(crate) fn default() -> Self {
        Client {
            client: reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .expect("Failed to build HTTP client"),
        }
    }

    #[instrument(level = "info", skip(self))]
    pub(crate) async fn get_json<T>(&self, url: &str) -> anyhow::Result<T>
    where
        T: DeserializeOwned,
    {
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(anyhow::anyhow!(
                "Request failed with status: {}",
                response.status()
            ));
        }
        let text = response.text().await?;
        event!(Level::DEBUG, response = text);

        Ok(serde_json::from_str::<T>(&text)?)
    }

    #[instrument(level = "info", skip(self, form))]
    pub(crate) async fn post_multipart<T>(&self, url: &str, form: Form) -> anyhow::Result<T>
    where
        T: DeserializeOwned,
    {
        let response = self.client.post(url).multipart(form).send().await?;
        if !response.status().is_success() {
            return Err(anyhow::anyhow!(
                "Request failed with status: {}",
                response.status()
            ));
        }
        let text = response.text().await?;
        event!(Level::DEBUG, response = text);

        Ok(serde_json::from_str::<T>(&text)?)
    }

    /// GET the URL and report only whether the backend produced the bytes;
    /// the body is dropped.
    #[instrument(level = "info", skip(self))]
    pub(crate) async fn probe(&self, url: &str) -> anyhow::Result<()> {
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(anyhow::anyhow!(
                "Request failed with status: {}",
                response.status()
            ));
        }
        Ok(())
    }

    /// GET the URL as a chunked byte stream.
    #[instrument(level = "info", skip(self))]
    pub(crate) async fn fetch_stream(&self, url: &str) -> Result<ByteStream, DownloadError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DownloadError::FetchFailed(e.to_string()))?;
        if !response.status().is_success() {
            return Err(DownloadError::FetchFailed(format!(
                "Request failed with status: {}",
                response.status()
            )));
        }

        Ok(Box::pin(response.bytes_stream().map(|chunk| {
            chunk.map_err(|e| DownloadError::FetchFailed(e.to_string()))
        })))
    }
}
