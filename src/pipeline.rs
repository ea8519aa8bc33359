use tracing::{Level, event, instrument};

use crate::api::{Asset, AssetId, FilePayload, MAX_VIDEO_BYTES, MediaKind, VideoMetadata};
use crate::backend::MediaBackend;
use crate::catalog::ProfileCatalog;
use crate::descriptor::ImageDescriptor;
use crate::error::{RenderError, SelectError, StateError, UploadError};
use crate::state::{AssetLifecycle, DerivationTicket, TransformState};

/// The output of applying a profile to an asset, uniquely determined by the
/// (source asset, profile) pair and resolved to a lazily rendered URL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DerivedAsset {
    pub source_asset_id: AssetId,
    pub profile_name: String,
    pub url: String,
}

/// A requested derivation whose render outcome has not been observed yet.
#[derive(Clone, Debug)]
pub struct PendingDerivation {
    ticket: DerivationTicket,
    asset_id: AssetId,
    descriptor: ImageDescriptor,
    url: String,
}

impl PendingDerivation {
    pub fn profile(&self) -> &str {
        self.ticket.profile()
    }

    pub fn descriptor(&self) -> &ImageDescriptor {
        &self.descriptor
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

/// What became of a requested derivation.
#[derive(Debug)]
pub enum RenderOutcome {
    /// The backend produced the bytes; the pipeline is `Ready`.
    Ready(DerivedAsset),

    /// The render failed. Scoped to this one derived asset; other profiles
    /// and the base asset are unaffected.
    Failed(RenderError),

    /// A newer request superseded this one; the completion was discarded
    /// without touching the pipeline state.
    Superseded,
}

/// Per-asset orchestration: upload, profile selection, render observation.
///
/// All methods take `&mut self`; one logical thread of control drives each
/// asset, and overlapping derivation requests are serialized by the caller
/// issuing them one at a time. Ordering between a superseded request and its
/// replacement is still enforced here, through ticket generations.
pub struct MediaPipeline<B: MediaBackend> {
    backend: B,
    catalog: ProfileCatalog,
    lifecycle: AssetLifecycle,
}

impl<B: MediaBackend> MediaPipeline<B> {
    pub fn new(backend: B, catalog: ProfileCatalog) -> Self {
        MediaPipeline {
            backend,
            catalog,
            lifecycle: AssetLifecycle::new(),
        }
    }

    pub fn state(&self) -> TransformState {
        self.lifecycle.state()
    }

    pub fn asset(&self) -> Option<&Asset> {
        self.lifecycle.asset()
    }

    pub fn catalog(&self) -> &ProfileCatalog {
        &self.catalog
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Upload an image original. Any previous working asset is abandoned.
    #[instrument(level = "info", skip(self, file), fields(file_name = file.file_name()))]
    pub async fn submit_image(&mut self, file: &FilePayload) -> Result<AssetId, UploadError> {
        if file.is_empty() {
            return Err(UploadError::EmptyFile);
        }
        // Captured before the upload call; the backend does not echo it back.
        let original_size = file.size_bytes();

        self.lifecycle.begin_upload();
        match self.backend.upload_image(file).await {
            Ok(id) => {
                self.lifecycle.upload_succeeded(Asset {
                    id: id.clone(),
                    kind: MediaKind::Image,
                    original_size_bytes: original_size,
                    title: None,
                    description: None,
                });
                Ok(id)
            }
            Err(err) => {
                event!(Level::WARN, error = %err, "image upload failed");
                self.lifecycle.upload_failed();
                Err(err)
            }
        }
    }

    /// Upload a video original with its metadata. The size gate runs before
    /// any network call; an oversized file is rejected without touching the
    /// backend or the current state.
    #[instrument(level = "info", skip(self, file, meta), fields(file_name = file.file_name(), title = meta.title))]
    pub async fn submit_video(
        &mut self,
        file: &FilePayload,
        meta: VideoMetadata,
    ) -> Result<AssetId, UploadError> {
        if file.is_empty() {
            return Err(UploadError::EmptyFile);
        }
        let original_size = file.size_bytes();
        if original_size > MAX_VIDEO_BYTES {
            return Err(UploadError::FileTooLarge {
                size: original_size,
                limit: MAX_VIDEO_BYTES,
            });
        }

        self.lifecycle.begin_upload();
        match self.backend.upload_video(file, &meta).await {
            Ok(id) => {
                self.lifecycle.upload_succeeded(Asset {
                    id: id.clone(),
                    kind: MediaKind::Video,
                    original_size_bytes: original_size,
                    title: Some(meta.title),
                    description: Some(meta.description),
                });
                Ok(id)
            }
            Err(err) => {
                event!(Level::WARN, error = %err, "video upload failed");
                self.lifecycle.upload_failed();
                Err(err)
            }
        }
    }

    /// Select a profile for the current asset. Pure construction: the
    /// descriptor is the derivation request, and any in-flight resolution is
    /// superseded by the returned ticket.
    pub fn select_profile(&mut self, name: &str) -> Result<PendingDerivation, SelectError> {
        let profile = self.catalog.resolve(name)?.clone();
        let Some(asset) = self.lifecycle.asset() else {
            return Err(StateError::NoAsset {
                action: "select a profile",
            }
            .into());
        };

        let asset_id = asset.id.clone();
        let descriptor = ImageDescriptor::for_profile(&asset_id, &profile);
        let url = descriptor.url(self.backend.delivery());
        let ticket = self.lifecycle.select_profile(name)?;

        Ok(PendingDerivation {
            ticket,
            asset_id,
            descriptor,
            url,
        })
    }

    /// Observe the render outcome for a pending derivation by fetching its
    /// URL once. A completion whose ticket was superseded is discarded.
    #[instrument(level = "info", skip(self, pending), fields(profile = pending.profile()))]
    pub async fn resolve(&mut self, pending: &PendingDerivation) -> RenderOutcome {
        match self.backend.probe_render(&pending.url).await {
            Ok(()) => {
                if !self.lifecycle.render_succeeded(&pending.ticket) {
                    return RenderOutcome::Superseded;
                }
                RenderOutcome::Ready(DerivedAsset {
                    source_asset_id: pending.asset_id.clone(),
                    profile_name: pending.profile().to_string(),
                    url: pending.url.clone(),
                })
            }
            Err(err) => {
                if !self.lifecycle.render_failed(&pending.ticket) {
                    return RenderOutcome::Superseded;
                }
                event!(Level::WARN, error = %err, "derived asset render failed");
                RenderOutcome::Failed(err)
            }
        }
    }
}
