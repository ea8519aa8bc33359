pub mod api;
pub mod backend;
pub mod catalog;
mod client;
pub mod descriptor;
pub mod download;
pub mod error;
pub mod pipeline;
pub mod state;

pub use api::{
    Asset, AssetId, FilePayload, MAX_VIDEO_BYTES, MediaKind, VideoInfo, VideoMetadata,
};
pub use backend::{ByteStream, HostedBackend, MediaBackend};
pub use catalog::{ImageProfile, ProfileCatalog};
pub use descriptor::{DeliveryBase, ImageDescriptor, VideoDescriptor};
pub use error::{CatalogError, DownloadError, RenderError, SelectError, StateError, UploadError};
pub use pipeline::{DerivedAsset, MediaPipeline, PendingDerivation, RenderOutcome};
pub use state::{AssetLifecycle, DerivationTicket, TransformState};
