use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream;

use mediakit::backend::ByteStream;
use mediakit::download::{IMAGE_EXTENSION, download};
use mediakit::{
    Asset, AssetId, DeliveryBase, FilePayload, MAX_VIDEO_BYTES, MediaBackend, MediaPipeline,
    ProfileCatalog, RenderOutcome, TransformState, UploadError, VideoInfo, VideoMetadata,
};
use mediakit::error::RenderError;

/// In-memory backend: counts uploads, renders everything except URLs
/// containing `fail_renders_matching`.
struct MockBackend {
    uploads: AtomicUsize,
    fail_renders_matching: Option<&'static str>,
    delivery: DeliveryBase,
}

impl MockBackend {
    fn new() -> Self {
        MockBackend {
            uploads: AtomicUsize::new(0),
            fail_renders_matching: None,
            delivery: DeliveryBase::new("https://media.example.com/demo"),
        }
    }

    fn failing_renders_matching(pattern: &'static str) -> Self {
        MockBackend {
            fail_renders_matching: Some(pattern),
            ..Self::new()
        }
    }

    fn upload_count(&self) -> usize {
        self.uploads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MediaBackend for MockBackend {
    async fn upload_image(&self, _file: &FilePayload) -> Result<AssetId, UploadError> {
        self.uploads.fetch_add(1, Ordering::SeqCst);
        Ok(AssetId::new("abc123"))
    }

    async fn upload_video(
        &self,
        _file: &FilePayload,
        _meta: &VideoMetadata,
    ) -> Result<AssetId, UploadError> {
        self.uploads.fetch_add(1, Ordering::SeqCst);
        Ok(AssetId::new("vid456"))
    }

    async fn list_videos(&self) -> anyhow::Result<Vec<VideoInfo>> {
        Ok(Vec::new())
    }

    async fn probe_render(&self, url: &str) -> Result<(), RenderError> {
        match self.fail_renders_matching {
            Some(pattern) if url.contains(pattern) => {
                Err(RenderError::new("preview render unavailable"))
            }
            _ => Ok(()),
        }
    }

    async fn fetch(&self, _url: &str) -> Result<ByteStream, mediakit::DownloadError> {
        Ok(Box::pin(stream::iter(vec![Ok(Bytes::from_static(
            b"derived bytes",
        ))])))
    }

    fn delivery(&self) -> &DeliveryBase {
        &self.delivery
    }
}

fn image_payload() -> FilePayload {
    FilePayload::new("photo.jpg", vec![7u8; 10 * 1024 * 1024])
}

#[tokio::test]
async fn image_flow_reaches_ready_and_downloads() {
    let mut pipeline = MediaPipeline::new(MockBackend::new(), ProfileCatalog::social_formats());
    assert_eq!(pipeline.state(), TransformState::Idle);

    let asset_id = pipeline.submit_image(&image_payload()).await.unwrap();
    assert_eq!(asset_id, AssetId::new("abc123"));
    assert_eq!(pipeline.state(), TransformState::Submitted);
    assert_eq!(
        pipeline.asset().map(|a: &Asset| a.original_size_bytes),
        Some(10 * 1024 * 1024)
    );

    let pending = pipeline.select_profile("Twitter Header (3:1)").unwrap();
    assert_eq!(pipeline.state(), TransformState::Deriving);
    assert!(pending.url().contains("c_fill,w_1500,h_500,ar_3:1,g_auto"));

    let derived = match pipeline.resolve(&pending).await {
        RenderOutcome::Ready(derived) => derived,
        other => panic!("expected Ready, got {:?}", other),
    };
    assert_eq!(pipeline.state(), TransformState::Ready);
    assert_eq!(derived.profile_name, "Twitter Header (3:1)");

    let dir = tempfile::tempdir().unwrap();
    let path = download(
        pipeline.backend(),
        &derived.url,
        &derived.profile_name,
        IMAGE_EXTENSION,
        dir.path(),
    )
    .await
    .unwrap();

    assert_eq!(
        path.file_name().unwrap().to_str().unwrap(),
        "twitter_header_(3:1).png"
    );
    assert_eq!(std::fs::read(&path).unwrap(), b"derived bytes");
}

#[tokio::test]
async fn oversized_video_is_rejected_without_any_network_call() {
    let mut pipeline = MediaPipeline::new(MockBackend::new(), ProfileCatalog::social_formats());

    let payload = FilePayload::new("big.mp4", vec![0u8; (MAX_VIDEO_BYTES + 1) as usize]);
    let meta = VideoMetadata {
        title: "Big".to_string(),
        description: String::new(),
        original_size: payload.size_bytes(),
    };

    let err = pipeline.submit_video(&payload, meta).await.unwrap_err();
    assert!(matches!(err, UploadError::FileTooLarge { .. }));
    assert!(err.to_string().contains(&MAX_VIDEO_BYTES.to_string()));

    assert_eq!(pipeline.backend().upload_count(), 0);
    // The rejected submission never entered the lifecycle.
    assert_eq!(pipeline.state(), TransformState::Idle);
}

#[tokio::test]
async fn video_at_the_limit_uploads_exactly_once() {
    let mut pipeline = MediaPipeline::new(MockBackend::new(), ProfileCatalog::social_formats());

    let payload = FilePayload::new("fits.mp4", vec![0u8; MAX_VIDEO_BYTES as usize]);
    let meta = VideoMetadata {
        title: "Fits".to_string(),
        description: "Just under the wire".to_string(),
        original_size: payload.size_bytes(),
    };

    let asset_id = pipeline.submit_video(&payload, meta).await.unwrap();
    assert_eq!(asset_id, AssetId::new("vid456"));
    assert_eq!(pipeline.backend().upload_count(), 1);
    assert_eq!(pipeline.state(), TransformState::Submitted);
}

#[tokio::test]
async fn stale_completion_is_discarded_in_favor_of_latest_profile() {
    let mut pipeline = MediaPipeline::new(MockBackend::new(), ProfileCatalog::social_formats());
    pipeline.submit_image(&image_payload()).await.unwrap();

    let first = pipeline.select_profile("Instagram Square (1:1)").unwrap();
    let second = pipeline.select_profile("Twitter Post (16:9)").unwrap();
    assert_eq!(pipeline.state(), TransformState::Deriving);

    // The superseded derivation completes first; nothing may change.
    assert!(matches!(
        pipeline.resolve(&first).await,
        RenderOutcome::Superseded
    ));
    assert_eq!(pipeline.state(), TransformState::Deriving);

    match pipeline.resolve(&second).await {
        RenderOutcome::Ready(derived) => {
            assert_eq!(derived.profile_name, "Twitter Post (16:9)");
            assert!(derived.url.contains("w_1200,h_675"));
        }
        other => panic!("expected Ready, got {:?}", other),
    }
    assert_eq!(pipeline.state(), TransformState::Ready);
}

#[tokio::test]
async fn render_failure_is_scoped_to_one_derived_asset() {
    let backend = MockBackend::failing_renders_matching("ar_4:5");
    let mut pipeline = MediaPipeline::new(backend, ProfileCatalog::social_formats());
    pipeline.submit_image(&image_payload()).await.unwrap();

    let portrait = pipeline.select_profile("Instagram Portrait (4:5)").unwrap();
    assert!(matches!(
        pipeline.resolve(&portrait).await,
        RenderOutcome::Failed(_)
    ));
    assert_eq!(pipeline.state(), TransformState::Error);

    // The failure marked only that derivation; another profile still works.
    let header = pipeline.select_profile("Twitter Header (3:1)").unwrap();
    assert!(matches!(
        pipeline.resolve(&header).await,
        RenderOutcome::Ready(_)
    ));
    assert_eq!(pipeline.state(), TransformState::Ready);
}

#[tokio::test]
async fn new_upload_supersedes_in_flight_derivation() {
    let mut pipeline = MediaPipeline::new(MockBackend::new(), ProfileCatalog::social_formats());
    pipeline.submit_image(&image_payload()).await.unwrap();
    let pending = pipeline.select_profile("Instagram Square (1:1)").unwrap();

    // A brand-new upload abandons the current asset; the old derivation's
    // completion must not resurface.
    pipeline.submit_image(&image_payload()).await.unwrap();
    assert_eq!(pipeline.state(), TransformState::Submitted);
    assert!(matches!(
        pipeline.resolve(&pending).await,
        RenderOutcome::Superseded
    ));
    assert_eq!(pipeline.state(), TransformState::Submitted);
    assert_eq!(pipeline.backend().upload_count(), 2);
}

#[tokio::test]
async fn empty_file_is_rejected_locally() {
    let mut pipeline = MediaPipeline::new(MockBackend::new(), ProfileCatalog::social_formats());

    let err = pipeline
        .submit_image(&FilePayload::new("empty.png", Vec::new()))
        .await
        .unwrap_err();
    assert!(matches!(err, UploadError::EmptyFile));
    assert_eq!(pipeline.backend().upload_count(), 0);
}

#[tokio::test]
async fn selecting_unknown_profile_is_rejected() {
    let mut pipeline = MediaPipeline::new(MockBackend::new(), ProfileCatalog::social_formats());
    pipeline.submit_image(&image_payload()).await.unwrap();

    assert!(pipeline.select_profile("Pinterest Pin (2:3)").is_err());
    // A defensive check, not a state change.
    assert_eq!(pipeline.state(), TransformState::Submitted);
}
