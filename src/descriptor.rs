use serde::{Deserialize, Serialize};
use std::fmt;

use crate::api::AssetId;
use crate::catalog::ImageProfile;

/// Segment-sampled short preview, capped at 15 seconds.
pub const PREVIEW_TRANSFORMATION: &str = "e_preview:duration_15:max_seg_9:min_seg_dur_1";

/// Crop modes understood by the transformation backend.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Crop {
    Fill,
}

impl fmt::Display for Crop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Crop::Fill => "fill",
            }
        )
    }
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Gravity {
    /// Content-aware framing chosen by the backend.
    Auto,
}

impl fmt::Display for Gravity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Gravity::Auto => "auto",
            }
        )
    }
}

/// Declarative request for a derived image. Constructing one performs no
/// network call; the backend renders when the URL is first fetched. Equal
/// inputs always produce equal descriptors.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
pub struct ImageDescriptor {
    pub public_id: String,
    pub width: u32,
    pub height: u32,
    pub crop: Crop,
    pub gravity: Gravity,
    pub aspect_ratio: String,
}

impl ImageDescriptor {
    pub fn for_profile(asset: &AssetId, profile: &ImageProfile) -> Self {
        ImageDescriptor {
            public_id: asset.as_str().to_string(),
            width: profile.width,
            height: profile.height,
            crop: Crop::Fill,
            gravity: Gravity::Auto,
            aspect_ratio: profile.aspect_ratio.clone(),
        }
    }

    /// The ordered parameter segment of the delivery URL.
    pub fn transformation(&self) -> String {
        format!(
            "c_{},w_{},h_{},ar_{},g_{}",
            self.crop, self.width, self.height, self.aspect_ratio, self.gravity
        )
    }

    pub fn url(&self, base: &DeliveryBase) -> String {
        base.image_url(&self.transformation(), &self.public_id, "png")
    }
}

/// Declarative request for a derived video rendition. The encoding profiles
/// are fixed per use case rather than user-selectable.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
pub struct VideoDescriptor {
    pub public_id: String,
    pub width: u32,
    pub height: u32,
    pub crop: Option<Crop>,
    pub gravity: Option<Gravity>,
    pub quality_auto: bool,
    /// Encoding directives passed through verbatim as their own segments.
    pub raw_transformations: Vec<String>,
    /// Output format; `None` keeps the backend default container.
    pub format: Option<String>,
}

impl VideoDescriptor {
    /// Still frame for cards and grids.
    pub fn thumbnail(asset: &AssetId) -> Self {
        VideoDescriptor {
            public_id: asset.as_str().to_string(),
            width: 400,
            height: 225,
            crop: Some(Crop::Fill),
            gravity: Some(Gravity::Auto),
            quality_auto: true,
            raw_transformations: Vec::new(),
            format: Some("jpg".to_string()),
        }
    }

    /// Short, segment-sampled preview clip.
    pub fn preview(asset: &AssetId) -> Self {
        VideoDescriptor {
            public_id: asset.as_str().to_string(),
            width: 400,
            height: 225,
            crop: None,
            gravity: None,
            quality_auto: false,
            raw_transformations: vec![PREVIEW_TRANSFORMATION.to_string()],
            format: None,
        }
    }

    /// Full-resolution compressed rendition.
    pub fn full(asset: &AssetId) -> Self {
        VideoDescriptor {
            public_id: asset.as_str().to_string(),
            width: 1920,
            height: 1080,
            crop: None,
            gravity: None,
            quality_auto: false,
            raw_transformations: Vec::new(),
            format: None,
        }
    }

    /// The transformation path: one comma-joined parameter segment, then any
    /// raw segments in order.
    pub fn transformation(&self) -> String {
        let mut params = Vec::new();
        if let Some(crop) = self.crop {
            params.push(format!("c_{}", crop));
        }
        params.push(format!("w_{}", self.width));
        params.push(format!("h_{}", self.height));
        if let Some(gravity) = self.gravity {
            params.push(format!("g_{}", gravity));
        }
        if self.quality_auto {
            params.push("q_auto".to_string());
        }

        let mut segments = vec![params.join(",")];
        segments.extend(self.raw_transformations.iter().cloned());
        segments.join("/")
    }

    pub fn url(&self, base: &DeliveryBase) -> String {
        base.video_url(&self.transformation(), &self.public_id, self.format.as_deref())
    }
}

/// Root against which derived-asset URLs are constructed. Pure string
/// assembly; bytes may not exist until the URL is first fetched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeliveryBase {
    base: String,
}

impl DeliveryBase {
    pub fn new(base: impl Into<String>) -> Self {
        let base = base.into();
        DeliveryBase {
            base: base.trim_end_matches('/').to_string(),
        }
    }

    pub fn image_url(&self, transformation: &str, public_id: &str, format: &str) -> String {
        format!(
            "{}/image/upload/{}/{}.{}",
            self.base, transformation, public_id, format
        )
    }

    pub fn video_url(&self, transformation: &str, public_id: &str, format: Option<&str>) -> String {
        match format {
            Some(ext) => format!(
                "{}/video/upload/{}/{}.{}",
                self.base, transformation, public_id, ext
            ),
            None => format!("{}/video/upload/{}/{}", self.base, transformation, public_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ProfileCatalog;

    fn base() -> DeliveryBase {
        DeliveryBase::new("https://media.example.com/demo/")
    }

    #[test]
    fn test_image_descriptor_is_deterministic() {
        let catalog = ProfileCatalog::social_formats();
        let profile = catalog.resolve("Twitter Header (3:1)").unwrap();
        let asset = AssetId::new("abc123");

        let first = ImageDescriptor::for_profile(&asset, profile);
        let second = ImageDescriptor::for_profile(&asset, profile);
        assert_eq!(first, second);
        assert_eq!(first.url(&base()), second.url(&base()));
    }

    #[test]
    fn test_image_transformation_segment() {
        let catalog = ProfileCatalog::social_formats();
        let profile = catalog.resolve("Instagram Square (1:1)").unwrap();
        let descriptor = ImageDescriptor::for_profile(&AssetId::new("abc123"), profile);

        assert_eq!(descriptor.transformation(), "c_fill,w_1080,h_1080,ar_1:1,g_auto");
        assert_eq!(
            descriptor.url(&base()),
            "https://media.example.com/demo/image/upload/c_fill,w_1080,h_1080,ar_1:1,g_auto/abc123.png"
        );
    }

    #[test]
    fn test_video_thumbnail_url() {
        let descriptor = VideoDescriptor::thumbnail(&AssetId::new("vid9"));
        assert_eq!(
            descriptor.url(&base()),
            "https://media.example.com/demo/video/upload/c_fill,w_400,h_225,g_auto,q_auto/vid9.jpg"
        );
    }

    #[test]
    fn test_video_preview_chains_encoding_segment() {
        let descriptor = VideoDescriptor::preview(&AssetId::new("vid9"));
        assert_eq!(
            descriptor.transformation(),
            "w_400,h_225/e_preview:duration_15:max_seg_9:min_seg_dur_1"
        );
    }

    #[test]
    fn test_video_full_has_no_extension() {
        let descriptor = VideoDescriptor::full(&AssetId::new("vid9"));
        assert_eq!(
            descriptor.url(&base()),
            "https://media.example.com/demo/video/upload/w_1920,h_1080/vid9"
        );
    }
}
