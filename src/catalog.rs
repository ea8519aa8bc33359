use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// A named target shape for image derivation.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
pub struct ImageProfile {
    pub name: String,
    pub width: u32,
    pub height: u32,
    /// `W:H` as displayed; cross-checked against the dimensions at load time.
    pub aspect_ratio: String,
}

impl ImageProfile {
    pub fn new(name: impl Into<String>, width: u32, height: u32, aspect_ratio: impl Into<String>) -> Self {
        ImageProfile {
            name: name.into(),
            width,
            height,
            aspect_ratio: aspect_ratio.into(),
        }
    }

    fn ratio_consistent(&self) -> bool {
        let Some((rw, rh)) = self.aspect_ratio.split_once(':') else {
            return false;
        };
        let (Ok(rw), Ok(rh)) = (rw.parse::<u64>(), rh.parse::<u64>()) else {
            return false;
        };
        rw > 0 && rh > 0 && self.width as u64 * rh == self.height as u64 * rw
    }
}

/// Read-only registry of output profiles. Insertion order is display order;
/// the first entry is the default selection.
#[derive(Clone, Debug)]
pub struct ProfileCatalog {
    profiles: Vec<ImageProfile>,
}

impl ProfileCatalog {
    /// Build a catalog, rejecting any profile whose declared aspect ratio
    /// disagrees with its width and height.
    pub fn new(profiles: Vec<ImageProfile>) -> Result<Self, CatalogError> {
        for profile in &profiles {
            if !profile.ratio_consistent() {
                return Err(CatalogError::InconsistentRatio {
                    name: profile.name.clone(),
                    width: profile.width,
                    height: profile.height,
                    aspect_ratio: profile.aspect_ratio.clone(),
                });
            }
        }
        Ok(ProfileCatalog { profiles })
    }

    /// The built-in social-media formats.
    pub fn social_formats() -> Self {
        ProfileCatalog::new(vec![
            ImageProfile::new("Instagram Square (1:1)", 1080, 1080, "1:1"),
            ImageProfile::new("Instagram Portrait (4:5)", 1080, 1350, "4:5"),
            ImageProfile::new("Twitter Post (16:9)", 1200, 675, "16:9"),
            ImageProfile::new("Twitter Header (3:1)", 1500, 500, "3:1"),
            ImageProfile::new("Facebook Cover (205:78)", 820, 312, "205:78"),
        ])
        .expect("built-in profiles are consistent")
    }

    /// Profile names in display order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.profiles.iter().map(|p| p.name.as_str())
    }

    pub fn resolve(&self, name: &str) -> Result<&ImageProfile, CatalogError> {
        self.profiles
            .iter()
            .find(|p| p.name == name)
            .ok_or_else(|| CatalogError::UnknownProfile(name.to_string()))
    }

    pub fn default_profile(&self) -> Option<&ImageProfile> {
        self.profiles.first()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}
