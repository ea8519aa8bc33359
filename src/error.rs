use std::fmt;
use std::io;

/// Errors from submitting an original to the ingestion endpoint
#[derive(Debug)]
pub enum UploadError {
    /// The file has no content
    EmptyFile,

    /// Local size-policy violation, detected before any network call
    FileTooLarge { size: u64, limit: u64 },

    /// Transport failure or non-success response from the backend
    NetworkOrServer(String),
}

impl fmt::Display for UploadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadError::EmptyFile => write!(f, "file is empty"),
            UploadError::FileTooLarge { size, limit } => write!(
                f,
                "file is {} bytes, over the {} byte upload limit",
                size, limit
            ),
            UploadError::NetworkOrServer(msg) => write!(f, "upload failed: {}", msg),
        }
    }
}

impl std::error::Error for UploadError {}

/// Errors from looking up or loading the profile catalog
#[derive(Debug)]
pub enum CatalogError {
    /// Profile name not present in the catalog
    UnknownProfile(String),

    /// A profile's aspect-ratio string disagrees with its dimensions
    InconsistentRatio {
        name: String,
        width: u32,
        height: u32,
        aspect_ratio: String,
    },
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::UnknownProfile(name) => write!(f, "unknown profile: {}", name),
            CatalogError::InconsistentRatio {
                name,
                width,
                height,
                aspect_ratio,
            } => write!(
                f,
                "profile {} declares ratio {} but measures {}x{}",
                name, aspect_ratio, width, height
            ),
        }
    }
}

impl std::error::Error for CatalogError {}

/// A requested derived asset could not be produced or fetched. Scoped to
/// that one derived asset; the base asset and other profiles are unaffected.
#[derive(Debug)]
pub struct RenderError {
    reason: String,
}

impl RenderError {
    pub fn new(reason: impl Into<String>) -> Self {
        RenderError {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "render failed: {}", self.reason)
    }
}

impl std::error::Error for RenderError {}

/// Errors from fetching and saving a derived asset
#[derive(Debug)]
pub enum DownloadError {
    /// The delivery fetch did not succeed
    FetchFailed(String),

    /// The bytes could not be written locally
    WriteFailed(io::Error),
}

impl fmt::Display for DownloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DownloadError::FetchFailed(msg) => write!(f, "fetch failed: {}", msg),
            DownloadError::WriteFailed(err) => write!(f, "write failed: {}", err),
        }
    }
}

impl std::error::Error for DownloadError {}

impl From<io::Error> for DownloadError {
    fn from(err: io::Error) -> Self {
        DownloadError::WriteFailed(err)
    }
}

/// Lifecycle misuse
#[derive(Debug)]
pub enum StateError {
    /// The action needs an uploaded asset and there is none
    NoAsset { action: &'static str },
}

impl fmt::Display for StateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateError::NoAsset { action } => {
                write!(f, "cannot {}: no uploaded asset", action)
            }
        }
    }
}

impl std::error::Error for StateError {}

/// Errors from requesting a derivation for the current asset
#[derive(Debug)]
pub enum SelectError {
    Catalog(CatalogError),
    State(StateError),
}

impl fmt::Display for SelectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectError::Catalog(err) => write!(f, "{}", err),
            SelectError::State(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for SelectError {}

impl From<CatalogError> for SelectError {
    fn from(err: CatalogError) -> Self {
        SelectError::Catalog(err)
    }
}

impl From<StateError> for SelectError {
    fn from(err: StateError) -> Self {
        SelectError::State(err)
    }
}
