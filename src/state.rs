use crate::api::Asset;
use crate::error::StateError;

/// Client-visible lifecycle of the asset currently being worked on.
///
/// Neither `Ready` nor `Error` is terminal: both accept a new profile
/// selection or a superseding upload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransformState {
    Idle,
    Uploading,
    Submitted,
    Deriving,
    Ready,
    Error,
}

/// Issued when a derivation is requested, stamped with the generation that
/// was current at that moment. Completions carrying a superseded ticket are
/// discarded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DerivationTicket {
    generation: u64,
    profile: String,
}

impl DerivationTicket {
    pub fn profile(&self) -> &str {
        &self.profile
    }
}

/// Per-asset state tracker. One derivation is current at a time; the
/// generation counter makes "last request wins" explicit instead of an
/// accident of completion ordering.
#[derive(Debug)]
pub struct AssetLifecycle {
    state: TransformState,
    generation: u64,
    asset: Option<Asset>,
    selected_profile: Option<String>,
}

impl AssetLifecycle {
    pub fn new() -> Self {
        AssetLifecycle {
            state: TransformState::Idle,
            generation: 0,
            asset: None,
            selected_profile: None,
        }
    }

    pub fn state(&self) -> TransformState {
        self.state
    }

    pub fn asset(&self) -> Option<&Asset> {
        self.asset.as_ref()
    }

    pub fn selected_profile(&self) -> Option<&str> {
        self.selected_profile.as_deref()
    }

    /// Enter `Uploading`, abandoning whatever came before. Legal from every
    /// state; no cleanup request is sent for the abandoned asset, and any
    /// in-flight derivation for it is invalidated.
    pub fn begin_upload(&mut self) {
        self.generation += 1;
        self.asset = None;
        self.selected_profile = None;
        self.state = TransformState::Uploading;
    }

    /// The ingestion endpoint assigned an identifier.
    pub fn upload_succeeded(&mut self, asset: Asset) {
        self.asset = Some(asset);
        self.state = TransformState::Submitted;
    }

    pub fn upload_failed(&mut self) {
        self.state = TransformState::Error;
    }

    /// Restart the deriving edge for `profile`. Legal from `Submitted`,
    /// `Deriving`, `Ready` and `Error` alike; the previous derivation, done
    /// or not, is superseded.
    pub fn select_profile(&mut self, profile: &str) -> Result<DerivationTicket, StateError> {
        if self.asset.is_none() {
            return Err(StateError::NoAsset {
                action: "select a profile",
            });
        }
        self.generation += 1;
        self.selected_profile = Some(profile.to_string());
        self.state = TransformState::Deriving;
        Ok(DerivationTicket {
            generation: self.generation,
            profile: profile.to_string(),
        })
    }

    fn accepts(&self, ticket: &DerivationTicket) -> bool {
        ticket.generation == self.generation && self.state == TransformState::Deriving
    }

    /// Returns false when the ticket was superseded; the completion is then
    /// discarded and the state left untouched.
    pub fn render_succeeded(&mut self, ticket: &DerivationTicket) -> bool {
        if !self.accepts(ticket) {
            return false;
        }
        self.state = TransformState::Ready;
        true
    }

    /// Returns false when the ticket was superseded. An accepted failure is
    /// scoped to this one derivation; selecting another profile proceeds
    /// normally afterwards.
    pub fn render_failed(&mut self, ticket: &DerivationTicket) -> bool {
        if !self.accepts(ticket) {
            return false;
        }
        self.state = TransformState::Error;
        true
    }
}

impl Default for AssetLifecycle {
    fn default() -> Self {
        Self::new()
    }
}
