//! Errors surfaced by the story viewer.

use crate::provider::FetchError;
use crate::story::SubjectId;

/// Why `open` did not create a session.
///
/// Either way no session exists afterwards and no timer is armed.
#[derive(Debug, thiserror::Error)]
pub enum OpenError {
    #[error("'{subject}' has no stories")]
    EmptySet { subject: SubjectId },

    #[error("Failed to fetch stories for '{subject}': {source}")]
    FetchFailed {
        subject: SubjectId,
        #[source]
        source: FetchError,
    },
}

impl OpenError {
    pub fn subject(&self) -> &SubjectId {
        match self {
            Self::EmptySet { subject } | Self::FetchFailed { subject, .. } => subject,
        }
    }
}
