use crate::ChunkType;
use blueprint_compact::CompactError;
use blueprint_shared::FormatError;
use thiserror::Error;

/// Errors produced while scanning, locating or extracting.
///
/// [`ContainerError::NotABlueprintContainer`] is the expected result for an
/// ordinary image and should be treated as "not applicable", not as corruption.
#[derive(Error, Debug)]
pub enum ContainerError {
    /// Bad signature or a structural rule of the container is broken
    #[error("malformed container: {0}")]
    MalformedContainer(String),

    #[error("corrupt {kind} chunk at byte {offset}: checksum mismatch")]
    CorruptChunk { offset: usize, kind: ChunkType },

    /// A length field runs past the end of the buffer, or IEND is missing
    #[error("truncated container at byte {offset}")]
    TruncatedContainer { offset: usize },

    #[error("not a blueprint container: no payload chunk found")]
    NotABlueprintContainer,

    #[error("invalid blueprint format: {0}")]
    InvalidFormat(#[from] FormatError),

    /// The payload was located but does not decode as a compact table
    #[error("invalid blueprint payload: {0}")]
    Payload(#[from] CompactError),
}

impl ContainerError {
    /// True when the input is a valid image that simply carries no blueprint.
    pub fn is_not_blueprint(&self) -> bool {
        matches!(self, Self::NotABlueprintContainer)
    }

    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedContainer(reason.into())
    }
}
