//! Container scanner
//!
//! Walks the chunk list of a PNG buffer, verifying every checksum. The scanner
//! only trusts a length field after checking it against the bytes that remain,
//! so a hostile length can never cause a large allocation.

use crate::chunk::CHUNK_OVERHEAD;
use crate::{Chunk, ChunkType, Container, ContainerError, PNG_SIGNATURE, chunk_crc};

/// Parse `bytes` into a [`Container`].
///
/// # Errors
/// - [`ContainerError::MalformedContainer`] - wrong signature, invalid tag, or
///   IHDR missing/misplaced
/// - [`ContainerError::CorruptChunk`] - checksum mismatch (offset of the chunk)
/// - [`ContainerError::TruncatedContainer`] - a chunk runs past the buffer, or
///   the buffer ends before IEND
pub fn scan(bytes: &[u8]) -> Result<Container, ContainerError> {
    if bytes.len() < PNG_SIGNATURE.len() || bytes[..PNG_SIGNATURE.len()] != PNG_SIGNATURE {
        return Err(ContainerError::malformed("missing PNG signature"));
    }

    let mut offset = PNG_SIGNATURE.len();
    let mut chunks = Vec::new();

    loop {
        let remaining = &bytes[offset..];
        if remaining.len() < CHUNK_OVERHEAD {
            return Err(ContainerError::TruncatedContainer { offset });
        }

        let length = u32::from_be_bytes([remaining[0], remaining[1], remaining[2], remaining[3]]) as usize;
        if length > remaining.len() - CHUNK_OVERHEAD {
            return Err(ContainerError::TruncatedContainer { offset });
        }

        let kind = ChunkType([remaining[4], remaining[5], remaining[6], remaining[7]]);
        if !kind.is_valid() {
            return Err(ContainerError::malformed(format!(
                "invalid chunk type {:?} at byte {offset}",
                kind.0
            )));
        }

        let data = &remaining[8..8 + length];
        let crc_bytes = &remaining[8 + length..CHUNK_OVERHEAD + length];
        let crc = u32::from_be_bytes([crc_bytes[0], crc_bytes[1], crc_bytes[2], crc_bytes[3]]);
        if chunk_crc(kind, data) != crc {
            return Err(ContainerError::CorruptChunk { offset, kind });
        }

        chunks.push(Chunk::from_verified(kind, data.to_vec(), crc));
        offset += CHUNK_OVERHEAD + length;

        if kind == ChunkType::IEND {
            break;
        }
    }

    if offset < bytes.len() {
        tracing::debug!(trailing = bytes.len() - offset, "Ignoring bytes after IEND");
    }

    let container = Container::from_chunks(chunks)?;
    tracing::debug!(
        chunks = container.chunks().len(),
        size = offset,
        "Scanned container"
    );
    Ok(container)
}
