//! Container: signature plus an ordered, validated chunk list

use crate::chunk::CHUNK_OVERHEAD;
use crate::{Chunk, ChunkType, ContainerError, PNG_SIGNATURE};

/// Fields of the IHDR chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageHeader {
    pub width: u32,
    pub height: u32,
    pub bit_depth: u8,
    pub color_type: u8,
    pub interlaced: bool,
}

impl ImageHeader {
    /// IHDR data size
    pub const SIZE: usize = 13;

    /// Read header from IHDR data
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != Self::SIZE {
            return None;
        }
        Some(Self {
            width: u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
            height: u32::from_be_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
            bit_depth: bytes[8],
            color_type: bytes[9],
            interlaced: bytes[12] == 1,
        })
    }
}

/// Ordered chunks bracketed by IHDR and IEND.
///
/// Construction checks the ordering rules, so every `Container` serializes to a
/// structurally valid file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    chunks: Vec<Chunk>,
    header: ImageHeader,
}

impl Container {
    /// Validate and wrap a chunk list.
    ///
    /// The first chunk must be a 13-byte IHDR and the last must be IEND, with no
    /// other IEND before it.
    pub fn from_chunks(chunks: Vec<Chunk>) -> Result<Self, ContainerError> {
        let first = chunks
            .first()
            .ok_or_else(|| ContainerError::malformed("container has no chunks"))?;
        if first.kind() != ChunkType::IHDR {
            return Err(ContainerError::malformed(format!(
                "first chunk is {}, expected IHDR",
                first.kind()
            )));
        }
        let header = ImageHeader::from_bytes(first.data()).ok_or_else(|| {
            ContainerError::malformed(format!(
                "IHDR has {} bytes, expected {}",
                first.len(),
                ImageHeader::SIZE
            ))
        })?;

        match chunks.iter().position(|c| c.kind() == ChunkType::IEND) {
            Some(end) if end == chunks.len() - 1 => {}
            Some(_) => return Err(ContainerError::malformed("chunks found after IEND")),
            None => return Err(ContainerError::malformed("container has no IEND chunk")),
        }

        Ok(Self { chunks, header })
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    pub fn header(&self) -> &ImageHeader {
        &self.header
    }

    /// Serialized size in bytes
    pub fn encoded_len(&self) -> usize {
        PNG_SIGNATURE.len() + self.chunks.iter().map(Chunk::encoded_len).sum::<usize>()
    }

    /// Serialize with the signature, lengths and checksums
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_len());
        out.extend_from_slice(&PNG_SIGNATURE);
        for chunk in &self.chunks {
            chunk.write_to(&mut out);
        }
        out
    }

    /// Smallest possible container size (signature + IHDR + IEND)
    pub const MIN_SIZE: usize = 8 + (CHUNK_OVERHEAD + ImageHeader::SIZE) + CHUNK_OVERHEAD;
}
