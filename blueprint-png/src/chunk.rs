//! Chunk types, classification and checksums

use blueprint_shared::BlueprintFormat;
use std::fmt;

/// PNG file signature
pub const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Length + type + CRC around each chunk's data
pub(crate) const CHUNK_OVERHEAD: usize = 12;

/// Four-letter chunk tag
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkType(pub [u8; 4]);

impl ChunkType {
    pub const IHDR: Self = Self(*b"IHDR");
    pub const IEND: Self = Self(*b"IEND");
    pub const IDAT: Self = Self(*b"IDAT");
    pub const PLTE: Self = Self(*b"PLTE");
    pub const TRNS: Self = Self(*b"tRNS");

    /// Every byte must be an ASCII letter
    pub fn is_valid(&self) -> bool {
        self.0.iter().all(u8::is_ascii_alphabetic)
    }

    /// Critical chunks have an uppercase first letter
    pub fn is_critical(&self) -> bool {
        self.0[0].is_ascii_uppercase()
    }
}

impl fmt::Display for ChunkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.0))
    }
}

impl fmt::Debug for ChunkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChunkType({self})")
    }
}

/// Role of a chunk when splitting a blueprint file in two
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkClass {
    /// Carries the embedded blueprint
    Payload,
    /// Pixel, palette or transparency data
    Pixel,
    /// Header, end marker and all other metadata; kept in both outputs
    Structural,
}

impl ChunkClass {
    pub fn of(kind: ChunkType, format: &BlueprintFormat) -> Self {
        match &kind.0 {
            tag if *tag == format.payload_tag => ChunkClass::Payload,
            b"IDAT" | b"PLTE" | b"tRNS" => ChunkClass::Pixel,
            _ => ChunkClass::Structural,
        }
    }
}

/// CRC-32 over `kind ++ data`, as stored after every chunk
pub fn chunk_crc(kind: ChunkType, data: &[u8]) -> u32 {
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(&kind.0);
    hasher.update(data);
    hasher.finalize()
}

/// One chunk. The CRC always matches `kind ++ data`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    kind: ChunkType,
    data: Vec<u8>,
    crc: u32,
}

impl Chunk {
    /// Create a chunk, computing its checksum
    pub fn new(kind: ChunkType, data: Vec<u8>) -> Self {
        let crc = chunk_crc(kind, &data);
        Self { kind, data, crc }
    }

    /// Build from parts already verified by the scanner
    pub(crate) fn from_verified(kind: ChunkType, data: Vec<u8>, crc: u32) -> Self {
        debug_assert_eq!(crc, chunk_crc(kind, &data));
        Self { kind, data, crc }
    }

    pub fn kind(&self) -> ChunkType {
        self.kind
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn crc(&self) -> u32 {
        self.crc
    }

    pub fn class(&self, format: &BlueprintFormat) -> ChunkClass {
        ChunkClass::of(self.kind, format)
    }

    /// Size of the chunk on disk, including length, type and CRC
    pub fn encoded_len(&self) -> usize {
        CHUNK_OVERHEAD + self.data.len()
    }

    pub fn write_to(&self, out: &mut Vec<u8>) {
        // Chunk data never exceeds 2^31-1: scanned chunks are bounded by the
        // length field and payload splits by the format's validated limit.
        out.extend_from_slice(&(self.data.len() as u32).to_be_bytes());
        out.extend_from_slice(&self.kind.0);
        out.extend_from_slice(&self.data);
        out.extend_from_slice(&self.crc.to_be_bytes());
    }
}
