//! Payload chunk locator

use crate::{Chunk, ChunkClass, ChunkType, Container, ContainerError};
use blueprint_compact::{CompactTable, parse_table};
use blueprint_shared::BlueprintFormat;

/// Chunks of a container grouped by [`ChunkClass`], each in file order.
#[derive(Debug, Clone)]
pub struct Located<'a> {
    pub payload: Vec<&'a Chunk>,
    pub pixels: Vec<&'a Chunk>,
    pub structural: Vec<&'a Chunk>,
}

impl Located<'_> {
    /// Payload chunks concatenated in file order
    pub fn payload_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.payload_len());
        for chunk in &self.payload {
            out.extend_from_slice(chunk.data());
        }
        out
    }

    pub fn payload_len(&self) -> usize {
        self.payload.iter().map(|c| c.len()).sum()
    }

    /// Decode the concatenated payload as a compact table
    pub fn table(&self) -> Result<CompactTable, ContainerError> {
        Ok(parse_table(&self.payload_bytes())?)
    }

    /// True if there is image data to build a preview from
    pub fn has_image_data(&self) -> bool {
        self.pixels.iter().any(|c| c.kind() == ChunkType::IDAT)
    }
}

/// Classify every chunk of `container`.
///
/// # Errors
/// [`ContainerError::NotABlueprintContainer`] when there is no payload chunk.
/// That is the normal outcome for an ordinary image.
/// [`ContainerError::InvalidFormat`] when `format` claims an image chunk tag.
pub fn locate<'a>(container: &'a Container, format: &BlueprintFormat) -> Result<Located<'a>, ContainerError> {
    format.validate()?;

    let mut located = Located {
        payload: Vec::new(),
        pixels: Vec::new(),
        structural: Vec::new(),
    };

    for chunk in container.chunks() {
        match chunk.class(format) {
            ChunkClass::Payload => located.payload.push(chunk),
            ChunkClass::Pixel => located.pixels.push(chunk),
            ChunkClass::Structural => located.structural.push(chunk),
        }
    }

    if located.payload.is_empty() {
        return Err(ContainerError::NotABlueprintContainer);
    }

    tracing::debug!(
        payload_chunks = located.payload.len(),
        payload_bytes = located.payload_len(),
        pixel_chunks = located.pixels.len(),
        "Located blueprint payload"
    );
    Ok(located)
}

#[cfg(test)]
mod tests {
    use super::*;
    use blueprint_shared::BLUEPRINT_FORMAT;

    fn container(middle: Vec<Chunk>) -> Container {
        let mut ihdr = vec![0, 0, 0, 1, 0, 0, 0, 1];
        ihdr.extend_from_slice(&[8, 0, 0, 0, 0]);
        let mut chunks = vec![Chunk::new(ChunkType::IHDR, ihdr)];
        chunks.extend(middle);
        chunks.push(Chunk::new(ChunkType::IEND, Vec::new()));
        Container::from_chunks(chunks).unwrap()
    }

    fn payload(data: &[u8]) -> Chunk {
        Chunk::new(ChunkType(*b"blPt"), data.to_vec())
    }

    #[test]
    fn test_plain_image_is_not_a_blueprint() {
        let image = container(vec![Chunk::new(ChunkType::IDAT, vec![0; 8])]);
        let err = locate(&image, &BLUEPRINT_FORMAT).unwrap_err();
        assert!(err.is_not_blueprint());
    }

    #[test]
    fn test_groups_by_class() {
        let c = container(vec![
            Chunk::new(ChunkType::PLTE, vec![0; 3]),
            payload(b"{}"),
            Chunk::new(ChunkType::TRNS, vec![0]),
            Chunk::new(ChunkType::IDAT, vec![0; 8]),
            Chunk::new(ChunkType(*b"tEXt"), b"a\0b".to_vec()),
        ]);
        let located = locate(&c, &BLUEPRINT_FORMAT).unwrap();

        assert_eq!(located.payload.len(), 1);
        assert_eq!(located.pixels.len(), 3);
        assert_eq!(located.structural.len(), 3); // IHDR, tEXt, IEND
        assert!(located.has_image_data());
    }

    #[test]
    fn test_split_payload_concatenates_in_order() {
        let c = container(vec![
            payload(br#"{"dictionary":["name","#),
            Chunk::new(ChunkType::IDAT, vec![0; 8]),
            payload(br#""qty"],"rows":[["Iron",10]]}"#),
        ]);
        let located = locate(&c, &BLUEPRINT_FORMAT).unwrap();

        let table = located.table().unwrap();
        assert_eq!(table.dictionary(), ["name".to_string(), "qty".to_string()]);
        assert_eq!(table.rows().len(), 1);
    }

    #[test]
    fn test_image_chunk_tag_cannot_be_the_payload_tag() {
        let image = container(vec![Chunk::new(ChunkType::IDAT, vec![0; 8])]);
        let format = BlueprintFormat::new(*b"IDAT", 64);
        assert!(matches!(
            locate(&image, &format),
            Err(ContainerError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_zero_length_payload_is_empty_table() {
        let c = container(vec![payload(b"")]);
        let located = locate(&c, &BLUEPRINT_FORMAT).unwrap();
        assert_eq!(located.payload_len(), 0);
        assert!(located.table().unwrap().is_empty());
        assert!(!located.has_image_data());
    }

    #[test]
    fn test_garbage_payload_is_reported() {
        let c = container(vec![payload(b"\x00\x01not json")]);
        let located = locate(&c, &BLUEPRINT_FORMAT).unwrap();
        assert!(matches!(located.table(), Err(ContainerError::Payload(_))));
    }
}
