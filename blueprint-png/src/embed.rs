//! Recombination: write a payload into an image container

use crate::{Chunk, ChunkClass, ChunkType, Container, ContainerError, locate, scan};
use blueprint_shared::BlueprintFormat;

/// Split `payload` into payload chunks of at most `format.max_chunk_len` bytes.
///
/// An empty payload still yields one (zero-length) chunk so the result is
/// recognisable as a blueprint.
pub fn split_payload(payload: &[u8], format: &BlueprintFormat) -> Vec<Chunk> {
    let kind = ChunkType(format.payload_tag);
    if payload.is_empty() {
        return vec![Chunk::new(kind, Vec::new())];
    }
    payload
        .chunks(format.max_chunk_len.max(1))
        .map(|part| Chunk::new(kind, part.to_vec()))
        .collect()
}

/// Replace any payload in `image` with `payload`.
///
/// Payload chunks are placed directly after IHDR; all other chunks keep their order.
pub fn embed(image: &Container, payload: &[u8], format: &BlueprintFormat) -> Result<Container, ContainerError> {
    format.validate()?;

    let mut rest = image
        .chunks()
        .iter()
        .filter(|c| c.class(format) != ChunkClass::Payload)
        .cloned();

    let mut chunks = Vec::with_capacity(image.chunks().len() + 1);
    // from_chunks guarantees IHDR is first
    chunks.extend(rest.next());
    chunks.extend(split_payload(payload, format));
    chunks.extend(rest);

    tracing::debug!(payload_bytes = payload.len(), "Embedded blueprint payload");
    Container::from_chunks(chunks)
}

/// [`embed`] over raw bytes
pub fn embed_bytes(image: &[u8], payload: &[u8], format: &BlueprintFormat) -> Result<Vec<u8>, ContainerError> {
    Ok(embed(&scan(image)?, payload, format)?.to_bytes())
}

/// Rebuild a blueprint PNG from a data-only container and a preview image.
///
/// # Errors
/// [`ContainerError::NotABlueprintContainer`] if `data_only` carries no payload.
pub fn combine(data_only: &[u8], image_only: &[u8], format: &BlueprintFormat) -> Result<Vec<u8>, ContainerError> {
    let data = scan(data_only)?;
    let payload = locate(&data, format)?.payload_bytes();
    embed_bytes(image_only, &payload, format)
}
