//! End-to-end tests over real PNG files produced by the `png` encoder.

use blueprint_compact::decode;
use blueprint_png::{
    Chunk, ChunkType, ContainerError, PNG_SIGNATURE, combine, extract, locate, scan, verify_preview,
};
use blueprint_shared::{BLUEPRINT_FORMAT, BlueprintFormat};

const WIDTH: u32 = 16;
const HEIGHT: u32 = 12;

const PAYLOAD: &str = r#"{"dictionary":["name","qty"],"rows":[["Iron",10],["Clay",4],[["A",1],["B",2]]]}"#;

fn rgba_pixels() -> Vec<u8> {
    (0..WIDTH * HEIGHT)
        .flat_map(|i| [(i * 7) as u8, (i * 13) as u8, (i * 29) as u8, 255])
        .collect()
}

/// Encode an RGBA image, optionally with a payload chunk written before the pixels.
fn encode_rgba(payload: Option<&[u8]>) -> Vec<u8> {
    let mut out = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut out, WIDTH, HEIGHT);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        encoder
            .add_text_chunk("Title".to_string(), "Test Factory".to_string())
            .unwrap();

        let mut writer = encoder.write_header().unwrap();
        if let Some(payload) = payload {
            writer
                .write_chunk(png::chunk::ChunkType(BLUEPRINT_FORMAT.payload_tag), payload)
                .unwrap();
        }
        writer.write_image_data(&rgba_pixels()).unwrap();
        writer.finish().unwrap();
    }
    out
}

fn decode_pixels(bytes: &[u8]) -> (u32, u32, Vec<u8>) {
    let decoder = png::Decoder::new(std::io::Cursor::new(bytes));
    let mut reader = decoder.read_info().unwrap();
    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf).unwrap();
    buf.truncate(info.buffer_size());
    (info.width, info.height, buf)
}

/// Hand-assembled container for sizes the encoder would take too long to produce
fn assemble(middle: &[Chunk]) -> Vec<u8> {
    let mut ihdr = Vec::new();
    ihdr.extend_from_slice(&1024u32.to_be_bytes());
    ihdr.extend_from_slice(&1024u32.to_be_bytes());
    ihdr.extend_from_slice(&[8, 6, 0, 0, 0]);

    let mut out = PNG_SIGNATURE.to_vec();
    Chunk::new(ChunkType::IHDR, ihdr).write_to(&mut out);
    for chunk in middle {
        chunk.write_to(&mut out);
    }
    Chunk::new(ChunkType::IEND, Vec::new()).write_to(&mut out);
    out
}

#[test]
fn blueprint_png_is_still_a_viewable_image() {
    let file = encode_rgba(Some(PAYLOAD.as_bytes()));
    let (width, height, pixels) = decode_pixels(&file);
    assert_eq!((width, height), (WIDTH, HEIGHT));
    assert_eq!(pixels, rgba_pixels());
}

#[test]
fn image_only_artifact_renders_the_same_pixels() {
    let file = encode_rgba(Some(PAYLOAD.as_bytes()));
    let result = extract(&file, &BLUEPRINT_FORMAT).unwrap();

    let preview = result.image_blob.expect("source has pixel data");
    let info = verify_preview(&preview).unwrap();
    assert_eq!((info.width, info.height), (WIDTH, HEIGHT));
    assert_eq!(decode_pixels(&preview).2, rgba_pixels());

    let container = scan(&preview).unwrap();
    assert!(locate(&container, &BLUEPRINT_FORMAT).unwrap_err().is_not_blueprint());
}

#[test]
fn data_only_artifact_round_trips_the_payload() {
    let file = encode_rgba(Some(PAYLOAD.as_bytes()));
    let result = extract(&file, &BLUEPRINT_FORMAT).unwrap();

    let rescanned = scan(&result.stripped_file).unwrap();
    let located = locate(&rescanned, &BLUEPRINT_FORMAT).unwrap();
    assert!(located.pixels.is_empty());

    let original = decode(&result.table().unwrap()).unwrap();
    let round_tripped = decode(&located.table().unwrap()).unwrap();
    assert_eq!(original, round_tripped);
    assert_eq!(original.len(), 3);
}

#[test]
fn extraction_is_deterministic() {
    let file = encode_rgba(Some(PAYLOAD.as_bytes()));
    let first = extract(&file, &BLUEPRINT_FORMAT).unwrap();
    let second = extract(&file, &BLUEPRINT_FORMAT).unwrap();
    assert_eq!(first, second);
}

#[test]
fn size_invariants_hold() {
    for payload in [&b""[..], PAYLOAD.as_bytes(), &[b' '; 50_000][..]] {
        let file = encode_rgba(Some(payload));
        let result = extract(&file, &BLUEPRINT_FORMAT).unwrap();
        assert!(result.stripped_size <= result.original_size);
        assert_eq!(result.stripped_size, result.stripped_file.len());
        assert_eq!(result.original_size, file.len());
        assert!((0.0..=100.0).contains(&result.compression_ratio));
    }
}

#[test]
fn plain_png_scans_but_is_not_a_blueprint() {
    let file = encode_rgba(None);
    let container = scan(&file).expect("plain images scan fine");
    assert!(container.chunks().len() >= 3);

    match extract(&file, &BLUEPRINT_FORMAT) {
        Err(ContainerError::NotABlueprintContainer) => {}
        other => panic!("expected NotABlueprintContainer, got {other:?}"),
    }
}

#[test]
fn corrupting_payload_data_is_detected() {
    let file = encode_rgba(Some(PAYLOAD.as_bytes()));
    let needle = b"Iron";
    let at = file
        .windows(needle.len())
        .position(|w| w == needle)
        .expect("payload is stored uncompressed");

    let mut corrupted = file.clone();
    corrupted[at] ^= 0x20;
    assert!(matches!(scan(&corrupted), Err(ContainerError::CorruptChunk { .. })));
}

#[test]
fn large_pixel_data_is_stripped() {
    let payload = vec![b'x'; 20 * 1024];
    let bytes = assemble(&[
        Chunk::new(ChunkType::IDAT, vec![0xAB; 4 * 1024 * 1024]),
        Chunk::new(ChunkType::IDAT, vec![0xCD; 1024 * 1024 - 64 * 1024]),
        Chunk::new(ChunkType(BLUEPRINT_FORMAT.payload_tag), payload.clone()),
    ]);
    assert!(bytes.len() > 4_900_000);

    let result = extract(&bytes, &BLUEPRINT_FORMAT).unwrap();
    assert!(result.stripped_size < 100 * 1024);
    assert!(result.stripped_size >= payload.len());
    assert!(result.compression_ratio > 95.0);
    assert_eq!(result.payload, payload);
}

#[test]
fn indexed_image_keeps_palette_and_transparency_in_preview() {
    let mut out = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut out, 4, 4);
        encoder.set_color(png::ColorType::Indexed);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_palette(vec![0, 0, 0, 255, 0, 0, 0, 255, 0]);
        encoder.set_trns(vec![0, 255, 128]);

        let mut writer = encoder.write_header().unwrap();
        writer
            .write_chunk(png::chunk::ChunkType(BLUEPRINT_FORMAT.payload_tag), PAYLOAD.as_bytes())
            .unwrap();
        writer.write_image_data(&[0, 1, 2, 1].repeat(4)).unwrap();
        writer.finish().unwrap();
    }

    let result = extract(&out, &BLUEPRINT_FORMAT).unwrap();
    let preview = result.image_blob.unwrap();
    let kinds: Vec<_> = scan(&preview)
        .unwrap()
        .chunks()
        .iter()
        .map(|c| c.kind())
        .collect();
    assert!(kinds.contains(&ChunkType::PLTE));
    assert!(kinds.contains(&ChunkType::TRNS));
    assert!(verify_preview(&preview).is_ok());

    let data_only = scan(&result.stripped_file).unwrap();
    assert!(data_only.chunks().iter().all(|c| c.kind() != ChunkType::PLTE));
}

#[test]
fn combine_rebuilds_an_equivalent_blueprint() {
    let file = encode_rgba(Some(PAYLOAD.as_bytes()));
    let result = extract(&file, &BLUEPRINT_FORMAT).unwrap();

    let rebuilt = combine(
        &result.stripped_file,
        result.image_blob.as_deref().unwrap(),
        &BLUEPRINT_FORMAT,
    )
    .unwrap();
    assert_eq!(decode_pixels(&rebuilt).2, rgba_pixels());

    let again = extract(&rebuilt, &BLUEPRINT_FORMAT).unwrap();
    assert_eq!(again.payload, result.payload);
    assert_eq!(again.image_blob, result.image_blob);
}

#[test]
fn custom_format_uses_its_own_tag() {
    let format = BlueprintFormat::new(*b"zzZz", 8);
    let file = encode_rgba(Some(PAYLOAD.as_bytes()));

    // The default tag is just metadata under another format
    assert!(extract(&file, &format).unwrap_err().is_not_blueprint());

    let converted = blueprint_png::embed_bytes(&encode_rgba(None), PAYLOAD.as_bytes(), &format).unwrap();
    let result = extract(&converted, &format).unwrap();
    assert_eq!(result.payload, PAYLOAD.as_bytes());
    let located_count = scan(&converted)
        .unwrap()
        .chunks()
        .iter()
        .filter(|c| c.kind() == ChunkType(*b"zzZz"))
        .count();
    assert_eq!(located_count, PAYLOAD.len().div_ceil(8));
}

#[test]
fn image_chunk_tag_is_refused_as_payload_tag() {
    let plain = encode_rgba(None);
    for tag in [*b"IDAT", *b"PLTE", *b"tRNS"] {
        let format = BlueprintFormat::new(tag, 1024);
        assert!(matches!(
            extract(&plain, &format),
            Err(ContainerError::InvalidFormat(_))
        ));
    }
}

#[test]
fn payload_split_around_pixels_is_one_chunk_in_the_data_only_file() {
    let (head, tail) = PAYLOAD.split_at(PAYLOAD.len() / 2);
    let file = assemble(&[
        Chunk::new(ChunkType(BLUEPRINT_FORMAT.payload_tag), head.as_bytes().to_vec()),
        Chunk::new(ChunkType::IDAT, vec![0; 4096]),
        Chunk::new(ChunkType(BLUEPRINT_FORMAT.payload_tag), tail.as_bytes().to_vec()),
    ]);
    let result = extract(&file, &BLUEPRINT_FORMAT).unwrap();

    let rescanned = scan(&result.stripped_file).unwrap();
    let located = locate(&rescanned, &BLUEPRINT_FORMAT).unwrap();
    assert_eq!(located.payload.len(), 1);
    assert_eq!(located.payload_bytes(), PAYLOAD.as_bytes());
    assert_eq!(rescanned.chunks()[1].kind(), ChunkType(BLUEPRINT_FORMAT.payload_tag));
}
