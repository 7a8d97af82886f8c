mod support;

use chunkpack_core::codec::CodecId;
use chunkpack_core::container::entry::{ENTRY_HEADER_LEN, EntryHeader, StatusFlag};
use chunkpack_core::container::header::{HEADER_LEN, Header, VERSION};
use chunkpack_core::container::meta::MetaRecord;
use chunkpack_core::hash::{Digest, DigestAlgo};
use chunkpack_core::{ChunkpackError, DecodeOptions, EncodeOptions, EncodeOutput, decode, encode, inspect};
use std::fs;
use std::path::Path;
use support::{sample_bytes, write_input};
use tempfile::{TempDir, tempdir};

const CHUNK: u64 = 8 * 1024;

fn encoded() -> (TempDir, Vec<u8>, EncodeOutput) {
    let dir = tempdir().unwrap();
    let data = sample_bytes((CHUNK * 4 + 500) as usize, 11);
    let input = write_input(dir.path(), "data.bin", &data);
    let opts = EncodeOptions {
        chunk_size: Some(CHUNK),
        threads: Some(2),
        ..Default::default()
    };
    let out = encode(&input, &dir.path().join("enc"), &opts).unwrap();
    (dir, data, out)
}

fn decode_err(dir: &Path, out: &EncodeOutput) -> ChunkpackError {
    let dest = dir.join("dec");
    let err = decode(&out.container, &out.meta, &dest, &DecodeOptions::default()).unwrap_err();
    assert!(
        !dest.join("data.bin").exists(),
        "failed decode must not leave an output file"
    );
    err
}

/// Byte offset of chunk `id`'s entry header.
fn entry_offset(out: &EncodeOutput, id: usize) -> u64 {
    let (_, rows) = inspect(&out.container, &out.meta).unwrap();
    HEADER_LEN
        + rows[..id]
            .iter()
            .map(|r| ENTRY_HEADER_LEN + r.entry.stored_size)
            .sum::<u64>()
}

fn rewrite_meta_line(out: &EncodeOutput, id: usize, f: impl Fn(&mut Vec<String>)) {
    let text = fs::read_to_string(&out.meta).unwrap();
    let mut lines: Vec<String> = text.lines().map(str::to_string).collect();
    let mut fields: Vec<String> = lines[id].split(' ').map(str::to_string).collect();
    f(&mut fields);
    lines[id] = fields.join(" ");
    fs::write(&out.meta, lines.join("\n") + "\n").unwrap();
}

#[test]
fn flipped_payload_byte_is_detected() {
    let (dir, _, out) = encoded();
    let (_, rows) = inspect(&out.container, &out.meta).unwrap();
    let off = entry_offset(&out, 1) + ENTRY_HEADER_LEN + rows[1].entry.stored_size / 2;
    let mut bytes = fs::read(&out.container).unwrap();
    bytes[off as usize] ^= 0x40;
    fs::write(&out.container, &bytes).unwrap();

    match decode_err(dir.path(), &out) {
        ChunkpackError::CorruptChunk { id, .. } | ChunkpackError::IntegrityFailure { id, .. } => {
            assert_eq!(id, 1)
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn every_single_byte_flip_in_a_payload_fails() {
    let (dir, _, out) = encoded();
    let (_, rows) = inspect(&out.container, &out.meta).unwrap();
    let start = entry_offset(&out, 2) + ENTRY_HEADER_LEN;
    let pristine = fs::read(&out.container).unwrap();
    let step = (rows[2].entry.stored_size / 16).max(1);
    for k in (0..rows[2].entry.stored_size).step_by(step as usize) {
        let mut bytes = pristine.clone();
        bytes[(start + k) as usize] ^= 0xFF;
        fs::write(&out.container, &bytes).unwrap();
        let err = decode_err(dir.path(), &out);
        assert!(
            matches!(
                err,
                ChunkpackError::CorruptChunk { id: 2, .. }
                    | ChunkpackError::IntegrityFailure { id: 2, .. }
            ),
            "offset {k}: {err:?}"
        );
    }
}

#[test]
fn orig_size_disagreement_is_index_mismatch() {
    let (dir, _, out) = encoded();
    rewrite_meta_line(&out, 1, |f| f[1] = (CHUNK - 1).to_string());
    match decode_err(dir.path(), &out) {
        ChunkpackError::IndexMismatch {
            id,
            field,
            container,
            index,
        } => {
            assert_eq!((id, field), (1, "orig_size"));
            assert_eq!(container, CHUNK);
            assert_eq!(index, CHUNK - 1);
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn container_orig_size_tamper_is_index_mismatch() {
    let (dir, _, out) = encoded();
    set_container_orig_size(&out, 0, CHUNK - 3);
    assert!(matches!(
        decode_err(dir.path(), &out),
        ChunkpackError::IndexMismatch {
            id: 0,
            field: "orig_size",
            ..
        }
    ));
}

fn set_container_orig_size(out: &EncodeOutput, id: usize, orig: u64) {
    let off = entry_offset(out, id) as usize + 1;
    let mut bytes = fs::read(&out.container).unwrap();
    bytes[off..off + 8].copy_from_slice(&orig.to_le_bytes());
    fs::write(&out.container, &bytes).unwrap();
}

#[test]
fn raised_tail_orig_size_is_index_mismatch() {
    let (dir, _, out) = encoded();
    // The tail holds 500 bytes; one more pushes the running sum past total_size.
    set_container_orig_size(&out, 4, 501);
    let expected = |e: &ChunkpackError| {
        matches!(
            e,
            ChunkpackError::IndexMismatch {
                id: 4,
                field: "orig_size",
                container: 501,
                index: 500,
            }
        )
    };
    let err = inspect(&out.container, &out.meta).unwrap_err();
    assert!(expected(&err), "inspect: {err:?}");
    let err = decode_err(dir.path(), &out);
    assert!(expected(&err), "decode: {err:?}");
}

#[test]
fn orig_size_above_chunk_size_is_index_mismatch() {
    let (dir, _, out) = encoded();
    set_container_orig_size(&out, 0, CHUNK + 1);
    assert!(matches!(
        decode_err(dir.path(), &out),
        ChunkpackError::IndexMismatch {
            id: 0,
            field: "orig_size",
            ..
        }
    ));
}

#[test]
fn oversized_declared_chunk_fails_without_aborting() {
    let dir = tempdir().unwrap();
    let huge = 1u64 << 46;
    let header = Header {
        version: VERSION,
        codec: CodecId::Zstd,
        digest: DigestAlgo::Blake3,
        total_size: huge,
        chunk_size: huge,
        chunk_count: 1,
    };
    let payload = [0x28u8, 0xb5, 0x2f, 0xfd, 0x00];
    let mut container = Vec::new();
    header.write_to(&mut container).unwrap();
    EntryHeader {
        status: StatusFlag::Compressed,
        orig_size: huge,
        stored_size: payload.len() as u64,
    }
    .write_to(&mut container)
    .unwrap();
    container.extend_from_slice(&payload);
    let mut meta = Vec::new();
    MetaRecord {
        id: 0,
        orig_size: huge,
        stored_size: payload.len() as u64,
        digest: Digest([0; 32]),
    }
    .write_to(&mut meta)
    .unwrap();

    let out = EncodeOutput {
        container: dir.path().join("data.bin.cmp"),
        meta: dir.path().join("data.bin.meta"),
        report: Default::default(),
    };
    fs::write(&out.container, &container).unwrap();
    fs::write(&out.meta, &meta).unwrap();
    let err = decode_err(dir.path(), &out);
    assert!(
        matches!(
            err,
            ChunkpackError::AllocationFailure { id: 0, .. } | ChunkpackError::CorruptChunk { id: 0, .. }
        ),
        "{err:?}"
    );
}

#[test]
fn stored_size_disagreement_is_index_mismatch() {
    let (dir, _, out) = encoded();
    rewrite_meta_line(&out, 3, |f| f[2] = "1".to_string());
    assert!(matches!(
        decode_err(dir.path(), &out),
        ChunkpackError::IndexMismatch {
            id: 3,
            field: "stored_size",
            ..
        }
    ));
}

#[test]
fn digest_disagreement_is_integrity_failure() {
    let (dir, _, out) = encoded();
    rewrite_meta_line(&out, 4, |f| f[3] = "00".repeat(32));
    assert!(matches!(
        decode_err(dir.path(), &out),
        ChunkpackError::IntegrityFailure { id: 4, .. }
    ));
}

#[test]
fn truncated_container_is_short_read() {
    let (dir, _, out) = encoded();
    let bytes = fs::read(&out.container).unwrap();
    fs::write(&out.container, &bytes[..bytes.len() - 10]).unwrap();
    assert!(matches!(
        decode_err(dir.path(), &out),
        ChunkpackError::ShortRead { .. }
    ));
}

#[test]
fn missing_metadata_line_is_reported() {
    let (dir, _, out) = encoded();
    let text = fs::read_to_string(&out.meta).unwrap();
    let kept: Vec<&str> = text.lines().take(4).collect();
    fs::write(&out.meta, kept.join("\n") + "\n").unwrap();
    match decode_err(dir.path(), &out) {
        ChunkpackError::ShortRead {
            what,
            expected,
            actual,
        } => {
            assert_eq!(what, "metadata index");
            assert_eq!((expected, actual), (5, 4));
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn extra_metadata_line_is_index_mismatch() {
    let (dir, _, out) = encoded();
    let mut text = fs::read_to_string(&out.meta).unwrap();
    text.push_str(&format!("5 1 1 {}\n", "ab".repeat(32)));
    fs::write(&out.meta, text).unwrap();
    assert!(matches!(
        decode_err(dir.path(), &out),
        ChunkpackError::IndexMismatch {
            field: "chunk_count",
            ..
        }
    ));
}

#[test]
fn trailing_container_bytes_are_rejected() {
    let (dir, _, out) = encoded();
    let mut bytes = fs::read(&out.container).unwrap();
    bytes.extend_from_slice(b"junk");
    fs::write(&out.container, &bytes).unwrap();
    assert!(matches!(
        decode_err(dir.path(), &out),
        ChunkpackError::Format(_)
    ));
}

#[test]
fn bad_magic_is_rejected() {
    let (dir, _, out) = encoded();
    let mut bytes = fs::read(&out.container).unwrap();
    bytes[0] = b'Z';
    fs::write(&out.container, &bytes).unwrap();
    assert!(matches!(
        decode_err(dir.path(), &out),
        ChunkpackError::Format(_)
    ));
}

#[test]
fn clean_decode_still_works_after_checks() {
    let (dir, data, out) = encoded();
    let (path, _) = decode(
        &out.container,
        &out.meta,
        &dir.path().join("dec"),
        &DecodeOptions::default(),
    )
    .unwrap();
    assert_eq!(fs::read(path).unwrap(), data);
}
