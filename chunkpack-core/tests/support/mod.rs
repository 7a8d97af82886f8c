#![allow(dead_code)]

use chunkpack_core::codec::zstdc::ZstdCompressor;
use chunkpack_core::codec::{CodecId, Compressor};
use chunkpack_core::{ChunkpackError, Result};
use std::path::{Path, PathBuf};

/// Deterministic, moderately compressible bytes.
pub fn sample_bytes(len: usize, seed: u32) -> Vec<u8> {
    let mut x = seed.wrapping_mul(2_654_435_761).wrapping_add(1);
    (0..len)
        .map(|i| {
            x ^= x << 13;
            x ^= x >> 17;
            x ^= x << 5;
            if i % 64 < 40 { (i % 251) as u8 } else { x as u8 }
        })
        .collect()
}

pub fn write_input(dir: &Path, name: &str, data: &[u8]) -> PathBuf {
    let p = dir.join(name);
    std::fs::write(&p, data).unwrap();
    p
}

/// Zstd, except chunks starting with 0xFF refuse to compress.
pub struct FailsOnMarker;

impl Compressor for FailsOnMarker {
    fn id(&self) -> CodecId {
        CodecId::Zstd
    }
    fn compress_bound(&self, len: usize) -> usize {
        ZstdCompressor.compress_bound(len)
    }
    fn compress(&self, src: &[u8], dst: &mut [u8], level: i32) -> Result<usize> {
        if src.first() == Some(&0xFF) {
            return Err(ChunkpackError::Format("forced failure".into()));
        }
        ZstdCompressor.compress(src, dst, level)
    }
    fn decompress(&self, src: &[u8], dst: &mut Vec<u8>) -> Result<()> {
        ZstdCompressor.decompress(src, dst)
    }
}
