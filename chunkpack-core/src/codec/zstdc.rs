use super::{CodecId, Compressor};
use crate::error::Result;

pub struct ZstdCompressor;

impl Compressor for ZstdCompressor {
    fn id(&self) -> CodecId {
        CodecId::Zstd
    }

    fn compress_bound(&self, len: usize) -> usize {
        zstd::zstd_safe::compress_bound(len)
    }

    fn compress(&self, src: &[u8], dst: &mut [u8], level: i32) -> Result<usize> {
        Ok(zstd::bulk::compress_to_buffer(src, dst, level.max(1))?)
    }

    fn decompress(&self, src: &[u8], dst: &mut Vec<u8>) -> Result<()> {
        // Writes into spare capacity only; never grows `dst`.
        zstd::bulk::Decompressor::new()?.decompress_to_buffer(src, dst)?;
        Ok(())
    }
}
