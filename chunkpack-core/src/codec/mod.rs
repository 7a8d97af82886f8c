use crate::error::{ChunkpackError, Result};
use serde::{Deserialize, Serialize};

#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CodecId {
    Store = 0,
    Zstd = 1,
}

impl CodecId {
    pub fn from_u8(v: u8) -> Result<Self> {
        match v {
            0 => Ok(CodecId::Store),
            1 => Ok(CodecId::Zstd),
            other => Err(ChunkpackError::Format(format!("unknown codec id {other}"))),
        }
    }
}

/// Bounded-output block compressor. Callers size `dst` from `compress_bound`;
/// nothing is compressed in place.
pub trait Compressor: Send + Sync {
    fn id(&self) -> CodecId;
    fn compress_bound(&self, len: usize) -> usize;
    /// Compress `src` into `dst`, returning the number of bytes written.
    fn compress(&self, src: &[u8], dst: &mut [u8], level: i32) -> Result<usize>;
    /// Decompress `src` into the spare capacity of `dst`, which the caller
    /// reserves up front. Output that does not fit is an error.
    fn decompress(&self, src: &[u8], dst: &mut Vec<u8>) -> Result<()>;
}

pub fn compressor_for(id: CodecId) -> Box<dyn Compressor> {
    match id {
        CodecId::Store => Box::new(store::Store),
        CodecId::Zstd => Box::new(zstdc::ZstdCompressor),
    }
}

pub mod store;
pub mod zstdc;
