use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct EncodeReport {
    pub total_size: u64,
    pub chunk_size: u64,
    pub chunk_count: u64,
    /// Sum of stored payload sizes.
    pub stored_size: u64,
    pub container_bytes: u64,
    pub meta_bytes: u64,
    pub compressed_chunks: u64,
    pub raw_chunks: u64,
    pub failed_chunks: u64,
    pub accelerated_digests: u64,
    pub standard_digests: u64,
    pub threads: usize,
    pub compression_ratio: f32,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DecodeReport {
    pub total_size: u64,
    pub chunk_size: u64,
    pub chunk_count: u64,
    pub stored_size: u64,
    pub compressed_chunks: u64,
    pub raw_chunks: u64,
}

pub fn ratio(original: u64, stored: u64) -> f32 {
    if stored == 0 {
        0.0
    } else {
        original as f32 / stored as f32
    }
}
