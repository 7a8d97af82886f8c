#![forbid(unsafe_code)]

pub mod error;
pub mod options;
pub mod plan;
pub mod stats;

pub mod util {
    pub mod hex;
    pub mod io;
}

pub mod codec;
pub mod hash;
pub mod integrity;
pub mod pool;

pub mod container {
    pub mod entry;
    pub mod header;
    pub mod meta;
    pub mod reader;
    pub mod writer;
}

pub mod encode;

pub mod read {
    pub mod decode;
    pub mod inspect;
}

// Re-exports: stable API surface
pub use codec::CodecId;
pub use encode::{EncodeOutput, Encoder, encode};
pub use error::{ChunkpackError, Result};
pub use options::{DecodeOptions, EncodeOptions};
pub use read::decode::{Decoder, decode, verify};
pub use read::inspect::inspect;
pub use stats::{DecodeReport, EncodeReport};
