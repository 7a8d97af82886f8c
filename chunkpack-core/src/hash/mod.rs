//! Chunk digests.
//!
//! Every build uses exactly one digest algorithm (BLAKE3). Backends differ only
//! in how they compute it, so an index written through one path verifies
//! through any other.

use crate::error::{ChunkpackError, Result};
use crate::util::hex::parse_hex_array;
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod blake3;

pub const DIGEST_LEN: usize = 32;

#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DigestAlgo {
    Blake3 = 1,
}

impl DigestAlgo {
    pub fn from_u8(v: u8) -> Result<Self> {
        match v {
            1 => Ok(DigestAlgo::Blake3),
            other => Err(ChunkpackError::Format(format!(
                "unknown digest algorithm {other}"
            ))),
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Digest(pub [u8; DIGEST_LEN]);

impl Digest {
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn from_hex(s: &str) -> Result<Self> {
        Ok(Digest(parse_hex_array::<DIGEST_LEN>(s)?))
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self.to_hex())
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Which backend produced a digest.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DigestPath {
    Accelerated,
    Standard,
}

pub trait DigestBackend: Send + Sync {
    fn name(&self) -> &'static str;

    /// Runtime capability check. `false` means `digest` will not be attempted.
    fn probe(&self) -> bool {
        true
    }

    /// `None` when the backend cannot serve this input.
    fn digest(&self, data: &[u8]) -> Option<Digest>;
}

/// Accelerated-first digest with a standard fallback.
pub struct Digester {
    accelerated: Option<Box<dyn DigestBackend>>,
    standard: blake3::Blake3Standard,
}

impl Digester {
    pub fn new(accelerated: bool) -> Self {
        let accelerated: Option<Box<dyn DigestBackend>> = if accelerated {
            Some(Box::new(blake3::Blake3Parallel::default()))
        } else {
            None
        };
        Self::with_backend(accelerated)
    }

    pub fn with_backend(accelerated: Option<Box<dyn DigestBackend>>) -> Self {
        let accelerated = accelerated.filter(|b| {
            let ok = b.probe();
            if !ok {
                tracing::debug!(backend = b.name(), "accelerated digest unavailable");
            }
            ok
        });
        Self {
            accelerated,
            standard: blake3::Blake3Standard,
        }
    }

    pub fn algo(&self) -> DigestAlgo {
        DigestAlgo::Blake3
    }

    pub fn digest(&self, data: &[u8]) -> (Digest, DigestPath) {
        if let Some(d) = self.accelerated.as_ref().and_then(|b| b.digest(data)) {
            return (d, DigestPath::Accelerated);
        }
        (self.standard.hash(data), DigestPath::Standard)
    }
}
