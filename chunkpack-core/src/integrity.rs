use crate::error::{ChunkpackError, Result};
use crate::hash::{Digest, DigestPath, Digester};

/// Records digests at encode time and checks them at decode time, through the
/// same `Digester` so both sides agree on algorithm and encoding.
pub struct IntegrityVerifier {
    digester: Digester,
}

impl IntegrityVerifier {
    pub fn new(digester: Digester) -> Self {
        Self { digester }
    }

    pub fn digester(&self) -> &Digester {
        &self.digester
    }

    pub fn record(&self, data: &[u8]) -> (Digest, DigestPath) {
        self.digester.digest(data)
    }

    pub fn verify(&self, id: u64, data: &[u8], expected: &Digest) -> Result<()> {
        let (actual, _) = self.digester.digest(data);
        if actual != *expected {
            return Err(ChunkpackError::IntegrityFailure {
                id,
                expected: expected.to_hex(),
                actual: actual.to_hex(),
            });
        }
        Ok(())
    }
}
