use crate::codec::CodecId;
use crate::error::{ChunkpackError, Result};
use crate::hash::DigestAlgo;
use crate::util::io::{read_full, read_u8, read_u16, read_u64};
use std::io::{Read, Write};

pub const MAGIC: &[u8; 6] = b"CHNKPK";
pub const VERSION: u16 = 1;
/// magic + version + codec + digest + total_size + chunk_size + chunk_count
pub const HEADER_LEN: u64 = 6 + 2 + 1 + 1 + 8 + 8 + 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub version: u16,
    pub codec: CodecId,
    pub digest: DigestAlgo,
    pub total_size: u64,
    pub chunk_size: u64,
    pub chunk_count: u64,
}

impl Header {
    pub fn write_to(&self, mut w: impl Write) -> std::io::Result<()> {
        w.write_all(MAGIC)?;
        w.write_all(&self.version.to_le_bytes())?;
        w.write_all(&[self.codec as u8, self.digest as u8])?;
        w.write_all(&self.total_size.to_le_bytes())?;
        w.write_all(&self.chunk_size.to_le_bytes())?;
        w.write_all(&self.chunk_count.to_le_bytes())?;
        Ok(())
    }

    pub fn read_from(mut r: impl Read) -> Result<Self> {
        let mut magic = [0u8; 6];
        read_full(&mut r, &mut magic, "header magic")?;
        if &magic != MAGIC {
            return Err(ChunkpackError::Format("bad container magic".into()));
        }
        let version = read_u16(&mut r, "header version")?;
        if version != VERSION {
            return Err(ChunkpackError::Format(format!(
                "unsupported container version {version}"
            )));
        }
        let codec = CodecId::from_u8(read_u8(&mut r, "header codec")?)?;
        let digest = DigestAlgo::from_u8(read_u8(&mut r, "header digest")?)?;
        let h = Self {
            version,
            codec,
            digest,
            total_size: read_u64(&mut r, "header total_size")?,
            chunk_size: read_u64(&mut r, "header chunk_size")?,
            chunk_count: read_u64(&mut r, "header chunk_count")?,
        };
        h.validate()?;
        Ok(h)
    }

    /// The header must describe the plan the planner would produce.
    pub fn validate(&self) -> Result<()> {
        if self.total_size == 0 {
            return Err(ChunkpackError::Format("header total_size is zero".into()));
        }
        if self.chunk_size == 0 {
            return Err(ChunkpackError::Format("header chunk_size is zero".into()));
        }
        let expected = self.total_size.div_ceil(self.chunk_size);
        if self.chunk_count != expected {
            return Err(ChunkpackError::Format(format!(
                "header chunk_count {} inconsistent with total_size {} / chunk_size {} (expected {expected})",
                self.chunk_count, self.total_size, self.chunk_size
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Header {
        Header {
            version: VERSION,
            codec: CodecId::Zstd,
            digest: DigestAlgo::Blake3,
            total_size: 10,
            chunk_size: 4,
            chunk_count: 3,
        }
    }

    #[test]
    fn encoded_length_matches_constant() {
        let mut buf = Vec::new();
        sample().write_to(&mut buf).unwrap();
        assert_eq!(buf.len() as u64, HEADER_LEN);
        assert_eq!(Header::read_from(&buf[..]).unwrap(), sample());
    }

    #[test]
    fn rejects_bad_magic_and_version() {
        let mut buf = Vec::new();
        sample().write_to(&mut buf).unwrap();
        let mut bad = buf.clone();
        bad[0] = b'X';
        assert!(matches!(Header::read_from(&bad[..]), Err(ChunkpackError::Format(_))));
        let mut bad = buf.clone();
        bad[6] = 9;
        assert!(matches!(Header::read_from(&bad[..]), Err(ChunkpackError::Format(_))));
    }

    #[test]
    fn rejects_inconsistent_count() {
        let mut h = sample();
        h.chunk_count = 4;
        let mut buf = Vec::new();
        h.write_to(&mut buf).unwrap();
        assert!(matches!(Header::read_from(&buf[..]), Err(ChunkpackError::Format(_))));
    }

    #[test]
    fn truncated_header_is_short_read() {
        let mut buf = Vec::new();
        sample().write_to(&mut buf).unwrap();
        buf.truncate(20);
        assert!(matches!(
            Header::read_from(&buf[..]),
            Err(ChunkpackError::ShortRead { .. })
        ));
    }
}
