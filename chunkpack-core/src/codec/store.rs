use super::{CodecId, Compressor};
use crate::error::{ChunkpackError, Result};

pub struct Store;

impl Compressor for Store {
    fn id(&self) -> CodecId {
        CodecId::Store
    }

    fn compress_bound(&self, len: usize) -> usize {
        len
    }

    fn compress(&self, src: &[u8], dst: &mut [u8], _level: i32) -> Result<usize> {
        let dst_len = dst.len();
        let out = dst.get_mut(..src.len()).ok_or_else(|| {
            ChunkpackError::Format(format!(
                "store: destination too small ({dst_len} < {})",
                src.len()
            ))
        })?;
        out.copy_from_slice(src);
        Ok(src.len())
    }

    fn decompress(&self, src: &[u8], dst: &mut Vec<u8>) -> Result<()> {
        let room = dst.capacity() - dst.len();
        if src.len() > room {
            return Err(ChunkpackError::Format(format!(
                "store: {} bytes do not fit in {room}",
                src.len()
            )));
        }
        dst.extend_from_slice(src);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copies_into_bounded_buffers() {
        let src = b"plain bytes";
        let mut dst = vec![0u8; src.len()];
        assert_eq!(Store.compress(src, &mut dst, 1).unwrap(), src.len());
        assert_eq!(&dst, src);

        let mut small = [0u8; 4];
        assert!(Store.compress(src, &mut small, 1).is_err());

        let mut out = Vec::with_capacity(src.len());
        Store.decompress(src, &mut out).unwrap();
        assert_eq!(out, src);
    }

    #[test]
    fn decompress_respects_reserved_capacity() {
        let mut out = Vec::new();
        out.try_reserve_exact(3).unwrap();
        let room = out.capacity();
        let src = vec![1u8; room + 1];
        assert!(Store.decompress(&src, &mut out).is_err());
        assert!(out.is_empty());
    }
}
