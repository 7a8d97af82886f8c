use crate::error::{ChunkpackError, Result};
use std::io::{self, Read, Write};

/// Fill `buf` completely or report how far the reader got.
pub fn read_full(mut r: impl Read, buf: &mut [u8], what: &str) -> Result<()> {
    let mut filled = 0;
    while filled < buf.len() {
        match r.read(&mut buf[filled..]) {
            Ok(0) => {
                return Err(ChunkpackError::ShortRead {
                    what: what.to_string(),
                    expected: buf.len() as u64,
                    actual: filled as u64,
                });
            }
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}

pub fn read_u8(r: impl Read, what: &str) -> Result<u8> {
    let mut b = [0u8; 1];
    read_full(r, &mut b, what)?;
    Ok(b[0])
}

pub fn read_u16(r: impl Read, what: &str) -> Result<u16> {
    let mut b = [0u8; 2];
    read_full(r, &mut b, what)?;
    Ok(u16::from_le_bytes(b))
}

pub fn read_u64(r: impl Read, what: &str) -> Result<u64> {
    let mut b = [0u8; 8];
    read_full(r, &mut b, what)?;
    Ok(u64::from_le_bytes(b))
}

/// Small Write adapter that counts bytes written
pub struct CountingWriter<W: Write> {
    inner: W,
    n: u64,
}

impl<W: Write> CountingWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner, n: 0 }
    }

    pub fn count(&self) -> u64 {
        self.n
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let k = self.inner.write(buf)?;
        self.n += k as u64;
        Ok(k)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
