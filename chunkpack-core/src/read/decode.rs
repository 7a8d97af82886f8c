use crate::codec::Compressor;
use crate::container::header::Header;
use crate::container::meta::{MetaReader, MetaRecord};
use crate::container::reader::{ContainerReader, Entry};
use crate::encode::CONTAINER_EXT;
use crate::error::{ChunkpackError, Result};
use crate::hash::Digester;
use crate::integrity::IntegrityVerifier;
use crate::options::DecodeOptions;
use crate::stats::DecodeReport;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub struct Decoder {
    verifier: IntegrityVerifier,
}

impl Decoder {
    pub fn new(opts: &DecodeOptions) -> Self {
        Self {
            verifier: IntegrityVerifier::new(Digester::new(opts.accelerated_digest)),
        }
    }

    /// Recover one entry's bytes. Its sizes already agree with `rec`.
    fn recover(&self, codec: &dyn Compressor, entry: Entry, rec: &MetaRecord) -> Result<Vec<u8>> {
        let id = entry.id;
        let raw = entry.is_raw();
        let orig = entry.header.orig_size as usize;
        let bytes = if raw {
            entry.payload
        } else {
            let mut out = Vec::new();
            out.try_reserve_exact(orig)
                .map_err(|_| ChunkpackError::AllocationFailure { id, bytes: orig })?;
            codec
                .decompress(&entry.payload, &mut out)
                .map_err(|e| ChunkpackError::CorruptChunk {
                    id,
                    reason: e.to_string(),
                })?;
            if out.len() != orig {
                return Err(ChunkpackError::CorruptChunk {
                    id,
                    reason: format!("decoded {} bytes, expected {orig}", out.len()),
                });
            }
            out
        };
        self.verifier.verify(id, &bytes, &rec.digest)?;
        tracing::debug!(id, orig, raw, "chunk verified");
        Ok(bytes)
    }

    /// Replay container + index into `out`, strictly in chunk order. Stops at
    /// the first failed check.
    pub fn decode_stream<W: Write>(
        &self,
        container: impl Read,
        meta: impl BufRead,
        mut out: W,
    ) -> Result<(W, DecodeReport)> {
        let mut reader = ContainerReader::new(container)?;
        let mut meta = MetaReader::new(meta);
        let header: Header = *reader.header();
        tracing::info!(
            total_size = header.total_size,
            chunk_count = header.chunk_count,
            codec = ?header.codec,
            "decoding"
        );

        let mut report = DecodeReport {
            total_size: header.total_size,
            chunk_size: header.chunk_size,
            chunk_count: header.chunk_count,
            ..Default::default()
        };
        while let Some((entry, rec)) = reader.next_entry(|id, eh| {
            let rec = meta.expect_record(id, header.chunk_count)?;
            rec.check_entry(eh)?;
            Ok(rec)
        })? {
            if entry.is_raw() {
                report.raw_chunks += 1;
            } else {
                report.compressed_chunks += 1;
            }
            report.stored_size += entry.header.stored_size;
            let bytes = self.recover(reader.codec(), entry, &rec)?;
            out.write_all(&bytes)?;
        }
        reader.finish()?;
        meta.expect_end(header.chunk_count)?;
        out.flush()?;
        Ok((out, report))
    }

    /// Decode into `<out_dir>/<container name without .cmp>`. The output file
    /// only appears once every chunk has verified.
    pub fn decode_file(
        &self,
        container: &Path,
        meta: &Path,
        out_dir: &Path,
    ) -> Result<(PathBuf, DecodeReport)> {
        let out_path = output_path(container, out_dir)?;
        let c = BufReader::new(File::open(container)?);
        let m = BufReader::new(File::open(meta)?);

        fs::create_dir_all(out_dir)?;
        let tmp = NamedTempFile::new_in(out_dir)?;
        let (w, report) = self.decode_stream(c, m, BufWriter::new(tmp))?;
        let tmp = w.into_inner().map_err(|e| e.into_error())?;
        let written = tmp.as_file().metadata()?.len();
        if written != report.total_size {
            return Err(ChunkpackError::ShortWrite {
                what: out_path.display().to_string(),
                expected: report.total_size,
                actual: written,
            });
        }
        tmp.as_file().sync_all()?;
        tmp.persist(&out_path).map_err(|e| e.error)?;
        tracing::info!(out = %out_path.display(), bytes = written, "decode finished");
        Ok((out_path, report))
    }

    /// Run every decode-time check without keeping the output.
    pub fn verify_file(&self, container: &Path, meta: &Path) -> Result<DecodeReport> {
        let c = BufReader::new(File::open(container)?);
        let m = BufReader::new(File::open(meta)?);
        let (_, report) = self.decode_stream(c, m, io::sink())?;
        Ok(report)
    }
}

/// `<out_dir>/<container file name>` with a trailing `.cmp` removed.
pub fn output_path(container: &Path, out_dir: &Path) -> Result<PathBuf> {
    let name = container.file_name().ok_or_else(|| {
        ChunkpackError::Format(format!("container has no file name: {}", container.display()))
    })?;
    let p = Path::new(name);
    let stem = match p.extension() {
        Some(ext) if ext == CONTAINER_EXT => p.file_stem().unwrap_or(name),
        _ => name,
    };
    Ok(out_dir.join(stem))
}

pub fn decode(
    container: &Path,
    meta: &Path,
    out_dir: &Path,
    opts: &DecodeOptions,
) -> Result<(PathBuf, DecodeReport)> {
    Decoder::new(opts).decode_file(container, meta, out_dir)
}

pub fn verify(container: &Path, meta: &Path, opts: &DecodeOptions) -> Result<DecodeReport> {
    Decoder::new(opts).verify_file(container, meta)
}
