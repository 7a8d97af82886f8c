use crate::codec::{Compressor, compressor_for};
use crate::container::header::{Header, VERSION};
use crate::container::writer::{ContainerWriter, WriteSummary, check_written};
use crate::error::{ChunkpackError, Result};
use crate::hash::{DigestBackend, DigestPath, Digester};
use crate::integrity::IntegrityVerifier;
use crate::options::EncodeOptions;
use crate::plan::{ChunkPlan, plan};
use crate::pool::{Job, JobQueue, JobStatus, WorkerPool};
use crate::stats::{EncodeReport, ratio};
use crate::util::io::read_full;
use std::fs::{self, File};
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub const CONTAINER_EXT: &str = "cmp";
pub const META_EXT: &str = "meta";

#[derive(Debug, Clone)]
pub struct EncodeOutput {
    pub container: PathBuf,
    pub meta: PathBuf,
    pub report: EncodeReport,
}

/// `<out_dir>/<basename>.cmp` and `<out_dir>/<basename>.meta`.
pub fn output_paths(input: &Path, out_dir: &Path) -> Result<(PathBuf, PathBuf)> {
    let name = input.file_name().ok_or_else(|| {
        ChunkpackError::Format(format!("input has no file name: {}", input.display()))
    })?;
    let with_ext = |ext: &str| {
        let mut n = name.to_os_string();
        n.push(".");
        n.push(ext);
        out_dir.join(n)
    };
    Ok((with_ext(CONTAINER_EXT), with_ext(META_EXT)))
}

pub struct Encoder {
    opts: EncodeOptions,
    compressor: Box<dyn Compressor>,
    verifier: IntegrityVerifier,
}

impl Encoder {
    pub fn new(opts: EncodeOptions) -> Self {
        let compressor = compressor_for(opts.codec);
        let verifier = IntegrityVerifier::new(Digester::new(opts.accelerated_digest));
        Self {
            opts,
            compressor,
            verifier,
        }
    }

    /// Swap in another compression backend.
    pub fn with_compressor(mut self, compressor: Box<dyn Compressor>) -> Self {
        self.compressor = compressor;
        self
    }

    /// Swap in another accelerated digest backend (`None` disables it).
    pub fn with_digest_backend(mut self, backend: Option<Box<dyn DigestBackend>>) -> Self {
        self.verifier = IntegrityVerifier::new(Digester::with_backend(backend));
        self
    }

    /// Read `total_size` bytes from `input` into owned chunk buffers, one job each.
    fn read_jobs(&self, mut input: impl Read, plan: &ChunkPlan) -> Result<Vec<Job>> {
        let mut jobs = Vec::with_capacity(plan.chunk_count as usize);
        for id in 0..plan.chunk_count {
            let len = plan.chunk_len(id) as usize;
            let mut buf = Vec::new();
            buf.try_reserve_exact(len)
                .map_err(|_| ChunkpackError::AllocationFailure { id, bytes: len })?;
            buf.resize(len, 0);
            read_full(&mut input, &mut buf, &format!("input chunk {id}"))?;
            jobs.push(Job::new(id, buf));
        }
        Ok(jobs)
    }

    /// Run the whole pipeline against arbitrary sinks.
    pub fn encode_stream<C: Write, M: Write>(
        &self,
        input: impl Read,
        total_size: u64,
        container: C,
        meta: M,
    ) -> Result<(C, M, EncodeReport)> {
        let plan = plan(total_size, self.opts.chunk_size)?;
        let threads = self.opts.effective_threads();
        let level = self.opts.effective_level();
        tracing::info!(
            total_size,
            chunk_size = plan.chunk_size,
            chunk_count = plan.chunk_count,
            threads,
            level,
            "encoding"
        );

        let jobs = self.read_jobs(input, &plan)?;
        let queue = JobQueue::new(jobs)?;
        let pool = WorkerPool::new(threads, self.compressor.as_ref(), &self.verifier, level);
        let stats = pool.run(&queue)?;
        let jobs = queue.into_jobs()?;
        if stats.total_claimed() != jobs.len() {
            return Err(ChunkpackError::Format(format!(
                "workers claimed {} of {} jobs",
                stats.total_claimed(),
                jobs.len()
            )));
        }

        let header = Header {
            version: VERSION,
            codec: self.compressor.id(),
            digest: self.verifier.digester().algo(),
            total_size: plan.total_size,
            chunk_size: plan.chunk_size,
            chunk_count: plan.chunk_count,
        };
        let mut report = EncodeReport {
            total_size: plan.total_size,
            chunk_size: plan.chunk_size,
            chunk_count: plan.chunk_count,
            threads: pool.threads(),
            ..Default::default()
        };

        let mut writer = ContainerWriter::new(container, meta, header)?;
        // Consume jobs so each one's buffers are freed as soon as it is written.
        for job in jobs {
            writer.write_job(&job)?;
            match job.status {
                JobStatus::Compressed => report.compressed_chunks += 1,
                JobStatus::StoredRaw => report.raw_chunks += 1,
                JobStatus::Failed => report.failed_chunks += 1,
                JobStatus::Pending => {}
            }
            match job.digest_path {
                Some(DigestPath::Accelerated) => report.accelerated_digests += 1,
                Some(DigestPath::Standard) => report.standard_digests += 1,
                None => {}
            }
            report.stored_size += job.stored_size();
        }
        let (container, meta, WriteSummary {
            container_bytes,
            meta_bytes,
        }) = writer.finish()?;
        report.container_bytes = container_bytes;
        report.meta_bytes = meta_bytes;
        report.compression_ratio = ratio(report.total_size, report.stored_size);

        tracing::info!(
            compressed = report.compressed_chunks,
            raw = report.raw_chunks,
            failed = report.failed_chunks,
            stored = report.stored_size,
            "encode finished"
        );
        Ok((container, meta, report))
    }

    /// Encode `input` into `<out_dir>/<basename>.cmp` + `.meta`. Both files
    /// appear only if the whole encode succeeds.
    pub fn encode_file(&self, input: &Path, out_dir: &Path) -> Result<EncodeOutput> {
        let f = File::open(input)?;
        let total_size = f.metadata()?.len();
        // Refuse before touching the output directory.
        plan(total_size, self.opts.chunk_size)?;
        let (container_path, meta_path) = output_paths(input, out_dir)?;

        fs::create_dir_all(out_dir)?;
        let c_tmp = NamedTempFile::new_in(out_dir)?;
        let m_tmp = NamedTempFile::new_in(out_dir)?;
        let (c_buf, m_buf, report) = self.encode_stream(
            f.take(total_size),
            total_size,
            BufWriter::new(c_tmp),
            BufWriter::new(m_tmp),
        )?;
        let c_tmp = c_buf.into_inner().map_err(|e| e.into_error())?;
        let m_tmp = m_buf.into_inner().map_err(|e| e.into_error())?;
        c_tmp.as_file().sync_all()?;
        m_tmp.as_file().sync_all()?;

        check_written(
            "container",
            report.container_bytes,
            c_tmp.as_file().metadata()?.len(),
        )?;
        check_written(
            "metadata index",
            report.meta_bytes,
            m_tmp.as_file().metadata()?.len(),
        )?;

        c_tmp.persist(&container_path).map_err(|e| e.error)?;
        if let Err(e) = m_tmp.persist(&meta_path) {
            let _ = fs::remove_file(&container_path);
            return Err(e.error.into());
        }
        tracing::info!(
            container = %container_path.display(),
            meta = %meta_path.display(),
            "wrote outputs"
        );
        Ok(EncodeOutput {
            container: container_path,
            meta: meta_path,
            report,
        })
    }
}

/// Encode with the default backends.
pub fn encode(input: &Path, out_dir: &Path, opts: &EncodeOptions) -> Result<EncodeOutput> {
    Encoder::new(opts.clone()).encode_file(input, out_dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_names_follow_basename() {
        let (c, m) = output_paths(Path::new("/data/in/big.bin"), Path::new("/out")).unwrap();
        assert_eq!(c, Path::new("/out/big.bin.cmp"));
        assert_eq!(m, Path::new("/out/big.bin.meta"));
        assert!(output_paths(Path::new("/"), Path::new("/out")).is_err());
    }

    #[test]
    fn in_memory_stream_reports_counts() {
        let data: Vec<u8> = (0..10_000u32).map(|i| (i % 7) as u8).collect();
        let opts = EncodeOptions {
            chunk_size: Some(4096),
            threads: Some(3),
            ..Default::default()
        };
        let (c, m, r) = Encoder::new(opts)
            .encode_stream(&data[..], data.len() as u64, Vec::new(), Vec::new())
            .unwrap();
        assert_eq!(r.chunk_count, 3);
        assert_eq!(r.compressed_chunks, 3);
        assert_eq!(r.container_bytes, c.len() as u64);
        assert_eq!(r.meta_bytes, m.len() as u64);
        assert_eq!(String::from_utf8(m).unwrap().lines().count(), 3);
    }

    #[test]
    fn truncated_input_is_short_read() {
        let data = vec![1u8; 100];
        let err = Encoder::new(EncodeOptions::default())
            .encode_stream(&data[..], 200, Vec::new(), Vec::new())
            .unwrap_err();
        assert!(matches!(err, ChunkpackError::ShortRead { .. }));
    }
}
