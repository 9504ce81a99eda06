//! Buffered stream copy
//!
//! Moves bytes from a source file to a destination file through a fixed
//! 1024-byte buffer. Both handles are owned by the copy call and closed when
//! it returns, on success and on every error path.

use crate::error::{IoResultExt, Result, StreamCopyError};
use std::fs::File;
use std::io::{ErrorKind, Read, Write};
use std::path::Path;
use std::time::{Duration, Instant};

/// Size of the copy buffer in bytes
pub const COPY_BUFFER_SIZE: usize = 1024;

/// Copy operation statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CopyStats {
    /// Bytes copied
    pub bytes_copied: u64,
    /// Number of buffer fills written to the destination
    pub chunks: u64,
    /// Duration of the copy
    pub duration: Duration,
}

impl CopyStats {
    /// Throughput in bytes/second
    pub fn throughput(&self) -> f64 {
        let secs = self.duration.as_secs_f64();
        if secs > 0.0 {
            self.bytes_copied as f64 / secs
        } else {
            0.0
        }
    }
}

/// Copy `source` to `dest` through a fixed-size buffer.
///
/// The source is opened before the destination, so a missing source never
/// creates (or truncates) the destination. An existing destination is
/// truncated. Bytes already written stay on disk if a later read or write
/// fails.
///
/// Failures are logged here and returned to the caller.
pub fn copy_file_using_stream(source: &Path, dest: &Path) -> Result<CopyStats> {
    let result = stream_copy(source, dest);

    match &result {
        Ok(stats) => tracing::debug!(
            "Copied {} -> {} ({} in {} chunks, {}/s)",
            source.display(),
            dest.display(),
            humansize::format_size(stats.bytes_copied, humansize::BINARY),
            stats.chunks,
            humansize::format_size(stats.throughput() as u64, humansize::BINARY)
        ),
        Err(e) => tracing::error!(
            source = %source.display(),
            dest = %dest.display(),
            "Copy failed: {}",
            e
        ),
    }

    result
}

fn stream_copy(source: &Path, dest: &Path) -> Result<CopyStats> {
    let start = Instant::now();

    let mut reader = File::open(source).with_path(source)?;
    let mut writer = File::create(dest).with_path(dest)?;

    let mut buffer = [0u8; COPY_BUFFER_SIZE];
    let mut stats = CopyStats::default();

    loop {
        let bytes_read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(StreamCopyError::io(source, e)),
        };

        writer
            .write_all(&buffer[..bytes_read])
            .with_path(dest)?;

        stats.bytes_copied += bytes_read as u64;
        stats.chunks += 1;
    }

    writer.flush().with_path(dest)?;
    stats.duration = start.elapsed();

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    /// Log sink shared between a test and its subscriber
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .finish();

        let value = tracing::subscriber::with_default(subscriber, f);
        (value, logs.contents())
    }

    fn create_test_file(dir: &Path, name: &str, contents: &[u8]) -> std::path::PathBuf {
        let path = dir.join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(contents).unwrap();
        path
    }

    #[test]
    fn test_copy_small_file() {
        let dir = TempDir::new().unwrap();
        let src = create_test_file(dir.path(), "source.txt", b"hello");
        let dst = dir.path().join("destination.txt");

        let stats = copy_file_using_stream(&src, &dst).unwrap();

        assert_eq!(stats.bytes_copied, 5);
        assert_eq!(stats.chunks, 1);
        assert_eq!(std::fs::read(&dst).unwrap(), b"hello");
    }

    #[test]
    fn test_copy_empty_file() {
        let dir = TempDir::new().unwrap();
        let src = create_test_file(dir.path(), "empty.txt", b"");
        let dst = dir.path().join("empty_copy.txt");

        let stats = copy_file_using_stream(&src, &dst).unwrap();

        assert_eq!(stats.bytes_copied, 0);
        assert_eq!(stats.chunks, 0);
        assert!(dst.exists());
        assert_eq!(std::fs::metadata(&dst).unwrap().len(), 0);
    }

    #[test]
    fn test_copy_spans_multiple_buffers() {
        let dir = TempDir::new().unwrap();
        let contents: Vec<u8> = (0..(COPY_BUFFER_SIZE * 3 + 17))
            .map(|i| (i % 251) as u8)
            .collect();
        let src = create_test_file(dir.path(), "large.bin", &contents);
        let dst = dir.path().join("large_copy.bin");

        let stats = copy_file_using_stream(&src, &dst).unwrap();

        assert_eq!(stats.bytes_copied, contents.len() as u64);
        assert!(stats.chunks >= 4);
        assert_eq!(std::fs::read(&dst).unwrap(), contents);
    }

    #[test]
    fn test_copy_truncates_existing_destination() {
        let dir = TempDir::new().unwrap();
        let src = create_test_file(dir.path(), "short.txt", b"abc");
        let dst = create_test_file(dir.path(), "long.txt", b"a much longer previous content");

        copy_file_using_stream(&src, &dst).unwrap();

        assert_eq!(std::fs::read(&dst).unwrap(), b"abc");
    }

    #[test]
    fn test_missing_source_leaves_no_destination() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("missing.txt");
        let dst = dir.path().join("never.txt");

        let err = copy_file_using_stream(&src, &dst).unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(err.path().unwrap(), &src);
        assert!(!dst.exists());
    }

    #[test]
    fn test_missing_source_logs_error() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("missing.txt");
        let dst = dir.path().join("never.txt");

        let (result, logs) = capture_logs(|| copy_file_using_stream(&src, &dst));

        assert!(result.is_err());
        assert!(logs.contains("ERROR"), "no error event in: {}", logs);
        assert!(logs.contains("Copy failed"));
        assert!(logs.contains("missing.txt"));
    }

    #[test]
    fn test_successful_copy_logs_no_error() {
        let dir = TempDir::new().unwrap();
        let src = create_test_file(dir.path(), "source.txt", b"fine");
        let dst = dir.path().join("destination.txt");

        let (result, logs) = capture_logs(|| copy_file_using_stream(&src, &dst));

        assert!(result.is_ok());
        assert!(!logs.contains("ERROR"));
        assert!(logs.contains("Copied"));
    }

    #[test]
    fn test_unwritable_destination_reports_dest_path() {
        let dir = TempDir::new().unwrap();
        let src = create_test_file(dir.path(), "source.txt", b"data");
        let dst = dir.path().join("no/such/dir/out.txt");

        let err = copy_file_using_stream(&src, &dst).unwrap_err();

        assert!(matches!(err, StreamCopyError::Io { .. }));
        assert_eq!(err.path().unwrap(), &dst);
    }

    #[test]
    fn test_throughput_zero_duration() {
        let stats = CopyStats {
            bytes_copied: 10,
            chunks: 1,
            duration: Duration::ZERO,
        };
        assert_eq!(stats.throughput(), 0.0);
    }
}
