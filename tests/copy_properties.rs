//! Byte-for-byte fidelity of the stream copier

use proptest::prelude::*;
use streamcopy::fs::{copy_file_using_stream, COPY_BUFFER_SIZE};
use tempfile::TempDir;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn copy_preserves_contents(contents in proptest::collection::vec(any::<u8>(), 0..(COPY_BUFFER_SIZE * 5))) {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("src.bin");
        let dst = dir.path().join("dst.bin");
        std::fs::write(&src, &contents).unwrap();

        let stats = copy_file_using_stream(&src, &dst).unwrap();

        let copied = std::fs::read(&dst).unwrap();
        prop_assert_eq!(stats.bytes_copied, contents.len() as u64);
        prop_assert_eq!(copied.len(), contents.len());
        prop_assert_eq!(copied, contents);
    }

    #[test]
    fn chunk_count_bounded_by_buffer(len in 0usize..(COPY_BUFFER_SIZE * 4)) {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("src.bin");
        let dst = dir.path().join("dst.bin");
        std::fs::write(&src, vec![7u8; len]).unwrap();

        let stats = copy_file_using_stream(&src, &dst).unwrap();

        let min_chunks = len.div_ceil(COPY_BUFFER_SIZE) as u64;
        prop_assert!(stats.chunks >= min_chunks);
        prop_assert_eq!(stats.chunks == 0, len == 0);
    }
}
