//! End-to-end decoding tests over synthetic files on disk.
