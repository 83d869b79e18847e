//! Port traits abstracting all I/O away from the pipeline.

use camino::Utf8Path;

/// One named input: the ledger table or the reference ordering.
pub trait InputSource {
    /// Display name; for file inputs, the path. The reference format is chosen from it.
    fn label(&self) -> &str;

    fn exists(&self) -> bool;

    fn read_bytes(&self) -> anyhow::Result<Vec<u8>>;
}

/// File-system write operations.
pub trait WritePort {
    /// Write `contents` to `path`, creating missing parent directories.
    fn write_file(&self, path: &Utf8Path, contents: &[u8]) -> anyhow::Result<()>;
}
