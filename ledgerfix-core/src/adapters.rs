//! Default filesystem-backed port implementations.

use crate::ports::{InputSource, WritePort};
use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;

/// Reads an input file from disk.
#[derive(Debug, Clone)]
pub struct FsInputSource {
    path: Utf8PathBuf,
}

impl FsInputSource {
    pub fn new(path: Utf8PathBuf) -> Self {
        Self { path }
    }
}

impl InputSource for FsInputSource {
    fn label(&self) -> &str {
        self.path.as_str()
    }

    fn exists(&self) -> bool {
        self.path.is_file()
    }

    fn read_bytes(&self) -> anyhow::Result<Vec<u8>> {
        fs::read(&self.path).with_context(|| format!("read {}", self.path))
    }
}

/// In-memory input for embedding and testing.
///
/// `missing` models an input path that does not exist.
#[derive(Debug, Clone)]
pub struct InMemoryInputSource {
    label: String,
    bytes: Option<Vec<u8>>,
}

impl InMemoryInputSource {
    pub fn new(label: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            label: label.into(),
            bytes: Some(bytes.into()),
        }
    }

    pub fn missing(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            bytes: None,
        }
    }
}

impl InputSource for InMemoryInputSource {
    fn label(&self) -> &str {
        &self.label
    }

    fn exists(&self) -> bool {
        self.bytes.is_some()
    }

    fn read_bytes(&self) -> anyhow::Result<Vec<u8>> {
        self.bytes
            .clone()
            .with_context(|| format!("{} does not exist", self.label))
    }
}

/// Filesystem write operations.
#[derive(Debug, Clone, Default)]
pub struct FsWritePort;

impl WritePort for FsWritePort {
    fn write_file(&self, path: &Utf8Path, contents: &[u8]) -> anyhow::Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_str().is_empty()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("create parent dir for {}", path))?;
        }
        fs::write(path, contents).with_context(|| format!("write {}", path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_root() -> (TempDir, Utf8PathBuf) {
        let temp = TempDir::new().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).expect("utf8");
        (temp, root)
    }

    #[test]
    fn fs_input_reads_existing_file() {
        let (_temp, root) = temp_root();
        let path = root.join("statement.csv");
        std::fs::write(&path, "日付,摘要\n").expect("write");

        let source = FsInputSource::new(path.clone());
        assert!(source.exists());
        assert_eq!(source.label(), path.as_str());
        assert_eq!(source.read_bytes().expect("read"), "日付,摘要\n".as_bytes());
    }

    #[test]
    fn fs_input_missing_file() {
        let (_temp, root) = temp_root();
        let source = FsInputSource::new(root.join("nope.csv"));
        assert!(!source.exists());
        let err = source.read_bytes().unwrap_err();
        assert!(format!("{:#}", err).contains("nope.csv"));
    }

    #[test]
    fn fs_input_directory_is_not_an_input() {
        let (_temp, root) = temp_root();
        assert!(!FsInputSource::new(root.clone()).exists());
    }

    #[test]
    fn in_memory_input() {
        let source = InMemoryInputSource::new("order.json", "[]");
        assert!(source.exists());
        assert_eq!(source.read_bytes().expect("read"), b"[]");

        let missing = InMemoryInputSource::missing("order.json");
        assert!(!missing.exists());
        assert!(missing.read_bytes().is_err());
    }

    #[test]
    fn fs_write_port_writes_and_creates_dirs() {
        let (_temp, root) = temp_root();
        let target = root.join("nested").join("fixed.csv");

        let port = FsWritePort;
        port.write_file(&target, b"hello").expect("write");

        let contents = std::fs::read_to_string(&target).expect("read");
        assert_eq!(contents, "hello");

        // Overwrites in place.
        port.write_file(&target, b"again").expect("rewrite");
        assert_eq!(std::fs::read_to_string(&target).expect("read"), "again");
    }
}
