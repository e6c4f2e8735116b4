use std::fs;
use std::path::Path;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadStatus {
    Ok,
    Unreadable,
}

/// One source file loaded for annotation. Immutable once constructed.
#[derive(Debug, Clone)]
pub struct SourceArtifact {
    /// Path relative to the scan root.
    pub id: String,
    pub text: String,
    pub status: ReadStatus,
}

/// Load one artifact. All I/O failure handling lives here: missing
/// files, permission errors, and non-UTF-8 content all surface as
/// `Unreadable` with empty text, never as an error the pipeline has to
/// branch on.
pub fn read_artifact(root: &Path, path: &Path) -> SourceArtifact {
    let id = path
        .strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .into_owned();

    match fs::read_to_string(path) {
        Ok(text) => {
            debug!("Read {} ({} chars)", id, text.len());
            SourceArtifact {
                id,
                text,
                status: ReadStatus::Ok,
            }
        }
        Err(e) => {
            warn!("Failed to read {}: {}", id, e);
            SourceArtifact {
                id,
                text: String::new(),
                status: ReadStatus::Unreadable,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_artifact_ok() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("Policy.java");
        let mut f = fs::File::create(&path).unwrap();
        writeln!(f, "public class Policy {{}}").unwrap();

        let artifact = read_artifact(dir.path(), &path);
        assert_eq!(artifact.id, "Policy.java");
        assert_eq!(artifact.status, ReadStatus::Ok);
        assert!(artifact.text.contains("class Policy"));
    }

    #[test]
    fn test_read_artifact_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("Missing.java");

        let artifact = read_artifact(dir.path(), &path);
        assert_eq!(artifact.status, ReadStatus::Unreadable);
        assert!(artifact.text.is_empty());
    }

    #[test]
    fn test_read_artifact_invalid_utf8() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("Binary.java");
        fs::write(&path, [0xff, 0xfe, 0x00, 0x80]).unwrap();

        let artifact = read_artifact(dir.path(), &path);
        assert_eq!(artifact.status, ReadStatus::Unreadable);
        assert!(artifact.text.is_empty());
    }

    #[test]
    fn test_read_artifact_nested_id_is_relative() {
        let dir = tempfile::TempDir::new().unwrap();
        let nested = dir.path().join("src").join("main");
        fs::create_dir_all(&nested).unwrap();
        let path = nested.join("App.java");
        fs::write(&path, "class App {}").unwrap();

        let artifact = read_artifact(dir.path(), &path);
        assert_eq!(artifact.id, "src/main/App.java");
    }
}
