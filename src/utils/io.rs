//! File I/O primitives with consistent error handling.

use crate::error::{Error, Result};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Read file contents, tagging failures with the operation being attempted.
pub fn read_file(path: &Path, operation: &str) -> Result<String> {
    fs::read_to_string(path).map_err(|e| Error::from_io(&e, path, operation))
}

/// Write content to file atomically (write to .tmp, then rename).
///
/// Readers see either the old content or the new content, never a partial write.
pub fn write_file_atomic(path: &Path, content: &str, operation: &str) -> Result<()> {
    let parent = path.parent().ok_or_else(|| {
        Error::internal_io(
            format!("Invalid path: {}", path.display()),
            Some(operation.to_string()),
        )
    })?;

    let filename = path.file_name().ok_or_else(|| {
        Error::internal_io(
            format!("Invalid path: {}", path.display()),
            Some(operation.to_string()),
        )
    })?;

    let tmp_path = parent.join(format!("{}.tmp", filename.to_string_lossy()));

    fs::write(&tmp_path, content)
        .map_err(|e| Error::from_io(&e, path, &format!("{} (write temp)", operation)))?;

    fs::rename(&tmp_path, path)
        .map_err(|e| Error::from_io(&e, path, &format!("{} (rename)", operation)))?;

    Ok(())
}

pub fn read_json(path: &Path, operation: &str) -> Result<Value> {
    let raw = read_file(path, operation)?;
    serde_json::from_str(&raw)
        .map_err(|e| Error::internal_json(e.to_string(), Some(operation.to_string())))
}

/// Pretty-print `value` with a trailing newline, the way package managers write manifests.
pub fn write_json(path: &Path, value: &Value, operation: &str) -> Result<()> {
    let mut content = serde_json::to_string_pretty(value)
        .map_err(|e| Error::internal_json(e.to_string(), Some(operation.to_string())))?;
    content.push('\n');
    write_file_atomic(path, &content, operation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn read_file_succeeds_for_existing_file() {
        let mut temp = NamedTempFile::new().unwrap();
        writeln!(temp, "test content").unwrap();

        let content = read_file(temp.path(), "test read").unwrap();
        assert!(content.contains("test content"));
    }

    #[test]
    fn read_file_reports_operation_on_failure() {
        let err = read_file(Path::new("/nonexistent/path.txt"), "read manifest").unwrap_err();
        assert_eq!(err.code(), "ORBIT-I001");
        assert!(err.message().starts_with("read manifest: "));
    }

    #[cfg(unix)]
    #[test]
    fn write_into_read_only_directory_is_permission_denied() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        fs::set_permissions(dir.path(), fs::Permissions::from_mode(0o555)).unwrap();
        let path = dir.path().join(".prettierrc");

        let result = write_file_atomic(&path, "{}", "write config");
        fs::set_permissions(dir.path(), fs::Permissions::from_mode(0o755)).unwrap();

        // root ignores directory permissions.
        if let Err(err) = result {
            assert_eq!(err.code(), "ORBIT-F002");
            assert_eq!(err.exit_code(), 3);
            assert!(err.message().contains(".prettierrc"));
        }
    }

    #[test]
    fn atomic_write_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".prettierrc");
        write_file_atomic(&path, "{}", "write config").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "{}");
        assert!(!dir.path().join(".prettierrc.tmp").exists());
    }

    #[test]
    fn json_round_trips_with_trailing_newline() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("package.json");
        let value = serde_json::json!({ "name": "my-app", "scripts": { "dev": "vite" } });

        write_json(&path, &value, "write manifest").unwrap();
        assert!(fs::read_to_string(&path).unwrap().ends_with("}\n"));
        assert_eq!(read_json(&path, "read manifest").unwrap(), value);
    }

    #[test]
    fn invalid_json_is_internal_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("package.json");
        fs::write(&path, "{ not json").unwrap();

        let err = read_json(&path, "read manifest").unwrap_err();
        assert_eq!(err.exit_code(), 99);
    }
}
