//! Confinement of user-supplied paths to a base directory.

use std::env;
use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::error::{Error, FilesystemError, Result};

/// Lexically normalize a path: drop `.`, apply `..` against preceding
/// components, never climb above the root.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => out.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            Component::Normal(part) => out.push(part),
        }
    }
    out
}

fn absolute(path: &Path) -> Option<PathBuf> {
    if path.is_absolute() {
        Some(normalize(path))
    } else {
        env::current_dir().ok().map(|cwd| normalize(&cwd.join(path)))
    }
}

/// Resolve `target` against `base` and return it only if it stays inside `base`.
///
/// The containment check runs on the fully resolved path, so `..` segments and
/// absolute targets cannot escape. Returns `None` on violation; callers must
/// abort rather than fall back to a default.
pub fn resolve_safe(base: &Path, target: &str) -> Option<PathBuf> {
    let base = absolute(base)?;
    let resolved = normalize(&base.join(target));

    // Path::starts_with compares whole components, i.e. `base` + separator.
    if resolved == base || resolved.starts_with(&base) {
        Some(resolved)
    } else {
        None
    }
}

/// Check that `name` can become a new project directory under `base`.
///
/// Read-only: nothing is created. Order: containment, then the path must not
/// exist, then its parent must be a writable directory.
pub fn ensure_safe_project_dir(name: &str, base: &Path) -> Result<PathBuf> {
    let path = resolve_safe(base, name).ok_or_else(|| {
        Error::Filesystem(FilesystemError::PathTraversal {
            target: name.to_string(),
        })
    })?;

    if fs::symlink_metadata(&path).is_ok() {
        return Err(Error::Filesystem(FilesystemError::AlreadyExists {
            path: name.to_string(),
        }));
    }

    let parent = path.parent().unwrap_or(&path);
    if !is_writable_dir(parent) {
        return Err(Error::Filesystem(FilesystemError::NotWritable {
            path: parent.display().to_string(),
        }));
    }

    Ok(path)
}

pub fn is_writable_dir(path: &Path) -> bool {
    match fs::metadata(path) {
        Ok(meta) if meta.is_dir() => has_write_access(path, &meta),
        _ => false,
    }
}

#[cfg(unix)]
fn has_write_access(path: &Path, _meta: &fs::Metadata) -> bool {
    use std::ffi::CString;
    use std::os::unix::ffi::OsStrExt;

    let Ok(c_path) = CString::new(path.as_os_str().as_bytes()) else {
        return false;
    };
    // SAFETY: c_path is a valid NUL-terminated string for the duration of the call.
    unsafe { libc::access(c_path.as_ptr(), libc::W_OK) == 0 }
}

#[cfg(not(unix))]
fn has_write_access(_path: &Path, meta: &fs::Metadata) -> bool {
    !meta.permissions().readonly()
}
