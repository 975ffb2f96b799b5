//! Atomic I/O operations with file locking

use std::fs::{self, OpenOptions};
use std::io::Write;
use fs2::FileExt;
use crate::{Error, NormalizedPath, Result};

/// Write content atomically to a file with locking.
///
/// Uses write-to-temp-then-rename strategy to prevent partial writes.
/// Acquires an advisory lock on the temp file while it is being filled.
pub fn write_atomic(path: &NormalizedPath, content: &[u8]) -> Result<()> {
    let native_path = path.to_native();

    if let Some(parent) = native_path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    // Temp file lives next to the target so the rename stays on one filesystem
    let temp_name = format!(
        ".{}.{}.tmp",
        native_path.file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default(),
        std::process::id()
    );
    let temp_path = native_path.with_file_name(&temp_name);

    let mut temp_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&temp_path)
        .map_err(|e| Error::io(&temp_path, e))?;

    // Replacing by rename must not reset the target's mode bits
    if let Ok(existing) = fs::metadata(&native_path)
        && existing.is_file()
        && let Err(e) = temp_file.set_permissions(writable(existing.permissions()))
    {
        let _ = fs::remove_file(&temp_path);
        return Err(Error::io(&temp_path, e));
    }

    temp_file.lock_exclusive()
        .map_err(|_| Error::LockFailed { path: native_path.clone() })?;

    let written = temp_file
        .write_all(content)
        .and_then(|_| temp_file.sync_all());
    if let Err(e) = written {
        let _ = fs::remove_file(&temp_path);
        return Err(Error::io(&temp_path, e));
    }

    temp_file.unlock()
        .map_err(|_| Error::LockFailed { path: native_path.clone() })?;
    drop(temp_file);

    if let Err(e) = fs::rename(&temp_path, &native_path) {
        let _ = fs::remove_file(&temp_path);
        return Err(Error::io(&native_path, e));
    }

    Ok(())
}

/// Read text content from a file.
pub fn read_text(path: &NormalizedPath) -> Result<String> {
    let native_path = path.to_native();
    fs::read_to_string(&native_path)
        .map_err(|e| Error::io(&native_path, e))
}

/// Write text content to a file atomically.
pub fn write_text(path: &NormalizedPath, content: &str) -> Result<()> {
    write_atomic(path, content.as_bytes())
}

/// Copy a file byte-for-byte, creating the destination's parent directories.
pub fn copy_file(source: &NormalizedPath, dest: &NormalizedPath) -> Result<u64> {
    let dest_native = dest.to_native();
    if let Some(parent) = dest_native.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }
    fs::copy(source.to_native(), &dest_native).map_err(|e| Error::io(source.to_native(), e))
}

/// Make an existing file writable. Missing files are left alone.
///
/// Returns true when the permission bits were changed.
pub fn clear_readonly(path: &NormalizedPath) -> Result<bool> {
    let native_path = path.to_native();
    let metadata = match fs::metadata(&native_path) {
        Ok(m) if m.is_file() => m,
        Ok(_) => return Ok(false),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(Error::io(&native_path, e)),
    };

    let permissions = metadata.permissions();
    if !permissions.readonly() {
        return Ok(false);
    }

    fs::set_permissions(&native_path, writable(permissions)).map_err(|e| Error::io(&native_path, e))?;
    tracing::debug!(path = %path, "Cleared read-only attribute");
    Ok(true)
}

/// `permissions` with the owner write bit set and everything else kept.
fn writable(mut permissions: fs::Permissions) -> fs::Permissions {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        permissions.set_mode(permissions.mode() | 0o200);
    }
    #[cfg(not(unix))]
    #[allow(clippy::permissions_set_readonly_false)]
    permissions.set_readonly(false);
    permissions
}
