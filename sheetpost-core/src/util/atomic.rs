use std::fs::File;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use super::hash_forward::HashingForward;
use crate::error::Result;

fn sibling_temp(path: &Path) -> std::io::Result<NamedTempFile> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    NamedTempFile::new_in(dir)
}

/// Replace `path` with `bytes` via a sibling temp file, so readers see
/// either the old contents or the new ones.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut tmp = sibling_temp(path)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Like [`write_atomic`], but hashes the bytes on their way to disk and
/// hands the digest to `accept` before the file is moved into place.
/// If `accept` fails the temp file is dropped and `path` is untouched.
/// On unix the file gets permission bits `mode`.
pub fn write_atomic_verified<F>(
    path: &Path,
    bytes: &[u8],
    mode: u32,
    accept: F,
) -> Result<blake3::Hash>
where
    F: FnOnce(&blake3::Hash) -> Result<()>,
{
    let mut tmp = sibling_temp(path)?;
    let mut hasher = blake3::Hasher::new();
    let mut fwd = HashingForward::new(tmp.as_file_mut(), &mut hasher);
    fwd.write_all(bytes)?;
    fwd.flush()?;
    debug_assert_eq!(fwd.written, bytes.len() as u64);
    drop(fwd);

    let digest = hasher.finalize();
    accept(&digest)?;

    set_mode(tmp.as_file(), mode)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(digest)
}

#[cfg(unix)]
fn set_mode(file: &File, mode: u32) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(std::fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
fn set_mode(_file: &File, _mode: u32) -> std::io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SheetError;

    #[test]
    fn replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("grid.bin");
        std::fs::write(&p, b"old contents").unwrap();
        write_atomic(&p, b"new").unwrap();
        assert_eq!(std::fs::read(&p).unwrap(), b"new");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn verified_write_reports_digest() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("out.bin");
        let digest = write_atomic_verified(&p, b"payload", 0o644, |_| Ok(())).unwrap();
        assert_eq!(digest, blake3::hash(b"payload"));
        assert_eq!(std::fs::read(&p).unwrap(), b"payload");
    }

    #[test]
    fn rejected_digest_leaves_no_file_behind() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("out.bin");
        let err = write_atomic_verified(&p, b"payload", 0o644, |_| {
            Err(SheetError::InvalidLayout("nope".into()))
        })
        .unwrap_err();
        assert!(matches!(err, SheetError::InvalidLayout(_)));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[cfg(unix)]
    #[test]
    fn verified_write_applies_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("run.sh");
        write_atomic_verified(&p, b"#!/bin/sh\n", 0o755, |_| Ok(())).unwrap();
        let mode = std::fs::metadata(&p).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }
}
