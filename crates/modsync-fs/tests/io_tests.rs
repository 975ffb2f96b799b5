use modsync_fs::{NormalizedPath, io};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_write_atomic_creates_file_and_parents() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("nested/dir/test.txt"));

    io::write_atomic(&path, b"hello world").unwrap();

    let content = fs::read_to_string(path.to_native()).unwrap();
    assert_eq!(content, "hello world");
}

#[test]
fn test_write_atomic_overwrites_existing() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("test.txt");
    fs::write(&file_path, "original").unwrap();

    let path = NormalizedPath::new(&file_path);
    io::write_atomic(&path, b"updated").unwrap();

    assert_eq!(fs::read_to_string(&file_path).unwrap(), "updated");
}

#[cfg(unix)]
#[test]
fn test_write_atomic_keeps_existing_mode() {
    use std::os::unix::fs::PermissionsExt;

    let temp = TempDir::new().unwrap();
    let exec = temp.path().join("run.sh");
    let locked = temp.path().join("locked.txt");
    fs::write(&exec, "#!/bin/sh\n").unwrap();
    fs::write(&locked, "old").unwrap();
    fs::set_permissions(&exec, fs::Permissions::from_mode(0o755)).unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o444)).unwrap();

    io::write_atomic(&NormalizedPath::new(&exec), b"#!/bin/sh\necho new\n").unwrap();
    io::write_atomic(&NormalizedPath::new(&locked), b"new").unwrap();

    let mode_of = |p: &std::path::Path| fs::metadata(p).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode_of(&exec), 0o755);
    assert_eq!(mode_of(&locked), 0o644);
    assert_eq!(fs::read_to_string(&locked).unwrap(), "new");
}

#[test]
fn test_write_atomic_leaves_no_temp_files() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("test.txt"));

    io::write_atomic(&path, b"content").unwrap();

    let names: Vec<String> = fs::read_dir(temp.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    assert_eq!(names, vec!["test.txt".to_string()]);
}

#[test]
fn test_read_text_nonexistent_file() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("missing.txt"));
    assert!(io::read_text(&path).is_err());
}

#[test]
fn test_copy_file_creates_parents() {
    let temp = TempDir::new().unwrap();
    let source = NormalizedPath::new(temp.path().join("a.txt"));
    fs::write(source.to_native(), "pristine").unwrap();
    let dest = NormalizedPath::new(temp.path().join("bak/deep/a.txt"));

    let bytes = io::copy_file(&source, &dest).unwrap();

    assert_eq!(bytes, 8);
    assert_eq!(fs::read_to_string(dest.to_native()).unwrap(), "pristine");
}

#[test]
fn test_copy_file_missing_source_errors() {
    let temp = TempDir::new().unwrap();
    let source = NormalizedPath::new(temp.path().join("missing.txt"));
    let dest = NormalizedPath::new(temp.path().join("bak/missing.txt"));
    assert!(io::copy_file(&source, &dest).is_err());
}

#[test]
fn test_clear_readonly_missing_file_is_noop() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("missing.txt"));
    assert!(!io::clear_readonly(&path).unwrap());
}

#[test]
fn test_clear_readonly_makes_file_writable() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("locked.txt");
    fs::write(&file_path, "old").unwrap();
    let mut perms = fs::metadata(&file_path).unwrap().permissions();
    perms.set_readonly(true);
    fs::set_permissions(&file_path, perms).unwrap();

    let path = NormalizedPath::new(&file_path);
    assert!(io::clear_readonly(&path).unwrap());
    assert!(!fs::metadata(&file_path).unwrap().permissions().readonly());

    io::write_atomic(&path, b"new").unwrap();
    assert_eq!(fs::read_to_string(&file_path).unwrap(), "new");
}
