//! Integration tests for `GlobDiskUsage`
//!
//! These tests create temporary file structures and enumerate them with the
//! native walker, the same way `sizekit du` does.

use std::fs;
use std::path::Path;
use tempfile::TempDir;

use sizekit::config::SizeMode;
use sizekit::usage::{DiskUsageEntry, GlobDiskUsage};
use sizekit::{WalkError, WalkWarning};

/// Helper function to create a temporary directory structure for testing
fn create_test_directory() -> TempDir {
    TempDir::new().expect("Failed to create temporary directory")
}

/// Helper function to create a file of `len` bytes
fn create_file(path: &Path, len: usize) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create parent directories");
    }
    fs::write(path, vec![b'x'; len]).expect("Failed to write file");
}

/// Enumerate `dir` and collect everything, entries sorted by name.
fn collect(
    mode: SizeMode,
    pattern: &str,
    dir: &Path,
) -> (Vec<DiskUsageEntry>, Vec<WalkWarning>) {
    let usage = GlobDiskUsage::native(mode);
    let mut iter = usage
        .enumerate(pattern, Some(dir))
        .expect("enumeration should start");
    let mut entries: Vec<_> = iter.by_ref().collect();
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    (entries, iter.drain_warnings())
}

fn names(entries: &[DiskUsageEntry]) -> Vec<&str> {
    entries.iter().map(|e| e.name.as_str()).collect()
}

#[test]
fn test_star_includes_dotfiles() {
    let temp_dir = create_test_directory();
    for name in [".a", ".b", "c"] {
        create_file(&temp_dir.path().join(name), 1);
    }

    let (entries, warnings) = collect(SizeMode::Apparent, "*", temp_dir.path());

    assert_eq!(names(&entries), vec![".a", ".b", "c"]);
    assert!(warnings.is_empty());
}

#[test]
fn test_default_pattern_selects_only_dotfiles() {
    let temp_dir = create_test_directory();
    for name in [".a", ".b", "c"] {
        create_file(&temp_dir.path().join(name), 1);
    }

    let (entries, _) = collect(SizeMode::Apparent, ".*", temp_dir.path());

    assert_eq!(names(&entries), vec![".a", ".b"]);
}

#[test]
fn test_empty_directory_yields_nothing() {
    let temp_dir = create_test_directory();

    let (entries, warnings) = collect(SizeMode::Allocated, ".*", temp_dir.path());

    assert!(entries.is_empty());
    assert!(warnings.is_empty());
}

#[test]
fn test_home_directory_scenario() {
    let temp_dir = create_test_directory();
    let base = temp_dir.path();
    create_file(&base.join(".git/HEAD"), 23);
    create_file(&base.join(".git/config"), 92);
    create_file(&base.join(".git/objects/ab/cdef"), 4000);
    create_file(&base.join(".bashrc"), 220);
    create_file(&base.join("notes.txt"), 10);

    let (entries, warnings) = collect(SizeMode::Apparent, ".*", base);

    assert_eq!(names(&entries), vec![".bashrc", ".git"]);
    assert!(warnings.is_empty());

    let bashrc = &entries[0];
    assert_eq!(bashrc.size_bytes, 220);
    assert!(!bashrc.is_dir);
    assert_eq!(bashrc.path, base.join(".bashrc"));

    let git = &entries[1];
    assert_eq!(git.size_bytes, 23 + 92 + 4000);
    assert!(git.is_dir);
}

#[test]
fn test_apparent_directory_total_is_sum_of_files() {
    let temp_dir = create_test_directory();
    let root = temp_dir.path().join(".cache");
    let mut expected = 0;
    for i in 0..5 {
        for j in 0..3 {
            let len = 100 * i + j + 1;
            create_file(&root.join(format!("d{i}/e{j}/blob")), len);
            expected += len as u64;
        }
    }
    fs::create_dir_all(root.join("empty/nested")).unwrap();

    let (entries, _) = collect(SizeMode::Apparent, ".cache", temp_dir.path());

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].size_bytes, expected);
}

#[test]
#[cfg(unix)]
fn test_allocated_size_matches_block_count() {
    use std::os::unix::fs::MetadataExt;

    let temp_dir = create_test_directory();
    let root = temp_dir.path().join(".local");
    create_file(&root.join("share/a"), 10);
    create_file(&root.join("share/b"), 70_000);
    create_file(&root.join("state/c"), 4097);

    let expected: u64 = walkdir::WalkDir::new(&root)
        .follow_links(false)
        .into_iter()
        .map(|e| e.unwrap().metadata().unwrap().blocks() * 512)
        .sum();

    let (entries, _) = collect(SizeMode::Allocated, ".local", temp_dir.path());

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].size_bytes, expected);
}

#[test]
fn test_entries_are_produced_lazily() {
    let temp_dir = create_test_directory();
    for i in 0..4 {
        create_file(&temp_dir.path().join(format!(".f{i}")), 1);
    }

    let usage = GlobDiskUsage::native(SizeMode::Apparent);
    let mut iter = usage.enumerate(".*", Some(temp_dir.path())).unwrap();

    let first = iter.next().expect("at least one entry");
    // Entries not yet reached can still change before they are sized
    let remaining: Vec<_> = fs::read_dir(temp_dir.path())
        .unwrap()
        .map(|e| e.unwrap().path())
        .filter(|p| p.file_name().unwrap() != first.name.as_str())
        .collect();
    for path in &remaining {
        fs::write(path, vec![b'y'; 50]).unwrap();
    }

    let rest: Vec<_> = iter.collect();
    assert_eq!(rest.len(), 3);
    assert!(rest.iter().all(|e| e.size_bytes == 50));
}

/// Remove every permission bit from `dir`.
///
/// Returns `false`, with the permissions restored and a note on stderr, when
/// the directory stays readable anyway (running as root, or a filesystem that
/// ignores mode bits). The calling test then has nothing to check.
#[cfg(unix)]
fn lock_dir(dir: &Path, test: &str) -> bool {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(dir, fs::Permissions::from_mode(0o000)).unwrap();
    if fs::read_dir(dir).is_err() {
        return true;
    }

    fs::set_permissions(dir, fs::Permissions::from_mode(0o755)).unwrap();
    eprintln!(
        "SKIPPED {test}: {} is still readable with mode 000 (running as root?)",
        dir.display()
    );
    false
}

#[test]
#[cfg(unix)]
fn test_unreadable_subdirectory_is_a_warning() {
    use std::os::unix::fs::PermissionsExt;

    let temp_dir = create_test_directory();
    let cache = temp_dir.path().join(".cache");
    create_file(&cache.join("ok/file"), 300);
    create_file(&cache.join("locked/secret"), 5000);
    create_file(&temp_dir.path().join(".profile"), 40);
    let locked = cache.join("locked");

    if !lock_dir(&locked, "test_unreadable_subdirectory_is_a_warning") {
        return;
    }

    let (entries, warnings) = collect(SizeMode::Apparent, ".*", temp_dir.path());
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    assert_eq!(names(&entries), vec![".cache", ".profile"]);
    assert_eq!(entries[0].size_bytes, 300);
    assert_eq!(entries[1].size_bytes, 40);
    assert_eq!(
        warnings,
        vec![WalkWarning::PermissionDenied { path: locked }]
    );
}

#[test]
#[cfg(unix)]
fn test_unreadable_matched_entry_is_skipped() {
    use std::os::unix::fs::PermissionsExt;

    let temp_dir = create_test_directory();
    let private = temp_dir.path().join(".private");
    create_file(&private.join("key"), 10);
    create_file(&temp_dir.path().join(".public"), 20);

    if !lock_dir(&private, "test_unreadable_matched_entry_is_skipped") {
        return;
    }

    let (entries, warnings) = collect(SizeMode::Apparent, ".*", temp_dir.path());
    fs::set_permissions(&private, fs::Permissions::from_mode(0o755)).unwrap();

    assert_eq!(names(&entries), vec![".public"]);
    assert_eq!(
        warnings,
        vec![WalkWarning::PermissionDenied { path: private }]
    );
}

#[test]
#[cfg(unix)]
fn test_symlink_to_large_directory_adds_nothing() {
    let temp_dir = create_test_directory();
    let big = temp_dir.path().join("big");
    create_file(&big.join("blob"), 1_000_000);
    let config = temp_dir.path().join(".config");
    create_file(&config.join("settings"), 64);
    std::os::unix::fs::symlink(&big, config.join("big-link")).unwrap();
    std::os::unix::fs::symlink(&big, temp_dir.path().join(".big-link")).unwrap();

    let (entries, warnings) = collect(SizeMode::Apparent, ".*", temp_dir.path());
    assert!(warnings.is_empty());

    let link_len = |p: &Path| fs::symlink_metadata(p).unwrap().len();

    let config_entry = entries.iter().find(|e| e.name == ".config").unwrap();
    assert_eq!(
        config_entry.size_bytes,
        64 + link_len(&config.join("big-link"))
    );

    let link_entry = entries.iter().find(|e| e.name == ".big-link").unwrap();
    assert!(!link_entry.is_dir);
    assert_eq!(
        link_entry.size_bytes,
        link_len(&temp_dir.path().join(".big-link"))
    );
}

#[test]
fn test_on_warning_callback_sees_warnings() {
    let temp_dir = create_test_directory();
    create_file(&temp_dir.path().join(".a"), 1);

    let mut seen = Vec::new();
    let usage = GlobDiskUsage::native(SizeMode::Apparent);
    let count = usage
        .enumerate(".*", Some(temp_dir.path()))
        .unwrap()
        .on_warning(|w| seen.push(w.clone()))
        .count();

    assert_eq!(count, 1);
    assert!(seen.is_empty());
}

#[test]
fn test_missing_base_dir_is_fatal() {
    let temp_dir = create_test_directory();
    let missing = temp_dir.path().join("nope");

    let usage = GlobDiskUsage::native(SizeMode::Allocated);
    let err = usage.enumerate(".*", Some(&missing)).unwrap_err();

    match err {
        WalkError::BaseDirNotFound { path } => assert_eq!(path, missing),
        other => panic!("expected BaseDirNotFound, got {other:?}"),
    }
}

#[test]
fn test_file_as_base_dir_is_not_readable() {
    let temp_dir = create_test_directory();
    let file = temp_dir.path().join("plain.txt");
    create_file(&file, 3);

    let usage = GlobDiskUsage::native(SizeMode::Allocated);
    let err = usage.enumerate("*", Some(&file)).unwrap_err();

    assert!(
        matches!(err, WalkError::BaseDirNotReadable { .. }),
        "{err:?}"
    );
}

#[test]
fn test_invalid_pattern_is_fatal() {
    let temp_dir = create_test_directory();

    let usage = GlobDiskUsage::native(SizeMode::Allocated);
    let err = usage.enumerate("[", Some(temp_dir.path())).unwrap_err();

    assert!(matches!(err, WalkError::InvalidPattern { .. }), "{err:?}");
}
