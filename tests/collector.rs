//! Tests for directory scans

mod common;

use std::fs::{self, File};
use std::time::{Duration, SystemTime};

use common::{names, touch, write_png};
use folio::collector::{
    same_file, scan_one, scan_recursive, scan_subsequent_siblings, ScanOutcome, ScanRequest,
};
use folio::error::ScanError;
use tempfile::TempDir;

const GRAY: [u8; 4] = [90, 90, 90, 255];

// ============================================================================
// Single directory
// ============================================================================

#[test]
fn test_scan_one_orders_pages() {
    let dir = TempDir::new().unwrap();
    for name in ["10.png", "2.png", "1.png", "cover.png"] {
        write_png(&dir.path().join(name), 4, 4, GRAY);
    }

    let collection = scan_one(dir.path()).unwrap();
    assert_eq!(
        names(&collection),
        vec!["1.png", "2.png", "10.png", "cover.png"]
    );
}

#[test]
fn test_scan_one_skips_other_files_and_subdirectories() {
    let dir = TempDir::new().unwrap();
    write_png(&dir.path().join("1.png"), 4, 4, GRAY);
    touch(&dir.path().join("notes.txt"));
    touch(&dir.path().join("README"));
    write_png(&dir.path().join("nested/2.png"), 4, 4, GRAY);
    // A directory named like an image is not an image
    fs::create_dir(dir.path().join("fake.jpg")).unwrap();

    let collection = scan_one(dir.path()).unwrap();
    assert_eq!(names(&collection), vec!["1.png"]);
}

#[test]
fn test_scan_one_puts_videos_after_images() {
    let dir = TempDir::new().unwrap();
    touch(&dir.path().join("1.mp4"));
    write_png(&dir.path().join("5.png"), 4, 4, GRAY);
    touch(&dir.path().join("clip.MOV"));

    let collection = scan_one(dir.path()).unwrap();
    assert_eq!(names(&collection), vec!["5.png", "1.mp4", "clip.MOV"]);
    assert!(collection.get(0).unwrap().is_image());
    assert!(collection.get(1).unwrap().is_video());
}

#[test]
fn test_scan_one_orders_unnumbered_by_modification_time() {
    let dir = TempDir::new().unwrap();
    let base = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);
    for (name, age) in [("alpha.png", 10), ("zeta.png", 1_000), ("mid.png", 100)] {
        let path = dir.path().join(name);
        write_png(&path, 4, 4, GRAY);
        let file = File::options().write(true).open(&path).unwrap();
        file.set_modified(base - Duration::from_secs(age)).unwrap();
    }
    write_png(&dir.path().join("7.png"), 4, 4, GRAY);

    let collection = scan_one(dir.path()).unwrap();
    assert_eq!(
        names(&collection),
        vec!["7.png", "zeta.png", "mid.png", "alpha.png"]
    );
}

#[test]
fn test_scan_one_empty_directory() {
    let dir = TempDir::new().unwrap();
    let collection = scan_one(dir.path()).unwrap();
    assert!(collection.is_empty());
}

#[test]
fn test_scan_one_missing_directory_fails() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("gone");
    let err = scan_one(&missing).unwrap_err();
    assert!(matches!(err, ScanError::NotFound { .. }));
    assert_eq!(err.path(), missing.as_path());
}

#[test]
fn test_scan_one_rejects_files() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("1.png");
    write_png(&file, 4, 4, GRAY);
    assert!(matches!(
        scan_one(&file),
        Err(ScanError::NotADirectory { .. })
    ));
}

// ============================================================================
// Recursive
// ============================================================================

#[test]
fn test_recursive_orders_directories_by_date() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write_png(&root.join("2024-02-01/1.png"), 4, 4, GRAY);
    write_png(&root.join("2024-01-05/1.png"), 4, 4, GRAY);
    write_png(&root.join("2024-01-05/2.png"), 4, 4, GRAY);
    write_png(&root.join("0.png"), 4, 4, GRAY);

    let collection = scan_recursive(root).unwrap();
    let paths: Vec<_> = collection
        .iter()
        .map(|e| e.path().strip_prefix(root).unwrap().to_path_buf())
        .collect();
    assert_eq!(
        paths,
        vec![
            "0.png".into(),
            std::path::PathBuf::from("2024-01-05/1.png"),
            "2024-01-05/2.png".into(),
            "2024-02-01/1.png".into(),
        ]
    );
}

#[test]
fn test_recursive_keeps_each_directory_images_before_videos() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    touch(&root.join("2024-01-01/a.mp4"));
    write_png(&root.join("2024-01-01/1.png"), 4, 4, GRAY);
    write_png(&root.join("2024-01-02/1.png"), 4, 4, GRAY);

    let collection = scan_recursive(root).unwrap();
    assert_eq!(collection.image_count(), 2);
    assert_eq!(collection.video_count(), 1);
    // Every image is navigated before any video
    assert!(collection.get(2).unwrap().is_video());
}

#[cfg(unix)]
#[test]
fn test_recursive_skips_unreadable_subdirectory() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write_png(&root.join("2024-01-01/1.png"), 4, 4, GRAY);
    write_png(&root.join("2024-01-02/1.png"), 4, 4, GRAY);
    write_png(&root.join("2024-01-03/1.png"), 4, 4, GRAY);

    let locked = root.join("2024-01-02");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
    if fs::read_dir(&locked).is_ok() {
        // Running as root: permissions are not enforced
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let result = scan_recursive(root);
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    let collection = result.unwrap();
    let paths: Vec<_> = collection
        .iter()
        .map(|e| e.path().strip_prefix(root).unwrap().to_path_buf())
        .collect();
    assert_eq!(
        paths,
        vec![
            std::path::PathBuf::from("2024-01-01/1.png"),
            "2024-01-03/1.png".into(),
        ]
    );
}

#[test]
fn test_recursive_request_counts_directories() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write_png(&root.join("a/1.png"), 4, 4, GRAY);
    fs::create_dir_all(root.join("b/c")).unwrap();

    let outcome = ScanRequest::Recursive(root.to_path_buf()).run().unwrap();
    let ScanOutcome::Loaded {
        collection,
        directories,
    } = outcome
    else {
        panic!("expected a loaded outcome");
    };
    assert_eq!(collection.len(), 1);
    assert_eq!(directories, 4);
}

// ============================================================================
// Subsequent siblings
// ============================================================================

fn sibling_library() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write_png(&root.join("2024-01-01/1.png"), 4, 4, GRAY);
    write_png(&root.join("2024-01-02/1.png"), 4, 4, GRAY);
    write_png(&root.join("2024-01-02/extra/2.png"), 4, 4, GRAY);
    write_png(&root.join("2024-01-03/1.png"), 4, 4, GRAY);
    dir
}

#[test]
fn test_siblings_after_current() {
    let dir = sibling_library();
    let root = dir.path();

    let outcome = scan_subsequent_siblings(&root.join("2024-01-01"), root).unwrap();
    let ScanOutcome::Loaded {
        collection,
        directories,
    } = outcome
    else {
        panic!("expected a loaded outcome");
    };
    assert_eq!(directories, 2);
    let parents: Vec<_> = collection
        .iter()
        .map(|e| e.path().strip_prefix(root).unwrap().to_path_buf())
        .collect();
    assert_eq!(
        parents,
        vec![
            std::path::PathBuf::from("2024-01-02/1.png"),
            "2024-01-02/extra/2.png".into(),
            "2024-01-03/1.png".into(),
        ]
    );
}

#[test]
fn test_last_sibling_has_none_after() {
    let dir = sibling_library();
    let root = dir.path();
    let outcome = scan_subsequent_siblings(&root.join("2024-01-03"), root).unwrap();
    assert_eq!(outcome, ScanOutcome::NoneAfter);
}

#[test]
fn test_current_not_among_siblings() {
    let dir = sibling_library();
    let elsewhere = TempDir::new().unwrap();
    let outcome = scan_subsequent_siblings(elsewhere.path(), dir.path()).unwrap();
    assert_eq!(outcome, ScanOutcome::CurrentNotFound);
}

#[test]
fn test_current_matched_by_identity() {
    let dir = sibling_library();
    let root = dir.path();
    // Same directory spelled differently
    let current = root.join("2024-01-02/extra/..");
    assert!(same_file(&current, &root.join("2024-01-02")));

    let outcome = scan_subsequent_siblings(&current, root).unwrap();
    assert!(matches!(
        outcome,
        ScanOutcome::Loaded { directories: 1, .. }
    ));
}

#[cfg(unix)]
#[test]
fn test_current_matched_through_symlink() {
    let dir = sibling_library();
    let root = dir.path();
    let elsewhere = TempDir::new().unwrap();
    let link = elsewhere.path().join("latest");
    std::os::unix::fs::symlink(root.join("2024-01-02"), &link).unwrap();

    let outcome = scan_subsequent_siblings(&link, root).unwrap();
    let ScanOutcome::Loaded {
        collection,
        directories,
    } = outcome
    else {
        panic!("expected a loaded outcome");
    };
    assert_eq!(directories, 1);
    assert_eq!(names(&collection), vec!["1.png"]);
    let first = collection.get(0).unwrap();
    assert!(first.path().starts_with(root.join("2024-01-03")));
}

#[test]
fn test_missing_parent_is_an_error() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope");
    assert!(scan_subsequent_siblings(dir.path(), &missing).is_err());
}
