use chrono::{TimeZone, Utc};
use dupeindex::index::{FileRecord, Index, IndexError, Indexer};
use dupeindex::scanner::{HashError, ScanError, Walker};
use std::collections::HashSet;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

/// Create `files_per_dir` files in each of `depth` nested directories.
fn create_tree(root: &Path, depth: usize, files_per_dir: usize) -> Vec<PathBuf> {
    let mut files = Vec::new();
    let mut dir = root.to_path_buf();
    for level in 0..depth {
        dir = dir.join(format!("level_{}", level));
        fs::create_dir_all(&dir).unwrap();
        for i in 0..files_per_dir {
            let path = dir.join(format!("file_{}.txt", i));
            fs::write(&path, format!("level {} file {}", level, i)).unwrap();
            files.push(path);
        }
    }
    files
}

#[test]
fn test_index_empty_directory() {
    let dir = tempdir().unwrap();
    let index = Indexer::new().index_dir(dir.path()).unwrap();

    assert!(index.is_empty());
    assert_eq!(index.record_count(), 0);
}

#[test]
fn test_traversal_completeness() {
    let dir = tempdir().unwrap();
    let files = create_tree(dir.path(), 4, 3);
    // Empty directories contribute nothing
    fs::create_dir_all(dir.path().join("empty").join("deeper")).unwrap();

    let index = Indexer::new().index_dir(dir.path()).unwrap();

    assert_eq!(index.record_count(), files.len());
    let indexed: HashSet<PathBuf> = index
        .all()
        .flat_map(|(_, records)| records.iter().map(|r| r.path().to_path_buf()))
        .collect();
    for file in &files {
        let absolute = std::path::absolute(file).unwrap();
        assert!(indexed.contains(&absolute), "missing {}", file.display());
    }
    assert!(index
        .all()
        .all(|(_, records)| records.iter().all(|r| !r.is_dir())));
}

#[test]
fn test_duplicates_share_a_key() {
    let dir = tempdir().unwrap();
    let sub = dir.path().join("subdir");
    fs::create_dir(&sub).unwrap();

    File::create(dir.path().join("a.txt"))
        .unwrap()
        .write_all(b"duplicate")
        .unwrap();
    File::create(sub.join("b.txt"))
        .unwrap()
        .write_all(b"duplicate")
        .unwrap();
    File::create(dir.path().join("c.txt"))
        .unwrap()
        .write_all(b"unique")
        .unwrap();

    let index = Indexer::new().index_dir(dir.path()).unwrap();

    assert_eq!(index.len(), 2);
    let dups: Vec<_> = index.duplicates().collect();
    assert_eq!(dups.len(), 1);
    assert_eq!(dups[0].0, format!("{:x}", md5::compute(b"duplicate")));

    let names: HashSet<_> = dups[0]
        .1
        .iter()
        .map(|r| r.path().file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, HashSet::from(["a.txt".to_string(), "b.txt".to_string()]));
}

#[test]
fn test_empty_files_group_together() {
    let dir = tempdir().unwrap();
    File::create(dir.path().join("empty1")).unwrap();
    File::create(dir.path().join("empty2")).unwrap();

    let index = Indexer::new().index_dir(dir.path()).unwrap();

    assert_eq!(index.get("d41d8cd98f00b204e9800998ecf8427e").len(), 2);
}

#[test]
fn test_records_mirror_metadata() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("dated.txt");
    fs::write(&path, b"Some Content").unwrap();
    let when = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
    filetime::set_file_mtime(&path, filetime::FileTime::from_system_time(when.into())).unwrap();

    let index = Indexer::new().index_dir(dir.path()).unwrap();
    let record = &index.get("78138d2003f1a87043d65c692fb3a64b")[0];

    assert_eq!(record.size(), 12);
    assert_eq!(record.mod_time(), when);
    assert!(!record.is_dir());
    assert!(record.path().is_absolute());
    assert!(record.path().ends_with("dated.txt"));
}

#[test]
fn test_walk_then_group_matches_index_dir() {
    let dir = tempdir().unwrap();
    create_tree(dir.path(), 2, 4);

    let records: Vec<FileRecord> = Walker::new(dir.path())
        .walk()
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    let from_records = Index::from_records(records).unwrap();
    let from_dir = Indexer::new().index_dir(dir.path()).unwrap();

    assert_eq!(from_records, from_dir);
}

#[test]
fn test_hash_uses_content_at_index_time() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("changing.txt");
    fs::write(&path, b"before").unwrap();

    let records: Vec<FileRecord> = Walker::new(dir.path())
        .walk()
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    fs::write(&path, b"after, longer").unwrap();

    let index = Index::from_records(records).unwrap();
    let key = format!("{:x}", md5::compute(b"after, longer"));

    // Keyed by the new content, metadata from the walk
    assert_eq!(index.get(&key).len(), 1);
    assert_eq!(index.get(&key)[0].size(), 6);
}

#[test]
fn test_missing_file_aborts_indexing() {
    let dir = tempdir().unwrap();
    let present = dir.path().join("present.txt");
    fs::write(&present, b"here").unwrap();

    let result = Index::from_records(vec![
        FileRecord::with_path(&present),
        FileRecord::with_path(dir.path().join("absent.txt")),
    ]);

    match result {
        Err(HashError::NotFound(path)) => assert!(path.ends_with("absent.txt")),
        other => panic!("Expected NotFound, got {:?}", other),
    }
}

#[test]
fn test_missing_root_aborts_indexing() {
    let result = Indexer::new().index_dir(Path::new("/non/existent/path/12345"));

    match result {
        Err(IndexError::Scan(ScanError::NotFound(path))) => {
            assert!(path.to_string_lossy().contains("non/existent/path/12345"));
        }
        other => panic!("Expected NotFound, got {:?}", other.map(|i| i.len())),
    }
}

#[cfg(unix)]
#[test]
fn test_unreadable_file_aborts_indexing() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    let secret = dir.path().join("secret.txt");
    fs::write(&secret, b"secret").unwrap();
    fs::set_permissions(&secret, fs::Permissions::from_mode(0o000)).unwrap();

    // Root can read anything; the scenario only exists for normal users
    if File::open(&secret).is_ok() {
        return;
    }

    let result = Indexer::new().index_dir(dir.path());
    fs::set_permissions(&secret, fs::Permissions::from_mode(0o644)).unwrap();

    assert!(matches!(
        result,
        Err(IndexError::Hash(HashError::PermissionDenied(_)))
    ));
}
