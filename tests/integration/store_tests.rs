use chrono::{TimeZone, Utc};
use dupeindex::index::{zero_time, FileRecord, Index, Indexer};
use dupeindex::store::{self, StoreError};
use std::fs;
use tempfile::tempdir;

#[test]
fn test_scan_write_read_round_trip() {
    let dir = tempdir().unwrap();
    let data = dir.path().join("data");
    fs::create_dir_all(data.join("nested")).unwrap();
    fs::write(data.join("a.txt"), b"same").unwrap();
    fs::write(data.join("nested").join("b.txt"), b"same").unwrap();
    fs::write(data.join("c.txt"), b"different").unwrap();

    let index = Indexer::new().index_dir(&data).unwrap();
    let path = dir.path().join("index.json.gz");
    store::write_index(&index, &path).unwrap();

    let loaded = store::read_index(&path).unwrap();

    assert_eq!(loaded, index);
    assert_eq!(loaded.duplicates().count(), 1);
}

#[test]
fn test_round_trip_preserves_exact_timestamps() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("index.json.gz");

    let precise = Utc.with_ymd_and_hms(2023, 6, 15, 12, 30, 45).unwrap()
        + chrono::Duration::nanoseconds(987_654_321);
    let micros = Utc.with_ymd_and_hms(1999, 12, 31, 23, 59, 59).unwrap()
        + chrono::Duration::microseconds(500);

    let mut index = Index::new();
    index.insert_with_key(
        "aa".to_string(),
        FileRecord::new("/x/1".into(), 10, 0o100644, precise, false),
    );
    index.insert_with_key(
        "aa".to_string(),
        FileRecord::new("/x/2".into(), 10, 0o100755, micros, false),
    );
    index.insert_with_key(
        "bb".to_string(),
        FileRecord::new("/x/3".into(), 0, 0, zero_time(), false),
    );

    store::write_index(&index, &path).unwrap();
    let loaded = store::read_index(&path).unwrap();

    assert_eq!(loaded, index);
    assert_eq!(loaded.get("aa")[0].mod_time(), precise);
    assert_eq!(loaded.get("aa")[1].mod_time(), micros);
    assert_eq!(loaded.get("bb")[0].mod_time(), zero_time());
}

#[test]
fn test_round_trip_preserves_group_order() {
    let mut index = Index::new();
    for i in 0..50 {
        index.insert_with_key("k".to_string(), FileRecord::with_path(format!("/f/{}", i)));
    }

    let (loaded, _) = store::decode(store::encode(&index).unwrap().as_slice()).unwrap();

    let paths: Vec<_> = loaded
        .get("k")
        .iter()
        .map(|r| r.path().to_string_lossy().into_owned())
        .collect();
    let expected: Vec<_> = (0..50).map(|i| format!("/f/{}", i)).collect();
    assert_eq!(paths, expected);
}

#[test]
fn test_overwrite_replaces_previous_index() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("index.json.gz");

    let mut first = Index::new();
    first.insert_with_key("aa".to_string(), FileRecord::with_path("/first"));
    store::write_index(&first, &path).unwrap();

    let mut second = Index::new();
    second.insert_with_key("bb".to_string(), FileRecord::with_path("/second"));
    store::write_index(&second, &path).unwrap();

    let loaded = store::read_index(&path).unwrap();
    assert!(!loaded.contains_key("aa"));
    assert_eq!(loaded, second);
}

#[test]
fn test_truncated_file_is_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("index.json.gz");

    let mut index = Index::new();
    for i in 0..100 {
        index.insert_with_key(format!("{:032x}", i), FileRecord::with_path(format!("/f/{}", i)));
    }
    let bytes = store::encode(&index).unwrap();
    fs::write(&path, &bytes[..bytes.len() / 2]).unwrap();

    let result = store::read_index(&path);
    assert!(matches!(
        result,
        Err(StoreError::Decompress(_) | StoreError::Decode(_))
    ));
}

#[test]
fn test_store_error_messages_name_the_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("missing.gz");

    let err = store::read_index(&path).unwrap_err();
    assert!(err.to_string().contains("missing.gz"));
    assert!(err.to_string().starts_with("Failed to read index file"));
}

#[test]
fn test_index_file_with_appended_bytes_is_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("index.json.gz");

    let mut index = Index::new();
    index.insert_with_key("aa".to_string(), FileRecord::with_path("/a"));
    store::write_index(&index, &path).unwrap();

    let mut bytes = fs::read(&path).unwrap();
    bytes.extend_from_slice(b"GARBAGE");
    fs::write(&path, &bytes).unwrap();

    assert!(matches!(
        store::read_index(&path),
        Err(StoreError::Decompress(_))
    ));
}
