use super::*;

// =============================================================================
// MemoryStorage
// =============================================================================

#[test]
fn memory_get_missing_is_none() {
    let storage = MemoryStorage::new();
    assert_eq!(storage.get("authToken").unwrap(), None);
}

#[test]
fn memory_set_then_get() {
    let storage = MemoryStorage::new();
    storage.set("authToken", "abc").unwrap();
    assert_eq!(storage.get("authToken").unwrap().as_deref(), Some("abc"));
}

#[test]
fn memory_remove_missing_is_ok() {
    let storage = MemoryStorage::new();
    storage.remove("roles").unwrap();
    assert_eq!(storage.get("roles").unwrap(), None);
}

// =============================================================================
// FileStorage
// =============================================================================

#[test]
fn file_missing_reads_empty() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileStorage::new(dir.path().join("session.json"));
    assert_eq!(storage.get("authToken").unwrap(), None);
}

#[test]
fn file_creates_parent_dirs_on_write() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("deeper").join("session.json");
    let storage = FileStorage::new(&path);
    storage.set("authToken", "tok").unwrap();
    assert!(path.exists());
}

#[test]
fn file_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    {
        let storage = FileStorage::new(&path);
        storage.set("authToken", "tok").unwrap();
        storage.set("roles", r#"["admin","customer"]"#).unwrap();
    }
    let reopened = FileStorage::new(&path);
    assert_eq!(reopened.get("authToken").unwrap().as_deref(), Some("tok"));
    assert_eq!(reopened.get("roles").unwrap().as_deref(), Some(r#"["admin","customer"]"#));
}

#[test]
fn file_remove_keeps_other_keys() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileStorage::new(dir.path().join("session.json"));
    storage.set("authToken", "tok").unwrap();
    storage.set("theme", "dark").unwrap();
    storage.remove("authToken").unwrap();
    assert_eq!(storage.get("authToken").unwrap(), None);
    assert_eq!(storage.get("theme").unwrap().as_deref(), Some("dark"));
}

#[test]
fn file_corrupt_contents_is_json_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    std::fs::write(&path, "not json").unwrap();
    let storage = FileStorage::new(&path);
    assert!(matches!(storage.get("authToken"), Err(StorageError::Json { .. })));
}

#[test]
fn file_empty_contents_reads_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    std::fs::write(&path, "  \n").unwrap();
    let storage = FileStorage::new(&path);
    assert_eq!(storage.get("authToken").unwrap(), None);
}
