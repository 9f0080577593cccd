use super::*;

#[test]
fn memory_store_set_get_remove() {
    let mut s = MemoryStore::new();
    assert_eq!(s.get("a"), None);

    s.set("a", "1").unwrap();
    s.set("b", "2").unwrap();
    assert_eq!(s.get("a").as_deref(), Some("1"));
    assert_eq!(s.keys(), vec!["a".to_string(), "b".to_string()]);

    s.remove("a").unwrap();
    assert_eq!(s.get("a"), None);
    assert_eq!(s.keys(), vec!["b".to_string()]);
}

#[test]
fn file_store_missing_file_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let s = FileStore::open(dir.path().join("nope.toml")).unwrap();
    assert!(s.keys().is_empty());
}

#[test]
fn file_store_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("sources.toml");

    {
        let mut s = FileStore::open(&path).unwrap();
        s.set("source:/music/a b", "dir").unwrap();
        s.set("source:/music/x.mp3", "file").unwrap();
    }
    assert!(path.exists());

    let mut s = FileStore::open(&path).unwrap();
    assert_eq!(s.get("source:/music/a b").as_deref(), Some("dir"));
    assert_eq!(s.get("source:/music/x.mp3").as_deref(), Some("file"));

    s.remove("source:/music/x.mp3").unwrap();
    let s = FileStore::open(&path).unwrap();
    assert_eq!(s.keys(), vec!["source:/music/a b".to_string()]);
}

#[test]
fn file_store_rejects_malformed_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.toml");
    std::fs::write(&path, "entries = 3").unwrap();

    assert!(matches!(FileStore::open(&path), Err(StoreError::TomlDe(_))));
}
