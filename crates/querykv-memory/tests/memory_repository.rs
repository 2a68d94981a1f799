use bson::doc;
use querykv_memory::{MemoryError, MemoryRepository, RepositoryConfig};
use querykv_query::{Attributes, Fetch, KeySelector, Projection, QueryError, RecordSet, Value};

fn attrs(pairs: &[(&str, Value)]) -> Attributes {
    pairs
        .iter()
        .map(|(n, v)| (n.to_string(), v.clone()))
        .collect()
}

fn seeded() -> MemoryRepository<String> {
    let repo = MemoryRepository::new();
    repo.insert(
        "b".into(),
        attrs(&[("status", Value::from("closed")), ("owner", Value::from("bo"))]),
    )
    .unwrap();
    repo.insert(
        "a".into(),
        attrs(&[("status", Value::from("open")), ("owner", Value::from("ann"))]),
    )
    .unwrap();
    repo
}

fn fetch_keys(repo: &MemoryRepository<String>, keys: &KeySelector<String>) -> Vec<String> {
    repo.fetch(keys, &Projection::all(), |records: RecordSet<String>| {
        records.keys().cloned().collect()
    })
    .unwrap()
}

#[test]
fn all_keys_come_back_in_key_order() {
    let repo = seeded();
    assert_eq!(fetch_keys(&repo, &KeySelector::All), vec!["a", "b"]);
}

#[test]
fn explicit_keys_follow_selector_order_and_skip_unknown() {
    let repo = seeded();
    let keys = KeySelector::keys(["b".to_string(), "zz".to_string(), "a".to_string()]);
    assert_eq!(fetch_keys(&repo, &keys), vec!["b", "a"]);
}

#[test]
fn empty_explicit_list_selects_everything() {
    let repo = seeded();
    assert_eq!(fetch_keys(&repo, &KeySelector::Keys(Vec::new())), vec!["a", "b"]);
}

#[test]
fn unknown_keys_yield_empty_result() {
    let repo = seeded();
    let keys = KeySelector::one("missing".to_string());
    assert!(fetch_keys(&repo, &keys).is_empty());
}

#[test]
fn projection_restricts_attributes() {
    let repo = seeded();
    let records = repo
        .fetch(
            &KeySelector::one("a".to_string()),
            &Projection::of(["owner"]),
            |records: RecordSet<String>| records,
        )
        .unwrap();

    let a = records.get(&"a".to_string()).unwrap();
    assert_eq!(a.len(), 1);
    assert_eq!(a["owner"], Value::from("ann"));
}

#[test]
fn repeated_key_in_selector_is_a_duplicate() {
    let repo = seeded();
    let keys = KeySelector::keys(["a".to_string(), "a".to_string()]);
    let err = repo
        .fetch(&keys, &Projection::all(), |records: RecordSet<String>| records.len())
        .unwrap_err();
    assert!(matches!(err, QueryError::DuplicateKey(_)));
}

#[test]
fn exists_tracks_inserts_and_removes() {
    let repo = seeded();
    assert!(repo.exists(&"a".to_string()).unwrap());

    repo.remove(&"a".to_string()).unwrap();
    assert!(!repo.exists(&"a".to_string()).unwrap());
    assert_eq!(repo.len(), 1);

    repo.clear().unwrap();
    assert!(repo.is_empty());
}

#[test]
fn insert_returns_previous_attributes() {
    let repo = seeded();
    let previous = repo
        .insert("a".into(), attrs(&[("status", Value::from("archived"))]))
        .unwrap();
    assert_eq!(previous.unwrap()["status"], Value::from("open"));
}

#[test]
fn load_documents_strips_top_level_key() {
    let repo: MemoryRepository<String> = MemoryRepository::new();
    let loaded = repo
        .load_documents(vec![
            doc! { "_id": "t-1", "status": "open" },
            doc! { "_id": "t-2", "status": "closed", "tags": ["x"] },
        ])
        .unwrap();
    assert_eq!(loaded, 2);

    let records = repo
        .fetch(&KeySelector::All, &Projection::all(), |r: RecordSet<String>| r)
        .unwrap();
    let t1 = records.get(&"t-1".to_string()).unwrap();
    assert!(!t1.contains_key("_id"));
    assert_eq!(t1["status"], Value::from("open"));
}

#[test]
fn load_documents_with_nested_pk_path() {
    let config = RepositoryConfig {
        pk_path: "meta.id".into(),
        ..RepositoryConfig::default()
    };
    let repo: MemoryRepository<i64> = MemoryRepository::with_config(config);
    repo.load_documents(vec![doc! { "meta": { "id": 42_i64 }, "status": "open" }])
        .unwrap();

    assert!(repo.exists(&42).unwrap());
    // Nested key attributes are kept.
    let meta = repo
        .fetch(&KeySelector::one(42), &Projection::of(["meta"]), |r: RecordSet<i64>| r)
        .unwrap();
    assert!(meta.get(&42).unwrap().contains_key("meta"));
}

#[test]
fn load_documents_rejects_unsupported_values() {
    let repo: MemoryRepository<String> = MemoryRepository::new();
    let bin = bson::Binary {
        subtype: bson::spec::BinarySubtype::Generic,
        bytes: vec![0],
    };
    let err = repo
        .load_documents(vec![doc! { "_id": "a", "blob": bin }])
        .unwrap_err();
    assert!(matches!(err, MemoryError::Document { index: 0, .. }));

    let as_query: QueryError = err.into();
    assert!(matches!(as_query, QueryError::Repository(_)));

    // The memory error stays reachable as the source, with its own cause below it.
    let source = std::error::Error::source(&as_query).unwrap();
    let memory = source.downcast_ref::<MemoryError>().unwrap();
    assert!(matches!(memory, MemoryError::Document { index: 0, .. }));
    assert!(std::error::Error::source(memory).is_some());
}

#[test]
fn snapshot_readers_are_isolated_from_writers() {
    let repo = seeded();
    let mut seen = Vec::new();
    repo.fetch(&KeySelector::All, &Projection::all(), |records: RecordSet<String>| {
        // Writing mid-fetch publishes a new snapshot; this fetch keeps its own.
        repo.insert("c".into(), Attributes::new()).unwrap();
        seen.extend(records.keys().cloned());
    })
    .unwrap();

    assert_eq!(seen, vec!["a", "b"]);
    assert_eq!(repo.len(), 3);
}

#[test]
fn shared_across_threads() {
    let repo = std::sync::Arc::new(seeded());
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let repo = std::sync::Arc::clone(&repo);
            std::thread::spawn(move || {
                repo.insert(format!("t{i}"), Attributes::new()).unwrap();
                repo.exists(&"a".to_string()).unwrap()
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.join().unwrap());
    }
    assert_eq!(repo.len(), 6);
}
