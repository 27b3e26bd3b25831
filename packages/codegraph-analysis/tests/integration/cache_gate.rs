//! Cache gate tests
//!
//! Key derivation properties, TTL boundaries, schema isolation and
//! maintenance operations on the disk store.

#[path = "../common/mod.rs"]
mod common;

use chrono::{Duration, TimeZone, Utc};
use codegraph_analysis::config::CacheConfig;
use codegraph_analysis::features::cache::{
    CacheKey, DiskCache, FingerprintInputs, SourceMetadata, StructuralSignature,
};
use codegraph_analysis::shared::models::StructuralModel;
use common::*;
use pretty_assertions::assert_eq;
use prometheus::Registry;
use proptest::prelude::*;
use serde_json::json;
use std::fs;

fn signature() -> StructuralSignature {
    let mut model = StructuralModel::new("svc.py");
    model.global_variables.insert("VERSION".to_string());
    StructuralSignature::from_model(&model)
}

fn key_for(content: &[u8], config_id: &str, schema: &str) -> CacheKey {
    let signature = signature();
    CacheKey::derive(&FingerprintInputs {
        content,
        enrichment_config_id: config_id,
        structural_signature: &signature,
        schema_version: schema,
        path: None,
    })
}

fn cache_in(ws: &TestWorkspace) -> DiskCache {
    DiskCache::new(&CacheConfig {
        directory: ws.cache_dir(),
        ..CacheConfig::default()
    })
    .expect("open cache")
}

fn metadata() -> SourceMetadata {
    SourceMetadata {
        path: "svc.py".to_string(),
        size_bytes: 42,
        line_count: 3,
        language: "python".to_string(),
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Key derivation
// ═══════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn identical_inputs_give_identical_keys(
        content in proptest::collection::vec(any::<u8>(), 0..512),
        config_id in "[a-z0-9-]{1,16}",
        schema in "[0-9]{1,3}",
    ) {
        prop_assert_eq!(
            key_for(&content, &config_id, &schema),
            key_for(&content, &config_id, &schema)
        );
    }

    #[test]
    fn changing_one_field_changes_the_key(
        content in proptest::collection::vec(any::<u8>(), 1..256),
        extra in any::<u8>(),
        config_id in "[a-z]{1,8}",
    ) {
        let base = key_for(&content, &config_id, "1");

        let mut edited = content.clone();
        edited.push(extra);
        prop_assert_ne!(base, key_for(&edited, &config_id, "1"));
        prop_assert_ne!(base, key_for(&content, &format!("{config_id}-v2"), "1"));
        prop_assert_ne!(base, key_for(&content, &config_id, "2"));
    }
}

#[test]
fn field_boundaries_are_not_ambiguous() {
    // same concatenation, different split between fields
    assert_ne!(key_for(b"ab", "c", "1"), key_for(b"a", "bc", "1"));
}

#[test]
fn line_endings_and_bom_do_not_change_the_key() {
    let unix = key_for(b"x = 1\ny = 2\n", "id", "1");
    assert_eq!(unix, key_for(b"x = 1\r\ny = 2\r\n", "id", "1"));
    assert_eq!(unix, key_for(b"\xEF\xBB\xBFx = 1\ny = 2\n", "id", "1"));
}

#[test]
fn structural_signature_is_part_of_the_key() {
    let content = b"def f():\n    pass\n";
    let empty = StructuralSignature::from_model(&StructuralModel::new("a.py"));
    let other = signature();
    let derive = |signature: &StructuralSignature| {
        CacheKey::derive(&FingerprintInputs {
            content,
            enrichment_config_id: "id",
            structural_signature: signature,
            schema_version: "1",
            path: None,
        })
    };
    assert_ne!(derive(&empty), derive(&other));
}

#[test]
fn path_only_matters_when_requested() {
    let signature = signature();
    let inputs = |path| FingerprintInputs {
        content: b"x = 1\n",
        enrichment_config_id: "id",
        structural_signature: &signature,
        schema_version: "1",
        path,
    };
    let insensitive = CacheKey::derive(&inputs(None));
    let at_a = CacheKey::derive(&inputs(Some("a/x.py")));
    let at_b = CacheKey::derive(&inputs(Some("b/x.py")));

    assert_ne!(at_a, at_b);
    assert_ne!(insensitive, at_a);
    assert_eq!(insensitive, key_for(b"x = 1\n", "id", "1"));
}

// ═══════════════════════════════════════════════════════════════════════════
// Store
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn put_then_get_returns_the_payload_verbatim() {
    let ws = TestWorkspace::new();
    let cache = cache_in(&ws);
    let key = key_for(b"x = 1\n", "id", "1");
    let payload = json!({"summary": "Sets x.", "nested": {"list": [1, 2, 3]}});

    cache.put(&key, payload.clone(), 3600, metadata()).unwrap();
    let entry = cache.get(&key).unwrap().expect("hit");

    assert_eq!(entry.payload, payload);
    assert_eq!(entry.key, key);
    assert_eq!(entry.schema_version, "1");
    assert_eq!(entry.source_metadata, metadata());
    assert!(cache.entry_path(&key).starts_with(ws.cache_dir().join(key.prefix(2))));
}

#[test]
fn entry_expires_strictly_after_ttl() {
    let ws = TestWorkspace::new();
    let cache = cache_in(&ws);
    let key = key_for(b"ttl", "id", "1");
    let created = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();

    cache
        .put_at(&key, json!("doc"), 60, metadata(), created)
        .unwrap();

    assert!(cache.get_at(&key, created).unwrap().is_some());
    assert!(cache
        .get_at(&key, created + Duration::seconds(60))
        .unwrap()
        .is_some());
    assert!(cache
        .get_at(&key, created + Duration::seconds(61))
        .unwrap()
        .is_none());
    assert_eq!(cache.metrics().expired.get(), 1);
}

#[test]
fn expired_entry_is_overwritten_by_the_next_put() {
    let ws = TestWorkspace::new();
    let cache = cache_in(&ws);
    let key = key_for(b"ttl", "id", "1");
    let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let later = created + Duration::days(2);

    cache.put_at(&key, json!("old"), 60, metadata(), created).unwrap();
    cache.put_at(&key, json!("new"), 60, metadata(), later).unwrap();

    let entry = cache.get_at(&key, later).unwrap().expect("fresh entry");
    assert_eq!(entry.payload, json!("new"));
    assert_eq!(cache.entry_count().unwrap(), 1);
}

#[test]
fn other_schema_version_reads_as_miss() {
    let ws = TestWorkspace::new();
    let key = key_for(b"x", "id", "1");
    cache_in(&ws).put(&key, json!(1), 3600, metadata()).unwrap();

    let v2 = DiskCache::new(&CacheConfig {
        directory: ws.cache_dir(),
        schema_version: "2".to_string(),
        ..CacheConfig::default()
    })
    .unwrap();
    assert!(v2.get(&key).unwrap().is_none());
    assert_eq!(v2.purge_expired().unwrap(), 1);
    assert_eq!(v2.entry_count().unwrap(), 0);
}

#[test]
fn corrupted_entry_is_a_miss_and_gets_purged() {
    let ws = TestWorkspace::new();
    let cache = cache_in(&ws);
    let key = key_for(b"corrupt", "id", "1");
    cache.put(&key, json!({"ok": true}), 3600, metadata()).unwrap();

    fs::write(cache.entry_path(&key), b"{ not json").unwrap();

    assert!(cache.get(&key).unwrap().is_none());
    assert_eq!(cache.metrics().corrupted.get(), 1);
    assert_eq!(cache.purge_expired().unwrap(), 1);
    assert!(!cache.entry_path(&key).exists());
}

#[test]
fn purge_keeps_fresh_entries() {
    let ws = TestWorkspace::new();
    let cache = cache_in(&ws);
    let fresh = key_for(b"fresh", "id", "1");
    let stale = key_for(b"stale", "id", "1");
    let long_ago = Utc::now() - Duration::days(30);

    cache.put(&fresh, json!(1), 3600, metadata()).unwrap();
    cache.put_at(&stale, json!(2), 60, metadata(), long_ago).unwrap();

    assert_eq!(cache.entry_count().unwrap(), 2);
    assert_eq!(cache.purge_expired().unwrap(), 1);
    assert!(cache.get(&fresh).unwrap().is_some());
    assert_eq!(cache.entry_count().unwrap(), 1);
}

#[test]
fn invalidate_and_clear() {
    let ws = TestWorkspace::new();
    let cache = cache_in(&ws);
    let keys: Vec<CacheKey> = (0..5u8)
        .map(|i| key_for(&[i], "id", "1"))
        .collect();
    for key in &keys {
        cache.put(key, json!("x"), 3600, metadata()).unwrap();
    }

    assert!(cache.invalidate(&keys[0]).unwrap());
    assert!(!cache.invalidate(&keys[0]).unwrap());
    assert_eq!(cache.entry_count().unwrap(), 4);

    cache.clear().unwrap();
    assert_eq!(cache.entry_count().unwrap(), 0);
    assert!(ws.cache_dir().is_dir());
}

#[test]
fn no_temp_files_left_after_writes() {
    let ws = TestWorkspace::new();
    let cache = cache_in(&ws);
    let key = key_for(b"atomic", "id", "1");
    for i in 0..3 {
        cache.put(&key, json!(i), 3600, metadata()).unwrap();
    }

    let shard = ws.cache_dir().join(key.prefix(2));
    let names: Vec<String> = fs::read_dir(shard)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec![format!("{}.json", key.to_hex())]);
}

#[test]
fn metrics_register_on_a_shared_registry() {
    let ws = TestWorkspace::new();
    let registry = Registry::new();
    let cache = DiskCache::new_with_registry(
        &CacheConfig {
            directory: ws.cache_dir(),
            ..CacheConfig::default()
        },
        &registry,
    )
    .unwrap();
    let key = key_for(b"m", "id", "1");

    assert!(cache.get(&key).unwrap().is_none());
    cache.put(&key, json!(1), 3600, metadata()).unwrap();
    assert!(cache.get(&key).unwrap().is_some());

    assert_eq!(cache.metrics().hits.get(), 1);
    assert_eq!(cache.metrics().misses.get(), 1);
    assert_eq!(cache.metrics().writes.get(), 1);
    assert_eq!(cache.metrics().hit_rate(), 0.5);

    let names: Vec<String> = registry
        .gather()
        .iter()
        .map(|family| family.get_name().to_string())
        .collect();
    assert!(names.contains(&"cache_gate_hits_total".to_string()));
}
