use block_atlas_core::error::BlockAtlasError;
use block_atlas_core::prelude::*;

#[test]
fn reads_compact_and_spaced_arrays() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("order.json");
    std::fs::write(&path, r#"["stone", "dirt","grass_block_top"]"#).expect("write");
    let order = OrderList::load(&path).expect("load");
    let keys: Vec<&str> = order.iter().collect();
    assert_eq!(keys, vec!["stone", "dirt", "grass_block_top"]);
}

#[test]
fn saved_file_is_a_plain_json_array() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("order.json");
    let order: OrderList = ["b", "a"].iter().map(|s| s.to_string()).collect();
    order.save(&path).expect("save");
    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).expect("read")).expect("json");
    assert_eq!(value, serde_json::json!(["b", "a"]));
    assert_eq!(OrderList::load(&path).expect("load"), order);
}

#[test]
fn absent_file_is_missing_order_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("order.json");
    match OrderList::load(&path) {
        Err(BlockAtlasError::MissingOrderFile(p)) => assert_eq!(p, path),
        other => panic!("Expected MissingOrderFile, got {:?}", other),
    }
}

#[test]
fn malformed_file_is_a_json_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("order.json");
    std::fs::write(&path, r#"{"order": ["a"]}"#).expect("write");
    assert!(matches!(OrderList::load(&path), Err(BlockAtlasError::Json(_))));
}

#[test]
fn replay_entries_follow_stored_order_verbatim() {
    let dir = std::path::Path::new("blocks");
    let order = OrderList::new(vec!["zeta".into(), "alpha".into(), "zeta".into()]);
    let entries = replay(dir, &order).expect("replay");
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0], TileEntry::new("zeta", dir.join("zeta.png")));
    assert_eq!(entries[1], TileEntry::new("alpha", dir.join("alpha.png")));
    assert_eq!(entries[2].key, "zeta");
}
