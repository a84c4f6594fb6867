use anyhow::Result;
use csvferry::{
    Consistency, CreateOutcome, Item, Key, KeySchema, MemoryStore, StoreError, Table, TableStore,
    Throughput,
};

fn item(id: &str, time: &str, value: &str) -> Item {
    let mut item = Item::new();
    item.insert("id".to_string(), id.to_string());
    item.insert("Time".to_string(), time.to_string());
    item.insert("value".to_string(), value.to_string());
    item
}

fn schema() -> KeySchema {
    KeySchema::new("id", "Time")
}

#[test]
fn create_table_collision_is_a_choice_point() -> Result<()> {
    let store = MemoryStore::new();
    let first = store.create_table_if_absent("events", schema(), Throughput::BULK_IMPORT)?;
    assert_eq!(first, CreateOutcome::Created);

    let second = store.create_table_if_absent("events", schema(), Throughput::BULK_IMPORT)?;
    assert_eq!(second, CreateOutcome::AlreadyExists);
    Ok(())
}

#[test]
fn describe_recovers_schema_and_update_lowers_capacity() -> Result<()> {
    let store = MemoryStore::new();
    store.create_table_if_absent("events", schema(), Throughput::BULK_IMPORT)?;

    let before = store.describe_table("events")?;
    assert_eq!(before.key_schema, schema());
    assert_eq!(before.throughput, Throughput::BULK_IMPORT);
    assert_eq!(before.item_count, 0);

    store.update_throughput("events", Throughput::IDLE)?;
    let after = store.describe_table("events")?;
    assert_eq!(after.throughput, Throughput::IDLE);
    Ok(())
}

#[test]
fn unknown_table_is_reported_as_such() {
    let store = MemoryStore::new();
    assert!(matches!(
        store.describe_table("nope"),
        Err(StoreError::TableNotFound(_))
    ));
    assert!(matches!(store.table("nope"), Err(StoreError::TableNotFound(_))));
}

#[test]
fn batch_put_rejects_more_than_25_items() -> Result<()> {
    let store = MemoryStore::new();
    store.create_table_if_absent("events", schema(), Throughput::BULK_IMPORT)?;
    let table = store.table("events")?;

    let items: Vec<Item> = (0..26)
        .map(|i| item(&format!("id-{i}"), "2019-04-16T09:30:00", "x"))
        .collect();
    assert!(matches!(
        table.batch_put(&items),
        Err(StoreError::BatchTooLarge(26))
    ));
    assert_eq!(table.scan()?.len(), 0);
    Ok(())
}

#[test]
fn strong_read_sees_a_just_written_item() -> Result<()> {
    let store = MemoryStore::new();
    store.create_table_if_absent("events", schema(), Throughput::BULK_IMPORT)?;
    let table = store.table("events")?;

    table.put(&item("a", "2019-04-16T09:30:00", "x"))?;
    let key = Key {
        partition: "a".to_string(),
        sort: "2019-04-16T09:30:00".to_string(),
    };
    let got = table.get(&key, Consistency::Strong)?;
    assert_eq!(got.as_ref().and_then(|i| i.get("value")).map(String::as_str), Some("x"));
    Ok(())
}

#[test]
fn query_returns_one_partition_ordered_by_sort_key() -> Result<()> {
    let store = MemoryStore::new();
    store.create_table_if_absent("events", schema(), Throughput::BULK_IMPORT)?;
    let table = store.table("events")?;

    table.put(&item("a", "2019-04-16T11:00:00", "late"))?;
    table.put(&item("a", "2019-04-16T09:00:00", "early"))?;
    table.put(&item("b", "2019-04-16T10:00:00", "other"))?;

    let items = table.query_eq("a")?;
    let values: Vec<&str> = items
        .iter()
        .filter_map(|i| i.get("value").map(String::as_str))
        .collect();
    assert_eq!(values, ["early", "late"]);
    Ok(())
}

#[test]
fn scan_between_is_inclusive_on_both_bounds() -> Result<()> {
    let store = MemoryStore::new();
    store.create_table_if_absent("events", schema(), Throughput::BULK_IMPORT)?;
    let table = store.table("events")?;

    table.put(&item("a", "2019-04-16T09:00:00", "x"))?;
    table.put(&item("b", "2019-04-16T10:00:00", "y"))?;
    table.put(&item("c", "2019-04-16T11:00:00", "z"))?;

    let hits = table.scan_between("Time", "2019-04-16T09:00:00", "2019-04-16T10:00:00")?;
    assert_eq!(hits.len(), 2);

    let all = table.scan_between("Time", "", "\u{10FFFF}")?;
    assert_eq!(all.len(), 3);
    Ok(())
}

#[test]
fn key_extraction_requires_present_non_empty_values() {
    let schema = schema();
    let mut incomplete = Item::new();
    incomplete.insert("id".to_string(), "a".to_string());
    assert!(matches!(
        schema.key_of(&incomplete),
        Err(StoreError::MissingKey(col)) if col == "Time"
    ));

    incomplete.insert("Time".to_string(), String::new());
    assert!(matches!(
        schema.key_of(&incomplete),
        Err(StoreError::MissingKey(_))
    ));
}
