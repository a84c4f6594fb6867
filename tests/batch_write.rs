use anyhow::Result;
use csvferry::testing::{FaultyTable, sample_key_schema, sample_records};
use csvferry::{
    Consistency, Item, Key, MemoryStore, Record, Table, TableStore, Throughput, write_shard,
};
use std::sync::Arc;

fn fresh_table(store: &MemoryStore) -> Result<Arc<dyn Table>> {
    store.create_table_if_absent("events", sample_key_schema(), Throughput::BULK_IMPORT)?;
    Ok(store.table("events")?)
}

fn record(id: &str, time: &str, value: &str) -> Record {
    let mut fields = Item::new();
    fields.insert("id".to_string(), id.to_string());
    fields.insert("Time".to_string(), time.to_string());
    fields.insert("value".to_string(), value.to_string());
    Record::new(fields)
}

#[test]
fn oversized_shard_is_chunked_transparently() -> Result<()> {
    let store = MemoryStore::new();
    let table = fresh_table(&store)?;

    for n in [26usize, 75] {
        let records = sample_records(n);
        let outcome = write_shard(table.as_ref(), &records, "shard-1");
        assert_eq!(outcome, "no error in shard-1", "n={n}");
        assert_eq!(table.scan()?.len(), n, "n={n}");
    }
    Ok(())
}

#[test]
fn duplicate_keys_within_a_chunk_collapse_last_wins() -> Result<()> {
    let store = MemoryStore::new();
    let table = fresh_table(&store)?;

    let records = vec![
        record("a", "2019-04-16T09:30:00", "first"),
        record("b", "2019-04-16T09:30:00", "other"),
        record("a", "2019-04-16T09:30:00", "last"),
    ];
    let outcome = write_shard(table.as_ref(), &records, "shard-1");
    assert_eq!(outcome, "no error in shard-1");

    assert_eq!(table.scan()?.len(), 2);
    let key = Key {
        partition: "a".to_string(),
        sort: "2019-04-16T09:30:00".to_string(),
    };
    let survivor = table.get(&key, Consistency::Strong)?.unwrap();
    assert_eq!(survivor.get("value").map(String::as_str), Some("last"));
    Ok(())
}

#[test]
fn failure_aborts_the_rest_of_the_shard() -> Result<()> {
    let store = MemoryStore::new();
    let inner = fresh_table(&store)?;
    // First chunk lands, second chunk errors, third is never attempted.
    let faulty = FaultyTable::new(Arc::clone(&inner), 1);

    let records = sample_records(60);
    let outcome = write_shard(&faulty, &records, "shard-1");
    assert!(outcome.contains("injected batch write failure"), "{outcome}");
    assert_eq!(faulty.batch_calls(), 2);
    assert_eq!(inner.scan()?.len(), 25);
    Ok(())
}

#[test]
fn record_without_a_key_value_is_captured_as_outcome_text() -> Result<()> {
    let store = MemoryStore::new();
    let table = fresh_table(&store)?;

    let records = vec![record("a", "", "x")];
    let outcome = write_shard(table.as_ref(), &records, "shard-1");
    assert!(outcome.contains("missing a value"), "{outcome}");
    assert_eq!(table.scan()?.len(), 0);
    Ok(())
}
