use anyhow::Result;
use csvferry::testing::sample_records;
use csvferry::{ColumnSchema, Item, export_items, sorted_columns, write_status_report};

#[test]
fn report_is_header_plus_one_row_per_record() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("status.csv");

    let schema = ColumnSchema::new(vec![
        "id".to_string(),
        "Time".to_string(),
        "value".to_string(),
    ])
    .with_status_columns();
    let mut records = sample_records(5);
    records[0].mark_success();
    records[4].mark_failure("no error in shard-3,key gone".to_string());

    let rows = write_status_report(&path, &schema, &records)?;
    assert_eq!(rows, 5);

    let contents = std::fs::read_to_string(&path)?;
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 6);
    assert_eq!(
        lines[0],
        "id,Time,value,Success/Failure,Error Code,Error Description"
    );
    assert!(lines[1].starts_with("id-0000,"));
    assert!(lines[1].ends_with(",Success,0,"));
    // Unvalidated records carry an unset status and a clean error code.
    assert!(lines[2].ends_with(",,0,"));
    // The failure row's description is quoted: it contains the delimiter.
    assert!(lines[5].contains("Failure,1,"));
    assert!(lines[5].contains("no error in shard-3"));
    Ok(())
}

#[test]
fn export_headers_are_sorted_attribute_names() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("export.csv");

    let mut item = Item::new();
    item.insert("id".to_string(), "a".to_string());
    item.insert("Time".to_string(), "2019-04-16T09:30:00".to_string());
    item.insert("value".to_string(), "x".to_string());
    let items = vec![item];

    let columns = sorted_columns(&items)?;
    assert_eq!(columns, ["Time", "id", "value"]);

    let rows = export_items(&path, &columns, &items)?;
    assert_eq!(rows, 1);

    let contents = std::fs::read_to_string(&path)?;
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines, ["Time,id,value", "2019-04-16T09:30:00,a,x"]);
    Ok(())
}

#[test]
fn empty_result_set_cannot_be_exported() {
    assert!(sorted_columns(&[]).is_err());
}

#[test]
fn report_creates_missing_parent_directories() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("nested/deeper/status.csv");

    let schema = ColumnSchema::new(vec!["id".to_string(), "Time".to_string(), "value".to_string()])
        .with_status_columns();
    write_status_report(&path, &schema, &sample_records(1))?;
    assert!(path.exists());
    Ok(())
}
