//! Interactive entry point.
//!
//! Anything not supplied as a flag is prompted for; the dialogue mirrors the
//! menu flow the tool is driven by in practice: load a CSV, pick the key
//! columns and table name once, then loop between importing and exporting.

use anyhow::Result;
use clap::Parser;
use csvferry::{
    CreateOutcome, KeySchema, MemoryStore, Record, Session, Table, TableStore, Throughput,
    console, dispatch_write, export_items, load_records, range_bound, sorted_columns,
    validate_records, write_status_report,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "csvferry",
    about = "Import CSV files into a table store and export query results back to CSV."
)]
struct Cli {
    /// CSV file to import (prompted for when omitted)
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Target table name (prompted for when omitted)
    #[arg(long)]
    table: Option<String>,

    /// Partition key column (prompted for when omitted)
    #[arg(long)]
    partition_key: Option<String>,

    /// Sort key column (prompted for when omitted)
    #[arg(long)]
    sort_key: Option<String>,

    /// Import status report destination
    #[arg(long, default_value = "import_status.csv")]
    report: PathBuf,

    /// Query/scan export destination
    #[arg(long, default_value = "data_from_db.csv")]
    export: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let cli = Cli::parse();

    let csv_path = match cli.csv {
        Some(path) => path,
        None => PathBuf::from(console::prompt("Please enter the name/path of the csv file: ")?),
    };
    let loaded = load_records(&csv_path)?;

    console::output(&format!("Columns: {}", loaded.schema.columns().join(", ")));
    console::output(
        "From the above column names, please select:\n \
         1) Partition Key (a unique value that identifies a record)\n \
         2) Sort Key (a value the records sort by)",
    );
    let partition_key = match cli.partition_key {
        Some(name) => name,
        None => console::prompt("Partition Key: ")?,
    };
    let sort_key = match cli.sort_key {
        Some(name) => name,
        None => console::prompt("Sort Key: ")?,
    };
    let table_name = match cli.table {
        Some(name) => name,
        None => console::prompt("Please enter the table name: ")?,
    };

    let session = Session {
        csv_path,
        table_name,
        key_schema: KeySchema::new(partition_key, sort_key),
        schema: loaded.schema,
        output_schema: loaded.output_schema,
        report_path: cli.report,
        export_path: cli.export,
    };
    let store = MemoryStore::new();
    let mut records = loaded.records;

    loop {
        console::output(
            "Please select one of the options:\n\
             1) Write to the table\n\
             2) Read from the table\n\
             3) Quit",
        );
        match console::prompt("Select an option (1/2/3): ")?.as_str() {
            "1" => run_import(&store, &session, &mut records)?,
            "2" => run_read(&store, &session)?,
            "3" => break,
            _ => console::output("Invalid choice"),
        }
    }
    Ok(())
}

/// The write flow: create the table, fan out the batched writes, validate,
/// report, then drop the table back to idle capacity.
fn run_import(store: &MemoryStore, session: &Session, records: &mut [Record]) -> Result<()> {
    console::output(&format!("Creating table: {}", session.table_name));
    let outcome = store.create_table_if_absent(
        &session.table_name,
        session.key_schema.clone(),
        Throughput::BULK_IMPORT,
    )?;
    if outcome == CreateOutcome::AlreadyExists {
        console::output("The table name already exists. Please start again with a new table name.");
        return Ok(());
    }

    let table = store.table(&session.table_name)?;
    let write_outcome = dispatch_write(table.as_ref(), records);
    validate_records(table.as_ref(), records, &write_outcome);
    let rows = write_status_report(&session.report_path, &session.output_schema, records)?;
    console::output(&format!(
        "Wrote status for {rows} records to {}",
        session.report_path.display()
    ));
    store.update_throughput(&session.table_name, Throughput::IDLE)?;
    Ok(())
}

/// The read flow: exact-match query by unique id, or a range scan over the
/// table's sort attribute, exported to the session's export file.
fn run_read(store: &MemoryStore, session: &Session) -> Result<()> {
    // Recover the key schema from the table rather than trusting what was
    // typed at startup; an unreadable table sends the user back to the menu.
    let description = match store.describe_table(&session.table_name) {
        Ok(description) => description,
        Err(err) => {
            console::output(&format!("Cannot read from {:?}: {err}", session.table_name));
            return Ok(());
        }
    };
    let table = store.table(&session.table_name)?;

    console::output(
        "Please select one of the options:\n\
         1) Search based on unique id\n\
         2) Search based on a time range (e.g. 16/04/19 09:30)\n\
         3) Back",
    );
    let items = match console::prompt("Your selection (1/2/3): ")?.as_str() {
        "1" => {
            let id = console::prompt("Please enter the unique id: ")?;
            table.query_eq(&id)?
        }
        "2" => {
            let low = range_bound(&console::prompt("Please enter the low range value: ")?);
            let high = range_bound(&console::prompt("Please enter the high range value: ")?);
            table.scan_between(&description.key_schema.sort_key, &low, &high)?
        }
        _ => return Ok(()),
    };

    let columns = sorted_columns(&items)?;
    let rows = export_items(&session.export_path, &columns, &items)?;
    console::output(&format!(
        "Exported {rows} items to {}",
        session.export_path.display()
    ));
    Ok(())
}
