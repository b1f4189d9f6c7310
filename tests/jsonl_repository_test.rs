use anyhow::Result;
use order_ingest::{
    DataSource, DataSourceFactory, IngestError, OrderRepository, RecordKey, SourceOrderRepository,
    Titled,
};
use std::path::PathBuf;
use tempfile::TempDir;

const ORDERS_JSONL: &str = r##"{"order_number":"#1001","title":"#1001-R1","currency":"GBP","total":315.00,"shippingAddress":{"address1":"1 Main Street","town":"Test Town","city":"London","country_code":"UK","zip":"L1 1AA"},"line_items":[{"sku":"snow-sunglasses","title":"Snow Sunglasses","quantity":2,"price":110.00,"total":220.00},{"sku":"mountain-jacket","title":"Mountain Jacket","quantity":1,"price":95.00,"total":95.00}]}
{"order_number":"#1002","title":"#1002-R1","currency":"USD","total":425,"shippingAddress":{"address1":"456 Oak Avenue","town":"Springfield","city":"New York","country_code":"US","zip":"10001"},"line_items":[{"sku":"hiking-boots","title":"Hiking Boots","quantity":1,"price":250,"total":250},{"sku":"wool-socks","title":"Wool Socks","quantity":3,"price":25,"total":75},{"sku":"water-bottle","title":"Water Bottle","quantity":1,"price":100,"total":100}]}
"##;

fn write_fixture(dir: &TempDir, name: &str, content: &str) -> Result<PathBuf> {
    let path = dir.path().join(name);
    std::fs::write(&path, content)?;
    Ok(path)
}

fn repository(dir: &TempDir, content: &str) -> Result<SourceOrderRepository<order_ingest::FileDataSource>> {
    let path = write_fixture(dir, "orders.jsonl", content)?;
    Ok(SourceOrderRepository::new(
        DataSourceFactory::json_lines_file(path)?,
    ))
}

#[test]
fn test_find_all_reads_both_orders() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let repository = repository(&temp_dir, ORDERS_JSONL)?;

    let orders = repository.find_all()?;
    assert_eq!(orders.count(), 2);
    assert!(!orders.is_empty());

    let first = &orders.orders()[0];
    assert_eq!(first.order_number, "#1001");
    assert_eq!(first.title(), "#1001-R1");
    assert_eq!(first.currency, "GBP");
    assert_eq!(first.total_pence, 31500);
    assert_eq!(first.total_formatted(), "GBP 315.00");

    let second = &orders.orders()[1];
    assert_eq!(second.order_number, "#1002");
    assert_eq!(second.total_pence, 42500);
    assert_eq!(second.total_formatted(), "USD 425.00");
    assert_eq!(second.line_items.count(), 3);
    assert_eq!(second.line_items.total_value_pence(), 42500);
    assert!(second.line_items_match_total());

    let address = &second.shipping_address;
    assert_eq!(address.address1, "456 Oak Avenue");
    assert_eq!(address.town, "Springfield");
    assert_eq!(address.city, "New York");
    assert_eq!(address.country_code, "US");
    assert_eq!(address.zip, "10001");

    let socks = second.line_items.get(1).unwrap();
    assert_eq!(socks.sku, "wool-socks");
    assert_eq!(socks.quantity, 3);
    assert_eq!(socks.price_pence, 2500);
    assert_eq!(socks.total_pence, 7500);

    Ok(())
}

#[test]
fn test_find_by_id() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let repository = repository(&temp_dir, ORDERS_JSONL)?;

    let order = repository.find_by_id("#1002")?.expect("order #1002");
    assert_eq!(order.currency, "USD");
    assert_eq!(repository.find_by_id("#1001")?.unwrap().title, "#1001-R1");
    assert!(repository.find_by_id("#9999")?.is_none());

    Ok(())
}

#[test]
fn test_blank_lines_do_not_change_results() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let padded = format!("\n\n{}\n   \n", ORDERS_JSONL.replace('\n', "\n\n \n"));

    let plain = repository(&temp_dir, ORDERS_JSONL)?.find_all()?;
    let with_blanks = repository(&temp_dir, &padded)?.find_all()?;
    assert_eq!(plain, with_blanks);

    Ok(())
}

#[test]
fn test_stream_yields_records_in_file_order() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = write_fixture(&temp_dir, "orders.jsonl", ORDERS_JSONL)?;
    let source = DataSourceFactory::json_lines_file(path)?;
    assert!(source.supports_streaming());

    let streamed = source
        .stream()?
        .map(|item| item.map(|keyed| keyed.record))
        .collect::<order_ingest::Result<Vec<_>>>()?;
    assert_eq!(streamed, source.get_all()?);

    let numbers: Vec<String> = streamed
        .iter()
        .map(|r| r.get_str("order_number").unwrap().to_string())
        .collect();
    assert_eq!(numbers, vec!["#1001", "#1002"]);

    Ok(())
}

#[test]
fn test_stream_can_be_abandoned_early() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = write_fixture(&temp_dir, "orders.jsonl", ORDERS_JSONL)?;
    let source = DataSourceFactory::json_lines_file(path)?;

    let first = source.stream()?.next().expect("one record")?;
    assert_eq!(first.key, RecordKey::Index(0));
    assert!(first.record.contains_key("line_items"));

    // A fresh stream starts from the beginning again.
    assert_eq!(source.stream()?.count(), 2);
    Ok(())
}

#[test]
fn test_malformed_line_aborts_find_all() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let broken = format!("{}{{\"order_number\": \"#1003\",\n", ORDERS_JSONL);
    let repository = repository(&temp_dir, &broken)?;

    match repository.find_all() {
        Err(IngestError::LineParseError { line, .. }) => assert_eq!(line, 3),
        other => panic!("expected a line parse error, got {:?}", other.map(|o| o.count())),
    }
    Ok(())
}

#[test]
fn test_missing_shipping_address_aborts_find_all() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let broken = format!(
        "{}{}\n",
        ORDERS_JSONL,
        r##"{"order_number":"#1003","title":"#1003-R1","currency":"GBP","total":1,"line_items":[]}"##
    );
    let repository = repository(&temp_dir, &broken)?;

    match repository.find_all() {
        Err(IngestError::MappingError { record, field, .. }) => {
            assert_eq!(record, "#2 (#1003)");
            assert_eq!(field, "shippingAddress");
        }
        other => panic!("expected a mapping error, got {:?}", other.map(|o| o.count())),
    }

    // A mapping error in another record does not affect the lookup.
    assert!(repository.find_by_id("#1001")?.is_some());
    Ok(())
}
