use crate::adapters::json_parser::json_type_name;
use crate::config::toml_config::IngestConfig;
use crate::core::data_source::FileDataSource;
use crate::core::factory::DataSourceFactory;
use crate::domain::model::{Record, RecordKey};
use crate::domain::money::to_minor_units;
use crate::domain::order::{Address, LineItem, LineItemCollection, Order, OrderCollection};
use crate::domain::ports::{DataSource, OrderRepository};
use crate::utils::error::{IngestError, Result};
use crate::utils::validation::Validate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info};

const ORDER_NUMBER: &str = "order_number";

/// How `find_by_id` locates a record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupStrategy {
    /// Walk every record comparing `order_number`.
    #[default]
    Scan,
    /// Ask the data source for the record keyed by the id, scanning when that misses.
    /// Only saves work when the source is keyed by `order_number`.
    DirectKey,
}

/// Maps the records of a data source into orders.
pub struct SourceOrderRepository<D: DataSource> {
    data_source: D,
    lookup: LookupStrategy,
}

impl<D: DataSource> SourceOrderRepository<D> {
    pub fn new(data_source: D) -> Self {
        Self::with_lookup(data_source, LookupStrategy::Scan)
    }

    pub fn with_lookup(data_source: D, lookup: LookupStrategy) -> Self {
        Self {
            data_source,
            lookup,
        }
    }

    pub fn data_source(&self) -> &D {
        &self.data_source
    }

    pub fn lookup(&self) -> LookupStrategy {
        self.lookup
    }

    fn scan_for(&self, id: &str) -> Result<Option<Order>> {
        if self.data_source.supports_streaming() {
            let mut found = None;
            // Every remaining record is still decoded so a bad line fails the call on both paths.
            for item in self.data_source.stream()? {
                let keyed = item?;
                if found.is_none() && keyed.record.get_str(ORDER_NUMBER) == Some(id) {
                    found = Some(map_order(&keyed.key, &keyed.record)?);
                }
            }
            return Ok(found);
        }

        self.data_source
            .get_all()?
            .iter()
            .enumerate()
            .find(|(_, record)| record.get_str(ORDER_NUMBER) == Some(id))
            .map(|(position, record)| map_order(&RecordKey::Index(position), record))
            .transpose()
    }

    fn fetch_by_key(&self, id: &str) -> Result<Option<Order>> {
        let key = RecordKey::Id(id.to_string());
        match self.data_source.get_one(&key)? {
            Some(record) if record.get_str(ORDER_NUMBER) == Some(id) => {
                map_order(&key, &record).map(Some)
            }
            _ => {
                debug!("No record keyed by {}, scanning order numbers", key);
                self.scan_for(id)
            }
        }
    }
}

impl SourceOrderRepository<FileDataSource> {
    /// Builds the data source and lookup strategy described by `config`.
    pub fn from_config(config: &IngestConfig) -> Result<Self> {
        config.validate()?;
        let data_source = DataSourceFactory::from_config(&config.source)?;
        Ok(Self::with_lookup(data_source, config.lookup_strategy()))
    }
}

impl<D: DataSource> OrderRepository for SourceOrderRepository<D> {
    fn find_all(&self) -> Result<OrderCollection> {
        let mut orders = OrderCollection::default();

        if self.data_source.supports_streaming() {
            debug!("Reading orders through the streaming path");
            for item in self.data_source.stream()? {
                let keyed = item?;
                orders.add(map_order(&keyed.key, &keyed.record)?);
            }
        } else {
            debug!("Reading orders through the batch path");
            for (position, record) in self.data_source.get_all()?.iter().enumerate() {
                orders.add(map_order(&RecordKey::Index(position), record)?);
            }
        }

        info!("Loaded {} orders", orders.count());
        Ok(orders)
    }

    fn find_by_id(&self, id: &str) -> Result<Option<Order>> {
        let found = match self.lookup {
            LookupStrategy::Scan => self.scan_for(id)?,
            LookupStrategy::DirectKey => self.fetch_by_key(id)?,
        };

        if found.is_none() {
            debug!("Order {} not found", id);
        }
        Ok(found)
    }
}

/// Identifies a record in error messages: its key, plus its order number when it has one.
fn describe(key: &RecordKey, record: &Record) -> String {
    match (key, record.get_str(ORDER_NUMBER)) {
        (RecordKey::Index(_), Some(number)) => format!("{} ({})", key, number),
        _ => key.to_string(),
    }
}

/// Converts one raw record into an order. Amounts become minor units here and nowhere else.
pub fn map_order(key: &RecordKey, record: &Record) -> Result<Order> {
    let ctx = describe(key, record);

    let address = object_at(&ctx, "shippingAddress", record.get("shippingAddress"))?;
    let shipping_address = Address {
        address1: string_at(&ctx, "shippingAddress.address1", address.get("address1"))?,
        town: string_at(&ctx, "shippingAddress.town", address.get("town"))?,
        city: string_at(&ctx, "shippingAddress.city", address.get("city"))?,
        country_code: string_at(&ctx, "shippingAddress.country_code", address.get("country_code"))?,
        zip: string_at(&ctx, "shippingAddress.zip", address.get("zip"))?,
    };

    let line_items = array_at(&ctx, "line_items", record.get("line_items"))?
        .iter()
        .enumerate()
        .map(|(index, value)| map_line_item(&ctx, index, value))
        .collect::<Result<LineItemCollection>>()?;

    Ok(Order {
        order_number: string_at(&ctx, ORDER_NUMBER, record.get(ORDER_NUMBER))?,
        title: string_at(&ctx, "title", record.get("title"))?,
        currency: string_at(&ctx, "currency", record.get("currency"))?,
        total_pence: pence_at(&ctx, "total", record.get("total"))?,
        shipping_address,
        line_items,
    })
}

fn map_line_item(ctx: &str, index: usize, value: &Value) -> Result<LineItem> {
    let path = |field: &str| format!("line_items[{}].{}", index, field);
    let item = object_at(ctx, &format!("line_items[{}]", index), Some(value))?;

    Ok(LineItem {
        sku: string_at(ctx, &path("sku"), item.get("sku"))?,
        title: string_at(ctx, &path("title"), item.get("title"))?,
        quantity: quantity_at(ctx, &path("quantity"), item.get("quantity"))?,
        price_pence: pence_at(ctx, &path("price"), item.get("price"))?,
        total_pence: pence_at(ctx, &path("total"), item.get("total"))?,
    })
}

fn require<'v>(ctx: &str, path: &str, value: Option<&'v Value>) -> Result<&'v Value> {
    value.ok_or_else(|| IngestError::mapping(ctx, path, "missing required field"))
}

fn wrong_type(ctx: &str, path: &str, expected: &str, found: &Value) -> IngestError {
    IngestError::mapping(
        ctx,
        path,
        format!("expected {}, found {}", expected, json_type_name(found)),
    )
}

fn string_at(ctx: &str, path: &str, value: Option<&Value>) -> Result<String> {
    match require(ctx, path, value)? {
        Value::String(text) => Ok(text.clone()),
        other => Err(wrong_type(ctx, path, "string", other)),
    }
}

fn object_at<'v>(ctx: &str, path: &str, value: Option<&'v Value>) -> Result<&'v Map<String, Value>> {
    match require(ctx, path, value)? {
        Value::Object(object) => Ok(object),
        other => Err(wrong_type(ctx, path, "object", other)),
    }
}

fn array_at<'v>(ctx: &str, path: &str, value: Option<&'v Value>) -> Result<&'v Vec<Value>> {
    match require(ctx, path, value)? {
        Value::Array(items) => Ok(items),
        other => Err(wrong_type(ctx, path, "array", other)),
    }
}

fn pence_at(ctx: &str, path: &str, value: Option<&Value>) -> Result<i64> {
    let value = require(ctx, path, value)?;
    to_minor_units(value).ok_or_else(|| wrong_type(ctx, path, "decimal amount", value))
}

fn quantity_at(ctx: &str, path: &str, value: Option<&Value>) -> Result<u32> {
    let value = require(ctx, path, value)?;
    value
        .as_u64()
        .and_then(|quantity| u32::try_from(quantity).ok())
        .ok_or_else(|| wrong_type(ctx, path, "non-negative integer", value))
}
