use crate::domain::money::format_minor_units;

/// Anything that carries a human-readable title.
pub trait Titled {
    fn title(&self) -> &str;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    pub address1: String,
    pub town: String,
    pub city: String,
    pub country_code: String,
    pub zip: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItem {
    pub sku: String,
    pub title: String,
    pub quantity: u32,
    pub price_pence: i64,
    pub total_pence: i64,
}

impl Titled for LineItem {
    fn title(&self) -> &str {
        &self.title
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineItemCollection {
    items: Vec<LineItem>,
}

impl LineItemCollection {
    pub fn new(items: Vec<LineItem>) -> Self {
        Self { items }
    }

    pub fn add(&mut self, item: LineItem) {
        self.items.push(item);
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LineItem> {
        self.items.iter()
    }

    pub fn get(&self, index: usize) -> Option<&LineItem> {
        self.items.get(index)
    }

    pub fn count(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of every item's `total_pence`.
    pub fn total_value_pence(&self) -> i64 {
        self.items.iter().map(|item| item.total_pence).sum()
    }
}

impl FromIterator<LineItem> for LineItemCollection {
    fn from_iter<I: IntoIterator<Item = LineItem>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl IntoIterator for LineItemCollection {
    type Item = LineItem;
    type IntoIter = std::vec::IntoIter<LineItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a LineItemCollection {
    type Item = &'a LineItem;
    type IntoIter = std::slice::Iter<'a, LineItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub order_number: String,
    pub title: String,
    pub currency: String,
    pub total_pence: i64,
    pub shipping_address: Address,
    pub line_items: LineItemCollection,
}

impl Order {
    /// `"<currency> <amount>"`, e.g. `GBP 1,315.00`.
    pub fn total_formatted(&self) -> String {
        format!("{} {}", self.currency, format_minor_units(self.total_pence))
    }

    /// Whether the order total agrees with the sum of its line items.
    ///
    /// Source data is not required to satisfy this, so it is never checked on construction.
    pub fn line_items_match_total(&self) -> bool {
        self.line_items.total_value_pence() == self.total_pence
    }
}

impl Titled for Order {
    fn title(&self) -> &str {
        &self.title
    }
}

/// Orders in source order. Duplicate order numbers are allowed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderCollection {
    orders: Vec<Order>,
}

impl OrderCollection {
    pub fn new(orders: Vec<Order>) -> Self {
        Self { orders }
    }

    pub fn add(&mut self, order: Order) {
        self.orders.push(order);
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Order> {
        self.orders.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Order> {
        self.orders.get(index)
    }

    /// First order carrying `order_number`.
    pub fn find_by_number(&self, order_number: &str) -> Option<&Order> {
        self.orders
            .iter()
            .find(|order| order.order_number == order_number)
    }

    pub fn count(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}

impl FromIterator<Order> for OrderCollection {
    fn from_iter<I: IntoIterator<Item = Order>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl IntoIterator for OrderCollection {
    type Item = Order;
    type IntoIter = std::vec::IntoIter<Order>;

    fn into_iter(self) -> Self::IntoIter {
        self.orders.into_iter()
    }
}

impl<'a> IntoIterator for &'a OrderCollection {
    type Item = &'a Order;
    type IntoIter = std::slice::Iter<'a, Order>;

    fn into_iter(self) -> Self::IntoIter {
        self.orders.iter()
    }
}
