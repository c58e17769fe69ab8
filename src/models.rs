use std::{fmt, str::FromStr};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize, Serializer};
use utoipa::ToSchema;

use crate::{cart::CartLine, share::group_thousands};

/// Wall-clock format used for order timestamps in rows and share links.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Transfer,
    Card,
}

impl PaymentMethod {
    pub fn label(self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Cash",
            PaymentMethod::Transfer => "Transfer",
            PaymentMethod::Card => "Card",
        }
    }
}

/// How the customer receives the order. Persisted by its display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderType {
    Pickup,
    Delivery,
    InPerson(PaymentMethod),
}

const PICKUP_LABEL: &str = "Pickup at Café";
const DELIVERY_LABEL: &str = "Delivery";
const IN_PERSON_PREFIX: &str = "POS – ";

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderType::Pickup => f.write_str(PICKUP_LABEL),
            OrderType::Delivery => f.write_str(DELIVERY_LABEL),
            OrderType::InPerson(method) => write!(f, "{IN_PERSON_PREFIX}{}", method.label()),
        }
    }
}

impl FromStr for OrderType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            PICKUP_LABEL => Ok(OrderType::Pickup),
            DELIVERY_LABEL => Ok(OrderType::Delivery),
            "POS – Cash" => Ok(OrderType::InPerson(PaymentMethod::Cash)),
            "POS – Transfer" => Ok(OrderType::InPerson(PaymentMethod::Transfer)),
            "POS – Card" => Ok(OrderType::InPerson(PaymentMethod::Card)),
            other => Err(format!("unknown order type {other:?}")),
        }
    }
}

impl Serialize for OrderType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A checked-out order before the store has numbered it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Order {
    created_at: NaiveDateTime,
    customer_name: String,
    phone: String,
    #[schema(value_type = String)]
    order_type: OrderType,
    notes: String,
    delivery_fee: i64,
    delivery_address: Option<String>,
    lines: Vec<CartLine>,
    grand_total: i64,
}

impl Order {
    /// Callers go through [`crate::assembler::assemble`], which validates inputs.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        created_at: NaiveDateTime,
        customer_name: String,
        phone: String,
        order_type: OrderType,
        notes: String,
        delivery_fee: i64,
        delivery_address: Option<String>,
        lines: Vec<CartLine>,
    ) -> Self {
        let grand_total = lines.iter().map(CartLine::line_total).sum::<i64>() + delivery_fee;
        Self {
            created_at,
            customer_name,
            phone,
            order_type,
            notes,
            delivery_fee,
            delivery_address,
            lines,
            grand_total,
        }
    }

    pub fn created_at(&self) -> NaiveDateTime {
        self.created_at
    }

    pub fn customer_name(&self) -> &str {
        &self.customer_name
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn order_type(&self) -> OrderType {
        self.order_type
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn delivery_fee(&self) -> i64 {
        self.delivery_fee
    }

    pub fn delivery_address(&self) -> Option<&str> {
        self.delivery_address.as_deref()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn subtotal(&self) -> i64 {
        self.grand_total - self.delivery_fee
    }

    pub fn grand_total(&self) -> i64 {
        self.grand_total
    }

    /// Notes as stored in the flattened row: free text, then delivery fee and
    /// address, joined with `" | "`.
    pub fn row_notes(&self) -> String {
        compose_row_notes(
            &self.notes,
            self.order_type == OrderType::Delivery,
            self.delivery_fee,
            self.delivery_address(),
        )
    }

    /// One denormalized row per line, as written to append-only stores.
    pub fn to_rows(&self, order_id: i64) -> Vec<OrderRow> {
        let notes = self.row_notes();
        self.lines
            .iter()
            .map(|line| OrderRow {
                timestamp: self.created_at,
                order_id,
                customer_name: self.customer_name.clone(),
                phone: self.phone.clone(),
                order_type: self.order_type.to_string(),
                notes: notes.clone(),
                item_name: line.name().to_string(),
                quantity: line.quantity(),
                unit_price: line.unit_price(),
                line_total: line.line_total(),
                order_total: self.grand_total,
            })
            .collect()
    }

    pub fn place(self, receipt: OrderReceipt) -> PlacedOrder {
        PlacedOrder {
            order_id: receipt.order_id,
            order: self,
        }
    }
}

/// Flattened-row encoding of the notes column. Delivery details ride along
/// in the free text so the row shape stays fixed.
pub(crate) fn compose_row_notes(
    notes: &str,
    is_delivery: bool,
    delivery_fee: i64,
    delivery_address: Option<&str>,
) -> String {
    let mut parts: Vec<String> = Vec::new();
    if !notes.trim().is_empty() {
        parts.push(notes.to_string());
    }
    if is_delivery {
        parts.push(format!("Delivery fee: ₦{}", group_thousands(delivery_fee)));
    }
    if let Some(address) = delivery_address.filter(|a| !a.trim().is_empty()) {
        parts.push(format!("Address: {address}"));
    }
    parts.join(" | ")
}

/// What a store hands back after a successful append.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct OrderReceipt {
    pub order_id: i64,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct PlacedOrder {
    pub order_id: i64,
    #[serde(flatten)]
    pub order: Order,
}

/// Flattened line-item row; the shape reporting tools read back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct OrderRow {
    pub timestamp: NaiveDateTime,
    pub order_id: i64,
    pub customer_name: String,
    pub phone: String,
    pub order_type: String,
    pub notes: String,
    pub item_name: String,
    #[serde(rename = "qty")]
    pub quantity: u32,
    #[serde(rename = "price_ngn")]
    pub unit_price: i64,
    #[serde(rename = "line_total_ngn")]
    pub line_total: i64,
    #[serde(rename = "order_total_ngn")]
    pub order_total: i64,
}

/// Column names, in row order.
pub const ORDER_ROW_HEADER: [&str; 11] = [
    "timestamp",
    "order_id",
    "customer_name",
    "phone",
    "order_type",
    "notes",
    "item_name",
    "qty",
    "price_ngn",
    "line_total_ngn",
    "order_total_ngn",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct OrderSummaryLine {
    pub item_name: String,
    pub quantity: u32,
    pub unit_price: i64,
    pub line_total: i64,
}

/// An order regrouped from its flattened rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct OrderSummary {
    pub order_id: i64,
    pub created_at: NaiveDateTime,
    pub customer_name: String,
    pub phone: String,
    pub order_type: String,
    pub notes: String,
    pub items: Vec<OrderSummaryLine>,
    pub grand_total: i64,
}

impl OrderSummary {
    /// Groups rows by order id, keeping the order in which ids first appear.
    /// Order-level fields come from the first row of each order.
    pub fn from_rows(rows: &[OrderRow]) -> Vec<OrderSummary> {
        let mut summaries: Vec<OrderSummary> = Vec::new();
        for row in rows {
            let line = OrderSummaryLine {
                item_name: row.item_name.clone(),
                quantity: row.quantity,
                unit_price: row.unit_price,
                line_total: row.line_total,
            };
            match summaries.iter_mut().find(|s| s.order_id == row.order_id) {
                Some(summary) => summary.items.push(line),
                None => summaries.push(OrderSummary {
                    order_id: row.order_id,
                    created_at: row.timestamp,
                    customer_name: row.customer_name.clone(),
                    phone: row.phone.clone(),
                    order_type: row.order_type.clone(),
                    notes: row.notes.clone(),
                    items: vec![line],
                    grand_total: row.order_total,
                }),
            }
        }
        summaries
    }

    pub fn items_total(&self) -> i64 {
        self.items.iter().map(|i| i.line_total).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_type_labels_round_trip() {
        for order_type in [
            OrderType::Pickup,
            OrderType::Delivery,
            OrderType::InPerson(PaymentMethod::Cash),
            OrderType::InPerson(PaymentMethod::Transfer),
            OrderType::InPerson(PaymentMethod::Card),
        ] {
            assert_eq!(order_type.to_string().parse::<OrderType>(), Ok(order_type));
        }
        assert!("Takeaway".parse::<OrderType>().is_err());
    }

    #[test]
    fn order_type_serializes_as_label() {
        let json = serde_json::to_string(&OrderType::InPerson(PaymentMethod::Card)).unwrap();
        assert_eq!(json, "\"POS – Card\"");
    }

    fn row(order_id: i64, item: &str, total: i64) -> OrderRow {
        OrderRow {
            timestamp: NaiveDateTime::parse_from_str("2025-01-02T10:00:00", TIMESTAMP_FORMAT)
                .unwrap(),
            order_id,
            customer_name: "Ada".into(),
            phone: "0803".into(),
            order_type: "Delivery".into(),
            notes: String::new(),
            item_name: item.into(),
            quantity: 1,
            unit_price: 1000,
            line_total: 1000,
            order_total: total,
        }
    }

    #[test]
    fn summaries_group_rows_by_order_id() {
        let rows = vec![row(1, "Tea", 2800), row(1, "Spice", 2800), row(2, "Tea", 1000)];
        let summaries = OrderSummary::from_rows(&rows);

        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].items.len(), 2);
        assert_eq!(summaries[0].items_total(), 2000);
        assert_eq!(summaries[0].grand_total, 2800);
        assert_eq!(summaries[1].order_id, 2);
    }
}
