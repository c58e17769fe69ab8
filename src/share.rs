//! Messaging deep links summarising a placed order.

use std::fmt;

use thiserror::Error;
use url::form_urlencoded::byte_serialize;

use crate::models::{PlacedOrder, TIMESTAMP_FORMAT};

const MESSAGING_BASE: &str = "https://wa.me";
const MAPS_SEARCH_BASE: &str = "https://www.google.com/maps/search/?api=1&query=";

#[derive(Debug, Error)]
#[error("contact number must be the international number as digits only, got {0:?}")]
pub struct InvalidContact(pub String);

/// International phone number, digits only (country code first, no `+`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactNumber(String);

impl ContactNumber {
    pub fn parse(raw: &str) -> Result<Self, InvalidContact> {
        let raw = raw.trim();
        if raw.len() < 7 || !raw.chars().all(|c| c.is_ascii_digit()) {
            return Err(InvalidContact(raw.to_string()));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContactNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// `1234567` -> `1,234,567`.
pub fn group_thousands(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if amount < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[derive(Debug, Clone)]
pub struct ShareLinkFormatter {
    app_name: String,
    currency: String,
}

impl ShareLinkFormatter {
    pub fn new(app_name: impl Into<String>, currency: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            currency: currency.into(),
        }
    }

    /// Plain-text order summary.
    pub fn message(&self, placed: &PlacedOrder) -> String {
        let order = &placed.order;
        let mut lines = vec![
            format!("{} Order", self.app_name),
            format!("Order ID: {}", placed.order_id),
            format!("Time: {}", order.created_at().format(TIMESTAMP_FORMAT)),
            format!("Customer: {}", order.customer_name()),
            format!("Customer phone: {}", order.phone()),
            format!("Order type: {}", order.order_type()),
        ];
        let notes = order.row_notes();
        if !notes.is_empty() {
            lines.push(format!("Notes: {notes}"));
        }
        lines.push(String::new());
        lines.push("Items:".to_string());
        for line in order.lines() {
            lines.push(format!(
                "- {} × {} = {} {}",
                line.quantity(),
                line.name(),
                group_thousands(line.line_total()),
                self.currency
            ));
        }
        lines.push(String::new());
        lines.push(format!(
            "TOTAL: {} {}",
            group_thousands(order.grand_total()),
            self.currency
        ));
        lines.join("\n")
    }

    pub fn format_link(&self, placed: &PlacedOrder, target: &ContactNumber) -> String {
        let encoded: String = byte_serialize(self.message(placed).as_bytes()).collect();
        format!("{MESSAGING_BASE}/{target}?text={encoded}")
    }
}

/// Map search link for a delivery address; `None` when the address is blank.
pub fn maps_link(address: &str) -> Option<String> {
    let address = address.trim();
    if address.is_empty() {
        return None;
    }
    let encoded: String = byte_serialize(address.as_bytes()).collect();
    Some(format!("{MAPS_SEARCH_BASE}{encoded}"))
}
