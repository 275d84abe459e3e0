//! Order records as the dashboard sees them.
//!
//! [`OrderSummary`] is the list projection; [`OrderDetail`] extends it with
//! line items, fulfilment and payment metadata and the monetary breakdown.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::id::OrderId;
use super::item_name::{parse_item_name, ParsedItemName};

/// How the order reaches the customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    #[default]
    Delivery,
    Pickup,
}

impl OrderType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Delivery => "delivery",
            Self::Pickup => "pickup",
        }
    }

    /// Capitalized form printed on slips ("Delivery", "Pickup").
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Delivery => "Delivery",
            Self::Pickup => "Pickup",
        }
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "delivery" => Ok(Self::Delivery),
            "pickup" => Ok(Self::Pickup),
            _ => Err(DomainError::UnknownOrderType {
                value: s.to_string(),
            }),
        }
    }
}

/// Lightweight order projection used in list views.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub id: OrderId,
    pub full_name: String,
    pub mobile_number: Option<String>,
    pub order_type: OrderType,
    pub total: Decimal,
    pub is_completed: bool,
    pub created_at: Option<DateTime<Utc>>,
}

/// One ordered line. Quantity may be encoded in the name ("2x Burger").
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub name: Option<String>,
    pub price: Decimal,
    pub item_type: Option<String>,
}

impl LineItem {
    /// Quantity and display name recovered from the free-text name.
    #[must_use]
    pub fn parsed(&self) -> ParsedItemName {
        parse_item_name(self.name.as_deref())
    }

    /// Unit price times parsed quantity.
    #[must_use]
    pub fn amount(&self) -> Decimal {
        self.price * Decimal::from(self.parsed().quantity)
    }
}

/// Delivery or pickup metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Fulfilment {
    pub delivery_address: Option<String>,
    pub nearest_landmark: Option<String>,
    pub area: Option<String>,
    /// Branch name, or its id when the server did not populate it.
    pub branch: Option<String>,
}

/// Payment metadata captured at checkout.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub method: Option<String>,
    pub instructions: Option<String>,
    pub change_request: Option<String>,
    pub receipt_image_url: Option<String>,
    pub bank_name: Option<String>,
    pub promo_code: Option<String>,
}

impl Payment {
    /// "Cash" for cash-on-delivery, "Online Payment" otherwise.
    #[must_use]
    pub fn method_label(&self) -> &'static str {
        match self.method.as_deref() {
            Some("cod") => "Cash",
            _ => "Online Payment",
        }
    }
}

/// Monetary breakdown; the grand total lives on the summary.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Amounts {
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub discount: Decimal,
    pub discount_percentage: Decimal,
}

/// Full order record including line items and payment breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetail {
    #[serde(flatten)]
    pub summary: OrderSummary,
    pub items: Vec<LineItem>,
    pub fulfilment: Fulfilment,
    pub payment: Payment,
    pub amounts: Amounts,
}

impl OrderDetail {
    #[must_use]
    pub fn id(&self) -> &OrderId {
        &self.summary.id
    }

    /// Number of lines (not units) on the order.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.items.len()
    }
}
