//! Wire types for the order API.
//!
//! The server returns documents straight from the document store, so any
//! numeric, id or date field may arrive either bare or wrapped in extended
//! JSON (`{"$numberInt": "5"}`, `{"$oid": "..."}`,
//! `{"$date": {"$numberLong": "..."}}`). The wrappers are unwrapped here,
//! once, and anything that matches none of the known shapes is a decode
//! error rather than a silently defaulted value.

use std::str::FromStr;

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::domain::{
    delivery::DeliveryArea,
    error::DomainError,
    id::OrderId,
    order::{Amounts, Fulfilment, LineItem, OrderDetail, OrderSummary, OrderType, Payment},
};
use crate::error::{Error, Result};
use crate::port::OrderListing;

/// Message reported for listing bodies without an `orders` array.
pub const INVALID_LISTING: &str = "Invalid data received from server";

#[derive(Deserialize)]
#[serde(untagged)]
enum WireNumber {
    Number(serde_json::Number),
    Text(String),
    Int {
        #[serde(rename = "$numberInt")]
        value: String,
    },
    Long {
        #[serde(rename = "$numberLong")]
        value: String,
    },
    Double {
        #[serde(rename = "$numberDouble")]
        value: String,
    },
    Decimal {
        #[serde(rename = "$numberDecimal")]
        value: String,
    },
}

impl WireNumber {
    fn raw(&self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(value)
            | Self::Int { value }
            | Self::Long { value }
            | Self::Double { value }
            | Self::Decimal { value } => value.trim().to_string(),
        }
    }

    fn to_decimal(&self) -> std::result::Result<Decimal, String> {
        let raw = self.raw();
        Decimal::from_str(&raw)
            .or_else(|_| Decimal::from_scientific(&raw))
            .map_err(|e| format!("invalid number '{raw}': {e}"))
    }

    fn to_u64(&self) -> std::result::Result<u64, String> {
        let raw = self.raw();
        raw.parse::<u64>()
            .or_else(|_| {
                // Whole floats such as 25.0
                Decimal::from_str(&raw)
                    .ok()
                    .filter(|d| d.fract().is_zero() && !d.is_sign_negative())
                    .and_then(|d| u64::try_from(d).ok())
                    .ok_or(())
            })
            .map_err(|()| format!("invalid count '{raw}'"))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireId {
    Plain(String),
    Oid {
        #[serde(rename = "$oid")]
        oid: String,
    },
    Nested {
        #[serde(rename = "_id")]
        id: Box<WireId>,
    },
}

impl WireId {
    fn into_string(self) -> String {
        match self {
            Self::Plain(s) | Self::Oid { oid: s } => s,
            Self::Nested { id } => id.into_string(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireDateValue {
    Text(String),
    Millis(i64),
    Long {
        #[serde(rename = "$numberLong")]
        value: String,
    },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireDate {
    Wrapped {
        #[serde(rename = "$date")]
        date: WireDateValue,
    },
    Bare(WireDateValue),
}

impl WireDate {
    fn to_datetime(&self) -> std::result::Result<DateTime<Utc>, String> {
        let value = match self {
            Self::Wrapped { date } | Self::Bare(date) => date,
        };
        let millis = match value {
            WireDateValue::Text(text) => {
                return DateTime::parse_from_rfc3339(text)
                    .map(|d| d.with_timezone(&Utc))
                    .map_err(|e| format!("invalid date '{text}': {e}"));
            }
            WireDateValue::Millis(ms) => *ms,
            WireDateValue::Long { value } => value
                .parse::<i64>()
                .map_err(|e| format!("invalid date millis '{value}': {e}"))?,
        };
        Utc.timestamp_millis_opt(millis)
            .single()
            .ok_or_else(|| format!("date out of range: {millis}"))
    }
}

/// Branch reference: an id, or the populated branch document.
#[derive(Deserialize)]
#[serde(untagged)]
enum WireBranch {
    Name(String),
    // Ahead of `Populated`, whose all-optional fields would match any object.
    Oid {
        #[serde(rename = "$oid")]
        oid: String,
    },
    Populated {
        #[serde(default)]
        name: Option<String>,
        #[serde(rename = "_id", default)]
        id: Option<WireId>,
    },
}

impl WireBranch {
    fn into_label(self) -> Option<String> {
        match self {
            Self::Name(s) | Self::Oid { oid: s } => Some(s),
            Self::Populated { name, id } => name.or_else(|| id.map(WireId::into_string)),
        }
    }
}

fn object_id<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    WireId::deserialize(deserializer).map(WireId::into_string)
}

fn opt_decimal<'de, D>(deserializer: D) -> std::result::Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<WireNumber>::deserialize(deserializer)?
        .map(|n| n.to_decimal())
        .transpose()
        .map_err(serde::de::Error::custom)
}

fn opt_count<'de, D>(deserializer: D) -> std::result::Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<WireNumber>::deserialize(deserializer)?
        .map(|n| n.to_u64())
        .transpose()
        .map_err(serde::de::Error::custom)
}

fn opt_datetime<'de, D>(deserializer: D) -> std::result::Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<WireDate>::deserialize(deserializer)?
        .map(|d| d.to_datetime())
        .transpose()
        .map_err(serde::de::Error::custom)
}

fn opt_branch<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<WireBranch>::deserialize(deserializer)?.and_then(WireBranch::into_label))
}

/// Text fields that older documents sometimes stored as numbers.
fn opt_text<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<WireNumber>::deserialize(deserializer)?.map(|n| n.raw()))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDto {
    #[serde(default, deserialize_with = "opt_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "opt_decimal")]
    pub price: Option<Decimal>,
    #[serde(rename = "type", default)]
    pub item_type: Option<String>,
}

impl From<ItemDto> for LineItem {
    fn from(dto: ItemDto) -> Self {
        Self {
            name: dto.name,
            price: dto.price.unwrap_or_default(),
            item_type: dto.item_type.filter(|t| !t.is_empty()),
        }
    }
}

/// An order document, as returned by both the listing and detail endpoints.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDto {
    #[serde(rename = "_id", deserialize_with = "object_id")]
    pub id: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default, deserialize_with = "opt_text")]
    pub mobile_number: Option<String>,
    #[serde(default)]
    pub order_type: Option<String>,
    #[serde(default, deserialize_with = "opt_decimal")]
    pub total: Option<Decimal>,
    #[serde(default)]
    pub is_completed: Option<bool>,
    #[serde(default, deserialize_with = "opt_datetime")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub items: Option<Vec<ItemDto>>,
    #[serde(default)]
    pub delivery_address: Option<String>,
    #[serde(default)]
    pub nearest_landmark: Option<String>,
    #[serde(default)]
    pub area: Option<String>,
    #[serde(default, deserialize_with = "opt_branch")]
    pub branch: Option<String>,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub payment_instructions: Option<String>,
    #[serde(default, deserialize_with = "opt_text")]
    pub change_request: Option<String>,
    #[serde(default)]
    pub receipt_image_url: Option<String>,
    #[serde(default)]
    pub bank_name: Option<String>,
    #[serde(default)]
    pub promo_code: Option<String>,
    #[serde(default, deserialize_with = "opt_decimal")]
    pub subtotal: Option<Decimal>,
    #[serde(default, deserialize_with = "opt_decimal")]
    pub tax: Option<Decimal>,
    #[serde(default, deserialize_with = "opt_decimal")]
    pub discount: Option<Decimal>,
    #[serde(default, deserialize_with = "opt_decimal")]
    pub discount_percentage: Option<Decimal>,
}

impl OrderDto {
    fn order_type(&self) -> Result<OrderType> {
        match self.order_type.as_deref() {
            None | Some("") => Ok(OrderType::default()),
            Some(raw) => raw
                .parse()
                .map_err(|e: DomainError| Error::MalformedResponse(format!("{INVALID_LISTING}: {e}"))),
        }
    }

    pub fn into_summary(self) -> Result<OrderSummary> {
        Ok(self.into_detail()?.summary)
    }

    pub fn into_detail(self) -> Result<OrderDetail> {
        let order_type = self.order_type()?;
        let summary = OrderSummary {
            id: OrderId::new(self.id),
            full_name: self.full_name.unwrap_or_default(),
            mobile_number: self.mobile_number,
            order_type,
            total: self.total.unwrap_or_default(),
            is_completed: self.is_completed.unwrap_or(false),
            created_at: self.created_at,
        };

        Ok(OrderDetail {
            summary,
            items: self
                .items
                .unwrap_or_default()
                .into_iter()
                .map(LineItem::from)
                .collect(),
            fulfilment: Fulfilment {
                delivery_address: self.delivery_address,
                nearest_landmark: self.nearest_landmark,
                area: self.area.filter(|a| !a.is_empty()),
                branch: self.branch,
            },
            payment: Payment {
                method: self.payment_method,
                instructions: self.payment_instructions,
                change_request: self.change_request,
                receipt_image_url: self.receipt_image_url,
                bank_name: self.bank_name,
                promo_code: self.promo_code,
            },
            amounts: Amounts {
                subtotal: self.subtotal.unwrap_or_default(),
                tax: self.tax.unwrap_or_default(),
                discount: self.discount.unwrap_or_default(),
                discount_percentage: self.discount_percentage.unwrap_or_default(),
            },
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListingTotals {
    #[serde(default, deserialize_with = "opt_count")]
    total_count: Option<u64>,
    #[serde(default, deserialize_with = "opt_count")]
    total_pages: Option<u64>,
    #[serde(default, deserialize_with = "opt_count")]
    current_page: Option<u64>,
}

fn small(count: Option<u64>) -> Option<u32> {
    count.map(|c| u32::try_from(c).unwrap_or(u32::MAX))
}

/// Decode a listing body.
///
/// A missing or non-array `orders` field yields
/// [`Error::MalformedResponse`] with [`INVALID_LISTING`]; so does an order
/// document of unexpected shape.
pub fn decode_listing(body: Value) -> Result<OrderListing> {
    let Value::Object(mut fields) = body else {
        return Err(Error::MalformedResponse(INVALID_LISTING.into()));
    };
    let Some(Value::Array(raw_orders)) = fields.remove("orders") else {
        return Err(Error::MalformedResponse(INVALID_LISTING.into()));
    };

    let totals: ListingTotals = serde_json::from_value(Value::Object(fields))
        .map_err(|e| Error::MalformedResponse(format!("{INVALID_LISTING}: {e}")))?;

    let orders = raw_orders
        .into_iter()
        .map(|raw| {
            serde_json::from_value::<OrderDto>(raw)
                .map_err(|e| Error::MalformedResponse(format!("{INVALID_LISTING}: {e}")))
                .and_then(OrderDto::into_summary)
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(OrderListing {
        orders,
        total_count: totals.total_count,
        total_pages: small(totals.total_pages),
        current_page: small(totals.current_page),
    })
}

/// Decode a detail body (detail and PATCH responses).
pub fn decode_detail(body: Value) -> Result<OrderDetail> {
    serde_json::from_value::<OrderDto>(body)
        .map_err(|e| Error::MalformedResponse(format!("invalid order document: {e}")))?
        .into_detail()
}

#[derive(Debug, Deserialize)]
struct DeliveryAreaDto {
    name: String,
    #[serde(default, deserialize_with = "opt_decimal")]
    fee: Option<Decimal>,
}

/// Decode the delivery-area table.
pub fn decode_delivery_areas(body: Value) -> Result<Vec<DeliveryArea>> {
    let dtos: Vec<DeliveryAreaDto> = serde_json::from_value(body)
        .map_err(|e| Error::MalformedResponse(format!("invalid delivery areas: {e}")))?;
    Ok(dtos
        .into_iter()
        .map(|dto| DeliveryArea {
            name: dto.name,
            fee: dto.fee.unwrap_or_default(),
        })
        .collect())
}
