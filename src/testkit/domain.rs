//! Builders for domain values used across tests.

use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;

use crate::domain::{
    id::OrderId,
    order::{Amounts, Fulfilment, LineItem, OrderDetail, OrderSummary, OrderType, Payment},
};
use crate::port::OrderListing;

/// A pending delivery order with a deterministic id and total.
pub fn summary(id: &str) -> OrderSummary {
    OrderSummary {
        id: OrderId::new(id),
        full_name: format!("Customer {id}"),
        mobile_number: Some("03001234567".into()),
        order_type: OrderType::Delivery,
        total: Decimal::from(1000),
        is_completed: false,
        created_at: Utc.with_ymd_and_hms(2024, 3, 9, 12, 0, 0).single(),
    }
}

/// `n` summaries with ids `{prefix}0 .. {prefix}{n-1}`.
pub fn summaries(prefix: &str, n: usize) -> Vec<OrderSummary> {
    (0..n).map(|i| summary(&format!("{prefix}{i}"))).collect()
}

/// Detail record wrapping [`summary`] with two line items.
pub fn detail(id: &str) -> OrderDetail {
    OrderDetail {
        summary: summary(id),
        items: vec![
            LineItem {
                name: Some("Zinger Burger x2".into()),
                price: Decimal::from(450),
                item_type: Some("burger".into()),
            },
            LineItem {
                name: Some("Fries".into()),
                price: Decimal::from(100),
                item_type: None,
            },
        ],
        fulfilment: Fulfilment {
            delivery_address: Some("House 12, Street 4, Landhi".into()),
            ..Default::default()
        },
        payment: Payment {
            method: Some("cod".into()),
            ..Default::default()
        },
        amounts: Amounts {
            subtotal: Decimal::from(1000),
            ..Default::default()
        },
    }
}

/// Listing of `orders` with explicit totals.
pub fn listing(orders: Vec<OrderSummary>, total_count: u64, total_pages: u32) -> OrderListing {
    OrderListing {
        orders,
        total_count: Some(total_count),
        total_pages: Some(total_pages),
        current_page: None,
    }
}

/// Listing without totals, as some server versions send it.
pub fn bare_listing(orders: Vec<OrderSummary>) -> OrderListing {
    OrderListing {
        orders,
        total_count: None,
        total_pages: None,
        current_page: None,
    }
}
