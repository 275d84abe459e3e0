//! Display codes for orders within a listing.
//!
//! Codes are cosmetic: the order at response index `i` on page `p` is
//! numbered `(p - 1) * page_size + i + 1` and rendered as the prefix plus a
//! zero-padded three-digit sequence (`king-011`). They depend on the
//! server's sort order and total at fetch time, so the same order may get a
//! different code after a refetch.

use std::collections::HashMap;

use serde::Serialize;

use super::id::OrderId;
use super::order::OrderSummary;

/// Default code prefix.
pub const DEFAULT_ORDER_NUMBER_PREFIX: &str = "king-";

/// Minimum digits in the sequence part of a code.
pub const ORDER_NUMBER_WIDTH: usize = 3;

/// Format one display code.
#[must_use]
pub fn format_order_number(prefix: &str, sequence: u64) -> String {
    format!("{prefix}{sequence:0width$}", width = ORDER_NUMBER_WIDTH)
}

/// Order id to display code for one page of results.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct OrderNumberMap(HashMap<OrderId, String>);

impl OrderNumberMap {
    /// Number the orders of `page` in response order.
    #[must_use]
    pub fn for_page(orders: &[OrderSummary], page: u32, page_size: u32, prefix: &str) -> Self {
        let offset = u64::from(page.saturating_sub(1)) * u64::from(page_size);
        let codes = orders
            .iter()
            .enumerate()
            .map(|(index, order)| {
                let sequence = offset + index as u64 + 1;
                (order.id.clone(), format_order_number(prefix, sequence))
            })
            .collect();
        Self(codes)
    }

    #[must_use]
    pub fn get(&self, id: &OrderId) -> Option<&str> {
        self.0.get(id).map(String::as_str)
    }

    pub fn remove(&mut self, id: &OrderId) -> Option<String> {
        self.0.remove(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
