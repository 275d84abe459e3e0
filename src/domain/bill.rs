//! Bill and kitchen-ticket contents for an order.
//!
//! These are the numbers and lines that go on printed slips; layout and
//! printing belong to the caller.

use std::fmt;

use rust_decimal::Decimal;
use serde::Serialize;

use super::delivery::{area_from_address, DeliveryAreas};
use super::order::{OrderDetail, OrderType};

/// One numbered bill line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BillLine {
    pub index: usize,
    pub description: String,
    pub quantity: u32,
    pub rate: Decimal,
    pub amount: Decimal,
}

/// Pre-bill / payment receipt contents.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    pub order_number: Option<String>,
    pub order_type: OrderType,
    pub customer: String,
    pub lines: Vec<BillLine>,
    pub gross_amount: Decimal,
    pub sales_tax: Decimal,
    pub delivery_charges: Decimal,
    pub discount: Decimal,
    pub discount_percentage: Decimal,
    pub bill_amount: Decimal,
    pub payment: &'static str,
}

/// Delivery fee owed by an order: the area's fee for delivery orders, 0 for
/// pickup. The area comes from the order, else from its address.
#[must_use]
pub fn delivery_fee(order: &OrderDetail, areas: &DeliveryAreas) -> Decimal {
    if order.summary.order_type != OrderType::Delivery {
        return Decimal::ZERO;
    }
    let area = order.fulfilment.area.clone().or_else(|| {
        order
            .fulfilment
            .delivery_address
            .as_deref()
            .and_then(area_from_address)
    });
    areas.fee_for(area.as_deref())
}

impl Bill {
    #[must_use]
    pub fn from_order(order: &OrderDetail, delivery_charges: Decimal, order_number: Option<&str>) -> Self {
        let lines = order
            .items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let parsed = item.parsed();
                BillLine {
                    index: i + 1,
                    description: parsed.clean_name,
                    quantity: parsed.quantity,
                    rate: item.price,
                    amount: item.price * Decimal::from(parsed.quantity),
                }
            })
            .collect();

        Self {
            order_number: order_number.map(str::to_string),
            order_type: order.summary.order_type,
            customer: order.summary.full_name.clone(),
            lines,
            gross_amount: order.amounts.subtotal,
            sales_tax: order.amounts.tax,
            delivery_charges,
            discount: order.amounts.discount,
            discount_percentage: order.amounts.discount_percentage,
            bill_amount: order.summary.total,
            payment: order.payment.method_label(),
        }
    }
}

impl fmt::Display for Bill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ORDER #: {}", self.order_number.as_deref().unwrap_or("----"))?;
        writeln!(f, "TYPE: {}", self.order_type.label())?;
        writeln!(f, "Customer: {}", self.customer)?;
        writeln!(f, "{:<4} {:<28} {:>4} {:>9} {:>10}", "SR.#", "DESCRIPTION", "QTY", "RATE", "AMOUNT")?;
        for line in &self.lines {
            writeln!(
                f,
                "{:<4} {:<28} {:>4} {:>9} {:>10}",
                line.index, line.description, line.quantity, line.rate, line.amount
            )?;
        }
        writeln!(f, "Item(s): {}  Gross Amount: {}", self.lines.len(), self.gross_amount)?;
        writeln!(f, "Sales Tax: {}", self.sales_tax)?;
        writeln!(f, "Delivery Charges: {}", self.delivery_charges)?;
        writeln!(f, "Discount {}%: {}", self.discount_percentage, self.discount)?;
        writeln!(f, "Bill Amount: {}", self.bill_amount)?;
        write!(f, "Payment: {}", self.payment)
    }
}

/// Kitchen order ticket: descriptions and quantities only.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KitchenTicket {
    pub order_number: Option<String>,
    pub order_type: OrderType,
    pub lines: Vec<(String, u32)>,
}

impl KitchenTicket {
    #[must_use]
    pub fn from_order(order: &OrderDetail, order_number: Option<&str>) -> Self {
        Self {
            order_number: order_number.map(str::to_string),
            order_type: order.summary.order_type,
            lines: order
                .items
                .iter()
                .map(|item| {
                    let parsed = item.parsed();
                    (parsed.clean_name, parsed.quantity)
                })
                .collect(),
        }
    }
}

impl fmt::Display for KitchenTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "KOT: Kitchen 1")?;
        writeln!(f, "ORDER # : {}", self.order_number.as_deref().unwrap_or("----"))?;
        writeln!(f, "TYPE: {}", self.order_type.label())?;
        writeln!(f, "{:<32} {:>4}", "DESCRIPTION", "Qty")?;
        for (name, quantity) in &self.lines {
            writeln!(f, "{name:<32} {quantity:>4}")?;
        }
        Ok(())
    }
}
