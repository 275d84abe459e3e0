//! Handlers for the single-order and listing commands.

use chrono::Local;
use dialoguer::{theme::ColorfulTheme, Confirm};
use serde_json::json;
use tabled::{Table, Tabled};

use crate::adapter::inbound::cli::command::FilterArgs;
use crate::adapter::inbound::cli::output;
use crate::application::orders::{ListView, OrderSession};
use crate::domain::filter::parse_custom_date;
use crate::domain::page::{page_window, PageLink};
use crate::domain::{FilterState, OrderDetail, OrderId, OrderSummary};
use crate::error::{Error, Result};

#[derive(Tabled)]
struct OrderRow {
    #[tabled(rename = "#")]
    number: String,
    #[tabled(rename = "Customer")]
    customer: String,
    #[tabled(rename = "Type")]
    order_type: &'static str,
    #[tabled(rename = "Total")]
    total: String,
    #[tabled(rename = "Status")]
    status: &'static str,
    #[tabled(rename = "Placed")]
    placed: String,
    #[tabled(rename = "Id")]
    id: String,
}

impl OrderRow {
    fn new(order: &OrderSummary, view: &ListView) -> Self {
        Self {
            number: view.order_number(&order.id).unwrap_or("-").to_string(),
            customer: order.full_name.clone(),
            order_type: order.order_type.label(),
            total: order.total.to_string(),
            status: status_label(order.is_completed),
            placed: order
                .created_at
                .map(|t| t.with_timezone(&Local).format("%d %b %H:%M").to_string())
                .unwrap_or_default(),
            id: order.id.to_string(),
        }
    }
}

fn status_label(completed: bool) -> &'static str {
    if completed {
        "Completed"
    } else {
        "Pending"
    }
}

/// Build a [`FilterState`] from command-line filter flags.
pub fn filters_from_args(args: &FilterArgs) -> Result<FilterState> {
    let custom_date = args
        .custom_date
        .as_deref()
        .map(parse_custom_date)
        .transpose()?;
    Ok(FilterState::new(args.date, args.order_type).with_custom_date(custom_date))
}

/// Render the page window as `1 … 4 5 [6] 7 8 … 12`.
pub fn format_page_window(current: u32, total_pages: u32) -> String {
    page_window(current, total_pages)
        .into_iter()
        .map(|link| match link {
            PageLink::Page(p) if p == current => format!("[{p}]"),
            PageLink::Page(p) => p.to_string(),
            PageLink::Gap => "…".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Print the current list view.
pub fn print_view(view: &ListView) {
    if output::is_json() {
        output::json_output(json!({
            "command": "list",
            "view": view,
        }));
        return;
    }

    if let Some(error) = &view.error {
        output::error(&error.message);
        return;
    }

    output::section(&format!("Orders ({} total)", view.total_count));
    if view.orders.is_empty() {
        output::note("No orders found.");
    } else {
        let rows: Vec<OrderRow> = view.orders.iter().map(|o| OrderRow::new(o, view)).collect();
        output::lines(&Table::new(rows).to_string());
    }
    output::field(
        "Page",
        format!(
            "{} of {}   {}",
            view.page,
            view.total_pages,
            format_page_window(view.page, view.total_pages)
        ),
    );
}

/// Execute `list`.
pub async fn execute_list(session: &OrderSession, args: &FilterArgs, page: u32) -> Result<()> {
    let filters = filters_from_args(args)?;
    session.orders().set_filters(filters);

    let pb = output::spinner("Loading orders...");
    let outcome = session.orders().go_to_page(page).await;
    match outcome.error() {
        Some(error) => output::spinner_fail(&pb, &error.message),
        None => pb.finish_and_clear(),
    }

    let view = session.orders().current();
    print_view(&view);
    match view.error {
        Some(error) => Err(Error::Connection(error.message)),
        None => Ok(()),
    }
}

async fn load_detail(session: &OrderSession, id: &OrderId) -> Result<std::sync::Arc<OrderDetail>> {
    let pb = output::spinner("Loading order...");
    match session.details().get_detail(id).await {
        Some(detail) => {
            pb.finish_and_clear();
            Ok(detail)
        }
        None => {
            output::spinner_fail(&pb, "Order could not be loaded");
            Err(Error::OrderUnavailable(id.to_string()))
        }
    }
}

fn print_detail(detail: &OrderDetail, delivery_fee: rust_decimal::Decimal) {
    if output::is_json() {
        output::json_output(json!({
            "command": "show",
            "order": detail,
            "deliveryFee": delivery_fee,
        }));
        return;
    }

    let summary = &detail.summary;
    output::section("Order");
    output::field("Id", &summary.id);
    output::field("Customer", &summary.full_name);
    if let Some(mobile) = &summary.mobile_number {
        output::field("Mobile", mobile);
    }
    output::field("Type", summary.order_type.label());
    output::field(
        "Status",
        if summary.is_completed {
            output::positive("Completed")
        } else {
            output::highlight("Pending")
        },
    );
    if let Some(created) = summary.created_at {
        output::field(
            "Placed",
            created.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
        );
    }

    let fulfilment = &detail.fulfilment;
    for (label, value) in [
        ("Address", &fulfilment.delivery_address),
        ("Landmark", &fulfilment.nearest_landmark),
        ("Area", &fulfilment.area),
        ("Branch", &fulfilment.branch),
    ] {
        if let Some(value) = value {
            output::field(label, value);
        }
    }

    output::section(&format!("Items ({})", detail.item_count()));
    for item in &detail.items {
        let parsed = item.parsed();
        output::field(
            &format!("{} x{}", parsed.clean_name, parsed.quantity),
            item.amount(),
        );
    }

    output::section("Payment");
    output::field("Method", detail.payment.method_label());
    if let Some(bank) = &detail.payment.bank_name {
        output::field("Bank", bank);
    }
    if let Some(code) = &detail.payment.promo_code {
        output::field("Promo code", code);
    }
    if let Some(instructions) = &detail.payment.instructions {
        output::field("Instructions", instructions);
    }
    if let Some(change) = &detail.payment.change_request {
        output::field("Change for", change);
    }
    if let Some(receipt) = &detail.payment.receipt_image_url {
        output::field("Receipt", receipt);
    }
    output::field("Subtotal", detail.amounts.subtotal);
    output::field("Tax", detail.amounts.tax);
    if !delivery_fee.is_zero() {
        output::field("Delivery", delivery_fee);
    }
    if !detail.amounts.discount.is_zero() {
        output::field(
            "Discount",
            output::negative(format!(
                "-{} ({}%)",
                detail.amounts.discount, detail.amounts.discount_percentage
            )),
        );
    }
    output::field("Total", summary.total);
}

/// Execute `show`.
pub async fn execute_show(session: &OrderSession, id: &str) -> Result<()> {
    let id = OrderId::new(id);
    let detail = load_detail(session, &id).await?;
    let areas = session.delivery_areas().await;
    print_detail(&detail, crate::domain::bill::delivery_fee(&detail, areas));
    Ok(())
}

/// Execute `toggle`.
pub async fn execute_toggle(session: &OrderSession, id: &str) -> Result<()> {
    let id = OrderId::new(id);
    let detail = load_detail(session, &id).await?;

    let updated = session
        .toggle_completion(&id, detail.summary.is_completed)
        .await?;
    let status = status_label(updated.summary.is_completed);

    if output::is_json() {
        output::json_output(json!({
            "command": "toggle",
            "id": id,
            "isCompleted": updated.summary.is_completed,
        }));
    } else {
        output::success(&format!("Order {id} marked {}", status.to_lowercase()));
    }
    Ok(())
}

/// Execute `delete`.
pub async fn execute_delete(session: &OrderSession, id: &str, yes: bool) -> Result<()> {
    let id = OrderId::new(id);

    if !yes {
        if output::is_json() {
            return Err(Error::Connection(
                "refusing to delete without --yes in JSON mode".to_string(),
            ));
        }
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("Delete order {id}?"))
            .default(false)
            .interact()?;
        if !confirmed {
            output::note("Cancelled.");
            return Ok(());
        }
    }

    session.delete_order(&id).await?;

    if output::is_json() {
        output::json_output(json!({
            "command": "delete",
            "id": id,
            "deleted": true,
        }));
    } else {
        output::success(&format!("Order {id} deleted"));
    }
    Ok(())
}

/// Execute `bill`.
pub async fn execute_bill(session: &OrderSession, id: &str, kitchen: bool) -> Result<()> {
    let id = OrderId::new(id);

    if kitchen {
        let ticket = session
            .kitchen_ticket(&id)
            .await
            .ok_or_else(|| Error::OrderUnavailable(id.to_string()))?;
        if output::is_json() {
            output::json_output(json!({ "command": "bill", "kitchen": ticket }));
        } else {
            output::lines(&ticket.to_string());
        }
        return Ok(());
    }

    let bill = session
        .bill(&id)
        .await
        .ok_or_else(|| Error::OrderUnavailable(id.to_string()))?;
    if output::is_json() {
        output::json_output(json!({ "command": "bill", "bill": bill }));
    } else {
        output::lines(&bill.to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DateFilter, TypeFilter};

    fn args(date: DateFilter, custom: Option<&str>) -> FilterArgs {
        FilterArgs {
            date,
            custom_date: custom.map(str::to_string),
            order_type: TypeFilter::Delivery,
        }
    }

    #[test]
    fn filters_carry_custom_date() {
        let filters = filters_from_args(&args(DateFilter::Custom, Some("2024-03-05"))).unwrap();
        assert_eq!(filters.date, DateFilter::Custom);
        assert_eq!(filters.order_type, TypeFilter::Delivery);
        assert_eq!(
            filters.custom_date.map(|d| d.to_string()).as_deref(),
            Some("2024-03-05")
        );
    }

    #[test]
    fn filters_reject_bad_custom_date() {
        assert!(filters_from_args(&args(DateFilter::Custom, Some("05/03/2024"))).is_err());
    }

    #[test]
    fn page_window_marks_current_page() {
        assert_eq!(format_page_window(6, 12), "1 … 4 5 [6] 7 8 … 12");
        assert_eq!(format_page_window(1, 1), "[1]");
    }
}
