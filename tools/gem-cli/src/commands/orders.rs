//! Order history commands.

use anyhow::{Context as _, Result};
use gem_commerce::prelude::{Order, OrderApi, OrderId, ServiceError};

use super::{OrdersArgs, OrdersCommand};
use crate::context::Context;
use crate::output::{format_timestamp, status_badge};

/// Run the orders command.
pub async fn run(args: OrdersArgs, ctx: &Context) -> Result<()> {
    match args.command {
        Some(OrdersCommand::List) | None => list_orders(args.limit, ctx).await,
        Some(OrdersCommand::Show { id }) => show_order(&id, ctx).await,
    }
}

/// Hint for the failures a signed-out customer will hit.
fn explain(error: ServiceError) -> anyhow::Error {
    if error.is_unauthorized() {
        anyhow::Error::new(error)
            .context("Sign-in required: set GEM_API_TOKEN or api.token in gem.toml")
    } else {
        error.into()
    }
}

/// Newest first; orders without a timestamp sort last.
pub fn sort_newest_first(orders: &mut [Order]) {
    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

async fn list_orders(limit: Option<usize>, ctx: &Context) -> Result<()> {
    let api = ctx.api()?;
    let spinner = ctx.output.spinner("Loading orders...");
    let result = api.my_orders().await;
    spinner.finish_and_clear();
    let mut orders = result.map_err(explain)?;

    sort_newest_first(&mut orders);
    if let Some(limit) = limit {
        orders.truncate(limit);
    }

    if ctx.output.is_json() {
        ctx.output.json(&orders);
        return Ok(());
    }

    if orders.is_empty() {
        ctx.output.info("You have no orders yet.");
        return Ok(());
    }

    ctx.output.header("Your orders");
    ctx.output.table_row(
        &["ORDER", "PLACED", "STATUS", "ITEMS", "TOTAL"],
        &[26, 24, 12, 6, 12],
    );
    for order in &orders {
        let placed = order
            .created_at
            .as_deref()
            .map(format_timestamp)
            .unwrap_or_else(|| "-".to_string());
        ctx.output.table_row(
            &[
                order.reference(),
                &placed,
                &status_badge(order.status),
                &order.item_count().to_string(),
                &order.total.display(),
            ],
            &[26, 24, 12, 6, 12],
        );
    }

    Ok(())
}

async fn show_order(id: &str, ctx: &Context) -> Result<()> {
    let api = ctx.api()?;
    let order = api
        .order(&OrderId::new(id))
        .await
        .map_err(explain)
        .with_context(|| format!("Failed to load order {}", id))?;

    if ctx.output.is_json() {
        ctx.output.json(&order);
        return Ok(());
    }

    ctx.output.header(&format!("Order {}", order.reference()));
    ctx.output.kv("ID", order.id.as_str());
    ctx.output.kv("Status", &status_badge(order.status));
    ctx.output.kv("Payment", order.payment_status.as_str());
    if let Some(created) = &order.created_at {
        ctx.output.kv("Placed", &format_timestamp(created));
    }
    ctx.output.kv("Delivery", order.shipping_speed.display_name());
    if let Some(address) = &order.shipping_address {
        ctx.output.kv("Ship to", &address.one_line());
    }
    if let Some(payment) = &order.payment {
        ctx.output
            .kv("Card", &format!("{} ending {}", payment.card_name, payment.last_four));
    }
    if let Some(code) = &order.promo_code {
        ctx.output.kv("Promo", code);
    }
    if let Some(gift) = order
        .premium_services
        .as_ref()
        .and_then(|p| p.gift_message.as_deref())
    {
        ctx.output.kv("Gift message", gift);
    }

    if !order.items.is_empty() {
        ctx.output.info("");
        for line in &order.items {
            ctx.output.list_item(&format!(
                "{} x {}  {}",
                line.quantity,
                line.name,
                line.price.display()
            ));
        }
    }
    ctx.output.info("");
    ctx.output.kv("Total", &order.total.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(id: &str, created_at: Option<&str>) -> Order {
        serde_json::from_value(serde_json::json!({
            "_id": id,
            "total": 10,
            "createdAt": created_at,
        }))
        .unwrap()
    }

    #[test]
    fn test_sort_newest_first() {
        let mut orders = vec![
            order("a", Some("2026-01-05T10:00:00Z")),
            order("b", None),
            order("c", Some("2026-03-01T10:00:00Z")),
        ];
        sort_newest_first(&mut orders);
        let ids: Vec<&str> = orders.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_unauthorized_gets_hint() {
        let err = explain(ServiceError {
            message: "Not authorized".to_string(),
            status: Some(401),
        });
        assert!(format!("{:#}", err).contains("GEM_API_TOKEN"));

        let plain = explain(ServiceError::new("boom"));
        assert_eq!(plain.to_string(), "boom");
    }
}
