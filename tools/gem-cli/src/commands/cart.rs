//! Cart commands. The cart is saved locally after every change.

use anyhow::{bail, Result};
use dialoguer::Confirm;
use gem_commerce::prelude::{
    CartStore, CatalogApi, PremiumSelections, PricingPolicy, ProductId, ShippingSpeed,
};

use super::{parse_customizations, CartArgs, CartCommand};
use crate::context::Context;

/// Run the cart command.
pub async fn run(args: CartArgs, ctx: &Context) -> Result<()> {
    match args.command {
        Some(CartCommand::Show) | None => show_cart(ctx),
        Some(CartCommand::Add {
            product_id,
            quantity,
            engrave,
            options,
        }) => add_item(&product_id, quantity, engrave.as_deref(), &options, ctx).await,
        Some(CartCommand::Remove { product_id }) => remove_item(&product_id, ctx),
        Some(CartCommand::Update {
            product_id,
            quantity,
        }) => update_quantity(&product_id, quantity, ctx),
        Some(CartCommand::Clear { yes }) => clear_cart(yes, ctx),
    }
}

fn show_cart(ctx: &Context) -> Result<()> {
    let cart = ctx.open_cart()?;
    print_cart(cart.cart(), ctx)
}

/// Print the cart's lines and a standard-shipping estimate.
pub fn print_cart(cart: &CartStore, ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(cart);
        return Ok(());
    }

    if cart.is_empty() {
        ctx.output.info("Your cart is empty.");
        return Ok(());
    }

    ctx.output
        .header(&format!("Cart ({} items)", cart.total_items()));
    ctx.output
        .table_row(&["PRODUCT", "NAME", "QTY", "EACH", "TOTAL"], &[20, 30, 5, 12, 12]);
    for line in cart.items() {
        ctx.output.table_row(
            &[
                line.product_id.as_str(),
                &line.name,
                &line.quantity.to_string(),
                &line.unit_price.display(),
                &line.total_price.display(),
            ],
            &[20, 30, 5, 12, 12],
        );
        for (key, value) in &line.customizations {
            ctx.output.kv(&format!("    {}", key), value);
        }
    }

    let totals = PricingPolicy::default().totals(
        cart,
        ShippingSpeed::Standard,
        None,
        &PremiumSelections::new(),
    )?;
    ctx.output.info("");
    ctx.output.totals(&totals);
    Ok(())
}

async fn add_item(
    product_id: &str,
    quantity: u32,
    engrave: Option<&str>,
    options: &[String],
    ctx: &Context,
) -> Result<()> {
    if quantity == 0 {
        bail!("Quantity must be at least 1");
    }
    let customizations = parse_customizations(engrave, options)?;

    let api = ctx.api()?;
    let spinner = ctx.output.spinner("Looking up product...");
    let product = api.product(&ProductId::new(product_id)).await;
    spinner.finish_and_clear();
    let product = product?;

    if !product.in_stock {
        ctx.output
            .warn(&format!("{} is currently out of stock.", product.name));
    }

    let mut cart = ctx.open_cart()?;
    let (line, notice) = cart.add_item(&product, quantity, customizations)?;
    ctx.output.conflict(notice);

    if ctx.output.is_json() {
        ctx.output.json(&line);
        return Ok(());
    }
    ctx.output.success(&format!(
        "Added {} x {} ({} in cart, {} each)",
        quantity,
        line.name,
        line.quantity,
        line.unit_price.display()
    ));
    ctx.output.debug(&format!("cart version {}", cart.version()));
    Ok(())
}

fn remove_item(product_id: &str, ctx: &Context) -> Result<()> {
    let mut cart = ctx.open_cart()?;
    let (removed, notice) = cart.remove_item(&ProductId::new(product_id))?;
    ctx.output.conflict(notice);

    if removed {
        ctx.output.success(&format!("Removed {}", product_id));
    } else {
        ctx.output
            .info(&format!("{} is not in your cart.", product_id));
    }
    Ok(())
}

fn update_quantity(product_id: &str, quantity: u32, ctx: &Context) -> Result<()> {
    let mut cart = ctx.open_cart()?;
    let id = ProductId::new(product_id);
    let (changed, notice) = cart.update_quantity(&id, quantity)?;
    ctx.output.conflict(notice);

    match (changed, quantity) {
        (false, _) => ctx
            .output
            .info(&format!("{} is not in your cart.", product_id)),
        (true, 0) => ctx.output.success(&format!("Removed {}", product_id)),
        (true, _) => ctx
            .output
            .success(&format!("{} quantity set to {}", product_id, quantity)),
    }
    Ok(())
}

fn clear_cart(yes: bool, ctx: &Context) -> Result<()> {
    let mut cart = ctx.open_cart()?;
    if cart.cart().is_empty() {
        ctx.output.info("Your cart is already empty.");
        return Ok(());
    }

    if !yes && !ctx.output.is_json() {
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Remove all {} items from your cart?",
                cart.cart().total_items()
            ))
            .default(false)
            .interact()?;
        if !confirmed {
            ctx.output.info("Cart left unchanged.");
            return Ok(());
        }
    }

    let notice = cart.clear()?;
    ctx.output.conflict(notice);
    ctx.output.success("Cart cleared");
    Ok(())
}
