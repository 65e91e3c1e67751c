//! Price the current cart without placing an order.

use anyhow::Result;
use gem_commerce::prelude::{PremiumSelections, PricingPolicy};

use super::options::PremiumOptions;
use super::QuoteArgs;
use crate::context::Context;

/// Run the quote command.
pub async fn run(args: QuoteArgs, ctx: &Context) -> Result<()> {
    let cart = ctx.open_cart()?;
    if cart.cart().is_empty() {
        ctx.output.info("Your cart is empty.");
        return Ok(());
    }

    let premium = if args.packaging.is_some() || args.insurance.is_some() {
        let api = ctx.api()?;
        let options = PremiumOptions::fetch(&api).await?;
        options.select(args.packaging.as_deref(), args.insurance.as_deref())?
    } else {
        PremiumSelections::new()
    };

    let policy = PricingPolicy::default();
    let promo = args.pricing.promo.as_deref().map(str::trim).filter(|p| !p.is_empty());
    if let Some(code) = promo {
        match policy.promos.lookup(code) {
            Some(promotion) => ctx.output.debug(&format!("promo {} applied", promotion.name)),
            None => ctx
                .output
                .warn(&format!("Promo code {} is not valid; no discount applied.", code)),
        }
    }

    let totals = policy.totals(cart.cart(), args.pricing.speed(), promo, &premium)?;

    if ctx.output.is_json() {
        ctx.output.json(&totals);
        return Ok(());
    }

    ctx.output.header(&format!(
        "Quote: {} items, {}",
        cart.cart().total_items(),
        args.pricing.speed().display_name()
    ));
    ctx.output.totals(&totals);
    Ok(())
}
