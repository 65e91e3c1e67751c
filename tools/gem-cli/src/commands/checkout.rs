//! Interactive checkout: shipping, premium services, payment, review.

use anyhow::{bail, Result};
use dialoguer::{Confirm, Input, Password, Select};
use gem_commerce::prelude::{
    CartStore, CheckoutError, CheckoutSession, CheckoutState, CheckoutStep, OrderApi,
    PaymentForm, PremiumSelections, ShippingForm, StepInput,
};

use super::options::PremiumOptions;
use super::CheckoutArgs;
use crate::context::Context;

/// Steps before submission, for the `[n/4]` prefix.
const STEPS: u8 = 4;

/// What the user picked at the top of a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Nav {
    Continue,
    Back,
    Cancel,
}

/// Run the checkout command.
pub async fn run(args: CheckoutArgs, ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        bail!("Checkout is interactive; run it without --json");
    }

    let mut cart = ctx.open_cart()?;
    if cart.cart().is_empty() {
        ctx.output.info("Your cart is empty.");
        return Ok(());
    }

    let api = ctx.api()?;
    let mut session = CheckoutSession::new();
    session.set_speed(args.pricing.speed());
    if let Some(code) = args.pricing.promo.as_deref() {
        if !session.apply_promo(code) && !code.trim().is_empty() {
            ctx.output
                .warn(&format!("Promo code {} is not valid; no discount applied.", code.trim()));
        }
    }

    let spinner = ctx.output.spinner("Loading premium services...");
    let options = PremiumOptions::fetch(&api).await;
    spinner.finish_and_clear();
    let options = options.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "premium options unavailable");
        ctx.output.warn("Premium services are unavailable right now.");
        PremiumOptions::default()
    });

    // Raw entries survive validation failures so the user can fix them.
    let mut shipping_entry: Option<ShippingForm> = None;
    let mut payment_entry: Option<PaymentForm> = None;

    loop {
        let step = session.step();
        match step {
            CheckoutStep::Shipping => {
                ctx.output.step(step.number(), STEPS, step.display_name());
                let prefill = shipping_entry.clone().unwrap_or_else(|| {
                    session
                        .state()
                        .resume()
                        .and_then(|r| r.shipping.as_ref())
                        .map(ShippingForm::from)
                        .unwrap_or_default()
                });
                let form = prompt_shipping(&prefill)?;
                shipping_entry = Some(form.clone());
                if let Err(e) = session.advance(StepInput::Shipping(form)) {
                    report(ctx, e)?;
                }
            }
            CheckoutStep::PremiumServices => {
                ctx.output.step(step.number(), STEPS, step.display_name());
                match navigate(step)? {
                    Nav::Back => {
                        session.back()?;
                        continue;
                    }
                    Nav::Cancel => return cancelled(ctx),
                    Nav::Continue => {}
                }
                let prefill = session
                    .state()
                    .resume()
                    .and_then(|r| r.premium.clone())
                    .unwrap_or_default();
                let selections = prompt_premium(&options, &prefill)?;
                session.advance(StepInput::PremiumServices(selections))?;
            }
            CheckoutStep::Payment => {
                ctx.output.step(step.number(), STEPS, step.display_name());
                match navigate(step)? {
                    Nav::Back => {
                        session.back()?;
                        continue;
                    }
                    Nav::Cancel => return cancelled(ctx),
                    Nav::Continue => {}
                }
                let prefill = payment_entry.clone().unwrap_or_else(|| {
                    session
                        .state()
                        .resume()
                        .and_then(|r| r.payment.as_ref())
                        .map(|p| p.to_form())
                        .unwrap_or_default()
                });
                let form = prompt_payment(&prefill)?;
                payment_entry = Some(PaymentForm {
                    cvv: String::new(),
                    ..form.clone()
                });
                if let Err(e) = session.advance(StepInput::Payment(form)) {
                    report(ctx, e)?;
                }
            }
            CheckoutStep::Review => {
                ctx.output.step(step.number(), STEPS, step.display_name());
                review(&session, cart.cart(), ctx)?;

                let choice = if args.yes {
                    0
                } else {
                    Select::new()
                        .with_prompt("Ready to order?")
                        .items(&["Place order", "Back to payment", "Cancel checkout"])
                        .default(0)
                        .interact()?
                };
                match choice {
                    0 => {}
                    1 => {
                        session.back()?;
                        continue;
                    }
                    _ => return cancelled(ctx),
                }

                let draft = session.begin_submit(cart.cart())?;
                let spinner = ctx.output.spinner("Placing your order...");
                let result = api.create_order(&draft).await;
                spinner.finish_and_clear();

                match session.finish_submit(result) {
                    Ok(order) => {
                        let order = order.clone();
                        let notice = cart.clear()?;
                        ctx.output.conflict(notice);
                        ctx.output.success(&format!(
                            "Order {} placed. Total {}",
                            order.reference(),
                            order.total.display()
                        ));
                        ctx.output
                            .info("Run `gem orders show <id>` to follow its progress.");
                        ctx.output.kv("Order ID", order.id.as_str());
                    }
                    Err(CheckoutError::SubmissionFailed(message)) => {
                        ctx.output.error(&message);
                        let retry = !args.yes
                            && Confirm::new()
                                .with_prompt("Try again?")
                                .default(true)
                                .interact()?;
                        if !retry {
                            bail!("Order not placed; your cart has been kept");
                        }
                    }
                    Err(e) => return Err(e.into()),
                }
            }
            CheckoutStep::Submitted => return Ok(()),
        }
    }
}

fn cancelled(ctx: &Context) -> Result<()> {
    ctx.output.info("Checkout cancelled; your cart has been kept.");
    Ok(())
}

/// Show validation problems and stay on the step. Anything else aborts.
fn report(ctx: &Context, error: CheckoutError) -> Result<()> {
    match error {
        CheckoutError::Validation(errors) => {
            for e in errors.errors() {
                ctx.output.warn(&e.message);
            }
            Ok(())
        }
        other => Err(other.into()),
    }
}

fn navigate(step: CheckoutStep) -> Result<Nav> {
    let back = match step {
        CheckoutStep::PremiumServices => "Back to shipping",
        _ => "Back to premium services",
    };
    let choice = Select::new()
        .items(&["Continue", back, "Cancel checkout"])
        .default(0)
        .interact()?;
    Ok(match choice {
        0 => Nav::Continue,
        1 => Nav::Back,
        _ => Nav::Cancel,
    })
}

fn ask(prompt: &str, initial: &str) -> Result<String> {
    Ok(Input::<String>::new()
        .with_prompt(prompt)
        .with_initial_text(initial)
        .allow_empty(true)
        .interact_text()?)
}

fn prompt_shipping(prefill: &ShippingForm) -> Result<ShippingForm> {
    let country = if prefill.country.trim().is_empty() {
        "US"
    } else {
        prefill.country.as_str()
    };
    Ok(ShippingForm {
        full_name: ask("Full name", &prefill.full_name)?,
        email: ask("Email", &prefill.email)?,
        phone: ask("Phone", &prefill.phone)?,
        address: ask("Street address", &prefill.address)?,
        city: ask("City", &prefill.city)?,
        state: ask("State", &prefill.state)?,
        zip: ask("ZIP code", &prefill.zip)?,
        country: ask("Country", country)?,
    })
}

fn prompt_payment(prefill: &PaymentForm) -> Result<PaymentForm> {
    Ok(PaymentForm {
        card_name: ask("Name on card", &prefill.card_name)?,
        card_number: ask("Card number", &prefill.card_number)?,
        expiry: ask("Expiry (MM/YY)", &prefill.expiry)?,
        cvv: Password::new()
            .with_prompt("CVV")
            .allow_empty_password(true)
            .interact()?,
    })
}

fn prompt_premium(options: &PremiumOptions, prefill: &PremiumSelections) -> Result<PremiumSelections> {
    let mut selections = PremiumSelections::new();

    if !options.packaging.is_empty() {
        let labels = with_none(
            options
                .packaging
                .iter()
                .map(|o| format!("{} ({})", o.name, o.price.display())),
        );
        let current = prefill
            .packaging
            .as_ref()
            .and_then(|p| options.packaging.iter().position(|o| o.id == p.id));
        let choice = Select::new()
            .with_prompt("Gift packaging")
            .items(&labels)
            .default(current.map_or(0, |i| i + 1))
            .interact()?;
        if let Some(option) = choice.checked_sub(1).and_then(|i| options.packaging.get(i)) {
            selections = selections.with_packaging(option.clone());
        }
    }

    if !options.insurance.is_empty() {
        let labels = with_none(
            options
                .insurance
                .iter()
                .map(|o| format!("{} ({})", o.name, o.price.display())),
        );
        let current = prefill
            .insurance
            .as_ref()
            .and_then(|p| options.insurance.iter().position(|o| o.id == p.id));
        let choice = Select::new()
            .with_prompt("Insurance")
            .items(&labels)
            .default(current.map_or(0, |i| i + 1))
            .interact()?;
        if let Some(option) = choice.checked_sub(1).and_then(|i| options.insurance.get(i)) {
            selections = selections.with_insurance(option.clone());
        }
    }

    let message = ask(
        "Gift message (optional)",
        prefill.gift_message.as_deref().unwrap_or(""),
    )?;
    Ok(selections.with_gift_message(message))
}

/// Menu entries with a leading "None" choice.
fn with_none(labels: impl Iterator<Item = String>) -> Vec<String> {
    std::iter::once("None".to_string()).chain(labels).collect()
}

fn review(session: &CheckoutSession, cart: &CartStore, ctx: &Context) -> Result<()> {
    let state = session.state();
    if let Some(shipping) = state.shipping() {
        ctx.output.kv("Ship to", &shipping.one_line());
        ctx.output.kv("Contact", &format!("{} / {}", shipping.email, shipping.phone));
    }
    ctx.output.kv("Delivery", session.speed().display_name());
    if let CheckoutState::Review { payment, .. } = state {
        ctx.output.kv("Card", &payment.masked());
    }
    let premium = session.premium();
    if let Some(packaging) = &premium.packaging {
        ctx.output.kv("Packaging", &packaging.name);
    }
    if let Some(insurance) = &premium.insurance {
        ctx.output.kv("Insurance", &insurance.name);
    }
    if let Some(message) = &premium.gift_message {
        ctx.output.kv("Gift message", message);
    }
    if let Some(code) = session.promo_code() {
        ctx.output.kv("Promo", code);
    }

    ctx.output.info("");
    for line in cart.items() {
        ctx.output.list_item(&format!(
            "{} x {}  {}",
            line.quantity,
            line.name,
            line.total_price.display()
        ));
    }
    ctx.output.info("");
    ctx.output.totals(&session.totals(cart)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_none_prepends() {
        let labels = with_none(["Velvet box ($15.00)".to_string()].into_iter());
        assert_eq!(labels, vec!["None", "Velvet box ($15.00)"]);
    }
}
