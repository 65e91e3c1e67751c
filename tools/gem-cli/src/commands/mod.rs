//! CLI command implementations.

pub mod book;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod options;
pub mod orders;
pub mod quote;

use anyhow::{bail, Result};
use clap::{Args, Subcommand};
use gem_commerce::prelude::{Currency, Customizations, Money, ShippingSpeed};

/// Arguments for the catalog command.
#[derive(Args)]
pub struct CatalogArgs {
    #[command(subcommand)]
    pub command: CatalogCommand,
}

#[derive(Subcommand)]
pub enum CatalogCommand {
    /// List products.
    List(ProductFilters),
    /// Show one product.
    Show {
        /// Product ID.
        id: String,
    },
}

/// Product list filters.
#[derive(Args, Default)]
pub struct ProductFilters {
    /// Category (e.g. rings, necklaces).
    #[arg(long)]
    pub category: Option<String>,

    /// Metal (e.g. platinum, "rose gold").
    #[arg(long)]
    pub metal: Option<String>,

    /// Gemstone (e.g. diamond).
    #[arg(long)]
    pub gemstone: Option<String>,

    /// Free-text search.
    #[arg(short, long)]
    pub search: Option<String>,

    /// Minimum price in dollars.
    #[arg(long)]
    pub min_price: Option<String>,

    /// Maximum price in dollars.
    #[arg(long)]
    pub max_price: Option<String>,

    /// Only products that can be ordered now.
    #[arg(long)]
    pub in_stock: bool,

    /// Sort order: featured, price_asc, price_desc, name_asc, newest.
    #[arg(long)]
    pub sort: Option<String>,
}

/// Arguments for the cart command.
#[derive(Args)]
pub struct CartArgs {
    #[command(subcommand)]
    pub command: Option<CartCommand>,
}

#[derive(Subcommand)]
pub enum CartCommand {
    /// Show the cart.
    Show,
    /// Add a product to the cart.
    Add {
        /// Product ID.
        product_id: String,

        /// Quantity to add.
        #[arg(short, long, default_value = "1")]
        quantity: u32,

        /// Engraving text.
        #[arg(long)]
        engrave: Option<String>,

        /// Other customizations as key=value (e.g. size=7).
        #[arg(short = 'o', long = "option")]
        options: Vec<String>,
    },
    /// Remove every line for a product.
    Remove {
        /// Product ID.
        product_id: String,
    },
    /// Set the quantity for a product; 0 removes it.
    Update {
        /// Product ID.
        product_id: String,
        /// New quantity.
        quantity: u32,
    },
    /// Empty the cart.
    Clear {
        /// Skip confirmation.
        #[arg(short, long)]
        yes: bool,
    },
}

/// Pricing choices shared by quote and checkout.
#[derive(Args, Default)]
pub struct PricingArgs {
    /// Promo code.
    #[arg(long)]
    pub promo: Option<String>,

    /// Express shipping.
    #[arg(long)]
    pub express: bool,
}

impl PricingArgs {
    pub fn speed(&self) -> ShippingSpeed {
        if self.express {
            ShippingSpeed::Express
        } else {
            ShippingSpeed::Standard
        }
    }
}

/// Arguments for the quote command.
#[derive(Args)]
pub struct QuoteArgs {
    #[command(flatten)]
    pub pricing: PricingArgs,

    /// Packaging option ID.
    #[arg(long)]
    pub packaging: Option<String>,

    /// Insurance option ID.
    #[arg(long)]
    pub insurance: Option<String>,
}

/// Arguments for the checkout command.
#[derive(Args)]
pub struct CheckoutArgs {
    #[command(flatten)]
    pub pricing: PricingArgs,

    /// Skip the final confirmation.
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the orders command.
#[derive(Args)]
pub struct OrdersArgs {
    #[command(subcommand)]
    pub command: Option<OrdersCommand>,

    /// Show only the last N orders.
    #[arg(short, long)]
    pub limit: Option<usize>,
}

#[derive(Subcommand)]
pub enum OrdersCommand {
    /// List your orders.
    List,
    /// Show one order.
    Show {
        /// Order ID.
        id: String,
    },
}

/// Arguments for the book command.
#[derive(Args)]
pub struct BookArgs {
    #[command(subcommand)]
    pub command: BookCommand,
}

#[derive(Subcommand)]
pub enum BookCommand {
    /// Book a consultation with a jeweler.
    Consultation {
        /// general, engagement-ring, custom-design or appraisal.
        #[arg(short, long, default_value = "general")]
        kind: String,

        /// Preferred date (YYYY-MM-DD).
        #[arg(short, long)]
        date: String,

        /// Your name.
        #[arg(long)]
        name: String,

        /// Your email.
        #[arg(long)]
        email: String,

        /// Contact phone.
        #[arg(long)]
        phone: Option<String>,

        /// Anything the jeweler should know.
        #[arg(long)]
        notes: Option<String>,
    },
    /// Request a grading certificate for a product.
    Certification {
        /// Product ID.
        product_id: String,

        /// Lab: GIA, AGS or IGI.
        #[arg(short, long, default_value = "GIA")]
        lab: String,

        /// Notes for the lab.
        #[arg(long)]
        notes: Option<String>,
    },
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Initialize a new config file.
    Init {
        /// Backend base URL.
        #[arg(long)]
        api_url: Option<String>,

        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
}

/// Parse a dollar amount such as `49.99` or `$1,250`.
pub fn parse_price(input: &str) -> Result<Money> {
    let cleaned: String = input
        .trim()
        .trim_start_matches('$')
        .chars()
        .filter(|c| *c != ',')
        .collect();
    let amount: f64 = match cleaned.parse() {
        Ok(amount) => amount,
        Err(_) => bail!("Invalid price: {}", input),
    };
    if !amount.is_finite() || amount < 0.0 {
        bail!("Invalid price: {}", input);
    }
    Ok(Money::from_decimal(amount, Currency::USD))
}

/// Build customizations from `--engrave` and `key=value` options.
pub fn parse_customizations(engrave: Option<&str>, options: &[String]) -> Result<Customizations> {
    let mut customizations = Customizations::new();
    for option in options {
        let Some((key, value)) = option.split_once('=') else {
            bail!("Expected key=value, got: {}", option);
        };
        let (key, value) = (key.trim(), value.trim());
        if key.is_empty() || value.is_empty() {
            bail!("Expected key=value, got: {}", option);
        }
        customizations.insert(key.to_lowercase(), value.to_string());
    }
    if let Some(text) = engrave.map(str::trim).filter(|t| !t.is_empty()) {
        customizations.insert("engraving".to_string(), text.to_string());
    }
    Ok(customizations)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price("49.99").unwrap(), Money::usd(4_999));
        assert_eq!(parse_price("$1,250").unwrap(), Money::usd(125_000));
        assert!(parse_price("-5").is_err());
        assert!(parse_price("cheap").is_err());
    }

    #[test]
    fn test_parse_customizations() {
        let c = parse_customizations(
            Some(" A & J "),
            &["Size=7".to_string(), "finish = matte".to_string()],
        )
        .unwrap();
        assert_eq!(c.get("engraving").map(String::as_str), Some("A & J"));
        assert_eq!(c.get("size").map(String::as_str), Some("7"));
        assert_eq!(c.get("finish").map(String::as_str), Some("matte"));
    }

    #[test]
    fn test_blank_engraving_ignored() {
        assert!(parse_customizations(Some("  "), &[]).unwrap().is_empty());
    }

    #[test]
    fn test_bad_option_rejected() {
        assert!(parse_customizations(None, &["size".to_string()]).is_err());
        assert!(parse_customizations(None, &["=7".to_string()]).is_err());
    }

    #[test]
    fn test_pricing_speed() {
        let args = PricingArgs {
            promo: None,
            express: true,
        };
        assert_eq!(args.speed(), ShippingSpeed::Express);
        assert_eq!(PricingArgs::default().speed(), ShippingSpeed::Standard);
    }
}
