//! Gem CLI - Shop the gemstore jewelry catalog from the terminal.
//!
//! Commands:
//! - `gem catalog` - Browse products
//! - `gem cart` - Manage the local cart
//! - `gem quote` - Price the cart
//! - `gem checkout` - Place an order
//! - `gem orders` - Order history
//! - `gem options` - Gift packaging and insurance
//! - `gem book` - Consultations and certifications
//! - `gem config` - Manage configuration

mod commands;
mod config;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use commands::{
    BookArgs, CartArgs, CatalogArgs, CheckoutArgs, ConfigArgs, OrdersArgs, QuoteArgs,
};

/// Gem CLI - Browse, cart and check out gemstore jewelry
#[derive(Parser)]
#[command(name = "gem")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the product catalog
    Catalog(CatalogArgs),

    /// Show or change the cart
    Cart(CartArgs),

    /// Price the cart with shipping, promo and premium choices
    Quote(QuoteArgs),

    /// Check out the cart
    Checkout(CheckoutArgs),

    /// List and inspect your orders
    Orders(OrdersArgs),

    /// List gift packaging and insurance options
    Options,

    /// Book a consultation or request a certification
    Book(BookArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

/// Log to stderr, filtered by `GEM_LOG` (default `warn`, `debug` with -v).
fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_env("GEM_LOG").unwrap_or_else(|_| EnvFilter::new(fallback)))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Setup output formatting
    let output = output::Output::new(cli.verbose, cli.json);

    // Load config
    let config_path = cli.config.as_deref();
    let ctx = match context::Context::load(config_path, output.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            output.error(&format!("{:#}", e));
            std::process::exit(1);
        }
    };

    // Execute command
    let result = match cli.command {
        Commands::Catalog(args) => commands::catalog::run(args, &ctx).await,
        Commands::Cart(args) => commands::cart::run(args, &ctx).await,
        Commands::Quote(args) => commands::quote::run(args, &ctx).await,
        Commands::Checkout(args) => commands::checkout::run(args, &ctx).await,
        Commands::Orders(args) => commands::orders::run(args, &ctx).await,
        Commands::Options => commands::options::run(&ctx).await,
        Commands::Book(args) => commands::book::run(args, &ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx).await,
    };

    if let Err(e) = result {
        tracing::debug!(error = ?e, "command failed");
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_cart_add() {
        let cli = Cli::try_parse_from([
            "gem", "cart", "add", "ring-1", "-q", "2", "--engrave", "A&J", "-o", "size=7",
        ])
        .unwrap();
        match cli.command {
            Commands::Cart(CartArgs {
                command:
                    Some(commands::CartCommand::Add {
                        product_id,
                        quantity,
                        engrave,
                        options,
                    }),
            }) => {
                assert_eq!(product_id, "ring-1");
                assert_eq!(quantity, 2);
                assert_eq!(engrave.as_deref(), Some("A&J"));
                assert_eq!(options, vec!["size=7"]);
            }
            _ => panic!("expected cart add"),
        }
    }

    #[test]
    fn test_parse_quote_flags() {
        let cli =
            Cli::try_parse_from(["gem", "--json", "quote", "--promo", "DISCOUNT20", "--express"])
                .unwrap();
        assert!(cli.json);
        match cli.command {
            Commands::Quote(args) => {
                assert_eq!(args.pricing.promo.as_deref(), Some("DISCOUNT20"));
                assert!(args.pricing.express);
            }
            _ => panic!("expected quote"),
        }
    }
}
