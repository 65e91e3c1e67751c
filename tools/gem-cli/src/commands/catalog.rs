//! Product browsing commands.

use anyhow::{bail, Result};
use gem_commerce::prelude::{CatalogApi, Product, ProductId, ProductQuery, SortOption};

use super::{parse_price, CatalogArgs, CatalogCommand, ProductFilters};
use crate::context::Context;

/// Run the catalog command.
pub async fn run(args: CatalogArgs, ctx: &Context) -> Result<()> {
    match args.command {
        CatalogCommand::List(filters) => list_products(filters, ctx).await,
        CatalogCommand::Show { id } => show_product(&id, ctx).await,
    }
}

/// Turn command-line filters into a product query.
pub fn build_query(filters: ProductFilters) -> Result<ProductQuery> {
    let mut query = ProductQuery::new();
    if let Some(category) = filters.category {
        query = query.with_category(category);
    }
    if let Some(metal) = filters.metal {
        query = query.with_metal(metal);
    }
    if let Some(gemstone) = filters.gemstone {
        query = query.with_gemstone(gemstone);
    }
    if let Some(search) = filters.search {
        query = query.with_search(search);
    }

    let min = filters.min_price.as_deref().map(parse_price).transpose()?;
    let max = filters.max_price.as_deref().map(parse_price).transpose()?;
    if let (Some(min), Some(max)) = (&min, &max) {
        if min > max {
            bail!("--min-price {} is above --max-price {}", min.display(), max.display());
        }
    }
    query = query.with_price_range(min, max);

    if filters.in_stock {
        query = query.in_stock_only();
    }
    if let Some(sort) = filters.sort {
        match SortOption::from_param(&sort) {
            Some(sort) => query = query.with_sort(sort),
            None => bail!("Unknown sort order: {}", sort),
        }
    }
    Ok(query)
}

async fn list_products(filters: ProductFilters, ctx: &Context) -> Result<()> {
    let query = build_query(filters)?;
    let api = ctx.api()?;

    let spinner = ctx.output.spinner("Loading products...");
    let result = api.products(&query).await;
    spinner.finish_and_clear();

    let mut products = result?;
    // The backend may ignore some filters; apply them locally as well.
    query.apply(&mut products);

    if ctx.output.is_json() {
        ctx.output.json(&products);
        return Ok(());
    }

    if products.is_empty() {
        ctx.output.info("No products match those filters.");
        return Ok(());
    }

    ctx.output.header(&format!("Products ({})", products.len()));
    ctx.output
        .table_row(&["ID", "NAME", "PRICE", "METAL", "STOCK"], &[24, 32, 12, 14, 8]);
    for product in &products {
        let price = price_label(product);
        let stock = if product.in_stock { "yes" } else { "no" };
        ctx.output.table_row(
            &[
                product.id.as_str(),
                &product.name,
                &price,
                product.metal.as_deref().unwrap_or("-"),
                stock,
            ],
            &[24, 32, 12, 14, 8],
        );
    }

    Ok(())
}

async fn show_product(id: &str, ctx: &Context) -> Result<()> {
    let api = ctx.api()?;
    let product = api.product(&ProductId::new(id)).await?;

    if ctx.output.is_json() {
        ctx.output.json(&product);
        return Ok(());
    }

    ctx.output.header(&product.name);
    ctx.output.kv("ID", product.id.as_str());
    ctx.output.kv("Price", &price_label(&product));
    if let Some(category) = &product.category {
        ctx.output.kv("Category", category);
    }
    if let Some(kind) = &product.jewelry_type {
        ctx.output.kv("Type", kind);
    }
    if let Some(metal) = &product.metal {
        ctx.output.kv("Metal", metal);
    }
    if let Some(gemstone) = &product.gemstone {
        ctx.output.kv("Gemstone", gemstone);
    }
    ctx.output
        .kv("In stock", if product.in_stock { "yes" } else { "no" });
    if let Some(image) = product.primary_image() {
        ctx.output.kv("Image", image);
    }
    if let Some(description) = &product.description {
        ctx.output.info("");
        ctx.output.info(description);
    }

    Ok(())
}

/// Price column text; sale items show both prices.
pub fn price_label(product: &Product) -> String {
    match (&product.price, product.is_on_sale()) {
        (Some(price), true) => match product.effective_price() {
            Ok(sale) => format!("{} (was {})", sale.display(), price.display()),
            Err(_) => price.display(),
        },
        (Some(price), false) => price.display(),
        (None, _) => product
            .effective_price()
            .map(|p| p.display())
            .unwrap_or_else(|_| "n/a".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gem_commerce::prelude::Money;

    #[test]
    fn test_build_query() {
        let query = build_query(ProductFilters {
            category: Some("rings".to_string()),
            min_price: Some("100".to_string()),
            sort: Some("price_asc".to_string()),
            in_stock: true,
            ..ProductFilters::default()
        })
        .unwrap();

        let params = query.to_params();
        assert!(params.contains(&("category", "rings".to_string())));
        assert!(params.contains(&("sort", "price_asc".to_string())));
        assert_eq!(query.min_price, Some(Money::usd(10_000)));
    }

    #[test]
    fn test_inverted_price_range_rejected() {
        let err = build_query(ProductFilters {
            min_price: Some("500".to_string()),
            max_price: Some("100".to_string()),
            ..ProductFilters::default()
        });
        assert!(err.is_err());
    }

    #[test]
    fn test_unknown_sort_rejected() {
        let err = build_query(ProductFilters {
            sort: Some("cheapest".to_string()),
            ..ProductFilters::default()
        });
        assert!(err.is_err());
    }

    #[test]
    fn test_price_label() {
        let plain = Product::new("r", "Ring", Money::usd(5_000));
        assert_eq!(price_label(&plain), "$50.00");

        let sale = plain.clone().with_discount_price(Money::usd(4_000));
        assert_eq!(price_label(&sale), "$40.00 (was $50.00)");
    }
}
