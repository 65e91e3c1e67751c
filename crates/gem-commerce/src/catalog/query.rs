//! Catalog query builder.

use crate::catalog::Product;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Sort options for product listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SortOption {
    /// Backend default ordering.
    #[default]
    Featured,
    /// Sort by price, low to high.
    PriceAsc,
    /// Sort by price, high to low.
    PriceDesc,
    /// Sort by name A-Z.
    NameAsc,
    /// Sort by newest first.
    Newest,
}

impl SortOption {
    /// Value of the `sort` query parameter, `None` for the default order.
    pub fn as_param(&self) -> Option<&'static str> {
        match self {
            SortOption::Featured => None,
            SortOption::PriceAsc => Some("price_asc"),
            SortOption::PriceDesc => Some("price_desc"),
            SortOption::NameAsc => Some("name_asc"),
            SortOption::Newest => Some("newest"),
        }
    }

    pub fn from_param(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "featured" => Some(SortOption::Featured),
            "price_asc" => Some(SortOption::PriceAsc),
            "price_desc" => Some(SortOption::PriceDesc),
            "name_asc" => Some(SortOption::NameAsc),
            "newest" => Some(SortOption::Newest),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SortOption::Featured => "Featured",
            SortOption::PriceAsc => "Price: Low to High",
            SortOption::PriceDesc => "Price: High to Low",
            SortOption::NameAsc => "Name: A-Z",
            SortOption::Newest => "Newest",
        }
    }
}

/// Filters for `GET /products`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductQuery {
    pub category: Option<String>,
    pub metal: Option<String>,
    pub gemstone: Option<String>,
    pub search: Option<String>,
    pub min_price: Option<Money>,
    pub max_price: Option<Money>,
    pub in_stock_only: bool,
    pub sort: SortOption,
}

impl ProductQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = non_empty(category.into());
        self
    }

    pub fn with_metal(mut self, metal: impl Into<String>) -> Self {
        self.metal = non_empty(metal.into());
        self
    }

    pub fn with_gemstone(mut self, gemstone: impl Into<String>) -> Self {
        self.gemstone = non_empty(gemstone.into());
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = non_empty(search.into());
        self
    }

    pub fn with_price_range(mut self, min: Option<Money>, max: Option<Money>) -> Self {
        self.min_price = min;
        self.max_price = max;
        self
    }

    pub fn in_stock_only(mut self) -> Self {
        self.in_stock_only = true;
        self
    }

    pub fn with_sort(mut self, sort: SortOption) -> Self {
        self.sort = sort;
        self
    }

    /// Query parameters in a stable order. Prices go out as decimals.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(category) = &self.category {
            params.push(("category", category.clone()));
        }
        if let Some(metal) = &self.metal {
            params.push(("metal", metal.clone()));
        }
        if let Some(gemstone) = &self.gemstone {
            params.push(("gemstone", gemstone.clone()));
        }
        if let Some(search) = &self.search {
            params.push(("search", search.clone()));
        }
        if let Some(min) = self.min_price {
            params.push(("minPrice", min.display_amount()));
        }
        if let Some(max) = self.max_price {
            params.push(("maxPrice", max.display_amount()));
        }
        if self.in_stock_only {
            params.push(("inStock", "true".to_string()));
        }
        if let Some(sort) = self.sort.as_param() {
            params.push(("sort", sort.to_string()));
        }
        params
    }

    /// Apply the same filters locally, for backends that ignore them.
    pub fn matches(&self, product: &Product) -> bool {
        if !attr_matches(&self.category, &product.category)
            || !attr_matches(&self.metal, &product.metal)
            || !attr_matches(&self.gemstone, &product.gemstone)
        {
            return false;
        }
        if self.in_stock_only && !product.in_stock {
            return false;
        }
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            let in_name = product.name.to_lowercase().contains(&needle);
            let in_description = product
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&needle));
            if !in_name && !in_description {
                return false;
            }
        }
        if self.min_price.is_some() || self.max_price.is_some() {
            let Ok(price) = product.effective_price() else {
                return false;
            };
            if self.min_price.is_some_and(|min| price.amount_cents < min.amount_cents) {
                return false;
            }
            if self.max_price.is_some_and(|max| price.amount_cents > max.amount_cents) {
                return false;
            }
        }
        true
    }

    /// Filter and sort a product list in place.
    pub fn apply(&self, products: &mut Vec<Product>) {
        products.retain(|p| self.matches(p));
        let price_key = |p: &Product| p.effective_price().map(|m| m.amount_cents).unwrap_or(i64::MAX);
        match self.sort {
            SortOption::PriceAsc => products.sort_by_key(price_key),
            SortOption::PriceDesc => products.sort_by_key(|p| std::cmp::Reverse(price_key(p))),
            SortOption::NameAsc => products.sort_by_key(|p| p.name.to_lowercase()),
            // Newest and featured keep backend order.
            SortOption::Featured | SortOption::Newest => {}
        }
    }
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn attr_matches(wanted: &Option<String>, actual: &Option<String>) -> bool {
    match (wanted, actual) {
        (None, _) => true,
        (Some(w), Some(a)) => w.eq_ignore_ascii_case(a),
        (Some(_), None) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Vec<Product> {
        vec![
            Product::new("a", "Diamond Ring", Money::usd(250_000))
                .with_category("rings")
                .with_metal("Platinum")
                .with_gemstone("diamond"),
            Product::new("b", "Pearl Earrings", Money::usd(18_000)).with_category("earrings"),
            Product::new("c", "Gold Band", Money::usd(60_000))
                .with_category("rings")
                .with_metal("gold")
                .with_discount_price(Money::usd(45_000)),
        ]
    }

    #[test]
    fn test_query_params() {
        let query = ProductQuery::new()
            .with_category("rings")
            .with_search("  rose gold ")
            .with_price_range(Some(Money::usd(10_000)), None)
            .with_sort(SortOption::PriceAsc);

        assert_eq!(
            query.to_params(),
            vec![
                ("category", "rings".to_string()),
                ("search", "rose gold".to_string()),
                ("minPrice", "100.00".to_string()),
                ("sort", "price_asc".to_string()),
            ]
        );
    }

    #[test]
    fn test_empty_query_has_no_params() {
        assert!(ProductQuery::new().with_category("   ").to_params().is_empty());
    }

    #[test]
    fn test_local_filtering_is_case_insensitive() {
        let mut products = catalog();
        ProductQuery::new().with_metal("platinum").apply(&mut products);
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].id.as_str(), "a");
    }

    #[test]
    fn test_price_filter_uses_sale_price() {
        let mut products = catalog();
        ProductQuery::new()
            .with_category("rings")
            .with_price_range(None, Some(Money::usd(50_000)))
            .apply(&mut products);
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].id.as_str(), "c");
    }

    #[test]
    fn test_sort_by_price() {
        let mut products = catalog();
        ProductQuery::new().with_sort(SortOption::PriceDesc).apply(&mut products);
        let ids: Vec<_> = products.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c", "b"]);
    }

    #[test]
    fn test_sort_param_round_trip() {
        assert_eq!(SortOption::from_param("PRICE_DESC"), Some(SortOption::PriceDesc));
        assert_eq!(SortOption::from_param("bogus"), None);
        assert_eq!(SortOption::Featured.as_param(), None);
    }
}
