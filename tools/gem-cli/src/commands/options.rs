//! Premium service options: gift packaging and insurance.

use anyhow::{bail, Result};
use gem_commerce::prelude::{InsuranceOption, OrderApi, PackagingOption, PremiumSelections};
use serde::Serialize;

use crate::context::Context;

/// Both option lists as offered by the backend.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PremiumOptions {
    pub packaging: Vec<PackagingOption>,
    pub insurance: Vec<InsuranceOption>,
}

impl PremiumOptions {
    /// Fetch both lists.
    pub async fn fetch<A: OrderApi + ?Sized>(api: &A) -> Result<Self> {
        Ok(Self {
            packaging: api.packaging_options().await?,
            insurance: api.insurance_options().await?,
        })
    }

    /// Selections for the given option IDs. Unknown IDs are an error.
    pub fn select(
        &self,
        packaging: Option<&str>,
        insurance: Option<&str>,
    ) -> Result<PremiumSelections> {
        let mut selections = PremiumSelections::new();
        if let Some(id) = packaging {
            match self.packaging.iter().find(|o| o.id.as_str() == id) {
                Some(option) => selections = selections.with_packaging(option.clone()),
                None => bail!("Unknown packaging option: {}", id),
            }
        }
        if let Some(id) = insurance {
            match self.insurance.iter().find(|o| o.id.as_str() == id) {
                Some(option) => selections = selections.with_insurance(option.clone()),
                None => bail!("Unknown insurance option: {}", id),
            }
        }
        Ok(selections)
    }
}

/// Run the options command.
pub async fn run(ctx: &Context) -> Result<()> {
    let api = ctx.api()?;
    let spinner = ctx.output.spinner("Loading premium services...");
    let options = PremiumOptions::fetch(&api).await;
    spinner.finish_and_clear();
    let options = options?;

    if ctx.output.is_json() {
        ctx.output.json(&options);
        return Ok(());
    }

    ctx.output.header("Gift packaging");
    if options.packaging.is_empty() {
        ctx.output.info("None offered.");
    }
    for option in &options.packaging {
        ctx.output.table_row(
            &[option.id.as_str(), &option.name, &option.price.display()],
            &[16, 30, 10],
        );
    }

    ctx.output.header("Insurance");
    if options.insurance.is_empty() {
        ctx.output.info("None offered.");
    }
    for option in &options.insurance {
        let coverage = option
            .coverage_months
            .map(|m| format!("{} months", m))
            .unwrap_or_default();
        ctx.output.table_row(
            &[
                option.id.as_str(),
                &option.name,
                &option.price.display(),
                &coverage,
            ],
            &[16, 30, 10, 10],
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gem_commerce::prelude::{Currency, InsuranceId, Money, PackagingId};

    fn options() -> PremiumOptions {
        PremiumOptions {
            packaging: vec![PackagingOption {
                id: PackagingId::new("velvet"),
                name: "Velvet box".to_string(),
                description: String::new(),
                price: Money::usd(1_500),
            }],
            insurance: vec![InsuranceOption {
                id: InsuranceId::new("annual"),
                name: "One year cover".to_string(),
                description: String::new(),
                price: Money::usd(2_500),
                coverage_months: Some(12),
            }],
        }
    }

    #[test]
    fn test_select_known_ids() {
        let selections = options().select(Some("velvet"), Some("annual")).unwrap();
        assert_eq!(
            selections.premium_cost(Currency::USD).unwrap(),
            Money::usd(4_000)
        );
    }

    #[test]
    fn test_select_nothing() {
        assert!(options().select(None, None).unwrap().is_empty());
    }

    #[test]
    fn test_unknown_id_rejected() {
        assert!(options().select(Some("gold-foil"), None).is_err());
    }
}
