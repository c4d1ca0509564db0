//! Mobile plan (forfait) offers.

use crate::catalog::offer::{commission_or_zero, Dimension, Flag, ItemSource, Offer};
use crate::ids::ItemId;
use crate::money::Money;
use crate::parse::parse_data_gb;
use serde::{Deserialize, Serialize};

/// A mobile plan offer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MobilePlan {
    pub id: ItemId,
    pub name: String,
    pub operator: String,
    /// Monthly price.
    pub price: Money,
    /// Data allowance as displayed (e.g., "20 Go", "Illimité").
    pub data_allowance: Option<String>,
    /// Network technology (e.g., "4G", "5G").
    pub technology: Option<String>,
    /// Roaming in the EU included.
    pub eu_roaming: bool,
    pub source: ItemSource,
    pub commission: Option<Money>,
}

impl MobilePlan {
    /// Create a plan with only the required attributes set.
    pub fn new(
        id: impl Into<ItemId>,
        name: impl Into<String>,
        operator: impl Into<String>,
        price: Money,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            operator: operator.into(),
            price,
            data_allowance: None,
            technology: None,
            eu_roaming: false,
            source: ItemSource::Catalog,
            commission: None,
        }
    }

    /// Set the displayed data allowance.
    pub fn with_data(mut self, data: impl Into<String>) -> Self {
        self.data_allowance = Some(data.into());
        self
    }
}

impl Offer for MobilePlan {
    fn id(&self) -> &ItemId {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn brand(&self) -> &str {
        &self.operator
    }

    fn price(&self) -> Money {
        self.price
    }

    fn attribute(&self, dimension: Dimension) -> Option<&str> {
        match dimension {
            Dimension::Brand | Dimension::Operator => Some(&self.operator),
            Dimension::Technology => self.technology.as_deref(),
            _ => None,
        }
    }

    fn flag(&self, flag: Flag) -> bool {
        match flag {
            Flag::EuRoaming => self.eu_roaming,
            _ => false,
        }
    }

    fn data_gb(&self) -> f64 {
        self.data_allowance.as_deref().map(parse_data_gb).unwrap_or(0.0)
    }

    fn commission(&self) -> Money {
        commission_or_zero(self.commission)
    }

    fn source(&self) -> ItemSource {
        self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;

    #[test]
    fn test_plan_data_normalized() {
        let plan = MobilePlan::new("m1", "Série Free", "Free", Money::new(899, Currency::EUR))
            .with_data("350 Go");
        assert_eq!(plan.data_gb(), 350.0);

        let small = MobilePlan::new("m2", "2€", "Free", Money::new(200, Currency::EUR))
            .with_data("50 Mo");
        assert_eq!(small.data_gb(), 0.05);
    }

    #[test]
    fn test_plan_without_allowance() {
        let plan = MobilePlan::new("m3", "Appels seuls", "Orange", Money::new(599, Currency::EUR));
        assert_eq!(plan.data_gb(), 0.0);
        assert!(!plan.flag(Flag::EuRoaming));
    }
}
