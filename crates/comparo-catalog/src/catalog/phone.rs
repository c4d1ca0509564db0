//! Phone offers.

use crate::catalog::offer::{commission_or_zero, Dimension, Flag, ItemSource, Offer};
use crate::ids::ItemId;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// A phone in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Phone {
    /// Unique item identifier.
    pub id: ItemId,
    /// Model name.
    pub name: String,
    /// Manufacturer (e.g., "Apple", "Samsung").
    pub trademark: String,
    /// Lowest listed price.
    pub price: Money,
    /// Storage capacity as displayed (e.g., "128 Go").
    pub storage: Option<String>,
    /// Condition (e.g., "neuf", "reconditionné").
    pub condition: Option<String>,
    /// Operating system (e.g., "iOS", "Android").
    pub os: Option<String>,
    /// Network technology (e.g., "5G").
    pub technology: Option<String>,
    /// Carries an eco-friendly label.
    pub eco_friendly: bool,
    /// Sold bundled with a mobile plan.
    pub forfait_included: bool,
    /// Product image URL.
    pub image: Option<String>,
    pub source: ItemSource,
    /// Affiliate commission, when known.
    pub commission: Option<Money>,
}

impl Phone {
    /// Create a phone with only the required attributes set.
    pub fn new(
        id: impl Into<ItemId>,
        name: impl Into<String>,
        trademark: impl Into<String>,
        price: Money,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            trademark: trademark.into(),
            price,
            storage: None,
            condition: None,
            os: None,
            technology: None,
            eco_friendly: false,
            forfait_included: false,
            image: None,
            source: ItemSource::Catalog,
            commission: None,
        }
    }

    /// Whether the phone is sold refurbished.
    pub fn is_refurbished(&self) -> bool {
        self.condition
            .as_deref()
            .map(|c| c.to_lowercase().starts_with("recond") || c.eq_ignore_ascii_case("refurbished"))
            .unwrap_or(false)
    }
}

impl Offer for Phone {
    fn id(&self) -> &ItemId {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn brand(&self) -> &str {
        &self.trademark
    }

    fn price(&self) -> Money {
        self.price
    }

    fn attribute(&self, dimension: Dimension) -> Option<&str> {
        match dimension {
            Dimension::Brand => Some(&self.trademark),
            Dimension::Technology => self.technology.as_deref(),
            Dimension::Condition => self.condition.as_deref(),
            Dimension::Os => self.os.as_deref(),
            Dimension::Storage => self.storage.as_deref(),
            Dimension::Operator | Dimension::WifiStandard => None,
        }
    }

    fn flag(&self, flag: Flag) -> bool {
        match flag {
            Flag::EcoFriendly => self.eco_friendly,
            Flag::ForfaitIncluded => self.forfait_included,
            Flag::TvIncluded | Flag::EuRoaming => false,
        }
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
    fn test_phone_attributes() {
        let mut phone = Phone::new("p1", "iPhone 15", "Apple", Money::new(96900, Currency::EUR));
        phone.storage = Some("128 Go".to_string());
        phone.eco_friendly = true;

        assert_eq!(phone.attribute(Dimension::Brand), Some("Apple"));
        assert_eq!(phone.attribute(Dimension::Storage), Some("128 Go"));
        assert_eq!(phone.attribute(Dimension::WifiStandard), None);
        assert!(phone.flag(Flag::EcoFriendly));
        assert!(!phone.flag(Flag::TvIncluded));
    }

    #[test]
    fn test_phone_refurbished() {
        let mut phone = Phone::new("p2", "Galaxy S22", "Samsung", Money::new(29900, Currency::EUR));
        assert!(!phone.is_refurbished());
        phone.condition = Some("Reconditionné".to_string());
        assert!(phone.is_refurbished());
    }
}
