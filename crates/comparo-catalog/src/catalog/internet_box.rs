//! Internet box (home broadband) offers.

use crate::catalog::offer::{commission_or_zero, Dimension, Flag, ItemSource, Offer};
use crate::ids::ItemId;
use crate::money::Money;
use crate::parse::parse_speed_mbps;
use serde::{Deserialize, Serialize};

/// A home internet box offer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InternetBox {
    pub id: ItemId,
    pub name: String,
    /// Operator (e.g., "Orange", "Free").
    pub operator: String,
    /// Monthly price.
    pub price: Money,
    /// Download speed as displayed (e.g., "1 Gb/s", "300 Mb/s").
    pub download_speed: Option<String>,
    /// Access technology (e.g., "Fibre", "ADSL", "4G").
    pub technology: Option<String>,
    /// Wi-Fi standard (e.g., "Wi-Fi 6E").
    pub wifi_standard: Option<String>,
    /// TV service bundled.
    pub tv_included: bool,
    pub source: ItemSource,
    pub commission: Option<Money>,
}

impl InternetBox {
    /// Create a box with only the required attributes set.
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
            download_speed: None,
            technology: None,
            wifi_standard: None,
            tv_included: false,
            source: ItemSource::Catalog,
            commission: None,
        }
    }

    /// Set the displayed download speed.
    pub fn with_speed(mut self, speed: impl Into<String>) -> Self {
        self.download_speed = Some(speed.into());
        self
    }
}

impl Offer for InternetBox {
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
            Dimension::WifiStandard => self.wifi_standard.as_deref(),
            Dimension::Condition | Dimension::Os | Dimension::Storage => None,
        }
    }

    fn flag(&self, flag: Flag) -> bool {
        match flag {
            Flag::TvIncluded => self.tv_included,
            _ => false,
        }
    }

    fn speed_mbps(&self) -> f64 {
        self.download_speed.as_deref().map(parse_speed_mbps).unwrap_or(0.0)
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
    fn test_box_speed_normalized() {
        let fibre = InternetBox::new("b1", "Livebox Max", "Orange", Money::new(4299, Currency::EUR))
            .with_speed("2 Gb/s");
        let adsl = InternetBox::new("b2", "Box ADSL", "SFR", Money::new(2499, Currency::EUR))
            .with_speed("20 Mb/s");
        let unknown = InternetBox::new("b3", "Box", "Free", Money::new(1999, Currency::EUR));

        assert_eq!(fibre.speed_mbps(), 2000.0);
        assert_eq!(adsl.speed_mbps(), 20.0);
        assert_eq!(unknown.speed_mbps(), 0.0);
    }

    #[test]
    fn test_box_operator_is_brand() {
        let b = InternetBox::new("b1", "Freebox Pop", "Free", Money::new(2999, Currency::EUR));
        assert_eq!(b.attribute(Dimension::Brand), Some("Free"));
        assert_eq!(b.attribute(Dimension::Operator), Some("Free"));
        assert_eq!(b.attribute(Dimension::Os), None);
    }
}
