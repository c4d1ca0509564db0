//! Uniform read access over the three product lines.

use crate::catalog::{InternetBox, MobilePlan, Phone};
use crate::ids::ItemId;
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// Where an item came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ItemSource {
    /// Backend catalog record.
    #[default]
    Catalog,
    /// Partner affiliate feed.
    Affiliate,
}

impl ItemSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemSource::Catalog => "catalog",
            ItemSource::Affiliate => "affiliate",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "affiliate" | "affiliation" | "awin" | "feed" => ItemSource::Affiliate,
            _ => ItemSource::Catalog,
        }
    }
}

/// A categorical attribute that allow-list filters can match on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Brand,
    Operator,
    Technology,
    Condition,
    Os,
    Storage,
    WifiStandard,
}

impl Dimension {
    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::Brand => "brand",
            Dimension::Operator => "operator",
            Dimension::Technology => "technology",
            Dimension::Condition => "condition",
            Dimension::Os => "os",
            Dimension::Storage => "storage",
            Dimension::WifiStandard => "wifi_standard",
        }
    }
}

/// A boolean attribute that flag filters can gate on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Flag {
    EcoFriendly,
    ForfaitIncluded,
    TvIncluded,
    EuRoaming,
}

impl Flag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Flag::EcoFriendly => "eco_friendly",
            Flag::ForfaitIncluded => "forfait_included",
            Flag::TvIncluded => "tv_included",
            Flag::EuRoaming => "eu_roaming",
        }
    }
}

/// Read access the filter and sort engines need from any catalog item.
///
/// Attributes a product line does not have read as `None`, `false` or
/// `0.0`, so a filter on them excludes the item and a sort on them leaves
/// it at the low end.
pub trait Offer {
    fn id(&self) -> &ItemId;
    fn name(&self) -> &str;
    /// Manufacturer for phones, operator for boxes and plans.
    fn brand(&self) -> &str;
    fn price(&self) -> Money;
    fn attribute(&self, dimension: Dimension) -> Option<&str>;
    fn flag(&self, flag: Flag) -> bool;
    /// Download speed in Mb/s.
    fn speed_mbps(&self) -> f64 {
        0.0
    }
    /// Data allowance in gigabytes.
    fn data_gb(&self) -> f64 {
        0.0
    }
    fn commission(&self) -> Money;
    fn source(&self) -> ItemSource;
}

/// A catalog item of any product line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CatalogItem {
    Phone(Phone),
    InternetBox(InternetBox),
    MobilePlan(MobilePlan),
}

impl CatalogItem {
    /// Product line name.
    pub fn kind(&self) -> &'static str {
        match self {
            CatalogItem::Phone(_) => "phone",
            CatalogItem::InternetBox(_) => "internet_box",
            CatalogItem::MobilePlan(_) => "mobile_plan",
        }
    }

    fn as_offer(&self) -> &dyn Offer {
        match self {
            CatalogItem::Phone(p) => p,
            CatalogItem::InternetBox(b) => b,
            CatalogItem::MobilePlan(m) => m,
        }
    }
}

impl Offer for CatalogItem {
    fn id(&self) -> &ItemId {
        self.as_offer().id()
    }

    fn name(&self) -> &str {
        self.as_offer().name()
    }

    fn brand(&self) -> &str {
        self.as_offer().brand()
    }

    fn price(&self) -> Money {
        self.as_offer().price()
    }

    fn attribute(&self, dimension: Dimension) -> Option<&str> {
        self.as_offer().attribute(dimension)
    }

    fn flag(&self, flag: Flag) -> bool {
        self.as_offer().flag(flag)
    }

    fn speed_mbps(&self) -> f64 {
        self.as_offer().speed_mbps()
    }

    fn data_gb(&self) -> f64 {
        self.as_offer().data_gb()
    }

    fn commission(&self) -> Money {
        self.as_offer().commission()
    }

    fn source(&self) -> ItemSource {
        self.as_offer().source()
    }
}

impl From<Phone> for CatalogItem {
    fn from(p: Phone) -> Self {
        CatalogItem::Phone(p)
    }
}

impl From<InternetBox> for CatalogItem {
    fn from(b: InternetBox) -> Self {
        CatalogItem::InternetBox(b)
    }
}

impl From<MobilePlan> for CatalogItem {
    fn from(m: MobilePlan) -> Self {
        CatalogItem::MobilePlan(m)
    }
}

/// Zero commission for items that carry none.
pub(crate) fn commission_or_zero(commission: Option<Money>) -> Money {
    commission.unwrap_or_else(|| Money::zero(Currency::EUR))
}
