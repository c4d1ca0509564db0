//! Sort options and the sort engine.

use crate::catalog::{ItemSource, Offer};
use serde::{Deserialize, Serialize};

/// Brands and operators that sort first under `Popularity`.
pub const DEFAULT_PREFERRED_BRANDS: &[&str] = &[
    "apple",
    "samsung",
    "google",
    "xiaomi",
    "orange",
    "sfr",
    "bouygues telecom",
    "free",
];

/// Sort options for listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SortOption {
    /// Keep the source order.
    #[default]
    Relevance,
    /// Sort by price, low to high.
    PriceAsc,
    /// Sort by price, high to low.
    PriceDesc,
    /// Sort by download speed, slow to fast.
    SpeedAsc,
    /// Sort by download speed, fast to slow.
    SpeedDesc,
    /// Sort by data allowance, small to large.
    DataAsc,
    /// Sort by data allowance, large to small.
    DataDesc,
    /// Preferred brands first, then affiliate offers.
    Popularity,
    /// Highest affiliate commission first.
    CommissionDesc,
}

impl SortOption {
    /// Parse a sort parameter (e.g., "price-asc"). Unknown values fall back
    /// to `Relevance`.
    pub fn from_param(s: &str) -> Self {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "price-asc" => Self::PriceAsc,
            "price-desc" => Self::PriceDesc,
            "speed-asc" => Self::SpeedAsc,
            "speed-desc" => Self::SpeedDesc,
            "data-asc" => Self::DataAsc,
            "data-desc" => Self::DataDesc,
            "popularity" | "popular" => Self::Popularity,
            "commission-desc" | "commission" => Self::CommissionDesc,
            _ => Self::Relevance,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Relevance => "relevance",
            Self::PriceAsc => "price-asc",
            Self::PriceDesc => "price-desc",
            Self::SpeedAsc => "speed-asc",
            Self::SpeedDesc => "speed-desc",
            Self::DataAsc => "data-asc",
            Self::DataDesc => "data-desc",
            Self::Popularity => "popularity",
            Self::CommissionDesc => "commission-desc",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Relevance => "Relevance",
            Self::PriceAsc => "Price: Low to High",
            Self::PriceDesc => "Price: High to Low",
            Self::SpeedAsc => "Speed: Slowest First",
            Self::SpeedDesc => "Speed: Fastest First",
            Self::DataAsc => "Data: Smallest First",
            Self::DataDesc => "Data: Largest First",
            Self::Popularity => "Most Popular",
            Self::CommissionDesc => "Featured Partners",
        }
    }
}

/// Sort engine.
///
/// Every option is a stable sort on a copy of the input, so ties keep the
/// order they arrived in and the caller's slice is never touched.
#[derive(Debug, Clone)]
pub struct Sorter {
    preferred_brands: Vec<String>,
}

impl Default for Sorter {
    fn default() -> Self {
        Self::new(DEFAULT_PREFERRED_BRANDS.iter().copied())
    }
}

impl Sorter {
    /// Create a sorter with its own preferred-brand set.
    pub fn new<I, S>(preferred_brands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            preferred_brands: preferred_brands
                .into_iter()
                .map(|b| b.as_ref().trim().to_lowercase())
                .collect(),
        }
    }

    /// Whether a brand is in the preferred set.
    pub fn is_preferred(&self, brand: &str) -> bool {
        let brand = brand.trim().to_lowercase();
        self.preferred_brands.iter().any(|b| *b == brand)
    }

    /// Return a newly ordered copy of `items`.
    pub fn sort<T: Offer + Clone>(&self, items: &[T], option: SortOption) -> Vec<T> {
        let mut sorted = items.to_vec();
        match option {
            SortOption::Relevance => {}
            SortOption::PriceAsc => sorted.sort_by_key(|i| i.price().amount_cents),
            SortOption::PriceDesc => {
                sorted.sort_by(|a, b| b.price().amount_cents.cmp(&a.price().amount_cents))
            }
            SortOption::SpeedAsc => sorted.sort_by(|a, b| a.speed_mbps().total_cmp(&b.speed_mbps())),
            SortOption::SpeedDesc => sorted.sort_by(|a, b| b.speed_mbps().total_cmp(&a.speed_mbps())),
            SortOption::DataAsc => sorted.sort_by(|a, b| a.data_gb().total_cmp(&b.data_gb())),
            SortOption::DataDesc => sorted.sort_by(|a, b| b.data_gb().total_cmp(&a.data_gb())),
            SortOption::Popularity => sorted.sort_by_key(|i| self.popularity_rank(i)),
            SortOption::CommissionDesc => sorted
                .sort_by(|a, b| b.commission().amount_cents.cmp(&a.commission().amount_cents)),
        }
        sorted
    }

    /// (not preferred, not affiliate): lower ranks sort first.
    fn popularity_rank<T: Offer>(&self, item: &T) -> (bool, bool) {
        (
            !self.is_preferred(item.brand()),
            item.source() != ItemSource::Affiliate,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{InternetBox, MobilePlan, Phone};
    use crate::money::{Currency, Money};

    fn eur(amount: f64) -> Money {
        Money::from_decimal(amount, Currency::EUR)
    }

    fn ids<T: Offer>(items: &[T]) -> Vec<&str> {
        items.iter().map(|i| i.id().as_str()).collect()
    }

    fn phones() -> Vec<Phone> {
        let mut affiliate = Phone::new("p3", "Nord 3", "OnePlus", eur(450.0));
        affiliate.source = ItemSource::Affiliate;
        affiliate.commission = Some(eur(12.0));

        let mut apple = Phone::new("p1", "iPhone 15", "Apple", eur(969.0));
        apple.commission = Some(eur(30.0));

        vec![
            Phone::new("p0", "Fairphone 5", "Fairphone", eur(699.0)),
            apple,
            Phone::new("p2", "Galaxy A15", "Samsung", eur(199.0)),
            affiliate,
        ]
    }

    #[test]
    fn test_price_sorts() {
        let items = phones();
        let sorter = Sorter::default();

        let asc = sorter.sort(&items, SortOption::PriceAsc);
        assert_eq!(ids(&asc), vec!["p2", "p3", "p0", "p1"]);

        let desc = sorter.sort(&asc, SortOption::PriceDesc);
        let mut reversed = asc.clone();
        reversed.reverse();
        assert_eq!(desc, reversed);
    }

    #[test]
    fn test_sort_does_not_mutate_and_preserves_multiset() {
        let items = phones();
        let before = items.clone();
        let sorter = Sorter::default();

        for option in [
            SortOption::Relevance,
            SortOption::PriceAsc,
            SortOption::PriceDesc,
            SortOption::SpeedDesc,
            SortOption::DataAsc,
            SortOption::Popularity,
            SortOption::CommissionDesc,
        ] {
            let sorted = sorter.sort(&items, option);
            assert_eq!(items, before);
            assert_eq!(sorted.len(), items.len());

            let mut a = ids(&sorted);
            let mut b = ids(&items);
            a.sort();
            b.sort();
            assert_eq!(a, b, "multiset changed under {:?}", option);
        }
    }

    #[test]
    fn test_popularity_buckets_are_stable() {
        let sorted = Sorter::default().sort(&phones(), SortOption::Popularity);
        // Preferred (Apple, Samsung) in input order, then affiliate, then the rest.
        assert_eq!(ids(&sorted), vec!["p1", "p2", "p3", "p0"]);
    }

    #[test]
    fn test_popularity_with_custom_brands() {
        let sorted = Sorter::new(["Fairphone"]).sort(&phones(), SortOption::Popularity);
        assert_eq!(ids(&sorted), vec!["p0", "p3", "p1", "p2"]);
    }

    #[test]
    fn test_commission_defaults_to_zero() {
        let sorted = Sorter::default().sort(&phones(), SortOption::CommissionDesc);
        assert_eq!(ids(&sorted), vec!["p1", "p3", "p0", "p2"]);
    }

    #[test]
    fn test_speed_normalizes_units() {
        let boxes = vec![
            InternetBox::new("b1", "A", "Free", eur(30.0)).with_speed("500 Mb/s"),
            InternetBox::new("b2", "B", "Orange", eur(40.0)).with_speed("2 Gb/s"),
            InternetBox::new("b3", "C", "SFR", eur(25.0)),
            InternetBox::new("b4", "D", "SFR", eur(25.0)).with_speed("1 Gb/s"),
        ];
        let sorted = Sorter::default().sort(&boxes, SortOption::SpeedDesc);
        assert_eq!(ids(&sorted), vec!["b2", "b4", "b1", "b3"]);

        let sorted = Sorter::default().sort(&boxes, SortOption::SpeedAsc);
        assert_eq!(ids(&sorted), vec!["b3", "b1", "b4", "b2"]);
    }

    #[test]
    fn test_data_sort_puts_unlimited_last_ascending() {
        let plans = vec![
            MobilePlan::new("m1", "Max", "Free", eur(20.0)).with_data("Illimité"),
            MobilePlan::new("m2", "Mini", "Free", eur(2.0)).with_data("50 Mo"),
            MobilePlan::new("m3", "Std", "SFR", eur(10.0)).with_data("100 Go"),
        ];
        let sorted = Sorter::default().sort(&plans, SortOption::DataAsc);
        assert_eq!(ids(&sorted), vec!["m2", "m3", "m1"]);
    }

    #[test]
    fn test_sort_option_from_param() {
        assert_eq!(SortOption::from_param("price-asc"), SortOption::PriceAsc);
        assert_eq!(SortOption::from_param("DATA_DESC"), SortOption::DataDesc);
        assert_eq!(SortOption::from_param("bogus"), SortOption::Relevance);
        assert_eq!(SortOption::from_param(SortOption::CommissionDesc.as_str()), SortOption::CommissionDesc);
    }

    #[test]
    fn test_sort_option_serde_matches_params() {
        let json = serde_json::to_string(&SortOption::SpeedDesc).unwrap();
        assert_eq!(json, r#""speed-desc""#);
    }
}
