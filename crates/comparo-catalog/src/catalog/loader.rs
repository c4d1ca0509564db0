//! Normalization of raw backend records into catalog items.
//!
//! The backend's schema is not ours: field names drift between camelCase,
//! snake_case and French labels, and numbers arrive as JSON numbers or as
//! display strings. Each loader reads a record through a list of accepted
//! keys and skips the record only when an identity field is missing.

use crate::catalog::{InternetBox, ItemSource, MobilePlan, Phone};
use crate::error::CatalogError;
use crate::ids::ItemId;
use crate::money::{Currency, Money};
use crate::parse::parse_amount;
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// Outcome of normalizing one record set.
#[derive(Debug)]
pub struct LoadReport<T> {
    /// Successfully normalized items, in input order.
    pub items: Vec<T>,
    /// Records that were skipped and why.
    pub skipped: Vec<CatalogError>,
}

impl<T> LoadReport<T> {
    /// Number of skipped records.
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    /// Discard the skip details.
    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}

/// Normalize raw phone records.
pub fn load_phones(records: Vec<Value>) -> LoadReport<Phone> {
    load_with(records, "phone", |index, fields| {
        let mut phone = Phone::new(
            fields.id(),
            fields.required_text(index, "name", &["name", "title", "nom", "model"])?,
            fields.required_text(index, "trademark", &["trademark", "brand", "marque"])?,
            fields.money(&["price", "prix", "price_from", "priceFrom"]),
        );
        phone.storage = fields.text(&["storage", "stockage", "capacity"]);
        phone.condition = fields.text(&["condition", "etat", "state"]);
        phone.os = fields.text(&["os", "operating_system", "operatingSystem"]);
        phone.technology = fields.text(&["technology", "network", "reseau"]);
        phone.eco_friendly = fields.flag(&["eco_friendly", "ecoFriendly", "eco"]);
        phone.forfait_included = fields.flag(&["forfait_included", "forfaitIncluded", "with_plan"]);
        phone.image = fields.text(&["image", "image_url", "imageUrl"]);
        phone.source = fields.source();
        phone.commission = fields.optional_money(&["commission", "commission_amount"]);
        Ok(phone)
    })
}

/// Normalize raw internet box records.
pub fn load_boxes(records: Vec<Value>) -> LoadReport<InternetBox> {
    load_with(records, "internet_box", |index, fields| {
        let mut internet_box = InternetBox::new(
            fields.id(),
            fields.required_text(index, "name", &["name", "title", "nom"])?,
            fields.required_text(index, "operator", &["operator", "operateur", "provider"])?,
            fields.money(&["price", "prix", "monthly_price", "monthlyPrice"]),
        );
        internet_box.download_speed =
            fields.text(&["download_speed", "downloadSpeed", "speed", "debit"]);
        internet_box.technology = fields.text(&["technology", "type", "connection"]);
        internet_box.wifi_standard = fields.text(&["wifi_standard", "wifiStandard", "wifi"]);
        internet_box.tv_included = fields.flag(&["tv_included", "tvIncluded", "tv"]);
        internet_box.source = fields.source();
        internet_box.commission = fields.optional_money(&["commission", "commission_amount"]);
        Ok(internet_box)
    })
}

/// Normalize raw mobile plan records.
pub fn load_plans(records: Vec<Value>) -> LoadReport<MobilePlan> {
    load_with(records, "mobile_plan", |index, fields| {
        let mut plan = MobilePlan::new(
            fields.id(),
            fields.required_text(index, "name", &["name", "title", "nom"])?,
            fields.required_text(index, "operator", &["operator", "operateur", "provider"])?,
            fields.money(&["price", "prix", "monthly_price", "monthlyPrice"]),
        );
        plan.data_allowance = fields.text(&["data", "data_allowance", "dataAllowance", "internet"]);
        plan.technology = fields.text(&["technology", "network", "reseau"]);
        plan.eu_roaming = fields.flag(&["eu_roaming", "euRoaming", "roaming"]);
        plan.source = fields.source();
        plan.commission = fields.optional_money(&["commission", "commission_amount"]);
        Ok(plan)
    })
}

fn load_with<T, F>(records: Vec<Value>, line: &'static str, build: F) -> LoadReport<T>
where
    F: Fn(usize, &Fields<'_>) -> Result<T, CatalogError>,
{
    let mut items = Vec::with_capacity(records.len());
    let mut skipped = Vec::new();

    for (index, record) in records.iter().enumerate() {
        let result = match record.as_object() {
            Some(map) => build(index, &Fields { map }),
            None => Err(CatalogError::NotAnObject { index }),
        };
        match result {
            Ok(item) => items.push(item),
            Err(e) => {
                warn!(line, index, error = %e, "Skipping catalog record");
                skipped.push(e);
            }
        }
    }

    debug!(line, loaded = items.len(), skipped = skipped.len(), "Normalized catalog records");
    LoadReport { items, skipped }
}

/// Keyed read access over one raw record.
struct Fields<'a> {
    map: &'a Map<String, Value>,
}

impl Fields<'_> {
    /// First non-null value among the accepted keys.
    fn value(&self, keys: &[&str]) -> Option<&Value> {
        keys.iter()
            .filter_map(|k| self.map.get(*k))
            .find(|v| !v.is_null())
    }

    fn text(&self, keys: &[&str]) -> Option<String> {
        match self.value(keys)? {
            Value::String(s) => {
                let s = s.trim();
                (!s.is_empty()).then(|| s.to_string())
            }
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    fn required_text(
        &self,
        index: usize,
        field: &'static str,
        keys: &[&str],
    ) -> Result<String, CatalogError> {
        self.text(keys)
            .ok_or(CatalogError::MissingField { index, field })
    }

    fn id(&self) -> ItemId {
        match self.text(&["id", "_id", "objectId", "slug"]) {
            Some(id) => ItemId::new(id),
            None => {
                let id = ItemId::generate();
                debug!(%id, "Record has no id, generated one");
                id
            }
        }
    }

    fn amount(&self, keys: &[&str]) -> Option<f64> {
        match self.value(keys)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => Some(parse_amount(s)),
            _ => None,
        }
    }

    /// Price in euros; unreadable values read as zero.
    fn money(&self, keys: &[&str]) -> Money {
        let amount = self.amount(keys).filter(|a| *a >= 0.0).unwrap_or(0.0);
        Money::from_decimal(amount, Currency::EUR)
    }

    fn optional_money(&self, keys: &[&str]) -> Option<Money> {
        self.amount(keys)
            .filter(|a| *a >= 0.0)
            .map(|a| Money::from_decimal(a, Currency::EUR))
    }

    fn flag(&self, keys: &[&str]) -> bool {
        match self.value(keys) {
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
            Some(Value::String(s)) => matches!(
                s.trim().to_lowercase().as_str(),
                "true" | "1" | "yes" | "oui" | "on"
            ),
            _ => false,
        }
    }

    /// Explicit `source`, else affiliate when the record carries a
    /// partner programme id.
    fn source(&self) -> ItemSource {
        if let Some(source) = self.text(&["source", "origin"]) {
            return ItemSource::from_str(&source);
        }
        if self.value(&["Programme_ID", "programme_id", "programmeId"]).is_some() {
            ItemSource::Affiliate
        } else {
            ItemSource::Catalog
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Offer;
    use serde_json::json;

    #[test]
    fn test_load_phones_accepts_aliases_and_strings() {
        let report = load_phones(vec![
            json!({"id": 12, "name": "iPhone 15", "trademark": "Apple", "price": 969.0, "storage": "128 Go"}),
            json!({"_id": "abc", "title": "Galaxy A55", "brand": "Samsung", "prix": "399,99 €", "ecoFriendly": "true"}),
        ]);

        assert_eq!(report.skipped_count(), 0);
        let phones = report.into_items();
        assert_eq!(phones[0].id.as_str(), "12");
        assert_eq!(phones[0].price.amount_cents, 96900);
        assert_eq!(phones[0].storage.as_deref(), Some("128 Go"));
        assert_eq!(phones[1].id.as_str(), "abc");
        assert_eq!(phones[1].trademark, "Samsung");
        assert_eq!(phones[1].price.amount_cents, 39999);
        assert!(phones[1].eco_friendly);
    }

    #[test]
    fn test_load_skips_bad_records_without_failing() {
        let report = load_plans(vec![
            json!({"name": "Forfait 100 Go", "operator": "SFR", "price": "15,99€", "data": "100 Go"}),
            json!("not an object"),
            json!({"name": "No operator", "price": 5}),
        ]);

        assert_eq!(report.items.len(), 1);
        assert_eq!(report.skipped_count(), 2);
        assert!(matches!(report.skipped[0], CatalogError::NotAnObject { index: 1 }));
        assert!(matches!(
            report.skipped[1],
            CatalogError::MissingField { index: 2, field: "operator" }
        ));
        assert_eq!(report.items[0].data_gb(), 100.0);
    }

    #[test]
    fn test_unparsable_price_defaults_to_zero() {
        let report = load_boxes(vec![
            json!({"id": "b1", "name": "Box", "operator": "Free", "price": "sur devis"}),
            json!({"id": "b2", "name": "Box 2", "operator": "Free", "price": -3}),
        ]);
        assert!(report.items.iter().all(|b| b.price.is_zero()));
    }

    #[test]
    fn test_source_detection() {
        let report = load_boxes(vec![
            json!({"name": "Bbox", "operator": "Bouygues Telecom", "Programme_ID": "1234", "commission": "12,50"}),
            json!({"name": "Livebox", "operator": "Orange", "source": "affiliate"}),
            json!({"name": "Freebox", "operator": "Free"}),
        ]);

        let sources: Vec<_> = report.items.iter().map(|b| b.source).collect();
        assert_eq!(
            sources,
            vec![ItemSource::Affiliate, ItemSource::Affiliate, ItemSource::Catalog]
        );
        assert_eq!(report.items[0].commission().amount_cents, 1250);
        assert!(report.items[2].id.as_str().starts_with("gen-"));
    }
}
