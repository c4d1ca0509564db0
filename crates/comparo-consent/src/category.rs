//! Consent categories.

use serde::{Deserialize, Serialize};

/// A bucket of user permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsentCategory {
    /// Required for the site to work. Always granted.
    Necessary,
    Analytics,
    Marketing,
    Preferences,
}

impl ConsentCategory {
    pub const ALL: [ConsentCategory; 4] = [
        ConsentCategory::Necessary,
        ConsentCategory::Analytics,
        ConsentCategory::Marketing,
        ConsentCategory::Preferences,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConsentCategory::Necessary => "necessary",
            ConsentCategory::Analytics => "analytics",
            ConsentCategory::Marketing => "marketing",
            ConsentCategory::Preferences => "preferences",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "necessary" => Some(ConsentCategory::Necessary),
            "analytics" => Some(ConsentCategory::Analytics),
            "marketing" => Some(ConsentCategory::Marketing),
            "preferences" => Some(ConsentCategory::Preferences),
            _ => None,
        }
    }

    /// Label shown in the consent banner.
    pub fn display_name(&self) -> &'static str {
        match self {
            ConsentCategory::Necessary => "Cookies nécessaires",
            ConsentCategory::Analytics => "Mesure d'audience",
            ConsentCategory::Marketing => "Marketing et affiliation",
            ConsentCategory::Preferences => "Préférences",
        }
    }
}

impl std::fmt::Display for ConsentCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-category consent flags.
///
/// `necessary` is forced to `true` on every path that builds or reads one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawCategories")]
pub struct ConsentCategories {
    necessary: bool,
    pub analytics: bool,
    pub marketing: bool,
    pub preferences: bool,
}

impl Default for ConsentCategories {
    fn default() -> Self {
        Self {
            necessary: true,
            analytics: false,
            marketing: false,
            preferences: false,
        }
    }
}

impl ConsentCategories {
    /// Only necessary cookies.
    pub fn necessary_only() -> Self {
        Self::default()
    }

    /// Everything granted.
    pub fn all() -> Self {
        Self {
            necessary: true,
            analytics: true,
            marketing: true,
            preferences: true,
        }
    }

    pub fn new(analytics: bool, marketing: bool, preferences: bool) -> Self {
        Self {
            necessary: true,
            analytics,
            marketing,
            preferences,
        }
    }

    pub fn with(mut self, category: ConsentCategory, granted: bool) -> Self {
        match category {
            ConsentCategory::Necessary => {}
            ConsentCategory::Analytics => self.analytics = granted,
            ConsentCategory::Marketing => self.marketing = granted,
            ConsentCategory::Preferences => self.preferences = granted,
        }
        self
    }

    pub fn is_granted(&self, category: ConsentCategory) -> bool {
        match category {
            ConsentCategory::Necessary => true,
            ConsentCategory::Analytics => self.analytics,
            ConsentCategory::Marketing => self.marketing,
            ConsentCategory::Preferences => self.preferences,
        }
    }

    /// Granted categories, in declaration order.
    pub fn granted(&self) -> Vec<ConsentCategory> {
        ConsentCategory::ALL
            .into_iter()
            .filter(|c| self.is_granted(*c))
            .collect()
    }
}

/// Wire shape. Whatever `necessary` says on disk is ignored.
#[derive(Deserialize, Default)]
#[serde(default)]
struct RawCategories {
    analytics: bool,
    marketing: bool,
    preferences: bool,
}

impl From<RawCategories> for ConsentCategories {
    fn from(raw: RawCategories) -> Self {
        Self::new(raw.analytics, raw.marketing, raw.preferences)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_necessary_cannot_be_revoked() {
        let categories = ConsentCategories::necessary_only()
            .with(ConsentCategory::Necessary, false)
            .with(ConsentCategory::Marketing, true);
        assert!(categories.is_granted(ConsentCategory::Necessary));
        assert!(categories.is_granted(ConsentCategory::Marketing));
    }

    #[test]
    fn test_deserialize_forces_necessary() {
        let categories: ConsentCategories =
            serde_json::from_str(r#"{"necessary":false,"analytics":true}"#).unwrap();
        assert_eq!(categories, ConsentCategories::new(true, false, false));
        assert!(categories.is_granted(ConsentCategory::Necessary));
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(ConsentCategories::new(false, true, false)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "necessary": true,
                "analytics": false,
                "marketing": true,
                "preferences": false
            })
        );
    }

    #[test]
    fn test_granted_and_names() {
        let granted = ConsentCategories::new(true, false, true).granted();
        assert_eq!(
            granted,
            vec![
                ConsentCategory::Necessary,
                ConsentCategory::Analytics,
                ConsentCategory::Preferences
            ]
        );
        assert_eq!(ConsentCategory::from_str(" Marketing"), Some(ConsentCategory::Marketing));
        assert_eq!(ConsentCategory::from_str("ads"), None);
        assert_eq!(ConsentCategory::Analytics.to_string(), "analytics");
    }
}
