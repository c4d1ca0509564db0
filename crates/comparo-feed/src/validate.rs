//! Minimal shape check for fetched feed text.

use thiserror::Error;

/// Smallest payload accepted as a feed, in characters.
pub const DEFAULT_MIN_LENGTH: usize = 100;

/// Column markers of which at least one must appear.
pub const DEFAULT_MARKERS: &[&str] = &["Programme_ID", "Description"];

/// Why a payload was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("payload is {len} characters, expected at least {min}")]
    TooSmall { len: usize, min: usize },

    #[error("none of the expected markers found: {}", markers.join(", "))]
    MissingMarkers { markers: Vec<String> },
}

/// Rejects payloads that are too short or carry none of the markers.
///
/// This does not parse the CSV; it only tells a broken payload (an HTML
/// error page, an empty file) apart from something worth handing on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedValidator {
    min_length: usize,
    markers: Vec<String>,
}

impl Default for FeedValidator {
    fn default() -> Self {
        Self {
            min_length: DEFAULT_MIN_LENGTH,
            markers: DEFAULT_MARKERS.iter().map(|m| m.to_string()).collect(),
        }
    }
}

impl FeedValidator {
    pub fn new(min_length: usize, markers: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            min_length,
            markers: markers.into_iter().map(Into::into).collect(),
        }
    }

    pub fn min_length(&self) -> usize {
        self.min_length
    }

    pub fn markers(&self) -> &[String] {
        &self.markers
    }

    pub fn validate(&self, text: &str) -> Result<(), ValidationError> {
        let len = text.chars().count();
        if len < self.min_length {
            return Err(ValidationError::TooSmall {
                len,
                min: self.min_length,
            });
        }

        // An empty marker list accepts anything long enough.
        if self.markers.is_empty() || self.markers.iter().any(|m| text.contains(m.as_str())) {
            Ok(())
        } else {
            Err(ValidationError::MissingMarkers {
                markers: self.markers.clone(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn padded(head: &str) -> String {
        format!("{head}\n{}", "x".repeat(DEFAULT_MIN_LENGTH))
    }

    #[test]
    fn test_accepts_either_marker() {
        let validator = FeedValidator::default();
        assert!(validator.validate(&padded("Programme_ID,Name")).is_ok());
        assert!(validator.validate(&padded("Name,Description")).is_ok());
    }

    #[test]
    fn test_rejects_short_payload() {
        let err = FeedValidator::default()
            .validate("Programme_ID")
            .unwrap_err();
        assert_eq!(err, ValidationError::TooSmall { len: 12, min: 100 });
    }

    #[test]
    fn test_rejects_payload_without_markers() {
        let err = FeedValidator::default()
            .validate(&padded("<html>Service unavailable</html>"))
            .unwrap_err();
        assert!(matches!(err, ValidationError::MissingMarkers { .. }));
        assert!(err.to_string().contains("Programme_ID, Description"));
    }

    #[test]
    fn test_length_boundary_is_inclusive() {
        let validator = FeedValidator::new(20, ["Programme_ID"]);
        let exact = format!("Programme_ID{}", "x".repeat(8));
        assert_eq!(exact.len(), 20);
        assert!(validator.validate(&exact).is_ok());
        assert!(validator.validate(&exact[..19]).is_err());
    }

    #[test]
    fn test_length_counts_characters() {
        let validator = FeedValidator::new(20, ["Description"]);
        // 20 characters, 28 bytes.
        let accented = "Description,éééééééé";
        assert_eq!(accented.chars().count(), 20);
        assert!(validator.validate(accented).is_ok());

        let short = "Description,ééééééé";
        assert_eq!(short.len(), 26);
        assert_eq!(
            validator.validate(short).unwrap_err(),
            ValidationError::TooSmall { len: 19, min: 20 }
        );
    }
}
