//! Classifier response models.
//!
//! The classifier answers with a JSON array of candidate matches ordered by
//! score. Element 0 is the primary prediction; the next [`SIMILAR_LIMIT`]
//! elements are shown as "similar" suggestions.
//!
//! Numeric fields are decoded leniently: the live service sends `abv` as
//! `"43.0%"`, `proof` as a string that may be `"N/A"`, and nulls for unknown
//! prices, so each of those accepts a number, a numeric string or null.

use serde::{Deserialize, Deserializer, Serialize};

use crate::display::ConfidenceBand;

/// Maximum number of similar-item suggestions shown next to the primary match.
pub const SIMILAR_LIMIT: usize = 2;

/// A single candidate match returned by the classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WhiskyMatch {
    /// Catalog identifier, when the service includes one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    /// Display name of the bottle
    pub whisky_name: String,
    /// Similarity score, expected in [0, 1]
    pub score: f64,
    /// Spirit type label (e.g. "Single Malt Scotch")
    #[serde(default, deserialize_with = "null_as_empty")]
    pub spirit_type: String,
    /// Alcohol by volume, percent
    #[serde(default, deserialize_with = "lenient_number")]
    pub abv: Option<f64>,
    /// Proof
    #[serde(default, deserialize_with = "lenient_number")]
    pub proof: Option<f64>,
    /// Bottle size (e.g. "750ml")
    #[serde(default, deserialize_with = "null_as_empty")]
    pub size: String,
    /// Reference shelf price in USD
    #[serde(default, deserialize_with = "lenient_number")]
    pub shelf_price: Option<f64>,
    /// Popularity score
    #[serde(default, deserialize_with = "lenient_number")]
    pub popularity_score: Option<f64>,
}

impl WhiskyMatch {
    /// Confidence as a whole percentage.
    ///
    /// `None` when the score falls outside [0, 1]; such scores are not
    /// meaningful as a confidence and are not displayed.
    pub fn confidence_percent(&self) -> Option<u8> {
        if (0.0..=1.0).contains(&self.score) {
            Some((self.score * 100.0).round() as u8)
        } else {
            None
        }
    }

    /// Confidence band used to color the confidence bar.
    pub fn confidence_band(&self) -> Option<ConfidenceBand> {
        self.confidence_percent().map(ConfidenceBand::from_percent)
    }
}

/// Error returned when the classifier produced no candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmptyResultError;

impl std::fmt::Display for EmptyResultError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "classifier returned no candidates")
    }
}

impl std::error::Error for EmptyResultError {}

/// Wire shapes accepted for a classifier response.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawResponse {
    Many(Vec<WhiskyMatch>),
    One(Box<WhiskyMatch>),
}

impl TryFrom<RawResponse> for ClassificationResult {
    type Error = EmptyResultError;

    fn try_from(raw: RawResponse) -> Result<Self, Self::Error> {
        match raw {
            RawResponse::Many(matches) => ClassificationResult::new(matches),
            RawResponse::One(single) => Ok(ClassificationResult::single(*single)),
        }
    }
}

/// Ordered, non-empty sequence of candidate matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawResponse", into = "Vec<WhiskyMatch>")]
pub struct ClassificationResult {
    matches: Vec<WhiskyMatch>,
}

impl From<ClassificationResult> for Vec<WhiskyMatch> {
    fn from(result: ClassificationResult) -> Self {
        result.matches
    }
}

impl ClassificationResult {
    /// Build a result from ordered matches. Fails if `matches` is empty.
    pub fn new(matches: Vec<WhiskyMatch>) -> Result<Self, EmptyResultError> {
        if matches.is_empty() {
            return Err(EmptyResultError);
        }
        Ok(Self { matches })
    }

    /// Build a result holding only a primary match.
    pub fn single(primary: WhiskyMatch) -> Self {
        Self {
            matches: vec![primary],
        }
    }

    /// The primary prediction.
    pub fn primary(&self) -> &WhiskyMatch {
        &self.matches[0]
    }

    /// Bounds-checked access to any candidate.
    pub fn get(&self, index: usize) -> Option<&WhiskyMatch> {
        self.matches.get(index)
    }

    /// The `n`-th similar-item suggestion (0-based), if present.
    pub fn suggestion(&self, n: usize) -> Option<&WhiskyMatch> {
        if n >= SIMILAR_LIMIT {
            return None;
        }
        self.matches.get(n + 1)
    }

    /// Names of up to [`SIMILAR_LIMIT`] similar items, in score order.
    pub fn similar_names(&self) -> Vec<&str> {
        (0..SIMILAR_LIMIT)
            .filter_map(|n| self.suggestion(n))
            .map(|m| m.whisky_name.as_str())
            .collect()
    }

    /// All candidates in score order.
    pub fn matches(&self) -> &[WhiskyMatch] {
        &self.matches
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}

/// Parse a numeric string such as `"43.0%"` or `" 86 "`.
///
/// Returns `None` for placeholders like `"N/A"` or non-finite values.
pub fn parse_numeric_text(text: &str) -> Option<f64> {
    let trimmed = text.trim().trim_end_matches('%').trim();
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<NumberOrText> = Option::deserialize(deserializer)?;
    Ok(match raw {
        Some(NumberOrText::Number(n)) if n.is_finite() => Some(n),
        Some(NumberOrText::Text(text)) => parse_numeric_text(&text),
        _ => None,
    })
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
