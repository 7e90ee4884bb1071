//! Result view-model.

use dram_models::{format_usd, ClassificationResult, ConfidenceBand};

/// Display-ready fields for the primary match and its suggestions.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultView {
    pub name: String,
    pub spirit_type: String,
    /// Whole-number confidence, absent when the score is out of range
    pub confidence_percent: Option<u8>,
    pub confidence_band: Option<ConfidenceBand>,
    pub abv: Option<String>,
    pub proof: Option<String>,
    pub size: String,
    pub price: Option<String>,
    pub popularity: Option<String>,
    /// Up to two similar bottles
    pub similar: Vec<String>,
}

impl ResultView {
    pub fn from_result(result: &ClassificationResult) -> Self {
        let primary = result.primary();
        Self {
            name: primary.whisky_name.clone(),
            spirit_type: primary.spirit_type.clone(),
            confidence_percent: primary.confidence_percent(),
            confidence_band: primary.confidence_band(),
            abv: primary.abv.map(|v| format!("{}%", fmt_number(v))),
            proof: primary.proof.map(fmt_number),
            size: primary.size.clone(),
            price: primary.shelf_price.map(format_usd),
            popularity: primary.popularity_score.map(fmt_number),
            similar: result
                .similar_names()
                .into_iter()
                .map(str::to_string)
                .collect(),
        }
    }

    /// Confidence label, e.g. `97%`.
    pub fn confidence_label(&self) -> String {
        match self.confidence_percent {
            Some(p) => format!("{}%", p),
            None => "n/a".to_string(),
        }
    }
}

impl From<&ClassificationResult> for ResultView {
    fn from(result: &ClassificationResult) -> Self {
        Self::from_result(result)
    }
}

/// `43.0` → `43`, `46.5` → `46.5`.
fn fmt_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}
