//! Presentation helpers shared by result and gallery views.

use serde::{Deserialize, Serialize};

/// Confidence band for a classification, used to pick the bar color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceBand {
    /// 90% and above
    High,
    /// 70% to 89%
    Medium,
    /// Below 70%
    Low,
}

impl ConfidenceBand {
    /// Band for a whole-number percentage.
    pub fn from_percent(percent: u8) -> Self {
        match percent {
            90.. => ConfidenceBand::High,
            70..=89 => ConfidenceBand::Medium,
            _ => ConfidenceBand::Low,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceBand::High => "high",
            ConfidenceBand::Medium => "medium",
            ConfidenceBand::Low => "low",
        }
    }
}

impl std::fmt::Display for ConfidenceBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Format an amount as US dollars, e.g. `$1,299.99`.
pub fn format_usd(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let dollars = cents / 100;
    let remainder = cents % 100;

    let digits = dollars.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}${}.{:02}", sign, grouped, remainder)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_bands() {
        assert_eq!(ConfidenceBand::from_percent(97), ConfidenceBand::High);
        assert_eq!(ConfidenceBand::from_percent(90), ConfidenceBand::High);
        assert_eq!(ConfidenceBand::from_percent(89), ConfidenceBand::Medium);
        assert_eq!(ConfidenceBand::from_percent(70), ConfidenceBand::Medium);
        assert_eq!(ConfidenceBand::from_percent(69), ConfidenceBand::Low);
    }

    #[test]
    fn test_format_usd() {
        assert_eq!(format_usd(99.99), "$99.99");
        assert_eq!(format_usd(0.0), "$0.00");
        assert_eq!(format_usd(1299.5), "$1,299.50");
        assert_eq!(format_usd(1234567.891), "$1,234,567.89");
        assert_eq!(format_usd(-24.99), "-$24.99");
    }
}
