use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The six fixed cost buckets of an estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CostCategory {
    Transportation,
    Accommodation,
    Food,
    TempleEntry,
    LocalTransport,
    Miscellaneous,
}

impl CostCategory {
    pub const ALL: [CostCategory; 6] = [
        CostCategory::Transportation,
        CostCategory::Accommodation,
        CostCategory::Food,
        CostCategory::TempleEntry,
        CostCategory::LocalTransport,
        CostCategory::Miscellaneous,
    ];

    /// Wire name used in JSON payloads
    pub fn key(self) -> &'static str {
        match self {
            CostCategory::Transportation => "transportation",
            CostCategory::Accommodation => "accommodation",
            CostCategory::Food => "food",
            CostCategory::TempleEntry => "templeEntry",
            CostCategory::LocalTransport => "localTransport",
            CostCategory::Miscellaneous => "miscellaneous",
        }
    }

    /// Human readable label for display
    pub fn label(self) -> &'static str {
        match self {
            CostCategory::Transportation => "Transportation",
            CostCategory::Accommodation => "Accommodation",
            CostCategory::Food => "Food & Meals",
            CostCategory::TempleEntry => "Temple Entry & Darshan",
            CostCategory::LocalTransport => "Local Transportation",
            CostCategory::Miscellaneous => "Miscellaneous",
        }
    }
}

impl fmt::Display for CostCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Cost per category, in rupees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CostBreakdown {
    /// Round-trip travel for all travelers
    pub transportation: f64,
    /// Lodging for the whole stay
    pub accommodation: f64,
    /// Meals for the whole stay
    pub food: f64,
    /// Darshan tickets and entry fees
    pub temple_entry: f64,
    /// Autos, taxis and buses at the destination
    pub local_transport: f64,
    /// Offerings, shopping and contingency
    pub miscellaneous: f64,
}

impl CostBreakdown {
    pub fn get(&self, category: CostCategory) -> f64 {
        match category {
            CostCategory::Transportation => self.transportation,
            CostCategory::Accommodation => self.accommodation,
            CostCategory::Food => self.food,
            CostCategory::TempleEntry => self.temple_entry,
            CostCategory::LocalTransport => self.local_transport,
            CostCategory::Miscellaneous => self.miscellaneous,
        }
    }

    pub fn set(&mut self, category: CostCategory, amount: f64) {
        let slot = match category {
            CostCategory::Transportation => &mut self.transportation,
            CostCategory::Accommodation => &mut self.accommodation,
            CostCategory::Food => &mut self.food,
            CostCategory::TempleEntry => &mut self.temple_entry,
            CostCategory::LocalTransport => &mut self.local_transport,
            CostCategory::Miscellaneous => &mut self.miscellaneous,
        };
        *slot = amount;
    }

    /// Iterate categories in display order
    pub fn iter(&self) -> impl Iterator<Item = (CostCategory, f64)> + '_ {
        CostCategory::ALL
            .into_iter()
            .map(move |category| (category, self.get(category)))
    }

    pub fn sum(&self) -> f64 {
        self.iter().map(|(_, amount)| amount).sum()
    }
}

/// Breakdown and tips before the guard step; carries no total.
#[derive(Debug, Clone, PartialEq)]
pub struct RawEstimate {
    pub breakdown: CostBreakdown,
    pub tips: Vec<String>,
}

/// Final estimate handed back to callers.
///
/// The total is always derived from the breakdown when the result is built,
/// so the two cannot drift apart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateResult {
    breakdown: CostBreakdown,
    total: f64,
    tips: Vec<String>,
}

impl EstimateResult {
    pub fn new(breakdown: CostBreakdown, tips: Vec<String>) -> Self {
        Self {
            total: breakdown.sum(),
            breakdown,
            tips,
        }
    }

    pub fn breakdown(&self) -> &CostBreakdown {
        &self.breakdown
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    pub fn tips(&self) -> &[String] {
        &self.tips
    }
}

/// Which path produced an estimate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum EstimateSource {
    /// The configured provider answered with a usable payload
    Remote { provider: String },
    /// No provider is configured
    Deterministic,
    /// A provider was tried and failed
    Fallback { reason: String },
}

impl EstimateSource {
    pub fn is_remote(&self) -> bool {
        matches!(self, EstimateSource::Remote { .. })
    }
}

/// Formats a rupee amount with Indian digit grouping, e.g. `₹12,34,567`.
pub fn format_inr(amount: f64) -> String {
    let rounded = amount.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    let digits = format!("{:.0}", rounded.abs());

    let grouped = if digits.len() <= 3 {
        digits
    } else {
        let (head, tail) = digits.split_at(digits.len() - 3);
        let mut groups: Vec<&str> = Vec::new();
        let mut end = head.len();
        while end > 0 {
            let start = end.saturating_sub(2);
            groups.push(&head[start..end]);
            end = start;
        }
        groups.reverse();
        format!("{},{}", groups.join(","), tail)
    };

    format!("{sign}₹{grouped}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_total_is_derived() {
        let breakdown = CostBreakdown {
            transportation: 6000.0,
            accommodation: 8400.0,
            food: 4200.0,
            temple_entry: 300.0,
            local_transport: 2400.0,
            miscellaneous: 1860.0,
        };
        let result = EstimateResult::new(breakdown, vec!["tip".to_string()]);
        assert_eq!(result.total(), 23160.0);
    }

    #[test]
    fn test_breakdown_set_and_get() {
        let mut breakdown = CostBreakdown::default();
        for (idx, category) in CostCategory::ALL.into_iter().enumerate() {
            breakdown.set(category, idx as f64);
        }
        assert_eq!(breakdown.get(CostCategory::TempleEntry), 3.0);
        assert_eq!(breakdown.sum(), 15.0);
    }

    #[test]
    fn test_serializes_camel_case() {
        let result = EstimateResult::new(CostBreakdown::default(), vec![]);
        let value = serde_json::to_value(&result).unwrap();
        assert!(value["breakdown"].get("templeEntry").is_some());
        assert!(value["breakdown"].get("localTransport").is_some());
        assert_eq!(value["total"], 0.0);
    }

    #[test]
    fn test_format_inr_grouping() {
        assert_eq!(format_inr(0.0), "₹0");
        assert_eq!(format_inr(999.0), "₹999");
        assert_eq!(format_inr(23160.0), "₹23,160");
        assert_eq!(format_inr(1234567.0), "₹12,34,567");
        assert_eq!(format_inr(100000.4), "₹1,00,000");
        assert_eq!(format_inr(-4500.0), "-₹4,500");
    }
}
