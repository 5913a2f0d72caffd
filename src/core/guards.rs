use crate::types::{CostBreakdown, CostCategory, EstimateResult, RawEstimate, TripRequest};

/// Substituted when an estimate arrives without any usable tip.
pub const DEFAULT_TIPS: [&str; 2] = [
    "Consider booking during off-peak seasons for better prices.",
    "Look for package deals that include accommodation and meals.",
];

/// Per-person rate bounds for a category. Transportation is per trip,
/// everything else per day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateBounds {
    pub min: f64,
    pub max: f64,
}

impl RateBounds {
    pub fn for_category(category: CostCategory) -> Self {
        let (min, max) = match category {
            CostCategory::Transportation => (500.0, 15000.0),
            CostCategory::Accommodation => (300.0, 5000.0),
            CostCategory::Food => (200.0, 2000.0),
            CostCategory::TempleEntry => (50.0, 500.0),
            CostCategory::LocalTransport => (100.0, 1000.0),
            CostCategory::Miscellaneous => (100.0, 2000.0),
        };
        RateBounds { min, max }
    }

    /// Scale the per-person rates to the whole party and stay.
    pub fn scaled(self, category: CostCategory, request: &TripRequest) -> RateBounds {
        let days = if category == CostCategory::Transportation {
            1.0
        } else {
            f64::from(request.days())
        };
        let factor = f64::from(request.travelers()) * days;

        RateBounds {
            min: self.min * factor,
            max: self.max * factor,
        }
    }

    pub fn clamp(self, amount: f64) -> f64 {
        if amount.is_nan() {
            return self.min;
        }
        amount.clamp(self.min, self.max)
    }
}

/// Bounds for `category` scaled to `request`.
pub fn category_bounds(category: CostCategory, request: &TripRequest) -> RateBounds {
    RateBounds::for_category(category).scaled(category, request)
}

/// Clamp every category into its bounds, recompute the total and make sure
/// at least one tip is present.
pub fn apply_estimation_guards(raw: RawEstimate, request: &TripRequest) -> EstimateResult {
    let mut breakdown = CostBreakdown::default();
    for (category, amount) in raw.breakdown.iter() {
        breakdown.set(category, category_bounds(category, request).clamp(amount));
    }

    let mut tips: Vec<String> = raw
        .tips
        .into_iter()
        .map(|tip| tip.trim().to_string())
        .filter(|tip| !tip.is_empty())
        .collect();
    if tips.is_empty() {
        tips = DEFAULT_TIPS.iter().map(|tip| tip.to_string()).collect();
    }

    EstimateResult::new(breakdown, tips)
}
