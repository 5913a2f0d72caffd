use crate::types::{BudgetLevel, CostBreakdown, RawEstimate, TravelMode, TripRequest};

/// Flat temple entry fee per traveler, in rupees.
pub const TEMPLE_ENTRY_PER_PERSON: f64 = 100.0;

/// Share of transportation, accommodation and food set aside for extras.
pub const MISCELLANEOUS_SHARE: f64 = 0.1;

/// Tips attached to every formula-based estimate.
pub const DETERMINISTIC_TIPS: [&str; 2] = [
    "Book accommodations 2-3 weeks in advance for better rates and availability.",
    "Consider traveling during weekdays to save 15-20% on hotel costs.",
];

/// Per person, per day rates for one budget level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyRates {
    pub accommodation: f64,
    pub food: f64,
    pub local_transport: f64,
}

impl DailyRates {
    /// Unknown levels are priced like `medium`.
    pub fn for_level(level: &BudgetLevel) -> Self {
        match level {
            BudgetLevel::Budget => DailyRates {
                accommodation: 800.0,
                food: 500.0,
                local_transport: 300.0,
            },
            BudgetLevel::Luxury => DailyRates {
                accommodation: 3000.0,
                food: 1200.0,
                local_transport: 600.0,
            },
            BudgetLevel::Medium | BudgetLevel::Other(_) => DailyRates {
                accommodation: 1400.0,
                food: 700.0,
                local_transport: 400.0,
            },
        }
    }
}

/// One-way fare per person. Unknown modes are priced like `car`.
pub fn one_way_fare(mode: &TravelMode) -> f64 {
    match mode {
        TravelMode::Flight => 4000.0,
        TravelMode::Train => 1500.0,
        TravelMode::Car | TravelMode::Other(_) => 2000.0,
    }
}

/// Fixed-formula estimate. Depends only on mode, duration, travelers and
/// budget level.
pub fn deterministic_estimate(request: &TripRequest) -> RawEstimate {
    let travelers = f64::from(request.travelers());
    let days = f64::from(request.days());
    let rates = DailyRates::for_level(&request.budget_level);

    let transportation = one_way_fare(&request.travel_mode) * 2.0 * travelers;
    let accommodation = rates.accommodation * days * travelers;
    let food = rates.food * days * travelers;
    let temple_entry = TEMPLE_ENTRY_PER_PERSON * travelers;
    let local_transport = rates.local_transport * days * travelers;
    let miscellaneous = ((transportation + accommodation + food) * MISCELLANEOUS_SHARE).round();

    RawEstimate {
        breakdown: CostBreakdown {
            transportation,
            accommodation,
            food,
            temple_entry,
            local_transport,
            miscellaneous,
        },
        tips: DETERMINISTIC_TIPS.iter().map(|tip| tip.to_string()).collect(),
    }
}
