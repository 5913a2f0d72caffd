use crate::types::{CostCategory, TripRequest};

/// Build the estimation prompt sent to a completion provider.
pub fn generate_estimation_prompt(request: &TripRequest) -> String {
    let breakdown_fields = CostCategory::ALL
        .iter()
        .map(|category| format!("    \"{}\": number", category.key()))
        .collect::<Vec<_>>()
        .join(",\n");

    let travel_date = if request.travel_date.trim().is_empty() {
        "flexible"
    } else {
        request.travel_date.trim()
    };

    format!(
        "You are a travel cost estimation expert for temple trips in India.\n\n\
         Trip details:\n\
         - From: {origin}\n\
         - To temple: {destination}\n\
         - Travel mode: {mode}\n\
         - Duration: {days} days\n\
         - Travel date: {date}\n\
         - Number of travelers: {travelers}\n\
         - Budget level: {budget}\n\n\
         Respond with a cost breakdown in Indian rupees as JSON with exactly this structure:\n\
         {{\n  \"breakdown\": {{\n{fields}\n  }},\n  \"total\": number,\n  \"tips\": [\"tip1\", \"tip2\"]\n}}\n\n\
         Take into account:\n\
         - current Indian travel costs\n\
         - seasonal variation around the travel date\n\
         - the requested budget level\n\
         - temple-specific entry and darshan costs\n\
         - local transportation at the destination\n\
         - accommodation options near the temple\n\n\
         Include 1-2 practical money-saving tips.",
        origin = request.origin.trim(),
        destination = request.destination.trim(),
        mode = request.travel_mode,
        days = request.days(),
        date = travel_date,
        travelers = request.travelers(),
        budget = request.budget_level,
        fields = breakdown_fields,
    )
}
