pub mod estimate;
pub mod remote;
pub mod request;

pub use estimate::{
    format_inr, CostBreakdown, CostCategory, EstimateResult, EstimateSource, RawEstimate,
};
pub use remote::RemoteEstimate;
pub use request::{parse_count, BudgetLevel, TravelMode, TripRequest};
