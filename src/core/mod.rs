pub mod deterministic;
pub mod estimator;
pub mod guards;

pub use deterministic::{deterministic_estimate, one_way_fare, DailyRates};
pub use estimator::{Estimator, SourcedEstimate};
pub use guards::{apply_estimation_guards, category_bounds, RateBounds};
