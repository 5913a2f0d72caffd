//! tirtha-estimator: cost estimates for temple trips in India
//!
//! An [`Estimator`] turns a [`TripRequest`] into a six-category cost
//! breakdown. When an API key is configured it asks one of four LLM
//! providers (OpenAI, Anthropic, Cohere, Mistral) for the numbers, otherwise
//! or on any failure it uses a fixed formula. Either way every category is
//! clamped into sane per-person bounds and the total is recomputed, so a
//! usable result always comes back.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use tirtha_estimator::{Estimator, TripRequest};
//!
//! #[tokio::main]
//! async fn main() {
//!     let estimator = Estimator::from_env();
//!     let request = TripRequest::new("Chennai", "Tirupati Balaji")
//!         .with_travel_mode("train")
//!         .with_duration_days(3)
//!         .with_traveler_count(2);
//!
//!     let estimate = estimator.estimate(&request).await;
//!     println!("total: {}", tirtha_estimator::format_inr(estimate.total()));
//! }
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod schemas;
pub mod services;
pub mod types;

pub use crate::core::{Estimator, SourcedEstimate};
pub use config::{AiProvider, EstimatorConfig};
pub use error::{EstimatorError, Result};
pub use services::CompletionProvider;
pub use types::{
    format_inr, BudgetLevel, CostBreakdown, CostCategory, EstimateResult, EstimateSource,
    TravelMode, TripRequest,
};

#[cfg(feature = "cli")]
pub mod cli;
