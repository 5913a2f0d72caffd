use tracing::{debug, info, warn};

use super::{deterministic::deterministic_estimate, guards::apply_estimation_guards};
use crate::{
    config::EstimatorConfig,
    error::Result,
    services::{
        build_provider, generate_estimation_prompt, parse_estimate_response, CompletionProvider,
    },
    types::{EstimateResult, EstimateSource, RawEstimate, TripRequest},
};

/// An estimate together with the path that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct SourcedEstimate {
    pub result: EstimateResult,
    pub source: EstimateSource,
}

/// Trip cost estimator.
///
/// Runs attempt, validate-or-default, bound: the configured provider is
/// tried first, any failure drops to the fixed formula, and the guard step
/// always runs last. Estimation itself never returns an error.
#[derive(Debug, Default)]
pub struct Estimator {
    provider: Option<Box<dyn CompletionProvider>>,
}

impl Estimator {
    /// Estimator that only uses the fixed formula.
    pub fn deterministic() -> Self {
        Self { provider: None }
    }

    /// Build from configuration. A provider is created only when an API key
    /// is present.
    pub fn new(config: EstimatorConfig) -> Result<Self> {
        if config.api_key().is_none() {
            debug!(target: "tirtha::estimator", "no API key configured, using deterministic estimates");
            return Ok(Self::deterministic());
        }

        let provider = build_provider(&config)?;
        info!(
            target: "tirtha::estimator",
            provider = provider.name(),
            model = config.model(),
            base_url = config.base_url(),
            "remote estimation enabled"
        );
        Ok(Self {
            provider: Some(provider),
        })
    }

    /// Use a custom completion backend.
    pub fn with_provider(provider: impl CompletionProvider + 'static) -> Self {
        Self {
            provider: Some(Box::new(provider)),
        }
    }

    /// Build from the `AI_*` environment variables.
    ///
    /// Configuration problems are logged and leave the estimator on the
    /// deterministic path.
    pub fn from_env() -> Self {
        match EstimatorConfig::from_env().and_then(Self::new) {
            Ok(estimator) => estimator,
            Err(err) => {
                warn!(target: "tirtha::estimator", error = %err, "invalid AI configuration, using deterministic estimates");
                Self::deterministic()
            }
        }
    }

    pub fn is_remote_enabled(&self) -> bool {
        self.provider.is_some()
    }

    pub fn provider_name(&self) -> Option<&'static str> {
        self.provider.as_ref().map(|provider| provider.name())
    }

    /// Estimate the cost of `request`.
    pub async fn estimate(&self, request: &TripRequest) -> EstimateResult {
        self.estimate_with_source(request).await.result
    }

    /// Like [`Estimator::estimate`], also reporting which path was taken.
    pub async fn estimate_with_source(&self, request: &TripRequest) -> SourcedEstimate {
        let (raw, source) = match self.attempt_remote(request).await {
            Some((Ok(raw), provider)) => (
                raw,
                EstimateSource::Remote {
                    provider: provider.to_string(),
                },
            ),
            Some((Err(err), provider)) => {
                warn!(
                    target: "tirtha::remote",
                    provider,
                    error = %err,
                    code = err.error_code(),
                    "AI estimation failed, using fallback"
                );
                (
                    deterministic_estimate(request),
                    EstimateSource::Fallback {
                        reason: err.to_string(),
                    },
                )
            }
            None => (deterministic_estimate(request), EstimateSource::Deterministic),
        };

        let result = apply_estimation_guards(raw, request);
        debug!(
            target: "tirtha::estimator",
            total = result.total(),
            source = ?source,
            "estimate ready"
        );

        SourcedEstimate { result, source }
    }

    async fn attempt_remote(
        &self,
        request: &TripRequest,
    ) -> Option<(Result<RawEstimate>, &'static str)> {
        let provider = self.provider.as_ref()?;
        let prompt = generate_estimation_prompt(request);

        let outcome = match provider.complete(&prompt).await {
            Ok(text) => parse_estimate_response(&text),
            Err(err) => Err(err),
        };

        Some((outcome, provider.name()))
    }
}
