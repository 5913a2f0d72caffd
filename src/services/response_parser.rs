use serde_json::Value;
use tracing::debug;

use crate::{
    error::{EstimatorError, Result},
    schemas::deserialize_validated,
    types::{RawEstimate, RemoteEstimate},
};

/// Pull a JSON value out of free-form completion text.
///
/// The widest `{...}` span wins. Only when the text has no such span is the
/// whole text parsed instead; a span that fails to parse is an error.
pub fn extract_json(text: &str) -> Result<Value> {
    let span = match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start < end => Some(&text[start..=end]),
        _ => None,
    };

    let candidate = span.unwrap_or_else(|| text.trim());
    serde_json::from_str(candidate)
        .map_err(|err| EstimatorError::Parse(format!("Failed to parse AI response as JSON: {err}")))
}

/// Turn a completion into a raw estimate, rejecting anything off-schema.
pub fn parse_estimate_response(text: &str) -> Result<RawEstimate> {
    let payload = extract_json(text)?;
    let remote: RemoteEstimate = deserialize_validated(&payload)?;
    debug!(
        target: "tirtha::remote",
        reported_total = remote.total,
        tips = remote.tip_list().len(),
        "parsed remote estimate"
    );
    Ok(remote.into())
}
