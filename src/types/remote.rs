use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::estimate::{CostBreakdown, RawEstimate};

/// Cost estimate as requested from a completion provider.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RemoteEstimate {
    /// Cost of each category in Indian rupees
    pub breakdown: CostBreakdown,
    /// Sum of all categories as reported by the provider
    pub total: f64,
    /// One or two practical money-saving tips
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tips: Option<Vec<String>>,
    /// Older name for `tips` that some models still answer with
    #[serde(default, rename = "aiTips", skip_serializing_if = "Option::is_none")]
    pub ai_tips: Option<Vec<String>>,
}

impl RemoteEstimate {
    /// The first non-empty tip list, `tips` before `aiTips`.
    pub fn tip_list(&self) -> &[String] {
        [self.tips.as_deref(), self.ai_tips.as_deref()]
            .into_iter()
            .flatten()
            .find(|tips| !tips.is_empty())
            .unwrap_or_default()
    }
}

impl From<RemoteEstimate> for RawEstimate {
    /// The provider's own total is dropped here; it is recomputed after bounding.
    fn from(remote: RemoteEstimate) -> Self {
        let tips = remote.tip_list().to_vec();
        RawEstimate {
            breakdown: remote.breakdown,
            tips,
        }
    }
}
