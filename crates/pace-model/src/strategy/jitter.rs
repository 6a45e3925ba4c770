use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{ModelError, ModelResult};

/// Controls how random jitter is applied to retry delays.
///
/// Strategies:
/// - `None`: No jitter. Delays are deterministic.
/// - `Full`: delay is uniformly sampled from `[0, base]`.
/// - `Equal`: delay is sampled from `[base/2, base]`.
/// - `Decorrelated`: delay is sampled from `[first, min(max, prev * 3)]`.
///
/// The math lives in the retry policy of `pace-core`; this enum only names it.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum JitterStrategy {
    #[default]
    None,
    Full,
    Equal,
    Decorrelated,
}

impl FromStr for JitterStrategy {
    type Err = ModelError;
    fn from_str(s: &str) -> ModelResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "equal" => Ok(JitterStrategy::Equal),
            "" | "none" => Ok(JitterStrategy::None),
            "full" => Ok(JitterStrategy::Full),
            "decorrelated" => Ok(JitterStrategy::Decorrelated),
            other => Err(ModelError::UnknownJitter(other.to_string())),
        }
    }
}
