use serde::Deserialize;

use crate::foodlog::dto::FoodLogRecord;

/// Analyzer reply: either a structured food log that was persisted, or
/// a plain message when the service had nothing to log.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    #[serde(default)]
    pub food_log: Option<FoodLogRecord>,
    #[serde(default)]
    pub message: Option<String>,
}
