use crate::analysis::dto::AnalyzeResponse;
use crate::error::{Error, ValidationErrors};
use crate::foodlog::dto::FoodLogRecord;
use crate::http::{decode, ApiTransport};

/// Send a free-text meal description to the remote analyzer. The prompt
/// must be non-empty after trimming; nothing is sent otherwise.
pub async fn analyze_meal(
    api: &dyn ApiTransport,
    user_id: &str,
    prompt: &str,
) -> Result<AnalyzeResponse, Error> {
    let prompt = prompt.trim();
    if prompt.is_empty() {
        let mut errors = ValidationErrors::default();
        errors.push("prompt", "describe the meal first");
        return Err(errors.into());
    }

    let value = api
        .post(
            "/ai/analyze",
            serde_json::json!({ "userId": user_id, "prompt": prompt }),
        )
        .await?;
    decode(value, "analyzer")
}

/// Human-readable summary of a logged record: calories to the nearest
/// integer, macros to one decimal.
pub fn summarize(record: &FoodLogRecord) -> String {
    format!(
        "Food: {}\nCalories: {}\nProtein: {:.1}g\nCarbs: {:.1}g\nFat: {:.1}g",
        record.food_name,
        record.calories.round() as i64,
        record.protein,
        record.carbs,
        record.fat
    )
}
