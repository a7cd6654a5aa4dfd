use crate::error::Error;
use crate::goal::dto::{GoalRequest, NutritionGoal};
use crate::http::{decode, ApiTransport};

/// Fetch the user's current goal targets.
pub async fn fetch_goal(api: &dyn ApiTransport, user_id: &str) -> Result<NutritionGoal, Error> {
    let value = api.get("/goal/user", &[("userId", user_id)]).await?;
    decode(value, "nutrition goal")
}

/// Submit a validated goal request; the backend runs the BMR/TDEE math
/// and answers with the calculated per-day targets.
pub async fn calculate_goal(
    api: &dyn ApiTransport,
    request: &GoalRequest,
) -> Result<NutritionGoal, Error> {
    let body = serde_json::to_value(request)
        .map_err(|e| Error::Network(format!("could not encode goal request: {e}")))?;
    let value = api.post("/goal/calculate", body).await?;
    decode(value, "nutrition plan")
}
