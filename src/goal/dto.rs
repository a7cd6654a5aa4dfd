use serde::{Deserialize, Serialize};

/// Per-day nutrient targets for one user. Read-only to the aggregation
/// core; replaced wholesale whenever the goal form is resubmitted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionGoal {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

impl NutritionGoal {
    /// Targets used when no goal has been calculated yet. Always
    /// positive, which keeps progress ratios well-defined.
    pub const fn fallback() -> Self {
        Self {
            calories: 1550.0,
            protein: 50.0,
            carbs: 250.0,
            fat: 70.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityLevel {
    Light,
    Moderate,
    Active,
}

/// Weekly gain rate options offered by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GainRate {
    #[serde(rename = "500g")]
    HalfKilo,
    #[serde(rename = "1kg")]
    OneKilo,
}

/// Weekly loss rate options offered by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LossRate {
    #[serde(rename = "0.5")]
    HalfKilo,
    #[serde(rename = "1")]
    OneKilo,
}

/// Direction of the goal plus its rate field. Serializes to
/// `goalType` + exactly one of `weightGainRate` / `weeklyLossRate`,
/// never both and never neither.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "goalType", rename_all = "lowercase")]
pub enum GoalPlan {
    #[serde(rename_all = "camelCase")]
    Gain { weight_gain_rate: GainRate },
    #[serde(rename_all = "camelCase")]
    Lose { weekly_loss_rate: LossRate },
}

/// Outbound payload for `POST /goal/calculate`. Transient: built from a
/// validated form, sent once, discarded after the response.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalRequest {
    pub user_id: String,
    pub gender: Gender,
    pub age: u32,
    pub current_weight: f64,
    pub target_weight: f64,
    pub height_feet: u32,
    pub height_inches: u32,
    pub activity_level: ActivityLevel,
    #[serde(flatten)]
    pub plan: GoalPlan,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(plan: GoalPlan) -> GoalRequest {
        GoalRequest {
            user_id: "u1".into(),
            gender: Gender::Male,
            age: 30,
            current_weight: 70.0,
            target_weight: 65.0,
            height_feet: 5,
            height_inches: 7,
            activity_level: ActivityLevel::Light,
            plan,
        }
    }

    #[test]
    fn gain_request_carries_only_the_gain_rate() {
        let value = serde_json::to_value(request(GoalPlan::Gain {
            weight_gain_rate: GainRate::HalfKilo,
        }))
        .expect("serialize");
        assert_eq!(value["goalType"], "gain");
        assert_eq!(value["weightGainRate"], "500g");
        assert!(value.get("weeklyLossRate").is_none());
    }

    #[test]
    fn lose_request_carries_only_the_loss_rate() {
        let value = serde_json::to_value(request(GoalPlan::Lose {
            weekly_loss_rate: LossRate::OneKilo,
        }))
        .expect("serialize");
        assert_eq!(value["goalType"], "lose");
        assert_eq!(value["weeklyLossRate"], "1");
        assert!(value.get("weightGainRate").is_none());
    }

    #[test]
    fn wire_field_names_are_camel_case() {
        let value = serde_json::to_value(request(GoalPlan::Gain {
            weight_gain_rate: GainRate::OneKilo,
        }))
        .expect("serialize");
        assert_eq!(value["userId"], "u1");
        assert_eq!(value["currentWeight"], 70.0);
        assert_eq!(value["heightFeet"], 5);
        assert_eq!(value["heightInches"], 7);
        assert_eq!(value["activityLevel"], "light");
    }
}
